//! Decode-then-present loop

use thiserror::Error;
use tracing::trace;
use yaw_decode::{decode, DecodeOutcome, Frame, Vendor};

use crate::sink::ReadingSink;
use crate::source::{FrameSource, SourceError};
use crate::stats::TrafficStats;

#[derive(Error, Debug)]
pub enum RunError {
    #[error("Frame source failed: {0}")]
    Source(#[from] SourceError),

    #[error("Output failed: {0}")]
    Sink(#[from] std::io::Error),
}

/// Routes frames to vendor decoders and keeps traffic counts
#[derive(Debug, Default)]
pub struct Dispatcher {
    filter: Option<Vendor>,
    stats: TrafficStats,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only decode one vendor's frames. Everything else is reported as not
    /// recognized.
    pub fn with_filter(filter: Option<Vendor>) -> Self {
        Self {
            filter,
            stats: TrafficStats::new(),
        }
    }

    pub fn process(&mut self, frame: &Frame) -> DecodeOutcome {
        let vendor = Vendor::for_identifier(frame.id());
        if let (Some(vendor), Some(filter)) = (vendor, self.filter) {
            if vendor != filter {
                self.stats.record_filtered(vendor);
                return DecodeOutcome::NotRecognized;
            }
        }

        let outcome = match vendor {
            Some(vendor) => decode(vendor, frame),
            None => DecodeOutcome::NotRecognized,
        };
        if !outcome.is_recognized() {
            trace!("Unrecognized frame {}", frame);
        }
        self.stats.record(vendor, &outcome);
        outcome
    }

    pub fn stats(&self) -> &TrafficStats {
        &self.stats
    }
}

/// Pull frames from `source` until it ends, presenting each decode on `sink`.
pub fn run<S, K>(
    source: &mut S,
    dispatcher: &mut Dispatcher,
    sink: &mut K,
) -> Result<(), RunError>
where
    S: FrameSource + ?Sized,
    K: ReadingSink + ?Sized,
{
    while let Some(frame) = source.next_frame()? {
        let outcome = dispatcher.process(&frame);
        sink.emit(&frame, &outcome)?;
    }
    sink.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::io;
    use yaw_decode::Message;

    struct Frames(VecDeque<Result<Frame, ()>>);

    impl FrameSource for Frames {
        fn next_frame(&mut self) -> Result<Option<Frame>, SourceError> {
            match self.0.pop_front() {
                Some(Ok(frame)) => Ok(Some(frame)),
                Some(Err(())) => Err(SourceError::Io(io::Error::other("bus down"))),
                None => Ok(None),
            }
        }
    }

    #[derive(Default)]
    struct Collect(Vec<(u16, DecodeOutcome)>);

    impl ReadingSink for Collect {
        fn emit(&mut self, frame: &Frame, outcome: &DecodeOutcome) -> io::Result<()> {
            self.0.push((frame.id(), outcome.clone()));
            Ok(())
        }
    }

    fn frame(id: u32, payload: &[u8]) -> Frame {
        Frame::new(id, payload).unwrap()
    }

    #[test]
    fn test_run_until_end_of_stream() {
        let mut source = Frames(VecDeque::from([
            Ok(frame(0x070, &[0; 8])),
            Ok(frame(0x123, &[0; 8])),
            Ok(frame(0x151, &[0x00, 0x80, 0, 0, 0x00, 0x80, 0, 0])),
        ]));
        let mut dispatcher = Dispatcher::new();
        let mut sink = Collect::default();

        run(&mut source, &mut dispatcher, &mut sink).unwrap();

        let messages: Vec<_> = sink.0.iter().map(|(_, o)| o.message()).collect();
        assert_eq!(
            messages,
            vec![
                Some(Message::SubaruInertial),
                None,
                Some(Message::MercedesLongitudinal)
            ]
        );
        assert_eq!(dispatcher.stats().total(), 3);
        assert_eq!(dispatcher.stats().unrouted(), 1);
    }

    #[test]
    fn test_run_stops_on_source_error() {
        let mut source = Frames(VecDeque::from([
            Ok(frame(0x130, &[0; 8])),
            Err(()),
            Ok(frame(0x130, &[0; 8])),
        ]));
        let mut dispatcher = Dispatcher::new();
        let mut sink = Collect::default();

        let result = run(&mut source, &mut dispatcher, &mut sink);
        assert!(matches!(result, Err(RunError::Source(SourceError::Io(_)))));
        assert_eq!(sink.0.len(), 1);
    }

    #[test]
    fn test_filter_drops_other_vendors() {
        let mut dispatcher = Dispatcher::with_filter(Some(Vendor::Nissan));

        let subaru = dispatcher.process(&frame(0x070, &[0; 8]));
        assert_eq!(subaru, DecodeOutcome::NotRecognized);

        let nissan = dispatcher.process(&frame(0x130, &[0; 8]));
        assert_eq!(nissan.message(), Some(Message::NissanInertial));

        assert_eq!(dispatcher.stats().vendor(Vendor::Subaru).filtered, 1);
        assert_eq!(dispatcher.stats().vendor(Vendor::Nissan).readings, 1);
    }
}
