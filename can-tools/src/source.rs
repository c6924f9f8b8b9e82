//! Frame sources feeding the dispatcher

use std::io::BufRead;

use thiserror::Error;
use tracing::{debug, warn};
use yaw_decode::{Frame, FrameError};

use crate::candump::{parse_line, LineRecord};

/// Errors that end a capture
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to open {interface}: {source}")]
    Open {
        interface: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("Invalid frame: {0}")]
    Frame(#[from] FrameError),
}

/// Anything that yields CAN frames one at a time.
///
/// `Ok(None)` marks a clean end of stream. Errors are fatal to the capture.
pub trait FrameSource {
    fn next_frame(&mut self) -> Result<Option<Frame>, SourceError>;
}

/// Reads frames from candump text output.
///
/// Malformed lines are logged and skipped unless strict mode is enabled.
pub struct CandumpReader<R> {
    reader: R,
    line_no: usize,
    line: String,
    strict: bool,
    skipped: usize,
}

impl<R: BufRead> CandumpReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_no: 0,
            line: String::new(),
            strict: false,
            skipped: 0,
        }
    }

    /// Fail on the first malformed line instead of skipping it
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Lines that parsed to no frame (malformed, extended, remote or FD)
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

impl<R: BufRead> FrameSource for CandumpReader<R> {
    fn next_frame(&mut self) -> Result<Option<Frame>, SourceError> {
        loop {
            self.line.clear();
            if self.reader.read_line(&mut self.line)? == 0 {
                return Ok(None);
            }
            self.line_no += 1;

            match parse_line(&self.line) {
                Ok(LineRecord::Frame(frame)) => return Ok(Some(frame)),
                Ok(LineRecord::Blank) => {}
                Ok(LineRecord::Skipped(reason)) => {
                    debug!("Line {}: skipping {:?} frame", self.line_no, reason);
                    self.skipped += 1;
                }
                Err(reason) if self.strict => {
                    return Err(SourceError::Parse {
                        line: self.line_no,
                        reason,
                    });
                }
                Err(reason) => {
                    warn!("Line {}: {}", self.line_no, reason);
                    self.skipped += 1;
                }
            }
        }
    }
}
