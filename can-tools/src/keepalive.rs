//! Periodic keep-alive transmission
//!
//! The Subaru sensor only streams while the host keeps sending `075#0000`.
//! [`KeepAliveFeeder`] does that from a background thread.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{debug, warn};
use yaw_decode::{Frame, FrameError, KeepAlive};

/// Anything that can put a frame on the bus
pub trait FrameWriter: Send {
    fn write_frame(&mut self, frame: &Frame) -> io::Result<()>;
}

/// Background thread transmitting a keep-alive frame at a fixed period
pub struct KeepAliveFeeder {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<io::Result<u64>>>,
}

impl KeepAliveFeeder {
    /// Start feeding. The first frame goes out immediately.
    pub fn spawn<W>(mut writer: W, keep_alive: KeepAlive) -> Result<Self, FrameError>
    where
        W: FrameWriter + 'static,
    {
        let frame = keep_alive.frame()?;
        let stop = Arc::new(AtomicBool::new(false));
        let stop_clone = stop.clone();

        let handle = thread::spawn(move || {
            let mut sent = 0u64;
            while !stop_clone.load(Ordering::Relaxed) {
                if let Err(e) = writer.write_frame(&frame) {
                    warn!("Keep-alive write failed after {} frames: {}", sent, e);
                    return Err(e);
                }
                sent += 1;
                thread::sleep(keep_alive.period);
            }
            debug!("Keep-alive stopped after {} frames", sent);
            Ok(sent)
        });

        Ok(Self {
            stop,
            handle: Some(handle),
        })
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stop the thread and return how many frames it sent.
    pub fn stop(mut self) -> io::Result<u64> {
        self.stop.store(true, Ordering::Relaxed);
        match self.handle.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| io::Error::other("keep-alive thread panicked"))?,
            None => Ok(0),
        }
    }
}

impl Drop for KeepAliveFeeder {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}
