//! Collaborators for the yaw sensor decoders.
//!
//! Frame sources (candump logs, Linux SocketCAN), reading sinks (text and
//! JSON lines), the decode-then-present loop with per-vendor traffic
//! accounting, and the keep-alive feeder required by the Subaru sensor.
//!
//! # Features
//! - `socketcan` - live capture and transmission through Linux SocketCAN

#[cfg(all(target_os = "linux", feature = "socketcan"))]
pub mod bus;
pub mod candump;
pub mod dispatch;
pub mod keepalive;
pub mod sink;
pub mod source;
pub mod stats;

pub use dispatch::{run, Dispatcher, RunError};
pub use keepalive::{FrameWriter, KeepAliveFeeder};
pub use sink::{JsonSink, ReadingSink, TextSink};
pub use source::{CandumpReader, FrameSource, SourceError};
pub use stats::{TrafficStats, VendorCounts};
