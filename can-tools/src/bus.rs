//! Linux SocketCAN transport

use std::io;

use socketcan::{CanFrame, CanSocket, EmbeddedFrame, Id, Socket, StandardId};
use tracing::{debug, warn};
use yaw_decode::Frame;

use crate::keepalive::FrameWriter;
use crate::source::{FrameSource, SourceError};

fn open(interface: &str) -> Result<CanSocket, SourceError> {
    CanSocket::open(interface).map_err(|source| SourceError::Open {
        interface: interface.to_string(),
        source,
    })
}

/// Blocking reader on a raw CAN socket.
///
/// Only standard-identifier data frames are yielded. Extended, remote and
/// error frames are logged and skipped.
pub struct SocketCanSource {
    socket: CanSocket,
}

impl SocketCanSource {
    pub fn open(interface: &str) -> Result<Self, SourceError> {
        Ok(Self {
            socket: open(interface)?,
        })
    }
}

impl FrameSource for SocketCanSource {
    fn next_frame(&mut self) -> Result<Option<Frame>, SourceError> {
        loop {
            match self.socket.read_frame()? {
                CanFrame::Data(data) => match data.id() {
                    Id::Standard(id) => {
                        return Ok(Some(Frame::new(id.as_raw() as u32, data.data())?));
                    }
                    Id::Extended(id) => debug!("Skipping extended frame 0x{:08X}", id.as_raw()),
                },
                CanFrame::Remote(_) => debug!("Skipping remote frame"),
                CanFrame::Error(_) => warn!("Bus error frame received"),
            }
        }
    }
}

/// Transmitting side of a raw CAN socket
pub struct SocketCanWriter {
    socket: CanSocket,
}

impl SocketCanWriter {
    pub fn open(interface: &str) -> Result<Self, SourceError> {
        Ok(Self {
            socket: open(interface)?,
        })
    }
}

impl FrameWriter for SocketCanWriter {
    fn write_frame(&mut self, frame: &Frame) -> io::Result<()> {
        let id = StandardId::new(frame.id())
            .ok_or_else(|| io::Error::other(format!("invalid identifier 0x{:X}", frame.id())))?;
        let can_frame = CanFrame::new(id, frame.payload())
            .ok_or_else(|| io::Error::other("payload too long"))?;
        self.socket.write_frame(&can_frame)
    }
}
