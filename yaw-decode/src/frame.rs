//! Classic CAN frame descriptor

use std::fmt;

use thiserror::Error;

/// Largest standard (11-bit) identifier
pub const MAX_STANDARD_ID: u16 = 0x7FF;

/// Largest classic CAN payload
pub const MAX_DLC: usize = 8;

/// Errors building a [`Frame`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    #[error("Identifier 0x{0:X} does not fit in 11 bits")]
    IdentifierOutOfRange(u32),

    #[error("Payload of {0} bytes exceeds 8")]
    PayloadTooLong(usize),
}

/// A standard-identifier data frame as read off the bus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Frame {
    id: u16,
    dlc: u8,
    data: [u8; MAX_DLC],
}

impl Frame {
    /// Build a frame from an identifier and `dlc` payload bytes.
    pub fn new(id: u32, payload: &[u8]) -> Result<Self, FrameError> {
        if id > MAX_STANDARD_ID as u32 {
            return Err(FrameError::IdentifierOutOfRange(id));
        }
        if payload.len() > MAX_DLC {
            return Err(FrameError::PayloadTooLong(payload.len()));
        }

        let mut data = [0u8; MAX_DLC];
        data[..payload.len()].copy_from_slice(payload);

        Ok(Self {
            id: id as u16,
            dlc: payload.len() as u8,
            data,
        })
    }

    pub fn id(&self) -> u16 {
        self.id
    }

    /// Data length code (0-8)
    pub fn dlc(&self) -> u8 {
        self.dlc
    }

    /// The first `dlc` bytes of the payload
    pub fn payload(&self) -> &[u8] {
        &self.data[..self.dlc as usize]
    }
}

/// Hex dump: `0x070 [8] 00 00 E8 03 80 00 C8 00`
impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:03X} [{}]", self.id, self.dlc)?;
        for byte in self.payload() {
            write!(f, " {byte:02X}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_is_truncated_to_dlc() {
        let frame = Frame::new(0x070, &[0xA8, 0xFF, 0x81, 0x00, 0xA2, 0x94]).unwrap();
        assert_eq!(frame.dlc(), 6);
        assert_eq!(frame.payload(), &[0xA8, 0xFF, 0x81, 0x00, 0xA2, 0x94]);
    }

    #[test]
    fn test_rejects_extended_identifier() {
        assert_eq!(
            Frame::new(0x800, &[]),
            Err(FrameError::IdentifierOutOfRange(0x800))
        );
        assert!(Frame::new(0x7FF, &[]).is_ok());
    }

    #[test]
    fn test_rejects_long_payload() {
        assert_eq!(
            Frame::new(0x130, &[0; 9]),
            Err(FrameError::PayloadTooLong(9))
        );
    }

    #[test]
    fn test_display_hex_dump() {
        let frame = Frame::new(0x070, &[0x00, 0x00, 0xE8, 0x03]).unwrap();
        assert_eq!(frame.to_string(), "0x070 [4] 00 00 E8 03");

        let empty = Frame::new(0x075, &[]).unwrap();
        assert_eq!(empty.to_string(), "0x075 [0]");
    }
}
