//! 16-bit field extraction from CAN payloads
//!
//! The sensors place the low byte of every 16-bit word first on the wire:
//! the byte at `offset` is the LSB and the byte at `offset + 1` is the MSB.
//! This is independent of host endianness.
//!
//! Callers guarantee `offset + 1 < payload.len()` by checking the frame
//! DLC before extracting. Violating that is a bug in the caller and panics.

/// Midpoint code used by the midpoint-offset sensors. Raw code 0x8000 is
/// physical zero.
pub const MIDPOINT: u16 = 0x8000;

/// Read an unsigned 16-bit word at `offset`.
pub fn get_u16(payload: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([payload[offset], payload[offset + 1]])
}

/// Read a sign-extended 16-bit word at `offset`.
pub fn get_i16(payload: &[u8], offset: usize) -> i16 {
    i16::from_le_bytes([payload[offset], payload[offset + 1]])
}

/// How a sensor encodes a signed count in a 16-bit word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// Plain two's complement
    TwosComplement,
    /// `count = midpoint - raw`, raw read unsigned
    MidpointOffset { midpoint: u16 },
}

impl Encoding {
    /// Extract a signed count from the word at `offset`.
    pub fn count(&self, payload: &[u8], offset: usize) -> i32 {
        match *self {
            Encoding::TwosComplement => get_i16(payload, offset) as i32,
            Encoding::MidpointOffset { midpoint } => {
                midpoint as i32 - get_u16(payload, offset) as i32
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_low_byte_first() {
        let data = [0x34, 0x12];
        assert_eq!(get_u16(&data, 0), 0x1234);
        assert_eq!(get_i16(&data, 0), 0x1234);
    }

    #[test]
    fn test_sign_extension() {
        let data = [0x00, 0x00, 0xFF, 0xFF, 0x00, 0x80];
        assert_eq!(get_i16(&data, 2), -1);
        assert_eq!(get_u16(&data, 2), 0xFFFF);
        assert_eq!(get_i16(&data, 4), i16::MIN);
        assert_eq!(get_u16(&data, 4), 0x8000);
    }

    #[test]
    fn test_midpoint_offset_count() {
        let enc = Encoding::MidpointOffset { midpoint: MIDPOINT };
        assert_eq!(enc.count(&[0x00, 0x80], 0), 0);
        assert_eq!(enc.count(&[0x00, 0x7F], 0), 256);
        assert_eq!(enc.count(&[0x00, 0x81], 0), -256);
        assert_eq!(enc.count(&[0xFF, 0xFF], 0), -32767);
        assert_eq!(enc.count(&[0x00, 0x00], 0), 32768);
    }

    #[test]
    fn test_twos_complement_count() {
        let enc = Encoding::TwosComplement;
        assert_eq!(enc.count(&[0x18, 0xFC], 0), -1000);
        assert_eq!(enc.count(&[0xE8, 0x03], 0), 1000);
    }
}
