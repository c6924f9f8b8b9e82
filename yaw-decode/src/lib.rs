//! CAN yaw-rate sensor decoding
//!
//! Decodes frames from three families of Bosch-built yaw-rate and
//! acceleration sensors into physical units. Each family uses its own
//! reverse-engineered layout:
//!
//! - Subaru (0x070, 0x576): two's complement words, needs a keep-alive frame
//! - Infiniti/Nissan (0x130, 0x140): midpoint-offset words
//! - Mercedes (0x150, 0x151, 0x156): midpoint-offset words
//!
//! Decoding is pure and stateless. Acquiring frames and presenting readings
//! are left to the caller.
//!
//! ```
//! use yaw_decode::{decode_frame, Frame, Quantity};
//!
//! let frame = Frame::new(0x070, &[0x00, 0x00, 0xE8, 0x03, 0x80, 0x00, 0xC8, 0x00])?;
//! let outcome = decode_frame(&frame);
//! let reading = outcome.reading().unwrap();
//! assert!((reading.get(Quantity::LateralAccel).unwrap() - 0.5).abs() < 1e-12);
//! # Ok::<(), yaw_decode::FrameError>(())
//! ```

mod decode;
pub mod field;
mod frame;
pub mod message;
pub mod profile;
mod reading;

pub use decode::{decode, decode_frame};
pub use field::{get_i16, get_u16, Encoding, MIDPOINT};
pub use frame::{Frame, FrameError, MAX_DLC, MAX_STANDARD_ID};
pub use message::{can_id, FieldRole, FieldSpec, FieldWidth, Message, MessageKind};
pub use profile::{KeepAlive, Vendor, VendorProfile};
pub use reading::{DecodeOutcome, DecodedReading, Quantity, RawCount, RawCounts};
