//! Vendor decoders
//!
//! Decoding is a pure function of the frame: no state is kept between calls
//! and every call allocates its own result. Checksums and rolling counters are
//! not verified, so a corrupted frame that matches a layout decodes as valid.

use crate::frame::Frame;
use crate::message::{FieldRole, Message, MessageKind};
use crate::profile::{Vendor, VendorProfile};
use crate::reading::{DecodeOutcome, DecodedReading, RawCount, RawCounts};

/// Decode a frame as one vendor's traffic.
///
/// Returns [`DecodeOutcome::NotRecognized`] when the identifier or length is
/// outside the vendor's layouts.
pub fn decode(vendor: Vendor, frame: &Frame) -> DecodeOutcome {
    match Message::classify(vendor, frame.id(), frame.dlc()) {
        Some(message) => decode_message(vendor.profile(), message, frame.payload()),
        None => DecodeOutcome::NotRecognized,
    }
}

/// Route a frame through the identifier table, then decode it.
pub fn decode_frame(frame: &Frame) -> DecodeOutcome {
    match Vendor::for_identifier(frame.id()) {
        Some(vendor) => decode(vendor, frame),
        None => DecodeOutcome::NotRecognized,
    }
}

fn decode_message(profile: &VendorProfile, message: Message, payload: &[u8]) -> DecodeOutcome {
    match message.kind() {
        MessageKind::Raw => {
            let counts = message
                .fields()
                .iter()
                .filter(|f| f.role == FieldRole::Raw)
                .map(|f| RawCount {
                    field: f.name,
                    offset: f.offset,
                    count: profile.encoding.count(payload, f.offset),
                })
                .collect();
            DecodeOutcome::Raw(RawCounts { message, counts })
        }
        MessageKind::Reading | MessageKind::Empty => {
            let mut reading = DecodedReading::empty(message);
            for field in message.fields() {
                let FieldRole::Quantity(quantity) = field.role else {
                    continue;
                };
                if let Some(scale) = profile.scale(quantity) {
                    let count = profile.encoding.count(payload, field.offset);
                    reading.set(quantity, count as f64 * scale);
                }
            }
            DecodeOutcome::Reading(reading)
        }
    }
}
