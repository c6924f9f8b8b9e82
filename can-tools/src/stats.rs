//! Per-vendor bus traffic accounting

use std::collections::HashMap;
use std::fmt;

use strum::IntoEnumIterator;
use yaw_decode::{DecodeOutcome, Vendor};

/// Frame counts for one sensor family
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct VendorCounts {
    /// Readings with at least one physical value
    pub readings: u64,
    /// Recognized messages with no physical content
    pub empty: u64,
    /// Raw diagnostic counts
    pub raw: u64,
    /// Vendor identifier with an unknown length
    pub not_recognized: u64,
    /// Dropped by the vendor filter
    pub filtered: u64,
}

impl VendorCounts {
    pub fn total(&self) -> u64 {
        self.readings + self.empty + self.raw + self.not_recognized + self.filtered
    }
}

#[derive(Debug, Default, Clone)]
pub struct TrafficStats {
    vendors: HashMap<Vendor, VendorCounts>,
    unrouted: u64,
}

impl TrafficStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a decoded frame against the vendor it was routed to.
    pub fn record(&mut self, vendor: Option<Vendor>, outcome: &DecodeOutcome) {
        let Some(vendor) = vendor else {
            self.unrouted += 1;
            return;
        };
        let counts = self.vendors.entry(vendor).or_default();
        match outcome {
            DecodeOutcome::Reading(reading) if reading.is_empty() => counts.empty += 1,
            DecodeOutcome::Reading(_) => counts.readings += 1,
            DecodeOutcome::Raw(_) => counts.raw += 1,
            DecodeOutcome::NotRecognized | DecodeOutcome::UnsupportedLayout { .. } => {
                counts.not_recognized += 1
            }
        }
    }

    pub fn record_filtered(&mut self, vendor: Vendor) {
        self.vendors.entry(vendor).or_default().filtered += 1;
    }

    pub fn vendor(&self, vendor: Vendor) -> VendorCounts {
        self.vendors.get(&vendor).copied().unwrap_or_default()
    }

    /// Frames whose identifier belongs to no known sensor
    pub fn unrouted(&self) -> u64 {
        self.unrouted
    }

    pub fn total(&self) -> u64 {
        self.unrouted + self.vendors.values().map(VendorCounts::total).sum::<u64>()
    }
}

impl fmt::Display for TrafficStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} frames", self.total())?;
        for vendor in Vendor::iter() {
            let c = self.vendor(vendor);
            if c.total() == 0 {
                continue;
            }
            write!(
                f,
                "; {vendor}: {} readings, {} empty, {} raw, {} unrecognized",
                c.readings, c.empty, c.raw, c.not_recognized
            )?;
            if c.filtered > 0 {
                write!(f, ", {} filtered", c.filtered)?;
            }
        }
        write!(f, "; {} other", self.unrouted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yaw_decode::{decode_frame, Frame};

    fn record(stats: &mut TrafficStats, id: u32, payload: &[u8]) {
        let frame = Frame::new(id, payload).unwrap();
        stats.record(Vendor::for_identifier(frame.id()), &decode_frame(&frame));
    }

    #[test]
    fn test_counts_by_outcome() {
        let mut stats = TrafficStats::new();
        record(&mut stats, 0x070, &[0; 8]);
        record(&mut stats, 0x070, &[0; 6]);
        record(&mut stats, 0x576, &[0; 8]);
        record(&mut stats, 0x070, &[0; 4]);
        record(&mut stats, 0x140, &[0; 8]);
        record(&mut stats, 0x3E8, &[0; 8]);

        assert_eq!(
            stats.vendor(Vendor::Subaru),
            VendorCounts {
                readings: 1,
                empty: 2,
                raw: 0,
                not_recognized: 1,
                filtered: 0,
            }
        );
        assert_eq!(stats.vendor(Vendor::Nissan).raw, 1);
        assert_eq!(stats.vendor(Vendor::Mercedes), VendorCounts::default());
        assert_eq!(stats.unrouted(), 1);
        assert_eq!(stats.total(), 6);
    }

    #[test]
    fn test_summary() {
        let mut stats = TrafficStats::new();
        record(&mut stats, 0x150, &[0; 8]);
        stats.record_filtered(Vendor::Subaru);
        record(&mut stats, 0x001, &[]);

        assert_eq!(
            stats.to_string(),
            "3 frames; subaru: 0 readings, 0 empty, 0 raw, 0 unrecognized, 1 filtered; \
             mercedes: 1 readings, 0 empty, 0 raw, 0 unrecognized; 1 other"
        );
    }
}
