//! Sensor families, their scale factors and the identifier routing table

use std::time::Duration;

use serde::Serialize;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use crate::field::{Encoding, MIDPOINT};
use crate::frame::{Frame, FrameError};
use crate::message::{can_id, Message};
use crate::reading::Quantity;

/// Yaw sensor part-number family
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumIter, EnumString,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Vendor {
    /// Subaru 27542AG011 / 27542AG012 (Bosch 0 265 005 627 / 0 265 005 716)
    Subaru,
    /// Infiniti/Nissan 47931JK00A (Bosch 0 265 005 693)
    Nissan,
    /// Mercedes A 006 542 26 18
    Mercedes,
}

impl Vendor {
    pub fn profile(&self) -> &'static VendorProfile {
        match self {
            Vendor::Subaru => &SUBARU,
            Vendor::Nissan => &NISSAN,
            Vendor::Mercedes => &MERCEDES,
        }
    }

    /// Identifiers this family transmits
    pub fn identifiers(&self) -> &'static [u16] {
        self.profile().identifiers
    }

    /// Route an identifier to the family that owns it.
    pub fn for_identifier(id: u16) -> Option<Vendor> {
        Vendor::iter().find(|vendor| vendor.identifiers().contains(&id))
    }

    /// Every (identifier, length) layout this family defines
    pub fn messages(&self) -> impl Iterator<Item = Message> + '_ {
        Message::iter().filter(move |message| message.vendor() == *self)
    }
}

/// A frame a sensor must receive periodically before it starts streaming
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeepAlive {
    pub id: u16,
    pub payload: &'static [u8],
    pub period: Duration,
}

impl KeepAlive {
    pub fn frame(&self) -> Result<Frame, FrameError> {
        Frame::new(self.id as u32, self.payload)
    }
}

/// Static description of one sensor family
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VendorProfile {
    /// Part numbers printed on the sensor label
    pub part_numbers: &'static [&'static str],
    pub identifiers: &'static [u16],
    /// How signed counts are packed into 16-bit words
    pub encoding: Encoding,
    /// degree/s per count
    pub yaw_rate_scale: f64,
    /// g per count
    pub accel_scale: f64,
    /// degree/s/s per count
    pub yaw_accel_scale: Option<f64>,
    pub keep_alive: Option<KeepAlive>,
}

impl VendorProfile {
    /// Scale factor converting a count of `quantity` to its physical unit
    pub fn scale(&self, quantity: Quantity) -> Option<f64> {
        match quantity {
            Quantity::YawRate => Some(self.yaw_rate_scale),
            Quantity::LateralAccel | Quantity::LongitudinalAccel => Some(self.accel_scale),
            Quantity::YawAccel => self.yaw_accel_scale,
        }
    }
}

/// Bosch datasheet yaw-rate resolution, shared by all three families
pub const BOSCH_YAW_RATE_SCALE: f64 = 0.005;

/// Bosch datasheet yaw-acceleration resolution
pub const BOSCH_YAW_ACCEL_SCALE: f64 = 0.125;

/// Acceleration resolution of the midpoint-offset sensors
pub const BOSCH_ACCEL_SCALE: f64 = 0.0001274;

/// Acceleration resolution of the Subaru sensor
pub const SUBARU_ACCEL_SCALE: f64 = 1.0 / 256.0;

/// The Subaru sensor stays silent until fed `075#0000` at about 15 Hz.
pub const SUBARU_KEEP_ALIVE: KeepAlive = KeepAlive {
    id: can_id::SUBARU_KEEP_ALIVE,
    payload: &[0x00, 0x00],
    period: Duration::from_millis(67),
};

pub const SUBARU: VendorProfile = VendorProfile {
    part_numbers: &["27542AG011", "27542AG012"],
    identifiers: &[can_id::SUBARU_INERTIAL, can_id::SUBARU_CALIBRATION],
    encoding: Encoding::TwosComplement,
    yaw_rate_scale: BOSCH_YAW_RATE_SCALE,
    accel_scale: SUBARU_ACCEL_SCALE,
    yaw_accel_scale: Some(BOSCH_YAW_ACCEL_SCALE),
    keep_alive: Some(SUBARU_KEEP_ALIVE),
};

/// Streams at 50 Hz after power on
pub const NISSAN: VendorProfile = VendorProfile {
    part_numbers: &["47931JK00A"],
    identifiers: &[can_id::NISSAN_INERTIAL, can_id::NISSAN_DIAGNOSTIC],
    encoding: Encoding::MidpointOffset { midpoint: MIDPOINT },
    yaw_rate_scale: BOSCH_YAW_RATE_SCALE,
    accel_scale: BOSCH_ACCEL_SCALE,
    yaw_accel_scale: Some(BOSCH_YAW_ACCEL_SCALE),
    keep_alive: None,
};

/// Streams at 50 Hz after power on
pub const MERCEDES: VendorProfile = VendorProfile {
    part_numbers: &["A 006 542 26 18"],
    identifiers: &[
        can_id::MERCEDES_LATERAL,
        can_id::MERCEDES_LONGITUDINAL,
        can_id::MERCEDES_STATUS,
    ],
    encoding: Encoding::MidpointOffset { midpoint: MIDPOINT },
    yaw_rate_scale: BOSCH_YAW_RATE_SCALE,
    accel_scale: BOSCH_ACCEL_SCALE,
    yaw_accel_scale: None,
    keep_alive: None,
};
