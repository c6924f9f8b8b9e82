//! Decoded physical readings and decode outcomes

use serde::Serialize;
use strum::{Display, EnumIter, IntoEnumIterator};

use crate::message::Message;

/// Physical quantities reported by the yaw sensors
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Display,
    EnumIter,
)]
pub enum Quantity {
    #[strum(serialize = "yaw_rate_deg_s")]
    #[serde(rename = "yaw_rate_deg_s")]
    YawRate,
    #[strum(serialize = "lateral_accel_g")]
    #[serde(rename = "lateral_accel_g")]
    LateralAccel,
    #[strum(serialize = "longitudinal_accel_g")]
    #[serde(rename = "longitudinal_accel_g")]
    LongitudinalAccel,
    #[strum(serialize = "yaw_accel_deg_s2")]
    #[serde(rename = "yaw_accel_deg_s2")]
    YawAccel,
}

impl Quantity {
    /// Unit label as the sensor datasheets write it
    pub fn unit(&self) -> &'static str {
        match self {
            Quantity::YawRate => "degree/s",
            Quantity::LateralAccel | Quantity::LongitudinalAccel => "g",
            Quantity::YawAccel => "degree/s/s",
        }
    }
}

/// Physical values decoded from one frame.
///
/// Only the quantities carried by the matched message are populated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DecodedReading {
    pub message: Message,
    #[serde(skip_serializing_if = "Option::is_none")]
    yaw_rate_deg_s: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    lateral_accel_g: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    longitudinal_accel_g: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    yaw_accel_deg_s2: Option<f64>,
}

impl DecodedReading {
    /// A reading with nothing populated
    pub fn empty(message: Message) -> Self {
        Self {
            message,
            yaw_rate_deg_s: None,
            lateral_accel_g: None,
            longitudinal_accel_g: None,
            yaw_accel_deg_s2: None,
        }
    }

    pub fn get(&self, quantity: Quantity) -> Option<f64> {
        match quantity {
            Quantity::YawRate => self.yaw_rate_deg_s,
            Quantity::LateralAccel => self.lateral_accel_g,
            Quantity::LongitudinalAccel => self.longitudinal_accel_g,
            Quantity::YawAccel => self.yaw_accel_deg_s2,
        }
    }

    pub(crate) fn set(&mut self, quantity: Quantity, value: f64) {
        let slot = match quantity {
            Quantity::YawRate => &mut self.yaw_rate_deg_s,
            Quantity::LateralAccel => &mut self.lateral_accel_g,
            Quantity::LongitudinalAccel => &mut self.longitudinal_accel_g,
            Quantity::YawAccel => &mut self.yaw_accel_deg_s2,
        };
        *slot = Some(value);
    }

    /// Populated quantities in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (Quantity, f64)> + '_ {
        Quantity::iter().filter_map(|q| self.get(q).map(|v| (q, v)))
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One midpoint-centred count from a field with no physical mapping yet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RawCount {
    pub field: &'static str,
    pub offset: usize,
    pub count: i32,
}

/// Diagnostic output for messages that are recognized but not reverse
/// engineered far enough to assign physical units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawCounts {
    pub message: Message,
    pub counts: Vec<RawCount>,
}

/// Result of running a frame through a vendor decoder.
///
/// None of these are errors: most bus traffic is expected to be
/// [`DecodeOutcome::NotRecognized`] by any single vendor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DecodeOutcome {
    /// Decoded physical values, possibly none for status messages
    Reading(DecodedReading),
    /// Recognized, but only raw counts are available
    Raw(RawCounts),
    /// Identifier or length outside the vendor's known set
    NotRecognized,
    /// Recognized identifier whose length matches several or no layout.
    /// Reserved: the current layouts never produce it.
    UnsupportedLayout { id: u16, dlc: u8 },
}

impl DecodeOutcome {
    /// Message the frame was matched to, if any
    pub fn message(&self) -> Option<Message> {
        match self {
            DecodeOutcome::Reading(reading) => Some(reading.message),
            DecodeOutcome::Raw(raw) => Some(raw.message),
            DecodeOutcome::NotRecognized | DecodeOutcome::UnsupportedLayout { .. } => None,
        }
    }

    pub fn is_recognized(&self) -> bool {
        self.message().is_some()
    }

    pub fn reading(&self) -> Option<&DecodedReading> {
        match self {
            DecodeOutcome::Reading(reading) => Some(reading),
            _ => None,
        }
    }
}
