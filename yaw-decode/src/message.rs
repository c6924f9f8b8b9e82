//! Recognized message layouts
//!
//! Every (vendor, identifier, length) triple the decoders understand is a
//! [`Message`] variant. Its [`FieldSpec`] list records what is known about
//! each byte, including the counter and checksum bytes that are observed but
//! never verified.

use serde::Serialize;
use strum::{Display, EnumIter};

use crate::field::get_u16;
use crate::profile::Vendor;
use crate::reading::Quantity;

/// CAN identifiers used by the supported sensors
pub mod can_id {
    pub const SUBARU_INERTIAL: u16 = 0x070;
    /// Sent by the host, not the sensor
    pub const SUBARU_KEEP_ALIVE: u16 = 0x075;
    pub const SUBARU_CALIBRATION: u16 = 0x576;
    pub const NISSAN_INERTIAL: u16 = 0x130;
    pub const NISSAN_DIAGNOSTIC: u16 = 0x140;
    pub const MERCEDES_LATERAL: u16 = 0x150;
    pub const MERCEDES_LONGITUDINAL: u16 = 0x151;
    pub const MERCEDES_STATUS: u16 = 0x156;
}

/// Storage width of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldWidth {
    /// 16 bits, low byte first
    Word,
    Byte,
    /// Bits 3..0 of one byte
    LowNibble,
}

/// What a field is known to carry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRole {
    /// Physical quantity, scaled by the vendor profile
    Quantity(Quantity),
    /// Varies with motion but has no unit mapping yet
    Raw,
    /// Rolling counter, not checked
    Counter,
    /// Suspected checksum, not verified
    Checksum,
    /// Observed constant
    Reserved,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub offset: usize,
    pub width: FieldWidth,
    pub role: FieldRole,
}

impl FieldSpec {
    const fn word(name: &'static str, offset: usize, role: FieldRole) -> Self {
        Self {
            name,
            offset,
            width: FieldWidth::Word,
            role,
        }
    }

    const fn quantity(name: &'static str, offset: usize, quantity: Quantity) -> Self {
        Self::word(name, offset, FieldRole::Quantity(quantity))
    }

    /// Last payload byte this field touches
    pub fn last_byte(&self) -> usize {
        match self.width {
            FieldWidth::Word => self.offset + 1,
            FieldWidth::Byte | FieldWidth::LowNibble => self.offset,
        }
    }

    /// Undecoded field value. `payload` must cover [`Self::last_byte`].
    pub fn read(&self, payload: &[u8]) -> u16 {
        match self.width {
            FieldWidth::Word => get_u16(payload, self.offset),
            FieldWidth::Byte => payload[self.offset] as u16,
            FieldWidth::LowNibble => (payload[self.offset] & 0x0F) as u16,
        }
    }
}

const COUNTER: FieldSpec = FieldSpec {
    name: "counter",
    offset: 6,
    width: FieldWidth::LowNibble,
    role: FieldRole::Counter,
};

const CHECKSUM: FieldSpec = FieldSpec {
    name: "checksum",
    offset: 7,
    width: FieldWidth::Byte,
    role: FieldRole::Checksum,
};

/// Where a message appears on the bus and what its bytes carry
struct Layout {
    vendor: Vendor,
    id: u16,
    dlc: u8,
    fields: &'static [FieldSpec],
}

const SUBARU_INERTIAL: Layout = Layout {
    vendor: Vendor::Subaru,
    id: can_id::SUBARU_INERTIAL,
    dlc: 8,
    fields: &[
        FieldSpec::word("zero", 0, FieldRole::Reserved),
        FieldSpec::quantity("yaw_rate", 2, Quantity::YawRate),
        FieldSpec::quantity("lateral_accel", 4, Quantity::LateralAccel),
        FieldSpec::quantity("yaw_accel", 6, Quantity::YawAccel),
    ],
};

// 27542AG011 answers a 075#2000 request with A8 FF 81 00 A2 94.
// 27542AG012 floods the bus with the same bytes.
const SUBARU_STATUS: Layout = Layout {
    vendor: Vendor::Subaru,
    id: can_id::SUBARU_INERTIAL,
    dlc: 6,
    fields: &[
        FieldSpec::word("status_0", 0, FieldRole::Reserved),
        FieldSpec::word("status_1", 2, FieldRole::Reserved),
        FieldSpec::word("status_2", 4, FieldRole::Reserved),
    ],
};

// Sent with every 10th inertial frame.
const SUBARU_CALIBRATION: Layout = Layout {
    vendor: Vendor::Subaru,
    id: can_id::SUBARU_CALIBRATION,
    dlc: 8,
    fields: &[
        FieldSpec::word("cal_0", 0, FieldRole::Unknown),
        FieldSpec::word("cal_1", 2, FieldRole::Unknown),
        FieldSpec::word("cal_2", 4, FieldRole::Unknown),
        FieldSpec::word("cal_3", 6, FieldRole::Unknown),
    ],
};

const NISSAN_INERTIAL: Layout = Layout {
    vendor: Vendor::Nissan,
    id: can_id::NISSAN_INERTIAL,
    dlc: 8,
    fields: &[
        FieldSpec::quantity("yaw_rate", 0, Quantity::YawRate),
        FieldSpec::word("unknown", 2, FieldRole::Unknown),
        FieldSpec::quantity("lateral_accel", 4, Quantity::LateralAccel),
        COUNTER,
        CHECKSUM,
    ],
};

const NISSAN_DIAGNOSTIC: Layout = Layout {
    vendor: Vendor::Nissan,
    id: can_id::NISSAN_DIAGNOSTIC,
    dlc: 8,
    fields: &[
        FieldSpec::word("raw_0", 0, FieldRole::Raw),
        FieldSpec::word("raw_1", 2, FieldRole::Raw),
        FieldSpec::word("raw_2", 4, FieldRole::Raw),
        COUNTER,
        CHECKSUM,
    ],
};

const MERCEDES_LATERAL: Layout = Layout {
    vendor: Vendor::Mercedes,
    id: can_id::MERCEDES_LATERAL,
    dlc: 8,
    fields: &[
        FieldSpec::quantity("yaw_rate", 0, Quantity::YawRate),
        // Observed 0C 9D
        FieldSpec::word("unknown", 2, FieldRole::Unknown),
        FieldSpec::quantity("lateral_accel", 4, Quantity::LateralAccel),
        COUNTER,
        CHECKSUM,
    ],
};

const MERCEDES_LONGITUDINAL: Layout = Layout {
    vendor: Vendor::Mercedes,
    id: can_id::MERCEDES_LONGITUDINAL,
    dlc: 8,
    fields: &[
        FieldSpec::quantity("yaw_rate", 0, Quantity::YawRate),
        FieldSpec::word("zero", 2, FieldRole::Reserved),
        FieldSpec::quantity("longitudinal_accel", 4, Quantity::LongitudinalAccel),
        COUNTER,
        CHECKSUM,
    ],
};

// Observed 30 00 00 00 00 00 then 2x in byte 6.
const MERCEDES_STATUS: Layout = Layout {
    vendor: Vendor::Mercedes,
    id: can_id::MERCEDES_STATUS,
    dlc: 8,
    fields: &[
        FieldSpec::word("status_0", 0, FieldRole::Reserved),
        FieldSpec::word("status_1", 2, FieldRole::Reserved),
        FieldSpec::word("status_2", 4, FieldRole::Reserved),
        COUNTER,
        CHECKSUM,
    ],
};

/// How a message is surfaced by the decoder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// At least one physical quantity
    Reading,
    /// Recognized, no physical content
    Empty,
    /// Raw counts only
    Raw,
}

/// A recognized (vendor, identifier, length) layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Message {
    /// 0x070, 8 bytes: yaw rate, lateral and yaw acceleration
    SubaruInertial,
    /// 0x070, 6 bytes: constant status reply
    SubaruStatus,
    /// 0x576, 8 bytes: unknown calibration companion
    SubaruCalibration,
    /// 0x130, 8 bytes: yaw rate and lateral acceleration
    NissanInertial,
    /// 0x140, 8 bytes: three unmapped midpoint-offset words
    NissanDiagnostic,
    /// 0x150, 8 bytes: yaw rate and lateral acceleration
    MercedesLateral,
    /// 0x151, 8 bytes: yaw rate and longitudinal acceleration
    MercedesLongitudinal,
    /// 0x156, 8 bytes: constant status
    MercedesStatus,
}

impl Message {
    /// Match a frame against one vendor's layouts.
    pub fn classify(vendor: Vendor, id: u16, dlc: u8) -> Option<Message> {
        match (vendor, id, dlc) {
            (Vendor::Subaru, can_id::SUBARU_INERTIAL, 8) => Some(Message::SubaruInertial),
            (Vendor::Subaru, can_id::SUBARU_INERTIAL, 6) => Some(Message::SubaruStatus),
            (Vendor::Subaru, can_id::SUBARU_CALIBRATION, 8) => Some(Message::SubaruCalibration),
            (Vendor::Nissan, can_id::NISSAN_INERTIAL, 8) => Some(Message::NissanInertial),
            (Vendor::Nissan, can_id::NISSAN_DIAGNOSTIC, 8) => Some(Message::NissanDiagnostic),
            (Vendor::Mercedes, can_id::MERCEDES_LATERAL, 8) => Some(Message::MercedesLateral),
            (Vendor::Mercedes, can_id::MERCEDES_LONGITUDINAL, 8) => {
                Some(Message::MercedesLongitudinal)
            }
            (Vendor::Mercedes, can_id::MERCEDES_STATUS, 8) => Some(Message::MercedesStatus),
            _ => None,
        }
    }

    fn layout(&self) -> &'static Layout {
        match self {
            Message::SubaruInertial => &SUBARU_INERTIAL,
            Message::SubaruStatus => &SUBARU_STATUS,
            Message::SubaruCalibration => &SUBARU_CALIBRATION,
            Message::NissanInertial => &NISSAN_INERTIAL,
            Message::NissanDiagnostic => &NISSAN_DIAGNOSTIC,
            Message::MercedesLateral => &MERCEDES_LATERAL,
            Message::MercedesLongitudinal => &MERCEDES_LONGITUDINAL,
            Message::MercedesStatus => &MERCEDES_STATUS,
        }
    }

    pub fn vendor(&self) -> Vendor {
        self.layout().vendor
    }

    pub fn id(&self) -> u16 {
        self.layout().id
    }

    pub fn dlc(&self) -> u8 {
        self.layout().dlc
    }

    pub fn fields(&self) -> &'static [FieldSpec] {
        self.layout().fields
    }

    pub fn kind(&self) -> MessageKind {
        let fields = self.fields();
        if fields
            .iter()
            .any(|f| matches!(f.role, FieldRole::Quantity(_)))
        {
            MessageKind::Reading
        } else if fields.iter().any(|f| f.role == FieldRole::Raw) {
            MessageKind::Raw
        } else {
            MessageKind::Empty
        }
    }

    /// Physical quantities this message populates
    pub fn quantities(&self) -> impl Iterator<Item = Quantity> {
        self.fields().iter().filter_map(|f| match f.role {
            FieldRole::Quantity(q) => Some(q),
            _ => None,
        })
    }
}
