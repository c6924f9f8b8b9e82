//! Reading sinks: text and JSON-lines rendering of decode outcomes

use std::io::{self, Write};

use serde::Serialize;
use yaw_decode::{DecodeOutcome, FieldRole, Frame, Quantity, Vendor};

/// Consumes decoded frames
pub trait ReadingSink {
    fn emit(&mut self, frame: &Frame, outcome: &DecodeOutcome) -> io::Result<()>;

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Console label for a quantity
fn label(quantity: Quantity) -> &'static str {
    match quantity {
        Quantity::YawRate => "Yaw rate",
        Quantity::LateralAccel => "Y Acc",
        Quantity::LongitudinalAccel => "X Acc",
        Quantity::YawAccel => "Yaw acc",
    }
}

/// Console ordering: accelerations ahead of the yaw terms
const TEXT_ORDER: [Quantity; 4] = [
    Quantity::LateralAccel,
    Quantity::LongitudinalAccel,
    Quantity::YawRate,
    Quantity::YawAccel,
];

/// Human readable output, five decimal places per physical value:
///
/// ```text
/// 0x070 subaru_inertial: Y Acc:  0.50000 g, Yaw rate:  5.00000 degree/s, Yaw acc:   25.00000 degree/s/s
/// 0x140 nissan_diagnostic: RAW:     0,   256, -32767
/// ```
///
/// Empty readings and unrecognized frames print nothing unless hex dumping
/// is enabled, in which case every frame is dumped first.
pub struct TextSink<W> {
    out: W,
    hex_dump: bool,
}

impl<W: Write> TextSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            hex_dump: false,
        }
    }

    pub fn hex_dump(mut self, enabled: bool) -> Self {
        self.hex_dump = enabled;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn dump(&mut self, frame: &Frame, outcome: &DecodeOutcome) -> io::Result<()> {
        write!(self.out, "{frame}")?;
        if let Some(message) = outcome.message() {
            let counter = message
                .fields()
                .iter()
                .find(|f| f.role == FieldRole::Counter);
            if let Some(counter) = counter {
                write!(self.out, "  cnt={}", counter.read(frame.payload()))?;
            }
        }
        writeln!(self.out)
    }
}

impl<W: Write> ReadingSink for TextSink<W> {
    fn emit(&mut self, frame: &Frame, outcome: &DecodeOutcome) -> io::Result<()> {
        if self.hex_dump {
            self.dump(frame, outcome)?;
        }

        match outcome {
            DecodeOutcome::Reading(reading) if !reading.is_empty() => {
                let values: Vec<String> = TEXT_ORDER
                    .into_iter()
                    .filter_map(|q| reading.get(q).map(|v| (q, v)))
                    .map(|(q, v)| match q {
                        Quantity::YawAccel => format!("{}: {v:10.5} {}", label(q), q.unit()),
                        _ => format!("{}: {v:8.5} {}", label(q), q.unit()),
                    })
                    .collect();
                writeln!(
                    self.out,
                    "0x{:03X} {}: {}",
                    frame.id(),
                    reading.message,
                    values.join(", ")
                )
            }
            DecodeOutcome::Raw(raw) => {
                let counts: Vec<String> = raw
                    .counts
                    .iter()
                    .map(|c| format!("{:5}", c.count))
                    .collect();
                writeln!(
                    self.out,
                    "0x{:03X} {}: RAW: {}",
                    frame.id(),
                    raw.message,
                    counts.join(", ")
                )
            }
            DecodeOutcome::UnsupportedLayout { id, dlc } => {
                writeln!(self.out, "0x{id:03X} [{dlc}]: unsupported layout")
            }
            DecodeOutcome::Reading(_) | DecodeOutcome::NotRecognized => Ok(()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

#[derive(Serialize)]
struct JsonRecord<'a> {
    /// Absent when the outcome already carries the identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dlc: Option<u8>,
    vendor: Option<Vendor>,
    #[serde(flatten)]
    outcome: &'a DecodeOutcome,
}

/// One JSON object per frame that matched a vendor identifier
pub struct JsonSink<W> {
    out: W,
}

impl<W: Write> JsonSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ReadingSink for JsonSink<W> {
    fn emit(&mut self, frame: &Frame, outcome: &DecodeOutcome) -> io::Result<()> {
        let (id, dlc) = match outcome {
            DecodeOutcome::NotRecognized => return Ok(()),
            DecodeOutcome::UnsupportedLayout { .. } => (None, None),
            _ => (Some(frame.id()), Some(frame.dlc())),
        };
        let record = JsonRecord {
            id,
            dlc,
            vendor: outcome
                .message()
                .map(|m| m.vendor())
                .or_else(|| Vendor::for_identifier(frame.id())),
            outcome,
        };
        serde_json::to_writer(&mut self.out, &record)?;
        writeln!(self.out)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}
