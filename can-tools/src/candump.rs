//! Parsing of `candump` text output
//!
//! Two line formats are accepted:
//!
//! ```text
//! (1697040000.123456) can0 070#0000E8038000C800      candump -l
//!   can0  070   [8]  00 00 E8 03 80 00 C8 00         candump can0
//! ```
//!
//! Extended identifiers, remote requests and CAN FD frames are reported as
//! skipped rather than as errors, since the sensors never send them.

use yaw_decode::Frame;

/// Why a well-formed line produced no frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Extended,
    Remote,
    Fd,
}

/// One parsed line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineRecord {
    Frame(Frame),
    Skipped(SkipReason),
    Blank,
}

/// Parse a single line of candump output.
pub fn parse_line(line: &str) -> Result<LineRecord, String> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.is_empty() {
        return Ok(LineRecord::Blank);
    }

    if let Some(compact) = tokens.iter().find(|t| t.contains('#')) {
        return parse_compact(compact);
    }

    parse_console(&tokens)
}

/// `070#0000E803`, `070#R`, `070##1...`
fn parse_compact(token: &str) -> Result<LineRecord, String> {
    let Some((id, data)) = token.split_once('#') else {
        return Err(format!("missing '#' in {token}"));
    };

    if data.starts_with('#') {
        return Ok(LineRecord::Skipped(SkipReason::Fd));
    }
    if data.starts_with(['R', 'r']) {
        return Ok(LineRecord::Skipped(SkipReason::Remote));
    }
    if id.len() > 3 {
        return Ok(LineRecord::Skipped(SkipReason::Extended));
    }
    if !data.is_ascii() {
        return Err(format!("invalid data {data}"));
    }
    if data.len() % 2 != 0 {
        return Err(format!("odd number of hex digits in {data}"));
    }

    let id = parse_id(id)?;
    let payload = (0..data.len())
        .step_by(2)
        .map(|i| parse_byte(&data[i..i + 2]))
        .collect::<Result<Vec<u8>, String>>()?;

    build_frame(id, &payload)
}

/// `can0  070   [8]  00 00 E8 03 80 00 C8 00`
fn parse_console(tokens: &[&str]) -> Result<LineRecord, String> {
    let Some(dlc_pos) = tokens
        .iter()
        .position(|t| t.starts_with('[') && t.ends_with(']'))
    else {
        return Err("no frame found".to_string());
    };
    if dlc_pos == 0 {
        return Err("missing identifier".to_string());
    }

    let id = tokens[dlc_pos - 1];
    let dlc_text = &tokens[dlc_pos][1..tokens[dlc_pos].len() - 1];
    let data = &tokens[dlc_pos + 1..];

    if data.first().is_some_and(|t| t.eq_ignore_ascii_case("remote")) {
        return Ok(LineRecord::Skipped(SkipReason::Remote));
    }
    if id.len() > 3 {
        return Ok(LineRecord::Skipped(SkipReason::Extended));
    }

    // candump prints FD lengths with two digits, `[08]`, classic ones with one
    if dlc_text.len() > 1 {
        return Ok(LineRecord::Skipped(SkipReason::Fd));
    }
    let dlc: usize = dlc_text
        .parse()
        .map_err(|_| format!("invalid length [{dlc_text}]"))?;
    if dlc > 8 {
        return Err(format!("invalid length [{dlc_text}]"));
    }
    if data.len() < dlc {
        return Err(format!("expected {dlc} data bytes, found {}", data.len()));
    }

    let id = parse_id(id)?;
    let payload = data[..dlc]
        .iter()
        .map(|t| parse_byte(t))
        .collect::<Result<Vec<u8>, String>>()?;

    build_frame(id, &payload)
}

fn parse_id(text: &str) -> Result<u32, String> {
    u32::from_str_radix(text, 16).map_err(|_| format!("invalid identifier {text}"))
}

fn parse_byte(text: &str) -> Result<u8, String> {
    if text.len() != 2 {
        return Err(format!("invalid data byte {text}"));
    }
    u8::from_str_radix(text, 16).map_err(|_| format!("invalid data byte {text}"))
}

fn build_frame(id: u32, payload: &[u8]) -> Result<LineRecord, String> {
    Frame::new(id, payload)
        .map(LineRecord::Frame)
        .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(line: &str) -> Frame {
        match parse_line(line).unwrap() {
            LineRecord::Frame(frame) => frame,
            other => panic!("Expected a frame from {line:?}, got {other:?}"),
        }
    }

    #[test]
    fn test_log_format() {
        let f = frame("(1697040000.123456) can0 070#0000E8038000C800");
        assert_eq!(f.id(), 0x070);
        assert_eq!(f.payload(), &[0x00, 0x00, 0xE8, 0x03, 0x80, 0x00, 0xC8, 0x00]);
    }

    #[test]
    fn test_log_format_lowercase_and_short() {
        let f = frame("(0.000000) vcan0 075#0000");
        assert_eq!(f.id(), 0x075);
        assert_eq!(f.payload(), &[0x00, 0x00]);

        let f = frame("(0.000000) can0 070#a8ff8100a294");
        assert_eq!(f.payload(), &[0xA8, 0xFF, 0x81, 0x00, 0xA2, 0x94]);

        let f = frame("(0.000000) can0 156#");
        assert_eq!(f.dlc(), 0);
    }

    #[test]
    fn test_console_format() {
        let f = frame("  can0  130   [8]  00 7F 00 00 00 81 03 5A");
        assert_eq!(f.id(), 0x130);
        assert_eq!(f.dlc(), 8);
        assert_eq!(f.payload()[1], 0x7F);

        let f = frame(" (1697040000.123456)  can0  070   [6]  A8 FF 81 00 A2 94");
        assert_eq!(f.id(), 0x070);
        assert_eq!(f.dlc(), 6);
    }

    #[test]
    fn test_skipped_frames() {
        assert_eq!(
            parse_line("(0.0) can0 12345678#00").unwrap(),
            LineRecord::Skipped(SkipReason::Extended)
        );
        assert_eq!(
            parse_line("(0.0) can0 070#R").unwrap(),
            LineRecord::Skipped(SkipReason::Remote)
        );
        assert_eq!(
            parse_line("(0.0) can0 070##1112233").unwrap(),
            LineRecord::Skipped(SkipReason::Fd)
        );
        assert_eq!(
            parse_line("  can0  070   [8]  remote request").unwrap(),
            LineRecord::Skipped(SkipReason::Remote)
        );
        assert_eq!(
            parse_line("  can0  18FEF100   [8]  00 00 00 00 00 00 00 00").unwrap(),
            LineRecord::Skipped(SkipReason::Extended)
        );
        assert_eq!(
            parse_line("  can0  130  [08]  00 7F 00 00 00 81 03 5A").unwrap(),
            LineRecord::Skipped(SkipReason::Fd)
        );
        assert_eq!(
            parse_line("  can0  130  [12]  00 7F 00 00 00 81 03 5A 00 00 00 00").unwrap(),
            LineRecord::Skipped(SkipReason::Fd)
        );
        assert_eq!(parse_line("   ").unwrap(), LineRecord::Blank);
    }

    #[test]
    fn test_malformed_lines() {
        assert!(parse_line("(0.0) can0 070#0").is_err());
        assert!(parse_line("(0.0) can0 0G0#00").is_err());
        assert!(parse_line("(0.0) can0 070#ZZ").is_err());
        assert!(parse_line("(0.0) can0 070#000102030405060708").is_err());
        assert!(parse_line("  can0  070   [8]  00 00").is_err());
        assert!(parse_line("  can0  070   [9]  00 00 00 00 00 00 00 00 00").is_err());
        assert!(parse_line("hello world").is_err());
    }
}
