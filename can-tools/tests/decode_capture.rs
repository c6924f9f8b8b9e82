//! End-to-end decoding of a recorded capture containing all three sensor families

use std::fs::File;
use std::io::BufReader;

use approx::assert_relative_eq;
use can_tools::{run, CandumpReader, Dispatcher, TextSink, VendorCounts};
use yaw_decode::{Message, Quantity, Vendor};

const CAPTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/mixed_bus.log");

fn open_capture() -> CandumpReader<BufReader<File>> {
    CandumpReader::new(BufReader::new(File::open(CAPTURE).unwrap()))
}

#[test]
fn test_capture_traffic_counts() {
    let mut source = open_capture();
    let mut dispatcher = Dispatcher::new();
    let mut sink = TextSink::new(Vec::new());

    run(&mut source, &mut dispatcher, &mut sink).unwrap();

    let stats = dispatcher.stats();
    assert_eq!(stats.total(), 11);
    assert_eq!(stats.unrouted(), 2);
    assert_eq!(source.skipped(), 1);

    assert_eq!(
        stats.vendor(Vendor::Subaru),
        VendorCounts {
            readings: 1,
            empty: 2,
            ..Default::default()
        }
    );
    assert_eq!(
        stats.vendor(Vendor::Nissan),
        VendorCounts {
            readings: 1,
            raw: 1,
            not_recognized: 1,
            ..Default::default()
        }
    );
    assert_eq!(
        stats.vendor(Vendor::Mercedes),
        VendorCounts {
            readings: 2,
            empty: 1,
            ..Default::default()
        }
    );
}

#[test]
fn test_capture_text_output() {
    let mut source = open_capture();
    let mut dispatcher = Dispatcher::new();
    let mut sink = TextSink::new(Vec::new());

    run(&mut source, &mut dispatcher, &mut sink).unwrap();

    let out = String::from_utf8(sink.into_inner()).unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(
        lines,
        vec![
            "0x070 subaru_inertial: Y Acc:  0.50000 g, Yaw rate:  5.00000 degree/s, Yaw acc:   25.00000 degree/s/s",
            "0x130 nissan_inertial: Y Acc: -0.03261 g, Yaw rate:  1.28000 degree/s",
            "0x140 nissan_diagnostic: RAW:     0,   256, -32767",
            "0x150 mercedes_lateral: Y Acc: -0.01274 g, Yaw rate:  5.00000 degree/s",
            "0x151 mercedes_longitudinal: X Acc:  0.00127 g, Yaw rate:  0.00000 degree/s",
        ]
    );
}

#[test]
fn test_vendor_filter_on_capture() {
    let mut source = open_capture();
    let mut dispatcher = Dispatcher::with_filter(Some(Vendor::Mercedes));
    let mut sink = TextSink::new(Vec::new());

    run(&mut source, &mut dispatcher, &mut sink).unwrap();

    let out = String::from_utf8(sink.into_inner()).unwrap();
    assert_eq!(out.lines().count(), 2);
    assert!(out.lines().all(|l| l.contains("mercedes")));
    assert_eq!(dispatcher.stats().vendor(Vendor::Subaru).filtered, 3);
    assert_eq!(dispatcher.stats().vendor(Vendor::Nissan).filtered, 3);
}

#[test]
fn test_capture_values() {
    let mut source = open_capture();
    let mut dispatcher = Dispatcher::new();
    let mut readings = Vec::new();

    while let Some(frame) = can_tools::FrameSource::next_frame(&mut source).unwrap() {
        if let Some(reading) = dispatcher.process(&frame).reading() {
            if !reading.is_empty() {
                readings.push(*reading);
            }
        }
    }

    assert_eq!(readings.len(), 4);
    let nissan = readings
        .iter()
        .find(|r| r.message == Message::NissanInertial)
        .unwrap();
    assert_relative_eq!(nissan.get(Quantity::YawRate).unwrap(), 1.28, epsilon = 1e-9);
    assert_relative_eq!(
        nissan.get(Quantity::LateralAccel).unwrap(),
        -256.0 * 0.0001274,
        epsilon = 1e-12
    );
}
