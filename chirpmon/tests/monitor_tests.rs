use std::{
    io::{Cursor, Read},
    sync::atomic::Ordering,
    thread,
};

use approx::assert_relative_eq;
use chirpmon::{LogDisplay, MonitorConfig, MonitorError, MonitorPipeline, SimulatedSource};
use chirpmon_core::{temperature_banner, DisplayState, FrameBuilder, SharedDisplay};
use chirpmon_types::{ChirpError, Header, SlotIndex, FRAME_SIZE, MARKER};

const WIRE_FRAME: u64 = (MARKER.len() + FRAME_SIZE) as u64;

#[test]
fn test_simulated_stream_fills_every_slot() {
    let (pipeline, metrics) = MonitorPipeline::new(&MonitorConfig::default());
    let state = DisplayState::new();
    let (sink, redraw_rx) = SharedDisplay::new(state.clone());

    let renderer = thread::spawn(move || redraw_rx.iter().count());

    let source = SimulatedSource::unpaced().take(12 * WIRE_FRAME);
    let err = pipeline.run(source, &sink).unwrap_err();
    drop(sink);

    assert!(matches!(err, MonitorError::Stream(ChirpError::StreamClosed)));
    assert_eq!(renderer.join().unwrap(), 12);
    assert_eq!(metrics.renders.load(Ordering::Relaxed), 12);

    let s = state.read();
    for slot in SlotIndex::all() {
        assert!(!s.slot(slot).label.is_empty(), "slot {slot} never updated");
    }

    // Последний кадр (n = 11) имел primary 5 и занял слоты 12..14
    assert_eq!(s.slots[12].label, "ASIC 1 FROM 6");
    assert!(s.slots[12].summary.starts_with("Seq #: 12\n"));
    assert_eq!(
        s.banner,
        temperature_banner(SimulatedSource::header_for(11).temperature)
    );
}

#[test]
fn test_noisy_stream_resyncs_without_drops() {
    let (pipeline, metrics) = MonitorPipeline::new(&MonitorConfig::default());
    let sink = LogDisplay::new();

    let mut sim = SimulatedSource::unpaced();
    sim.noise_every = 3;
    // Мусор перед кадрами 2 и 5
    let total = 6 * WIRE_FRAME + 2 * chirpmon::SIM_NOISE.len() as u64;

    let _ = pipeline.run(sim.take(total), &sink);

    assert_eq!(metrics.frames_decoded.load(Ordering::Relaxed), 6);
    assert_eq!(metrics.frames_dropped.load(Ordering::Relaxed), 0);
    assert_eq!(
        metrics.bytes_skipped.load(Ordering::Relaxed),
        2 * chirpmon::SIM_NOISE.len() as u64
    );
}

#[test]
fn test_corrupt_primary_then_recovery() {
    let mut bytes = FrameBuilder::new(Header::new(0)).to_bytes();
    bytes.extend(FrameBuilder::new(Header::new(200)).to_bytes());

    let mut last = Header::new(4);
    last.temperature = Some(23.46);
    let mut builder = FrameBuilder::new(last);
    builder = builder.block(2, &[(100, 0); 16]).unwrap();
    bytes.extend(builder.to_bytes());

    let (pipeline, metrics) = MonitorPipeline::new(&MonitorConfig::default());
    let state = DisplayState::new();
    let (sink, redraw_rx) = SharedDisplay::new(state.clone());
    let renderer = thread::spawn(move || redraw_rx.iter().count());

    let _ = pipeline.run(Cursor::new(bytes), &sink);
    drop(sink);

    assert_eq!(renderer.join().unwrap(), 2);
    assert_eq!(metrics.frames_dropped.load(Ordering::Relaxed), 1);

    let s = state.read();
    assert_eq!(s.banner, "External Temp Sensor: 23.46 C");
    assert_eq!(s.slots[8].label, "ASIC 3 FROM 5");
    assert!(s.slots[8].summary.starts_with("Seq #: 3\n"));
    assert_relative_eq!(s.slots[8].series[0], 100.0);
    assert_eq!(s.slots[4].label, "ASIC 5 FROM 1");
}

#[test]
fn test_truncated_frame_is_fatal() {
    let mut bytes = FrameBuilder::new(Header::new(1)).to_bytes();
    let mut second = FrameBuilder::new(Header::new(2)).to_bytes();
    second.truncate(MARKER.len() + 100);
    bytes.extend(second);

    let (pipeline, metrics) = MonitorPipeline::new(&MonitorConfig::default());
    let sink = LogDisplay::new();

    let err = pipeline.run(Cursor::new(bytes), &sink).unwrap_err();
    assert!(matches!(
        err,
        MonitorError::Stream(ChirpError::ShortFrame { got: 100, .. })
    ));
    assert_eq!(metrics.frames_decoded.load(Ordering::Relaxed), 1);
}
