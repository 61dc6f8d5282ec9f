use gatepass_app::{MemorySink, StatusSink};

#[test]
fn memory_sink_preserves_append_order() {
    let sink = MemorySink::new();
    sink.append("first");
    sink.append("second");
    sink.append("third");
    assert_eq!(sink.lines(), vec!["first", "second", "third"]);
}

#[test]
fn contains_matches_substrings() {
    let sink = MemorySink::new();
    sink.append("Redemption failed: invalid_code");
    assert!(sink.contains("invalid_code"));
    assert!(!sink.contains("device_mismatch"));
}
