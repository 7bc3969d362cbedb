mod common;

use common::{three_record_trace, TraceBuilder};
use pretty_assertions::assert_eq;
use xentrace_decode::output::{build_export, read_export, write_dump, write_dump_file, write_export};
use xentrace_decode::stats::{compute_stats, render_stats};
use xentrace_decode::{EventClass, OutputError, SessionOptions, TraceSession, FORMAT_NAME};

fn session() -> TraceSession {
    TraceSession::from_bytes(&three_record_trace().bytes(), &SessionOptions::default()).unwrap()
}

#[test]
fn test_write_dump_to_buffer() {
    let mut buf = Vec::new();
    let lines = write_dump(&session(), None, &mut buf).unwrap();
    let text = String::from_utf8(buf).unwrap();

    assert_eq!(lines, 2);
    assert_eq!(text.lines().count(), 2);
    assert!(text.starts_with("0.000000 - idle/v2 - domain_wake"));
}

#[test]
fn test_write_dump_limit() {
    let mut buf = Vec::new();
    assert_eq!(write_dump(&session(), Some(1), &mut buf).unwrap(), 1);
    assert_eq!(write_dump(&session(), Some(10), Vec::new()).unwrap(), 2);
}

#[test]
fn test_dump_file_creates_parent_dirs() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("nested").join("dump.txt");

    write_dump_file(&session(), None, &path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("VMEXIT"));
}

#[test]
fn test_dump_file_rejects_directory() {
    let temp_dir = tempfile::tempdir().unwrap();
    let result = write_dump_file(&session(), None, temp_dir.path());
    assert!(matches!(result, Err(OutputError::InvalidPath(_))));
}

#[test]
fn test_export_round_trip() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("trace.json");

    let export = build_export(&session());
    write_export(&export, &path).unwrap();
    let loaded = read_export(&path).unwrap();

    assert_eq!(loaded, export);
    assert_eq!(loaded.format, FORMAT_NAME);
    assert_eq!(loaded.record_count, 2);
    assert_eq!(loaded.records[0].event_id, "0x00028004");
    assert_eq!(loaded.records[1].name, "VMEXIT");
    assert_eq!(loaded.records[1].ts_ns, 10_240);
}

#[test]
#[cfg(target_os = "linux")]
fn test_export_reports_write_failure() {
    let export = build_export(&session());
    let result = write_export(&export, "/dev/full");
    assert!(matches!(result, Err(OutputError::WriteFailed(_))));
}

#[test]
fn test_export_omits_info_for_unknown_events() {
    let builder = TraceBuilder::new().cpu(0).event(0x0003_0001, 1, &[]);
    let session = TraceSession::from_bytes(&builder.bytes(), &SessionOptions::default()).unwrap();

    let export = build_export(&session);
    assert_eq!(export.records[0].info, None);
    let json = serde_json::to_string(&export).unwrap();
    assert!(!json.contains("\"info\""));
}

#[test]
fn test_stats() {
    let builder = TraceBuilder::new()
        .cpu(0)
        .event(0x0008_1001, 0, &[])
        .event(0x0008_1002, 2_457, &[1, 2])
        .cpu(1)
        .event(0x0008_1001, 4_914, &[])
        .event(0x0003_0001, 4_914, &[]);
    let session = TraceSession::from_bytes(&builder.bytes(), &SessionOptions::default()).unwrap();

    let stats = compute_stats(&session, 2);
    assert_eq!(stats.record_count, 4);
    assert_eq!(stats.cpu_count, 2);
    assert_eq!(stats.by_class.get(&EventClass::Hvm), Some(&3));
    assert_eq!(stats.by_class.get(&EventClass::Unknown), Some(&1));
    assert_eq!(stats.by_cpu.get(&1), Some(&2));
    assert_eq!(stats.unknown_events, 1);
    assert_eq!(stats.span_ns, 2048);
    assert_eq!(stats.top_events.len(), 2);
    assert_eq!(stats.top_events[0].name, "VMENTRY");
    assert_eq!(stats.top_events[0].count, 2);

    let report = render_stats(&stats);
    assert!(report.contains("VMENTRY"));
    assert!(report.contains("hvm"));
}
