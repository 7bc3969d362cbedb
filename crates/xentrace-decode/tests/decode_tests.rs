mod common;

use common::{three_record_trace, TraceBuilder};
use pretty_assertions::assert_eq;
use xentrace_decode::events::{catalogue, event_info, event_name, lookup, name_or_unknown};
use xentrace_decode::events::ids::TRC_64_FLAG;
use xentrace_decode::{
    ClockConfig, EventClass, EventInfo, ParseError, SessionOptions, TraceSession, WireFormat,
};

fn open(builder: &TraceBuilder) -> TraceSession {
    TraceSession::from_bytes(&builder.bytes(), &SessionOptions::default()).unwrap()
}

#[test]
fn test_three_record_round_trip() {
    let session = open(&three_record_trace());

    // The CPU change record produces no row
    assert_eq!(session.len(), 2);

    let wake = session.record(0).unwrap();
    assert_eq!(wake.cpu, 2);
    assert_eq!(session.get_event_name(0).as_deref(), Some("domain_wake"));
    let info = session.get_info(0).unwrap();
    assert!(info.contains("dom:vcpu = 0x00050001"), "{}", info);

    assert_eq!(session.record(1).unwrap().cpu, 2);
    assert_eq!(session.get_event_name(1), Some(name_or_unknown(0x0008_1002)));
    assert_eq!(
        session.get_info(1).as_deref(),
        Some("exitcode = 0x0000001e, rIP  = 0xffffffff80001234")
    );
    assert_eq!(session.cpu_count(), 1);
}

#[test]
fn test_dump_first_record_is_zero() {
    let session = open(&three_record_trace());
    assert_eq!(
        session.dump_entry(0),
        "0.000000 - idle/v2 - domain_wake [ dom:vcpu = 0x00050001 ]"
    );
    // 24570 cycles at 2.4 GHz: (24570 << 10) / 2457 = 10240 ns
    assert_eq!(session.timestamp(1), Some(10_240));
    assert!(session.dump_entry(1).starts_with("0.000010 - idle/v2 - VMEXIT [ "));
}

#[test]
fn test_unknown_class_dump_line() {
    let builder = TraceBuilder::new()
        .cpu(0)
        .event(0x0003_1042, 500, &[1, 2, 3]);
    let session = open(&builder);

    assert_eq!(session.get_event_name(0).as_deref(), Some("unknown (0x00031042)"));
    assert_eq!(session.event_info(0), EventInfo::Unrecognized);
    assert_eq!(
        session.dump_entry(0),
        "0.000000 - idle/v0 - unknown (0x00031042) [  ]"
    );
}

#[test]
fn test_names_are_deterministic() {
    for def in catalogue() {
        let first = event_name(def.id);
        assert!(first.is_some_and(|name| !name.is_empty()));
        assert_eq!(first, event_name(def.id));
    }
}

#[test]
fn test_unknown_ids_never_fail() {
    for id in [0u32, 0x0003_0000, 0x0002_8fff, 0x0008_3001, 0x0fff_ffff, 0x0080_3001] {
        assert!(event_name(id).is_none());
        assert!(name_or_unknown(id).contains(&format!("{:08x}", id)));
        assert_eq!(event_info(id, &[1, 2, 3, 4, 5, 6, 7]), EventInfo::Unrecognized);
    }
}

#[test]
fn test_wide_variants_share_names() {
    let wide_classes = [EventClass::Hvm, EventClass::Pv, EventClass::Shadow];
    let mut pairs = 0;

    for def in catalogue().filter(|def| def.id & TRC_64_FLAG != 0) {
        let (class, subclass) = xentrace_decode::events::classify(def.id);
        // Emulation subclass and the scheduler runstates use 0x100 for other purposes
        if !wide_classes.contains(&class) || (class == EventClass::Hvm && subclass == 0x4) {
            continue;
        }
        let narrow = match lookup(def.id & !TRC_64_FLAG) {
            Some(narrow) => narrow,
            None => continue,
        };
        assert_eq!(narrow.name, def.name, "0x{:08x}", def.id);
        assert!(def.words > narrow.words || narrow.info.is_none());
        pairs += 1;
    }
    assert!(pairs > 30);
}

#[test]
fn test_recognized_silent_vs_unrecognized() {
    assert_eq!(event_info(0x0008_1001, &[]), EventInfo::Empty);
    assert_eq!(event_info(0x0008_1003, &[]), EventInfo::Unrecognized);
}

#[test]
fn test_relative_and_absolute_timestamps() {
    let builder = TraceBuilder::new()
        .cpu(0)
        .event(0x0008_1001, 9_000_000, &[])
        .event(0x0008_1001, 9_500_000, &[])
        .event(0x0008_1001, 12_000_000, &[]);

    let relative = open(&builder);
    assert_eq!(relative.timestamp(0), Some(0));

    let options = SessionOptions {
        clock: ClockConfig::new(2_400_000_000, true),
        ..SessionOptions::default()
    };
    let absolute = TraceSession::from_bytes(&builder.bytes(), &options).unwrap();
    let first_tsc = absolute.first_tsc();
    assert_eq!(
        absolute.timestamp(0),
        Some(absolute.normalizer().to_nanoseconds_absolute(first_tsc))
    );

    let entries = relative.load_entries();
    assert!(entries.windows(2).all(|pair| pair[0].ts <= pair[1].ts));
}

#[test]
fn test_records_without_cycles_inherit_per_cpu() {
    let builder = TraceBuilder::new()
        .cpu(0)
        .event(0x0008_1001, 1_000, &[])
        .cpu(1)
        .event(0x0008_1001, 5_000, &[])
        .cpu(0)
        .event_no_tsc(0x0002_800b, &[]);
    let session = open(&builder);

    assert_eq!(session.cpu_count(), 2);
    assert_eq!(session.record(2).unwrap().tsc, 1_000);
    assert_eq!(session.record(2).unwrap().cpu, 0);
}

#[test]
fn test_leading_records_without_cycles_keep_relative_epoch() {
    let builder = TraceBuilder::new()
        .cpu(0)
        .event_no_tsc(0x0008_1001, &[])
        .event(0x0008_1001, 2_457_000_000_000, &[])
        .event(0x0008_1001, 2_457_000_002_457, &[]);
    let session = open(&builder);

    let stamps: Vec<i64> = (0..session.len())
        .filter_map(|index| session.timestamp(index))
        .collect();
    assert_eq!(stamps, vec![0, 0, 1024]);
    assert!(session.dump_entry(0).starts_with("0.000000 - "));
}

#[test]
fn test_record_without_cycles_on_fresh_cpu() {
    let builder = TraceBuilder::new()
        .cpu(0)
        .event(0x0008_1001, 2_457_000_000_000, &[])
        .cpu(1)
        .event_no_tsc(0x0008_1001, &[]);
    let session = open(&builder);

    assert_eq!(session.record(1).unwrap().cpu, 1);
    assert_eq!(session.timestamp(1), Some(0));
}

#[test]
fn test_cpu_changes_only_has_no_events() {
    let builder = TraceBuilder::new().cpu(0).cpu(1);
    let err = TraceSession::from_bytes(&builder.bytes(), &SessionOptions::default()).unwrap_err();
    assert!(matches!(err, ParseError::NoEvents));
}

#[test]
fn test_bad_signature_refused() {
    let builder = TraceBuilder::new().event(0x0008_1001, 1, &[]);
    let err = TraceSession::from_bytes(&builder.bytes(), &SessionOptions::default()).unwrap_err();
    assert!(matches!(err, ParseError::BadSignature(_)));
}

#[test]
fn test_truncated_stream_is_fatal() {
    let mut bytes = three_record_trace().bytes();
    bytes.truncate(bytes.len() - 2);
    let err = TraceSession::from_bytes(&bytes, &SessionOptions::default()).unwrap_err();
    assert!(matches!(err, ParseError::Truncated { .. }));
}

#[test]
fn test_empty_input() {
    let err = TraceSession::from_bytes(&[], &SessionOptions::default()).unwrap_err();
    assert!(matches!(err, ParseError::Empty));
}

#[test]
fn test_fixed_header_session() {
    let words: Vec<u32> = vec![
        0x0001_f003, 0x7fff_0000, 0, 0, 3, 0,
        0x0002_8004, 0x0005_0001, 2_457, 0, 5, 1,
        0x0008_1102, 0x0005_0001, 4_914, 0, 0x1e, 0x1000, 0x1,
    ];
    let bytes: Vec<u8> = words.iter().flat_map(|w| w.to_le_bytes()).collect();
    let options = SessionOptions {
        format: WireFormat::FixedHeader,
        ..SessionOptions::default()
    };
    let session = TraceSession::from_bytes(&bytes, &options).unwrap();

    assert_eq!(session.len(), 2);
    assert_eq!(session.get_task(0).as_deref(), Some("d5/v1"));
    assert_eq!(session.record(1).unwrap().cpu, 3);
    assert_eq!(
        session.dump_entry(1),
        "0.000001 - d5/v1 - VMEXIT [ exitcode = 0x0000001e, rIP  = 0x0000000100001000 ]"
    );
}

#[test]
fn test_open_from_file() {
    let file = three_record_trace().write_temp();
    let session = TraceSession::open(file.path(), &SessionOptions::default()).unwrap();
    assert_eq!(session.len(), 2);
}
