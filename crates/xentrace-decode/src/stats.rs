//! Trace statistics.
//!
//! Counts records per event class, per CPU and per event name, and
//! measures the time span the trace covers.

use colored::*;
use log::debug;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use crate::events::{classify, event_name, unknown_name, EventClass};
use crate::session::TraceSession;

/// Occurrences of one event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventCount {
    pub name: String,
    pub count: usize,
}

/// Summary statistics of a session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TraceStats {
    pub record_count: usize,
    pub cpu_count: usize,
    pub by_class: BTreeMap<EventClass, usize>,
    pub by_cpu: BTreeMap<u16, usize>,
    /// Records whose id is not in the catalogue
    pub unknown_events: usize,
    /// Nanoseconds between the earliest and latest record
    pub span_ns: i64,
    /// Most frequent events, descending
    pub top_events: Vec<EventCount>,
}

/// Compute statistics for a session
///
/// **Public** - main entry point for the stats command
///
/// # Arguments
/// * `session` - Open trace
/// * `top_n` - Number of most frequent events to keep
pub fn compute_stats(session: &TraceSession, top_n: usize) -> TraceStats {
    let mut stats = TraceStats {
        record_count: session.len(),
        cpu_count: session.cpu_count(),
        ..TraceStats::default()
    };

    let mut by_name: HashMap<String, usize> = HashMap::new();
    let (mut min_ts, mut max_ts) = (i64::MAX, i64::MIN);

    for entry in session.load_entries() {
        min_ts = min_ts.min(entry.ts);
        max_ts = max_ts.max(entry.ts);
        *stats.by_cpu.entry(entry.cpu).or_default() += 1;

        let class = classify(entry.event_id).0;
        *stats.by_class.entry(class).or_default() += 1;

        // Name variants collapse into one bucket; unknown ids keep their hex
        let name = match event_name(entry.event_id) {
            Some(name) => name.to_string(),
            None => {
                stats.unknown_events += 1;
                unknown_name(entry.event_id)
            }
        };
        *by_name.entry(name).or_default() += 1;
    }

    stats.span_ns = if stats.record_count > 0 {
        max_ts - min_ts
    } else {
        0
    };

    let mut top: Vec<EventCount> = by_name
        .into_iter()
        .map(|(name, count)| EventCount { name, count })
        .collect();
    top.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    top.truncate(top_n);
    stats.top_events = top;

    debug!(
        "Stats: {} records, {} classes, {} unknown",
        stats.record_count,
        stats.by_class.len(),
        stats.unknown_events
    );
    stats
}

/// Render statistics as a text report
pub fn render_stats(stats: &TraceStats) -> String {
    let mut out = String::new();
    let rule = "=".repeat(60);

    out.push_str(&format!("{}\n", rule));
    out.push_str(&format!("{}\n", "TRACE STATISTICS".bold()));
    out.push_str(&format!("{}\n", rule));
    out.push_str(&format!("Records:   {}\n", stats.record_count));
    out.push_str(&format!("CPUs:      {}\n", stats.cpu_count));
    out.push_str(&format!(
        "Span:      {:.6} s\n",
        stats.span_ns as f64 / 1_000_000_000.0
    ));
    if stats.unknown_events > 0 {
        out.push_str(&format!(
            "Unknown:   {}\n",
            stats.unknown_events.to_string().yellow()
        ));
    }

    out.push_str("\nBy class:\n");
    for (class, count) in &stats.by_class {
        out.push_str(&format!(
            "  {:<8} {:>10} ({:.2}%)\n",
            class.label(),
            count,
            percentage(*count, stats.record_count)
        ));
    }

    out.push_str("\nBy CPU:\n");
    for (cpu, count) in &stats.by_cpu {
        out.push_str(&format!("  cpu{:<5} {:>10}\n", cpu, count));
    }

    if !stats.top_events.is_empty() {
        out.push_str("\nTop events:\n");
        for (rank, event) in stats.top_events.iter().enumerate() {
            out.push_str(&format!(
                "  {:>2}. {:<40} {:>10}\n",
                rank + 1,
                event.name,
                event.count
            ));
        }
    }

    out.push_str(&format!("{}\n", rule));
    out
}

fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}
