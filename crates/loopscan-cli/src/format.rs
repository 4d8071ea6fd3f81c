/// Result formatting: human-readable lines and a single JSON document.
///
/// - **Human mode** (default): one `cycle (source A): A->B->C->A` line per
///   cycle on stdout, and a one-line run summary on stderr unless `--quiet`.
/// - **JSON mode**: one object `{"cycles": [...], "summary": {...}}` on
///   stdout. Nothing is written to stderr.
use std::io::Write;

use loopscan_core::{DiscoveredCycle, RunSummary, VertexId};
use serde::Serialize;

// ---------------------------------------------------------------------------
// JSON shapes
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct CycleRecord<'a> {
    source: &'a VertexId,
    path: &'a [VertexId],
    length: usize,
}

#[derive(Serialize)]
struct Report<'a> {
    cycles: Vec<CycleRecord<'a>>,
    summary: &'a RunSummary,
}

// ---------------------------------------------------------------------------
// Writers
// ---------------------------------------------------------------------------

/// Writes one line per cycle.
pub fn write_cycles_human<W: Write>(w: &mut W, cycles: &[DiscoveredCycle]) -> std::io::Result<()> {
    for cycle in cycles {
        writeln!(w, "cycle (source {}): {cycle}", cycle.source)?;
    }
    Ok(())
}

/// Writes the stderr summary line.
pub fn write_summary_human<W: Write>(w: &mut W, summary: &RunSummary) -> std::io::Result<()> {
    writeln!(
        w,
        "{} cycle(s), {} duplicate(s) suppressed, {} message(s) over {} superstep(s): {}",
        summary.cycles_reported,
        summary.duplicates_suppressed,
        summary.messages_sent,
        summary.supersteps,
        summary.termination
    )
}

/// Writes the whole result as one pretty-printed JSON object.
pub fn write_json<W: Write>(
    w: &mut W,
    cycles: &[DiscoveredCycle],
    summary: &RunSummary,
) -> std::io::Result<()> {
    let report = Report {
        cycles: cycles
            .iter()
            .map(|c| CycleRecord {
                source: &c.source,
                path: &c.path,
                length: c.len(),
            })
            .collect(),
        summary,
    };
    serde_json::to_writer_pretty(&mut *w, &report)?;
    writeln!(w)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
