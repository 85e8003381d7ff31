use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::monitor::{RouteMark, TargetReport};

const HEADER: &str = "timestamp,target,resolved_ip,last_ms,avg_ms,min_ms,max_ms,jitter_ms,loss_pct,dns_ms,route_changed";

/// Append-only CSV cycle log: one row per target per cycle, flushed after
/// each full cycle so rows survive abrupt termination between cycles.
pub struct CycleLog<W: Write> {
    out: W,
    needs_header: bool,
}

impl CycleLog<BufWriter<File>> {
    /// Open `path` for appending. The header is written on first append
    /// only when the file is newly empty. Failure here is fatal to the
    /// caller: the monitor must not start without its log.
    pub fn create(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open log file: {}", path.display()))?;

        let empty = file
            .metadata()
            .with_context(|| format!("Failed to stat log file: {}", path.display()))?
            .len()
            == 0;

        Ok(Self {
            out: BufWriter::new(file),
            needs_header: empty,
        })
    }
}

impl<W: Write> CycleLog<W> {
    /// Log into an arbitrary writer. `needs_header` mirrors "the file is
    /// newly empty".
    #[allow(dead_code)]
    pub fn from_writer(out: W, needs_header: bool) -> Self {
        Self { out, needs_header }
    }

    /// Append one row per target, then flush.
    pub fn append_cycle(&mut self, timestamp: &str, reports: &[TargetReport]) -> io::Result<()> {
        if self.needs_header {
            writeln!(self.out, "{}", HEADER)?;
            self.needs_header = false;
        }

        for r in reports {
            writeln!(
                self.out,
                "{},{},{},{},{},{},{},{},{:.1},{},{}",
                timestamp,
                escape_csv(&r.host),
                r.addr.map(|a| a.to_string()).unwrap_or_default(),
                opt_ms(r.last),
                opt_ms(r.avg),
                opt_ms(r.min),
                opt_ms(r.max),
                opt_ms(r.jitter),
                r.loss_pct,
                opt_ms(r.dns_ms),
                if r.route == RouteMark::Changed { "1" } else { "0" },
            )?;
        }

        self.out.flush()
    }

    #[allow(dead_code)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Absent numerics serialize as empty fields, never a placeholder.
fn opt_ms(v: Option<f64>) -> String {
    v.map(|v| format!("{:.1}", v)).unwrap_or_default()
}

/// Escape a field for CSV (quote if it contains comma, quote, or newline)
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
