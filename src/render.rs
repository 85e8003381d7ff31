//! Terminal table presentation: clear, home, redraw.

use std::io::{self, Write};

use crossterm::{cursor, execute, terminal};

use crate::monitor::TargetReport;
use crate::state::Session;

/// Placeholder glyph for values that were not obtained.
const ABSENT: &str = "\u{2014}";

const RULE_WIDTH: usize = 86;

/// Format a millisecond value for a fixed-width column: one decimal under
/// 100, none at or above.
pub fn fmt_ms(v: Option<f64>) -> String {
    match v {
        None => ABSENT.to_string(),
        Some(v) if v >= 100.0 => format!("{:.0}", v),
        Some(v) => format!("{:.1}", v),
    }
}

/// Redraw the whole table on a cleared screen.
pub fn draw(session: &Session, reports: &[TargetReport]) -> io::Result<()> {
    let mut out = io::stdout();
    execute!(
        out,
        terminal::Clear(terminal::ClearType::All),
        cursor::MoveTo(0, 0)
    )?;
    render_table(&mut out, session, reports)?;
    out.flush()
}

/// Write the table itself. Split from [`draw`] so tests can render into a
/// buffer without touching the terminal.
pub fn render_table<W: Write>(
    mut w: W,
    session: &Session,
    reports: &[TargetReport],
) -> io::Result<()> {
    let hosts: Vec<&str> = reports.iter().map(|r| r.host.as_str()).collect();

    writeln!(w, "netpulse")?;
    writeln!(
        w,
        "Started: {}  (cycle {})",
        session.started_at.format("%Y-%m-%d %H:%M:%S UTC"),
        session.cycle
    )?;
    writeln!(w, "Targets: {}", hosts.join(", "))?;
    writeln!(w, "{}", "-".repeat(RULE_WIDTH))?;
    writeln!(
        w,
        "{:<22} {:>6} {:>6} {:>6} {:>6} {:>6} {:>7} {:>6} {:>6}",
        "Target", "Last", "Avg", "Min", "Max", "Jit", "Loss", "DNS", "Route"
    )?;
    writeln!(w, "{}", "-".repeat(RULE_WIDTH))?;

    for r in reports {
        writeln!(
            w,
            "{:<22} {:>6} {:>6} {:>6} {:>6} {:>6} {:>6.1}% {:>6} {:>6}",
            r.host,
            fmt_ms(r.last),
            fmt_ms(r.avg),
            fmt_ms(r.min),
            fmt_ms(r.max),
            fmt_ms(r.jitter),
            r.loss_pct,
            fmt_ms(r.dns_ms),
            r.route.label()
        )?;
    }

    writeln!(w, "{}", "-".repeat(RULE_WIDTH))?;
    writeln!(w, "Ctrl+C to stop")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::RouteMark;

    fn report(host: &str) -> TargetReport {
        TargetReport {
            host: host.to_string(),
            addr: None,
            last: Some(12.3),
            avg: Some(150.7),
            min: Some(9.95),
            max: Some(151.0),
            jitter: None,
            loss_pct: 25.0,
            dns_ms: Some(3.2),
            route: RouteMark::Stable,
        }
    }

    #[test]
    fn test_fmt_ms_one_decimal_below_hundred() {
        assert_eq!(fmt_ms(Some(12.34)), "12.3");
        assert_eq!(fmt_ms(Some(99.96)), "100.0");
    }

    #[test]
    fn test_fmt_ms_no_decimals_at_hundred_and_above() {
        assert_eq!(fmt_ms(Some(100.0)), "100");
        assert_eq!(fmt_ms(Some(1234.5)), "1235");
    }

    #[test]
    fn test_fmt_ms_absent_placeholder() {
        assert_eq!(fmt_ms(None), "\u{2014}");
    }

    #[test]
    fn test_render_table_contains_rows_and_markers() {
        let session = Session::new(["1.1.1.1"], 10);
        let reports = vec![report("1.1.1.1")];

        let mut buf = Vec::new();
        render_table(&mut buf, &session, &reports).unwrap();
        let out = String::from_utf8(buf).unwrap();

        assert!(out.contains("Target"));
        assert!(out.contains("1.1.1.1"));
        assert!(out.contains("12.3"));
        assert!(out.contains("25.0%"));
        assert!(out.contains("OK"));
        assert!(out.contains("Ctrl+C to stop"));
    }
}
