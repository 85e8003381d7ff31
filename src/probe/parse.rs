//! Extraction of measurements from raw probe-utility output.

use once_cell::sync::Lazy;
use regex::Regex;

/// `time=12ms` / `time<1ms` style token emitted by ping. The `<` form
/// means "less than" and is read the same as `=`.
static PING_TIME: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)time[=<]\s*(\d+)\s*ms").unwrap());

/// A bare dotted-quad, used to pick hop lines out of traceroute output.
static DOTTED_QUAD: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{1,3}(\.\d{1,3}){3}$").unwrap());

/// Lines the route tools print around the hop list.
const BANNERS: [&str; 4] = [
    "tracing route",
    "over a maximum",
    "trace complete",
    "traceroute to",
];

/// First latency token in `out`, in milliseconds.
pub fn latency_ms(out: &str) -> Option<f64> {
    let caps = PING_TIME.captures(out)?;
    caps.get(1)?.as_str().parse::<f64>().ok()
}

/// Hop addresses from raw traceroute output, joined with `->`.
///
/// Tolerates banner and blank lines; a line counts as a hop only when its
/// final whitespace-separated token is a full dotted-quad.
pub fn route_hops(out: &str) -> Option<String> {
    let mut hops: Vec<&str> = Vec::new();

    for line in out.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let low = line.to_lowercase();
        if BANNERS.iter().any(|b| low.starts_with(b)) {
            continue;
        }

        if let Some(last) = line.split_whitespace().last() {
            if DOTTED_QUAD.is_match(last) {
                hops.push(last);
            }
        }
    }

    if hops.is_empty() {
        None
    } else {
        Some(hops.join("->"))
    }
}
