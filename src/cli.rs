use std::io::{BufRead, Write};
use std::path::PathBuf;

use clap::Parser;

/// Probe set used when the user supplies no targets.
pub const DEFAULT_TARGETS: &str = "1.1.1.1,8.8.8.8,github.com";

/// Upper bound on monitored targets; keeps the table readable.
pub const MAX_TARGETS: usize = 20;

/// Continuous network-health monitor with a live terminal summary table
#[derive(Parser, Debug, Clone)]
#[command(name = "netpulse")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Comma-separated targets (IPs or hostnames); prompts when empty
    #[arg(short = 't', long = "targets", default_value = "")]
    pub targets: String,

    /// Seconds between measurement cycles
    #[arg(short = 'i', long = "interval", default_value = "1.0")]
    pub interval: f64,

    /// Per-probe timeout in milliseconds
    #[arg(long = "timeout", default_value = "1000")]
    pub timeout: u64,

    /// Rolling-window size in samples
    #[arg(short = 'w', long = "window", default_value = "20")]
    pub window: usize,

    /// Periodically re-trace the route to each target
    #[arg(long = "route-check")]
    pub route_check: bool,

    /// Cycles between route checks
    #[arg(long = "route-every", default_value = "30")]
    pub route_every: u64,

    /// Append per-cycle metrics to this CSV file
    #[arg(short = 'l', long = "log")]
    pub log: Option<PathBuf>,

    /// Number of cycles to run (0 = until interrupted)
    #[arg(short = 'c', long = "count", default_value = "0")]
    pub count: u64,
}

impl Args {
    /// Validate arguments
    pub fn validate(&self) -> Result<(), String> {
        if !self.interval.is_finite() || self.interval <= 0.0 {
            return Err("Interval must be positive".into());
        }

        if self.timeout == 0 {
            return Err("Timeout must be at least 1 ms".into());
        }

        if self.window == 0 {
            return Err("Window must hold at least 1 sample".into());
        }

        if self.route_every == 0 {
            return Err("Route-check cadence must be at least 1 cycle".into());
        }

        Ok(())
    }
}

/// Split a comma-separated target list: trimmed, de-duplicated in
/// first-seen order, capped at [`MAX_TARGETS`].
pub fn parse_targets(csv: &str) -> Vec<String> {
    let mut hosts: Vec<String> = Vec::new();
    for item in csv.split(',') {
        let item = item.trim();
        if item.is_empty() || hosts.iter().any(|h| h == item) {
            continue;
        }
        hosts.push(item.to_string());
        if hosts.len() == MAX_TARGETS {
            break;
        }
    }
    hosts
}

/// Ask once on stdin for a target list, falling back to the default set.
pub fn prompt_targets() -> String {
    println!("netpulse");
    println!("Enter targets separated by commas (IP or hostname).");
    println!("Press Enter to use default: {}", DEFAULT_TARGETS);
    print!("Targets: ");
    let _ = std::io::stdout().flush();

    let mut line = String::new();
    if std::io::stdin().lock().read_line(&mut line).is_err() {
        return DEFAULT_TARGETS.to_string();
    }

    let line = line.trim();
    if line.is_empty() {
        DEFAULT_TARGETS.to_string()
    } else {
        line.to_string()
    }
}
