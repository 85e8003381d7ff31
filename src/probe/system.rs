//! Probe capabilities backed by the operating system's own tools.

use std::net::IpAddr;
use std::process::Stdio;
use std::time::{Duration, Instant};

use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::TokioAsyncResolver;
use log::debug;
use tokio::process::Command;

use crate::probe::parse;
use crate::probe::{Prober, Resolved};

/// Hard cap on a single route trace.
const TRACE_TIMEOUT: Duration = Duration::from_secs(12);

/// Slack allowed past the configured ping timeout before the child is
/// abandoned. Covers process startup and output collection.
const PING_GRACE: Duration = Duration::from_millis(500);

const MAX_HOPS: u32 = 20;

/// Probes targets by shelling out to `ping` and `traceroute`/`tracert`
/// and resolving names through the system's configured upstream.
pub struct SystemProber {
    resolver: TokioAsyncResolver,
}

impl SystemProber {
    pub fn new() -> Self {
        let resolver =
            TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default());
        Self { resolver }
    }
}

impl Default for SystemProber {
    fn default() -> Self {
        Self::new()
    }
}

impl Prober for SystemProber {
    async fn latency(&self, host: &str, timeout: Duration) -> Option<f64> {
        let mut cmd = ping_command(host, timeout);
        let out = run_capped(&mut cmd, timeout + PING_GRACE).await?;
        parse::latency_ms(&out)
    }

    async fn resolve(&self, host: &str) -> Option<Resolved> {
        // Literal addresses skip the resolver entirely
        if let Ok(addr) = host.parse::<IpAddr>() {
            return Some(Resolved {
                elapsed_ms: 0.0,
                addr,
            });
        }

        let start = Instant::now();
        match self.resolver.lookup_ip(host).await {
            Ok(lookup) => {
                let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
                lookup.iter().next().map(|addr| Resolved { elapsed_ms, addr })
            }
            Err(e) => {
                debug!("dns lookup failed for {}: {}", host, e);
                None
            }
        }
    }

    async fn trace_route(&self, host: &str) -> Option<String> {
        let mut cmd = trace_command(host);
        let out = run_capped(&mut cmd, TRACE_TIMEOUT).await?;
        parse::route_hops(&out)
    }
}

#[cfg(windows)]
fn ping_command(host: &str, timeout: Duration) -> Command {
    let mut cmd = Command::new("ping");
    cmd.args(["-n", "1", "-w", &timeout.as_millis().to_string(), host]);
    cmd
}

#[cfg(not(windows))]
fn ping_command(host: &str, timeout: Duration) -> Command {
    // -W takes whole seconds; round up so sub-second timeouts still wait
    let secs = (timeout.as_secs_f64().ceil() as u64).max(1);
    let mut cmd = Command::new("ping");
    cmd.args(["-c", "1", "-W", &secs.to_string(), host]);
    cmd
}

#[cfg(windows)]
fn trace_command(host: &str) -> Command {
    let mut cmd = Command::new("tracert");
    cmd.args(["-d", "-h", &MAX_HOPS.to_string(), host]);
    cmd
}

#[cfg(not(windows))]
fn trace_command(host: &str) -> Command {
    let mut cmd = Command::new("traceroute");
    cmd.args(["-n", "-m", &MAX_HOPS.to_string(), host]);
    cmd
}

/// Run a probe utility, capped at `limit`. Any failure mode (spawn error,
/// timeout, non-zero exit) degrades to `None`.
async fn run_capped(cmd: &mut Command, limit: Duration) -> Option<String> {
    let output = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .output();

    match tokio::time::timeout(limit, output).await {
        Ok(Ok(out)) if out.status.success() => {
            Some(String::from_utf8_lossy(&out.stdout).into_owned())
        }
        Ok(Ok(out)) => {
            debug!("probe command exited with {}", out.status);
            None
        }
        Ok(Err(e)) => {
            debug!("probe command failed to run: {}", e);
            None
        }
        Err(_) => {
            debug!("probe command exceeded {:?}", limit);
            None
        }
    }
}
