//! The monitoring loop: one measurement cycle per tick across every
//! configured target, in configured order.

use std::fs::File;
use std::io::BufWriter;
use std::net::IpAddr;

use anyhow::Result;
use chrono::Local;
use log::{debug, info};
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::export::CycleLog;
use crate::probe::Prober;
use crate::render;
use crate::state::{Session, Target};
use crate::stats;

/// Route column state. The three markers are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteMark {
    /// The route obtained this cycle differs from the stored one.
    Changed,
    /// A route is known and did not change.
    Stable,
    /// No route has ever been obtained.
    Unknown,
}

impl RouteMark {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Changed => "CHG",
            Self::Stable => "OK",
            Self::Unknown => "",
        }
    }
}

/// Everything the presentation layer needs for one target row.
#[derive(Debug, Clone)]
pub struct TargetReport {
    pub host: String,
    pub addr: Option<IpAddr>,
    pub last: Option<f64>,
    pub avg: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub jitter: Option<f64>,
    pub loss_pct: f64,
    pub dns_ms: Option<f64>,
    pub route: RouteMark,
}

impl TargetReport {
    fn from_target(t: &Target) -> Self {
        let (min, avg, max) = match stats::min_mean_max(&t.history) {
            Some((min, mean, max)) => (Some(min), Some(mean), Some(max)),
            None => (None, None, None),
        };

        Self {
            host: t.host.clone(),
            addr: t.resolved,
            last: t.last,
            avg,
            min,
            max,
            jitter: stats::jitter(&t.history),
            loss_pct: t.loss_pct(),
            dns_ms: t.dns_ms,
            route: if t.route_changed {
                RouteMark::Changed
            } else if t.route.is_some() {
                RouteMark::Stable
            } else {
                RouteMark::Unknown
            },
        }
    }
}

/// Drives measurement cycles at a fixed cadence until cancelled.
///
/// Probing is sequential within a cycle: per-target attribution and
/// deterministic cycle timing matter more than parallel throughput for
/// the small target counts this tool accepts.
pub struct Engine<P: Prober> {
    config: Config,
    session: Session,
    prober: P,
    log: Option<CycleLog<BufWriter<File>>>,
    cancel: CancellationToken,
}

impl<P: Prober> Engine<P> {
    pub fn new(
        config: Config,
        session: Session,
        prober: P,
        log: Option<CycleLog<BufWriter<File>>>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            config,
            session,
            prober,
            log,
            cancel,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// One full pass over every target: DNS, latency and (when due)
    /// route, followed by report derivation. A failed probe is recorded
    /// as absence and never aborts the cycle.
    pub async fn run_cycle(&mut self) -> Vec<TargetReport> {
        self.session.cycle += 1;
        let route_due =
            self.config.route_check && self.session.cycle % self.config.route_every == 0;

        for target in self.session.targets.iter_mut() {
            target.clear_route_flag();
            target.set_dns(self.prober.resolve(&target.host).await);
            target.record(self.prober.latency(&target.host, self.config.timeout).await);
            if route_due {
                target.apply_route(self.prober.trace_route(&target.host).await);
            }
        }

        self.session
            .targets
            .iter()
            .map(TargetReport::from_target)
            .collect()
    }

    /// Run cycles until cancellation (or the configured count is
    /// reached), redrawing the table and appending to the log after each
    /// one.
    pub async fn run(mut self) -> Result<()> {
        info!(
            "monitoring {} targets every {:?}",
            self.session.targets.len(),
            self.config.interval
        );

        loop {
            if self.cancel.is_cancelled() {
                break;
            }

            let reports = self.run_cycle().await;
            render::draw(&self.session, &reports)?;

            if let Some(log) = self.log.as_mut() {
                let stamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
                log.append_cycle(&stamp, &reports)?;
            }

            if let Some(count) = self.config.count {
                if self.session.cycle >= count {
                    debug!("cycle limit {} reached", count);
                    break;
                }
            }

            tokio::select! {
                _ = self.cancel.cancelled() => break,
                _ = tokio::time::sleep(self.config.interval) => {}
            }
        }

        Ok(())
    }
}
