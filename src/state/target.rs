use std::collections::VecDeque;
use std::net::IpAddr;

use crate::probe::Resolved;

/// One monitored endpoint and everything measured about it so far.
///
/// Created once at startup and mutated in place every cycle. The route is
/// sticky (a failed trace keeps the last known path); DNS state is not.
#[derive(Debug, Clone)]
pub struct Target {
    pub host: String,
    window: usize,
    pub sent: u64,
    pub received: u64,
    /// Most recent successful latency samples in temporal order, bounded
    /// to `window` entries with the oldest evicted first.
    pub history: VecDeque<f64>,
    /// Most recent probe outcome, overwritten every cycle.
    pub last: Option<f64>,
    pub dns_ms: Option<f64>,
    pub resolved: Option<IpAddr>,
    pub route: Option<String>,
    pub route_changed: bool,
}

impl Target {
    pub fn new(host: impl Into<String>, window: usize) -> Self {
        let window = window.max(1);
        Self {
            host: host.into(),
            window,
            sent: 0,
            received: 0,
            history: VecDeque::with_capacity(window),
            last: None,
            dns_ms: None,
            resolved: None,
            route: None,
            route_changed: false,
        }
    }

    /// Record one latency probe outcome. Absence is a normal signal of
    /// probe failure, not a fault.
    pub fn record(&mut self, outcome: Option<f64>) {
        self.sent += 1;
        self.last = outcome;
        if let Some(ms) = outcome {
            self.received += 1;
            self.history.push_back(ms);
            while self.history.len() > self.window {
                self.history.pop_front();
            }
        }
    }

    /// Loss percentage across the run's lifetime.
    pub fn loss_pct(&self) -> f64 {
        if self.sent == 0 {
            0.0
        } else {
            (self.sent - self.received) as f64 / self.sent as f64 * 100.0
        }
    }

    /// Store a DNS outcome. A failed lookup overwrites the previous
    /// result.
    pub fn set_dns(&mut self, outcome: Option<Resolved>) {
        match outcome {
            Some(r) => {
                self.dns_ms = Some(r.elapsed_ms);
                self.resolved = Some(r.addr);
            }
            None => {
                self.dns_ms = None;
                self.resolved = None;
            }
        }
    }

    /// Compare a freshly traced route against the stored one, raising the
    /// change flag when they differ. A failed trace leaves the stored
    /// route untouched.
    pub fn apply_route(&mut self, candidate: Option<String>) {
        let Some(new_route) = candidate else {
            return;
        };
        if self.route.as_deref().is_some_and(|cur| cur != new_route) {
            self.route_changed = true;
        }
        self.route = Some(new_route);
    }

    /// Reset the change flag. Runs once per target at the start of every
    /// cycle, before any route evaluation for that cycle.
    pub fn clear_route_flag(&mut self) {
        self.route_changed = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn test_initial_state() {
        let t = Target::new("8.8.8.8", 20);
        assert_eq!(t.sent, 0);
        assert_eq!(t.received, 0);
        assert!(t.history.is_empty());
        assert_eq!(t.last, None);
        assert_eq!(t.route, None);
        assert!(!t.route_changed);
        assert_eq!(t.loss_pct(), 0.0);
    }

    #[test]
    fn test_record_success_and_failure() {
        let mut t = Target::new("8.8.8.8", 20);

        t.record(Some(12.0));
        assert_eq!(t.sent, 1);
        assert_eq!(t.received, 1);
        assert_eq!(t.last, Some(12.0));

        t.record(None);
        assert_eq!(t.sent, 2);
        assert_eq!(t.received, 1);
        assert_eq!(t.last, None);
        assert_eq!(t.history.len(), 1);
    }

    #[test]
    fn test_history_bounded_to_window() {
        let mut t = Target::new("8.8.8.8", 3);
        for i in 0..10 {
            t.record(Some(i as f64));
        }

        assert_eq!(t.history.len(), 3);
        // Only the most recent samples survive, in temporal order
        assert_eq!(t.history, VecDeque::from([7.0, 8.0, 9.0]));
        assert_eq!(t.sent, 10);
        assert_eq!(t.received, 10);
    }

    #[test]
    fn test_failures_do_not_enter_history() {
        let mut t = Target::new("8.8.8.8", 3);
        t.record(Some(10.0));
        t.record(None);
        t.record(Some(20.0));

        assert_eq!(t.history, VecDeque::from([10.0, 20.0]));
    }

    #[test]
    fn test_loss_pct_formula() {
        let mut t = Target::new("8.8.8.8", 20);
        assert_eq!(t.loss_pct(), 0.0);

        t.record(Some(10.0));
        t.record(None);
        t.record(None);
        t.record(Some(11.0));

        assert_eq!(t.loss_pct(), 50.0);
    }

    #[test]
    fn test_apply_route_first_route_is_not_a_change() {
        let mut t = Target::new("8.8.8.8", 20);
        t.apply_route(Some("1.1.1.1->2.2.2.2".into()));

        assert_eq!(t.route.as_deref(), Some("1.1.1.1->2.2.2.2"));
        assert!(!t.route_changed);
    }

    #[test]
    fn test_apply_route_same_route_keeps_flag_clear() {
        let mut t = Target::new("8.8.8.8", 20);
        t.apply_route(Some("1.1.1.1->2.2.2.2".into()));
        t.apply_route(Some("1.1.1.1->2.2.2.2".into()));

        assert!(!t.route_changed);
    }

    #[test]
    fn test_apply_route_detects_change() {
        let mut t = Target::new("8.8.8.8", 20);
        t.apply_route(Some("1.1.1.1->2.2.2.2".into()));
        t.apply_route(Some("1.1.1.1->3.3.3.3".into()));

        assert!(t.route_changed);
        assert_eq!(t.route.as_deref(), Some("1.1.1.1->3.3.3.3"));
    }

    #[test]
    fn test_apply_route_absent_is_sticky() {
        let mut t = Target::new("8.8.8.8", 20);
        t.apply_route(Some("1.1.1.1->2.2.2.2".into()));
        t.apply_route(None);

        assert_eq!(t.route.as_deref(), Some("1.1.1.1->2.2.2.2"));
        assert!(!t.route_changed);
    }

    #[test]
    fn test_clear_route_flag() {
        let mut t = Target::new("8.8.8.8", 20);
        t.apply_route(Some("a".into()));
        t.apply_route(Some("b".into()));
        assert!(t.route_changed);

        t.clear_route_flag();
        assert!(!t.route_changed);
        // The stored route survives the reset
        assert_eq!(t.route.as_deref(), Some("b"));
    }

    #[test]
    fn test_dns_state_is_not_sticky() {
        let mut t = Target::new("example.com", 20);
        let addr = IpAddr::V4(Ipv4Addr::new(93, 184, 216, 34));

        t.set_dns(Some(Resolved {
            elapsed_ms: 12.5,
            addr,
        }));
        assert_eq!(t.dns_ms, Some(12.5));
        assert_eq!(t.resolved, Some(addr));

        t.set_dns(None);
        assert_eq!(t.dns_ms, None);
        assert_eq!(t.resolved, None);
    }
}
