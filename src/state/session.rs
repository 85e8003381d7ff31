use chrono::{DateTime, Utc};

use crate::state::target::Target;

/// A monitoring run: every configured target in stable order plus the
/// cycle counter that drives route-check cadence.
///
/// Owned by the engine and passed by reference into each cycle; nothing
/// here outlives the process.
#[derive(Debug)]
pub struct Session {
    pub targets: Vec<Target>,
    /// Completed-cycle counter. Starts at 0; the first cycle is 1.
    pub cycle: u64,
    pub started_at: DateTime<Utc>,
}

impl Session {
    pub fn new<I, S>(hosts: I, window: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            targets: hosts
                .into_iter()
                .map(|h| Target::new(h, window))
                .collect(),
            cycle: 0,
            started_at: Utc::now(),
        }
    }

    #[allow(dead_code)]
    pub fn target(&self, host: &str) -> Option<&Target> {
        self.targets.iter().find(|t| t.host == host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_preserves_configured_order() {
        let session = Session::new(["b.example", "a.example", "c.example"], 10);

        let hosts: Vec<&str> = session.targets.iter().map(|t| t.host.as_str()).collect();
        assert_eq!(hosts, ["b.example", "a.example", "c.example"]);
        assert_eq!(session.cycle, 0);
    }

    #[test]
    fn test_target_lookup_by_host() {
        let session = Session::new(["1.1.1.1", "8.8.8.8"], 10);

        assert!(session.target("8.8.8.8").is_some());
        assert!(session.target("9.9.9.9").is_none());
    }
}
