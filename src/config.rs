use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cli::Args;

/// Smallest allowed inter-cycle delay. Bounds redraw and log volume no
/// matter how aggressive the configured interval is.
pub const MIN_INTERVAL: Duration = Duration::from_millis(200);

/// Runtime configuration derived from CLI args.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Number of cycles to run (None = run until interrupted)
    pub count: Option<u64>,
    /// Delay between measurement cycles, floored at [`MIN_INTERVAL`]
    #[serde(with = "duration_serde")]
    pub interval: Duration,
    /// Per-probe timeout
    #[serde(with = "duration_serde")]
    pub timeout: Duration,
    /// Rolling-window size for latency history
    pub window: usize,
    /// Enable periodic route tracing
    pub route_check: bool,
    /// Route-check cadence in cycles
    pub route_every: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            count: None,
            interval: Duration::from_secs(1),
            timeout: Duration::from_millis(1000),
            window: 20,
            route_check: false,
            route_every: 30,
        }
    }
}

impl From<&Args> for Config {
    fn from(args: &Args) -> Self {
        Self {
            count: if args.count == 0 {
                None
            } else {
                Some(args.count)
            },
            interval: Duration::from_secs_f64(args.interval).max(MIN_INTERVAL),
            timeout: Duration::from_millis(args.timeout),
            window: args.window,
            route_check: args.route_check,
            route_every: args.route_every.max(1),
        }
    }
}

/// Serde helper for Duration
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs_f64().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = f64::deserialize(deserializer)?;
        Ok(Duration::from_secs_f64(secs))
    }
}
