use std::env;
use std::time::Duration;

pub const DEFAULT_URL: &str = "https://etherscan.io/gastracker";
pub const DEFAULT_SELECTOR: &str = "#spanAvgPrice";
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 3600;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_UNIT: &str = "gwei";

/// Which completion wins when fetches overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RacePolicy {
    /// The completion that reaches the display last is shown.
    #[default]
    LastWriteWins,
    /// Completions triggered before an already-applied one are dropped.
    LatestTrigger,
}

impl RacePolicy {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "last-write-wins" => Some(Self::LastWriteWins),
            "latest-trigger" => Some(Self::LatestTrigger),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub url: String,
    pub selector: String,
    pub refresh_interval_secs: u64,
    pub request_timeout_secs: u64,
    pub unit: String,
    pub race_policy: RacePolicy,
    pub surface_failures: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            selector: DEFAULT_SELECTOR.to_string(),
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            unit: DEFAULT_UNIT.to_string(),
            race_policy: RacePolicy::default(),
            surface_failures: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Missing or unparseable
    /// values fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        Config {
            url: lookup("GASBAR_URL").unwrap_or(defaults.url),
            selector: lookup("GASBAR_SELECTOR").unwrap_or(defaults.selector),
            refresh_interval_secs: lookup("GASBAR_REFRESH_INTERVAL_SECS")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.refresh_interval_secs),
            request_timeout_secs: lookup("GASBAR_REQUEST_TIMEOUT_SECS")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.request_timeout_secs),
            unit: lookup("GASBAR_UNIT").unwrap_or(defaults.unit),
            race_policy: lookup("GASBAR_RACE_POLICY")
                .and_then(|v| RacePolicy::parse(&v))
                .unwrap_or(defaults.race_policy),
            surface_failures: lookup("GASBAR_SURFACE_FAILURES")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.surface_failures),
        }
    }

    /// Timer period. A zero interval would make the timer spin, so it is
    /// raised to one second.
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs.max(1))
    }

    /// Per-request HTTP timeout. Zero would fail every request at once, so it
    /// is raised to one second as well.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}
