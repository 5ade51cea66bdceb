//! Engine and application configuration.

use std::path::PathBuf;
use std::time::Duration;

use crate::cache::CacheConfig;
use crate::efa::EfaConfig;
use crate::iris::IrisConfig;

/// How many upcoming departures to show per route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    /// Only the next departure.
    #[default]
    Next,
    /// The next two departures.
    NextTwo,
}

impl SelectionMode {
    /// Maximum number of upcoming departures selected.
    pub fn limit(&self) -> usize {
        match self {
            SelectionMode::Next => 1,
            SelectionMode::NextTwo => 2,
        }
    }
}

/// What to recommend when there is more time than the slow estimate plus
/// the wait buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActionPolicy {
    /// Keep recommending "walk slowly".
    FourBucket,
    /// Recommend "wait" and show the departure as "waiting".
    #[default]
    FiveBucket,
}

/// Which upstream format departures come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedSource {
    /// Planned windows merged with the change feed.
    #[default]
    Iris,
    /// JSON realtime stop events.
    Efa,
}

/// Configuration parameters for a reconciliation pass.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Minutes beyond the slow estimate that still count as "walk slowly".
    pub wait_buffer_mins: i64,

    pub selection: SelectionMode,

    pub policy: ActionPolicy,

    pub source: FeedSource,
}

impl EngineConfig {
    pub fn with_wait_buffer(mut self, mins: i64) -> Self {
        self.wait_buffer_mins = mins;
        self
    }

    pub fn with_selection(mut self, selection: SelectionMode) -> Self {
        self.selection = selection;
        self
    }

    pub fn with_policy(mut self, policy: ActionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_source(mut self, source: FeedSource) -> Self {
        self.source = source;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            wait_buffer_mins: 15,
            selection: SelectionMode::Next,
            policy: ActionPolicy::FiveBucket,
            source: FeedSource::Iris,
        }
    }
}

/// Errors reading configuration from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Everything the binary needs, read from `HOME_PLANNER_*` variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub routes_file: PathBuf,
    pub engine: EngineConfig,
    pub iris: Option<IrisConfig>,
    pub efa: EfaConfig,
    pub cache: CacheConfig,
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup<L>(lookup: L) -> Result<Self, ConfigError>
    where
        L: Fn(&str) -> Option<String>,
    {
        let var = |name: &'static str| lookup(name).filter(|v| !v.trim().is_empty());

        let routes_file = var("HOME_PLANNER_ROUTES_FILE")
            .map(PathBuf::from)
            .ok_or(ConfigError::Missing("HOME_PLANNER_ROUTES_FILE"))?;

        let mut engine = EngineConfig::default();

        if let Some(value) = var("HOME_PLANNER_WAIT_BUFFER_MINS") {
            engine.wait_buffer_mins = value
                .trim()
                .parse()
                .ok()
                .filter(|mins: &i64| *mins >= 0)
                .ok_or(ConfigError::Invalid {
                    name: "HOME_PLANNER_WAIT_BUFFER_MINS",
                    value,
                })?;
        }

        if let Some(value) = var("HOME_PLANNER_SELECTION") {
            engine.selection = match value.trim().to_ascii_lowercase().as_str() {
                "next" => SelectionMode::Next,
                "next-two" | "next2" => SelectionMode::NextTwo,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "HOME_PLANNER_SELECTION",
                        value,
                    });
                }
            };
        }

        if let Some(value) = var("HOME_PLANNER_ACTION_POLICY") {
            engine.policy = match value.trim().to_ascii_lowercase().as_str() {
                "4" | "four" => ActionPolicy::FourBucket,
                "5" | "five" => ActionPolicy::FiveBucket,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "HOME_PLANNER_ACTION_POLICY",
                        value,
                    });
                }
            };
        }

        if let Some(value) = var("HOME_PLANNER_SOURCE") {
            engine.source = match value.trim().to_ascii_lowercase().as_str() {
                "iris" => FeedSource::Iris,
                "efa" => FeedSource::Efa,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "HOME_PLANNER_SOURCE",
                        value,
                    });
                }
            };
        }

        let mut iris = match (
            var("HOME_PLANNER_DB_CLIENT_ID"),
            var("HOME_PLANNER_DB_API_KEY"),
        ) {
            (Some(id), Some(key)) => {
                let mut config = IrisConfig::new(id, key);
                if let Some(url) = var("HOME_PLANNER_DB_BASE_URL") {
                    config = config.with_base_url(url);
                }
                Some(config)
            }
            _ if engine.source == FeedSource::Iris => {
                return Err(ConfigError::Missing("HOME_PLANNER_DB_API_KEY"));
            }
            _ => None,
        };

        let mut efa = EfaConfig::default();
        if let Some(url) = var("HOME_PLANNER_EFA_BASE_URL") {
            efa = efa.with_base_url(url);
        }

        if let Some(value) = var("HOME_PLANNER_HTTP_TIMEOUT_SECS") {
            let secs = value
                .trim()
                .parse()
                .ok()
                .filter(|secs: &u64| *secs > 0)
                .ok_or(ConfigError::Invalid {
                    name: "HOME_PLANNER_HTTP_TIMEOUT_SECS",
                    value,
                })?;
            efa = efa.with_timeout(secs);
            iris = iris.map(|config| config.with_timeout(secs));
        }

        let mut cache = CacheConfig::default();
        if let Some(value) = var("HOME_PLANNER_PLAN_CACHE_SECS") {
            let secs: u64 = value.trim().parse().map_err(|_| ConfigError::Invalid {
                name: "HOME_PLANNER_PLAN_CACHE_SECS",
                value: value.clone(),
            })?;
            cache.ttl = Duration::from_secs(secs);
        }

        Ok(Self {
            routes_file,
            engine,
            iris,
            efa,
            cache,
        })
    }
}
