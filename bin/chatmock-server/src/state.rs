//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use chatmock_core::{Clock, Composer, NoDelayClock, StreamTiming, SystemClock};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::Config;

/// State shared across all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration, read-only after startup.
    pub config: Arc<Config>,
    /// Upload timestamps and stream pacing.
    pub clock: Arc<dyn Clock>,
    pub composer: Composer,
    pub timing: StreamTiming,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("composer", &self.composer)
            .field("timing", &self.timing)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// State for a running server: real delays unless pacing is switched off.
    pub fn from_config(config: Config) -> Self {
        let clock: Arc<dyn Clock> = if config.pacing {
            Arc::new(SystemClock)
        } else {
            Arc::new(NoDelayClock)
        };
        Self::with_clock(config, clock)
    }

    pub fn with_clock(config: Config, clock: Arc<dyn Clock>) -> Self {
        Self {
            composer: Composer::new(config.image_probability),
            timing: StreamTiming::default(),
            config: Arc::new(config),
            clock,
        }
    }

    /// Randomness for one request. A configured seed restarts the sequence
    /// every time, so identical requests get identical replies.
    pub fn rng(&self) -> StdRng {
        match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}
