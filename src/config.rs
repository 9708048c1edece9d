use anyhow::{Context, Result};
use declarative::{ReconcileOptions, RetryPolicy};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::paths;

// ============================================================================
// Settings
// ============================================================================

/// Reconciliation settings from `config.toml`
///
/// Every field is optional in the file; command-line flags override them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Resources reconciled concurrently
    pub jobs: usize,
    /// Deadline for each provider call in seconds; 0 waits indefinitely
    pub timeout_secs: u64,
    /// How long a cycle waits for a running cycle of the same resource
    pub lock_wait_secs: u64,
    /// Extra attempts for resources that end failed or degraded
    pub retries: u32,
    /// Delay before the first retry; doubles on each further one
    pub retry_delay_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            jobs: 4,
            timeout_secs: 30,
            lock_wait_secs: 60,
            retries: 0,
            retry_delay_ms: 2000,
        }
    }
}

impl Settings {
    /// Load settings from the config directory, or defaults if there is no file
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_file()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Could not read settings file: {}", path.display()))?;
        let settings: Self = toml::from_str(&content)
            .with_context(|| format!("Invalid TOML format in {}", path.display()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.jobs == 0 {
            anyhow::bail!("jobs must be at least 1");
        }
        Ok(())
    }

    /// Apply command-line overrides
    pub fn with_overrides(
        mut self,
        jobs: Option<usize>,
        timeout_secs: Option<u64>,
        retries: Option<u32>,
    ) -> Self {
        if let Some(jobs) = jobs {
            self.jobs = jobs.max(1);
        }
        if let Some(timeout) = timeout_secs {
            self.timeout_secs = timeout;
        }
        if let Some(retries) = retries {
            self.retries = retries;
        }
        self
    }

    pub fn call_timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }

    pub fn reconcile_options(&self, dry_run: bool) -> ReconcileOptions {
        ReconcileOptions {
            dry_run,
            jobs: self.jobs,
            call_timeout: self.call_timeout(),
            lock_wait: Duration::from_secs(self.lock_wait_secs),
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.retries.saturating_add(1),
            Duration::from_millis(self.retry_delay_ms),
        )
    }
}
