//! Daily capture budget, persisted between invocations.
//!
//! Captures are capped per UTC day. The counter lives in a small JSON state
//! file so separate runs share the same budget; the count resets when the
//! date rolls over. Callers [`CaptureLimiter::check`] before capturing and
//! [`CaptureLimiter::record`] only after a capture was actually submitted,
//! so refused or failed captures do not consume budget.

use std::fs;
use std::path::PathBuf;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ScrapeError;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LimitState {
    date: NaiveDate,
    count: u32,
}

impl LimitState {
    fn fresh() -> Self {
        Self {
            date: Utc::now().date_naive(),
            count: 0,
        }
    }
}

/// Per-day capture counter backed by a JSON state file.
pub struct CaptureLimiter {
    path: PathBuf,
    limit: u32,
}

impl CaptureLimiter {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, limit: u32) -> Self {
        Self {
            path: path.into(),
            limit,
        }
    }

    /// Verifies that today's budget is not exhausted.
    ///
    /// Resets (and persists) the counter when the stored date is not today.
    /// Returns the number of captures already used today.
    ///
    /// # Errors
    ///
    /// - [`ScrapeError::DailyLimitReached`] when the budget is used up.
    /// - [`ScrapeError::LimitState`] when the state file cannot be read,
    ///   parsed, or written.
    pub fn check(&self) -> Result<u32, ScrapeError> {
        let mut state = self.load()?;
        let today = Utc::now().date_naive();
        if state.date != today {
            state = LimitState::fresh();
            self.store(&state)?;
        }
        if state.count >= self.limit {
            return Err(ScrapeError::DailyLimitReached {
                used: state.count,
                limit: self.limit,
            });
        }
        Ok(state.count)
    }

    /// Counts one successful capture against today's budget and persists
    /// the new total, which is returned.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::LimitState`] when the state file cannot be
    /// read, parsed, or written.
    pub fn record(&self) -> Result<u32, ScrapeError> {
        let mut state = self.load()?;
        let today = Utc::now().date_naive();
        if state.date != today {
            state = LimitState::fresh();
        }
        state.count += 1;
        self.store(&state)?;
        Ok(state.count)
    }

    fn load(&self) -> Result<LimitState, ScrapeError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(LimitState::fresh());
            }
            Err(err) => return Err(self.state_error(err.to_string())),
        };
        serde_json::from_str(&raw).map_err(|err| self.state_error(err.to_string()))
    }

    fn store(&self, state: &LimitState) -> Result<(), ScrapeError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|err| self.state_error(err.to_string()))?;
            }
        }
        let raw = serde_json::to_string_pretty(state)
            .map_err(|err| self.state_error(err.to_string()))?;
        fs::write(&self.path, raw).map_err(|err| self.state_error(err.to_string()))
    }

    fn state_error(&self, reason: String) -> ScrapeError {
        ScrapeError::LimitState {
            path: self.path.clone(),
            reason,
        }
    }
}
