//! Rate/burst parameters for one endpoint class.

use std::num::NonZeroU32;
use std::time::Duration;

use governor::Quota;
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PolicyError {
    #[error("token replenish period must be greater than zero")]
    ZeroPeriod,
    #[error("burst size must be at least 1")]
    ZeroBurst,
}

/// Token bucket parameters: one token is replenished every `period`, up to
/// `burst` tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimiterPolicy {
    period: Duration,
    burst: NonZeroU32,
    quota: Quota,
}

impl LimiterPolicy {
    /// # Errors
    ///
    /// Returns [`PolicyError`] if `period` is zero or `burst` is 0.
    pub fn new(period: Duration, burst: u32) -> Result<Self, PolicyError> {
        let burst = NonZeroU32::new(burst).ok_or(PolicyError::ZeroBurst)?;
        let quota = Quota::with_period(period)
            .ok_or(PolicyError::ZeroPeriod)?
            .allow_burst(burst);

        Ok(Self {
            period,
            burst,
            quota,
        })
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn burst(&self) -> u32 {
        self.burst.get()
    }

    pub(crate) fn quota(&self) -> Quota {
        self.quota
    }

    /// Time for an empty bucket to refill completely.
    pub fn full_refill(&self) -> Duration {
        self.period.saturating_mul(self.burst.get())
    }
}
