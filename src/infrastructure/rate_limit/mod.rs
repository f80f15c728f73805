//! In-process rate limiting state.
//!
//! Two independent endpoint classes are limited separately: `shorten` (write,
//! very low rate, small burst) and `redirect` (read, high rate, larger burst).
//! A client therefore owns two buckets, one per class.
//!
//! - [`policy`] - Rate/burst parameters
//! - [`registry`] - Lazily created per-client token buckets with idle eviction

pub mod policy;
pub mod registry;

pub use policy::{LimiterPolicy, PolicyError};
pub use registry::{ClientLimiter, LimiterRegistry};

use std::sync::Arc;
use std::time::Duration;

use governor::clock::{Clock, DefaultClock};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

/// Limiter registries for both endpoint classes.
pub struct RateLimiters<C: Clock = DefaultClock> {
    pub shorten: LimiterRegistry<C>,
    pub redirect: LimiterRegistry<C>,
}

impl RateLimiters<DefaultClock> {
    pub fn new(shorten: LimiterPolicy, redirect: LimiterPolicy, idle_ttl: Duration) -> Self {
        Self::with_clock(shorten, redirect, idle_ttl, DefaultClock::default())
    }
}

impl<C: Clock + Clone> RateLimiters<C> {
    /// Both registries share `clock`.
    pub fn with_clock(
        shorten: LimiterPolicy,
        redirect: LimiterPolicy,
        idle_ttl: Duration,
        clock: C,
    ) -> Self {
        Self {
            shorten: LimiterRegistry::with_clock("shorten", shorten, idle_ttl, clock.clone()),
            redirect: LimiterRegistry::with_clock("redirect", redirect, idle_ttl, clock),
        }
    }

    /// Evicts idle limiters from both classes. Returns the total removed.
    pub fn evict_idle(&self) -> usize {
        let evicted = self.shorten.evict_idle() + self.redirect.evict_idle();

        tracing::debug!(
            evicted,
            shorten_clients = self.shorten.len(),
            redirect_clients = self.redirect.len(),
            "rate limiter sweep"
        );

        evicted
    }
}

/// Spawns a background task that evicts idle limiters every `every`.
///
/// The task runs until aborted through the returned handle.
pub fn spawn_reaper<C>(limiters: Arc<RateLimiters<C>>, every: Duration) -> JoinHandle<()>
where
    C: Clock + Clone + Send + Sync + 'static,
{
    tokio::spawn(async move {
        let mut ticker = time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            limiters.evict_idle();
        }
    })
}
