//! Per-client token bucket registry.
//!
//! One [`ClientLimiter`] exists per client key, created lazily on the first
//! request from that key. The map is a sharded [`DashMap`]: insert-if-absent
//! goes through the entry API, so concurrent first requests for the same key
//! always end up sharing a single limiter, and only one shard lock is held,
//! only for the lookup-or-insert. Token consumption happens on the limiter
//! itself, which is synchronized with atomics, so unrelated clients never
//! serialize behind each other.
//!
//! Entries are evicted once idle for the configured TTL. The TTL is never
//! shorter than a full refill, so an evicted bucket was already full and
//! recreating it later gives the client exactly what it would have had.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use dashmap::DashMap;
use governor::RateLimiter;
use governor::clock::{Clock, DefaultClock, Reference};
use governor::middleware::NoOpMiddleware;
use governor::state::{InMemoryState, NotKeyed};

use super::policy::LimiterPolicy;

type DirectLimiter<C> = RateLimiter<NotKeyed, InMemoryState, C, NoOpMiddleware<<C as Clock>::Instant>>;

/// Token bucket for a single client key.
pub struct ClientLimiter<C: Clock = DefaultClock> {
    limiter: DirectLimiter<C>,
    clock: C,
    epoch: C::Instant,
    last_seen_nanos: AtomicU64,
}

impl<C: Clock + Clone> ClientLimiter<C> {
    fn new(policy: &LimiterPolicy, clock: C, epoch: C::Instant) -> Self {
        let limiter = RateLimiter::direct_with_clock(policy.quota(), clock.clone());
        let entry = Self {
            limiter,
            clock,
            epoch,
            last_seen_nanos: AtomicU64::new(0),
        };
        entry.touch();
        entry
    }

    /// Consumes one token if available. Never blocks.
    pub fn allow(&self) -> bool {
        self.touch();
        self.limiter.check().is_ok()
    }

    fn touch(&self) {
        let now = nanos_since(&self.clock, self.epoch);
        self.last_seen_nanos.fetch_max(now, Ordering::Relaxed);
    }

    fn last_seen_nanos(&self) -> u64 {
        self.last_seen_nanos.load(Ordering::Relaxed)
    }
}

/// Client key → limiter map for one endpoint class.
pub struct LimiterRegistry<C: Clock = DefaultClock> {
    class: &'static str,
    policy: LimiterPolicy,
    idle_ttl: Duration,
    clock: C,
    epoch: C::Instant,
    entries: DashMap<String, Arc<ClientLimiter<C>>>,
}

impl LimiterRegistry<DefaultClock> {
    /// Creates a registry on the system clock.
    ///
    /// `class` names the endpoint class in logs.
    pub fn new(class: &'static str, policy: LimiterPolicy, idle_ttl: Duration) -> Self {
        Self::with_clock(class, policy, idle_ttl, DefaultClock::default())
    }
}

impl<C: Clock + Clone> LimiterRegistry<C> {
    /// Creates a registry driven by `clock`.
    ///
    /// `idle_ttl` is raised to the policy's full refill time if shorter.
    pub fn with_clock(
        class: &'static str,
        policy: LimiterPolicy,
        idle_ttl: Duration,
        clock: C,
    ) -> Self {
        let epoch = clock.now();
        Self {
            class,
            policy,
            idle_ttl: idle_ttl.max(policy.full_refill()),
            clock,
            epoch,
            entries: DashMap::new(),
        }
    }

    pub fn class(&self) -> &'static str {
        self.class
    }

    pub fn policy(&self) -> &LimiterPolicy {
        &self.policy
    }

    pub fn idle_ttl(&self) -> Duration {
        self.idle_ttl
    }

    /// Returns the limiter for `client_key`, creating it if absent.
    ///
    /// At most one limiter is ever created per key, even when many callers
    /// race on the same new key.
    pub fn get_or_create(&self, client_key: &str) -> Arc<ClientLimiter<C>> {
        if let Some(entry) = self.entries.get(client_key) {
            return Arc::clone(entry.value());
        }

        let entry = self
            .entries
            .entry(client_key.to_owned())
            .or_insert_with(|| {
                tracing::debug!(class = self.class, client_key, "created rate limiter");
                Arc::new(ClientLimiter::new(
                    &self.policy,
                    self.clock.clone(),
                    self.epoch,
                ))
            });

        Arc::clone(entry.value())
    }

    /// Admission decision for one request from `client_key`.
    pub fn allow(&self, client_key: &str) -> bool {
        self.get_or_create(client_key).allow()
    }

    /// Number of tracked client keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops limiters idle for at least the idle TTL and returns how many were removed.
    ///
    /// Limiters still referenced outside the registry are kept, so a handle
    /// obtained from [`Self::get_or_create`] always stays the one registered
    /// for its key.
    pub fn evict_idle(&self) -> usize {
        let now = nanos_since(&self.clock, self.epoch);
        let ttl = u64::try_from(self.idle_ttl.as_nanos()).unwrap_or(u64::MAX);
        let mut evicted = 0;

        self.entries.retain(|_, entry| {
            let idle = now.saturating_sub(entry.last_seen_nanos()) >= ttl;
            let keep = !idle || Arc::strong_count(entry) > 1;
            if !keep {
                evicted += 1;
            }
            keep
        });

        evicted
    }
}

fn nanos_since<C: Clock>(clock: &C, epoch: C::Instant) -> u64 {
    let elapsed = Duration::from(clock.now().duration_since(epoch));
    u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX)
}
