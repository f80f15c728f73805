#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use axum::extract::ConnectInfo;
use axum::http::HeaderValue;
use axum_test::TestServer;
use chrono::Utc;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::Layer;

use slug_shortener::application::services::LinkService;
use slug_shortener::domain::entities::{NewUrlMapping, UrlMapping};
use slug_shortener::domain::repositories::{StorageError, UrlRepository};
use slug_shortener::domain::slug::OsRandom;
use slug_shortener::infrastructure::rate_limit::{LimiterPolicy, RateLimiters};
use slug_shortener::routes::app_router;
use slug_shortener::state::AppState;

pub const BASE_URL: &str = "http://localhost:8080";

/// Storage double keyed by slug, enforcing slug uniqueness like the real table.
#[derive(Default)]
pub struct InMemoryUrlRepository {
    rows: Mutex<HashMap<String, UrlMapping>>,
    next_id: AtomicI64,
    forced_collisions: AtomicUsize,
    failing: AtomicBool,
    inserts: AtomicUsize,
}

impl InMemoryUrlRepository {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Reports the next `count` inserts as duplicate slugs.
    pub fn force_collisions(&self, count: usize) {
        self.forced_collisions.store(count, Ordering::SeqCst);
    }

    /// Makes every call fail with a database error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn seed(&self, slug: &str, long_url: &str) {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.rows.lock().unwrap().insert(
            slug.to_string(),
            UrlMapping::new(id, slug.to_string(), long_url.to_string(), Utc::now()),
        );
    }

    pub fn get(&self, slug: &str) -> Option<UrlMapping> {
        self.rows.lock().unwrap().get(slug).cloned()
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn insert_attempts(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UrlRepository for InMemoryUrlRepository {
    async fn insert(&self, new_mapping: NewUrlMapping) -> Result<UrlMapping, StorageError> {
        self.inserts.fetch_add(1, Ordering::SeqCst);

        if self.failing.load(Ordering::SeqCst) {
            return Err(StorageError::Database(sqlx::Error::PoolTimedOut));
        }

        let collide = self
            .forced_collisions
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();

        let mut rows = self.rows.lock().unwrap();
        if collide || rows.contains_key(&new_mapping.slug) {
            return Err(StorageError::DuplicateSlug {
                slug: new_mapping.slug,
            });
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let mapping = UrlMapping::new(id, new_mapping.slug, new_mapping.long_url, Utc::now());
        rows.insert(mapping.slug.clone(), mapping.clone());

        Ok(mapping)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<UrlMapping>, StorageError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StorageError::Database(sqlx::Error::PoolClosed));
        }

        Ok(self.get(slug))
    }
}

/// Rate limit settings for a test app.
#[derive(Clone, Copy)]
pub struct TestLimits {
    pub shorten_period: Duration,
    pub shorten_burst: u32,
    pub redirect_period: Duration,
    pub redirect_burst: u32,
}

impl TestLimits {
    /// Production defaults: 1 shorten per 30s (burst 2), 1 redirect per 800ms (burst 75).
    pub fn standard() -> Self {
        Self {
            shorten_period: Duration::from_secs(30),
            shorten_burst: 2,
            redirect_period: Duration::from_millis(800),
            redirect_burst: 75,
        }
    }

    /// Limits high enough that tests unrelated to rate limiting never hit them.
    pub fn generous() -> Self {
        Self {
            shorten_period: Duration::from_millis(1),
            shorten_burst: 1_000,
            redirect_period: Duration::from_millis(1),
            redirect_burst: 1_000,
        }
    }
}

pub fn create_test_state(repository: Arc<InMemoryUrlRepository>, limits: TestLimits) -> AppState {
    let link_service = Arc::new(LinkService::new(repository, Arc::new(OsRandom), BASE_URL));

    let limiters = Arc::new(RateLimiters::new(
        LimiterPolicy::new(limits.shorten_period, limits.shorten_burst).unwrap(),
        LimiterPolicy::new(limits.redirect_period, limits.redirect_burst).unwrap(),
        Duration::from_secs(600),
    ));

    AppState::new(
        link_service,
        limiters,
        HeaderValue::from_static("*"),
        true,
    )
}

pub fn create_test_app(repository: Arc<InMemoryUrlRepository>, limits: TestLimits) -> Router {
    app_router(create_test_state(repository, limits))
}

pub fn create_test_server(repository: Arc<InMemoryUrlRepository>, limits: TestLimits) -> TestServer {
    TestServer::new(create_test_app(repository, limits)).unwrap()
}

/// Injects a fixed peer address, standing in for `into_make_service_with_connect_info`.
#[derive(Clone)]
pub struct MockConnectInfoLayer {
    pub addr: SocketAddr,
}

impl MockConnectInfoLayer {
    pub fn new(addr: &str) -> Self {
        Self {
            addr: addr.parse().unwrap(),
        }
    }
}

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService {
            inner,
            addr: self.addr,
        }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
    addr: SocketAddr,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        req.extensions_mut().insert(ConnectInfo(self.addr));
        self.inner.call(req)
    }
}
