//! Fire-and-forget engagement telemetry.
//!
//! View, click and swipe events are sent on detached tasks. A failed send is
//! logged at WARN and dropped: no retry, nothing surfaced to the user.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use swipey_core::{ProductId, SwipeDecision};
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::api::{ApiClient, ApiError};

#[derive(Clone)]
pub struct Telemetry {
    api: ApiClient,
    tasks: Arc<Mutex<JoinSet<()>>>,
}

impl Telemetry {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            tasks: Arc::new(Mutex::new(JoinSet::new())),
        }
    }

    /// Report how long `product_id` was on screen.
    pub fn view(&self, product_id: ProductId, duration: Duration) {
        let api = self.api.clone();
        self.spawn("view", async move {
            let result = api.record_view(&product_id, duration).await;
            (product_id, result)
        });
    }

    /// Report a click on part of a card (`image`, `title`, ...).
    pub fn click(&self, product_id: ProductId, target: impl Into<String>) {
        let api = self.api.clone();
        let target = target.into();
        self.spawn("click", async move {
            let result = api.record_click(&product_id, &target).await;
            (product_id, result)
        });
    }

    /// Report a swipe decision.
    pub fn swipe(&self, product_id: ProductId, decision: SwipeDecision) {
        let api = self.api.clone();
        self.spawn("swipe", async move {
            let result = api.record_swipe(&product_id, decision).await;
            (product_id, result)
        });
    }

    /// Wait for every event sent so far. Used before the process exits.
    pub async fn flush(&self) {
        let mut pending = {
            let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
            std::mem::take(&mut *tasks)
        };
        while pending.join_next().await.is_some() {}
    }

    fn spawn<F>(&self, event: &'static str, send: F)
    where
        F: Future<Output = (ProductId, Result<(), ApiError>)> + Send + 'static,
    {
        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        // Reap finished tasks so the set does not grow without bound
        while tasks.try_join_next().is_some() {}
        tasks.spawn(async move {
            match send.await {
                (product_id, Ok(())) => {
                    debug!(event, product_id = %product_id, "Telemetry sent");
                }
                (product_id, Err(e)) => {
                    warn!(event, product_id = %product_id, error = %e, "Telemetry failed");
                }
            }
        });
    }
}

impl std::fmt::Debug for Telemetry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Telemetry")
            .field("api", &self.api.base_url().as_str())
            .finish_non_exhaustive()
    }
}

/// Measures how long the current card has been on screen.
#[derive(Debug, Default)]
pub struct ViewTimer {
    current: Option<(ProductId, Instant)>,
}

impl ViewTimer {
    #[must_use]
    pub const fn new() -> Self {
        Self { current: None }
    }

    /// Start timing `product_id`, returning the previous card's view if any.
    pub fn start(&mut self, product_id: ProductId) -> Option<(ProductId, Duration)> {
        let previous = self.stop();
        self.current = Some((product_id, Instant::now()));
        previous
    }

    /// Stop timing and return what was on screen and for how long.
    pub fn stop(&mut self) -> Option<(ProductId, Duration)> {
        self.current
            .take()
            .map(|(product_id, started)| (product_id, started.elapsed()))
    }

    /// The product being timed.
    #[must_use]
    pub fn current(&self) -> Option<&ProductId> {
        self.current.as_ref().map(|(id, _)| id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::config::ClientConfig;

    fn id(s: &str) -> ProductId {
        ProductId::parse(s).unwrap()
    }

    #[test]
    fn test_view_timer_start_returns_previous() {
        let mut timer = ViewTimer::new();
        assert!(timer.start(id("1")).is_none());
        assert_eq!(timer.current().unwrap().as_str(), "1");

        let (previous, _) = timer.start(id("2")).unwrap();
        assert_eq!(previous.as_str(), "1");
        assert_eq!(timer.current().unwrap().as_str(), "2");

        assert_eq!(timer.stop().unwrap().0.as_str(), "2");
        assert!(timer.stop().is_none());
    }

    #[tokio::test]
    async fn test_failures_are_swallowed() {
        let mut server = mockito::Server::new_async().await;
        let views = server
            .mock("POST", "/api/views")
            .with_status(500)
            .with_body(r#"{"error": "boom"}"#)
            .create_async()
            .await;
        let swipes = server
            .mock("POST", "/api/register-swipe")
            .match_body(mockito::Matcher::Json(serde_json::json!({
                "product_id": "7",
                "liked": false
            })))
            .with_body(r#"{"status": "success"}"#)
            .create_async()
            .await;

        let base = url::Url::parse(&format!("{}/api", server.url())).unwrap();
        let api = ApiClient::new(&ClientConfig::new(base, PathBuf::from("unused"))).unwrap();
        let telemetry = Telemetry::new(api);

        telemetry.view(id("7"), Duration::from_millis(1200));
        telemetry.swipe(id("7"), SwipeDecision::Pass);
        telemetry.flush().await;

        views.assert_async().await;
        swipes.assert_async().await;
    }
}
