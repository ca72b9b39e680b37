//! The swipe discovery loop.
//!
//! [`SwipeSession`] ties the gesture interpreter to the feed, profile and
//! telemetry: one decided swipe records the decision, saves liked products,
//! advances the feed, reports telemetry and tops the feed up when it runs low.

use swipey_core::{Product, SwipeDecision};
use tracing::{debug, info, instrument};

use crate::error::{Action, ClientError, Result, add_breadcrumb, capture_client_error};
use crate::gesture::SwipeInterpreter;
use crate::state::ClientState;
use crate::stores::LoadOutcome;
use crate::telemetry::ViewTimer;

/// Start fetching the next page when a card is swiped with this many or
/// fewer cards left, the swiped card included.
pub const PRELOAD_THRESHOLD: usize = 2;

/// What one decided swipe did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwipeOutcome {
    pub decision: SwipeDecision,
    pub product: Product,
    /// Result of the preload triggered by this swipe, if one ran and succeeded.
    pub preload: Option<LoadOutcome>,
}

#[derive(Debug)]
pub struct SwipeSession {
    state: ClientState,
    gesture: SwipeInterpreter,
    timer: ViewTimer,
}

impl SwipeSession {
    #[must_use]
    pub fn new(state: ClientState) -> Self {
        Self {
            state,
            gesture: SwipeInterpreter::new(),
            timer: ViewTimer::new(),
        }
    }

    #[must_use]
    pub const fn gesture(&self) -> &SwipeInterpreter {
        &self.gesture
    }

    #[must_use]
    pub const fn state(&self) -> &ClientState {
        &self.state
    }

    /// Load the first page if the feed is empty, or the next page if every
    /// loaded card has been swiped but more may exist, then start timing the
    /// current card.
    ///
    /// Returns the load outcome, or `None` when no fetch was needed.
    ///
    /// # Errors
    ///
    /// Returns an error if a page cannot be fetched or saved.
    #[instrument(skip(self))]
    pub async fn start(&mut self) -> Result<Option<LoadOutcome>> {
        let (empty, stalled) = {
            let feed = self.state.feed().lock().await;
            (
                feed.products().is_empty(),
                feed.current().is_none() && !feed.is_exhausted(),
            )
        };
        let outcome = if empty {
            let api = self.state.api().clone();
            let outcome = self
                .state
                .feed()
                .reload(|request| async move {
                    api.get_feed(request.cursor.as_deref(), request.limit)
                        .await
                        .map_err(ClientError::from)
                })
                .await?;
            info!(?outcome, "Loaded first feed page");
            Some(outcome)
        } else if stalled {
            let outcome = self.load_more().await?;
            info!(?outcome, "Resumed feed after the last card");
            Some(outcome)
        } else {
            None
        };
        self.start_timer().await;
        Ok(outcome)
    }

    /// The card currently on top.
    pub async fn current(&self) -> Option<Product> {
        self.state.feed().lock().await.current().cloned()
    }

    /// Up to `n` cards behind the current one.
    pub async fn upcoming(&self, n: usize) -> Vec<Product> {
        self.state.feed().lock().await.peek(n).to_vec()
    }

    /// Fetch the next feed page.
    ///
    /// # Errors
    ///
    /// Returns an error if the page cannot be fetched or saved.
    pub async fn load_more(&self) -> Result<LoadOutcome> {
        let api = self.state.api().clone();
        self.state
            .feed()
            .load_more(|request| async move {
                api.get_feed(request.cursor.as_deref(), request.limit)
                    .await
                    .map_err(ClientError::from)
            })
            .await
    }

    pub fn drag_start(&mut self) -> bool {
        self.gesture.drag_start()
    }

    pub fn drag_move(&mut self, offset: f64) {
        self.gesture.drag_move(offset);
    }

    /// Release the card at `offset`.
    ///
    /// Past the threshold the decision is applied and the interpreter is left
    /// exiting until [`SwipeSession::finish_exit`]. Otherwise, or when there
    /// is no card to swipe, the card springs back and nothing changes.
    ///
    /// # Errors
    ///
    /// Returns an error if the decision cannot be saved.
    pub async fn drag_end(&mut self, offset: f64) -> Result<Option<SwipeOutcome>> {
        match self.gesture.drag_end(offset) {
            Some(decision) => self.apply(decision).await,
            None => Ok(None),
        }
    }

    /// Like or pass the current card without a drag, as the buttons do.
    ///
    /// # Errors
    ///
    /// Returns an error if the decision cannot be saved.
    pub async fn swipe(&mut self, decision: SwipeDecision) -> Result<Option<SwipeOutcome>> {
        if !self.gesture.trigger(decision) {
            debug!("Swipe ignored while a card is exiting");
            return Ok(None);
        }
        self.apply(decision).await
    }

    /// The exit animation has finished.
    pub const fn finish_exit(&mut self) -> Option<SwipeDecision> {
        self.gesture.finish_exit()
    }

    /// Report a click on part of the current card.
    pub async fn click(&self, target: &str) {
        if let Some(product) = self.current().await {
            self.state.telemetry().click(product.id, target);
        }
    }

    /// Report the view of the card on screen and wait for pending telemetry.
    pub async fn finish(&mut self) {
        if let Some((product_id, duration)) = self.timer.stop() {
            self.state.telemetry().view(product_id, duration);
        }
        self.state.telemetry().flush().await;
    }

    #[instrument(skip(self), fields(decision = %decision))]
    async fn apply(&mut self, decision: SwipeDecision) -> Result<Option<SwipeOutcome>> {
        let (product, needs_preload) = {
            let mut feed = self.state.feed().lock().await;
            let Some(product) = feed.current().cloned() else {
                debug!("Swipe on an empty feed");
                self.gesture.finish_exit();
                return Ok(None);
            };
            let needs_preload = feed.needs_preload(PRELOAD_THRESHOLD);
            let recorded = product.clone();
            feed.update(|feed| {
                if decision.is_like() {
                    feed.record_like(recorded);
                } else {
                    feed.record_pass(recorded);
                }
                feed.advance();
            })?;
            (product, needs_preload)
        };

        if decision.is_like() {
            let saved = product.clone();
            self.state
                .profile()
                .lock()
                .await
                .update(|profile| profile.add_saved_item(saved))?;
        }

        let telemetry = self.state.telemetry();
        if let Some((product_id, duration)) = self.timer.stop() {
            telemetry.view(product_id, duration);
        }
        telemetry.swipe(product.id.clone(), decision);
        add_breadcrumb(
            "swipe",
            if decision.is_like() { "Liked product" } else { "Passed product" },
            Some(&[("product_id", product.id.as_str())]),
        );
        debug!(product_id = %product.id, "Swipe applied");

        let preload = if needs_preload {
            match self.load_more().await {
                Ok(outcome) => Some(outcome),
                Err(e) => {
                    capture_client_error(&e, Action::LoadFeed);
                    None
                }
            }
        } else {
            None
        };

        self.start_timer().await;
        Ok(Some(SwipeOutcome {
            decision,
            product,
            preload,
        }))
    }

    async fn start_timer(&mut self) {
        let current = self
            .state
            .feed()
            .lock()
            .await
            .current()
            .map(|p| p.id.clone());
        match current {
            Some(id) => {
                if let Some((previous, duration)) = self.timer.start(id) {
                    self.state.telemetry().view(previous, duration);
                }
            }
            None => {
                if let Some((previous, duration)) = self.timer.stop() {
                    self.state.telemetry().view(previous, duration);
                }
            }
        }
    }
}
