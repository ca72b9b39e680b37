//! Discovery feed commands.
//!
//! # Usage
//!
//! ```bash
//! swipey feed show
//! swipey feed swipe 120     # like
//! swipey feed swipe -95     # pass
//! swipey feed swipe 40      # springs back
//! swipey feed like
//! swipey feed more
//! swipey feed reset
//! ```

use clap::Subcommand;
use swipey_client::ClientState;
use swipey_client::discover::{SwipeOutcome, SwipeSession};
use swipey_client::error::Result;
use swipey_client::gesture::SWIPE_THRESHOLD;
use swipey_client::stores::{FeedState, LoadOutcome};
use swipey_core::SwipeDecision;

use crate::output;

/// Cards shown behind the current one.
const PREVIEW_DEPTH: usize = 2;

#[derive(Subcommand)]
pub enum FeedAction {
    /// Show the current card and the next two
    Show,
    /// Release a drag at OFFSET pixels (positive likes, negative passes)
    Swipe {
        #[arg(allow_negative_numbers = true)]
        offset: f64,
    },
    /// Like the current card
    Like,
    /// Pass on the current card
    Pass,
    /// Fetch the next page
    More,
    /// Clear the feed and its like/pass history
    Reset,
}

pub async fn run(state: &ClientState, action: FeedAction) -> Result<()> {
    if matches!(action, FeedAction::Reset) {
        state.feed().lock().await.update(FeedState::reset)?;
        output::line("Feed cleared");
        return Ok(());
    }

    let mut session = SwipeSession::new(state.clone());
    session.start().await?;

    match action {
        FeedAction::Show => show(&session).await,
        FeedAction::Swipe { offset } => {
            if session.current().await.is_none() {
                output::line("No more products");
            } else {
                session.drag_start();
                session.drag_move(offset);
                match session.drag_end(offset).await? {
                    Some(outcome) => report(&outcome),
                    None => output::line(&format!(
                        "{offset}px is within the {SWIPE_THRESHOLD}px threshold, card springs back"
                    )),
                }
                session.finish_exit();
                show(&session).await;
            }
        }
        FeedAction::Like | FeedAction::Pass => {
            let decision = if matches!(action, FeedAction::Like) {
                SwipeDecision::Like
            } else {
                SwipeDecision::Pass
            };
            match session.swipe(decision).await? {
                Some(outcome) => report(&outcome),
                None => output::line("No more products"),
            }
            session.finish_exit();
            show(&session).await;
        }
        FeedAction::More => match session.load_more().await? {
            LoadOutcome::Loaded(count) => output::line(&format!("Loaded {count} new product(s)")),
            LoadOutcome::AlreadyLoading => output::line("A page is already loading"),
            LoadOutcome::Exhausted => output::line("No more pages"),
        },
        FeedAction::Reset => {}
    }

    session.finish().await;
    Ok(())
}

async fn show(session: &SwipeSession) {
    let Some(current) = session.current().await else {
        output::line("No more products");
        return;
    };
    output::product_detail(&current);

    let upcoming = session.upcoming(PREVIEW_DEPTH).await;
    if !upcoming.is_empty() {
        output::line("Up next:");
        for product in &upcoming {
            output::line(&format!("  {}", output::product_summary(product)));
        }
    }
}

fn report(outcome: &SwipeOutcome) {
    let verb = match outcome.decision {
        SwipeDecision::Like => "Liked and saved",
        SwipeDecision::Pass => "Passed",
    };
    output::line(&format!("{verb} {}", output::product_summary(&outcome.product)));
    if let Some(LoadOutcome::Loaded(count)) = outcome.preload {
        output::line(&format!("Preloaded {count} more product(s)"));
    }
}
