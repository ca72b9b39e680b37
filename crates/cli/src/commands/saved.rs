//! Saved product commands.

use clap::Subcommand;
use swipey_client::ClientState;
use swipey_client::error::Result;
use swipey_core::ProductId;

use crate::output;

#[derive(Subcommand)]
pub enum SavedAction {
    /// List saved products
    List,
    /// Save a product
    Add { id: ProductId },
    /// Unsave a product
    Remove { id: ProductId },
}

pub async fn run(state: &ClientState, action: SavedAction) -> Result<()> {
    match action {
        SavedAction::List => {
            output::product_list(state.profile().lock().await.saved_items());
        }
        SavedAction::Add { id } => {
            if state.save_product(&id).await? {
                output::line(&format!("Saved {id}"));
            } else {
                output::line(&format!("{id} is already saved"));
            }
        }
        SavedAction::Remove { id } => {
            let removed = state
                .profile()
                .lock()
                .await
                .update(|profile| profile.remove_saved_item(&id))?;
            if removed {
                output::line(&format!("Removed {id}"));
            } else {
                output::line(&format!("{id} was not saved"));
            }
        }
    }
    Ok(())
}
