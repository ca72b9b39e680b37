//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! swipey cart list
//! swipey cart add 42
//! swipey cart set 42 3
//! swipey cart remove 42
//! swipey cart clear
//! ```

use clap::Subcommand;
use swipey_client::ClientState;
use swipey_client::error::Result;
use swipey_client::stores::Cart;
use swipey_core::ProductId;

use crate::output;

#[derive(Subcommand)]
pub enum CartAction {
    /// Show the cart lines and total
    List,
    /// Add one unit of a product
    Add { id: ProductId },
    /// Remove a product entirely
    Remove { id: ProductId },
    /// Set the quantity of a product already in the cart (0 removes it)
    Set {
        id: ProductId,
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Empty the cart
    Clear,
}

pub async fn run(state: &ClientState, action: CartAction) -> Result<()> {
    match action {
        CartAction::List => {}
        CartAction::Add { id } => {
            let quantity = state.add_to_cart(&id).await?;
            output::line(&format!("Added {id} (quantity {quantity})"));
        }
        CartAction::Remove { id } => {
            let removed = state.cart().lock().await.update(|cart| cart.remove(&id))?;
            if !removed {
                output::line(&format!("{id} is not in the cart"));
            }
        }
        CartAction::Set { id, quantity } => {
            let present = state.cart().lock().await.update(|cart| {
                let present = cart.contains(&id);
                cart.set_quantity(&id, quantity);
                present
            })?;
            if !present {
                output::line(&format!("{id} is not in the cart"));
            }
        }
        CartAction::Clear => state.cart().lock().await.update(Cart::clear)?,
    }

    let cart = state.cart().lock().await;
    output::cart(cart.state());
    Ok(())
}
