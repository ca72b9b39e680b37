//! Order history commands.

use clap::Subcommand;
use swipey_client::ClientState;
use swipey_client::error::Result;
use swipey_core::OrderId;

use crate::output;

#[derive(Subcommand)]
pub enum OrdersAction {
    /// List past orders
    List,
    /// Show one order
    Get { id: OrderId },
}

pub async fn run(state: &ClientState, action: OrdersAction) -> Result<()> {
    match action {
        OrdersAction::List => {
            let orders = state.api().get_order_history().await?;
            if orders.is_empty() {
                output::line("No orders yet");
            }
            for order in &orders {
                output::order(order);
            }
        }
        OrdersAction::Get { id } => {
            let order = state.api().get_order(&id).await?;
            output::order(&order);
            for line in &order.items {
                output::line(&format!("  {} x{}", line.product_id, line.quantity));
            }
        }
    }
    Ok(())
}
