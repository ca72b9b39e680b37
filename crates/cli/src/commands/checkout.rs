//! Checkout command.

use clap::Args;
use swipey_client::ClientState;
use swipey_client::error::Result;
use swipey_core::{PaymentMethod, ShippingAddress};

use crate::output;

#[derive(Args)]
pub struct CheckoutArgs {
    /// Recipient name
    #[arg(long)]
    name: String,
    /// Street address
    #[arg(long)]
    line1: String,
    /// Apartment, suite, etc.
    #[arg(long)]
    line2: Option<String>,
    #[arg(long)]
    city: String,
    #[arg(long)]
    postal_code: String,
    /// ISO country code
    #[arg(long)]
    country: String,
    /// Tokenized card; cash on delivery when omitted
    #[arg(long)]
    card_token: Option<String>,
}

impl CheckoutArgs {
    fn into_parts(self) -> (ShippingAddress, PaymentMethod) {
        let payment = self
            .card_token
            .map_or(PaymentMethod::CashOnDelivery, |token| PaymentMethod::Card { token });
        let address = ShippingAddress {
            name: self.name,
            line1: self.line1,
            line2: self.line2,
            city: self.city,
            postal_code: self.postal_code,
            country: self.country,
        };
        (address, payment)
    }
}

pub async fn run(state: &ClientState, args: CheckoutArgs) -> Result<()> {
    let (address, payment) = args.into_parts();
    let receipt = state.checkout(address, payment).await?;
    output::receipt(&receipt);
    Ok(())
}
