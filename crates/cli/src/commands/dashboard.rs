//! Brand dashboard commands: catalogue CRUD and summary metrics.
//!
//! # Usage
//!
//! ```bash
//! swipey dashboard list
//! swipey dashboard create --name "Linen Shirt" --description "Breezy" --price 49.99 \
//!     --category Tops --image-url https://cdn.example/shirt.jpg --tag casual
//! swipey dashboard update 12 --price 39.99
//! swipey dashboard delete 12
//! swipey dashboard summary
//! ```

use clap::{Args, Subcommand};
use rust_decimal::Decimal;
use swipey_client::ClientState;
use swipey_client::error::{Action, ClientError, Result};
use swipey_core::{ProductId, ProductInput, ProductPatch};

use crate::output;

#[derive(Subcommand)]
pub enum DashboardAction {
    /// List catalogue products
    List,
    /// Show one product
    Get { id: ProductId },
    /// Add a product
    Create(CreateArgs),
    /// Change fields of a product
    Update {
        id: ProductId,
        #[command(flatten)]
        fields: UpdateArgs,
    },
    /// Delete a product
    Delete { id: ProductId },
    /// Show headline metrics
    Summary,
}

impl DashboardAction {
    pub const fn action(&self) -> Action {
        match self {
            Self::List | Self::Get { .. } | Self::Summary => Action::LoadProducts,
            Self::Create(_) | Self::Update { .. } | Self::Delete { .. } => Action::SaveCatalogue,
        }
    }
}

#[derive(Args)]
pub struct CreateArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    description: String,
    #[arg(long)]
    price: Decimal,
    #[arg(long)]
    category: String,
    #[arg(long)]
    image_url: String,
    /// Style tag, repeatable
    #[arg(long = "tag")]
    tags: Vec<String>,
}

#[derive(Args)]
pub struct UpdateArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    price: Option<Decimal>,
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    image_url: Option<String>,
    /// Replaces the tags when given, repeatable
    #[arg(long = "tag")]
    tags: Vec<String>,
}

impl From<CreateArgs> for ProductInput {
    fn from(args: CreateArgs) -> Self {
        Self {
            name: args.name,
            description: args.description,
            price: args.price,
            category: args.category,
            image_url: args.image_url,
            tags: args.tags,
        }
    }
}

impl From<UpdateArgs> for ProductPatch {
    fn from(args: UpdateArgs) -> Self {
        Self {
            name: args.name,
            description: args.description,
            price: args.price,
            category: args.category,
            image_url: args.image_url,
            tags: (!args.tags.is_empty()).then_some(args.tags),
        }
    }
}

fn check_price(price: Decimal) -> Result<()> {
    if price.is_sign_negative() {
        return Err(ClientError::InvalidInput("price cannot be negative".to_string()));
    }
    Ok(())
}

pub async fn run(state: &ClientState, action: DashboardAction) -> Result<()> {
    let api = state.api();
    match action {
        DashboardAction::List => output::product_list(&api.list_dashboard_products().await?),
        DashboardAction::Get { id } => output::product_detail(&api.get_dashboard_product(&id).await?),
        DashboardAction::Create(args) => {
            check_price(args.price)?;
            let product = api.create_product(&args.into()).await?;
            output::line("Created:");
            output::product_detail(&product);
        }
        DashboardAction::Update { id, fields } => {
            let patch = ProductPatch::from(fields);
            if patch.is_empty() {
                return Err(ClientError::InvalidInput(
                    "nothing to update, pass at least one field".to_string(),
                ));
            }
            if let Some(price) = patch.price {
                check_price(price)?;
            }
            let product = api.update_product(&id, &patch).await?;
            output::line("Updated:");
            output::product_detail(&product);
        }
        DashboardAction::Delete { id } => {
            api.delete_product(&id).await?;
            output::line(&format!("Deleted {id}"));
        }
        DashboardAction::Summary => output::summary(&api.get_dashboard_summary().await?),
    }
    Ok(())
}
