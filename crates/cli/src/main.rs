//! Swipey CLI - drive the storefront client from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Show the current card and the next two
//! swipey feed show
//!
//! # Release a drag 120px to the right (like)
//! swipey feed swipe 120
//!
//! # Add a product to the cart and check out
//! swipey cart add 42
//! swipey checkout --name "Ada" --line1 "1 Main St" --city London --postal-code N1 --country GB
//!
//! # Complete onboarding
//! swipey profile setup --name Ada --age 30 --gender Female --style minimal --style vintage
//! ```
//!
//! # Commands
//!
//! - `feed` - Discovery feed and swiping
//! - `cart` - Local cart
//! - `checkout` - Submit the cart as an order
//! - `orders` - Order history
//! - `saved` - Saved (bookmarked) products
//! - `profile` - Onboarding profile
//! - `dashboard` - Brand catalogue management

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use swipey_client::error::{Action, capture_client_error};
use swipey_client::{ClientConfig, ClientError, ClientState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod output;

use commands::cart::CartAction;
use commands::checkout::CheckoutArgs;
use commands::dashboard::DashboardAction;
use commands::feed::FeedAction;
use commands::orders::OrdersAction;
use commands::profile::ProfileAction;
use commands::saved::SavedAction;

#[derive(Parser)]
#[command(name = "swipey")]
#[command(author, version, about = "Swipe-driven product discovery from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse and swipe the discovery feed
    Feed {
        #[command(subcommand)]
        action: FeedAction,
    },
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Submit the cart as an order
    Checkout(CheckoutArgs),
    /// Show past orders
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
    /// Manage saved products
    Saved {
        #[command(subcommand)]
        action: SavedAction,
    },
    /// Manage the user profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
    /// Manage the brand catalogue
    Dashboard {
        #[command(subcommand)]
        action: DashboardAction,
    },
}

impl Commands {
    /// What a failure of this command should be reported as.
    const fn action(&self) -> Action {
        match self {
            Self::Feed { .. } => Action::LoadFeed,
            Self::Cart { .. } | Self::Saved { .. } | Self::Profile { .. } => Action::SaveLocalState,
            Self::Checkout(_) => Action::PlaceOrder,
            Self::Orders { .. } => Action::LoadOrders,
            Self::Dashboard { action } => action.action(),
        }
    }
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ClientConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        tracing::Level::TRACE => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "swipey_client=info,swipey_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing();
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(2);
        }
    };

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = init_sentry(&config);
    init_tracing();

    let action = cli.command.action();
    if let Err(e) = run(cli, config).await {
        let message = capture_client_error(&e, action);
        output::failure(&message);
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: ClientConfig) -> Result<(), ClientError> {
    let state = ClientState::new(config)?;

    match cli.command {
        Commands::Feed { action } => commands::feed::run(&state, action).await?,
        Commands::Cart { action } => commands::cart::run(&state, action).await?,
        Commands::Checkout(args) => commands::checkout::run(&state, args).await?,
        Commands::Orders { action } => commands::orders::run(&state, action).await?,
        Commands::Saved { action } => commands::saved::run(&state, action).await?,
        Commands::Profile { action } => commands::profile::run(&state, action).await?,
        Commands::Dashboard { action } => commands::dashboard::run(&state, action).await?,
    }

    state.telemetry().flush().await;
    Ok(())
}
