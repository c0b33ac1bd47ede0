//! Catalog command line client
//!
//! Every subcommand bootstraps the client, dispatches one action, waits for
//! it to settle and prints the affected state as JSON.
//!
//! # Usage
//!
//! ```bash
//! catalog login --email alice@example.com --password secret
//! catalog home
//! catalog search lamp --items
//! catalog my-collections --page 2
//! catalog logout
//! ```

use anyhow::Context;
use catalog_client::api::{LoginRequest, PageRequest, SearchRequest};
use catalog_client::features::admin::AdminAction;
use catalog_client::features::auth::AuthAction;
use catalog_client::features::collections::CollectionsAction;
use catalog_client::features::home::HomeAction;
use catalog_client::features::items::ItemsAction;
use catalog_client::features::preferences::PreferencesAction;
use catalog_client::features::search::SearchAction;
use catalog_client::i18n::Locale;
use catalog_client::pager::{DEFAULT_COUNT, DEFAULT_PAGE};
use catalog_client::validation::validate_login;
use catalog_client::{App, AppAction, Config};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// How many tags, latest items and largest collections the home page shows
const HOME_TAGS: u32 = 30;
const HOME_LATEST_ITEMS: u32 = 10;
const HOME_LARGEST_COLLECTIONS: u32 = 5;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Parser)]
#[command(name = "catalog", version, about = "Personal collections catalog client")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Sign in and remember the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the session
    Logout,
    /// Popular tags, latest items and largest collections
    Home,
    /// Search collections, or items with --items
    Search {
        text: String,
        #[arg(long)]
        items: bool,
        #[arg(long, default_value_t = DEFAULT_PAGE)]
        page: u32,
        #[arg(long, default_value_t = DEFAULT_COUNT)]
        count: u32,
    },
    /// Collections of the signed-in user
    MyCollections {
        #[arg(long, default_value_t = DEFAULT_PAGE)]
        page: u32,
        #[arg(long, default_value_t = DEFAULT_COUNT)]
        count: u32,
    },
    /// Registered users (admins only)
    Users {
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        count: Option<u32>,
    },
    /// An item with its comments
    Item { id: i64 },
    /// Switch the interface language
    Locale { locale: Locale },
    /// Switch between light and dark
    Theme,
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn dispatch(app: &App, action: impl Into<AppAction>) -> anyhow::Result<()> {
    app.dispatch(action, REQUEST_TIMEOUT).await?;
    Ok(())
}

async fn run(app: &App, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Login { email, password } => {
            let credentials = LoginRequest { email, password };
            validate_login(&credentials)?;
            dispatch(app, AuthAction::Login(credentials)).await?;
            print_json(&app.state(|s| s.auth.clone()).await)
        },
        Command::Logout => {
            dispatch(app, AuthAction::Logout).await?;
            print_json(&app.state(|s| s.auth.clone()).await)
        },
        Command::Home => {
            dispatch(app, HomeAction::LoadTags(HOME_TAGS)).await?;
            dispatch(app, HomeAction::LoadLatestItems(HOME_LATEST_ITEMS)).await?;
            dispatch(app, HomeAction::LoadLargestCollections(HOME_LARGEST_COLLECTIONS)).await?;
            print_json(&app.state(|s| s.home.clone()).await)
        },
        Command::Search {
            text,
            items,
            page,
            count,
        } => {
            let request = SearchRequest {
                search_string: text,
                page,
                count,
            };
            let action = if items {
                SearchAction::Items(request)
            } else {
                SearchAction::Collections(request)
            };
            dispatch(app, action).await?;
            print_json(&app.state(|s| s.search.clone()).await)
        },
        Command::MyCollections { page, count } => {
            dispatch(app, CollectionsAction::Load(PageRequest { page, count })).await?;
            print_json(&app.state(|s| s.collections.clone()).await)
        },
        Command::Users { page, count } => {
            dispatch(app, AdminAction::LoadUsers { page, count }).await?;
            print_json(&app.state(|s| s.admin.clone()).await)
        },
        Command::Item { id } => {
            dispatch(app, ItemsAction::Load(id)).await?;
            print_json(&app.state(|s| s.items.clone()).await)
        },
        Command::Locale { locale } => {
            dispatch(app, PreferencesAction::SetLocale(locale)).await?;
            print_json(&app.state(|s| s.preferences.clone()).await)
        },
        Command::Theme => {
            dispatch(app, PreferencesAction::ToggleTheme).await?;
            print_json(&app.state(|s| s.preferences.clone()).await)
        },
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "catalog=info,catalog_client=info,catalog_runtime=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;
    let app = App::bootstrap(config).context("Failed to start client")?;

    let result = run(&app, cli.command).await;
    app.shutdown().await?;
    result
}
