//! # Catalog Client
//!
//! Headless client core for a personal-collections catalog: users keep
//! collections of items with custom typed fields, tag and comment on items,
//! like them and search across everything.
//!
//! The client is one store over [`AppState`]. Each feature in [`features`]
//! owns a slice of the state, talks to the server through [`CatalogApi`]
//! and records the lifecycle of every request it makes. Pages read state
//! through selectors and decide what to show with [`view`].
//!
//! ## Example
//!
//! ```ignore
//! let app = App::bootstrap(Config::from_env()?)?;
//! app.dispatch(
//!     AuthAction::Login(LoginRequest { email, password }),
//!     Duration::from_secs(10),
//! )
//! .await?;
//! let name = app.state(|s| s.auth.data.name.clone()).await;
//! app.shutdown().await?;
//! ```

pub mod api;
pub mod app;
pub mod config;
pub mod environment;
pub mod error;
pub mod features;
pub mod i18n;
pub mod pager;
pub mod routes;
pub mod storage;
pub mod validation;
pub mod view;

pub use api::{CatalogApi, HttpApi};
pub use app::{App, AppAction, AppReducer, AppState, AppStore, SessionExpiryListener};
pub use config::Config;
pub use environment::AppEnvironment;
pub use error::{ClientError, Result};
pub use storage::FileStorage;
