//! Price Watch Client
//!
//! Client-side synchronization layer of a price-tracking dashboard.
//!
//! Layered architecture:
//! - domain: tracked products, identity, prices, errors
//! - repository: remote store and authentication boundaries, HTTP store
//! - store: state the dashboard renders
//! - client: tracked-product list kept in step with the remote store
//! - session: signup, login and logout flows

pub mod client;
pub mod config;
pub mod domain;
pub mod logging;
pub mod repository;
pub mod session;
pub mod store;

#[cfg(test)]
mod fakes;

pub use client::TrackedProductClient;
pub use config::{BackendConfig, ConfigError};
pub use domain::{ClientError, Identity, PriceField, ProductId, TrackedProduct};
pub use repository::{
    AuthError, AuthProvider, HttpBackend, ProductStore, StoreError, StoreResult, UserRegistry,
};
pub use session::{SessionController, SessionState, SignupForm};
pub use store::{AddForm, ClientState, PendingDelete, ProductRow};
