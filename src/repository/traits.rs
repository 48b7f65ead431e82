//! Repository Layer - Core Traits
//!
//! Abstract interfaces for the remote store and the authentication
//! provider. Implementations can use HTTP, in-memory fakes, etc.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::{Identity, ProductId, TrackedProduct};

/// Common result type for remote store calls
pub type StoreResult<T> = Result<T, StoreError>;

/// Failures at the remote store boundary
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Request completed with an unexpected status
    #[error("remote store returned status {status}")]
    Status {
        status: u16,
        /// `message` field of the error body, when the store sent one
        message: Option<String>,
    },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("malformed response: {0}")]
    Decode(String),

    #[error("invalid endpoint url: {0}")]
    InvalidUrl(String),
}

impl StoreError {
    pub fn server_message(&self) -> Option<&str> {
        match self {
            StoreError::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

/// Body of the create request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateProductRequest {
    pub url: String,
    pub user: String,
    /// Target price exactly as entered; the store parses it
    pub price: String,
}

/// Body of the delete request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteProductRequest {
    pub id: String,
}

/// Body of the backend registration sent after signup
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterUserRequest {
    pub user: String,
    pub name: String,
    pub token: String,
    pub status: String,
}

/// Remote store holding the canonical tracked-product list
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// All products tracked for `user`, in store order
    async fn list_products(&self, user: &str) -> StoreResult<Vec<TrackedProduct>>;

    /// Ask the store to start tracking a product page
    async fn create_product(&self, request: &CreateProductRequest) -> StoreResult<()>;

    /// Stop tracking a product
    async fn delete_product(&self, id: &ProductId) -> StoreResult<()>;
}

/// Backend user registry, notified once per new account
#[async_trait]
pub trait UserRegistry: Send + Sync {
    async fn register_user(&self, request: &RegisterUserRequest) -> StoreResult<()>;
}

/// Failures at the authentication provider boundary
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("authentication provider error: {0}")]
    Provider(String),

    #[error("no user is signed in")]
    NoCurrentUser,
}

/// Third-party authentication provider
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn signup(&self, email: &str, password: &str) -> Result<Identity, AuthError>;

    /// Set the display name of the signed-in user
    async fn update_display_name(&self, name: &str) -> Result<Identity, AuthError>;

    async fn login(&self, email: &str, password: &str) -> Result<Identity, AuthError>;

    async fn logout(&self) -> Result<(), AuthError>;

    fn current_user(&self) -> Option<Identity>;
}
