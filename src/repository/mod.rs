//! Repository Layer
//!
//! Remote store and authentication boundaries, plus the HTTP store.

mod http_backend;
mod traits;


pub use http_backend::HttpBackend;
pub use traits::{
    AuthError, AuthProvider, CreateProductRequest, DeleteProductRequest, ProductStore,
    RegisterUserRequest, StoreError, StoreResult, UserRegistry,
};
