//! Domain Layer
//!
//! Records mirrored from the remote store, the signed-in identity, price
//! parsing, and the error taxonomy surfaced to callers.
//! This layer has NO I/O (serde only).

mod error;
mod identity;
mod price;
mod product;

pub use error::ClientError;
pub use identity::Identity;
pub use price::{format_amount, parse_price, ParsedPrice, PriceError};
pub use product::{PriceField, ProductId, TrackedProduct};
