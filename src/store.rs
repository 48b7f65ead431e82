//! Client State Store
//!
//! Everything the dashboard displays for the signed-in user: the mirrored
//! product list and the loading / error / confirmation phases around it.

use crate::domain::{format_amount, ProductId, TrackedProduct};

/// Delete awaiting user confirmation
///
/// Held by product id so a reordered list cannot redirect the delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelete {
    pub product_id: ProductId,
}

/// Fields of the "add product" dialog
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddForm {
    pub url: String,
    pub target_price: String,
    pub open: bool,
}

/// Tracked-product state for one identity
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientState {
    /// Products in store response order
    pub items: Vec<TrackedProduct>,
    /// True from creation until the first fetch resolves
    pub loading: bool,
    /// Message of the most recent failed operation
    pub error: Option<String>,
    pub pending_delete: Option<PendingDelete>,
    pub add_form: AddForm,
}

impl ClientState {
    pub fn new() -> Self {
        Self {
            loading: true,
            ..Default::default()
        }
    }

    /// Whether the delete confirmation prompt is showing
    pub fn confirming_delete(&self) -> bool {
        self.pending_delete.is_some()
    }

    /// Current position of the pending delete, resolved against `items`
    pub fn pending_delete_index(&self) -> Option<usize> {
        self.pending_delete
            .as_ref()
            .and_then(|pending| self.position_of(&pending.product_id))
    }

    pub fn position_of(&self, id: &ProductId) -> Option<usize> {
        self.items.iter().position(|item| &item.id == id)
    }

    /// Remove the product with `id`; returns whether one was removed
    pub fn remove_item(&mut self, id: &ProductId) -> bool {
        match self.position_of(id) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    /// Rows ready for display, prices formatted to two decimals
    pub fn rows(&self, currency_symbol: &str) -> Vec<ProductRow> {
        self.items
            .iter()
            .map(|item| ProductRow::from_product(item, currency_symbol))
            .collect()
    }
}

/// Display form of a tracked product
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRow {
    pub id: ProductId,
    pub name: String,
    pub image: String,
    pub url: String,
    pub current_price: String,
    pub target_price: String,
    /// Whether the current price is at or below the target; `None` when
    /// either price is unreadable
    pub target_reached: Option<bool>,
}

impl ProductRow {
    /// Unparseable prices are shown as sent
    pub fn from_product(product: &TrackedProduct, currency_symbol: &str) -> Self {
        let current_price = product
            .current_price_value()
            .map(|amount| format_amount(amount, currency_symbol))
            .unwrap_or_else(|_| product.current_price.clone());
        let target_price = product
            .target_price_value()
            .map(|amount| format_amount(amount, currency_symbol))
            .unwrap_or_else(|_| product.target_price.to_string());

        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            image: product.image.clone(),
            url: product.url.clone(),
            current_price,
            target_price,
            target_reached: product.at_or_below_target(),
        }
    }
}
