//! Tracked-Product Client
//!
//! Keeps the signed-in user's product list in step with the remote store.
//!
//! - `fetch_all` replaces the list wholesale with the store's copy
//! - `add` submits a product, then refetches instead of appending locally
//! - `request_delete` / `confirm_delete` / `cancel_delete` run the delete
//!   confirmation; a confirmed delete removes the record locally
//!
//! Each list fetch carries a generation number and only the newest one is
//! applied. Deletes that complete while a fetch is in flight are remembered
//! so that fetch cannot bring the record back.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::domain::{ClientError, Identity, ProductId};
use crate::repository::{CreateProductRequest, ProductStore};
use crate::store::{AddForm, ClientState, PendingDelete, ProductRow};


struct Inner {
    view: ClientState,
    /// Deletes applied locally, tagged with the fetch generation current at the time
    deleted: Vec<(u64, ProductId)>,
}

pub struct TrackedProductClient<S: ProductStore> {
    store: Arc<S>,
    identity: Identity,
    inner: Mutex<Inner>,
    generation: AtomicU64,
    mounted: AtomicBool,
}

impl<S: ProductStore> TrackedProductClient<S> {
    /// Create a client scoped to `identity`
    ///
    /// Fails with `MissingIdentity` when the uid is blank.
    pub fn new(store: Arc<S>, identity: Identity) -> Result<Self, ClientError> {
        if !identity.is_resolved() {
            return Err(ClientError::MissingIdentity);
        }

        Ok(Self {
            store,
            identity,
            inner: Mutex::new(Inner {
                view: ClientState::new(),
                deleted: Vec::new(),
            }),
            generation: AtomicU64::new(0),
            mounted: AtomicBool::new(true),
        })
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub async fn snapshot(&self) -> ClientState {
        self.inner.lock().await.view.clone()
    }

    pub async fn rows(&self, currency_symbol: &str) -> Vec<ProductRow> {
        self.inner.lock().await.view.rows(currency_symbol)
    }

    /// Position of the pending delete in the current list
    pub async fn pending_delete_position(&self) -> Option<usize> {
        self.inner.lock().await.view.pending_delete_index()
    }

    /// Tear the client down; responses arriving afterwards are dropped
    pub fn unmount(&self) {
        debug!(user = %self.identity.uid, "client unmounted");
        self.mounted.store(false, Ordering::SeqCst);
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }

    // ========================
    // Remote Operations
    // ========================

    /// Replace the local list with the store's copy
    ///
    /// A response is applied only if no newer fetch was issued meanwhile.
    pub async fn fetch_all(&self) -> Result<(), ClientError> {
        if !self.is_mounted() {
            return Ok(());
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner.lock().await.view.error = None;

        debug!(user = %self.identity.uid, generation, "fetching tracked products");
        let result = self.store.list_products(&self.identity.uid).await;

        let mut inner = self.inner.lock().await;
        if !self.is_mounted() || self.generation.load(Ordering::SeqCst) != generation {
            debug!(generation, "discarding stale product list");
            return result.map(|_| ()).map_err(|_| ClientError::FetchFailed);
        }

        inner.view.loading = false;
        match result {
            Ok(mut items) => {
                let deleted = std::mem::take(&mut inner.deleted);
                items.retain(|item| {
                    !deleted
                        .iter()
                        .any(|(at, id)| *at >= generation && id == &item.id)
                });
                info!(count = items.len(), generation, "loaded tracked products");
                inner.view.items = items;
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "failed to load tracked products");
                let err = ClientError::FetchFailed;
                inner.view.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Submit a product page to track, then resynchronize
    ///
    /// Both fields must be non-empty; otherwise nothing is sent. On success
    /// the list is refetched and the add dialog is cleared and closed, even
    /// if that refetch fails (its error is recorded separately).
    pub async fn add(&self, url: &str, target_price: &str) -> Result<(), ClientError> {
        if !self.is_mounted() {
            return Ok(());
        }

        let url = url.trim();
        let target_price = target_price.trim();
        if url.is_empty() || target_price.is_empty() {
            let err = ClientError::required_fields();
            self.record_error(&err).await;
            return Err(err);
        }

        self.clear_error().await;

        let request = CreateProductRequest {
            url: url.to_string(),
            user: self.identity.uid.clone(),
            price: target_price.to_string(),
        };
        debug!(url = %request.url, price = %request.price, "submitting product");

        if let Err(err) = self.store.create_product(&request).await {
            warn!(error = %err, "failed to add product");
            let err = ClientError::CreateFailed {
                message: err.server_message().map(str::to_string),
            };
            self.record_error(&err).await;
            return Err(err);
        }
        info!(url = %request.url, "product submitted for tracking");

        let refreshed = self.fetch_all().await;

        if self.is_mounted() {
            self.inner.lock().await.view.add_form = AddForm::default();
        }
        if let Err(err) = refreshed {
            debug!(error = %err, "refresh after add failed");
        }
        Ok(())
    }

    /// `add` with the values currently in the dialog
    pub async fn submit_add(&self) -> Result<(), ClientError> {
        let form = self.inner.lock().await.view.add_form.clone();
        self.add(&form.url, &form.target_price).await
    }

    /// Delete the product picked by `request_delete`
    ///
    /// No-op without a pending delete. The prompt is closed on every exit.
    pub async fn confirm_delete(&self) -> Result<(), ClientError> {
        if !self.is_mounted() {
            return Ok(());
        }

        let pending = {
            let mut inner = self.inner.lock().await;
            let Some(pending) = inner.view.pending_delete.clone() else {
                return Ok(());
            };

            if inner.view.position_of(&pending.product_id).is_none() {
                warn!(id = %pending.product_id, "pending delete no longer in list");
                inner.view.pending_delete = None;
                let err = ClientError::DeleteFailed;
                inner.view.error = Some(err.to_string());
                return Err(err);
            }

            inner.view.error = None;
            pending
        };

        debug!(id = %pending.product_id, "deleting product");
        let result = self.store.delete_product(&pending.product_id).await;

        let mut inner = self.inner.lock().await;
        if !self.is_mounted() {
            return result.map_err(|_| ClientError::DeleteFailed);
        }

        if inner.view.pending_delete.as_ref() == Some(&pending) {
            inner.view.pending_delete = None;
        }

        match result {
            Ok(()) => {
                let generation = self.generation.load(Ordering::SeqCst);
                inner.deleted.push((generation, pending.product_id.clone()));
                inner.view.remove_item(&pending.product_id);
                info!(id = %pending.product_id, "product deleted");
                Ok(())
            }
            Err(err) => {
                warn!(id = %pending.product_id, error = %err, "failed to delete product");
                let err = ClientError::DeleteFailed;
                inner.view.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    // ========================
    // Local Transitions
    // ========================

    /// Ask for confirmation before deleting the product at `index`
    pub async fn request_delete(&self, index: usize) -> Result<(), ClientError> {
        let mut inner = self.inner.lock().await;
        let Some(product_id) = inner.view.items.get(index).map(|item| item.id.clone()) else {
            return Err(ClientError::ValidationFailed(format!(
                "No product at position {}.",
                index
            )));
        };

        inner.view.pending_delete = Some(PendingDelete { product_id });
        Ok(())
    }

    pub async fn cancel_delete(&self) {
        self.inner.lock().await.view.pending_delete = None;
    }

    pub async fn open_add_dialog(&self) {
        self.inner.lock().await.view.add_form.open = true;
    }

    /// Hide the dialog, keeping whatever was typed
    pub async fn close_add_dialog(&self) {
        self.inner.lock().await.view.add_form.open = false;
    }

    pub async fn set_new_url(&self, url: impl Into<String>) {
        self.inner.lock().await.view.add_form.url = url.into();
    }

    pub async fn set_target_price(&self, price: impl Into<String>) {
        self.inner.lock().await.view.add_form.target_price = price.into();
    }

    async fn record_error(&self, err: &ClientError) {
        if self.is_mounted() {
            self.inner.lock().await.view.error = Some(err.to_string());
        }
    }

    async fn clear_error(&self) {
        self.inner.lock().await.view.error = None;
    }
}
