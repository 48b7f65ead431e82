//! In-memory fakes of the remote store and authentication provider.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::domain::{Identity, PriceField, ProductId, TrackedProduct};
use crate::repository::{
    AuthError, AuthProvider, CreateProductRequest, ProductStore, RegisterUserRequest, StoreError,
    StoreResult, UserRegistry,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    List(String),
    Create(CreateProductRequest),
    Delete(ProductId),
    Register(RegisterUserRequest),
}

struct Scripted<T> {
    gate: Option<oneshot::Receiver<()>>,
    result: StoreResult<T>,
}

/// Store answering from per-endpoint scripts; empty scripts succeed
#[derive(Default)]
pub struct FakeStore {
    lists: Mutex<VecDeque<Scripted<Vec<TrackedProduct>>>>,
    creates: Mutex<VecDeque<StoreResult<()>>>,
    deletes: Mutex<VecDeque<Scripted<()>>>,
    registers: Mutex<VecDeque<StoreResult<()>>>,
    calls: Mutex<Vec<Call>>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_list(&self, result: StoreResult<Vec<TrackedProduct>>) {
        self.lists.lock().unwrap().push_back(Scripted { gate: None, result });
    }

    /// The list call waits until the returned sender fires (or is dropped)
    pub fn push_list_gated(&self, result: StoreResult<Vec<TrackedProduct>>) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.lists.lock().unwrap().push_back(Scripted {
            gate: Some(rx),
            result,
        });
        tx
    }

    pub fn push_create(&self, result: StoreResult<()>) {
        self.creates.lock().unwrap().push_back(result);
    }

    pub fn push_delete(&self, result: StoreResult<()>) {
        self.deletes.lock().unwrap().push_back(Scripted { gate: None, result });
    }

    pub fn push_delete_gated(&self, result: StoreResult<()>) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.deletes.lock().unwrap().push_back(Scripted {
            gate: Some(rx),
            result,
        });
        tx
    }

    pub fn push_register(&self, result: StoreResult<()>) {
        self.registers.lock().unwrap().push_back(result);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn list_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, Call::List(_)))
            .count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

async fn resolve<T>(script: Option<Scripted<T>>, default: T) -> StoreResult<T> {
    match script {
        Some(Scripted { gate, result }) => {
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            result
        }
        None => Ok(default),
    }
}

#[async_trait]
impl ProductStore for FakeStore {
    async fn list_products(&self, user: &str) -> StoreResult<Vec<TrackedProduct>> {
        self.record(Call::List(user.to_string()));
        let script = self.lists.lock().unwrap().pop_front();
        resolve(script, Vec::new()).await
    }

    async fn create_product(&self, request: &CreateProductRequest) -> StoreResult<()> {
        self.record(Call::Create(request.clone()));
        self.creates.lock().unwrap().pop_front().unwrap_or(Ok(()))
    }

    async fn delete_product(&self, id: &ProductId) -> StoreResult<()> {
        self.record(Call::Delete(id.clone()));
        let script = self.deletes.lock().unwrap().pop_front();
        resolve(script, ()).await
    }
}

#[async_trait]
impl UserRegistry for FakeStore {
    async fn register_user(&self, request: &RegisterUserRequest) -> StoreResult<()> {
        self.record(Call::Register(request.clone()));
        self.registers.lock().unwrap().pop_front().unwrap_or(Ok(()))
    }
}

/// Authentication provider with switchable failures
#[derive(Default)]
pub struct FakeAuth {
    current: Mutex<Option<Identity>>,
    pub fail_signup: Mutex<bool>,
    pub fail_login: Mutex<bool>,
    pub fail_logout: Mutex<bool>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeAuth {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signed_in(identity: Identity) -> Self {
        let auth = Self::default();
        *auth.current.lock().unwrap() = Some(identity);
        auth
    }

    pub fn fail(flag: &Mutex<bool>) {
        *flag.lock().unwrap() = true;
    }

    pub fn call_log(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: &str) {
        self.calls.lock().unwrap().push(call.to_string());
    }

    fn failing(flag: &Mutex<bool>) -> bool {
        *flag.lock().unwrap()
    }
}

#[async_trait]
impl AuthProvider for FakeAuth {
    async fn signup(&self, email: &str, _password: &str) -> Result<Identity, AuthError> {
        self.record("signup");
        if Self::failing(&self.fail_signup) {
            return Err(AuthError::Provider("email already in use".into()));
        }
        let identity = Identity::new(format!("uid-{}", email));
        *self.current.lock().unwrap() = Some(identity.clone());
        Ok(identity)
    }

    async fn update_display_name(&self, name: &str) -> Result<Identity, AuthError> {
        self.record("update_display_name");
        let mut current = self.current.lock().unwrap();
        let identity = current.as_mut().ok_or(AuthError::NoCurrentUser)?;
        identity.display_name = Some(name.to_string());
        Ok(identity.clone())
    }

    async fn login(&self, email: &str, _password: &str) -> Result<Identity, AuthError> {
        self.record("login");
        if Self::failing(&self.fail_login) {
            return Err(AuthError::Provider("wrong password".into()));
        }
        let identity = Identity::new(format!("uid-{}", email));
        *self.current.lock().unwrap() = Some(identity.clone());
        Ok(identity)
    }

    async fn logout(&self) -> Result<(), AuthError> {
        self.record("logout");
        if Self::failing(&self.fail_logout) {
            return Err(AuthError::Provider("network down".into()));
        }
        *self.current.lock().unwrap() = None;
        Ok(())
    }

    fn current_user(&self) -> Option<Identity> {
        self.current.lock().unwrap().clone()
    }
}

pub fn product(id: &str, current_price: &str, target_price: &str) -> TrackedProduct {
    TrackedProduct {
        id: ProductId::new(id),
        name: format!("Product {}", id),
        image: format!("http://img/{}", id),
        url: format!("http://shop/{}", id),
        current_price: current_price.to_string(),
        target_price: PriceField::Text(target_price.to_string()),
    }
}

pub fn status(status: u16, message: Option<&str>) -> StoreError {
    StoreError::Status {
        status,
        message: message.map(str::to_string),
    }
}
