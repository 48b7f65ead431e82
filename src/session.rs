//! Session Flows
//!
//! Signup, login and the confirmed logout around the authentication
//! provider. A new account is also registered with the backend so the
//! scraper can notify the user.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::domain::{ClientError, Identity};
use crate::repository::{AuthProvider, RegisterUserRequest, StoreError, UserRegistry};

/// Token sent on registration until push notifications are wired up
pub const PLACEHOLDER_DEVICE_TOKEN: &str = "dummy_token";
const REGISTERED_STATUS: &str = "login";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    /// True while a signup is in progress
    pub loading: bool,
    pub error: Option<String>,
    /// Whether the logout confirmation prompt is showing
    pub confirming_logout: bool,
}

#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
}

pub struct SessionController<A: AuthProvider, R: UserRegistry> {
    auth: Arc<A>,
    registry: Arc<R>,
    device_token: String,
    state: Mutex<SessionState>,
}

impl<A: AuthProvider, R: UserRegistry> SessionController<A, R> {
    pub fn new(auth: Arc<A>, registry: Arc<R>) -> Self {
        Self {
            auth,
            registry,
            device_token: PLACEHOLDER_DEVICE_TOKEN.to_string(),
            state: Mutex::new(SessionState::default()),
        }
    }

    pub fn with_device_token(mut self, token: impl Into<String>) -> Self {
        self.device_token = token.into();
        self
    }

    pub async fn snapshot(&self) -> SessionState {
        self.state.lock().await.clone()
    }

    /// Identity of the signed-in user, required before any product request
    pub fn current_user(&self) -> Result<Identity, ClientError> {
        self.auth
            .current_user()
            .filter(Identity::is_resolved)
            .ok_or(ClientError::MissingIdentity)
    }

    /// Create an account, name it, and register it with the backend
    pub async fn signup(&self, form: &SignupForm) -> Result<Identity, ClientError> {
        if form.password != form.password_confirmation {
            let err = ClientError::PasswordMismatch;
            self.state.lock().await.error = Some(err.to_string());
            return Err(err);
        }

        {
            let mut state = self.state.lock().await;
            state.error = None;
            state.loading = true;
        }

        let result = self.run_signup(form).await;

        let mut state = self.state.lock().await;
        state.loading = false;
        if let Err(err) = &result {
            state.error = Some(err.to_string());
        }
        result
    }

    async fn run_signup(&self, form: &SignupForm) -> Result<Identity, ClientError> {
        let created = self.auth.signup(&form.email, &form.password).await.map_err(|e| {
            warn!(error = %e, "signup rejected by provider");
            ClientError::SignupFailed
        })?;

        let identity = self
            .auth
            .update_display_name(&form.name)
            .await
            .map_err(|e| {
                warn!(uid = %created.uid, error = %e, "failed to set display name");
                ClientError::SignupFailed
            })?;

        let request = RegisterUserRequest {
            user: identity.uid.clone(),
            name: form.name.clone(),
            token: self.device_token.clone(),
            status: REGISTERED_STATUS.to_string(),
        };

        // The account already exists at this point; only an unreachable
        // backend fails the signup, a rejected registration is logged.
        match self.registry.register_user(&request).await {
            Ok(()) => info!(uid = %identity.uid, "registered new user"),
            Err(StoreError::Status { status, .. }) => {
                warn!(uid = %identity.uid, status, "backend rejected registration");
            }
            Err(e) => {
                warn!(uid = %identity.uid, error = %e, "failed to reach backend for registration");
                return Err(ClientError::SignupFailed);
            }
        }

        Ok(identity)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Identity, ClientError> {
        self.state.lock().await.error = None;

        match self.auth.login(email, password).await {
            Ok(identity) => {
                info!(uid = %identity.uid, "logged in");
                Ok(identity)
            }
            Err(e) => {
                warn!(error = %e, "login failed");
                let err = ClientError::LoginFailed;
                self.state.lock().await.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    // ========================
    // Logout
    // ========================

    pub async fn request_logout(&self) {
        self.state.lock().await.confirming_logout = true;
    }

    pub async fn cancel_logout(&self) {
        self.state.lock().await.confirming_logout = false;
    }

    /// Log out after confirmation; the prompt closes either way
    pub async fn confirm_logout(&self) -> Result<(), ClientError> {
        let result = self.logout().await;
        self.state.lock().await.confirming_logout = false;
        result
    }

    /// Log out immediately
    pub async fn logout(&self) -> Result<(), ClientError> {
        self.state.lock().await.error = None;
        debug!("logging out");

        if let Err(e) = self.auth.logout().await {
            warn!(error = %e, "logout failed");
            let err = ClientError::LogoutFailed;
            self.state.lock().await.error = Some(err.to_string());
            return Err(err);
        }

        info!("logged out");
        Ok(())
    }
}
