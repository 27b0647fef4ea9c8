//! Session context: the bearer token and the cached user profile
//!
//! A `Session` is created once at startup from persisted storage and then
//! handed to whichever view needs it. Only `login`, `register`, `logout` and
//! `refresh` change it.

mod store;

use std::sync::Arc;

pub use store::{FileTokenStore, MemoryTokenStore, TokenStore};

use crate::api::ApiClient;
use crate::error::{ClientError, ClientResult};
use crate::models::{AuthResponse, LoginRequest, RegisterRequest, User, UserRole};
use crate::views::Screen;

/// Storage key holding the bearer token
pub const TOKEN_KEY: &str = "jwt_token";

pub struct Session {
    api: ApiClient,
    store: Arc<dyn TokenStore>,
    token: Option<String>,
    user: Option<User>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.token.is_some())
            .field("user", &self.user)
            .finish()
    }
}

impl Session {
    /// Signed-out session
    pub fn new(api: ApiClient, store: Arc<dyn TokenStore>) -> Self {
        Self {
            api: api.anonymous(),
            store,
            token: None,
            user: None,
        }
    }

    /// Rebuild the session from persisted storage. A stored token whose `/me`
    /// lookup fails leaves a session with a token but no user.
    pub async fn restore(api: ApiClient, store: Arc<dyn TokenStore>) -> Self {
        let mut session = Self::new(api, store);
        match session.store.get(TOKEN_KEY) {
            Ok(Some(token)) => {
                session.token = Some(token);
                session.refresh().await;
            }
            Ok(None) => tracing::debug!("No stored token, starting signed out"),
            Err(e) => tracing::warn!(error = %e, "Failed to read stored token"),
        }
        session
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// API client carrying the current bearer token
    pub fn client(&self) -> ApiClient {
        self.api.with_token(self.token.clone())
    }

    /// Sign in and persist the token
    pub async fn login(&mut self, email: &str, password: &str) -> ClientResult<&User> {
        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let auth = self.api.login(&request).await?;
        tracing::info!(user_id = auth.user.id, "Logged in");
        self.adopt(auth).await
    }

    /// Create a seller account and sign in with it
    pub async fn register(&mut self, name: &str, email: &str, password: &str) -> ClientResult<&User> {
        let request = RegisterRequest {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            password: password.to_string(),
            role: UserRole::Seller,
        };
        let auth = self.api.register(&request).await?;
        tracing::info!(user_id = auth.user.id, "Registered");
        self.adopt(auth).await
    }

    async fn adopt(&mut self, auth: AuthResponse) -> ClientResult<&User> {
        self.store.set(TOKEN_KEY, &auth.token)?;
        self.token = Some(auth.token);

        let user = match self.client().me().await {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!(error = %e, "Profile lookup failed, using login payload");
                auth.user
            }
        };
        let user: &User = self.user.insert(user);
        Ok(user)
    }

    /// Forget the token, locally and in storage
    pub fn logout(&mut self) -> ClientResult<()> {
        self.store.remove(TOKEN_KEY)?;
        self.token = None;
        self.user = None;
        tracing::info!("Logged out");
        Ok(())
    }

    /// Re-fetch the profile for the held token; any failure clears the cached user
    pub async fn refresh(&mut self) -> Option<&User> {
        if self.token.is_none() {
            self.user = None;
            return None;
        }
        match self.client().me().await {
            Ok(user) => self.user = Some(user),
            Err(e) => {
                tracing::warn!(error = %e, "Profile refresh failed");
                self.user = None;
            }
        }
        self.user.as_ref()
    }

    /// Guard for role-restricted views
    pub fn require_role(&self, role: UserRole) -> ClientResult<&User> {
        let user = self.user.as_ref().ok_or(ClientError::NotAuthenticated)?;
        if user.role != role {
            return Err(ClientError::Forbidden { required: role });
        }
        Ok(user)
    }

    /// Landing screen for the current user
    pub fn home(&self) -> Screen {
        Screen::home_for(self.user.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn offline_session() -> Session {
        let config = Config::default()
            .with_base_url("http://127.0.0.1:9/api")
            .unwrap();
        Session::new(
            ApiClient::new(&config).unwrap(),
            Arc::new(MemoryTokenStore::new()),
        )
    }

    #[test]
    fn test_new_session_is_signed_out() {
        let session = offline_session();
        assert!(!session.is_authenticated());
        assert!(session.user().is_none());
        assert!(!session.client().is_authenticated());
        assert_eq!(session.home(), Screen::Catalogue);
    }

    #[test]
    fn test_require_role_without_user() {
        let session = offline_session();
        assert!(matches!(
            session.require_role(UserRole::Admin),
            Err(ClientError::NotAuthenticated)
        ));
    }

    #[test]
    fn test_require_role_mismatch() {
        let mut session = offline_session();
        session.user = Some(User {
            id: 1,
            name: "Sam".to_string(),
            email: "sam@example.com".to_string(),
            role: UserRole::Seller,
        });
        assert!(session.require_role(UserRole::Seller).is_ok());
        assert!(matches!(
            session.require_role(UserRole::Admin),
            Err(ClientError::Forbidden {
                required: UserRole::Admin
            })
        ));
        assert_eq!(session.home(), Screen::SellerHome);
    }

    #[test]
    fn test_logout_clears_store() {
        let store = Arc::new(MemoryTokenStore::new());
        store.set(TOKEN_KEY, "abc").unwrap();
        let mut session = Session::new(
            ApiClient::new(&Config::default()).unwrap(),
            store.clone(),
        );
        session.token = Some("abc".to_string());

        session.logout().unwrap();
        assert!(!session.is_authenticated());
        assert_eq!(store.get(TOKEN_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn test_restore_without_token_skips_network() {
        let session = Session::restore(
            ApiClient::new(&Config::default()).unwrap(),
            Arc::new(MemoryTokenStore::new()),
        )
        .await;
        assert!(!session.is_authenticated());
        assert!(session.user().is_none());
    }
}
