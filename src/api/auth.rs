//! Authentication endpoints

use validator::Validate;

use super::ApiClient;
use crate::error::ClientResult;
use crate::models::{AuthResponse, LoginRequest, MeResponse, RegisterRequest, User};

impl ApiClient {
    /// `POST /login`
    pub async fn login(&self, request: &LoginRequest) -> ClientResult<AuthResponse> {
        request.validate()?;
        self.anonymous().post("/login", request).await
    }

    /// `POST /register`
    pub async fn register(&self, request: &RegisterRequest) -> ClientResult<AuthResponse> {
        request.validate()?;
        self.anonymous().post("/register", request).await
    }

    /// `GET /me` with the attached bearer token
    pub async fn me(&self) -> ClientResult<User> {
        let response: MeResponse = self.get("/me").await?;
        Ok(response.user)
    }
}
