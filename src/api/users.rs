//! User administration endpoints (admin-only on the server side)

use validator::Validate;

use super::ApiClient;
use crate::error::ClientResult;
use crate::models::{User, UserId, UserPayload};

impl ApiClient {
    /// `GET /users`
    pub async fn list_users(&self) -> ClientResult<Vec<User>> {
        self.get("/users").await
    }

    /// `POST /users`
    pub async fn create_user(&self, payload: &UserPayload) -> ClientResult<User> {
        payload.validate()?;
        self.post("/users", payload).await
    }

    /// `PUT /users/:id`
    pub async fn update_user(&self, id: UserId, payload: &UserPayload) -> ClientResult<User> {
        payload.validate()?;
        self.put(&format!("/users/{}", id), payload).await
    }

    /// `DELETE /users/:id`
    pub async fn delete_user(&self, id: UserId) -> ClientResult<()> {
        self.delete(&format!("/users/{}", id)).await
    }
}
