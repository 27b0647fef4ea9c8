//! Costume endpoints

use validator::Validate;

use super::ApiClient;
use crate::error::ClientResult;
use crate::models::{Costume, CostumeId, CostumePayload, Reservation};

impl ApiClient {
    /// `GET /costumes`: the public catalogue
    pub async fn list_costumes(&self) -> ClientResult<Vec<Costume>> {
        self.get("/costumes").await
    }

    /// `GET /costumes/:id`
    pub async fn get_costume(&self, id: CostumeId) -> ClientResult<Costume> {
        self.get(&format!("/costumes/{}", id)).await
    }

    /// `POST /costumes`
    pub async fn create_costume(&self, payload: &CostumePayload) -> ClientResult<Costume> {
        payload.validate()?;
        self.post("/costumes", payload).await
    }

    /// `PUT /costumes/:id`
    pub async fn update_costume(
        &self,
        id: CostumeId,
        payload: &CostumePayload,
    ) -> ClientResult<Costume> {
        payload.validate()?;
        self.put(&format!("/costumes/{}", id), payload).await
    }

    /// `DELETE /costumes/:id`
    pub async fn delete_costume(&self, id: CostumeId) -> ClientResult<()> {
        self.delete(&format!("/costumes/{}", id)).await
    }

    /// `GET /seller/costumes`: costumes owned by the signed-in seller
    pub async fn seller_costumes(&self) -> ClientResult<Vec<Costume>> {
        self.get("/seller/costumes").await
    }

    /// `GET /costumes/:id/reservations`
    pub async fn costume_reservations(&self, id: CostumeId) -> ClientResult<Vec<Reservation>> {
        self.get(&format!("/costumes/{}/reservations", id)).await
    }
}
