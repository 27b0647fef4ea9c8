//! Reservation endpoints

use validator::Validate;

use super::ApiClient;
use crate::error::ClientResult;
use crate::models::{NewPeriodReservation, NewViewingReservation, Reservation, ReservationId};

impl ApiClient {
    /// `GET /reservations`: the signed-in user's reservations
    pub async fn list_reservations(&self) -> ClientResult<Vec<Reservation>> {
        self.get("/reservations").await
    }

    /// `POST /reservations` for a viewing appointment. Guests can book, so
    /// no bearer token is sent.
    pub async fn create_viewing(&self, request: &NewViewingReservation) -> ClientResult<Reservation> {
        request.validate()?;
        self.anonymous().post("/reservations", request).await
    }

    /// `POST /reservations` for a rental period entered by a seller
    pub async fn create_booking(&self, request: &NewPeriodReservation) -> ClientResult<Reservation> {
        request.validate()?;
        self.post("/reservations", request).await
    }

    /// `DELETE /reservations/:id`
    pub async fn cancel_reservation(&self, id: ReservationId) -> ClientResult<()> {
        self.delete(&format!("/reservations/{}", id)).await
    }
}
