//! Seller screens: own costumes, the booking calendar and the costume form

use rust_decimal::Decimal;

use crate::error::{ClientError, ClientResult};
use crate::models::{Costume, CostumeId, CostumePayload, Reservation, ReservationId, UserRole};
use crate::services::calendar::{AvailabilityCalendar, BookingDraft, Month};
use crate::services::catalogue::parse_price_bound;
use crate::session::Session;

use super::ViewStatus;

/// The signed-in seller's costume list
#[derive(Debug, Default)]
pub struct SellerCostumesView {
    costumes: Vec<Costume>,
    pub status: ViewStatus,
}

impl SellerCostumesView {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn reload(&mut self, session: &Session) -> ClientResult<()> {
        self.status.begin();
        let result = match session.require_role(UserRole::Seller) {
            Ok(_) => session.client().seller_costumes().await,
            Err(e) => Err(e),
        };
        self.costumes = self.status.finish(result, "Failed to load costumes")?;
        Ok(())
    }

    pub fn costumes(&self) -> &[Costume] {
        &self.costumes
    }

    pub async fn delete(&mut self, session: &Session, id: CostumeId) -> ClientResult<()> {
        self.status.begin();
        let result = session.client().delete_costume(id).await;
        self.status.finish(result, "Unable to delete")?;
        tracing::info!(costume_id = id, "Costume deleted");
        self.reload(session).await
    }
}

/// Costume picked in the calendar screen, with its calendar
#[derive(Debug, Clone)]
pub struct CalendarSelection {
    pub costume: Costume,
    pub calendar: AvailabilityCalendar,
}

/// Seller booking screen: pick one of the seller's costumes, browse its
/// availability month by month and enter rental periods
#[derive(Debug, Default)]
pub struct SellerCalendarView {
    costumes: Vec<Costume>,
    selection: Option<CalendarSelection>,
    pub draft: BookingDraft,
    pub status: ViewStatus,
}

impl SellerCalendarView {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn reload(&mut self, session: &Session) -> ClientResult<()> {
        self.status.begin();
        let result = match session.require_role(UserRole::Seller) {
            Ok(_) => session.client().seller_costumes().await,
            Err(e) => Err(e),
        };
        self.costumes = self.status.finish(result, "Failed to load costumes")?;
        Ok(())
    }

    pub fn costumes(&self) -> &[Costume] {
        &self.costumes
    }

    pub fn selection(&self) -> Option<&CalendarSelection> {
        self.selection.as_ref()
    }

    /// Calendar of the selected costume, for month navigation and date taps
    pub fn calendar_mut(&mut self) -> Option<&mut AvailabilityCalendar> {
        self.selection.as_mut().map(|s| &mut s.calendar)
    }

    /// Open the calendar of one of the listed costumes at `month`
    pub async fn select(
        &mut self,
        session: &Session,
        costume_id: CostumeId,
        month: Month,
    ) -> ClientResult<&CalendarSelection> {
        let costume = self
            .costumes
            .iter()
            .find(|c| c.id == costume_id)
            .cloned()
            .ok_or_else(|| ClientError::Validation(format!("Unknown costume {}", costume_id)))?;

        self.status.begin();
        let result = session.client().costume_reservations(costume_id).await;
        let reservations = self.status.finish(result, "Failed to load reservations")?;

        let selection: &CalendarSelection = self.selection.insert(CalendarSelection {
            costume,
            calendar: AvailabilityCalendar::new(reservations, month),
        });
        Ok(selection)
    }

    pub fn close(&mut self) {
        self.selection = None;
    }

    /// Create a booking for the selected dates. A blank client field or an
    /// empty selection fails locally without any request.
    pub async fn submit(&mut self, session: &Session) -> ClientResult<Reservation> {
        let selection = self
            .selection
            .as_ref()
            .ok_or_else(|| ClientError::Validation("Select a costume first".to_string()))?;
        let request = match selection.calendar.booking_request(selection.costume.id, &self.draft) {
            Ok(request) => request,
            Err(e) => {
                self.status.alert = Some(e.alert("Please fill in client name, phone, and select dates"));
                return Err(e);
            }
        };
        let costume_id = selection.costume.id;

        self.status.begin();
        let result = session.client().create_booking(&request).await;
        let created = self.status.finish(result, "Failed to create reservation")?;
        tracing::info!(
            reservation_id = created.id,
            costume_id,
            from = %request.from_date,
            to = %request.to_date,
            "Booking created"
        );

        self.draft = BookingDraft::default();
        if let Some(selection) = self.selection.as_mut() {
            selection.calendar.clear_selection();
        }
        self.refresh_reservations(session).await?;
        Ok(created)
    }

    /// Cancel one of the selected costume's reservations, then refetch
    pub async fn cancel(&mut self, session: &Session, id: ReservationId) -> ClientResult<()> {
        self.status.begin();
        let result = session.client().cancel_reservation(id).await;
        self.status.finish(result, "Failed to cancel reservation")?;
        tracing::info!(reservation_id = id, "Reservation cancelled");
        self.refresh_reservations(session).await
    }

    async fn refresh_reservations(&mut self, session: &Session) -> ClientResult<()> {
        let Some(costume_id) = self.selection.as_ref().map(|s| s.costume.id) else {
            return Ok(());
        };
        self.status.begin();
        let result = session.client().costume_reservations(costume_id).await;
        let reservations = self.status.finish(result, "Failed to load reservations")?;
        if let Some(selection) = self.selection.as_mut() {
            selection.calendar.set_reservations(reservations);
        }
        Ok(())
    }
}

/// Create/edit form for a costume, shared by sellers and admins
#[derive(Debug, Clone, Default)]
pub struct CostumeForm {
    editing: Option<CostumeId>,
    pub name: String,
    pub description: String,
    pub price: String,
    pub size: String,
    pub image_url: Option<String>,
    pub status: ViewStatus,
}

impl CostumeForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefill from an existing costume
    pub fn edit(costume: &Costume) -> Self {
        Self {
            editing: Some(costume.id),
            name: costume.name.clone(),
            description: costume.description.clone().unwrap_or_default(),
            price: costume.price.normalize().to_string(),
            size: costume.size.clone().unwrap_or_default(),
            image_url: costume.image_url.clone(),
            status: ViewStatus::default(),
        }
    }

    pub fn editing(&self) -> Option<CostumeId> {
        self.editing
    }

    /// Request body; unparseable price text becomes 0
    pub fn payload(&self, seller_id: Option<u64>) -> CostumePayload {
        let size = self.size.trim();
        CostumePayload {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            price: parse_price_bound(&self.price).unwrap_or(Decimal::ZERO),
            image_url: self.image_url.clone().filter(|u| !u.trim().is_empty()),
            size: (!size.is_empty()).then(|| size.to_string()),
            seller_id,
        }
    }

    /// Create or update depending on whether an existing costume is edited
    pub async fn submit(&mut self, session: &Session) -> ClientResult<Costume> {
        if self.name.trim().is_empty() {
            let err = ClientError::Validation("Name is required".to_string());
            self.status.alert = Some(err.alert("Name is required"));
            return Err(err);
        }
        let payload = self.payload(session.user().map(|u| u.id));

        self.status.begin();
        let api = session.client();
        let result = match self.editing {
            Some(id) => api.update_costume(id, &payload).await,
            None => api.create_costume(&payload).await,
        };
        let saved = self.status.finish(result, "Unable to save")?;
        tracing::info!(
            costume_id = saved.id,
            updated = self.editing.is_some(),
            "Costume saved"
        );
        self.editing = Some(saved.id);
        Ok(saved)
    }

    /// Upload an image and keep its URL for the next submit
    pub async fn upload_image(
        &mut self,
        session: &Session,
        bytes: &[u8],
        mime: &str,
    ) -> ClientResult<&str> {
        self.status.begin();
        let result = session.client().upload_image(bytes, mime).await;
        let url = self.status.finish(result, "Failed to upload image")?;
        tracing::info!(url = %url, "Image uploaded");
        Ok(self.image_url.insert(url).as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_payload_defaults_bad_price_to_zero() {
        let form = CostumeForm {
            name: " Witch ".to_string(),
            price: "cheap".to_string(),
            ..CostumeForm::default()
        };
        let payload = form.payload(Some(4));
        assert_eq!(payload.name, "Witch");
        assert_eq!(payload.price, Decimal::ZERO);
        assert_eq!(payload.size, None);
        assert_eq!(payload.seller_id, Some(4));
    }

    #[test]
    fn test_edit_prefills_fields() {
        let costume = Costume {
            id: 9,
            name: "Pirate".to_string(),
            description: Some("Arr".to_string()),
            price: Decimal::from_str("25.00").unwrap(),
            image_url: Some("http://img/1.png".to_string()),
            size: Some("L".to_string()),
            seller: None,
            is_available: true,
        };
        let form = CostumeForm::edit(&costume);
        assert_eq!(form.editing(), Some(9));
        assert_eq!(form.price, "25");
        let payload = form.payload(None);
        assert_eq!(payload.price, Decimal::from(25));
        assert_eq!(payload.size.as_deref(), Some("L"));
        assert_eq!(payload.image_url.as_deref(), Some("http://img/1.png"));
    }
}
