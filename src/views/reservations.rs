//! Shopper-side reservations: the "my reservations" list and the viewing form

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::api::ApiClient;
use crate::error::{ClientError, ClientResult};
use crate::models::{
    parse_day, CostumeId, NewViewingReservation, Reservation, ReservationId, VIEWING_TIME_FORMAT,
};
use crate::session::Session;

use super::ViewStatus;

/// Minutes offered by the time picker
pub const MINUTE_STEP: u32 = 15;

#[derive(Debug, Default)]
pub struct MyReservationsView {
    reservations: Vec<Reservation>,
    pub status: ViewStatus,
}

impl MyReservationsView {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn reload(&mut self, session: &Session) -> ClientResult<()> {
        self.status.begin();
        let result = if session.is_authenticated() {
            session.client().list_reservations().await
        } else {
            Err(ClientError::NotAuthenticated)
        };
        self.reservations = self.status.finish(result, "Failed to load reservations")?;
        Ok(())
    }

    pub fn reservations(&self) -> &[Reservation] {
        &self.reservations
    }

    /// Withdraw a pending request, then refetch the list
    pub async fn cancel(&mut self, session: &Session, id: ReservationId) -> ClientResult<()> {
        let cancellable = self
            .reservations
            .iter()
            .find(|r| r.id == id)
            .map(Reservation::is_cancellable);
        let check = match cancellable {
            Some(true) => Ok(()),
            Some(false) => Err(ClientError::Validation(
                "Only pending reservations can be cancelled".to_string(),
            )),
            None => Err(ClientError::Validation(format!("Unknown reservation {}", id))),
        };

        self.status.begin();
        let result = match check {
            Ok(()) => session.client().cancel_reservation(id).await,
            Err(e) => Err(e),
        };
        self.status.finish(result, "Failed to cancel")?;
        tracing::info!(reservation_id = id, "Reservation cancelled");
        self.reload(session).await
    }
}

/// Form booking a viewing appointment. Guests may use it without signing in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewingForm {
    pub client_name: String,
    pub client_phone: String,
    pub date: NaiveDate,
    pub hour: u32,
    pub minute: u32,
}

impl Default for ViewingForm {
    fn default() -> Self {
        let now = Local::now();
        Self {
            client_name: String::new(),
            client_phone: String::new(),
            date: now.date_naive(),
            hour: now.hour(),
            minute: 0,
        }
    }
}

impl ViewingForm {
    /// Take a typed `YYYY-MM-DD`; anything else leaves the date unchanged
    pub fn set_date_text(&mut self, text: &str) -> bool {
        match parse_day(text) {
            Ok(date) if text.trim().len() == 10 => {
                self.date = date;
                true
            }
            _ => false,
        }
    }

    pub fn viewing_time(&self) -> ClientResult<NaiveDateTime> {
        if self.minute % MINUTE_STEP != 0 {
            return Err(ClientError::Validation(format!(
                "Minutes must be a multiple of {}",
                MINUTE_STEP
            )));
        }
        let time = NaiveTime::from_hms_opt(self.hour, self.minute, 0).ok_or_else(|| {
            ClientError::Validation(format!("Invalid time {:02}:{:02}", self.hour, self.minute))
        })?;
        Ok(self.date.and_time(time))
    }

    pub fn request(&self, costume_id: CostumeId) -> ClientResult<NewViewingReservation> {
        if self.client_name.trim().is_empty() || self.client_phone.trim().is_empty() {
            return Err(ClientError::Validation("Please fill in all fields".to_string()));
        }
        Ok(NewViewingReservation {
            costume_id,
            viewing_time: self.viewing_time()?.format(VIEWING_TIME_FORMAT).to_string(),
            client_name: self.client_name.trim().to_string(),
            client_phone: self.client_phone.trim().to_string(),
        })
    }

    /// Send the appointment; nothing is sent when the form is incomplete
    pub async fn submit(&self, api: &ApiClient, costume_id: CostumeId) -> ClientResult<Reservation> {
        let request = self.request(costume_id)?;
        let reservation = api.create_viewing(&request).await?;
        tracing::info!(
            reservation_id = reservation.id,
            costume_id,
            "Viewing appointment created"
        );
        Ok(reservation)
    }
}
