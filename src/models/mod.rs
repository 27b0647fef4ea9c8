//! Data models for the Costumerie API
//!
//! These types are the response schema the client accepts. Parsing is strict:
//! a payload that does not fit fails with a decode error instead of being
//! coerced into something plausible.

pub mod auth;

use std::borrow::Cow;
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

pub use auth::*;

pub type CostumeId = u64;
pub type ReservationId = u64;
pub type UserId = u64;

/// Wire format for viewing timestamps sent to the API
pub const VIEWING_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Catalogue item
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Costume {
    pub id: CostumeId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub seller: Option<SellerRef>,
    #[serde(default = "default_available")]
    pub is_available: bool,
}

fn default_available() -> bool {
    true
}

impl Costume {
    pub fn seller_city(&self) -> Option<&str> {
        self.seller.as_ref().and_then(|s| s.city.as_deref())
    }

    pub fn seller_name(&self) -> Option<&str> {
        self.seller.as_ref().and_then(|s| s.name.as_deref())
    }
}

/// Seller reference embedded in a costume
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SellerRef {
    #[serde(default)]
    pub id: Option<UserId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
}

/// Costume summary embedded in a reservation
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CostumeSummary {
    pub id: CostumeId,
    pub name: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Reservation status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::Completed => "completed",
            ReservationStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a reservation holds: a single viewing appointment or a rental period
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservationWindow {
    Viewing(NaiveDateTime),
    Period { from: NaiveDate, to: NaiveDate },
}

impl ReservationWindow {
    /// Inclusive day span covered by the window
    pub fn days(&self) -> (NaiveDate, NaiveDate) {
        match *self {
            ReservationWindow::Viewing(at) => (at.date(), at.date()),
            ReservationWindow::Period { from, to } => (from, to),
        }
    }

    /// Whether `day` falls inside the inclusive day span
    pub fn covers(&self, day: NaiveDate) -> bool {
        let (from, to) = self.days();
        from <= day && day <= to
    }
}

impl fmt::Display for ReservationWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReservationWindow::Viewing(at) => write!(f, "viewing {}", at.format("%Y-%m-%d %H:%M")),
            ReservationWindow::Period { from, to } => write!(f, "{} → {}", from, to),
        }
    }
}

/// Reservation as returned by the API
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "ReservationRecord")]
pub struct Reservation {
    pub id: ReservationId,
    pub costume_id: CostumeId,
    pub costume: Option<CostumeSummary>,
    pub client_name: String,
    pub client_phone: String,
    pub window: ReservationWindow,
    pub status: ReservationStatus,
    pub total_price: Option<Decimal>,
}

impl Reservation {
    /// Shoppers may only withdraw requests the seller has not acted on yet
    pub fn is_cancellable(&self) -> bool {
        self.status == ReservationStatus::Pending
    }
}

/// Raw wire record; the window fields are resolved in `TryFrom`
#[derive(Debug, Deserialize)]
struct ReservationRecord {
    id: ReservationId,
    costume_id: CostumeId,
    #[serde(default)]
    costume: Option<CostumeSummary>,
    client_name: String,
    client_phone: String,
    #[serde(default)]
    viewing_time: Option<String>,
    #[serde(default)]
    from_date: Option<String>,
    #[serde(default)]
    to_date: Option<String>,
    status: ReservationStatus,
    #[serde(default)]
    total_price: Option<Decimal>,
}

impl TryFrom<ReservationRecord> for Reservation {
    type Error = String;

    fn try_from(record: ReservationRecord) -> Result<Self, Self::Error> {
        let window = match (&record.from_date, &record.to_date, &record.viewing_time) {
            (Some(from), Some(to), _) => {
                let from = parse_day(from)?;
                let to = parse_day(to)?;
                if to < from {
                    return Err(format!(
                        "reservation {}: to_date {} precedes from_date {}",
                        record.id, to, from
                    ));
                }
                ReservationWindow::Period { from, to }
            }
            (None, None, Some(at)) => ReservationWindow::Viewing(parse_timestamp(at)?),
            _ => {
                return Err(format!(
                    "reservation {}: expected viewing_time or a from_date/to_date pair",
                    record.id
                ))
            }
        };

        Ok(Reservation {
            id: record.id,
            costume_id: record.costume_id,
            costume: record.costume,
            client_name: record.client_name,
            client_phone: record.client_phone,
            window,
            status: record.status,
            total_price: record.total_price,
        })
    }
}

/// Parse the calendar day of a `YYYY-MM-DD` value, ignoring any time-of-day suffix
pub fn parse_day(raw: &str) -> Result<NaiveDate, String> {
    let raw = raw.trim();
    let (day, rest) = match raw.get(..10) {
        Some(day) => (day, &raw[10..]),
        None => (raw, ""),
    };
    if !(rest.is_empty() || rest.starts_with('T') || rest.starts_with(' ')) {
        return Err(format!("invalid date '{}'", raw));
    }
    NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(|e| format!("invalid date '{}': {}", raw, e))
}

/// Parse a viewing timestamp as sent by the API (space or `T` separated,
/// optionally RFC 3339 with an offset, whose wall-clock time is kept)
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, String> {
    let raw = raw.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Ok(at.naive_local());
    }
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .ok_or_else(|| format!("invalid timestamp '{}'", raw))
}

// ============================================================================
// Request DTOs
// ============================================================================

/// Body for `POST /costumes` and `PUT /costumes/:id`
#[derive(Debug, Clone, Serialize, Validate)]
pub struct CostumePayload {
    #[validate(custom = "not_blank")]
    pub name: String,
    pub description: String,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    #[validate(custom = "non_negative")]
    pub price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seller_id: Option<UserId>,
}

/// Body for a shopper's viewing appointment (`POST /reservations`, no bearer)
#[derive(Debug, Clone, Serialize, Validate)]
pub struct NewViewingReservation {
    pub costume_id: CostumeId,
    pub viewing_time: String,
    #[validate(custom = "not_blank")]
    pub client_name: String,
    #[validate(custom = "not_blank")]
    pub client_phone: String,
}

/// Body for a seller-entered rental period (`POST /reservations`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Validate)]
pub struct NewPeriodReservation {
    pub costume_id: CostumeId,
    #[validate(custom = "not_blank")]
    pub client_name: String,
    #[validate(custom = "not_blank")]
    pub client_phone: String,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub status: ReservationStatus,
}

/// Body for `POST /users` and `PUT /users/:id`
#[derive(Debug, Clone, Serialize, Validate)]
pub struct UserPayload {
    #[validate(custom = "not_blank")]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub role: UserRole,
}

/// Body for `POST /upload-image`
#[derive(Debug, Serialize)]
pub struct UploadImageRequest {
    pub image: String,
}

/// Response of `POST /upload-image`
#[derive(Debug, Deserialize)]
pub struct UploadImageResponse {
    pub url: String,
}

pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some(Cow::from("must not be blank"));
        return Err(err);
    }
    Ok(())
}

fn non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        let mut err = ValidationError::new("negative");
        err.message = Some(Cow::from("must not be negative"));
        return Err(err);
    }
    Ok(())
}
