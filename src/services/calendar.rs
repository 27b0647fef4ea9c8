//! Availability calendar for one costume
//!
//! A month is always drawn as six Sunday-first weeks (42 cells), padded with
//! days of the neighbouring months. A day is reserved iff it lies inside the
//! inclusive from/to span of at least one rental period. Viewing appointments
//! do not block days. Months are limited to years 1 through 9999.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{Datelike, Duration, Local, NaiveDate};
use thiserror::Error;
use validator::Validate;

use crate::error::{ClientError, ClientResult};
use crate::models::{
    CostumeId, NewPeriodReservation, Reservation, ReservationStatus, ReservationWindow,
};

pub const GRID_CELLS: usize = 42;

pub const MIN_YEAR: i32 = 1;
pub const MAX_YEAR: i32 = 9999;

/// Calendar errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CalendarError {
    #[error("{0} is already reserved")]
    DateReserved(NaiveDate),

    #[error("Invalid month: {0}")]
    InvalidMonth(String),
}

/// A calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month {
    year: i32,
    month: u32,
}

impl Month {
    pub fn new(year: i32, month: u32) -> Result<Self, CalendarError> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) || !(1..=12).contains(&month) {
            return Err(CalendarError::InvalidMonth(format!("{}-{}", year, month)));
        }
        Ok(Self { year, month })
    }

    /// Month containing `date`, clamped to the supported years
    pub fn containing(date: NaiveDate) -> Self {
        match date.year() {
            y if y < MIN_YEAR => Self { year: MIN_YEAR, month: 1 },
            y if y > MAX_YEAR => Self { year: MAX_YEAR, month: 12 },
            year => Self {
                year,
                month: date.month(),
            },
        }
    }

    /// Month containing today's local date
    pub fn current() -> Self {
        Self::containing(Local::now().date_naive())
    }

    /// Parse `YYYY-MM`
    pub fn parse(raw: &str) -> Result<Self, CalendarError> {
        let invalid = || CalendarError::InvalidMonth(raw.to_string());
        let (year, month) = raw.trim().split_once('-').ok_or_else(invalid)?;
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let month = month.parse::<u32>().map_err(|_| invalid())?;
        Self::new(year, month).map_err(|_| invalid())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        // Constructors only produce valid year/month pairs
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// Month before this one; stays put at January of `MIN_YEAR`
    pub fn previous(&self) -> Self {
        if self.year == MIN_YEAR && self.month == 1 {
            *self
        } else if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// Month after this one; stays put at December of `MAX_YEAR`
    pub fn next(&self) -> Self {
        if self.year == MAX_YEAR && self.month == 12 {
            *self
        } else if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// One cell of the month grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCell {
    pub date: NaiveDate,
    /// False for padding days from the neighbouring months
    pub in_month: bool,
    pub reserved: bool,
    pub selected: bool,
}

impl DayCell {
    pub fn is_selectable(&self) -> bool {
        !self.reserved
    }
}

/// Whether any rental period covers `date`, at day granularity
pub fn is_reserved(date: NaiveDate, reservations: &[Reservation]) -> bool {
    reservations.iter().any(|r| match r.window {
        ReservationWindow::Period { from, to } => from <= date && date <= to,
        ReservationWindow::Viewing(_) => false,
    })
}

/// Draw `month` as 42 Sunday-first cells
pub fn render(
    month: Month,
    reservations: &[Reservation],
    selected: &BTreeSet<NaiveDate>,
) -> Vec<DayCell> {
    let first = month.first_day();
    let lead = i64::from(first.weekday().num_days_from_sunday());
    let start = first - Duration::days(lead);

    start
        .iter_days()
        .take(GRID_CELLS)
        .map(|date| DayCell {
            date,
            in_month: month.contains(date),
            reserved: is_reserved(date, reservations),
            selected: selected.contains(&date),
        })
        .collect()
}

/// Client details typed next to the calendar
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingDraft {
    pub client_name: String,
    pub client_phone: String,
}

/// Calendar state for one costume: fetched reservations, the month on
/// screen and the dates picked for a new booking
#[derive(Debug, Clone)]
pub struct AvailabilityCalendar {
    reservations: Vec<Reservation>,
    month: Month,
    selected: BTreeSet<NaiveDate>,
}

impl AvailabilityCalendar {
    pub fn new(reservations: Vec<Reservation>, month: Month) -> Self {
        Self {
            reservations,
            month,
            selected: BTreeSet::new(),
        }
    }

    pub fn month(&self) -> Month {
        self.month
    }

    pub fn reservations(&self) -> &[Reservation] {
        &self.reservations
    }

    /// Replace the reservation list after a refetch. Selected dates that are
    /// now reserved are dropped.
    pub fn set_reservations(&mut self, reservations: Vec<Reservation>) {
        self.reservations = reservations;
        let reservations = &self.reservations;
        self.selected.retain(|d| !is_reserved(*d, reservations));
    }

    pub fn grid(&self) -> Vec<DayCell> {
        render(self.month, &self.reservations, &self.selected)
    }

    pub fn is_reserved(&self, date: NaiveDate) -> bool {
        is_reserved(date, &self.reservations)
    }

    pub fn previous_month(&mut self) -> Month {
        self.month = self.month.previous();
        self.month
    }

    pub fn next_month(&mut self) -> Month {
        self.month = self.month.next();
        self.month
    }

    pub fn go_to(&mut self, month: Month) {
        self.month = month;
    }

    /// Flip `date` in the selection; returns whether it is now selected
    pub fn toggle(&mut self, date: NaiveDate) -> Result<bool, CalendarError> {
        if self.is_reserved(date) {
            return Err(CalendarError::DateReserved(date));
        }
        if self.selected.remove(&date) {
            Ok(false)
        } else {
            self.selected.insert(date);
            Ok(true)
        }
    }

    pub fn selected(&self) -> &BTreeSet<NaiveDate> {
        &self.selected
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    /// Earliest and latest selected dates
    pub fn selected_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = *self.selected.first()?;
        let last = *self.selected.last()?;
        Some((first, last))
    }

    /// Build the booking request for the current selection. Fails locally,
    /// without any request, when nothing is selected or a client field is
    /// blank.
    pub fn booking_request(
        &self,
        costume_id: CostumeId,
        draft: &BookingDraft,
    ) -> ClientResult<NewPeriodReservation> {
        let (from_date, to_date) = self.selected_range().ok_or_else(|| {
            ClientError::Validation("Please fill in client name, phone, and select dates".to_string())
        })?;
        let request = NewPeriodReservation {
            costume_id,
            client_name: draft.client_name.trim().to_string(),
            client_phone: draft.client_phone.trim().to_string(),
            from_date,
            to_date,
            status: ReservationStatus::Confirmed,
        };
        request.validate()?;
        Ok(request)
    }
}
