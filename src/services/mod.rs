//! Presentation logic over already fetched data. Nothing here performs I/O.

pub mod calendar;
pub mod catalogue;

pub use calendar::{AvailabilityCalendar, BookingDraft, CalendarError, DayCell, Month};
pub use catalogue::{distinct_cities, filter, parse_price_bound, FilterCriteria};
