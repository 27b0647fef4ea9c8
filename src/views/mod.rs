//! Screen controllers
//!
//! Each view owns the data one screen shows. The host calls `reload` when the
//! screen becomes active; a failed reload keeps the last good data and records
//! an [`Alert`] instead.

pub mod admin;
pub mod catalogue;
pub mod reservations;
pub mod seller;

pub use admin::{AdminCostumesView, AdminUsersView, UserForm};
pub use catalogue::{CatalogueView, CostumeDetailView};
pub use reservations::{MyReservationsView, ViewingForm};
pub use seller::{CostumeForm, SellerCalendarView, SellerCostumesView};

use crate::error::{Alert, ClientResult};
use crate::models::{User, UserRole};

/// Top-level destinations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Catalogue,
    Login,
    SellerHome,
    AdminHome,
}

impl Screen {
    /// Where a user lands after signing in
    pub fn home_for(user: Option<&User>) -> Self {
        match user.map(|u| u.role) {
            Some(UserRole::Admin) => Screen::AdminHome,
            Some(UserRole::Seller) => Screen::SellerHome,
            _ => Screen::Catalogue,
        }
    }
}

/// Loading flag and the last alert of a view
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewStatus {
    pub loading: bool,
    pub alert: Option<Alert>,
}

impl ViewStatus {
    fn begin(&mut self) {
        self.loading = true;
        self.alert = None;
    }

    /// Record the outcome of a request; errors become the view's alert
    fn finish<T>(&mut self, result: ClientResult<T>, fallback: &str) -> ClientResult<T> {
        self.loading = false;
        if let Err(e) = &result {
            tracing::warn!(error = %e, code = e.error_code(), "{}", fallback);
            self.alert = Some(e.alert(fallback));
        }
        result
    }

    pub fn take_alert(&mut self) -> Option<Alert> {
        self.alert.take()
    }
}
