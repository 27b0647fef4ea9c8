//! Costumerie Client Library
//!
//! Typed client for the Costumerie costume rental API, the catalogue filter,
//! the seller availability calendar, and the screen controllers that a host
//! shell drives.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod session;
pub mod views;

pub use api::ApiClient;
pub use config::Config;
pub use error::{Alert, ClientError, ClientResult};
pub use session::Session;
