//! Shared types for the Comanda ordering backend
//!
//! Holds everything both the server and external tooling need to agree on:
//!
//! - **models**: catalog entities (restaurant, category, employee, dining
//!   table, menu item) plus their create/update payloads
//! - **order**: the order domain — order, items, status, history, views
//! - **error**: unified [`AppError`] / [`AppResponse`] API error surface
//! - **util**: snowflake id generation and millisecond timestamps

pub mod error;
pub mod models;
pub mod order;
pub mod util;

pub use error::{AppError, AppResponse, AppResult};
pub use util::{now_millis, snowflake_id};
