//! Payments

pub mod errors;
pub mod gateway;
pub mod models;
pub mod service;

pub use errors::PaymentsServiceError;
pub use service::*;
