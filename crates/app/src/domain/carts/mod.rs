//! Carts

pub mod data;
pub mod errors;
pub mod models;
pub mod records;
pub(crate) mod repositories;
pub mod service;
pub(crate) mod validation;

pub use errors::CartsServiceError;
pub use service::*;
