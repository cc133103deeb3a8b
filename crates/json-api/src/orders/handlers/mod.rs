//! Order Handlers

pub(crate) mod admin_index;
pub(crate) mod cancel;
pub(crate) mod create;
pub(crate) mod get;
pub(crate) mod history;
pub(crate) mod index;
pub(crate) mod payment;
pub(crate) mod status;
pub(crate) mod verify;
