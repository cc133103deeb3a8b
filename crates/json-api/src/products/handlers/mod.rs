//! Product Handlers

pub(crate) mod create;
pub(crate) mod get;
pub(crate) mod index;
pub(crate) mod update;
pub(crate) mod variants;
