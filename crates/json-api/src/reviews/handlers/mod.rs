//! Review Handlers

pub(crate) mod create;
pub(crate) mod helpful;
pub(crate) mod index;
pub(crate) mod moderate;
pub(crate) mod report;
