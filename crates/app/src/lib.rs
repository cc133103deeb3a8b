//! Storefront checkout domain services and persistence.

pub mod auth;
pub mod context;
pub mod database;
pub mod domain;
pub mod signing;
pub mod uuids;

#[cfg(test)]
mod test;
