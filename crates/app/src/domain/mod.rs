//! Storefront Domain Concerns

pub mod addresses;
pub mod carts;
pub mod coupons;
pub mod events;
pub mod orders;
pub mod payments;
pub mod products;
pub mod reviews;
pub mod users;
pub mod wishlist;
