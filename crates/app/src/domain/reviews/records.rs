//! Review Records

use jiff::Timestamp;

use crate::{
    domain::{products::records::ProductUuid, users::records::UserUuid},
    uuids::TypedUuid,
};

/// Review UUID
pub type ReviewUuid = TypedUuid<ReviewRecord>;

/// Review Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewRecord {
    pub uuid: ReviewUuid,
    pub user_uuid: UserUuid,
    pub product_uuid: ProductUuid,

    /// 1 to 5.
    pub rating: u8,

    pub title: Option<String>,
    pub body: Option<String>,

    /// The author had a delivered order containing the product when reviewing.
    pub verified_purchase: bool,

    pub is_approved: bool,
    pub helpful_count: u32,
    pub report_count: u32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
