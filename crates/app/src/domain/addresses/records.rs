//! Address Records

use jiff::Timestamp;

use crate::{domain::users::records::UserUuid, uuids::TypedUuid};

/// Address UUID
pub type AddressUuid = TypedUuid<AddressRecord>;

/// Address Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressRecord {
    pub uuid: AddressUuid,
    pub user_uuid: UserUuid,
    pub recipient: String,
    pub phone: String,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
