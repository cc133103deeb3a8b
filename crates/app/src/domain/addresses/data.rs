//! Address Data

use crate::domain::addresses::records::AddressUuid;

/// New Address Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAddress {
    pub uuid: AddressUuid,
    pub recipient: String,
    pub phone: String,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}
