//! User Data

use crate::domain::users::records::{Role, UserUuid};

/// New User Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub uuid: UserUuid,
    pub email: String,
    pub name: String,
    pub role: Role,
}
