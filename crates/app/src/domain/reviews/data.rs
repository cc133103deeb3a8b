//! Review Data

use crate::domain::reviews::records::ReviewUuid;

/// New Review
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReview {
    pub uuid: ReviewUuid,
    pub rating: u8,
    pub title: Option<String>,
    pub body: Option<String>,
}
