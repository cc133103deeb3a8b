//! List Addresses Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::addresses::records::AddressRecord;

use crate::{addresses::errors::into_status_error, extensions::*, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AddressResponse {
    pub uuid: Uuid,
    pub recipient: String,
    pub phone: String,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,

    /// ISO 3166-1 alpha-2
    pub country: String,

    pub created_at: String,
}

impl From<AddressRecord> for AddressResponse {
    fn from(address: AddressRecord) -> Self {
        AddressResponse {
            uuid: address.uuid.into(),
            recipient: address.recipient,
            phone: address.phone,
            line1: address.line1,
            line2: address.line2,
            city: address.city,
            state: address.state,
            postal_code: address.postal_code,
            country: address.country,
            created_at: address.created_at.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AddressesResponse {
    pub addresses: Vec<AddressResponse>,
}

/// List Addresses Handler
#[endpoint(
    tags("addresses"),
    summary = "List Addresses",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Address book"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<AddressesResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.current_user_or_401()?;

    let addresses = state
        .app
        .addresses
        .list_addresses(user.uuid)
        .await
        .map_err(into_status_error)?;

    Ok(Json(AddressesResponse {
        addresses: addresses.into_iter().map(Into::into).collect(),
    }))
}
