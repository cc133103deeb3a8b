//! Create Address Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use storefront_app::domain::addresses::{data::NewAddress, records::AddressUuid};

use crate::{
    addresses::{errors::into_status_error, index::AddressResponse},
    extensions::*,
    state::State,
};

/// Create Address Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateAddressRequest {
    pub recipient: String,
    pub phone: String,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,

    #[serde(default = "default_country")]
    pub country: String,
}

fn default_country() -> String {
    "IN".to_string()
}

impl From<CreateAddressRequest> for NewAddress {
    fn from(request: CreateAddressRequest) -> Self {
        NewAddress {
            uuid: AddressUuid::new(),
            recipient: request.recipient,
            phone: request.phone,
            line1: request.line1,
            line2: request.line2,
            city: request.city,
            state: request.state,
            postal_code: request.postal_code,
            country: request.country,
        }
    }
}

/// Create Address Handler
#[endpoint(
    tags("addresses"),
    summary = "Create Address",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Address created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateAddressRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<AddressResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.current_user_or_401()?;

    let address = state
        .app
        .addresses
        .create_address(user.uuid, json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    res.status_code(StatusCode::CREATED);

    Ok(Json(address.into()))
}
