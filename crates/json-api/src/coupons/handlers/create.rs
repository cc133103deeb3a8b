//! Create Coupon Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::coupons::{
    data::NewCoupon,
    records::{Applicability, Audience, CouponUuid, DiscountType},
};

use crate::{
    coupons::{errors::into_status_error, index::CouponResponse},
    extensions::*,
    state::State,
};

/// Who may use a coupon, based on their order history.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct AudienceRequest {
    pub new_users_only: bool,
    pub existing_users_only: bool,
    pub first_order_only: bool,
    pub min_previous_orders: Option<u32>,
}

/// Which cart lines a coupon discounts. Empty include lists match everything.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct ApplicabilityRequest {
    pub include_products: Vec<Uuid>,
    pub exclude_products: Vec<Uuid>,
    pub include_categories: Vec<String>,
    pub exclude_categories: Vec<String>,
    pub include_brands: Vec<String>,
    pub exclude_brands: Vec<String>,
}

/// Create Coupon Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateCouponRequest {
    pub code: String,
    pub description: Option<String>,

    /// `percentage` or `fixed`
    pub discount_type: String,

    /// Percent for percentage coupons, paise for fixed ones
    pub discount_value: u64,

    /// Cap on a percentage discount, in paise
    pub max_discount: Option<u64>,

    pub min_order_value: Option<u64>,
    pub max_order_value: Option<u64>,

    /// RFC 3339 timestamp
    pub starts_at: Option<String>,

    /// RFC 3339 timestamp
    pub expires_at: Option<String>,

    pub usage_limit: Option<u32>,
    pub per_user_limit: Option<u32>,

    #[serde(default)]
    pub audience: AudienceRequest,

    #[serde(default)]
    pub applicability: ApplicabilityRequest,
}

fn parse_timestamp(value: Option<String>, field: &str) -> Result<Option<Timestamp>, StatusError> {
    value
        .map(|value| value.parse::<Timestamp>())
        .transpose()
        .or_400(&format!("could not parse \"{field}\""))
}

impl CreateCouponRequest {
    fn into_new_coupon(self) -> Result<NewCoupon, StatusError> {
        let discount_type = self
            .discount_type
            .parse::<DiscountType>()
            .or_400("discountType must be \"percentage\" or \"fixed\"")?;

        let audience = Audience {
            new_users_only: self.audience.new_users_only,
            existing_users_only: self.audience.existing_users_only,
            first_order_only: self.audience.first_order_only,
            min_previous_orders: self.audience.min_previous_orders,
        };

        let filters = self.applicability;

        Ok(NewCoupon {
            uuid: CouponUuid::new(),
            code: self.code.trim().to_uppercase(),
            description: self.description,
            discount_type,
            discount_value: self.discount_value,
            max_discount: self.max_discount,
            min_order_value: self.min_order_value,
            max_order_value: self.max_order_value,
            starts_at: parse_timestamp(self.starts_at, "startsAt")?,
            expires_at: parse_timestamp(self.expires_at, "expiresAt")?,
            usage_limit: self.usage_limit,
            per_user_limit: self.per_user_limit,
            audience,
            applicability: Applicability {
                include_products: filters.include_products.into_iter().map(Into::into).collect(),
                exclude_products: filters.exclude_products.into_iter().map(Into::into).collect(),
                include_categories: filters.include_categories,
                exclude_categories: filters.exclude_categories,
                include_brands: filters.include_brands,
                exclude_brands: filters.exclude_brands,
            },
        })
    }
}

/// Create Coupon Handler
///
/// Codes are stored upper-cased.
#[endpoint(
    tags("admin"),
    summary = "Create Coupon",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Coupon created"),
        (status_code = StatusCode::CONFLICT, description = "Code already exists"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateCouponRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<CouponResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let coupon = json.into_inner().into_new_coupon()?;

    let coupon = state
        .app
        .coupons
        .create_coupon(coupon)
        .await
        .map_err(into_status_error)?;

    res.status_code(StatusCode::CREATED);

    Ok(Json(coupon.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use storefront_app::domain::coupons::{
        CouponsServiceError, MockCouponsService, records::CouponRecord,
    };

    use crate::test_helpers::{admin_service, app_context};

    use super::*;

    fn make_service(coupons: MockCouponsService) -> Service {
        let mut app = app_context();

        app.coupons = Arc::new(coupons);

        admin_service(app, Router::with_path("admin/coupons").post(handler))
    }

    fn created(coupon: NewCoupon) -> CouponRecord {
        CouponRecord {
            uuid: coupon.uuid,
            code: coupon.code,
            description: coupon.description,
            discount_type: coupon.discount_type,
            discount_value: coupon.discount_value,
            max_discount: coupon.max_discount,
            min_order_value: coupon.min_order_value,
            max_order_value: coupon.max_order_value,
            starts_at: coupon.starts_at,
            expires_at: coupon.expires_at,
            usage_limit: coupon.usage_limit,
            used_count: 0,
            per_user_limit: coupon.per_user_limit,
            audience: coupon.audience,
            applicability: coupon.applicability,
            is_active: true,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        }
    }

    #[tokio::test]
    async fn test_create_coupon_normalises_code() -> TestResult {
        let mut coupons = MockCouponsService::new();

        coupons
            .expect_create_coupon()
            .once()
            .withf(|new| {
                new.code == "SAVE10"
                    && new.discount_type == DiscountType::Percentage
                    && new.applicability.include_categories == ["footwear"]
                    && new.expires_at.is_some()
            })
            .return_once(|new| Ok(created(new)));

        let mut res = TestClient::post("http://example.com/admin/coupons")
            .json(&json!({
                "code": " save10 ",
                "discountType": "percentage",
                "discountValue": 10,
                "expiresAt": "2027-01-01T00:00:00Z",
                "applicability": { "includeCategories": ["footwear"] },
            }))
            .send(&make_service(coupons))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));

        let body: CouponResponse = res.take_json().await?;

        assert_eq!(body.code, "SAVE10");
        assert_eq!(body.discount_type, "percentage");

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_discount_type_returns_400() -> TestResult {
        let mut coupons = MockCouponsService::new();

        coupons.expect_create_coupon().never();

        let res = TestClient::post("http://example.com/admin/coupons")
            .json(&json!({ "code": "FREE", "discountType": "bogo", "discountValue": 1 }))
            .send(&make_service(coupons))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_unparseable_expiry_returns_400() -> TestResult {
        let mut coupons = MockCouponsService::new();

        coupons.expect_create_coupon().never();

        let res = TestClient::post("http://example.com/admin/coupons")
            .json(&json!({
                "code": "SAVE10",
                "discountType": "percentage",
                "discountValue": 10,
                "expiresAt": "next tuesday",
            }))
            .send(&make_service(coupons))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_code_returns_409() -> TestResult {
        let mut coupons = MockCouponsService::new();

        coupons
            .expect_create_coupon()
            .once()
            .return_once(|_| Err(CouponsServiceError::AlreadyExists));

        let res = TestClient::post("http://example.com/admin/coupons")
            .json(&json!({ "code": "SAVE10", "discountType": "fixed", "discountValue": 5000 }))
            .send(&make_service(coupons))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }
}
