//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use storefront_app::{
    auth::MockAuthService,
    context::AppContext,
    domain::{
        addresses::{
            MockAddressesService,
            records::{AddressRecord, AddressUuid},
        },
        carts::MockCartsService,
        coupons::MockCouponsService,
        orders::{
            MockOrdersService,
            pricing::compute_totals,
            records::{OrderRecord, OrderUuid},
            status::{OrderStatus, PaymentMethod, PaymentStatus},
        },
        payments::MockPaymentsService,
        products::{
            MockProductsService,
            records::{ProductRecord, ProductUuid},
        },
        reviews::{
            MockReviewsService,
            records::{ReviewRecord, ReviewUuid},
        },
        users::{
            MockUsersService,
            records::{CurrentUser, Role, UserUuid},
        },
        wishlist::MockWishlistService,
    },
};

use crate::{extensions::*, state::State};

pub(crate) const TEST_CUSTOMER: CurrentUser = CurrentUser {
    uuid: UserUuid::from_uuid(Uuid::from_u128(1)),
    role: Role::Customer,
};

pub(crate) const TEST_ADMIN: CurrentUser = CurrentUser {
    uuid: UserUuid::from_uuid(Uuid::from_u128(2)),
    role: Role::Admin,
};

/// A context whose mocks fail the test on any call.
pub(crate) fn app_context() -> AppContext {
    AppContext {
        auth: Arc::new(MockAuthService::new()),
        users: Arc::new(MockUsersService::new()),
        addresses: Arc::new(MockAddressesService::new()),
        products: Arc::new(MockProductsService::new()),
        carts: Arc::new(MockCartsService::new()),
        coupons: Arc::new(MockCouponsService::new()),
        orders: Arc::new(MockOrdersService::new()),
        payments: Arc::new(MockPaymentsService::new()),
        reviews: Arc::new(MockReviewsService::new()),
        wishlist: Arc::new(MockWishlistService::new()),
    }
}

pub(crate) fn state_for(app: AppContext) -> Arc<State> {
    State::from_app_context(app)
}

fn signed_in(user: CurrentUser) -> impl Handler {
    #[derive(Debug)]
    struct SignedIn(CurrentUser);

    #[async_trait]
    impl Handler for SignedIn {
        async fn handle(
            &self,
            req: &mut Request,
            depot: &mut Depot,
            res: &mut Response,
            ctrl: &mut FlowCtrl,
        ) {
            depot.insert_current_user(self.0);
            ctrl.call_next(req, depot, res).await;
        }
    }

    SignedIn(user)
}

/// Serve `route` as [`TEST_CUSTOMER`], skipping token authentication.
pub(crate) fn customer_service(app: AppContext, route: Router) -> Service {
    service_as(TEST_CUSTOMER, app, route)
}

/// Serve `route` as [`TEST_ADMIN`], skipping token authentication.
pub(crate) fn admin_service(app: AppContext, route: Router) -> Service {
    service_as(TEST_ADMIN, app, route)
}

fn service_as(user: CurrentUser, app: AppContext, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_for(app)))
            .hoop(signed_in(user))
            .push(route),
    )
}

pub(crate) fn make_product(uuid: ProductUuid) -> ProductRecord {
    ProductRecord {
        uuid,
        name: "Trail Shoe".to_string(),
        slug: "trail-shoe".to_string(),
        image_url: None,
        category: Some("footwear".to_string()),
        brand: Some("Northpeak".to_string()),
        price: 250_00,
        stock: 10,
        is_active: true,
        variants: Vec::new(),
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_address(uuid: AddressUuid) -> AddressRecord {
    AddressRecord {
        uuid,
        user_uuid: TEST_CUSTOMER.uuid,
        recipient: "Asha Rao".to_string(),
        phone: "+91 98450 00000".to_string(),
        line1: "12 MG Road".to_string(),
        line2: None,
        city: "Bengaluru".to_string(),
        state: "KA".to_string(),
        postal_code: "560001".to_string(),
        country: "IN".to_string(),
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

/// A pending gateway order worth 300.00 before tax and shipping.
pub(crate) fn make_order(uuid: OrderUuid) -> OrderRecord {
    let address = AddressUuid::from_uuid(Uuid::from_u128(3));

    OrderRecord {
        uuid,
        order_number: "ORD-20261019-AB12CD34".to_string(),
        user_uuid: TEST_CUSTOMER.uuid,
        shipping_address_uuid: address,
        billing_address_uuid: address,
        payment_method: PaymentMethod::Gateway,
        payment_status: PaymentStatus::Pending,
        status: OrderStatus::Pending,
        totals: compute_totals(300_00, 0),
        coupon_uuid: None,
        coupon_code: None,
        gateway_order_id: None,
        gateway_payment_id: None,
        notes: None,
        cancellation_reason: None,
        items: Vec::new(),
        paid_at: None,
        delivered_at: None,
        cancelled_at: None,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

/// An approved four-star review by [`TEST_CUSTOMER`].
pub(crate) fn make_review(uuid: ReviewUuid, product: ProductUuid) -> ReviewRecord {
    ReviewRecord {
        uuid,
        user_uuid: TEST_CUSTOMER.uuid,
        product_uuid: product,
        rating: 4,
        title: Some("Comfortable".to_string()),
        body: None,
        verified_purchase: true,
        is_approved: true,
        helpful_count: 0,
        report_count: 0,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}
