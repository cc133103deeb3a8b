//! App Context

use std::sync::Arc;

use hmac::digest::InvalidLength;
use thiserror::Error;
use tokio::task::JoinHandle;

use crate::{
    auth::{AuthService, PgAuthService},
    database::{self, Db, PoolSettings},
    domain::{
        addresses::{AddressesService, PgAddressesService},
        carts::{CartsService, PgCartsService},
        coupons::{CouponsService, PgCouponsService},
        events::{LogNotifier, OrderEventsDispatcher, PgStatusHistoryRecorder},
        orders::{OrdersService, PgOrdersService},
        payments::{
            PaymentsService, PgPaymentsService,
            gateway::{GatewayConfig, HttpPaymentGateway},
        },
        products::{PgProductsService, ProductsService},
        reviews::{PgReviewsService, ReviewsService},
        users::{PgUsersService, UsersService},
        wishlist::{PgWishlistService, WishlistService},
    },
    signing::HmacSigner,
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("invalid signing key")]
    SigningKey(#[source] InvalidLength),
}

/// Secrets and outbound settings the services are built with.
#[derive(Clone)]
pub struct AppSettings {
    pub database_url: String,
    pub pool: PoolSettings,

    /// Keys API token verifiers.
    pub token_pepper: String,

    pub gateway: GatewayConfig,

    /// Keys the payment callback signatures.
    pub payment_signature_secret: String,
}

impl std::fmt::Debug for AppSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppSettings")
            .field("pool", &self.pool)
            .field("gateway", &self.gateway)
            .finish_non_exhaustive()
    }
}

#[derive(Clone)]
pub struct AppContext {
    pub auth: Arc<dyn AuthService>,
    pub users: Arc<dyn UsersService>,
    pub addresses: Arc<dyn AddressesService>,
    pub products: Arc<dyn ProductsService>,
    pub carts: Arc<dyn CartsService>,
    pub coupons: Arc<dyn CouponsService>,
    pub orders: Arc<dyn OrdersService>,
    pub payments: Arc<dyn PaymentsService>,
    pub reviews: Arc<dyn ReviewsService>,
    pub wishlist: Arc<dyn WishlistService>,
}

impl AppContext {
    /// Connect to the database, start the order events worker and build every service.
    ///
    /// Returns the worker handle alongside the context; it finishes once the
    /// context and all its clones are dropped.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails or a
    /// signing key is rejected.
    pub async fn from_settings(
        settings: AppSettings,
    ) -> Result<(Self, JoinHandle<()>), AppInitError> {
        let pool = database::connect_with(&settings.database_url, settings.pool)
            .await
            .map_err(AppInitError::Database)?;

        let token_signer =
            HmacSigner::new(settings.token_pepper.as_bytes()).map_err(AppInitError::SigningKey)?;

        let payment_signer = HmacSigner::new(settings.payment_signature_secret.as_bytes())
            .map_err(AppInitError::SigningKey)?;

        let (events, worker) = OrderEventsDispatcher::spawn(
            Arc::new(PgStatusHistoryRecorder::new(pool.clone())),
            Arc::new(LogNotifier),
        );

        let db = Db::new(pool.clone());
        let key_id = settings.gateway.key_id.clone();
        let currency = settings.gateway.currency.clone();

        let context = Self {
            auth: Arc::new(PgAuthService::new(pool.clone(), token_signer)),
            users: Arc::new(PgUsersService::new(pool)),
            addresses: Arc::new(PgAddressesService::new(db.clone())),
            products: Arc::new(PgProductsService::new(db.clone())),
            carts: Arc::new(PgCartsService::new(db.clone())),
            coupons: Arc::new(PgCouponsService::new(db.clone())),
            orders: Arc::new(PgOrdersService::new(db.clone(), events.clone())),
            payments: Arc::new(PgPaymentsService::new(
                db.clone(),
                events,
                Arc::new(HttpPaymentGateway::new(settings.gateway)),
                payment_signer,
                key_id,
                currency,
            )),
            reviews: Arc::new(PgReviewsService::new(db.clone())),
            wishlist: Arc::new(PgWishlistService::new(db)),
        };

        Ok((context, worker))
    }
}
