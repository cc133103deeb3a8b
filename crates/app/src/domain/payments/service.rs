//! Payments service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use tracing::{info, warn};

use crate::{
    database::Db,
    domain::{
        events::{OrderEvent, OrderEventsDispatcher},
        orders::{
            records::{OrderRecord, OrderUuid},
            repository::PgOrdersRepository,
            status::{OrderStatus, PaymentMethod, PaymentStatus},
        },
        payments::{
            errors::PaymentsServiceError,
            gateway::PaymentGateway,
            models::{PaymentConfirmation, PaymentSession},
        },
        users::records::UserUuid,
    },
    signing::HmacSigner,
};

/// Whether `order` can still be paid online.
fn check_payable(order: &OrderRecord) -> Result<(), PaymentsServiceError> {
    if order.status == OrderStatus::Cancelled {
        return Err(PaymentsServiceError::OrderCancelled);
    }

    if order.payment_method == PaymentMethod::Cod
        || order.payment_status == PaymentStatus::Paid
        || order.status != OrderStatus::Pending
    {
        return Err(PaymentsServiceError::NotPayable);
    }

    Ok(())
}

pub struct PgPaymentsService {
    db: Db,
    events: OrderEventsDispatcher,
    gateway: Arc<dyn PaymentGateway>,
    signer: HmacSigner,
    key_id: String,
    currency: String,
    orders_repository: PgOrdersRepository,
}

impl std::fmt::Debug for PgPaymentsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgPaymentsService")
            .field("key_id", &self.key_id)
            .field("currency", &self.currency)
            .finish_non_exhaustive()
    }
}

impl PgPaymentsService {
    /// `signer` is keyed with the secret the gateway signs callbacks with.
    #[must_use]
    pub fn new(
        db: Db,
        events: OrderEventsDispatcher,
        gateway: Arc<dyn PaymentGateway>,
        signer: HmacSigner,
        key_id: String,
        currency: String,
    ) -> Self {
        Self {
            db,
            events,
            gateway,
            signer,
            key_id,
            currency,
            orders_repository: PgOrdersRepository::new(),
        }
    }
}

#[async_trait]
impl PaymentsService for PgPaymentsService {
    #[tracing::instrument(
        name = "payments.service.initiate_payment",
        skip(self),
        fields(user_uuid = %user, order_uuid = %order),
        err
    )]
    async fn initiate_payment(
        &self,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<PaymentSession, PaymentsServiceError> {
        let mut tx = self.db.begin().await?;

        let current = self
            .orders_repository
            .find_order(&mut tx, order, Some(user))
            .await?
            .ok_or(PaymentsServiceError::NotFound)?;

        tx.commit().await?;

        check_payable(&current)?;

        if let Some(gateway_order_id) = current.gateway_order_id {
            return Ok(PaymentSession {
                gateway_order_id,
                amount: current.totals.total,
                currency: self.currency.clone(),
                key_id: self.key_id.clone(),
            });
        }

        // No transaction is held across the gateway call.
        let remote = self
            .gateway
            .create_remote_order(current.totals.total, &current.order_number)
            .await?;

        let mut tx = self.db.begin().await?;

        self.orders_repository
            .set_gateway_order(&mut tx, order, &remote.id)
            .await?;

        tx.commit().await?;

        info!(gateway_order_id = %remote.id, "gateway order created");

        Ok(PaymentSession {
            gateway_order_id: remote.id,
            amount: remote.amount,
            currency: remote.currency,
            key_id: self.key_id.clone(),
        })
    }

    #[tracing::instrument(
        name = "payments.service.verify_payment",
        skip(self, confirmation),
        fields(
            user_uuid = %user,
            order_uuid = %order,
            gateway_order_id = %confirmation.gateway_order_id
        ),
        err
    )]
    async fn verify_payment(
        &self,
        user: UserUuid,
        order: OrderUuid,
        confirmation: PaymentConfirmation,
    ) -> Result<OrderRecord, PaymentsServiceError> {
        if !self.signer.verify(
            confirmation.signed_payload().as_bytes(),
            &confirmation.signature,
        ) {
            warn!("rejected payment callback with bad signature");

            return Err(PaymentsServiceError::InvalidSignature);
        }

        let mut tx = self.db.begin().await?;

        let mut current = self
            .orders_repository
            .lock_order(&mut tx, order, Some(user))
            .await?
            .ok_or(PaymentsServiceError::NotFound)?;

        if current.gateway_order_id.as_deref() != Some(confirmation.gateway_order_id.as_str()) {
            return Err(PaymentsServiceError::GatewayOrderMismatch);
        }

        if current.status == OrderStatus::Cancelled {
            return Err(PaymentsServiceError::OrderCancelled);
        }

        if current.payment_status == PaymentStatus::Paid {
            self.orders_repository
                .attach_items(&mut tx, std::slice::from_mut(&mut current))
                .await?;

            tx.commit().await?;

            return Ok(current);
        }

        check_payable(&current)?;

        let mut paid = self
            .orders_repository
            .mark_paid(&mut tx, order, &confirmation.gateway_payment_id)
            .await?;

        self.orders_repository
            .attach_items(&mut tx, std::slice::from_mut(&mut paid))
            .await?;

        tx.commit().await?;

        info!(gateway_payment_id = %confirmation.gateway_payment_id, "payment verified");

        self.events
            .dispatch(OrderEvent::transition(&paid, Some(current.status)).by(Some(user)));

        Ok(paid)
    }
}

#[automock]
#[async_trait]
pub trait PaymentsService: Send + Sync {
    /// Open a gateway checkout for one of the shopper's pending orders.
    async fn initiate_payment(
        &self,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<PaymentSession, PaymentsServiceError>;

    /// Check the gateway's callback signature and mark the order paid.
    async fn verify_payment(
        &self,
        user: UserUuid,
        order: OrderUuid,
        confirmation: PaymentConfirmation,
    ) -> Result<OrderRecord, PaymentsServiceError>;
}
