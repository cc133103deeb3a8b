//! Background dispatch of order events.

use std::sync::Arc;

use tokio::{
    sync::{mpsc, oneshot},
    task::JoinHandle,
};
use tracing::{Instrument, debug, info_span, warn};

use crate::domain::events::{Notifier, OrderEvent, StatusHistoryRecorder};

#[derive(Debug)]
enum Message {
    Event(OrderEvent),
    Flush(oneshot::Sender<()>),
}

/// Cheap-to-clone handle for queueing order events.
#[derive(Debug, Clone)]
pub struct OrderEventsDispatcher {
    sender: mpsc::UnboundedSender<Message>,
}

impl OrderEventsDispatcher {
    /// Start the worker. It runs until every dispatcher handle is dropped.
    pub fn spawn(
        recorder: Arc<dyn StatusHistoryRecorder>,
        notifier: Arc<dyn Notifier>,
    ) -> (Self, JoinHandle<()>) {
        let (sender, mut receiver) = mpsc::unbounded_channel::<Message>();

        let worker = tokio::spawn(async move {
            while let Some(message) = receiver.recv().await {
                match message {
                    Message::Event(event) => {
                        let span = info_span!(
                            "order_events.handle",
                            order_uuid = %event.order_uuid,
                            new_status = %event.new_status,
                        );

                        handle(recorder.as_ref(), notifier.as_ref(), &event)
                            .instrument(span)
                            .await;
                    }
                    Message::Flush(done) => {
                        // Nobody waiting is fine.
                        let _ignored = done.send(());
                    }
                }
            }

            debug!("order events worker stopped");
        });

        (Self { sender }, worker)
    }

    /// Queue an event. Never blocks and never fails; a stopped worker drops it.
    pub fn dispatch(&self, event: OrderEvent) {
        if let Err(mpsc::error::SendError(Message::Event(event))) =
            self.sender.send(Message::Event(event))
        {
            warn!(
                order_uuid = %event.order_uuid,
                new_status = %event.new_status,
                "order events worker is not running; dropping event"
            );
        }
    }

    /// Wait until every event queued before this call has been handled.
    pub async fn flush(&self) {
        let (done, wait) = oneshot::channel();

        if self.sender.send(Message::Flush(done)).is_ok() {
            let _ignored = wait.await;
        }
    }
}

async fn handle(recorder: &dyn StatusHistoryRecorder, notifier: &dyn Notifier, event: &OrderEvent) {
    if let Err(error) = recorder.record(event).await {
        warn!(%error, "failed to record order status history");
    }

    if let Err(error) = notifier.notify(event).await {
        warn!(%error, "failed to send order notification");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::domain::{
        events::{MockNotifier, MockStatusHistoryRecorder, NotifierError},
        orders::{records::OrderUuid, status::OrderStatus},
        users::records::UserUuid,
    };

    use super::*;

    fn event(new_status: OrderStatus) -> OrderEvent {
        OrderEvent {
            order_uuid: OrderUuid::new(),
            order_number: "ORD-20260301-0000ABCD".to_string(),
            user_uuid: UserUuid::new(),
            old_status: None,
            new_status,
            actor_uuid: None,
            reason: None,
            notes: None,
        }
    }

    #[tokio::test]
    async fn events_are_recorded_then_notified() {
        let mut recorder = MockStatusHistoryRecorder::new();
        let mut notifier = MockNotifier::new();

        recorder
            .expect_record()
            .withf(|event| event.new_status == OrderStatus::Pending)
            .once()
            .returning(|_| Ok(()));

        notifier
            .expect_notify()
            .withf(|event| event.new_status == OrderStatus::Pending)
            .once()
            .returning(|_| Ok(()));

        let (dispatcher, _worker) =
            OrderEventsDispatcher::spawn(Arc::new(recorder), Arc::new(notifier));

        dispatcher.dispatch(event(OrderStatus::Pending));
        dispatcher.flush().await;
    }

    #[tokio::test]
    async fn recorder_failure_does_not_stop_notification_or_later_events() {
        let mut recorder = MockStatusHistoryRecorder::new();
        let mut notifier = MockNotifier::new();

        let recorded = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&recorded);

        recorder.expect_record().times(2).returning(move |_| {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(sqlx::Error::PoolTimedOut)
            } else {
                Ok(())
            }
        });

        notifier
            .expect_notify()
            .times(2)
            .returning(|_| Err(NotifierError("smtp down".to_string())));

        let (dispatcher, _worker) =
            OrderEventsDispatcher::spawn(Arc::new(recorder), Arc::new(notifier));

        dispatcher.dispatch(event(OrderStatus::Pending));
        dispatcher.dispatch(event(OrderStatus::Confirmed));
        dispatcher.flush().await;

        assert_eq!(recorded.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn dispatch_after_worker_stops_is_dropped_quietly() {
        let (dispatcher, worker) = OrderEventsDispatcher::spawn(
            Arc::new(MockStatusHistoryRecorder::new()),
            Arc::new(MockNotifier::new()),
        );

        worker.abort();

        // Wait for the abort to land so the receiver is dropped.
        let _ignored = worker.await;

        dispatcher.dispatch(event(OrderStatus::Cancelled));
        dispatcher.flush().await;
    }
}
