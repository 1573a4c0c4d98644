//! `EventPublisher` 的两种适配器
//!
//! - `BusEventPublisher`：直接发布到交换机，传输错误转为 `DomainError::Publication`；
//! - `OutboxEventPublisher`：写入 Outbox，由 `EventEngine` 中继投递。
//!
use crate::{
    domain_event::{DomainEvent, StudentEvent},
    error::{DomainError, DomainResult},
    eventing::{EventBus, Outbox},
    persist::SerializedEvent,
    publisher::EventPublisher,
};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info};

pub struct BusEventPublisher {
    bus: Arc<dyn EventBus>,
}

impl BusEventPublisher {
    pub fn new(bus: Arc<dyn EventBus>) -> Self {
        Self { bus }
    }
}

#[async_trait]
impl EventPublisher for BusEventPublisher {
    async fn publish(&self, event: &StudentEvent) -> DomainResult<()> {
        let serialized = SerializedEvent::from_event(event)?;
        info!(
            event_id = serialized.event_id(),
            event_type = serialized.event_type(),
            routing_key = serialized.routing_key(),
            student_id = %event.student_id(),
            "publishing event"
        );

        match self.bus.publish(&serialized).await {
            Ok(()) => {
                info!(event_id = serialized.event_id(), "event published");
                Ok(())
            }
            Err(e) => {
                error!(
                    event_id = serialized.event_id(),
                    routing_key = serialized.routing_key(),
                    error = %e,
                    "event publication failed"
                );
                Err(DomainError::Publication {
                    event_id: event.event_id().to_string(),
                    reason: e.to_string(),
                })
            }
        }
    }
}

pub struct OutboxEventPublisher {
    outbox: Arc<dyn Outbox>,
}

impl OutboxEventPublisher {
    pub fn new(outbox: Arc<dyn Outbox>) -> Self {
        Self { outbox }
    }
}

#[async_trait]
impl EventPublisher for OutboxEventPublisher {
    async fn publish(&self, event: &StudentEvent) -> DomainResult<()> {
        let serialized = SerializedEvent::from_event(event)?;
        let event_id = serialized.event_id().to_string();

        self.outbox.append(serialized).await.map_err(|e| {
            error!(event_id, error = %e, "outbox append failed");
            DomainError::Publication {
                event_id: event_id.clone(),
                reason: e.to_string(),
            }
        })?;

        info!(event_id, routing_key = event.routing_key(), "event stored in outbox");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain_event::StudentCreated;
    use crate::entity::StudentId;
    use crate::eventing::{EventDeliverer, InMemoryOutbox, InMemoryTopicExchange};
    use crate::routing::queues;
    use chrono::Utc;
    use futures_util::StreamExt;
    use uuid::Uuid;

    fn created() -> StudentEvent {
        StudentEvent::StudentCreated(StudentCreated {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            student_id: StudentId::new(7),
            name: "Bruno Mendes".into(),
            registration: "987654".into(),
        })
    }

    #[tokio::test]
    async fn bus_publisher_delivers_to_bound_queue() {
        let exchange = InMemoryTopicExchange::default();
        let publisher = BusEventPublisher::new(Arc::new(exchange.clone()));
        let event = created();

        publisher.publish(&event).await.unwrap();

        let mut email = exchange.subscribe(queues::EMAIL).await.unwrap();
        let got = email.next().await.unwrap().unwrap();
        assert_eq!(got.event_id(), event.event_id().to_string());
        assert_eq!(got.decode::<StudentEvent>().unwrap(), event);
    }

    #[tokio::test]
    async fn bus_publisher_maps_transport_error() {
        let exchange = InMemoryTopicExchange::default();
        exchange.close();
        let publisher = BusEventPublisher::new(Arc::new(exchange));
        let event = created();

        match publisher.publish(&event).await.unwrap_err() {
            DomainError::Publication { event_id, reason } => {
                assert_eq!(event_id, event.event_id().to_string());
                assert!(reason.contains("closed"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn outbox_publisher_appends_pending_entry() {
        let outbox = Arc::new(InMemoryOutbox::new());
        let publisher = OutboxEventPublisher::new(outbox.clone());
        let event = created();

        publisher.publish(&event).await.unwrap();

        let pending = outbox.fetch_events().await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].routing_key(), "student.created");
        assert_eq!(pending[0].aggregate_id(), "7");
    }
}
