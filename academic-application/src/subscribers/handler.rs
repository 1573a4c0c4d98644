use super::{ActionSink, Subscriber};
use academic_domain::{
    domain_event::{DomainEvent, StudentEvent},
    eventing::EventHandler,
    persist::SerializedEvent,
};
use async_trait::async_trait;
use dashmap::DashSet;
use std::sync::Arc;
use tracing::{debug, info};

/// 将纯函数订阅者接入事件引擎
///
/// 解码 → 按事件 ID 去重 → `react` → 交给 `ActionSink`。
/// 只有动作执行成功后才记为已处理；处理失败由引擎记录日志，不会自动重试，
/// 但同一事件若再次到达（中继的至少一次投递）仍会执行。
///
/// 已处理 ID 集合只增不减，内存占用与处理过的事件数成正比。
pub struct SubscriberHandler<S> {
    subscriber: S,
    sink: Arc<dyn ActionSink>,
    processed: DashSet<String>,
}

impl<S: Subscriber> SubscriberHandler<S> {
    pub fn new(subscriber: S, sink: Arc<dyn ActionSink>) -> Self {
        Self {
            subscriber,
            sink,
            processed: DashSet::new(),
        }
    }

    pub fn processed_count(&self) -> usize {
        self.processed.len()
    }
}

#[async_trait]
impl<S: Subscriber> EventHandler for SubscriberHandler<S> {
    fn handler_name(&self) -> &str {
        self.subscriber.name()
    }

    fn queue(&self) -> &str {
        self.subscriber.queue()
    }

    async fn handle(&self, event: &SerializedEvent) -> anyhow::Result<()> {
        let event_id = event.event_id();
        if self.processed.contains(event_id) {
            debug!(
                subscriber = self.subscriber.name(),
                event_id, "duplicate delivery skipped"
            );
            return Ok(());
        }

        let decoded: StudentEvent = event.decode()?;
        match self.subscriber.react(&decoded) {
            Some(action) => {
                info!(
                    subscriber = self.subscriber.name(),
                    event_id,
                    event_type = decoded.event_type(),
                    student_id = %decoded.student_id(),
                    ?action,
                    "subscriber reacted"
                );
                self.sink
                    .execute(self.subscriber.name(), event_id, action)
                    .await?;
            }
            None => {
                debug!(
                    subscriber = self.subscriber.name(),
                    event_type = decoded.event_type(),
                    "event ignored"
                );
            }
        }

        self.processed.insert(event_id.to_string());
        Ok(())
    }
}
