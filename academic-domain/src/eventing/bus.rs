//! 事件总线（EventBus）协议
//!
//! 以主题交换机语义定义发布与订阅：发布按事件的路由键路由到绑定队列，
//! 订阅按队列名返回 'static 生命周期的事件流，便于在 tokio::spawn 中消费。
//!
use crate::{error::DomainResult as Result, persist::SerializedEvent};
use async_trait::async_trait;
use futures_core::stream::BoxStream;

/// 事件总线：负责路由事件与提供队列事件流
#[async_trait]
pub trait EventBus: Send + Sync {
    /// 按 `event.routing_key()` 发布到交换机
    async fn publish(&self, event: &SerializedEvent) -> Result<()>;

    async fn publish_batch(&self, events: &[SerializedEvent]) -> Result<()> {
        for event in events {
            self.publish(event).await?;
        }
        Ok(())
    }

    /// 订阅指定队列，返回 'static 生命周期的事件流
    async fn subscribe(&self, queue: &str) -> Result<BoxStream<'static, Result<SerializedEvent>>>;
}
