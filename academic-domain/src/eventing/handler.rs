//! 事件处理器（EventHandler）
//!
//! 绑定到交换机上的某个队列，消费该队列收到的每一条事件。
//!
use crate::persist::SerializedEvent;
use async_trait::async_trait;

#[async_trait]
pub trait EventHandler: Send + Sync {
    /// 处理器名称（用于日志与审计）
    fn handler_name(&self) -> &str;
    /// 订阅的队列名
    fn queue(&self) -> &str;
    async fn handle(&self, event: &SerializedEvent) -> anyhow::Result<()>;
}
