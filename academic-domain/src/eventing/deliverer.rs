//! 事件中继（EventDeliverer）
//!
//! 负责从本地存储（Outbox）批量取出待投递事件，并在发布后
//! 标记成功或失败，便于重试与审计。
//!
use crate::{error::DomainResult as Result, persist::SerializedEvent};
use async_trait::async_trait;

/// 事件中继：从 Outbox 拉取待发送的事件
#[async_trait]
pub trait EventDeliverer: Send + Sync {
    /// 拉取待投递的事件
    async fn fetch_events(&self) -> Result<Vec<SerializedEvent>>;

    /// 将事件标记为已成功投递
    async fn mark_delivered(&self, events: &[&SerializedEvent]) -> Result<()>;

    /// 将事件标记为投递失败（累加 attempts，记录最后一次错误）
    async fn mark_failed(&self, events: &[&SerializedEvent], reason: &str) -> Result<()>;
}
