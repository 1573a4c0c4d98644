//! 事件发布端口（EventPublisher）
//!
//! 用例在持久化成功后通过该端口发布一个类型化的领域事件。
//! 发布失败以错误返回，由调用方向上传播；核心层不做重试与退避。
//!
use crate::{domain_event::StudentEvent, error::DomainResult};
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// 发布单个事件
    async fn publish(&self, event: &StudentEvent) -> DomainResult<()>;
}

#[async_trait]
impl<T> EventPublisher for Arc<T>
where
    T: EventPublisher + ?Sized,
{
    async fn publish(&self, event: &StudentEvent) -> DomainResult<()> {
        (**self).publish(event).await
    }
}
