use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use uuid::Uuid;

/// 领域事件载荷需要满足的通用能力边界
pub trait DomainEvent:
    Clone + PartialEq + fmt::Debug + Serialize + DeserializeOwned + Send + Sync
{
    /// 事件唯一标识（消费端据此做幂等）
    fn event_id(&self) -> Uuid;

    /// 事件类型名
    fn event_type(&self) -> &'static str;

    /// 事件载荷版本（用于版本兼容）
    fn event_version(&self) -> usize {
        1
    }

    /// 发布时使用的路由键
    fn routing_key(&self) -> &'static str;

    /// 事件所属聚合类型
    fn aggregate_type(&self) -> &'static str;

    /// 事件所属聚合标识
    fn aggregate_id(&self) -> String;

    /// 事件发生时间
    fn occurred_at(&self) -> DateTime<Utc>;
}
