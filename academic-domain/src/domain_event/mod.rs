//! 领域事件（Domain Event）
//!
//! 定义事件载荷需要实现的最小接口（`DomainEvent`），以及学生聚合的三种事件：
//! `StudentCreated`、`AttemptRecorded`、`CourseCompleted`。
//! 每个事件都携带全局唯一的事件 ID 与发生时间，并且只能从已持久化的状态构造。

mod domain_event_trait;
mod student_events;

pub use domain_event_trait::DomainEvent;
pub use student_events::{AttemptRecorded, CourseCompleted, StudentCreated, StudentEvent};
