//! 下游订阅者
//!
//! 每个订阅者是一个纯函数：`react(&StudentEvent) -> Option<Action>`，
//! 只决定“要做什么”，不执行副作用；不关心的事件返回 `None`。
//! 实际执行交给 `ActionSink`，接入事件引擎由 `SubscriberHandler` 完成。
//!
mod action;
mod analytics;
mod certificate;
mod email;
mod gamification;
#[cfg(feature = "eventing")]
mod handler;

pub use action::{Action, ActionLog, ActionSink, Badge, Level, RecordedAction};
pub use analytics::AnalyticsSubscriber;
pub use certificate::CertificateSubscriber;
pub use email::EmailSubscriber;
pub use gamification::GamificationSubscriber;
#[cfg(feature = "eventing")]
pub use handler::SubscriberHandler;

use academic_domain::domain_event::StudentEvent;

pub trait Subscriber: Send + Sync + 'static {
    /// 订阅者名称（日志与动作记录）
    fn name(&self) -> &'static str;

    /// 订阅者独占的队列
    fn queue(&self) -> &'static str;

    fn react(&self, event: &StudentEvent) -> Option<Action>;
}
