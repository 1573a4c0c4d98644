//! 事件子系统（eventing）
//!
//! 提供事件发布/订阅与中继的基础抽象与运行时：
//! - `EventBus`：按路由键发布、按队列订阅的统一接口；
//! - `InMemoryTopicExchange`：内存版主题交换机，按 `Topology` 扇出到各队列；
//! - `Outbox` / `EventDeliverer`：事件写入 Outbox，再由中继批量取出投递；
//! - `BusEventPublisher` / `OutboxEventPublisher`：`EventPublisher` 端口的两种适配器；
//! - `EventHandler`：订阅某个队列的消费者；
//! - `EventEngine`：编排 Outbox 中继与队列消费，提供关闭与等待的句柄。
//!
pub mod bus;
pub mod bus_inmemory;
pub mod deliverer;
pub mod engine;
pub mod handler;
pub mod outbox;
pub mod publishers;

pub use bus::EventBus;
pub use bus_inmemory::InMemoryTopicExchange;
pub use deliverer::EventDeliverer;
pub use engine::{EngineHandle, EventEngine, EventEngineConfig};
pub use handler::EventHandler;
pub use outbox::{InMemoryOutbox, Outbox, OutboxEntry};
pub use publishers::{BusEventPublisher, OutboxEventPublisher};
