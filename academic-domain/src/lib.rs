//! 学籍领域层（academic-domain）
//!
//! 围绕“学生学籍”聚合提供领域模型与端口定义：
//! - 值对象（`value_object`）：姓名、学籍号、最终成绩的自校验封装；
//! - 实体与聚合（`entity`、`student`）：学生生命周期规则；
//! - 领域事件（`domain_event`）与路由拓扑（`routing`）；
//! - 仓储端口与内存实现（`persist`）、事件发布端口（`publisher`）；
//! - 事件子系统（`eventing`，默认开启）：主题交换机、Outbox、事件引擎与发布适配器。
//!
//! 存储与消息传输均以端口抽象，基础设施可按需替换。
//!
//! 典型用法：
//! 1. 使用值对象工厂校验输入，`Student::create` 构建聚合；
//! 2. 通过 `StudentRepository` 持久化，得到带标识的持久化状态；
//! 3. 基于持久化状态构造 `StudentEvent`，交给 `EventPublisher` 发布；
//! 4. 若采用 Outbox，使用 `eventing::EventEngine` 将待投递事件中继到交换机并分发给订阅者。
//!
pub mod domain_event;
pub mod entity;
pub mod error;
#[cfg(feature = "eventing")]
pub mod eventing;
pub mod persist;
pub mod publisher;
pub mod routing;
pub mod student;
pub mod value_object;
