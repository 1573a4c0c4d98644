//! 持久化（persist）
//!
//! - 学生仓储端口（`StudentRepository`）与内存实现（`InMemoryStudentRepository`）；
//! - 事件的持久化/传输形态（`SerializedEvent`），供 Outbox 与总线使用。
//!
//! 具体存储后端由上层提供实现并注入，本模块只定义协议与参考实现。
//!
mod inmemory_student_repository;
mod serialized_event;
mod student_repository;

pub use inmemory_student_repository::InMemoryStudentRepository;
pub use serialized_event::SerializedEvent;
pub use student_repository::StudentRepository;
