//! 学籍应用层（academic-application）
//!
//! - 命令与处理器（`command`、`command_handler`、`command_bus`）；
//! - 三个写用例与一个只读查询（`use_cases`）；
//! - 下游订阅者（`subscribers`）：纯函数反应 + 接入事件引擎的适配器。
//!
pub mod command;
pub mod command_bus;
pub mod command_handler;
pub mod context;
pub mod dto;
pub mod error;
pub mod inmemory_command_bus;
pub mod query;
pub mod query_handler;
pub mod subscribers;
pub mod use_cases;

pub use inmemory_command_bus::InMemoryCommandBus;
