//! 实体（Entity）基础抽象
//!
//! 为聚合与实体提供统一的标识与版本（乐观锁）能力。
//! 标识由存储层在首次保存时分配，保存前为空。
//!
use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

/// 具备唯一标识与版本的实体抽象
pub trait Entity: Send + Sync {
    /// 实体标识类型，要求可解析、可显示与可克隆
    type Id: FromStr + Clone + Display;

    /// 聚合类型名（用于事件元数据与日志）
    const TYPE: &'static str;

    /// 获取实体标识；尚未持久化时为 `None`
    fn id(&self) -> Option<&Self::Id>;

    /// 获取当前版本（用于乐观锁与并发控制）
    fn version(&self) -> crate::value_object::Version;

    /// 是否已被仓储持久化
    fn is_persisted(&self) -> bool {
        self.id().is_some()
    }
}

/// 学生标识（由仓储分配的自增编号）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentId(u64);

impl StudentId {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn value(&self) -> u64 {
        self.0
    }
}

impl FromStr for StudentId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

impl Display for StudentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for StudentId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}
