//! 领域层统一错误定义
//!
//! 覆盖值对象校验、聚合规则、仓储、事件发布与序列化等最小必要集合，
//! 便于应用层统一转换与分类。
//!
use thiserror::Error;

/// 统一错误类型
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DomainError {
    // --- 值对象校验 ---
    #[error("invalid name: {reason}")]
    InvalidName { reason: String },
    #[error("invalid registration: {reason}")]
    InvalidRegistration { reason: String },
    #[error("invalid grade: {value} is outside [{min}, {max}]")]
    InvalidGrade { value: f64, min: f64, max: f64 },

    // --- 聚合规则 ---
    #[error("attempt limit exceeded: {attempts} of {limit} attempts already recorded")]
    AttemptLimitExceeded { attempts: u32, limit: u32 },
    #[error("course already concluded for registration {registration}")]
    CourseAlreadyConcluded { registration: String },
    #[error("course not concluded for registration {registration}")]
    CourseNotConcluded { registration: String },
    #[error("student not persisted: {reason}")]
    NotPersisted { reason: String },

    // --- 仓储/持久化 ---
    #[error("duplicate registration: {registration}")]
    DuplicateRegistration { registration: String },
    #[error("version conflict: expected={expected}, actual={actual}")]
    VersionConflict { expected: usize, actual: usize },
    #[error("repository error: {reason}")]
    Repository { reason: String },

    // --- 事件发布/事件系统 ---
    #[error("publication failed: event_id={event_id}, reason={reason}")]
    Publication { event_id: String, reason: String },
    #[error("event bus error: {reason}")]
    EventBus { reason: String },

    // --- 配置 ---
    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    // --- 序列化 ---
    #[error("serialization error: {source}")]
    Serde {
        #[from]
        source: serde_json::Error,
    },
    #[error("type mismatch: expected={expected}, found={found}")]
    TypeMismatch { expected: String, found: String },
}

impl DomainError {
    /// 是否为输入校验错误（在任何状态变更之前返回）
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidName { .. } | Self::InvalidRegistration { .. } | Self::InvalidGrade { .. }
        )
    }

    pub fn event_bus(reason: impl Into<String>) -> Self {
        Self::EventBus {
            reason: reason.into(),
        }
    }

    pub fn repository(reason: impl Into<String>) -> Self {
        Self::Repository {
            reason: reason.into(),
        }
    }
}

/// 统一 Result 类型别名
pub type DomainResult<T> = Result<T, DomainError>;
