//! 值对象（Value Object）
//!
//! 无标识、以值相等为准的对象，用于封装不可变的概念性值与校验逻辑。
//! 每个值对象只提供一个经过校验的工厂方法 `create` 与原始值访问器；
//! 反序列化同样经过 `create`，避免绕过校验。
//!
mod academic_registration;
mod final_grade;
mod student_name;
mod version;

pub use academic_registration::AcademicRegistration;
pub use final_grade::FinalGrade;
pub use student_name::StudentName;
pub use version::Version;

/// 值对象抽象
pub trait ValueObject {
    /// 业务校验失败时的错误类型
    type Error;

    /// 校验当前值是否满足业务约束
    fn validate(&self) -> Result<(), Self::Error>;
}
