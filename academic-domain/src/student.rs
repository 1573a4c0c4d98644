//! 学生聚合（Student）
//!
//! 聚合根负责生命周期不变量：
//! - 评估尝试最多 3 次，第 4 次直接失败且不改变状态；
//! - 结课只发生一次：设置最终成绩，并按及格线推导 `completed`；
//! - 已结课（无论及格与否）即为终态，后续尝试与结课均被拒绝。
//!
//! 标识与版本只由仓储通过 [`Student::persisted_as`] 写入。
//!
use crate::{
    entity::{Entity, StudentId},
    error::{DomainError, DomainResult},
    value_object::{AcademicRegistration, FinalGrade, StudentName, Version},
};

#[derive(Debug, Clone, PartialEq)]
pub struct Student {
    id: Option<StudentId>,
    version: Version,
    name: StudentName,
    registration: AcademicRegistration,
    attempt_count: u32,
    final_grade: Option<FinalGrade>,
    completed: bool,
}

impl Student {
    /// 允许的最大评估尝试次数
    pub const MAX_ATTEMPTS: u32 = 3;

    /// 工厂方法：构建一个尚未持久化的新学生
    pub fn create(name: StudentName, registration: AcademicRegistration) -> Self {
        Self {
            id: None,
            version: Version::new(),
            name,
            registration,
            attempt_count: 0,
            final_grade: None,
            completed: false,
        }
    }

    /// 记录一次评估尝试。
    ///
    /// 该阶段的成绩只用于跟踪，不会写入最终成绩。
    pub fn record_attempt(&mut self, _grade: FinalGrade) -> DomainResult<()> {
        self.ensure_not_concluded()?;

        if self.attempt_count >= Self::MAX_ATTEMPTS {
            return Err(DomainError::AttemptLimitExceeded {
                attempts: self.attempt_count,
                limit: Self::MAX_ATTEMPTS,
            });
        }

        self.attempt_count += 1;
        Ok(())
    }

    /// 结课：写入最终成绩，并以及格线推导是否完成课程
    pub fn complete_course(&mut self, grade: FinalGrade) -> DomainResult<()> {
        self.ensure_not_concluded()?;

        self.final_grade = Some(grade);
        self.completed = grade.is_passing();
        Ok(())
    }

    /// 由仓储在保存成功后调用，写入存储分配的标识与新版本
    pub fn persisted_as(mut self, id: StudentId, version: Version) -> Self {
        self.id = Some(id);
        self.version = version;
        self
    }

    fn ensure_not_concluded(&self) -> DomainResult<()> {
        if self.is_concluded() {
            return Err(DomainError::CourseAlreadyConcluded {
                registration: self.registration.value().to_string(),
            });
        }
        Ok(())
    }

    pub fn name(&self) -> &StudentName {
        &self.name
    }

    pub fn registration(&self) -> &AcademicRegistration {
        &self.registration
    }

    pub fn attempt_count(&self) -> u32 {
        self.attempt_count
    }

    pub fn remaining_attempts(&self) -> u32 {
        Self::MAX_ATTEMPTS.saturating_sub(self.attempt_count)
    }

    pub fn final_grade(&self) -> Option<FinalGrade> {
        self.final_grade
    }

    /// 是否完成课程（已结课且成绩及格）
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// 是否已结课（最终成绩已写入，无论及格与否）
    pub fn is_concluded(&self) -> bool {
        self.final_grade.is_some()
    }

    /// 获取已持久化的标识，未持久化时返回错误
    pub fn persisted_id(&self) -> DomainResult<StudentId> {
        self.id.ok_or_else(|| DomainError::NotPersisted {
            reason: format!(
                "student {} has no identity assigned",
                self.registration.value()
            ),
        })
    }
}

impl Entity for Student {
    type Id = StudentId;

    const TYPE: &'static str = "student";

    fn id(&self) -> Option<&Self::Id> {
        self.id.as_ref()
    }

    fn version(&self) -> Version {
        self.version
    }
}
