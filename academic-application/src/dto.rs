use academic_domain::{error::DomainError, student::Student};
use serde::Serialize;

/// 数据传输对象（DTO）
///
/// - 作为应用层的输出载体，面向接口/外部系统序列化友好；
/// - 与领域模型解耦，避免将领域对象直接暴露到接口层。
pub trait Dto: Serialize + Send + Sync + 'static {}

/// 学生的只读视图
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentDto {
    pub id: u64,
    pub name: String,
    pub registration: String,
    pub attempt_count: u32,
    pub final_grade: Option<f64>,
    pub completed: bool,
}

impl Dto for StudentDto {}

impl TryFrom<&Student> for StudentDto {
    type Error = DomainError;

    fn try_from(student: &Student) -> Result<Self, Self::Error> {
        Ok(Self {
            id: student.persisted_id()?.value(),
            name: student.name().value().to_string(),
            registration: student.registration().value().to_string(),
            attempt_count: student.attempt_count(),
            final_grade: student.final_grade().map(|g| g.value()),
            completed: student.is_completed(),
        })
    }
}
