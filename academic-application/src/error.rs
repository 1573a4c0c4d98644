use academic_domain::{entity::StudentId, error::DomainError, student::Student};

#[non_exhaustive]
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("domain: {0}")]
    Domain(#[from] DomainError),

    #[error("registration already in use: {0}")]
    DuplicateRegistration(String),

    #[error("student not found: {0}")]
    StudentNotFound(StudentId),

    /// 持久化已成功，但事件发布失败；携带已持久化的学生
    #[error("student {} persisted but event publication failed: {source}", .student.registration())]
    PublicationFailure {
        student: Box<Student>,
        #[source]
        source: DomainError,
    },

    #[error("handler not found: {0}")]
    HandlerNotFound(&'static str),

    #[error("handler already registered: command={command}")]
    AlreadyRegisteredCommand { command: &'static str },

    #[error("type mismatch: expected={expected}, found={found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
}

impl AppError {
    /// 输入校验类错误（姓名、学籍号、成绩）
    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Domain(e) if e.is_validation())
    }

    /// 发布失败时已持久化的学生
    pub fn persisted_student(&self) -> Option<&Student> {
        match self {
            AppError::PublicationFailure { student, .. } => Some(&**student),
            _ => None,
        }
    }
}
