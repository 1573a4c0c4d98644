//! 学生学籍用例
//!
//! 每个写用例都是一个“持久化 → 基于持久化状态构造事件 → 发布”的工作单元：
//! 持久化先于发布；发布失败时返回 `AppError::PublicationFailure`，
//! 其中携带已持久化的学生，不做补偿。
//!
mod complete_course;
mod create_student;
mod get_student;
mod record_attempt;

pub use complete_course::{CompleteCourse, CompleteCourseHandler};
pub use create_student::{CreateStudent, CreateStudentHandler};
pub use get_student::{GetStudent, GetStudentHandler};
pub use record_attempt::{RecordAttempt, RecordAttemptHandler};

use crate::error::AppError;
use academic_domain::{
    domain_event::{DomainEvent, StudentEvent},
    entity::StudentId,
    persist::StudentRepository,
    publisher::EventPublisher,
    student::Student,
};
use tracing::{error, info};

async fn load_student(
    repository: &dyn StudentRepository,
    id: StudentId,
) -> Result<Student, AppError> {
    repository
        .find_by_id(&id)
        .await?
        .ok_or(AppError::StudentNotFound(id))
}

async fn publish_persisted(
    publisher: &dyn EventPublisher,
    student: Student,
    event: StudentEvent,
) -> Result<Student, AppError> {
    match publisher.publish(&event).await {
        Ok(()) => {
            info!(
                event_id = %event.event_id(),
                event_type = event.event_type(),
                "event published"
            );
            Ok(student)
        }
        Err(source) => {
            error!(
                event_id = %event.event_id(),
                event_type = event.event_type(),
                error = %source,
                "student persisted but event publication failed"
            );
            Err(AppError::PublicationFailure {
                student: Box::new(student),
                source,
            })
        }
    }
}
