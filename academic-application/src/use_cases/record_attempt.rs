use super::{load_student, publish_persisted};
use crate::{command::Command, command_handler::CommandHandler, context::AppContext, error::AppError};
use academic_domain::{
    domain_event::AttemptRecorded,
    entity::StudentId,
    persist::StudentRepository,
    publisher::EventPublisher,
    student::Student,
    value_object::FinalGrade,
};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct RecordAttempt {
    pub student_id: StudentId,
    pub grade: f64,
}

impl Command for RecordAttempt {
    const NAME: &'static str = "RecordAttempt";
    type Output = Student;
}

pub struct RecordAttemptHandler {
    repository: Arc<dyn StudentRepository>,
    publisher: Arc<dyn EventPublisher>,
}

impl RecordAttemptHandler {
    pub fn new(repository: Arc<dyn StudentRepository>, publisher: Arc<dyn EventPublisher>) -> Self {
        Self {
            repository,
            publisher,
        }
    }
}

#[async_trait]
impl CommandHandler<RecordAttempt> for RecordAttemptHandler {
    #[tracing::instrument(
        name = "record_attempt",
        skip_all,
        fields(
            command = RecordAttempt::NAME,
            correlation_id = ctx.correlation_id.as_deref(),
            actor_id = ctx.actor_id.as_deref(),
            student_id = %cmd.student_id,
        )
    )]
    async fn handle(&self, ctx: &AppContext, cmd: RecordAttempt) -> Result<Student, AppError> {
        let mut student = load_student(self.repository.as_ref(), cmd.student_id).await?;
        let grade = FinalGrade::create(cmd.grade)?;

        if let Err(e) = student.record_attempt(grade) {
            warn!(error = %e, "attempt rejected");
            return Err(e.into());
        }

        let student = self.repository.save(&student).await?;
        let event = AttemptRecorded::from_persisted(&student)?;
        info!(attempt_number = event.attempt_number, "attempt recorded");

        publish_persisted(self.publisher.as_ref(), student, event.into()).await
    }
}
