use super::publish_persisted;
use crate::{command::Command, command_handler::CommandHandler, context::AppContext, error::AppError};
use academic_domain::{
    domain_event::StudentCreated,
    error::DomainError,
    persist::StudentRepository,
    publisher::EventPublisher,
    student::Student,
    value_object::{AcademicRegistration, StudentName},
};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct CreateStudent {
    pub name: String,
    pub registration: String,
}

impl Command for CreateStudent {
    const NAME: &'static str = "CreateStudent";
    type Output = Student;
}

pub struct CreateStudentHandler {
    repository: Arc<dyn StudentRepository>,
    publisher: Arc<dyn EventPublisher>,
}

impl CreateStudentHandler {
    pub fn new(repository: Arc<dyn StudentRepository>, publisher: Arc<dyn EventPublisher>) -> Self {
        Self {
            repository,
            publisher,
        }
    }
}

#[async_trait]
impl CommandHandler<CreateStudent> for CreateStudentHandler {
    #[tracing::instrument(
        name = "create_student",
        skip_all,
        fields(
            command = CreateStudent::NAME,
            correlation_id = ctx.correlation_id.as_deref(),
            actor_id = ctx.actor_id.as_deref(),
            registration = %cmd.registration.trim(),
        )
    )]
    async fn handle(&self, ctx: &AppContext, cmd: CreateStudent) -> Result<Student, AppError> {
        let raw_registration = cmd.registration.trim();
        if self.repository.exists_by_registration(raw_registration).await? {
            warn!("registration already in use");
            return Err(AppError::DuplicateRegistration(raw_registration.to_string()));
        }

        let name = StudentName::create(&cmd.name)?;
        let registration = AcademicRegistration::create(&cmd.registration)?;

        let student = self
            .repository
            .save(&Student::create(name, registration))
            .await
            .map_err(|e| match e {
                // 并发创建越过了存在性检查，由仓储兜底
                DomainError::DuplicateRegistration { registration } => {
                    AppError::DuplicateRegistration(registration)
                }
                other => AppError::Domain(other),
            })?;
        let event = StudentCreated::from_persisted(&student)?;
        info!(student_id = %event.student_id, "student created");

        publish_persisted(self.publisher.as_ref(), student, event.into()).await
    }
}
