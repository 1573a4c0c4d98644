use super::{load_student, publish_persisted};
use crate::{command::Command, command_handler::CommandHandler, context::AppContext, error::AppError};
use academic_domain::{
    domain_event::CourseCompleted,
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
pub struct CompleteCourse {
    pub student_id: StudentId,
    pub grade: f64,
}

impl Command for CompleteCourse {
    const NAME: &'static str = "CompleteCourse";
    type Output = Student;
}

pub struct CompleteCourseHandler {
    repository: Arc<dyn StudentRepository>,
    publisher: Arc<dyn EventPublisher>,
}

impl CompleteCourseHandler {
    pub fn new(repository: Arc<dyn StudentRepository>, publisher: Arc<dyn EventPublisher>) -> Self {
        Self {
            repository,
            publisher,
        }
    }
}

#[async_trait]
impl CommandHandler<CompleteCourse> for CompleteCourseHandler {
    #[tracing::instrument(
        name = "complete_course",
        skip_all,
        fields(
            command = CompleteCourse::NAME,
            correlation_id = ctx.correlation_id.as_deref(),
            actor_id = ctx.actor_id.as_deref(),
            student_id = %cmd.student_id,
        )
    )]
    async fn handle(&self, ctx: &AppContext, cmd: CompleteCourse) -> Result<Student, AppError> {
        let mut student = load_student(self.repository.as_ref(), cmd.student_id).await?;
        let grade = FinalGrade::create(cmd.grade)?;

        if let Err(e) = student.complete_course(grade) {
            warn!(error = %e, "completion rejected");
            return Err(e.into());
        }

        let student = self.repository.save(&student).await?;
        // 通过与未通过都发布
        let event = CourseCompleted::from_persisted(&student)?;
        info!(
            final_grade = event.final_grade,
            approved = event.approved,
            "course concluded"
        );

        publish_persisted(self.publisher.as_ref(), student, event.into()).await
    }
}
