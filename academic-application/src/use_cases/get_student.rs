use super::load_student;
use crate::{
    context::AppContext, dto::StudentDto, error::AppError, query::Query,
    query_handler::QueryHandler,
};
use academic_domain::{entity::StudentId, persist::StudentRepository};
use async_trait::async_trait;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct GetStudent {
    pub id: StudentId,
}

impl Query for GetStudent {
    const NAME: &'static str = "GetStudent";
    type Dto = StudentDto;
}

pub struct GetStudentHandler {
    repository: Arc<dyn StudentRepository>,
}

impl GetStudentHandler {
    pub fn new(repository: Arc<dyn StudentRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl QueryHandler<GetStudent> for GetStudentHandler {
    #[tracing::instrument(
        name = "get_student",
        skip_all,
        fields(query = GetStudent::NAME, student_id = %q.id)
    )]
    async fn handle(&self, _ctx: &AppContext, q: GetStudent) -> Result<StudentDto, AppError> {
        let student = load_student(self.repository.as_ref(), q.id).await?;
        Ok(StudentDto::try_from(&student)?)
    }
}
