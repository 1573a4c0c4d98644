use crate::{entity::StudentId, error::DomainResult, student::Student};
use async_trait::async_trait;
use std::sync::Arc;

/// 学生仓储端口
///
/// - `find_by_id`：不存在时返回 `None`；
/// - `exists_by_registration`：按学籍号判断是否已存在；
/// - `save`：首次保存时分配标识，返回持久化后的状态（含新版本）。
///   实现需保证同一标识的写入串行化（至少最后写入者胜或乐观并发）。
#[async_trait]
pub trait StudentRepository: Send + Sync {
    async fn find_by_id(&self, id: &StudentId) -> DomainResult<Option<Student>>;

    async fn exists_by_registration(&self, registration: &str) -> DomainResult<bool>;

    async fn save(&self, student: &Student) -> DomainResult<Student>;
}

#[async_trait]
impl<T> StudentRepository for Arc<T>
where
    T: StudentRepository + ?Sized,
{
    async fn find_by_id(&self, id: &StudentId) -> DomainResult<Option<Student>> {
        (**self).find_by_id(id).await
    }

    async fn exists_by_registration(&self, registration: &str) -> DomainResult<bool> {
        (**self).exists_by_registration(registration).await
    }

    async fn save(&self, student: &Student) -> DomainResult<Student> {
        (**self).save(student).await
    }
}
