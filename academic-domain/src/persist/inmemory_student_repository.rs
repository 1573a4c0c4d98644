//! 内存版学生仓储（InMemoryStudentRepository）
//!
//! 基于 `DashMap` 的参考实现：
//! - 标识从 1 开始自增分配；
//! - 学籍号二级索引，保存时再次兜底唯一性（防止并发创建绕过用例检查）；
//! - 以 `Version` 做乐观并发控制，版本不一致返回 `VersionConflict`。
//!
//! 典型用途：测试、示例与本地开发。
use crate::{
    entity::{Entity, StudentId},
    error::{DomainError, DomainResult},
    persist::StudentRepository,
    student::Student,
};
use async_trait::async_trait;
use dashmap::{DashMap, mapref::entry::Entry};
use std::sync::atomic::{AtomicU64, Ordering};

pub struct InMemoryStudentRepository {
    students: DashMap<StudentId, Student>,
    by_registration: DashMap<String, StudentId>,
    next_id: AtomicU64,
}

impl Default for InMemoryStudentRepository {
    fn default() -> Self {
        Self {
            students: DashMap::new(),
            by_registration: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }
}

impl InMemoryStudentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    fn insert_new(&self, student: &Student) -> DomainResult<Student> {
        let registration = student.registration().value().to_string();

        let id = match self.by_registration.entry(registration) {
            Entry::Occupied(o) => {
                return Err(DomainError::DuplicateRegistration {
                    registration: o.key().clone(),
                });
            }
            Entry::Vacant(v) => {
                let id = StudentId::new(self.next_id.fetch_add(1, Ordering::SeqCst));
                v.insert(id);
                id
            }
        };

        let persisted = student.clone().persisted_as(id, student.version().next());
        self.students.insert(id, persisted.clone());
        Ok(persisted)
    }

    fn update_existing(&self, id: StudentId, student: &Student) -> DomainResult<Student> {
        let mut stored = self
            .students
            .get_mut(&id)
            .ok_or_else(|| DomainError::repository(format!("student {id} does not exist")))?;

        if stored.version() != student.version() {
            return Err(DomainError::VersionConflict {
                expected: student.version().value(),
                actual: stored.version().value(),
            });
        }

        let persisted = student.clone().persisted_as(id, student.version().next());
        *stored = persisted.clone();
        Ok(persisted)
    }
}

#[async_trait]
impl StudentRepository for InMemoryStudentRepository {
    async fn find_by_id(&self, id: &StudentId) -> DomainResult<Option<Student>> {
        Ok(self.students.get(id).map(|s| s.value().clone()))
    }

    async fn exists_by_registration(&self, registration: &str) -> DomainResult<bool> {
        Ok(self.by_registration.contains_key(registration.trim()))
    }

    async fn save(&self, student: &Student) -> DomainResult<Student> {
        match student.id() {
            None => self.insert_new(student),
            Some(id) => self.update_existing(*id, student),
        }
    }
}
