use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::DomainEvent;
use crate::{
    entity::{Entity, StudentId},
    error::{DomainError, DomainResult},
    routing::EventKind,
    student::Student,
};

/// 学生已创建
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentCreated {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub student_id: StudentId,
    pub name: String,
    pub registration: String,
}

impl StudentCreated {
    pub fn from_persisted(student: &Student) -> DomainResult<Self> {
        Ok(Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            student_id: student.persisted_id()?,
            name: student.name().value().to_string(),
            registration: student.registration().value().to_string(),
        })
    }
}

/// 评估尝试已记录（携带记录后的尝试次数）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptRecorded {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub student_id: StudentId,
    pub registration: String,
    pub attempt_number: u32,
}

impl AttemptRecorded {
    pub fn from_persisted(student: &Student) -> DomainResult<Self> {
        Ok(Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            student_id: student.persisted_id()?,
            registration: student.registration().value().to_string(),
            attempt_number: student.attempt_count(),
        })
    }
}

/// 课程已结课（及格与不及格都会发布）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseCompleted {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub student_id: StudentId,
    pub name: String,
    pub registration: String,
    pub final_grade: f64,
    pub approved: bool,
}

impl CourseCompleted {
    pub fn from_persisted(student: &Student) -> DomainResult<Self> {
        let student_id = student.persisted_id()?;
        let grade = student
            .final_grade()
            .ok_or_else(|| DomainError::CourseNotConcluded {
                registration: student.registration().value().to_string(),
            })?;

        Ok(Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            student_id,
            name: student.name().value().to_string(),
            registration: student.registration().value().to_string(),
            final_grade: grade.value(),
            approved: student.is_completed(),
        })
    }
}

/// 学生聚合的全部事件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "eventType")]
pub enum StudentEvent {
    StudentCreated(StudentCreated),
    AttemptRecorded(AttemptRecorded),
    CourseCompleted(CourseCompleted),
}

impl StudentEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::StudentCreated(_) => EventKind::StudentCreated,
            Self::AttemptRecorded(_) => EventKind::AttemptRecorded,
            Self::CourseCompleted(_) => EventKind::CourseCompleted,
        }
    }

    pub fn student_id(&self) -> StudentId {
        match self {
            Self::StudentCreated(e) => e.student_id,
            Self::AttemptRecorded(e) => e.student_id,
            Self::CourseCompleted(e) => e.student_id,
        }
    }

    pub fn registration(&self) -> &str {
        match self {
            Self::StudentCreated(e) => &e.registration,
            Self::AttemptRecorded(e) => &e.registration,
            Self::CourseCompleted(e) => &e.registration,
        }
    }
}

impl DomainEvent for StudentEvent {
    fn event_id(&self) -> Uuid {
        match self {
            Self::StudentCreated(e) => e.event_id,
            Self::AttemptRecorded(e) => e.event_id,
            Self::CourseCompleted(e) => e.event_id,
        }
    }

    fn event_type(&self) -> &'static str {
        self.kind().as_str()
    }

    fn routing_key(&self) -> &'static str {
        self.kind().routing_key()
    }

    fn aggregate_type(&self) -> &'static str {
        Student::TYPE
    }

    fn aggregate_id(&self) -> String {
        self.student_id().to_string()
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            Self::StudentCreated(e) => e.occurred_at,
            Self::AttemptRecorded(e) => e.occurred_at,
            Self::CourseCompleted(e) => e.occurred_at,
        }
    }
}

impl From<StudentCreated> for StudentEvent {
    fn from(e: StudentCreated) -> Self {
        Self::StudentCreated(e)
    }
}

impl From<AttemptRecorded> for StudentEvent {
    fn from(e: AttemptRecorded) -> Self {
        Self::AttemptRecorded(e)
    }
}

impl From<CourseCompleted> for StudentEvent {
    fn from(e: CourseCompleted) -> Self {
        Self::CourseCompleted(e)
    }
}
