//! 事件持久化/传输模型（SerializedEvent）
//!
//! 事件在 Outbox 与交换机之间流转的标准形态：元数据平铺为字段，
//! 载荷为 JSON（camelCase）。解码时校验 `event_type` 与载荷是否一致。
//!
use crate::{
    domain_event::DomainEvent,
    error::{DomainError, DomainResult},
};
use bon::Builder;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
pub struct SerializedEvent {
    /// 事件唯一标识符
    event_id: String,
    /// 事件类型，用于区分不同的事件
    event_type: String,
    /// 事件版本
    event_version: usize,
    /// 发布使用的路由键
    routing_key: String,
    /// 聚合类型
    aggregate_type: String,
    /// 聚合 ID
    aggregate_id: String,
    /// 事件发生时间
    occurred_at: DateTime<Utc>,
    /// 事件负载
    payload: Value,
}

impl SerializedEvent {
    /// 从领域事件序列化
    pub fn from_event<E: DomainEvent>(event: &E) -> DomainResult<Self> {
        Ok(Self {
            event_id: event.event_id().to_string(),
            event_type: event.event_type().to_string(),
            event_version: event.event_version(),
            routing_key: event.routing_key().to_string(),
            aggregate_type: event.aggregate_type().to_string(),
            aggregate_id: event.aggregate_id(),
            occurred_at: event.occurred_at(),
            payload: serde_json::to_value(event)?,
        })
    }

    /// 反序列化为领域事件，并校验事件类型
    pub fn decode<E: DomainEvent>(&self) -> DomainResult<E> {
        let event: E = serde_json::from_value(self.payload.clone())?;
        if event.event_type() != self.event_type {
            return Err(DomainError::TypeMismatch {
                expected: self.event_type.clone(),
                found: event.event_type().to_string(),
            });
        }
        Ok(event)
    }

    pub fn event_id(&self) -> &str {
        &self.event_id
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn event_version(&self) -> usize {
        self.event_version
    }

    pub fn routing_key(&self) -> &str {
        &self.routing_key
    }

    pub fn aggregate_type(&self) -> &str {
        &self.aggregate_type
    }

    pub fn aggregate_id(&self) -> &str {
        &self.aggregate_id
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain_event::{CourseCompleted, StudentEvent};
    use crate::entity::StudentId;
    use uuid::Uuid;

    fn completed() -> StudentEvent {
        StudentEvent::CourseCompleted(CourseCompleted {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            student_id: StudentId::new(3),
            name: "Carla Santos".into(),
            registration: "101010".into(),
            final_grade: 9.5,
            approved: true,
        })
    }

    #[test]
    fn metadata_is_flattened_from_event() {
        let event = completed();
        let ser = SerializedEvent::from_event(&event).unwrap();
        assert_eq!(ser.event_id(), event.event_id().to_string());
        assert_eq!(ser.event_type(), "CourseCompleted");
        assert_eq!(ser.event_version(), 1);
        assert_eq!(ser.routing_key(), "student.completed");
        assert_eq!(ser.aggregate_type(), "student");
        assert_eq!(ser.aggregate_id(), "3");
        assert_eq!(ser.payload()["finalGrade"], 9.5);
        assert_eq!(ser.payload()["approved"], true);

        let decoded: StudentEvent = ser.decode().unwrap();
        assert_eq!(decoded, event);
    }

    #[test]
    fn decode_rejects_mismatched_type() {
        let ser = SerializedEvent::from_event(&completed()).unwrap();
        let forged = SerializedEvent::builder()
            .event_id(ser.event_id().to_string())
            .event_type("StudentCreated".to_string())
            .event_version(1)
            .routing_key("student.created".to_string())
            .aggregate_type("student".to_string())
            .aggregate_id("3".to_string())
            .occurred_at(ser.occurred_at())
            .payload(ser.payload().clone())
            .build();

        let err = forged.decode::<StudentEvent>().unwrap_err();
        match err {
            DomainError::TypeMismatch { expected, found } => {
                assert_eq!(expected, "StudentCreated");
                assert_eq!(found, "CourseCompleted");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn decode_rejects_garbage_payload() {
        let ser = SerializedEvent::from_event(&completed()).unwrap();
        let broken = SerializedEvent::builder()
            .event_id(ser.event_id().to_string())
            .event_type(ser.event_type().to_string())
            .event_version(1)
            .routing_key(ser.routing_key().to_string())
            .aggregate_type("student".to_string())
            .aggregate_id("3".to_string())
            .occurred_at(ser.occurred_at())
            .payload(serde_json::json!({"eventType": "CourseCompleted"}))
            .build();
        assert!(matches!(
            broken.decode::<StudentEvent>(),
            Err(DomainError::Serde { .. })
        ));
    }
}
