#![cfg(feature = "eventing")]

use academic_domain::domain_event::{
    AttemptRecorded, CourseCompleted, DomainEvent, StudentCreated, StudentEvent,
};
use academic_domain::eventing::{
    EventEngine, EventEngineConfig, EventHandler, InMemoryOutbox, InMemoryTopicExchange,
    OutboxEventPublisher,
};
use academic_domain::persist::{InMemoryStudentRepository, SerializedEvent, StudentRepository};
use academic_domain::publisher::EventPublisher;
use academic_domain::routing::queues;
use academic_domain::student::Student;
use academic_domain::value_object::{AcademicRegistration, FinalGrade, StudentName};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Clone)]
struct RecordingHandler {
    queue: &'static str,
    received: Arc<Mutex<Vec<StudentEvent>>>,
}

impl RecordingHandler {
    fn new(queue: &'static str) -> Arc<Self> {
        Arc::new(Self {
            queue,
            received: Arc::new(Mutex::new(Vec::new())),
        })
    }

    fn received(&self) -> Vec<StudentEvent> {
        self.received.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventHandler for RecordingHandler {
    fn handler_name(&self) -> &str {
        self.queue
    }

    fn queue(&self) -> &str {
        self.queue
    }

    async fn handle(&self, event: &SerializedEvent) -> anyhow::Result<()> {
        let decoded: StudentEvent = event.decode()?;
        self.received.lock().unwrap().push(decoded);
        Ok(())
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn student_lifecycle_events_reach_their_queues_through_outbox() -> anyhow::Result<()> {
    let repo = InMemoryStudentRepository::new();
    let exchange = Arc::new(InMemoryTopicExchange::default());
    let outbox = Arc::new(InMemoryOutbox::with_batch_size(2));
    let publisher = OutboxEventPublisher::new(outbox.clone());

    let email = RecordingHandler::new(queues::EMAIL);
    let analytics = RecordingHandler::new(queues::ANALYTICS);
    let certificate = RecordingHandler::new(queues::CERTIFICATE);
    let gamification = RecordingHandler::new(queues::GAMIFICATION);
    let handlers: Vec<Arc<dyn EventHandler>> = vec![
        email.clone(),
        analytics.clone(),
        certificate.clone(),
        gamification.clone(),
    ];

    let engine = Arc::new(
        EventEngine::builder()
            .event_bus(exchange.clone())
            .event_deliverer(outbox.clone())
            .event_handlers(handlers)
            .config(EventEngineConfig {
                deliver_interval: Duration::from_millis(30),
                handler_concurrency: 4,
            })
            .build(),
    );
    let handle = engine.start().await?;

    // 创建 → 一次尝试 → 结课
    let student = Student::create(
        StudentName::create("Ana Silva")?,
        AcademicRegistration::create("543210")?,
    );
    let mut student = repo.save(&student).await?;
    publisher
        .publish(&StudentCreated::from_persisted(&student)?.into())
        .await?;

    student.record_attempt(FinalGrade::create(7.0)?)?;
    let mut student = repo.save(&student).await?;
    publisher
        .publish(&AttemptRecorded::from_persisted(&student)?.into())
        .await?;

    student.complete_course(FinalGrade::create(9.5)?)?;
    let student = repo.save(&student).await?;
    let completed: StudentEvent = CourseCompleted::from_persisted(&student)?.into();
    publisher.publish(&completed).await?;

    let _ = tokio::time::timeout(Duration::from_secs(3), async {
        loop {
            if email.received().len() == 1
                && analytics.received().len() == 1
                && certificate.received().len() == 1
                && gamification.received().len() == 1
            {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await;
    handle.shutdown();
    handle.join().await;

    assert_eq!(outbox.delivered_len()?, 3);
    assert_eq!(outbox.pending_len()?, 0);

    let created = email.received();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].event_type(), "StudentCreated");
    assert_eq!(created[0].registration(), "543210");

    match analytics.received().as_slice() {
        [StudentEvent::AttemptRecorded(e)] => assert_eq!(e.attempt_number, 1),
        other => panic!("unexpected analytics events {other:?}"),
    }

    // 扇出：同一个结课事件分别进入证书与积分队列
    assert_eq!(certificate.received(), vec![completed.clone()]);
    assert_eq!(gamification.received(), vec![completed]);
    Ok(())
}
