use academic_application::{
    command_bus::CommandBus,
    command_handler::CommandHandler,
    context::AppContext,
    error::AppError,
    query_handler::QueryHandler,
    use_cases::{
        CompleteCourse, CompleteCourseHandler, CreateStudent, CreateStudentHandler, GetStudent,
        GetStudentHandler, RecordAttempt, RecordAttemptHandler,
    },
    InMemoryCommandBus,
};
use academic_domain::{
    domain_event::{DomainEvent, StudentEvent},
    entity::{Entity, StudentId},
    error::{DomainError, DomainResult},
    persist::{InMemoryStudentRepository, StudentRepository},
    publisher::EventPublisher,
    student::Student,
};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// 记录所有发布的事件；`fail` 打开时模拟传输故障
#[derive(Default)]
struct SpyPublisher {
    published: Mutex<Vec<StudentEvent>>,
    fail: AtomicBool,
}

impl SpyPublisher {
    fn failing() -> Self {
        let spy = Self::default();
        spy.fail.store(true, Ordering::SeqCst);
        spy
    }

    fn published(&self) -> Vec<StudentEvent> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventPublisher for SpyPublisher {
    async fn publish(&self, event: &StudentEvent) -> DomainResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(DomainError::Publication {
                event_id: event.event_id().to_string(),
                reason: "broker unreachable".into(),
            });
        }
        self.published.lock().unwrap().push(event.clone());
        Ok(())
    }
}

/// 包装内存仓储并统计 save 次数
#[derive(Default)]
struct CountingRepository {
    inner: InMemoryStudentRepository,
    saves: AtomicUsize,
}

impl CountingRepository {
    fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StudentRepository for CountingRepository {
    async fn find_by_id(&self, id: &StudentId) -> DomainResult<Option<Student>> {
        self.inner.find_by_id(id).await
    }

    async fn exists_by_registration(&self, registration: &str) -> DomainResult<bool> {
        self.inner.exists_by_registration(registration).await
    }

    async fn save(&self, student: &Student) -> DomainResult<Student> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        self.inner.save(student).await
    }
}

struct Fixture {
    repo: Arc<CountingRepository>,
    publisher: Arc<SpyPublisher>,
    create: CreateStudentHandler,
    attempt: RecordAttemptHandler,
    complete: CompleteCourseHandler,
    ctx: AppContext,
}

impl Fixture {
    fn new() -> Self {
        Self::with_publisher(SpyPublisher::default())
    }

    fn with_publisher(publisher: SpyPublisher) -> Self {
        let repo = Arc::new(CountingRepository::default());
        let publisher = Arc::new(publisher);
        Self {
            create: CreateStudentHandler::new(repo.clone(), publisher.clone()),
            attempt: RecordAttemptHandler::new(repo.clone(), publisher.clone()),
            complete: CompleteCourseHandler::new(repo.clone(), publisher.clone()),
            repo,
            publisher,
            ctx: AppContext::builder()
                .correlation_id("cor-test".to_string())
                .build(),
        }
    }

    async fn create(&self, name: &str, registration: &str) -> Result<Student, AppError> {
        self.create
            .handle(
                &self.ctx,
                CreateStudent {
                    name: name.into(),
                    registration: registration.into(),
                },
            )
            .await
    }

    async fn record(&self, id: StudentId, grade: f64) -> Result<Student, AppError> {
        self.attempt
            .handle(&self.ctx, RecordAttempt { student_id: id, grade })
            .await
    }

    async fn complete(&self, id: StudentId, grade: f64) -> Result<Student, AppError> {
        self.complete
            .handle(&self.ctx, CompleteCourse { student_id: id, grade })
            .await
    }
}

fn id_of(student: &Student) -> StudentId {
    *student.id().unwrap()
}

#[tokio::test]
async fn create_student_persists_and_publishes_created_event() {
    let f = Fixture::new();
    let student = f.create("  Ana Silva ", " 543210 ").await.unwrap();

    assert!(student.is_persisted());
    assert_eq!(student.name().value(), "Ana Silva");
    assert_eq!(student.registration().value(), "543210");
    assert_eq!(student.attempt_count(), 0);
    assert!(!student.is_completed());

    let events = f.publisher.published();
    assert_eq!(events.len(), 1);
    match &events[0] {
        StudentEvent::StudentCreated(e) => {
            assert_eq!(e.student_id, id_of(&student));
            assert_eq!(e.registration, "543210");
            assert_eq!(e.name, "Ana Silva");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn duplicate_registration_neither_saves_nor_publishes() {
    let f = Fixture::new();
    f.create("Ana Silva", "543210").await.unwrap();

    let err = f.create("Outra Pessoa", "543210").await.unwrap_err();
    assert!(matches!(err, AppError::DuplicateRegistration(ref r) if r == "543210"));
    assert_eq!(f.repo.saves(), 1);
    assert_eq!(f.publisher.published().len(), 1);
}

#[tokio::test]
async fn invalid_input_is_rejected_before_any_mutation() {
    let f = Fixture::new();

    let err = f.create("A", "543210").await.unwrap_err();
    assert!(err.is_validation());
    assert!(matches!(err, AppError::Domain(DomainError::InvalidName { .. })));

    let err = f.create("Ana Silva", "   ").await.unwrap_err();
    assert!(matches!(err, AppError::Domain(DomainError::InvalidRegistration { .. })));

    let student = f.create("Ana Silva", "543210").await.unwrap();
    let err = f.record(id_of(&student), 10.5).await.unwrap_err();
    assert!(matches!(err, AppError::Domain(DomainError::InvalidGrade { .. })));
    let err = f.complete(id_of(&student), -1.0).await.unwrap_err();
    assert!(err.is_validation());

    assert_eq!(f.repo.saves(), 1);
    assert_eq!(f.publisher.published().len(), 1);
}

#[tokio::test]
async fn fourth_attempt_exceeds_limit() {
    let f = Fixture::new();
    let student = f.create("Bruno Mendes", "987654").await.unwrap();
    let id = id_of(&student);

    for n in 1..=3 {
        let s = f.record(id, 5.0).await.unwrap();
        assert_eq!(s.attempt_count(), n);
    }

    let err = f.record(id, 5.0).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Domain(DomainError::AttemptLimitExceeded { attempts: 3, limit: 3 })
    ));

    let stored = f.repo.find_by_id(&id).await.unwrap().unwrap();
    assert_eq!(stored.attempt_count(), 3);

    let attempts: Vec<u32> = f
        .publisher
        .published()
        .iter()
        .filter_map(|e| match e {
            StudentEvent::AttemptRecorded(a) => Some(a.attempt_number),
            _ => None,
        })
        .collect();
    assert_eq!(attempts, vec![1, 2, 3]);
}

#[tokio::test]
async fn complete_course_publishes_for_pass_and_fail() {
    let f = Fixture::new();
    let passing = f.create("Carla Santos", "101010").await.unwrap();
    let failing = f.create("Diego Costa", "202020").await.unwrap();

    let passed = f.complete(id_of(&passing), 8.5).await.unwrap();
    let failed = f.complete(id_of(&failing), 4.0).await.unwrap();
    assert!(passed.is_completed());
    assert!(!failed.is_completed());
    assert!(failed.is_concluded());

    let completions: Vec<_> = f
        .publisher
        .published()
        .into_iter()
        .filter_map(|e| match e {
            StudentEvent::CourseCompleted(c) => Some(c),
            _ => None,
        })
        .collect();
    assert_eq!(completions.len(), 2);
    assert_eq!(completions[0].student_id, id_of(&passing));
    assert_eq!(completions[0].final_grade, 8.5);
    assert!(completions[0].approved);
    assert_eq!(completions[1].student_id, id_of(&failing));
    assert_eq!(completions[1].registration, "202020");
    assert!(!completions[1].approved);
}

#[tokio::test]
async fn concluded_course_rejects_further_changes() {
    let f = Fixture::new();
    let student = f.create("Carla Santos", "101010").await.unwrap();
    let id = id_of(&student);
    f.complete(id, 4.0).await.unwrap();

    let err = f.complete(id, 9.0).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Domain(DomainError::CourseAlreadyConcluded { .. })
    ));
    let err = f.record(id, 9.0).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Domain(DomainError::CourseAlreadyConcluded { .. })
    ));
    assert_eq!(f.publisher.published().len(), 2);
}

#[tokio::test]
async fn unknown_student_is_not_found_and_emits_nothing() {
    let f = Fixture::new();
    let missing = StudentId::new(42);

    assert!(matches!(
        f.record(missing, 7.0).await.unwrap_err(),
        AppError::StudentNotFound(id) if id == missing
    ));
    assert!(matches!(
        f.complete(missing, 7.0).await.unwrap_err(),
        AppError::StudentNotFound(_)
    ));
    assert!(f.publisher.published().is_empty());
    assert_eq!(f.repo.saves(), 0);
}

#[tokio::test]
async fn publication_failure_keeps_persisted_student() {
    let f = Fixture::with_publisher(SpyPublisher::failing());

    let err = f.create("Ana Silva", "543210").await.unwrap_err();
    let persisted = err.persisted_student().cloned().unwrap();
    assert!(matches!(
        err,
        AppError::PublicationFailure {
            source: DomainError::Publication { .. },
            ..
        }
    ));

    let id = id_of(&persisted);
    let stored = f.repo.find_by_id(&id).await.unwrap().unwrap();
    assert_eq!(stored, persisted);
    assert!(f.repo.exists_by_registration("543210").await.unwrap());

    // 之后的用例同样先持久化再报告发布失败
    let err = f.record(id, 6.0).await.unwrap_err();
    assert_eq!(err.persisted_student().unwrap().attempt_count(), 1);
    let stored = f.repo.find_by_id(&id).await.unwrap().unwrap();
    assert_eq!(stored.attempt_count(), 1);
}

#[tokio::test]
async fn completion_is_stored_even_when_publication_fails() {
    let f = Fixture::new();
    let student = f.create("Bruno Mendes", "987654").await.unwrap();
    let id = id_of(&student);
    f.publisher.fail.store(true, Ordering::SeqCst);

    let err = f.complete(id, 9.6).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::PublicationFailure {
            source: DomainError::Publication { .. },
            ..
        }
    ));
    let reported = err.persisted_student().cloned().unwrap();
    assert_eq!(reported.final_grade().map(|g| g.value()), Some(9.6));
    assert!(reported.is_completed());

    let stored = f.repo.find_by_id(&id).await.unwrap().unwrap();
    assert_eq!(stored, reported);
    assert!(stored.is_concluded());
    assert_eq!(f.repo.saves(), 2);
    // 仅创建事件发布成功
    assert_eq!(f.publisher.published().len(), 1);
}

#[tokio::test]
async fn commands_dispatch_through_bus_and_query_reads_back() {
    let repo = Arc::new(InMemoryStudentRepository::new());
    let publisher = Arc::new(SpyPublisher::default());
    let bus = InMemoryCommandBus::new();
    bus.register::<CreateStudent, _>(Arc::new(CreateStudentHandler::new(
        repo.clone(),
        publisher.clone(),
    )))
    .unwrap();
    bus.register::<CompleteCourse, _>(Arc::new(CompleteCourseHandler::new(
        repo.clone(),
        publisher.clone(),
    )))
    .unwrap();

    let ctx = AppContext::default();
    let created = bus
        .dispatch(
            &ctx,
            CreateStudent {
                name: "Eva Lima".into(),
                registration: "303030".into(),
            },
        )
        .await
        .unwrap();
    let id = id_of(&created);
    bus.dispatch(&ctx, CompleteCourse { student_id: id, grade: 9.5 })
        .await
        .unwrap();

    let err = bus
        .dispatch(&ctx, RecordAttempt { student_id: id, grade: 7.0 })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::HandlerNotFound("RecordAttempt")));

    let dto = GetStudentHandler::new(repo.clone())
        .handle(&ctx, GetStudent { id })
        .await
        .unwrap();
    assert_eq!(dto.id, id.value());
    assert_eq!(dto.registration, "303030");
    assert_eq!(dto.final_grade, Some(9.5));
    assert!(dto.completed);
    assert_eq!(publisher.published().len(), 2);

    let err = GetStudentHandler::new(repo)
        .handle(&ctx, GetStudent { id: StudentId::new(99) })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::StudentNotFound(_)));
}
