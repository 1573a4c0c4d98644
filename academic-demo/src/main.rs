//! 学籍生命周期演示
//!
//! 组装内存仓储、主题交换机、Outbox 与事件引擎，注册四个下游订阅者，
//! 然后让两名学生走完“创建 → 尝试 → 结课”的流程。

mod config;
mod logging;

use academic_application::{
    InMemoryCommandBus,
    command_bus::CommandBus,
    context::AppContext,
    error::AppError,
    query_handler::QueryHandler,
    subscribers::{
        ActionLog, AnalyticsSubscriber, CertificateSubscriber, EmailSubscriber,
        GamificationSubscriber, SubscriberHandler,
    },
    use_cases::{
        CompleteCourse, CompleteCourseHandler, CreateStudent, CreateStudentHandler, GetStudent,
        GetStudentHandler, RecordAttempt, RecordAttemptHandler,
    },
};
use academic_domain::{
    entity::StudentId,
    eventing::{
        BusEventPublisher, EventEngine, EventHandler, InMemoryOutbox, InMemoryTopicExchange,
        OutboxEventPublisher,
    },
    persist::{InMemoryStudentRepository, StudentRepository},
    publisher::EventPublisher,
    routing::EXCHANGE_NAME,
};
use clap::Parser;
use config::{ConfigLoader, PublisherMode};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(name = "academic-demo", version, about = "Student lifecycle with domain event fan-out")]
struct Cli {
    /// TOML configuration file (defaults to ./academic.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Overrides the configured publisher mode
    #[arg(long, value_enum)]
    publisher: Option<PublisherMode>,

    /// How long to wait for subscribers before shutting down
    #[arg(long, default_value_t = 5)]
    drain_timeout_secs: u64,
}

/// 2 封欢迎邮件、3 条指标、2 个证书决定、2 次积分发放
const EXPECTED_ACTIONS: usize = 9;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut loader = ConfigLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.with_config_path(path);
    }
    let mut config = loader.load()?;
    if let Some(mode) = cli.publisher {
        config.publisher = mode;
    }

    logging::init_logging(&config.log)?;
    info!(?config, "configuration loaded");

    let repository = Arc::new(InMemoryStudentRepository::new());
    let exchange = Arc::new(InMemoryTopicExchange::default());
    let outbox = Arc::new(InMemoryOutbox::with_batch_size(
        config.engine.outbox_batch_size,
    ));
    let actions = Arc::new(ActionLog::new());

    let publisher: Arc<dyn EventPublisher> = match config.publisher {
        PublisherMode::Direct => Arc::new(BusEventPublisher::new(exchange.clone())),
        PublisherMode::Outbox => Arc::new(OutboxEventPublisher::new(outbox.clone())),
    };

    let handlers: Vec<Arc<dyn EventHandler>> = vec![
        Arc::new(SubscriberHandler::new(EmailSubscriber, actions.clone())),
        Arc::new(SubscriberHandler::new(AnalyticsSubscriber, actions.clone())),
        Arc::new(SubscriberHandler::new(CertificateSubscriber, actions.clone())),
        Arc::new(SubscriberHandler::new(GamificationSubscriber, actions.clone())),
    ];
    let engine = Arc::new(
        EventEngine::builder()
            .event_bus(exchange.clone())
            .event_deliverer(outbox.clone())
            .event_handlers(handlers)
            .config(config.engine.to_engine_config())
            .build(),
    );
    let handle = engine.start().await?;
    info!(
        exchange = EXCHANGE_NAME,
        queues = ?exchange.topology().queues(),
        publisher = ?config.publisher,
        "event engine running"
    );

    let bus = build_command_bus(repository.clone(), publisher)?;
    run_scenario(&bus, repository).await?;

    tokio::select! {
        _ = wait_for_actions(&actions, EXPECTED_ACTIONS, Duration::from_secs(cli.drain_timeout_secs)) => {}
        _ = tokio::signal::ctrl_c() => warn!("interrupted"),
    }

    handle.shutdown();
    handle.join().await;

    for recorded in actions.entries() {
        info!(
            subscriber = %recorded.subscriber,
            event_id = %recorded.event_id,
            action = ?recorded.action,
            "action"
        );
    }
    info!(
        actions = actions.entries().len(),
        outbox_pending = outbox.pending_len()?,
        outbox_purged = outbox.purge_delivered()?,
        "demo finished"
    );
    Ok(())
}

fn build_command_bus(
    repository: Arc<dyn StudentRepository>,
    publisher: Arc<dyn EventPublisher>,
) -> Result<InMemoryCommandBus, AppError> {
    let bus = InMemoryCommandBus::new();
    bus.register::<CreateStudent, _>(Arc::new(CreateStudentHandler::new(
        repository.clone(),
        publisher.clone(),
    )))?;
    bus.register::<RecordAttempt, _>(Arc::new(RecordAttemptHandler::new(
        repository.clone(),
        publisher.clone(),
    )))?;
    bus.register::<CompleteCourse, _>(Arc::new(CompleteCourseHandler::new(
        repository, publisher,
    )))?;
    Ok(bus)
}

async fn run_scenario(
    bus: &InMemoryCommandBus,
    repository: Arc<dyn StudentRepository>,
) -> anyhow::Result<()> {
    let ctx = AppContext::builder()
        .correlation_id("demo-run".to_string())
        .actor_id("secretaria".to_string())
        .build();

    let ana = create(bus, &ctx, "Ana Silva", "543210").await?;
    let bruno = create(bus, &ctx, "Bruno Mendes", "987654").await?;

    if let Err(e) = create(bus, &ctx, "Ana Souza", "543210").await {
        warn!(error = %e, "duplicate registration rejected");
    }

    for grade in [5.0, 6.5, 8.0] {
        bus.dispatch(&ctx, RecordAttempt { student_id: ana, grade })
            .await?;
    }
    if let Err(e) = bus
        .dispatch(&ctx, RecordAttempt { student_id: ana, grade: 9.0 })
        .await
    {
        warn!(error = %e, "fourth attempt rejected");
    }

    bus.dispatch(&ctx, CompleteCourse { student_id: ana, grade: 9.6 })
        .await?;
    bus.dispatch(&ctx, CompleteCourse { student_id: bruno, grade: 4.0 })
        .await?;

    let query = GetStudentHandler::new(repository);
    for id in [ana, bruno] {
        let dto = query.handle(&ctx, GetStudent { id }).await?;
        info!(?dto, "student state");
    }
    Ok(())
}

async fn create(
    bus: &InMemoryCommandBus,
    ctx: &AppContext,
    name: &str,
    registration: &str,
) -> Result<StudentId, AppError> {
    let student = bus
        .dispatch(
            ctx,
            CreateStudent {
                name: name.to_string(),
                registration: registration.to_string(),
            },
        )
        .await?;
    Ok(student.persisted_id()?)
}

async fn wait_for_actions(actions: &ActionLog, expected: usize, timeout: Duration) {
    let waited = tokio::time::timeout(timeout, async {
        while actions.entries().len() < expected {
            tokio::time::sleep(Duration::from_millis(25)).await;
        }
    })
    .await;
    if waited.is_err() {
        warn!(
            expected,
            received = actions.entries().len(),
            "timed out waiting for subscribers"
        );
    }
}
