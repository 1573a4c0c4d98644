//! 事件引擎（EventEngine）
//!
//! 统一编排“中继 → 订阅 → 分发处理”的长驻任务：
//! - 周期从 Outbox 拉取待投递事件并发布至交换机，按结果标记成功/失败；
//! - 每个队列一个消费循环，将收到的事件并发分发给绑定该队列的处理器；
//! - 处理器失败只记录日志，不影响同队列的后续事件；
//! - 提供关闭与等待的 `EngineHandle`。
//!
use super::{EventBus, EventDeliverer, EventHandler};
use crate::error::{DomainError, DomainResult};
use crate::persist::SerializedEvent;
use bon::Builder;
use futures_core::stream::BoxStream;
use futures_util::{StreamExt, stream};
use std::{collections::HashMap, sync::Arc, time::Duration};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info, info_span, warn};

// 导入由 bon::Builder 生成的 typestate 模块与状态转换别名
use self::event_engine_builder::{IsUnset, SetRegistry, State as BuilderState};

#[derive(Builder)]
pub struct EventEngine {
    event_bus: Arc<dyn EventBus>,
    event_deliverer: Arc<dyn EventDeliverer>,
    #[builder(setters(vis = "pub(crate)"))]
    registry: HandlerRegistry,
    #[builder(default)]
    config: EventEngineConfig,
}

impl<S: BuilderState> EventEngineBuilder<S> {
    pub fn event_handlers(
        self,
        handlers: Vec<Arc<dyn EventHandler>>,
    ) -> EventEngineBuilder<SetRegistry<S>>
    where
        <S as BuilderState>::Registry: IsUnset,
    {
        self.registry(HandlerRegistry::new(handlers))
    }
}

impl EventEngine {
    /// 启动事件引擎：先订阅全部队列（任一失败即返回错误），再启动后台任务
    pub async fn start(self: Arc<Self>) -> DomainResult<EngineHandle> {
        self.config.validate()?;

        let mut streams = Vec::with_capacity(self.registry.by_queue.len());
        for (queue, handlers) in &self.registry.by_queue {
            let stream = self.event_bus.subscribe(queue).await?;
            streams.push((queue.clone(), handlers.clone(), stream));
        }

        let token = CancellationToken::new();
        let mut tasks: Vec<JoinHandle<()>> = Vec::with_capacity(streams.len() + 1);

        // deliver worker（周期任务）
        {
            let engine = self.clone();
            tasks.push(Self::spawn_periodic(
                token.clone(),
                self.config.deliver_interval,
                move || {
                    let engine = engine.clone();
                    async move {
                        if let Err(e) = engine.relay_once().await {
                            warn!(error = %e, "outbox fetch failed");
                        }
                    }
                },
            ));
        }

        // consume worker（每个队列一个长循环）
        for (queue, handlers, stream) in streams {
            let span = info_span!("consumer", queue = %queue);
            tasks.push(tokio::spawn(
                Self::consume_loop(
                    stream,
                    handlers,
                    self.config.handler_concurrency,
                    token.clone(),
                )
                .instrument(span),
            ));
        }

        info!(
            queues = self.registry.by_queue.len(),
            deliver_interval_ms = self.config.deliver_interval.as_millis() as u64,
            "event engine started"
        );
        Ok(EngineHandle { token, tasks })
    }

    /// 执行一轮中继：拉取待投递事件、发布并标记；返回本轮拉取的事件数
    pub async fn relay_once(&self) -> DomainResult<usize> {
        let events = self.event_deliverer.fetch_events().await?;
        let fetched = events.len();
        self.publish_and_mark(events).await;
        Ok(fetched)
    }

    fn spawn_periodic<F, Fut>(
        token: CancellationToken,
        interval: Duration,
        mut f: F,
    ) -> JoinHandle<()>
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: std::future::Future<Output = ()> + Send + 'static,
    {
        tokio::spawn(async move {
            let mut ticker = time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => f().await,
                }
            }
        })
    }

    async fn publish_and_mark(&self, events: Vec<SerializedEvent>) {
        if events.is_empty() {
            return;
        }

        match self.event_bus.publish_batch(&events).await {
            Ok(()) => {
                let refs: Vec<&SerializedEvent> = events.iter().collect();
                self.mark_delivered(&refs).await;
            }
            Err(batch_err) => {
                debug!(error = %batch_err, "batch publish failed, retrying one by one");
                for ev in &events {
                    match self.event_bus.publish(ev).await {
                        Ok(()) => self.mark_delivered(&[ev]).await,
                        Err(e) => {
                            let reason = e.to_string();
                            warn!(event_id = ev.event_id(), error = %reason, "relay publish failed");
                            if let Err(e) = self.event_deliverer.mark_failed(&[ev], &reason).await {
                                warn!(event_id = ev.event_id(), error = %e, "mark_failed failed");
                            }
                        }
                    }
                }
            }
        }
    }

    async fn mark_delivered(&self, events: &[&SerializedEvent]) {
        if let Err(e) = self.event_deliverer.mark_delivered(events).await {
            warn!(count = events.len(), error = %e, "mark_delivered failed");
        }
    }

    async fn consume_loop(
        mut events: BoxStream<'static, DomainResult<SerializedEvent>>,
        handlers: Vec<Arc<dyn EventHandler>>,
        concurrency: usize,
        token: CancellationToken,
    ) {
        loop {
            tokio::select! {
                _ = token.cancelled() => {
                    break;
                }
                maybe_event = events.next() => {
                    match maybe_event {
                        Some(Ok(event)) => {
                            stream::iter(handlers.iter().cloned())
                                .for_each_concurrent(Some(concurrency), |h| {
                                    let ev = event.clone();
                                    async move {
                                        if let Err(err) = h.handle(&ev).await {
                                            warn!(
                                                handler = h.handler_name(),
                                                event_id = ev.event_id(),
                                                error = %err,
                                                "event handler failed"
                                            );
                                        }
                                    }
                                })
                                .await;
                        }
                        Some(Err(e)) => {
                            warn!(error = %e, "queue stream error");
                        }
                        None => {
                            break;
                        }
                    }
                }
            }
        }
    }
}

#[derive(Clone, Default)]
struct HandlerRegistry {
    by_queue: HashMap<String, Vec<Arc<dyn EventHandler>>>,
}

impl HandlerRegistry {
    fn new(handlers: Vec<Arc<dyn EventHandler>>) -> Self {
        let mut by_queue: HashMap<String, Vec<Arc<dyn EventHandler>>> = HashMap::new();
        for h in handlers {
            by_queue.entry(h.queue().to_string()).or_default().push(h);
        }
        Self { by_queue }
    }
}

/// 事件引擎配置
#[derive(Clone, Copy, Debug)]
pub struct EventEngineConfig {
    /// Outbox -> 交换机 的中继间隔
    pub deliver_interval: Duration,
    /// 单事件的处理并发（同一队列上绑定多个 handler 时）
    pub handler_concurrency: usize,
}

impl EventEngineConfig {
    /// 中继间隔必须大于零
    pub fn validate(&self) -> DomainResult<()> {
        if self.deliver_interval.is_zero() {
            return Err(DomainError::InvalidConfig {
                reason: "deliver_interval must be greater than zero".into(),
            });
        }
        Ok(())
    }
}

impl Default for EventEngineConfig {
    fn default() -> Self {
        Self {
            deliver_interval: Duration::from_millis(500),
            handler_concurrency: 8,
        }
    }
}

/// 引擎运行句柄：用于优雅关闭与等待任务结束
pub struct EngineHandle {
    token: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
}

impl EngineHandle {
    pub fn shutdown(&self) {
        self.token.cancel();
    }

    pub async fn join(mut self) {
        let tasks = std::mem::take(&mut self.tasks);

        for t in tasks {
            if let Err(e) = t.await {
                warn!(error = %e, "engine task terminated abnormally");
            }
        }
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}
