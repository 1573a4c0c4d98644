//! 内存版主题交换机（InMemoryTopicExchange）
//!
//! 按 `Topology` 声明队列，满足 `EventBus` 协议：
//! - `publish`：按路由键匹配绑定，向每个命中的队列各投递一份；无匹配时丢弃；
//! - `subscribe`：取走队列的接收端，每个队列只允许一个消费者；
//! - 队列在消费者出现之前缓存消息（持久队列语义）；
//! - `close` 后发布返回错误，可用于模拟传输故障。
//!
//! 典型用途：测试环境、示例与本地开发。

use crate::error::{DomainError, DomainResult as Result};
use crate::eventing::EventBus;
use crate::persist::SerializedEvent;
use crate::routing::Topology;
use async_trait::async_trait;
use futures_core::stream::BoxStream;
use futures_util::StreamExt;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::debug;

struct QueueState {
    tx: mpsc::UnboundedSender<SerializedEvent>,
    rx: Mutex<Option<mpsc::UnboundedReceiver<SerializedEvent>>>,
}

struct Inner {
    topology: Topology,
    queues: HashMap<String, QueueState>,
    closed: AtomicBool,
}

#[derive(Clone)]
pub struct InMemoryTopicExchange {
    inner: Arc<Inner>,
}

impl InMemoryTopicExchange {
    pub fn new(topology: Topology) -> Self {
        for binding in topology.bindings() {
            debug!(
                exchange = topology.exchange(),
                queue = binding.queue(),
                pattern = binding.pattern(),
                "queue bound"
            );
        }
        let queues = topology
            .queues()
            .into_iter()
            .map(|name| {
                let (tx, rx) = mpsc::unbounded_channel();
                let state = QueueState {
                    tx,
                    rx: Mutex::new(Some(rx)),
                };
                (name.to_string(), state)
            })
            .collect();

        Self {
            inner: Arc::new(Inner {
                topology,
                queues,
                closed: AtomicBool::new(false),
            }),
        }
    }

    pub fn topology(&self) -> &Topology {
        &self.inner.topology
    }

    /// 关闭交换机：之后的发布全部失败
    pub fn close(&self) {
        self.inner.closed.store(true, Ordering::SeqCst);
    }

    pub fn reopen(&self) {
        self.inner.closed.store(false, Ordering::SeqCst);
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }
}

impl Default for InMemoryTopicExchange {
    fn default() -> Self {
        Self::new(Topology::standard())
    }
}

#[async_trait]
impl EventBus for InMemoryTopicExchange {
    async fn publish(&self, event: &SerializedEvent) -> Result<()> {
        if self.is_closed() {
            return Err(DomainError::event_bus(format!(
                "exchange {} is closed",
                self.inner.topology.exchange()
            )));
        }

        let targets = self.inner.topology.route(event.routing_key());
        if targets.is_empty() {
            debug!(
                routing_key = event.routing_key(),
                event_id = event.event_id(),
                "no queue bound for routing key, message dropped"
            );
            return Ok(());
        }

        for queue in targets {
            if let Some(state) = self.inner.queues.get(queue) {
                // 消费者已退出时接收端被丢弃，此处视为非致命并忽略
                if state.tx.send(event.clone()).is_err() {
                    debug!(queue, event_id = event.event_id(), "queue consumer gone");
                }
            }
        }
        Ok(())
    }

    async fn subscribe(&self, queue: &str) -> Result<BoxStream<'static, Result<SerializedEvent>>> {
        let state = self
            .inner
            .queues
            .get(queue)
            .ok_or_else(|| DomainError::event_bus(format!("queue {queue} is not declared")))?;

        let rx = state
            .rx
            .lock()
            .map_err(|e| DomainError::event_bus(e.to_string()))?
            .take()
            .ok_or_else(|| {
                DomainError::event_bus(format!("queue {queue} already has a consumer"))
            })?;

        Ok(Box::pin(UnboundedReceiverStream::new(rx).map(Ok)))
    }
}
