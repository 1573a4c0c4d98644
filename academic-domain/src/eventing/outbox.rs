//! 事务性 Outbox
//!
//! 写入侧通过 `Outbox::append` 追加序列化事件；中继侧通过 `EventDeliverer`
//! 按批取出未投递的条目，发布后标记成功或失败。失败条目保留在 Outbox 中，
//! 下一轮继续投递（至少一次语义）。
//!
//! 已投递条目保留为审计记录，直到调用 `purge_delivered` 清除；
//! 每轮拉取与标记都会线性扫描全部条目，需定期清理以控制开销。
//!
use crate::{
    error::{DomainError, DomainResult as Result},
    eventing::EventDeliverer,
    persist::SerializedEvent,
};
use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard};

#[async_trait]
pub trait Outbox: Send + Sync {
    async fn append(&self, event: SerializedEvent) -> Result<()>;
}

/// Outbox 中的一条记录
#[derive(Debug, Clone, PartialEq)]
pub struct OutboxEntry {
    event: SerializedEvent,
    attempts: u32,
    last_error: Option<String>,
    delivered: bool,
}

impl OutboxEntry {
    fn new(event: SerializedEvent) -> Self {
        Self {
            event,
            attempts: 0,
            last_error: None,
            delivered: false,
        }
    }

    pub fn event(&self) -> &SerializedEvent {
        &self.event
    }

    /// 已尝试投递的次数（成功与失败都计入）
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_delivered(&self) -> bool {
        self.delivered
    }
}

pub struct InMemoryOutbox {
    entries: Mutex<Vec<OutboxEntry>>,
    batch_size: usize,
}

impl InMemoryOutbox {
    pub const DEFAULT_BATCH_SIZE: usize = 100;

    pub fn new() -> Self {
        Self::with_batch_size(Self::DEFAULT_BATCH_SIZE)
    }

    pub fn with_batch_size(batch_size: usize) -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            batch_size: batch_size.max(1),
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// 全部条目快照（按写入顺序）
    pub fn entries(&self) -> Result<Vec<OutboxEntry>> {
        Ok(self.lock()?.clone())
    }

    pub fn pending_len(&self) -> Result<usize> {
        Ok(self.lock()?.iter().filter(|e| !e.delivered).count())
    }

    pub fn delivered_len(&self) -> Result<usize> {
        Ok(self.lock()?.iter().filter(|e| e.delivered).count())
    }

    /// 清除已投递条目，返回清除数量
    pub fn purge_delivered(&self) -> Result<usize> {
        let mut entries = self.lock()?;
        let before = entries.len();
        entries.retain(|e| !e.delivered);
        Ok(before - entries.len())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<OutboxEntry>>> {
        self.entries
            .lock()
            .map_err(|e| DomainError::repository(format!("outbox lock poisoned: {e}")))
    }

    fn update<F>(&self, events: &[&SerializedEvent], mut f: F) -> Result<()>
    where
        F: FnMut(&mut OutboxEntry),
    {
        let mut entries = self.lock()?;
        for event in events {
            if let Some(entry) = entries
                .iter_mut()
                .find(|e| e.event.event_id() == event.event_id())
            {
                f(entry);
            }
        }
        Ok(())
    }
}

impl Default for InMemoryOutbox {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Outbox for InMemoryOutbox {
    async fn append(&self, event: SerializedEvent) -> Result<()> {
        self.lock()?.push(OutboxEntry::new(event));
        Ok(())
    }
}

#[async_trait]
impl EventDeliverer for InMemoryOutbox {
    async fn fetch_events(&self) -> Result<Vec<SerializedEvent>> {
        Ok(self
            .lock()?
            .iter()
            .filter(|e| !e.delivered)
            .take(self.batch_size)
            .map(|e| e.event.clone())
            .collect())
    }

    async fn mark_delivered(&self, events: &[&SerializedEvent]) -> Result<()> {
        self.update(events, |entry| {
            entry.attempts += 1;
            entry.delivered = true;
        })
    }

    async fn mark_failed(&self, events: &[&SerializedEvent], reason: &str) -> Result<()> {
        self.update(events, |entry| {
            entry.attempts += 1;
            entry.last_error = Some(reason.to_string());
        })
    }
}
