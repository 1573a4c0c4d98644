//! 事件路由约定（Topic Exchange）
//!
//! 单一主题交换机 + 三个固定路由键（每种事件一个）。
//! 每个逻辑订阅者拥有独立队列并绑定到路由键上，实现真正的扇出：
//! 同一事件会被投递到所有匹配的队列，每个队列恰好一次。
//!
//! 绑定模式遵循主题交换机规则：`*` 匹配恰好一个单词，`#` 匹配零个或多个单词。
//!
use serde::{Deserialize, Serialize};
use std::fmt;

/// 交换机名称
pub const EXCHANGE_NAME: &str = "student.events.exchange";

/// 路由键
pub mod routing_keys {
    pub const STUDENT_CREATED: &str = "student.created";
    pub const ATTEMPT_RECORDED: &str = "student.attempt";
    pub const COURSE_COMPLETED: &str = "student.completed";
}

/// 订阅者队列（每个逻辑订阅者一个）
pub mod queues {
    pub const EMAIL: &str = "student.created.email.queue";
    pub const ANALYTICS: &str = "student.attempt.analytics.queue";
    pub const CERTIFICATE: &str = "student.completed.certificate.queue";
    pub const GAMIFICATION: &str = "student.completed.gamification.queue";
}

/// 事件种类，与路由键一一对应
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    StudentCreated,
    AttemptRecorded,
    CourseCompleted,
}

impl EventKind {
    pub const ALL: [EventKind; 3] = [
        EventKind::StudentCreated,
        EventKind::AttemptRecorded,
        EventKind::CourseCompleted,
    ];

    /// 事件类型名（序列化形态中的 `event_type`）
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::StudentCreated => "StudentCreated",
            Self::AttemptRecorded => "AttemptRecorded",
            Self::CourseCompleted => "CourseCompleted",
        }
    }

    pub const fn routing_key(&self) -> &'static str {
        match self {
            Self::StudentCreated => routing_keys::STUDENT_CREATED,
            Self::AttemptRecorded => routing_keys::ATTEMPT_RECORDED,
            Self::CourseCompleted => routing_keys::COURSE_COMPLETED,
        }
    }

    pub fn from_type_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == name)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 队列与交换机之间的绑定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueBinding {
    queue: String,
    pattern: String,
}

impl QueueBinding {
    pub fn new(queue: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            queue: queue.into(),
            pattern: pattern.into(),
        }
    }

    pub fn queue(&self) -> &str {
        &self.queue
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn matches(&self, routing_key: &str) -> bool {
        topic_matches(&self.pattern, routing_key)
    }
}

/// 交换机拓扑：交换机名与全部队列绑定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topology {
    exchange: String,
    bindings: Vec<QueueBinding>,
}

impl Topology {
    pub fn new(exchange: impl Into<String>) -> Self {
        Self {
            exchange: exchange.into(),
            bindings: Vec::new(),
        }
    }

    /// 标准拓扑：四个订阅者各自一个队列，`student.completed` 扇出到证书与积分两个队列
    pub fn standard() -> Self {
        Self::new(EXCHANGE_NAME)
            .bind(queues::EMAIL, routing_keys::STUDENT_CREATED)
            .bind(queues::ANALYTICS, routing_keys::ATTEMPT_RECORDED)
            .bind(queues::CERTIFICATE, routing_keys::COURSE_COMPLETED)
            .bind(queues::GAMIFICATION, routing_keys::COURSE_COMPLETED)
    }

    pub fn bind(mut self, queue: impl Into<String>, pattern: impl Into<String>) -> Self {
        let binding = QueueBinding::new(queue, pattern);
        if !self.bindings.contains(&binding) {
            self.bindings.push(binding);
        }
        self
    }

    pub fn exchange(&self) -> &str {
        &self.exchange
    }

    pub fn bindings(&self) -> &[QueueBinding] {
        &self.bindings
    }

    /// 所有声明的队列（去重，保持声明顺序）
    pub fn queues(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for b in &self.bindings {
            if !out.contains(&b.queue()) {
                out.push(b.queue());
            }
        }
        out
    }

    /// 路由键命中的队列，同一队列多条绑定命中时只返回一次
    pub fn route(&self, routing_key: &str) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for b in self.bindings.iter().filter(|b| b.matches(routing_key)) {
            if !out.contains(&b.queue()) {
                out.push(b.queue());
            }
        }
        out
    }
}

impl Default for Topology {
    fn default() -> Self {
        Self::standard()
    }
}

/// 主题交换机的绑定匹配：以 `.` 分词，`*` 匹配一个词，`#` 匹配零或多个词
pub fn topic_matches(pattern: &str, routing_key: &str) -> bool {
    let p: Vec<&str> = pattern.split('.').collect();
    let k: Vec<&str> = routing_key.split('.').collect();
    match_words(&p, &k)
}

fn match_words(pattern: &[&str], key: &[&str]) -> bool {
    match (pattern.split_first(), key.split_first()) {
        (None, None) => true,
        (None, Some(_)) => false,
        (Some((&"#", rest)), _) => {
            match_words(rest, key) || (!key.is_empty() && match_words(pattern, &key[1..]))
        }
        (Some(_), None) => false,
        (Some((&"*", rest)), Some((_, key_rest))) => match_words(rest, key_rest),
        (Some((word, rest)), Some((key_word, key_rest))) => {
            word == key_word && match_words(rest, key_rest)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_event_kind_has_distinct_routing_key() {
        let keys: Vec<&str> = EventKind::ALL.iter().map(|k| k.routing_key()).collect();
        assert_eq!(
            keys,
            vec!["student.created", "student.attempt", "student.completed"]
        );
    }

    #[test]
    fn type_names_round_trip() {
        for kind in EventKind::ALL {
            assert_eq!(EventKind::from_type_name(kind.as_str()), Some(kind));
        }
        assert_eq!(EventKind::from_type_name("Unknown"), None);
    }

    #[test]
    fn topic_wildcards() {
        assert!(topic_matches("student.created", "student.created"));
        assert!(!topic_matches("student.created", "student.completed"));
        assert!(topic_matches("student.*", "student.attempt"));
        assert!(!topic_matches("student.*", "student.attempt.extra"));
        assert!(topic_matches("student.#", "student"));
        assert!(topic_matches("student.#", "student.attempt.extra"));
        assert!(topic_matches("#", "anything.at.all"));
        assert!(topic_matches("#.completed", "student.completed"));
        assert!(!topic_matches("*.completed", "completed"));
    }

    #[test]
    fn standard_topology_fans_out_completion() {
        let t = Topology::standard();
        assert_eq!(t.exchange(), EXCHANGE_NAME);
        assert_eq!(
            t.route(routing_keys::COURSE_COMPLETED),
            vec![queues::CERTIFICATE, queues::GAMIFICATION]
        );
        assert_eq!(t.route(routing_keys::STUDENT_CREATED), vec![queues::EMAIL]);
        assert_eq!(
            t.route(routing_keys::ATTEMPT_RECORDED),
            vec![queues::ANALYTICS]
        );
        assert_eq!(t.queues().len(), 4);
    }

    #[test]
    fn overlapping_bindings_deliver_once_per_queue() {
        let t = Topology::new("x")
            .bind("audit", "student.#")
            .bind("audit", "student.completed")
            .bind("audit", "student.completed");
        assert_eq!(t.bindings().len(), 2);
        assert_eq!(t.route("student.completed"), vec!["audit"]);
        assert!(t.route("teacher.created").is_empty());
    }
}
