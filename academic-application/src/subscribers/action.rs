use academic_domain::entity::StudentId;
use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// 订阅者对事件的反应
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Action {
    SendEmail {
        to: String,
        subject: String,
        body: String,
    },
    IssueCertificate {
        student_id: StudentId,
        name: String,
        registration: String,
        final_grade: f64,
        path: String,
    },
    SkipCertificate {
        student_id: StudentId,
    },
    AwardPoints {
        student_id: StudentId,
        points: u32,
        badge: Badge,
        level: Level,
    },
    RecordMetric {
        metric: String,
        student_id: StudentId,
        attempt_number: u32,
        alert: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Badge {
    ExcelenciaMaxima,
    DesempenhoExcepcional,
    AltoDesempenho,
    BomDesempenho,
    Concluido,
}

impl Badge {
    pub fn label(&self) -> &'static str {
        match self {
            Badge::ExcelenciaMaxima => "Excelência Máxima",
            Badge::DesempenhoExcepcional => "Desempenho Excepcional",
            Badge::AltoDesempenho => "Alto Desempenho",
            Badge::BomDesempenho => "Bom Desempenho",
            Badge::Concluido => "Concluído",
        }
    }
}

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Level {
    Mestre,
    Avancado,
    Intermediario,
    Iniciante,
}

impl Level {
    pub fn label(&self) -> &'static str {
        match self {
            Level::Mestre => "Mestre",
            Level::Avancado => "Avançado",
            Level::Intermediario => "Intermediário",
            Level::Iniciante => "Iniciante",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 动作执行端口（邮件网关、证书存储、积分系统、数据仓库……）
#[async_trait]
pub trait ActionSink: Send + Sync {
    async fn execute(&self, subscriber: &str, event_id: &str, action: Action) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedAction {
    pub subscriber: String,
    pub event_id: String,
    pub action: Action,
}

/// 只记录不执行的内存 sink
#[derive(Debug, Default)]
pub struct ActionLog {
    entries: Mutex<Vec<RecordedAction>>,
}

impl ActionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<RecordedAction> {
        self.lock().clone()
    }

    pub fn by_subscriber(&self, subscriber: &str) -> Vec<Action> {
        self.entries()
            .into_iter()
            .filter(|r| r.subscriber == subscriber)
            .map(|r| r.action)
            .collect()
    }

    // 记录只做追加，持锁线程 panic 后列表仍然完整
    fn lock(&self) -> MutexGuard<'_, Vec<RecordedAction>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl ActionSink for ActionLog {
    async fn execute(&self, subscriber: &str, event_id: &str, action: Action) -> anyhow::Result<()> {
        self.lock().push(RecordedAction {
            subscriber: subscriber.to_string(),
            event_id: event_id.to_string(),
            action,
        });
        Ok(())
    }
}
