use super::{Action, Subscriber};
use academic_domain::{domain_event::StudentEvent, routing::queues, student::Student};

pub const ATTEMPT_METRIC: &str = "tentativa_avaliacao";

/// 评估尝试指标；达到尝试上限时附带告警
#[derive(Debug, Default, Clone, Copy)]
pub struct AnalyticsSubscriber;

impl Subscriber for AnalyticsSubscriber {
    fn name(&self) -> &'static str {
        "analytics"
    }

    fn queue(&self) -> &'static str {
        queues::ANALYTICS
    }

    fn react(&self, event: &StudentEvent) -> Option<Action> {
        let StudentEvent::AttemptRecorded(attempt) = event else {
            return None;
        };

        Some(Action::RecordMetric {
            metric: ATTEMPT_METRIC.to_string(),
            student_id: attempt.student_id,
            attempt_number: attempt.attempt_number,
            alert: attempt.attempt_number >= Student::MAX_ATTEMPTS,
        })
    }
}
