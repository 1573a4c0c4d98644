use super::{Action, Subscriber};
use academic_domain::{domain_event::StudentEvent, routing::queues};

/// 结课证书：通过则签发，未通过则跳过
#[derive(Debug, Default, Clone, Copy)]
pub struct CertificateSubscriber;

impl CertificateSubscriber {
    pub fn certificate_path(student_id: impl std::fmt::Display) -> String {
        format!("certificados/certificado_{student_id}.pdf")
    }
}

impl Subscriber for CertificateSubscriber {
    fn name(&self) -> &'static str {
        "certificate"
    }

    fn queue(&self) -> &'static str {
        queues::CERTIFICATE
    }

    fn react(&self, event: &StudentEvent) -> Option<Action> {
        let StudentEvent::CourseCompleted(completed) = event else {
            return None;
        };

        if !completed.approved {
            return Some(Action::SkipCertificate {
                student_id: completed.student_id,
            });
        }

        Some(Action::IssueCertificate {
            student_id: completed.student_id,
            name: completed.name.clone(),
            registration: completed.registration.clone(),
            final_grade: completed.final_grade,
            path: Self::certificate_path(completed.student_id),
        })
    }
}
