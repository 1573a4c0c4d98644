use super::{Action, Subscriber};
use academic_domain::{domain_event::StudentEvent, routing::queues};

pub const EMAIL_DOMAIN: &str = "faculdade.edu.br";
pub const WELCOME_SUBJECT: &str = "Bem-vindo(a) à Plataforma!";

/// 新生欢迎邮件
#[derive(Debug, Default, Clone, Copy)]
pub struct EmailSubscriber;

impl Subscriber for EmailSubscriber {
    fn name(&self) -> &'static str {
        "email"
    }

    fn queue(&self) -> &'static str {
        queues::EMAIL
    }

    fn react(&self, event: &StudentEvent) -> Option<Action> {
        let StudentEvent::StudentCreated(created) = event else {
            return None;
        };

        Some(Action::SendEmail {
            to: format!("{}@{EMAIL_DOMAIN}", created.registration),
            subject: WELCOME_SUBJECT.to_string(),
            body: format!(
                "Olá {},\n\n\
                 Seja bem-vindo(a) à nossa plataforma de ensino!\n\
                 Seu registro acadêmico é: {}\n\n\
                 Estamos felizes em ter você conosco.\n\n\
                 Atenciosamente,\n\
                 Equipe Acadêmica\n",
                created.name, created.registration
            ),
        })
    }
}
