use super::{Action, Badge, Level, Subscriber};
use academic_domain::{domain_event::StudentEvent, routing::queues};

/// 按最终成绩发放积分、徽章与等级
#[derive(Debug, Default, Clone, Copy)]
pub struct GamificationSubscriber;

impl GamificationSubscriber {
    pub fn points(grade: f64) -> u32 {
        match grade {
            g if g >= 9.0 => 1000,
            g if g >= 8.0 => 800,
            g if g >= 7.0 => 600,
            g if g >= 6.0 => 400,
            _ => 200,
        }
    }

    pub fn badge(grade: f64) -> Badge {
        match grade {
            g if g >= 9.5 => Badge::ExcelenciaMaxima,
            g if g >= 9.0 => Badge::DesempenhoExcepcional,
            g if g >= 8.0 => Badge::AltoDesempenho,
            g if g >= 7.0 => Badge::BomDesempenho,
            _ => Badge::Concluido,
        }
    }

    pub fn level(points: u32) -> Level {
        match points {
            p if p >= 1000 => Level::Mestre,
            p if p >= 800 => Level::Avancado,
            p if p >= 600 => Level::Intermediario,
            _ => Level::Iniciante,
        }
    }
}

impl Subscriber for GamificationSubscriber {
    fn name(&self) -> &'static str {
        "gamification"
    }

    fn queue(&self) -> &'static str {
        queues::GAMIFICATION
    }

    fn react(&self, event: &StudentEvent) -> Option<Action> {
        let StudentEvent::CourseCompleted(completed) = event else {
            return None;
        };

        let points = Self::points(completed.final_grade);
        Some(Action::AwardPoints {
            student_id: completed.student_id,
            points,
            badge: Self::badge(completed.final_grade),
            level: Self::level(points),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subscribers::fixtures;

    #[test]
    fn thresholds_are_inclusive() {
        let cases = [
            (10.0, 1000, Badge::ExcelenciaMaxima, Level::Mestre),
            (9.5, 1000, Badge::ExcelenciaMaxima, Level::Mestre),
            (9.0, 1000, Badge::DesempenhoExcepcional, Level::Mestre),
            (8.0, 800, Badge::AltoDesempenho, Level::Avancado),
            (7.0, 600, Badge::BomDesempenho, Level::Intermediario),
            (6.0, 400, Badge::Concluido, Level::Iniciante),
            (5.99, 200, Badge::Concluido, Level::Iniciante),
        ];
        for (grade, points, badge, level) in cases {
            assert_eq!(GamificationSubscriber::points(grade), points, "grade {grade}");
            assert_eq!(GamificationSubscriber::badge(grade), badge, "grade {grade}");
            assert_eq!(GamificationSubscriber::level(points), level, "grade {grade}");
        }
    }

    #[test]
    fn failed_completion_still_awards_points() {
        let Some(Action::AwardPoints { points, level, .. }) =
            GamificationSubscriber.react(&fixtures::completed(4.0))
        else {
            panic!("expected AwardPoints");
        };
        assert_eq!(points, 200);
        assert_eq!(level.label(), "Iniciante");
        assert_eq!(GamificationSubscriber.react(&fixtures::attempt(1)), None);
    }
}
