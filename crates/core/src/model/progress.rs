use std::collections::{HashMap, HashSet};

use crate::model::ids::{QuestionId, QuizId};

/// Per-user progress aggregate as reported by the server.
///
/// The client never mutates this copy; it is re-fetched before any
/// completion decision.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserProgress {
    pub total_course_xp: u32,
    pub total_exercise_xp: u32,
    pub completed_quizzes: HashSet<QuizId>,
    pub answered_questions: HashMap<QuizId, Vec<QuestionId>>,
}

/// Where the user stands on a given quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizStanding {
    Fresh,
    Partial { answered: usize },
    Completed,
}

impl UserProgress {
    #[must_use]
    pub fn is_completed(&self, quiz_id: &QuizId) -> bool {
        self.completed_quizzes.contains(quiz_id)
    }

    #[must_use]
    pub fn answered_for(&self, quiz_id: &QuizId) -> &[QuestionId] {
        self.answered_questions
            .get(quiz_id)
            .map_or(&[], Vec::as_slice)
    }

    /// Completion wins over any partial answer list.
    #[must_use]
    pub fn standing(&self, quiz_id: &QuizId) -> QuizStanding {
        if self.is_completed(quiz_id) {
            return QuizStanding::Completed;
        }
        match self.answered_for(quiz_id).len() {
            0 => QuizStanding::Fresh,
            answered => QuizStanding::Partial { answered },
        }
    }

    #[must_use]
    pub fn total_xp(&self) -> u32 {
        self.total_course_xp.saturating_add(self.total_exercise_xp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiz(id: &str) -> QuizId {
        QuizId::new(id).unwrap()
    }

    #[test]
    fn standing_distinguishes_fresh_partial_completed() {
        let mut progress = UserProgress::default();
        assert_eq!(progress.standing(&quiz("a")), QuizStanding::Fresh);

        progress.answered_questions.insert(
            quiz("a"),
            vec![QuestionId::new("q1").unwrap(), QuestionId::new("q2").unwrap()],
        );
        assert_eq!(
            progress.standing(&quiz("a")),
            QuizStanding::Partial { answered: 2 }
        );

        progress.completed_quizzes.insert(quiz("a"));
        assert_eq!(progress.standing(&quiz("a")), QuizStanding::Completed);
    }

    #[test]
    fn empty_answer_list_is_fresh() {
        let mut progress = UserProgress::default();
        progress.answered_questions.insert(quiz("a"), Vec::new());
        assert_eq!(progress.standing(&quiz("a")), QuizStanding::Fresh);
    }

    #[test]
    fn total_xp_sums_course_and_exercise() {
        let progress = UserProgress {
            total_course_xp: 120,
            total_exercise_xp: 30,
            ..UserProgress::default()
        };
        assert_eq!(progress.total_xp(), 150);
    }
}
