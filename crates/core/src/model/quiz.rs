use thiserror::Error;

use crate::model::ids::{QuestionId, QuizId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizValidationError {
    #[error("quiz has no questions")]
    NoQuestions,

    #[error("question {0} has fewer than two options")]
    TooFewOptions(QuestionId),

    #[error("question id {0} appears more than once")]
    DuplicateQuestion(QuestionId),

    #[error("passing score must be between 0 and 100, got {0}")]
    InvalidPassingScore(u32),

    #[error("time limit must be > 0 seconds")]
    InvalidTimeLimit,
}

/// A multiple-choice question. The correct option is withheld by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub id: QuestionId,
    pub text: String,
    pub options: Vec<String>,
    pub explanation: Option<String>,
}

/// Default passing threshold when the server omits one.
pub const DEFAULT_PASSING_SCORE: u32 = 70;

/// Default countdown when the server omits one (10 minutes).
pub const DEFAULT_TIME_LIMIT_SECS: u32 = 600;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quiz {
    id: QuizId,
    title: String,
    questions: Vec<Question>,
    passing_score: u32,
    time_limit_secs: u32,
}

impl Quiz {
    /// # Errors
    ///
    /// Returns `QuizValidationError` if the quiz is empty, a question has
    /// fewer than two options, ids repeat, or metadata is out of range.
    pub fn new(
        id: QuizId,
        title: impl Into<String>,
        questions: Vec<Question>,
        passing_score: u32,
        time_limit_secs: u32,
    ) -> Result<Self, QuizValidationError> {
        if questions.is_empty() {
            return Err(QuizValidationError::NoQuestions);
        }
        if passing_score > 100 {
            return Err(QuizValidationError::InvalidPassingScore(passing_score));
        }
        if time_limit_secs == 0 {
            return Err(QuizValidationError::InvalidTimeLimit);
        }
        for (idx, question) in questions.iter().enumerate() {
            if question.options.len() < 2 {
                return Err(QuizValidationError::TooFewOptions(question.id.clone()));
            }
            if questions[..idx].iter().any(|q| q.id == question.id) {
                return Err(QuizValidationError::DuplicateQuestion(question.id.clone()));
            }
        }

        Ok(Self {
            id,
            title: title.into(),
            questions,
            passing_score,
            time_limit_secs,
        })
    }

    #[must_use]
    pub fn id(&self) -> &QuizId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn passing_score(&self) -> u32 {
        self.passing_score
    }

    #[must_use]
    pub fn time_limit_secs(&self) -> u32 {
        self.time_limit_secs
    }

    #[must_use]
    pub fn position_of(&self, question_id: &QuestionId) -> Option<usize> {
        self.questions.iter().position(|q| &q.id == question_id)
    }
}

/// Server verdict for one submitted answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub is_correct: bool,
    pub correct_option: usize,
    pub explanation: String,
    pub xp_awarded: u32,
    /// The server had already recorded an answer for this question.
    pub already_answered: bool,
}
