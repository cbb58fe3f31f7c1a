//! Quiz attempt flow: entry decision, one-at-a-time submissions, countdown
//! and scoring.

mod attempt;
mod score;

use thiserror::Error;

pub use attempt::{
    QuizAttempt, QuizEntry, QuizPhase, SlotState, SubmitOutcome, SubmitTicket, TickOutcome,
};
pub use score::{QuizScore, percentage};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("quiz already completed")]
    Blocked,

    #[error("progress exists for this quiz; resume or restart instead")]
    ResumeRequired,

    #[error("there is no partial progress to resume")]
    NoResumeOffer,

    #[error("attempt already started")]
    AlreadyStarted,

    #[error("time is up")]
    TimeUp,

    #[error("an answer is already being submitted")]
    SubmissionPending,

    #[error("question {index} was already answered")]
    QuestionLocked { index: usize },

    #[error("option {option} is out of range ({available} options)")]
    InvalidOption { option: usize, available: usize },

    #[error("server named option {option} as correct but only {available} exist")]
    FeedbackOutOfRange { option: usize, available: usize },

    #[error("no submission is pending")]
    NoPendingSubmission,

    #[error("answer the current question first")]
    AwaitingAnswer,

    #[error("no question can be answered in phase {0:?}")]
    NotAnswerable(QuizPhase),
}
