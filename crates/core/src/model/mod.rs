mod compiler;
mod course;
mod ids;
mod progress;
mod quiz;
mod user;

pub use ids::{CourseId, ExerciseId, ParseIdError, QuestionId, QuizId, TopicId, UserId};

pub use compiler::{CompileResult, CompileStatus, Language, RunMode};
pub use course::{
    CertificationOffer, Course, Project, ProjectTier, Topic, TopicBody, clean_topic_title,
};
pub use progress::{QuizStanding, UserProgress};
pub use quiz::{
    AnswerFeedback, DEFAULT_PASSING_SCORE, DEFAULT_TIME_LIMIT_SECS, Question, Quiz,
    QuizValidationError,
};
pub use user::{Credentials, CredentialsError, MIN_PASSWORD_LEN, Registration, User};
