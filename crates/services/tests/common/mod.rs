#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::StatusCode;

use course_core::model::{
    AnswerFeedback, CertificationOffer, CompileResult, CompileStatus, Course, CourseId,
    QuestionId, Question, Quiz, QuizId, Topic, TopicId, User, UserId, UserProgress,
};
use services::{AnswerSubmission, ApiError, AuthSession, CompileRequest, LearningApi};

pub const CORRECT_OPTION: usize = 1;
pub const XP_PER_CORRECT: u32 = 10;

/// Scriptable in-process `LearningApi`.
#[derive(Default)]
pub struct FakeApi {
    pub courses: Mutex<Vec<Course>>,
    pub quiz: Mutex<Option<Quiz>>,
    pub progress: Mutex<UserProgress>,
    /// Consumed before falling back to the answer key.
    pub scripted_answers: Mutex<VecDeque<Result<AnswerFeedback, ApiError>>>,
    pub scripted_auth: Mutex<VecDeque<Result<AuthSession, ApiError>>>,
    pub submissions: Mutex<Vec<AnswerSubmission>>,
    pub compiles: Mutex<Vec<CompileRequest>>,
    pub calls: Mutex<Vec<&'static str>>,
}

impl FakeApi {
    pub fn with_quiz(quiz: Quiz) -> Self {
        let api = Self::default();
        *api.quiz.lock().unwrap() = Some(quiz);
        api
    }

    pub fn set_progress(&self, progress: UserProgress) {
        *self.progress.lock().unwrap() = progress;
    }

    pub fn script_answer(&self, result: Result<AnswerFeedback, ApiError>) {
        self.scripted_answers.lock().unwrap().push_back(result);
    }

    pub fn script_auth(&self, result: Result<AuthSession, ApiError>) {
        self.scripted_auth.lock().unwrap().push_back(result);
    }

    pub fn submitted_ids(&self) -> Vec<String> {
        self.submissions
            .lock()
            .unwrap()
            .iter()
            .map(|s| s.question_id.as_str().to_owned())
            .collect()
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }

    fn next_auth(&self) -> Result<AuthSession, ApiError> {
        self.scripted_auth
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(auth_session("tok-1")))
    }
}

#[async_trait]
impl LearningApi for FakeApi {
    async fn get_all_courses(&self) -> Result<Vec<Course>, ApiError> {
        self.record("courses");
        Ok(self.courses.lock().unwrap().clone())
    }

    async fn get_course(&self, course_id: &CourseId) -> Result<Course, ApiError> {
        self.record("course");
        self.courses
            .lock()
            .unwrap()
            .iter()
            .find(|course| &course.id == course_id)
            .cloned()
            .ok_or(ApiError::Status {
                status: StatusCode::NOT_FOUND,
                message: Some("Course not found".into()),
            })
    }

    async fn get_quiz(&self, _course: &CourseId, _topic: &TopicId) -> Result<Quiz, ApiError> {
        self.record("quiz");
        self.quiz.lock().unwrap().clone().ok_or(ApiError::Status {
            status: StatusCode::NOT_FOUND,
            message: None,
        })
    }

    async fn submit_quiz_answer(
        &self,
        _course: &CourseId,
        _topic: &TopicId,
        submission: &AnswerSubmission,
    ) -> Result<AnswerFeedback, ApiError> {
        self.record("answer");
        self.submissions.lock().unwrap().push(submission.clone());
        if let Some(scripted) = self.scripted_answers.lock().unwrap().pop_front() {
            return scripted;
        }
        let is_correct = submission.selected_option == CORRECT_OPTION;
        Ok(AnswerFeedback {
            is_correct,
            correct_option: CORRECT_OPTION,
            explanation: format!("{} explained", submission.question_id),
            xp_awarded: if is_correct { XP_PER_CORRECT } else { 0 },
            already_answered: false,
        })
    }

    async fn get_user_progress(&self) -> Result<UserProgress, ApiError> {
        self.record("progress");
        Ok(self.progress.lock().unwrap().clone())
    }

    async fn login(&self, _email: &str, _password: &str) -> Result<AuthSession, ApiError> {
        self.record("login");
        self.next_auth()
    }

    async fn register(
        &self,
        _name: &str,
        _email: &str,
        _password: &str,
    ) -> Result<AuthSession, ApiError> {
        self.record("register");
        self.next_auth()
    }

    async fn google_login(&self, _id_token: &str) -> Result<AuthSession, ApiError> {
        self.record("google_login");
        self.next_auth()
    }

    async fn compile_code(&self, request: &CompileRequest) -> Result<CompileResult, ApiError> {
        self.record("compile");
        self.compiles.lock().unwrap().push(request.clone());
        Ok(CompileResult {
            stdout: Some("Hello, world!\n".into()),
            stderr: None,
            compile_output: None,
            status: CompileStatus {
                id: 3,
                description: "Accepted".into(),
            },
        })
    }
}

//
// ─── FIXTURES ──────────────────────────────────────────────────────────────────
//

pub fn quiz_id() -> QuizId {
    QuizId::new("quiz-1").unwrap()
}

pub fn course_id() -> CourseId {
    CourseId::new("rust-101").unwrap()
}

pub fn topic_id() -> TopicId {
    TopicId::new("ownership").unwrap()
}

pub fn question_id(index: usize) -> QuestionId {
    QuestionId::new(format!("q{index}")).unwrap()
}

pub fn quiz(total: usize, passing_score: u32, time_limit_secs: u32) -> Quiz {
    let questions = (0..total)
        .map(|i| Question {
            id: question_id(i),
            text: format!("Question {i}?"),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            explanation: None,
        })
        .collect();
    Quiz::new(quiz_id(), "Ownership quiz", questions, passing_score, time_limit_secs).unwrap()
}

pub fn answered(count: usize) -> UserProgress {
    let mut progress = UserProgress::default();
    progress
        .answered_questions
        .insert(quiz_id(), (0..count).map(question_id).collect());
    progress
}

pub fn completed() -> UserProgress {
    let mut progress = answered(4);
    progress.completed_quizzes.insert(quiz_id());
    progress
}

pub fn user() -> User {
    User {
        id: UserId::new("u-1").unwrap(),
        name: "Ada".into(),
        email: "ada@example.com".into(),
        avatar_url: None,
    }
}

pub fn auth_session(token: &str) -> AuthSession {
    AuthSession {
        token: token.into(),
        user: user(),
    }
}

pub fn course(topics: &[(&str, Option<&str>)]) -> Course {
    Course {
        id: course_id(),
        title: "Rust 101".into(),
        description: "Learn Rust".into(),
        topics: topics
            .iter()
            .enumerate()
            .map(|(i, (id, quiz))| Topic {
                id: TopicId::new(*id).unwrap(),
                title: format!("{}. {id}", i + 1),
                notes: Some(format!("# {id}")),
                theory: None,
                quiz_id: quiz.map(|q| QuizId::new(q).unwrap()),
                exercise_id: None,
            })
            .collect(),
        projects: Vec::new(),
        certification: CertificationOffer::ComingSoon,
    }
}
