use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};

use course_core::model::{
    AnswerFeedback, CertificationOffer, CompileResult, CompileStatus, Course, CourseId, Question,
    QuestionId, Quiz, QuizId, Topic, TopicId, User, UserId, UserProgress,
};
use course_core::time::fixed_clock;
use services::{
    AnswerSubmission, ApiError, AppServices, AuthSession, CatalogService, CodeRunnerService,
    CompileRequest, LearningApi, QuizFlowService, SessionContext, TokenHandle,
};
use storage::InMemoryStore;

use crate::context::{UiApp, build_app_context};
use crate::views::{CatalogView, CourseView, EditorView, LoginView, QuizView, TopicView};

pub const COURSE_ID: &str = "java";
pub const QUIZ_TOPIC: &str = "loops";

/// In-process API serving one course with a five-question quiz.
pub struct FakeApi {
    pub courses: Mutex<Result<Vec<Course>, ()>>,
    pub progress: Mutex<UserProgress>,
}

impl Default for FakeApi {
    fn default() -> Self {
        Self {
            courses: Mutex::new(Ok(vec![course()])),
            progress: Mutex::new(UserProgress::default()),
        }
    }
}

impl FakeApi {
    pub fn failing() -> Self {
        let api = Self::default();
        *api.courses.lock().unwrap() = Err(());
        api
    }

    pub fn with_answered(count: usize) -> Self {
        let api = Self::default();
        api.progress
            .lock()
            .unwrap()
            .answered_questions
            .insert(quiz_id(), (0..count).map(question_id).collect());
        api
    }

    pub fn with_completed() -> Self {
        let api = Self::with_answered(5);
        api.progress
            .lock()
            .unwrap()
            .completed_quizzes
            .insert(quiz_id());
        api
    }
}

fn unavailable() -> ApiError {
    ApiError::Decode("courses: missing field `topics`".into())
}

#[async_trait]
impl LearningApi for FakeApi {
    async fn get_all_courses(&self) -> Result<Vec<Course>, ApiError> {
        self.courses.lock().unwrap().clone().map_err(|()| unavailable())
    }

    async fn get_course(&self, course_id: &CourseId) -> Result<Course, ApiError> {
        let courses = self.courses.lock().unwrap().clone().map_err(|()| unavailable())?;
        courses
            .into_iter()
            .find(|course| &course.id == course_id)
            .ok_or(ApiError::Domain {
                message: "Course not found".into(),
            })
    }

    async fn get_quiz(&self, _course: &CourseId, _topic: &TopicId) -> Result<Quiz, ApiError> {
        Ok(quiz())
    }

    async fn submit_quiz_answer(
        &self,
        _course: &CourseId,
        _topic: &TopicId,
        submission: &AnswerSubmission,
    ) -> Result<AnswerFeedback, ApiError> {
        let is_correct = submission.selected_option == 0;
        Ok(AnswerFeedback {
            is_correct,
            correct_option: 0,
            explanation: String::new(),
            xp_awarded: if is_correct { 10 } else { 0 },
            already_answered: false,
        })
    }

    async fn get_user_progress(&self) -> Result<UserProgress, ApiError> {
        Ok(self.progress.lock().unwrap().clone())
    }

    async fn login(&self, _email: &str, _password: &str) -> Result<AuthSession, ApiError> {
        Ok(auth_session())
    }

    async fn register(
        &self,
        _name: &str,
        _email: &str,
        _password: &str,
    ) -> Result<AuthSession, ApiError> {
        Ok(auth_session())
    }

    async fn google_login(&self, _id_token: &str) -> Result<AuthSession, ApiError> {
        Ok(auth_session())
    }

    async fn compile_code(&self, _request: &CompileRequest) -> Result<CompileResult, ApiError> {
        Ok(CompileResult {
            stdout: Some("ok\n".into()),
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

fn quiz_id() -> QuizId {
    QuizId::new("quiz-loops").unwrap()
}

fn question_id(index: usize) -> QuestionId {
    QuestionId::new(format!("q{index}")).unwrap()
}

fn quiz() -> Quiz {
    let questions = (0..5)
        .map(|i| Question {
            id: question_id(i),
            text: format!("Loop question {i}?"),
            options: vec!["for".into(), "while".into(), "loop".into()],
            explanation: None,
        })
        .collect();
    Quiz::new(quiz_id(), "Loops quiz", questions, 70, 300).unwrap()
}

fn course() -> Course {
    Course {
        id: CourseId::new(COURSE_ID).unwrap(),
        title: "Java Basics".into(),
        description: "Variables to classes".into(),
        topics: vec![
            Topic {
                id: TopicId::new("vars").unwrap(),
                title: "1. Variables – 2".into(),
                notes: Some("# Variables\n\nUse **int** for whole numbers.<script>x()</script>".into()),
                theory: None,
                quiz_id: None,
                exercise_id: None,
            },
            Topic {
                id: TopicId::new(QUIZ_TOPIC).unwrap(),
                title: "2. Loops".into(),
                notes: None,
                theory: Some("Loops repeat work.".into()),
                quiz_id: Some(quiz_id()),
                exercise_id: None,
            },
        ],
        projects: Vec::new(),
        certification: CertificationOffer::Available {
            price_cents: 2_900,
            currency: "USD".into(),
        },
    }
}

fn user() -> User {
    User {
        id: UserId::new("u-1").unwrap(),
        name: "Ada".into(),
        email: "ada@example.com".into(),
        avatar_url: None,
    }
}

fn auth_session() -> AuthSession {
    AuthSession {
        token: "tok-1".into(),
        user: user(),
    }
}

//
// ─── HARNESS ───────────────────────────────────────────────────────────────────
//

struct TestApp {
    services: AppServices,
}

impl UiApp for TestApp {
    fn app_name(&self) -> &str {
        "Learn"
    }

    fn session(&self) -> Arc<SessionContext> {
        self.services.session()
    }

    fn catalog(&self) -> Arc<CatalogService> {
        self.services.catalog()
    }

    fn quiz_flow(&self) -> Arc<QuizFlowService> {
        self.services.quiz_flow()
    }

    fn code_runner(&self) -> Arc<CodeRunnerService> {
        self.services.code_runner()
    }
}

#[derive(Clone, PartialEq, Eq)]
pub enum ViewKind {
    Catalog,
    Course,
    Topic(&'static str),
    Quiz,
    Editor,
    Login,
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view.clone());
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    let course_id = COURSE_ID.to_string();
    match view {
        ViewKind::Catalog => rsx! { CatalogView {} },
        ViewKind::Course => rsx! { CourseView { course_id } },
        ViewKind::Topic(topic_id) => rsx! { TopicView { course_id, topic_id: topic_id.to_string() } },
        ViewKind::Quiz => rsx! { QuizView { course_id, topic_id: QUIZ_TOPIC.to_string() } },
        ViewKind::Editor => rsx! { EditorView {} },
        ViewKind::Login => rsx! { LoginView {} },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub session: Arc<SessionContext>,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Rebuild and let pending resources resolve.
    pub async fn settle(&mut self) {
        self.rebuild();
        for _ in 0..4 {
            self.drive_async().await;
        }
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub async fn setup_view_harness(view: ViewKind, api: FakeApi, signed_in: bool) -> ViewHarness {
    let api: Arc<dyn LearningApi> = Arc::new(api);
    let services = AppServices::from_parts(
        Arc::new(InMemoryStore::new()),
        api,
        TokenHandle::default(),
        fixed_clock(),
    );
    if signed_in {
        services
            .session()
            .login("ada@example.com", "secret1")
            .await
            .expect("sign in");
    }
    let session = services.session();
    let dom = VirtualDom::new_with_props(
        ViewRouterHarness,
        ViewHarnessProps {
            app: Arc::new(TestApp { services }),
            view,
        },
    );
    ViewHarness { dom, session }
}
