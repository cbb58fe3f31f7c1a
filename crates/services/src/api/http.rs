use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Serialize;
use url::Url;

use course_core::model::{AnswerFeedback, CompileResult, Course, CourseId, Quiz, TopicId, UserProgress};

use super::schema;
use super::{AnswerSubmission, AuthSession, CompileRequest, LearningApi};
use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::session::TokenHandle;

/// `LearningApi` over JSON/HTTP.
///
/// The bearer token is read from the shared `TokenHandle` on every request,
/// so a login or logout takes effect without rebuilding the client.
#[derive(Clone)]
pub struct HttpLearningApi {
    client: Client,
    base_url: Url,
    token: TokenHandle,
}

impl HttpLearningApi {
    /// # Errors
    ///
    /// Returns `reqwest::Error` if the HTTP client cannot be built.
    pub fn new(config: &ApiConfig, token: TokenHandle) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            client,
            base_url: config.base_url().clone(),
            token,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::Url(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get(&self, route: &'static str, segments: &[&str]) -> Result<Vec<u8>, ApiError> {
        let url = self.endpoint(segments)?;
        self.execute(route, self.client.get(url)).await
    }

    async fn post<B: Serialize + ?Sized + Sync>(
        &self,
        route: &'static str,
        segments: &[&str],
        body: &B,
    ) -> Result<Vec<u8>, ApiError> {
        let url = self.endpoint(segments)?;
        self.execute(route, self.client.post(url).json(body)).await
    }

    async fn execute(
        &self,
        route: &'static str,
        request: RequestBuilder,
    ) -> Result<Vec<u8>, ApiError> {
        let request = match self.token.get() {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await.map_err(|err| {
            tracing::warn!(route, error = %err, "request did not complete");
            ApiError::Transport(err)
        })?;
        let status = response.status();
        let body = response.bytes().await?.to_vec();

        if status.is_success() {
            tracing::debug!(route, %status, bytes = body.len(), "api response");
            return Ok(body);
        }

        tracing::warn!(route, %status, "api request rejected");
        let message = schema::error_message(&body);
        if status == StatusCode::CONFLICT || status == StatusCode::UNPROCESSABLE_ENTITY {
            return Err(ApiError::Domain {
                message: message.unwrap_or_else(|| "The request was rejected.".into()),
            });
        }
        Err(ApiError::Status { status, message })
    }
}

#[derive(Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RegisterBody<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GoogleBody<'a> {
    id_token: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CompileBody<'a> {
    language: &'static str,
    source_code: &'a str,
    stdin: &'a str,
}

#[async_trait]
impl LearningApi for HttpLearningApi {
    async fn get_all_courses(&self) -> Result<Vec<Course>, ApiError> {
        let body = self.get("courses", &["courses"]).await?;
        schema::parse_courses(&body)
    }

    async fn get_course(&self, course_id: &CourseId) -> Result<Course, ApiError> {
        let body = self
            .get("course", &["courses", course_id.as_str()])
            .await?;
        schema::parse_course(&body)
    }

    async fn get_quiz(&self, course_id: &CourseId, topic_id: &TopicId) -> Result<Quiz, ApiError> {
        let body = self
            .get(
                "quiz",
                &["courses", course_id.as_str(), "topics", topic_id.as_str(), "quiz"],
            )
            .await?;
        schema::parse_quiz(&body)
    }

    async fn submit_quiz_answer(
        &self,
        course_id: &CourseId,
        topic_id: &TopicId,
        submission: &AnswerSubmission,
    ) -> Result<AnswerFeedback, ApiError> {
        tracing::info!(
            course_id = %course_id,
            quiz_id = %submission.quiz_id,
            question_id = %submission.question_id,
            "submitting quiz answer"
        );
        let body = self
            .post(
                "quiz_answer",
                &[
                    "courses",
                    course_id.as_str(),
                    "topics",
                    topic_id.as_str(),
                    "quiz",
                    "answer",
                ],
                submission,
            )
            .await?;
        schema::parse_answer(&body)
    }

    async fn get_user_progress(&self) -> Result<UserProgress, ApiError> {
        let body = self.get("progress", &["progress"]).await?;
        schema::parse_progress(&body)
    }

    async fn login(&self, email: &str, password: &str) -> Result<AuthSession, ApiError> {
        let body = self
            .post("login", &["auth", "login"], &LoginBody { email, password })
            .await?;
        schema::parse_auth(&body)
    }

    async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, ApiError> {
        let body = self
            .post(
                "register",
                &["auth", "register"],
                &RegisterBody {
                    name,
                    email,
                    password,
                },
            )
            .await?;
        schema::parse_auth(&body)
    }

    async fn google_login(&self, id_token: &str) -> Result<AuthSession, ApiError> {
        let body = self
            .post("google_login", &["auth", "google"], &GoogleBody { id_token })
            .await?;
        schema::parse_auth(&body)
    }

    async fn compile_code(&self, request: &CompileRequest) -> Result<CompileResult, ApiError> {
        tracing::info!(language = request.language.key(), "compiling code");
        let body = self
            .post(
                "compile",
                &["compiler", "compile"],
                &CompileBody {
                    language: request.language.key(),
                    source_code: &request.source_code,
                    stdin: &request.stdin,
                },
            )
            .await?;
        schema::parse_compile(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(base: &str) -> HttpLearningApi {
        let config = ApiConfig::new(base).unwrap();
        HttpLearningApi::new(&config, TokenHandle::default()).unwrap()
    }

    #[test]
    fn endpoints_append_to_base_path() {
        let with_slash = api("http://localhost:5000/api/");
        let without_slash = api("http://localhost:5000/api");
        for client in [with_slash, without_slash] {
            let url = client
                .endpoint(&["courses", "c1", "topics", "t1", "quiz"])
                .unwrap();
            assert_eq!(url.as_str(), "http://localhost:5000/api/courses/c1/topics/t1/quiz");
        }
    }

    #[test]
    fn path_segments_are_escaped() {
        let client = api("http://localhost:5000/api");
        let url = client.endpoint(&["courses", "a/b c"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/courses/a%2Fb%20c");
    }

    #[test]
    fn submission_serializes_in_camel_case() {
        let submission = AnswerSubmission {
            question_id: course_core::model::QuestionId::new("q1").unwrap(),
            selected_option: 2,
            quiz_id: course_core::model::QuizId::new("qz").unwrap(),
        };
        let json = serde_json::to_value(&submission).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"questionId": "q1", "selectedOption": 2, "quizId": "qz"})
        );
    }
}
