//! Wire schemas and the decode/validate step for every response body.
//!
//! Bodies are first decoded into the private DTOs below, then validated into
//! domain types. A mismatch is always `ApiError::Decode`.

use std::collections::{HashMap, HashSet};
use std::fmt::Display;

use serde::Deserialize;
use serde::de::DeserializeOwned;

use course_core::model::{
    AnswerFeedback, CertificationOffer, CompileResult, CompileStatus, Course, CourseId,
    DEFAULT_PASSING_SCORE, DEFAULT_TIME_LIMIT_SECS, ExerciseId, Project, ProjectTier, Question,
    QuestionId, Quiz, QuizId, Topic, TopicId, User, UserProgress,
};

use super::AuthSession;
use crate::error::ApiError;

fn invalid(err: impl Display) -> ApiError {
    ApiError::Decode(err.to_string())
}

/// Decode a JSON body into `T`.
///
/// # Errors
///
/// Returns `ApiError::Decode` if the body is not JSON or does not match `T`.
pub fn decode_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(invalid)
}

/// Pull `message` out of an error body, if it has one.
#[must_use]
pub fn error_message(body: &[u8]) -> Option<String> {
    #[derive(Deserialize)]
    struct ErrorBody {
        message: Option<String>,
    }
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|body| body.message)
        .map(|message| message.trim().to_owned())
        .filter(|message| !message.is_empty())
}

//
// ─── COURSES ───────────────────────────────────────────────────────────────────
//

#[derive(Deserialize)]
struct CoursesEnvelope {
    courses: Vec<CourseDto>,
}

#[derive(Deserialize)]
struct CourseEnvelope {
    course: CourseDto,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CourseDto {
    id: String,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    topics: Vec<TopicDto>,
    #[serde(default)]
    projects: Vec<ProjectDto>,
    #[serde(default)]
    certification: Option<CertificationDto>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TopicDto {
    id: String,
    title: String,
    #[serde(default)]
    notes: Option<String>,
    #[serde(default)]
    theory: Option<String>,
    #[serde(default)]
    quiz_id: Option<String>,
    #[serde(default)]
    exercise_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectDto {
    tier: String,
    title: String,
    #[serde(default)]
    description: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CertificationDto {
    available: bool,
    #[serde(default)]
    price_cents: Option<u32>,
    #[serde(default)]
    currency: Option<String>,
}

/// # Errors
///
/// Returns `ApiError::Decode` on schema mismatch.
pub fn parse_courses(body: &[u8]) -> Result<Vec<Course>, ApiError> {
    let envelope: CoursesEnvelope = decode_json(body)?;
    envelope.courses.into_iter().map(course_from_dto).collect()
}

/// # Errors
///
/// Returns `ApiError::Decode` on schema mismatch.
pub fn parse_course(body: &[u8]) -> Result<Course, ApiError> {
    let envelope: CourseEnvelope = decode_json(body)?;
    course_from_dto(envelope.course)
}

fn course_from_dto(dto: CourseDto) -> Result<Course, ApiError> {
    let id = CourseId::new(dto.id).map_err(invalid)?;
    let mut seen = HashSet::new();
    let mut topics = Vec::with_capacity(dto.topics.len());
    for topic in dto.topics {
        let topic = topic_from_dto(topic)?;
        if !seen.insert(topic.id.clone()) {
            return Err(invalid(format_args!(
                "course {id} lists topic {} twice",
                topic.id
            )));
        }
        topics.push(topic);
    }
    let projects = dto
        .projects
        .into_iter()
        .map(project_from_dto)
        .collect::<Result<Vec<_>, _>>()?;
    let certification = match dto.certification {
        Some(cert) => certification_from_dto(cert)?,
        None => CertificationOffer::ComingSoon,
    };

    Ok(Course {
        id,
        title: dto.title,
        description: dto.description,
        topics,
        projects,
        certification,
    })
}

fn topic_from_dto(dto: TopicDto) -> Result<Topic, ApiError> {
    Ok(Topic {
        id: TopicId::new(dto.id).map_err(invalid)?,
        title: dto.title,
        notes: dto.notes,
        theory: dto.theory,
        quiz_id: dto.quiz_id.map(QuizId::new).transpose().map_err(invalid)?,
        exercise_id: dto
            .exercise_id
            .map(ExerciseId::new)
            .transpose()
            .map_err(invalid)?,
    })
}

fn project_from_dto(dto: ProjectDto) -> Result<Project, ApiError> {
    let tier = ProjectTier::from_wire(&dto.tier)
        .ok_or_else(|| invalid(format_args!("unknown project tier {:?}", dto.tier)))?;
    Ok(Project {
        tier,
        title: dto.title,
        description: dto.description,
    })
}

fn certification_from_dto(dto: CertificationDto) -> Result<CertificationOffer, ApiError> {
    if !dto.available {
        return Ok(CertificationOffer::ComingSoon);
    }
    match (dto.price_cents, dto.currency) {
        (Some(price_cents), Some(currency)) if !currency.trim().is_empty() => {
            Ok(CertificationOffer::Available {
                price_cents,
                currency: currency.trim().to_uppercase(),
            })
        }
        _ => Err(invalid("available certification is missing its price")),
    }
}

//
// ─── QUIZ ──────────────────────────────────────────────────────────────────────
//

#[derive(Deserialize)]
struct QuizEnvelope {
    quiz: QuizDto,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuizDto {
    id: String,
    #[serde(default)]
    title: String,
    questions: Vec<QuestionDto>,
    #[serde(default)]
    passing_score: Option<u32>,
    #[serde(default)]
    time_limit_secs: Option<u32>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuestionDto {
    id: String,
    text: String,
    options: Vec<String>,
    #[serde(default)]
    explanation: Option<String>,
}

/// # Errors
///
/// Returns `ApiError::Decode` on schema mismatch or an invalid quiz
/// (no questions, too few options, duplicate ids, bad metadata).
pub fn parse_quiz(body: &[u8]) -> Result<Quiz, ApiError> {
    let QuizEnvelope { quiz } = decode_json(body)?;
    let questions = quiz
        .questions
        .into_iter()
        .map(|q| {
            Ok(Question {
                id: QuestionId::new(q.id).map_err(invalid)?,
                text: q.text,
                options: q.options,
                explanation: q.explanation,
            })
        })
        .collect::<Result<Vec<_>, ApiError>>()?;

    Quiz::new(
        QuizId::new(quiz.id).map_err(invalid)?,
        quiz.title,
        questions,
        quiz.passing_score.unwrap_or(DEFAULT_PASSING_SCORE),
        quiz.time_limit_secs.unwrap_or(DEFAULT_TIME_LIMIT_SECS),
    )
    .map_err(invalid)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnswerDto {
    is_correct: bool,
    correct_answer: usize,
    #[serde(default)]
    explanation: Option<String>,
    #[serde(default)]
    xp_awarded: u32,
    #[serde(default)]
    already_answered: bool,
}

/// # Errors
///
/// Returns `ApiError::Decode` on schema mismatch or when XP is awarded for a
/// wrong answer.
pub fn parse_answer(body: &[u8]) -> Result<AnswerFeedback, ApiError> {
    let dto: AnswerDto = decode_json(body)?;
    if !dto.is_correct && dto.xp_awarded > 0 {
        return Err(invalid("xp awarded for an incorrect answer"));
    }
    Ok(AnswerFeedback {
        is_correct: dto.is_correct,
        correct_option: dto.correct_answer,
        explanation: dto.explanation.unwrap_or_default(),
        xp_awarded: if dto.already_answered { 0 } else { dto.xp_awarded },
        already_answered: dto.already_answered,
    })
}

//
// ─── PROGRESS ──────────────────────────────────────────────────────────────────
//

#[derive(Deserialize)]
struct ProgressEnvelope {
    progress: ProgressDto,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct ProgressDto {
    total_course_xp: u32,
    total_exercise_xp: u32,
    completed_quizzes: Vec<String>,
    answered_questions: HashMap<String, Vec<String>>,
}

/// # Errors
///
/// Returns `ApiError::Decode` on schema mismatch.
pub fn parse_progress(body: &[u8]) -> Result<UserProgress, ApiError> {
    let ProgressEnvelope { progress } = decode_json(body)?;
    let completed_quizzes = progress
        .completed_quizzes
        .into_iter()
        .map(QuizId::new)
        .collect::<Result<HashSet<_>, _>>()
        .map_err(invalid)?;

    let mut answered_questions = HashMap::with_capacity(progress.answered_questions.len());
    for (quiz_id, question_ids) in progress.answered_questions {
        let quiz_id = QuizId::new(quiz_id).map_err(invalid)?;
        let mut ordered: Vec<QuestionId> = Vec::with_capacity(question_ids.len());
        for raw in question_ids {
            let id = QuestionId::new(raw).map_err(invalid)?;
            if !ordered.contains(&id) {
                ordered.push(id);
            }
        }
        answered_questions.insert(quiz_id, ordered);
    }

    Ok(UserProgress {
        total_course_xp: progress.total_course_xp,
        total_exercise_xp: progress.total_exercise_xp,
        completed_quizzes,
        answered_questions,
    })
}

//
// ─── AUTH ──────────────────────────────────────────────────────────────────────
//

#[derive(Deserialize)]
struct AuthDto {
    token: String,
    user: User,
}

/// # Errors
///
/// Returns `ApiError::Decode` on schema mismatch or an empty token.
pub fn parse_auth(body: &[u8]) -> Result<AuthSession, ApiError> {
    let dto: AuthDto = decode_json(body)?;
    let token = dto.token.trim();
    if token.is_empty() {
        return Err(invalid("auth response carries an empty token"));
    }
    Ok(AuthSession {
        token: token.to_owned(),
        user: dto.user,
    })
}

//
// ─── COMPILER ──────────────────────────────────────────────────────────────────
//

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompileDto {
    #[serde(default)]
    stdout: Option<String>,
    #[serde(default)]
    stderr: Option<String>,
    #[serde(default)]
    compile_output: Option<String>,
    status: CompileStatusDto,
}

#[derive(Deserialize)]
struct CompileStatusDto {
    id: u32,
    description: String,
}

/// # Errors
///
/// Returns `ApiError::Decode` on schema mismatch.
pub fn parse_compile(body: &[u8]) -> Result<CompileResult, ApiError> {
    let dto: CompileDto = decode_json(body)?;
    Ok(CompileResult {
        stdout: dto.stdout,
        stderr: dto.stderr,
        compile_output: dto.compile_output,
        status: CompileStatus {
            id: dto.status.id,
            description: dto.status.description,
        },
    })
}
