use std::sync::Arc;

use chrono::{DateTime, Utc};

use course_core::model::{AnswerFeedback, CourseId, TopicId};
use course_core::quiz::{QuizAttempt, QuizPhase, SubmitOutcome, SubmitTicket, TickOutcome};

use crate::Clock;
use crate::api::{AnswerSubmission, LearningApi};
use crate::error::{ApiError, QuizFlowError};

/// A quiz attempt bound to the course and topic it was opened from.
#[derive(Debug, Clone)]
pub struct QuizSession {
    course_id: CourseId,
    topic_id: TopicId,
    attempt: QuizAttempt,
}

impl QuizSession {
    #[must_use]
    pub fn course_id(&self) -> &CourseId {
        &self.course_id
    }

    #[must_use]
    pub fn topic_id(&self) -> &TopicId {
        &self.topic_id
    }

    #[must_use]
    pub fn attempt(&self) -> &QuizAttempt {
        &self.attempt
    }

    /// Lock in an option; the caller sends the returned ticket exactly once.
    ///
    /// # Errors
    ///
    /// Returns `QuizFlowError::Quiz` when the attempt refuses the submission.
    pub fn begin_submit(
        &mut self,
        selected_option: usize,
        now: DateTime<Utc>,
    ) -> Result<SubmitTicket, QuizFlowError> {
        Ok(self.attempt.begin_submit(selected_option, now)?)
    }

    /// Apply the result of sending `ticket`.
    ///
    /// A domain rejection from the server blocks the whole attempt unless
    /// the timer already moved it to results. Any other failure reopens the question for a manual resubmit and is
    /// returned to the caller.
    ///
    /// # Errors
    ///
    /// Returns `QuizFlowError::Api` for transport/status/decode failures and
    /// `QuizFlowError::Quiz` if the verdict does not fit the question.
    pub fn finish_submit(
        &mut self,
        ticket: &SubmitTicket,
        result: Result<AnswerFeedback, ApiError>,
    ) -> Result<SubmitOutcome, QuizFlowError> {
        match result {
            Ok(feedback) => {
                let outcome = self.attempt.complete_submit(ticket, feedback)?;
                if outcome == SubmitOutcome::Blocked {
                    tracing::warn!(
                        quiz_id = %ticket.quiz_id,
                        question_id = %ticket.question_id,
                        "server reports question already answered"
                    );
                }
                Ok(outcome)
            }
            Err(ApiError::Domain { message }) => {
                tracing::warn!(
                    quiz_id = %ticket.quiz_id,
                    question_id = %ticket.question_id,
                    reason = %message,
                    "answer rejected, blocking attempt"
                );
                Ok(self.attempt.block())
            }
            Err(err) => {
                self.attempt.fail_submit(ticket)?;
                Err(err.into())
            }
        }
    }

    /// # Errors
    ///
    /// See [`QuizAttempt::start`].
    pub fn start(&mut self, now: DateTime<Utc>) -> Result<QuizPhase, QuizFlowError> {
        Ok(self.attempt.start(now)?)
    }

    /// # Errors
    ///
    /// See [`QuizAttempt::resume`].
    pub fn resume(&mut self, now: DateTime<Utc>) -> Result<QuizPhase, QuizFlowError> {
        Ok(self.attempt.resume(now)?)
    }

    /// # Errors
    ///
    /// See [`QuizAttempt::restart`].
    pub fn restart(&mut self, now: DateTime<Utc>) -> Result<QuizPhase, QuizFlowError> {
        Ok(self.attempt.restart(now)?)
    }

    /// # Errors
    ///
    /// See [`QuizAttempt::advance`].
    pub fn advance(&mut self, now: DateTime<Utc>) -> Result<QuizPhase, QuizFlowError> {
        Ok(self.attempt.advance(now)?)
    }

    pub fn tick(&mut self, now: DateTime<Utc>) -> TickOutcome {
        let outcome = self.attempt.tick(now);
        if outcome == TickOutcome::Expired {
            tracing::info!(quiz_id = %self.attempt.quiz().id(), "quiz time is up");
        }
        outcome
    }
}

/// Wires quiz attempts to the learning API.
#[derive(Clone)]
pub struct QuizFlowService {
    clock: Clock,
    api: Arc<dyn LearningApi>,
}

impl QuizFlowService {
    #[must_use]
    pub fn new(api: Arc<dyn LearningApi>) -> Self {
        Self {
            clock: Clock::system(),
            api,
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Open the quiz for a topic.
    ///
    /// Progress is fetched before the quiz so that completion status always
    /// comes from the server.
    ///
    /// # Errors
    ///
    /// Returns `QuizFlowError::NoQuiz` when the server has no quiz for the
    /// topic and `QuizFlowError::Api` if either fetch fails.
    pub async fn enter(
        &self,
        course_id: CourseId,
        topic_id: TopicId,
    ) -> Result<QuizSession, QuizFlowError> {
        let progress = self.api.get_user_progress().await?;
        let quiz = match self.api.get_quiz(&course_id, &topic_id).await {
            Ok(quiz) => quiz,
            Err(err) if err.is_not_found() => return Err(QuizFlowError::NoQuiz),
            Err(err) => return Err(err.into()),
        };
        let attempt = QuizAttempt::enter(quiz, &progress);
        tracing::info!(
            course_id = %course_id,
            quiz_id = %attempt.quiz().id(),
            entry = ?attempt.entry(),
            "quiz opened"
        );
        Ok(QuizSession {
            course_id,
            topic_id,
            attempt,
        })
    }

    /// Send one ticket. Never retried.
    ///
    /// # Errors
    ///
    /// Returns the `ApiError` from the call.
    pub async fn send_answer(
        &self,
        course_id: &CourseId,
        topic_id: &TopicId,
        ticket: &SubmitTicket,
    ) -> Result<AnswerFeedback, ApiError> {
        let submission = AnswerSubmission {
            question_id: ticket.question_id.clone(),
            selected_option: ticket.selected_option,
            quiz_id: ticket.quiz_id.clone(),
        };
        self.api
            .submit_quiz_answer(course_id, topic_id, &submission)
            .await
    }

    /// Begin, send and apply one submission.
    ///
    /// # Errors
    ///
    /// Returns `QuizFlowError::Quiz` when the attempt refuses the submission
    /// (no request is made) and the errors of [`QuizSession::finish_submit`].
    pub async fn submit(
        &self,
        session: &mut QuizSession,
        selected_option: usize,
    ) -> Result<SubmitOutcome, QuizFlowError> {
        let ticket = session.begin_submit(selected_option, self.now())?;
        let result = self
            .send_answer(&session.course_id, &session.topic_id, &ticket)
            .await;
        session.finish_submit(&ticket, result)
    }

    /// # Errors
    ///
    /// See [`QuizAttempt::start`].
    pub fn start(&self, session: &mut QuizSession) -> Result<QuizPhase, QuizFlowError> {
        session.start(self.now())
    }

    /// # Errors
    ///
    /// See [`QuizAttempt::resume`].
    pub fn resume(&self, session: &mut QuizSession) -> Result<QuizPhase, QuizFlowError> {
        session.resume(self.now())
    }

    /// # Errors
    ///
    /// See [`QuizAttempt::restart`].
    pub fn restart(&self, session: &mut QuizSession) -> Result<QuizPhase, QuizFlowError> {
        session.restart(self.now())
    }

    /// # Errors
    ///
    /// See [`QuizAttempt::advance`].
    pub fn advance(&self, session: &mut QuizSession) -> Result<QuizPhase, QuizFlowError> {
        session.advance(self.now())
    }

    pub fn tick(&self, session: &mut QuizSession) -> TickOutcome {
        session.tick(self.now())
    }
}
