use course_core::model::{CourseId, TopicId};
use course_core::quiz::{
    QuizEntry, QuizPhase, QuizScore, SlotState, SubmitOutcome, SubmitTicket, TickOutcome,
};
use services::{ApiError, QuizFlowError, QuizFlowService, QuizSession};

use crate::views::ViewError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuizIntent {
    Start,
    Resume,
    Restart,
    Select(usize),
    Submit,
    Next,
}

/// Request payload for an answer that has been locked in but not sent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingAnswer {
    pub course_id: CourseId,
    pub topic_id: TopicId,
    pub ticket: SubmitTicket,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OptionStyle {
    Idle,
    Selected,
    Correct,
    Wrong,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionVm {
    pub index: usize,
    pub label: String,
    pub style: OptionStyle,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedbackVm {
    pub headline: &'static str,
    pub explanation: String,
    pub xp_label: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionVm {
    pub progress_label: String,
    pub text: String,
    pub options: Vec<OptionVm>,
    pub submitting: bool,
    pub can_submit: bool,
    pub feedback: Option<FeedbackVm>,
    pub next_label: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultsVm {
    pub headline: &'static str,
    pub score_label: String,
    pub percentage_label: String,
    pub verdict_label: &'static str,
    pub passed: bool,
    pub xp_label: String,
    pub timed_out: bool,
}

/// Everything the quiz screen needs for one render.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuizScreenVm {
    Intro {
        title: String,
        summary: String,
        resume_prompt: Option<String>,
    },
    Question(QuestionVm),
    Results(ResultsVm),
    Blocked,
}

#[must_use]
pub fn format_countdown(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

#[must_use]
pub fn resume_prompt(answered: usize, total: usize) -> String {
    format!("You have answered {answered} of {total} questions. Continue where you left off?")
}

#[must_use]
pub fn map_results(score: &QuizScore) -> ResultsVm {
    ResultsVm {
        headline: if score.timed_out {
            "Time's up!"
        } else if score.passed {
            "Quiz passed"
        } else {
            "Quiz not passed"
        },
        score_label: format!("{} of {} correct", score.correct, score.total),
        percentage_label: format!("{}%", score.percentage),
        verdict_label: if score.passed { "Passed" } else { "Failed" },
        passed: score.passed,
        xp_label: format!("+{} XP", score.xp),
        timed_out: score.timed_out,
    }
}

pub struct QuizVm {
    session: QuizSession,
    selected: Option<usize>,
    remaining_secs: Option<u32>,
    error: Option<ViewError>,
}

impl QuizVm {
    #[must_use]
    pub fn new(session: QuizSession) -> Self {
        Self {
            session,
            selected: None,
            remaining_secs: None,
            error: None,
        }
    }

    #[must_use]
    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    #[must_use]
    pub fn error(&self) -> Option<&ViewError> {
        self.error.as_ref()
    }

    /// Countdown text while the timer runs.
    #[must_use]
    pub fn countdown_label(&self) -> Option<String> {
        self.remaining_secs.map(format_countdown)
    }

    #[must_use]
    pub fn timer_running(&self) -> bool {
        self.session.attempt().phase().timer_running()
    }

    #[must_use]
    pub fn screen(&self) -> QuizScreenVm {
        let attempt = self.session.attempt();
        let quiz = attempt.quiz();
        match attempt.phase() {
            QuizPhase::BlockedAlreadyCompleted => QuizScreenVm::Blocked,
            QuizPhase::Results => QuizScreenVm::Results(map_results(&attempt.score())),
            QuizPhase::NotStarted => QuizScreenVm::Intro {
                title: quiz.title().to_owned(),
                summary: format!(
                    "{} questions · {} to complete · pass at {}%",
                    quiz.len(),
                    format_countdown(quiz.time_limit_secs()),
                    quiz.passing_score()
                ),
                resume_prompt: match attempt.entry() {
                    QuizEntry::ResumeOffer { answered, total } => {
                        Some(resume_prompt(answered, total))
                    }
                    QuizEntry::Fresh | QuizEntry::Blocked => None,
                },
            },
            QuizPhase::InProgress { index }
            | QuizPhase::Submitting { index }
            | QuizPhase::Feedback { index } => QuizScreenVm::Question(self.question(index)),
        }
    }

    fn question(&self, index: usize) -> QuestionVm {
        let attempt = self.session.attempt();
        let quiz = attempt.quiz();
        let feedback = attempt.current_feedback();
        let options = attempt
            .current_question()
            .map(|question| {
                question
                    .options
                    .iter()
                    .enumerate()
                    .map(|(option, label)| {
                        let style = match feedback {
                            Some(fb) if option == fb.correct_option => OptionStyle::Correct,
                            Some(_) if self.selected == Some(option) => OptionStyle::Wrong,
                            Some(_) => OptionStyle::Idle,
                            None if self.selected == Some(option) => OptionStyle::Selected,
                            None => OptionStyle::Idle,
                        };
                        OptionVm {
                            index: option,
                            label: label.clone(),
                            style,
                        }
                    })
                    .collect()
            })
            .unwrap_or_default();

        let is_last = (index + 1..quiz.len())
            .all(|later| attempt.slot(later).is_some_and(SlotState::is_locked));
        QuestionVm {
            progress_label: format!("Question {} of {}", index + 1, quiz.len()),
            text: attempt
                .current_question()
                .map(|q| q.text.clone())
                .unwrap_or_default(),
            options,
            submitting: attempt.is_submitting(),
            can_submit: attempt.can_submit() && self.selected.is_some(),
            feedback: feedback.map(|fb| FeedbackVm {
                headline: if fb.is_correct { "Correct!" } else { "Not quite." },
                explanation: fb.explanation.clone(),
                xp_label: (fb.xp_awarded > 0).then(|| format!("+{} XP", fb.xp_awarded)),
            }),
            next_label: if is_last { "See results" } else { "Next question" },
        }
    }

    fn settle<T>(&mut self, result: Result<T, QuizFlowError>) -> Option<T> {
        match result {
            Ok(value) => {
                self.error = None;
                Some(value)
            }
            Err(err) => {
                self.error = Some(err.into());
                None
            }
        }
    }

    fn refresh_timer(&mut self, flow: &QuizFlowService) {
        self.remaining_secs = self.session.attempt().remaining_secs(flow.now());
    }

    /// Apply a synchronous intent. `Submit` only locks the answer in; the
    /// caller sends the returned payload and reports back through
    /// [`QuizVm::finish_submit`].
    pub fn apply(&mut self, flow: &QuizFlowService, intent: &QuizIntent) -> Option<PendingAnswer> {
        match intent {
            QuizIntent::Start => {
                let result = flow.start(&mut self.session);
                self.settle(result);
            }
            QuizIntent::Resume => {
                let result = flow.resume(&mut self.session);
                self.settle(result);
            }
            QuizIntent::Restart => {
                let result = flow.restart(&mut self.session);
                self.settle(result);
            }
            QuizIntent::Select(option) => {
                if self.session.attempt().can_submit() {
                    self.selected = Some(*option);
                }
            }
            QuizIntent::Next => {
                let result = flow.advance(&mut self.session);
                if self.settle(result).is_some() {
                    self.selected = None;
                }
            }
            QuizIntent::Submit => {
                let Some(option) = self.selected else {
                    self.error = Some(ViewError::Message("Pick an answer first.".into()));
                    return None;
                };
                let result = self.session.begin_submit(option, flow.now());
                let ticket = self.settle(result)?;
                self.refresh_timer(flow);
                return Some(PendingAnswer {
                    course_id: self.session.course_id().clone(),
                    topic_id: self.session.topic_id().clone(),
                    ticket,
                });
            }
        }
        self.refresh_timer(flow);
        None
    }

    pub fn finish_submit(
        &mut self,
        flow: &QuizFlowService,
        ticket: &SubmitTicket,
        result: Result<course_core::model::AnswerFeedback, ApiError>,
    ) -> Option<SubmitOutcome> {
        let outcome = self.session.finish_submit(ticket, result);
        let outcome = self.settle(outcome);
        self.refresh_timer(flow);
        outcome
    }

    pub fn tick(&mut self, flow: &QuizFlowService) -> TickOutcome {
        let outcome = flow.tick(&mut self.session);
        self.remaining_secs = match outcome {
            TickOutcome::Running { remaining_secs } => Some(remaining_secs),
            TickOutcome::Expired | TickOutcome::Idle => None,
        };
        outcome
    }
}

/// # Errors
///
/// Returns the flow error as a user-facing `ViewError`.
pub async fn enter_quiz(
    flow: &QuizFlowService,
    course_id: CourseId,
    topic_id: TopicId,
) -> Result<QuizVm, ViewError> {
    let session = flow.enter(course_id, topic_id).await?;
    Ok(QuizVm::new(session))
}
