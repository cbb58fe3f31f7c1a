use chrono::{DateTime, Duration, Utc};
use std::collections::HashSet;

use crate::model::{AnswerFeedback, Question, QuestionId, Quiz, QuizId, QuizStanding, UserProgress};
use crate::time::seconds_until;

use super::QuizError;
use super::score::QuizScore;

//
// ─── STATES ────────────────────────────────────────────────────────────────────
//

/// Where the attempt currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    NotStarted,
    InProgress { index: usize },
    Submitting { index: usize },
    Feedback { index: usize },
    Results,
    BlockedAlreadyCompleted,
}

impl QuizPhase {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, QuizPhase::Results | QuizPhase::BlockedAlreadyCompleted)
    }

    /// The countdown only runs while a question is on screen.
    #[must_use]
    pub fn timer_running(self) -> bool {
        matches!(
            self,
            QuizPhase::InProgress { .. } | QuizPhase::Submitting { .. } | QuizPhase::Feedback { .. }
        )
    }

    #[must_use]
    pub fn index(self) -> Option<usize> {
        match self {
            QuizPhase::InProgress { index }
            | QuizPhase::Submitting { index }
            | QuizPhase::Feedback { index } => Some(index),
            _ => None,
        }
    }
}

/// What the entry screen should offer, decided from fresh server progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizEntry {
    Fresh,
    ResumeOffer { answered: usize, total: usize },
    Blocked,
}

/// Per-question state within one attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotState {
    Open,
    /// Answered in an earlier session; locked, verdict unknown to the client.
    PreAnswered,
    Answered(AnswerFeedback),
}

impl SlotState {
    #[must_use]
    pub fn is_locked(&self) -> bool {
        !matches!(self, SlotState::Open)
    }
}

/// Exactly the payload for one submit call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitTicket {
    pub quiz_id: QuizId,
    pub question_id: QuestionId,
    pub index: usize,
    pub selected_option: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Verdict recorded, feedback on screen.
    Recorded,
    /// Verdict recorded after the timer already ended the attempt.
    RecordedAfterTimeout,
    /// Server says the question was already answered; attempt is blocked.
    Blocked,
    /// Rejection that arrived after the timer ended the attempt; nothing
    /// recorded and the attempt stays in `Results`.
    DiscardedAfterTimeout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Running { remaining_secs: u32 },
    Expired,
    Idle,
}

//
// ─── ATTEMPT ───────────────────────────────────────────────────────────────────
//

/// One user's pass through a quiz.
///
/// Pure state: no I/O. Every call that depends on time takes `now` so the
/// countdown is checked at the edges of each transition.
#[derive(Debug, Clone)]
pub struct QuizAttempt {
    quiz: Quiz,
    entry: QuizEntry,
    phase: QuizPhase,
    slots: Vec<SlotState>,
    resume_index: usize,
    in_flight: Option<usize>,
    deadline: Option<DateTime<Utc>>,
    correct: usize,
    xp: u32,
    timed_out: bool,
}

impl QuizAttempt {
    /// Build an attempt from the quiz and a freshly fetched progress snapshot.
    #[must_use]
    pub fn enter(quiz: Quiz, progress: &UserProgress) -> Self {
        let total = quiz.len();
        let mut slots = vec![SlotState::Open; total];

        let (entry, phase, resume_index) = match progress.standing(quiz.id()) {
            QuizStanding::Completed => (QuizEntry::Blocked, QuizPhase::BlockedAlreadyCompleted, 0),
            QuizStanding::Fresh => (QuizEntry::Fresh, QuizPhase::NotStarted, 0),
            QuizStanding::Partial { answered } => {
                let answered_ids: HashSet<&QuestionId> =
                    progress.answered_for(quiz.id()).iter().collect();
                for (slot, question) in slots.iter_mut().zip(quiz.questions()) {
                    if answered_ids.contains(&question.id) {
                        *slot = SlotState::PreAnswered;
                    }
                }
                let answered = answered.min(total);
                (
                    QuizEntry::ResumeOffer { answered, total },
                    QuizPhase::NotStarted,
                    answered,
                )
            }
        };

        Self {
            quiz,
            entry,
            phase,
            slots,
            resume_index,
            in_flight: None,
            deadline: None,
            correct: 0,
            xp: 0,
            timed_out: false,
        }
    }

    #[must_use]
    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    #[must_use]
    pub fn entry(&self) -> QuizEntry {
        self.entry
    }

    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    #[must_use]
    pub fn slots(&self) -> &[SlotState] {
        &self.slots
    }

    #[must_use]
    pub fn slot(&self, index: usize) -> Option<&SlotState> {
        self.slots.get(index)
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.phase.index().and_then(|index| self.quiz.question(index))
    }

    #[must_use]
    pub fn current_feedback(&self) -> Option<&AnswerFeedback> {
        match self.phase {
            QuizPhase::Feedback { index } => match self.slots.get(index) {
                Some(SlotState::Answered(feedback)) => Some(feedback),
                _ => None,
            },
            _ => None,
        }
    }

    /// Answers recorded this attempt plus locked placeholders.
    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_locked()).count()
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Whether the current question still accepts a submission.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        match self.phase {
            QuizPhase::InProgress { index } => {
                self.in_flight.is_none()
                    && matches!(self.slots.get(index), Some(SlotState::Open))
            }
            _ => false,
        }
    }

    #[must_use]
    pub fn deadline(&self) -> Option<DateTime<Utc>> {
        self.deadline
    }

    #[must_use]
    pub fn remaining_secs(&self, now: DateTime<Utc>) -> Option<u32> {
        if !self.phase.timer_running() {
            return None;
        }
        self.deadline.map(|deadline| seconds_until(deadline, now))
    }

    #[must_use]
    pub fn score(&self) -> QuizScore {
        QuizScore::new(
            self.correct,
            self.quiz.len(),
            self.xp,
            self.quiz.passing_score(),
            self.timed_out,
        )
    }

    //
    // ─── TRANSITIONS ───────────────────────────────────────────────────────────
    //

    /// Begin a fresh attempt at question 0.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Blocked` for completed quizzes and
    /// `QuizError::ResumeRequired` when server progress exists.
    pub fn start(&mut self, now: DateTime<Utc>) -> Result<QuizPhase, QuizError> {
        match self.entry {
            QuizEntry::Blocked => Err(QuizError::Blocked),
            QuizEntry::ResumeOffer { .. } => Err(QuizError::ResumeRequired),
            QuizEntry::Fresh => self.begin_at(0, now),
        }
    }

    /// Accept the resume offer: continue at the first question after the
    /// already-answered ones.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NoResumeOffer` when the entry was not a resume offer.
    pub fn resume(&mut self, now: DateTime<Utc>) -> Result<QuizPhase, QuizError> {
        match self.entry {
            QuizEntry::ResumeOffer { .. } => self.begin_at(self.resume_index, now),
            QuizEntry::Blocked => Err(QuizError::Blocked),
            QuizEntry::Fresh => Err(QuizError::NoResumeOffer),
        }
    }

    /// Decline the resume offer and walk the quiz from the top.
    ///
    /// Questions answered in earlier sessions stay locked and are skipped,
    /// both here and by `advance`.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NoResumeOffer` when the entry was not a resume offer.
    pub fn restart(&mut self, now: DateTime<Utc>) -> Result<QuizPhase, QuizError> {
        match self.entry {
            QuizEntry::ResumeOffer { .. } => self.begin_at(0, now),
            QuizEntry::Blocked => Err(QuizError::Blocked),
            QuizEntry::Fresh => Err(QuizError::NoResumeOffer),
        }
    }

    fn begin_at(&mut self, index: usize, now: DateTime<Utc>) -> Result<QuizPhase, QuizError> {
        if self.phase != QuizPhase::NotStarted {
            return Err(QuizError::AlreadyStarted);
        }
        self.deadline = Some(now + Duration::seconds(i64::from(self.quiz.time_limit_secs())));
        self.phase = match self.first_open_from(index) {
            Some(index) => QuizPhase::InProgress { index },
            None => QuizPhase::Results,
        };
        Ok(self.phase)
    }

    /// First open slot at or after `index`, else the first open slot at all.
    fn first_open_from(&self, index: usize) -> Option<usize> {
        let open = |i: &usize| !self.slots[*i].is_locked();
        (index..self.slots.len())
            .find(open)
            .or_else(|| (0..index.min(self.slots.len())).find(open))
    }

    /// Lock in the selected option and produce the one request to send.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::TimeUp` if the countdown already ran out (the
    /// attempt moves to `Results`), `QuizError::SubmissionPending` while a
    /// request is outstanding, `QuizError::QuestionLocked` for answered
    /// questions, `QuizError::InvalidOption` for an out-of-range option, and
    /// `QuizError::NotAnswerable` in any other phase.
    pub fn begin_submit(
        &mut self,
        selected_option: usize,
        now: DateTime<Utc>,
    ) -> Result<SubmitTicket, QuizError> {
        if self.tick(now) == TickOutcome::Expired {
            return Err(QuizError::TimeUp);
        }
        if self.in_flight.is_some() {
            return Err(QuizError::SubmissionPending);
        }
        let QuizPhase::InProgress { index } = self.phase else {
            return Err(match self.phase {
                QuizPhase::BlockedAlreadyCompleted => QuizError::Blocked,
                phase => QuizError::NotAnswerable(phase),
            });
        };
        if self.slots[index].is_locked() {
            return Err(QuizError::QuestionLocked { index });
        }
        let question = &self.quiz.questions()[index];
        if selected_option >= question.options.len() {
            return Err(QuizError::InvalidOption {
                option: selected_option,
                available: question.options.len(),
            });
        }

        let ticket = SubmitTicket {
            quiz_id: self.quiz.id().clone(),
            question_id: question.id.clone(),
            index,
            selected_option,
        };
        self.in_flight = Some(index);
        self.phase = QuizPhase::Submitting { index };
        Ok(ticket)
    }

    /// Apply the server verdict for the outstanding ticket.
    ///
    /// A verdict that arrives after the timer ended the attempt still counts
    /// toward the tally; the phase stays `Results`.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NoPendingSubmission` if `ticket` is not the
    /// outstanding request and `QuizError::FeedbackOutOfRange` if the server
    /// names a correct option the question does not have (the question
    /// stays open).
    pub fn complete_submit(
        &mut self,
        ticket: &SubmitTicket,
        feedback: AnswerFeedback,
    ) -> Result<SubmitOutcome, QuizError> {
        if self.in_flight != Some(ticket.index) {
            return Err(QuizError::NoPendingSubmission);
        }
        self.in_flight = None;

        if feedback.already_answered {
            return Ok(self.block());
        }

        let available = self.quiz.questions()[ticket.index].options.len();
        if feedback.correct_option >= available {
            self.reopen(ticket.index);
            return Err(QuizError::FeedbackOutOfRange {
                option: feedback.correct_option,
                available,
            });
        }

        if feedback.is_correct {
            self.correct += 1;
        }
        self.xp = self.xp.saturating_add(feedback.xp_awarded);
        self.slots[ticket.index] = SlotState::Answered(feedback);

        match self.phase {
            QuizPhase::Submitting { index } if index == ticket.index => {
                self.phase = QuizPhase::Feedback { index };
                Ok(SubmitOutcome::Recorded)
            }
            _ => Ok(SubmitOutcome::RecordedAfterTimeout),
        }
    }

    /// The request failed; the question was not recorded and may be
    /// submitted again by the user.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NoPendingSubmission` if `ticket` is not outstanding.
    pub fn fail_submit(&mut self, ticket: &SubmitTicket) -> Result<QuizPhase, QuizError> {
        if self.in_flight != Some(ticket.index) {
            return Err(QuizError::NoPendingSubmission);
        }
        self.in_flight = None;
        self.reopen(ticket.index);
        Ok(self.phase)
    }

    fn reopen(&mut self, index: usize) {
        if self.phase == (QuizPhase::Submitting { index }) {
            self.phase = QuizPhase::InProgress { index };
        }
    }

    /// Move past the current question to the next open one, or to `Results`.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::AwaitingAnswer` while the current question is
    /// still open and `QuizError::NotAnswerable` outside an active question.
    pub fn advance(&mut self, now: DateTime<Utc>) -> Result<QuizPhase, QuizError> {
        if self.tick(now) == TickOutcome::Expired {
            return Ok(self.phase);
        }
        let index = match self.phase {
            QuizPhase::Feedback { index } => index,
            QuizPhase::InProgress { index } if self.slots[index].is_locked() => index,
            QuizPhase::InProgress { .. } => return Err(QuizError::AwaitingAnswer),
            phase => return Err(QuizError::NotAnswerable(phase)),
        };

        self.phase = match self.next_open_after(index) {
            Some(next) => QuizPhase::InProgress { index: next },
            None => QuizPhase::Results,
        };
        Ok(self.phase)
    }

    fn next_open_after(&self, index: usize) -> Option<usize> {
        (index + 1..self.slots.len()).find(|&i| !self.slots[i].is_locked())
    }

    /// Check the countdown. Expiry jumps straight to `Results` without
    /// touching the current question.
    pub fn tick(&mut self, now: DateTime<Utc>) -> TickOutcome {
        if !self.phase.timer_running() {
            return TickOutcome::Idle;
        }
        let Some(deadline) = self.deadline else {
            return TickOutcome::Idle;
        };
        if now >= deadline {
            self.phase = QuizPhase::Results;
            self.timed_out = true;
            return TickOutcome::Expired;
        }
        TickOutcome::Running {
            remaining_secs: seconds_until(deadline, now),
        }
    }

    /// Server reported the quiz as completed elsewhere.
    ///
    /// An attempt already in `Results` keeps its results.
    pub fn block(&mut self) -> SubmitOutcome {
        self.in_flight = None;
        if self.phase == QuizPhase::Results {
            return SubmitOutcome::DiscardedAfterTimeout;
        }
        self.phase = QuizPhase::BlockedAlreadyCompleted;
        SubmitOutcome::Blocked
    }
}
