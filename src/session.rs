//! The quiz session state machine.
//!
//! A session moves `Idle → Loading → InProgress → Completed` and owns the
//! question set, the cursor, the score, the per-question countdown value and
//! the append-only answer log. Exactly one resolution event (answer, skip or
//! timeout) is accepted per question: the first one locks the question, and
//! every later event is a no-op. A click racing a timer tick is therefore
//! harmless: whichever reaches the session first wins, and the other is
//! rejected.
//!
//! The session never touches the terminal, the network or the clock; those
//! collaborators live in [`crate::app`], [`crate::source`] and feed events in
//! through the transition methods below.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::{AnswerOption, AnswerRecord, Question};
use crate::store::KeyValueStore;
use crate::summary::Summary;

/// Seconds granted per question.
pub const QUESTION_SECONDS: u64 = 15;

/// Number of questions requested per session.
pub const QUESTION_COUNT: usize = 10;

/// Lifecycle phase of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// No quiz running; the welcome screen is up.
    Idle,
    /// Waiting on the question source.
    Loading,
    /// Working through the questions.
    InProgress,
    /// All questions resolved and advanced past.
    Completed,
}

/// How the current question was resolved.
enum Resolution {
    Answered(usize),
    Skipped,
    TimedOut,
}

pub struct QuizSession {
    phase: Phase,
    player_name: String,
    questions: Vec<Question>,
    current_index: usize,
    score: usize,
    answers: Vec<AnswerRecord>,
    /// Shuffled options for the question currently shown. Built once per
    /// display and stable until the next `present_question`.
    options: Vec<AnswerOption>,
    /// Option the player picked, for the reveal. None for skip/timeout.
    current_choice: Option<usize>,
    locked: bool,
    seconds_remaining: u64,
}

impl QuizSession {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            player_name: String::new(),
            questions: Vec::new(),
            current_index: 0,
            score: 0,
            answers: Vec::new(),
            options: Vec::new(),
            current_choice: None,
            locked: false,
            seconds_remaining: QUESTION_SECONDS,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    pub fn answers(&self) -> &[AnswerRecord] {
        &self.answers
    }

    pub fn options(&self) -> &[AnswerOption] {
        &self.options
    }

    pub fn current_choice(&self) -> Option<usize> {
        self.current_choice
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn seconds_remaining(&self) -> u64 {
        self.seconds_remaining
    }

    /// The question currently shown, if any.
    pub fn current_question(&self) -> Option<&Question> {
        if self.phase == Phase::InProgress {
            self.questions.get(self.current_index)
        } else {
            None
        }
    }

    /// Fraction of the quiz completed, before the current question resolves.
    pub fn progress(&self) -> f64 {
        if self.questions.is_empty() {
            0.0
        } else {
            self.current_index as f64 / self.questions.len() as f64
        }
    }

    /// `Idle → Loading`. Records the player name for the session.
    pub fn begin_loading(&mut self, player_name: &str) -> bool {
        if self.phase != Phase::Idle {
            return false;
        }
        self.player_name = player_name.to_string();
        self.phase = Phase::Loading;
        true
    }

    /// `Loading → Idle` after a failed or empty fetch. The caller keeps the
    /// error; the session only returns to where a retry is possible.
    pub fn load_failed(&mut self) {
        if self.phase == Phase::Loading {
            self.phase = Phase::Idle;
        }
    }

    /// `Loading → InProgress` with a non-empty question set.
    pub fn begin(&mut self, questions: Vec<Question>) -> bool {
        if self.phase != Phase::Loading || questions.is_empty() {
            return false;
        }
        self.questions = questions;
        self.current_index = 0;
        self.score = 0;
        self.answers.clear();
        self.options.clear();
        self.phase = Phase::InProgress;
        true
    }

    /// Prepare the question at the cursor for display: shuffle its options
    /// (Fisher–Yates via the injected RNG), unlock, and reset the countdown.
    pub fn present_question<R: Rng>(&mut self, rng: &mut R) -> bool {
        let Some(question) = self.current_question() else {
            return false;
        };

        let correct = question.correct_answer.clone();
        let mut options: Vec<AnswerOption> = question
            .incorrect_answers
            .iter()
            .cloned()
            .chain(std::iter::once(correct.clone()))
            .map(|text| AnswerOption {
                is_correct: text == correct,
                text,
            })
            .collect();
        options.shuffle(rng);

        self.options = options;
        self.current_choice = None;
        self.locked = false;
        self.seconds_remaining = QUESTION_SECONDS;
        true
    }

    /// Resolve the current question with the option at `index`. Returns
    /// whether it was correct, or `None` if the question is already locked,
    /// the index is out of range, or no question is active.
    pub fn submit_answer(&mut self, index: usize) -> Option<bool> {
        if index >= self.options.len() {
            return None;
        }
        self.resolve(Resolution::Answered(index))
    }

    /// Resolve the current question as explicitly skipped.
    pub fn skip(&mut self) -> bool {
        self.resolve(Resolution::Skipped).is_some()
    }

    /// Resolve the current question as timed out. Invoked by the countdown
    /// when the clock reaches zero with the question still unlocked.
    pub fn timer_expired(&mut self) -> bool {
        self.resolve(Resolution::TimedOut).is_some()
    }

    /// One countdown second has elapsed. Returns the new remaining value,
    /// or `None` when no countdown is running (locked, exhausted, or no
    /// active question) so a stale ticker knows to stop.
    pub fn tick(&mut self) -> Option<u64> {
        if self.phase != Phase::InProgress || self.locked || self.seconds_remaining == 0 {
            return None;
        }
        self.seconds_remaining -= 1;
        Some(self.seconds_remaining)
    }

    fn resolve(&mut self, resolution: Resolution) -> Option<bool> {
        if self.phase != Phase::InProgress || self.locked {
            return None;
        }

        self.locked = true;
        let (was_correct, was_skipped_or_timed_out) = match resolution {
            Resolution::Answered(index) => {
                self.current_choice = Some(index);
                (self.options[index].is_correct, false)
            }
            Resolution::Skipped | Resolution::TimedOut => (false, true),
        };

        self.answers.push(AnswerRecord {
            was_correct,
            was_skipped_or_timed_out,
        });
        if was_correct {
            self.score += 1;
        }

        Some(was_correct)
    }

    /// Move past a resolved question. `InProgress → Completed` once the
    /// cursor passes the last question; otherwise the caller presents the
    /// next one.
    pub fn advance(&mut self) -> bool {
        if self.phase != Phase::InProgress || !self.locked {
            return false;
        }

        self.current_index += 1;
        self.locked = false;
        if self.current_index == self.questions.len() {
            self.phase = Phase::Completed;
        }
        true
    }

    /// Derive the summary for a completed session, updating the persisted
    /// high score when beaten. `None` unless `Completed`.
    pub fn finalize(&self, store: &mut dyn KeyValueStore) -> Option<Summary> {
        if self.phase != Phase::Completed {
            return None;
        }
        Some(Summary::build(
            &self.player_name,
            self.score,
            &self.answers,
            store,
        ))
    }

    /// Tear the session down to `Idle`, keeping only the player name.
    /// Any outstanding countdown must be cancelled by the owner.
    pub fn reset(&mut self) {
        self.phase = Phase::Idle;
        self.questions.clear();
        self.current_index = 0;
        self.score = 0;
        self.answers.clear();
        self.options.clear();
        self.current_choice = None;
        self.locked = false;
        self.seconds_remaining = QUESTION_SECONDS;
    }
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new()
    }
}
