//! crates/trivia_core/src/domain.rs
//!
//! Defines the pure, core data structures for the notifier.
//! These structs are independent of any HTTP payload or notification backend.

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

/// Action identifier reported when the user taps the notification body
/// instead of picking an answer.
pub const DEFAULT_ACTION_IDENTIFIER: &str = "default";

/// Action identifier reported when the user closes the notification.
pub const DISMISS_ACTION_IDENTIFIER: &str = "dismiss";

//=========================================================================================
// Questions
//=========================================================================================

/// Opaque identity of one fetched question.
///
/// Carried from fetch time through the notification category to the user's
/// response, so two questions with identical text never collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QuestionId(Uuid);

impl QuestionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses a category identifier back into an id.
    pub fn parse(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw).ok().map(Self)
    }
}

impl Default for QuestionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single multiple-choice trivia question.
#[derive(Debug, Clone, PartialEq)]
pub struct TriviaQuestion {
    pub id: QuestionId,
    pub category: String,
    pub kind: String,
    pub difficulty: String,
    pub question: String,
    pub correct_answer: String,
    pub incorrect_answers: Vec<String>,
    pub fetched_at: DateTime<Utc>,
}

impl TriviaQuestion {
    /// Incorrect answers followed by the correct one.
    pub fn all_answers(&self) -> Vec<String> {
        let mut answers = self.incorrect_answers.clone();
        answers.push(self.correct_answer.clone());
        answers
    }

    /// All answers in a fresh random order. Called once per presentation.
    pub fn shuffled_answers<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<String> {
        let mut answers = self.all_answers();
        answers.shuffle(rng);
        answers
    }

    /// Exact, case-sensitive answer check.
    pub fn is_correct(&self, answer: &str) -> bool {
        self.correct_answer == answer
    }

    /// The question as it should be presented, answers in display order.
    pub fn prompt<R: Rng + ?Sized>(&self, rng: &mut R) -> QuestionPrompt {
        QuestionPrompt {
            id: self.id,
            question: self.question.clone(),
            answers: self.shuffled_answers(rng),
        }
    }
}

/// The question as handed to a notification gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionPrompt {
    pub id: QuestionId,
    pub question: String,
    pub answers: Vec<String>,
}

/// Outcome of a user's answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerResult {
    pub is_correct: bool,
    pub user_answer: String,
    pub correct_answer: String,
    pub question: String,
}

/// The action a user took on an interactive notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserResponse {
    /// Category identifier of the notification (a [`QuestionId`] for trivia).
    pub category: String,
    /// Identifier of the chosen action (the answer text for trivia).
    pub action: String,
}

impl UserResponse {
    pub fn new(category: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            action: action.into(),
        }
    }

    /// Body taps and dismissals carry no answer.
    pub fn is_sentinel(&self) -> bool {
        Self::is_sentinel_action(&self.action)
    }

    pub fn is_sentinel_action(action: &str) -> bool {
        action == DEFAULT_ACTION_IDENTIFIER || action == DISMISS_ACTION_IDENTIFIER
    }
}

//=========================================================================================
// Poll interval
//=========================================================================================

/// The polling period, in minutes. Always positive, finite and no longer than
/// [`PollInterval::MAX_MINUTES`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PollInterval(f64);

impl PollInterval {
    pub const DEFAULT_MINUTES: f64 = 30.0;

    /// One year. Keeps `Instant::now() + period` well inside the timer's range.
    pub const MAX_MINUTES: f64 = 365.0 * 24.0 * 60.0;

    /// Offered by settings surfaces; any positive value is accepted.
    pub const RECOMMENDED_MINUTES: [f64; 5] = [5.0, 10.0, 15.0, 30.0, 60.0];

    /// Returns `None` for values that cannot drive a timer: non-positive,
    /// non-finite, above the cap, or so small they round to a zero period.
    pub fn from_minutes(minutes: f64) -> Option<Self> {
        if !minutes.is_finite() || minutes <= 0.0 || minutes > Self::MAX_MINUTES {
            return None;
        }
        match Duration::try_from_secs_f64(minutes * 60.0) {
            Ok(period) if !period.is_zero() => Some(Self(minutes)),
            _ => None,
        }
    }

    pub fn minutes(&self) -> f64 {
        self.0
    }

    pub fn as_duration(&self) -> Duration {
        Duration::from_secs_f64(self.0 * 60.0)
    }
}

impl Default for PollInterval {
    fn default() -> Self {
        Self(Self::DEFAULT_MINUTES)
    }
}

//=========================================================================================
// Notification content
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sound {
    Default,
    /// A quieter cue, used for incorrect answers.
    Subtle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeAction {
    pub identifier: String,
    pub title: String,
}

/// Platform-neutral notification content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub body: String,
    pub sound: Sound,
    pub category: Option<String>,
    pub actions: Vec<NoticeAction>,
}

impl Notice {
    /// Interactive question notification: one action per answer, the answer
    /// text doubling as the action identifier.
    pub fn for_question(prompt: &QuestionPrompt) -> Self {
        let actions = prompt
            .answers
            .iter()
            .map(|answer| NoticeAction {
                identifier: answer.clone(),
                title: answer.clone(),
            })
            .collect();

        Self {
            title: "Your scheduled trivia question:".to_string(),
            body: format!("❓ {}\nChoose your answer:", prompt.question),
            sound: Sound::Default,
            category: Some(prompt.id.to_string()),
            actions,
        }
    }

    pub fn for_result(result: &AnswerResult) -> Self {
        let (title, body, sound) = if result.is_correct {
            (
                "✅ Correct!",
                format!("You got it right!\nYour answer: {}", result.user_answer),
                Sound::Default,
            )
        } else {
            (
                "❌ Incorrect",
                format!(
                    "Your answer: {}\nCorrect answer: {}",
                    result.user_answer, result.correct_answer
                ),
                Sound::Subtle,
            )
        };

        Self {
            title: title.to_string(),
            body,
            sound,
            category: None,
            actions: Vec::new(),
        }
    }
}

/// How a notification is shown while the app is frontmost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresentationOptions {
    pub banner: bool,
    pub sound: bool,
    pub badge: bool,
}

impl PresentationOptions {
    pub const ALL: Self = Self {
        banner: true,
        sound: true,
        badge: true,
    };
}

#[cfg(test)]
pub(crate) fn sample_question(text: &str, correct: &str, incorrect: &[&str]) -> TriviaQuestion {
    TriviaQuestion {
        id: QuestionId::new(),
        category: "General Knowledge".to_string(),
        kind: "multiple".to_string(),
        difficulty: "easy".to_string(),
        question: text.to_string(),
        correct_answer: correct.to_string(),
        incorrect_answers: incorrect.iter().map(|s| s.to_string()).collect(),
        fetched_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_answers_appends_correct_last() {
        let q = sample_question("Q1", "A", &["B", "C", "D"]);
        assert_eq!(q.all_answers(), vec!["B", "C", "D", "A"]);
    }

    #[test]
    fn prompt_keeps_every_answer() {
        let q = sample_question("Q1", "A", &["B", "C", "D"]);
        let prompt = q.prompt(&mut rand::thread_rng());

        let mut answers = prompt.answers.clone();
        answers.sort();
        assert_eq!(answers, vec!["A", "B", "C", "D"]);
        assert_eq!(prompt.id, q.id);
    }

    #[test]
    fn answer_check_is_exact() {
        let q = sample_question("Q1", "Paris", &["Rome", "Oslo", "Bern"]);
        assert!(q.is_correct("Paris"));
        assert!(!q.is_correct("paris"));
        assert!(!q.is_correct("Paris "));
    }

    #[test]
    fn interval_rejects_non_positive_values() {
        assert!(PollInterval::from_minutes(0.0).is_none());
        assert!(PollInterval::from_minutes(-5.0).is_none());
        assert!(PollInterval::from_minutes(f64::NAN).is_none());
        assert!(PollInterval::from_minutes(f64::INFINITY).is_none());
        assert_eq!(
            PollInterval::from_minutes(0.5).map(|i| i.as_duration()),
            Some(Duration::from_secs(30))
        );
        assert_eq!(PollInterval::default().minutes(), 30.0);
    }

    #[test]
    fn interval_rejects_periods_a_timer_cannot_hold() {
        assert!(PollInterval::from_minutes(1e18).is_none());
        assert!(PollInterval::from_minutes(f64::MAX).is_none());
        assert!(PollInterval::from_minutes(PollInterval::MAX_MINUTES + 1.0).is_none());
        assert!(PollInterval::from_minutes(1e-300).is_none());

        let longest = PollInterval::from_minutes(PollInterval::MAX_MINUTES).unwrap();
        assert_eq!(longest.as_duration(), Duration::from_secs(365 * 24 * 60 * 60));
    }

    #[test]
    fn question_notice_has_one_action_per_answer() {
        let q = sample_question("Q1", "A", &["B", "C", "D"]);
        let prompt = q.prompt(&mut rand::thread_rng());
        let notice = Notice::for_question(&prompt);

        assert_eq!(notice.category, Some(q.id.to_string()));
        assert_eq!(notice.actions.len(), 4);
        for (action, answer) in notice.actions.iter().zip(&prompt.answers) {
            assert_eq!(&action.identifier, answer);
            assert_eq!(&action.title, answer);
        }
        assert!(notice.body.contains("Q1"));
    }

    #[test]
    fn result_notice_differs_by_outcome() {
        let wrong = Notice::for_result(&AnswerResult {
            is_correct: false,
            user_answer: "B".to_string(),
            correct_answer: "A".to_string(),
            question: "Q1".to_string(),
        });
        assert_eq!(wrong.title, "❌ Incorrect");
        assert_eq!(wrong.body, "Your answer: B\nCorrect answer: A");
        assert_eq!(wrong.sound, Sound::Subtle);
        assert!(wrong.actions.is_empty());

        let right = Notice::for_result(&AnswerResult {
            is_correct: true,
            user_answer: "A".to_string(),
            correct_answer: "A".to_string(),
            question: "Q1".to_string(),
        });
        assert_eq!(right.title, "✅ Correct!");
        assert_eq!(right.sound, Sound::Default);
    }

    #[test]
    fn question_id_round_trips_through_category() {
        let id = QuestionId::new();
        assert_eq!(QuestionId::parse(&id.to_string()), Some(id));
        assert_eq!(QuestionId::parse("Q1"), None);
    }

    #[test]
    fn sentinel_actions_are_recognised() {
        assert!(UserResponse::new("x", DEFAULT_ACTION_IDENTIFIER).is_sentinel());
        assert!(UserResponse::new("x", DISMISS_ACTION_IDENTIFIER).is_sentinel());
        assert!(!UserResponse::new("x", "B").is_sentinel());
        assert!(!UserResponse::is_sentinel_action("Default"));
    }
}
