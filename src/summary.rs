//! Final-score summary and achievement tiers.

use crate::models::AnswerRecord;
use crate::store::{self, KeyValueStore, HIGH_SCORE_KEY};

/// One achievement band. The table below is ordered from best to worst;
/// the first band whose threshold the percentage reaches wins.
#[derive(Debug, PartialEq)]
pub struct Achievement {
    pub min_percent: f64,
    pub icon: &'static str,
    pub title: &'static str,
    message: &'static str,
}

const ACHIEVEMENTS: [Achievement; 5] = [
    Achievement {
        min_percent: 100.0,
        icon: "👑",
        title: "Perfect Score!",
        message: "Flawless, {name}! You're a genius!",
    },
    Achievement {
        min_percent: 80.0,
        icon: "🌟",
        title: "Outstanding!",
        message: "Brilliant work, {name}!",
    },
    Achievement {
        min_percent: 60.0,
        icon: "🎯",
        title: "Great Job!",
        message: "Well done, {name}!",
    },
    Achievement {
        min_percent: 40.0,
        icon: "💪",
        title: "Good Effort!",
        message: "Nice try, {name}!",
    },
    Achievement {
        min_percent: 0.0,
        icon: "🌱",
        title: "Keep Learning!",
        message: "Practice makes perfect, {name}!",
    },
];

/// Look up the achievement band for a percentage in [0, 100].
pub fn achievement_for(percentage: f64) -> &'static Achievement {
    ACHIEVEMENTS
        .iter()
        .find(|a| percentage >= a.min_percent)
        .unwrap_or(&ACHIEVEMENTS[ACHIEVEMENTS.len() - 1])
}

/// Everything the result screen needs about a completed session.
#[derive(Debug)]
pub struct Summary {
    pub score: usize,
    pub total: usize,
    pub percentage: f64,
    pub correct_count: usize,
    pub incorrect_count: usize,
    pub skipped_count: usize,
    pub is_new_record: bool,
    pub achievement: &'static Achievement,
    pub greeting: String,
}

impl Summary {
    /// Build the summary for a completed session and perform the
    /// best-effort high-score update (strictly-greater wins).
    pub fn build(
        player_name: &str,
        score: usize,
        answers: &[AnswerRecord],
        store: &mut dyn KeyValueStore,
    ) -> Self {
        let total = answers.len();
        let percentage = if total > 0 {
            (score as f64 / total as f64) * 100.0
        } else {
            0.0
        };

        let correct_count = answers.iter().filter(|a| a.was_correct).count();
        let skipped_count = answers
            .iter()
            .filter(|a| !a.was_correct && a.was_skipped_or_timed_out)
            .count();
        let incorrect_count = total - correct_count - skipped_count;

        let is_new_record = score > store::high_score(store);
        if is_new_record {
            store.set(HIGH_SCORE_KEY, &score.to_string());
        }

        let achievement = achievement_for(percentage);
        let greeting = if is_new_record {
            format!("🎉 New Record, {}!", player_name)
        } else {
            achievement.message.replace("{name}", player_name)
        };

        Self {
            score,
            total,
            percentage,
            correct_count,
            incorrect_count,
            skipped_count,
            is_new_record,
            achievement,
            greeting,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn record(was_correct: bool, was_skipped_or_timed_out: bool) -> AnswerRecord {
        AnswerRecord {
            was_correct,
            was_skipped_or_timed_out,
        }
    }

    #[test]
    fn test_achievement_bands() {
        assert_eq!(achievement_for(100.0).title, "Perfect Score!");
        assert_eq!(achievement_for(90.0).title, "Outstanding!");
        assert_eq!(achievement_for(80.0).title, "Outstanding!");
        assert_eq!(achievement_for(70.0).title, "Great Job!");
        assert_eq!(achievement_for(60.0).title, "Great Job!");
        assert_eq!(achievement_for(50.0).title, "Good Effort!");
        assert_eq!(achievement_for(40.0).title, "Good Effort!");
        assert_eq!(achievement_for(30.0).title, "Keep Learning!");
        assert_eq!(achievement_for(0.0).title, "Keep Learning!");
    }

    #[test]
    fn test_partition_counts() {
        let answers = vec![
            record(true, false),
            record(true, false),
            record(false, false),
            record(false, true),
            record(false, true),
        ];
        let mut store = MemoryStore::new();

        let summary = Summary::build("Ada", 2, &answers, &mut store);
        assert_eq!(summary.correct_count, 2);
        assert_eq!(summary.incorrect_count, 1);
        assert_eq!(summary.skipped_count, 2);
        assert_eq!(summary.percentage, 40.0);
        assert_eq!(summary.achievement.title, "Good Effort!");
    }

    #[test]
    fn test_new_record_persists_score() {
        let mut store = MemoryStore::new();
        store.set(HIGH_SCORE_KEY, "7");

        let answers: Vec<_> = (0..10).map(|i| record(i < 9, false)).collect();
        let summary = Summary::build("Ada", 9, &answers, &mut store);

        assert!(summary.is_new_record);
        assert_eq!(store.get(HIGH_SCORE_KEY).as_deref(), Some("9"));
        assert_eq!(summary.greeting, "🎉 New Record, Ada!");
    }

    #[test]
    fn test_lower_score_leaves_record_untouched() {
        let mut store = MemoryStore::new();
        store.set(HIGH_SCORE_KEY, "9");

        let answers: Vec<_> = (0..10).map(|i| record(i < 5, false)).collect();
        let summary = Summary::build("Ada", 5, &answers, &mut store);

        assert!(!summary.is_new_record);
        assert_eq!(store.get(HIGH_SCORE_KEY).as_deref(), Some("9"));
        assert_eq!(summary.greeting, "Nice try, Ada!");
    }

    #[test]
    fn test_equal_score_is_not_a_record() {
        let mut store = MemoryStore::new();
        store.set(HIGH_SCORE_KEY, "6");

        let answers: Vec<_> = (0..10).map(|i| record(i < 6, false)).collect();
        let summary = Summary::build("Ada", 6, &answers, &mut store);

        assert!(!summary.is_new_record);
        assert_eq!(store.get(HIGH_SCORE_KEY).as_deref(), Some("6"));
    }

    #[test]
    fn test_greeting_substitutes_name() {
        let mut store = MemoryStore::new();
        store.set(HIGH_SCORE_KEY, "10");

        let answers: Vec<_> = (0..10).map(|_| record(true, false)).collect();
        let summary = Summary::build("Grace", 10, &answers, &mut store);

        assert_eq!(summary.achievement.title, "Perfect Score!");
        assert_eq!(summary.greeting, "Flawless, Grace! You're a genius!");
    }
}
