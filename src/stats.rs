use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::TrainerResult;
use crate::quiz::AnswerEvent;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpotStats {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub correct: u64,
}

/// Lifetime quiz statistics, persisted between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizStats {
    #[serde(default)]
    pub total_answers: u64,
    #[serde(default)]
    pub correct_answers: u64,
    #[serde(default)]
    pub best_streak: u32,
    #[serde(default)]
    pub by_spot: BTreeMap<String, SpotStats>,
}

impl QuizStats {
    pub fn record(&mut self, event: &AnswerEvent) {
        let hit = u64::from(event.is_correct);
        self.total_answers += 1;
        self.correct_answers += hit;
        self.best_streak = self.best_streak.max(event.streak);
        let spot = self.by_spot.entry(event.spot_key.clone()).or_default();
        spot.total += 1;
        spot.correct += hit;
    }

    pub fn accuracy(&self) -> f64 {
        if self.total_answers == 0 {
            return 0.0;
        }
        self.correct_answers as f64 / self.total_answers as f64
    }

    pub fn reset(&mut self) {
        *self = QuizStats::default();
    }

    /// Missing or unreadable files yield empty statistics.
    pub fn load(path: &Path) -> QuizStats {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(_) => return QuizStats::default(),
        };
        match serde_json::from_str(&json) {
            Ok(stats) => stats,
            Err(e) => {
                log::warn!("ignoring corrupt stats file {}: {}", path.display(), e);
                QuizStats::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> TrainerResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionLabel;

    fn event(spot: &str, is_correct: bool, streak: u32) -> AnswerEvent {
        AnswerEvent {
            spot_key: spot.to_string(),
            is_correct,
            selected: ActionLabel::Fold,
            expected: ActionLabel::Fold,
            streak,
        }
    }

    #[test]
    fn record_folds_events_per_spot() {
        let mut stats = QuizStats::default();
        stats.record(&event("HU_BB_VS_OPEN", true, 1));
        stats.record(&event("HU_BB_VS_OPEN", true, 2));
        stats.record(&event("3W_OPEN_BTN", false, 0));
        assert_eq!(stats.total_answers, 3);
        assert_eq!(stats.correct_answers, 2);
        assert_eq!(stats.best_streak, 2);
        assert_eq!(stats.by_spot["HU_BB_VS_OPEN"], SpotStats { total: 2, correct: 2 });
        assert_eq!(stats.by_spot["3W_OPEN_BTN"], SpotStats { total: 1, correct: 0 });
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let mut stats = QuizStats::default();
        stats.record(&event("HU_BB_VS_LIMP", true, 1));
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["totalAnswers"], 1);
        assert_eq!(json["bestStreak"], 1);
        assert_eq!(json["bySpot"]["HU_BB_VS_LIMP"]["correct"], 1);
    }

    #[test]
    fn partial_document_fills_defaults() {
        let stats: QuizStats = serde_json::from_str(r#"{"totalAnswers": 4}"#).unwrap();
        assert_eq!(stats.total_answers, 4);
        assert!(stats.by_spot.is_empty());
    }

    #[test]
    fn missing_file_loads_empty() {
        let stats = QuizStats::load(Path::new("/nonexistent/spingo/stats.json"));
        assert_eq!(stats, QuizStats::default());
    }
}
