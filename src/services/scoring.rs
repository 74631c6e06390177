use serde::{Deserialize, Serialize};

use crate::models::{ExerciseCategory, PlayerPosition, WorkoutEntry};

/// Four heuristic 0-100 scores summarizing one logged session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorkoutScores {
    pub intensity: f64,
    pub work_capacity: f64,
    pub athletic_quality: f64,
    pub position_relevance: f64,
}

impl WorkoutScores {
    pub const ZERO: WorkoutScores = WorkoutScores {
        intensity: 0.0,
        work_capacity: 0.0,
        athletic_quality: 0.0,
        position_relevance: 0.0,
    };

    pub fn overall(&self) -> f64 {
        (self.intensity + self.work_capacity + self.athletic_quality + self.position_relevance)
            / 4.0
    }
}

// Tonnage and timed-work scales: 100 points at 4 t lifted or 1 h of timed work.
const TONNAGE_KG_PER_POINT: f64 = 40.0;
const WORK_SECONDS_PER_POINT: f64 = 36.0;

// Diversity term: each extra distinct category in a session adds this much
// athletic-quality credit.
const DIVERSITY_BONUS_PER_CATEGORY: f64 = 5.0;

/// Effort assumed for an entry logged without RPE, on the 0-100 scale
fn default_effort(category: ExerciseCategory) -> f64 {
    match category {
        ExerciseCategory::Strength => 70.0,
        ExerciseCategory::Power => 75.0,
        ExerciseCategory::Speed => 65.0,
        ExerciseCategory::Conditioning => 60.0,
        ExerciseCategory::Core => 50.0,
        ExerciseCategory::Mobility => 30.0,
        ExerciseCategory::Skill => 45.0,
    }
}

/// How much a category contributes to general athletic quality
fn quality_weight(category: ExerciseCategory) -> f64 {
    match category {
        ExerciseCategory::Power => 1.0,
        ExerciseCategory::Speed => 0.9,
        ExerciseCategory::Strength => 0.8,
        ExerciseCategory::Conditioning => 0.7,
        ExerciseCategory::Core => 0.6,
        ExerciseCategory::Skill => 0.5,
        ExerciseCategory::Mobility => 0.4,
    }
}

// Used when the player has no recorded position.
const NEUTRAL_RELEVANCE: f64 = 0.75;

/// Category x position relevance table
fn relevance_weight(category: ExerciseCategory, position: Option<PlayerPosition>) -> f64 {
    let Some(position) = position else {
        return NEUTRAL_RELEVANCE;
    };

    use ExerciseCategory::*;
    use PlayerPosition::*;

    match (position, category) {
        (Goalkeeper, Strength) => 0.7,
        (Goalkeeper, Power) => 0.8,
        (Goalkeeper, Speed) => 0.7,
        (Goalkeeper, Conditioning) => 0.5,
        (Goalkeeper, Core) => 0.8,
        (Goalkeeper, Mobility) => 0.9,
        (Goalkeeper, Skill) => 1.0,

        (Defender, Strength) => 0.9,
        (Defender, Power) => 0.8,
        (Defender, Speed) => 0.7,
        (Defender, Conditioning) => 0.8,
        (Defender, Core) => 0.8,
        (Defender, Mobility) => 0.6,
        (Defender, Skill) => 0.7,

        (Midfielder, Strength) => 0.6,
        (Midfielder, Power) => 0.7,
        (Midfielder, Speed) => 0.8,
        (Midfielder, Conditioning) => 1.0,
        (Midfielder, Core) => 0.7,
        (Midfielder, Mobility) => 0.7,
        (Midfielder, Skill) => 0.8,

        (Forward, Strength) => 0.7,
        (Forward, Power) => 0.9,
        (Forward, Speed) => 1.0,
        (Forward, Conditioning) => 0.8,
        (Forward, Core) => 0.6,
        (Forward, Mobility) => 0.6,
        (Forward, Skill) => 0.9,
    }
}

fn clamp_score(score: f64) -> f64 {
    score.clamp(0.0, 100.0)
}

/// Averaging weight of an entry: rep volume plus a share for timed work.
/// Floored at 1 so zero-volume entries still count.
fn entry_weight(entry: &WorkoutEntry) -> f64 {
    let timed = f64::from(entry.duration_seconds.unwrap_or(0)) / 10.0;
    (entry.rep_volume() + timed).max(1.0)
}

fn entry_effort(entry: &WorkoutEntry) -> f64 {
    match entry.rpe {
        Some(rpe) => clamp_score(rpe * 10.0),
        None => default_effort(entry.category),
    }
}

/// Score a workout's entries. Pure and deterministic: the same entry list and
/// position always produce the same scores, each in [0, 100]. An empty list
/// scores zero across the board.
pub fn score_workout(entries: &[WorkoutEntry], position: Option<PlayerPosition>) -> WorkoutScores {
    if entries.is_empty() {
        return WorkoutScores::ZERO;
    }

    let total_weight: f64 = entries.iter().map(entry_weight).sum();

    // Intensity: volume-weighted mean effort.
    let intensity = entries
        .iter()
        .map(|e| entry_effort(e) * entry_weight(e))
        .sum::<f64>()
        / total_weight;

    // Work capacity: linear in tonnage and timed work.
    let tonnage: f64 = entries.iter().map(WorkoutEntry::tonnage_kg).sum();
    let timed_seconds: f64 = entries
        .iter()
        .map(|e| f64::from(e.duration_seconds.unwrap_or(0)))
        .sum();
    let work_capacity =
        tonnage / TONNAGE_KG_PER_POINT + timed_seconds / WORK_SECONDS_PER_POINT;

    // Athletic quality: volume-share blend of category weights plus a
    // diversity term for mixing categories.
    let athletic_base = entries
        .iter()
        .map(|e| quality_weight(e.category) * 100.0 * entry_weight(e))
        .sum::<f64>()
        / total_weight;
    let distinct_categories = {
        let mut seen = std::collections::HashSet::new();
        entries.iter().filter(|e| seen.insert(e.category)).count()
    };
    let athletic_quality =
        athletic_base + DIVERSITY_BONUS_PER_CATEGORY * (distinct_categories as f64 - 1.0);

    // Position relevance: volume-share blend of the relevance table.
    let position_relevance = entries
        .iter()
        .map(|e| relevance_weight(e.category, position) * 100.0 * entry_weight(e))
        .sum::<f64>()
        / total_weight;

    WorkoutScores {
        intensity: clamp_score(intensity),
        work_capacity: clamp_score(work_capacity),
        athletic_quality: clamp_score(athletic_quality),
        position_relevance: clamp_score(position_relevance),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entry(
        category: ExerciseCategory,
        sets: u32,
        reps: u32,
        weight_kg: Option<f64>,
        rpe: Option<f64>,
        duration_seconds: Option<u32>,
    ) -> WorkoutEntry {
        WorkoutEntry {
            exercise_id: None,
            exercise_name: "test".to_string(),
            category,
            sets,
            reps,
            weight_kg,
            rpe,
            duration_seconds,
        }
    }

    #[test]
    fn test_empty_workout_scores_zero() {
        let scores = score_workout(&[], Some(PlayerPosition::Forward));
        assert_eq!(scores, WorkoutScores::ZERO);
        assert_eq!(scores.overall(), 0.0);
    }

    #[test]
    fn test_single_strength_entry() {
        let entries = vec![entry(
            ExerciseCategory::Strength,
            3,
            5,
            Some(100.0),
            Some(8.0),
            None,
        )];
        let scores = score_workout(&entries, None);

        // RPE 8 -> effort 80; 1500 kg tonnage -> 37.5 points; pure strength
        // blend -> 80 quality; no position -> neutral 75 relevance.
        assert_eq!(scores.intensity, 80.0);
        assert_eq!(scores.work_capacity, 37.5);
        assert_eq!(scores.athletic_quality, 80.0);
        assert_eq!(scores.position_relevance, 75.0);
    }

    #[test]
    fn test_rpe_defaults_by_category() {
        let entries = vec![entry(
            ExerciseCategory::Conditioning,
            1,
            1,
            None,
            None,
            Some(600),
        )];
        let scores = score_workout(&entries, None);

        assert_eq!(scores.intensity, 60.0);
        assert!((scores.work_capacity - 600.0 / 36.0).abs() < 1e-9);
    }

    #[test]
    fn test_deterministic() {
        let entries = vec![
            entry(ExerciseCategory::Power, 5, 3, Some(60.0), Some(9.0), None),
            entry(ExerciseCategory::Speed, 6, 1, None, Some(7.0), None),
            entry(ExerciseCategory::Core, 3, 20, None, None, None),
        ];

        let first = score_workout(&entries, Some(PlayerPosition::Forward));
        let second = score_workout(&entries, Some(PlayerPosition::Forward));
        assert_eq!(first, second);
    }

    #[test]
    fn test_position_changes_relevance_only() {
        let entries = vec![entry(
            ExerciseCategory::Speed,
            6,
            2,
            None,
            Some(8.0),
            None,
        )];

        let forward = score_workout(&entries, Some(PlayerPosition::Forward));
        let keeper = score_workout(&entries, Some(PlayerPosition::Goalkeeper));

        assert_eq!(forward.intensity, keeper.intensity);
        assert_eq!(forward.work_capacity, keeper.work_capacity);
        assert_eq!(forward.athletic_quality, keeper.athletic_quality);
        // Speed work is maximally relevant for a forward, less so in goal.
        assert_eq!(forward.position_relevance, 100.0);
        assert_eq!(keeper.position_relevance, 70.0);
    }

    #[test]
    fn test_diversity_raises_quality() {
        let single = vec![entry(
            ExerciseCategory::Strength,
            3,
            10,
            Some(50.0),
            None,
            None,
        )];
        let mixed = vec![
            entry(ExerciseCategory::Strength, 3, 10, Some(50.0), None, None),
            entry(ExerciseCategory::Strength, 3, 10, Some(50.0), None, None),
        ];
        let two_categories = vec![
            entry(ExerciseCategory::Strength, 3, 10, Some(50.0), None, None),
            entry(ExerciseCategory::Strength, 3, 10, Some(50.0), None, None),
            entry(ExerciseCategory::Strength, 3, 10, Some(50.0), None, None),
        ];

        let base = score_workout(&single, None).athletic_quality;
        assert_eq!(score_workout(&mixed, None).athletic_quality, base);

        let mut diverse = two_categories;
        diverse.push(entry(ExerciseCategory::Speed, 4, 2, None, None, None));
        // Adding speed work shifts the blend up (0.9 > 0.8) and adds the bonus.
        assert!(score_workout(&diverse, None).athletic_quality > base);
    }

    #[test]
    fn test_huge_session_clamps_at_100() {
        let entries = vec![entry(
            ExerciseCategory::Strength,
            10,
            10,
            Some(200.0),
            Some(10.0),
            Some(7200),
        )];
        let scores = score_workout(&entries, Some(PlayerPosition::Defender));

        assert_eq!(scores.work_capacity, 100.0);
        assert!(scores.intensity <= 100.0);
        assert!(scores.overall() <= 100.0);
    }
}
