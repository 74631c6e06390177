// Property tests for the scoring engine: scores stay in [0, 100] and are
// deterministic for arbitrary entry lists.

use proptest::prelude::*;

use teamtrack::models::{ExerciseCategory, PlayerPosition, WorkoutEntry};
use teamtrack::services::score_workout;

fn category_strategy() -> impl Strategy<Value = ExerciseCategory> {
    prop::sample::select(ExerciseCategory::ALL.to_vec())
}

fn position_strategy() -> impl Strategy<Value = Option<PlayerPosition>> {
    prop::option::of(prop::sample::select(vec![
        PlayerPosition::Goalkeeper,
        PlayerPosition::Defender,
        PlayerPosition::Midfielder,
        PlayerPosition::Forward,
    ]))
}

fn entry_strategy() -> impl Strategy<Value = WorkoutEntry> {
    (
        category_strategy(),
        1u32..=20,
        0u32..=50,
        prop::option::of(0.0f64..=1000.0),
        prop::option::of(0.0f64..=10.0),
        prop::option::of(0u32..=14_400),
    )
        .prop_map(
            |(category, sets, reps, weight_kg, rpe, duration_seconds)| WorkoutEntry {
                exercise_id: None,
                exercise_name: "prop".to_string(),
                category,
                sets,
                reps,
                weight_kg,
                rpe,
                duration_seconds,
            },
        )
}

proptest! {
    #[test]
    fn scores_stay_in_bounds(
        entries in prop::collection::vec(entry_strategy(), 0..12),
        position in position_strategy(),
    ) {
        let scores = score_workout(&entries, position);

        for score in [
            scores.intensity,
            scores.work_capacity,
            scores.athletic_quality,
            scores.position_relevance,
            scores.overall(),
        ] {
            prop_assert!(score.is_finite());
            prop_assert!((0.0..=100.0).contains(&score), "score out of range: {score}");
        }
    }

    #[test]
    fn scoring_is_deterministic(
        entries in prop::collection::vec(entry_strategy(), 0..12),
        position in position_strategy(),
    ) {
        let first = score_workout(&entries, position);
        let second = score_workout(&entries, position);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn empty_sessions_score_zero(position in position_strategy()) {
        let scores = score_workout(&[], position);
        prop_assert_eq!(scores.overall(), 0.0);
    }

    #[test]
    fn entry_order_does_not_matter(
        entries in prop::collection::vec(entry_strategy(), 2..8),
        position in position_strategy(),
    ) {
        let mut reversed = entries.clone();
        reversed.reverse();

        let forward = score_workout(&entries, position);
        let backward = score_workout(&reversed, position);

        prop_assert!((forward.intensity - backward.intensity).abs() < 1e-6);
        prop_assert!((forward.work_capacity - backward.work_capacity).abs() < 1e-6);
        prop_assert!((forward.athletic_quality - backward.athletic_quality).abs() < 1e-6);
        prop_assert!((forward.position_relevance - backward.position_relevance).abs() < 1e-6);
    }
}
