use anyhow::{anyhow, bail, Context, Result};
use chrono::{NaiveDate, Utc};
use clap::Args;
use colored::Colorize;

use crate::models::{Workout, WorkoutEntry, WorkoutFilter};
use crate::storage::{EntityKind, MutationOp, Storage};

const CATEGORIES: [&str; 7] = [
    "strength",
    "power",
    "speed",
    "conditioning",
    "core",
    "mobility",
    "skill",
];

/// Parse one entry spec of the form
/// `NAME:CATEGORY:SETSxREPS[@WEIGHT][#RPE]`, e.g. `Back Squat:strength:3x5@100#8`
pub fn parse_entry(spec: &str) -> Result<WorkoutEntry> {
    let parts: Vec<&str> = spec.split(':').collect();
    if parts.len() != 3 {
        bail!("Entry must look like NAME:CATEGORY:SETSxREPS[@WEIGHT][#RPE], got '{spec}'");
    }

    let exercise_name = parts[0].trim();
    if exercise_name.is_empty() {
        bail!("Entry name cannot be empty");
    }

    let category = parts[1].trim().to_lowercase();
    if !CATEGORIES.contains(&category.as_str()) {
        bail!(
            "Unknown category '{category}', expected one of: {}",
            CATEGORIES.join(", ")
        );
    }

    // Split off RPE, then weight, then sets x reps.
    let (volume_part, rpe) = match parts[2].split_once('#') {
        Some((volume, rpe_raw)) => {
            let rpe: f64 = rpe_raw
                .trim()
                .parse()
                .with_context(|| format!("Invalid RPE '{rpe_raw}'"))?;
            if !(0.0..=10.0).contains(&rpe) {
                bail!("RPE must be between 0 and 10");
            }
            (volume, Some(rpe))
        }
        None => (parts[2], None),
    };

    let (sets_reps, weight_kg) = match volume_part.split_once('@') {
        Some((sets_reps, weight_raw)) => {
            let weight: f64 = weight_raw
                .trim()
                .parse()
                .with_context(|| format!("Invalid weight '{weight_raw}'"))?;
            (sets_reps, Some(weight))
        }
        None => (volume_part, None),
    };

    let (sets_raw, reps_raw) = sets_reps
        .split_once(['x', 'X'])
        .ok_or_else(|| anyhow!("Volume must look like SETSxREPS, got '{sets_reps}'"))?;
    let sets: u32 = sets_raw
        .trim()
        .parse()
        .with_context(|| format!("Invalid sets '{sets_raw}'"))?;
    let reps: u32 = reps_raw
        .trim()
        .parse()
        .with_context(|| format!("Invalid reps '{reps_raw}'"))?;
    if sets == 0 {
        bail!("Sets must be at least 1");
    }

    Ok(WorkoutEntry {
        exercise_name: exercise_name.to_string(),
        category,
        sets,
        reps,
        weight_kg,
        rpe,
        duration_seconds: None,
    })
}

#[derive(Args)]
pub struct WorkoutLogCommand {
    /// Session date (YYYY-MM-DD, default today)
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Entry spec, repeatable: NAME:CATEGORY:SETSxREPS[@WEIGHT][#RPE]
    #[arg(short, long = "entry", required = true)]
    entries: Vec<String>,

    /// Free-form session notes
    #[arg(long)]
    notes: Option<String>,
}

impl WorkoutLogCommand {
    /// Log a workout locally and queue it for sync. Works fully offline.
    pub async fn execute(self) -> Result<()> {
        let entries = self
            .entries
            .iter()
            .map(|spec| parse_entry(spec))
            .collect::<Result<Vec<_>>>()?;

        let date = self.date.unwrap_or_else(|| Utc::now().date_naive());
        let workout = Workout::new(date, self.notes, entries);

        let storage = Storage::init()?;
        storage.save_workout(&workout)?;

        let payload = serde_json::json!({
            "date": workout.date,
            "notes": workout.notes,
            "entries": workout.entries,
        });
        storage.enqueue(EntityKind::Workout, MutationOp::Create, &workout.id, payload)?;

        println!(
            "{} Logged workout for {} ({} exercises), queued for sync.",
            "✓".green(),
            workout.date,
            workout.entries.len()
        );

        Ok(())
    }
}

pub async fn list_workouts(
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    limit: usize,
) -> Result<()> {
    let storage = Storage::init()?;

    let filter = WorkoutFilter {
        from_date: from,
        to_date: to,
        synced: None,
    };

    let workouts: Vec<_> = storage
        .list_workouts()?
        .into_iter()
        .filter(|w| filter.matches(w))
        .take(limit)
        .collect();

    if workouts.is_empty() {
        println!("No workouts logged yet.");
        return Ok(());
    }

    for workout in workouts {
        let sync_marker = if workout.synced {
            "synced".green()
        } else {
            "pending".yellow()
        };
        println!(
            "{}  {}  {} exercises  [{}]",
            workout.date,
            &workout.id[..8],
            workout.entries.len(),
            sync_marker
        );
    }

    Ok(())
}

pub async fn show_workout(id: &str) -> Result<()> {
    let storage = Storage::init()?;

    let workout = find_workout(&storage, id)?;

    println!("{} ({})", workout.date.to_string().bold(), workout.id);
    if let Some(notes) = &workout.notes {
        println!("Notes: {notes}");
    }
    println!();

    for entry in &workout.entries {
        let mut line = format!(
            "  {} [{}] {}x{}",
            entry.exercise_name, entry.category, entry.sets, entry.reps
        );
        if let Some(weight) = entry.weight_kg {
            line.push_str(&format!(" @ {weight}kg"));
        }
        if let Some(rpe) = entry.rpe {
            line.push_str(&format!(" RPE {rpe}"));
        }
        println!("{line}");
    }

    println!();
    println!(
        "Sync: {}",
        if workout.synced { "synced" } else { "pending" }
    );

    Ok(())
}

pub async fn delete_workout(id: &str, force: bool) -> Result<()> {
    let storage = Storage::init()?;
    let workout = find_workout(&storage, id)?;

    if !force {
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(format!("Delete workout from {}?", workout.date))
            .default(false)
            .interact()?;
        if !confirmed {
            println!("Aborted.");
            return Ok(());
        }
    }

    if workout.synced {
        // Known to the server: queue a remote delete.
        storage.enqueue(
            EntityKind::Workout,
            MutationOp::Delete,
            &workout.id,
            serde_json::json!({ "id": workout.id }),
        )?;
    } else {
        // Never left this machine: cancel the pending create instead.
        storage.remove_outbox_entries_for(&workout.id)?;
    }

    storage.delete_workout(&workout.id)?;

    println!("{} Workout deleted.", "✓".green());
    Ok(())
}

/// Accept a full id or a unique prefix
fn find_workout(storage: &Storage, id: &str) -> Result<crate::models::Workout> {
    if let Some(workout) = storage.get_workout(id)? {
        return Ok(workout);
    }

    let matches: Vec<_> = storage
        .list_workouts()?
        .into_iter()
        .filter(|w| w.id.starts_with(id))
        .collect();

    match matches.len() {
        0 => bail!("No workout matches '{id}'"),
        1 => Ok(matches.into_iter().next().unwrap()),
        n => bail!("'{id}' is ambiguous ({n} matches), use more characters"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_full_entry() {
        let entry = parse_entry("Back Squat:strength:3x5@100#8").unwrap();
        assert_eq!(entry.exercise_name, "Back Squat");
        assert_eq!(entry.category, "strength");
        assert_eq!(entry.sets, 3);
        assert_eq!(entry.reps, 5);
        assert_eq!(entry.weight_kg, Some(100.0));
        assert_eq!(entry.rpe, Some(8.0));
    }

    #[test]
    fn test_parse_minimal_entry() {
        let entry = parse_entry("Sprints:speed:6x1").unwrap();
        assert_eq!(entry.exercise_name, "Sprints");
        assert_eq!(entry.weight_kg, None);
        assert_eq!(entry.rpe, None);
    }

    #[test]
    fn test_parse_weight_without_rpe() {
        let entry = parse_entry("Deadlift:strength:5x3@140").unwrap();
        assert_eq!(entry.weight_kg, Some(140.0));
        assert_eq!(entry.rpe, None);
    }

    #[test]
    fn test_parse_rejects_malformed_specs() {
        assert!(parse_entry("nocolons").is_err());
        assert!(parse_entry("Squat:notacategory:3x5").is_err());
        assert!(parse_entry("Squat:strength:3by5").is_err());
        assert!(parse_entry("Squat:strength:0x5").is_err());
        assert!(parse_entry("Squat:strength:3x5#11").is_err());
        assert!(parse_entry(":strength:3x5").is_err());
    }
}
