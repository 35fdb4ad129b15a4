use crate::errors::AppError;
use crate::models::{StatLog, StatsUpdate};
use serde_json::Number;

const NOT_LOGGED: &str = "not logged";
const NO_METRIC: &str = "—";

pub fn apply_update(update: StatsUpdate) -> Result<StatLog, AppError> {
    Ok(StatLog {
        steps: non_negative("steps", update.steps)?,
        water_oz: non_negative("water_oz", update.water_oz)?,
        calories: non_negative("calories", update.calories)?,
        active_minutes: non_negative("active_minutes", update.active_minutes)?,
        workout: non_blank(update.workout),
        notes: non_blank(update.notes),
    })
}

/// Stats block placed ahead of the user's message in the final user turn.
pub fn format_for_prompt(log: &StatLog) -> String {
    let mut out = String::from("Today's logged stats:\n");
    for (label, value) in prompt_lines(log) {
        out.push_str("- ");
        out.push_str(label);
        out.push_str(": ");
        out.push_str(value.as_deref().unwrap_or(NOT_LOGGED));
        out.push('\n');
    }
    out
}

pub fn metric(value: Option<u32>) -> String {
    value.map_or_else(|| NO_METRIC.to_string(), |v| v.to_string())
}

fn prompt_lines(log: &StatLog) -> [(&'static str, Option<String>); 6] {
    [
        ("Steps", log.steps.map(|v| v.to_string())),
        ("Water (oz)", log.water_oz.map(|v| v.to_string())),
        ("Calories (optional)", log.calories.map(|v| v.to_string())),
        ("Active minutes", log.active_minutes.map(|v| v.to_string())),
        ("Workout", log.workout.clone()),
        ("Notes", log.notes.clone()),
    ]
}

fn non_negative(field: &str, value: Option<Number>) -> Result<Option<u32>, AppError> {
    let Some(number) = value else {
        return Ok(None);
    };
    number
        .as_u64()
        .and_then(|v| u32::try_from(v).ok())
        .map(Some)
        .ok_or_else(|| {
            AppError::bad_request(format!(
                "{field} must be a whole number between 0 and {}",
                u32::MAX
            ))
        })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}
