use crate::model::ProjectDraft;
use crate::transitions::{Action, TransitionError};
use chrono::NaiveDate;

fn required(field: &'static str, value: &str) -> Result<(), TransitionError> {
    if value.trim().is_empty() {
        Err(TransitionError::MissingField(field))
    } else {
        Ok(())
    }
}

pub fn check_submission(draft: &ProjectDraft) -> Result<(), TransitionError> {
    required("title", &draft.title)?;
    required("client", &draft.client)?;
    required("description", &draft.description)
}

pub fn check_budget(budget: &str) -> Result<(), TransitionError> {
    required("budget", budget)?;
    let amount = budget
        .trim()
        .trim_start_matches('$')
        .replace(',', "")
        .parse::<f64>()
        .map_err(|_| TransitionError::InvalidField {
            field: "budget",
            reason: format!("'{budget}' is not a number"),
        })?;
    if !amount.is_finite() || amount < 0.0 {
        return Err(TransitionError::InvalidField {
            field: "budget",
            reason: format!("'{budget}' must be a non-negative amount"),
        });
    }
    Ok(())
}

pub fn check_action(action: &Action) -> Result<(), TransitionError> {
    match action {
        Action::Register(registration) => {
            check_budget(&registration.budget)?;
            required("requirements", &registration.requirements)
        }
        Action::Approve { notes } | Action::Reject { notes } => required("review notes", notes),
        Action::Schedule { date, technicians } => {
            required("scheduled date", date)?;
            NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").map_err(|_| {
                TransitionError::InvalidField {
                    field: "scheduled date",
                    reason: format!("'{date}' is not a YYYY-MM-DD date"),
                }
            })?;
            if normalize_technicians(technicians.clone()).is_empty() {
                return Err(TransitionError::MissingField("assigned technicians"));
            }
            Ok(())
        }
        Action::UpdateProgress { progress, notes } => {
            if *progress <= 0 {
                return Err(TransitionError::InvalidField {
                    field: "progress",
                    reason: format!("{progress} is not above zero"),
                });
            }
            required("progress notes", notes)
        }
        Action::Validate { report } => required("report", report),
        Action::MarkAttendance | Action::Finalize(_) => Ok(()),
    }
}

/// Trim names, drop blanks and repeated names, keep the selection order.
pub fn normalize_technicians(technicians: Vec<String>) -> Vec<String> {
    let mut result: Vec<String> = Vec::with_capacity(technicians.len());
    for name in technicians {
        let name = name.trim();
        if !name.is_empty() && !result.iter().any(|n| n == name) {
            result.push(name.to_owned());
        }
    }
    result
}

pub fn clamp_progress(progress: i64) -> u8 {
    progress.clamp(0, 100) as u8
}
