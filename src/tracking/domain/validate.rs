//! Column-limit checks shared by the tracking constructors.

use super::TrackingDomainError;

/// Longest title accepted for tasks and subtasks.
pub const TITLE_MAX_CHARS: usize = 200;

/// Longest stored tool input or response summary.
pub const SUMMARY_MAX_CHARS: usize = 2000;

const ELLIPSIS: &str = "...";

pub(super) fn title(entity: &'static str, raw: &str) -> Result<String, TrackingDomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TrackingDomainError::EmptyTitle { entity });
    }
    bounded("title", trimmed, TITLE_MAX_CHARS)?;
    Ok(trimmed.to_owned())
}

pub(super) fn bounded(
    field: &'static str,
    value: &str,
    max: usize,
) -> Result<(), TrackingDomainError> {
    let actual = value.chars().count();
    if actual > max {
        return Err(TrackingDomainError::ValueTooLong { field, max, actual });
    }
    Ok(())
}

pub(super) fn bounded_opt(
    field: &'static str,
    value: Option<&str>,
    max: usize,
) -> Result<(), TrackingDomainError> {
    value.map_or(Ok(()), |text| bounded(field, text, max))
}

pub(super) fn cost(field: &'static str, value: f32) -> Result<(), TrackingDomainError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(TrackingDomainError::InvalidCost { field, value })
    }
}

pub(super) fn cost_opt(field: &'static str, value: Option<f32>) -> Result<(), TrackingDomainError> {
    value.map_or(Ok(()), |amount| cost(field, amount))
}

pub(super) fn count_opt(field: &'static str, value: Option<i32>) -> Result<(), TrackingDomainError> {
    match value {
        Some(count) if count < 0 => Err(TrackingDomainError::NegativeCount {
            field,
            value: i64::from(count),
        }),
        _ => Ok(()),
    }
}

pub(super) fn issue_number(value: Option<i32>) -> Result<(), TrackingDomainError> {
    match value {
        Some(number) if number < 1 => {
            Err(TrackingDomainError::InvalidIssueNumber(i64::from(number)))
        }
        _ => Ok(()),
    }
}

/// Shortens `text` to at most [`SUMMARY_MAX_CHARS`] characters.
///
/// Over-long input keeps its first 1997 characters followed by `...`.
#[must_use]
pub fn truncate_summary(text: &str) -> String {
    if text.chars().count() <= SUMMARY_MAX_CHARS {
        return text.to_owned();
    }
    let keep = SUMMARY_MAX_CHARS.saturating_sub(ELLIPSIS.len());
    let mut truncated: String = text.chars().take(keep).collect();
    truncated.push_str(ELLIPSIS);
    truncated
}
