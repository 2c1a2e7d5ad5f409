//! Time-window substitution into media URI templates.

use crate::error::FootageError;
use crate::window::TimeWindow;

pub const START_TIME_PLACEHOLDER: &str = "{START_TIME}";
pub const DURATION_PLACEHOLDER: &str = "{DURATION}";

/// Substitutes the window's start (epoch seconds) and duration (seconds) into `template`.
///
/// Fails if either placeholder is missing: a template without them would
/// silently request the wrong footage.
pub fn resolve(template: &str, window: &TimeWindow) -> Result<String, FootageError> {
    for placeholder in [START_TIME_PLACEHOLDER, DURATION_PLACEHOLDER] {
        if !template.contains(placeholder) {
            return Err(FootageError::Template {
                template: template.to_string(),
                reason: format!("missing placeholder {}", placeholder),
            });
        }
    }
    Ok(template
        .replace(START_TIME_PLACEHOLDER, &window.start().to_string())
        .replace(DURATION_PLACEHOLDER, &window.duration().to_string()))
}
