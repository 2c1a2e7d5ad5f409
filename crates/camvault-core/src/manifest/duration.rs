//! ISO 8601 duration values as used by `MPD@mediaPresentationDuration`.

/// Parses `PnDTnHnMnS` (fractional seconds allowed) into seconds.
/// Years and months are not used by MPDs and are rejected.
pub fn parse_iso8601_duration(value: &str) -> Option<f64> {
    let rest = value.trim().strip_prefix('P')?;
    if rest.is_empty() {
        return None;
    }

    let mut total = 0.0;
    let mut in_time = false;
    let mut number = String::new();
    let mut saw_component = false;

    for c in rest.chars() {
        match c {
            'T' if !in_time && number.is_empty() => in_time = true,
            '0'..='9' | '.' => number.push(c),
            unit => {
                let n: f64 = number.parse().ok()?;
                number.clear();
                let scale = match (in_time, unit) {
                    (false, 'D') => 86_400.0,
                    (true, 'H') => 3_600.0,
                    (true, 'M') => 60.0,
                    (true, 'S') => 1.0,
                    _ => return None,
                };
                total += n * scale;
                saw_component = true;
            }
        }
    }

    if !number.is_empty() || !saw_component {
        return None;
    }
    Some(total)
}
