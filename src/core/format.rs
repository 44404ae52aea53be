/// Decimal places for values on a scale whose largest magnitude is `max_abs`.
///
/// Integers from 100 up, one decimal from 10 up, two decimals below.
#[must_use]
pub fn precision_for_magnitude(max_abs: f64) -> usize {
    let max_abs = max_abs.abs();
    if !max_abs.is_finite() || max_abs >= 100.0 {
        0
    } else if max_abs >= 10.0 {
        1
    } else {
        2
    }
}

#[must_use]
pub fn format_by_magnitude(value: f64, max_abs: f64) -> String {
    let precision = precision_for_magnitude(max_abs);
    let formatted = format!("{value:.precision$}");
    // `-0.0` rounds to "-0" / "-0.00"; show it unsigned.
    if formatted.starts_with('-') && formatted[1..].chars().all(|c| c == '0' || c == '.') {
        formatted[1..].to_owned()
    } else {
        formatted
    }
}

/// Appends a unit to a formatted value; `%` attaches without a space.
#[must_use]
pub fn with_unit(formatted: String, unit: Option<&str>) -> String {
    match unit.map(str::trim).filter(|unit| !unit.is_empty()) {
        Some(unit) if unit.starts_with('%') => format!("{formatted}{unit}"),
        Some(unit) => format!("{formatted} {unit}"),
        None => formatted,
    }
}

/// Year part of a `dd/mm/yy` label (`31/12/25` becomes `25`).
///
/// Labels in any other shape are returned unchanged.
#[must_use]
pub fn short_year_label(label: &str) -> String {
    let parts: Vec<&str> = label.trim().split('/').collect();
    match parts.as_slice() {
        [day, month, year]
            if !day.is_empty()
                && !month.is_empty()
                && !year.is_empty()
                && [day, month, year]
                    .iter()
                    .all(|part| part.chars().all(|c| c.is_ascii_digit())) =>
        {
            let year = *year;
            if year.len() == 4 {
                year[2..].to_owned()
            } else {
                year.to_owned()
            }
        }
        _ => label.to_owned(),
    }
}
