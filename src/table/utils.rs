// src/table/utils.rs

/// Trim whitespace and strip one pair of outer double quotes if present.
pub fn clean_str(raw: &str) -> &str {
    let trimmed = raw.trim();
    if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        &trimmed[1..trimmed.len() - 1]
    } else {
        trimmed
    }
}

/// Numeric value of a cell, if it carries one. Empty cells and literal NaN
/// are missing values, excluded from any aggregate.
pub fn parse_numeric(raw: &str) -> Option<f64> {
    let cell = clean_str(raw);
    if cell.is_empty() {
        return None;
    }
    cell.parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// Whether a cell fits in a Float64 column: missing, or any float literal.
/// NaN counts here; it parses, it just carries no value.
pub fn is_numeric_cell(raw: &str) -> bool {
    let cell = clean_str(raw);
    cell.is_empty() || cell.parse::<f64>().is_ok()
}

/// Whether a cell carries no value at all: blank, or a NaN literal. Applies
/// to text columns as much as numeric ones.
pub fn is_missing_cell(raw: &str) -> bool {
    let cell = clean_str(raw);
    cell.is_empty() || matches!(cell.parse::<f64>(), Ok(v) if v.is_nan())
}
