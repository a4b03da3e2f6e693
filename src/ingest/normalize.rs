use crate::database::models::TRACT_ID_LEN;
use crate::sanitize;

/// Canonical form of a raw tract identifier.
///
/// Numeric loaders sometimes hand back `6037102107.0`, so anything from the
/// first `.` on is dropped before left-padding with zeros to 11 characters
/// and cleaning.
pub fn normalize_tract_id(raw: &str) -> String {
    let trimmed = raw.trim();
    let integral = match trimmed.find('.') {
        Some(point) => &trimmed[..point],
        None => trimmed,
    };

    let padded = format!("{:0>width$}", integral, width = TRACT_ID_LEN);
    sanitize::clean(&padded)
}

/// Exactly 11 ASCII digits.
pub fn is_valid_tract_id(id: &str) -> bool {
    id.len() == TRACT_ID_LEN && id.bytes().all(|b| b.is_ascii_digit())
}
