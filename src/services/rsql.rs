use crate::errors::AppError;

/// Checks that `value` can be embedded in an RSQL filter as a bare literal.
///
/// Only ASCII alphanumerics, `-`, `_` and `.` are allowed, so a value can
/// never add selectors (`;`, `,`) or change the comparison.
pub fn literal<'a>(field: &str, value: &'a str) -> Result<&'a str, AppError> {
    let plain = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if plain {
        Ok(value)
    } else {
        Err(AppError::Validation(format!("Invalid {}: {:?}", field, value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_ids_and_ratings() {
        assert_eq!(literal("id", "F001").unwrap(), "F001");
        assert_eq!(literal("id", "5f2b-9c_1.a").unwrap(), "5f2b-9c_1.a");
        assert_eq!(literal("riskRating", "4").unwrap(), "4");
    }

    #[test]
    fn test_rejects_filter_syntax() {
        for value in ["", "1;ownerId==x", "1,2", "a==b", "x y", "../x"] {
            assert!(matches!(literal("id", value), Err(AppError::Validation(_))), "{:?}", value);
        }
    }
}
