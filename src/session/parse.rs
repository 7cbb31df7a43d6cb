use crate::error::QueryError;

/// Parse the anchor identifier. An empty input is `InputEmpty`; anything that is not an integer
/// is reported as `NotFound`, since no record can carry such an id.
pub fn parse_id(raw: &str) -> Result<i64, QueryError> {
    let raw = raw.trim();
    if raw.is_empty() { return Err(QueryError::InputEmpty) }
    raw.parse::<i64>().map_err(|_| QueryError::NotFound)
}

/// Parse the buffer radius, coercing anything that is not a finite positive number to `default`.
pub fn parse_radius(raw: &str, default: f64) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(radius) if radius.is_finite() && radius > 0.0 => radius,
        _ => default,
    }
}

/// Parse a comma-separated id list. Blank entries are ignored; a single bad entry invalidates
/// the whole list.
pub fn parse_id_list(raw: &str) -> Result<Vec<i64>, QueryError> {
    let raw = raw.trim();
    if raw.is_empty() { return Err(QueryError::InputEmpty) }

    let ids = raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| entry.parse::<i64>().map_err(|_| QueryError::InputInvalid))
        .collect::<Result<Vec<_>, _>>()?;

    if ids.is_empty() { return Err(QueryError::InputEmpty) }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_parsing() {
        assert_eq!(parse_id(" 42 "), Ok(42));
        assert_eq!(parse_id("-7"), Ok(-7));
        assert_eq!(parse_id(""), Err(QueryError::InputEmpty));
        assert_eq!(parse_id("   "), Err(QueryError::InputEmpty));
        assert_eq!(parse_id("4.2"), Err(QueryError::NotFound));
        assert_eq!(parse_id("abc"), Err(QueryError::NotFound));
    }

    #[test]
    fn radius_coercion() {
        assert_eq!(parse_radius("250", 1000.0), 250.0);
        assert_eq!(parse_radius(" 12.5 ", 1000.0), 12.5);
        assert_eq!(parse_radius("abc", 1000.0), 1000.0);
        assert_eq!(parse_radius("", 1000.0), 1000.0);
        assert_eq!(parse_radius("0", 1000.0), 1000.0);
        assert_eq!(parse_radius("-5", 1000.0), 1000.0);
        assert_eq!(parse_radius("NaN", 1000.0), 1000.0);
        assert_eq!(parse_radius("inf", 1000.0), 1000.0);
    }

    #[test]
    fn id_list_parsing() {
        assert_eq!(parse_id_list("10, 11,12"), Ok(vec![10, 11, 12]));
        assert_eq!(parse_id_list("10,,11,"), Ok(vec![10, 11]));
        assert_eq!(parse_id_list("10, 11, abc"), Err(QueryError::InputInvalid));
        assert_eq!(parse_id_list(""), Err(QueryError::InputEmpty));
        assert_eq!(parse_id_list(" , ,"), Err(QueryError::InputEmpty));
    }
}
