use super::ApiError;
use crate::models::MediaType;

/// Treats missing and blank string parameters alike.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Splits `"Tom Hanks, Meg Ryan"` into names, dropping empty pieces.
pub fn parse_actors(actors: Option<&str>) -> Vec<String> {
    actors
        .map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .map(ToString::to_string)
                .collect()
        })
        .unwrap_or_default()
}

pub fn parse_media_type(media_type: Option<&str>) -> Result<Option<MediaType>, ApiError> {
    match media_type.map(str::trim).filter(|t| !t.is_empty()) {
        None => Ok(None),
        Some(raw) => raw.parse().map(Some).map_err(|_| {
            ApiError::validation("Invalid type parameter. Must be one of: movie, series, episode")
        }),
    }
}

pub fn validate_page(page: Option<u32>) -> Result<u32, ApiError> {
    match page {
        None => Ok(1),
        Some(0) => Err(ApiError::validation(
            "Invalid page: 0. Page must be a positive integer",
        )),
        Some(page) => Ok(page),
    }
}

pub fn validate_limit(limit: Option<u32>, default: u32, max: u32) -> Result<u32, ApiError> {
    let limit = limit.unwrap_or(default);

    if !(1..=max).contains(&limit) {
        return Err(ApiError::validation(format!(
            "Invalid limit: {}. Limit must be between 1 and {}",
            limit, max
        )));
    }
    Ok(limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_actors() {
        assert_eq!(
            parse_actors(Some("Tom Hanks, Meg Ryan")),
            ["Tom Hanks", "Meg Ryan"]
        );
        assert_eq!(parse_actors(Some(" , Keanu Reeves,,")), ["Keanu Reeves"]);
        assert!(parse_actors(Some("")).is_empty());
        assert!(parse_actors(None).is_empty());
    }

    #[test]
    fn test_parse_media_type() {
        assert_eq!(parse_media_type(Some("MOVIE")).unwrap(), Some(MediaType::Movie));
        assert_eq!(parse_media_type(Some("episode")).unwrap(), Some(MediaType::Episode));
        assert_eq!(parse_media_type(Some("  ")).unwrap(), None);
        assert_eq!(parse_media_type(None).unwrap(), None);
        assert!(parse_media_type(Some("documentary")).is_err());
    }

    #[test]
    fn test_validate_page() {
        assert_eq!(validate_page(None).unwrap(), 1);
        assert_eq!(validate_page(Some(3)).unwrap(), 3);
        assert!(validate_page(Some(0)).is_err());
    }

    #[test]
    fn test_validate_limit() {
        assert_eq!(validate_limit(None, 10, 50).unwrap(), 10);
        assert_eq!(validate_limit(Some(50), 10, 50).unwrap(), 50);
        assert!(validate_limit(Some(0), 10, 50).is_err());
        assert!(validate_limit(Some(51), 10, 50).is_err());
        assert!(validate_limit(Some(30), 10, 25).is_err());
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some(" Matrix ".to_string())).as_deref(), Some("Matrix"));
        assert_eq!(non_blank(Some("   ".to_string())), None);
        assert_eq!(non_blank(None), None);
    }
}
