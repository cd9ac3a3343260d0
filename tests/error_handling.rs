use snaprepo::error::{Result, SnapRepoError, MSG_FETCH_FAILED, MSG_NOT_FOUND, MSG_RATE_LIMITED};
use std::error::Error;

#[test]
fn test_error_display() {
    let error = SnapRepoError::RateLimitExceeded("Rate limit hit".to_string());
    assert_eq!(format!("{}", error), "Rate limit exceeded: Rate limit hit");

    let error = SnapRepoError::NotFound("Repository gone".to_string());
    assert_eq!(format!("{}", error), "Resource not found: Repository gone");

    let error = SnapRepoError::ApiError("API failed".to_string());
    assert_eq!(format!("{}", error), "GitHub API error: API failed");

    let error = SnapRepoError::InvalidRepoUrl("Bad URL".to_string());
    assert_eq!(format!("{}", error), "Invalid repository URL: Bad URL");

    let error = SnapRepoError::Upstream {
        status: 502,
        message: "bad gateway".to_string(),
    };
    assert_eq!(format!("{}", error), "Upstream returned 502: bad gateway");
}

#[test]
fn test_error_source() {
    let error = SnapRepoError::RateLimitExceeded("Rate limit hit".to_string());
    assert!(error.source().is_none());

    let io_error = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
    let error: SnapRepoError = io_error.into();
    assert!(error.source().is_some());
}

#[test]
fn test_error_conversion() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let error: SnapRepoError = io_error.into();
    assert!(matches!(error, SnapRepoError::IoError(_)));

    let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let error: SnapRepoError = json_error.into();
    assert!(matches!(error, SnapRepoError::JsonError(_)));
}

#[test]
fn test_status_codes() {
    assert_eq!(SnapRepoError::NotFound("x".into()).status_code(), Some(404));
    assert_eq!(SnapRepoError::RateLimitExceeded("x".into()).status_code(), Some(403));
    assert_eq!(
        SnapRepoError::Upstream {
            status: 500,
            message: String::new()
        }
        .status_code(),
        Some(500)
    );
    assert_eq!(SnapRepoError::Render("x".into()).status_code(), None);
}

#[test]
fn test_user_messages() {
    assert_eq!(SnapRepoError::NotFound("x".into()).user_message(), MSG_NOT_FOUND);
    assert_eq!(
        SnapRepoError::RateLimitExceeded("x".into()).user_message(),
        "API rate limit exceeded. Please try again later."
    );
    assert_eq!(
        SnapRepoError::RateLimitExceeded("x".into()).user_message(),
        MSG_RATE_LIMITED
    );
    assert_eq!(
        SnapRepoError::Upstream {
            status: 500,
            message: "boom".into()
        }
        .user_message(),
        MSG_FETCH_FAILED
    );
    assert_eq!(
        SnapRepoError::InvalidRepoUrl("x".into()).user_message(),
        "Invalid GitHub repository URL"
    );
    // Envelope text from a proxy is already human-facing
    assert_eq!(
        SnapRepoError::ApiError("Upstream is sad".into()).user_message(),
        "Upstream is sad"
    );
}

#[test]
fn test_result_type() {
    fn returns_result() -> Result<String> {
        Ok("success".to_string())
    }

    let result = returns_result();
    assert!(result.is_ok());
    assert_eq!(result.unwrap(), "success");

    fn returns_error() -> Result<String> {
        Err(SnapRepoError::NotFound("Not found".to_string()))
    }

    let result = returns_error();
    assert!(result.is_err());
}
