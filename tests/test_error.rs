//! Integration tests for error types

use destination_testkit::TestkitError;

#[test]
fn test_error_classification() {
    assert!(TestkitError::AlreadyExists("ds".to_string()).is_already_exists());
    assert!(!TestkitError::NotFound("ds".to_string()).is_already_exists());

    assert!(TestkitError::NotFound("ds".to_string()).is_not_found());
    assert!(!TestkitError::IoError("io".to_string()).is_not_found());
}

#[test]
fn test_error_display() {
    let error = TestkitError::ConfigurationError("test error".to_string());
    let error_str = format!("{}", error);
    assert!(error_str.contains("Configuration error"));
    assert!(error_str.contains("test error"));

    let api = TestkitError::ApiError {
        status: 503,
        message: "unavailable".to_string(),
    };
    assert_eq!(api.to_string(), "API error (status 503): unavailable");

    let message = TestkitError::MessageError("Invalid message on line 3".to_string());
    assert!(!message.to_string().contains("Configuration"));
}

#[test]
fn test_object_store_not_found_maps_to_not_found() {
    let err: TestkitError = object_store::Error::NotFound {
        path: "bucket/key".to_string(),
        source: "missing".into(),
    }
    .into();
    assert!(err.is_not_found());

    let err: TestkitError = object_store::Error::NotImplemented.into();
    assert!(matches!(err, TestkitError::StorageError(_)));
}

#[test]
fn test_error_clone() {
    let error = TestkitError::NotApplicable("dev-null".to_string());
    let cloned = error.clone();
    assert!(matches!(cloned, TestkitError::NotApplicable(_)));
}
