#[cfg(test)]
mod error_tests {
    use serde_json::json;
    use virtual_doctor::{DoctorError, Result};

    #[test]
    fn test_api_error() {
        let err = DoctorError::ApiError("API connection failed".to_string());
        assert_eq!(format!("{}", err), "API error: API connection failed");
    }

    #[test]
    fn test_timeout_error() {
        assert_eq!(DoctorError::Timeout.to_string(), "Timeout error");
    }

    #[test]
    fn test_config_error() {
        let err = DoctorError::ConfigError("GOOGLE_API_KEY is required".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: GOOGLE_API_KEY is required"
        );
    }

    #[test]
    fn test_extraction_error() {
        let err = DoctorError::ExtractionError("Could not read PDF".to_string());
        assert_eq!(err.to_string(), "Extraction error: Could not read PDF");
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_value::<String>(json!(42)).unwrap_err();
        let err: DoctorError = json_err.into();
        match err {
            DoctorError::JsonError(_) => {}
            other => panic!("Expected JsonError, got {:?}", other),
        }
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "report.pdf");
        let err: DoctorError = io_err.into();
        assert!(matches!(err, DoctorError::IoError(_)));
        assert_ne!(
            err,
            DoctorError::IoError(std::io::Error::other("report.pdf"))
        );
    }

    #[test]
    fn test_result_type() {
        let ok_result: Result<i32> = Ok(42);
        assert_eq!(ok_result, Ok(42));

        let err_result: Result<i32> = Err(DoctorError::ApiError("test error".to_string()));
        assert!(err_result.is_err());
    }
}
