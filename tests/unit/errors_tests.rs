/*!
 * Tests for error types and conversions
 */

use scriptreel::errors::{AppError, GenerationError, GenerationStage, ProviderError};

#[test]
fn test_providerError_fromStatus_shouldPickVariant() {
    assert!(matches!(ProviderError::from_status(401, "bad key"), ProviderError::AuthenticationError(_)));
    assert!(matches!(ProviderError::from_status(403, "forbidden"), ProviderError::AuthenticationError(_)));
    assert!(matches!(ProviderError::from_status(429, "slow down"), ProviderError::RateLimitExceeded(_)));
    assert!(matches!(
        ProviderError::from_status(500, "boom"),
        ProviderError::ApiError { status_code: 500, .. }
    ));
}

#[test]
fn test_providerError_apiError_shouldDisplayStatusAndMessage() {
    let error = ProviderError::ApiError {
        status_code: 400,
        message: "Invalid ratio".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("400"));
    assert!(display.contains("Invalid ratio"));
}

#[test]
fn test_generationError_jobFailed_shouldNameStage() {
    let error = GenerationError::JobFailed {
        stage: GenerationStage::Image,
        reason: "Content rejected".to_string(),
    };

    assert_eq!(error.to_string(), "image job failed: Content rejected");
}

#[test]
fn test_generationError_timeout_shouldIncludeWait() {
    let error = GenerationError::Timeout {
        stage: GenerationStage::Video,
        waited_secs: 300,
    };

    assert_eq!(error.to_string(), "video job timed out after 300s");
}

#[test]
fn test_generationError_fromProviderError_shouldWrap() {
    let error: GenerationError = ProviderError::ConnectionError("reset".to_string()).into();

    assert!(matches!(error, GenerationError::Provider(ProviderError::ConnectionError(_))));
    assert!(error.to_string().contains("reset"));
}

#[test]
fn test_appError_conversions_shouldWrapSources() {
    let from_generation: AppError = GenerationError::Storage("disk full".to_string()).into();
    let from_io: AppError = std::io::Error::new(std::io::ErrorKind::NotFound, "missing").into();
    let from_anyhow: AppError = anyhow::anyhow!("something odd").into();

    assert!(matches!(from_generation, AppError::Generation(_)));
    assert!(matches!(from_io, AppError::File(_)));
    assert!(matches!(from_anyhow, AppError::Unknown(ref m) if m == "something odd"));
}
