/*!
 * Tests for error types
 */

use anyhow::anyhow;

use sql_localizer::{LocalizationError, UnsupportedOperation};

/// Test that store errors keep the anyhow context chain
#[test]
fn test_fromAnyhow_shouldKeepContext() {
    let error: LocalizationError = anyhow!("disk I/O error")
        .context("Failed to load resource 'About'")
        .into();

    assert!(error.is_store_failure());
    let message = error.to_string();
    assert!(message.contains("Failed to load resource 'About'"));
    assert!(message.contains("disk I/O error"));
}

/// Test conversion of unsupported operations
#[test]
fn test_fromUnsupported_shouldNotBeStoreFailure() {
    let error: LocalizationError = UnsupportedOperation::AllStrings.into();

    assert!(!error.is_store_failure());
    assert!(matches!(
        error,
        LocalizationError::Unsupported(UnsupportedOperation::AllStrings)
    ));
    assert!(error.to_string().starts_with("Unsupported operation"));
}

/// Test configuration error messages
#[test]
fn test_configError_display_shouldIncludeDetail() {
    let error = LocalizationError::Config("no supported cultures".to_string());
    assert_eq!(error.to_string(), "Configuration error: no supported cultures");
    assert!(!error.is_store_failure());
}
