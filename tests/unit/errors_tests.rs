/*!
 * Tests for error types
 */

use scriptpage::errors::{AppError, ScriptError};

/// Test that script errors name the 1-based line
#[test]
fn test_script_error_display_withLine_shouldIncludeLine() {
    let error = ScriptError::OutOfOrderSceneNumber {
        line: 7,
        number: "3".to_string(),
        previous: "4".to_string(),
    };
    let message = error.to_string();
    assert!(message.contains("line 7"));
    assert!(message.contains("must sort after 4"));

    assert_eq!(
        ScriptError::NotMoveable { line: 2 }.to_string(),
        "Not a moveable element at line 2"
    );
    assert_eq!(
        ScriptError::NoBackingDestination.to_string(),
        "Buffer has no backing destination"
    );
}

/// Test conversion of script errors into the application error
#[test]
fn test_app_error_from_withScriptError_shouldWrap() {
    let app_error: AppError = ScriptError::CannotShiftPastHigherLevel { line: 3 }.into();
    assert!(matches!(
        app_error,
        AppError::Script(ScriptError::CannotShiftPastHigherLevel { line: 3 })
    ));
    assert!(app_error.to_string().starts_with("Script error:"));
}

/// Test conversion of io and json errors
#[test]
fn test_app_error_from_withIoAndJson_shouldMapVariants() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
    assert!(matches!(AppError::from(io_error), AppError::File(_)));

    let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    assert!(matches!(AppError::from(json_error), AppError::Config(_)));

    let any_error = anyhow::anyhow!("boom");
    assert!(matches!(AppError::from(any_error), AppError::Unknown(message) if message == "boom"));
}

/// Test that script errors survive an anyhow context chain
#[test]
fn test_script_error_withAnyhowContext_shouldDowncast() {
    use anyhow::Context;

    let result: Result<(), ScriptError> = Err(ScriptError::MalformedSceneNumber {
        line: 1,
        text: "x1".to_string(),
    });
    let error = result.context("Numbering failed").unwrap_err();
    assert_eq!(
        error.downcast_ref::<ScriptError>(),
        Some(&ScriptError::MalformedSceneNumber {
            line: 1,
            text: "x1".to_string(),
        })
    );
}
