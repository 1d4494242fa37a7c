use serde_json::json;

use super::*;

#[test]
fn validate_sign_in_input_trims_email_and_keeps_password() {
    let payload = validate_sign_in_input("  ada@example.edu ", " secret ", true).expect("payload");
    assert_eq!(
        Value::Object(payload),
        json!({"email": "ada@example.edu", "password": " secret ", "remember": true})
    );
}

#[test]
fn validate_sign_in_input_requires_both_fields() {
    assert_eq!(validate_sign_in_input("   ", "secret", false), Err(MISSING_CREDENTIALS));
    assert_eq!(validate_sign_in_input("ada@example.edu", "", false), Err(MISSING_CREDENTIALS));
}

#[test]
fn field_error_returns_first_message() {
    let mut state = SessionState::default();
    state
        .field_errors
        .insert("email".into(), vec!["The email field is required.".into(), "second".into()]);
    assert_eq!(field_error(&state, "email").as_deref(), Some("The email field is required."));
    assert_eq!(field_error(&state, "password"), None);
}
