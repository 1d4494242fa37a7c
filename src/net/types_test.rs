use super::*;
use serde_json::json;

fn http(status: Option<u16>, body: Value) -> HttpError {
    HttpError { status, body }
}

// =============================================================
// Identity
// =============================================================

#[test]
fn identity_unwraps_data_envelope() {
    let identity = Identity::from_response(json!({
        "data": {"id": 7, "name": "Ada", "email": "ada@example.edu", "role": "admin"}
    }))
    .unwrap();
    assert_eq!(identity.id, "7");
    assert_eq!(identity.role.as_deref(), Some("admin"));
    assert_eq!(identity.display_name(), "Ada");
    assert_eq!(identity.attributes.get("email"), Some(&json!("ada@example.edu")));
}

#[test]
fn identity_accepts_bare_object_and_string_id() {
    let identity = Identity::from_response(json!({"id": "u-9"})).unwrap();
    assert_eq!(identity.id, "u-9");
    assert!(identity.role.is_none());
    assert_eq!(identity.display_name(), "u-9");
}

#[test]
fn identity_accepts_numeric_role() {
    let identity = Identity::from_response(json!({"data": {"id": 1, "name": "ada", "role": 2}})).unwrap();
    assert_eq!(identity.id, "1");
    assert_eq!(identity.role.as_deref(), Some("2"));
    assert_eq!(identity.display_name(), "ada");
}

#[test]
fn identity_accepts_role_object_by_name() {
    let identity = Identity::from_response(json!({"id": 4, "role": {"id": 2, "name": "faculty"}})).unwrap();
    assert_eq!(identity.role.as_deref(), Some("faculty"));
}

#[test]
fn identity_drops_unusable_role_shapes() {
    for role in [Value::Null, json!(true), json!(["admin"]), json!({"id": 2}), json!("  ")] {
        let identity = Identity::from_response(json!({"id": 5, "role": role})).unwrap();
        assert!(identity.role.is_none());
    }
}

#[test]
fn identity_rejects_missing_or_fractional_id() {
    assert!(matches!(
        Identity::from_response(json!({"data": {"name": "x"}})),
        Err(AuthError::Decode(_))
    ));
    assert!(Identity::from_response(json!({"id": 1.5})).is_err());
    assert!(Identity::from_response(json!({"id": ""})).is_err());
}

#[test]
fn identity_rejects_non_object_payload() {
    assert!(Identity::from_response(Value::Null).is_err());
    assert!(Identity::from_response(json!("ok")).is_err());
}

#[test]
fn identity_serializes_flat() {
    let identity = Identity::from_response(json!({"id": 3, "role": "faculty", "name": "Lin"})).unwrap();
    let value = serde_json::to_value(&identity).unwrap();
    assert_eq!(value, json!({"id": "3", "role": "faculty", "name": "Lin"}));
}

// =============================================================
// ErrorBody
// =============================================================

#[test]
fn error_body_prefers_message() {
    let body = ErrorBody::parse(&json!({
        "message": "The given data was invalid.",
        "errors": {"email": ["The email field is required."]}
    }));
    assert_eq!(body.user_message().as_deref(), Some("The given data was invalid."));
    assert_eq!(body.errors["email"], vec!["The email field is required.".to_owned()]);
}

#[test]
fn error_body_falls_back_to_first_field_error() {
    let body = ErrorBody::parse(&json!({"errors": {"password": ["Too short."]}}));
    assert_eq!(body.user_message().as_deref(), Some("Too short."));
}

#[test]
fn error_body_ignores_blank_message_and_odd_shapes() {
    assert_eq!(ErrorBody::parse(&json!({"message": "   "})).user_message(), None);
    assert_eq!(ErrorBody::parse(&json!({"errors": "nope"})).errors.len(), 0);
    assert_eq!(ErrorBody::parse(&json!([1, 2])), ErrorBody::default());
}

#[test]
fn error_body_accepts_plain_text() {
    assert_eq!(
        ErrorBody::parse(&json!("Service Unavailable")).user_message().as_deref(),
        Some("Service Unavailable")
    );
}

// =============================================================
// AuthError classification
// =============================================================

#[test]
fn classify_401_as_authorization_denied() {
    let err = AuthError::from_http(http(Some(401), json!({"message": "Invalid credentials"})), "Login failed");
    assert_eq!(
        err,
        AuthError::AuthorizationDenied { message: "Invalid credentials".to_owned() }
    );
    assert!(err.is_authorization_denied());
    assert_eq!(err.to_string(), "Invalid credentials");
}

#[test]
fn classify_419_as_anti_forgery_mismatch() {
    let err = AuthError::from_http(http(Some(419), json!({"message": "CSRF token mismatch."})), "Login failed");
    assert!(matches!(err, AuthError::AntiForgeryMismatch { .. }));
    assert!(!err.is_authorization_denied());
}

#[test]
fn classify_422_keeps_fields_verbatim() {
    let err = AuthError::from_http(
        http(
            Some(422),
            json!({"message": "Invalid.", "errors": {"email": ["Taken.", "Bad domain."]}}),
        ),
        "Registration failed",
    );
    let fields = err.field_errors().unwrap();
    assert_eq!(fields["email"], vec!["Taken.".to_owned(), "Bad domain.".to_owned()]);
}

#[test]
fn classify_other_4xx_as_rejected() {
    let err = AuthError::from_http(http(Some(403), Value::Null), "Login failed");
    assert_eq!(err, AuthError::Rejected { status: 403, message: "Login failed".to_owned() });
}

#[test]
fn classify_5xx_and_no_response_as_transient() {
    let err = AuthError::from_http(http(Some(503), Value::Null), "Failed to fetch user");
    assert_eq!(
        err,
        AuthError::Transient { status: Some(503), message: "Failed to fetch user".to_owned() }
    );
    let err = AuthError::from_http(http(None, Value::Null), "Failed to fetch user");
    assert!(matches!(err, AuthError::Transient { status: None, .. }));
    assert!(err.field_errors().is_none());
}
