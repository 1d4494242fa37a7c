use serde_json::json;

use super::*;

#[test]
fn reset_request_trims_email() {
    let payload = validate_reset_request(" ada@example.edu ").expect("payload");
    assert_eq!(Value::Object(payload), json!({"email": "ada@example.edu"}));
    assert_eq!(validate_reset_request("  "), Err("Enter your email first."));
}

#[test]
fn new_password_payload_carries_token_and_confirmation() {
    let payload = validate_new_password("tok-1", "ada@example.edu", "n3w-secret", "n3w-secret").expect("payload");
    assert_eq!(
        Value::Object(payload),
        json!({
            "token": "tok-1",
            "email": "ada@example.edu",
            "password": "n3w-secret",
            "password_confirmation": "n3w-secret"
        })
    );
}

#[test]
fn new_password_requires_token_and_matching_confirmation() {
    assert!(validate_new_password("", "ada@example.edu", "a", "a").is_err());
    assert_eq!(
        validate_new_password("tok", "ada@example.edu", "a", "b"),
        Err("Passwords do not match.")
    );
}
