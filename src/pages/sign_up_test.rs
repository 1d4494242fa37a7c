use serde_json::json;

use super::*;

fn form(password_confirmation: &str) -> SignUpForm {
    SignUpForm {
        name: " Ada Lovelace ".into(),
        email: " ada@example.edu".into(),
        password: "secret123".into(),
        password_confirmation: password_confirmation.into(),
    }
}

#[test]
fn validate_builds_registration_payload() {
    let payload = form("secret123").validate().expect("payload");
    assert_eq!(
        Value::Object(payload),
        json!({
            "name": "Ada Lovelace",
            "email": "ada@example.edu",
            "password": "secret123",
            "password_confirmation": "secret123"
        })
    );
}

#[test]
fn validate_rejects_mismatched_confirmation() {
    assert_eq!(form("secret124").validate(), Err("Passwords do not match."));
}

#[test]
fn validate_requires_name_email_and_password() {
    let mut missing = form("secret123");
    missing.name = "  ".into();
    assert!(missing.validate().is_err());
}

#[test]
fn set_field_and_field_value_agree() {
    let mut f = SignUpForm::default();
    for field in ["name", "email", "password", "password_confirmation"] {
        set_field(&mut f, field, format!("{field}-value"));
        assert_eq!(field_value(&f, field), format!("{field}-value"));
    }
}
