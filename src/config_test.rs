use super::*;
use crate::router::RouteName;

#[test]
fn normalize_base_url_strips_trailing_slashes() {
    assert_eq!(
        normalize_base_url("https://api.example.edu//"),
        Some("https://api.example.edu".to_owned())
    );
}

#[test]
fn normalize_base_url_trims_whitespace() {
    assert_eq!(normalize_base_url("  http://localhost:8021 "), Some("http://localhost:8021".to_owned()));
}

#[test]
fn normalize_base_url_rejects_blank() {
    assert_eq!(normalize_base_url("   "), None);
    assert_eq!(normalize_base_url("/"), None);
}

#[test]
fn default_config_uses_local_api_and_user_slot() {
    let config = ConsoleConfig::default();
    assert_eq!(config.api_base_url, DEFAULT_API_URL);
    assert_eq!(config.snapshot_key, "user");
    assert_eq!(config.endpoints.current_user, "/api/user");
    assert_eq!(config.endpoints.csrf_cookie, "/sanctum/csrf-cookie");
}

#[test]
fn default_guard_lands_on_dashboard_and_signs_in_at_signin() {
    let config = ConsoleConfig::default();
    assert_eq!(config.guard.landing, RouteName::Dashboard);
    assert_eq!(config.guard.sign_in, RouteName::SignIn);
}

#[test]
fn from_build_env_never_leaves_blank_origin() {
    let config = ConsoleConfig::from_build_env();
    assert!(!config.api_base_url.is_empty());
    assert!(!config.api_base_url.ends_with('/'));
}
