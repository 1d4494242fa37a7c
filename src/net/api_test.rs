use super::*;
use serde_json::json;

#[test]
fn request_builders_set_method_body_and_query() {
    let request = ApiRequest::post("/api/login")
        .json(json!({"email": "a@x.com"}))
        .query("role", "faculty");
    assert_eq!(request.method, Method::Post);
    assert_eq!(request.path, "/api/login");
    assert_eq!(request.body, Some(json!({"email": "a@x.com"})));
    assert_eq!(request.query, vec![("role".to_owned(), "faculty".to_owned())]);
    assert_eq!(ApiRequest::get("/api/user").body, None);
    assert_eq!(ApiRequest::delete("/api/rooms/1").method.as_str(), "DELETE");
}

#[test]
fn browser_client_joins_base_and_path() {
    let client = BrowserClient::new("http://localhost:8021/");
    assert_eq!(client.url("/api/user"), "http://localhost:8021/api/user");
    assert_eq!(client.url("api/user"), "http://localhost:8021/api/user");
    assert_eq!(client.url("https://auth.example.edu/x"), "https://auth.example.edu/x");
}

#[cfg(not(feature = "csr"))]
#[tokio::test]
async fn browser_client_reports_no_response_outside_browser() {
    let err = BrowserClient::new("http://localhost:8021")
        .send(ApiRequest::get("/api/user"))
        .await
        .unwrap_err();
    assert_eq!(err.status, None);
}

#[test]
fn network_error_carries_message_body() {
    let err = HttpError::network("offline");
    assert_eq!(err.status, None);
    assert_eq!(err.body, json!({"message": "offline"}));
}

#[test]
fn parse_body_handles_empty_json_and_text() {
    assert_eq!(parse_body(""), Value::Null);
    assert_eq!(parse_body("  \n"), Value::Null);
    assert_eq!(parse_body(r#"{"message":"x"}"#), json!({"message": "x"}));
    assert_eq!(parse_body("<html>502</html>"), json!("<html>502</html>"));
}

#[test]
fn xsrf_token_found_among_other_cookies() {
    let cookies = "theme=dark; XSRF-TOKEN=eyJpdiI6IjEyMyJ9%3D; console_session=abc";
    assert_eq!(xsrf_token_from_cookies(cookies).as_deref(), Some("eyJpdiI6IjEyMyJ9="));
}

#[test]
fn xsrf_token_missing_or_empty_is_none() {
    assert_eq!(xsrf_token_from_cookies(""), None);
    assert_eq!(xsrf_token_from_cookies("a=1; b=2"), None);
    assert_eq!(xsrf_token_from_cookies("XSRF-TOKEN="), None);
    assert_eq!(xsrf_token_from_cookies("NOT-XSRF-TOKEN=1"), None);
}

#[test]
fn xsrf_token_decodes_escapes_and_keeps_malformed_ones() {
    assert_eq!(xsrf_token_from_cookies("XSRF-TOKEN=a%2Fb%3d").as_deref(), Some("a/b="));
    assert_eq!(xsrf_token_from_cookies("XSRF-TOKEN=100%").as_deref(), Some("100%"));
    assert_eq!(xsrf_token_from_cookies("XSRF-TOKEN=%zz%4").as_deref(), Some("%zz%4"));
    assert_eq!(xsrf_token_from_cookies("XSRF-TOKEN=a+b").as_deref(), Some("a+b"));
}
