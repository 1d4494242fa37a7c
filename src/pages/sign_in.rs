//! Sign-in page: email + password against the session cookie login.

#[cfg(test)]
#[path = "sign_in_test.rs"]
mod sign_in_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;
use serde_json::Value;

use crate::app::SessionHandle;
use crate::components::toast::Toasts;
use crate::config::ConsoleConfig;
use crate::net::types::{AuthError, Payload};
use crate::router::RouteName;
use crate::state::session::SessionState;

const MISSING_CREDENTIALS: &str = "Enter your email and password.";

/// Trim the email and build the login payload. The password is sent as
/// typed.
pub(crate) fn validate_sign_in_input(email: &str, password: &str, remember: bool) -> Result<Payload, &'static str> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err(MISSING_CREDENTIALS);
    }
    let mut payload = Payload::new();
    payload.insert("email".to_owned(), Value::from(email));
    payload.insert("password".to_owned(), Value::from(password));
    payload.insert("remember".to_owned(), Value::from(remember));
    Ok(payload)
}

/// First validation message for `field`, if the last attempt produced one.
pub(crate) fn field_error(state: &SessionState, field: &str) -> Option<String> {
    state.field_errors.get(field).and_then(|messages| messages.first()).cloned()
}

#[component]
pub fn SignInPage() -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();
    let handle = expect_context::<SessionHandle>();
    let toasts = expect_context::<Toasts>();
    let landing = expect_context::<ConsoleConfig>().guard.landing;
    let navigate = use_navigate();

    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let remember = RwSignal::new(false);
    let info = RwSignal::new(String::new());

    // Errors left over from another form; cleared once mounted, not during render.
    Effect::new(move || handle.store().clear_error());

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if session.get_untracked().loading {
            return;
        }
        let payload = match validate_sign_in_input(&email.get_untracked(), &password.get_untracked(), remember.get_untracked()) {
            Ok(payload) => payload,
            Err(message) => {
                info.set(message.to_owned());
                return;
            }
        };
        info.set(String::new());

        let store = handle.store();
        let navigate = navigate.clone();
        leptos::task::spawn_local(async move {
            match store.login(&payload).await {
                Ok(()) => navigate(landing.path(), NavigateOptions::default()),
                Err(AuthError::Superseded) => {}
                Err(err) => {
                    password.set(String::new());
                    toasts.error(&err, None);
                }
            }
        });
    };

    view! {
        <div class="auth-page">
            <div class="auth-card">
                <h1>"Sign In"</h1>
                <form class="auth-form" on:submit=on_submit>
                    <input
                        class="auth-input"
                        type="email"
                        placeholder="you@school.edu"
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                    />
                    <Show when=move || field_error(&session.get(), "email").is_some()>
                        <p class="auth-field-error">{move || field_error(&session.get(), "email")}</p>
                    </Show>
                    <input
                        class="auth-input"
                        type="password"
                        placeholder="Password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <Show when=move || field_error(&session.get(), "password").is_some()>
                        <p class="auth-field-error">{move || field_error(&session.get(), "password")}</p>
                    </Show>
                    <label class="auth-check">
                        <input
                            type="checkbox"
                            prop:checked=move || remember.get()
                            on:change=move |ev| remember.set(event_target_checked(&ev))
                        />
                        "Keep me signed in"
                    </label>
                    <button class="auth-button" type="submit" disabled=move || session.get().loading>
                        {move || if session.get().loading { "Signing in..." } else { "Sign In" }}
                    </button>
                </form>
                <Show when=move || !info.get().is_empty()>
                    <p class="auth-message">{move || info.get()}</p>
                </Show>
                <p class="auth-links">
                    <a href=RouteName::ForgotPassword.path()>"Forgot password?"</a>
                    " · "
                    <a href=RouteName::SignUp.path()>"Create an account"</a>
                </p>
            </div>
        </div>
    }
}
