//! Password recovery: request a reset link, or, when the page is opened from
//! that link (`?token=...&email=...`), choose a new password.

#[cfg(test)]
#[path = "forgot_password_test.rs"]
mod forgot_password_test;

use leptos::prelude::*;
use leptos::tachys::view::any_view::IntoAny;
use leptos_router::NavigateOptions;
use leptos_router::hooks::{use_navigate, use_query_map};
use serde_json::Value;

use crate::app::SessionHandle;
use crate::components::toast::Toasts;
use crate::config::ConsoleConfig;
use crate::net::types::Payload;
use crate::pages::sign_in::field_error;
use crate::router::RouteName;
use crate::state::session::SessionState;

const LINK_SENT: &str = "If that address has an account, a reset link is on its way.";
const PASSWORD_UPDATED: &str = "Password updated. Sign in with your new password.";

pub(crate) fn validate_reset_request(email: &str) -> Result<Payload, &'static str> {
    let email = email.trim();
    if email.is_empty() {
        return Err("Enter your email first.");
    }
    let mut payload = Payload::new();
    payload.insert("email".to_owned(), Value::from(email));
    Ok(payload)
}

pub(crate) fn validate_new_password(
    token: &str,
    email: &str,
    password: &str,
    confirmation: &str,
) -> Result<Payload, &'static str> {
    if token.trim().is_empty() {
        return Err("This reset link is incomplete. Request a new one.");
    }
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err("Enter your email and a new password.");
    }
    if password != confirmation {
        return Err("Passwords do not match.");
    }
    let mut payload = Payload::new();
    payload.insert("token".to_owned(), Value::from(token.trim()));
    payload.insert("email".to_owned(), Value::from(email));
    payload.insert("password".to_owned(), Value::from(password));
    payload.insert("password_confirmation".to_owned(), Value::from(confirmation));
    Ok(payload)
}

#[component]
pub fn ForgotPasswordPage() -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();
    let handle = expect_context::<SessionHandle>();
    let toasts = expect_context::<Toasts>();
    let sign_in = expect_context::<ConsoleConfig>().guard.sign_in;
    let navigate = use_navigate();
    let query = use_query_map();

    let token = query.with_untracked(|q| q.get("token").unwrap_or_default());
    let email = RwSignal::new(query.with_untracked(|q| q.get("email").unwrap_or_default()));
    let password = RwSignal::new(String::new());
    let confirmation = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());
    let resetting = !token.is_empty();

    // Errors left over from another form; cleared once mounted, not during render.
    Effect::new(move || handle.store().clear_error());

    let on_request = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let payload = match validate_reset_request(&email.get_untracked()) {
            Ok(payload) => payload,
            Err(message) => {
                info.set(message.to_owned());
                return;
            }
        };
        let store = handle.store();
        leptos::task::spawn_local(async move {
            match store.request_password_reset(&payload).await {
                Ok(message) => info.set(message.unwrap_or_else(|| LINK_SENT.to_owned())),
                Err(err) => toasts.error(&err, None),
            }
        });
    };

    let on_reset = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let payload = match validate_new_password(
            &token,
            &email.get_untracked(),
            &password.get_untracked(),
            &confirmation.get_untracked(),
        ) {
            Ok(payload) => payload,
            Err(message) => {
                info.set(message.to_owned());
                return;
            }
        };
        let store = handle.store();
        let navigate = navigate.clone();
        leptos::task::spawn_local(async move {
            match store.reset_password(&payload).await {
                Ok(message) => {
                    toasts.success(message.unwrap_or_else(|| PASSWORD_UPDATED.to_owned()));
                    navigate(sign_in.path(), NavigateOptions::default());
                }
                Err(err) => toasts.error(&err, None),
            }
        });
    };

    let email_input = move || {
        view! {
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
        }
    };

    let form = if resetting {
        view! {
            <form class="auth-form" on:submit=on_reset>
                {email_input()}
                <input
                    class="auth-input"
                    type="password"
                    placeholder="New password"
                    prop:value=move || password.get()
                    on:input=move |ev| password.set(event_target_value(&ev))
                />
                <Show when=move || field_error(&session.get(), "password").is_some()>
                    <p class="auth-field-error">{move || field_error(&session.get(), "password")}</p>
                </Show>
                <input
                    class="auth-input"
                    type="password"
                    placeholder="Confirm new password"
                    prop:value=move || confirmation.get()
                    on:input=move |ev| confirmation.set(event_target_value(&ev))
                />
                <button class="auth-button" type="submit" disabled=move || session.get().loading>
                    "Set new password"
                </button>
            </form>
        }
        .into_any()
    } else {
        view! {
            <form class="auth-form" on:submit=on_request>
                {email_input()}
                <button class="auth-button" type="submit" disabled=move || session.get().loading>
                    "Email reset link"
                </button>
            </form>
        }
        .into_any()
    };

    view! {
        <div class="auth-page">
            <div class="auth-card">
                <h1>{if resetting { "Reset Password" } else { "Forgot Password" }}</h1>
                {form}
                <Show when=move || !info.get().is_empty()>
                    <p class="auth-message">{move || info.get()}</p>
                </Show>
                <p class="auth-links">
                    <a href=RouteName::SignIn.path()>"Back to sign in"</a>
                </p>
            </div>
        </div>
    }
}
