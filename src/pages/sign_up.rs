//! Account registration.

#[cfg(test)]
#[path = "sign_up_test.rs"]
mod sign_up_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;
use serde_json::Value;

use crate::app::SessionHandle;
use crate::components::toast::Toasts;
use crate::config::ConsoleConfig;
use crate::net::types::{AuthError, Payload};
use crate::pages::sign_in::field_error;
use crate::router::RouteName;
use crate::state::session::SessionState;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct SignUpForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
}

impl SignUpForm {
    /// Check the form locally and build the registration payload. The server
    /// still validates everything; this only catches empty fields and a
    /// mismatched confirmation before a round trip.
    pub(crate) fn validate(&self) -> Result<Payload, &'static str> {
        let name = self.name.trim();
        let email = self.email.trim();
        if name.is_empty() || email.is_empty() || self.password.is_empty() {
            return Err("Fill in your name, email and password.");
        }
        if self.password != self.password_confirmation {
            return Err("Passwords do not match.");
        }
        let mut payload = Payload::new();
        payload.insert("name".to_owned(), Value::from(name));
        payload.insert("email".to_owned(), Value::from(email));
        payload.insert("password".to_owned(), Value::from(self.password.as_str()));
        payload.insert(
            "password_confirmation".to_owned(),
            Value::from(self.password_confirmation.as_str()),
        );
        Ok(payload)
    }
}

#[component]
pub fn SignUpPage() -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();
    let handle = expect_context::<SessionHandle>();
    let toasts = expect_context::<Toasts>();
    let landing = expect_context::<ConsoleConfig>().guard.landing;
    let navigate = use_navigate();

    let form = RwSignal::new(SignUpForm::default());
    let info = RwSignal::new(String::new());

    // Errors left over from another form; cleared once mounted, not during render.
    Effect::new(move || handle.store().clear_error());

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if session.get_untracked().loading {
            return;
        }
        let payload = match form.with_untracked(SignUpForm::validate) {
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
            match store.register(&payload).await {
                Ok(()) => {
                    toasts.success("Account created.");
                    navigate(landing.path(), NavigateOptions::default());
                }
                Err(AuthError::Superseded) => {}
                Err(err) => toasts.error(&err, None),
            }
        });
    };

    let input = move |field: &'static str, kind: &'static str, label: &'static str| {
        view! {
            <input
                class="auth-input"
                type=kind
                placeholder=label
                prop:value=move || form.with(|f| field_value(f, field).to_owned())
                on:input=move |ev| form.update(|f| set_field(f, field, event_target_value(&ev)))
            />
            <Show when=move || field_error(&session.get(), field).is_some()>
                <p class="auth-field-error">{move || field_error(&session.get(), field)}</p>
            </Show>
        }
    };

    view! {
        <div class="auth-page">
            <div class="auth-card">
                <h1>"Sign Up"</h1>
                <form class="auth-form" on:submit=on_submit>
                    {input("name", "text", "Full name")}
                    {input("email", "email", "you@school.edu")}
                    {input("password", "password", "Password")}
                    {input("password_confirmation", "password", "Confirm password")}
                    <button class="auth-button" type="submit" disabled=move || session.get().loading>
                        "Create account"
                    </button>
                </form>
                <Show when=move || !info.get().is_empty()>
                    <p class="auth-message">{move || info.get()}</p>
                </Show>
                <p class="auth-links">
                    <a href=RouteName::SignIn.path()>"Already have an account? Sign in"</a>
                </p>
            </div>
        </div>
    }
}

fn field_value<'a>(form: &'a SignUpForm, field: &str) -> &'a str {
    match field {
        "name" => &form.name,
        "email" => &form.email,
        "password" => &form.password,
        _ => &form.password_confirmation,
    }
}

fn set_field(form: &mut SignUpForm, field: &str, value: String) {
    match field {
        "name" => form.name = value,
        "email" => form.email = value,
        "password" => form.password = value,
        _ => form.password_confirmation = value,
    }
}
