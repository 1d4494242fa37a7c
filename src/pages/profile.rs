//! Profile page: the signed-in identity as the server reported it.

use leptos::prelude::*;
use serde_json::Value;

use crate::state::session::SessionState;

#[component]
pub fn ProfilePage() -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();

    let fields = move || {
        session.with(|s| {
            let Some(identity) = &s.identity else {
                return Vec::new();
            };
            let mut fields = vec![("id".to_owned(), identity.id.clone())];
            if let Some(role) = &identity.role {
                fields.push(("role".to_owned(), role.clone()));
            }
            fields.extend(identity.attributes.iter().filter_map(|(key, value)| match value {
                Value::String(text) => Some((key.clone(), text.clone())),
                Value::Number(number) => Some((key.clone(), number.to_string())),
                Value::Bool(flag) => Some((key.clone(), flag.to_string())),
                _ => None,
            }));
            fields
        })
    };

    view! {
        <section class="profile-page">
            <h1>"Profile"</h1>
            <dl class="profile-page__fields">
                {move || {
                    fields()
                        .into_iter()
                        .map(|(key, value)| view! { <dt>{key}</dt><dd>{value}</dd> })
                        .collect_view()
                }}
            </dl>
        </section>
    }
}
