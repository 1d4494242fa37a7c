//! Dashboard: the authenticated landing route.
//!
//! Greets the user and shows headline counts for the main collections.

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use std::rc::Rc;

use leptos::prelude::*;

use crate::app::ApiHandle;
use crate::net::api::ResourceClient;
use crate::net::resource::Resource;
use crate::state::session::SessionState;

/// Collections with a count card, in display order.
pub(crate) const COUNTED: [(&str, fn(Rc<dyn ResourceClient>) -> Resource); 3] = [
    ("Users", Resource::users),
    ("Rooms", Resource::rooms),
    ("Subjects", Resource::subjects),
];

/// Text for a count card.
pub(crate) fn count_label(count: Option<Result<u64, ()>>) -> String {
    match count {
        None => "...".to_owned(),
        Some(Ok(n)) => n.to_string(),
        Some(Err(())) => "n/a".to_owned(),
    }
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();
    let api = expect_context::<ApiHandle>();

    let counts = COUNTED.map(|_| RwSignal::new(None::<Result<u64, ()>>));
    for ((label, collection), slot) in COUNTED.into_iter().zip(counts) {
        let resource = collection(api.client());
        leptos::task::spawn_local(async move {
            let result = resource.count().await.map_err(|err| {
                leptos::logging::warn!("{label} count unavailable: {err}");
            });
            slot.set(Some(result));
        });
    }

    let welcome = move || {
        session.with(|s| {
            s.identity
                .as_ref()
                .map(|identity| format!("Welcome back, {}", identity.display_name()))
                .unwrap_or_default()
        })
    };

    view! {
        <section class="dashboard">
            <h1>"Dashboard"</h1>
            <p class="dashboard__welcome">{welcome}</p>
            <div class="dashboard__cards">
                {COUNTED
                    .into_iter()
                    .zip(counts)
                    .map(|((label, _), slot)| {
                        view! {
                            <div class="dashboard__card">
                                <span class="dashboard__card-label">{label}</span>
                                <span class="dashboard__card-value">{move || count_label(slot.get())}</span>
                            </div>
                        }
                    })
                    .collect_view()}
            </div>
        </section>
    }
}
