use leptos::prelude::*;

use crate::router::RouteName;

#[component]
pub fn NotFoundPage() -> impl IntoView {
    view! {
        <section class="not-found">
            <h1>"Page not found"</h1>
            <a href=RouteName::Dashboard.path()>"Back to the dashboard"</a>
        </section>
    }
}
