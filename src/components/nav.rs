//! Console chrome for protected pages: sidebar navigation and a header with
//! the signed-in user and a sign-out button.

#[cfg(test)]
#[path = "nav_test.rs"]
mod nav_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::app::SessionHandle;
use crate::components::toast::Toasts;
use crate::config::ConsoleConfig;
use crate::router::RouteName;
use crate::state::session::{LogoutOutcome, SessionState};

/// Sidebar entries, in display order.
pub(crate) const MENU: [RouteName; 13] = [
    RouteName::Dashboard,
    RouteName::Users,
    RouteName::Students,
    RouteName::Faculty,
    RouteName::Devices,
    RouteName::DeviceBoards,
    RouteName::Rooms,
    RouteName::Subjects,
    RouteName::Schedules,
    RouteName::Sections,
    RouteName::SectionSubjects,
    RouteName::SectionSubjectStudents,
    RouteName::SectionSubjectSchedules,
];

/// Header greeting for the current session.
pub(crate) fn greeting(state: &SessionState) -> String {
    match &state.identity {
        Some(identity) => match &identity.role {
            Some(role) => format!("{} ({role})", identity.display_name()),
            None => identity.display_name().to_owned(),
        },
        None => String::new(),
    }
}

#[component]
pub fn ConsoleShell(children: Children) -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();
    let handle = expect_context::<SessionHandle>();
    let toasts = expect_context::<Toasts>();
    let sign_in = expect_context::<ConsoleConfig>().guard.sign_in;
    let navigate = use_navigate();
    let busy = RwSignal::new(false);

    let on_sign_out = move |_| {
        if busy.get_untracked() {
            return;
        }
        busy.set(true);
        let store = handle.store();
        let navigate = navigate.clone();
        leptos::task::spawn_local(async move {
            if let LogoutOutcome::RemoteFailed(err) = store.logout().await {
                toasts.error(&err, Some("Signed out on this device, but the server could not be reached."));
            }
            busy.set(false);
            navigate(sign_in.path(), NavigateOptions::default());
        });
    };

    view! {
        <div class="console">
            <nav class="console__sidebar">
                <ul>
                    {MENU
                        .into_iter()
                        .map(|route| view! { <li><a href=route.path()>{route.title()}</a></li> })
                        .collect_view()}
                </ul>
            </nav>
            <div class="console__main">
                <header class="console__header">
                    <a class="console__user" href=RouteName::Profile.path()>{move || greeting(&session.get())}</a>
                    <button class="console__sign-out" on:click=on_sign_out disabled=move || busy.get()>
                        "Sign out"
                    </button>
                </header>
                <main class="console__content">{children()}</main>
            </div>
        </div>
    }
}
