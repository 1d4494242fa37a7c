//! Root application component: builds the session, wires context and guards
//! the router.
//!
//! SYSTEM CONTEXT
//! ==============
//! `App` is the composition root. It creates the one [`SessionStore`] for this
//! page load, the transports, and the [`NavigationGuard`], then hands them to
//! the view tree through Leptos context. Nothing below `App` constructs any of
//! these.
//!
//! STARTUP
//! =======
//! `check_auth` runs first. Routing stays dark until it settles, so the first
//! guard decision already sees the restored and revalidated session.
//!
//! After startup the same guard also watches the session signal, so a
//! sign-out or a 401 from any request unmounts a protected page at once.
//!
//! Session handles are `Rc` (the store is single-threaded), so they travel
//! through context inside `StoredValue::new_local`.

use std::rc::Rc;

use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};
use leptos_router::components::{Route, Router, Routes};
use leptos_router::hooks::{use_location, use_navigate};
use leptos_router::{NavigateOptions, StaticSegment};

use crate::components::nav::ConsoleShell;
use crate::components::progress_bar::{BarProgress, NavigationProgress, ProgressBar};
use crate::components::toast::{ToastStack, Toasts};
use crate::config::ConsoleConfig;
use crate::net::api::{BrowserClient, ResourceClient};
use crate::net::resource::SessionBoundClient;
use crate::pages::{
    dashboard::DashboardPage, forgot_password::ForgotPasswordPage, not_found::NotFoundPage,
    profile::ProfilePage, section::SectionPage, sign_in::SignInPage, sign_up::SignUpPage,
};
use crate::router::RouteName;
use crate::router::guard::{Decision, Location, NavigationGuard};
use crate::state::session::{SessionState, SessionStore};
use crate::util::ui_persistence::BrowserStorage;

// =============================================================================
// CONTEXT HANDLES
// =============================================================================

/// The session store for this page load.
#[derive(Clone, Copy)]
pub struct SessionHandle(StoredValue<Rc<SessionStore>, LocalStorage>);

impl SessionHandle {
    #[must_use]
    pub fn store(self) -> Rc<SessionStore> {
        self.0.get_value()
    }
}

/// Transport for CRUD resources; 401s are reported to the session.
#[derive(Clone, Copy)]
pub struct ApiHandle(StoredValue<Rc<dyn ResourceClient>, LocalStorage>);

impl ApiHandle {
    #[must_use]
    pub fn client(self) -> Rc<dyn ResourceClient> {
        self.0.get_value()
    }
}

#[derive(Clone, Copy)]
struct GuardHandle(StoredValue<Rc<NavigationGuard>, LocalStorage>);

/// Set once the startup session check has settled.
#[derive(Clone, Copy)]
struct SessionReady(RwSignal<bool>);

// =============================================================================
// ROOT
// =============================================================================

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let config = ConsoleConfig::from_build_env();
    leptos::logging::log!("console starting against {}", config.api_base_url);

    let transport: Rc<dyn ResourceClient> = Rc::new(BrowserClient::new(config.api_base_url.clone()));
    let store = Rc::new(SessionStore::new(transport.clone(), Rc::new(BrowserStorage), &config));

    // Mirror every store change into a signal for the view tree.
    let session = RwSignal::new(store.state());
    store.subscribe(move |state: &SessionState| session.set(state.clone()));

    let resources: Rc<dyn ResourceClient> = Rc::new(SessionBoundClient::new(transport, store.clone()));

    let progress = RwSignal::new(false);
    let guard = Rc::new(NavigationGuard::new(
        store.clone(),
        Rc::new(BarProgress::new(progress)),
        config.guard.clone(),
    ));

    let ready = RwSignal::new(false);
    let startup = store.clone();
    leptos::task::spawn_local(async move {
        startup.check_auth().await;
        ready.set(true);
    });

    provide_context(session);
    provide_context(config);
    provide_context(SessionHandle(StoredValue::new_local(store)));
    provide_context(ApiHandle(StoredValue::new_local(resources)));
    provide_context(GuardHandle(StoredValue::new_local(guard)));
    provide_context(SessionReady(ready));
    provide_context(NavigationProgress(progress));
    provide_context(Toasts::new());

    view! {
        <Title text="Attendance Console"/>
        <ProgressBar/>
        <ToastStack/>
        <Router>
            <GuardedRoutes/>
        </Router>
    }
}

/// Runs the guard on every location change and renders the routed page only
/// once the guard has admitted the current path. A session that ends under a
/// protected page sends the user to sign-in straight away.
#[component]
fn GuardedRoutes() -> impl IntoView {
    let guard = expect_context::<GuardHandle>();
    let ready = expect_context::<SessionReady>();
    let session = expect_context::<RwSignal<SessionState>>();
    let location = use_location();
    let navigate = use_navigate();

    let was_confirmed = StoredValue::new(false);
    let evict = navigate.clone();
    Effect::new(move || {
        let confirmed_before = was_confirmed.get_value();
        let at = Location::from_path(&location.pathname.get_untracked());
        let target = session.with(|state| {
            was_confirmed.set_value(state.is_confirmed());
            guard.0.get_value().evict(confirmed_before, state, &at)
        });
        if let Some(route) = target {
            leptos::logging::log!("session ended on {}, redirecting -> {}", at.path, route.name());
            evict(route.path(), NavigateOptions { replace: true, ..NavigateOptions::default() });
        }
    });

    let admitted = RwSignal::new(None::<String>);
    let last_admitted = StoredValue::new(None::<String>);
    let attempt = StoredValue::new(0_u64);

    Effect::new(move || {
        let path = location.pathname.get();
        if !ready.0.get() {
            return;
        }
        let ticket = attempt.get_value() + 1;
        attempt.set_value(ticket);

        let guard = guard.0.get_value();
        let from = last_admitted.get_value();
        let navigate = navigate.clone();
        leptos::task::spawn_local(async move {
            let to = Location::from_path(&path);
            let from = from.as_deref().map(Location::from_path);
            let decision = guard.transition(&to, from.as_ref()).await;
            // A newer navigation owns the outcome.
            if attempt.get_value() != ticket {
                return;
            }
            match decision {
                Decision::Allow => {
                    last_admitted.set_value(Some(path.clone()));
                    admitted.set(Some(path));
                }
                Decision::Redirect(route) => {
                    leptos::logging::log!("redirecting {path} -> {}", route.name());
                    navigate(route.path(), NavigateOptions { replace: true, ..NavigateOptions::default() });
                }
            }
        });
    });

    let is_admitted = move || admitted.get().is_some_and(|path| path == location.pathname.get());

    view! {
        <Show when=is_admitted fallback=|| view! { <div class="route-pending"></div> }>
            <Routes fallback=|| view! { <NotFoundPage/> }>
                <Route path=StaticSegment("signin") view=SignInPage/>
                <Route path=StaticSegment("signup") view=SignUpPage/>
                <Route path=StaticSegment("forgot-password") view=ForgotPasswordPage/>
                <Route path=StaticSegment("") view=|| view! { <ConsoleShell><DashboardPage/></ConsoleShell> }/>
                <Route path=StaticSegment("dashboard") view=|| view! { <ConsoleShell><DashboardPage/></ConsoleShell> }/>
                <Route path=StaticSegment("profile") view=|| view! { <ConsoleShell><ProfilePage/></ConsoleShell> }/>
                <Route path=StaticSegment("users") view=|| section(RouteName::Users)/>
                <Route path=StaticSegment("students") view=|| section(RouteName::Students)/>
                <Route path=StaticSegment("faculty") view=|| section(RouteName::Faculty)/>
                <Route path=StaticSegment("devices") view=|| section(RouteName::Devices)/>
                <Route path=StaticSegment("device-boards") view=|| section(RouteName::DeviceBoards)/>
                <Route path=StaticSegment("rooms") view=|| section(RouteName::Rooms)/>
                <Route path=StaticSegment("subjects") view=|| section(RouteName::Subjects)/>
                <Route path=StaticSegment("schedules") view=|| section(RouteName::Schedules)/>
                <Route path=StaticSegment("sections") view=|| section(RouteName::Sections)/>
                <Route path=StaticSegment("section-subjects") view=|| section(RouteName::SectionSubjects)/>
                <Route
                    path=StaticSegment("section-subject-students")
                    view=|| section(RouteName::SectionSubjectStudents)
                />
                <Route
                    path=StaticSegment("section-subject-schedules")
                    view=|| section(RouteName::SectionSubjectSchedules)
                />
            </Routes>
        </Show>
    }
}

fn section(route: RouteName) -> impl IntoView {
    view! {
        <ConsoleShell>
            <SectionPage route/>
        </ConsoleShell>
    }
}
