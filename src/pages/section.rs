//! Generic collection page used by every CRUD section of the console.
//!
//! Lists the collection behind the route and lets the user delete rows.
//! Editing forms are out of scope; rows show an id and a best-effort label.

#[cfg(test)]
#[path = "section_test.rs"]
mod section_test;

use std::rc::Rc;

use leptos::prelude::*;
use serde_json::Value;

use crate::app::ApiHandle;
use crate::components::toast::Toasts;
use crate::net::api::ResourceClient;
use crate::net::resource::Resource;
use crate::router::RouteName;

/// Collection behind `route`, if the route lists one.
pub(crate) fn resource_for(route: RouteName, client: Rc<dyn ResourceClient>) -> Option<Resource> {
    let resource = match route {
        RouteName::Users => Resource::users(client),
        RouteName::Students => Resource::students(client),
        RouteName::Faculty => Resource::faculty(client),
        RouteName::Devices => Resource::devices(client),
        RouteName::DeviceBoards => Resource::device_boards(client),
        RouteName::Rooms => Resource::rooms(client),
        RouteName::Subjects => Resource::subjects(client),
        RouteName::Schedules => Resource::schedules(client),
        RouteName::Sections => Resource::sections(client),
        RouteName::SectionSubjects => Resource::section_subjects(client),
        RouteName::SectionSubjectStudents => Resource::section_subject_students(client),
        RouteName::SectionSubjectSchedules => Resource::section_subject_schedules(client),
        RouteName::Dashboard | RouteName::Profile | RouteName::SignIn | RouteName::SignUp | RouteName::ForgotPassword => {
            return None;
        }
    };
    Some(resource)
}

/// One listed row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Row {
    pub id: String,
    pub label: String,
}

/// Rows of a list response. Accepts `{"data": [...]}` or a bare array; rows
/// without an id are skipped.
pub(crate) fn rows_from(body: &Value) -> Vec<Row> {
    let items = match body {
        Value::Array(items) => items.as_slice(),
        other => other.get("data").and_then(Value::as_array).map_or(&[][..], Vec::as_slice),
    };
    items
        .iter()
        .filter_map(|item| {
            let id = match item.get("id")? {
                Value::String(id) => id.clone(),
                Value::Number(id) => id.to_string(),
                _ => return None,
            };
            Some(Row { label: row_label(item, &id), id })
        })
        .collect()
}

fn row_label(item: &Value, id: &str) -> String {
    ["name", "title", "code", "email"]
        .iter()
        .find_map(|key| item.get(*key).and_then(Value::as_str))
        .filter(|label| !label.trim().is_empty())
        .map_or_else(|| format!("#{id}"), str::to_owned)
}

#[component]
pub fn SectionPage(route: RouteName) -> impl IntoView {
    let api = expect_context::<ApiHandle>();
    let toasts = expect_context::<Toasts>();

    let rows = RwSignal::new(Vec::<Row>::new());
    let loading = RwSignal::new(true);
    let resource = StoredValue::new_local(resource_for(route, api.client()));

    if let Some(resource) = resource.get_value() {
        leptos::task::spawn_local(async move {
            match resource.list().await {
                Ok(body) => rows.set(rows_from(&body)),
                Err(err) => toasts.error(&err, Some(&format!("Could not load {}", route.title().to_lowercase()))),
            }
            loading.set(false);
        });
    } else {
        loading.set(false);
    }

    let on_delete = move |id: String| {
        let Some(resource) = resource.get_value() else {
            return;
        };
        leptos::task::spawn_local(async move {
            match resource.delete(&id).await {
                Ok(()) => {
                    rows.update(|rows| rows.retain(|row| row.id != id));
                    toasts.success("Deleted.");
                }
                Err(err) => toasts.error(&err, None),
            }
        });
    };

    view! {
        <section class="section-page">
            <h1>{route.title()}</h1>
            <Show when=move || !loading.get() fallback=|| view! { <p class="section-page__loading">"Loading..."</p> }>
                <Show
                    when=move || !rows.with(Vec::is_empty)
                    fallback=|| view! { <p class="section-page__empty">"Nothing here yet."</p> }
                >
                    <table class="section-page__table">
                        <tbody>
                            <For
                                each=move || rows.get()
                                key=|row| row.id.clone()
                                children=move |row| {
                                    let id = row.id.clone();
                                    view! {
                                        <tr>
                                            <td>{row.id}</td>
                                            <td>{row.label}</td>
                                            <td>
                                                <button on:click=move |_| on_delete(id.clone())>"Delete"</button>
                                            </td>
                                        </tr>
                                    }
                                }
                            />
                        </tbody>
                    </table>
                </Show>
            </Show>
        </section>
    }
}
