//! CRUD access to the console's REST collections.
//!
//! SYSTEM CONTEXT
//! ==============
//! Pages never talk to a transport directly. They get a [`Resource`] for a
//! collection (`/api/users`, `/api/rooms`, ...) whose client is a
//! [`SessionBoundClient`], so every 401 from any collection is reported to the
//! session store and ends the session in one place.
//!
//! Response bodies are returned as raw JSON; the server's collection shapes
//! are not modelled here.

#[cfg(test)]
#[path = "resource_test.rs"]
mod resource_test;

use std::rc::Rc;

use async_trait::async_trait;
use serde_json::Value;

use super::api::{ApiRequest, HttpError, ResourceClient};
use super::types::{AuthError, Payload};
use crate::state::session::SessionStore;

const REQUEST_FAILED: &str = "Request failed";
const UNAUTHENTICATED: &str = "Unauthenticated.";

// =============================================================================
// SESSION-BOUND CLIENT
// =============================================================================

/// Transport wrapper that reports failures to the session store.
///
/// The generation is captured before the request goes out, so a 401 for a
/// request sent before a re-login cannot sign the new session out.
pub struct SessionBoundClient {
    inner: Rc<dyn ResourceClient>,
    session: Rc<SessionStore>,
}

impl SessionBoundClient {
    #[must_use]
    pub fn new(inner: Rc<dyn ResourceClient>, session: Rc<SessionStore>) -> Self {
        Self { inner, session }
    }
}

#[async_trait(?Send)]
impl ResourceClient for SessionBoundClient {
    async fn send(&self, request: ApiRequest) -> Result<Value, HttpError> {
        let issued_in = self.session.generation();
        let result = self.inner.send(request).await;
        if let Err(err) = &result {
            if err.status == Some(401) {
                self.session
                    .observe_failure(issued_in, &AuthError::from_http(err.clone(), UNAUTHENTICATED));
            }
        }
        result
    }
}

// =============================================================================
// RESOURCE
// =============================================================================

/// One REST collection, optionally narrowed to a fixed filter for listing.
#[derive(Clone)]
pub struct Resource {
    client: Rc<dyn ResourceClient>,
    collection: &'static str,
    scope: Option<(&'static str, &'static str)>,
}

macro_rules! collections {
    ($($name:ident => $path:literal),* $(,)?) => {
        impl Resource {
            $(
                #[must_use]
                pub fn $name(client: Rc<dyn ResourceClient>) -> Self {
                    Self::new(client, $path)
                }
            )*
        }
    };
}

collections! {
    users => "/api/users",
    devices => "/api/devices",
    device_boards => "/api/device-boards",
    rooms => "/api/rooms",
    subjects => "/api/subjects",
    schedules => "/api/schedules",
    sections => "/api/sections",
    section_subjects => "/api/section-subjects",
    section_subject_students => "/api/section-subject-students",
    section_subject_schedules => "/api/section-subject-schedules",
}

impl Resource {
    #[must_use]
    pub fn new(client: Rc<dyn ResourceClient>, collection: &'static str) -> Self {
        Self { client, collection, scope: None }
    }

    /// Students are users with the `STUDENT` role.
    #[must_use]
    pub fn students(client: Rc<dyn ResourceClient>) -> Self {
        Self::users(client).scoped("role", "STUDENT")
    }

    /// Faculty are users with the `FACULTY` role.
    #[must_use]
    pub fn faculty(client: Rc<dyn ResourceClient>) -> Self {
        Self::users(client).scoped("role", "FACULTY")
    }

    /// Apply `key=value` to every listing.
    #[must_use]
    pub fn scoped(mut self, key: &'static str, value: &'static str) -> Self {
        self.scope = Some((key, value));
        self
    }

    #[must_use]
    pub fn collection(&self) -> &'static str {
        self.collection
    }

    /// # Errors
    ///
    /// Returns the classified transport failure.
    pub async fn list(&self) -> Result<Value, AuthError> {
        self.call(self.listing()).await
    }

    /// # Errors
    ///
    /// Returns the classified transport failure.
    pub async fn get(&self, id: &str) -> Result<Value, AuthError> {
        self.call(ApiRequest::get(self.member(id))).await
    }

    /// # Errors
    ///
    /// Returns the classified transport failure; 422 carries field errors.
    pub async fn create(&self, data: &Payload) -> Result<Value, AuthError> {
        self.call(ApiRequest::post(self.collection).json(Value::Object(data.clone())))
            .await
    }

    /// # Errors
    ///
    /// Returns the classified transport failure; 422 carries field errors.
    pub async fn update(&self, id: &str, data: &Payload) -> Result<Value, AuthError> {
        self.call(ApiRequest::put(self.member(id)).json(Value::Object(data.clone())))
            .await
    }

    /// # Errors
    ///
    /// Returns the classified transport failure.
    pub async fn delete(&self, id: &str) -> Result<(), AuthError> {
        self.call(ApiRequest::delete(self.member(id))).await.map(|_| ())
    }

    /// Size of the collection from `GET <collection>/count`, which answers
    /// `{"data": {"count": n}}`.
    ///
    /// # Errors
    ///
    /// Returns the classified transport failure, or `Decode` when the count
    /// is missing.
    pub async fn count(&self) -> Result<u64, AuthError> {
        let body = self.call(ApiRequest::get(self.member("count"))).await?;
        body.pointer("/data/count")
            .and_then(Value::as_u64)
            .ok_or_else(|| AuthError::Decode(format!("no count in {} response", self.collection)))
    }

    fn listing(&self) -> ApiRequest {
        let request = ApiRequest::get(self.collection);
        match self.scope {
            Some((key, value)) => request.query(key, value),
            None => request,
        }
    }

    fn member(&self, id: &str) -> String {
        format!("{}/{id}", self.collection)
    }

    async fn call(&self, request: ApiRequest) -> Result<Value, AuthError> {
        let method = request.method;
        let path = request.path.clone();
        self.client.send(request).await.map_err(|err| {
            let err = AuthError::from_http(err, REQUEST_FAILED);
            leptos::logging::warn!("{} {path} failed: {err}", method.as_str());
            err
        })
    }
}
