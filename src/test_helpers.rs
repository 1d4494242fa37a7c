//! Shared fixtures for unit tests: a scripted resource client and an
//! in-memory snapshot slot.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::sync::oneshot;

use crate::config::ConsoleConfig;
use crate::net::api::{ApiRequest, HttpError, Method, ResourceClient};
use crate::net::types::Payload;
use crate::state::session::SessionStore;
use crate::util::ui_persistence::MemoryStorage;

type Reply = Result<Value, HttpError>;

enum Scripted {
    Ready(Reply),
    Held(oneshot::Receiver<Reply>),
}

/// Resource client that answers from a per-endpoint script.
///
/// Each `(method, path)` has a queue of replies; the last reply repeats once
/// the queue is down to one. Unscripted endpoints answer 404.
#[derive(Default)]
pub struct MockClient {
    script: RefCell<HashMap<(Method, String), VecDeque<Scripted>>>,
    log: RefCell<Vec<ApiRequest>>,
}

impl MockClient {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Queue a reply for `method path`.
    pub fn on(&self, method: Method, path: &str, reply: Reply) {
        self.script
            .borrow_mut()
            .entry((method, path.to_owned()))
            .or_default()
            .push_back(Scripted::Ready(reply));
    }

    /// Queue a reply that is only delivered once the returned sender fires.
    pub fn hold(&self, method: Method, path: &str) -> oneshot::Sender<Reply> {
        let (tx, rx) = oneshot::channel();
        self.script
            .borrow_mut()
            .entry((method, path.to_owned()))
            .or_default()
            .push_back(Scripted::Held(rx));
        tx
    }

    /// Every request sent so far, in order.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.log.borrow().clone()
    }

    /// `"METHOD path"` for every request sent so far.
    pub fn calls(&self) -> Vec<String> {
        self.log
            .borrow()
            .iter()
            .map(|r| format!("{} {}", r.method.as_str(), r.path))
            .collect()
    }

    fn next_reply(&self, method: Method, path: &str) -> Option<Scripted> {
        let mut script = self.script.borrow_mut();
        let queue = script.get_mut(&(method, path.to_owned()))?;
        if queue.len() > 1 || matches!(queue.front(), Some(Scripted::Held(_))) {
            return queue.pop_front();
        }
        match queue.front()? {
            Scripted::Ready(reply) => Some(Scripted::Ready(reply.clone())),
            Scripted::Held(_) => None,
        }
    }
}

#[async_trait(?Send)]
impl ResourceClient for MockClient {
    async fn send(&self, request: ApiRequest) -> Result<Value, HttpError> {
        let method = request.method;
        let path = request.path.clone();
        self.log.borrow_mut().push(request);
        match self.next_reply(method, &path) {
            Some(Scripted::Ready(reply)) => reply,
            Some(Scripted::Held(rx)) => rx
                .await
                .unwrap_or_else(|_| Err(HttpError::network("held reply dropped"))),
            None => Err(HttpError { status: Some(404), body: json!({"message": "Not Found"}) }),
        }
    }
}

/// Status + JSON body failure.
pub fn http_error(status: u16, body: Value) -> HttpError {
    HttpError { status: Some(status), body }
}

/// Current-user response for user `id`, in the server's `data` envelope.
pub fn user_body(id: u64, name: &str) -> Value {
    json!({"data": {"id": id, "name": name, "email": format!("{name}@example.edu"), "role": "admin"}})
}

/// Build a payload from a JSON object literal.
pub fn payload(value: Value) -> Payload {
    match value {
        Value::Object(map) => map,
        other => panic!("payload must be an object, got {other}"),
    }
}

/// Script the happy path of the anti-forgery endpoint.
pub fn allow_csrf(client: &MockClient) {
    client.on(Method::Get, "/sanctum/csrf-cookie", Ok(Value::Null));
}

/// Session store over `client` and `storage` with default config.
pub fn store_with(client: &Rc<MockClient>, storage: &Rc<MemoryStorage>) -> Rc<SessionStore> {
    let config = ConsoleConfig::default();
    Rc::new(SessionStore::new(client.clone(), storage.clone(), &config))
}
