#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::{Request, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use careadmin_auth::{AdminIdentity, LocalStorage, MemoryStorage, PermissionSet};
use careadmin_client::{ApiClient, CookieJar};
use careadmin_console::{App, Prompt, Toaster};
use serde_json::{Value, json};

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: Value,
}

#[derive(Clone)]
struct Canned {
    status: StatusCode,
    body: Value,
    set_cookie: Option<&'static str>,
}

#[derive(Default)]
struct MockState {
    routes: Mutex<HashMap<String, Canned>>,
    seen: Mutex<Vec<Recorded>>,
}

async fn handle(State(state): State<Arc<MockState>>, req: Request) -> Response {
    let (parts, body) = req.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    state.seen.lock().unwrap().push(Recorded {
        method: parts.method.to_string(),
        path: parts.uri.path().to_string(),
        query: parts.uri.query().map(str::to_string),
        authorization: parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: serde_json::from_slice(&bytes).unwrap_or(Value::Null),
    });

    let key = format!("{} {}", parts.method, parts.uri.path());
    let canned = state.routes.lock().unwrap().get(&key).cloned();
    match canned {
        Some(c) => {
            let mut resp = (c.status, axum::Json(c.body)).into_response();
            if let Some(cookie) = c.set_cookie {
                resp.headers_mut()
                    .append(header::SET_COOKIE, HeaderValue::from_static(cookie));
            }
            resp
        }
        None => (StatusCode::NOT_FOUND, axum::Json(json!({ "error": "no route" }))).into_response(),
    }
}

/// In-process stand-in for the platform API; aborted on drop.
pub struct MockServer {
    base_url: String,
    state: Arc<MockState>,
    handle: tokio::task::JoinHandle<()>,
}

impl MockServer {
    pub async fn spawn() -> Self {
        let state = Arc::new(MockState::default());
        let app = Router::new().fallback(handle).with_state(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Self {
            base_url: format!("http://{addr}"),
            state,
            handle,
        }
    }

    pub fn respond(&self, method: &str, path: &str, status: StatusCode, body: Value) {
        self.insert(method, path, status, body, None);
    }

    pub fn respond_with_cookie(&self, method: &str, path: &str, body: Value, cookie: &'static str) {
        self.insert(method, path, StatusCode::OK, body, Some(cookie));
    }

    fn insert(&self, method: &str, path: &str, status: StatusCode, body: Value, set_cookie: Option<&'static str>) {
        self.state.routes.lock().unwrap().insert(
            format!("{method} {path}"),
            Canned {
                status,
                body,
                set_cookie,
            },
        );
    }

    pub fn seen(&self) -> Vec<Recorded> {
        self.state.seen.lock().unwrap().clone()
    }

    pub fn seen_path(&self, method: &str, path: &str) -> Option<Recorded> {
        self.seen()
            .into_iter()
            .find(|r| r.method == method && r.path == path)
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Fixed confirmation answer; text prompts are not expected in tests.
pub struct ScriptedPrompt {
    pub answer: bool,
}

impl Prompt for ScriptedPrompt {
    fn confirm(&self, _question: &str) -> bool {
        self.answer
    }

    fn password(&self, _label: &str) -> std::io::Result<String> {
        Err(std::io::Error::other("no terminal in tests"))
    }

    fn line(&self, _label: &str) -> std::io::Result<String> {
        Err(std::io::Error::other("no terminal in tests"))
    }
}

pub struct Harness {
    pub app: App,
    pub storage: Arc<MemoryStorage>,
    pub jar: Arc<CookieJar>,
}

pub fn harness(srv: &MockServer, confirm: bool) -> Harness {
    let storage = Arc::new(MemoryStorage::new());
    let jar = Arc::new(CookieJar::in_memory());
    let client = ApiClient::new(&srv.base_url, jar.clone()).unwrap();
    let shared: Arc<dyn LocalStorage> = storage.clone();
    let app = App::new(
        client,
        shared,
        Toaster::new(false),
        Box::new(ScriptedPrompt { answer: confirm }),
    );
    Harness { app, storage, jar }
}

/// Sign in locally with the given permission document.
pub fn sign_in(app: &App, permissions: Value) {
    let mut admin = AdminIdentity::new("Asha Rao", "asha@platform.test");
    admin.permissions = Some(PermissionSet::from_value(&permissions));
    app.auth.login(admin).unwrap();
}

pub fn facility(id: &str, name: &str, reg: &str) -> Value {
    json!({
        "_id": id,
        "name": name,
        "registrationNumber": reg,
        "email": format!("{id}@x.test"),
        "phone": "080-1",
        "address": { "street": "1 Main", "city": "Pune", "state": "MH", "pincode": "411001" }
    })
}
