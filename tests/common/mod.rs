//! In-process stub of the rental API for integration tests
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use serde_json::{json, Value};

use costumerie::api::ApiClient;
use costumerie::config::Config;
use costumerie::models::UserRole;
use costumerie::session::{MemoryTokenStore, Session};

pub const TOKEN: &str = "test-token";

/// A request the stub received
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

#[derive(Default)]
struct Inner {
    routes: HashMap<(String, String), (u16, String)>,
    requests: Vec<Recorded>,
}

/// Canned responses keyed by method and path, plus a log of every request
#[derive(Clone, Default)]
pub struct StubBackend {
    inner: Arc<Mutex<Inner>>,
}

impl StubBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `method path` with `status` and a JSON body; replaces any earlier answer
    pub fn respond(&self, method: &str, path: &str, status: u16, body: Value) {
        self.respond_raw(method, path, status, &body.to_string());
    }

    pub fn respond_raw(&self, method: &str, path: &str, status: u16, body: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner
            .routes
            .insert((method.to_string(), path.to_string()), (status, body.to_string()));
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.inner.lock().unwrap().requests.clone()
    }

    /// Requests matching `method path`
    pub fn requests_to(&self, method: &str, path: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }

    /// Serve on an ephemeral port; returns the API base URL
    pub async fn start(&self) -> String {
        let app = Router::new().fallback(handle).with_state(self.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/api", addr)
    }
}

async fn handle(
    State(stub): State<StubBackend>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri
        .path()
        .strip_prefix("/api")
        .unwrap_or(uri.path())
        .to_string();
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = serde_json::from_slice::<Value>(&body).ok();

    let mut inner = stub.inner.lock().unwrap();
    inner.requests.push(Recorded {
        method: method.to_string(),
        path: path.clone(),
        authorization,
        body,
    });

    let (status, body) = inner
        .routes
        .get(&(method.to_string(), path))
        .cloned()
        .unwrap_or((404, json!({ "message": "Not found" }).to_string()));
    (
        StatusCode::from_u16(status).unwrap(),
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response()
}

pub fn client(base_url: &str) -> ApiClient {
    let config = Config::default().with_base_url(base_url).unwrap();
    ApiClient::new(&config).unwrap()
}

pub fn user_json(id: u64, name: &str, role: UserRole) -> Value {
    json!({
        "id": id,
        "name": name,
        "email": format!("{}@example.com", name.to_lowercase()),
        "role": role.as_str(),
    })
}

pub fn costume_json(id: u64, name: &str, price: &str, size: &str, city: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "description": format!("{} costume", name),
        "price": price,
        "image_url": null,
        "size": size,
        "seller": { "id": 2, "name": "Sam", "city": city },
        "is_available": true,
    })
}

pub fn period_json(id: u64, costume_id: u64, from: &str, to: &str, status: &str) -> Value {
    json!({
        "id": id,
        "costume_id": costume_id,
        "client_name": "Alice",
        "client_phone": "0600000000",
        "from_date": from,
        "to_date": to,
        "status": status,
    })
}

/// Stub `/login` and `/me` for `role`, then sign in with an in-memory store
pub async fn signed_in(stub: &StubBackend, base_url: &str, role: UserRole) -> Session {
    let user = user_json(1, "Robin", role);
    stub.respond("POST", "/login", 200, json!({ "user": user, "token": TOKEN }));
    stub.respond("GET", "/me", 200, json!({ "user": user }));

    let mut session = Session::new(client(base_url), Arc::new(MemoryTokenStore::new()));
    session.login("robin@example.com", "pw").await.unwrap();
    session
}
