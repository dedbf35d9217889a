use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::{Request, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use careadmin_auth::{Action, Module, PermissionSet, has_action};
use careadmin_client::dto::{NewStaff, StaffUpdate};
use careadmin_client::{ApiClient, ClientError, CookieJar, CookieStore, TOKEN_COOKIE};
use careadmin_core::{FacilityId, FacilityKind, LocationId, LocationQuery, StaffId};
use serde_json::{Value, json};

#[derive(Debug, Clone)]
struct Recorded {
    method: String,
    path: String,
    query: Option<String>,
    authorization: Option<String>,
    request_id: Option<String>,
    body: Value,
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
    let header_str = |name: &str| {
        parts
            .headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    state.seen.lock().unwrap().push(Recorded {
        method: parts.method.to_string(),
        path: parts.uri.path().to_string(),
        query: parts.uri.query().map(str::to_string),
        authorization: header_str("authorization"),
        request_id: header_str("x-request-id"),
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

struct MockServer {
    base_url: String,
    state: Arc<MockState>,
    handle: tokio::task::JoinHandle<()>,
}

impl MockServer {
    async fn spawn() -> Self {
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

    fn respond(&self, method: &str, path: &str, status: StatusCode, body: Value) {
        self.respond_with_cookie(method, path, status, body, None);
    }

    fn respond_with_cookie(
        &self,
        method: &str,
        path: &str,
        status: StatusCode,
        body: Value,
        set_cookie: Option<&'static str>,
    ) {
        self.state.routes.lock().unwrap().insert(
            format!("{method} {path}"),
            Canned {
                status,
                body,
                set_cookie,
            },
        );
    }

    fn seen(&self) -> Vec<Recorded> {
        self.state.seen.lock().unwrap().clone()
    }

    fn client(&self) -> (ApiClient, Arc<CookieJar>) {
        let jar = Arc::new(CookieJar::in_memory());
        let client = ApiClient::new(&self.base_url, jar.clone()).unwrap();
        (client, jar)
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[tokio::test]
async fn login_stores_token_and_later_requests_carry_bearer() {
    let srv = MockServer::spawn().await;
    srv.respond_with_cookie(
        "POST",
        "/api/admin/login",
        StatusCode::OK,
        json!({
            "success": true,
            "data": { "admin": {
                "_id": "a1",
                "name": "Asha",
                "email": "asha@example.com",
                "systemrole": "HealthcareAdmin",
                "permissions": { "role": "HealthcareAdmin" }
            } }
        }),
        Some("adminToken=tok-1; Path=/; HttpOnly"),
    );
    srv.respond("GET", "/api/facilities/hospitals", StatusCode::OK, json!({ "data": [] }));

    let (client, jar) = srv.client();
    assert!(!client.is_authenticated());

    let admin = client.login("asha@example.com", "secret").await.unwrap().unwrap();
    assert_eq!(admin.name, "Asha");
    assert!(has_action(admin.permissions.as_ref(), Module::Facilities, Action::Delete));
    assert_eq!(jar.get(TOKEN_COOKIE).as_deref(), Some("tok-1"));

    client.list_facilities(FacilityKind::Hospital).await.unwrap();

    let seen = srv.seen();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].authorization, None);
    assert_eq!(seen[0].body, json!({ "email": "asha@example.com", "password": "secret" }));
    assert_eq!(seen[1].authorization.as_deref(), Some("Bearer tok-1"));
    assert!(seen.iter().all(|r| r.request_id.is_some()));
    assert_ne!(seen[0].request_id, seen[1].request_id);
}

#[tokio::test]
async fn login_rejection_keeps_server_error() {
    let srv = MockServer::spawn().await;
    srv.respond(
        "POST",
        "/api/admin/login",
        StatusCode::OK,
        json!({ "success": false, "error": "Account disabled" }),
    );
    let (client, _) = srv.client();

    let err = client.login("a@b.c", "x").await.unwrap_err();
    assert!(matches!(err, ClientError::Rejected(_)));
    assert_eq!(err.error_or("Invalid credentials"), "Account disabled");
}

#[tokio::test]
async fn error_status_exposes_body_fields() {
    let srv = MockServer::spawn().await;
    srv.respond(
        "DELETE",
        "/api/facilities/clinics/c1",
        StatusCode::CONFLICT,
        json!({ "error": "Clinic has active locations", "message": "Conflict" }),
    );
    let (client, _) = srv.client();

    let err = client
        .delete_facility(FacilityKind::Clinic, &FacilityId::from_server("c1"))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(409));
    assert_eq!(err.user_message("Failed to delete clinic"), "Clinic has active locations");
    assert_eq!(err.detailed_message("x"), "Conflict");
}

#[tokio::test]
async fn facility_list_tolerates_missing_data() {
    let srv = MockServer::spawn().await;
    srv.respond("GET", "/api/facilities/clinics", StatusCode::OK, json!({ "success": true }));
    srv.respond(
        "GET",
        "/api/facilities/hospitals",
        StatusCode::OK,
        json!({ "data": [{ "_id": "h1", "name": "City General", "registrationNumber": "REG-1" }] }),
    );
    let (client, _) = srv.client();

    assert!(client.list_facilities(FacilityKind::Clinic).await.unwrap().is_empty());
    let hospitals = client.list_facilities(FacilityKind::Hospital).await.unwrap();
    assert_eq!(hospitals[0].registration_number, "REG-1");
}

#[tokio::test]
async fn password_reset_sends_only_the_password() {
    let srv = MockServer::spawn().await;
    srv.respond("PUT", "/api/facilities/hospitals/h1", StatusCode::OK, json!({ "success": true }));
    let (client, _) = srv.client();

    client
        .reset_facility_password(FacilityKind::Hospital, &FacilityId::from_server("h1"), "n3wpass")
        .await
        .unwrap();
    assert_eq!(srv.seen()[0].body, json!({ "superAdminPassword": "n3wpass" }));
}

#[tokio::test]
async fn staff_endpoints_round_trip() {
    let srv = MockServer::spawn().await;
    srv.respond(
        "GET",
        "/api/admin/staffs",
        StatusCode::OK,
        json!({ "users": { "staffs": [{ "id": "s1", "name": "Ravi", "permissions": ["reports"] }] } }),
    );
    srv.respond(
        "GET",
        "/api/admin/staffs/s1",
        StatusCode::OK,
        json!({ "staff": { "name": "Ravi", "email": "ravi@example.com", "permissions": { "manageHome": true } } }),
    );
    srv.respond(
        "PUT",
        "/api/admin/staffs/s1/permissions",
        StatusCode::OK,
        json!({ "success": true }),
    );
    srv.respond(
        "POST",
        "/api/admin/create-staff",
        StatusCode::OK,
        json!({ "success": false, "error": "Email already registered" }),
    );
    let (client, _) = srv.client();

    let staff = client.list_staff().await.unwrap();
    assert_eq!(staff[0].name, "Ravi");

    let id = StaffId::from_server("s1");
    let detail = client.get_staff(&id).await.unwrap();
    assert_eq!(detail.email.as_deref(), Some("ravi@example.com"));

    let update = StaffUpdate {
        name: "Ravi".into(),
        email: "ravi@example.com".into(),
        phone: String::new(),
        permissions: PermissionSet::edit_template(),
    };
    client.update_staff(&id, &update).await.unwrap();
    let sent = &srv.seen()[2].body;
    assert_eq!(sent["permissions"]["manageFacilities"], json!(false));
    assert_eq!(sent["permissions"]["facilitiesActions"]["delete"], json!(false));

    let new = NewStaff {
        name: "Dup".into(),
        email: "ravi@example.com".into(),
        phone: String::new(),
        password: "secret1".into(),
        permissions: PermissionSet::create_template(),
    };
    let err = client.create_staff(&new).await.unwrap_err();
    assert_eq!(err.error_or("Failed to create staff."), "Email already registered");
}

#[tokio::test]
async fn location_queries_are_encoded() {
    let srv = MockServer::spawn().await;
    srv.respond(
        "GET",
        "/api/locations/facility/h1",
        StatusCode::OK,
        json!({ "success": true, "data": [{
            "_id": "l1", "facilityId": "h1", "facilityType": "Hospital", "branchName": "Main"
        }] }),
    );
    srv.respond("GET", "/api/locations/l1/stats", StatusCode::OK, json!({ "data": { "visits": 42 } }));
    let (client, _) = srv.client();

    let query = LocationQuery {
        city: Some("Pune".into()),
        is_active: Some(true),
        ..Default::default()
    };
    let locs = client
        .locations_by_facility(&FacilityId::from_server("h1"), &query)
        .await
        .unwrap();
    assert_eq!(locs[0].branch_name, "Main");
    assert_eq!(srv.seen()[0].query.as_deref(), Some("city=Pune&isActive=true"));

    let stats = client.location_stats(&LocationId::from_server("l1")).await.unwrap();
    assert_eq!(stats["visits"], json!(42));
}

#[tokio::test]
async fn server_cleared_cookie_drops_bearer() {
    let srv = MockServer::spawn().await;
    srv.respond_with_cookie(
        "POST",
        "/api/admin/logout",
        StatusCode::OK,
        json!({ "success": true }),
        Some("adminToken=; Path=/; Max-Age=0"),
    );
    let (client, jar) = srv.client();
    jar.set(TOKEN_COOKIE, "tok-2");

    client.logout().await.unwrap();
    assert_eq!(srv.seen()[0].authorization.as_deref(), Some("Bearer tok-2"));
    assert!(!client.is_authenticated());
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = ApiClient::new(format!("http://{addr}"), Arc::new(CookieJar::in_memory())).unwrap();
    let err = client.list_staff().await.unwrap_err();
    assert!(matches!(err, ClientError::Network(_)));
    assert_eq!(err.error_or("Failed to load platform staffs"), "Failed to load platform staffs");
}
