#![allow(dead_code)]

use std::time::Duration;

use admin_business::AuthState;
use admin_ui::routes::default_routes;
use admin_ui::{AdminApp, PageContext};
use egui_kittest::Harness;
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Default wait for a mocked round trip before running the next frame.
pub const DEFAULT_NETWORK_WAIT_MS: u64 = 50;
const NETWORK_ROUNDS: usize = 4;

pub struct TestCtx<'a> {
    mock_server: MockServer,
    harness: Harness<'a, AdminApp>,
}

impl<'a> TestCtx<'a> {
    pub fn harness_mut(&mut self) -> &mut Harness<'a, AdminApp> {
        &mut self.harness
    }

    pub fn harness(&self) -> &Harness<'a, AdminApp> {
        &self.harness
    }

    pub fn mock_server(&self) -> &MockServer {
        &self.mock_server
    }

    /// Sleep so spawned calls can finish, stepping frames in between.
    pub async fn wait_for_network(&mut self) {
        for _ in 0..NETWORK_ROUNDS {
            tokio::time::sleep(Duration::from_millis(DEFAULT_NETWORK_WAIT_MS)).await;
            self.harness.step();
        }
    }
}

pub fn users_body() -> Value {
    json!([
        {"id": 1, "name": "Alice", "email": "alice@example.com", "role": "admin"},
        {"id": 2, "name": "Bob", "email": "bob@example.com", "role": "member"}
    ])
}

pub fn posts_body() -> Value {
    json!({
        "data": [
            {"id": 10, "title": "Hello world", "author": "Alice", "published": true},
            {"id": 11, "title": "Draft notes", "author": "Carol", "published": false}
        ]
    })
}

pub async fn start_server() -> MockServer {
    let _ = env_logger::builder().is_test(true).try_init();
    MockServer::start().await
}

pub async fn mount_users(mock_server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(users_body()))
        .mount(mock_server)
        .await;
}

/// Build the app against `mock_server`. Mount mocks first: a signed-in
/// session loads its page on the very first frame.
pub fn setup<'a>(mock_server: MockServer, signed_in: bool) -> TestCtx<'a> {
    let mut ctx = PageContext::test(mock_server.uri());
    if signed_in {
        ctx.auth = AuthState::logged_in("tester", Some("test-token".to_owned()));
    }
    let routes = default_routes(ctx.config()).expect("default routes are valid");
    let app = AdminApp::new(ctx, routes);
    let harness = Harness::new_ui_state(|ui, app: &mut AdminApp| app.ui(ui), app);

    TestCtx {
        mock_server,
        harness,
    }
}
