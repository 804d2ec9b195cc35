//! Integration tests for the CRUD page: auth guard, loading, navigation and
//! row actions against a mocked API.
//!
//! ## Note on kittest table button clicks
//!
//! Clicks on buttons inside egui_extras `TableBuilder` rows do not reach the
//! widget under kittest. Row buttons are therefore asserted by query only and
//! their effect is simulated through `CrudTableView::request_*`, which is
//! exactly what the row buttons call. Buttons outside the table (toolbar,
//! banner, dialogs, drawer) are clicked for real.

mod common;

use admin_business::{AuthState, CrudError, ErrorKind, Uid};
use admin_ui::routes::default_routes;
use admin_ui::{AdminApp, PageContext};
use common::{mount_users, posts_body, setup, start_server, users_body};
use egui_kittest::Harness;
use kittest::Queryable;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

// ===========================================
// Auth guard
// ===========================================

#[tokio::test]
async fn test_logged_out_shows_sign_in_prompt() {
    let mock_server = start_server().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(users_body()))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut ctx = setup(mock_server, false);
    let harness = ctx.harness_mut();
    harness.step();

    assert!(harness.query_by_label_contains("Sign in required").is_some());
    assert!(harness.query_by_label("Alice").is_none());
    assert!(
        !harness
            .state()
            .active_page()
            .expect("users page")
            .is_mounted()
    );
}

#[tokio::test]
async fn test_sign_in_mounts_page_with_session_token() {
    let mock_server = start_server().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(header("authorization", "Bearer s3cret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(users_body()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut ctx = setup(mock_server, false);
    {
        let form = ctx.harness_mut().state_mut().sign_in_form_mut();
        form.username = "admin".to_owned();
        form.token = "s3cret".to_owned();
    }
    ctx.harness_mut().step();
    ctx.harness_mut().get_by_label("Sign in").click();
    ctx.harness_mut().step();
    ctx.wait_for_network().await;

    let harness = ctx.harness();
    assert!(harness.state().ctx().auth.is_logged_in());
    assert!(harness.query_by_label_contains("Signed in as admin").is_some());
    assert!(harness.query_by_label("Alice").is_some());
    assert!(harness.query_by_label("Bob").is_some());
}

#[tokio::test]
async fn test_sign_out_unmounts_page() {
    let mock_server = start_server().await;
    mount_users(&mock_server).await;

    let mut ctx = setup(mock_server, true);
    ctx.wait_for_network().await;
    assert!(ctx.harness().query_by_label("Alice").is_some());

    ctx.harness_mut().get_by_label("Sign out").click();
    ctx.harness_mut().step();
    ctx.harness_mut().step();

    let harness = ctx.harness();
    assert!(harness.query_by_label_contains("Sign in required").is_some());
    assert!(harness.query_by_label("Alice").is_none());
    assert!(!harness.state().pages().iter().any(|page| page.is_mounted()));
}

// ===========================================
// Loading
// ===========================================

#[tokio::test]
async fn test_records_render_with_permission_gated_actions() {
    let mock_server = start_server().await;
    mount_users(&mock_server).await;

    let mut ctx = setup(mock_server, true);
    ctx.wait_for_network().await;

    let harness = ctx.harness();
    assert!(harness.query_by_label("Alice").is_some());
    assert!(harness.query_by_label("bob@example.com").is_some());
    // Both rows are editable; the admin row cannot be deleted.
    assert_eq!(harness.query_all_by_label("Edit").count(), 2);
    assert_eq!(harness.query_all_by_label("Delete").count(), 1);
}

#[tokio::test]
async fn test_load_failure_offers_retry() {
    let mock_server = start_server().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "database down"})))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&mock_server)
        .await;
    mount_users(&mock_server).await;

    let mut ctx = setup(mock_server, true);
    ctx.wait_for_network().await;

    assert!(ctx.harness().query_by_label_contains("database down").is_some());
    assert!(ctx.harness().query_by_label("Alice").is_none());

    ctx.harness_mut().get_by_label("Retry").click();
    ctx.harness_mut().step();
    ctx.wait_for_network().await;

    let harness = ctx.harness();
    assert!(harness.query_by_label_contains("database down").is_none());
    assert!(harness.query_by_label("Alice").is_some());
}

#[tokio::test]
async fn test_failed_refresh_keeps_stale_records() {
    let mock_server = start_server().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(users_body()))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let mut ctx = setup(mock_server, true);
    ctx.wait_for_network().await;
    assert!(ctx.harness().query_by_label("Alice").is_some());

    ctx.harness_mut().get_by_label("Refresh").click();
    ctx.harness_mut().step();
    ctx.wait_for_network().await;

    let harness = ctx.harness();
    assert!(harness.query_by_label("Alice").is_some());
    assert!(harness.query_by_label_contains("server error (503)").is_some());
    assert!(harness.query_by_label("Retry").is_some());
}

#[tokio::test]
async fn test_mount_failure_waits_for_retry() {
    let mut page_ctx = PageContext::test("not a url");
    page_ctx.auth = AuthState::logged_in("tester", None);
    let routes = default_routes(page_ctx.config()).expect("default routes are valid");
    let app = AdminApp::new(page_ctx, routes);
    let mut harness = Harness::new_ui_state(|ui, app: &mut AdminApp| app.ui(ui), app);

    harness.step();
    harness.step();
    harness.step();

    let page = harness.state().active_page().expect("users page");
    assert!(!page.is_mounted());
    assert_eq!(
        page.mount_error().map(CrudError::kind),
        Some(ErrorKind::ValidationFailure)
    );
    assert!(harness.query_by_label_contains("Cannot reach the API").is_some());

    harness.get_by_label("Retry").click();
    harness.step();
    harness.step();
    assert!(harness.query_by_label_contains("Cannot reach the API").is_some());

    harness.get_by_label("Sign out").click();
    harness.step();
    let page = harness.state().active_page().expect("users page");
    assert!(page.mount_error().is_none());
    assert!(harness.query_by_label_contains("Sign in required").is_some());
}

// ===========================================
// Navigation
// ===========================================

#[tokio::test]
async fn test_navigation_switches_page_and_unmounts_previous() {
    let mock_server = start_server().await;
    mount_users(&mock_server).await;
    Mock::given(method("GET"))
        .and(path("/posts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(posts_body()))
        .mount(&mock_server)
        .await;

    let mut ctx = setup(mock_server, true);
    ctx.wait_for_network().await;
    assert!(ctx.harness().query_by_label("Bob").is_some());

    ctx.harness_mut().get_by_label("Posts").click();
    ctx.harness_mut().step();
    ctx.wait_for_network().await;

    let harness = ctx.harness();
    assert_eq!(harness.state().active(), 1);
    assert!(!harness.state().pages()[0].is_mounted());
    assert!(harness.state().pages()[1].is_mounted());
    assert!(harness.query_by_label("Hello world").is_some());
    assert!(harness.query_by_label("Bob").is_none());
    // Published posts are read only.
    assert_eq!(harness.query_all_by_label("Edit").count(), 1);
}

// ===========================================
// Row actions
// ===========================================

#[tokio::test]
async fn test_delete_after_confirmation() {
    let mock_server = start_server().await;
    mount_users(&mock_server).await;
    Mock::given(method("DELETE"))
        .and(path("/users/2"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut ctx = setup(mock_server, true);
    ctx.wait_for_network().await;

    ctx.harness_mut()
        .state_mut()
        .active_page_mut()
        .expect("users page")
        .view_mut()
        .request_delete(Uid::from(2));
    ctx.harness_mut().step();
    assert!(ctx.harness().query_by_label_contains("Are you sure").is_some());

    ctx.harness_mut().get_by_label("Confirm delete").click();
    ctx.harness_mut().step();
    ctx.wait_for_network().await;

    let harness = ctx.harness();
    assert!(harness.query_by_label("Bob").is_none());
    assert!(harness.query_by_label("Alice").is_some());
    assert!(harness.query_by_label_contains("Deleted record 2").is_some());
}

#[tokio::test]
async fn test_failed_delete_restores_row() {
    let mock_server = start_server().await;
    mount_users(&mock_server).await;
    Mock::given(method("DELETE"))
        .and(path("/users/2"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "locked"})))
        .mount(&mock_server)
        .await;

    let mut ctx = setup(mock_server, true);
    ctx.wait_for_network().await;

    ctx.harness_mut()
        .state_mut()
        .active_page_mut()
        .expect("users page")
        .view_mut()
        .request_delete(Uid::from(2));
    ctx.harness_mut().step();
    ctx.harness_mut().get_by_label("Confirm delete").click();
    ctx.harness_mut().step();
    ctx.wait_for_network().await;

    let harness = ctx.harness();
    assert!(harness.query_by_label("Bob").is_some());
    assert!(harness.query_by_label_contains("Could not remove record 2").is_some());
}

#[tokio::test]
async fn test_edit_sends_only_changed_fields() {
    let mock_server = start_server().await;
    mount_users(&mock_server).await;
    Mock::given(method("PUT"))
        .and(path("/users/2"))
        .and(body_json(json!({"name": "Robert"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 2, "name": "Robert", "email": "bob@example.com", "role": "member"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut ctx = setup(mock_server, true);
    ctx.wait_for_network().await;

    {
        let page = ctx
            .harness_mut()
            .state_mut()
            .active_page_mut()
            .expect("users page");
        let (table, view) = page.parts_mut().expect("page is mounted");
        view.request_edit(table, Uid::from(2));
        view.draft_mut()
            .expect("edit dialog is open")
            .set("name", "Robert");
    }
    ctx.harness_mut().step();
    ctx.harness_mut().get_by_label("Save").click();
    ctx.harness_mut().step();
    ctx.wait_for_network().await;

    let harness = ctx.harness();
    assert!(harness.query_by_label("Robert").is_some());
    assert!(harness.query_by_label("Bob").is_none());
    assert!(harness.query_by_label_contains("Updated record 2").is_some());
}
