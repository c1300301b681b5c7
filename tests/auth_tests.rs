//! 登录、会话与后台页面网关

#[macro_use]
mod common;

use actix_web::http::StatusCode;
use actix_web::http::header::LOCATION;
use actix_web::test::{self, TestRequest};
use serde_json::{Value, json};

use ainav::api::constants::{LOGIN_FAILED_MESSAGE, SESSION_COOKIE_NAME};
use ainav::errors::AinavError;
use ainav::services::account_service;
use common::{TestEnv, peer};

#[actix_rt::test]
async fn test_login_sets_session_cookie() {
    let env = TestEnv::new().await;
    let app = init_app!(env);

    let req = TestRequest::post()
        .uri("/api/auth/login")
        .peer_addr(peer())
        .set_json(json!({"username": "admin", "password": "admin123"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let cookie = resp
        .response()
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE_NAME)
        .expect("登录后应下发会话 Cookie");
    assert!(!cookie.value().is_empty());
    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(cookie.path(), Some("/"));
    assert!(env.ctx.sessions.shape_check(cookie.value()).is_some());

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["username"], "admin");
    assert!(body["data"]["id"].as_i64().unwrap() > 0);
}

#[actix_rt::test]
async fn test_login_failure_does_not_reveal_which_field_was_wrong() {
    let env = TestEnv::new().await;
    let app = init_app!(env);

    let mut bodies = Vec::new();
    for credentials in [
        json!({"username": "nobody", "password": "admin123"}),
        json!({"username": "admin", "password": "wrong-password"}),
    ] {
        let req = TestRequest::post()
            .uri("/api/auth/login")
            .peer_addr(peer())
            .set_json(credentials)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(
            resp.response()
                .cookies()
                .all(|c| c.name() != SESSION_COOKIE_NAME)
        );
        let body: Value = test::read_body_json(resp).await;
        bodies.push(body);
    }

    assert_eq!(bodies[0], bodies[1]);
    assert_eq!(bodies[0]["success"], false);
    assert_eq!(bodies[0]["data"], Value::Null);
}

#[tokio::test]
async fn test_unknown_user_and_wrong_password_fail_the_same_way() {
    let env = TestEnv::new().await;
    let storage = &env.ctx.storage;

    for (username, password) in [("nobody", "admin123"), ("admin", "wrong-password")] {
        match account_service::authenticate(storage, username, password).await {
            Err(AinavError::Validation(msg)) => assert_eq!(msg, LOGIN_FAILED_MESSAGE),
            other => panic!("{}: unexpected result {:?}", username, other.map(|a| a.id)),
        }
    }

    let admin = account_service::authenticate(storage, "admin", "admin123")
        .await
        .unwrap();
    assert_eq!(admin.username, "admin");
}

#[actix_rt::test]
async fn test_login_requires_both_fields() {
    let env = TestEnv::new().await;
    let app = init_app!(env);

    let req = TestRequest::post()
        .uri("/api/auth/login")
        .peer_addr(peer())
        .set_json(json!({"username": "admin"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Username and password are required");
}

#[actix_rt::test]
async fn test_login_is_rate_limited_per_peer() {
    let env = TestEnv::new().await;
    let app = init_app!(env);

    let mut statuses = Vec::new();
    for _ in 0..10 {
        let req = TestRequest::post()
            .uri("/api/auth/login")
            .peer_addr(peer())
            .set_json(json!({"username": "nobody", "password": "bad"}))
            .to_request();
        statuses.push(test::call_service(&app, req).await.status());
    }

    assert_eq!(statuses[0], StatusCode::BAD_REQUEST);
    assert!(statuses.contains(&StatusCode::TOO_MANY_REQUESTS));
}

#[actix_rt::test]
async fn test_logout_clears_cookie() {
    let env = TestEnv::new().await;
    let app = init_app!(env);

    let req = TestRequest::post().uri("/api/auth/logout").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let cookie = resp
        .response()
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE_NAME)
        .expect("登出应下发过期 Cookie");
    assert_eq!(cookie.value(), "");
    assert_eq!(
        cookie.max_age(),
        Some(actix_web::cookie::time::Duration::ZERO)
    );
}

#[actix_rt::test]
async fn test_admin_pages_redirect_without_session() {
    let env = TestEnv::new().await;
    let app = init_app!(env);

    for uri in ["/admin", "/admin/services", "/admin/tags/edit"] {
        let req = TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT, "{}", uri);
        assert_eq!(resp.headers().get(LOCATION).unwrap(), "/admin/login");
    }

    // 登录页本身不拦截
    let req = TestRequest::get().uri("/admin/login").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn test_garbage_token_is_redirected() {
    let env = TestEnv::new().await;
    let app = init_app!(env);

    let req = TestRequest::get()
        .uri("/admin")
        .cookie(actix_web::cookie::Cookie::new(SESSION_COOKIE_NAME, "not-a-token"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
}

#[actix_rt::test]
async fn test_token_for_missing_admin_passes_page_gate_but_not_api() {
    let env = TestEnv::new().await;
    let app = init_app!(env);

    let token = env.ctx.sessions.issue(9999).unwrap();
    let cookie = env.ctx.sessions.session_cookie(token);

    let req = TestRequest::get()
        .uri("/admin")
        .cookie(cookie.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = TestRequest::get()
        .uri("/api/admin/account")
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
}

#[actix_rt::test]
async fn test_admin_api_requires_cookie() {
    let env = TestEnv::new().await;
    let app = init_app!(env);

    for uri in ["/api/admin/tags", "/api/admin/stats", "/api/admin/settings"] {
        let req = TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{}", uri);
    }
}

#[actix_rt::test]
async fn test_change_password_then_login_with_new_one() {
    let env = TestEnv::new().await;
    let app = init_app!(env);
    let cookie = env.admin_cookie().await;

    let req = TestRequest::put()
        .uri("/api/admin/account/password")
        .cookie(cookie.clone())
        .set_json(json!({"oldPassword": "wrong", "newPassword": "n3w-password"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = TestRequest::put()
        .uri("/api/admin/account/password")
        .cookie(cookie)
        .set_json(json!({"oldPassword": "admin123", "newPassword": "n3w-password"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = TestRequest::post()
        .uri("/api/auth/login")
        .peer_addr(peer())
        .set_json(json!({"username": "admin", "password": "n3w-password"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}
