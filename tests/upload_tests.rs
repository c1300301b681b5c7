//! 上传集成测试

#[macro_use]
mod common;

use actix_web::http::StatusCode;
use actix_web::http::header::CONTENT_TYPE;
use actix_web::test::{self, TestRequest};
use serde_json::{Value, json};

use common::{TEST_MAX_UPLOAD, TestEnv};

const BOUNDARY: &str = "ainav-test-boundary";

fn multipart_body(kind: &str, filename: &str, mime: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"type\"\r\n\r\n{kind}\r\n",
            b = BOUNDARY,
            kind = kind
        )
        .as_bytes(),
    );
    body.extend_from_slice(
        format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{f}\"\r\nContent-Type: {m}\r\n\r\n",
            b = BOUNDARY,
            f = filename,
            m = mime
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn upload_request(body: Vec<u8>) -> TestRequest {
    TestRequest::post()
        .uri("/api/admin/upload")
        .insert_header((
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        ))
        .set_payload(body)
}

#[actix_rt::test]
async fn test_upload_and_banner_delete_removes_file() {
    let env = TestEnv::new().await;
    let app = init_app!(env);
    let cookie = env.admin_cookie().await;

    let req = upload_request(multipart_body("banner", "hero.png", "image/png", b"fake-png"))
        .cookie(cookie.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    let url = body["data"]["url"].as_str().unwrap().to_string();
    assert!(url.starts_with("/uploads/banners/banner_"));
    assert!(url.ends_with(".png"));

    let file_path = env.ctx.uploads.resolve(&url).unwrap();
    assert_eq!(std::fs::read(&file_path).unwrap(), b"fake-png");

    let req = TestRequest::post()
        .uri("/api/admin/banners")
        .cookie(cookie.clone())
        .set_json(json!({
            "title": "Hero",
            "url": "https://example.com",
            "imageUrl": url,
            "isActive": true
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let banner_id = body["data"]["id"].as_i64().unwrap();

    let req = TestRequest::get().uri("/api/banner").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["id"], banner_id);

    let req = TestRequest::delete()
        .uri(&format!("/api/admin/banners/{}", banner_id))
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(!file_path.exists());
}

#[actix_rt::test]
async fn test_oversized_upload_is_rejected_without_writing() {
    let env = TestEnv::new().await;
    let app = init_app!(env);

    let data = vec![0u8; TEST_MAX_UPLOAD + 1];
    let req = upload_request(multipart_body("icon", "big.png", "image/png", &data))
        .cookie(env.admin_cookie().await)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert!(!env.upload_root().join("icons").exists());
}

#[actix_rt::test]
async fn test_unsupported_type_is_rejected_without_writing() {
    let env = TestEnv::new().await;
    let app = init_app!(env);

    let req = upload_request(multipart_body(
        "icon",
        "doc.pdf",
        "application/pdf",
        b"%PDF-1.4",
    ))
    .cookie(env.admin_cookie().await)
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(!env.upload_root().exists());
}

#[actix_rt::test]
async fn test_upload_requires_admin_session() {
    let env = TestEnv::new().await;
    let app = init_app!(env);

    let req = upload_request(multipart_body("icon", "a.png", "image/png", b"x")).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(!env.upload_root().exists());
}

#[actix_rt::test]
async fn test_missing_file_field() {
    let env = TestEnv::new().await;
    let app = init_app!(env);

    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"type\"\r\n\r\nicon\r\n--{b}--\r\n",
        b = BOUNDARY
    );
    let req = upload_request(body.into_bytes())
        .cookie(env.admin_cookie().await)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "No file uploaded");
}

#[actix_rt::test]
async fn test_truncated_type_field_is_rejected() {
    let env = TestEnv::new().await;
    let app = init_app!(env);

    // type 字段没有结束边界，读取时报错
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"type\"\r\n\r\nbanner",
        b = BOUNDARY
    );
    let req = upload_request(body.into_bytes())
        .cookie(env.admin_cookie().await)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .starts_with("Failed to read upload type")
    );
    assert!(!env.upload_root().exists());
}
