//! 目录 API 集成测试：分类、服务、标签、搜索、点击、初始化

#[macro_use]
mod common;

use actix_web::cookie::Cookie;
use actix_web::http::StatusCode;
use actix_web::http::header::CACHE_CONTROL;
use actix_web::test::{self, TestRequest};
use serde_json::{Value, json};

use ainav::storage::{SeaOrmStorage, ServiceInput};
use common::TestEnv;

async fn first_category_id(storage: &SeaOrmStorage) -> i32 {
    storage.list_categories().await.unwrap()[0].id
}

async fn add_service(
    storage: &SeaOrmStorage,
    name: &str,
    category_id: i32,
    tag_ids: Vec<i32>,
) -> i32 {
    storage
        .create_service(ServiceInput {
            name: Some(name.to_string()),
            url: Some(format!("https://{}.example.com", name.to_lowercase())),
            description: Some(format!("{} description", name)),
            icon: None,
            category_id: Some(category_id),
            tag_ids: Some(tag_ids),
        })
        .await
        .unwrap()
        .service
        .id
}

#[actix_rt::test]
async fn test_init_is_idempotent() {
    let env = TestEnv::empty().await;
    let app = init_app!(env);

    let req = TestRequest::get().uri("/api/init").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["adminCreated"], true);
    assert_eq!(body["data"]["categoriesCreated"], 7);

    let req = TestRequest::get().uri("/api/init").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["adminCreated"], false);
    assert_eq!(body["data"]["categoriesCreated"], 0);
    assert_eq!(body["data"]["settingsCreated"], 0);

    assert_eq!(env.ctx.storage.count_admins().await.unwrap(), 1);
    assert_eq!(env.ctx.storage.count_categories().await.unwrap(), 7);
}

#[actix_rt::test]
async fn test_public_categories_are_not_cached() {
    let env = TestEnv::new().await;
    let app = init_app!(env);

    let req = TestRequest::get().uri("/api/categories").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get(CACHE_CONTROL).unwrap(), "no-store");

    let body: Value = test::read_body_json(resp).await;
    let sections = body["data"].as_array().unwrap();
    assert_eq!(sections.len(), 7);
    assert_eq!(sections[0]["slug"], "chatbots");
}

#[actix_rt::test]
async fn test_short_category_path_is_rewritten() {
    let env = TestEnv::new().await;
    let category_id = first_category_id(&env.ctx.storage).await;
    add_service(&env.ctx.storage, "ChatBot", category_id, vec![]).await;
    let app = init_app!(env);

    let req = TestRequest::get().uri("/t/chatbots").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["category"]["slug"], "chatbots");
    assert_eq!(body["data"]["services"][0]["name"], "ChatBot");

    let req = TestRequest::get().uri("/t/does-not-exist").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_click_increments_and_unknown_service_is_404() {
    let env = TestEnv::new().await;
    let category_id = first_category_id(&env.ctx.storage).await;
    let id = add_service(&env.ctx.storage, "Clicky", category_id, vec![]).await;
    let app = init_app!(env);

    for _ in 0..3 {
        let req = TestRequest::post()
            .uri(&format!("/api/services/{}/click", id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let service = env.ctx.storage.get_service(id).await.unwrap().unwrap();
    assert_eq!(service.click_count, 3);

    let req = TestRequest::post()
        .uri("/api/services/424242/click")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = TestRequest::post()
        .uri("/api/services/abc/click")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn test_create_tag_is_idempotent() {
    let env = TestEnv::new().await;
    let app = init_app!(env);
    let cookie = env.admin_cookie().await;

    let mut ids = Vec::new();
    for name in ["Writing", "  Writing  "] {
        let req = TestRequest::post()
            .uri("/api/admin/tags")
            .cookie(cookie.clone())
            .set_json(json!({ "name": name }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["name"], "Writing");
        ids.push(body["data"]["id"].as_i64().unwrap());
    }

    assert_eq!(ids[0], ids[1]);
    assert_eq!(env.ctx.storage.count_tags().await.unwrap(), 1);

    let req = TestRequest::post()
        .uri("/api/admin/tags")
        .cookie(cookie)
        .set_json(json!({ "name": "   " }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn test_delete_tag_unlinks_but_keeps_services() {
    let env = TestEnv::new().await;
    let storage = env.ctx.storage.clone();
    let category_id = first_category_id(&storage).await;
    let (tag, _) = storage.create_tag("Voice").await.unwrap();
    let service_id = add_service(&storage, "Speaker", category_id, vec![tag.id]).await;
    assert_eq!(storage.service_tags(service_id).await.unwrap().len(), 1);

    let app = init_app!(env);
    let req = TestRequest::delete()
        .uri(&format!("/api/admin/tags/{}", tag.id))
        .cookie(env.admin_cookie().await)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    assert!(storage.get_tag(tag.id).await.unwrap().is_none());
    assert!(storage.get_service(service_id).await.unwrap().is_some());
    assert!(storage.service_tags(service_id).await.unwrap().is_empty());
}

#[actix_rt::test]
async fn test_replace_service_tags() {
    let env = TestEnv::new().await;
    let storage = env.ctx.storage.clone();
    let category_id = first_category_id(&storage).await;
    let (a, _) = storage.create_tag("Alpha").await.unwrap();
    let (b, _) = storage.create_tag("Beta").await.unwrap();
    let service_id = add_service(&storage, "Tagged", category_id, vec![a.id]).await;

    let app = init_app!(env);
    let cookie = env.admin_cookie().await;

    let req = TestRequest::put()
        .uri(&format!("/api/admin/services/{}/tags", service_id))
        .cookie(cookie.clone())
        .set_json(json!({ "tagIds": [b.id, b.id] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let tags = storage.service_tags(service_id).await.unwrap();
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].id, b.id);

    let req = TestRequest::put()
        .uri(&format!("/api/admin/services/{}/tags", service_id))
        .cookie(cookie)
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn test_reorder_categories_swaps_positions() {
    let env = TestEnv::new().await;
    let categories = env.ctx.storage.list_categories().await.unwrap();
    let (first, second) = (categories[0].clone(), categories[1].clone());

    let app = init_app!(env);
    let req = TestRequest::put()
        .uri("/api/admin/categories")
        .cookie(env.admin_cookie().await)
        .set_json(json!([
            { "id": first.id, "sortOrder": second.sort_order },
            { "id": second.id, "sortOrder": first.sort_order },
        ]))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let reordered = env.ctx.storage.list_categories().await.unwrap();
    assert_eq!(reordered.len(), categories.len());
    assert_eq!(reordered[0].id, second.id);
    assert_eq!(reordered[1].id, first.id);

    // 未出现在请求中的分类保持原位
    for (before, after) in categories[2..].iter().zip(&reordered[2..]) {
        assert_eq!(after.id, before.id);
        assert_eq!(after.sort_order, before.sort_order);
    }
}

#[actix_rt::test]
async fn test_reorder_with_unknown_id_changes_nothing() {
    let env = TestEnv::new().await;
    let before = env.ctx.storage.list_categories().await.unwrap();

    let app = init_app!(env);
    let req = TestRequest::put()
        .uri("/api/admin/categories")
        .cookie(env.admin_cookie().await)
        .set_json(json!([
            { "id": before[0].id, "sortOrder": 99 },
            { "id": 987654, "sortOrder": 0 },
        ]))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let after = env.ctx.storage.list_categories().await.unwrap();
    assert_eq!(after[0].id, before[0].id);
    assert_eq!(after[0].sort_order, before[0].sort_order);
}

#[actix_rt::test]
async fn test_delete_category_with_services_is_rejected() {
    let env = TestEnv::new().await;
    let category_id = first_category_id(&env.ctx.storage).await;
    add_service(&env.ctx.storage, "Blocker", category_id, vec![]).await;

    let app = init_app!(env);
    let req = TestRequest::delete()
        .uri(&format!("/api/admin/categories/{}", category_id))
        .cookie(env.admin_cookie().await)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(
        env.ctx
            .storage
            .get_category(category_id)
            .await
            .unwrap()
            .is_some()
    );
}

#[actix_rt::test]
async fn test_live_search_puts_tags_first_and_caps_results() {
    let env = TestEnv::new().await;
    let storage = env.ctx.storage.clone();
    let category_id = first_category_id(&storage).await;

    for i in 0..5 {
        storage.create_tag(&format!("gpt-tag-{}", i)).await.unwrap();
    }
    let mut service_ids = Vec::new();
    for i in 0..10 {
        service_ids.push(add_service(&storage, &format!("Gpt{}", i), category_id, vec![]).await);
    }
    // 最后一个服务点击最多，应排在服务结果首位
    let hottest = *service_ids.last().unwrap();
    for _ in 0..5 {
        storage.increment_click(hottest).await.unwrap();
    }

    let app = init_app!(env);
    let req = TestRequest::get().uri("/api/live-search?q=gpt").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let results = body["data"].as_array().unwrap();

    assert_eq!(results.len(), 3 + 8);
    assert!(results[..3].iter().all(|r| r["isTag"] == true));
    assert!(results[..3].iter().all(|r| r["id"].as_i64().unwrap() < 0));
    assert!(results[3..].iter().all(|r| r["isTag"] == false));
    assert_eq!(results[3]["id"], hottest);

    let req = TestRequest::get().uri("/api/live-search?q=%20%20").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"], json!([]));
}

fn tag_list(uri: &str, cookie: Cookie<'static>) -> TestRequest {
    TestRequest::get().uri(uri).cookie(cookie)
}

const TAG_LIST_URIS: [&str; 3] = [
    "/api/admin/tags?page=1&pageSize=10",
    "/api/admin/tags?page=2&pageSize=1",
    "/api/admin/tags?page=1&pageSize=10&sortOrder=ascend",
];

#[actix_rt::test]
async fn test_admin_tag_list_is_cached_until_a_tag_write() {
    let env = TestEnv::new().await;
    env.ctx.storage.create_tag("Existing").await.unwrap();
    env.ctx.storage.create_tag("Other").await.unwrap();
    let stats = env.ctx.cache_stats.clone();

    let app = init_app!(env);
    let cookie = env.admin_cookie().await;

    let mut first_bodies = Vec::new();
    for uri in TAG_LIST_URIS {
        let req = tag_list(uri, cookie.clone()).to_request();
        first_bodies.push(test::call_and_read_body(&app, req).await);
    }
    let (hits, misses) = (stats.hits(), stats.misses());

    // 命中缓存时响应与首次完全一致
    for (uri, first) in TAG_LIST_URIS.iter().zip(&first_bodies) {
        let req = tag_list(uri, cookie.clone()).to_request();
        let cached = test::call_and_read_body(&app, req).await;
        assert_eq!(&cached, first, "{}", uri);
    }
    assert_eq!(stats.hits(), hits + 3);
    assert_eq!(stats.misses(), misses);

    let req = TestRequest::post()
        .uri("/api/admin/tags")
        .cookie(cookie.clone())
        .set_json(json!({ "name": "Fresh" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    // 一次写操作清空全部分页
    for uri in TAG_LIST_URIS {
        let req = tag_list(uri, cookie.clone()).to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["pagination"]["total"], 3, "{}", uri);
    }
    assert_eq!(stats.misses(), misses + 3);
}

#[actix_rt::test]
async fn test_admin_tag_update_and_delete_invalidate_list() {
    let env = TestEnv::new().await;
    let (tag, _) = env.ctx.storage.create_tag("Before").await.unwrap();
    let stats = env.ctx.cache_stats.clone();

    let app = init_app!(env);
    let cookie = env.admin_cookie().await;
    let uri = TAG_LIST_URIS[0];

    let req = tag_list(uri, cookie.clone()).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["data"][0]["name"], "Before");

    let req = TestRequest::put()
        .uri(&format!("/api/admin/tags/{}", tag.id))
        .cookie(cookie.clone())
        .set_json(json!({ "name": "After" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let misses = stats.misses();
    let req = tag_list(uri, cookie.clone()).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["data"][0]["name"], "After");
    assert_eq!(stats.misses(), misses + 1);

    let req = TestRequest::delete()
        .uri(&format!("/api/admin/tags/{}", tag.id))
        .cookie(cookie.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let misses = stats.misses();
    let req = tag_list(uri, cookie).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["pagination"]["total"], 0);
    assert_eq!(body["data"]["data"], json!([]));
    assert_eq!(stats.misses(), misses + 1);
}

#[actix_rt::test]
async fn test_live_search_is_not_invalidated_by_writes() {
    let env = TestEnv::new().await;
    let stats = env.ctx.cache_stats.clone();

    let app = init_app!(env);
    let cookie = env.admin_cookie().await;

    let search = || TestRequest::get().uri("/api/live-search?q=sora").to_request();

    let first = test::call_and_read_body(&app, search()).await;
    let body: Value = serde_json::from_slice(&first).unwrap();
    assert_eq!(body["data"], json!([]));

    let req = TestRequest::post()
        .uri("/api/admin/tags")
        .cookie(cookie)
        .set_json(json!({ "name": "Sora" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    // 60 秒内仍返回旧结果
    let hits = stats.hits();
    let cached = test::call_and_read_body(&app, search()).await;
    assert_eq!(cached, first);
    assert_eq!(stats.hits(), hits + 1);
}

#[actix_rt::test]
async fn test_admin_tag_list_far_page_is_empty() {
    let env = TestEnv::new().await;
    env.ctx.storage.create_tag("Only").await.unwrap();

    let app = init_app!(env);
    let req = tag_list(
        "/api/admin/tags?page=100000000000000000&pageSize=100",
        env.admin_cookie().await,
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["data"], json!([]));
    assert_eq!(body["data"]["pagination"]["total"], 1);
    assert_eq!(
        body["data"]["pagination"]["current"],
        100_000_000_000_000_000u64
    );
}

#[actix_rt::test]
async fn test_public_tag_page_paginates() {
    let env = TestEnv::new().await;
    let storage = env.ctx.storage.clone();
    let category_id = first_category_id(&storage).await;
    let (tag, _) = storage.create_tag("Video").await.unwrap();
    for i in 0..3 {
        add_service(&storage, &format!("Clip{}", i), category_id, vec![tag.id]).await;
    }

    let app = init_app!(env);
    let req = TestRequest::get().uri("/api/tags/Video?page=1").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["totalCount"], 3);
    assert_eq!(body["data"]["totalPages"], 1);
    assert_eq!(body["data"]["services"].as_array().unwrap().len(), 3);

    let req = TestRequest::get()
        .uri(&format!("/api/tags/Video?page={}", u64::MAX))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["totalCount"], 3);
    assert_eq!(body["data"]["page"], u64::MAX);
    assert_eq!(body["data"]["services"], json!([]));

    let req = TestRequest::get().uri("/api/tags/Missing").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_settings_update_and_public_defaults() {
    let env = TestEnv::new().await;
    let app = init_app!(env);

    let req = TestRequest::put()
        .uri("/api/admin/settings")
        .cookie(env.admin_cookie().await)
        .set_json(json!({ "siteName": "My Nav", "seoTitle": null }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = TestRequest::get().uri("/api/settings").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["siteName"], "My Nav");
    assert_eq!(body["data"]["statisticsCode"], "");
}

#[actix_rt::test]
async fn test_dashboard_stats() {
    let env = TestEnv::new().await;
    let storage = env.ctx.storage.clone();
    let category_id = first_category_id(&storage).await;
    let id = add_service(&storage, "Counted", category_id, vec![]).await;
    storage.increment_click(id).await.unwrap();
    storage.increment_click(id).await.unwrap();

    let app = init_app!(env);
    let req = TestRequest::get()
        .uri("/api/admin/stats")
        .cookie(env.admin_cookie().await)
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["serviceCount"], 1);
    assert_eq!(body["data"]["categoryCount"], 7);
    assert_eq!(body["data"]["totalClicks"], 2);
}
