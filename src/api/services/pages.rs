//! 后台页面外壳与分类页路由

use actix_web::{HttpResponse, web};
use rust_embed::Embed;
use tracing::{trace, warn};

use super::public::category_detail;

// 编译期嵌入后台页面
#[derive(Embed)]
#[folder = "assets/admin/"]
struct AdminShell;

fn serve_shell(name: &str) -> HttpResponse {
    match AdminShell::get(name) {
        Some(content) => {
            trace!("Serving admin shell {}", name);
            HttpResponse::Ok()
                .content_type("text/html; charset=utf-8")
                .body(content.data.into_owned())
        }
        None => {
            warn!("Embedded admin shell {} missing", name);
            HttpResponse::NotFound().finish()
        }
    }
}

pub async fn login_page() -> HttpResponse {
    serve_shell("login.html")
}

pub async fn admin_page() -> HttpResponse {
    serve_shell("index.html")
}

/// 页面路由；`/admin/login` 需在通配路由之前注册
pub fn page_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/admin/login", web::get().to(login_page))
        .route("/admin", web::get().to(admin_page))
        .route("/admin/{tail:.*}", web::get().to(admin_page))
        .route("/category/{slug}", web::get().to(category_detail));
}
