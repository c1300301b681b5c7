//! 边缘中间件
//!
//! 在路由之前处理每个请求：
//! 1. 静态资源：放行后追加禁止缓存的响应头
//! 2. `/t/{slug}`：内部重写到 `/category/{slug}`（不发生重定向）
//! 3. `/api/*`：原样放行，由各 handler 自行做完整校验
//! 4. `/admin` 与 `/admin/*`：除登录页外，Cookie 必须通过 shape check，否则 307 到登录页

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::{
        Uri,
        header::{CACHE_CONTROL, EXPIRES, HeaderValue, LOCATION, PRAGMA},
    },
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use std::sync::Arc;
use tracing::{debug, trace};

use crate::api::constants::{ADMIN_LOGIN_PATH, SESSION_COOKIE_NAME};
use crate::api::session::SessionManager;

const NO_STORE: &str = "no-store, no-cache, must-revalidate, proxy-revalidate";

/// 请求分类结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EdgeRoute {
    StaticAsset,
    /// 重写后的路径
    Rewrite(String),
    Api,
    AdminLogin,
    AdminPage,
    Other,
}

impl EdgeRoute {
    pub fn classify(path: &str) -> Self {
        if path.starts_with("/static/")
            || path.starts_with("/assets/")
            || path.ends_with(".css")
            || path.ends_with(".js")
        {
            return EdgeRoute::StaticAsset;
        }

        if let Some(slug) = path.strip_prefix("/t/")
            && !slug.is_empty()
            && !slug.contains('/')
        {
            return EdgeRoute::Rewrite(format!("/category/{}", slug));
        }

        if path == "/api" || path.starts_with("/api/") {
            return EdgeRoute::Api;
        }

        if path == ADMIN_LOGIN_PATH || path == "/admin/login/" {
            return EdgeRoute::AdminLogin;
        }
        if path == "/admin" || path.starts_with("/admin/") {
            return EdgeRoute::AdminPage;
        }

        EdgeRoute::Other
    }
}

#[derive(Clone)]
pub struct EdgeGate {
    sessions: Arc<SessionManager>,
}

impl EdgeGate {
    pub fn new(sessions: Arc<SessionManager>) -> Self {
        Self { sessions }
    }
}

impl<S, B> Transform<S, ServiceRequest> for EdgeGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = EdgeGateMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(EdgeGateMiddleware {
            service: Rc::new(service),
            sessions: self.sessions.clone(),
        }))
    }
}

pub struct EdgeGateMiddleware<S> {
    service: Rc<S>,
    sessions: Arc<SessionManager>,
}

impl<S, B> EdgeGateMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    fn redirect_to_login(req: ServiceRequest) -> ServiceResponse<EitherBody<B>> {
        debug!("Admin page {} requires login, redirecting", req.path());
        req.into_response(
            HttpResponse::TemporaryRedirect()
                .insert_header((LOCATION, ADMIN_LOGIN_PATH))
                .finish()
                .map_into_right_body(),
        )
    }

    /// 替换请求 URI，保留查询串，让后续路由按新路径匹配
    fn rewrite_path(req: &mut ServiceRequest, new_path: &str) {
        let target = match req.uri().query() {
            Some(query) => format!("{}?{}", new_path, query),
            None => new_path.to_string(),
        };

        match target.parse::<Uri>() {
            Ok(uri) => {
                trace!("Rewriting {} -> {}", req.path(), uri);
                req.match_info_mut().get_mut().update(&uri);
                req.head_mut().uri = uri;
            }
            Err(e) => debug!("Skip rewrite of {}: {}", req.path(), e),
        }
    }
}

impl<S, B> Service<ServiceRequest> for EdgeGateMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, mut req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let sessions = self.sessions.clone();

        Box::pin(async move {
            match EdgeRoute::classify(req.path()) {
                EdgeRoute::StaticAsset => {
                    let mut res = srv.call(req).await?;
                    let headers = res.headers_mut();
                    headers.insert(CACHE_CONTROL, HeaderValue::from_static(NO_STORE));
                    headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
                    headers.insert(EXPIRES, HeaderValue::from_static("0"));
                    Ok(res.map_into_left_body())
                }
                EdgeRoute::Rewrite(target) => {
                    Self::rewrite_path(&mut req, &target);
                    Ok(srv.call(req).await?.map_into_left_body())
                }
                EdgeRoute::AdminPage => {
                    let admin_id = req
                        .cookie(SESSION_COOKIE_NAME)
                        .and_then(|c| sessions.shape_check(c.value()));
                    match admin_id {
                        Some(id) => {
                            trace!("Admin page {} passed shape check (aid={})", req.path(), id);
                            Ok(srv.call(req).await?.map_into_left_body())
                        }
                        None => Ok(Self::redirect_to_login(req)),
                    }
                }
                EdgeRoute::Api | EdgeRoute::AdminLogin | EdgeRoute::Other => {
                    Ok(srv.call(req).await?.map_into_left_body())
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(EdgeRoute::classify("/static/app.png"), EdgeRoute::StaticAsset);
        assert_eq!(EdgeRoute::classify("/assets/x"), EdgeRoute::StaticAsset);
        assert_eq!(EdgeRoute::classify("/foo/site.css"), EdgeRoute::StaticAsset);
        assert_eq!(EdgeRoute::classify("/admin/app.js"), EdgeRoute::StaticAsset);

        assert_eq!(
            EdgeRoute::classify("/t/chatbots"),
            EdgeRoute::Rewrite("/category/chatbots".into())
        );
        assert_eq!(EdgeRoute::classify("/t/"), EdgeRoute::Other);
        assert_eq!(EdgeRoute::classify("/t/a/b"), EdgeRoute::Other);

        assert_eq!(EdgeRoute::classify("/api/categories"), EdgeRoute::Api);
        assert_eq!(EdgeRoute::classify("/api/admin/tags"), EdgeRoute::Api);

        assert_eq!(EdgeRoute::classify("/admin/login"), EdgeRoute::AdminLogin);
        assert_eq!(EdgeRoute::classify("/admin"), EdgeRoute::AdminPage);
        assert_eq!(EdgeRoute::classify("/admin/services"), EdgeRoute::AdminPage);
        assert_eq!(EdgeRoute::classify("/administrator"), EdgeRoute::Other);
        assert_eq!(EdgeRoute::classify("/"), EdgeRoute::Other);
    }
}
