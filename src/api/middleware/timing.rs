//! HTTP timing middleware
//!
//! 在 debug 级别记录每个请求的方法、路径、状态码和耗时；
//! 超过阈值的请求以 warn 级别输出。

use actix_service::{Service, Transform};
use actix_web::{
    Error,
    dev::{ServiceRequest, ServiceResponse},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

const SLOW_REQUEST: Duration = Duration::from_secs(1);

/// Group paths so log filters stay readable
fn classify_endpoint(path: &str) -> &'static str {
    if path.starts_with("/api/ads") {
        "ads"
    } else if path.starts_with("/api/favorites") {
        "favorites"
    } else if path.starts_with("/api/agent") {
        "agent"
    } else if path.starts_with("/health") {
        "health"
    } else {
        "other"
    }
}

#[derive(Clone, Default)]
pub struct TimingMiddleware;

impl<S, B> Transform<S, ServiceRequest> for TimingMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = TimingService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TimingService {
            service: Rc::new(service),
        }))
    }
}

pub struct TimingService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for TimingService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    actix_service::forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let start = Instant::now();
        let method = req.method().clone();
        let path = req.path().to_string();
        let endpoint = classify_endpoint(&path);

        Box::pin(async move {
            let result = srv.call(req).await;
            let elapsed = start.elapsed();
            let status = match &result {
                Ok(response) => response.status().as_u16(),
                Err(e) => e.as_response_error().status_code().as_u16(),
            };

            // SSE 的耗时只覆盖到响应头发出为止
            if elapsed >= SLOW_REQUEST {
                warn!(
                    "Slow request {} {} [{}] -> {} in {:?}",
                    method, path, endpoint, status, elapsed
                );
            } else {
                debug!(
                    "{} {} [{}] -> {} in {:?}",
                    method, path, endpoint, status, elapsed
                );
            }

            result
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_endpoint() {
        assert_eq!(classify_endpoint("/api/ads/filters"), "ads");
        assert_eq!(classify_endpoint("/api/favorites/check"), "favorites");
        assert_eq!(classify_endpoint("/api/agent/tasks/1/stream"), "agent");
        assert_eq!(classify_endpoint("/health/live"), "health");
        assert_eq!(classify_endpoint("/"), "other");
    }
}
