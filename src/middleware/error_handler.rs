use axum::{body::Body, http::Request, middleware::Next, response::Response};
use tracing::error;

/// 记录 5xx 响应对应的请求
pub async fn log_errors(req: Request<Body>, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;

    if response.status().is_server_error() {
        error!(
            "Server error occurred - {} {} -> {}",
            method,
            path,
            response.status()
        );
    }

    response
}
