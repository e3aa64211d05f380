//! Router configuration for the redirect handoff endpoint.

use axum::{Router, routing::any};
use http::Request;
use tower_http::trace::TraceLayer;

use super::{context::AppState, handler_alldone::handle_alldone};
use crate::config::ROOT_ROUTE;

/// Build the application router
pub fn build_router(ctx: AppState) -> Router {
    let mut router = Router::new().route(ROOT_ROUTE, any(handle_alldone));

    if !ctx.config.redirect_route.is_root() {
        router = router.route(ctx.config.redirect_route.as_ref(), any(handle_alldone));
    }

    // The query string carries the authorization code, so spans record the path only.
    let trace = TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
        tracing::info_span!(
            "request",
            method = %request.method(),
            path = %request.uri().path(),
        )
    });

    router.layer(trace).with_state(ctx)
}
