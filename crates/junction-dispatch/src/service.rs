//! The serving form of a dispatcher.

use std::sync::Arc;

use bytes::Bytes;
use http::Method;
use http_body_util::Full;
use junction_bind::Binder;
use junction_core::{boxed, BoxHandler, BoxResponse, BufferedWriter, Request};
use junction_router::{Match, RouteInfo, RouteMatch, Router};

use crate::fallback;

/// A composed route.
pub(crate) struct Endpoint {
    pub(crate) pattern: String,
    pub(crate) handler: BoxHandler,
}

struct Inner {
    routes: Router<Endpoint>,
    not_found: BoxHandler,
    method_not_allowed: BoxHandler,
    options: Option<BoxHandler>,
    binder: Binder,
}

/// An immutable, shareable dispatcher produced by
/// [`Dispatcher::freeze`](crate::Dispatcher::freeze).
///
/// Cloning is cheap; clones share the same route table.
///
/// Per request the path is matched, then exactly one of the route handler,
/// the preflight handler, the method-not-allowed handler or the not-found
/// handler runs, each already wrapped in its middleware.
#[derive(Clone)]
pub struct Service {
    inner: Arc<Inner>,
}

impl Service {
    pub(crate) fn new(
        routes: Router<Endpoint>,
        not_found: BoxHandler,
        method_not_allowed: BoxHandler,
        options: Option<BoxHandler>,
        binder: Binder,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                routes,
                not_found,
                method_not_allowed,
                options,
                binder,
            }),
        }
    }

    /// Dispatches an `http::Request` and buffers the response.
    pub async fn dispatch(&self, request: http::Request<Bytes>) -> http::Response<Full<Bytes>> {
        self.dispatch_request(Request::from(request)).await
    }

    /// Dispatches a [`Request`] and buffers the response.
    pub async fn dispatch_request(&self, request: Request) -> http::Response<Full<Bytes>> {
        let mut writer = BufferedWriter::new();
        self.respond(request).await.write_to(&mut writer);
        writer.into_response()
    }

    /// Dispatches a [`Request`] and returns the unrendered response, for
    /// callers that write to their own
    /// [`ResponseWriter`](junction_core::ResponseWriter).
    pub async fn respond(&self, mut request: Request) -> BoxResponse {
        let inner = &*self.inner;
        request.extensions_mut().insert(inner.binder);

        let outcome = inner
            .routes
            .match_route(request.path(), request.method().as_str());

        let handler = match outcome {
            Match::Found(RouteMatch { payload, params }) => {
                tracing::debug!(
                    method = %request.method(),
                    path = %request.path(),
                    pattern = %payload.pattern,
                    "route matched"
                );
                request.set_params(params);
                &payload.handler
            }
            Match::MethodNotAllowed { allowed } => {
                let mut allowed: Vec<String> = allowed.into_iter().map(str::to_string).collect();

                if *request.method() == Method::OPTIONS {
                    if let Some(options) = &inner.options {
                        if !allowed.iter().any(|verb| verb == Method::OPTIONS.as_str()) {
                            allowed.push(Method::OPTIONS.to_string());
                        }
                        tracing::debug!(
                            path = %request.path(),
                            allow = %allowed.join(", "),
                            "preflight"
                        );
                        let headers = fallback::allow_header(&allowed);
                        request.set_allowed_methods(allowed);
                        let response = options.call(request).await;
                        return boxed((headers, response));
                    }
                }

                tracing::debug!(
                    method = %request.method(),
                    path = %request.path(),
                    allow = %allowed.join(", "),
                    "method not allowed"
                );
                request.set_allowed_methods(allowed);
                &inner.method_not_allowed
            }
            Match::NotFound => {
                tracing::debug!(
                    method = %request.method(),
                    path = %request.path(),
                    "no route"
                );
                &inner.not_found
            }
        };

        handler.call(request).await
    }

    /// Every registered route.
    #[must_use]
    pub fn routes(&self) -> Vec<RouteInfo> {
        self.inner.routes.routes()
    }

    /// Number of registered (path, verb) pairs.
    #[must_use]
    pub fn route_count(&self) -> usize {
        self.inner.routes.route_count()
    }

    /// The binder installed in every dispatched request.
    #[must_use]
    pub fn binder(&self) -> Binder {
        self.inner.binder
    }
}

impl std::fmt::Debug for Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Service")
            .field("routes", &self.route_count())
            .field("options", &self.inner.options.is_some())
            .field("binder", &self.inner.binder)
            .finish_non_exhaustive()
    }
}
