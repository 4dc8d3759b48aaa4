//! Route and middleware registration.
//!
//! A [`Dispatcher`] collects routes, global middleware and fallback
//! handlers during setup. [`Dispatcher::freeze`] consumes it and produces
//! the immutable [`Service`] that serves requests, so the route table can
//! never change while requests are in flight.

use std::sync::Arc;

use junction_bind::Binder;
use junction_config::{DispatchConfig, JunctionConfig};
use junction_core::{into_handler, BoxHandler, Handler};
use junction_middleware::{compose, AccessLog, BoxMiddleware, Middleware, Recovery};
use junction_router::{RouteError, RouteInfo, Router};

use crate::fallback;
use crate::service::{Endpoint, Service};

/// A registered route before composition.
struct Route {
    pattern: String,
    handler: BoxHandler,
    middlewares: Vec<BoxMiddleware>,
}

/// Setup-phase registry of routes, middleware and fallbacks.
///
/// # Example
///
/// ```rust
/// use junction_core::Request;
/// use junction_dispatch::Dispatcher;
///
/// async fn show(req: Request) -> String {
///     format!("user {}", req.param("id").unwrap_or_default())
/// }
///
/// let mut dispatcher = Dispatcher::new();
/// dispatcher.get("/users/:id", show).unwrap();
/// let service = dispatcher.freeze();
/// assert_eq!(service.route_count(), 1);
/// ```
pub struct Dispatcher {
    routes: Router<Route>,
    middlewares: Vec<BoxMiddleware>,
    not_found: Option<BoxHandler>,
    method_not_allowed: Option<BoxHandler>,
    options: Option<BoxHandler>,
    binder: Binder,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("routes", &self.routes.route_count())
            .field(
                "middlewares",
                &self.middlewares.iter().map(|m| m.name()).collect::<Vec<_>>(),
            )
            .field("binder", &self.binder)
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    /// Creates an empty dispatcher with no middleware.
    #[must_use]
    pub fn new() -> Self {
        Self {
            routes: Router::new(),
            middlewares: Vec::new(),
            not_found: None,
            method_not_allowed: None,
            options: None,
            binder: Binder::new(),
        }
    }

    /// Creates a dispatcher with the middleware `config` enables.
    ///
    /// Access logging, when enabled, is installed outside recovery so that
    /// recovered panics are logged with their `500` status.
    #[must_use]
    pub fn with_config(config: &DispatchConfig) -> Self {
        let mut dispatcher = Self::new();
        if config.access_log {
            dispatcher.use_middleware(AccessLog::new());
        }
        if config.recover_panics {
            dispatcher.use_middleware(Recovery::new());
        }
        dispatcher
    }

    /// Creates a dispatcher from a loaded configuration: middleware from
    /// `[dispatch]`, binder options from `[bind]`.
    #[must_use]
    pub fn from_config(config: &JunctionConfig) -> Self {
        Self::with_config(&config.dispatch)
            .with_binder(Binder::new().with_max_body_bytes(config.bind.max_body_bytes))
    }

    /// Sets the binder installed in every dispatched request.
    #[must_use]
    pub const fn with_binder(mut self, binder: Binder) -> Self {
        self.binder = binder;
        self
    }

    /// Registers `handler` for `pattern` and `verb`, wrapped by
    /// `middlewares` inside the global middleware.
    ///
    /// # Errors
    ///
    /// Returns the [`RouteError`] for an empty verb, a malformed pattern, a
    /// duplicate registration or a parameter-name conflict. The dispatcher
    /// is unchanged on error.
    pub fn handle<H, I>(
        &mut self,
        pattern: &str,
        verb: &str,
        handler: H,
        middlewares: I,
    ) -> Result<RouteInfo, RouteError>
    where
        H: Handler,
        I: IntoIterator<Item = BoxMiddleware>,
    {
        let route = Route {
            pattern: junction_router::parse_pattern(pattern, verb)?.pattern(),
            handler: into_handler(handler),
            middlewares: middlewares.into_iter().collect(),
        };
        let info = self.routes.insert(pattern, verb, route)?;
        tracing::debug!(verb = %info.verb, pattern = %info.pattern, "route registered");
        Ok(info)
    }

    /// Registers a `GET` route.
    ///
    /// # Errors
    ///
    /// See [`Dispatcher::handle`].
    pub fn get<H: Handler>(&mut self, pattern: &str, handler: H) -> Result<RouteInfo, RouteError> {
        self.handle(pattern, "GET", handler, [])
    }

    /// Registers a `POST` route.
    ///
    /// # Errors
    ///
    /// See [`Dispatcher::handle`].
    pub fn post<H: Handler>(&mut self, pattern: &str, handler: H) -> Result<RouteInfo, RouteError> {
        self.handle(pattern, "POST", handler, [])
    }

    /// Registers a `PUT` route.
    ///
    /// # Errors
    ///
    /// See [`Dispatcher::handle`].
    pub fn put<H: Handler>(&mut self, pattern: &str, handler: H) -> Result<RouteInfo, RouteError> {
        self.handle(pattern, "PUT", handler, [])
    }

    /// Registers a `PATCH` route.
    ///
    /// # Errors
    ///
    /// See [`Dispatcher::handle`].
    pub fn patch<H: Handler>(&mut self, pattern: &str, handler: H) -> Result<RouteInfo, RouteError> {
        self.handle(pattern, "PATCH", handler, [])
    }

    /// Registers a `DELETE` route.
    ///
    /// # Errors
    ///
    /// See [`Dispatcher::handle`].
    pub fn delete<H: Handler>(&mut self, pattern: &str, handler: H) -> Result<RouteInfo, RouteError> {
        self.handle(pattern, "DELETE", handler, [])
    }

    /// Registers a `HEAD` route.
    ///
    /// # Errors
    ///
    /// See [`Dispatcher::handle`].
    pub fn head<H: Handler>(&mut self, pattern: &str, handler: H) -> Result<RouteInfo, RouteError> {
        self.handle(pattern, "HEAD", handler, [])
    }

    /// Installs global middleware. It wraps every route and every fallback,
    /// in installation order, outermost first.
    pub fn use_middleware<M: Middleware>(&mut self, middleware: M) -> &mut Self {
        self.middlewares.push(Arc::new(middleware));
        self
    }

    /// Installs an already shared middleware.
    pub fn use_boxed(&mut self, middleware: BoxMiddleware) -> &mut Self {
        self.middlewares.push(middleware);
        self
    }

    /// Replaces the default `404` handler.
    pub fn handle_not_found<H: Handler>(&mut self, handler: H) -> &mut Self {
        self.not_found = Some(into_handler(handler));
        self
    }

    /// Replaces the default `405` handler. The request carries the allowed
    /// verbs in [`Request::allowed_methods`](junction_core::Request::allowed_methods).
    pub fn handle_method_not_allowed<H: Handler>(&mut self, handler: H) -> &mut Self {
        self.method_not_allowed = Some(into_handler(handler));
        self
    }

    /// Installs the preflight handler for `OPTIONS` requests on paths with
    /// no `OPTIONS` route.
    ///
    /// The response starts with an `Allow` header listing the registered
    /// verbs plus `OPTIONS`; whatever `handler` writes is applied on top.
    pub fn handle_options<H: Handler>(&mut self, handler: H) -> &mut Self {
        self.options = Some(into_handler(handler));
        self
    }

    /// Every registered route.
    #[must_use]
    pub fn routes(&self) -> Vec<RouteInfo> {
        self.routes.routes()
    }

    /// Composes every handler with its middleware and produces the serving
    /// form.
    #[must_use]
    pub fn freeze(self) -> Service {
        let Self {
            routes,
            middlewares,
            not_found,
            method_not_allowed,
            options,
            binder,
        } = self;

        let routes = routes.map(|_verb, route| {
            let stack: Vec<BoxMiddleware> = middlewares
                .iter()
                .chain(&route.middlewares)
                .cloned()
                .collect();
            Endpoint {
                pattern: route.pattern,
                handler: compose(route.handler, &stack),
            }
        });

        let not_found = compose(not_found.unwrap_or_else(fallback::not_found), &middlewares);
        let method_not_allowed = compose(
            method_not_allowed.unwrap_or_else(fallback::method_not_allowed),
            &middlewares,
        );
        let options = options.map(|handler| compose(handler, &middlewares));

        tracing::debug!(
            routes = routes.route_count(),
            middlewares = middlewares.len(),
            "dispatcher frozen"
        );

        Service::new(routes, not_found, method_not_allowed, options, binder)
    }
}
