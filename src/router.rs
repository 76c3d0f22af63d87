//! [`Router`](crate::Router) is an ordered HTTP route registry and dispatcher.
//!
//! Routes are registered explicitly at startup as a method, a path pattern,
//! a [`RouteSpec`] declaring the route's parameters, and a handler. Incoming
//! requests are matched **in registration order**: the first route whose
//! method matches and whose pattern captures the path wins. The router
//! performs no specificity ranking — a literal route beats a parametrized
//! one only when it was registered first, and registering the parametrized
//! route first shadows the literal one permanently. Duplicate registrations
//! are legal for the same reason: the later copy is simply unreachable.
//!
//! Once a route is selected, its declared parameters are extracted from the
//! matched path segments, the query string, and the JSON body, coerced to
//! their declared types, and validated. Failures are collected across all
//! parameters of the request and reported together as a 422 payload; a
//! request that matches no route is a 404. Handlers are pure functions from
//! parsed [`Args`] to a JSON value.
//!
//! ```rust,no_run
//! use routetable::{Args, ParamSpec, Router, RouteSpec};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() {
//!     let router = Router::new()
//!         .get("/", RouteSpec::none(), |_| Ok(json!({"message": "Hello World"})))
//!         .get(
//!             "/items/:item_id",
//!             RouteSpec::none().param(ParamSpec::int("item_id")),
//!             |args: Args| Ok(json!({"item_id": args.get("item_id").unwrap()})),
//!         );
//!
//!     hyper::Server::bind(&([127, 0, 0, 1], 3000).into())
//!         .serve(router.into_service())
//!         .await
//!         .unwrap();
//! }
//! ```

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_util::future;
use hyper::service::Service;
use hyper::{header, Body, Method, Request, Response, StatusCode};
use serde_json::{json, Value};
use url::form_urlencoded;

use crate::args::Args;
use crate::coerce;
use crate::error::{DispatchError, ErrorKind, FieldError};
use crate::pattern::Pattern;
use crate::schema::{BodySchema, ParamSpec, ParamType};

/// A route handler: a pure function from parsed arguments to a JSON value.
///
/// Implemented for any `Fn(Args) -> Result<Value, DispatchError>`:
/// ```rust
/// use routetable::{Args, DispatchError, Handler};
/// use serde_json::{json, Value};
///
/// fn root(_: Args) -> Result<Value, DispatchError> {
///     Ok(json!({"message": "Hello World"}))
/// }
///
/// let handler: Box<dyn Handler> = Box::new(root);
/// ```
pub trait Handler: Send + Sync {
    fn call(&self, args: Args) -> Result<Value, DispatchError>;
}

impl<F> Handler for F
where
    F: Fn(Args) -> Result<Value, DispatchError> + Send + Sync,
{
    fn call(&self, args: Args) -> Result<Value, DispatchError> {
        self(args)
    }
}

/// The declared inputs of one route: its parameters and, optionally, a body
/// schema.
///
/// Parameters are classified when the route is registered, never
/// per-request: a spec whose name appears in the pattern binds the matched
/// path segment, a body schema binds the request payload, and every other
/// spec is read from the query string under its wire name. Pattern
/// parameters without a declared spec default to plain strings.
#[derive(Debug, Default)]
pub struct RouteSpec {
    params: Vec<ParamSpec>,
    body: Option<BodySchema>,
}

impl RouteSpec {
    /// A route with no declared inputs.
    pub fn none() -> Self {
        RouteSpec::default()
    }

    pub fn param(mut self, spec: ParamSpec) -> Self {
        self.params.push(spec);
        self
    }

    pub fn body(mut self, schema: BodySchema) -> Self {
        self.body = Some(schema);
        self
    }
}

/// One registered route. Immutable once registered.
struct Route {
    method: Method,
    pattern: Pattern,
    path_specs: Vec<ParamSpec>,
    query_specs: Vec<ParamSpec>,
    body: Option<BodySchema>,
    handler: Box<dyn Handler>,
}

impl Route {
    fn new(method: Method, pattern: Pattern, spec: RouteSpec, handler: Box<dyn Handler>) -> Self {
        let mut path_specs = Vec::new();
        let mut query_specs = Vec::new();

        for param in spec.params {
            if pattern.has_param(param.name()) {
                if let ParamType::StrList = param.ty() {
                    panic!(
                        "list parameter '{}' cannot bind a path segment of '{}'",
                        param.name(),
                        pattern.raw()
                    );
                }
                path_specs.push(param);
            } else {
                query_specs.push(param);
            }
        }

        // Pattern parameters left undeclared bind as plain strings.
        for name in pattern.param_names() {
            if !path_specs.iter().any(|s| s.name() == name) {
                path_specs.push(ParamSpec::str(name));
            }
        }

        Route {
            method,
            pattern,
            path_specs,
            query_specs,
            body: spec.body,
            handler,
        }
    }
}

/// The dispatch outcome: an HTTP status and a JSON payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: StatusCode,
    pub body: Value,
}

impl Reply {
    fn ok(body: Value) -> Self {
        Reply {
            status: StatusCode::OK,
            body,
        }
    }

    fn from_error(err: &DispatchError) -> Self {
        let status = match err {
            DispatchError::RouteNotFound => StatusCode::NOT_FOUND,
            DispatchError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            DispatchError::Computation(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Reply {
            status,
            body: json!({ "detail": err.detail() }),
        }
    }

    /// Serialize into a JSON HTTP response.
    pub fn into_response(self) -> Response<Body> {
        Response::builder()
            .status(self.status)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(self.body.to_string()))
            .unwrap()
    }
}

/// Router dispatches requests to handlers via an ordered route table.
#[derive(Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    pub fn new() -> Self {
        Router::default()
    }

    /// Append a route for a specific path and method.
    ///
    /// No uniqueness check is performed: registering two routes with an
    /// identical method and pattern is legal, and the first one shadows the
    /// second forever.
    ///
    /// ```rust
    /// use routetable::{Router, RouteSpec};
    /// use hyper::Method;
    /// use serde_json::json;
    ///
    /// let router = Router::new().handle("/teapot", Method::GET, RouteSpec::none(), |_| {
    ///     Ok(json!({"message": "I am a teapot!"}))
    /// });
    /// ```
    pub fn handle(
        mut self,
        path: &str,
        method: Method,
        spec: RouteSpec,
        handler: impl Handler + 'static,
    ) -> Self {
        let pattern = Pattern::parse(path);
        self.routes
            .push(Route::new(method, pattern, spec, Box::new(handler)));
        self
    }

    /// Register a handler for `GET` requests.
    pub fn get(self, path: &str, spec: RouteSpec, handler: impl Handler + 'static) -> Self {
        self.handle(path, Method::GET, spec, handler)
    }

    /// Register a handler for `POST` requests.
    pub fn post(self, path: &str, spec: RouteSpec, handler: impl Handler + 'static) -> Self {
        self.handle(path, Method::POST, spec, handler)
    }

    /// Register a handler for `PUT` requests.
    pub fn put(self, path: &str, spec: RouteSpec, handler: impl Handler + 'static) -> Self {
        self.handle(path, Method::PUT, spec, handler)
    }

    /// Register a handler for `DELETE` requests.
    pub fn delete(self, path: &str, spec: RouteSpec, handler: impl Handler + 'static) -> Self {
        self.handle(path, Method::DELETE, spec, handler)
    }

    /// Scan the table in registration order; first full match wins.
    fn lookup(&self, method: &Method, path: &str) -> Option<(&Route, Vec<(&str, String)>)> {
        self.routes.iter().find_map(|route| {
            if route.method != *method {
                return None;
            }
            route.pattern.capture(path).map(|caps| (route, caps))
        })
    }

    /// The transport-free dispatch core: match, coerce, validate, invoke.
    ///
    /// `query` is the raw query string without the leading `?`; `body` is
    /// the raw request payload, when there is one.
    pub fn dispatch(
        &self,
        method: &Method,
        path: &str,
        query: &str,
        body: Option<&[u8]>,
    ) -> Reply {
        match self.try_dispatch(method, path, query, body) {
            Ok(value) => Reply::ok(value),
            Err(err) => Reply::from_error(&err),
        }
    }

    fn try_dispatch(
        &self,
        method: &Method,
        path: &str,
        query: &str,
        body: Option<&[u8]>,
    ) -> Result<Value, DispatchError> {
        let (route, caps) = self
            .lookup(method, path)
            .ok_or(DispatchError::RouteNotFound)?;
        tracing::debug!(pattern = route.pattern.raw(), %method, "route matched");

        let mut errors: Vec<FieldError> = Vec::new();
        let mut values: BTreeMap<String, Value> = BTreeMap::new();

        for spec in &route.path_specs {
            // The capture exists whenever the pattern matched.
            let raw = caps
                .iter()
                .find(|(name, _)| *name == spec.name())
                .map(|(_, raw)| raw.as_str())
                .unwrap_or("");
            match coerce::from_text(raw, spec.ty()) {
                Ok(value) => {
                    if let Err(kind) = check_string(&value, spec) {
                        errors.push(kind.at(&["path", spec.name()]));
                    } else {
                        values.insert(spec.name().to_owned(), value);
                    }
                }
                Err(kind) => errors.push(kind.at(&["path", spec.name()])),
            }
        }

        let pairs: Vec<(String, String)> = form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect();
        for spec in &route.query_specs {
            bind_query(spec, &pairs, &mut values, &mut errors);
        }

        let validated_body = match &route.body {
            Some(schema) => bind_body(schema, body, &mut errors),
            None => None,
        };

        if !errors.is_empty() {
            tracing::debug!(fields = errors.len(), "parameter validation failed");
            return Err(DispatchError::Validation(errors));
        }

        route
            .handler
            .call(Args::new(values, validated_body))
            .map_err(|err| {
                tracing::warn!(%err, "handler failed");
                err
            })
    }

    /// Handle one hyper request: read the body, dispatch, serialize.
    pub async fn respond(&self, req: Request<Body>) -> hyper::Result<Response<Body>> {
        let (parts, body) = req.into_parts();
        let bytes = hyper::body::to_bytes(body).await?;
        let query = parts.uri.query().unwrap_or("");
        let body = if bytes.is_empty() {
            None
        } else {
            Some(&bytes[..])
        };
        let reply = self.dispatch(&parts.method, parts.uri.path(), query, body);
        Ok(reply.into_response())
    }

    /// Converts the `Router` into a `Service` which you can serve directly
    /// with hyper.
    /// ```rust,no_run
    /// # use routetable::Router;
    /// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
    /// let router = Router::new();
    ///
    /// hyper::Server::bind(&([127, 0, 0, 1], 3030).into())
    ///     .serve(router.into_service())
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn into_service(self) -> MakeRouterService {
        MakeRouterService(RouterService(Arc::new(self)))
    }
}

fn bind_query(
    spec: &ParamSpec,
    pairs: &[(String, String)],
    values: &mut BTreeMap<String, Value>,
    errors: &mut Vec<FieldError>,
) {
    let wire = spec.wire_name();

    if let ParamType::StrList = spec.ty() {
        let occurrences: Vec<&str> = pairs
            .iter()
            .filter(|(key, _)| key == wire)
            .map(|(_, value)| value.as_str())
            .collect();
        if occurrences.is_empty() {
            bind_absent(spec, values, errors);
            return;
        }
        let mut elements = Vec::with_capacity(occurrences.len());
        for raw in occurrences {
            match check_constraints_str(raw, spec) {
                Ok(()) => elements.push(Value::String(raw.to_owned())),
                Err(kind) => errors.push(kind.at(&["query", wire])),
            }
        }
        values.insert(spec.name().to_owned(), Value::Array(elements));
        return;
    }

    match pairs.iter().find(|(key, _)| key == wire) {
        Some((_, raw)) => match coerce::from_text(raw, spec.ty()) {
            Ok(value) => {
                if let Err(kind) = check_string(&value, spec) {
                    errors.push(kind.at(&["query", wire]));
                } else {
                    values.insert(spec.name().to_owned(), value);
                }
            }
            Err(kind) => errors.push(kind.at(&["query", wire])),
        },
        None => bind_absent(spec, values, errors),
    }
}

fn bind_absent(
    spec: &ParamSpec,
    values: &mut BTreeMap<String, Value>,
    errors: &mut Vec<FieldError>,
) {
    if let Some(default) = spec.default() {
        values.insert(spec.name().to_owned(), default.clone());
    } else if spec.is_required() {
        errors.push(ErrorKind::Missing.at(&["query", spec.wire_name()]));
    }
}

fn bind_body(
    schema: &BodySchema,
    body: Option<&[u8]>,
    errors: &mut Vec<FieldError>,
) -> Option<Value> {
    let bytes = body.unwrap_or(&[]);
    if bytes.is_empty() {
        errors.push(ErrorKind::Missing.at(&["body"]));
        return None;
    }

    let parsed: Value = match serde_json::from_slice(bytes) {
        Ok(parsed) => parsed,
        Err(_) => {
            errors.push(ErrorKind::JsonDecode.at(&["body"]));
            return None;
        }
    };
    let map = match parsed.as_object() {
        Some(map) => map,
        None => {
            errors.push(ErrorKind::Dict.at(&["body"]));
            return None;
        }
    };

    let mut out = serde_json::Map::new();
    for field in schema.fields() {
        match map.get(field.name()) {
            Some(value) if !value.is_null() => match coerce::from_json(value, field.ty()) {
                Ok(coerced) => {
                    out.insert(field.name().to_owned(), coerced);
                }
                Err(kind) => errors.push(kind.at(&["body", field.name()])),
            },
            _ => {
                if field.is_required() {
                    errors.push(ErrorKind::Missing.at(&["body", field.name()]));
                } else {
                    out.insert(
                        field.name().to_owned(),
                        field.default().cloned().unwrap_or(Value::Null),
                    );
                }
            }
        }
    }
    Some(Value::Object(out))
}

// Constraints apply to string-shaped values only; integers and booleans
// carry none.
fn check_string(value: &Value, spec: &ParamSpec) -> Result<(), ErrorKind> {
    match value.as_str() {
        Some(s) => check_constraints_str(s, spec),
        None => Ok(()),
    }
}

fn check_constraints_str(raw: &str, spec: &ParamSpec) -> Result<(), ErrorKind> {
    if spec.constraints().is_empty() {
        return Ok(());
    }
    coerce::check_constraints(raw, spec.constraints())
}

#[doc(hidden)]
pub struct MakeRouterService(RouterService);

impl<T> Service<T> for MakeRouterService {
    type Response = RouterService;
    type Error = hyper::Error;
    type Future = future::Ready<Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, _: T) -> Self::Future {
        future::ok(self.0.clone())
    }
}

#[doc(hidden)]
#[derive(Clone)]
pub struct RouterService(Arc<Router>);

impl Service<Request<Body>> for RouterService {
    type Response = Response<Body>;
    type Error = hyper::Error;
    type Future = ResponseFut;

    fn poll_ready(&mut self, _: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let router = self.0.clone();
        ResponseFut(Box::pin(async move { router.respond(req).await }))
    }
}

pub struct ResponseFut(Pin<Box<dyn Future<Output = hyper::Result<Response<Body>>> + Send>>);

impl Future for ResponseFut {
    type Output = hyper::Result<Response<Body>>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.get_mut().0.as_mut().poll(cx)
    }
}
