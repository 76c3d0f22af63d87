//! # RouteTable
//!
//! RouteTable is an ordered, first-match HTTP request router with
//! declarative parameter validation.
//!
//! A route is registered explicitly as a method, a path pattern, a
//! [`RouteSpec`] declaring its parameters, and a handler. Requests are
//! matched against the table **in registration order** and the first route
//! whose method and pattern fit wins — there is no specificity ranking, no
//! priority rule beyond the order you wrote the table in. This makes
//! dispatch a pure table scan and its behavior trivially predictable, at the
//! price of one documented hazard: a parametrized route registered before a
//! literal route of the same shape shadows it forever. Register fixed paths
//! before variable ones.
//!
//! ## Features
//!
//! **Ordered matching:** the table is scanned top to bottom. Duplicate
//! registrations are legal; the first one always wins and the later copy is
//! simply unreachable. This is deliberate and stable across calls.
//!
//! **Parameters in your routing pattern:** `:name` matches exactly one
//! non-empty path segment, `*name` matches the remaining path including
//! embedded slashes and must come last. Captured values are coerced to the
//! type declared in the route's [`ParamSpec`] — integers, booleans, or a
//! fixed enumeration of wire strings ([`EnumSpec`]).
//!
//! **Declarative validation:** query parameters carry declared types,
//! defaults, wire aliases, and string constraints (length bounds, regex).
//! A JSON body is validated field by field against a declared
//! [`BodySchema`]. All failures of one request are collected and reported
//! together as a structured 422 payload; an unmatched request is a 404.
//! Handlers never see invalid input.
//!
//! ## Usage
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
//!             "/hello/:user",
//!             RouteSpec::none(),
//!             |args: Args| Ok(json!({"greeting": format!("Hello, {}", args.str("user").unwrap())})),
//!         )
//!         .get(
//!             "/items/",
//!             RouteSpec::none()
//!                 .param(ParamSpec::int("skip").default_value(json!(0)))
//!                 .param(ParamSpec::int("limit").default_value(json!(10))),
//!             |args: Args| Ok(json!({"skip": args.int("skip"), "limit": args.int("limit")})),
//!         );
//!
//!     hyper::Server::bind(&([127, 0, 0, 1], 3000).into())
//!         .serve(router.into_service())
//!         .await
//!         .unwrap();
//! }
//! ```
//!
//! The transport-free core is [`Router::dispatch`], which takes a method,
//! path, raw query string, and optional body and returns a [`Reply`]; the
//! hyper glue above is a thin layer over it and everything is equally
//! testable without a server:
//!
//! ```rust
//! use hyper::Method;
//! use routetable::{Router, RouteSpec};
//! use serde_json::json;
//!
//! let router = Router::new().get("/", RouteSpec::none(), |_| Ok(json!({"message": "hi"})));
//! let reply = router.dispatch(&Method::GET, "/", "", None);
//! assert_eq!(reply.body, json!({"message": "hi"}));
//! ```

#![forbid(unsafe_code)]

pub mod args;
pub mod coerce;
pub mod error;
pub mod pattern;
pub mod schema;

#[doc(hidden)]
pub mod router;

#[doc(inline)]
pub use args::Args;

#[doc(inline)]
pub use error::{DispatchError, ErrorKind, FieldError};

#[doc(inline)]
pub use router::{Handler, Reply, Router, RouteSpec};

#[doc(inline)]
pub use schema::{BodyField, BodySchema, EnumSpec, ParamSpec};
