//! A prefix-tree HTTP router with route groups and middleware, built on hyper.
//!
//! ```no_run
//! use sprig::{logger, Engine, StatusCode};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//! 	let mut engine = Engine::new();
//! 	engine.use_middleware(logger());
//! 	engine.get("/hello", |ctx| {
//! 		let body = format!("hello {}, you're at {}\n", ctx.query("name"), ctx.path);
//! 		ctx.string(StatusCode::OK, body);
//! 	});
//!
//! 	let mut v2 = engine.group("/v2");
//! 	v2.use_middleware(|ctx| ctx.next());
//! 	v2.get("/hello/:name", |ctx| {
//! 		let body = format!("hello {}\n", ctx.param("name"));
//! 		ctx.string(StatusCode::OK, body);
//! 	});
//!
//! 	engine.run(([127, 0, 0, 1], 3000)).await
//! }
//! ```
//!
//! Segments starting with `:` bind one path segment; a segment starting with `*` binds the rest of
//! the path, joined with `/`. Each method gets one tree, and among siblings the route registered
//! first wins: placeholders are not ranked below literals.
//!
//! Middlewares run for every request whose path starts with their group's prefix, root group first,
//! then in group creation order, followed by the route handler or the not-found handler. A handler
//! continues the chain by calling [`Context::next`]; one that returns without calling it ends the
//! chain.

mod context;
mod engine;
mod group;
mod http;
mod middleware;
mod route;
mod router;
mod trie;

pub use context::Context;
pub use engine::Engine;
pub use group::{Group, GroupId, RouterGroup};
pub use http::*;
pub use middleware::logger;
pub use route::*;
pub use router::Router;
pub use trie::Node;
