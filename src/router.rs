use crate::{
	context::Context,
	route::{parse_pattern, validate_pattern, HandlerFunc, Method, Params, PatternError, StatusCode},
	trie::Node,
};
use std::{
	collections::HashMap,
	fmt::{self, Debug, Formatter},
	sync::Arc,
};

fn default_not_found_handler(ctx: &mut Context) {
	let body = format!("404 NOT FOUND: {}\n", ctx.path);
	ctx.string(StatusCode::NOT_FOUND, body);
}

/// One path tree per method plus the handlers registered for each pattern.
pub struct Router {
	roots: HashMap<Method, Node>,
	handlers: HashMap<String, HandlerFunc>,
	not_found: HandlerFunc,
}

impl Default for Router {
	fn default() -> Self {
		Self {
			roots: HashMap::new(),
			handlers: HashMap::new(),
			not_found: Arc::new(default_not_found_handler),
		}
	}
}

impl Debug for Router {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		let mut routes: Vec<_> = self.handlers.keys().collect();
		routes.sort();
		f.debug_struct("Router").field("routes", &routes).finish()
	}
}

fn handler_key(method: &Method, pattern: &str) -> String {
	format!("{}-{}", method, pattern)
}

impl Router {
	/// Registers `handler` for `pattern`. Registering the same method and pattern again replaces
	/// the handler.
	pub fn add_route(&mut self, method: Method, pattern: &str, handler: HandlerFunc) {
		tracing::debug!(method = %method, pattern, "route registered");

		let parts = parse_pattern(pattern);
		let key = handler_key(&method, pattern);
		self.roots
			.entry(method)
			.or_default()
			.insert(pattern, &parts, 0);
		self.handlers.insert(key, handler);
	}

	/// Like [`Router::add_route`], but rejects malformed patterns instead of registering whatever
	/// tree shape they produce.
	pub fn try_add_route(
		&mut self,
		method: Method,
		pattern: &str,
		handler: HandlerFunc,
	) -> Result<(), PatternError> {
		validate_pattern(pattern)?;
		self.add_route(method, pattern, handler);
		Ok(())
	}

	pub fn set_not_found(&mut self, handler: HandlerFunc) {
		self.not_found = handler;
	}

	/// Finds the node matching `path` and binds the placeholders of its pattern.
	pub fn get_route(&self, method: &Method, path: &str) -> Option<(&Node, Params)> {
		let search_parts = parse_pattern(path);
		let node = self.roots.get(method)?.search(&search_parts, 0)?;

		let mut params = Params::new();
		for (index, part) in parse_pattern(node.pattern()).into_iter().enumerate() {
			if let Some(name) = part.strip_prefix(':') {
				if let Some(value) = search_parts.get(index) {
					params.insert(name.to_owned(), (*value).to_owned());
				}
			}

			if let Some(name) = part.strip_prefix('*') {
				if !name.is_empty() {
					let rest = search_parts.get(index..).unwrap_or_default();
					params.insert(name.to_owned(), rest.join("/"));
				}
				break;
			}
		}

		Some((node, params))
	}

	/// Appends the matched route's handler, or the not-found handler, to the chain and runs it.
	pub fn handle(&self, ctx: &mut Context) {
		let handler = match self.get_route(&ctx.method, &ctx.path) {
			Some((node, params)) => {
				ctx.set_params(params);
				self.handlers.get(&handler_key(&ctx.method, node.pattern()))
			}
			None => None,
		};

		match handler {
			Some(handler) => ctx.push_handler(Arc::clone(handler)),
			None => {
				tracing::debug!(method = %ctx.method, path = %ctx.path, "no route matched");
				ctx.push_handler(Arc::clone(&self.not_found));
			}
		}

		ctx.next();
	}
}

#[cfg(test)]
mod test {
	use super::Router;
	use crate::{
		context::Context,
		route::{HandlerFunc, Method, PatternError, StatusCode},
	};
	use std::sync::Arc;

	fn reply(body: &'static str) -> HandlerFunc {
		Arc::new(move |ctx: &mut Context| ctx.string(StatusCode::OK, body))
	}

	fn test_router() -> Router {
		let mut router = Router::default();
		router.add_route(Method::GET, "/", reply("index"));
		router.add_route(Method::GET, "/hello/:name", reply("hello"));
		router.add_route(Method::GET, "/hello/b/c", reply("hello-b-c"));
		router.add_route(Method::GET, "/hi/:name", reply("hi"));
		router.add_route(Method::GET, "/assets/*filepath", reply("assets"));
		router
	}

	fn body(ctx: Context) -> String {
		String::from_utf8(ctx.response_body().to_vec()).unwrap()
	}

	#[test]
	fn gets_dynamic_route() {
		let router = test_router();
		let (node, params) = router.get_route(&Method::GET, "/hello/geektutu").unwrap();

		assert_eq!(node.pattern(), "/hello/:name");
		assert_eq!(params["name"], "geektutu");
	}

	#[test]
	fn gets_static_routes() {
		let router = test_router();

		let (node, params) = router.get_route(&Method::GET, "/").unwrap();
		assert_eq!(node.pattern(), "/");
		assert!(params.is_empty());

		let (node, _) = router.get_route(&Method::GET, "/hello/b/c").unwrap();
		assert_eq!(node.pattern(), "/hello/b/c");

		let (node, params) = router.get_route(&Method::GET, "/hi/there").unwrap();
		assert_eq!(node.pattern(), "/hi/:name");
		assert_eq!(params["name"], "there");
	}

	#[test]
	fn binds_catch_all_remainder() {
		let router = test_router();
		let (node, params) = router.get_route(&Method::GET, "/assets/a/b/c").unwrap();

		assert_eq!(node.pattern(), "/assets/*filepath");
		assert_eq!(params["filepath"], "a/b/c");
	}

	#[test]
	fn bare_catch_all_binds_nothing() {
		let mut router = Router::default();
		router.add_route(Method::GET, "/static/*", reply("static"));
		let (_, params) = router.get_route(&Method::GET, "/static/css/site.css").unwrap();

		assert!(params.is_empty());
	}

	#[test]
	fn segments_after_catch_all_are_dropped() {
		let mut router = Router::default();
		router.add_route(
			Method::GET,
			"/assets/*filepath/extra",
			Arc::new(|ctx: &mut Context| {
				let body = ctx.param("filepath").to_owned();
				ctx.string(StatusCode::OK, body);
			}),
		);

		let (node, params) = router.get_route(&Method::GET, "/assets/a/b").unwrap();
		assert_eq!(node.pattern(), "/assets/*filepath/extra");
		assert_eq!(params["filepath"], "a/b");
		assert!(router.handlers.contains_key("GET-/assets/*filepath/extra"));

		let mut ctx = Context::new(Method::GET, "/assets/a/b");
		router.handle(&mut ctx);
		assert_eq!(ctx.status_code(), StatusCode::OK);
		assert_eq!(body(ctx), "a/b");
	}

	#[test]
	fn misses_unknown_routes() {
		let router = test_router();

		assert!(router.get_route(&Method::POST, "/").is_none());
		assert!(router.get_route(&Method::GET, "/nope").is_none());
		assert!(router.get_route(&Method::GET, "/hello").is_none());
		assert!(router.get_route(&Method::GET, "/assets").is_none());
		assert!(Router::default().get_route(&Method::GET, "").is_none());
	}

	#[test]
	fn reregistration_replaces_handler() {
		let mut router = Router::default();
		router.add_route(Method::GET, "/hello/:name", reply("first"));
		router.add_route(Method::GET, "/hello/:name", reply("second"));

		assert_eq!(router.roots[&Method::GET].children().len(), 1);
		assert_eq!(router.roots[&Method::GET].children()[0].children().len(), 1);

		let mut ctx = Context::new(Method::GET, "/hello/x");
		router.handle(&mut ctx);
		assert_eq!(body(ctx), "second");
	}

	#[test]
	fn handles_matched_route() {
		let mut router = Router::default();
		router.add_route(
			Method::GET,
			"/hello/:name",
			Arc::new(|ctx: &mut Context| {
				let body = format!("hello {}, you're at {}\n", ctx.param("name"), ctx.path);
				ctx.string(StatusCode::OK, body);
			}),
		);

		let mut ctx = Context::new(Method::GET, "/hello/yyl");
		router.handle(&mut ctx);
		assert_eq!(ctx.status_code(), StatusCode::OK);
		assert_eq!(body(ctx), "hello yyl, you're at /hello/yyl\n");
	}

	#[test]
	fn handles_missing_route() {
		let router = test_router();

		let mut ctx = Context::new(Method::POST, "/");
		router.handle(&mut ctx);
		assert_eq!(ctx.status_code(), StatusCode::NOT_FOUND);
		assert_eq!(body(ctx), "404 NOT FOUND: /\n");
	}

	#[test]
	fn custom_not_found() {
		let mut router = Router::default();
		router.set_not_found(Arc::new(|ctx: &mut Context| {
			ctx.string(StatusCode::NOT_FOUND, "gone")
		}));

		let mut ctx = Context::new(Method::GET, "/missing");
		router.handle(&mut ctx);
		assert_eq!(body(ctx), "gone");
	}

	#[test]
	fn strict_registration_rejects_malformed_patterns() {
		let mut router = Router::default();
		let err = router
			.try_add_route(Method::GET, "/assets/*filepath/extra", reply("assets"))
			.unwrap_err();

		assert!(matches!(err, PatternError::CatchAllNotLast { .. }));
		assert!(router.roots.is_empty());
		assert!(router
			.try_add_route(Method::GET, "/assets/*filepath", reply("assets"))
			.is_ok());
	}
}
