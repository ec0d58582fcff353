use crate::{
	context::Context,
	group::{Group, GroupId, RouterGroup},
	http::{default_error_handler, ErrorHandler},
	route::{HandlerFunc, Method},
	router::Router,
};
use std::{
	fmt::{self, Debug, Formatter},
	sync::Arc,
};

/// The router and every group derived from the root group.
///
/// Routes, groups and middlewares are registered through `&mut Engine` before serving; requests are
/// then dispatched through `&Engine`, so nothing is locked while serving.
pub struct Engine {
	pub(crate) router: Router,
	pub(crate) groups: Vec<RouterGroup>,
	pub(crate) internal_error: ErrorHandler,
}

impl Default for Engine {
	fn default() -> Self {
		Self {
			router: Router::default(),
			groups: vec![RouterGroup::root()],
			internal_error: default_error_handler,
		}
	}
}

impl Debug for Engine {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		let prefixes: Vec<_> = self.groups.iter().map(RouterGroup::prefix).collect();
		f.debug_struct("Engine")
			.field("router", &self.router)
			.field("groups", &prefixes)
			.finish()
	}
}

impl Engine {
	pub fn new() -> Self {
		Self::default()
	}

	/// Re-enters a group created earlier.
	///
	/// # Panics
	///
	/// Panics if `id` is out of range for this engine. Ids are only meaningful to the engine that
	/// created them; passing one engine's id to another is a programming error, and an id that
	/// happens to be in range silently addresses a different group.
	pub fn scope(&mut self, id: GroupId) -> Group<'_> {
		assert!(id.0 < self.groups.len(), "unknown group {:?}", id);
		Group::new(self, id)
	}

	/// Derives a group from the root group.
	pub fn group(&mut self, prefix: &str) -> Group<'_> {
		let id = self.scope(GroupId::ROOT).group(prefix).id();
		Group::new(self, id)
	}

	/// Adds a middleware to the root group, which runs for every request.
	pub fn use_middleware<F>(&mut self, middleware: F) -> &mut Self
	where
		F: Fn(&mut Context) + Send + Sync + 'static,
	{
		self.scope(GroupId::ROOT).use_middleware(middleware);
		self
	}

	pub fn add_route<F>(&mut self, method: Method, pattern: &str, handler: F) -> &mut Self
	where
		F: Fn(&mut Context) + Send + Sync + 'static,
	{
		self.router.add_route(method, pattern, Arc::new(handler));
		self
	}

	pub fn get<F>(&mut self, pattern: &str, handler: F) -> &mut Self
	where
		F: Fn(&mut Context) + Send + Sync + 'static,
	{
		self.add_route(Method::GET, pattern, handler)
	}

	pub fn post<F>(&mut self, pattern: &str, handler: F) -> &mut Self
	where
		F: Fn(&mut Context) + Send + Sync + 'static,
	{
		self.add_route(Method::POST, pattern, handler)
	}

	pub fn put<F>(&mut self, pattern: &str, handler: F) -> &mut Self
	where
		F: Fn(&mut Context) + Send + Sync + 'static,
	{
		self.add_route(Method::PUT, pattern, handler)
	}

	pub fn delete<F>(&mut self, pattern: &str, handler: F) -> &mut Self
	where
		F: Fn(&mut Context) + Send + Sync + 'static,
	{
		self.add_route(Method::DELETE, pattern, handler)
	}

	/// Replaces the handler that answers requests no route matches.
	pub fn not_found<F>(&mut self, handler: F) -> &mut Self
	where
		F: Fn(&mut Context) + Send + Sync + 'static,
	{
		self.router.set_not_found(Arc::new(handler));
		self
	}

	/// Replaces the handler that turns transport errors into responses.
	pub fn internal_error(&mut self, handler: ErrorHandler) -> &mut Self {
		self.internal_error = handler;
		self
	}

	pub fn groups(&self) -> &[RouterGroup] {
		&self.groups
	}

	pub fn router(&self) -> &Router {
		&self.router
	}

	/// The middlewares of every group whose prefix starts `path`, in group creation order.
	pub fn middlewares_for(&self, path: &str) -> Vec<HandlerFunc> {
		self.groups
			.iter()
			.filter(|group| path.starts_with(group.prefix()))
			.flat_map(|group| group.middlewares().iter().map(Arc::clone))
			.collect()
	}

	/// Runs the request through the matching middlewares and then its route or not-found handler.
	pub fn handle(&self, ctx: &mut Context) {
		ctx.set_handlers(self.middlewares_for(&ctx.path));
		self.router.handle(ctx);
	}
}
