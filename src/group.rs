use crate::{
	context::Context,
	engine::Engine,
	route::{HandlerFunc, Method, PatternError},
};
use std::sync::Arc;

/// Identifies a group within the engine that created it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GroupId(pub(crate) usize);

impl GroupId {
	/// The group every engine starts with: empty prefix, matches every path.
	pub const ROOT: GroupId = GroupId(0);
}

/// A path prefix and the middlewares run for every request under it.
pub struct RouterGroup {
	prefix: String,
	middlewares: Vec<HandlerFunc>,
	parent: Option<GroupId>,
}

impl RouterGroup {
	pub(crate) fn root() -> Self {
		Self {
			prefix: String::new(),
			middlewares: Vec::new(),
			parent: None,
		}
	}

	pub fn prefix(&self) -> &str {
		&self.prefix
	}

	pub fn parent(&self) -> Option<GroupId> {
		self.parent
	}

	pub fn middlewares(&self) -> &[HandlerFunc] {
		&self.middlewares
	}
}

/// A group being configured: a mutable borrow of the engine scoped to one group.
///
/// Prefixes only affect the patterns registered through the group; every group shares the engine's
/// single tree per method.
pub struct Group<'a> {
	engine: &'a mut Engine,
	id: GroupId,
}

impl<'a> Group<'a> {
	pub(crate) fn new(engine: &'a mut Engine, id: GroupId) -> Self {
		Self { engine, id }
	}

	fn data(&self) -> &RouterGroup {
		&self.engine.groups[self.id.0]
	}

	pub fn id(&self) -> GroupId {
		self.id
	}

	pub fn prefix(&self) -> &str {
		self.data().prefix()
	}

	pub fn parent(&self) -> Option<GroupId> {
		self.data().parent()
	}

	/// Derives a child group whose prefix is this group's prefix followed by `prefix`.
	pub fn group(&mut self, prefix: &str) -> Group<'_> {
		let prefix = format!("{}{}", self.prefix(), prefix);
		let id = GroupId(self.engine.groups.len());
		self.engine.groups.push(RouterGroup {
			prefix,
			middlewares: Vec::new(),
			parent: Some(self.id),
		});
		Group::new(&mut *self.engine, id)
	}

	/// Appends a middleware; middlewares of one group run in the order they were added.
	pub fn use_middleware<F>(&mut self, middleware: F) -> &mut Self
	where
		F: Fn(&mut Context) + Send + Sync + 'static,
	{
		let id = self.id.0;
		self.engine.groups[id].middlewares.push(Arc::new(middleware));
		self
	}

	pub fn add_route<F>(&mut self, method: Method, pattern: &str, handler: F) -> &mut Self
	where
		F: Fn(&mut Context) + Send + Sync + 'static,
	{
		let pattern = format!("{}{}", self.prefix(), pattern);
		self.engine
			.router
			.add_route(method, &pattern, Arc::new(handler));
		self
	}

	/// Registers a route after checking the full pattern with [`crate::validate_pattern`].
	pub fn try_add_route<F>(
		&mut self,
		method: Method,
		pattern: &str,
		handler: F,
	) -> Result<&mut Self, PatternError>
	where
		F: Fn(&mut Context) + Send + Sync + 'static,
	{
		let pattern = format!("{}{}", self.prefix(), pattern);
		self.engine
			.router
			.try_add_route(method, &pattern, Arc::new(handler))?;
		Ok(self)
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
}
