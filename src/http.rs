use crate::{
	context::Context,
	engine::Engine,
	route::{Body, Request, Response, StatusCode},
};
use anyhow::{Error, Result};
use hyper::{body, service::Service, Server};
use std::{
	convert::Infallible,
	future::{ready, Future, Ready},
	net::SocketAddr,
	pin::Pin,
	sync::Arc,
	task::{Context as TaskContext, Poll},
};

pub use hyper;

pub(crate) fn default_error_handler(e: Error) -> Response {
	let mut response = Response::new(Body::from(e.to_string()));
	*response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
	response
}

/// A function that can convert an error into a response.
pub type ErrorHandler = fn(e: Error) -> Response;

impl Engine {
	/// Reads the request body, dispatches the request and returns the written response.
	pub async fn serve(&self, req: Request) -> Response {
		let (parts, incoming) = req.into_parts();
		let bytes = match body::to_bytes(incoming).await {
			Ok(bytes) => bytes,
			Err(e) => {
				tracing::error!(path = %parts.uri.path(), error = %e, "failed to read request body");
				return (self.internal_error)(e.into());
			}
		};

		let mut ctx = Context::from_parts(parts, bytes);
		self.handle(&mut ctx);
		ctx.into_response()
	}

	/// Serves the engine on `addr` until the server fails.
	pub async fn run(self, addr: impl Into<SocketAddr>) -> Result<()> {
		let addr = addr.into();
		let server = Server::try_bind(&addr)?.serve(HttpEngine::from(self));
		tracing::info!(%addr, "listening");

		server.await?;
		Ok(())
	}
}

/// Makes a [`RequestHandler`] per connection; pass it to `hyper::Server::serve`.
#[derive(Debug)]
pub struct HttpEngine {
	engine: Arc<Engine>,
}

impl From<Engine> for HttpEngine {
	fn from(engine: Engine) -> Self {
		Self {
			engine: Arc::new(engine),
		}
	}
}

impl<T> Service<T> for HttpEngine {
	type Response = RequestHandler;
	type Error = Infallible;
	type Future = Ready<Result<Self::Response, Self::Error>>;

	fn poll_ready(&mut self, _: &mut TaskContext<'_>) -> Poll<Result<(), Self::Error>> {
		Poll::Ready(Ok(()))
	}

	fn call(&mut self, _: T) -> Self::Future {
		ready(Ok(RequestHandler {
			engine: Arc::clone(&self.engine),
		}))
	}
}

/// Responsible for handling the actual HTTP requests from hyper.
#[derive(Debug, Clone)]
pub struct RequestHandler {
	engine: Arc<Engine>,
}

impl Service<Request> for RequestHandler {
	type Response = Response;
	type Error = Infallible;
	type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

	fn poll_ready(&mut self, _cx: &mut TaskContext<'_>) -> Poll<Result<(), Self::Error>> {
		Poll::Ready(Ok(()))
	}

	fn call(&mut self, req: Request) -> Self::Future {
		let engine = Arc::clone(&self.engine);
		Box::pin(async move { Ok(engine.serve(req).await) })
	}
}
