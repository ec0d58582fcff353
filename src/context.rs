use crate::route::{Body, HandlerFunc, Method, Params, Response, StatusCode};
use hyper::{
	body::Bytes,
	header::{self, HeaderMap, HeaderName, HeaderValue},
	http::request::Parts,
};
use percent_encoding::percent_decode_str;
use serde::Serialize;
use std::sync::Arc;
use url::form_urlencoded;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Per-request state: the request as seen by handlers, the handler chain and its position, and the
/// response being written.
pub struct Context {
	pub method: Method,
	pub path: String,
	query: String,
	headers: HeaderMap,
	body: Bytes,
	params: Params,

	handlers: Vec<HandlerFunc>,
	index: usize,

	status: StatusCode,
	response_headers: HeaderMap,
	response_body: Vec<u8>,
	written: bool,
}

impl Context {
	/// Creates a context for `target`, a path with an optional `?query` suffix.
	pub fn new(method: Method, target: &str) -> Self {
		let (path, query) = match target.split_once('?') {
			Some((path, query)) => (path, query),
			None => (target, ""),
		};

		Self {
			method,
			path: path.to_owned(),
			query: query.to_owned(),
			headers: HeaderMap::new(),
			body: Bytes::new(),
			params: Params::new(),
			handlers: Vec::new(),
			index: 0,
			status: StatusCode::OK,
			response_headers: HeaderMap::new(),
			response_body: Vec::new(),
			written: false,
		}
	}

	/// Creates a context from a parsed request. The path is percent-decoded; the query is kept
	/// encoded and decoded per lookup.
	pub fn from_parts(parts: Parts, body: Bytes) -> Self {
		let mut ctx = Self::new(parts.method, "");
		ctx.path = percent_decode_str(parts.uri.path())
			.decode_utf8_lossy()
			.into_owned();
		ctx.query = parts.uri.query().unwrap_or_default().to_owned();
		ctx.headers = parts.headers;
		ctx.body = body;
		ctx
	}

	pub fn headers(&self) -> &HeaderMap {
		&self.headers
	}

	/// Runs the next handler in the chain, if any.
	///
	/// Handlers that want the rest of the chain to run must call this; returning without calling
	/// it stops the chain there.
	pub fn next(&mut self) {
		if let Some(handler) = self.handlers.get(self.index).map(Arc::clone) {
			self.index += 1;
			handler(self);
		}
	}

	/// Skips every handler not yet started and writes `{"message": ...}` with `status`.
	pub fn fail(&mut self, status: StatusCode, message: &str) {
		self.index = self.handlers.len();
		self.json(status, &serde_json::json!({ "message": message }));
	}

	pub(crate) fn set_handlers(&mut self, handlers: Vec<HandlerFunc>) {
		self.handlers = handlers;
		self.index = 0;
	}

	pub(crate) fn push_handler(&mut self, handler: HandlerFunc) {
		self.handlers.push(handler);
	}

	pub(crate) fn set_params(&mut self, params: Params) {
		self.params = params;
	}

	/// The value bound to a path parameter, or `""`.
	pub fn param(&self, name: &str) -> &str {
		self.params.get(name).map(String::as_str).unwrap_or_default()
	}

	pub fn params(&self) -> &Params {
		&self.params
	}

	/// The first query string value for `key`, or `""`.
	pub fn query(&self, key: &str) -> String {
		first_value(self.query.as_bytes(), key)
	}

	/// The first url-encoded form body value for `key`, or `""`.
	pub fn post_form(&self, key: &str) -> String {
		let is_form = self
			.headers
			.get(header::CONTENT_TYPE)
			.and_then(|value| value.to_str().ok())
			.map_or(false, |value| value.starts_with(FORM_CONTENT_TYPE));

		if is_form {
			first_value(&self.body, key)
		} else {
			String::new()
		}
	}

	/// Sets the response status. Ignored once the response has been written.
	pub fn status(&mut self, status: StatusCode) {
		if self.written {
			tracing::debug!(path = %self.path, %status, "status change after write ignored");
			return;
		}
		self.status = status;
	}

	pub fn status_code(&self) -> StatusCode {
		self.status
	}

	/// Sets a response header. Ignored once the response has been written.
	pub fn set_header(&mut self, name: HeaderName, value: HeaderValue) {
		if !self.written {
			self.response_headers.insert(name, value);
		}
	}

	pub fn string(&mut self, status: StatusCode, body: impl AsRef<str>) {
		self.set_header(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"));
		self.data(status, body.as_ref().as_bytes());
	}

	/// Writes `value` as newline-terminated JSON. A value that fails to serialize produces a 500.
	pub fn json<T: Serialize + ?Sized>(&mut self, status: StatusCode, value: &T) {
		match serde_json::to_vec(value) {
			Ok(mut body) => {
				body.push(b'\n');
				self.set_header(
					header::CONTENT_TYPE,
					HeaderValue::from_static("application/json"),
				);
				self.data(status, &body);
			}
			Err(e) => {
				tracing::error!(path = %self.path, error = %e, "failed to serialize response");
				self.string(StatusCode::INTERNAL_SERVER_ERROR, e.to_string());
			}
		}
	}

	pub fn html(&mut self, status: StatusCode, html: impl AsRef<str>) {
		self.set_header(header::CONTENT_TYPE, HeaderValue::from_static("text/html"));
		self.data(status, html.as_ref().as_bytes());
	}

	/// Writes `data` to the body. The first write fixes the status and headers; later writes only
	/// append.
	pub fn data(&mut self, status: StatusCode, data: &[u8]) {
		self.status(status);
		self.written = true;
		self.response_body.extend_from_slice(data);
	}

	pub fn is_written(&self) -> bool {
		self.written
	}

	/// Everything written to the response body so far.
	pub fn response_body(&self) -> &[u8] {
		&self.response_body
	}

	pub fn into_response(self) -> Response {
		let mut response = Response::new(Body::from(self.response_body));
		*response.status_mut() = self.status;
		*response.headers_mut() = self.response_headers;
		response
	}
}

fn first_value(input: &[u8], key: &str) -> String {
	form_urlencoded::parse(input)
		.find(|(k, _)| k == key)
		.map(|(_, v)| v.into_owned())
		.unwrap_or_default()
}
