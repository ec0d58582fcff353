use crate::context::Context;
pub use hyper::{Body, Method, StatusCode};
use std::{collections::HashMap, sync::Arc};
use thiserror::Error;

pub type Request = hyper::Request<Body>;
pub type Response = hyper::Response<Body>;

/// Parameters bound while matching a path, keyed by placeholder name without its sigil.
pub type Params = HashMap<String, String>;

/// A route handler or middleware. Handlers advance the chain by calling [`Context::next`].
pub type HandlerFunc = Arc<dyn Fn(&mut Context) + Send + Sync>;

/// Splits a pattern or path into its non-empty segments.
///
/// Nothing after the first segment starting with `*` is kept.
///
/// ```
/// assert_eq!(sprig::parse_pattern("/p/*name/*"), vec!["p", "*name"]);
/// ```
pub fn parse_pattern(pattern: &str) -> Vec<&str> {
	let mut parts = vec![];
	for segment in pattern.split('/') {
		if segment.is_empty() {
			continue;
		}

		parts.push(segment);
		if segment.starts_with('*') {
			break;
		}
	}
	parts
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PatternError {
	#[error("route pattern {0:?} must start with '/'")]
	MissingLeadingSlash(String),
	#[error("placeholder {segment:?} in {pattern:?} has no name")]
	UnnamedParameter { pattern: String, segment: String },
	#[error("catch-all {segment:?} must be the last segment of {pattern:?}")]
	CatchAllNotLast { pattern: String, segment: String },
}

/// Rejects patterns whose trie shape would not match what they appear to say.
///
/// A bare `*` is accepted: it matches the remainder without binding it.
pub fn validate_pattern(pattern: &str) -> Result<(), PatternError> {
	if !pattern.starts_with('/') {
		return Err(PatternError::MissingLeadingSlash(pattern.to_owned()));
	}

	let mut segments = pattern.split('/').filter(|segment| !segment.is_empty());
	while let Some(segment) = segments.next() {
		if segment == ":" {
			return Err(PatternError::UnnamedParameter {
				pattern: pattern.to_owned(),
				segment: segment.to_owned(),
			});
		}

		if segment.starts_with('*') && segments.next().is_some() {
			return Err(PatternError::CatchAllNotLast {
				pattern: pattern.to_owned(),
				segment: segment.to_owned(),
			});
		}
	}

	Ok(())
}
