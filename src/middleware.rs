use crate::context::Context;
use std::time::Instant;

/// Logs method, path, status and latency of every request it wraps.
///
/// Add it to the root group so the timing covers the rest of the chain.
pub fn logger() -> impl Fn(&mut Context) + Send + Sync + 'static {
	|ctx: &mut Context| {
		let start = Instant::now();
		ctx.next();
		tracing::info!(
			method = %ctx.method,
			path = %ctx.path,
			status = ctx.status_code().as_u16(),
			elapsed = ?start.elapsed(),
			"request handled"
		);
	}
}
