use serde_json::json;
use sprig::{logger, Engine, StatusCode};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
		.init();

	let mut engine = Engine::new();
	engine.use_middleware(logger());
	engine.get("/", |ctx| ctx.html(StatusCode::OK, "<h1>Hello</h1>"));

	let v1 = engine
		.group("/v1")
		.get("/hello", |ctx| {
			let body = format!("hello {}, you're at {}\n", ctx.query("name"), ctx.path);
			ctx.string(StatusCode::OK, body);
		})
		.id();

	engine
		.scope(v1)
		.group("/admin")
		.use_middleware(|ctx| {
			if ctx.query("token").is_empty() {
				ctx.fail(StatusCode::UNAUTHORIZED, "missing token");
				return;
			}
			ctx.next();
		})
		.get("/stats", |ctx| ctx.json(StatusCode::OK, &json!({ "routes": 4 })));

	engine.group("/v2").get("/assets/*filepath", |ctx| {
		let body = json!({ "filepath": ctx.param("filepath") });
		ctx.json(StatusCode::OK, &body);
	});

	engine.run(([127, 0, 0, 1], 3000)).await
}
