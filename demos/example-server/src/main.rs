use axum::{Json, Router, routing::get};
use replyon::prelude::*;
use utoipa::openapi::OpenApi as OpenApiDocument;
use utoipa::{Modify, OpenApi};

mod modules;

use modules::user::{self, EmailTaken, InvalidUser, UserNotFound, UserService};

#[derive(OpenApi)]
#[openapi(
    info(title = "ReplyOn example server", version = "0.1.0"),
    paths(modules::user::controller::get_user, modules::user::controller::create_user),
    components(schemas(modules::user::domain::User, modules::user::domain::CreateUserRequest)),
    tags((name = "users", description = "User endpoints"))
)]
struct ApiDoc;

fn build_reply_on() -> replyon::Result<ReplyOn> {
    let hierarchy = ExceptionHierarchy::builder()
        .register::<UserNotFound>()?
        .register::<InvalidUser>()?
        .register_subtype::<EmailTaken, InvalidUser>()?
        .build();

    let reply_on = ReplyOn::new(hierarchy);
    user::register_replies(&reply_on)?;

    // Extra handlers can be declared in JSON, see `ReplyOnConfig`.
    if std::env::var(replyon::config::CONFIG_ENV).is_ok() {
        reply_on.load(&ReplyOnConfig::from_env()?)?;
    }
    Ok(reply_on)
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    tracing::info!("🚀 Starting Example Server...");

    let reply_on = build_reply_on().expect("Failed to declare reply mappings");

    let mut openapi: OpenApiDocument = ApiDoc::openapi();
    reply_on.documentation().modify(&mut openapi);

    let router = user::router(Arc::new(UserService::default()))
        .layer(reply_on.layer())
        .merge(Router::new().route(
            "/api-docs/openapi.json",
            get(move || async move { Json(openapi) }),
        ));

    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("{}:{}", host, port);

    tracing::info!("✅ Server running on http://127.0.0.1:{}", port);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();

    axum::serve(listener, router).await.unwrap();

    tracing::info!("👋 Server stopped");
}
