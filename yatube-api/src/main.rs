use anyhow::Context;
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use std::sync::Arc;

use yatube_api::application::{AppServices, Repositories};
use yatube_api::data::{
    PostgresCommentRepository, PostgresFollowRepository, PostgresGroupRepository,
    PostgresPostRepository, PostgresUserRepository,
};
use yatube_api::domain::group::NewGroup;
use yatube_api::infrastructure::{
    config::AppConfig,
    database::{create_pool, run_migrations},
    jwt::JwtService,
    logging::init_logging,
};
use yatube_api::presentation::routes;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run migrations and serve the HTTP API (default)
    Serve,

    /// Run database migrations and exit
    Migrate,

    /// Provision a group
    CreateGroup {
        #[arg(short, long)]
        title: String,

        #[arg(short, long)]
        slug: String,

        #[arg(short, long, default_value = "")]
        description: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    init_logging();

    let cli = Cli::parse();
    let config = AppConfig::from_env()?;

    tracing::info!("Connecting to database...");
    let pool = create_pool(&config.database_url, config.database_max_connections).await?;

    tracing::info!("Running database migrations...");
    run_migrations(&pool).await?;

    let repos = Repositories {
        users: Arc::new(PostgresUserRepository::new(pool.clone())),
        groups: Arc::new(PostgresGroupRepository::new(pool.clone())),
        posts: Arc::new(PostgresPostRepository::new(pool.clone())),
        comments: Arc::new(PostgresCommentRepository::new(pool.clone())),
        follows: Arc::new(PostgresFollowRepository::new(pool.clone())),
    };
    let jwt_service = Arc::new(JwtService::new(&config.jwt_secret, config.jwt_ttl_hours)?);
    let services = AppServices::new(repos, jwt_service);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => run_http_server(&config, services).await?,
        Commands::Migrate => tracing::info!("Migrations completed successfully"),
        Commands::CreateGroup {
            title,
            slug,
            description,
        } => {
            let group = services
                .groups
                .create_group(NewGroup {
                    title,
                    slug,
                    description,
                })
                .await
                .context("Failed to create group")?;
            println!("Created group {} ({})", group.id, group.slug);
        }
    }

    Ok(())
}

/// Configure CORS for the HTTP server with allowed origins from .env
fn configure_cors(allowed_origins: &str) -> actix_cors::Cors {
    use actix_cors::Cors;
    use actix_web::http::header;

    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
        ])
        .max_age(3600);

    for origin in allowed_origins.split(',').map(str::trim) {
        if !origin.is_empty() {
            cors = cors.allowed_origin(origin);
            tracing::debug!("Added allowed CORS origin: {}", origin);
        }
    }

    cors
}

async fn run_http_server(config: &AppConfig, services: AppServices) -> anyhow::Result<()> {
    use actix_web::middleware::{Logger, NormalizePath, TrailingSlash};
    use actix_web::{App, HttpServer};

    let addr = config.http_addr();
    let cors_allowed_origins = config.cors_allowed_origins.clone();

    tracing::info!("CORS allowed origins: {}", cors_allowed_origins);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(NormalizePath::new(TrailingSlash::Always))
            .wrap(Logger::default())
            .wrap(configure_cors(&cors_allowed_origins))
            .configure(|cfg| routes::configure(cfg, &services))
    })
    .bind(&addr)
    .with_context(|| format!("Failed to bind {}", addr))?
    .run();

    tracing::info!("HTTP server running on {}", addr);

    server.await?;

    tracing::info!("Shutting down...");
    Ok(())
}
