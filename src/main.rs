use actix_web::{App, HttpServer, middleware::Logger};
use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use invoicer::{
  adapters::http::configure_invoice_routes,
  application::invoice::RenderInvoiceUseCase,
  infrastructure::{config::Config, pdf::RendererFactory},
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
  // Initialize environment variables from .env file
  dotenvy::dotenv().ok();

  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "invoicer=debug,actix_web=info".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  tracing::info!("Starting invoicer");

  let config = Config::load().context("Failed to load configuration")?;
  tracing::info!("Configuration loaded successfully");

  let renderer = RendererFactory::create(&config.renderer).context("Failed to set up renderer")?;
  tracing::info!("Invoice renderer: {}", renderer.name());

  let render_use_case = Arc::new(RenderInvoiceUseCase::new(renderer));

  let bind_address = (config.server.host.clone(), config.server.port);
  tracing::info!(
    "Starting HTTP server at http://{}:{}",
    bind_address.0,
    bind_address.1
  );

  HttpServer::new(move || {
    App::new()
      .wrap(Logger::default())
      .configure(|cfg| configure_invoice_routes(cfg, render_use_case.clone()))
  })
  .bind(bind_address)
  .context("Failed to bind HTTP server")?
  .run()
  .await?;

  Ok(())
}
