use actix_web::{web, App, HttpServer};
use anyhow::Context;
use tracing::info;

use api_stress_tester::config::Settings;
use api_stress_tester::logging::init_tracing;
use api_stress_tester::{api, LoadGenerator};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::from_env().context("invalid configuration")?;
    init_tracing(settings.log_filter.as_deref());

    let sink = settings
        .event_sink()
        .with_context(|| format!("failed to open log file {}", settings.log_file.display()))?;
    let generator = web::Data::new(LoadGenerator::new(settings.engine(), sink));

    info!(
        addr = %settings.bind_addr,
        log_sink = ?settings.log_sink,
        "stress tester listening (POST /stress-test, GET /ws)"
    );

    HttpServer::new(move || {
        App::new()
            .app_data(generator.clone())
            .configure(api::configure)
    })
    .bind(settings.bind_addr)
    .with_context(|| format!("failed to bind {}", settings.bind_addr))?
    .run()
    .await
    .context("server terminated with an error")
}
