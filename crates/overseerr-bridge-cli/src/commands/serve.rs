use crate::output::Output;
use crate::server::{self, AppState};
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use media_request_core::{ActionRegistry, RequestSensors, SensorRefreshTrigger, WebhookHandler};
use media_request_models::SensorKind;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};
use uuid::Uuid;

pub struct ServeOptions {
    pub bind: Option<String>,
    pub no_startup_refresh: bool,
}

/// Periodically re-poll every sensor until the task is aborted
async fn refresh_loop(trigger: SensorRefreshTrigger, every: Duration) {
    let mut interval = tokio::time::interval(every);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // the first tick completes immediately
    interval.tick().await;

    loop {
        interval.tick().await;
        let report = trigger.refresh_kinds(&SensorKind::ALL).await;
        debug!(
            operation = "scheduled_refresh",
            updated = report.updated,
            failed = report.failed,
            "Scheduled sensor refresh complete"
        );
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!(operation = "shutdown", "Shutdown requested");
}

pub async fn run_serve(options: ServeOptions, config_path: Option<&Path>, output: &Output) -> Result<()> {
    let config = super::load_config(config_path)?;
    let service = super::connect(&config).await?;

    let sensors = Arc::new(RequestSensors::new(service.clone()));
    let trigger = SensorRefreshTrigger::new(sensors.clone());

    let webhook_id = match config.server.webhook_id.clone() {
        Some(id) if !id.is_empty() => id,
        _ => {
            let id = Uuid::new_v4().simple().to_string();
            info!(webhook_id = %id, "No webhook id configured, generated one for this run");
            id
        }
    };

    let state = Arc::new(AppState {
        actions: ActionRegistry::new(service),
        sensors: sensors.clone(),
        webhook: WebhookHandler::new(trigger.clone()),
        webhook_id: webhook_id.clone(),
    });

    if config.sensors.refresh_on_startup && !options.no_startup_refresh {
        info!(operation = "startup_refresh", "Refreshing sensors on startup");
        trigger.refresh_kinds(&SensorKind::ALL).await;
    }

    let scan_interval = Duration::from_secs(config.sensors.scan_interval_seconds);
    let refresher = tokio::spawn(refresh_loop(trigger, scan_interval));

    let bind = options.bind.unwrap_or(config.server.bind);
    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .wrap_err_with(|| format!("Failed to bind {}", bind))?;

    info!(
        operation = "server_started",
        bind = %bind,
        scan_interval_seconds = config.sensors.scan_interval_seconds,
        "Listening for service calls and webhooks"
    );
    output.info(format!("Webhook URL: http://{}/api/webhook/{}", bind, webhook_id));

    let served = axum::serve(listener, server::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await;

    refresher.abort();
    served.wrap_err("HTTP server failed")?;

    info!(operation = "server_stopped", "Server stopped");
    Ok(())
}
