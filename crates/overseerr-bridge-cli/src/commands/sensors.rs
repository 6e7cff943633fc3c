use crate::output::Output;
use color_eyre::Result;
use media_request_core::{RequestSensors, SensorRefreshTrigger};
use media_request_models::SensorKind;
use std::path::Path;
use std::sync::Arc;

/// Poll every sensor once and print the values
pub async fn run_sensors(config_path: Option<&Path>, output: &Output) -> Result<()> {
    let config = super::load_config(config_path)?;
    let sensors = Arc::new(RequestSensors::new(super::connect(&config).await?));

    let report = SensorRefreshTrigger::new(sensors.clone())
        .refresh_kinds(&SensorKind::ALL)
        .await;

    output.sensors(&sensors.snapshot().await);
    if report.failed > 0 {
        output.warn(format!("{} sensor(s) could not be updated, see the log for details", report.failed));
    }
    Ok(())
}
