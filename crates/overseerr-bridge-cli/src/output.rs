use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, modifiers::UTF8_ROUND_CORNERS, Attribute, Cell, Color, Table};
use media_request_models::{SearchResults, SensorState};
use owo_colors::OwoColorize;
use serde::Serialize;
use serde_json::json;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
    #[value(name = "json-pretty")]
    JsonPretty,
}

pub struct Output {
    format: OutputFormat,
    quiet: bool,
}

impl Output {
    pub fn new(format: OutputFormat, quiet: bool) -> Self {
        Self { format, quiet }
    }

    pub fn is_human(&self) -> bool {
        self.format == OutputFormat::Human
    }

    pub fn success(&self, msg: impl AsRef<str>) {
        self.message("success", "✓".green().to_string(), msg.as_ref());
    }

    pub fn info(&self, msg: impl AsRef<str>) {
        if self.quiet {
            return;
        }
        match self.format {
            OutputFormat::Human => println!("{}", msg.as_ref()),
            _ => self.print_json(&json!({ "type": "info", "message": msg.as_ref() })),
        }
    }

    pub fn warn(&self, msg: impl AsRef<str>) {
        self.message("warning", "⚠".yellow().to_string(), msg.as_ref());
    }

    /// Shown even in quiet mode
    pub fn error(&self, msg: impl AsRef<str>) {
        match self.format {
            OutputFormat::Human => eprintln!("{} {}", "✗".red(), msg.as_ref()),
            _ => self.print_json(&json!({ "type": "error", "message": msg.as_ref() })),
        }
    }

    fn message(&self, kind: &str, marker: String, msg: &str) {
        if self.quiet {
            return;
        }
        match self.format {
            OutputFormat::Human => println!("{} {}", marker, msg),
            _ => self.print_json(&json!({ "type": kind, "message": msg })),
        }
    }

    /// Machine-readable payload; printed as JSON even in human mode
    pub fn data<T: Serialize>(&self, data: &T) {
        if self.quiet && !self.is_human() {
            return;
        }
        match serde_json::to_value(data) {
            Ok(value) => self.print_json(&value),
            Err(e) => self.error(format!("Failed to encode output: {}", e)),
        }
    }

    fn print_json(&self, data: &serde_json::Value) {
        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string(data).unwrap_or_default()),
            _ => println!("{}", serde_json::to_string_pretty(data).unwrap_or_default()),
        }
    }

    pub fn search_results(&self, results: &SearchResults) {
        if !self.is_human() {
            self.data(results);
            return;
        }
        if self.quiet {
            return;
        }
        if results.is_empty() {
            self.warn("No results");
            return;
        }

        let mut table = styled_table(vec!["ID", "Type", "Title", "Year", "Popularity"]);
        for hit in &results.results {
            table.add_row(vec![
                Cell::new(hit.id),
                Cell::new(hit.media_type().map(|t| t.as_str()).unwrap_or("-")),
                Cell::new(hit.title().unwrap_or("-")),
                Cell::new(hit.year().unwrap_or("-")),
                Cell::new(
                    hit.popularity
                        .map(|p| format!("{:.1}", p))
                        .unwrap_or_else(|| "-".to_string()),
                ),
            ]);
        }
        println!("{}", table);
    }

    pub fn sensors(&self, sensors: &[SensorState]) {
        if !self.is_human() {
            self.data(&sensors);
            return;
        }
        if self.quiet {
            return;
        }

        let mut table = styled_table(vec!["Entity", "Name", "Value", "Updated"]);
        for sensor in sensors {
            let value = match sensor.value {
                Some(v) => Cell::new(v).fg(Color::Green),
                None => Cell::new("unknown").fg(Color::DarkGrey),
            };
            table.add_row(vec![
                Cell::new(&sensor.entity_id),
                Cell::new(&sensor.name),
                value,
                Cell::new(
                    sensor
                        .last_updated
                        .map(|t| t.to_rfc3339())
                        .unwrap_or_else(|| "-".to_string()),
                ),
            ]);
        }
        println!("{}", table);
    }
}

pub fn styled_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.apply_modifier(UTF8_ROUND_CORNERS);
    table.set_header(
        header
            .into_iter()
            .map(|h| Cell::new(h).fg(Color::Cyan).add_attribute(Attribute::Bold))
            .collect::<Vec<_>>(),
    );
    table
}
