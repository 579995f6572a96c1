use clap::ValueEnum;
use colored::Colorize;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use lab_driver::{ReportEntry, StepReport};
use mongodb::bson::{Bson, Document};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
	/// One relaxed Extended JSON document per line
	Json,
	Table,
}

#[derive(Debug, Clone)]
pub struct DisplayConfig {
	pub output_mode: OutputMode,
	pub use_colors: bool,
	pub max_column_width: usize,
}

impl Default for DisplayConfig {
	fn default() -> Self {
		Self {
			output_mode: OutputMode::Json,
			use_colors: true,
			max_column_width: 30,
		}
	}
}

pub fn print_connected(uri: &str, database: &str, collection: &str) {
	print_success(&format!("Connected to MongoDB at {}", uri.bright_white()));
	print_success(&format!("Database '{}' selected", database));
	print_success(&format!("Collection '{}' selected", collection));
}

pub fn print_closed() {
	println!();
	print_info("MongoDB connection closed");
}

pub fn print_error(msg: &str) {
	eprintln!("{} {}", "✗".bright_red().bold(), msg.bright_red());
}

pub fn print_warning(msg: &str) {
	println!("{} {}", "⚠".bright_yellow(), msg.bright_yellow());
}

pub fn print_info(msg: &str) {
	println!("{} {}", "ℹ".bright_blue(), msg.bright_white());
}

pub fn print_success(msg: &str) {
	println!("{} {}", "✓".bright_green().bold(), msg.bright_green());
}

pub fn print_report(report: &StepReport, config: &DisplayConfig) {
	println!("\n{}", format!("=== {} ===", report.step).bright_cyan().bold());

	for entry in &report.entries {
		match entry {
			ReportEntry::Heading(text) => println!("\n{}", text.bright_yellow()),
			ReportEntry::Message(text) => print_success(text),
			ReportEntry::Count { label, count } => {
				println!("{}: {}", label, count.to_string().bright_white().bold())
			}
			ReportEntry::Documents(docs) => println!("{}", format_documents(docs, config)),
		}
	}
}

pub fn format_documents(docs: &[Document], config: &DisplayConfig) -> String {
	if docs.is_empty() {
		return "(no documents)".dimmed().to_string();
	}

	match config.output_mode {
		OutputMode::Json => docs
			.iter()
			.map(format_document_json)
			.collect::<Vec<_>>()
			.join("\n"),
		OutputMode::Table => format_documents_table(docs, config.max_column_width),
	}
}

pub fn format_document_json(doc: &Document) -> String {
	Bson::Document(doc.clone()).into_relaxed_extjson().to_string()
}

/// Columns follow the order in which keys first appear across `docs`.
pub fn format_documents_table(docs: &[Document], max_width: usize) -> String {
	let mut columns: Vec<&str> = Vec::new();
	for doc in docs {
		for key in doc.keys() {
			if !columns.contains(&key.as_str()) {
				columns.push(key);
			}
		}
	}

	let mut table = Table::new();
	table
		.load_preset(UTF8_FULL)
		.set_content_arrangement(ContentArrangement::Dynamic)
		.set_header(columns.clone());

	for doc in docs {
		let row: Vec<String> = columns
			.iter()
			.map(|column| match doc.get(column) {
				Some(value) => truncate(&format_value(value), max_width),
				None => String::new(),
			})
			.collect();
		table.add_row(row);
	}

	table.to_string()
}

fn format_value(value: &Bson) -> String {
	match value {
		Bson::String(s) => s.clone(),
		Bson::ObjectId(id) => id.to_hex(),
		other => other.clone().into_relaxed_extjson().to_string(),
	}
}

fn truncate(text: &str, max_width: usize) -> String {
	if text.chars().count() <= max_width {
		return text.to_string();
	}
	let kept: String = text.chars().take(max_width.saturating_sub(3)).collect();
	format!("{}...", kept)
}
