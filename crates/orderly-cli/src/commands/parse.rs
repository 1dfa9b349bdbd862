//! Parse command - extract orders from a single message.

use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::{Args, ValueEnum};
use console::style;
use tokio::io::AsyncReadExt;
use tracing::{debug, info};

use orderly_core::models::order::FIELD_NAMES;
use orderly_core::{OrderParser, OrderRecord, OrderlyConfig};

use super::config::load_config;

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Message text (reads stdin when neither TEXT nor --file is given)
    text: Option<String>,

    /// Read the message from a file
    #[arg(short = 'i', long, conflicts_with = "text")]
    file: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format (default: from config)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Reference date for "today", "tmrw" and weekday names (YYYY-MM-DD)
    #[arg(long)]
    today: Option<NaiveDate>,

    /// Treat the whole message as one order instead of splitting by unit
    #[arg(long)]
    single: bool,

    /// Override a field on every extracted order (e.g. --set broker=Mani)
    #[arg(long = "set", value_name = "FIELD=VALUE")]
    overrides: Vec<String>,

    /// Print extraction warnings to stderr
    #[arg(long)]
    warnings: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    /// File extension for this format.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }

    /// Explicit choice, else the configured default.
    pub fn resolve(explicit: Option<Self>, config: &OrderlyConfig) -> anyhow::Result<Self> {
        match explicit {
            Some(format) => Ok(format),
            None => OutputFormat::from_str(&config.output.format, true).map_err(|e| {
                anyhow::anyhow!("Invalid output format in config: {}", e)
            }),
        }
    }
}

pub async fn run(args: ParseArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let parser = OrderParser::from_config(&config.extraction)?;
    let format = OutputFormat::resolve(args.format, &config)?;
    let today = reference_date(args.today, &config);

    let text = read_message(&args).await?;
    info!("Parsing {} characters, today = {}", text.len(), today);

    let overrides = parse_overrides(&args.overrides)?;

    let result = if args.single {
        parser.parse_single(&text, today)
    } else {
        parser.parse(&text, today)
    };
    let orders: Vec<OrderRecord> = result
        .orders
        .iter()
        .map(|o| o.with_overrides(&overrides))
        .collect();

    if args.warnings {
        for warning in &result.warnings {
            eprintln!("{} {}", style("⚠").yellow(), warning);
        }
    }

    let output = if args.single {
        format_order(&orders[0], format, config.output.pretty)?
    } else {
        format_orders(&orders, format, config.output.pretty)?
    };

    if let Some(output_path) = &args.output {
        tokio::fs::write(output_path, &output).await?;
        println!(
            "{} {} order(s) written to {}",
            style("✓").green(),
            orders.len(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Parse finished in {}ms", result.processing_time_ms);

    Ok(())
}

/// Date that "today" refers to: flag, then config, then the local clock.
pub fn reference_date(explicit: Option<NaiveDate>, config: &OrderlyConfig) -> NaiveDate {
    explicit
        .or(config.extraction.reference_date)
        .unwrap_or_else(|| Local::now().date_naive())
}

async fn read_message(args: &ParseArgs) -> anyhow::Result<String> {
    if let Some(text) = &args.text {
        return Ok(text.clone());
    }

    if let Some(path) = &args.file {
        if !path.exists() {
            anyhow::bail!("Input file not found: {}", path.display());
        }
        return Ok(tokio::fs::read_to_string(path).await?);
    }

    let mut text = String::new();
    tokio::io::stdin().read_to_string(&mut text).await?;
    Ok(text)
}

/// Turn `field=value` pairs into an override record.
fn parse_overrides(pairs: &[String]) -> anyhow::Result<OrderRecord> {
    pairs.iter().try_fold(OrderRecord::default(), |record, pair| -> anyhow::Result<OrderRecord> {
        let (field, value) = pair
            .split_once('=')
            .ok_or_else(|| anyhow::anyhow!("Expected FIELD=VALUE, got: {}", pair))?;
        Ok(record.set_field(field.trim(), value)?)
    })
}

/// Render one order.
pub fn format_order(order: &OrderRecord, format: OutputFormat, pretty: bool) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json if pretty => Ok(serde_json::to_string_pretty(order)?),
        OutputFormat::Json => Ok(serde_json::to_string(order)?),
        _ => format_orders(std::slice::from_ref(order), format, pretty),
    }
}

/// Render a list of orders.
pub fn format_orders(orders: &[OrderRecord], format: OutputFormat, pretty: bool) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json if pretty => Ok(serde_json::to_string_pretty(orders)?),
        OutputFormat::Json => Ok(serde_json::to_string(orders)?),
        OutputFormat::Csv => format_csv(orders),
        OutputFormat::Text => Ok(format_text(orders)),
    }
}

fn format_csv(orders: &[OrderRecord]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    let mut header: Vec<&str> = FIELD_NAMES.to_vec();
    header.push("amount");
    wtr.write_record(&header)?;

    for order in orders {
        let mut row: Vec<String> = FIELD_NAMES.iter().map(|name| order.field(name)).collect();
        row.push(order.amount().map(|a| a.to_string()).unwrap_or_default());
        wtr.write_record(&row)?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(orders: &[OrderRecord]) -> String {
    let mut output = String::new();

    for (i, order) in orders.iter().enumerate() {
        if i > 0 {
            output.push('\n');
        }

        match &order.unit {
            Some(unit) => output.push_str(&format!("Order {} — {}\n", i + 1, unit)),
            None => output.push_str(&format!("Order {}\n", i + 1)),
        }

        for name in FIELD_NAMES.iter().filter(|name| **name != "unit") {
            let value = order.field(name);
            if !value.is_empty() {
                output.push_str(&format!("  {:<9}{}\n", format!("{}:", capitalize(name)), value));
            }
        }

        if let Some(amount) = order.amount() {
            output.push_str(&format!("  {:<9}{}\n", "Amount:", amount));
        }
    }

    output
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> OrderRecord {
        OrderRecord::default()
            .set_field("unit", "STL")
            .and_then(|o| o.set_field("bags", "10"))
            .and_then(|o| o.set_field("rate", "1200"))
            .and_then(|o| o.set_field("customer", "Ravi"))
            .unwrap()
    }

    #[test]
    fn test_parse_overrides() {
        let overrides =
            parse_overrides(&["broker=Mani".to_string(), "date = 2025-08-22".to_string()]).unwrap();

        assert_eq!(overrides.broker.as_deref(), Some("Mani"));
        assert_eq!(overrides.date, NaiveDate::from_ymd_opt(2025, 8, 22));
        assert!(parse_overrides(&["broker".to_string()]).is_err());
        assert!(parse_overrides(&["colour=red".to_string()]).is_err());
    }

    #[test]
    fn test_format_csv() {
        let csv = format_orders(&[sample()], OutputFormat::Csv, false).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "unit,date,bags,broker,customer,rate,amount");
        assert_eq!(lines[1], "STL,,10,,Ravi,1200,12000");
    }

    #[test]
    fn test_format_text() {
        let text = format_orders(&[sample()], OutputFormat::Text, false).unwrap();

        assert!(text.starts_with("Order 1 — STL\n"));
        assert!(text.contains("  Bags:    10\n"));
        assert!(text.contains("  Amount:  12000\n"));
        assert!(!text.contains("Broker"));
    }

    #[test]
    fn test_format_single_json() {
        let json = format_order(&sample(), OutputFormat::Json, false).unwrap();
        assert_eq!(json, r#"{"unit":"STL","bags":"10","rate":"1200","customer":"Ravi"}"#);
    }

    #[test]
    fn test_reference_date_precedence() {
        let mut config = OrderlyConfig::default();
        config.extraction.reference_date = NaiveDate::from_ymd_opt(2025, 1, 1);

        let flag = NaiveDate::from_ymd_opt(2025, 8, 20);
        assert_eq!(Some(reference_date(flag, &config)), flag);
        assert_eq!(reference_date(None, &config), NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
    }
}
