//! Process command - extract one receipt from its OCR text.

use std::fs;
use std::io::{Read, Write};
use std::path::PathBuf;
use std::time::Instant;

use chrono::Local;
use clap::Args;
use console::style;
use tracing::{debug, info};

use struk_core::models::config::PrintConfig;
use struk_core::print::escpos;
use struk_core::{PrintHeader, ReceiptLayout, ReceiptRecord};

use super::{build_orchestrator, load_config, ModeArg};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// OCR text file, or "-" to read standard input
    #[arg(required = true)]
    input: String,

    /// Receipt family
    #[arg(short, long, value_enum, default_value = "token")]
    mode: ModeArg,

    /// Receipt image, sent to a vision-capable AI parser
    #[arg(long)]
    image: Option<PathBuf>,

    /// Replace the administrative fee (whole rupiah) and adjust the total
    #[arg(long)]
    admin: Option<u64>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON record
    Json,
    /// CSV with a header row
    Csv,
    /// Printable receipt layout
    Text,
    /// ESC/POS printer bytes
    Escpos,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
            OutputFormat::Escpos => "bin",
        }
    }
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let text = read_input(&args.input)?;
    let image = match &args.image {
        Some(path) => Some(image::open(path)?),
        None => None,
    };

    let orchestrator = build_orchestrator(&config)?;
    let outcome = orchestrator
        .extract(&text, image.as_ref(), args.mode.into())
        .await;
    info!("Extracted {} receipt via {}", outcome.record.mode(), outcome.source);

    let mut record = outcome.record;
    if let Some(fee) = args.admin {
        record.apply_admin_override(fee);
    }

    if !record.has_payload() {
        eprintln!(
            "{} Nothing usable found (no token or bill amount)",
            style("⚠").yellow()
        );
    }

    let output = render(&record, args.format, &config.print)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(&output)?;
        if !matches!(args.format, OutputFormat::Escpos) {
            writeln!(stdout)?;
        }
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn read_input(input: &str) -> anyhow::Result<String> {
    if input == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }

    let path = PathBuf::from(input);
    if !path.exists() {
        anyhow::bail!("Input file not found: {}", path.display());
    }
    Ok(fs::read_to_string(&path)?)
}

/// Serialize a record in the requested format.
pub fn render(
    record: &ReceiptRecord,
    format: OutputFormat,
    print: &PrintConfig,
) -> anyhow::Result<Vec<u8>> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_vec(record)?),
        OutputFormat::Csv => format_csv(record),
        OutputFormat::Text => Ok(layout_lines(record, print).join("\n").into_bytes()),
        OutputFormat::Escpos => Ok(escpos::encode(&layout_lines(record, print))),
    }
}

fn layout_lines(record: &ReceiptRecord, print: &PrintConfig) -> Vec<String> {
    let header = PrintHeader {
        store_name: print.store_name.clone(),
        printed_at: Local::now().naive_local(),
    };
    ReceiptLayout::new(print.line_width).render(record, &header)
}

/// Column names and values of a record, without the raw text.
pub fn csv_fields(record: &ReceiptRecord) -> (Vec<&'static str>, Vec<String>) {
    match record {
        ReceiptRecord::Token(r) => (
            vec![
                "mode", "idpel", "nama", "tarif", "kwh", "nominal", "admin", "total", "ppn",
                "angsmat", "token", "no_pesanan",
            ],
            vec![
                "token".to_string(),
                r.idpel.clone(),
                r.nama.clone(),
                r.tarif.clone(),
                r.kwh.clone(),
                r.nominal.clone(),
                r.admin.clone(),
                r.total.clone(),
                r.ppn.clone(),
                r.angsmat.clone(),
                r.token.clone(),
                r.no_pesanan.clone(),
            ],
        ),
        ReceiptRecord::Payment(r) => (
            vec![
                "mode", "idpel", "nama", "lokasi", "periode", "stand", "tagihan", "denda",
                "admin", "total", "no_pesanan",
            ],
            vec![
                "payment".to_string(),
                r.idpel.clone(),
                r.nama.clone(),
                r.lokasi.clone(),
                r.periode.clone(),
                r.stand.clone(),
                r.tagihan.clone(),
                r.denda.clone(),
                r.admin.clone(),
                r.total.clone(),
                r.no_pesanan.clone(),
            ],
        ),
    }
}

fn format_csv(record: &ReceiptRecord) -> anyhow::Result<Vec<u8>> {
    let (header, values) = csv_fields(record);

    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(&header)?;
    wtr.write_record(&values)?;

    Ok(wtr.into_inner()?)
}
