use anyhow::Context;
use clap::{Parser, ValueEnum};
use mt940_decoder::{Balance, DEFAULT_ENCODINGS, ParsedStatement, parse_batch_with};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "cli_extract",
    version,
    about = "Разбирает выписки MT940 и печатает их или выписку с нарастающим остатком.",
    long_about = None,
)]
struct Args {
    /// Входные файлы MT940
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Формат вывода
    #[arg(long, value_enum, default_value_t = Format::Summary)]
    format: Format,

    /// Кодировка-кандидат, можно указать несколько раз (по умолчанию utf-8, iso-8859-9, windows-1254, iso-8859-1)
    #[arg(long = "encoding")]
    encodings: Vec<String>,
}

/// Поддерживаемые форматы вывода
#[derive(Copy, Clone, Debug, ValueEnum)]
enum Format {
    /// человекочитаемая сводка
    Summary,
    /// bank extract в CSV
    Csv,
    /// bank extract в JSON
    Json,
    /// разобранная выписка целиком в JSON
    Statement,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() {
    init_logging();

    match run() {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(err) => {
            eprintln!("Error: {err:#}");
            process::exit(1);
        }
    }
}

fn format_balance(balance: Option<&Balance>) -> String {
    match balance {
        Some(b) => format!("{} {} {} {}", b.date, b.direction, b.amount, b.currency),
        None => "unset".to_string(),
    }
}

fn write_summary<W: Write>(out: &mut W, statement: &ParsedStatement) -> io::Result<()> {
    let header = statement.header();
    let bank = header.bank.map(|b| b.to_string()).unwrap_or_default();

    writeln!(
        out,
        "== {} | {} | {} | statement {}",
        header.transaction_ref, header.account_id, bank, header.statement_no
    )?;
    writeln!(out, "opening: {}", format_balance(statement.opening_balance()))?;
    for tx in statement.transactions() {
        writeln!(out, "  {tx}")?;
    }
    let totals = statement.totals();
    writeln!(
        out,
        "credit: {}  debit: {}  count: {}  net: {}",
        totals.total_credit, totals.total_debit, totals.count, totals.net_change
    )?;
    writeln!(out, "closing: {}", format_balance(statement.closing_balance()))?;
    Ok(())
}

/// Возвращает `false`, если хотя бы один файл не разобрался
fn run() -> anyhow::Result<bool> {
    let args = Args::parse();

    let encodings: Vec<&str> = if args.encodings.is_empty() {
        DEFAULT_ENCODINGS.to_vec()
    } else {
        args.encodings.iter().map(String::as_str).collect()
    };

    let mut all_ok = true;
    let mut inputs: Vec<(Vec<u8>, String)> = Vec::with_capacity(args.inputs.len());
    for path in &args.inputs {
        match fs::read(path) {
            Ok(bytes) => inputs.push((bytes, path.display().to_string())),
            Err(err) => {
                eprintln!("failed to read input file {}: {err}", path.display());
                all_ok = false;
            }
        }
    }

    let outcome = parse_batch_with(inputs, &encodings);

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match args.format {
        Format::Summary => {
            for statement in &outcome.parsed {
                write_summary(&mut handle, statement)?;
            }
        }
        Format::Csv => {
            for statement in &outcome.parsed {
                statement
                    .to_bank_extract()
                    .write_csv(&mut handle)
                    .context("failed to write CSV")?;
            }
        }
        Format::Json => {
            let extracts: Vec<_> = outcome.parsed.iter().map(|s| s.to_bank_extract()).collect();
            serde_json::to_writer_pretty(&mut handle, &extracts)?;
            writeln!(handle)?;
        }
        Format::Statement => {
            serde_json::to_writer_pretty(&mut handle, &outcome.parsed)?;
            writeln!(handle)?;
        }
    }

    info!(
        parsed = outcome.parsed.len(),
        failed = outcome.failed.len(),
        "batch finished"
    );
    for (label, err) in &outcome.failed {
        eprintln!("failed to parse {label}: {err}");
        all_ok = false;
    }

    Ok(all_ok)
}
