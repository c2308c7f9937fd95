use clap::Parser;
use mt940_decoder::{ParsedStatement, Reconciliation, parse_statement};
use std::fmt::Display;
use std::fs;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "cli_reconcile",
    version,
    about = "Сверяет открывающий баланс и проводки с заявленным закрывающим балансом.",
    long_about = None,
)]
struct Args {
    /// Входные файлы MT940
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

/// Итог сверки одного файла
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    Balanced,
    Mismatch,
    /// какого-то из балансов нет
    Unknown,
}

impl From<&Reconciliation> for Verdict {
    fn from(rec: &Reconciliation) -> Self {
        match rec.is_balanced() {
            Some(true) => Verdict::Balanced,
            Some(false) => Verdict::Mismatch,
            None => Verdict::Unknown,
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_logging();

    if !run() {
        process::exit(1);
    }
}

/// Печатает значение или "unset", не подменяя отсутствие нулём
fn fmt_opt<T: Display>(value: Option<T>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| "unset".to_string())
}

fn print_report(label: &str, statement: &ParsedStatement) -> Verdict {
    let rec = statement.reconcile();
    let verdict = Verdict::from(&rec);

    println!("{label} ({})", statement.header().account_id);
    println!("  opening:          {}", fmt_opt(rec.opening));
    println!("  net change:       {}", rec.net_change);
    println!("  computed closing: {}", fmt_opt(rec.computed_closing));
    println!("  declared closing: {}", fmt_opt(rec.declared_closing));

    match verdict {
        Verdict::Balanced => println!("  balanced"),
        Verdict::Mismatch => println!("  MISMATCH by {}", fmt_opt(rec.difference())),
        Verdict::Unknown => println!("  cannot reconcile: balance unset"),
    }

    verdict
}

/// Возвращает `false`, если какой-то файл не прочитался, не разобрался или не сошёлся
fn run() -> bool {
    let args = Args::parse();
    let mut all_ok = true;

    for path in &args.inputs {
        let label = path.display().to_string();

        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) => {
                eprintln!("failed to read input file {label}: {err}");
                all_ok = false;
                continue;
            }
        };

        match parse_statement(&bytes, &label) {
            Ok(statement) => {
                if print_report(&label, &statement) == Verdict::Mismatch {
                    all_ok = false;
                }
            }
            Err(err) => {
                eprintln!("failed to parse {label}: {err}");
                all_ok = false;
            }
        }
    }

    all_ok
}

#[cfg(test)]
mod tests {
    use super::*;

    const BALANCED: &str = ":20:R\n:60F:C240301TRY10,00\n:61:240301D4,00NTRF\n:62F:C240301TRY6,00\n";

    #[test]
    fn verdict_follows_reconciliation() {
        let ok = parse_statement(BALANCED.as_bytes(), "ok").unwrap();
        assert_eq!(Verdict::from(&ok.reconcile()), Verdict::Balanced);

        let drift = BALANCED.replace("TRY6,00", "TRY7,00");
        let bad = parse_statement(drift.as_bytes(), "bad").unwrap();
        assert_eq!(Verdict::from(&bad.reconcile()), Verdict::Mismatch);

        let no_closing = parse_statement(b":20:R\n:60F:C240301TRY10,00\n", "none").unwrap();
        assert_eq!(Verdict::from(&no_closing.reconcile()), Verdict::Unknown);
    }

    #[test]
    fn fmt_opt_never_prints_zero_for_absent() {
        assert_eq!(fmt_opt::<i32>(None), "unset");
        assert_eq!(fmt_opt(Some(0)), "0");
    }
}
