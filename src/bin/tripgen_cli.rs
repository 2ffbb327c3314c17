//! tripgen CLI: run travel operations from the command line.
//!
//! Usage:
//!   tripgen-cli itinerary <destination> [--days N] [--travelers N] [--interests a,b]
//!   tripgen-cli checklist <destination> [--days N] [--season S] [--activities a,b]
//!   tripgen-cli quote <origin> <destination> [--days N] [--travelers N] [--style S] [--currency C]
//!   tripgen-cli suggest <preference,...> [--count N] [--from X] [--month M] [--budget B]
//!   tripgen-cli advisory <destination> [--nationality N] [--date D]
//!   tripgen-cli phrases <destination> [--language L] [--count N]
//!   tripgen-cli schemas [<operation>]

use anyhow::{anyhow, bail, Context};
use serde::Serialize;
use std::future::Future;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use tripgen::operations::schemas;
use tripgen::{
    AdvisoryParams, ChecklistParams, DestinationParams, ItineraryParams, PhraseSheetParams,
    PriceQuoteParams, TravelPlanner,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    let rest = &args[2..];
    let outcome = match args[1].as_str() {
        "itinerary" => cmd_itinerary(rest).await,
        "checklist" => cmd_checklist(rest).await,
        "quote" => cmd_quote(rest).await,
        "suggest" => cmd_suggest(rest).await,
        "advisory" => cmd_advisory(rest).await,
        "phrases" => cmd_phrases(rest).await,
        "schemas" => cmd_schemas(rest),
        "version" | "--version" | "-V" => {
            cmd_version();
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    };

    if let Err(err) = outcome {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn print_usage() {
    println!(
        r#"tripgen-cli: structured travel planning on Gemini

USAGE:
    tripgen-cli <COMMAND> [ARGS] [OPTIONS]

COMMANDS:
    itinerary <destination>        Day-by-day itinerary (web grounded)
        --days N  --travelers N  --interests a,b  --budget B  --start YYYY-MM-DD
    checklist <destination>        Packing checklist
        --days N  --season S  --activities a,b
    quote <origin> <destination>   Trip cost estimate (web grounded)
        --days N  --travelers N  --style S  --currency C
    suggest <preference,...>       Destination ideas
        --count N  --from X  --month M  --budget B
    advisory <destination>         Entry, health and safety advisory (web grounded)
        --nationality N  --date D
    phrases <destination>          Phrase sheet
        --language L  --count N
    schemas [<operation>]          List operations, or print one response schema
    version                        Show version information
    help                           Show this help message

ENVIRONMENT:
    TRIPGEN_API_KEY                Gemini API key (falls back to GEMINI_API_KEY)
    TRIPGEN_MODEL                  Model id (default gemini-2.5-flash)
    TRIPGEN_CONFIG                 Optional YAML config file
    RUST_LOG                       Log filter (default info, logs go to stderr)"#
    );
}

fn cmd_version() {
    println!("tripgen-cli {}", env!("CARGO_PKG_VERSION"));
}

/// Value following `--name`, if present.
fn flag<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == name)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn flag_u32(args: &[String], name: &str, default: u32) -> anyhow::Result<u32> {
    match flag(args, name) {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("{name} expects a whole number, got '{raw}'")),
        None => Ok(default),
    }
}

fn flag_list(args: &[String], name: &str) -> Vec<String> {
    flag(args, name).map(split_list).unwrap_or_default()
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn flag_string(args: &[String], name: &str) -> Option<String> {
    flag(args, name).map(str::to_string)
}

/// Positional arguments, skipping `--flag value` pairs.
fn positional(args: &[String]) -> Vec<&str> {
    let mut out = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg.starts_with("--") {
            iter.next();
        } else {
            out.push(arg.as_str());
        }
    }
    out
}

fn required<'a>(args: &'a [String], index: usize, what: &str) -> anyhow::Result<&'a str> {
    positional(args)
        .get(index)
        .copied()
        .ok_or_else(|| anyhow!("missing {what}; see `tripgen-cli help`"))
}

/// Run one operation with Ctrl-C wired to cancellation and print the result.
async fn run_and_print<T, F, Fut>(operation: F) -> anyhow::Result<()>
where
    T: Serialize,
    F: FnOnce(TravelPlanner, CancellationToken) -> Fut,
    Fut: Future<Output = tripgen::Result<T>>,
{
    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    match operation(TravelPlanner::shared(), cancel).await {
        Ok(result) => {
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
        Err(err) => bail!(
            "[{} {}] {}",
            err.kind().code(),
            err.kind().name(),
            err.user_message()
        ),
    }
}

async fn cmd_itinerary(args: &[String]) -> anyhow::Result<()> {
    let mut params = ItineraryParams::new(
        required(args, 0, "destination")?,
        flag_u32(args, "--days", 3)?,
    );
    params.travelers = flag_u32(args, "--travelers", 1)?;
    params.interests = flag_list(args, "--interests");
    params.budget = flag_string(args, "--budget");
    params.start_date = flag_string(args, "--start");

    run_and_print(|planner, cancel| async move {
        planner.generate_itinerary(&params, &cancel).await
    })
    .await
}

async fn cmd_checklist(args: &[String]) -> anyhow::Result<()> {
    let mut params = ChecklistParams::new(
        required(args, 0, "destination")?,
        flag_u32(args, "--days", 3)?,
    );
    params.season = flag_string(args, "--season");
    params.activities = flag_list(args, "--activities");

    run_and_print(|planner, cancel| async move {
        planner.generate_packing_checklist(&params, &cancel).await
    })
    .await
}

async fn cmd_quote(args: &[String]) -> anyhow::Result<()> {
    let mut params = PriceQuoteParams::new(
        required(args, 0, "origin")?,
        required(args, 1, "destination")?,
        flag_u32(args, "--days", 3)?,
    );
    params.travelers = flag_u32(args, "--travelers", 1)?;
    params.travel_style = flag_string(args, "--style");
    params.currency = flag_string(args, "--currency");

    run_and_print(|planner, cancel| async move {
        planner.generate_price_quote(&params, &cancel).await
    })
    .await
}

async fn cmd_suggest(args: &[String]) -> anyhow::Result<()> {
    let mut params = DestinationParams::new(split_list(required(args, 0, "preferences")?));
    params.count = flag_u32(args, "--count", params.count)?;
    params.origin = flag_string(args, "--from");
    params.month = flag_string(args, "--month");
    params.budget = flag_string(args, "--budget");

    run_and_print(|planner, cancel| async move {
        planner.suggest_destinations(&params, &cancel).await
    })
    .await
}

async fn cmd_advisory(args: &[String]) -> anyhow::Result<()> {
    let mut params = AdvisoryParams::new(required(args, 0, "destination")?);
    params.nationality = flag_string(args, "--nationality");
    params.travel_date = flag_string(args, "--date");

    run_and_print(|planner, cancel| async move {
        planner.generate_travel_advisory(&params, &cancel).await
    })
    .await
}

async fn cmd_phrases(args: &[String]) -> anyhow::Result<()> {
    let mut params = PhraseSheetParams::new(required(args, 0, "destination")?);
    params.language = flag_string(args, "--language");
    params.count = flag_u32(args, "--count", params.count)?;

    run_and_print(|planner, cancel| async move {
        planner.generate_phrase_sheet(&params, &cancel).await
    })
    .await
}

fn cmd_schemas(args: &[String]) -> anyhow::Result<()> {
    match positional(args).first() {
        Some(operation) => {
            let entry = schemas::lookup(operation)
                .ok_or_else(|| anyhow!("unknown operation '{operation}'"))?;
            println!(
                "{}",
                serde_json::to_string_pretty(&entry.schema.to_response_schema())?
            );
        }
        None => {
            println!("{:<28} {:<24} GROUNDED  FIELDS", "OPERATION", "SCHEMA");
            for entry in schemas::registry() {
                println!(
                    "{:<28} {:<24} {:<9} {}",
                    entry.operation,
                    entry.schema.name,
                    if entry.grounded { "yes" } else { "no" },
                    entry.schema.field_names().join(", ")
                );
            }
        }
    }
    Ok(())
}
