//! dailyrate
//!
//! Terminal rate board and currency converter.

use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dailyrate_common::{currencies, now, CurrencyCode};
use dailyrate_fx::{Action, FxConfig, HttpRateFetcher, Multiplier, RateService, ViewState};

mod command;
mod controller;
mod debounce;
mod render;

use command::{parse_command, Command};
use controller::ViewController;

/// dailyrate CLI
#[derive(Parser, Debug)]
#[command(name = "dailyrate")]
#[command(about = "Daily currency rates and conversion")]
struct Args {
    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    /// Rate feed base URL (overrides DAILYRATE_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Pivot currency for conversions (overrides DAILYRATE_PIVOT)
    #[arg(long, global = true)]
    pivot: Option<CurrencyCode>,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// List supported currencies
    Currencies,

    /// Show the rate board for a base currency
    Rates {
        /// Base currency
        #[arg(long, default_value = "jpy")]
        base: CurrencyCode,

        /// Display multiplier: auto, 1, 10, 100, 1000 or 10000
        #[arg(long, default_value = "auto")]
        multiplier: String,
    },

    /// Convert an amount between two currencies
    Convert {
        /// Amount to convert
        amount: String,

        #[arg(long, default_value = "jpy")]
        from: CurrencyCode,

        #[arg(long, default_value = "usd")]
        to: CurrencyCode,
    },

    /// Interactive rate board and converter reading commands from stdin
    Interactive {
        /// Initial base currency
        #[arg(long, default_value = "jpy")]
        base: CurrencyCode,
    },
}

fn parse_multiplier(value: &str) -> anyhow::Result<Option<Multiplier>> {
    if value.eq_ignore_ascii_case("auto") {
        return Ok(None);
    }
    value
        .parse::<Multiplier>()
        .map(Some)
        .map_err(anyhow::Error::msg)
}

fn init_logging(json: bool) {
    let (json_layer, plain_layer) = if json {
        (
            Some(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)),
            None,
        )
    } else {
        (
            None,
            Some(tracing_subscriber::fmt::layer().with_writer(std::io::stderr)),
        )
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(json_layer)
        .with(plain_layer)
        .init();
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.log_json);

    let mut config = FxConfig::from_env();
    if let Some(url) = args.base_url.clone() {
        config.fetcher.base_url = url;
    }
    if let Some(pivot) = args.pivot {
        config.pivot = pivot;
    }
    config.validate().context("invalid configuration")?;

    let fetcher = Arc::new(HttpRateFetcher::new(config.fetcher.clone())?);
    let debounce = config.debounce;
    let service = Arc::new(RateService::new(fetcher, config));

    match args.command {
        Cmd::Currencies => {
            if args.json {
                print_json(&currencies())?;
            } else {
                print!("{}", render::render_currencies());
            }
        }
        Cmd::Rates { base, multiplier } => {
            let multiplier = parse_multiplier(&multiplier)?;
            let board = service.rate_board(base, multiplier, now()).await?;
            if args.json {
                print_json(&board)?;
            } else {
                print!("{}", render::render_board(&board));
            }
        }
        Cmd::Convert { amount, from, to } => {
            let conversion = service.convert_input(from, to, &amount, now()).await?;
            if args.json {
                print_json(&conversion)?;
            } else {
                println!("{}", render::render_conversion(&conversion));
            }
        }
        Cmd::Interactive { base } => {
            run_interactive(service, base, debounce, args.json).await?;
        }
    }

    Ok(())
}

async fn run_interactive(
    service: Arc<RateService>,
    base: CurrencyCode,
    debounce: std::time::Duration,
    json: bool,
) -> anyhow::Result<()> {
    info!(base = %base, pivot = %service.pivot(), "Starting interactive mode");

    let (controller, mut completions) = ViewController::new(service, ViewState::new(base), debounce);
    let show = |state: &ViewState| -> anyhow::Result<()> {
        if json {
            print_json(state)
        } else {
            print!("{}", render::render_state(state));
            Ok(())
        }
    };

    controller.dispatch(Action::SelectBase(base));
    if !json {
        println!("{}", command::HELP);
    }
    show(&controller.state())?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_command(&line) {
                    Ok(Command::Dispatch(action)) => {
                        controller.dispatch(action);
                        show(&controller.state())?;
                    }
                    Ok(Command::Show) => show(&controller.state())?,
                    Ok(Command::Help) => println!("{}", command::HELP),
                    Ok(Command::Quit) => break,
                    Err(message) => eprintln!("{}", message),
                }
            }
            Some(action) = completions.recv() => {
                controller.dispatch(action);
                show(&controller.state())?;
            }
            _ = tokio::signal::ctrl_c() => {
                warn!("Interrupted");
                break;
            }
        }
    }

    info!("Interactive mode finished");
    Ok(())
}
