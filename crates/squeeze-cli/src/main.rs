//! `squeeze-favorite`: start a hub favorite or toggle shuffle.

mod cli;

use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use squeeze::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Plan};

const EXIT_FAILURE: u8 = 1;
const EXIT_USAGE: u8 = 2;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => EXIT_USAGE,
            };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    init_tracing(cli.verbose);

    let plan = match cli.plan() {
        Ok(plan) => plan,
        Err(e) => {
            tracing::debug!(?e, "invalid flags");
            let _ = Cli::command().print_help();
            return ExitCode::from(e.exit_code());
        }
    };

    match run(plan, cli.json).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("squeeze-favorite: {e}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

async fn run(plan: Plan, json: bool) -> Result<(), SqueezeError> {
    let outcome = SqueezeClient::builder()
        .host(&plan.server)
        .port(plan.port)
        .response_timeout(plan.timeout)
        .connect()
        .await?
        .dispatch(plan.action)
        .await?;

    if json {
        match serde_json::to_string_pretty(&outcome) {
            Ok(text) => println!("{text}"),
            Err(e) => tracing::error!(error = %e, "could not render outcome as JSON"),
        }
        return Ok(());
    }

    match outcome {
        Outcome::Listed(listing) => println!("{listing}"),
        Outcome::FavoriteStarted { player, favorite } => {
            println!("Started '{favorite}' on '{player}'");
        }
        Outcome::ShuffleToggled { player, from, to } => {
            println!("Shuffle on '{player}': {from} -> {to}");
        }
        Outcome::ShuffleUnchanged { player } => {
            println!("Player '{player}' did not report its shuffle state; left unchanged");
        }
        Outcome::Rejected { message } => println!("{message}"),
    }
    Ok(())
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
