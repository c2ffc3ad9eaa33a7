/*!

This is the command line interface for checking Spinnaker account manifests before they are applied
to a cluster.

!*/

mod crd;
mod load;
mod render;
mod services;
mod validate;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Builder;
use log::LevelFilter;
use model::AccountTypes;

/// The command line interface for validating Spinnaker accounts and rendering service settings.
#[derive(Debug, Parser)]
#[clap(author, version, about)]
struct Args {
    /// Set logging verbosity [trace|debug|info|warn|error]. If the environment variable `RUST_LOG`
    /// is present, it overrides the default logging behavior. See https://docs.rs/env_logger/latest
    #[clap(long = "log-level", default_value = "warn")]
    log_level: LevelFilter,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Parser)]
enum Command {
    /// Validate the accounts in a manifest.
    Validate(validate::Validate),
    /// Print the services that receive Kubernetes accounts.
    Services(services::Services),
    /// Print the settings each service would receive for the accounts in a manifest.
    Render(render::Render),
    /// Print the SpinnakerAccount custom resource definition.
    Crd(crd::Crd),
}

fn main() {
    let args = Args::parse();
    init_logger(args.log_level);
    if let Err(e) = run(args) {
        eprintln!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let types = AccountTypes::from_env().context("Unable to configure account types")?;
    match args.command {
        Command::Validate(validate) => validate.run(&types),
        Command::Services(services) => services.run(&types),
        Command::Render(render) => render.run(&types),
        Command::Crd(crd) => crd.run(),
    }
}

/// Initialize the logger with the value passed by `--log-level` (or its default) when the
/// `RUST_LOG` environment variable is not present. If present, the `RUST_LOG` environment variable
/// overrides `--log-level`/`level`.
fn init_logger(level: LevelFilter) {
    match std::env::var(env_logger::DEFAULT_FILTER_ENV).ok() {
        Some(_) => {
            // RUST_LOG exists; env_logger will use it.
            Builder::from_default_env().init();
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate and the model.
            Builder::new()
                .filter(Some(env!("CARGO_CRATE_NAME")), level)
                .filter(Some("spinnaker_accounts_model"), level)
                .init();
        }
    }
}
