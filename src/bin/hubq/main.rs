//! hubq CLI - inspect a capability manifest Hub

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use hubq::util::GlobalContext;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("hubq=debug")
    } else {
        EnvFilter::new("hubq=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let Cli {
        verbose,
        local,
        endpoint,
        type_instances,
        command,
    } = cli;

    let command = match command {
        Commands::Completions(args) => return commands::completions::execute(args),
        command => command,
    };

    // Command-line flags override configuration files
    let mut ctx = GlobalContext::new()?;
    ctx.set_verbose(verbose);
    {
        let config = ctx.config_mut();
        if let Some(endpoint) = endpoint {
            config.hub.endpoint = Some(endpoint);
            config.local.manifests_dir = None;
        }
        if let Some(dir) = local {
            config.local.manifests_dir = Some(dir);
        }
        if type_instances {
            config.local.load_type_instances = true;
        }
    }

    // Execute command
    match command {
        Commands::Interface(args) => commands::interface::execute(args, &ctx),
        Commands::Interfaces(args) => commands::interfaces::execute(args, &ctx),
        Commands::Latest(args) => commands::latest::execute(args, &ctx),
        Commands::Implementations(args) => commands::implementations::execute(args, &ctx),
        Commands::Exists(args) => commands::exists::execute(args, &ctx),
        Commands::TypeInstance(args) => commands::type_instance::execute(args, &ctx),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
