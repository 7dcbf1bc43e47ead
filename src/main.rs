//! deploy-plan CLI.
//!
//! ```text
//! deploy.toml ─▶ config ─▶ routing compiler ─▶ listener rules ─┐
//!                   │                                           ├─▶ plan JSON
//!                   └────▶ template renderer ─▶ bootstrap script┘
//! ```

use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use deploy_plan::config::{load_config, read_bootstrap_sources};
use deploy_plan::observability::logging::init_logging;
use deploy_plan::plan::{build_routing_table, render_bootstrap, DeploymentPlan};
use deploy_plan::template::Template;

#[derive(Parser)]
#[command(name = "deploy-plan")]
#[command(about = "Compile load balancer routes and render the node bootstrap script", long_about = None)]
struct Cli {
    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the full deployment plan as JSON
    Plan {
        #[arg(short, long)]
        config: PathBuf,
        /// Write the plan here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the compiled routing table
    Routes {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Print the rendered bootstrap script
    Render {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Validate config and template without producing output
    Check {
        #[arg(short, long)]
        config: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.json_logs);

    if let Err(e) = run(cli.command) {
        tracing::error!(error = %e, "deploy-plan failed");
        std::process::exit(1);
    }
}

fn run(command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Plan { config, output } => {
            let config = load_config(&config)?;
            let sources = read_bootstrap_sources(&config)?;
            let plan = DeploymentPlan::build(&config, &sources.template, &sources.compose_yaml)?;
            let json = plan.to_json()?;
            match output {
                Some(path) => {
                    fs::write(&path, json)?;
                    tracing::info!(path = %path.display(), "Plan written");
                }
                None => println!("{json}"),
            }
        }
        Commands::Routes { config } => {
            let config = load_config(&config)?;
            let table = build_routing_table(&config)?;
            println!("{:<8} {:<40} {:<6} {}", "PRIORITY", "HOST", "PORT", "TARGET GROUP");
            for rule in table.rules() {
                println!(
                    "{:<8} {:<40} {:<6} {}",
                    rule.priority, rule.fully_qualified_host, rule.backend_port(), rule.target_group.name
                );
            }
            let listener = table.listener();
            println!(
                "{:<8} {:<40} {:<6} fixed-response {}",
                listener.default_priority, "*", listener.port, listener.default_action.status_code
            );
        }
        Commands::Render { config } => {
            let config = load_config(&config)?;
            let sources = read_bootstrap_sources(&config)?;
            let artifact = render_bootstrap(&config, &sources.template, &sources.compose_yaml)?;
            print!("{}", artifact.script);
        }
        Commands::Check { config } => {
            let config = load_config(&config)?;
            let sources = read_bootstrap_sources(&config)?;
            build_routing_table(&config)?;
            render_bootstrap(&config, &sources.template, &sources.compose_yaml)?;
            let template = Template::parse(&sources.template)?;
            for name in template.placeholders() {
                println!("{name}");
            }
            tracing::info!("Configuration and template are valid");
        }
    }
    Ok(())
}
