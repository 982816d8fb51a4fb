//! Hexwar - Development Tools

use clap::{Parser, Subcommand, ValueEnum};
use hexwar_core::hit_location::AttackSide;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hexwar_tools::tables;

#[derive(Parser)]
#[command(name = "hexwar-tools")]
#[command(about = "Development tools for the Hexwar combat core")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Side {
    Front,
    Left,
    Right,
    Rear,
}

impl From<Side> for AttackSide {
    fn from(side: Side) -> Self {
        match side {
            Side::Front => Self::Front,
            Side::Left => Self::Left,
            Side::Right => Self::Right,
            Side::Rear => Self::Rear,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Validate environment data files
    Validate {
        /// Path to data directory
        #[arg(default_value = "data/environments")]
        path: String,
    },
    /// Print the location and hit tables of a chassis
    Tables {
        /// Chassis name (e.g. biped, quad, lam)
        chassis: String,
        /// Attack side for the hit table
        #[arg(long, value_enum, default_value = "front")]
        side: Side,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print a RON template for a new environment file
    Template {
        /// Environment id
        id: String,
    },
}

fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Validate { path } => {
            tracing::info!("Validating environment files in: {path}");
            hexwar_tools::validate::validate_data_directory(std::path::Path::new(&path)).map(
                |report| tracing::info!("Validation passed: {} environment(s)", report.len()),
            )
        }
        Commands::Tables {
            chassis,
            side,
            json,
        } => tables::parse_chassis(&chassis).and_then(|chassis| {
            let dump = tables::chassis_tables(chassis, side.into());
            let text = if json {
                tables::render_json(&dump)?
            } else {
                tables::render_text(&dump)
            };
            println!("{text}");
            Ok(())
        }),
        Commands::Template { id } => tables::environment_template(&id).map(|text| println!("{text}")),
    };

    if let Err(e) = result {
        if let hexwar_tools::ToolError::Invalid { failures } = &e {
            for failure in failures {
                tracing::error!("{failure}");
            }
        }
        tracing::error!("Failed: {e}");
        std::process::exit(1);
    }
}
