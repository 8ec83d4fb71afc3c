pub mod handlers;

use crate::presentation::cli::{Cli, Commands};
use xmlpack_core::error::Result;

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Run { config, json } => handlers::handle_run(&config, json),
        Commands::Build { config } => handlers::handle_build(&config),
        Commands::Aggregate {
            archives,
            config,
            json,
        } => handlers::handle_aggregate(archives, &config, json),
        Commands::List { archive } => handlers::handle_list(&archive),
        Commands::Show { archive, member } => handlers::handle_show(&archive, &member),
    }
}
