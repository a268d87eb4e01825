use super::args::{Cli, Commands};
use super::handlers;
use super::logging;
use crate::config::Config;
use anyhow::Result;

pub fn run(cli: Cli) -> Result<()> {
    logging::init(cli.log_level);

    let config = Config::resolve(cli.config.as_deref())?.apply_cli(&cli);

    match &cli.command {
        Commands::Convert { input, output } => handlers::convert::handle(input, output, &config),
        Commands::Sessions { input, format } => handlers::sessions::handle(input, *format, &config),
    }
}
