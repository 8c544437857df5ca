mod commands;
mod terminal;

use std::process::ExitCode;

use commands::{CommandLine, control};
use terminal::logging;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    let commands = CommandLine::parse_args();

    logging::init_logging(commands.verbose)?;

    let cfg = commands.to_config();
    control::run(&commands.action, &cfg).await
}
