use clap::Parser;

use layerconf::cli::{Cli, execute_command, init_logger_from_cli};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logger_from_cli(&cli)?;

    tracing::debug!(
        version = layerconf::pkg_version(),
        dir = %cli.dir.display(),
        env = %cli.env,
        "Resolving configuration"
    );

    let output = execute_command(&cli)?;
    println!("{output}");

    Ok(())
}
