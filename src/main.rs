use clap::Parser;
use log::error;
use scenegen::app;
use scenegen::io::cli::Cli;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();
    if cli.list {
        for line in app::scene_list() {
            println!("{line}");
        }
        return ExitCode::SUCCESS;
    }

    match execute(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn execute(cli: &Cli) -> scenegen::Result<()> {
    let config = cli.load_config()?;

    if cli.stats {
        app::stats(&config)?;
    } else {
        app::run(&config)?;
    }
    Ok(())
}
