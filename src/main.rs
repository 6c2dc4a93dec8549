use clap::Parser;
use std::io;
use tasktree::config::{init_tracing, Cli};
use tasktree::{Console, ConsoleOptions, Session};
use tracing::info;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli)?;
    info!(version = env!("CARGO_PKG_VERSION"), "starting");

    // Everything lives here until the process exits.
    let mut session = Session::new();

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut console = Console::new(
        stdin.lock(),
        stdout.lock(),
        ConsoleOptions {
            color: !cli.no_color,
        },
    );
    console.run(&mut session)?;

    info!(managers = session.manager_count(), "session closed");
    Ok(())
}
