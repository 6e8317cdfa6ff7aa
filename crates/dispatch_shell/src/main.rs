use clap::Parser;
use dispatch_shell::{Shell, ShellConfig};
use std::path::PathBuf;

/// Command line arguments for the dispatch shell
#[derive(Parser, Debug)]
#[command(name = "dispatch-shell")]
#[command(about = "Emergency dispatch record manager")]
struct Args {
    /// Path to the shell configuration JSON file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Most verbose level written to stderr
    #[arg(short, long, default_value = "warn")]
    log_level: tracing::Level,
}

fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Logs go to stderr so they never mix with the menu
    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .with_writer(std::io::stderr)
        .init();

    let config = match &args.config {
        Some(path) => {
            let config = ShellConfig::from_file(path)?;
            tracing::info!("Loaded shell config from {}", path.display());
            config
        }
        None => ShellConfig::default(),
    };

    let stdin = std::io::stdin();
    let mut shell = Shell::new(config, stdin.lock(), std::io::stdout());
    shell.run()
}
