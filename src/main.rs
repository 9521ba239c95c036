use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(name = "sth", about = "Browse a snippet library in the terminal")]
struct Cli {
    /// Path to the library JSON file. Omit it to browse a built-in sample.
    library: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = stash::tui::run(cli.library.as_deref()) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
