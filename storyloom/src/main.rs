//! Storyloom - write prose, keep characters and places in sync.
//!
//! A line-oriented shell over the project service. Story text typed at the
//! prompt is appended to the project and scanned for new character names.
//!
//! ```bash
//! cargo run -p storyloom -- --projects-dir ./projects --title "My Story"
//! ```

mod shell;

use shell::{parse_options_from_args, run_shell};
use std::io;
use storyloom_core::{ProjectService, ServiceConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout stays parseable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storyloom=info,storyloom_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args: Vec<String> = std::env::args().collect();
    let options = parse_options_from_args(&args);

    if options.help {
        print_help();
        return Ok(());
    }

    let mut config = ServiceConfig::from_env();
    if let Some(dir) = options.projects_dir {
        config = config.with_projects_dir(dir);
    }
    tracing::info!(dir = %config.projects_dir.display(), "using projects directory");
    let mut service = ProjectService::new(config);

    if let Some(path) = &options.open {
        if let Err(e) = service.open_project(path) {
            tracing::warn!(path = %path.display(), error = %e, "starting with a new project");
            eprintln!("Could not open {}: {e}", path.display());
        }
    }
    if !service.has_active_project() {
        match options.title {
            Some(title) => service.create_project(title),
            None => service.create_untitled_project(),
        };
    }

    let stdin = io::stdin();
    run_shell(&mut service, stdin.lock(), io::stdout())?;
    Ok(())
}

fn print_help() {
    println!("Storyloom - story writing shell");
    println!();
    println!("USAGE:");
    println!("  storyloom [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("  -h, --help              Show this help message");
    println!("  --projects-dir <DIR>    Where new projects are saved (default: projects,");
    println!("                          or $STORYLOOM_PROJECTS_DIR)");
    println!("  --open <PATH>           Open an existing project file");
    println!("  --title <TITLE>         Title for a new project");
    println!();
    println!("Logging is controlled with RUST_LOG (e.g. RUST_LOG=storyloom_core=debug).");
}
