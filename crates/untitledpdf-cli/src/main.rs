mod cli;
mod entries_cmd;
mod font_cmd;
mod overlay_cmd;
mod page_range;
mod shared;
mod states_cmd;

use clap::Parser;
use cli::Cli;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Log to stderr; `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        cli::Commands::States {
            ref file,
            ref pages,
            ref format,
            ref extract,
        } => states_cmd::run(file, pages.as_deref(), format, &extract.to_options()),
        cli::Commands::Entries {
            ref file,
            ref pages,
            ref format,
            ref extract,
        } => entries_cmd::run(file, pages.as_deref(), format, &extract.to_options()),
        cli::Commands::Overlay {
            ref file,
            ref pages,
            ref format,
            dpi,
            zoom,
            ref extract,
        } => overlay_cmd::run(
            file,
            pages.as_deref(),
            format,
            dpi,
            zoom,
            &extract.to_options(),
        ),
        cli::Commands::Font {
            ref font_name,
            ref base_name,
            ref format,
        } => font_cmd::run(font_name, base_name.as_deref(), format),
    };

    if let Err(code) = result {
        std::process::exit(code);
    }
}
