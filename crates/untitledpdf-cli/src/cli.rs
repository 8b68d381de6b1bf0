use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use untitledpdf_core::{DEFAULT_DPI, ExtractOptions, ShowVariants};

/// Inspect PDF text states, text positions and editable text overlays.
#[derive(Debug, Parser)]
#[command(name = "untitledpdf", about, version)]
pub struct Cli {
    /// Increase log verbosity (-v: debug, -vv: trace). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the font state in effect at each text-showing operator
    States {
        /// Path to the PDF file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Page range (e.g. '1,3-5'). Default: all pages
        #[arg(long)]
        pages: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        #[command(flatten)]
        extract: ExtractArgs,
    },

    /// Print the position and text of each text-showing operator
    Entries {
        /// Path to the PDF file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Page range (e.g. '1,3-5'). Default: all pages
        #[arg(long)]
        pages: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        #[command(flatten)]
        extract: ExtractArgs,
    },

    /// Lay out editable text boxes over the rendered page
    Overlay {
        /// Path to the PDF file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Page range (e.g. '1,3-5'). Default: all pages
        #[arg(long)]
        pages: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Logical screen resolution in dots per inch
        #[arg(long, default_value_t = DEFAULT_DPI)]
        dpi: f64,

        /// Zoom factor applied on top of the resolution
        #[arg(long, default_value_t = 1.0)]
        zoom: f64,

        #[command(flatten)]
        extract: ExtractArgs,
    },

    /// Map a PDF font name to a rendering font description
    Font {
        /// Full font name as stored in the PDF (e.g. 'BAAAAA+Times-BoldItalic')
        #[arg(value_name = "FONT_NAME")]
        font_name: String,

        /// Base name to map instead of the one derived from FONT_NAME
        #[arg(long)]
        base_name: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = TextFormat::Text)]
        format: TextFormat,
    },
}

/// Content stream walking options shared by the extraction subcommands.
#[derive(Debug, Clone, Default, Args)]
pub struct ExtractArgs {
    /// Only emit for 'Tj'; skip 'TJ', ''' and '"'
    #[arg(long)]
    pub tj_only: bool,

    /// Stop reading a page's content stream after this many operators
    #[arg(long, value_name = "N")]
    pub max_operators: Option<usize>,
}

impl ExtractArgs {
    pub fn to_options(&self) -> ExtractOptions {
        ExtractOptions {
            show_variants: if self.tj_only {
                ShowVariants::TjOnly
            } else {
                ShowVariants::All
            },
            max_operators: self.max_operators,
            ..ExtractOptions::default()
        }
    }
}

/// Output format for the font subcommand.
#[derive(Debug, Clone, ValueEnum)]
pub enum TextFormat {
    /// Plain text output
    Text,
    /// JSON output
    Json,
}

/// Output format for per-page listings.
#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Plain text (tab-separated)
    Text,
    /// JSON output
    Json,
    /// CSV output
    Csv,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_states_subcommand_with_file() {
        let cli = Cli::parse_from(["untitledpdf", "states", "test.pdf"]);
        match cli.command {
            Commands::States {
                ref file,
                ref pages,
                ref format,
                ref extract,
            } => {
                assert_eq!(file, &PathBuf::from("test.pdf"));
                assert!(pages.is_none());
                assert!(matches!(format, OutputFormat::Text));
                assert!(!extract.tj_only);
                assert!(extract.max_operators.is_none());
            }
            _ => panic!("expected States subcommand"),
        }
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn parse_entries_with_pages_and_format() {
        let cli = Cli::parse_from([
            "untitledpdf",
            "entries",
            "test.pdf",
            "--pages",
            "1,3-5",
            "--format",
            "csv",
        ]);
        match cli.command {
            Commands::Entries {
                ref pages,
                ref format,
                ..
            } => {
                assert_eq!(pages.as_deref(), Some("1,3-5"));
                assert!(matches!(format, OutputFormat::Csv));
            }
            _ => panic!("expected Entries subcommand"),
        }
    }

    #[test]
    fn parse_extract_flags() {
        let cli = Cli::parse_from([
            "untitledpdf",
            "states",
            "test.pdf",
            "--tj-only",
            "--max-operators",
            "50",
        ]);
        let Commands::States { extract, .. } = cli.command else {
            panic!("expected States subcommand");
        };
        let options = extract.to_options();
        assert_eq!(options.show_variants, ShowVariants::TjOnly);
        assert_eq!(options.max_operators, Some(50));
        assert!(options.collect_warnings);
    }

    #[test]
    fn default_extract_args_emit_all_variants() {
        let options = ExtractArgs::default().to_options();
        assert_eq!(options.show_variants, ShowVariants::All);
        assert_eq!(options.max_operators, None);
    }

    #[test]
    fn parse_overlay_defaults() {
        let cli = Cli::parse_from(["untitledpdf", "overlay", "test.pdf"]);
        match cli.command {
            Commands::Overlay { dpi, zoom, .. } => {
                assert_eq!(dpi, 96.0);
                assert_eq!(zoom, 1.0);
            }
            _ => panic!("expected Overlay subcommand"),
        }
    }

    #[test]
    fn parse_overlay_dpi_and_zoom() {
        let cli = Cli::parse_from([
            "untitledpdf",
            "overlay",
            "test.pdf",
            "--dpi",
            "72",
            "--zoom",
            "2",
        ]);
        match cli.command {
            Commands::Overlay { dpi, zoom, .. } => {
                assert_eq!(dpi, 72.0);
                assert_eq!(zoom, 2.0);
            }
            _ => panic!("expected Overlay subcommand"),
        }
    }

    #[test]
    fn parse_font_subcommand() {
        let cli = Cli::parse_from([
            "untitledpdf",
            "font",
            "Times-BoldItalic",
            "--base-name",
            "Times-Roman",
            "--format",
            "json",
        ]);
        match cli.command {
            Commands::Font {
                ref font_name,
                ref base_name,
                ref format,
            } => {
                assert_eq!(font_name, "Times-BoldItalic");
                assert_eq!(base_name.as_deref(), Some("Times-Roman"));
                assert!(matches!(format, TextFormat::Json));
            }
            _ => panic!("expected Font subcommand"),
        }
    }

    #[test]
    fn verbose_is_global_and_counted() {
        let cli = Cli::parse_from(["untitledpdf", "states", "a.pdf", "-vv"]);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn invalid_format_rejected() {
        let result =
            Cli::try_parse_from(["untitledpdf", "states", "a.pdf", "--format", "xml"]);
        assert!(result.is_err());
    }

    #[test]
    fn missing_subcommand_rejected() {
        assert!(Cli::try_parse_from(["untitledpdf"]).is_err());
    }
}
