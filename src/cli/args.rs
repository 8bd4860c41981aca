use clap::{Parser, Subcommand, ValueEnum};

/// imgcompare — find near-duplicate images in a folder
#[derive(Parser, Debug)]
#[command(
    name = "imgcompare",
    version,
    about = "Find near-duplicate images by colour-moment fingerprints",
    long_about = "imgcompare fingerprints every image in a folder and groups images whose\n\
                   fingerprints are close. Each group is anchored on the first image seen.",
    after_help = "EXAMPLES:\n  \
        imgcompare scan ~/Pictures                  Scan with the default 90% similarity\n  \
        imgcompare scan . --similarity 95           Stricter matching\n  \
        imgcompare scan . --duplicates-only -d      Only groups with duplicates, with paths\n  \
        imgcompare scan . --format json             Machine-readable output\n  \
        imgcompare compare a.png b.jpg              Distance, PSNR and SSIM of two images\n  \
        imgcompare config show                      Print the active configuration"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format
    #[arg(long, global = true)]
    pub format: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Quiet mode — minimal output
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan a folder for near-duplicate images
    Scan {
        /// Folder to scan
        #[arg(default_value = ".")]
        path: String,

        /// Similarity percentage (0-100); the match threshold is 100 minus this
        #[arg(long, short)]
        similarity: Option<f64>,

        /// Descend into sub-folders
        #[arg(long, short)]
        recursive: bool,

        /// Extensions to treat as images (comma separated)
        #[arg(long, value_delimiter = ',')]
        extensions: Option<Vec<String>>,

        /// Only list groups that have at least one duplicate
        #[arg(long)]
        duplicates_only: bool,

        /// Fingerprint one image at a time
        #[arg(long)]
        sequential: bool,

        /// Show member paths in each group
        #[arg(long, short)]
        detailed: bool,
    },

    /// Compare two images directly
    Compare {
        /// First image
        first: String,

        /// Second image
        second: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: CompletionShell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Print the configuration file location
    Path,
    /// Reset configuration to defaults
    Reset,
    /// Set a configuration value
    Set {
        /// Config key (similarity, extensions, recursive, parallel, output_format)
        key: String,
        /// New value
        value: String,
    },
}

#[derive(ValueEnum, Clone, Debug, PartialEq)]
pub enum OutputFormat {
    Human,
    Json,
    Quiet,
}

impl From<crate::common::config::OutputFormat> for OutputFormat {
    fn from(format: crate::common::config::OutputFormat) -> Self {
        match format {
            crate::common::config::OutputFormat::Human => OutputFormat::Human,
            crate::common::config::OutputFormat::Json => OutputFormat::Json,
            crate::common::config::OutputFormat::Quiet => OutputFormat::Quiet,
        }
    }
}

#[derive(ValueEnum, Clone, Debug)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_scan_flags() {
        let cli = Cli::parse_from([
            "imgcompare",
            "scan",
            "pics",
            "--similarity",
            "95",
            "--extensions",
            "png,webp",
            "--duplicates-only",
            "--format",
            "json",
        ]);
        assert_eq!(cli.format, Some(OutputFormat::Json));
        match cli.command {
            Commands::Scan {
                path,
                similarity,
                extensions,
                duplicates_only,
                recursive,
                ..
            } => {
                assert_eq!(path, "pics");
                assert_eq!(similarity, Some(95.0));
                assert_eq!(extensions, Some(vec!["png".to_string(), "webp".to_string()]));
                assert!(duplicates_only);
                assert!(!recursive);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
