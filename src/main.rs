use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use imgcompare::cli::args::{Cli, Commands, ConfigAction, OutputFormat};
use imgcompare::cli::output::{self, Comparison};
use imgcompare::common::config::Config;
use imgcompare::common::format;
use imgcompare::duplicates::{
    self, quality, CancelToken, FileDecoder, ImageDecoder, ScanConfig, ScanEvent, SimilarityThreshold,
};
use imgcompare::scanner;

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    if cli.verbose {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("imgcompare=debug"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    match cli.command {
        Commands::Scan {
            ref path,
            similarity,
            recursive,
            ref extensions,
            duplicates_only,
            sequential,
            detailed,
        } => cmd_scan(
            &cli,
            path,
            similarity,
            recursive,
            extensions.clone(),
            duplicates_only,
            sequential,
            detailed,
        ),

        Commands::Compare {
            ref first,
            ref second,
        } => cmd_compare(&cli, first, second),

        Commands::Config { ref action } => cmd_config(action),

        Commands::Completions { ref shell } => {
            use clap::CommandFactory;
            let mut cmd = Cli::command();
            let shell = match shell {
                imgcompare::cli::args::CompletionShell::Bash => clap_complete::Shell::Bash,
                imgcompare::cli::args::CompletionShell::Zsh => clap_complete::Shell::Zsh,
                imgcompare::cli::args::CompletionShell::Fish => clap_complete::Shell::Fish,
            };
            clap_complete::generate(shell, &mut cmd, "imgcompare", &mut std::io::stdout());
            Ok(())
        }
    }
}

fn output_format(cli: &Cli, config: &Config) -> OutputFormat {
    cli.format
        .clone()
        .unwrap_or_else(|| config.output_format.clone().into())
}

// ─── Scan ─────────────────────────────────────────────────────────────────────

#[allow(clippy::too_many_arguments)]
fn cmd_scan(
    cli: &Cli,
    path: &str,
    similarity: Option<f64>,
    recursive: bool,
    extensions: Option<Vec<String>>,
    duplicates_only: bool,
    sequential: bool,
    detailed: bool,
) -> Result<()> {
    let config = Config::load()?;
    let out_format = output_format(cli, &config);

    let root = scanner::expand_home(path);
    if !root.exists() {
        anyhow::bail!("Path does not exist: {}", root.display());
    }

    let similarity = similarity.unwrap_or(config.similarity);
    let scan_config = ScanConfig {
        root: root.clone(),
        threshold: SimilarityThreshold::from_percent(similarity)?,
        extensions: extensions
            .map(|exts| {
                exts.iter()
                    .map(|e| e.trim().trim_start_matches('.').to_lowercase())
                    .collect()
            })
            .unwrap_or_else(|| config.extensions.clone()),
        recursive: recursive || config.recursive,
        parallel: config.parallel && !sequential,
    };

    let show_progress = !cli.quiet && out_format == OutputFormat::Human;

    if show_progress {
        println!();
        println!(
            "  {} Scanning for duplicate images in: {}",
            "🔍",
            format::format_path(&root).cyan()
        );
        println!();
    }

    let pb = output::make_progress(show_progress, "Fingerprinting images...");
    let report = duplicates::find_duplicates(&scan_config, &CancelToken::new(), |event| match event {
        ScanEvent::Progress { percent, .. } => {
            if let Some(ref pb) = pb {
                pb.set_position(percent as u64);
            }
        }
        ScanEvent::Skipped { path, .. } => {
            if let Some(ref pb) = pb {
                pb.set_message(format!("Skipped {}", format::truncate_left(&path.display().to_string(), 40)));
            }
        }
    })
    .with_context(|| format!("Failed to scan {}", root.display()))?;
    output::finish_progress(pb, &format!("Fingerprinted {}", format::format_count(report.images_fingerprinted)));

    match out_format {
        OutputFormat::Human => output::print_scan_results(&report, duplicates_only, detailed),
        OutputFormat::Json => output::print_scan_json(&report, duplicates_only),
        OutputFormat::Quiet => output::print_scan_quiet(&report),
    }

    Ok(())
}

// ─── Compare ──────────────────────────────────────────────────────────────────

fn cmd_compare(cli: &Cli, first: &str, second: &str) -> Result<()> {
    let config = Config::load()?;
    let first = scanner::expand_home(first);
    let second = scanner::expand_home(second);

    let a = FileDecoder.decode(&first)?;
    let b = FileDecoder.decode(&second)?;

    let fa = duplicates::extract(&a).map_err(|e| e.with_path(&first))?;
    let fb = duplicates::extract(&b).map_err(|e| e.with_path(&second))?;

    let cmp = Comparison {
        distance: duplicates::distance(&fa, &fb),
        threshold: SimilarityThreshold::from_percent(config.similarity)?.value(),
        psnr: quality::psnr(&a, &b)?,
        mssim: quality::mssim(&a, &b)?,
    };

    match output_format(cli, &config) {
        OutputFormat::Human => output::print_comparison(&first, &second, &cmp),
        OutputFormat::Json => output::print_comparison_json(&first, &second, &cmp),
        OutputFormat::Quiet => println!("{:.4}", cmp.distance),
    }

    Ok(())
}

// ─── Config ───────────────────────────────────────────────────────────────────

fn cmd_config(action: &ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = Config::load()?;
            println!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
        ConfigAction::Path => {
            println!("{}", Config::config_path().display());
            Ok(())
        }
        ConfigAction::Reset => {
            let config = Config::default();
            config.save()?;
            println!("  {} Configuration reset to defaults", "✓".green());
            Ok(())
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(key, value)?;
            config.save()?;
            println!("  {} Set {} = {}", "✓".green(), key, value);
            Ok(())
        }
    }
}
