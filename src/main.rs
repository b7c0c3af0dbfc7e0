//! Headless front-end: format conversion, filtering and config management.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use campus_map::config::AppConfig;
use campus_map::format::{ExportData, ExportOptions, FormatRegistry, ImportOptions};
use campus_map::model::ReferenceImage;
use campus_map::viewer::{ChipGroup, FeatureDetails, Viewer};

#[derive(Parser)]
#[command(name = "campus-map")]
#[command(about = "Campus map features: convert, filter and configure")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Configuration file (defaults to the user config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert between the SVG overlay and GeoJSON (format chosen by extension)
    Convert {
        /// Input file (.svg for an overlay, anything else is GeoJSON)
        input: PathBuf,

        /// Output file (.svg for an overlay, anything else is GeoJSON)
        output: PathBuf,

        /// Drop a ring's closing duplicate vertex on import
        #[arg(long)]
        strip_closing_point: bool,

        /// Reference image width, used as the overlay canvas
        #[arg(long, requires = "height")]
        width: Option<f64>,

        /// Reference image height, used as the overlay canvas
        #[arg(long, requires = "width")]
        height: Option<f64>,

        /// Reference image location to embed as the overlay backdrop
        #[arg(long, requires = "width")]
        background: Option<String>,
    },

    /// List the features that pass the given filters
    Inspect {
        /// Features file
        input: PathBuf,

        /// Show only these types (repeatable)
        #[arg(short = 't', long = "type")]
        types: Vec<String>,

        /// Require these services (repeatable)
        #[arg(short, long = "service")]
        services: Vec<String>,

        /// Case-insensitive name search
        #[arg(short, long)]
        query: Option<String>,
    },

    /// Print the effective configuration
    Config {
        /// Write it to the config file
        #[arg(long)]
        write: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (config, config_source) = load_config(cli.config.as_deref())?;

    // Initialize logging
    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else if cli.quiet {
        log::LevelFilter::Warn
    } else {
        config.preferences.log_level.to_level_filter()
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level.to_string()))
        .init();
    log::debug!("Configuration: {}", config_source);

    match cli.command {
        Commands::Convert {
            input,
            output,
            strip_closing_point,
            width,
            height,
            background,
        } => {
            let reference = match (width, height) {
                (Some(w), Some(h)) => {
                    let image = ReferenceImage::new(w, h);
                    Some(match background {
                        Some(href) => image.with_href(href),
                        None => image,
                    })
                }
                _ => None,
            };
            cmd_convert(&config, &input, &output, strip_closing_point, reference)
        }
        Commands::Inspect {
            input,
            types,
            services,
            query,
        } => cmd_inspect(&config, &input, &types, &services, query.as_deref()),
        Commands::Config { write } => cmd_config(&config, cli.config.as_deref(), write),
    }
}

fn load_config(path: Option<&Path>) -> Result<(AppConfig, String)> {
    match path {
        Some(path) => {
            let config = AppConfig::load_from_path(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?;
            Ok((config, path.display().to_string()))
        }
        None => Ok(match AppConfig::load_from_default_path() {
            Some(config) => (config, "user config file".to_string()),
            None => (AppConfig::default(), "built-in defaults".to_string()),
        }),
    }
}

fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn cmd_convert(
    config: &AppConfig,
    input: &Path,
    output: &Path,
    strip_closing_point: bool,
    reference: Option<ReferenceImage>,
) -> Result<()> {
    let registry = FormatRegistry::new();
    let source = registry.for_filename(&file_name(input))?;
    let target = registry.for_filename(&file_name(output))?;
    log::info!(
        "Converting {} ({}) -> {} ({})",
        input.display(),
        source.display_name(),
        output.display(),
        target.display_name()
    );

    let text = read_text(input)?;
    let options = ImportOptions::new().strip_closing_point(strip_closing_point);
    let imported = source
        .import(&text, &options)
        .with_context(|| format!("Failed to parse {}", input.display()))?;

    let data = ExportData::new(&imported.records).with_background(reference.as_ref());
    let exported = target.export(&data, &ExportOptions::from_tuning(&config.tuning))?;

    std::fs::write(output, &exported.content)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "Wrote {} features to {} ({} skipped on import)",
        exported.features_exported,
        output.display(),
        imported.warnings.len()
    );
    Ok(())
}

fn cmd_inspect(
    config: &AppConfig,
    input: &Path,
    types: &[String],
    services: &[String],
    query: Option<&str>,
) -> Result<()> {
    let registry = FormatRegistry::new();
    let mut viewer = Viewer::new(config);
    let text = read_text(input)?;
    viewer
        .import_named(&file_name(input), &text, &registry)
        .with_context(|| format!("Failed to parse {}", input.display()))?;

    for (group, labels) in [(ChipGroup::Type, types), (ChipGroup::Service, services)] {
        for label in labels {
            if viewer.toggle_chip(group, label).is_none() {
                log::warn!("No feature has {} '{}'", group.name().to_lowercase(), label);
            }
        }
    }
    if let Some(query) = query {
        viewer.set_query(query);
    }

    let visible = viewer.visible_ids();
    for id in &visible {
        if let Some(feature) = viewer.store().get(*id) {
            print_details(*id, &FeatureDetails::from_feature(feature));
        }
    }
    println!("{} of {} features shown", visible.len(), viewer.store().len());
    Ok(())
}

fn print_details(id: u32, details: &FeatureDetails) {
    let mut line = format!("#{:<4} {}", id, details.title);
    if !details.kind.is_empty() {
        line.push_str(&format!(" [{}]", details.kind));
    }
    if !details.services.is_empty() {
        line.push_str(&format!(" {{{}}}", details.services.join(", ")));
    }
    if let Some(target) = &details.target {
        line.push_str(&format!(" -> {}", target));
    }
    println!("{}", line);
}

fn cmd_config(config: &AppConfig, path: Option<&Path>, write: bool) -> Result<()> {
    if !write {
        println!("{}", config.to_json()?);
        return Ok(());
    }

    match path {
        Some(path) => config.save_to_path(path)?,
        None => config.save_to_default_path()?,
    }
    let shown = path
        .map(Path::to_path_buf)
        .or_else(AppConfig::default_path)
        .map(|p| p.display().to_string())
        .unwrap_or_default();
    println!("Configuration written to {}", shown);
    Ok(())
}
