//! rollatron - builds the Pianolatron data files
//!
//! Subcommands:
//! - `rollatron sync` - clone or update the roll production sources
//! - `rollatron build [DRUIDS...]` - generate per-roll JSON and the catalog
//! - `rollatron publish` - commit and push regenerated outputs
//! - `rollatron run` - sync, build, and publish in one go
//! - `rollatron config` - print the effective configuration

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use rollconf::RollConfig;
use rollpub::Published;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rollatron")]
#[command(about = "Builds the Pianolatron data files from scanned roll sources")]
#[command(version)]
struct Cli {
    /// Config file path, overriding the discovery chain
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Working tree root holding input/ and output/
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clone or update the roll production sources and stage them locally
    Sync {
        /// Git URL overriding the configured source repository
        #[arg(long)]
        source_url: Option<String>,
    },

    /// Generate per-roll JSON documents, MIDI outputs, and the catalog
    Build(BuildArgs),

    /// Commit regenerated outputs, and push when configured to
    Publish {
        /// Commit message (default: "Regenerate roll catalog (YYYY-MM-DD)")
        #[arg(short, long)]
        message: Option<String>,

        /// Show what would be committed without committing
        #[arg(long)]
        dry_run: bool,

        /// Commit but do not push
        #[arg(long)]
        no_push: bool,
    },

    /// Sync, build, and publish in one go
    Run(BuildArgs),

    /// Print the effective configuration as TOML
    Config,
}

#[derive(Args)]
struct BuildArgs {
    /// DRUIDs of rolls to process, separated by spaces
    druids: Vec<String>,

    /// CSV file listing rolls, with DRUIDs in the "Druid" column
    #[arg(short = 'c', long)]
    druids_csv_file: Option<PathBuf>,

    /// Plain text file listing DRUIDs, one per line
    #[arg(short = 'f', long)]
    druids_txt_file: Option<PathBuf>,

    /// Do not regenerate catalog.json (a preexisting file remains)
    #[arg(long)]
    no_catalog: bool,

    /// Always download object XML, overwriting cached files
    #[arg(long)]
    redownload_xml: bool,

    /// Folder with note (note/DRUID_note.mid) and expression (exp/DRUID_exp.mid) MIDI files
    #[arg(long)]
    midi_source_dir: Option<PathBuf>,

    /// Folder with hole analysis reports (DRUID.txt)
    #[arg(long)]
    analysis_source_dir: Option<PathBuf>,

    /// Include a tempo map in each roll document
    #[arg(long)]
    tempo_maps: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let mut config = RollConfig::load_from(cli.config.as_deref())?;
    if let Some(root) = cli.root {
        config.paths.root = root;
    }

    match cli.command {
        Commands::Sync { source_url } => {
            rollatron::sync(&config, source_url.as_deref()).await?;
        }

        Commands::Build(args) => {
            apply_build_args(&mut config, &args);
            let roster = resolve_roster(&config, &args)?;
            rollatron::build(&config, &roster, &build_options(&args)).await?;
        }

        Commands::Publish {
            message,
            dry_run,
            no_push,
        } => {
            let opts = publish_options(&config, message, dry_run, no_push);
            report_published(rollpub::publish(&config.paths.root, &opts).await?);
        }

        Commands::Run(args) => {
            apply_build_args(&mut config, &args);
            let roster = resolve_roster(&config, &args)?;
            let publish_opts = publish_options(&config, None, false, false);
            let published =
                rollatron::pipeline::run(&config, &roster, &build_options(&args), &publish_opts)
                    .await?;
            report_published(published);
        }

        Commands::Config => {
            print!("{}", config.to_toml());
        }
    }

    Ok(())
}

fn apply_build_args(config: &mut RollConfig, args: &BuildArgs) {
    if let Some(dir) = &args.midi_source_dir {
        config.build.midi_source_dir = dir.clone();
    }
    if let Some(dir) = &args.analysis_source_dir {
        config.build.analysis_source_dir = dir.clone();
    }
    if args.tempo_maps {
        config.build.tempo_maps = true;
    }
}

fn build_options(args: &BuildArgs) -> rollatron::BuildOptions {
    rollatron::BuildOptions {
        no_catalog: args.no_catalog,
        redownload_xml: args.redownload_xml,
    }
}

fn resolve_roster(config: &RollConfig, args: &BuildArgs) -> Result<Vec<mods::Druid>> {
    let request = catalog::RosterRequest {
        druids: args.druids.clone(),
        csv_file: args.druids_csv_file.clone(),
        txt_file: args.druids_txt_file.clone(),
        scan_dir: config.druids_dir(),
    };
    Ok(catalog::resolve(&request)?)
}

fn publish_options(
    config: &RollConfig,
    message: Option<String>,
    dry_run: bool,
    no_push: bool,
) -> rollpub::PublishOptions {
    rollpub::PublishOptions {
        allow: config.publish.allow.clone(),
        author_name: config.publish.author_name.clone(),
        author_email: config.publish.author_email.clone(),
        message: message.unwrap_or_else(rollatron::pipeline::default_message),
        remote: config.publish.remote.clone(),
        branch: config.publish.branch.clone(),
        push: config.publish.push && !no_push,
        dry_run,
    }
}

fn report_published(published: Published) {
    match published {
        Published::NoChanges => println!("No changes to publish."),
        Published::DryRun { files } => {
            println!("Would commit {} file(s):", files.len());
            for file in files {
                println!("  {file}");
            }
        }
        Published::Committed { files } => println!("Committed {} file(s).", files.len()),
    }
}
