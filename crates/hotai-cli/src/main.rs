use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "hotai")]
#[command(about = "Hot AI CLI - inspect and edit persisted assistant state", long_about = None)]
struct Cli {
    /// State directory (defaults to $HOTAI_STATE_DIR, then the platform config dir)
    #[arg(long, global = true)]
    state_dir: Option<PathBuf>,

    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print settings, presets and schema version
    Show,
    /// Run schema migration and print what it did
    Migrate,
    /// Store the language-model API key
    SetApiKey { key: String },
    /// Select the language model
    SetModel { model: String },
    /// Unset the selected model
    ClearModel,
    /// Manage presets
    Preset {
        #[command(subcommand)]
        action: PresetAction,
    },
}

#[derive(Subcommand)]
enum PresetAction {
    /// List presets in order
    List,
    /// Offer a preset to the user
    Enable { name: String },
    /// Hide a preset from the user
    Disable { name: String },
    /// Replace a preset's system prompt
    SetSystem { name: String, text: String },
    /// Restore a preset's default system prompt
    Reset { name: String },
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directive));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = commands::open_config(cli.state_dir.as_deref())?;

    match cli.command {
        Commands::Show => commands::show::run(&config)?,
        Commands::Migrate => commands::migrate::run(&config)?,
        Commands::SetApiKey { key } => commands::settings::set_api_key(&config, key)?,
        Commands::SetModel { model } => commands::settings::set_model(&config, Some(model))?,
        Commands::ClearModel => commands::settings::set_model(&config, None)?,
        Commands::Preset { action } => match action {
            PresetAction::List => commands::preset::list(&config)?,
            PresetAction::Enable { name } => commands::preset::set_enabled(&config, &name, true)?,
            PresetAction::Disable { name } => commands::preset::set_enabled(&config, &name, false)?,
            PresetAction::SetSystem { name, text } => {
                commands::preset::set_system(&config, &name, text)?
            }
            PresetAction::Reset { name } => commands::preset::reset(&config, &name)?,
        },
    }

    Ok(())
}
