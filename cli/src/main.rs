use std::{path::PathBuf, sync::Arc};

use clap::{CommandFactory, Parser};
use discotheque_core::{
    catalog::Catalog,
    config::Settings,
    logger::{init_logger, init_tracing},
};
use discotheque_storage::db::{init_database, set_database_path};

mod handlers;

use handlers::{CommandHandler, utils::WriteAdapter};

/// Options configurable via the CLI.
#[derive(Debug, Parser)]
#[command(name = "discotheque", version = env!("CARGO_PKG_VERSION"), about)]
struct Flags {
    /// config file path, defaults to `Discotheque.toml` in the config directory
    #[clap(long, value_hint = clap::ValueHint::FilePath)]
    config: Option<PathBuf>,
    /// Directory the catalog database is stored in
    #[clap(long, value_hint = clap::ValueHint::DirPath)]
    db_path: Option<PathBuf>,
    /// Keep the catalog in memory, nothing is written to disk
    #[clap(long, conflicts_with = "db_path")]
    memory: bool,
    /// log level
    #[clap(long)]
    log_level: Option<log::LevelFilter>,
    /// subcommand to run
    #[clap(subcommand)]
    subcommand: Option<handlers::Command>,
}

#[test]
fn verify_cli() {
    Flags::command().debug_assert();
}

#[cfg(not(tarpaulin_include))]
fn main() -> anyhow::Result<()> {
    clap_complete::CompleteEnv::with_factory(Flags::command).complete();

    let flags = Flags::parse();

    let config_file = match flags.config {
        Some(config) => config,
        None => Settings::get_config_path()?,
    };
    let settings = Settings::init(config_file, flags.db_path, flags.log_level)?;

    init_logger(settings.catalog.log_level);
    tracing::subscriber::set_global_default(init_tracing())?;

    if !flags.memory {
        set_database_path(settings.catalog.database_path()?)?;
    }

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    rt.block_on(async {
        let catalog = Catalog::new(Arc::new(init_database().await?));

        let mut stdout_adapter = WriteAdapter(std::io::stdout());
        let mut stderr_adapter = WriteAdapter(std::io::stderr());

        if let Some(command) = flags.subcommand {
            command
                .handle(
                    &catalog,
                    &mut stdout_adapter,
                    &mut stderr_adapter,
                    &std::io::stdin(),
                )
                .await?;
        } else {
            eprintln!("No subcommand provided");
        }

        Ok(())
    })
}
