use std::path::PathBuf;

use evara_core::PlannerConfig;
use serde::Serialize;

use crate::cli::ConfigCommands;
use crate::commands::common::{display_path, print_json, AppContext};
use crate::error::CliError;

#[derive(Debug, Serialize)]
struct ResolvedConfig<'a> {
    config_path: String,
    db_path: String,
    sync_enabled: bool,
    settings: &'a PlannerConfig,
}

pub fn run_config(command: ConfigCommands, ctx: &AppContext) -> Result<(), CliError> {
    match command {
        ConfigCommands::Show => run_show(ctx),
        ConfigCommands::Init {
            reply_delay_ms,
            vendor_image,
            event_image,
            database,
            sync_url,
        } => {
            let updates = ConfigUpdates {
                reply_delay_ms,
                vendor_image,
                event_image,
                database,
                sync_url,
            };
            run_init(updates, ctx)
        }
    }
}

fn run_show(ctx: &AppContext) -> Result<(), CliError> {
    print_json(&ResolvedConfig {
        config_path: display_path(&ctx.config_path),
        db_path: display_path(&ctx.db_path),
        sync_enabled: ctx.sync.is_some(),
        settings: &ctx.config,
    })
}

/// Values passed to `config init`; unset flags keep the current setting
#[derive(Debug, Default)]
pub struct ConfigUpdates {
    pub reply_delay_ms: Option<u64>,
    pub vendor_image: Option<String>,
    pub event_image: Option<String>,
    pub database: Option<PathBuf>,
    pub sync_url: Option<String>,
}

impl ConfigUpdates {
    /// Empty strings clear optional settings.
    pub fn apply(self, config: &mut PlannerConfig) {
        if let Some(delay) = self.reply_delay_ms {
            config.reply_delay_ms = delay;
        }
        if let Some(image) = self.vendor_image {
            config.default_vendor_image = Some(image);
        }
        if let Some(image) = self.event_image {
            config.default_event_image = Some(image);
        }
        if let Some(database) = self.database {
            config.db_path = Some(database);
        }
        if let Some(url) = self.sync_url {
            config.sync_url = Some(url);
        }
    }
}

fn run_init(updates: ConfigUpdates, ctx: &AppContext) -> Result<(), CliError> {
    let mut config = ctx.config.clone();
    updates.apply(&mut config);
    config.save_to_path(&ctx.config_path)?;
    println!("Wrote {}", ctx.config_path.display());
    Ok(())
}
