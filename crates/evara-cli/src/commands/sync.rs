use crate::commands::common::AppContext;
use crate::error::CliError;

pub async fn run_sync(ctx: &AppContext) -> Result<(), CliError> {
    if ctx.sync.is_none() {
        return Err(CliError::SyncNotConfigured);
    }

    let store = ctx.open_store().await?;
    if !store.is_sync_enabled().await {
        return Err(CliError::SyncNotConfigured);
    }

    store.sync().await?;
    println!("Sync completed");
    Ok(())
}
