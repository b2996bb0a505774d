//! Migrate command - applies pending schema migrations and exits

use tracing::info;

use crate::config::StorageBackend;
use crate::infrastructure::storage::{connect_pool, run_account_migrations};

pub async fn run() -> anyhow::Result<()> {
    let config = super::load_config();

    if config.storage.backend == StorageBackend::Memory {
        anyhow::bail!("storage.backend is 'memory'; there is no schema to migrate");
    }

    let pool = connect_pool(&config.database).await?;
    run_account_migrations(&pool).await?;
    pool.close().await;

    info!("Migrations complete");

    Ok(())
}
