use anyhow::Context;
use shelf_kernel::Migration;

use crate::DbPool;

const LEDGER_DDL: &str = "CREATE TABLE IF NOT EXISTS schema_migrations (\
    module TEXT NOT NULL, \
    id TEXT NOT NULL, \
    applied_at TIMESTAMPTZ NOT NULL DEFAULT now(), \
    PRIMARY KEY (module, id))";

/// Apply module migrations that have not run yet.
///
/// Each migration runs in its own transaction together with its ledger row,
/// so a failed migration leaves no trace and can be retried. Returns the
/// number of migrations applied by this call.
pub async fn run_migrations(
    pool: &DbPool,
    migrations: &[(String, Migration)],
) -> anyhow::Result<usize> {
    sqlx::query(LEDGER_DDL)
        .execute(pool)
        .await
        .context("failed to create schema_migrations table")?;

    let mut applied = 0;

    for (module, migration) in migrations {
        let already: Option<(String,)> =
            sqlx::query_as("SELECT id FROM schema_migrations WHERE module = $1 AND id = $2")
                .bind(module)
                .bind(migration.id)
                .fetch_optional(pool)
                .await
                .with_context(|| format!("failed to read migration ledger for '{module}'"))?;

        if already.is_some() {
            tracing::debug!(module = %module, migration = migration.id, "migration already applied");
            continue;
        }

        let mut tx = pool.begin().await.context("failed to open migration transaction")?;

        sqlx::raw_sql(migration.up)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("migration '{}/{}' failed", module, migration.id))?;

        sqlx::query("INSERT INTO schema_migrations (module, id) VALUES ($1, $2)")
            .bind(module)
            .bind(migration.id)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("failed to record migration '{}/{}'", module, migration.id))?;

        tx.commit()
            .await
            .with_context(|| format!("failed to commit migration '{}/{}'", module, migration.id))?;

        tracing::info!(module = %module, migration = migration.id, "migration applied");
        applied += 1;
    }

    Ok(applied)
}
