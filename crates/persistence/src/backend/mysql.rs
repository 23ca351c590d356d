// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! MySQL/MariaDB-specific persistence utilities.
//!
//! MySQL is the production backend (the school hosts run MariaDB), but it
//! is validated only via explicit opt-in tests. Those tests are marked
//! `#[ignore]` and executed by `cargo xtask test-mariadb`, which starts a
//! `MariaDB` container, sets `DATABASE_URL` and `GUARDIAN_SYNC_TEST_BACKEND`,
//! runs the ignored tests, and cleans the container up.
//!
//! Migrations live in `migrations_mysql/` and must stay schema-equivalent
//! to the `SQLite` migrations in `migrations/`; `cargo xtask
//! verify-migrations` enforces parity. When touching the schema, change
//! both directories.

use diesel::dsl::sql;
use diesel::sql_types::{BigInt, Integer};
use diesel::{Connection, MysqlConnection, QueryableByName, RunQueryDsl};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

use crate::error::PersistenceError;

/// Result type for foreign key check query.
#[derive(QueryableByName)]
struct ForeignKeyCheck {
    #[diesel(sql_type = Integer)]
    fk_checks: i32,
}

/// Helper function to get the last inserted row ID.
///
/// `MySQL` supports `LAST_INSERT_ID()` to retrieve the auto-increment ID
/// of the most recently inserted row. Raw SQL is justified: Diesel has no
/// direct API for this.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_last_insert_rowid(conn: &mut MysqlConnection) -> Result<i64, PersistenceError> {
    Ok(diesel::select(sql::<BigInt>("LAST_INSERT_ID()")).get_result(conn)?)
}

/// `MySQL`-specific migrations.
///
/// Functionally equivalent to the `SQLite` migrations but using
/// `MySQL`-compatible syntax (`AUTO_INCREMENT`, `VARCHAR` columns).
pub const MYSQL_MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations_mysql");

/// Initialize a `MySQL` database at the given URL and run migrations.
///
/// # Errors
///
/// Returns an error if connection or migration fails.
pub fn initialize_database(database_url: &str) -> Result<MysqlConnection, PersistenceError> {
    info!("Initializing MySQL database at: {}", database_url);

    let mut conn: MysqlConnection = MysqlConnection::establish(database_url)
        .map_err(|e| PersistenceError::DatabaseConnectionFailed(e.to_string()))?;

    run_migrations(&mut conn).map_err(|e| PersistenceError::MigrationFailed(e.to_string()))?;

    Ok(conn)
}

/// Run pending migrations on the provided `MySQL` connection.
///
/// # Errors
///
/// Returns an error if migration execution fails.
pub fn run_migrations(
    conn: &mut MysqlConnection,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    info!("Running MySQL database migrations");
    conn.run_pending_migrations(MYSQL_MIGRATIONS)?;
    Ok(())
}

/// Verify that foreign key enforcement is enabled on `MySQL`.
///
/// `MySQL` enforces foreign keys by default with `InnoDB`; this checks the
/// `foreign_key_checks` system variable has not been switched off.
///
/// # Errors
///
/// Returns an error if verification fails.
pub fn verify_foreign_key_enforcement(conn: &mut MysqlConnection) -> Result<(), PersistenceError> {
    // NOTE: raw SQL (justified - Diesel has no system variable query DSL)
    let result: Result<ForeignKeyCheck, _> =
        diesel::sql_query("SELECT @@foreign_key_checks AS fk_checks").get_result(conn);

    match result {
        Ok(check) => {
            if check.fk_checks == 1 {
                info!("MySQL foreign key enforcement is enabled");
                Ok(())
            } else {
                Err(PersistenceError::ForeignKeyEnforcementNotEnabled)
            }
        }
        Err(e) => Err(PersistenceError::QueryFailed(format!(
            "Failed to verify foreign key enforcement: {e}"
        ))),
    }
}
