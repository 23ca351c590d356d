// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! # xtask - Project Automation and Infrastructure Orchestration
//!
//! Provides explicit, opt-in backend validation for MySQL/MariaDB in
//! addition to the default `SQLite` backend, plus the usual build, lint,
//! and test wrappers.
//!
//! ## Backend Testing Commands
//!
//! - `cargo test` — Runs all standard tests against `SQLite` (fast, no infrastructure)
//! - `cargo xtask test-mariadb` — Runs backend validation tests against `MariaDB`
//! - `cargo xtask verify-migrations` — Checks schema parity between the
//!   `SQLite` and `MySQL` migration directories
//!
//! ### Design Principles
//!
//! - No test infrastructure is embedded in test code
//! - No tests silently skip due to missing services
//! - External databases are opt-in only, never automatic
//! - Standard `cargo test` remains fast and infrastructure-free
//! - All backend-specific orchestration lives in xtask

#![deny(
    clippy::pedantic,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use std::collections::{BTreeMap, BTreeSet};

use cargo_metadata::MetadataCommand;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::{Result, eyre::Context};
use diesel::sql_types::{Integer, Text};
use diesel::{MysqlConnection, QueryableByName, RunQueryDsl, SqliteConnection};
use duct::cmd;
use tracing::level_filters::LevelFilter;
use tracing_log::AsTrace;

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .without_time()
        .init();

    match args.run() {
        Ok(()) => (),
        Err(err) => {
            tracing::error!("{err}");
            std::process::exit(1);
        }
    }
    Ok(())
}

#[derive(Debug, Parser)]
#[command(bin_name = "cargo xtask", styles = clap_cargo::style::CLAP_STYLING)]
struct Args {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

impl Args {
    fn run(self) -> Result<()> {
        self.command.run()
    }

    fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Run CI checks (lint, build, test)
    CI,

    /// Build the project
    #[command(visible_alias = "b")]
    Build,

    /// Run cargo check
    #[command(visible_alias = "c")]
    Check,

    /// Lint formatting, clippy, and docs
    #[command(visible_alias = "l")]
    Lint,

    /// Run clippy on the project
    #[command(visible_alias = "cl")]
    LintClippy,

    /// Check documentation for errors and warnings
    #[command(visible_alias = "d")]
    LintDocs,

    /// Check for formatting issues in the project
    #[command(visible_alias = "lf")]
    LintFormatting,

    /// Fix formatting issues in the project
    #[command(visible_alias = "fmt")]
    FixFormatting,

    /// Run tests
    #[command(visible_alias = "t")]
    Test,

    /// Run `MariaDB` backend validation tests
    #[command(visible_alias = "tm")]
    TestMariadb,

    /// Verify schema parity between `SQLite` and `MySQL` migrations
    #[command(visible_alias = "vm")]
    VerifyMigrations,
}

impl Command {
    fn run(self) -> Result<()> {
        match self {
            Self::CI => ci(),
            Self::Build => build(),
            Self::Check => check(),
            Self::Lint => lint(),
            Self::LintClippy => lint_clippy(),
            Self::LintDocs => lint_docs(),
            Self::LintFormatting => lint_format(),
            Self::FixFormatting => fix_format(),
            Self::Test => test(),
            Self::TestMariadb => test_mariadb(),
            Self::VerifyMigrations => verify_migrations(),
        }
    }
}

/// Run CI checks (lint, build, test)
fn ci() -> Result<()> {
    lint()?;
    build()?;
    test()?;
    Ok(())
}

/// Build the project
fn build() -> Result<()> {
    run_cargo(vec!["build", "--all-targets", "--all-features"])
}

/// Run cargo check
fn check() -> Result<()> {
    run_cargo(vec!["check", "--all-targets", "--all-features"])
}

/// Lint formatting, clippy, and docs
fn lint() -> Result<()> {
    lint_clippy()?;
    lint_docs()?;
    lint_format()?;
    Ok(())
}

/// Run clippy on the project
fn lint_clippy() -> Result<()> {
    run_cargo(vec![
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ])
}

/// Check that docs build without errors using docs.rs-equivalent flags
fn lint_docs() -> Result<()> {
    let meta = MetadataCommand::new()
        .exec()
        .wrap_err("failed to get cargo metadata")?;

    for package in meta.workspace_default_packages() {
        cmd(
            "cargo",
            [
                "doc",
                "--no-deps",
                "--all-features",
                "--package",
                &package.name,
            ],
        )
        .run_with_trace()?;
    }

    Ok(())
}

/// Lint formatting issues in the project
fn lint_format() -> Result<()> {
    run_cargo(vec!["fmt", "--all", "--check"])
}

/// Fix formatting issues in the project
fn fix_format() -> Result<()> {
    run_cargo(vec!["fmt", "--all"])
}

/// Run tests for the workspace's default packages
fn test() -> Result<()> {
    run_cargo(vec!["test", "--all-targets", "--all-features"])
}

/// Run a cargo subcommand with the default toolchain
fn run_cargo(args: Vec<&str>) -> Result<()> {
    cmd("cargo", args).run_with_trace()?;
    Ok(())
}

/// `MariaDB` container configuration shared by the orchestration commands.
struct MariadbContainer {
    name: &'static str,
    db_name: &'static str,
    db_user: &'static str,
    db_password: &'static str,
    port: &'static str,
}

impl MariadbContainer {
    /// Starts the container and waits for it to accept connections.
    fn start(&self) -> Result<()> {
        tracing::info!("Checking Docker availability");
        cmd!("docker", "--version")
            .run_with_trace()
            .wrap_err("Docker is not available. Please install Docker.")?;

        tracing::info!("Cleaning up any existing container: {}", self.name);
        self.stop();

        tracing::info!("Starting MariaDB container: {}", self.name);
        cmd!(
            "docker",
            "run",
            "--name",
            self.name,
            "-e",
            format!("MARIADB_DATABASE={}", self.db_name),
            "-e",
            format!("MARIADB_USER={}", self.db_user),
            "-e",
            format!("MARIADB_PASSWORD={}", self.db_password),
            "-e",
            "MARIADB_ROOT_PASSWORD=root_password",
            "-p",
            format!("{}:3306", self.port),
            "-d",
            "mariadb:11"
        )
        .run_with_trace()
        .wrap_err("Failed to start MariaDB container")?;

        tracing::info!("Waiting for MariaDB to be ready...");
        let max_attempts = 30;
        for attempt in 1..=max_attempts {
            std::thread::sleep(std::time::Duration::from_secs(1));
            tracing::debug!("Connection attempt {}/{}", attempt, max_attempts);

            let result = cmd!(
                "docker",
                "exec",
                self.name,
                "mariadb",
                "-u",
                self.db_user,
                format!("-p{}", self.db_password),
                "-e",
                "SELECT 1"
            )
            .run();

            if result.is_ok() {
                tracing::info!("MariaDB is ready");
                return Ok(());
            }
        }

        self.stop();
        Err(color_eyre::eyre::eyre!(
            "MariaDB did not become ready within timeout"
        ))
    }

    /// Stops and removes the container, ignoring failures.
    fn stop(&self) {
        let _ = cmd!("docker", "stop", self.name).run();
        let _ = cmd!("docker", "rm", self.name).run();
    }

    fn database_url(&self) -> String {
        format!(
            "mysql://{}:{}@127.0.0.1:{}/{}",
            self.db_user, self.db_password, self.port, self.db_name
        )
    }
}

/// Run `MariaDB` backend validation tests
///
/// Orchestrates a `MariaDB` 11 container, sets `DATABASE_URL` and
/// `GUARDIAN_SYNC_TEST_BACKEND`, runs the `#[ignore]`d backend validation
/// tests from `guardian-sync-persistence` single-threaded, and removes
/// the container regardless of outcome.
fn test_mariadb() -> Result<()> {
    tracing::info!("Starting MariaDB backend validation");

    let container = MariadbContainer {
        name: "guardian-sync-test-mariadb",
        db_name: "guardian_sync_test",
        db_user: "guardian",
        db_password: "test_password",
        port: "3307", // Non-standard port to avoid conflicts
    };

    container.start()?;

    tracing::info!("Running MariaDB backend validation tests");
    let test_result = cmd!(
        "cargo",
        "test",
        "--package",
        "guardian-sync-persistence",
        "backend_validation_tests",
        "--",
        "--ignored",
        "--test-threads=1"
    )
    .env("DATABASE_URL", container.database_url())
    .env("GUARDIAN_SYNC_TEST_BACKEND", "mariadb")
    .run_with_trace();

    container.stop();

    test_result.wrap_err("MariaDB backend validation tests failed")?;

    tracing::info!("MariaDB backend validation completed successfully");
    Ok(())
}

/// Verify schema parity between `SQLite` and `MySQL` migrations
///
/// Applies `migrations/` to an in-memory `SQLite` database and
/// `migrations_mysql/` to an ephemeral `MariaDB` container, introspects
/// both schemas, and compares the table and column inventories. Backend
/// type spellings differ by design (`TEXT` vs `VARCHAR`), so the
/// comparison is by name, not type.
fn verify_migrations() -> Result<()> {
    use diesel::Connection;
    use diesel_migrations::{MigrationHarness, embed_migrations};

    tracing::info!("Starting schema parity verification");

    let container = MariadbContainer {
        name: "guardian-sync-verify-migrations",
        db_name: "guardian_verify",
        db_user: "guardian",
        db_password: "verify_password",
        port: "3308", // Different port from test-mariadb to avoid conflicts
    };

    container.start()?;

    let verification_result = (|| -> Result<()> {
        tracing::info!("Applying SQLite migrations");
        #[allow(clippy::items_after_statements)]
        const SQLITE_MIGRATIONS: diesel_migrations::EmbeddedMigrations =
            embed_migrations!("../crates/persistence/migrations");

        let mut sqlite_conn = SqliteConnection::establish(":memory:")
            .wrap_err("Failed to create SQLite in-memory database")?;
        sqlite_conn
            .run_pending_migrations(SQLITE_MIGRATIONS)
            .map_err(|e| color_eyre::eyre::eyre!("Failed to apply SQLite migrations: {}", e))?;

        tracing::info!("Applying MySQL migrations");
        #[allow(clippy::items_after_statements)]
        const MYSQL_MIGRATIONS: diesel_migrations::EmbeddedMigrations =
            embed_migrations!("../crates/persistence/migrations_mysql");

        let mut mysql_conn = MysqlConnection::establish(&container.database_url())
            .wrap_err("Failed to connect to MariaDB")?;
        mysql_conn
            .run_pending_migrations(MYSQL_MIGRATIONS)
            .map_err(|e| color_eyre::eyre::eyre!("Failed to apply MySQL migrations: {}", e))?;

        tracing::info!("Comparing schemas");
        let sqlite_schema = introspect_sqlite_schema(&mut sqlite_conn)?;
        let mysql_schema = introspect_mysql_schema(&mut mysql_conn, container.db_name)?;
        compare_schemas(&sqlite_schema, &mysql_schema)?;

        tracing::info!("Schema parity verification passed");
        Ok(())
    })();

    container.stop();

    verification_result
}

/// Table name → column name set.
type SchemaInventory = BTreeMap<String, BTreeSet<String>>;

#[derive(QueryableByName)]
struct TableNameRow {
    #[diesel(sql_type = Text)]
    name: String,
}

#[derive(QueryableByName)]
struct TableInfoRow {
    #[diesel(sql_type = Text)]
    name: String,
    #[diesel(sql_type = Integer)]
    #[allow(dead_code)]
    cid: i32,
}

#[derive(QueryableByName)]
struct InformationSchemaRow {
    #[diesel(sql_type = Text)]
    tname: String,
    #[diesel(sql_type = Text)]
    cname: String,
}

/// Reads the table/column inventory from `SQLite`.
fn introspect_sqlite_schema(conn: &mut SqliteConnection) -> Result<SchemaInventory> {
    let tables: Vec<TableNameRow> = diesel::sql_query(
        "SELECT name FROM sqlite_master \
         WHERE type = 'table' \
         AND name NOT LIKE 'sqlite_%' \
         AND name != '__diesel_schema_migrations' \
         ORDER BY name",
    )
    .load(conn)
    .wrap_err("Failed to list SQLite tables")?;

    let mut inventory: SchemaInventory = BTreeMap::new();
    for table in tables {
        // Table names come from sqlite_master, not user input
        let columns: Vec<TableInfoRow> =
            diesel::sql_query(format!("PRAGMA table_info({})", table.name))
                .load(conn)
                .wrap_err_with(|| format!("Failed to introspect table {}", table.name))?;

        inventory.insert(
            table.name,
            columns.into_iter().map(|c| c.name).collect(),
        );
    }

    Ok(inventory)
}

/// Reads the table/column inventory from `MySQL`.
fn introspect_mysql_schema(conn: &mut MysqlConnection, db_name: &str) -> Result<SchemaInventory> {
    let rows: Vec<InformationSchemaRow> = diesel::sql_query(format!(
        "SELECT table_name AS tname, column_name AS cname \
         FROM information_schema.columns \
         WHERE table_schema = '{db_name}' \
         AND table_name != '__diesel_schema_migrations' \
         ORDER BY table_name, ordinal_position"
    ))
    .load(conn)
    .wrap_err("Failed to introspect MySQL schema")?;

    let mut inventory: SchemaInventory = BTreeMap::new();
    for row in rows {
        inventory.entry(row.tname).or_default().insert(row.cname);
    }

    Ok(inventory)
}

/// Fails hard on any table or column mismatch.
fn compare_schemas(sqlite: &SchemaInventory, mysql: &SchemaInventory) -> Result<()> {
    let sqlite_tables: BTreeSet<&String> = sqlite.keys().collect();
    let mysql_tables: BTreeSet<&String> = mysql.keys().collect();

    if sqlite_tables != mysql_tables {
        let only_sqlite: Vec<&&String> = sqlite_tables.difference(&mysql_tables).collect();
        let only_mysql: Vec<&&String> = mysql_tables.difference(&sqlite_tables).collect();
        return Err(color_eyre::eyre::eyre!(
            "Table inventory mismatch: only in SQLite: {only_sqlite:?}, only in MySQL: {only_mysql:?}"
        ));
    }

    for (table, sqlite_columns) in sqlite {
        // Present in both by the check above
        let Some(mysql_columns) = mysql.get(table) else {
            continue;
        };
        if sqlite_columns != mysql_columns {
            let only_sqlite: Vec<&String> = sqlite_columns.difference(mysql_columns).collect();
            let only_mysql: Vec<&String> = mysql_columns.difference(sqlite_columns).collect();
            return Err(color_eyre::eyre::eyre!(
                "Column mismatch in table '{table}': only in SQLite: {only_sqlite:?}, only in MySQL: {only_mysql:?}"
            ));
        }
    }

    Ok(())
}

/// An extension trait for `duct::Expression` that logs the command being run
/// before executing it.
trait ExpressionExt {
    fn run_with_trace(&self) -> Result<std::process::Output, std::io::Error>;
}

impl ExpressionExt for duct::Expression {
    fn run_with_trace(&self) -> Result<std::process::Output, std::io::Error> {
        tracing::info!("Running command: {:?}", self);
        self.run()
    }
}
