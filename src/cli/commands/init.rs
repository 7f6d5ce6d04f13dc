use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::log;
use crate::db::store::Store;
use crate::errors::AppResult;
use std::fs;
use std::path::Path;

/// Handle the `init` command
///
/// This initializes:
///  - the configuration file (unless it exists or in test mode)
///  - the SQLite database and its tables
pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let cfg_path = cli.config_path();

    if !cli.test && !cfg_path.exists() {
        cfg.save(&cfg_path)?;
        println!("✅ Config file: {}", cfg_path.display());
    }

    let db_path = cfg.database_path();
    if let Some(dir) = Path::new(&db_path).parent()
        && !dir.as_os_str().is_empty()
    {
        fs::create_dir_all(dir)?;
    }

    println!("⚙️  Initializing relayctl…");
    println!("📄 Config file : {}", cfg_path.display());
    println!("🗄️  Database   : {}", &db_path);

    let store = Store::new(db_path.clone());
    store.ensure_schema()?;

    println!("✅ Database initialized at {}", &db_path);

    // Audit entry (non-blocking)
    let pool = store.open()?;
    if let Err(e) = log::ttlog(
        &pool.conn,
        "init",
        "database",
        &format!("Database initialized at {}", &db_path),
    ) {
        eprintln!("⚠️ Failed to write internal log: {}", e);
    }

    println!("🎉 relayctl initialization completed!");
    Ok(())
}
