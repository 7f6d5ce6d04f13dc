#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use relayctl::db::models::ScheduledRun;
use relayctl::db::store::Store;
use tempfile::TempDir;

/// Isolated database + config paths for one test.
pub struct TestEnv {
    pub dir: TempDir,
    pub db: String,
    pub conf: String,
}

pub fn setup_env() -> TestEnv {
    let dir = tempfile::tempdir().expect("tempdir");
    let db = dir.path().join("relayctl.sqlite").to_string_lossy().to_string();
    let conf = dir.path().join("relayctl.conf").to_string_lossy().to_string();
    TestEnv { dir, db, conf }
}

/// relayctl bound to the test's database and config, on a simulated pin.
pub fn rctl(env: &TestEnv) -> Command {
    let mut cmd = cargo_bin_cmd!("relayctl");
    cmd.args(["--db", &env.db, "--config", &env.conf, "--simulate"]);
    cmd
}

/// Initialize the DB through the CLI (creates tables).
pub fn init_db(env: &TestEnv) {
    rctl(env).args(["--test", "init"]).assert().success();
}

/// Insert completed runs directly via the library store API.
pub fn populate_runs(env: &TestEnv, starts: &[i64]) {
    let store = Store::new(env.db.clone());
    store.ensure_schema().expect("schema");
    for &start in starts {
        store
            .record_run(&ScheduledRun {
                start,
                end: start + 720,
            })
            .expect("record run");
    }
}
