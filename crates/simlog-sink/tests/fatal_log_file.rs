//! A fatal record aborts the process, so the test re-runs itself as a child
//! that logs into an asynchronously written file and then reads the file back.

use std::env;
use std::process::Command;

use simlog::{LogLevel, sim_fatal, sim_warn};
use simlog_sink::{LogConfig, init_logging_with};
use tempfile::tempdir;

const CHILD_LOG_ENV: &str = "SIMLOG_FATAL_CHILD_LOG";
const TEST_NAME: &str = "fatal_record_is_written_to_async_log_file";

fn run_child(path: &str) -> ! {
    let config = LogConfig::default()
        .with_level(LogLevel::Warning)
        .with_colored_output(false)
        .with_sim_time(false)
        .with_category_width(0)
        .with_log_file(path)
        .with_log_async(true);
    let _guard = init_logging_with(&config).unwrap();

    sim_warn!(category: "top", "before fatal");
    sim_fatal!(category: "top", "simulation cannot continue");
    unreachable!("a fatal record aborts the process");
}

#[test]
fn fatal_record_is_written_to_async_log_file() {
    if let Ok(path) = env::var(CHILD_LOG_ENV) {
        run_child(&path);
    }

    let dir = tempdir().unwrap();
    let path = dir.path().join("fatal.log");
    let output = Command::new(env::current_exe().unwrap())
        .args(["--exact", TEST_NAME, "--nocapture", "--test-threads=1"])
        .env(CHILD_LOG_ENV, &path)
        .env_remove("RUST_LOG")
        .output()
        .unwrap();
    assert!(!output.status.success(), "child survived a fatal record");

    let text = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(
        lines,
        ["WARNING: before fatal", "FATAL: simulation cannot continue"],
        "log file:\n{text}"
    );
}
