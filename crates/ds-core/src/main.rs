//! Definition-build entry point.
//!
//! Invoked by the orchestration engine's deployment tooling; everything is
//! environment-driven (`DAG_STRESS_*`), there are no CLI flags. Builds the
//! full definition set and writes one JSON bundle per code location plus
//! the shared catch-all watcher.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use ds_common::{Error, Result};
use ds_config::{GeneratorConfig, ENV_PREFIX};
use ds_core::exit_codes::ExitCode;
use ds_core::sensors::catch_all_watcher;
use ds_core::{build_full, build_set, read_table};

const DEFAULT_LOCATION_COUNT: u32 = 5;

fn main() {
    init_tracing();
    let code = match run() {
        Ok(()) => ExitCode::Clean,
        Err(err) => {
            error!(error = %err, code = err.code(), "definition build failed");
            ExitCode::for_error(&err)
        }
    };
    std::process::exit(code.as_i32());
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if std::env::var(format!("{ENV_PREFIX}LOG_JSON")).is_ok() {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn run() -> Result<()> {
    let config = GeneratorConfig::from_env()?;
    let table_path = env_path("TABLE_PATH", "dag.csv.gz");
    let output_dir = env_path("OUTPUT_DIR", "definitions");

    let rows = read_table(&table_path)?;
    info!(rows = rows.len(), table = %table_path.display(), "dataset table loaded");

    let window = config.window(Utc::now());
    let bundles = if env_flag("UNSHARDED") {
        vec![build_full(&rows, &config, &window)]
    } else {
        build_set(&rows, &config, &window, env_location_count()?)?.locations
    };

    fs::create_dir_all(&output_dir)?;
    for bundle in &bundles {
        let name = match bundle.location {
            Some(location) => format!("{location}.json"),
            None => "full.json".to_string(),
        };
        write_json(&output_dir.join(name), bundle)?;
    }
    write_json(
        &output_dir.join("shared.json"),
        &catch_all_watcher(config.sensor_default_status),
    )?;

    let total_items: usize = bundles.iter().map(|b| b.work_items.len()).sum();
    info!(
        bundles = bundles.len(),
        work_items = total_items,
        output = %output_dir.display(),
        "definition set written"
    );
    Ok(())
}

fn env_flag(name: &str) -> bool {
    std::env::var(format!("{ENV_PREFIX}{name}")).is_ok()
}

fn env_path(name: &str, default: &str) -> PathBuf {
    std::env::var(format!("{ENV_PREFIX}{name}"))
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(default))
}

fn env_location_count() -> Result<u32> {
    let var = format!("{ENV_PREFIX}LOCATION_COUNT");
    match std::env::var(&var) {
        Err(_) => Ok(DEFAULT_LOCATION_COUNT),
        Ok(raw) => raw.trim().parse().map_err(|_| Error::ConfigValue {
            var,
            reason: format!("expected a positive integer, got {raw:?}"),
        }),
    }
}

fn write_json(path: &Path, value: &impl serde::Serialize) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;
    Ok(())
}
