//! Config command handler: show effective configuration.

use std::path::Path;

use anyhow::Result;

use crate::app_config::LoadedConfig;

pub fn run_config_show_command(loaded: &LoadedConfig, db_path: &Path, verbosity: &str) -> Result<()> {
    let config = &loaded.config;
    let resolved_path = loaded.path.as_ref().map_or_else(
        || "<unresolved>".to_string(),
        |path| path.display().to_string(),
    );
    let optional = |value: Option<&Path>, unset: &str| {
        value.map_or_else(|| unset.to_string(), |p| p.display().to_string())
    };

    println!("config_path = {resolved_path}");
    println!(
        "config_file = {}",
        if loaded.loaded_from_file {
            "loaded"
        } else {
            "not found (using defaults)"
        }
    );
    println!("db_path = {}", db_path.display());
    println!(
        "output_dir = {}",
        optional(config.output_dir.as_deref(), "<prompt>")
    );
    println!("log_file = {}", optional(config.log_file.as_deref(), "<none>"));
    println!(
        "connect_timeout_secs = {}",
        config.effective_connect_timeout_secs()
    );
    println!("read_timeout_secs = {}", config.effective_read_timeout_secs());
    println!("chunk_size = {}", config.effective_chunk_size());
    println!("verbosity = {verbosity}");

    Ok(())
}
