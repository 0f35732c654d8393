//! `scheduled-backup`: snapshots the database with `pg_dump` and trims old
//! snapshots down to a configured retention count. A no-op when disabled,
//! since most deployments run backups at the infrastructure layer instead.

use chrono::Utc;
use shelfwatch_core::config::BackupConfig;
use shelfwatch_core::error::EngineError;
use std::path::{Path, PathBuf};
use tokio::process::Command;

#[derive(Debug, Default)]
pub struct BackupReport {
    pub snapshot_path: Option<PathBuf>,
    pub snapshots_removed: usize,
}

pub async fn run(config: &BackupConfig, database_url: &str) -> Result<BackupReport, EngineError> {
    if !config.enabled {
        return Ok(BackupReport::default());
    }

    tokio::fs::create_dir_all(&config.output_dir)
        .await
        .map_err(|e| EngineError::Unknown { message: format!("failed to create backup output dir: {e}") })?;

    let file_name = format!("shelfwatch-{}.sql", Utc::now().format("%Y%m%dT%H%M%SZ"));
    let path = Path::new(&config.output_dir).join(&file_name);

    let status = Command::new("pg_dump")
        .arg("--no-owner")
        .arg("--format=plain")
        .arg("--file")
        .arg(&path)
        .arg(database_url)
        .status()
        .await
        .map_err(|e| EngineError::Unknown { message: format!("failed to spawn pg_dump: {e}") })?;

    if !status.success() {
        return Err(EngineError::Unknown { message: format!("pg_dump exited with {status}") });
    }

    let removed = enforce_retention(&config.output_dir, config.retention_count).await?;
    Ok(BackupReport { snapshot_path: Some(path), snapshots_removed: removed })
}

async fn enforce_retention(output_dir: &str, retention_count: u32) -> Result<usize, EngineError> {
    let mut entries = tokio::fs::read_dir(output_dir)
        .await
        .map_err(|e| EngineError::Unknown { message: format!("failed to list backup dir: {e}") })?;

    let mut snapshots = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(|e| EngineError::Unknown { message: e.to_string() })? {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) == Some("sql") {
            let modified = entry.metadata().await.ok().and_then(|m| m.modified().ok());
            snapshots.push((path, modified));
        }
    }
    snapshots.sort_by_key(|(_, modified)| *modified);

    let keep_from = snapshots.len().saturating_sub(retention_count as usize);
    let mut removed = 0;
    for (path, _) in &snapshots[..keep_from] {
        if tokio::fs::remove_file(path).await.is_ok() {
            removed += 1;
        }
    }
    Ok(removed)
}
