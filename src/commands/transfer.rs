//! CSV export/import subcommands

use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::Config;
use crate::error::Result;
use crate::store::RemoteStoreClient;
use crate::transfer::{ImportMode, TransferEngine};

fn engine(config: &Config) -> Result<TransferEngine> {
    let store = RemoteStoreClient::new(config.store_config())?;
    Ok(TransferEngine::new(store))
}

/// Export both collections into `out_dir` under their fixed names
pub async fn export(config: &Config, out_dir: PathBuf) -> Result<()> {
    info!(out_dir = %out_dir.display(), "exporting CSV snapshots");
    let engine = engine(config)?;

    let files = engine.export().await?;
    tokio::fs::create_dir_all(&out_dir).await?;

    for file in files {
        let path = out_dir.join(file.name);
        tokio::fs::write(&path, &file.bytes).await?;
        println!("已导出 {}", path.display());
    }
    Ok(())
}

/// Import one CSV file under the chosen merge mode
pub async fn import(config: &Config, file: &Path, mode: ImportMode) -> Result<()> {
    info!(file = %file.display(), mode = %mode, "importing CSV file");
    let engine = engine(config)?;

    let bytes = tokio::fs::read(file).await?;
    let report = engine.import(&bytes, mode).await?;

    println!(
        "导入完成（{}，{} 模式）：读取 {} 行，替换 {}，新增 {}，跳过 {}，丢弃 {}",
        report.kind,
        mode,
        report.rows_read,
        report.replaced,
        report.inserted,
        report.skipped,
        report.dropped,
    );
    Ok(())
}
