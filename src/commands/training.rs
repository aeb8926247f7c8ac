//! Training-record subcommands
//!
//! All take the owning student's ID card, mirroring the original page's
//! `?idCard=` navigation contract. A missing student prints 学员不存在！
//! and the caller returns to the roster listing.

use tracing::info;

use crate::config::Config;
use crate::error::{NotFoundError, Result};
use crate::models::WeakItem;
use crate::store::RemoteStoreClient;
use crate::training::{TrainingDraft, TrainingOverview, TrainingService};
use crate::validate::mask_id_card;

/// Partial field overrides for an edit
#[derive(Debug, Clone, Default)]
pub struct TrainingOverrides {
    pub training_date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub weak_items: Option<Vec<WeakItem>>,
    pub remarks: Option<String>,
}

fn service(config: &Config) -> Result<TrainingService> {
    let store = RemoteStoreClient::new(config.store_config())?;
    Ok(TrainingService::new(store))
}

fn print_overview(overview: &TrainingOverview) {
    let student = &overview.student;
    println!(
        "学员：{}（{}）  静态学时：{}  动态学时：{}  总练习时长：{} 分钟",
        student.name,
        mask_id_card(&student.id_card),
        student.static_hours,
        student.dynamic_hours,
        overview.total_training_minutes,
    );

    println!("练车日期\t开始时间\t结束时间\t练习时长\t需加强项目\t备注\t记录号");
    for record in &overview.records {
        println!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}",
            record.training_date,
            record.start_time,
            record.end_time,
            record.duration,
            record.weak_items_label(", "),
            record.remarks,
            record.id,
        );
    }
}

/// Print one student's training page
pub async fn list(config: &Config, id_card: String) -> Result<()> {
    info!(id_card = %mask_id_card(&id_card), "listing training records");
    let training = service(config)?;
    let overview = training.overview(&id_card).await?;
    print_overview(&overview);
    Ok(())
}

/// Add a training record for one student
#[allow(clippy::too_many_arguments)]
pub async fn add(
    config: &Config,
    id_card: String,
    training_date: String,
    start_time: String,
    end_time: String,
    weak_items: Vec<WeakItem>,
    remarks: String,
) -> Result<()> {
    info!(id_card = %mask_id_card(&id_card), date = %training_date, "adding training record");
    let training = service(config)?;

    let overview = training
        .create(TrainingDraft {
            id_card,
            training_date,
            start_time,
            end_time,
            weak_items,
            remarks,
        })
        .await?;

    println!("已添加学时记录");
    print_overview(&overview);
    Ok(())
}

/// Edit a training record by record id, changing only the given fields
pub async fn edit(
    config: &Config,
    id_card: String,
    record_id: String,
    overrides: TrainingOverrides,
) -> Result<()> {
    info!(record_id = %record_id, "editing training record");
    let training = service(config)?;

    let overview = training.overview(&id_card).await?;
    let record = overview
        .records
        .into_iter()
        .find(|r| r.id == record_id)
        .ok_or(NotFoundError::TrainingRecord)?;

    let draft = TrainingDraft {
        id_card,
        training_date: overrides.training_date.unwrap_or(record.training_date),
        start_time: overrides.start_time.unwrap_or(record.start_time),
        end_time: overrides.end_time.unwrap_or(record.end_time),
        weak_items: overrides.weak_items.unwrap_or(record.weak_items),
        remarks: overrides.remarks.unwrap_or(record.remarks),
    };

    let overview = training.update(&record_id, draft).await?;
    println!("已保存学时记录");
    print_overview(&overview);
    Ok(())
}

/// Remove a training record by record id
pub async fn remove(config: &Config, id_card: String, record_id: String) -> Result<()> {
    info!(record_id = %record_id, "removing training record");
    let training = service(config)?;
    let overview = training.delete(&id_card, &record_id).await?;
    println!("已删除学时记录");
    print_overview(&overview);
    Ok(())
}
