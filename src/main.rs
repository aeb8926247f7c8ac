use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use jiaxiao::commands;
use jiaxiao::commands::roster::{StudentFields, StudentOverrides};
use jiaxiao::commands::training::TrainingOverrides;
use jiaxiao::config::Config;
use jiaxiao::models::{Subject3Status, VehicleType, WeakItem};
use jiaxiao::roster::SortField;
use jiaxiao::transfer::ImportMode;

#[derive(Parser)]
#[command(
    name = "jiaxiao",
    version,
    about = "Driving-school roster and training-hours manager",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json)
    #[arg(long, global = true, default_value = "text")]
    log_format: String,

    /// TOML config file; environment variables are used otherwise
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Remote store root URL, overriding the config
    #[arg(long, global = true)]
    api_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the student roster
    Roster {
        #[command(subcommand)]
        command: RosterCommands,
    },

    /// Manage one student's training records
    Training {
        #[command(subcommand)]
        command: TrainingCommands,
    },

    /// Export both collections to CSV files
    Export {
        /// Output directory
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
    },

    /// Import a CSV file into the collection matching its header
    Import {
        /// CSV file to import
        file: PathBuf,

        /// Merge mode for rows whose key already exists
        #[arg(short, long, value_enum)]
        mode: ImportModeArg,
    },
}

#[derive(Subcommand)]
enum RosterCommands {
    /// List students
    List {
        /// Retain students whose ID card or name contains this text
        #[arg(short, long)]
        filter: Option<String>,

        /// Sort by field
        #[arg(short, long, value_enum)]
        sort: Option<SortFieldArg>,

        /// Sort descending instead of ascending
        #[arg(long, requires = "sort")]
        descending: bool,

        /// Show full ID cards instead of masked ones
        #[arg(long)]
        unmask: bool,
    },

    /// Add a student
    Add {
        /// Student name
        #[arg(short, long)]
        name: String,

        /// 18-character ID card; left out means not yet recorded
        #[arg(short, long)]
        id_card: Option<String>,

        /// Subject two already passed
        #[arg(long)]
        subject2_pass: bool,

        /// Subject three stage
        #[arg(long, value_enum, default_value = "in-progress")]
        subject3_status: Subject3Arg,

        /// Vehicle type
        #[arg(long, value_enum, default_value = "c1")]
        vehicle_type: VehicleArg,

        /// Free-text remarks
        #[arg(short, long, default_value = "")]
        remarks: String,

        /// Classroom hours
        #[arg(long, default_value = "0")]
        static_hours: u32,

        /// Simulator / behind-the-wheel hours
        #[arg(long, default_value = "0")]
        dynamic_hours: u32,
    },

    /// Edit a student, changing only the given fields
    Edit {
        /// Record id (shown by `roster list`)
        id: String,

        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        id_card: Option<String>,

        #[arg(long)]
        subject2_pass: Option<bool>,

        #[arg(long, value_enum)]
        subject3_status: Option<Subject3Arg>,

        #[arg(long, value_enum)]
        vehicle_type: Option<VehicleArg>,

        #[arg(short, long)]
        remarks: Option<String>,

        #[arg(long)]
        static_hours: Option<u32>,

        #[arg(long)]
        dynamic_hours: Option<u32>,
    },

    /// Remove a student
    Remove {
        /// Record id (shown by `roster list`)
        id: String,
    },
}

#[derive(Subcommand)]
enum TrainingCommands {
    /// Show one student's training page
    List {
        /// Owning student's ID card
        id_card: String,
    },

    /// Add a training record
    Add {
        /// Owning student's ID card
        id_card: String,

        /// Calendar date, e.g. 2024-01-01
        #[arg(short, long)]
        date: String,

        /// Start time on the half-hour grid, e.g. 08:00
        #[arg(short, long)]
        start: String,

        /// End time on the half-hour grid, e.g. 09:30
        #[arg(short, long)]
        end: String,

        /// Weak items, comma separated
        #[arg(short, long, value_enum, value_delimiter = ',')]
        weak_items: Vec<WeakItemArg>,

        /// Free-text remarks
        #[arg(short, long, default_value = "")]
        remarks: String,
    },

    /// Edit a training record, changing only the given fields
    Edit {
        /// Owning student's ID card
        id_card: String,

        /// Record id (shown by `training list`)
        record_id: String,

        #[arg(short, long)]
        date: Option<String>,

        #[arg(short, long)]
        start: Option<String>,

        #[arg(short, long)]
        end: Option<String>,

        #[arg(short, long, value_enum, value_delimiter = ',')]
        weak_items: Option<Vec<WeakItemArg>>,

        #[arg(short, long)]
        remarks: Option<String>,
    },

    /// Remove a training record
    Remove {
        /// Owning student's ID card
        id_card: String,

        /// Record id (shown by `training list`)
        record_id: String,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SortFieldArg {
    Name,
    IdCard,
    Subject2,
    Subject3,
    VehicleType,
    Remarks,
}

impl From<SortFieldArg> for SortField {
    fn from(value: SortFieldArg) -> Self {
        match value {
            SortFieldArg::Name => SortField::Name,
            SortFieldArg::IdCard => SortField::IdCard,
            SortFieldArg::Subject2 => SortField::Subject2Pass,
            SortFieldArg::Subject3 => SortField::Subject3Status,
            SortFieldArg::VehicleType => SortField::VehicleType,
            SortFieldArg::Remarks => SortField::Remarks,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Subject3Arg {
    InProgress,
    NeedsRetest,
    Passed,
}

impl From<Subject3Arg> for Subject3Status {
    fn from(value: Subject3Arg) -> Self {
        match value {
            Subject3Arg::InProgress => Subject3Status::InProgress,
            Subject3Arg::NeedsRetest => Subject3Status::NeedsRetest,
            Subject3Arg::Passed => Subject3Status::Passed,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum VehicleArg {
    C1,
    C2,
}

impl From<VehicleArg> for VehicleType {
    fn from(value: VehicleArg) -> Self {
        match value {
            VehicleArg::C1 => VehicleType::C1,
            VehicleArg::C2 => VehicleType::C2,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum WeakItemArg {
    Overtaking,
    StraightLineDriving,
    MeetingTraffic,
    PullingOver,
    GearShifting,
}

impl From<WeakItemArg> for WeakItem {
    fn from(value: WeakItemArg) -> Self {
        match value {
            WeakItemArg::Overtaking => WeakItem::Overtaking,
            WeakItemArg::StraightLineDriving => WeakItem::StraightLineDriving,
            WeakItemArg::MeetingTraffic => WeakItem::MeetingTraffic,
            WeakItemArg::PullingOver => WeakItem::PullingOver,
            WeakItemArg::GearShifting => WeakItem::GearShifting,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ImportModeArg {
    Overwrite,
    Append,
}

impl From<ImportModeArg> for ImportMode {
    fn from(value: ImportModeArg) -> Self {
        match value {
            ImportModeArg::Overwrite => ImportMode::Overwrite,
            ImportModeArg::Append => ImportMode::Append,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_tracing(&cli.log_format, cli.verbose)?;

    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env()?,
    };
    if let Some(api_url) = cli.api_url.clone() {
        config.api.base_url = api_url;
    }
    config.validate()?;

    let result = dispatch(cli.command, &config).await;

    if let Err(err) = result {
        tracing::error!(error = %err, category = ?err.category(), "command failed");
        eprintln!("{}", err.user_desc());
        std::process::exit(1);
    }

    Ok(())
}

async fn dispatch(command: Commands, config: &Config) -> jiaxiao::error::Result<()> {
    match command {
        Commands::Roster { command } => match command {
            RosterCommands::List {
                filter,
                sort,
                descending,
                unmask,
            } => {
                commands::roster::list(config, filter, sort.map(Into::into), descending, unmask)
                    .await
            }

            RosterCommands::Add {
                name,
                id_card,
                subject2_pass,
                subject3_status,
                vehicle_type,
                remarks,
                static_hours,
                dynamic_hours,
            } => {
                commands::roster::add(
                    config,
                    StudentFields {
                        name,
                        id_card,
                        subject2_pass,
                        subject3_status: subject3_status.into(),
                        vehicle_type: vehicle_type.into(),
                        remarks,
                        static_hours,
                        dynamic_hours,
                    },
                )
                .await
            }

            RosterCommands::Edit {
                id,
                name,
                id_card,
                subject2_pass,
                subject3_status,
                vehicle_type,
                remarks,
                static_hours,
                dynamic_hours,
            } => {
                commands::roster::edit(
                    config,
                    id,
                    StudentOverrides {
                        name,
                        id_card,
                        subject2_pass,
                        subject3_status: subject3_status.map(Into::into),
                        vehicle_type: vehicle_type.map(Into::into),
                        remarks,
                        static_hours,
                        dynamic_hours,
                    },
                )
                .await
            }

            RosterCommands::Remove { id } => commands::roster::remove(config, id).await,
        },

        Commands::Training { command } => match command {
            TrainingCommands::List { id_card } => commands::training::list(config, id_card).await,

            TrainingCommands::Add {
                id_card,
                date,
                start,
                end,
                weak_items,
                remarks,
            } => {
                commands::training::add(
                    config,
                    id_card,
                    date,
                    start,
                    end,
                    weak_items.into_iter().map(Into::into).collect(),
                    remarks,
                )
                .await
            }

            TrainingCommands::Edit {
                id_card,
                record_id,
                date,
                start,
                end,
                weak_items,
                remarks,
            } => {
                commands::training::edit(
                    config,
                    id_card,
                    record_id,
                    TrainingOverrides {
                        training_date: date,
                        start_time: start,
                        end_time: end,
                        weak_items: weak_items
                            .map(|items| items.into_iter().map(Into::into).collect()),
                        remarks,
                    },
                )
                .await
            }

            TrainingCommands::Remove { id_card, record_id } => {
                commands::training::remove(config, id_card, record_id).await
            }
        },

        Commands::Export { out } => commands::transfer::export(config, out).await,

        Commands::Import { file, mode } => {
            commands::transfer::import(config, &file, mode.into()).await
        }
    }
}

fn setup_tracing(format: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("jiaxiao=debug,info")
    } else {
        tracing_subscriber::EnvFilter::new("jiaxiao=info,warn")
    };

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }

    Ok(())
}
