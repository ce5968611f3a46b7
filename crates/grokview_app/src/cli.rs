use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use engine_logging::{engine_error, engine_info, LogDestination};
use grokview_core::{filtered_contents, Content, ContentFilter, OverviewCommand, OverviewEvent};
use grokview_engine::Engine;
use tokio::sync::broadcast;

use crate::report::Catalogue;
use crate::settings::load_settings;
use crate::OverviewFeature;

/// Name of the archive written by `--export-dir`.
pub const EXPORT_NAME: &str = "selection";

#[derive(Parser, Debug)]
#[command(name = "grokview")]
#[command(version)]
#[command(about = "Catalogue and export the contents of ZIP archives", long_about = None)]
pub struct Cli {
    /// ZIP archives to ingest
    #[arg(value_name = "ZIP", required = true)]
    pub archives: Vec<PathBuf>,

    /// RON settings file (default: ./grokview.ron if present)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Where log output goes
    #[arg(long, value_enum, default_value_t = LogTarget::Terminal)]
    pub log: LogTarget,

    /// Print the catalogue as JSON
    #[arg(long)]
    pub json: bool,

    /// Export every listed content to DIR/selection.zip
    #[arg(long, value_name = "DIR")]
    pub export_dir: Option<PathBuf>,

    /// Only list contents of this kind (images, videos, audio, documents, other)
    #[arg(long = "filter", value_name = "KIND", value_parser = parse_filter)]
    pub filters: Vec<ContentFilter>,

    /// Only list contents modified on or after this day (YYYY-MM-DD, UTC)
    #[arg(long, value_name = "DATE", value_parser = parse_day)]
    pub from: Option<NaiveDate>,

    /// Only list contents modified on or before this day (YYYY-MM-DD, UTC)
    #[arg(long, value_name = "DATE", value_parser = parse_day)]
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogTarget {
    Terminal,
    File,
    Both,
}

impl From<LogTarget> for LogDestination {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::File => LogDestination::File,
            LogTarget::Both => LogDestination::Both,
        }
    }
}

fn parse_filter(value: &str) -> Result<ContentFilter, String> {
    ContentFilter::parse(value).ok_or_else(|| {
        let known: Vec<_> = ContentFilter::ALL
            .iter()
            .map(|filter| filter.display_name().to_ascii_lowercase())
            .collect();
        format!("unknown kind {value:?}, expected one of {}", known.join(", "))
    })
}

fn parse_day(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|err| format!("{value:?}: {err}"))
}

/// Epoch millis of the first instant of `day` in UTC.
pub fn start_of_day(day: NaiveDate) -> Option<i64> {
    day.and_hms_opt(0, 0, 0)
        .map(|start| start.and_utc().timestamp_millis())
}

/// Epoch millis of the last millisecond of `day` in UTC.
pub fn end_of_day(day: NaiveDate) -> Option<i64> {
    day.and_hms_milli_opt(23, 59, 59, 999)
        .map(|end| end.and_utc().timestamp_millis())
}

/// Ingests the archives through the overview, prints the catalogue and
/// optionally exports what it lists.
pub async fn run(cli: Cli) -> Result<()> {
    let settings = load_settings(cli.config.as_deref())?;
    engine_logging::initialize(cli.log.into(), settings.level_filter()?, None);

    let feature = OverviewFeature::spawn(Engine::new(settings.engine));
    let mut events = feature.events();

    for filter in &cli.filters {
        feature
            .execute(OverviewCommand::AddContentFilter(*filter))
            .await?;
    }
    if cli.from.is_some() || cli.to.is_some() {
        feature
            .execute(OverviewCommand::SetDateRange {
                start: cli.from.and_then(start_of_day),
                end: cli.to.and_then(end_of_day),
            })
            .await?;
    }

    let paths = cli.archives.iter().map(|path| absolute(path)).collect();
    feature
        .execute(OverviewCommand::UploadArchives(paths))
        .await?;
    let state = feature.settled().await?;
    report_errors(&mut events);

    let catalogue = Catalogue::from_state(&state);
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&catalogue)?);
    } else {
        print!("{}", catalogue.render_plain());
    }

    let Some(export_dir) = cli.export_dir else {
        return Ok(());
    };
    let contents: Vec<Content> = state
        .overview_archives()
        .iter()
        .flat_map(|overview_archive| filtered_contents(&state, overview_archive.path()))
        .cloned()
        .collect();
    if contents.is_empty() {
        engine_info!("Nothing to export");
        eprintln!("Nothing to export.");
        return Ok(());
    }

    let count = contents.len();
    let directory = absolute(&export_dir);
    feature
        .execute(OverviewCommand::SaveContents(contents))
        .await?;
    feature
        .execute(OverviewCommand::SaveConfirmation {
            path: directory.clone(),
            name: EXPORT_NAME.to_string(),
        })
        .await?;
    feature.settled().await?;

    if report_errors(&mut events) > 0 {
        bail!("export to {} failed", directory);
    }
    let target = Path::new(&directory).join(format!("{EXPORT_NAME}.zip"));
    eprintln!("Exported {count} contents to {}", target.display());
    Ok(())
}

fn absolute(path: &Path) -> String {
    let resolved = std::path::absolute(path).unwrap_or_else(|err| {
        engine_error!("Cannot resolve {}: {}", path.display(), err);
        path.to_path_buf()
    });
    resolved.to_string_lossy().into_owned()
}

/// Prints every queued error event; returns how many there were.
fn report_errors(events: &mut broadcast::Receiver<OverviewEvent>) -> usize {
    let mut reported = 0;
    loop {
        match events.try_recv() {
            Ok(OverviewEvent::Error(message)) => {
                eprintln!("error: {message}");
                reported += 1;
            }
            Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                engine_error!("Missed {} overview events", skipped);
            }
            Err(_) => return reported,
        }
    }
}
