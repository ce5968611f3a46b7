//! GrokView application shell: the overview actor, its effect runner,
//! settings and the command-line front end.
mod cli;
mod effects;
mod feature;
mod report;
mod settings;

pub use cli::{end_of_day, run, start_of_day, Cli, LogTarget, EXPORT_NAME};
pub use feature::{FeatureClosed, OverviewFeature};
pub use report::{format_size, ArchiveReport, Catalogue, ContentReport};
pub use settings::{load_settings, parse_settings, Settings, SettingsError, DEFAULT_SETTINGS_FILE};
