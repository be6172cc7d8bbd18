pub mod app_settings;
pub mod miqaat;
pub mod persistence;
pub mod store;

pub use app_settings::AppSettings;
pub use miqaat::{DayRecord, MiqaatEntry, Phase};
pub use persistence::Persistable;
pub use store::{LoadError, LoadOutcome};
