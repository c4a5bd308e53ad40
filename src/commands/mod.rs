pub mod dashboard;
pub mod dataset;
pub mod settings;
pub mod watcher;
