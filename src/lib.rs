pub mod analysis;
pub mod commands;
pub mod error;
pub mod models;

#[cfg(feature = "desktop")]
use commands::{
    dashboard::{get_dashboard, get_filter_options, get_group_metrics, get_satisfaction, get_ticket_rows},
    dataset::open_dataset,
    settings::get_settings,
    watcher::{start_dataset_watcher, WatcherRegistry},
};
#[cfg(feature = "desktop")]
use models::dataset::DatasetCache;
#[cfg(feature = "desktop")]
use std::sync::{Arc, Mutex};

#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    tauri::Builder::default()
        .plugin(tauri_plugin_dialog::init())
        .manage(Arc::new(Mutex::new(DatasetCache::default())))
        .manage(Mutex::new(WatcherRegistry::default()))
        .invoke_handler(tauri::generate_handler![
            open_dataset,
            get_filter_options,
            get_group_metrics,
            get_satisfaction,
            get_dashboard,
            get_ticket_rows,
            get_settings,
            start_dataset_watcher,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
