use crate::analysis::aggregate::aggregate_by;
use crate::analysis::dashboard::build_dashboard;
use crate::analysis::filter::{apply_filter, filter_options};
use crate::analysis::satisfaction::{csat_dsat, satisfaction_breakdown};
use crate::commands::dataset::{load_dataset_cached, load_dataset_with_settings};
use crate::models::dataset::DatasetCache;
use crate::models::filter::DashboardFilter;
use crate::models::metrics::{DashboardData, FilterOptions, GroupMetrics, SatisfactionReport};
use crate::models::ticket::{Ticket, TicketColumn};
use std::sync::{Arc, Mutex};

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn get_filter_options(
    dataset_path: String,
    cache: tauri::State<'_, Arc<Mutex<DatasetCache>>>,
) -> Result<FilterOptions, String> {
    get_filter_options_internal(&dataset_path, cache.inner())
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn get_group_metrics(
    dataset_path: String,
    filter: DashboardFilter,
    column: TicketColumn,
    cache: tauri::State<'_, Arc<Mutex<DatasetCache>>>,
) -> Result<Vec<GroupMetrics>, String> {
    get_group_metrics_internal(&dataset_path, &filter, column, cache.inner())
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn get_satisfaction(
    dataset_path: String,
    filter: DashboardFilter,
    cache: tauri::State<'_, Arc<Mutex<DatasetCache>>>,
) -> Result<SatisfactionReport, String> {
    get_satisfaction_internal(&dataset_path, &filter, cache.inner())
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn get_dashboard(
    dataset_path: String,
    filter: DashboardFilter,
    cache: tauri::State<'_, Arc<Mutex<DatasetCache>>>,
) -> Result<DashboardData, String> {
    get_dashboard_internal(&dataset_path, &filter, cache.inner())
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn get_ticket_rows(
    dataset_path: String,
    filter: DashboardFilter,
    cache: tauri::State<'_, Arc<Mutex<DatasetCache>>>,
) -> Result<Vec<Ticket>, String> {
    get_ticket_rows_internal(&dataset_path, &filter, cache.inner())
}

pub fn get_filter_options_internal(
    dataset_path: &str,
    cache: &Arc<Mutex<DatasetCache>>,
) -> Result<FilterOptions, String> {
    let dataset = load_dataset_cached(dataset_path, cache)?;
    Ok(filter_options(&dataset.tickets))
}

pub fn get_group_metrics_internal(
    dataset_path: &str,
    filter: &DashboardFilter,
    column: TicketColumn,
    cache: &Arc<Mutex<DatasetCache>>,
) -> Result<Vec<GroupMetrics>, String> {
    let dataset = load_dataset_cached(dataset_path, cache)?;
    let filtered = apply_filter(&dataset.tickets, filter);
    Ok(aggregate_by(&filtered, column))
}

pub fn get_satisfaction_internal(
    dataset_path: &str,
    filter: &DashboardFilter,
    cache: &Arc<Mutex<DatasetCache>>,
) -> Result<SatisfactionReport, String> {
    let dataset = load_dataset_cached(dataset_path, cache)?;
    let filtered = apply_filter(&dataset.tickets, filter);
    Ok(SatisfactionReport {
        csat_dsat: csat_dsat(&filtered),
        breakdown: satisfaction_breakdown(&filtered),
    })
}

pub fn get_dashboard_internal(
    dataset_path: &str,
    filter: &DashboardFilter,
    cache: &Arc<Mutex<DatasetCache>>,
) -> Result<DashboardData, String> {
    let (dataset, settings) = load_dataset_with_settings(dataset_path, cache)?;
    Ok(build_dashboard(&dataset.tickets, filter, &settings.dashboard))
}

/// Filtered raw rows for the table view, unchanged
pub fn get_ticket_rows_internal(
    dataset_path: &str,
    filter: &DashboardFilter,
    cache: &Arc<Mutex<DatasetCache>>,
) -> Result<Vec<Ticket>, String> {
    let dataset = load_dataset_cached(dataset_path, cache)?;
    Ok(apply_filter(&dataset.tickets, filter))
}
