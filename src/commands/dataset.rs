use crate::analysis::filter::filter_options;
use crate::analysis::loader::load_tickets;
use crate::commands::settings::{load_effective_settings, EffectiveSettings};
use crate::error::LoadError;
use crate::models::dataset::{CacheKey, DatasetCache, DatasetSummary, LoadedDataset};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn open_dataset(
    dataset_path: String,
    cache: tauri::State<'_, Arc<Mutex<DatasetCache>>>,
) -> Result<DatasetSummary, String> {
    open_dataset_internal(&dataset_path, cache.inner())
}

pub fn open_dataset_internal(
    dataset_path: &str,
    cache: &Arc<Mutex<DatasetCache>>,
) -> Result<DatasetSummary, String> {
    let dataset = load_dataset_cached(dataset_path, cache)?;

    Ok(DatasetSummary {
        path: dataset.path.to_string_lossy().to_string(),
        rows_read: dataset.rows_read,
        ticket_count: dataset.tickets.len(),
        rows_dropped: dataset.rows_dropped,
        filter_options: filter_options(&dataset.tickets),
    })
}

/// Serve the normalized table from cache while the file's mtime, length and
/// SLA settings are unchanged; reload otherwise.
pub fn load_dataset_cached(
    dataset_path: &str,
    cache: &Arc<Mutex<DatasetCache>>,
) -> Result<Arc<LoadedDataset>, String> {
    load_dataset_with_settings(dataset_path, cache).map(|(dataset, _)| dataset)
}

/// Cached load that also hands back the settings it was keyed on, for
/// callers that need the dashboard options too.
pub fn load_dataset_with_settings(
    dataset_path: &str,
    cache: &Arc<Mutex<DatasetCache>>,
) -> Result<(Arc<LoadedDataset>, EffectiveSettings), String> {
    let path = canonical_path(dataset_path);
    let metadata = std::fs::metadata(&path).map_err(|source| {
        let err = match source.kind() {
            std::io::ErrorKind::NotFound => LoadError::NotFound(path.clone()),
            _ => LoadError::Io {
                path: path.clone(),
                source,
            },
        };
        err.to_string()
    })?;
    let settings = load_effective_settings(dataset_path)?;

    let key = CacheKey {
        modified: metadata.modified().ok(),
        len: metadata.len(),
        sla: settings.sla,
    };

    {
        let cache_lock = cache.lock().map_err(|_| "Cache lock error".to_string())?;
        if let Some(hit) = cache_lock.get(&path, &key) {
            log::debug!("Serving {} from dataset cache", path.display());
            return Ok((hit, settings));
        }
    }

    let dataset = Arc::new(load_tickets(&path, &settings.sla).map_err(|e| e.to_string())?);

    let mut cache_lock = cache.lock().map_err(|_| "Cache lock error".to_string())?;
    cache_lock.insert(path, key, Arc::clone(&dataset));

    Ok((dataset, settings))
}

pub fn invalidate_dataset(dataset_path: &str, cache: &Arc<Mutex<DatasetCache>>) -> Result<bool, String> {
    let path = canonical_path(dataset_path);
    let mut cache_lock = cache.lock().map_err(|_| "Cache lock error".to_string())?;
    Ok(cache_lock.invalidate(&path))
}

pub(crate) fn canonical_path(dataset_path: &str) -> PathBuf {
    let path = Path::new(dataset_path);
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
