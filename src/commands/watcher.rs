use crate::commands::dataset::canonical_path;
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use notify_debouncer_mini::{new_debouncer, DebounceEventResult, Debouncer};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[cfg(feature = "desktop")]
use crate::{commands::dataset::invalidate_dataset, models::dataset::DatasetCache};
#[cfg(feature = "desktop")]
use std::sync::{Arc, Mutex};

const DEBOUNCE: Duration = Duration::from_millis(500);

/// Live watch on one dataset file; dropping it stops the watch
pub struct DatasetWatcher {
    path: PathBuf,
    _debouncer: Debouncer<RecommendedWatcher>,
}

impl DatasetWatcher {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Keeps one watcher per dataset alive for the lifetime of the app
#[derive(Default)]
pub struct WatcherRegistry {
    watchers: HashMap<PathBuf, DatasetWatcher>,
}

impl WatcherRegistry {
    /// Replaces (and stops) any previous watcher on the same file
    pub fn insert(&mut self, watcher: DatasetWatcher) {
        self.watchers.insert(watcher.path().to_path_buf(), watcher);
    }

    pub fn is_watching(&self, path: &Path) -> bool {
        self.watchers.contains_key(path)
    }
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn start_dataset_watcher(
    dataset_path: String,
    cache: tauri::State<'_, Arc<Mutex<DatasetCache>>>,
    watchers: tauri::State<'_, Mutex<WatcherRegistry>>,
    app: tauri::AppHandle,
) -> Result<(), String> {
    use tauri::Emitter;

    let target = canonical_path(&dataset_path);
    {
        let registry = watchers
            .lock()
            .map_err(|_| "Watcher registry lock error".to_string())?;
        if registry.is_watching(&target) {
            log::debug!("Already watching {}", target.display());
            return Ok(());
        }
    }

    let cache_handle = Arc::clone(cache.inner());
    let watcher = watch_dataset(&dataset_path, move |path| {
        let path_str = path.to_string_lossy().to_string();
        if let Err(e) = invalidate_dataset(&path_str, &cache_handle) {
            log::warn!("Could not invalidate cached dataset {path_str}: {e}");
        }
        let _ = app.emit("dataset_changed", serde_json::json!({ "path": path_str }));
    })?;

    let mut registry = watchers
        .lock()
        .map_err(|_| "Watcher registry lock error".to_string())?;
    registry.insert(watcher);
    Ok(())
}

/// Watch the dataset's directory and call `on_change` (debounced) whenever
/// the dataset file itself is touched. Editors that replace the file on save
/// are handled because the directory, not the inode, is watched.
pub fn watch_dataset<F>(dataset_path: &str, on_change: F) -> Result<DatasetWatcher, String>
where
    F: Fn(&Path) + Send + 'static,
{
    let target = canonical_path(dataset_path);
    let dir = target
        .parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| format!("No parent directory for {}", target.display()))?;

    let watched = target.clone();
    let mut debouncer = new_debouncer(DEBOUNCE, move |result: DebounceEventResult| match result {
        Ok(events) => {
            if events.iter().any(|event| is_dataset_event(&event.path, &watched)) {
                log::info!("Dataset changed on disk: {}", watched.display());
                on_change(&watched);
            }
        }
        Err(e) => log::warn!("Dataset watcher error: {e:?}"),
    })
    .map_err(|e| format!("Watcher init error: {e}"))?;

    debouncer
        .watcher()
        .watch(&dir, RecursiveMode::NonRecursive)
        .map_err(|e| format!("Watch error: {e}"))?;

    Ok(DatasetWatcher {
        path: target,
        _debouncer: debouncer,
    })
}

fn is_dataset_event(event_path: &Path, dataset: &Path) -> bool {
    event_path == dataset
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::Instant;

    #[test]
    fn only_events_on_the_dataset_file_count() {
        let dataset = Path::new("/data/tickets.csv");
        assert!(is_dataset_event(Path::new("/data/tickets.csv"), dataset));
        assert!(!is_dataset_event(Path::new("/data/tickets.csv.swp"), dataset));
        assert!(!is_dataset_event(Path::new("/data"), dataset));
    }

    #[test]
    fn registry_tracks_watched_datasets() {
        let temp_dir = tempfile::tempdir().expect("create temp dir");
        let dataset = temp_dir.path().join("tickets.csv");
        fs::write(&dataset, "Ticket ID\n").expect("write dataset");

        let watcher = watch_dataset(&dataset.to_string_lossy(), |_| {}).expect("start watcher");
        let watched = watcher.path().to_path_buf();
        assert_eq!(watched, canonical_path(&dataset.to_string_lossy()));

        let mut registry = WatcherRegistry::default();
        assert!(!registry.is_watching(&watched));
        registry.insert(watcher);
        assert!(registry.is_watching(&watched));
        assert!(!registry.is_watching(&temp_dir.path().join("other.csv")));
    }

    #[test]
    fn edits_to_the_dataset_trigger_the_callback_and_siblings_do_not() {
        let temp_dir = tempfile::tempdir().expect("create temp dir");
        let dataset = temp_dir.path().join("tickets.csv");
        fs::write(&dataset, "Ticket ID\n1\n").expect("write dataset");

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let _watcher = watch_dataset(&dataset.to_string_lossy(), move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .expect("start watcher");

        fs::write(temp_dir.path().join("notes.txt"), "unrelated").expect("write sibling");
        thread::sleep(DEBOUNCE * 3);
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        fs::write(&dataset, "Ticket ID\n1\n2\n").expect("edit dataset");
        let deadline = Instant::now() + Duration::from_secs(5);
        while calls.load(Ordering::SeqCst) == 0 && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(50));
        }
        assert!(calls.load(Ordering::SeqCst) >= 1);
    }

    #[test]
    fn watching_a_missing_directory_fails() {
        let result = watch_dataset("/definitely/missing/dir/tickets.csv", |_| {});
        assert!(result.is_err());
    }
}
