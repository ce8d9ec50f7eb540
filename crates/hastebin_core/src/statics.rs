//! Preloading of configured static documents.

use crate::store::DocumentStore;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Seed every configured static document into `store`.
///
/// Each file is read as UTF-8 and written with the static flag, so it never
/// expires. Re-running the preload overwrites the previous copy. Unreadable
/// or empty files are logged and skipped rather than aborting startup.
///
/// # Arguments
/// - `store`: Destination backend.
/// - `documents`: Key name to source file.
///
/// # Returns
/// Number of documents loaded.
pub fn load_static_documents(
    store: &dyn DocumentStore,
    documents: &BTreeMap<String, PathBuf>,
) -> usize {
    let mut loaded = 0;
    for (name, path) in documents {
        tracing::info!("Loading static document: {} ==> {}", name, path.display());
        let data = match std::fs::read_to_string(path) {
            Ok(data) if !data.is_empty() => data,
            Ok(_) => {
                tracing::warn!(
                    "Failed to load static document: {} ==> {} (file is empty)",
                    name,
                    path.display()
                );
                continue;
            }
            Err(err) => {
                tracing::warn!(
                    "Failed to load static document: {} ==> {} ({})",
                    name,
                    path.display(),
                    err
                );
                continue;
            }
        };
        match store.set(name, &data, true) {
            Ok(()) => loaded += 1,
            Err(err) => tracing::warn!("Failed to store static document {}: {}", name, err),
        }
    }
    loaded
}
