use crate::elasticsearch::client::Cluster;
use crate::naming::is_partial;
use crate::utils::DsmError;
use tracing::{debug, error, warn};

/// Partial backing indices of `data_stream`, in listing order without
/// duplicates. A failed listing is logged and reads as no indices.
pub fn get_partial_indices<C: Cluster + ?Sized>(data_stream: &str, client: &C) -> Vec<String> {
    // An empty path segment would list every index of the cluster
    if data_stream.trim().is_empty() {
        error!("Error fetching partial indices: empty data stream name");
        return Vec::new();
    }

    let rows = match client.cat_indices(data_stream) {
        Ok(rows) => rows,
        Err(e) => {
            error!("Error fetching partial indices: {}", e);
            return Vec::new();
        }
    };

    let mut partials: Vec<String> = Vec::new();
    for name in rows.into_iter().filter_map(|row| row.index) {
        if is_partial(&name) && !partials.contains(&name) {
            partials.push(name);
        }
    }
    debug!(data_stream, count = partials.len(), "partial indices listed");
    partials
}

/// `lifecycle_date_millis` of `index`. Any failure is logged and reads as
/// absent.
pub fn get_lifecycle_date_millis<C: Cluster + ?Sized>(index: &str, client: &C) -> Option<i64> {
    match client.ilm_explain(index) {
        Ok(response) => response.lifecycle_date_millis(index),
        Err(DsmError::IndexNotFound(_)) => {
            warn!("Index '{}' not found for ILM explanation.", index);
            None
        }
        Err(e) => {
            error!("Error getting lifecycle_date_millis for {}: {}", index, e);
            None
        }
    }
}
