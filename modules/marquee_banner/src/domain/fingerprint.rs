//! Settings hash used as the markup cache key

use crate::contract::model::BannerSettings;
use xxhash_rust::xxh3::xxh3_64;

/// 16 hex digits of xxh3-64 over the JSON form of the whole snapshot
///
/// Every field influences the rendered output or its schedule, so nothing is
/// left out of the hash.
pub fn settings_hash(settings: &BannerSettings) -> String {
    let bytes = match serde_json::to_vec(settings) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!("Failed to serialize settings for hashing: {}", e);
            format!("{settings:?}").into_bytes()
        }
    };
    format!("{:016x}", xxh3_64(&bytes))
}
