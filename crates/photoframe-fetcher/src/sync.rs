//! One fetch pass — the unit the OS scheduler invokes.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Utc;
use tracing::{info, warn};

use photoframe_core::PhotoframeConfig;

use crate::client::DiscourseClient;
use crate::error::Result;
use crate::extract;
use crate::store::ImageStore;
use crate::types::{RemoteImage, TopicSummary};

/// Pause between topic batches.
const BATCH_PAUSE: Duration = Duration::from_secs(2);

/// Counters reported after a pass.
#[derive(Debug, Default, Clone, Copy)]
pub struct FetchOutcome {
    pub topics: usize,
    pub downloaded: usize,
    pub evicted: usize,
}

/// Run one full fetch pass against the configured Discourse instance.
///
/// Individual topic or image failures are logged and skipped; the
/// last-successful-fetch timestamp only advances when the pass itself
/// completes.
pub async fn run_once(config: &PhotoframeConfig) -> Result<FetchOutcome> {
    let store = ImageStore::open(Path::new(&config.storage.database))?;
    let client = DiscourseClient::new(
        &config.discourse.base_url,
        &config.discourse.api_key,
        &config.discourse.api_username,
    )?;

    let mut topics = client.tagged_topics(&config.discourse.tag).await?;
    if let Some(last) = store.last_successful_fetch()? {
        topics.retain(|topic| topic.bumped_at > last);
    }
    if topics.is_empty() {
        info!("no topics bumped since last fetch");
        return Ok(FetchOutcome::default());
    }
    info!(count = topics.len(), tag = %config.discourse.tag, "processing tagged topics");

    let images = collect_images(&client, &topics, config.fetch.batch_size).await;

    let mut fresh = Vec::new();
    for image in images {
        if !store.is_downloaded(&image.hash)? {
            fresh.push(image);
        }
    }

    let outcome = if fresh.is_empty() {
        info!("no new images found in topics");
        FetchOutcome {
            topics: topics.len(),
            ..FetchOutcome::default()
        }
    } else {
        let image_dir = PathBuf::from(&config.storage.image_dir);
        std::fs::create_dir_all(&image_dir)?;

        let evicted = enforce_limit(&store, &image_dir, config.storage.image_limit, fresh.len())?;

        let mut downloaded = 0;
        for image in &fresh {
            match download_one(&client, &store, &image_dir, image).await {
                Ok(()) => downloaded += 1,
                Err(e) => warn!(url = %image.url, error = %e, "image download failed"),
            }
        }
        FetchOutcome {
            topics: topics.len(),
            downloaded,
            evicted,
        }
    };

    store.set_last_successful_fetch(Utc::now())?;
    Ok(outcome)
}

/// Pull topic HTML in batches and extract original-size images, tolerating
/// individual topic failures.
async fn collect_images(
    client: &DiscourseClient,
    topics: &[TopicSummary],
    batch_size: usize,
) -> Vec<RemoteImage> {
    let mut seen = HashSet::new();
    let mut images = Vec::new();

    for (i, batch) in topics.chunks(batch_size.max(1)).enumerate() {
        if i > 0 {
            tokio::time::sleep(BATCH_PAUSE).await;
        }
        for topic in batch {
            info!(id = topic.id, title = %topic.title, "processing topic");
            match client.topic_html(topic.id).await {
                Ok(html) => {
                    for image in extract::original_images(&html) {
                        if seen.insert(image.hash.clone()) {
                            images.push(image);
                        }
                    }
                }
                Err(e) => warn!(id = topic.id, error = %e, "topic fetch failed"),
            }
        }
    }
    images
}

/// Evict oldest images so `incoming` new downloads fit under `limit`.
/// Returns how many were evicted.
fn enforce_limit(
    store: &ImageStore,
    image_dir: &Path,
    limit: u32,
    incoming: usize,
) -> Result<usize> {
    let current = u64::from(store.count()?);
    let total = current + incoming as u64;
    if total <= u64::from(limit) {
        return Ok(0);
    }

    let excess = (total - u64::from(limit)).min(current) as u32;
    let filenames = store.remove_oldest(excess)?;
    for filename in &filenames {
        let path = image_dir.join(filename);
        if let Err(e) = std::fs::remove_file(&path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(file = %path.display(), error = %e, "failed to remove evicted image");
            }
        }
    }
    Ok(filenames.len())
}

/// Download a single image and record it, file first so a crash between the
/// two leaves a re-downloadable gap rather than a dangling row.
async fn download_one(
    client: &DiscourseClient,
    store: &ImageStore,
    image_dir: &Path,
    image: &RemoteImage,
) -> Result<()> {
    let ext = Path::new(&image.url)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("jpg");
    let filename = format!("{}.{ext}", image.hash);

    let bytes = client.download(&image.url).await?;
    std::fs::write(image_dir.join(&filename), &bytes)?;
    store.add_image(&image.hash, &filename, &image.url, Utc::now())?;

    info!(file = %filename, bytes = bytes.len(), "downloaded image");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn temp_image_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("photoframe-sync-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn seeded_store(files: &[(&str, &str)], image_dir: &Path) -> ImageStore {
        let store = ImageStore::open_in_memory().unwrap();
        for (i, (hash, filename)) in files.iter().enumerate() {
            let at = Utc.with_ymd_and_hms(2026, 3, 1, i as u32, 0, 0).unwrap();
            store.add_image(hash, filename, "u", at).unwrap();
            std::fs::write(image_dir.join(filename), b"img").unwrap();
        }
        store
    }

    #[test]
    fn under_limit_evicts_nothing() {
        let dir = temp_image_dir("under");
        let store = seeded_store(&[("a", "a.jpg")], &dir);
        assert_eq!(enforce_limit(&store, &dir, 10, 3).unwrap(), 0);
        assert_eq!(store.count().unwrap(), 1);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn over_limit_evicts_oldest_rows_and_files() {
        let dir = temp_image_dir("over");
        let store = seeded_store(&[("a", "a.jpg"), ("b", "b.jpg"), ("c", "c.jpg")], &dir);

        // 3 stored + 2 incoming against a limit of 4 — one must go.
        let evicted = enforce_limit(&store, &dir, 4, 2).unwrap();
        assert_eq!(evicted, 1);
        assert!(!store.is_downloaded("a").unwrap());
        assert!(!dir.join("a.jpg").exists());
        assert!(dir.join("b.jpg").exists());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn eviction_caps_at_stored_count() {
        let dir = temp_image_dir("cap");
        let store = seeded_store(&[("a", "a.jpg")], &dir);
        // More incoming than the limit allows even after a full purge.
        let evicted = enforce_limit(&store, &dir, 2, 5).unwrap();
        assert_eq!(evicted, 1);
        assert_eq!(store.count().unwrap(), 0);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
