//! The upload path: process an image and store both variants.

use bytes::Bytes;
use talentdeck_core::types::DbId;
use uuid::Uuid;

use crate::image_pipeline::{process_image, ImageLimits};
use crate::store::{ObjectStore, StorageError};

/// Result of a stored upload, ready to be persisted as a media row.
#[derive(Debug, Clone)]
pub struct StoredUpload {
    /// Canonical key of the main image: `{user_id}/{uuid}.jpg`.
    pub object_key: String,
    /// Key of the thumbnail: `{user_id}/thumb_{uuid}.jpg`.
    pub thumbnail_key: String,
    /// Byte size of the stored main image.
    pub size_bytes: i64,
    /// Always `image/jpeg` -- the pipeline re-encodes every upload.
    pub mime_type: String,
    pub width: u32,
    pub height: u32,
}

/// Process `data` and write the main image plus thumbnail to the store.
///
/// Image work runs on the blocking pool. If the thumbnail write fails after
/// the main image was stored, the main object is removed again so no
/// orphaned objects accumulate.
pub async fn store_image(
    store: &dyn ObjectStore,
    data: Vec<u8>,
    user_id: DbId,
    limits: ImageLimits,
) -> Result<StoredUpload, StorageError> {
    let processed = tokio::task::spawn_blocking(move || process_image(&data, &limits))
        .await
        .map_err(|e| StorageError::Image(format!("processing task failed: {e}")))??;

    let unique = Uuid::new_v4();
    let object_key = format!("{user_id}/{unique}.jpg");
    let thumbnail_key = format!("{user_id}/thumb_{unique}.jpg");

    let size_bytes = processed.main.len() as i64;

    store
        .put(&object_key, Bytes::from(processed.main), "image/jpeg")
        .await?;

    if let Err(e) = store
        .put(&thumbnail_key, Bytes::from(processed.thumbnail), "image/jpeg")
        .await
    {
        if let Err(cleanup) = store.delete(&object_key).await {
            tracing::error!(key = %object_key, error = %cleanup, "Failed to clean up orphaned object");
        }
        return Err(e);
    }

    tracing::info!(
        key = %object_key,
        size_bytes,
        width = processed.width,
        height = processed.height,
        "Stored upload"
    );

    Ok(StoredUpload {
        object_key,
        thumbnail_key,
        size_bytes,
        mime_type: "image/jpeg".to_string(),
        width: processed.width,
        height: processed.height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryObjectStore;
    use image::{DynamicImage, ImageBuffer, Rgb};

    fn jpeg_fixture() -> Vec<u8> {
        let buf: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::from_pixel(120, 90, Rgb([10, 200, 60]));
        let mut out = std::io::Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(buf)
            .write_to(&mut out, image::ImageFormat::Jpeg)
            .unwrap();
        out.into_inner()
    }

    #[tokio::test]
    async fn stores_main_and_thumbnail_under_user_prefix() {
        let store = MemoryObjectStore::new();
        let stored = store_image(&store, jpeg_fixture(), 42, ImageLimits::default())
            .await
            .unwrap();

        assert!(stored.object_key.starts_with("42/"));
        assert!(stored.thumbnail_key.starts_with("42/thumb_"));
        assert_eq!(stored.mime_type, "image/jpeg");
        assert!(store.contains(&stored.object_key).await);
        assert!(store.contains(&stored.thumbnail_key).await);

        // Thumbnail basename is the main basename with the prefix applied.
        let main_name = stored.object_key.rsplit('/').next().unwrap();
        let thumb_name = stored.thumbnail_key.rsplit('/').next().unwrap();
        assert_eq!(thumb_name, format!("thumb_{main_name}"));
    }

    #[tokio::test]
    async fn rejects_non_image_payload() {
        let store = MemoryObjectStore::new();
        let result = store_image(&store, b"not an image".to_vec(), 1, ImageLimits::default()).await;
        assert!(result.is_err());
        assert!(store.is_empty().await);
    }
}
