use std::io::Cursor;

use futures::future::{join_all, try_join};
use image::ImageFormat;
use tracing::warn;

use crate::fetch::ImageBlob;
use crate::model::{new_id, ContentPhoto, PhotoKind};
use crate::storage::{PhotoStorage, StorageError};

const THUMBNAIL_SIZE: u32 = 40;

/// Photo pipeline: every valid (non-empty) blob becomes exactly two uploaded
/// artifacts, a re-encoded full image and a small thumbnail, sharing one
/// zero-based order index. Both artifacts of one photo upload concurrently,
/// and the photos of one item upload concurrently with each other. Any
/// artifact failure aborts the whole batch with one combined error so no
/// orphaned objects reference a Content row that never gets written.
pub async fn upload_content_photos(
    storage: &dyn PhotoStorage,
    blobs: &[ImageBlob],
    namespace: &str,
    content_id: &str,
) -> Result<Vec<ContentPhoto>, StorageError> {
    let valid: Vec<&ImageBlob> = blobs.iter().filter(|b| !b.bytes.is_empty()).collect();

    let uploads = valid.iter().enumerate().map(|(order, blob)| {
        let photo_id = new_id();
        let encoded = encode(blob);
        let prefix = format!("public/users/{namespace}/contents/{content_id}");
        let full_path = format!("{prefix}/{photo_id}.{}", encoded.extension);
        let thumb_path = format!("{prefix}/{photo_id}.min.{}", encoded.extension);
        async move {
            let (full, thumb) = try_join(
                storage.upload(&full_path, encoded.full, &encoded.content_type),
                storage.upload(&thumb_path, encoded.thumbnail, &encoded.content_type),
            )
            .await?;
            Ok::<_, StorageError>((order, full, thumb))
        }
    });

    let mut rows = Vec::new();
    let mut errors = Vec::new();
    for result in join_all(uploads).await {
        match result {
            Ok((order, full, thumb)) => {
                rows.push(ContentPhoto {
                    id: full.id,
                    photo_url: full.public_url,
                    kind: PhotoKind::Photo,
                    order,
                    content_id: content_id.to_string(),
                });
                rows.push(ContentPhoto {
                    id: thumb.id,
                    photo_url: thumb.public_url,
                    kind: PhotoKind::Thumbnail,
                    order,
                    content_id: content_id.to_string(),
                });
            }
            Err(e) => errors.push(e.to_string()),
        }
    }

    if !errors.is_empty() {
        return Err(StorageError::Batch(errors.join("; ")));
    }
    Ok(rows)
}

struct EncodedPhoto {
    full: Vec<u8>,
    thumbnail: Vec<u8>,
    extension: String,
    content_type: String,
}

/// Re-encode to webp plus a bounded thumbnail. Blobs the decoder cannot
/// handle (SVG in particular) pass through unchanged for both artifacts.
fn encode(blob: &ImageBlob) -> EncodedPhoto {
    match try_encode_webp(blob) {
        Some(encoded) => encoded,
        None => {
            warn!("re-encode failed for {}, uploading original bytes", blob.name);
            EncodedPhoto {
                full: blob.bytes.clone(),
                thumbnail: blob.bytes.clone(),
                extension: blob.extension().to_ascii_lowercase(),
                content_type: blob.content_type.clone(),
            }
        }
    }
}

fn try_encode_webp(blob: &ImageBlob) -> Option<EncodedPhoto> {
    let img = image::load_from_memory(&blob.bytes).ok()?;

    let mut full = Vec::new();
    img.write_to(&mut Cursor::new(&mut full), ImageFormat::WebP).ok()?;

    let mut thumbnail = Vec::new();
    img.thumbnail(THUMBNAIL_SIZE, THUMBNAIL_SIZE)
        .write_to(&mut Cursor::new(&mut thumbnail), ImageFormat::WebP)
        .ok()?;

    Some(EncodedPhoto {
        full,
        thumbnail,
        extension: "webp".to_string(),
        content_type: "image/webp".to_string(),
    })
}
