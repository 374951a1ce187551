use axum::extract::Multipart;
use std::path::{Path, PathBuf};

/// Multipart field that carries listing photos
pub const IMAGES_FIELD: &str = "images";

/// Public URL prefix of stored uploads
pub const UPLOADS_ROUTE: &str = "/uploads";

/// Multipart wizard form: text parts plus the photos stored on disk
#[derive(Debug, Default)]
pub struct WizardSubmission {
    pub fields: Vec<(String, String)>,
    pub image_urls: Vec<String>,
    /// Files written for `image_urls`, removed again if publishing fails
    pub stored_files: Vec<PathBuf>,
}

/// Image content types accepted for listing photos
fn extension_for(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/gif" => Some("gif"),
        _ => None,
    }
}

/// Read text fields and store `images` parts under `dir`.
///
/// Each stored file gets a fresh uuid name and is returned as an
/// `/uploads/<name>` URL in submission order. On error the files stored so
/// far are removed.
pub async fn read_wizard_submission(
    multipart: &mut Multipart,
    dir: &Path,
) -> anyhow::Result<WizardSubmission> {
    let mut submission = WizardSubmission::default();

    match read_parts(multipart, dir, &mut submission).await {
        Ok(()) => Ok(submission),
        Err(e) => {
            discard_uploads(&submission.stored_files).await;
            Err(e)
        }
    }
}

async fn read_parts(
    multipart: &mut Multipart,
    dir: &Path,
    submission: &mut WizardSubmission,
) -> anyhow::Result<()> {
    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_string) else {
            field.bytes().await?;
            continue;
        };

        if name == IMAGES_FIELD && field.file_name().is_some() {
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let Some(extension) = extension_for(&content_type) else {
                anyhow::bail!("Unsupported image type: {}", content_type);
            };

            let data = field.bytes().await?;
            if data.is_empty() {
                continue;
            }

            tokio::fs::create_dir_all(dir).await?;
            let file_name = format!("{}.{}", uuid::Uuid::new_v4(), extension);
            let path = dir.join(&file_name);
            tokio::fs::write(&path, &data).await?;
            tracing::debug!("Stored upload {} ({} bytes)", file_name, data.len());

            submission.stored_files.push(path);
            submission
                .image_urls
                .push(format!("{}/{}", UPLOADS_ROUTE, file_name));
        } else {
            let value = field.text().await?;
            submission.fields.push((name, value));
        }
    }

    Ok(())
}

/// Remove stored uploads of a submission that was not published
pub async fn discard_uploads(paths: &[PathBuf]) {
    for path in paths {
        match tokio::fs::remove_file(path).await {
            Ok(()) => tracing::debug!("Removed upload {}", path.display()),
            Err(e) => tracing::warn!("Failed to remove upload {}: {}", path.display(), e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_images_are_accepted() {
        assert_eq!(extension_for("image/jpeg"), Some("jpg"));
        assert_eq!(extension_for("image/webp"), Some("webp"));
        assert_eq!(extension_for("application/pdf"), None);
        assert_eq!(extension_for("text/html"), None);
    }

    fn scratch_dir() -> PathBuf {
        std::env::temp_dir().join(format!("uploads-{}", uuid::Uuid::new_v4()))
    }

    async fn multipart(parts: &[(&str, Option<&str>, &str, &str)]) -> Multipart {
        use axum::extract::FromRequest;

        let mut body = String::new();
        for (name, file_name, content_type, data) in parts {
            body.push_str("--XBOUNDARY\r\n");
            match file_name {
                Some(file) => body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                    name, file
                )),
                None => body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{}\"\r\n",
                    name
                )),
            }
            body.push_str(&format!("Content-Type: {}\r\n\r\n{}\r\n", content_type, data));
        }
        body.push_str("--XBOUNDARY--\r\n");

        let request = axum::http::Request::builder()
            .method("POST")
            .header(
                axum::http::header::CONTENT_TYPE,
                "multipart/form-data; boundary=XBOUNDARY",
            )
            .body(axum::body::Body::from(body))
            .unwrap();
        Multipart::from_request(request, &()).await.unwrap()
    }

    fn files_in(dir: &Path) -> usize {
        std::fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
    }

    #[tokio::test]
    async fn test_reads_fields_and_stores_images() {
        let dir = scratch_dir();
        let mut form = multipart(&[
            ("name", None, "text/plain", "Zamzam Residence"),
            ("images", Some("a.png"), "image/png", "PNGDATA"),
        ])
        .await;

        let submission = read_wizard_submission(&mut form, &dir).await.unwrap();
        assert_eq!(
            submission.fields,
            vec![("name".to_string(), "Zamzam Residence".to_string())]
        );
        assert_eq!(submission.image_urls.len(), 1);
        assert!(submission.image_urls[0].starts_with("/uploads/"));
        assert_eq!(submission.stored_files.len(), 1);
        assert!(submission.stored_files[0].exists());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_rejected_part_removes_stored_images() {
        let dir = scratch_dir();
        let mut form = multipart(&[
            ("images", Some("a.png"), "image/png", "PNGDATA"),
            ("images", Some("b.jpg"), "image/jpeg", "JPEGDATA"),
            ("images", Some("c.pdf"), "application/pdf", "%PDF"),
        ])
        .await;

        let err = read_wizard_submission(&mut form, &dir).await.unwrap_err();
        assert!(err.to_string().contains("application/pdf"));
        assert_eq!(files_in(&dir), 0);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_discard_uploads_removes_files() {
        let dir = scratch_dir();
        std::fs::create_dir_all(&dir).unwrap();
        let paths: Vec<PathBuf> = ["a.jpg", "b.png"].iter().map(|n| dir.join(n)).collect();
        for path in &paths {
            std::fs::write(path, b"x").unwrap();
        }

        discard_uploads(&paths).await;
        assert_eq!(files_in(&dir), 0);

        // already gone: logged, not fatal
        discard_uploads(&paths).await;
        let _ = std::fs::remove_dir_all(&dir);
    }
}
