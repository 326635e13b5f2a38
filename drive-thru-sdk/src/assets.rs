use crate::error::Error;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetStatus {
    Downloaded(PathBuf),
    Present(PathBuf),
}

/// File name an asset URL is stored under: its last non-empty path segment.
pub fn asset_file_name(url: &str) -> Result<String, Error> {
    let parsed = reqwest::Url::parse(url)
        .map_err(|e| Error::Config(format!("asset '{}' is not a URL: {}", url, e)))?;
    let name = parsed
        .path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .unwrap_or_default();

    if matches!(name, "" | "." | "..") {
        return Err(Error::Config(format!("cannot derive a file name from asset URL '{}'", url)));
    }
    Ok(name.to_string())
}

/// Fetches every asset into `dir`, skipping files that already exist.
pub async fn download_assets(urls: &[String], dir: &Path) -> Result<Vec<AssetStatus>, Error> {
    tokio::fs::create_dir_all(dir).await?;
    let client = reqwest::Client::new();
    let mut results = Vec::with_capacity(urls.len());

    for url in urls {
        let target = dir.join(asset_file_name(url)?);
        if tokio::fs::try_exists(&target).await? {
            tracing::info!("Asset {} already present", target.display());
            results.push(AssetStatus::Present(target));
            continue;
        }

        tracing::info!("Downloading {}", url);
        let res = client.get(url).send().await?.error_for_status()?;
        let bytes = res.bytes().await?;

        // Write to a temporary name first so an interrupted download is retried next time.
        let partial = target.with_extension("part");
        tokio::fs::write(&partial, &bytes).await?;
        tokio::fs::rename(&partial, &target).await?;

        tracing::info!("Saved {} ({} bytes)", target.display(), bytes.len());
        results.push(AssetStatus::Downloaded(target));
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_asset_file_name() {
        assert_eq!(
            asset_file_name("https://cdn.example.com/audio/bg_noise.mp3?v=2").unwrap(),
            "bg_noise.mp3"
        );
        assert_eq!(
            asset_file_name("https://cdn.example.com/models/vad.onnx/").unwrap(),
            "vad.onnx"
        );
        assert!(asset_file_name("https://cdn.example.com").is_err());
        assert!(asset_file_name("not a url").is_err());
    }

    #[test]
    fn test_dot_segments_are_not_file_names() {
        assert!(asset_file_name("https://cdn.example.com/models/..").is_err());
        assert!(asset_file_name("https://cdn.example.com/models/.").is_err());
        assert!(asset_file_name("https://cdn.example.com/..").is_err());
    }

    #[tokio::test]
    async fn test_parent_directory_url_is_rejected() {
        let dir = tempdir().unwrap();
        let assets = dir.path().join("assets");

        let err = download_assets(&["https://cdn.example.com/models/..".to_string()], &assets)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[tokio::test]
    async fn test_existing_assets_are_skipped() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("bg_noise.mp3"), b"cached").unwrap();

        let results = download_assets(
            &["https://cdn.example.com/bg_noise.mp3".to_string()],
            dir.path(),
        )
        .await
        .unwrap();

        assert_eq!(results, vec![AssetStatus::Present(dir.path().join("bg_noise.mp3"))]);
    }

    #[tokio::test]
    async fn test_nothing_to_download() {
        let dir = tempdir().unwrap();
        let results = download_assets(&[], &dir.path().join("assets")).await.unwrap();
        assert!(results.is_empty());
        assert!(dir.path().join("assets").is_dir());
    }
}
