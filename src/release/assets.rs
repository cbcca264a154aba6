//! Release asset upload and carry-over.

use std::path::PathBuf;
use std::str::FromStr;

use tracing::{debug, info};

use crate::error::{AssetError, ReleaseError};
use crate::github::{Asset, Release, ReleaseHost};

/// A local file to attach to the release, written as `path` or `path#label`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetSpec {
    pub path: PathBuf,
    pub label: Option<String>,
}

impl AssetSpec {
    /// Asset name on the release: the file name of the path.
    pub fn file_name(&self) -> Result<String, AssetError> {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| AssetError::MissingFileName(self.path.display().to_string()))
    }
}

impl FromStr for AssetSpec {
    type Err = AssetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (path, label) = match s.split_once('#') {
            Some((path, label)) => (path.trim(), Some(label.trim())),
            None => (s.trim(), None),
        };

        if path.is_empty() {
            return Err(AssetError::MissingFileName(s.to_string()));
        }

        Ok(Self {
            path: PathBuf::from(path),
            label: label.filter(|l| !l.is_empty()).map(str::to_string),
        })
    }
}

/// Upload local files, replacing any existing asset with the same name.
pub async fn upload_assets(
    host: &dyn ReleaseHost,
    release: &Release,
    specs: &[AssetSpec],
) -> Result<Vec<Asset>, ReleaseError> {
    if specs.is_empty() {
        return Ok(Vec::new());
    }

    let existing = host.list_assets(release.id).await?;
    let mut uploaded = Vec::with_capacity(specs.len());

    for spec in specs {
        let name = spec.file_name()?;
        let data = tokio::fs::read(&spec.path)
            .await
            .map_err(|source| AssetError::ReadFailed {
                path: spec.path.display().to_string(),
                source,
            })?;

        if let Some(old) = existing.iter().find(|a| a.name == name) {
            info!("Replacing existing asset {}", name);
            host.delete_asset(old.id).await?;
        }

        debug!("Uploading {} ({} bytes)", name, data.len());
        let asset = host
            .upload_asset(release.id, &name, spec.label.clone(), data)
            .await?;
        info!("Uploaded asset {}", asset.name);
        uploaded.push(asset);
    }

    Ok(uploaded)
}

/// Copy every asset of `from` onto `to`, keeping names and labels.
pub async fn copy_assets(
    host: &dyn ReleaseHost,
    from: &Release,
    to: &Release,
) -> Result<Vec<Asset>, ReleaseError> {
    let assets = host.list_assets(from.id).await?;
    let mut copied = Vec::with_capacity(assets.len());

    for asset in assets {
        let data = host.download_asset(asset.id).await?;
        let uploaded = host
            .upload_asset(to.id, &asset.name, asset.label.clone(), data)
            .await?;
        info!(
            "Copied asset {} from {} to {}",
            uploaded.name, from.tag_name, to.tag_name
        );
        copied.push(uploaded);
    }

    Ok(copied)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use mockall::predicate::eq;

    use super::*;
    use crate::github::MockReleaseHost;

    fn release(id: u64, tag: &str) -> Release {
        Release {
            id,
            tag_name: tag.to_string(),
            name: Some(tag.to_string()),
            body: None,
            draft: false,
            prerelease: false,
            target_commitish: None,
            html_url: None,
            upload_url: None,
        }
    }

    fn asset(id: u64, name: &str, label: Option<&str>) -> Asset {
        Asset {
            id,
            name: name.to_string(),
            label: label.map(str::to_string),
            size: 3,
        }
    }

    #[test]
    fn test_parse_asset_spec() {
        let spec: AssetSpec = "dist/app.tar.gz#Linux build".parse().unwrap();
        assert_eq!(spec.path, PathBuf::from("dist/app.tar.gz"));
        assert_eq!(spec.label.as_deref(), Some("Linux build"));
        assert_eq!(spec.file_name().unwrap(), "app.tar.gz");

        let plain: AssetSpec = "app.zip".parse().unwrap();
        assert_eq!(plain.label, None);

        let empty_label: AssetSpec = "app.zip#".parse().unwrap();
        assert_eq!(empty_label.label, None);

        assert!("#label".parse::<AssetSpec>().is_err());
    }

    #[tokio::test]
    async fn test_upload_replaces_existing_asset() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"abc").unwrap();
        let name = file
            .path()
            .file_name()
            .unwrap()
            .to_string_lossy()
            .into_owned();
        let spec = AssetSpec {
            path: file.path().to_path_buf(),
            label: Some("Binary".to_string()),
        };

        let mut host = MockReleaseHost::new();
        let existing_name = name.clone();
        host.expect_list_assets()
            .with(eq(7))
            .returning(move |_| Ok(vec![asset(40, &existing_name, None)]));
        host.expect_delete_asset()
            .with(eq(40))
            .times(1)
            .returning(|_| Ok(()));
        host.expect_upload_asset()
            .withf(|id, _, label, data| {
                *id == 7 && label.as_deref() == Some("Binary") && data == b"abc"
            })
            .times(1)
            .returning(|_, name, label, _| Ok(asset(41, name, label.as_deref())));

        let uploaded = upload_assets(&host, &release(7, "1.0.0"), &[spec])
            .await
            .unwrap();
        assert_eq!(uploaded.len(), 1);
        assert_eq!(uploaded[0].name, name);
    }

    #[tokio::test]
    async fn test_upload_missing_file_fails() {
        let mut host = MockReleaseHost::new();
        host.expect_list_assets().returning(|_| Ok(vec![]));

        let spec: AssetSpec = "/nonexistent/cutrelease/asset.bin".parse().unwrap();
        let result = upload_assets(&host, &release(1, "1.0.0"), &[spec]).await;
        assert!(matches!(
            result,
            Err(ReleaseError::Asset(AssetError::ReadFailed { .. }))
        ));
    }

    #[tokio::test]
    async fn test_no_specs_makes_no_calls() {
        let host = MockReleaseHost::new();
        let uploaded = upload_assets(&host, &release(1, "1.0.0"), &[]).await.unwrap();
        assert!(uploaded.is_empty());
    }

    #[tokio::test]
    async fn test_copy_assets_between_releases() {
        let mut host = MockReleaseHost::new();
        host.expect_list_assets()
            .with(eq(1))
            .returning(|_| Ok(vec![asset(10, "app.zip", Some("App"))]));
        host.expect_download_asset()
            .with(eq(10))
            .returning(|_| Ok(b"zip".to_vec()));
        host.expect_upload_asset()
            .withf(|id, name, label, data| {
                *id == 2 && name == "app.zip" && label.as_deref() == Some("App") && data == b"zip"
            })
            .times(1)
            .returning(|_, name, label, _| Ok(asset(20, name, label.as_deref())));

        let copied = copy_assets(&host, &release(1, "1.0.0-rc.1"), &release(2, "1.0.0"))
            .await
            .unwrap();
        assert_eq!(copied, vec![asset(20, "app.zip", Some("App"))]);
    }
}
