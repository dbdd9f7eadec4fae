//! On-disk font cache
//!
//! Fonts are downloaded once into a cache directory and reused by every
//! later render. A file that already exists is never fetched again.

use crate::types::*;
use guide_layout::{FontAsset, FontSource, GuideError};
use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;

/// Upper bound on a downloaded font file
const MAX_FONT_BYTES: u64 = 16 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct FontCache {
    dir: PathBuf,
    regular_url: String,
    bold_url: String,
    timeout: Duration,
}

impl FontCache {
    pub fn from_config(config: &RemoteConfig) -> Self {
        Self {
            dir: config.font_dir.clone(),
            regular_url: config.regular_font_url.clone(),
            bold_url: config.bold_font_url.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    /// Location of an asset inside the cache
    pub fn path(&self, asset: FontAsset) -> PathBuf {
        self.dir.join(asset.file_name())
    }

    fn url(&self, asset: FontAsset) -> &str {
        match asset {
            FontAsset::Regular => &self.regular_url,
            FontAsset::Bold => &self.bold_url,
        }
    }

    /// Make sure an asset is on disk, downloading it if absent
    pub fn ensure(&self, asset: FontAsset) -> Result<PathBuf> {
        let path = self.path(asset);
        if path.exists() {
            log::debug!("Font cached at {}", path.display());
            return Ok(path);
        }

        log::info!("Downloading {} from {}", asset.file_name(), self.url(asset));
        let bytes = self.download(self.url(asset))?;

        std::fs::create_dir_all(&self.dir)?;
        // Only complete downloads ever appear under the final name
        let partial = path.with_extension("part");
        std::fs::write(&partial, &bytes)?;
        std::fs::rename(&partial, &path)?;

        log::info!("Saved {} ({} bytes)", path.display(), bytes.len());
        Ok(path)
    }

    /// Fetch both assets; the bold one may fail without failing the call
    pub fn ensure_all(&self) -> Result<Vec<PathBuf>> {
        let mut paths = vec![self.ensure(FontAsset::Regular)?];
        match self.ensure(FontAsset::Bold) {
            Ok(path) => paths.push(path),
            Err(err) => log::warn!("Bold font unavailable: {}", err),
        }
        Ok(paths)
    }

    fn download(&self, url: &str) -> Result<Vec<u8>> {
        let response = ureq::AgentBuilder::new()
            .timeout(self.timeout)
            .build()
            .get(url)
            .call()
            .map_err(|e| RemoteError::Http(e.to_string()))?;

        let mut bytes = Vec::new();
        response
            .into_reader()
            .take(MAX_FONT_BYTES)
            .read_to_end(&mut bytes)?;

        if bytes.is_empty() {
            return Err(RemoteError::Http(format!("Empty response from {}", url)));
        }
        Ok(bytes)
    }
}

impl FontSource for FontCache {
    fn load(&self, asset: FontAsset) -> guide_layout::Result<Vec<u8>> {
        let path = self
            .ensure(asset)
            .map_err(|e| GuideError::Font(format!("{}: {}", asset.file_name(), e)))?;
        Ok(std::fs::read(path)?)
    }
}
