//! Image assets used by the game, and the on-disk catalog of which ones are usable.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use bevy_ecs::resource::Resource;
use strum::{EnumCount, IntoEnumIterator};
use strum_macros::{Display, EnumCount, EnumIter, IntoStaticStr};
use tracing::{debug, info, warn};

use crate::error::AssetError;

/// A minimal valid PNG (one transparent pixel), written for any asset missing on disk.
pub const PLACEHOLDER_PNG: [u8; 70] = [
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52, 0x00, 0x00, 0x00, 0x01,
    0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F, 0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x44, 0x41,
    0x54, 0x78, 0xDA, 0x63, 0xFC, 0xCF, 0xC0, 0x50, 0x0F, 0x00, 0x04, 0x85, 0x01, 0x80, 0x84, 0xA9, 0x8C, 0x21, 0x00, 0x00,
    0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumCount, IntoStaticStr, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum Asset {
    Ground,
    DinoIdle,
    DinoRun,
    DinoDuck,
    DinoHurt,
    Restart,
    GameOver,
    Cloud,
    #[strum(serialize = "cactus-small-1")]
    CactusSmall1,
    #[strum(serialize = "cactus-small-2")]
    CactusSmall2,
    #[strum(serialize = "cactus-small-3")]
    CactusSmall3,
    #[strum(serialize = "cactus-big-1")]
    CactusBig1,
    #[strum(serialize = "cactus-big-2")]
    CactusBig2,
    #[strum(serialize = "cactus-big-3")]
    CactusBig3,
    Bird,
}

/// The two cactus size classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CactusSize {
    Small,
    Big,
}

impl Asset {
    /// The texture key, e.g. `dino-idle`.
    pub fn key(self) -> &'static str {
        self.into()
    }

    pub fn file_name(self) -> String {
        format!("{}.png", self.key())
    }

    /// Without these the run cannot be presented at all; losing them is reported loudly.
    pub fn is_critical(self) -> bool {
        matches!(self, Asset::DinoIdle | Asset::Ground)
    }

    /// The texture for a cactus of the given size class and variant (1 to 3).
    pub fn cactus(size: CactusSize, variant: u8) -> Option<Asset> {
        match (size, variant) {
            (CactusSize::Small, 1) => Some(Asset::CactusSmall1),
            (CactusSize::Small, 2) => Some(Asset::CactusSmall2),
            (CactusSize::Small, 3) => Some(Asset::CactusSmall3),
            (CactusSize::Big, 1) => Some(Asset::CactusBig1),
            (CactusSize::Big, 2) => Some(Asset::CactusBig2),
            (CactusSize::Big, 3) => Some(Asset::CactusBig3),
            _ => None,
        }
    }
}

/// Which assets were found usable when the game booted.
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct AssetCatalog {
    dir: PathBuf,
    loaded: [bool; Asset::COUNT],
}

impl AssetCatalog {
    /// Probes every asset under `dir`.
    ///
    /// Missing or unreadable files are logged and marked unavailable; this never fails.
    pub fn load(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref().to_path_buf();
        let mut loaded = [false; Asset::COUNT];

        for asset in Asset::iter() {
            match probe(&dir, asset) {
                Ok(()) => {
                    loaded[asset as usize] = true;
                    debug!(asset = asset.key(), "Asset loaded");
                }
                Err(error) if asset.is_critical() => {
                    warn!(asset = asset.key(), %error, "Critical asset unavailable, falling back to engine default");
                }
                Err(error) => {
                    warn!(asset = asset.key(), %error, "Asset unavailable");
                }
            }
        }

        let catalog = Self { dir, loaded };
        info!(
            dir = %catalog.dir.display(),
            loaded = catalog.loaded_count(),
            total = Asset::COUNT,
            "Asset catalog ready"
        );
        catalog
    }

    /// A catalog where every asset is available, as if every file had loaded.
    pub fn complete() -> Self {
        Self {
            dir: PathBuf::new(),
            loaded: [true; Asset::COUNT],
        }
    }

    /// A catalog where only the given assets are available.
    pub fn with_loaded(assets: impl IntoIterator<Item = Asset>) -> Self {
        let mut loaded = [false; Asset::COUNT];
        for asset in assets {
            loaded[asset as usize] = true;
        }
        Self {
            dir: PathBuf::new(),
            loaded,
        }
    }

    pub fn is_loaded(&self, asset: Asset) -> bool {
        self.loaded[asset as usize]
    }

    pub fn loaded_count(&self) -> usize {
        self.loaded.iter().filter(|loaded| **loaded).count()
    }

    pub fn missing(&self) -> Vec<Asset> {
        Asset::iter().filter(|asset| !self.is_loaded(*asset)).collect()
    }

    pub fn missing_critical(&self) -> Vec<Asset> {
        self.missing().into_iter().filter(|asset| asset.is_critical()).collect()
    }

    /// Returns the texture if it loaded, otherwise an error describing what is missing.
    pub fn texture(&self, asset: Asset) -> Result<Asset, AssetError> {
        if self.is_loaded(asset) {
            Ok(asset)
        } else {
            Err(AssetError::NotFound(asset.file_name()))
        }
    }
}

fn probe(dir: &Path, asset: Asset) -> Result<(), AssetError> {
    let path = dir.join(asset.file_name());
    let bytes = fs::read(&path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => AssetError::NotFound(path.display().to_string()),
        _ => AssetError::Io(e),
    })?;

    if bytes.starts_with(&PNG_SIGNATURE) {
        Ok(())
    } else {
        Err(AssetError::Io(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("{} is not a PNG image", path.display()),
        )))
    }
}

/// Writes a placeholder image for every asset missing under `dir`, creating the directory if needed.
///
/// Existing files are left untouched. Returns the assets that were created.
pub fn ensure_placeholders(dir: impl AsRef<Path>) -> Result<Vec<Asset>, AssetError> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let mut created = Vec::new();
    for asset in Asset::iter() {
        let path = dir.join(asset.file_name());
        if path.exists() {
            continue;
        }

        fs::write(&path, PLACEHOLDER_PNG)?;
        info!(path = %path.display(), "Created placeholder asset");
        created.push(asset);
    }

    Ok(created)
}
