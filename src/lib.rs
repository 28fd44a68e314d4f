//! roal-site: bilingual marketing site and blog for RO-AL Mobileri
//!
//! Posts are read from Firestore (or a JSON export) and rendered on request
//! in English or Albanian, with SEO metadata and a sitemap derived from
//! the same content.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod helpers;
pub mod i18n;
pub mod render;
pub mod seo;
pub mod server;
pub mod sitemap;
pub mod templates;

use anyhow::Result;
use std::path::{Path, PathBuf};

use content::{FirestoreStore, MemoryStore, SiteStore};

/// A site folder: configuration plus the directories it points to
#[derive(Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Static assets served as-is
    pub public_dir: PathBuf,
    /// Interface string overrides
    pub languages_dir: PathBuf,
}

impl Site {
    /// Open a site folder, reading `_config.yml` when present and applying
    /// `FIREBASE_*` environment overrides
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref();
        let config_path = base_dir.join("_config.yml");

        let mut config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };
        config.apply_env();

        Ok(Self::from_config(config, base_dir))
    }

    /// Site with an explicit configuration
    pub fn from_config<P: AsRef<Path>>(config: config::SiteConfig, base_dir: P) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let public_dir = base_dir.join(&config.public_dir);
        let languages_dir = base_dir.join(&config.languages_dir);

        Self {
            config,
            base_dir,
            public_dir,
            languages_dir,
        }
    }

    /// The post store: a JSON export when given, otherwise Firestore
    pub fn store(&self, posts_file: Option<&Path>) -> Result<SiteStore> {
        if let Some(path) = posts_file {
            let path = if path.is_absolute() {
                path.to_path_buf()
            } else {
                self.base_dir.join(path)
            };
            return Ok(SiteStore::Memory(MemoryStore::from_json_file(path)?));
        }

        if !self.config.firebase.is_configured() {
            anyhow::bail!(
                "Firebase is not configured. Set FIREBASE_PROJECT_ID (or firebase.project_id \
                 in _config.yml), or pass --posts <file.json>"
            );
        }

        tracing::debug!(
            "Using Firestore project {}",
            self.config.firebase.project_id
        );
        Ok(SiteStore::Firestore(FirestoreStore::new(
            &self.config.firebase,
        )?))
    }
}
