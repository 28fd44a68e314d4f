//! Write sitemap.xml to disk

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};

use crate::content::PostStore;
use crate::sitemap;
use crate::Site;

/// Generate the sitemap and write it to `output`, or to
/// `public/sitemap.xml` when no path is given. `-` writes to stdout.
pub async fn run<S: PostStore>(site: &Site, store: &S, output: Option<&Path>) -> Result<()> {
    let xml = sitemap::generate(store, site.config.base_url()).await;

    if output == Some(Path::new("-")) {
        print!("{}", xml);
        return Ok(());
    }

    let path: PathBuf = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| site.public_dir.join("sitemap.xml"));
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, xml)?;

    tracing::info!("Wrote {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::content::{BlogPost, MemoryStore};

    #[tokio::test]
    async fn test_writes_into_public_dir() {
        let dir = tempfile::tempdir().unwrap();
        let site = Site::from_config(SiteConfig::default(), dir.path());
        let store = MemoryStore::new(vec![BlogPost {
            slug: "oak-table".to_string(),
            ..Default::default()
        }]);

        run(&site, &store, None).await.unwrap();

        let xml = fs::read_to_string(dir.path().join("public/sitemap.xml")).unwrap();
        assert!(xml.contains("<loc>https://roalmobileri.com/blog/oak-table/en</loc>"));
        assert!(xml.contains("<loc>https://roalmobileri.com/blog/oak-table/sq</loc>"));
    }
}
