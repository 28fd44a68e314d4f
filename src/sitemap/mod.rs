//! sitemap.xml generation

use crate::content::{post_path, BlogPost, Locale, PostStore};
use crate::helpers::{escape_xml, full_url_for};

/// Paths of the static sections, relative to the site root; `""` is home
pub const STATIC_PATHS: &[&str] = &["", "about", "services", "instagram", "contact"];

/// Response headers for the sitemap route
pub const CONTENT_TYPE: &str = "application/xml";
pub const CACHE_CONTROL: &str = "public, max-age=86400, stale-while-revalidate=60";

/// How often a URL is expected to change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeFreq {
    Daily,
    Weekly,
}

impl ChangeFreq {
    pub fn as_str(self) -> &'static str {
        match self {
            ChangeFreq::Daily => "daily",
            ChangeFreq::Weekly => "weekly",
        }
    }
}

/// One `<url>` element
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapEntry {
    pub loc: String,
    pub changefreq: ChangeFreq,
    pub priority: &'static str,
}

/// Entries for the static sections
pub fn static_entries(base_url: &str) -> Vec<SitemapEntry> {
    STATIC_PATHS
        .iter()
        .map(|path| {
            let home = path.is_empty();
            SitemapEntry {
                loc: full_url_for(base_url, path),
                changefreq: if home {
                    ChangeFreq::Daily
                } else {
                    ChangeFreq::Weekly
                },
                priority: if home { "1.0" } else { "0.9" },
            }
        })
        .collect()
}

/// Two entries per post, one for each locale
pub fn post_entries(base_url: &str, posts: &[BlogPost]) -> Vec<SitemapEntry> {
    posts
        .iter()
        .flat_map(|post| {
            Locale::ALL.iter().map(move |&locale| SitemapEntry {
                loc: full_url_for(base_url, &post_path(&post.slug, locale)),
                changefreq: ChangeFreq::Weekly,
                priority: "0.7",
            })
        })
        .collect()
}

/// Serialize entries into a sitemap document
pub fn render(entries: &[SitemapEntry]) -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    xml.push('\n');
    xml.push_str(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#);
    xml.push('\n');

    for entry in entries {
        xml.push_str("  <url>\n");
        xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(&entry.loc)));
        xml.push_str(&format!(
            "    <changefreq>{}</changefreq>\n",
            entry.changefreq.as_str()
        ));
        xml.push_str(&format!("    <priority>{}</priority>\n", entry.priority));
        xml.push_str("  </url>\n");
    }

    xml.push_str("</urlset>\n");
    xml
}

/// Sitemap for the static sections plus the given posts
pub fn build(base_url: &str, posts: &[BlogPost]) -> String {
    let mut entries = static_entries(base_url);
    entries.extend(post_entries(base_url, posts));
    render(&entries)
}

/// Sitemap from the live post list.
///
/// When the store cannot be read the static-only sitemap is returned.
pub async fn generate<S: PostStore>(store: &S, base_url: &str) -> String {
    match store.list_posts().await {
        Ok(posts) => {
            tracing::debug!("Sitemap with {} posts", posts.len());
            build(base_url, &posts)
        }
        Err(e) => {
            tracing::warn!("Could not list posts for sitemap, serving static paths only: {}", e);
            build(base_url, &[])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{MemoryStore, StoreError};

    const BASE: &str = "https://roalmobileri.com";

    struct UnreachableStore;

    impl PostStore for UnreachableStore {
        async fn get_post(&self, _slug: &str) -> Result<Option<BlogPost>, StoreError> {
            Err(StoreError::NotConfigured("offline"))
        }

        async fn list_posts(&self) -> Result<Vec<BlogPost>, StoreError> {
            Err(StoreError::NotConfigured("offline"))
        }
    }

    fn post(slug: &str) -> BlogPost {
        BlogPost {
            slug: slug.to_string(),
            ..Default::default()
        }
    }

    /// (loc, changefreq, priority) triples in document order
    fn urls(xml: &str) -> Vec<(String, String, String)> {
        let between = |block: &str, tag: &str| {
            let open = format!("<{}>", tag);
            let close = format!("</{}>", tag);
            let start = block.find(&open).unwrap() + open.len();
            let end = block.find(&close).unwrap();
            block[start..end].to_string()
        };

        xml.split("<url>")
            .skip(1)
            .map(|block| {
                (
                    between(block, "loc"),
                    between(block, "changefreq"),
                    between(block, "priority"),
                )
            })
            .collect()
    }

    #[test]
    fn test_static_entries() {
        let xml = build(BASE, &[]);
        let urls = urls(&xml);
        assert_eq!(urls.len(), STATIC_PATHS.len());
        assert_eq!(
            urls[0],
            (
                "https://roalmobileri.com/".to_string(),
                "daily".to_string(),
                "1.0".to_string()
            )
        );
        for (loc, freq, priority) in &urls[1..] {
            assert!(loc.starts_with("https://roalmobileri.com/"));
            assert_eq!(freq, "weekly");
            assert_eq!(priority, "0.9");
        }
    }

    #[test]
    fn test_post_entries_for_both_locales() {
        let xml = build(BASE, &[post("oak-table"), post("pine-bench")]);
        let urls = urls(&xml);
        assert_eq!(urls.len(), STATIC_PATHS.len() + 4);

        let blog: Vec<_> = urls.iter().filter(|(loc, _, _)| loc.contains("/blog/")).collect();
        assert_eq!(blog.len(), 4);
        assert_eq!(blog[0].0, "https://roalmobileri.com/blog/oak-table/en");
        assert_eq!(blog[1].0, "https://roalmobileri.com/blog/oak-table/sq");
        assert!(blog.iter().all(|(_, f, p)| f == "weekly" && p == "0.7"));
    }

    #[test]
    fn test_document_shape() {
        let xml = build(BASE, &[]);
        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(xml.contains(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#));
        assert!(xml.trim_end().ends_with("</urlset>"));
        assert_eq!(xml.matches("<url>").count(), xml.matches("</url>").count());
    }

    #[test]
    fn test_special_characters_escaped() {
        let xml = build(BASE, &[post(r#"a&b"<c>"#)]);
        assert!(xml.contains("<loc>https://roalmobileri.com/blog/a&amp;b%22%3Cc%3E/en</loc>"));

        // No raw special characters survive inside any <loc>
        for (loc, _, _) in urls(&xml) {
            let unescaped = loc
                .replace("&amp;", "")
                .replace("&quot;", "")
                .replace("&lt;", "")
                .replace("&gt;", "");
            assert!(!unescaped.contains(['&', '"', '<', '>']));
        }
    }

    #[test]
    fn test_slug_encoded_in_loc() {
        let xml = build(BASE, &[post("oak table"), post("tavolinë")]);
        assert!(xml.contains("<loc>https://roalmobileri.com/blog/oak%20table/en</loc>"));
        assert!(xml.contains("<loc>https://roalmobileri.com/blog/tavolin%C3%AB/sq</loc>"));
        assert!(urls(&xml).iter().all(|(loc, _, _)| !loc.contains(' ')));
    }

    #[tokio::test]
    async fn test_generate_from_store() {
        let store = MemoryStore::new(vec![post("oak-table")]);
        let xml = generate(&store, BASE).await;
        assert!(xml.contains("/blog/oak-table/sq"));
    }

    #[tokio::test]
    async fn test_generate_degrades_to_static_paths() {
        let xml = generate(&UnreachableStore, BASE).await;
        assert_eq!(xml, build(BASE, &[]));
        assert!(!xml.contains("/blog/"));
    }
}
