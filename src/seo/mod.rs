//! SEO metadata for pages
//!
//! Blog posts derive their head tags from the localized post fields, with
//! any non-empty field of the post's SEO record taking precedence.

use serde::Serialize;

use crate::config::SiteConfig;
use crate::content::{post_path, BlogPost, Locale, Localized, SeoOverride};
use crate::helpers::{full_url_for, html_escape, link_tag, meta_tag};

/// Open Graph type used when a post does not set one
const DEFAULT_OG_TYPE: &str = "article";

/// Twitter card style for every page
const TWITTER_CARD: &str = "summary_large_image";

/// Head metadata for one page; `Default` is the empty record
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PageMetadata {
    pub title: String,
    pub description: String,
    pub keywords: Option<Vec<String>>,
    pub canonical: String,
    pub alternates: Vec<Alternate>,
    pub open_graph: OpenGraph,
    pub twitter: TwitterCard,
    pub robots: Robots,
}

/// `<link rel="alternate" hreflang=...>` entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alternate {
    pub hreflang: String,
    pub href: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OpenGraph {
    pub title: String,
    pub description: String,
    pub url: String,
    #[serde(rename = "type")]
    pub og_type: String,
    pub images: Vec<String>,
    pub locale: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TwitterCard {
    pub card: String,
    pub title: String,
    pub description: String,
    pub images: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Robots {
    pub index: bool,
    pub follow: bool,
}

/// Override value if present and non-empty
fn pick<F>(seo: Option<&SeoOverride>, get: F) -> Option<String>
where
    F: Fn(&SeoOverride) -> Option<&String>,
{
    seo.and_then(get)
        .filter(|v| !v.is_empty())
        .cloned()
}

/// Localized post text with the default-locale fallback
fn localized(values: &Localized<String>, locale: Locale) -> String {
    values.resolve(locale).cloned().unwrap_or_default()
}

/// Split a comma-separated keyword list
pub fn parse_keywords(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(String::from)
        .collect()
}

/// Derive the metadata for a post page
pub fn synthesize(post: &BlogPost, locale: Locale, base_url: &str) -> PageMetadata {
    let seo = post.seo.as_ref();
    let field = |get: fn(&SeoOverride) -> Option<&String>| pick(seo, get);

    let title = localized(&post.titles, locale);
    let excerpt = localized(&post.excerpts, locale);

    let canonical = field(|s| s.canonical_url.as_ref())
        .unwrap_or_else(|| full_url_for(base_url, &post_path(&post.slug, locale)));

    let og_title = field(|s| s.og_title.as_ref()).unwrap_or_else(|| title.clone());
    let og_description = field(|s| s.og_description.as_ref()).unwrap_or_else(|| excerpt.clone());
    let og_image = field(|s| s.og_image.as_ref()).unwrap_or_else(|| post.image_url.clone());
    let images: Vec<String> = if og_image.is_empty() {
        Vec::new()
    } else {
        vec![og_image]
    };

    let alternates = Locale::ALL
        .iter()
        .map(|&l| Alternate {
            hreflang: l.hreflang().to_string(),
            href: full_url_for(base_url, &post_path(&post.slug, l)),
        })
        .collect();

    PageMetadata {
        title: field(|s| s.meta_title.as_ref()).unwrap_or_else(|| title.clone()),
        description: field(|s| s.meta_description.as_ref()).unwrap_or_else(|| excerpt.clone()),
        keywords: field(|s| s.keywords.as_ref()).map(|k| parse_keywords(&k)),
        alternates,
        open_graph: OpenGraph {
            title: og_title.clone(),
            description: og_description.clone(),
            url: field(|s| s.og_url.as_ref()).unwrap_or_else(|| canonical.clone()),
            og_type: field(|s| s.og_type.as_ref()).unwrap_or_else(|| DEFAULT_OG_TYPE.to_string()),
            images: images.clone(),
            locale: locale.og_locale().to_string(),
        },
        twitter: TwitterCard {
            card: TWITTER_CARD.to_string(),
            title: og_title,
            description: og_description,
            images,
        },
        canonical,
        robots: Robots {
            index: true,
            follow: true,
        },
    }
}

/// Metadata for `slug`, or the empty record when no post matches
pub fn for_slug(posts: &[BlogPost], slug: &str, locale: Locale, base_url: &str) -> PageMetadata {
    match crate::render::find_post(posts, slug) {
        Some(post) => synthesize(post, locale, base_url),
        None => PageMetadata::default(),
    }
}

/// Site-wide metadata for pages that are not blog posts
pub fn site_metadata(config: &SiteConfig, title: Option<&str>, path: &str, locale: Locale) -> PageMetadata {
    let url = full_url_for(config.base_url(), path);
    let title = config.page_title(title.unwrap_or(""));

    PageMetadata {
        title: title.clone(),
        description: config.description.clone(),
        keywords: (!config.keywords.is_empty()).then(|| config.keywords.clone()),
        canonical: url.clone(),
        alternates: Vec::new(),
        open_graph: OpenGraph {
            title: title.clone(),
            description: config.description.clone(),
            url,
            og_type: "website".to_string(),
            images: Vec::new(),
            locale: locale.og_locale().to_string(),
        },
        twitter: TwitterCard {
            card: TWITTER_CARD.to_string(),
            title,
            description: config.description.clone(),
            images: Vec::new(),
        },
        robots: Robots {
            index: true,
            follow: true,
        },
    }
}

impl PageMetadata {
    /// Whether this is the empty record
    pub fn is_empty(&self) -> bool {
        *self == PageMetadata::default()
    }

    /// Render the `<head>` tags for this page
    pub fn head_html(&self) -> String {
        if self.is_empty() {
            return String::new();
        }

        let mut tags: Vec<String> = Vec::new();
        tags.push(format!("<title>{}</title>", html_escape(&self.title)));
        tags.extend(meta_tag("name", "description", &self.description));
        if let Some(keywords) = &self.keywords {
            tags.extend(meta_tag("name", "keywords", &keywords.join(", ")));
        }

        let robots = format!(
            "{}, {}",
            if self.robots.index { "index" } else { "noindex" },
            if self.robots.follow { "follow" } else { "nofollow" }
        );
        tags.extend(meta_tag("name", "robots", &robots));

        if !self.canonical.is_empty() {
            tags.push(link_tag("canonical", &self.canonical, None));
        }
        for alt in &self.alternates {
            tags.push(link_tag("alternate", &alt.href, Some(&alt.hreflang)));
        }

        let og = &self.open_graph;
        tags.extend(meta_tag("property", "og:title", &og.title));
        tags.extend(meta_tag("property", "og:description", &og.description));
        tags.extend(meta_tag("property", "og:url", &og.url));
        tags.extend(meta_tag("property", "og:type", &og.og_type));
        for image in &og.images {
            tags.extend(meta_tag("property", "og:image", image));
        }
        tags.extend(meta_tag("property", "og:locale", &og.locale));

        let tw = &self.twitter;
        tags.extend(meta_tag("name", "twitter:card", &tw.card));
        tags.extend(meta_tag("name", "twitter:title", &tw.title));
        tags.extend(meta_tag("name", "twitter:description", &tw.description));
        for image in &tw.images {
            tags.extend(meta_tag("name", "twitter:image", image));
        }

        tags.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://roalmobileri.com";

    fn oak() -> BlogPost {
        BlogPost {
            slug: "oak-table".to_string(),
            titles: Localized::new("Oak Table".to_string(), "Tavolinë Lisi".to_string()),
            excerpts: Localized::new("Solid oak.".to_string(), "Lis i plotë.".to_string()),
            image_url: "https://cdn.example.com/oak.jpg".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults_without_override() {
        for locale in Locale::ALL {
            let post = oak();
            let meta = synthesize(&post, locale, BASE);
            let title = post.titles.get(locale).unwrap();
            assert_eq!(&meta.title, title);
            assert_eq!(&meta.open_graph.title, title);
            assert_eq!(&meta.twitter.title, title);
            assert_eq!(&meta.description, post.excerpts.get(locale).unwrap());
            assert_eq!(meta.open_graph.og_type, "article");
            assert_eq!(meta.keywords, None);
            assert_eq!(
                meta.canonical,
                format!("{}/blog/oak-table/{}", BASE, locale.code())
            );
            assert_eq!(meta.open_graph.url, meta.canonical);
            assert_eq!(meta.open_graph.images, vec!["https://cdn.example.com/oak.jpg"]);
            assert_eq!(meta.twitter.card, "summary_large_image");
        }
    }

    #[test]
    fn test_og_title_override() {
        let mut post = oak();
        post.seo = Some(SeoOverride {
            og_title: Some("X".to_string()),
            ..Default::default()
        });

        let meta = synthesize(&post, Locale::Sq, BASE);
        assert_eq!(meta.open_graph.title, "X");
        assert_eq!(meta.twitter.title, "X");
        // Page title has its own override field
        assert_eq!(meta.title, "Tavolinë Lisi");
    }

    #[test]
    fn test_empty_override_falls_back() {
        let mut post = oak();
        post.seo = Some(SeoOverride {
            meta_title: Some(String::new()),
            canonical_url: Some(String::new()),
            ..Default::default()
        });

        let meta = synthesize(&post, Locale::En, BASE);
        assert_eq!(meta.title, "Oak Table");
        assert_eq!(meta.canonical, "https://roalmobileri.com/blog/oak-table/en");
    }

    #[test]
    fn test_full_override() {
        let mut post = oak();
        post.seo = Some(SeoOverride {
            meta_title: Some("Meta".to_string()),
            meta_description: Some("Desc".to_string()),
            keywords: Some(" oak , table,, furniture ".to_string()),
            canonical_url: Some("https://example.com/oak".to_string()),
            og_description: Some("OG desc".to_string()),
            og_type: Some("website".to_string()),
            og_image: Some("https://example.com/og.jpg".to_string()),
            ..Default::default()
        });

        let meta = synthesize(&post, Locale::En, BASE);
        assert_eq!(meta.title, "Meta");
        assert_eq!(meta.description, "Desc");
        assert_eq!(
            meta.keywords,
            Some(vec!["oak".to_string(), "table".to_string(), "furniture".to_string()])
        );
        assert_eq!(meta.canonical, "https://example.com/oak");
        // og:url follows the canonical override
        assert_eq!(meta.open_graph.url, "https://example.com/oak");
        assert_eq!(meta.open_graph.og_type, "website");
        assert_eq!(meta.open_graph.images, vec!["https://example.com/og.jpg"]);
        assert_eq!(meta.twitter.description, "OG desc");
    }

    #[test]
    fn test_alternates_always_both_locales() {
        let meta = synthesize(&oak(), Locale::Sq, BASE);
        assert_eq!(
            meta.alternates,
            vec![
                Alternate {
                    hreflang: "en-US".to_string(),
                    href: "https://roalmobileri.com/blog/oak-table/en".to_string(),
                },
                Alternate {
                    hreflang: "sq-AL".to_string(),
                    href: "https://roalmobileri.com/blog/oak-table/sq".to_string(),
                },
            ]
        );
        assert_eq!(meta.open_graph.locale, "sq_AL");
    }

    #[test]
    fn test_missing_post_is_empty_record() {
        let meta = for_slug(&[oak()], "pine-bench", Locale::En, BASE);
        assert!(meta.is_empty());
        assert_eq!(meta.head_html(), "");
        assert!(!for_slug(&[oak()], "oak-table", Locale::En, BASE).is_empty());
    }

    #[test]
    fn test_head_html() {
        let mut post = oak();
        post.titles.set(Locale::En, "Oak & <Pine>".to_string());
        let head = synthesize(&post, Locale::En, BASE).head_html();

        assert!(head.contains("<title>Oak &amp; &lt;Pine&gt;</title>"));
        assert!(head.contains(r#"<link rel="canonical" href="https://roalmobileri.com/blog/oak-table/en">"#));
        assert!(head.contains(r#"hreflang="sq-AL""#));
        assert!(head.contains(r#"<meta property="og:type" content="article">"#));
        assert!(head.contains(r#"<meta name="robots" content="index, follow">"#));
        assert!(!head.contains("keywords"));
    }

    #[test]
    fn test_site_metadata() {
        let config = SiteConfig::default();
        let meta = site_metadata(&config, Some("Blog"), "/blog?lang=en", Locale::En);
        assert_eq!(meta.title, "Blog | RO-AL Mobileri");
        assert_eq!(meta.canonical, "https://roalmobileri.com/blog?lang=en");
        assert_eq!(meta.open_graph.og_type, "website");
    }
}
