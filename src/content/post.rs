//! Blog post model as stored in the `blogPosts` collection

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

use super::locale::{Locale, Localized};
use crate::helpers::encode_path_segment;

/// A blog post document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    /// Document id, used in URLs
    #[serde(default, deserialize_with = "null_as_default")]
    pub slug: String,

    /// Post title per locale
    #[serde(default, deserialize_with = "null_as_default")]
    pub titles: Localized<String>,

    /// Author name per locale
    #[serde(default, deserialize_with = "null_as_default")]
    pub authors: Localized<String>,

    /// Publication date per locale (ISO date string)
    #[serde(default, deserialize_with = "null_as_default")]
    pub dates: Localized<String>,

    /// Short summary per locale
    #[serde(default, deserialize_with = "null_as_default")]
    pub excerpts: Localized<String>,

    /// HTML body per locale
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: Localized<String>,

    /// Hero image: absolute URL or storage path
    #[serde(default, deserialize_with = "null_as_default")]
    pub image_url: String,

    /// Storage path of the hero image, preferred over `image_url` when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,

    /// Optional SEO overrides
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo: Option<SeoOverride>,
}

/// Firestore stores cleared fields as `null`; read them as the default
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Per-post SEO fields that replace the derived defaults when non-empty
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoOverride {
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    /// Comma-separated keyword list
    pub keywords: Option<String>,
    pub canonical_url: Option<String>,
    pub og_title: Option<String>,
    pub og_description: Option<String>,
    pub og_url: Option<String>,
    pub og_type: Option<String>,
    pub og_image: Option<String>,
}

impl BlogPost {
    /// Publication date for a locale, parsed from the stored string.
    ///
    /// Accepts `YYYY-MM-DD` and RFC 3339 timestamps; falls back to the
    /// default locale's date like every other localized field.
    pub fn date(&self, locale: Locale) -> Option<NaiveDate> {
        self.dates
            .resolve(locale)
            .ok()
            .and_then(|raw| parse_post_date(raw))
    }

    /// Path of the canonical localized page
    pub fn path(&self, locale: Locale) -> String {
        post_path(&self.slug, locale)
    }
}

/// `/blog/{slug}/{locale}`, with the slug percent-encoded
pub fn post_path(slug: &str, locale: Locale) -> String {
    format!("/blog/{}/{}", encode_path_segment(slug), locale.code())
}

/// Parse a stored post date
pub fn parse_post_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }

    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_document() {
        let json = r#"{
            "slug": "oak-table",
            "titles": {"en": "Oak Table", "sq": "Tavolinë Lisi"},
            "authors": {"en": "Arta", "sq": "Arta"},
            "dates": {"en": "2024-01-01", "sq": "2024-01-02"},
            "excerpts": {"en": "Solid oak.", "sq": "Lis i plotë."},
            "content": {"en": "<p>Hello</p>", "sq": "<p>Përshëndetje</p>"},
            "imageUrl": "blog/oak.jpg",
            "seo": {"ogTitle": "Oak", "keywords": "oak, table"}
        }"#;

        let post: BlogPost = serde_json::from_str(json).unwrap();
        assert_eq!(post.slug, "oak-table");
        assert_eq!(post.titles.get(Locale::Sq).unwrap(), "Tavolinë Lisi");
        assert_eq!(post.image_url, "blog/oak.jpg");
        let seo = post.seo.unwrap();
        assert_eq!(seo.og_title.as_deref(), Some("Oak"));
        assert_eq!(seo.meta_title, None);
    }

    #[test]
    fn test_null_fields_read_as_empty() {
        let json = r#"{
            "titles": {"en": "Oak Table", "sq": null},
            "authors": null,
            "imageUrl": null,
            "imagePath": null,
            "seo": null
        }"#;

        let post: BlogPost = serde_json::from_str(json).unwrap();
        assert_eq!(post.image_url, "");
        assert_eq!(post.image_path, None);
        assert_eq!(post.authors, Localized::default());
        assert_eq!(post.titles.resolve(Locale::Sq).unwrap(), "Oak Table");
        assert!(post.seo.is_none());
    }

    #[test]
    fn test_date_per_locale() {
        let post = BlogPost {
            dates: Localized::new("2024-01-01".to_string(), "2024-02-01".to_string()),
            ..Default::default()
        };
        assert_eq!(post.date(Locale::En), NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(post.date(Locale::Sq), NaiveDate::from_ymd_opt(2024, 2, 1));
    }

    #[test]
    fn test_parse_post_date_formats() {
        assert_eq!(
            parse_post_date("2024-03-05T10:00:00Z"),
            NaiveDate::from_ymd_opt(2024, 3, 5)
        );
        assert_eq!(parse_post_date("March 5"), None);
        assert_eq!(parse_post_date(""), None);
    }

    #[test]
    fn test_post_path() {
        assert_eq!(post_path("oak-table", Locale::Sq), "/blog/oak-table/sq");
    }

    #[test]
    fn test_post_path_encodes_slug() {
        assert_eq!(post_path("oak table", Locale::En), "/blog/oak%20table/en");
        assert_eq!(post_path("a\nb", Locale::En), "/blog/a%0Ab/en");
        assert_eq!(post_path("tavolinë", Locale::Sq), "/blog/tavolin%C3%AB/sq");
        assert_eq!(post_path("a/b?c", Locale::Sq), "/blog/a%2Fb%3Fc/sq");
    }
}
