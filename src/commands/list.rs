//! List blog posts

use anyhow::Result;

use crate::content::{BlogPost, Locale, PostStore};
use crate::render;

/// One line per post, newest first, in the given locale
pub fn format_posts(posts: &mut [BlogPost], locale: Locale) -> Vec<String> {
    render::sort_by_date(posts, locale);
    posts
        .iter()
        .map(|post| {
            let date = post.dates.resolve(locale).map(String::as_str).unwrap_or("-");
            let title = post.titles.resolve(locale).map(String::as_str).unwrap_or("");
            let missing = if post.titles.is_complete() && post.content.is_complete() {
                ""
            } else {
                " (incomplete translation)"
            };
            format!("  {} - {} [{}]{}", date, title, post.slug, missing)
        })
        .collect()
}

/// List posts from the store
pub async fn run<S: PostStore>(store: &S, lang: &str) -> Result<()> {
    let Some(locale) = Locale::from_code(lang) else {
        anyhow::bail!("Unknown language: {}. Available: en, sq", lang);
    };

    let mut posts = store.list_posts().await?;
    println!("Posts ({}):", posts.len());
    for line in format_posts(&mut posts, locale) {
        println!("{}", line);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Localized, MemoryStore};

    fn post(slug: &str, date: &str) -> BlogPost {
        BlogPost {
            slug: slug.to_string(),
            titles: Localized::new(format!("{} en", slug), format!("{} sq", slug)),
            dates: Localized::new(date.to_string(), date.to_string()),
            content: Localized::new("<p>a</p>".to_string(), "<p>b</p>".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_format_posts_newest_first() {
        let mut posts = vec![post("old", "2023-01-01"), post("new", "2024-01-01")];
        let lines = format_posts(&mut posts, Locale::Sq);
        assert_eq!(lines[0], "  2024-01-01 - new sq [new]");
        assert_eq!(lines[1], "  2023-01-01 - old sq [old]");
    }

    #[test]
    fn test_format_posts_flags_missing_translation() {
        let mut partial = post("half", "2024-01-01");
        partial.titles = Localized {
            en: Some("Half".to_string()),
            sq: None,
        };
        let lines = format_posts(&mut [partial], Locale::Sq);
        assert_eq!(lines[0], "  2024-01-01 - Half [half] (incomplete translation)");
    }

    #[tokio::test]
    async fn test_run_rejects_unknown_language() {
        let store = MemoryStore::default();
        assert!(run(&store, "fr").await.is_err());
        assert!(run(&store, "en").await.is_ok());
    }
}
