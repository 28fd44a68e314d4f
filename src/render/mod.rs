//! Render-ready post records
//!
//! Turns a stored [`BlogPost`] plus a [`Locale`] into the flat records the
//! templates consume, and selects the posts shown next to it.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::cmp::Ordering;

use crate::content::{post_path, BlogPost, Locale, Localized};
use crate::helpers::{facebook_share_url, full_url_for, strip_html, x_share_url};

/// Average reading speed used for the estimate
const WORDS_PER_MINUTE: usize = 200;

lazy_static! {
    static ref CITATION_MARKER: Regex = Regex::new(r"\[oaicite:\d+\]\{[^}]*\}").unwrap();
    static ref CLASS_NAME_ATTR: Regex = Regex::new(r#"className\s*=\s*""#).unwrap();
}

/// Estimated reading time in minutes, never less than one
pub fn reading_time(html: &str) -> usize {
    let words = strip_html(html).split_whitespace().count();
    // Half-up rounding of words / WPM
    let minutes = (words + WORDS_PER_MINUTE / 2) / WORDS_PER_MINUTE;
    minutes.max(1)
}

/// Content cleanup applied before a body is rendered.
///
/// Removes `[oaicite:N]{...}` citation markers and rewrites JSX-style
/// `className="` attributes to `class="`. Stored HTML is otherwise passed
/// through untouched: this is not a sanitizer.
pub fn clean_content(html: &str) -> String {
    let without_markers = CITATION_MARKER.replace_all(html, "");
    CLASS_NAME_ATTR
        .replace_all(&without_markers, r#"class=""#)
        .into_owned()
}

/// Text for a locale with the default-locale fallback; a value missing in
/// both renders as empty
fn text(post: &BlogPost, field: &str, values: &Localized<String>, locale: Locale) -> String {
    match values.resolve(locale) {
        Ok(value) => value.clone(),
        Err(e) => {
            tracing::warn!("Post '{}' has no {}: {}", post.slug, field, e);
            String::new()
        }
    }
}

/// Link to the same post in one of the supported languages
#[derive(Debug, Clone, Serialize)]
pub struct LanguageLink {
    pub code: &'static str,
    pub name: &'static str,
    pub href: String,
    pub active: bool,
}

/// Compact post record for lists, suggestions and the home page
#[derive(Debug, Clone, Serialize)]
pub struct PostCard {
    pub slug: String,
    pub title: String,
    pub author: String,
    pub date: String,
    pub excerpt: String,
    pub image_url: String,
    pub href: String,
}

impl PostCard {
    pub fn build(post: &BlogPost, locale: Locale) -> Self {
        Self {
            slug: post.slug.clone(),
            title: text(post, "title", &post.titles, locale),
            author: text(post, "author", &post.authors, locale),
            date: text(post, "date", &post.dates, locale),
            excerpt: text(post, "excerpt", &post.excerpts, locale),
            image_url: post.image_url.clone(),
            href: post_path(&post.slug, locale),
        }
    }
}

/// Everything the post page needs
#[derive(Debug, Clone, Serialize)]
pub struct PostView {
    pub slug: String,
    pub locale: Locale,
    pub title: String,
    pub author: String,
    pub date: String,
    pub excerpt: String,
    pub content: String,
    pub image_url: String,
    pub reading_minutes: usize,
    pub share_url: String,
    pub facebook_share: String,
    pub x_share: String,
    pub languages: Vec<LanguageLink>,
    pub back_href: String,
}

impl PostView {
    pub fn build(post: &BlogPost, locale: Locale, base_url: &str) -> Self {
        let title = text(post, "title", &post.titles, locale);
        let raw = text(post, "content", &post.content, locale);
        let share_url = full_url_for(base_url, &post_path(&post.slug, locale));

        let languages = Locale::ALL
            .iter()
            .map(|&l| LanguageLink {
                code: l.code(),
                name: l.native_name(),
                href: post_path(&post.slug, l),
                active: l == locale,
            })
            .collect();

        Self {
            slug: post.slug.clone(),
            locale,
            author: text(post, "author", &post.authors, locale),
            date: text(post, "date", &post.dates, locale),
            excerpt: text(post, "excerpt", &post.excerpts, locale),
            reading_minutes: reading_time(&raw),
            content: clean_content(&raw),
            image_url: post.image_url.clone(),
            facebook_share: facebook_share_url(&share_url),
            x_share: x_share_url(&share_url, &title),
            share_url,
            title,
            languages,
            back_href: format!("/blog?lang={}", locale.code()),
        }
    }
}

/// Look a post up by slug
pub fn find_post<'a>(posts: &'a [BlogPost], slug: &str) -> Option<&'a BlogPost> {
    posts.iter().find(|p| p.slug == slug)
}

/// Newest first by the locale's date; unparseable dates go last and equal
/// dates are ordered by slug
fn compare_by_date(a: &BlogPost, b: &BlogPost, locale: Locale) -> Ordering {
    match (a.date(locale), b.date(locale)) {
        (Some(da), Some(db)) => db.cmp(&da),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
    .then_with(|| a.slug.cmp(&b.slug))
}

/// Sort posts newest first for a locale
pub fn sort_by_date(posts: &mut [BlogPost], locale: Locale) {
    posts.sort_by(|a, b| compare_by_date(a, b, locale));
}

/// Up to `count` posts other than `current_slug`, newest first
pub fn next_posts<'a>(
    posts: &'a [BlogPost],
    current_slug: &str,
    locale: Locale,
    count: usize,
) -> Vec<&'a BlogPost> {
    let mut others: Vec<&BlogPost> = posts.iter().filter(|p| p.slug != current_slug).collect();
    others.sort_by(|a, b| compare_by_date(a, b, locale));
    others.truncate(count);
    others
}

/// The `count` newest posts for a locale
pub fn recent_posts(posts: &[BlogPost], locale: Locale, count: usize) -> Vec<&BlogPost> {
    let mut all: Vec<&BlogPost> = posts.iter().collect();
    all.sort_by(|a, b| compare_by_date(a, b, locale));
    all.truncate(count);
    all
}
