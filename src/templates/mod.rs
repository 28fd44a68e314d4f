//! Built-in site templates using Tera template engine
//!
//! All templates are embedded directly in the binary.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::config::SiteConfig;
use crate::content::Locale;

/// Template renderer with the embedded site templates
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Post bodies are stored HTML; text fields use the `escape` filter
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("site/layout.html")),
            ("home.html", include_str!("site/home.html")),
            ("blog_list.html", include_str!("site/blog_list.html")),
            ("post.html", include_str!("site/post.html")),
            ("error.html", include_str!("site/error.html")),
            (
                "partials/post_card.html",
                include_str!("site/partials/post_card.html"),
            ),
        ])?;

        tera.register_filter("truncate_chars", truncate_chars_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String, tera::Error> {
        self.tera.render(template_name, context)
    }
}

/// Tera filter: truncate by character count
fn truncate_chars_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("truncate_chars", "value", String, value);
    let length = match args.get("length") {
        Some(val) => tera::try_get_value!("truncate_chars", "length", usize, val),
        None => 160,
    };
    let omission = match args.get("omission") {
        Some(val) => tera::try_get_value!("truncate_chars", "omission", String, val),
        None => "…".to_string(),
    };

    if s.chars().count() <= length {
        Ok(tera::Value::String(s))
    } else {
        let truncated: String = s.chars().take(length).collect();
        Ok(tera::Value::String(format!(
            "{}{}",
            truncated.trim_end(),
            omission
        )))
    }
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub name: String,
    pub url: String,
    pub lang: Locale,
    pub menu: Vec<MenuItem>,
    pub contact: ContactData,
    pub year: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct MenuItem {
    pub key: &'static str,
    pub path: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContactData {
    pub email: String,
    pub phone: String,
    pub address: String,
}

impl SiteData {
    pub fn new(config: &SiteConfig, lang: Locale) -> Self {
        use chrono::Datelike;

        let menu = vec![
            MenuItem {
                key: "home",
                path: "/".to_string(),
            },
            MenuItem {
                key: "about",
                path: "/#about".to_string(),
            },
            MenuItem {
                key: "services",
                path: "/#services".to_string(),
            },
            MenuItem {
                key: "blog",
                path: format!("/blog?lang={}", lang.code()),
            },
            MenuItem {
                key: "instagram",
                path: "/#instagram".to_string(),
            },
            MenuItem {
                key: "contact",
                path: "/#contact".to_string(),
            },
        ];

        Self {
            name: config.name.clone(),
            url: config.base_url().to_string(),
            lang,
            menu,
            contact: ContactData {
                email: config.contact.email.clone(),
                phone: config.contact.phone.clone(),
                address: config.contact.address.clone(),
            },
            year: chrono::Local::now().year(),
        }
    }
}
