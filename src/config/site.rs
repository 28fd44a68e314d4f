//! Site configuration (_config.yml + environment)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub name: String,
    pub title: String,
    pub description: String,
    pub keywords: Vec<String>,

    // URL
    pub url: String,

    // Directory
    pub public_dir: String,
    pub languages_dir: String,

    // Blog
    pub suggested_posts: usize,
    pub home_recent_posts: usize,

    // Home page
    #[serde(default)]
    pub contact: ContactConfig,
    #[serde(default)]
    pub instagram_posts: Vec<String>,
    #[serde(default = "default_products")]
    pub products: Vec<ProductConfig>,

    // Document store and blob storage
    #[serde(default)]
    pub firebase: FirebaseConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: "RO-AL Mobileri".to_string(),
            title: "Home & Commercial Furniture Albania".to_string(),
            description: "Bespoke kitchens, wardrobes and interior solutions crafted in Tirana. \
                          Premium materials, precision cutting, delivery and mounting across Albania."
                .to_string(),
            keywords: Vec::new(),

            url: "https://roalmobileri.com".to_string(),

            public_dir: "public".to_string(),
            languages_dir: "languages".to_string(),

            suggested_posts: 3,
            home_recent_posts: 2,

            contact: ContactConfig::default(),
            instagram_posts: Vec::new(),
            products: default_products(),

            firebase: FirebaseConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }

    /// `<title>` for a page, using the "%s | site name" template
    pub fn page_title(&self, title: &str) -> String {
        if title.is_empty() {
            format!("{} | {}", self.title, self.name)
        } else {
            format!("{} | {}", title, self.name)
        }
    }

    /// Override Firebase settings from process environment variables
    pub fn apply_env(&mut self) {
        self.firebase.apply_env_from(|key| std::env::var(key).ok());
    }
}

/// Contact details shown on the home page
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactConfig {
    pub email: String,
    pub phone: String,
    pub address: String,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            email: "info@roalmobileri.com".to_string(),
            phone: String::new(),
            address: "Tirana, Albania".to_string(),
        }
    }
}

/// A featured product on the home page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductConfig {
    pub name: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub alt: String,
}

fn product(name: &str, alt: &str, price: &str, photo: &str) -> ProductConfig {
    ProductConfig {
        name: name.to_string(),
        price: price.to_string(),
        image: format!(
            "https://images.unsplash.com/{}?ixlib=rb-4.0.3&auto=format&fit=crop&w=800&q=80",
            photo
        ),
        alt: alt.to_string(),
    }
}

fn default_products() -> Vec<ProductConfig> {
    vec![
        product("Modern Chair", "Modern Chair", "$129.99", "photo-1598993847980-805c9c5492b9"),
        product("Comfort Sofa", "Sofa", "$899.99", "photo-1615874959471-bcd2d482df1c"),
        product("Dining Table", "Dining Table", "$499.99", "photo-1657372170556-1515647f4035"),
    ]
}

/// Firebase project settings, treated as opaque credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FirebaseConfig {
    pub api_key: String,
    pub auth_domain: String,
    pub project_id: String,
    pub storage_bucket: String,
    pub app_id: String,
    pub measurement_id: String,
    pub firestore_endpoint: String,
}

impl Default for FirebaseConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            auth_domain: String::new(),
            project_id: String::new(),
            storage_bucket: String::new(),
            app_id: String::new(),
            measurement_id: String::new(),
            firestore_endpoint: "https://firestore.googleapis.com/v1".to_string(),
        }
    }
}

impl FirebaseConfig {
    /// Override fields from `FIREBASE_*` variables returned by `lookup`
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let fields: [(&str, &mut String); 7] = [
            ("FIREBASE_API_KEY", &mut self.api_key),
            ("FIREBASE_AUTH_DOMAIN", &mut self.auth_domain),
            ("FIREBASE_PROJECT_ID", &mut self.project_id),
            ("FIREBASE_STORAGE_BUCKET", &mut self.storage_bucket),
            ("FIREBASE_APP_ID", &mut self.app_id),
            ("FIREBASE_MEASUREMENT_ID", &mut self.measurement_id),
            ("FIREBASE_FIRESTORE_ENDPOINT", &mut self.firestore_endpoint),
        ];

        for (key, field) in fields {
            if let Some(value) = lookup(key).filter(|v| !v.is_empty()) {
                tracing::debug!("Using {} from environment", key);
                *field = value;
            }
        }
    }

    /// Whether enough is configured to talk to Firestore
    pub fn is_configured(&self) -> bool {
        !self.project_id.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.name, "RO-AL Mobileri");
        assert_eq!(config.base_url(), "https://roalmobileri.com");
        assert_eq!(config.suggested_posts, 3);
        assert!(!config.firebase.is_configured());
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
url: http://localhost:4000/
instagram_posts:
  - https://www.instagram.com/p/DLIeOEHN-yW/
firebase:
  project_id: roal-demo
  storage_bucket: roal-demo.appspot.com
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.base_url(), "http://localhost:4000");
        assert_eq!(config.instagram_posts.len(), 1);
        assert_eq!(config.firebase.project_id, "roal-demo");
        assert_eq!(
            config.firebase.firestore_endpoint,
            "https://firestore.googleapis.com/v1"
        );
        assert_eq!(config.name, "RO-AL Mobileri");
        assert_eq!(config.products.len(), 3);
    }

    #[test]
    fn test_products_from_file() {
        let yaml = r#"
products:
  - name: Oak Wardrobe
    price: "€1,200"
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.products.len(), 1);
        assert_eq!(config.products[0].name, "Oak Wardrobe");
        assert_eq!(config.products[0].image, "");

        let none: SiteConfig = serde_yaml::from_str("products: []").unwrap();
        assert!(none.products.is_empty());
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut firebase = FirebaseConfig {
            project_id: "from-file".to_string(),
            api_key: "file-key".to_string(),
            ..Default::default()
        };
        let env: HashMap<&str, &str> = [
            ("FIREBASE_PROJECT_ID", "from-env"),
            ("FIREBASE_API_KEY", ""),
        ]
        .into_iter()
        .collect();

        firebase.apply_env_from(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(firebase.project_id, "from-env");
        // Empty variables do not clear file values
        assert_eq!(firebase.api_key, "file-key");
    }

    #[test]
    fn test_page_title() {
        let config = SiteConfig::default();
        assert_eq!(config.page_title("Blog"), "Blog | RO-AL Mobileri");
        assert_eq!(
            config.page_title(""),
            "Home & Commercial Furniture Albania | RO-AL Mobileri"
        );
    }
}
