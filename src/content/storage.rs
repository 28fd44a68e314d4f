//! Public URLs for images kept in blob storage

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

use super::post::BlogPost;

const DOWNLOAD_HOST: &str = "https://firebasestorage.googleapis.com/v0/b";

/// Maps storage paths to public download URLs
#[derive(Debug, Clone, Default)]
pub struct StorageResolver {
    bucket: Option<String>,
}

impl StorageResolver {
    pub fn new(bucket: &str) -> Self {
        let bucket = bucket.trim().trim_start_matches("gs://").trim_end_matches('/');
        Self {
            bucket: (!bucket.is_empty()).then(|| bucket.to_string()),
        }
    }

    /// Resolve an image reference.
    ///
    /// Absolute `http(s)://` URLs are returned unchanged; anything else is
    /// treated as an object path inside the bucket.
    pub fn resolve(&self, image: &str) -> String {
        if is_absolute_url(image) {
            return image.to_string();
        }

        match &self.bucket {
            Some(bucket) => {
                let path = image.trim_start_matches('/');
                format!(
                    "{}/{}/o/{}?alt=media",
                    DOWNLOAD_HOST,
                    bucket,
                    utf8_percent_encode(path, NON_ALPHANUMERIC)
                )
            }
            None => image.to_string(),
        }
    }

    /// Replace a post's image reference with a public URL
    pub fn resolve_post(&self, post: &mut BlogPost) {
        if is_absolute_url(&post.image_url) {
            return;
        }

        let source = post
            .image_path
            .as_deref()
            .filter(|p| !p.is_empty())
            .unwrap_or(&post.image_url);
        if source.is_empty() {
            return;
        }

        post.image_url = self.resolve(source);
    }
}

fn is_absolute_url(s: &str) -> bool {
    let lower = s.get(..8).unwrap_or(s).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_urls_pass_through() {
        let resolver = StorageResolver::new("roal.appspot.com");
        assert_eq!(
            resolver.resolve("HTTPS://cdn.example.com/a.jpg"),
            "HTTPS://cdn.example.com/a.jpg"
        );
        assert_eq!(resolver.resolve("http://x/y.png"), "http://x/y.png");
    }

    #[test]
    fn test_storage_path_resolves_to_download_url() {
        let resolver = StorageResolver::new("gs://roal.appspot.com");
        assert_eq!(
            resolver.resolve("blog/oak table.jpg"),
            "https://firebasestorage.googleapis.com/v0/b/roal.appspot.com/o/blog%2Foak%20table%2Ejpg?alt=media"
        );
    }

    #[test]
    fn test_without_bucket_is_unchanged() {
        let resolver = StorageResolver::new("");
        assert_eq!(resolver.resolve("blog/oak.jpg"), "blog/oak.jpg");
    }

    #[test]
    fn test_resolve_post_prefers_image_path() {
        let resolver = StorageResolver::new("b");
        let mut post = BlogPost {
            image_url: "ignored.jpg".to_string(),
            image_path: Some("posts/oak".to_string()),
            ..Default::default()
        };
        resolver.resolve_post(&mut post);
        assert_eq!(
            post.image_url,
            "https://firebasestorage.googleapis.com/v0/b/b/o/posts%2Foak?alt=media"
        );
    }
}
