//! Description image rewriting.
//!
//! Scans rich-text description content for `<img>` tags whose `src` points
//! at an absolute remote location, assigns each a deterministic local
//! filename, and rewrites the reference in place. The actual downloads are
//! planned here and executed by the ingestion orchestrator; the rewrite is
//! committed to the output text whether or not a later fetch succeeds.

use std::sync::LazyLock;

use regex::Regex;

static IMG_SRC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<img[^>]+src="([^">]+)""#).expect("valid regex"));

/// A planned download for one embedded description image.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRef {
    /// Remote source URL as found in the content.
    pub url: String,
    /// Assigned local filename, `description-image-<N>.jpg`.
    pub filename: String,
}

/// Result of scanning a description: the rewritten content plus the
/// downloads that make the rewritten references valid.
#[derive(Debug, Clone, PartialEq)]
pub struct RewrittenDescription {
    pub content: String,
    pub images: Vec<ImageRef>,
}

/// Rewrite remote image references in `html` to local paths under the
/// game's `description-images/` directory.
///
/// Only sources starting with `http` are touched; local or relative
/// references are left as-is, which makes the rewrite idempotent —
/// running it again over its own output finds nothing to do.
pub fn rewrite_description(html: &str, folder: &str) -> RewrittenDescription {
    let mut content = html.to_string();
    let mut images = Vec::new();

    for captures in IMG_SRC_RE.captures_iter(html) {
        let url = &captures[1];
        if !url.starts_with("http") {
            continue;
        }
        // A repeated URL is already fully rewritten by its first pass;
        // one download covers every occurrence.
        if images.iter().any(|img: &ImageRef| img.url == url) {
            continue;
        }

        let filename = format!("description-image-{}.jpg", images.len() + 1);
        let local = format!("games/{folder}/description-images/{filename}");
        content = content.replace(url, &local);

        images.push(ImageRef {
            url: url.to_string(),
            filename,
        });
    }

    RewrittenDescription { content, images }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_images_returns_content_unchanged() {
        let html = "<p>Just text, no pictures.</p>";
        let result = rewrite_description(html, "my-game");

        assert_eq!(result.content, html);
        assert!(result.images.is_empty());
    }

    #[test]
    fn remote_image_rewritten_and_planned() {
        let html = r#"<p>Look:</p><img class="x" src="https://cdn.example.com/a.png">"#;
        let result = rewrite_description(html, "my-game");

        assert_eq!(result.images.len(), 1);
        assert_eq!(result.images[0].url, "https://cdn.example.com/a.png");
        assert_eq!(result.images[0].filename, "description-image-1.jpg");
        assert!(result
            .content
            .contains(r#"src="games/my-game/description-images/description-image-1.jpg""#));
        assert!(!result.content.contains("cdn.example.com"));
    }

    #[test]
    fn multiple_images_numbered_in_document_order() {
        let html = concat!(
            r#"<img src="http://cdn/one.jpg">"#,
            r#"<img src="https://cdn/two.jpg">"#,
        );
        let result = rewrite_description(html, "g");

        assert_eq!(result.images.len(), 2);
        assert_eq!(result.images[0].filename, "description-image-1.jpg");
        assert_eq!(result.images[1].filename, "description-image-2.jpg");
        assert!(result.content.contains("description-image-1.jpg"));
        assert!(result.content.contains("description-image-2.jpg"));
    }

    #[test]
    fn repeated_url_planned_once_and_rewritten_everywhere() {
        let html = concat!(
            r#"<img src="https://cdn.example.com/a.jpg">"#,
            r#"<p>again</p>"#,
            r#"<img src="https://cdn.example.com/a.jpg">"#,
        );
        let result = rewrite_description(html, "g");

        assert_eq!(result.images.len(), 1);
        assert!(!result.content.contains("cdn.example.com"));
        assert_eq!(
            result.content.matches("description-image-1.jpg").count(),
            2
        );
    }

    #[test]
    fn local_references_left_untouched() {
        let html = r#"<img src="games/g/description-images/description-image-1.jpg">"#;
        let result = rewrite_description(html, "g");

        assert_eq!(result.content, html);
        assert!(result.images.is_empty());
    }

    #[test]
    fn rewrite_is_idempotent() {
        let html = r#"<p>pic</p><img src="https://cdn.example.com/shot.jpg"> trailing"#;
        let first = rewrite_description(html, "g");
        let second = rewrite_description(&first.content, "g");

        assert_eq!(second.content, first.content);
        assert!(second.images.is_empty());
    }
}
