//! Folder-name sanitization.
//!
//! Maps a display name to the filesystem-safe slug a game's assets live
//! under. Both ingestion and update flows call this single function so two
//! callers can never derive diverging folders for the same name.

/// Maximum slug length.
pub const MAX_FOLDER_NAME_LEN: usize = 50;

/// Sanitize a display name into a folder slug.
///
/// Lowercases, keeps only `[a-z0-9]`, collapses runs of whitespace and
/// hyphens into a single hyphen, trims edge hyphens, and truncates to
/// [`MAX_FOLDER_NAME_LEN`]. The result is a fixed point:
/// `sanitize_folder_name(sanitize_folder_name(n)) == sanitize_folder_name(n)`.
pub fn sanitize_folder_name(name: &str) -> String {
    let mut slug = String::with_capacity(name.len().min(MAX_FOLDER_NAME_LEN));
    let mut pending_separator = false;

    for c in name.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(c);
        } else if c.is_whitespace() || c == '-' {
            pending_separator = true;
        }
        // Anything else is dropped without acting as a separator.
    }

    slug.truncate(MAX_FOLDER_NAME_LEN);
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}
