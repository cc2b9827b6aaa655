//! Storefront document normalization.
//!
//! Maps the raw, semi-structured metadata document returned by the
//! storefront API into a canonical [`GameRecord`]. Normalization never
//! fails: every field has a documented fallback, so a sparse document
//! simply produces a record full of defaults.

use std::sync::LazyLock;

use regex::Regex;

use crate::game::{GameRecord, SystemRequirements};
use crate::naming::sanitize_folder_name;

/// Maximum number of screenshots planned per game.
pub const MAX_SCREENSHOTS: usize = 10;

/// Length of the generated short description, in characters.
pub const SHORT_DESCRIPTION_LEN: usize = 150;

/// Fallback description when the document carries none.
pub const NO_DESCRIPTION: &str = "No description available.";

/// Default installation instructions attached to every new record.
const DEFAULT_INSTRUCTIONS: &str = "<p><strong>Installation:</strong></p>\
<ol><li>Download the game archive.</li><li>Extract the game</li>\
<li>Run the executable to start the game.</li></ol>";

/// Category substrings that mark a game as multiplayer. Matched
/// case-sensitively, exactly as the storefront spells them.
const MULTIPLAYER_MARKERS: &[&str] = &["Multi-player", "Co-op", "Online"];

static REQUIREMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<strong>(OS|Processor|Memory|Graphics|Storage):</strong>(.*?)<br>")
        .expect("valid regex")
});

static STORAGE_GB_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)\s*GB").expect("valid regex"));

static HTML_TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));

/// Normalize a raw storefront document into a [`GameRecord`].
///
/// `raw` is the `data` object of the storefront envelope; `app_id` is the
/// storefront identifier the document was fetched for. The record id is
/// derived as `game-<app_id>` and the folder slug from the game name.
pub fn normalize(raw: &serde_json::Value, app_id: &str) -> GameRecord {
    let name = str_field(raw, "name").unwrap_or("Unknown Game").to_string();

    let description = ["detailed_description", "about_the_game", "short_description"]
        .iter()
        .find_map(|key| str_field(raw, key).filter(|s| !s.is_empty()))
        .unwrap_or(NO_DESCRIPTION)
        .to_string();

    let short_description = match str_field(raw, "short_description").filter(|s| !s.is_empty()) {
        Some(s) => s.to_string(),
        None => extract_short_description(&description, SHORT_DESCRIPTION_LEN),
    };

    let genres = description_list(raw, "genres");
    let genre = genres
        .first()
        .cloned()
        .unwrap_or_else(|| "Unknown".to_string());

    let categories = description_list(raw, "categories");
    let is_multiplayer = categories
        .iter()
        .any(|c| MULTIPLAYER_MARKERS.iter().any(|m| c.contains(m)));
    let players = if is_multiplayer { "2+" } else { "1" };

    let developers = match string_list(raw, "developers") {
        list if list.is_empty() => vec!["Unknown Developer".to_string()],
        list => list,
    };
    let publishers = string_list(raw, "publishers");

    let release_date = raw
        .pointer("/release_date/date")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();

    let system_requirements = extract_requirements(raw);
    let file_size = estimate_file_size(&system_requirements.storage);

    let screenshot_count = raw
        .get("screenshots")
        .and_then(|v| v.as_array())
        .map(|a| a.len().min(MAX_SCREENSHOTS))
        .unwrap_or(0);
    let screenshots = plan_screenshot_names(screenshot_count);

    let (price, discount_percent) = match raw.get("price_overview") {
        Some(overview) => (
            str_field(overview, "final_formatted")
                .unwrap_or("Unknown")
                .to_string(),
            overview
                .get("discount_percent")
                .and_then(|v| v.as_u64())
                .unwrap_or(0) as u32,
        ),
        None => ("Unknown".to_string(), 0),
    };

    let recommendations = raw
        .pointer("/recommendations/total")
        .and_then(|v| v.as_u64())
        .unwrap_or(0);

    GameRecord {
        id: format!("game-{app_id}"),
        folder: sanitize_folder_name(&name),
        steam_app_id: app_id.to_string(),
        studio: developers[0].clone(),
        publisher: publishers.first().cloned().unwrap_or_default(),
        trailer_url: select_trailer_url(raw),
        header_image_url: str_field(raw, "header_image").unwrap_or_default().to_string(),
        capsule_image_url: str_field(raw, "capsule_image")
            .unwrap_or_default()
            .to_string(),
        legal_notice: str_field(raw, "legal_notice").unwrap_or_default().to_string(),
        supported_languages: str_field(raw, "supported_languages")
            .unwrap_or_default()
            .to_string(),
        instructions: DEFAULT_INSTRUCTIONS.to_string(),
        name,
        description,
        short_description,
        genre,
        genres,
        categories,
        players: players.to_string(),
        is_multiplayer,
        release_date,
        developers,
        publishers,
        file_size,
        price,
        discount_percent,
        recommendations,
        system_requirements,
        screenshots,
        ..GameRecord::default()
    }
}

/// Deterministic local screenshot filenames: `screenshot1.jpg` .. `screenshotN.jpg`.
pub fn plan_screenshot_names(count: usize) -> Vec<String> {
    (1..=count.min(MAX_SCREENSHOTS))
        .map(|i| format!("screenshot{i}.jpg"))
        .collect()
}

/// Pick the trailer source URL from the document's movie entries.
///
/// Prefers the first movie's highest-quality WebM variant (`max`), then the
/// 480p fallback. The scheme is forced to `https` regardless of what the
/// storefront returned.
pub fn select_trailer_url(raw: &serde_json::Value) -> String {
    let url = raw
        .pointer("/movies/0/webm/max")
        .or_else(|| raw.pointer("/movies/0/webm/480"))
        .and_then(|v| v.as_str())
        .unwrap_or_default();

    match url.strip_prefix("http:") {
        Some(rest) => format!("https:{rest}"),
        None => url.to_string(),
    }
}

/// Extract labelled system requirements from the document's requirement
/// markup, preferring the `recommended` variant over `minimum`.
///
/// Labels not present in the markup keep the generic defaults from
/// [`SystemRequirements::default`].
pub fn extract_requirements(raw: &serde_json::Value) -> SystemRequirements {
    let mut requirements = SystemRequirements::default();

    let markup = raw
        .pointer("/pc_requirements/recommended")
        .or_else(|| raw.pointer("/pc_requirements/minimum"))
        .and_then(|v| v.as_str())
        .unwrap_or_default();

    for captures in REQUIREMENT_RE.captures_iter(markup) {
        let value = captures[2].trim().to_string();
        if value.is_empty() {
            continue;
        }
        match captures[1].to_ascii_lowercase().as_str() {
            "os" => requirements.os = value,
            "processor" => requirements.processor = value,
            "memory" => requirements.memory = value,
            "graphics" => requirements.graphics = value,
            "storage" => requirements.storage = value,
            _ => {}
        }
    }

    requirements
}

/// Parse an install-size estimate in bytes out of a storage requirement
/// string such as `"75 GB available space"`. Unparseable input yields
/// `None` (unknown), never zero.
pub fn estimate_file_size(storage: &str) -> Option<u64> {
    STORAGE_GB_RE
        .captures(storage)
        .and_then(|c| c[1].parse::<u64>().ok())
        .map(|gb| gb * 1024 * 1024 * 1024)
}

/// Strip HTML tags and truncate to `max_len` characters, appending an
/// ellipsis when truncated.
pub fn extract_short_description(html: &str, max_len: usize) -> String {
    let text = HTML_TAG_RE.replace_all(html, "");
    let text = text.trim();
    if text.chars().count() > max_len {
        let truncated: String = text.chars().take(max_len).collect();
        format!("{truncated}...")
    } else {
        text.to_string()
    }
}

fn str_field<'a>(value: &'a serde_json::Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(|v| v.as_str())
}

/// Collect the `description` field of each entry in an array of objects
/// (the storefront's shape for genres and categories).
fn description_list(raw: &serde_json::Value, key: &str) -> Vec<String> {
    raw.get(key)
        .and_then(|v| v.as_array())
        .map(|entries| {
            entries
                .iter()
                .filter_map(|e| str_field(e, "description"))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn string_list(raw: &serde_json::Value, key: &str) -> Vec<String> {
    raw.get(key)
        .and_then(|v| v.as_array())
        .map(|entries| {
            entries
                .iter()
                .filter_map(|e| e.as_str())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
