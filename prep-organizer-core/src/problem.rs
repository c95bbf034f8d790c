//! Problem URL parsing: turns a LeetCode or NeetCode problem link into a
//! [`ProblemRecord`] with a human-readable title.
//!
//! Parsing is pure and never fails loudly: anything that is not a recognised
//! problem URL yields `None`, which callers present as "unsupported URL".

use regex::Regex;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;
use tracing::debug;

static LEETCODE_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/problems/([^/]+)").expect("leetcode path pattern"));

// NeetCode links use both `/problem/<slug>` and `/problems/<slug>`.
static NEETCODE_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/problems?/([^/]+)").expect("neetcode path pattern"));

/// Problem-hosting websites we know how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    LeetCode,
    NeetCode,
}

impl Platform {
    /// Lower-case tag used in rendered files and JSON output.
    pub fn tag(&self) -> &'static str {
        match self {
            Platform::LeetCode => "leetcode",
            Platform::NeetCode => "neetcode",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::LeetCode => "LeetCode",
            Platform::NeetCode => "NeetCode",
        }
    }

    fn from_host(host: &str) -> Option<Self> {
        let host = host.to_lowercase();
        if host.contains("leetcode.com") {
            Some(Platform::LeetCode)
        } else if host.contains("neetcode.io") {
            Some(Platform::NeetCode)
        } else {
            None
        }
    }

    fn path_pattern(&self) -> &'static Regex {
        match self {
            Platform::LeetCode => &*LEETCODE_PATH,
            Platform::NeetCode => &*NEETCODE_PATH,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A parsed problem link. Only constructed by [`parse_problem_url`], so neither
/// the title nor its identifier is ever empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemRecord {
    pub title: String,
    pub platform: Platform,
    /// The input string, verbatim.
    pub url: String,
}

impl ProblemRecord {
    /// CamelCase stem for file names, see [`title_to_identifier`].
    pub fn identifier(&self) -> String {
        title_to_identifier(&self.title)
    }
}

/// Parses a problem URL into a [`ProblemRecord`].
///
/// Returns `None` for malformed URLs, unsupported hosts, paths that do not
/// carry a problem slug, and slugs without a single ASCII letter or digit.
pub fn parse_problem_url(url: &str) -> Option<ProblemRecord> {
    let parsed = match Url::parse(url) {
        Ok(parsed) => parsed,
        Err(e) => {
            debug!(url, error = %e, "Not a well-formed URL");
            return None;
        }
    };

    let Some(platform) = parsed.host_str().and_then(Platform::from_host) else {
        debug!(url, host = ?parsed.host_str(), "Unsupported problem host");
        return None;
    };

    let Some(slug) = platform
        .path_pattern()
        .captures(parsed.path())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
    else {
        debug!(url, %platform, path = parsed.path(), "No problem slug in path");
        return None;
    };

    let title = slug_to_title(slug);
    if title.is_empty() {
        debug!(url, slug, "Slug has no words");
        return None;
    }
    // The identifier names the saved file, so it must not come out empty.
    if title_to_identifier(&title).is_empty() {
        debug!(url, slug, "Slug has no ASCII letters or digits");
        return None;
    }

    debug!(url, %platform, title = %title, "Parsed problem URL");
    Some(ProblemRecord {
        title,
        platform,
        url: url.to_string(),
    })
}

/// `two-sum` becomes `Two Sum`. Empty pieces from doubled, leading or trailing
/// hyphens are dropped.
pub fn slug_to_title(slug: &str) -> String {
    slug.split('-')
        .filter(|piece| !piece.is_empty())
        .map(capitalize_first)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Turns a title into a CamelCase token usable as a file name stem:
/// `"3Sum: Closest"` becomes `"3sumClosest"`.
///
/// Everything except ASCII letters, ASCII digits and whitespace is removed
/// before splitting, so punctuation never splits a word.
pub fn title_to_identifier(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .collect();

    cleaned
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

fn capitalize_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capitalize_first_keeps_the_rest_untouched() {
        assert_eq!(capitalize_first("bST"), "BST");
        assert_eq!(capitalize_first("ä"), "Ä");
        assert_eq!(capitalize_first(""), "");
    }

    #[test]
    fn slug_to_title_collapses_empty_pieces() {
        assert_eq!(slug_to_title("two--sum"), "Two Sum");
        assert_eq!(slug_to_title("-lru-cache-"), "Lru Cache");
        assert_eq!(slug_to_title("---"), "");
    }

    #[test]
    fn platform_tag_matches_its_serde_name() {
        for platform in [Platform::LeetCode, Platform::NeetCode] {
            let json = serde_json::to_value(platform).unwrap();
            assert_eq!(json, platform.tag());
            assert_eq!(platform.to_string(), platform.tag());
        }
    }
}
