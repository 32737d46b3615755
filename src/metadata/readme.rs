//! Preview image extraction from README bodies

use std::sync::LazyLock;

use regex::Regex;

use crate::metadata::resolver::url_join;

/// Hosts serving CI/status badges, never a usable preview image
const BADGE_HOSTS: [&str; 12] = [
    "img.shields.io",
    "badge.fury.io",
    "badgen.net",
    "travis-ci.org",
    "travis-ci.com",
    "circleci.com",
    "ci.appveyor.com",
    "codecov.io",
    "coveralls.io",
    "david-dm.org",
    "api.codeclimate.com",
    "nodei.co",
];

/// `![alt](src "title")`
static MARKDOWN_IMAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"!\[[^\]]*\]\(\s*<?([^)\s>]+)>?[^)]*\)"#).unwrap());

/// `<img ... src="...">`
static HTML_IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<\s*img\b[^>]*?\bsrc\s*=\s*["']([^"']+)["'][^>]*>"#).unwrap()
});

/// Find the first non-badge image in `text`, in document order, across both
/// Markdown and inline HTML syntax. Relative sources are resolved against
/// `package_root`.
pub fn parse_image_from_text(text: &str, package_root: &str) -> Option<String> {
    let mut candidates: Vec<(usize, &str)> = MARKDOWN_IMAGE
        .captures_iter(text)
        .chain(HTML_IMAGE.captures_iter(text))
        .filter_map(|caps| caps.get(1))
        .map(|m| (m.start(), m.as_str()))
        .collect();
    candidates.sort_by_key(|(start, _)| *start);

    candidates
        .into_iter()
        .map(|(_, src)| src.trim())
        .find(|src| !src.is_empty() && !has_foreign_scheme(src) && !is_badge(src))
        .map(|src| absolutify(src, package_root))
}

/// `data:`, `mailto:` and other non-http sources
fn has_foreign_scheme(src: &str) -> bool {
    match src.split_once(':') {
        Some((scheme, _))
            if scheme.starts_with(|c: char| c.is_ascii_alphabetic())
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) =>
        {
            !scheme.eq_ignore_ascii_case("http") && !scheme.eq_ignore_ascii_case("https")
        }
        _ => false,
    }
}

fn is_badge(src: &str) -> bool {
    let lower = src.to_ascii_lowercase();
    let host = lower
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or(lower.trim_start_matches('/'))
        .split('/')
        .next()
        .unwrap_or_default();

    BADGE_HOSTS
        .iter()
        .any(|badge| host == *badge || host.ends_with(&format!(".{}", badge)))
        || lower.contains("/badge.svg")
        || (lower.contains("/workflows/") && lower.contains("badge"))
}

fn absolutify(src: &str, package_root: &str) -> String {
    if src.starts_with("http://") || src.starts_with("https://") {
        src.to_string()
    } else if let Some(rest) = src.strip_prefix("//") {
        format!("https://{}", rest)
    } else {
        url_join(package_root, src.trim_start_matches("./"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const ROOT: &str = "https://unpkg.com/test@1.2.3";

    #[rstest]
    #[case::markdown(
        "test test \n ![test](https://test.com/test.png) \n test.",
        "https://test.com/test.png"
    )]
    #[case::markdown_relative(
        "test test \n ![test](/test.png) \n test.",
        "https://unpkg.com/test@1.2.3/test.png"
    )]
    #[case::markdown_with_title(
        "test test \n ![test](/test.png \"TEST\") \n test.",
        "https://unpkg.com/test@1.2.3/test.png"
    )]
    #[case::markdown_dot_relative(
        "![preview](./img/preview.gif)",
        "https://unpkg.com/test@1.2.3/img/preview.gif"
    )]
    #[case::html(
        "test test \n <img src=\"https://test.com/test.png\" data=\"\"> \n test.",
        "https://test.com/test.png"
    )]
    #[case::html_src_not_first(
        "<img width=\"400\" src='https://test.com/test.png'>",
        "https://test.com/test.png"
    )]
    #[case::protocol_relative("![x](//test.com/test.png)", "https://test.com/test.png")]
    fn parse_image_from_text_finds_image(#[case] text: &str, #[case] expected: &str) {
        assert_eq!(
            parse_image_from_text(text, ROOT),
            Some(expected.to_string())
        );
    }

    #[test]
    fn parse_image_from_text_skips_badges() {
        let text = "# test\n\
            [![Build Status](https://travis-ci.org/foo/bar.svg?branch=master)](https://travis-ci.org/foo/bar)\n\
            [![npm](https://img.shields.io/npm/v/bar.svg)](https://npmjs.com/package/bar)\n\
            ![ci](https://github.com/foo/bar/workflows/CI/badge.svg)\n\
            ![preview](https://foo.github.io/bar/preview.png)";

        assert_eq!(
            parse_image_from_text(text, ROOT),
            Some("https://foo.github.io/bar/preview.png".to_string())
        );
    }

    #[test]
    fn parse_image_from_text_uses_document_order_across_syntaxes() {
        let text = "<img src=\"first.png\">\n![second](second.png)";

        assert_eq!(
            parse_image_from_text(text, ROOT),
            Some("https://unpkg.com/test@1.2.3/first.png".to_string())
        );
    }

    #[test]
    fn parse_image_from_text_skips_non_http_sources() {
        let text = "![logo](data:image/png;base64,iVBORw0KGgo=)\n\
                    <img src=\"mailto:me@example.com\">\n\
                    ![shot](docs/shot:1.png)";
        assert_eq!(
            parse_image_from_text(text, ROOT).as_deref(),
            Some("https://unpkg.com/test@1.2.3/docs/shot:1.png")
        );

        let only_data = "![logo](data:image/gif;base64,R0lGOD=)";
        assert_eq!(parse_image_from_text(only_data, ROOT), None);
    }

    #[test]
    fn parse_image_from_text_returns_none_without_images() {
        assert_eq!(parse_image_from_text("This is my test", ROOT), None);
        assert_eq!(
            parse_image_from_text("![badge](https://badge.fury.io/js/foo.svg)", ROOT),
            None
        );
    }
}
