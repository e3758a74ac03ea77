//! HTML extraction for blogfa pages
//!
//! This module handles parsing the three page types the crawler visits:
//! - Listing pages: post links (`.posttitle[href]`)
//! - Post pages: title, content, tags and date inside `.post`
//! - Comment pages: one `.box` per comment
//!
//! Missing elements never fail a parse; they produce empty strings.

use crate::crawler::record::Comment;
use crate::date::DateNormalizer;
use chrono::{DateTime, FixedOffset};
use scraper::{ElementRef, Html, Selector};

/// Fields extracted from a post page, before comments are attached
#[derive(Debug, Clone, PartialEq)]
pub struct PostFields {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub date: DateTime<FixedOffset>,
}

/// Extracts post links from a listing page
///
/// Every `.posttitle` element with a non-empty `href` contributes one link,
/// trimmed, in document order.
///
/// # Example
///
/// ```
/// use blog_harvest::crawler::extract_post_links;
///
/// let html = r#"<a class="posttitle" href=" /post/1 ">One</a><a class="posttitle" href="">x</a>"#;
/// assert_eq!(extract_post_links(html), vec!["/post/1".to_string()]);
/// ```
pub fn extract_post_links(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse(".posttitle") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty())
        .map(str::to_string)
        .collect()
}

/// Extracts the post fields from a post page
pub fn parse_post(html: &str, dates: &DateNormalizer) -> PostFields {
    let document = Html::parse_document(html);
    let post = select_first(document.root_element(), ".post");

    let Some(post) = post else {
        return PostFields {
            title: String::new(),
            content: String::new(),
            tags: Vec::new(),
            date: dates.normalize(""),
        };
    };

    let tags = match Selector::parse(".tagname") {
        Ok(selector) => post
            .select(&selector)
            .map(|tag| tag.text().collect::<String>().trim().to_string())
            .collect(),
        Err(_) => Vec::new(),
    };

    PostFields {
        title: text_of(post, ".posttitle").trim().to_string(),
        content: inner_html_of(post, ".postcontent").trim().to_string(),
        tags,
        date: dates.normalize(&text_of(post, ".postdate")),
    }
}

/// Extracts the comments from a comments page, in document order
pub fn parse_comments(html: &str, dates: &DateNormalizer) -> Vec<Comment> {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse(".box") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .map(|entry| Comment {
            name: text_of(entry, ".author").trim().to_string(),
            comment: inner_html_of(entry, ".body"),
            date: dates.normalize(&text_of(entry, ".date")),
        })
        .collect()
}

fn select_first<'a>(scope: ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(css).ok()?;
    let first = scope.select(&selector).next();
    first
}

/// Concatenated text of every match under `scope`
fn text_of(scope: ElementRef<'_>, css: &str) -> String {
    match Selector::parse(css) {
        Ok(selector) => scope
            .select(&selector)
            .flat_map(|element| element.text())
            .collect(),
        Err(_) => String::new(),
    }
}

/// Inner HTML of the first match under `scope`
fn inner_html_of(scope: ElementRef<'_>, css: &str) -> String {
    select_first(scope, css)
        .map(|element| element.inner_html())
        .unwrap_or_default()
}
