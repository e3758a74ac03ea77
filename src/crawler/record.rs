//! Records produced by the crawl

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// A blog post with its comments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub title: String,
    /// Inner HTML of the post body, trimmed
    pub content: String,
    pub tags: Vec<String>,
    pub date: DateTime<FixedOffset>,
    /// Comments in page order
    pub comments: Vec<Comment>,
}

/// A reader comment on a post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    /// Author name
    pub name: String,
    /// Inner HTML of the comment body
    pub comment: String,
    pub date: DateTime<FixedOffset>,
}

/// A post link that could not be turned into a `Post`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostFailure {
    pub link: String,
    pub error: String,
}

/// Result of processing one dispatched link
///
/// Workers emit exactly one outcome per link they take off the queue.
#[derive(Debug, Clone)]
pub enum PostOutcome {
    Fetched(Post),
    Failed(PostFailure),
}

/// Splits outcomes into collected posts and failures, keeping arrival order
pub fn partition_outcomes(outcomes: Vec<PostOutcome>) -> (Vec<Post>, Vec<PostFailure>) {
    let mut posts = Vec::with_capacity(outcomes.len());
    let mut failures = Vec::new();
    for outcome in outcomes {
        match outcome {
            PostOutcome::Fetched(post) => posts.push(post),
            PostOutcome::Failed(failure) => failures.push(failure),
        }
    }
    (posts, failures)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(title: &str) -> Post {
        Post {
            title: title.to_string(),
            content: "<p>body</p>".to_string(),
            tags: vec!["poetry".to_string()],
            date: DateTime::parse_from_rfc3339("2016-08-05T14:30:00+03:30").unwrap(),
            comments: vec![],
        }
    }

    #[test]
    fn test_partition_outcomes() {
        let outcomes = vec![
            PostOutcome::Fetched(post("a")),
            PostOutcome::Failed(PostFailure {
                link: "/post/2".to_string(),
                error: "boom".to_string(),
            }),
            PostOutcome::Fetched(post("b")),
        ];

        let (posts, failures) = partition_outcomes(outcomes);
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].title, "a");
        assert_eq!(posts[1].title, "b");
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].link, "/post/2");
    }

    #[test]
    fn test_post_json_field_names() {
        let mut p = post("title");
        p.comments.push(Comment {
            name: "reader".to_string(),
            comment: "nice".to_string(),
            date: p.date,
        });

        let value = serde_json::to_value(&p).unwrap();
        assert_eq!(value["title"], "title");
        assert_eq!(value["content"], "<p>body</p>");
        assert_eq!(value["tags"][0], "poetry");
        assert_eq!(value["date"], "2016-08-05T14:30:00+03:30");
        assert_eq!(value["comments"][0]["name"], "reader");
        assert_eq!(value["comments"][0]["comment"], "nice");
        assert_eq!(value["comments"][0]["date"], "2016-08-05T14:30:00+03:30");
    }
}
