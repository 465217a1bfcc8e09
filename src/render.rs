use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::feed::{self, FeedItem};

/// The HTML view of the feed, shared by `/` and `/tech`.
///
/// Every item-derived interpolation in the template goes through askama's
/// default HTML escaping; there is no `|safe` filter anywhere in it.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub path: String,
    pub tech: bool,
    pub items: Vec<FeedItem>,
    pub year: i32,
}

impl IndexTemplate {
    pub fn new(path: &str, tech: bool, items: Vec<FeedItem>) -> Self {
        Self {
            path: path.to_string(),
            tech,
            items,
            year: feed::current_year(),
        }
    }
}

// Wrapper for HTML responses
pub struct HtmlTemplate<T>(pub T);

impl<T: Template> IntoResponse for HtmlTemplate<T> {
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(html) => Html(html).into_response(),
            Err(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to render template: {}", err),
            )
                .into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn item(title: &str, link: &str, creator: &str, hn_id: Option<&str>) -> FeedItem {
        let date: DateTime<Utc> = DateTime::parse_from_rfc2822("Tue, 20 Aug 2024 12:00:00 +0000")
            .unwrap()
            .with_timezone(&Utc);
        FeedItem {
            creator: creator.to_string(),
            title: title.to_string(),
            description: String::new(),
            pub_date: "Tue, 20 Aug 2024 12:00:00 +0000".to_string(),
            date: Some(date),
            iso_date: "2024-08-20T12:00:00Z".to_string(),
            relative_date: "1 day ago".to_string(),
            link: link.to_string(),
            hn_id: hn_id.map(|s| s.to_string()),
        }
    }

    #[test]
    fn test_renders_article_per_item() {
        let items = vec![
            item("First", "https://example.com/1", "A", None),
            item("Second", "https://example.com/2", "B", None),
        ];
        let html = IndexTemplate::new("/", false, items).render().unwrap();

        assert_eq!(html.matches("<article>").count(), 2);
        assert!(html.contains("First"));
        assert!(html.contains("Second"));
        assert!(html.contains("href=\"https://example.com/1\""));
    }

    #[test]
    fn test_renders_time_element() {
        let items = vec![item("First", "https://example.com/1", "A", None)];
        let html = IndexTemplate::new("/", false, items).render().unwrap();

        assert!(html.contains("<time datetime=\"2024-08-20T12:00:00Z\""));
        assert!(html.contains("1 day ago"));
    }

    #[test]
    fn test_hn_badge_present_only_with_id() {
        let items = vec![
            item("With", "https://example.com/1", "Hacker News", Some("123")),
            item("Without", "https://example.com/2", "B", None),
        ];
        let html = IndexTemplate::new("/", false, items).render().unwrap();

        assert!(html.contains("https://news.ycombinator.com/item?id=123"));
        assert_eq!(html.matches("class=\"hn\"").count(), 1);
    }

    #[test]
    fn test_escapes_item_title() {
        let items = vec![item(
            "<script>alert(1)</script>",
            "https://example.com/1",
            "A",
            None,
        )];
        let html = IndexTemplate::new("/", false, items).render().unwrap();

        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    }

    #[test]
    fn test_escapes_item_link() {
        let items = vec![item(
            "t",
            "https://example.com/\"><script>alert(1)</script>",
            "A",
            None,
        )];
        let html = IndexTemplate::new("/", false, items).render().unwrap();

        assert!(!html.contains("\"><script>"));
    }

    #[test]
    fn test_tech_mode_changes_head_and_heading() {
        let html = IndexTemplate::new("/tech", true, Vec::new()).render().unwrap();

        assert!(html.contains("<title>Tech Links by Jacob</title>"));
        assert!(html.contains("<h1>Tech Links by Jacob</h1>"));
        assert!(html.contains("href=\"/tech-feed.xml\""));
        assert!(html.contains("https://links.jacobwgillespie.com/tech"));
    }

    #[test]
    fn test_default_mode_head() {
        let html = IndexTemplate::new("/", false, Vec::new()).render().unwrap();

        assert!(html.contains("<title>Links by Jacob</title>"));
        assert!(html.contains("<h1>Links by Jacob</h1>"));
        assert!(html.contains("Starred links from my feed reader."));
    }

    #[test]
    fn test_footer_links_both_variants() {
        let html = IndexTemplate::new("/", false, Vec::new()).render().unwrap();

        assert!(html.contains("href=\"/feed.xml\""));
        assert!(html.contains("href=\"/tech-feed.xml\""));
        assert!(html.contains("Copyright &copy;"));
    }
}
