use std::sync::OnceLock;

use chrono::{DateTime, Datelike, Duration, SecondsFormat, Utc};
use regex::Regex;

use crate::xml::{Document, Element, Node};

pub const FEED_TITLE: &str = "Links by Jacob";
pub const SITE_URL: &str = "https://links.jacobwgillespie.com";

/// Creator name whose items carry a Hacker News discussion link
pub const HN_CREATOR: &str = "Hacker News";

/// Sources excluded from the tech-filtered views. Matching is case-sensitive
/// substring containment against the item's creator.
pub const TECH_DENYLIST: &[&str] = &[
    "Ars Technica",
    "Hyperbole and a Half",
    "In Your Face Cake",
    "Kotaku",
    "Lifehacker",
    "PlayStation.Blog",
    "Polygon",
    "Saturday Morning Breakfast Cereal",
    "Scribbles from a Suitcase",
    "The Oatmeal",
    "The Verge",
];

fn hn_discussion_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"https://news\.ycombinator\.com/item\?id=(\d+)")
            .expect("Failed to compile discussion regex")
    })
}

/// One entry of the feed, flattened for rendering.
///
/// String fields default to empty when the source item lacks the matching
/// child element; a missing or unparseable `pubDate` leaves `date` unset with
/// the display strings falling back to the original date text.
#[derive(Debug, Clone)]
pub struct FeedItem {
    pub creator: String,
    pub title: String,
    pub description: String,
    pub pub_date: String,
    pub date: Option<DateTime<Utc>>,
    pub iso_date: String,
    pub relative_date: String,
    pub link: String,
    /// Hacker News discussion id, present only for items credited to
    /// "Hacker News" whose description contains a discussion URL
    pub hn_id: Option<String>,
}

/// Rewrite the feed's identity in place: the channel title becomes
/// [`FEED_TITLE`] and the canonical self-link points at this service under the
/// given request path. Either rewrite is skipped silently when its target
/// element is absent.
pub fn rewrite_feed(doc: &mut Document, path: &str) {
    let Some(channel) = doc.root_mut().and_then(|rss| rss.child_mut("channel")) else {
        return;
    };

    if let Some(title) = channel.child_mut("title") {
        title.set_text(FEED_TITLE);
    }

    if let Some(link) = channel.child_mut("atom:link") {
        link.set_attribute("href", &format!("{}{}", SITE_URL, path));
    }
}

/// Extract all channel items in document order. Extraction never drops or
/// fails an item: absent fields degrade to empty strings and a description
/// without a discussion URL leaves `hn_id` unset.
pub fn extract_items(doc: &Document) -> Vec<FeedItem> {
    let now = Utc::now();
    extract_items_at(doc, now)
}

/// As [`extract_items`], with an explicit "now" for relative-date computation.
pub fn extract_items_at(doc: &Document, now: DateTime<Utc>) -> Vec<FeedItem> {
    let Some(channel) = doc.root().and_then(|rss| rss.child("channel")) else {
        return Vec::new();
    };

    channel
        .children
        .iter()
        .filter_map(|node| match node {
            Node::Element(el) if el.name == "item" => Some(el),
            _ => None,
        })
        .map(|item| extract_item(item, now))
        .collect()
}

fn extract_item(item: &Element, now: DateTime<Utc>) -> FeedItem {
    let text_of = |tag: &str| {
        item.child(tag)
            .and_then(|el| el.text())
            .unwrap_or_default()
            .to_string()
    };

    let title = text_of("title");
    let description = text_of("description");
    let pub_date = text_of("pubDate");
    let link = text_of("link");
    let creator = text_of("dc:creator");

    let date = DateTime::parse_from_rfc2822(&pub_date)
        .ok()
        .map(|d| d.with_timezone(&Utc));

    let (iso_date, relative_date) = match date {
        Some(d) => (
            d.to_rfc3339_opts(SecondsFormat::Secs, true),
            relative_time(d, now),
        ),
        None => (pub_date.clone(), pub_date.clone()),
    };

    let hn_id = if creator == HN_CREATOR {
        hn_discussion_re()
            .captures(&description)
            .map(|caps| caps[1].to_string())
    } else {
        None
    };

    FeedItem {
        creator,
        title,
        description,
        pub_date,
        date,
        iso_date,
        relative_date,
        link,
        hn_id,
    }
}

/// Produce a copy of the feed without items from denylisted sources.
///
/// The input document is left untouched; the copy is a structural clone.
/// Items with no creator element are kept, since there is no evidence they
/// come from a denylisted source. Order and all non-item channel content are
/// preserved.
pub fn filter_tech(doc: &Document) -> Document {
    let mut filtered = doc.clone();

    if let Some(channel) = filtered.root_mut().and_then(|rss| rss.child_mut("channel")) {
        channel.children.retain(|node| match node {
            Node::Element(el) if el.name == "item" => {
                let creator = el.child("dc:creator").and_then(|c| c.text()).unwrap_or("");
                !TECH_DENYLIST.iter().any(|source| creator.contains(source))
            }
            _ => true,
        });
    }

    filtered
}

/// Human-readable "X unit(s) ago" distance between two instants.
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta = now.signed_duration_since(then);
    if delta < Duration::zero() {
        return "in the future".to_string();
    }

    let (count, unit) = if delta.num_seconds() < 60 {
        (delta.num_seconds(), "second")
    } else if delta.num_minutes() < 60 {
        (delta.num_minutes(), "minute")
    } else if delta.num_hours() < 24 {
        (delta.num_hours(), "hour")
    } else if delta.num_days() < 30 {
        (delta.num_days(), "day")
    } else if delta.num_days() < 365 {
        (delta.num_days() / 30, "month")
    } else {
        (delta.num_days() / 365, "year")
    };

    let plural = if count == 1 { "" } else { "s" };
    format!("{} {}{} ago", count, unit, plural)
}

/// The current year, for the rendered footer.
pub fn current_year() -> i32 {
    Utc::now().year()
}
