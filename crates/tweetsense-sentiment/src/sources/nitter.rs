//! Nitter RSS post source.
//!
//! Fetches `{instance}/{username}/rss` from each configured instance in turn
//! and parses the first successful feed. Instances come and go, so a failing
//! one is logged and the next is tried.

use std::time::Duration;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use quick_xml::events::Event;
use quick_xml::Reader;
use reqwest::Client;

use crate::error::SourceError;
use crate::types::{Post, UserPosts};

/// Characters escaped in the username path segment.
const USERNAME_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'_').remove(b'-').remove(b'.');

#[derive(Debug)]
pub struct NitterClient {
    client: Client,
    instances: Vec<String>,
    limit: usize,
}

impl NitterClient {
    /// Creates a client for the given Nitter base URLs.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::InvalidConfig`] if `instances` is empty, or
    /// [`SourceError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(
        instances: &[String],
        limit: usize,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, SourceError> {
        if instances.is_empty() {
            return Err(SourceError::InvalidConfig(
                "at least one Nitter instance is required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            instances: instances
                .iter()
                .map(|u| u.trim_end_matches('/').to_string())
                .collect(),
            limit,
        })
    }

    /// Fetch up to `limit` recent posts for `username`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::AllInstancesFailed`] wrapping the last
    /// instance's error when no instance returned a parseable feed.
    pub async fn fetch_user_posts(&self, username: &str) -> Result<UserPosts, SourceError> {
        let mut last_error = None;

        for instance in &self.instances {
            match self.fetch_from(instance, username).await {
                Ok(posts) => {
                    tracing::debug!(
                        instance = instance.as_str(),
                        username,
                        count = posts.len(),
                        "fetched Nitter feed"
                    );
                    return Ok(UserPosts::from_posts(posts));
                }
                Err(e) => {
                    tracing::warn!(
                        instance = instance.as_str(),
                        username,
                        error = %e,
                        "Nitter instance failed"
                    );
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(last) => Err(SourceError::AllInstancesFailed {
                attempts: self.instances.len(),
                last: Box::new(last),
            }),
            None => Err(SourceError::InvalidConfig(
                "no Nitter instances configured".to_string(),
            )),
        }
    }

    async fn fetch_from(&self, instance: &str, username: &str) -> Result<Vec<Post>, SourceError> {
        let encoded = utf8_percent_encode(username, USERNAME_SEGMENT);
        let url = format!("{instance}/{encoded}/rss");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        parse_nitter_feed(&body, self.limit)
    }
}

/// Parse a Nitter RSS feed into posts.
///
/// The item `<title>` carries the post text; when it is empty the
/// HTML-stripped `<description>` is used instead. Retweets (`RT by @...`)
/// are skipped. Stops after `max_posts` posts.
///
/// # Errors
///
/// Returns [`SourceError::NotAFeed`] when the document has no `<rss>` or
/// `<channel>` element (empty bodies, HTML rate-limit pages), so callers can
/// tell a broken instance from a user with no posts.
pub(crate) fn parse_nitter_feed(xml: &str, max_posts: usize) -> Result<Vec<Post>, SourceError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut posts = Vec::new();
    let mut saw_feed = false;
    let mut in_item = false;
    let mut current_tag = String::new();
    let mut item = RawItem::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = std::str::from_utf8(e.name().as_ref())
                    .unwrap_or("")
                    .to_string();
                match name.as_str() {
                    "rss" | "channel" => saw_feed = true,
                    "item" => {
                        in_item = true;
                        item = RawItem::default();
                    }
                    _ => {}
                }
                current_tag = name;
            }
            Ok(Event::Empty(e)) => {
                if matches!(e.name().as_ref(), b"rss" | b"channel") {
                    saw_feed = true;
                }
            }
            Ok(Event::End(e)) => {
                let raw = e.name();
                let name = std::str::from_utf8(raw.as_ref()).unwrap_or("");
                if name == "item" && in_item {
                    in_item = false;
                    if let Some(post) = item.finish() {
                        posts.push(post);
                        if posts.len() >= max_posts {
                            break;
                        }
                    }
                }
                current_tag.clear();
            }
            Ok(Event::Text(e)) => {
                if in_item {
                    let text = e.unescape().unwrap_or_default().into_owned();
                    match current_tag.as_str() {
                        "title" => item.title.push_str(&text),
                        "link" => item.link.push_str(&text),
                        "description" => item.description.push_str(&text),
                        _ => {}
                    }
                }
            }
            Ok(Event::CData(e)) => {
                if in_item {
                    let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                    match current_tag.as_str() {
                        "title" => item.title.push_str(&text),
                        "description" => item.description_cdata.push_str(&text),
                        _ => {}
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(SourceError::Xml(e)),
            _ => {}
        }
    }

    if !saw_feed {
        return Err(SourceError::NotAFeed);
    }
    Ok(posts)
}

/// Text collected for one `<item>`.
///
/// Text nodes arrive already unescaped; CDATA sections still carry their
/// entities and are decoded once after their markup is stripped.
#[derive(Default)]
struct RawItem {
    title: String,
    link: String,
    description: String,
    description_cdata: String,
}

impl RawItem {
    fn finish(&self) -> Option<Post> {
        let title = self.title.trim();
        if title.starts_with("RT by @") {
            return None;
        }

        let text = if title.is_empty() {
            self.description_text()
        } else {
            title.to_string()
        };
        if text.is_empty() {
            return None;
        }

        let link = self.link.trim();
        Some(Post {
            text,
            url: (!link.is_empty()).then(|| canonical_status_url(link)),
        })
    }

    fn description_text(&self) -> String {
        let plain = strip_html(&self.description);
        let cdata = decode_entities(strip_html(&self.description_cdata));
        match (plain.is_empty(), cdata.is_empty()) {
            (_, true) => plain,
            (true, false) => cdata,
            (false, false) => format!("{plain} {cdata}"),
        }
    }
}

/// Rewrite an instance-local status link to its x.com equivalent.
///
/// `https://nitter.net/jack/status/20#m` becomes `https://x.com/jack/status/20`.
/// Links without a `/status/` path are returned unchanged.
pub(crate) fn canonical_status_url(link: &str) -> String {
    let without_fragment = link.split('#').next().unwrap_or(link);
    let path = without_fragment
        .split_once("://")
        .and_then(|(_, rest)| rest.find('/').map(|i| &rest[i..]));

    match path {
        Some(path) if path.contains("/status/") => format!("https://x.com{path}"),
        _ => link.to_string(),
    }
}

/// Decode XML entities left behind in CDATA markup.
fn decode_entities(text: String) -> String {
    match quick_xml::escape::unescape(&text) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => text,
    }
}

/// Strip HTML tags from a string and collapse whitespace.
fn strip_html(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => {
                in_tag = false;
                out.push(' ');
            }
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}
