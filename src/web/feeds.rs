use chrono::{DateTime, NaiveDateTime, Utc};

use crate::components::safe_href;
use crate::db::{Collection, LinkWithTags};

/// Links included in a collection feed.
pub const FEED_SIZE: i64 = 50;

/// Generate an RSS 2.0 feed for a public collection.
pub fn generate_rss(collection: &Collection, links: &[LinkWithTags], base_url: &str) -> String {
    let base_url = base_url.trim_end_matches('/');
    let page = format!("{base_url}/public/collections/{}", collection.id);

    let items: String = links
        .iter()
        .map(|item| {
            let link = &item.link;
            let title = xml_escape(if link.name.is_empty() {
                link.url.as_deref().unwrap_or("Untitled")
            } else {
                &link.name
            });
            let href = xml_escape(link.url.as_deref().and_then(safe_href).unwrap_or(&page));
            let description = xml_escape(&link.description);
            let pub_date = rfc2822(&link.created_at).unwrap_or_default();
            let categories: String = item
                .tags
                .iter()
                .map(|t| format!("\n      <category>{}</category>", xml_escape(&t.name)))
                .collect();

            format!(
                r#"    <item>
      <title>{title}</title>
      <link>{href}</link>
      <guid isPermaLink="false">{page}#link-{id}</guid>
      <description>{description}</description>
      <pubDate>{pub_date}</pubDate>{categories}
    </item>"#,
                id = link.id
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let title = xml_escape(&collection.name);
    let description = xml_escape(&collection.description);

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:atom="http://www.w3.org/2005/Atom">
  <channel>
    <title>{title} | Linkwarden</title>
    <link>{page}</link>
    <description>{description}</description>
    <language>en-us</language>
    <atom:link href="{page}/rss" rel="self" type="application/rss+xml"/>
{items}
  </channel>
</rss>"#
    )
}

fn rfc2822(timestamp: &str) -> Option<String> {
    let utc = DateTime::parse_from_rfc3339(timestamp)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%d %H:%M:%S").map(|n| n.and_utc())
        })
        .ok()?;
    Some(utc.to_rfc2822())
}

/// Escape XML special characters
fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
