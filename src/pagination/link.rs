//! `Link` header parsing and cursor extraction.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use url::Url;

/// Relations of an RFC 8288 `Link` header, in header order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Links {
    relations: Vec<(String, String)>,
}

impl Links {
    /// Parses a `Link` header value such as
    /// `<https://host/x?startingAfter=a>; rel=next, <https://host/x>; rel="first"`.
    ///
    /// Malformed entries are skipped.
    pub fn parse(header: &str) -> Self {
        let mut relations = Vec::new();
        let mut rest = header;

        while let Some(open) = rest.find('<') {
            let after = &rest[open + 1..];
            let Some(close) = after.find('>') else {
                break;
            };
            let target = after[..close].trim();
            let tail = &after[close + 1..];
            let params_end = tail.find('<').unwrap_or(tail.len());

            for param in tail[..params_end].split(';') {
                let Some((key, value)) = param.split_once('=') else {
                    continue;
                };
                if !key.trim().eq_ignore_ascii_case("rel") {
                    continue;
                }
                let value = value.trim().trim_end_matches(',').trim().trim_matches('"');
                for rel in value.split_whitespace() {
                    relations.push((rel.to_ascii_lowercase(), target.to_string()));
                }
            }

            rest = &tail[params_end..];
        }

        Self { relations }
    }

    /// Returns the target of the first link with relation `rel`.
    pub fn get(&self, rel: &str) -> Option<&str> {
        self.relations
            .iter()
            .find(|(r, _)| r.eq_ignore_ascii_case(rel))
            .map(|(_, target)| target.as_str())
    }

    /// Returns `true` if no relation was parsed.
    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }
}

/// Returns the percent-decoded value of query parameter `name` in `link`.
pub fn cursor(link: &str, name: &str) -> Option<String> {
    let url = Url::parse(link).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

/// Parses a time-based cursor.
///
/// Accepts RFC 3339 timestamps, naive ISO 8601 date-times (taken as UTC),
/// plain dates and epoch seconds.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }
    value
        .parse::<i64>()
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
}
