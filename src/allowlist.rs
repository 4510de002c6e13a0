use std::collections::BTreeSet;

use reqwest::Url;
use scraper::{ElementRef, Html, Selector};
use spdlog::prelude::*;

use crate::config;
use crate::error::{AllowlistError, Result};
use crate::page::Page;

const ZERO_WIDTH: [char; 4] = ['\u{200B}', '\u{200C}', '\u{200D}', '\u{FEFF}'];
const ACCEPTED_SCHEMES: [&str; 2] = ["http", "https"];

#[derive(Debug, Default)]
pub struct Allowlist {
    entries: BTreeSet<String>,
}

impl Allowlist {
    pub fn insert(&mut self, entry: String) -> bool {
        self.entries.insert(entry)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn render(&self) -> String {
        self.iter().fold(String::new(), |mut out, entry| {
            out.push_str(entry);
            out.push('\n');
            out
        })
    }
}

impl FromIterator<String> for Allowlist {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Allowlist {
            entries: iter.into_iter().collect(),
        }
    }
}

pub fn clean_url(raw: &str) -> Option<String> {
    let stripped: String = raw.chars().filter(|c| !ZERO_WIDTH.contains(c)).collect();
    let trimmed = stripped.trim();
    if trimmed.is_empty() {
        return None;
    }

    let absolute = if trimmed.starts_with("//") {
        format!("https:{}", trimmed)
    } else if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    let url = Url::parse(&absolute).ok()?;
    if !ACCEPTED_SCHEMES.contains(&url.scheme()) {
        return None;
    }
    if !url.username().is_empty() || url.password().is_some() {
        return None;
    }

    // unknown suffixes come from relative links like `news.html`
    let host = url.domain()?.trim_end_matches('.');
    psl::suffix(host.as_bytes()).filter(|suffix| suffix.is_known())?;
    let registered = psl::domain_str(host)?;
    let host = match host.strip_prefix("www.") {
        Some(rest) if rest == registered => registered,
        _ => host,
    };

    let mut entry = format!("{}://{}", url.scheme(), host);
    if let Some(port) = url.port() {
        entry.push_str(&format!(":{}", port));
    }
    entry.push_str(url.path().trim_end_matches('/'));
    if let Some(query) = url.query() {
        entry.push('?');
        entry.push_str(query);
    }
    Some(entry)
}

fn link_target(anchor: ElementRef) -> String {
    match anchor.value().attr("href") {
        Some(href) => href.to_string(),
        None => anchor.text().collect(),
    }
}

pub fn extract(page: &Page) -> Result<Allowlist> {
    let selector = Selector::parse(config::LINK_SELECTOR).map_err(|err| {
        AllowlistError::Parse(format!("invalid selector {}: {:?}", config::LINK_SELECTOR, err))
    })?;
    let document = Html::parse_document(page.content());

    let mut anchors = 0;
    let mut allowlist = Allowlist::default();
    for anchor in document.select(&selector) {
        anchors += 1;
        let target = link_target(anchor);
        match clean_url(&target) {
            Some(entry) => {
                if !allowlist.insert(entry) {
                    trace!("extract: duplicate {:?}", target);
                }
            }
            None => debug!("extract: rejected {:?}", target),
        }
    }

    debug!(
        "extract: url={} anchors={} unique={}",
        page.url(),
        anchors,
        allowlist.len()
    );

    if anchors == 0 {
        return Err(AllowlistError::Parse(format!(
            "no element matches {} on {}; page structure may have changed",
            config::LINK_SELECTOR,
            page.url()
        )));
    }
    if allowlist.is_empty() {
        return Err(AllowlistError::Parse(format!(
            "none of the {} links on {} is a usable URL",
            anchors,
            page.url()
        )));
    }
    Ok(allowlist)
}
