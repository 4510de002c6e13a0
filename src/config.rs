use std::path::PathBuf;
use std::time::Duration;

use reqwest::Url;

pub const SOURCE_URL: &str = "https://www.gov.sg/trusted-sites";
pub const OUTPUT_PATH: &str = "allowlist.txt";

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
pub const TCP_KEEPALIVE: Duration = Duration::from_secs(60);

pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

// trusted-site links are the external anchors inside the page's paragraphs
pub const LINK_SELECTOR: &str = r#"p a[target="_blank"]"#;

pub struct Config {
    pub source: Url,
    pub output: PathBuf,
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            source: Url::parse(SOURCE_URL).expect("SOURCE_URL is a valid URL"),
            output: PathBuf::from(OUTPUT_PATH),
            timeout: REQUEST_TIMEOUT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_source_parses() {
        let config = Config::default();
        assert_eq!(config.source.as_str(), SOURCE_URL);
        assert_eq!(config.output, PathBuf::from("allowlist.txt"));
    }

    #[test]
    fn link_selector_parses() {
        assert!(scraper::Selector::parse(LINK_SELECTOR).is_ok());
    }
}
