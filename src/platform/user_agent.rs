//! Operating system sniffing from user agent strings.

use std::sync::LazyLock;

use regex::Regex;

use super::OsParser;
use crate::error::{Error, Result};

struct OsRule {
    name: &'static str,
    pattern: Regex,
    unless: Option<Regex>,
}

impl OsRule {
    fn new(name: &'static str, pattern: &str) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).expect("valid OS pattern"),
            unless: None,
        }
    }

    fn unless(mut self, pattern: &str) -> Self {
        self.unless = Some(Regex::new(pattern).expect("valid OS exclusion pattern"));
        self
    }

    fn matches(&self, user_agent: &str) -> bool {
        self.pattern.is_match(user_agent)
            && !self
                .unless
                .as_ref()
                .is_some_and(|unless| unless.is_match(user_agent))
    }
}

// Same order as Bowser's `os-parsers`; first match wins. Firefox on iPadOS
// reports `Macintosh` with an `FxiOS` token, and Windows Phone user agents
// also mention Android.
static OS_RULES: LazyLock<Vec<OsRule>> = LazyLock::new(|| {
    vec![
        OsRule::new("Windows Phone", r"(?i)windows phone"),
        OsRule::new("Windows", r"(?i)windows "),
        OsRule::new("iOS", r"Macintosh.*? FxiOS.*?/"),
        OsRule::new("macOS", r"(?i)macintosh"),
        OsRule::new("iOS", r"(?i)ipod|iphone|ipad"),
        OsRule::new("Android", r"(?i)android").unless(r"(?i)like android"),
        OsRule::new("WebOS", r"(?i)(?:web|hpw)[o0]s"),
        OsRule::new("BlackBerry", r"(?i)blackberry|\bbb\d+|rim\stablet"),
        OsRule::new("Bada", r"(?i)bada"),
        OsRule::new("Tizen", r"(?i)tizen"),
        OsRule::new("Linux", r"(?i)linux"),
        OsRule::new("Chrome OS", r"CrOS"),
        OsRule::new("PlayStation 4", r"PlayStation 4"),
    ]
});

/// The default [`OsParser`], a fixed table of user agent patterns.
///
/// Reports names such as `macOS`, `Windows`, `iOS`, `Android`, `Linux`,
/// `Chrome OS` or `Tizen`, and an empty name when nothing matches.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserAgentOsParser;

impl OsParser for UserAgentOsParser {
    fn os_name(&self, user_agent: &str) -> Result<String> {
        if user_agent.is_empty() {
            return Err(Error::EmptyUserAgent);
        }
        let name = OS_RULES
            .iter()
            .find(|rule| rule.matches(user_agent))
            .map_or("", |rule| rule.name);
        Ok(name.to_string())
    }
}
