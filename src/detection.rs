//! Browser name and version detection.
//!
//! Name detection walks [`BROWSER_NAME_RULES`] in order and stops at the
//! first match. Version detection applies one pattern per browser.
//!
//! Version parsing comes in two flavors. The `parse_*` functions are
//! strict and report why a user agent could not be parsed. The `detect_*`
//! functions read the user agent from an [`Environment`] and never fail:
//! a missing token yields an all-zero version, and a component that is not
//! a valid integer is left at 0 while the others keep their parsed values.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::environment::{Environment, Global};
use crate::error::{Error, Result};
use crate::types::{BrowserName, BrowserVersion, ChromeVersion, MajorMinor, SafariVersion};

static CHROME_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Chrome/(\d+)\.(\d+)\.(\d+)\.(\d+)").expect("valid Chrome version pattern")
});

static SAFARI_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Version/(\d+)\.(\d+)(?:\.(\d+))?").expect("valid Safari version pattern")
});

static FIREFOX_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Firefox/(\d+)\.(\d+)").expect("valid Firefox version pattern"));

static EDGE_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Edge/(\d+)\.(\d+)").expect("valid Edge version pattern"));

/// One step of browser name detection.
#[derive(Debug, Clone, Copy)]
pub struct BrowserRule {
    /// The name reported when the rule matches.
    pub name: BrowserName,
    /// What the rule looks for.
    pub description: &'static str,
    test: fn(&Environment, &str) -> bool,
}

impl BrowserRule {
    /// Returns `true` if the rule matches the environment.
    #[must_use]
    pub fn matches(&self, env: &Environment) -> bool {
        (self.test)(env, env.user_agent())
    }
}

fn supported_ios(env: &Environment, _user_agent: &str) -> bool {
    env.is_supported_ios_environment()
}

// Chromium Edge reports `Edg`, `EdgA` or `EdgiOS` and must not match here.
fn legacy_edge(_env: &Environment, user_agent: &str) -> bool {
    user_agent.contains("Edge")
}

fn chromium(_env: &Environment, user_agent: &str) -> bool {
    user_agent.contains("Chrome/")
}

fn safari_or_apple_engine(env: &Environment, user_agent: &str) -> bool {
    user_agent.contains("Safari") || env.is_supported_apple_engine()
}

fn firefox(_env: &Environment, user_agent: &str) -> bool {
    user_agent.contains("Firefox")
}

fn internet_explorer(_env: &Environment, user_agent: &str) -> bool {
    user_agent.contains("MSIE") || user_agent.contains(".NET")
}

fn fallback(_env: &Environment, _user_agent: &str) -> bool {
    true
}

/// Browser name rules in evaluation order.
///
/// Order matters: rules overlap. Supported iOS environments come first so
/// that third-party iOS browsers mimicking other user agents still classify
/// as Safari, and legacy Edge is checked before the Chrome token that its
/// user agent also carries.
pub const BROWSER_NAME_RULES: &[BrowserRule] = &[
    BrowserRule {
        name: BrowserName::Safari,
        description: "iOS device with camera access (Mobile Safari or WKWebView)",
        test: supported_ios,
    },
    BrowserRule {
        name: BrowserName::Edge,
        description: "`Edge` token (legacy EdgeHTML only)",
        test: legacy_edge,
    },
    BrowserRule {
        name: BrowserName::Chrome,
        description: "`Chrome/` token (includes Chromium-based browsers)",
        test: chromium,
    },
    BrowserRule {
        name: BrowserName::Safari,
        description: "`Safari` token or Apple WebKit engine",
        test: safari_or_apple_engine,
    },
    BrowserRule {
        name: BrowserName::Firefox,
        description: "`Firefox` token",
        test: firefox,
    },
    BrowserRule {
        name: BrowserName::Ie,
        description: "`MSIE` or `.NET` token",
        test: internet_explorer,
    },
    BrowserRule {
        name: BrowserName::Unknown,
        description: "anything else",
        test: fallback,
    },
];

/// Detects the browser name.
///
/// Returns `None` only when the environment has no `window`.
///
/// # Examples
///
/// ```
/// use browser_probe::{BrowserName, Environment};
/// use browser_probe::detection::detect_browser_name;
///
/// let env = Environment::browser(
///     "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
///      Chrome/120.0.0.0 Safari/537.36 Edg/120.0.2210.91",
/// );
/// assert_eq!(detect_browser_name(&env), Some(BrowserName::Chrome));
/// ```
#[must_use]
pub fn detect_browser_name(env: &Environment) -> Option<BrowserName> {
    if !env.has_global(Global::Window) {
        return None;
    }
    BROWSER_NAME_RULES
        .iter()
        .find(|rule| rule.matches(env))
        .map(|rule| rule.name)
}

/// Detects the browser version.
///
/// Returns `None` for browsers without a version parser (IE and unknown
/// browsers) and when there is no `window`.
#[must_use]
pub fn detect_browser_version(env: &Environment) -> Option<BrowserVersion> {
    match detect_browser_name(env)? {
        BrowserName::Chrome => Some(BrowserVersion::Chrome(detect_chrome_version(env))),
        BrowserName::Safari => Some(BrowserVersion::Safari(detect_safari_version(env))),
        BrowserName::Firefox => Some(BrowserVersion::Firefox(detect_firefox_version(env))),
        BrowserName::Edge => Some(BrowserVersion::Edge(detect_edge_version(env))),
        BrowserName::Ie | BrowserName::Unknown => None,
    }
}

/// Version components captured from a user agent, each parsed on its own.
#[derive(Debug)]
pub struct VersionComponents<const N: usize>([Result<u32>; N]);

impl<const N: usize> VersionComponents<N> {
    /// Returns all components, or the first component error.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidVersionComponent` if any component failed.
    pub fn strict(self) -> Result<[u32; N]> {
        let mut values = [0; N];
        for (slot, component) in values.iter_mut().zip(self.0) {
            *slot = component?;
        }
        Ok(values)
    }

    /// Returns all components, with failed ones set to 0.
    #[must_use]
    pub fn lenient(self) -> [u32; N] {
        let mut values = [0; N];
        for (slot, component) in values.iter_mut().zip(self.0) {
            *slot = component.unwrap_or_else(|err| {
                tracing::debug!(error = %err, "version component defaulted to 0");
                0
            });
        }
        values
    }
}

fn component(captures: &Captures<'_>, index: usize, name: &'static str) -> Result<u32> {
    match captures.get(index) {
        Some(m) => m
            .as_str()
            .parse()
            .map_err(|source| Error::InvalidVersionComponent {
                component: name,
                source,
            }),
        None => Ok(0),
    }
}

/// Applies `pattern` to `user_agent` and parses each capture group.
///
/// Optional groups that did not participate in the match yield 0.
///
/// # Errors
///
/// Returns `Error::VersionTokenMissing` if the pattern does not match.
pub fn scan_version<const N: usize>(
    pattern: &Regex,
    user_agent: &str,
    browser: &'static str,
    names: [&'static str; N],
) -> Result<VersionComponents<N>> {
    let captures = pattern
        .captures(user_agent)
        .ok_or(Error::VersionTokenMissing { browser })?;
    let mut index = 0;
    Ok(VersionComponents(names.map(|name| {
        index += 1;
        component(&captures, index, name)
    })))
}

fn chrome_components(user_agent: &str) -> Result<VersionComponents<4>> {
    scan_version(
        &CHROME_VERSION,
        user_agent,
        "Chrome",
        ["major", "minor", "build", "patch"],
    )
}

fn safari_components(user_agent: &str) -> Result<VersionComponents<3>> {
    scan_version(
        &SAFARI_VERSION,
        user_agent,
        "Safari",
        ["major", "minor", "point"],
    )
}

fn major_minor_components(
    pattern: &Regex,
    user_agent: &str,
    browser: &'static str,
) -> Result<VersionComponents<2>> {
    scan_version(pattern, user_agent, browser, ["major", "minor"])
}

fn chrome_from([major, minor, build, patch]: [u32; 4], user_agent: &str) -> ChromeVersion {
    ChromeVersion {
        major,
        minor,
        build,
        patch,
        opera: user_agent.contains("OPR/"),
    }
}

/// Parses a `Chrome/a.b.c.d` token.
///
/// # Errors
///
/// Returns `Error::VersionTokenMissing` without a complete token, or
/// `Error::InvalidVersionComponent` if a component overflows.
///
/// # Examples
///
/// ```
/// use browser_probe::ChromeVersion;
/// use browser_probe::detection::parse_chrome_version;
///
/// let version = parse_chrome_version("Chrome/75.0.1.2").unwrap();
/// assert_eq!(
///     version,
///     ChromeVersion { major: 75, minor: 0, build: 1, patch: 2, opera: false }
/// );
/// ```
pub fn parse_chrome_version(user_agent: &str) -> Result<ChromeVersion> {
    let values = chrome_components(user_agent)?.strict()?;
    Ok(chrome_from(values, user_agent))
}

/// Parses a `Version/a.b[.c]` token.
///
/// # Errors
///
/// Returns `Error::VersionTokenMissing` without a token, or
/// `Error::InvalidVersionComponent` if a component overflows.
pub fn parse_safari_version(user_agent: &str) -> Result<SafariVersion> {
    let [major, minor, point] = safari_components(user_agent)?.strict()?;
    Ok(SafariVersion {
        major,
        minor,
        point,
    })
}

/// Parses a `Firefox/a.b` token.
///
/// # Errors
///
/// Returns `Error::VersionTokenMissing` without a token, or
/// `Error::InvalidVersionComponent` if a component overflows.
pub fn parse_firefox_version(user_agent: &str) -> Result<MajorMinor> {
    let components = major_minor_components(&FIREFOX_VERSION, user_agent, "Firefox")?;
    let [major, minor] = components.strict()?;
    Ok(MajorMinor { major, minor })
}

/// Parses a legacy `Edge/a.b` token.
///
/// # Errors
///
/// Returns `Error::VersionTokenMissing` without a token, or
/// `Error::InvalidVersionComponent` if a component overflows.
pub fn parse_edge_version(user_agent: &str) -> Result<MajorMinor> {
    let components = major_minor_components(&EDGE_VERSION, user_agent, "Edge")?;
    let [major, minor] = components.strict()?;
    Ok(MajorMinor { major, minor })
}

/// Detects the Chrome version, defaulting unparsed components to 0.
#[must_use]
pub fn detect_chrome_version(env: &Environment) -> ChromeVersion {
    let user_agent = env.user_agent();
    match chrome_components(user_agent) {
        Ok(components) => chrome_from(components.lenient(), user_agent),
        Err(_) => ChromeVersion::default(),
    }
}

/// Detects the Safari version, defaulting unparsed components to 0.
///
/// Supported WebKit embeddings often carry no `Version/` token; they are
/// reported as [`SafariVersion::WEBKIT_EMBEDDING`], which is recent enough
/// to count as supported.
#[must_use]
pub fn detect_safari_version(env: &Environment) -> SafariVersion {
    match safari_components(env.user_agent()) {
        Ok(components) => {
            let [major, minor, point] = components.lenient();
            SafariVersion {
                major,
                minor,
                point,
            }
        }
        Err(_) if env.is_supported_ios_environment() || env.is_supported_apple_engine() => {
            SafariVersion::WEBKIT_EMBEDDING
        }
        Err(_) => SafariVersion::default(),
    }
}

/// Detects the Firefox version, defaulting unparsed components to 0.
#[must_use]
pub fn detect_firefox_version(env: &Environment) -> MajorMinor {
    detect_major_minor(&FIREFOX_VERSION, env, "Firefox")
}

/// Detects the legacy Edge version, defaulting unparsed components to 0.
#[must_use]
pub fn detect_edge_version(env: &Environment) -> MajorMinor {
    detect_major_minor(&EDGE_VERSION, env, "Edge")
}

fn detect_major_minor(pattern: &Regex, env: &Environment, browser: &'static str) -> MajorMinor {
    match major_minor_components(pattern, env.user_agent(), browser) {
        Ok(components) => {
            let [major, minor] = components.lenient();
            MajorMinor { major, minor }
        }
        Err(_) => MajorMinor::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::MediaDevices;

    const CHROME_UA: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
        (KHTML, like Gecko) Chrome/120.0.6099.109 Safari/537.36";
    const CHROMIUM_EDGE_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
        (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36 Edg/120.0.2210.91";
    const LEGACY_EDGE_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
        (KHTML, like Gecko) Chrome/70.0.3538.102 Safari/537.36 Edge/18.19042";
    const OPERA_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, \
        like Gecko) Chrome/119.0.0.0 Safari/537.36 OPR/105.0.0.0";
    const SAFARI_UA: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 \
        (KHTML, like Gecko) Version/17.1 Safari/605.1.15";
    const WKWEBVIEW_UA: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
        AppleWebKit/605.1.15 (KHTML, like Gecko)";
    const IOS_CHROME_UA: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_1 like Mac OS X) \
        AppleWebKit/605.1.15 (KHTML, like Gecko) CriOS/120.0.6099.119 Mobile/15E148 Safari/604.1";
    const FIREFOX_UA: &str = "Mozilla/5.0 (X11; Linux x86_64; rv:120.0) Gecko/20100101 \
        Firefox/120.0";
    const IE_UA: &str = "Mozilla/5.0 (Windows NT 10.0; WOW64; Trident/7.0; .NET4.0C; rv:11.0) \
        like Gecko";

    fn name_of(user_agent: &str) -> Option<BrowserName> {
        detect_browser_name(&Environment::browser(user_agent))
    }

    #[test]
    fn detects_common_browsers() {
        assert_eq!(name_of(CHROME_UA), Some(BrowserName::Chrome));
        assert_eq!(name_of(SAFARI_UA), Some(BrowserName::Safari));
        assert_eq!(name_of(FIREFOX_UA), Some(BrowserName::Firefox));
        assert_eq!(name_of(IE_UA), Some(BrowserName::Ie));
        assert_eq!(name_of("curl/8.4.0"), Some(BrowserName::Unknown));
        assert_eq!(name_of(""), Some(BrowserName::Unknown));
    }

    #[test]
    fn chromium_edge_classifies_as_chrome() {
        assert_eq!(name_of(CHROMIUM_EDGE_UA), Some(BrowserName::Chrome));
        assert_eq!(name_of(OPERA_UA), Some(BrowserName::Chrome));
    }

    #[test]
    fn legacy_edge_wins_over_chrome_token() {
        assert_eq!(name_of(LEGACY_EDGE_UA), Some(BrowserName::Edge));
    }

    #[test]
    fn apple_engine_without_safari_token_is_safari() {
        assert_eq!(name_of(WKWEBVIEW_UA), Some(BrowserName::Safari));
    }

    #[test]
    fn supported_ios_environment_is_safari_first() {
        assert_eq!(name_of(IOS_CHROME_UA), Some(BrowserName::Safari));

        let spoofed = Environment::browser(format!("{IOS_CHROME_UA} Chrome/120.0.0.0"));
        assert_eq!(detect_browser_name(&spoofed), Some(BrowserName::Chrome));
        let spoofed = spoofed.with_media_devices(MediaDevices::FULL);
        assert_eq!(detect_browser_name(&spoofed), Some(BrowserName::Safari));
    }

    #[test]
    fn no_window_means_no_name() {
        assert_eq!(detect_browser_name(&Environment::default()), None);
        assert_eq!(detect_browser_version(&Environment::default()), None);
    }

    #[test]
    fn rule_table_order() {
        let names: Vec<_> = BROWSER_NAME_RULES.iter().map(|rule| rule.name).collect();
        assert_eq!(
            names,
            [
                BrowserName::Safari,
                BrowserName::Edge,
                BrowserName::Chrome,
                BrowserName::Safari,
                BrowserName::Firefox,
                BrowserName::Ie,
                BrowserName::Unknown,
            ]
        );
        assert!(BROWSER_NAME_RULES[1].description.contains("Edge"));
        assert!(BROWSER_NAME_RULES[2].description.contains("Chrome/"));
        assert!(
            BROWSER_NAME_RULES
                .iter()
                .all(|rule| !rule.description.is_empty())
        );
    }

    #[test]
    fn every_environment_matches_some_rule() {
        let fallback = BROWSER_NAME_RULES.last().unwrap();
        assert_eq!(fallback.name, BrowserName::Unknown);
        assert_eq!(fallback.description, "anything else");
        assert!(fallback.matches(&Environment::default()));
        let chrome = Environment::browser(CHROME_UA);
        assert!(!BROWSER_NAME_RULES[4].matches(&chrome));
    }

    #[test]
    fn chrome_version_from_bare_token() {
        let env = Environment::browser("Chrome/75.0.1.2");
        assert_eq!(
            detect_chrome_version(&env),
            ChromeVersion {
                major: 75,
                minor: 0,
                build: 1,
                patch: 2,
                opera: false,
            }
        );
    }

    #[test]
    fn opera_flag() {
        let version = parse_chrome_version(OPERA_UA).unwrap();
        assert_eq!(version.major, 119);
        assert!(version.opera);
    }

    #[test]
    fn incomplete_chrome_token_is_missing() {
        let result = parse_chrome_version("Chrome/120.0");
        assert!(matches!(
            result,
            Err(Error::VersionTokenMissing { browser: "Chrome" })
        ));
        let env = Environment::browser("Chrome/120.0");
        assert_eq!(detect_chrome_version(&env), ChromeVersion::default());
    }

    #[test]
    fn overflowing_component_defaults_only_that_field() {
        let user_agent = "Chrome/99999999999.1.2.3";
        let result = parse_chrome_version(user_agent);
        assert!(matches!(
            result,
            Err(Error::InvalidVersionComponent {
                component: "major",
                ..
            })
        ));

        let version = detect_chrome_version(&Environment::browser(user_agent));
        assert_eq!(version.major, 0);
        assert_eq!(version.minor, 1);
        assert_eq!(version.build, 2);
        assert_eq!(version.patch, 3);
    }

    #[test]
    fn safari_version_with_and_without_point() {
        assert_eq!(
            parse_safari_version(SAFARI_UA).unwrap(),
            SafariVersion {
                major: 17,
                minor: 1,
                point: 0
            }
        );
        assert_eq!(
            parse_safari_version("Version/13.0.1 Safari/605.1.15").unwrap(),
            SafariVersion {
                major: 13,
                minor: 0,
                point: 1
            }
        );
    }

    #[test]
    fn safari_embedding_fallback() {
        let env = Environment::browser(WKWEBVIEW_UA);
        assert_eq!(detect_safari_version(&env), SafariVersion::WEBKIT_EMBEDDING);

        let env = Environment::browser(IOS_CHROME_UA).with_media_devices(MediaDevices::FULL);
        assert_eq!(detect_safari_version(&env), SafariVersion::WEBKIT_EMBEDDING);

        let env = Environment::browser("Safari/537.36");
        assert_eq!(detect_safari_version(&env), SafariVersion::default());
    }

    #[test]
    fn firefox_and_edge_versions() {
        let firefox = detect_firefox_version(&Environment::browser(FIREFOX_UA));
        assert_eq!(
            firefox,
            MajorMinor {
                major: 120,
                minor: 0
            }
        );

        let edge = detect_edge_version(&Environment::browser(LEGACY_EDGE_UA));
        assert_eq!(
            edge,
            MajorMinor {
                major: 18,
                minor: 19042
            }
        );
    }

    #[test]
    fn version_dispatch_follows_name() {
        let env = Environment::browser(FIREFOX_UA);
        assert!(matches!(
            detect_browser_version(&env),
            Some(BrowserVersion::Firefox(MajorMinor { major: 120, .. }))
        ));
        assert_eq!(detect_browser_version(&Environment::browser(IE_UA)), None);
        assert!(matches!(
            detect_browser_version(&Environment::browser(LEGACY_EDGE_UA)),
            Some(BrowserVersion::Edge(_))
        ));
    }
}
