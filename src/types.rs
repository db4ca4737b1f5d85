//! Core type definitions for browser and OS identity.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Browsers the probe can identify.
///
/// The set is closed: anything not recognized is [`BrowserName::Unknown`].
/// Chromium-based browsers (Chromium Edge, Opera, Brave) report as
/// [`BrowserName::Chrome`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BrowserName {
    /// Chrome and Chromium-based browsers.
    Chrome,
    /// Safari, including supported WKWebView embeddings.
    Safari,
    /// Firefox
    Firefox,
    /// Legacy (EdgeHTML) Edge.
    Edge,
    /// Internet Explorer
    #[serde(rename = "IE")]
    Ie,
    /// Anything else.
    #[serde(rename = "Unknown Browser")]
    Unknown,
}

impl BrowserName {
    /// Returns the display name of this browser.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Chrome => "Chrome",
            Self::Safari => "Safari",
            Self::Firefox => "Firefox",
            Self::Edge => "Edge",
            Self::Ie => "IE",
            Self::Unknown => "Unknown Browser",
        }
    }
}

impl fmt::Display for BrowserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operating systems the probe reports.
///
/// Names outside the well-known set are passed through verbatim as
/// [`OsName::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OsName {
    /// macOS
    #[serde(rename = "macOS")]
    MacOs,
    /// Windows
    Windows,
    /// Linux
    Linux,
    /// iOS and iPadOS
    #[serde(rename = "iOS")]
    Ios,
    /// Android
    Android,
    /// Detection was not possible.
    Unknown,
    /// Any other name reported by the OS parser or native bridge.
    #[serde(untagged)]
    Other(String),
}

impl OsName {
    /// Maps a raw OS name onto the well-known set.
    ///
    /// Empty names map to [`OsName::Unknown`]; unrecognized names are kept
    /// as [`OsName::Other`].
    ///
    /// # Examples
    ///
    /// ```
    /// use browser_probe::OsName;
    ///
    /// assert_eq!(OsName::from_raw("macOS"), OsName::MacOs);
    /// assert_eq!(OsName::from_raw("Chrome OS"), OsName::Other("Chrome OS".into()));
    /// ```
    #[must_use]
    pub fn from_raw(name: &str) -> Self {
        match name {
            "macOS" => Self::MacOs,
            "Windows" => Self::Windows,
            "Linux" => Self::Linux,
            "iOS" => Self::Ios,
            "Android" => Self::Android,
            "" => Self::Unknown,
            other => Self::Other(other.to_string()),
        }
    }

    /// Returns the display name of this OS.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::MacOs => "macOS",
            Self::Windows => "Windows",
            Self::Linux => "Linux",
            Self::Ios => "iOS",
            Self::Android => "Android",
            Self::Unknown => "Unknown",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for OsName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Chrome (and Chromium-based) version from a `Chrome/a.b.c.d` token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChromeVersion {
    /// Major version.
    pub major: u32,
    /// Minor version.
    pub minor: u32,
    /// Build number.
    pub build: u32,
    /// Patch number.
    pub patch: u32,
    /// Whether the user agent also carries an Opera (`OPR/`) token.
    pub opera: bool,
}

/// Safari version from a `Version/a.b[.c]` token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafariVersion {
    /// Major version.
    pub major: u32,
    /// Minor version.
    pub minor: u32,
    /// Point release; 0 when the token has no third component.
    pub point: u32,
}

impl SafariVersion {
    /// Version assumed for supported WebKit embeddings that carry no
    /// `Version/` token.
    pub const WEBKIT_EMBEDDING: Self = Self {
        major: 14,
        minor: 0,
        point: 3,
    };

    /// Returns `true` if this version is older than `major.minor`.
    #[must_use]
    pub const fn is_below(&self, major: u32, minor: u32) -> bool {
        self.major < major || (self.major == major && self.minor < minor)
    }
}

/// A `major.minor` version, as reported for Firefox and legacy Edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MajorMinor {
    /// Major version.
    pub major: u32,
    /// Minor version.
    pub minor: u32,
}

/// A detected browser version.
///
/// Each browser reports a different set of components; the accessors
/// return 0 for components a browser does not have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "browser", content = "version")]
pub enum BrowserVersion {
    /// Chrome and Chromium-based browsers.
    Chrome(ChromeVersion),
    /// Safari
    Safari(SafariVersion),
    /// Firefox
    Firefox(MajorMinor),
    /// Legacy Edge
    Edge(MajorMinor),
}

impl BrowserVersion {
    /// Returns the major version.
    #[must_use]
    pub const fn major(&self) -> u32 {
        match self {
            Self::Chrome(v) => v.major,
            Self::Safari(v) => v.major,
            Self::Firefox(v) | Self::Edge(v) => v.major,
        }
    }

    /// Returns the minor version.
    #[must_use]
    pub const fn minor(&self) -> u32 {
        match self {
            Self::Chrome(v) => v.minor,
            Self::Safari(v) => v.minor,
            Self::Firefox(v) | Self::Edge(v) => v.minor,
        }
    }

    /// Returns the third component: Safari's point release or Chrome's
    /// build number.
    #[must_use]
    pub const fn point(&self) -> u32 {
        match self {
            Self::Chrome(v) => v.build,
            Self::Safari(v) => v.point,
            Self::Firefox(_) | Self::Edge(_) => 0,
        }
    }

    /// Returns `true` if this version is older than `major.minor`.
    ///
    /// # Examples
    ///
    /// ```
    /// use browser_probe::{BrowserVersion, SafariVersion};
    ///
    /// let v = BrowserVersion::Safari(SafariVersion { major: 17, minor: 3, point: 1 });
    /// assert!(v.is_below(17, 4));
    /// assert!(!v.is_below(17, 3));
    /// ```
    #[must_use]
    pub const fn is_below(&self, major: u32, minor: u32) -> bool {
        let (own_major, own_minor) = (self.major(), self.minor());
        own_major < major || (own_major == major && own_minor < minor)
    }
}

impl fmt::Display for BrowserVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Chrome(v) => write!(f, "{}.{}.{}.{}", v.major, v.minor, v.build, v.patch),
            Self::Safari(v) => write!(f, "{}.{}.{}", v.major, v.minor, v.point),
            Self::Firefox(v) | Self::Edge(v) => write!(f, "{}.{}", v.major, v.minor),
        }
    }
}
