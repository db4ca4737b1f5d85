//! Compatibility reporting.
//!
//! [`check_compatibility`] runs every capability check of a [`Probe`] and
//! collects the failures, so callers can show the complete picture (or ship
//! it to a server) instead of asking one question at a time.
//! [`CapabilitySummary`] is the serializable record of every answer.
//!
//! # Example
//!
//! ```
//! use browser_probe::{Environment, Probe};
//! use browser_probe::compatibility::{check_compatibility, Severity, CODE_UPGRADE_REQUIRED};
//!
//! let probe = Probe::new(Environment::browser(
//!     "Mozilla/5.0 (X11; Linux x86_64; rv:78.0) Gecko/20100101 Firefox/78.0",
//! ));
//!
//! let issues = check_compatibility(&probe);
//! assert!(issues.iter().any(|i| i.code == Some(CODE_UPGRADE_REQUIRED)));
//! assert!(issues.iter().any(|i| i.severity == Severity::Error));
//! ```

use serde::{Deserialize, Serialize};

use crate::capability::VideoProvider;
use crate::probe::Probe;
use crate::types::{BrowserName, BrowserVersion, OsName};

// Issue code constants for machine-readable classification.

/// Browser is too old or not recognized.
pub const CODE_UPGRADE_REQUIRED: &str = "browser.upgrade_required";

/// Camera and microphone cannot be used.
pub const CODE_USER_MEDIA_UNAVAILABLE: &str = "media.user_media.unavailable";

/// Browser only negotiates Plan B SDP.
pub const CODE_PLAN_B_ONLY: &str = "sdp.plan_b_only";

/// Screen sharing is not available.
pub const CODE_SCREEN_SHARE_UNSUPPORTED: &str = "media.screen_share.unsupported";

/// WebGL2 is not available.
pub const CODE_WEBGL_UNAVAILABLE: &str = "render.webgl.unavailable";

/// Background effects are not available.
pub const CODE_VIDEO_PROCESSING_UNSUPPORTED: &str = "media.video_processing.unsupported";

/// Noise cancellation is not available.
pub const CODE_AUDIO_PROCESSING_UNSUPPORTED: &str = "media.audio_processing.unsupported";

/// Audio output device selection is disabled.
pub const CODE_AUDIO_OUTPUT_DISALLOWED: &str = "media.audio_output.disallowed";

/// Fullscreen is not available.
pub const CODE_FULLSCREEN_UNSUPPORTED: &str = "display.fullscreen.unsupported";

/// Severity level for compatibility issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Calls cannot work as expected.
    ///
    /// Examples: outdated browser, no camera access.
    Error,

    /// An optional feature is unavailable.
    ///
    /// Examples: no background effects, no fullscreen.
    Warning,
}

/// A capability the environment lacks.
///
/// # Extensibility
///
/// This struct is marked `#[non_exhaustive]`. Use
/// [`CompatibilityIssue::error`] and [`CompatibilityIssue::warning`] rather
/// than constructing directly.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatibilityIssue {
    /// Severity of the issue.
    pub severity: Severity,

    /// The capability concerned (e.g., "screen_share").
    pub capability: String,

    /// Human-readable description of the issue.
    pub message: String,

    /// Machine-readable issue code; see the `CODE_*` constants.
    pub code: Option<&'static str>,
}

impl CompatibilityIssue {
    /// Creates an error-level issue.
    #[must_use]
    pub fn error(
        capability: impl Into<String>,
        message: impl Into<String>,
        code: Option<&'static str>,
    ) -> Self {
        Self {
            severity: Severity::Error,
            capability: capability.into(),
            message: message.into(),
            code,
        }
    }

    /// Creates a warning-level issue.
    #[must_use]
    pub fn warning(
        capability: impl Into<String>,
        message: impl Into<String>,
        code: Option<&'static str>,
    ) -> Self {
        Self {
            severity: Severity::Warning,
            capability: capability.into(),
            message: message.into(),
            code,
        }
    }
}

/// Checks every capability and returns the ones that are missing.
///
/// An empty result means the environment supports everything.
#[must_use]
pub fn check_compatibility(probe: &Probe) -> Vec<CompatibilityIssue> {
    let mut issues = Vec::new();
    let browser = describe_browser(probe);

    if probe.browser_needs_upgrade() {
        issues.push(CompatibilityIssue::error(
            "browser",
            format!("{browser} is not supported; a newer browser is required"),
            Some(CODE_UPGRADE_REQUIRED),
        ));
    }

    if !probe.environment().is_user_media_accessible() {
        issues.push(CompatibilityIssue::error(
            "user_media",
            "camera and microphone are not accessible",
            Some(CODE_USER_MEDIA_UNAVAILABLE),
        ));
    }

    if !probe.can_unified_plan() {
        issues.push(CompatibilityIssue::warning(
            "sdp",
            format!("{browser} only supports Plan B SDP"),
            Some(CODE_PLAN_B_ONLY),
        ));
    }

    if !probe.is_screen_sharing_supported() {
        issues.push(CompatibilityIssue::warning(
            "screen_share",
            "screen sharing is not supported",
            Some(CODE_SCREEN_SHARE_UNSUPPORTED),
        ));
    }

    if !probe.is_webgl_available() {
        issues.push(CompatibilityIssue::warning(
            "webgl",
            "WebGL2 is not available",
            Some(CODE_WEBGL_UNAVAILABLE),
        ));
    }

    if !probe.is_video_processing_supported(VideoProvider::default()) {
        issues.push(CompatibilityIssue::warning(
            "video_processing",
            format!("background effects are not supported on {browser}"),
            Some(CODE_VIDEO_PROCESSING_UNSUPPORTED),
        ));
    }

    if !probe.is_audio_processing_supported() {
        issues.push(CompatibilityIssue::warning(
            "audio_processing",
            format!("noise cancellation is not supported on {browser}"),
            Some(CODE_AUDIO_PROCESSING_UNSUPPORTED),
        ));
    }

    if probe.is_audio_output_selection_disallowed() {
        issues.push(CompatibilityIssue::warning(
            "audio_output",
            format!("audio output selection breaks echo cancellation on {browser}"),
            Some(CODE_AUDIO_OUTPUT_DISALLOWED),
        ));
    }

    if !probe.is_fullscreen_supported() {
        issues.push(CompatibilityIssue::warning(
            "fullscreen",
            "fullscreen is not supported",
            Some(CODE_FULLSCREEN_UNSUPPORTED),
        ));
    }

    issues
}

fn describe_browser(probe: &Probe) -> String {
    match (probe.browser_name(), probe.browser_version()) {
        (Some(name), Some(version)) => format!("{name} {version}"),
        (Some(name), None) => name.to_string(),
        (None, _) => "this environment".to_string(),
    }
}

/// Every identity fact and capability answer for one environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilitySummary {
    /// Detected browser.
    pub browser_name: Option<BrowserName>,
    /// Detected browser version.
    pub browser_version: Option<BrowserVersion>,
    /// Detected operating system.
    pub os_name: OsName,
    /// Running inside React Native.
    pub react_native: bool,
    /// Phone, tablet or Android app.
    pub mobile: bool,
    /// Browser is too old or not recognized.
    pub needs_upgrade: bool,
    /// Unified Plan SDP is supported.
    pub unified_plan: bool,
    /// Screen sharing is supported.
    pub screen_sharing: bool,
    /// Camera and microphone are usable.
    pub video: bool,
    /// WebGL2 is available.
    pub webgl: bool,
    /// Background effects are supported with the current provider.
    pub video_processing: bool,
    /// Noise cancellation is supported.
    pub audio_processing: bool,
    /// Local audio level observers are supported.
    pub local_audio_level_observers: bool,
    /// Audio output selection is disabled.
    pub audio_output_selection_disallowed: bool,
    /// Fullscreen is supported.
    pub fullscreen: bool,
}

impl CapabilitySummary {
    /// Collects every answer from `probe`.
    #[must_use]
    pub fn collect(probe: &Probe) -> Self {
        Self {
            browser_name: probe.browser_name(),
            browser_version: probe.browser_version(),
            os_name: probe.os_name(),
            react_native: probe.is_react_native(),
            mobile: probe.is_browser_mobile(),
            needs_upgrade: probe.browser_needs_upgrade(),
            unified_plan: probe.can_unified_plan(),
            screen_sharing: probe.is_screen_sharing_supported(),
            video: probe.browser_video_supported(),
            webgl: probe.is_webgl_available(),
            video_processing: probe.is_video_processing_supported(VideoProvider::default()),
            audio_processing: probe.is_audio_processing_supported(),
            local_audio_level_observers: probe.browser_supports_local_audio_level_observers(),
            audio_output_selection_disallowed: probe.is_audio_output_selection_disallowed(),
            fullscreen: probe.is_fullscreen_supported(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::{DomFeature, Environment, Global, MediaDevices};

    const CHROME_UA: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
        (KHTML, like Gecko) Chrome/120.0.6099.109 Safari/537.36";
    const FIREFOX_UA: &str = "Mozilla/5.0 (X11; Linux x86_64; rv:120.0) Gecko/20100101 \
        Firefox/120.0";
    const OLD_FIREFOX_UA: &str = "Mozilla/5.0 (X11; Linux x86_64; rv:78.0) Gecko/20100101 \
        Firefox/78.0";

    fn full_featured(user_agent: &str) -> Probe {
        let env = Environment::browser(user_agent)
            .with_media_devices(MediaDevices::FULL)
            .with_global(Global::AudioWorkletNode)
            .with_feature(DomFeature::Webgl2)
            .with_feature(DomFeature::RequestFullscreen);
        Probe::new(env)
    }

    fn codes(issues: &[CompatibilityIssue]) -> Vec<&'static str> {
        issues.iter().filter_map(|i| i.code).collect()
    }

    #[test]
    fn modern_chrome_has_no_issues() {
        let issues = check_compatibility(&full_featured(CHROME_UA));
        assert!(issues.is_empty(), "unexpected issues: {issues:?}");
    }

    #[test]
    fn firefox_regression_window_is_a_warning() {
        let issues = check_compatibility(&full_featured(FIREFOX_UA));
        assert_eq!(codes(&issues), [CODE_AUDIO_OUTPUT_DISALLOWED]);
        assert_eq!(issues[0].severity, Severity::Warning);
        assert!(issues[0].message.contains("Firefox 120.0"));
    }

    #[test]
    fn empty_environment_collects_everything() {
        let issues = check_compatibility(&Probe::new(Environment::default()));
        let codes = codes(&issues);

        assert!(codes.contains(&CODE_UPGRADE_REQUIRED));
        assert!(codes.contains(&CODE_USER_MEDIA_UNAVAILABLE));
        assert!(codes.contains(&CODE_SCREEN_SHARE_UNSUPPORTED));
        assert!(codes.contains(&CODE_WEBGL_UNAVAILABLE));
        assert!(codes.contains(&CODE_FULLSCREEN_UNSUPPORTED));
        assert!(!codes.contains(&CODE_PLAN_B_ONLY));

        let error_count = issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .count();
        assert_eq!(error_count, 2);
        assert!(issues[0].message.starts_with("this environment"));
    }

    #[test]
    fn outdated_firefox_needs_upgrade() {
        let probe = full_featured(OLD_FIREFOX_UA);
        let issues = check_compatibility(&probe);
        let upgrade = issues
            .iter()
            .find(|i| i.code == Some(CODE_UPGRADE_REQUIRED))
            .unwrap();
        assert_eq!(upgrade.severity, Severity::Error);
        assert_eq!(upgrade.capability, "browser");
        assert!(upgrade.message.contains("Firefox 78.0"));
    }

    #[test]
    fn summary_serializes_to_json() {
        let summary = CapabilitySummary::collect(&full_featured(CHROME_UA));
        assert_eq!(summary.browser_name, Some(BrowserName::Chrome));
        assert_eq!(summary.os_name, OsName::MacOs);
        assert!(summary.screen_sharing);
        assert!(!summary.mobile);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["browserName"], "Chrome");
        assert_eq!(json["osName"], "macOS");
        assert_eq!(json["browserVersion"]["browser"], "Chrome");
        assert_eq!(json["browserVersion"]["version"]["major"], 120);
        assert_eq!(json["needsUpgrade"], false);

        let back: CapabilitySummary = serde_json::from_value(json).unwrap();
        assert_eq!(back, summary);
    }
}
