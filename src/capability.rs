//! Compatibility tables and the rules that consult them.
//!
//! These functions take already-detected facts, so they can be checked
//! against any browser/version pair. [`Probe`](crate::Probe) feeds them
//! facts detected from an [`Environment`](crate::Environment).

use serde::{Deserialize, Serialize};

use crate::types::{BrowserName, BrowserVersion};

/// Chrome major version that introduced Unified Plan.
pub const UNIFIED_PLAN_MIN_CHROME: u32 = 75;

/// Firefox major version that introduced Unified Plan.
pub const UNIFIED_PLAN_MIN_FIREFOX: u32 = 67;

/// Safari release whose Unified Plan support is broken; forced to Plan B.
pub const SAFARI_PLAN_B_RELEASE: (u32, u32, u32) = (13, 0, 0);

/// Oldest supported Chrome major version.
pub const MIN_CHROME: u32 = 75;

/// Oldest supported Firefox major version.
pub const MIN_FIREFOX: u32 = 91;

/// Oldest supported Safari `major.minor`.
pub const MIN_SAFARI: (u32, u32) = (13, 1);

/// Banuba crashes older Chrome versions.
pub const BANUBA_MIN_CHROME: u32 = 77;

/// Banuba fails with "GPU operations complete wait failed" on older Firefox.
pub const BANUBA_MIN_FIREFOX: u32 = 97;

/// Banuba needs OpenGL 4.3, and Safari 15.0 to 15.3 delay effect animations.
pub const BANUBA_MIN_SAFARI: (u32, u32) = (15, 4);

/// Krisp needs Safari 17.4.
pub const KRISP_MIN_SAFARI: (u32, u32) = (17, 4);

/// Firefox majors strictly between these break echo cancellation when the
/// audio output device is changed (Mozilla bug 1849108).
pub const FIREFOX_SINK_ID_REGRESSION: (u32, u32) = (115, 123);

/// Video processing backends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VideoProvider {
    /// The current provider (Banuba).
    #[default]
    Banuba,
    /// The legacy provider (MediaPipe), desktop Chrome and Firefox only.
    MediaPipe,
}

/// Returns whether a browser can negotiate Unified Plan SDP.
///
/// Unknown names or versions are assumed capable. Safari additionally
/// needs `RTCRtpTransceiver.prototype.currentDirection`.
///
/// # Examples
///
/// ```
/// use browser_probe::{BrowserName, BrowserVersion, SafariVersion};
/// use browser_probe::capability::browser_can_unified_plan;
///
/// let safari = |point| BrowserVersion::Safari(SafariVersion { major: 13, minor: 0, point });
/// assert!(!browser_can_unified_plan(Some(BrowserName::Safari), Some(&safari(0)), true));
/// assert!(browser_can_unified_plan(Some(BrowserName::Safari), Some(&safari(1)), true));
/// ```
#[must_use]
pub fn browser_can_unified_plan(
    name: Option<BrowserName>,
    version: Option<&BrowserVersion>,
    transceiver_current_direction: bool,
) -> bool {
    let (Some(name), Some(version)) = (name, version) else {
        return true;
    };
    match name {
        BrowserName::Chrome => version.major() >= UNIFIED_PLAN_MIN_CHROME,
        BrowserName::Firefox => version.major() >= UNIFIED_PLAN_MIN_FIREFOX,
        BrowserName::Safari => {
            let release = (version.major(), version.minor(), version.point());
            transceiver_current_direction && release != SAFARI_PLAN_B_RELEASE
        }
        _ => true,
    }
}

/// Returns whether a detected browser version is too old, or unknown.
///
/// Only Chrome, Firefox and Safari are known-good; anything else needs an
/// upgrade. A Chrome version that could not be parsed (major 0) is given
/// the benefit of the doubt.
#[must_use]
pub fn version_needs_upgrade(version: Option<&BrowserVersion>) -> bool {
    match version {
        Some(BrowserVersion::Chrome(v)) => v.major > 0 && v.major < MIN_CHROME,
        Some(BrowserVersion::Firefox(v)) => v.major < MIN_FIREFOX,
        Some(BrowserVersion::Safari(v)) => v.is_below(MIN_SAFARI.0, MIN_SAFARI.1),
        Some(BrowserVersion::Edge(_)) | None => true,
    }
}

/// Returns whether audio output selection must be disabled.
#[must_use]
pub fn audio_output_selection_disallowed(
    name: Option<BrowserName>,
    version: Option<&BrowserVersion>,
) -> bool {
    let (low, high) = FIREFOX_SINK_ID_REGRESSION;
    name == Some(BrowserName::Firefox)
        && version.is_some_and(|v| v.major() > low && v.major() < high)
}

/// Browser rules for video processing, excluding environment checks such
/// as WebGL or React Native.
#[must_use]
pub fn browser_supports_video_processing(
    provider: VideoProvider,
    name: Option<BrowserName>,
    version: Option<&BrowserVersion>,
    mobile: bool,
) -> bool {
    if mobile {
        return false;
    }
    match provider {
        VideoProvider::MediaPipe => {
            matches!(name, Some(BrowserName::Chrome | BrowserName::Firefox))
        }
        VideoProvider::Banuba => banuba_supports(name, version),
    }
}

fn banuba_supports(name: Option<BrowserName>, version: Option<&BrowserVersion>) -> bool {
    let major = version.map_or(0, BrowserVersion::major);
    match name {
        Some(BrowserName::Safari) => {
            version.is_some_and(|v| !v.is_below(BANUBA_MIN_SAFARI.0, BANUBA_MIN_SAFARI.1))
        }
        Some(BrowserName::Chrome) => major >= BANUBA_MIN_CHROME,
        Some(BrowserName::Firefox) => major >= BANUBA_MIN_FIREFOX,
        _ => false,
    }
}

/// Browser rules for audio processing, excluding environment checks such
/// as `AudioWorkletNode` or Android.
#[must_use]
pub fn browser_supports_audio_processing(
    name: Option<BrowserName>,
    version: Option<&BrowserVersion>,
) -> bool {
    match name {
        Some(BrowserName::Chrome | BrowserName::Firefox) => true,
        Some(BrowserName::Safari) => {
            version.is_some_and(|v| !v.is_below(KRISP_MIN_SAFARI.0, KRISP_MIN_SAFARI.1))
        }
        _ => false,
    }
}
