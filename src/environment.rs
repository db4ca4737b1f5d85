//! Raw signal snapshot of a browser-like host environment.
//!
//! An [`Environment`] records what the host exposes at the moment of the
//! snapshot: the navigator, which globals exist, which DOM features are
//! present, and the native bridge object of a wrapped native app. All
//! detection in this crate reads from a snapshot and nothing else.
//!
//! Snapshots can be built in code or loaded from JSON or YAML:
//!
//! ```
//! use browser_probe::{Environment, Global};
//!
//! let env = Environment::from_yaml(
//!     "
//! globals: [window, document]
//! navigator:
//!   userAgent: Mozilla/5.0 (X11; Linux x86_64; rv:120.0) Gecko/20100101 Firefox/120.0
//! ",
//! )
//! .unwrap();
//! assert!(env.has_global(Global::Window));
//! assert!(env.user_agent().contains("Firefox/120.0"));
//! ```

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// `navigator.product` value reported by React Native.
pub const REACT_NATIVE_PRODUCT: &str = "ReactNative";

/// WebKit build shipped by Safari and WKWebView on recent Apple platforms.
const APPLE_ENGINE_TOKEN: &str = "AppleWebKit/605.1.15";

/// Minimum touch points reported by iPhone and iPad.
const IOS_MIN_TOUCH_POINTS: u32 = 5;

static IOS_DEVICE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)iPad|iPhone|iPod").expect("valid iOS device pattern"));

/// Global identifiers whose presence is a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Global {
    /// `window`
    Window,
    /// `document`
    Document,
    /// `RTCRtpTransceiver`
    #[serde(rename = "RTCRtpTransceiver")]
    RtcRtpTransceiver,
    /// `AudioWorkletNode`
    #[serde(rename = "AudioWorkletNode")]
    AudioWorkletNode,
}

/// DOM properties and behaviors whose presence is a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DomFeature {
    /// `RTCRtpTransceiver.prototype` has an own `currentDirection` property.
    TransceiverCurrentDirection,
    /// An `<iframe>` exposes `requestFullscreen`.
    RequestFullscreen,
    /// An `<iframe>` exposes `webkitRequestFullscreen`.
    WebkitRequestFullscreen,
    /// A fresh `<canvas>` yields a `webgl2` context.
    Webgl2,
}

/// Media device entry points exposed on `navigator.mediaDevices`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MediaDevices {
    /// `getUserMedia` is present.
    pub get_user_media: bool,
    /// `getDisplayMedia` is present.
    pub get_display_media: bool,
}

impl MediaDevices {
    /// Both camera/microphone and display capture.
    pub const FULL: Self = Self {
        get_user_media: true,
        get_display_media: true,
    };
}

/// The `navigator` object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Navigator {
    /// `navigator.userAgent`
    pub user_agent: Option<String>,
    /// `navigator.product`
    pub product: Option<String>,
    /// `navigator.maxTouchPoints`
    pub max_touch_points: Option<u32>,
    /// `navigator.mediaDevices`
    pub media_devices: Option<MediaDevices>,
}

/// `DailyNativeUtils.platform`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NativePlatform {
    /// Platform OS identifier, e.g. `ios` or `android`.
    #[serde(rename = "OS")]
    pub os: Option<String>,
}

/// Native bridge object installed by a wrapped native app shell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NativeUtils {
    /// `isIOS`
    #[serde(rename = "isIOS")]
    pub is_ios: Option<bool>,
    /// `isAndroid`
    #[serde(rename = "isAndroid")]
    pub is_android: Option<bool>,
    /// `platform`
    pub platform: Option<NativePlatform>,
}

impl NativeUtils {
    /// Creates a bridge reporting the given platform OS.
    #[must_use]
    pub fn for_platform(os: impl Into<String>) -> Self {
        Self {
            platform: Some(NativePlatform {
                os: Some(os.into()),
            }),
            ..Self::default()
        }
    }
}

/// A read-only snapshot of the host environment.
///
/// The default snapshot is empty: no globals, no navigator, no bridge. That
/// describes a non-browser embedding and every accessor returns its
/// documented default for it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Environment {
    /// The `navigator` object, if any.
    pub navigator: Option<Navigator>,
    /// Globals present in the host.
    pub globals: BTreeSet<Global>,
    /// DOM features present in the host.
    pub features: BTreeSet<DomFeature>,
    /// `DailyNativeUtils`, if installed.
    #[serde(rename = "DailyNativeUtils")]
    pub native_utils: Option<NativeUtils>,
}

impl Environment {
    /// A browser window with `document` and the given user agent.
    ///
    /// No media devices, optional globals or DOM features are present;
    /// add them with the `with_*` methods.
    ///
    /// # Examples
    ///
    /// ```
    /// use browser_probe::{Environment, MediaDevices};
    ///
    /// let env = Environment::browser("Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X)")
    ///     .with_media_devices(MediaDevices::FULL);
    /// assert!(env.is_ios());
    /// assert!(env.is_supported_ios_environment());
    /// ```
    #[must_use]
    pub fn browser(user_agent: impl Into<String>) -> Self {
        Self {
            navigator: Some(Navigator {
                user_agent: Some(user_agent.into()),
                ..Navigator::default()
            }),
            globals: BTreeSet::from([Global::Window, Global::Document]),
            ..Self::default()
        }
    }

    /// A React Native host, with the given native bridge.
    #[must_use]
    pub fn react_native(native_utils: Option<NativeUtils>) -> Self {
        Self {
            navigator: Some(Navigator {
                product: Some(REACT_NATIVE_PRODUCT.to_string()),
                ..Navigator::default()
            }),
            globals: BTreeSet::from([Global::Window]),
            native_utils,
            ..Self::default()
        }
    }

    /// Loads a snapshot from JSON.
    ///
    /// # Errors
    ///
    /// Returns `Error::JsonParse` if the input is not a valid snapshot.
    pub fn from_json(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// Loads a snapshot from YAML.
    ///
    /// # Errors
    ///
    /// Returns `Error::YamlParse` if the input is not a valid snapshot.
    pub fn from_yaml(input: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(input)?)
    }

    /// Adds a global.
    #[must_use]
    pub fn with_global(mut self, global: Global) -> Self {
        self.globals.insert(global);
        self
    }

    /// Removes a global.
    #[must_use]
    pub fn without_global(mut self, global: Global) -> Self {
        self.globals.remove(&global);
        self
    }

    /// Adds a DOM feature.
    #[must_use]
    pub fn with_feature(mut self, feature: DomFeature) -> Self {
        self.features.insert(feature);
        self
    }

    /// Sets `navigator.mediaDevices`, creating the navigator if needed.
    #[must_use]
    pub fn with_media_devices(mut self, media_devices: MediaDevices) -> Self {
        let navigator = self.navigator.get_or_insert_with(Navigator::default);
        navigator.media_devices = Some(media_devices);
        self
    }

    /// Sets `navigator.maxTouchPoints`, creating the navigator if needed.
    #[must_use]
    pub fn with_max_touch_points(mut self, points: u32) -> Self {
        let navigator = self.navigator.get_or_insert_with(Navigator::default);
        navigator.max_touch_points = Some(points);
        self
    }

    /// Installs a native bridge.
    #[must_use]
    pub fn with_native_utils(mut self, native_utils: NativeUtils) -> Self {
        self.native_utils = Some(native_utils);
        self
    }

    /// Returns `true` if the global is present.
    #[must_use]
    pub fn has_global(&self, global: Global) -> bool {
        self.globals.contains(&global)
    }

    /// Returns `true` if the DOM feature is present.
    #[must_use]
    pub fn has_feature(&self, feature: DomFeature) -> bool {
        self.features.contains(&feature)
    }

    /// Returns `true` when running inside React Native.
    ///
    /// In this mode browser globals may belong to the embedding app rather
    /// than describe the runtime, so the user agent and touch points are
    /// not trusted.
    #[must_use]
    pub fn is_react_native(&self) -> bool {
        self.navigator
            .as_ref()
            .and_then(|n| n.product.as_deref())
            .is_some_and(|product| product == REACT_NATIVE_PRODUCT)
    }

    /// Returns `true` in React Native with `RTCRtpTransceiver` available.
    #[must_use]
    pub fn is_react_native_unified_plan(&self) -> bool {
        self.is_react_native() && self.has_global(Global::RtcRtpTransceiver)
    }

    /// The native bridge's `isIOS` flag; `false` when absent.
    #[must_use]
    pub fn is_react_native_ios(&self) -> bool {
        self.native_utils
            .as_ref()
            .and_then(|utils| utils.is_ios)
            .unwrap_or(false)
    }

    /// The native bridge's `isAndroid` flag; `false` when absent.
    #[must_use]
    pub fn is_react_native_android(&self) -> bool {
        self.native_utils
            .as_ref()
            .and_then(|utils| utils.is_android)
            .unwrap_or(false)
    }

    /// Navigator fields that describe the runtime itself.
    ///
    /// `None` without a window, or in React Native.
    fn trusted_navigator(&self) -> Option<&Navigator> {
        if self.is_react_native() || !self.has_global(Global::Window) {
            return None;
        }
        self.navigator.as_ref()
    }

    /// The user agent string, or `""` when unavailable.
    #[must_use]
    pub fn user_agent(&self) -> &str {
        self.trusted_navigator()
            .and_then(|n| n.user_agent.as_deref())
            .unwrap_or("")
    }

    /// `navigator.maxTouchPoints`, or 0 when unavailable.
    #[must_use]
    pub fn max_touch_points(&self) -> u32 {
        self.trusted_navigator()
            .and_then(|n| n.max_touch_points)
            .unwrap_or(0)
    }

    fn media_devices(&self) -> Option<&MediaDevices> {
        self.navigator.as_ref()?.media_devices.as_ref()
    }

    /// Returns `true` if `getUserMedia` is available.
    #[must_use]
    pub fn is_user_media_accessible(&self) -> bool {
        self.media_devices().is_some_and(|m| m.get_user_media)
    }

    /// Returns `true` if `getDisplayMedia` is available.
    #[must_use]
    pub fn is_display_media_accessible(&self) -> bool {
        self.media_devices().is_some_and(|m| m.get_display_media)
    }

    /// Returns `true` if the user agent names an iPad, iPhone or iPod.
    #[must_use]
    pub fn is_ios(&self) -> bool {
        IOS_DEVICE.is_match(self.user_agent())
    }

    /// Mobile Safari or WKWebView on iOS with camera access.
    #[must_use]
    pub fn is_supported_ios_environment(&self) -> bool {
        self.is_ios() && self.is_user_media_accessible()
    }

    /// Returns `true` if the user agent reports Apple's current WebKit
    /// build, as Safari, Ionic and WKWebView shells do even when they omit
    /// a mobile or Safari token.
    #[must_use]
    pub fn is_supported_apple_engine(&self) -> bool {
        self.user_agent().contains(APPLE_ENGINE_TOKEN)
    }

    /// Returns `true` inside the Android app shell.
    #[must_use]
    pub fn is_android_app(&self) -> bool {
        self.user_agent().contains("DailyAnd/")
    }

    /// Returns `true` for a browser running on Android.
    #[must_use]
    pub fn is_android_web(&self) -> bool {
        self.user_agent().contains("Linux; Android")
    }

    /// Returns `true` for phones, tablets and the Android app shell.
    ///
    /// iPads in desktop mode report a `Macintosh` user agent; they are told
    /// apart from Macs by their touch points.
    #[must_use]
    pub fn is_browser_mobile(&self) -> bool {
        let user_agent = self.user_agent();
        let ios_mobile =
            user_agent.contains("Mac") && self.max_touch_points() >= IOS_MIN_TOUCH_POINTS;
        user_agent.contains("Mobi")
            || user_agent.contains("Android")
            || ios_mobile
            || self.is_android_app()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IPAD_DESKTOP_UA: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
        AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Safari/605.1.15";
    const PIXEL_UA: &str = "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 \
        (KHTML, like Gecko) Chrome/120.0.0.0 Mobile Safari/537.36";

    #[test]
    fn empty_environment_returns_defaults() {
        let env = Environment::default();
        assert_eq!(env.user_agent(), "");
        assert_eq!(env.max_touch_points(), 0);
        assert!(!env.is_react_native());
        assert!(!env.is_react_native_ios());
        assert!(!env.is_react_native_android());
        assert!(!env.is_user_media_accessible());
        assert!(!env.is_display_media_accessible());
        assert!(!env.is_ios());
        assert!(!env.is_browser_mobile());
    }

    #[test]
    fn navigator_without_window_is_ignored() {
        let env = Environment::browser("Chrome/120.0.0.0").without_global(Global::Window);
        assert_eq!(env.user_agent(), "");
    }

    #[test]
    fn react_native_hides_user_agent_and_touch_points() {
        let mut env = Environment::react_native(None).with_max_touch_points(5);
        if let Some(navigator) = env.navigator.as_mut() {
            navigator.user_agent = Some("Mozilla/5.0 (iPhone)".into());
        }

        assert!(env.is_react_native());
        assert_eq!(env.user_agent(), "");
        assert_eq!(env.max_touch_points(), 0);
        assert!(!env.is_ios());
    }

    #[test]
    fn react_native_unified_plan_needs_transceiver() {
        let env = Environment::react_native(None);
        assert!(!env.is_react_native_unified_plan());
        let env = env.with_global(Global::RtcRtpTransceiver);
        assert!(env.is_react_native_unified_plan());
    }

    #[test]
    fn native_bridge_flags() {
        let utils = NativeUtils {
            is_ios: Some(true),
            ..NativeUtils::default()
        };
        let env = Environment::react_native(Some(utils));
        assert!(env.is_react_native_ios());
        assert!(!env.is_react_native_android());
    }

    #[test]
    fn ipad_in_desktop_mode_is_mobile() {
        let env = Environment::browser(IPAD_DESKTOP_UA);
        assert!(!env.is_browser_mobile());

        let env = env.with_max_touch_points(5);
        assert!(env.is_browser_mobile());
    }

    #[test]
    fn android_detection() {
        let env = Environment::browser(PIXEL_UA);
        assert!(env.is_android_web());
        assert!(!env.is_android_app());
        assert!(env.is_browser_mobile());

        let app = Environment::browser("DailyAnd/1.2.3");
        assert!(app.is_android_app());
        assert!(app.is_browser_mobile());
    }

    #[test]
    fn ios_match_is_case_insensitive() {
        let env = Environment::browser("some-shell ipad build");
        assert!(env.is_ios());
        assert!(!env.is_supported_ios_environment());
    }

    #[test]
    fn apple_engine_token() {
        assert!(Environment::browser(IPAD_DESKTOP_UA).is_supported_apple_engine());
        let blink = Environment::browser("Mozilla/5.0 AppleWebKit/537.36");
        assert!(!blink.is_supported_apple_engine());
    }

    #[test]
    fn loads_json_snapshot() {
        let env = Environment::from_json(
            r#"{
                "globals": ["window", "document", "AudioWorkletNode"],
                "features": ["webgl2"],
                "navigator": {
                    "userAgent": "Mozilla/5.0 Firefox/120.0",
                    "maxTouchPoints": 0,
                    "mediaDevices": { "getUserMedia": true }
                }
            }"#,
        )
        .unwrap();

        assert!(env.has_global(Global::AudioWorkletNode));
        assert!(env.has_feature(DomFeature::Webgl2));
        assert!(env.is_user_media_accessible());
        assert!(!env.is_display_media_accessible());
    }

    #[test]
    fn loads_native_bridge_from_yaml() {
        let env = Environment::from_yaml(
            "
globals: [window]
navigator:
  product: ReactNative
DailyNativeUtils:
  isAndroid: true
  platform:
    OS: android
",
        )
        .unwrap();

        assert!(env.is_react_native());
        assert!(env.is_react_native_android());
        assert_eq!(
            env,
            Environment::react_native(Some(NativeUtils {
                is_android: Some(true),
                ..NativeUtils::for_platform("android")
            }))
        );
    }

    #[test]
    fn invalid_snapshot_is_an_error() {
        let result = Environment::from_json("{\"globals\": 3}");
        assert!(matches!(result, Err(crate::Error::JsonParse(_))));
    }
}
