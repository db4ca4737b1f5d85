//! The environment probe.

use std::fmt;

use crate::canvas::{CanvasProbe, WebGlAvailability};
use crate::capability::{self, VideoProvider};
use crate::detection;
use crate::environment::{DomFeature, Environment, Global};
use crate::platform::{self, OsParser, UserAgentOsParser};
use crate::types::{BrowserName, BrowserVersion, ChromeVersion, MajorMinor, OsName, SafariVersion};

/// Answers capability questions about one [`Environment`] snapshot.
///
/// Every answer is recomputed from the snapshot on each call, except WebGL
/// availability, which is probed once and cached for the lifetime of the
/// probe.
///
/// # Examples
///
/// ```
/// use browser_probe::{BrowserName, Environment, MediaDevices, Probe};
///
/// let probe = Probe::new(
///     Environment::browser(
///         "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) \
///          Chrome/120.0.6099.109 Safari/537.36",
///     )
///     .with_media_devices(MediaDevices::FULL),
/// );
///
/// assert_eq!(probe.browser_name(), Some(BrowserName::Chrome));
/// assert!(probe.is_screen_sharing_supported());
/// assert!(!probe.browser_needs_upgrade());
/// ```
pub struct Probe {
    env: Environment,
    os_parser: Box<dyn OsParser + Send + Sync>,
    webgl: WebGlAvailability,
}

impl Probe {
    /// Creates a probe with the default OS parser and a WebGL probe that
    /// reads the snapshot.
    #[must_use]
    pub fn new(env: Environment) -> Self {
        let webgl = WebGlAvailability::new(env.clone());
        Self {
            env,
            os_parser: Box::new(UserAgentOsParser),
            webgl,
        }
    }

    /// Replaces the OS parser.
    #[must_use]
    pub fn with_os_parser(mut self, parser: impl OsParser + Send + Sync + 'static) -> Self {
        self.os_parser = Box::new(parser);
        self
    }

    /// Replaces the WebGL probe.
    #[must_use]
    pub fn with_canvas_probe(mut self, probe: impl CanvasProbe + Send + Sync + 'static) -> Self {
        self.webgl = WebGlAvailability::new(probe);
        self
    }

    /// Returns the snapshot this probe reads.
    #[must_use]
    pub fn environment(&self) -> &Environment {
        &self.env
    }

    // Signals

    /// See [`Environment::user_agent`].
    #[must_use]
    pub fn user_agent(&self) -> &str {
        self.env.user_agent()
    }

    /// See [`Environment::max_touch_points`].
    #[must_use]
    pub fn max_touch_points(&self) -> u32 {
        self.env.max_touch_points()
    }

    /// See [`Environment::is_react_native`].
    #[must_use]
    pub fn is_react_native(&self) -> bool {
        self.env.is_react_native()
    }

    /// See [`Environment::is_browser_mobile`].
    #[must_use]
    pub fn is_browser_mobile(&self) -> bool {
        self.env.is_browser_mobile()
    }

    // Identity

    /// See [`detection::detect_browser_name`].
    #[must_use]
    pub fn browser_name(&self) -> Option<BrowserName> {
        detection::detect_browser_name(&self.env)
    }

    /// See [`detection::detect_browser_version`].
    #[must_use]
    pub fn browser_version(&self) -> Option<BrowserVersion> {
        detection::detect_browser_version(&self.env)
    }

    /// See [`detection::detect_chrome_version`].
    #[must_use]
    pub fn chrome_version(&self) -> ChromeVersion {
        detection::detect_chrome_version(&self.env)
    }

    /// See [`detection::detect_safari_version`].
    #[must_use]
    pub fn safari_version(&self) -> SafariVersion {
        detection::detect_safari_version(&self.env)
    }

    /// See [`detection::detect_firefox_version`].
    #[must_use]
    pub fn firefox_version(&self) -> MajorMinor {
        detection::detect_firefox_version(&self.env)
    }

    /// See [`detection::detect_edge_version`].
    #[must_use]
    pub fn edge_version(&self) -> MajorMinor {
        detection::detect_edge_version(&self.env)
    }

    /// See [`platform::detect_os_name`].
    #[must_use]
    pub fn os_name(&self) -> OsName {
        platform::detect_os_name(&self.env, self.os_parser.as_ref())
    }

    // Capabilities

    /// Returns `true` if this environment may share its screen.
    ///
    /// Screen sharing is limited to Unified Plan browsers so receivers can
    /// rely on a single inbound video track from Plan B senders.
    #[must_use]
    pub fn is_screen_sharing_supported(&self) -> bool {
        self.env.is_display_media_accessible()
            && (self.can_unified_plan() || self.is_react_native())
    }

    /// Returns `true` if this browser can negotiate Unified Plan SDP.
    #[must_use]
    pub fn can_unified_plan(&self) -> bool {
        capability::browser_can_unified_plan(
            self.browser_name(),
            self.browser_version().as_ref(),
            self.env.has_feature(DomFeature::TransceiverCurrentDirection),
        )
    }

    /// Returns `true` if the browser is too old or not recognized.
    #[must_use]
    pub fn browser_needs_upgrade(&self) -> bool {
        if self.user_agent().is_empty() {
            return true;
        }
        capability::version_needs_upgrade(self.browser_version().as_ref())
    }

    /// Returns `true` if camera and microphone can be used.
    #[must_use]
    pub fn browser_video_supported(&self) -> bool {
        self.env.is_user_media_accessible() && !self.browser_needs_upgrade()
    }

    /// Returns `true` if an iframe can go fullscreen.
    #[must_use]
    pub fn is_fullscreen_supported(&self) -> bool {
        if self.is_react_native() || !self.env.has_global(Global::Document) {
            return false;
        }
        self.env.has_feature(DomFeature::RequestFullscreen)
            || self.env.has_feature(DomFeature::WebkitRequestFullscreen)
    }

    /// Returns `true` if a WebGL2 context can be created.
    ///
    /// Probed on the first call and cached afterwards.
    pub fn is_webgl_available(&self) -> bool {
        self.webgl.is_available()
    }

    /// Returns `true` if background effects can run with `provider`.
    pub fn is_video_processing_supported(&self, provider: VideoProvider) -> bool {
        if self.is_react_native() || !self.is_webgl_available() {
            return false;
        }
        capability::browser_supports_video_processing(
            provider,
            self.browser_name(),
            self.browser_version().as_ref(),
            self.is_browser_mobile(),
        )
    }

    /// Returns `true` if the Banuba effects SDK can be loaded.
    pub fn can_load_banuba(&self) -> bool {
        self.is_webgl_available()
            && capability::browser_supports_video_processing(
                VideoProvider::Banuba,
                self.browser_name(),
                self.browser_version().as_ref(),
                self.is_browser_mobile(),
            )
    }

    /// Returns `true` if noise cancellation can run.
    #[must_use]
    pub fn is_audio_processing_supported(&self) -> bool {
        if self.is_react_native()
            || self.env.is_android_web()
            || !self.env.has_global(Global::AudioWorkletNode)
        {
            return false;
        }
        capability::browser_supports_audio_processing(
            self.browser_name(),
            self.browser_version().as_ref(),
        )
    }

    /// Returns `true` if local audio levels can be observed.
    #[must_use]
    pub fn browser_supports_local_audio_level_observers(&self) -> bool {
        self.env.has_global(Global::AudioWorkletNode)
    }

    /// Returns `true` if choosing an audio output device must be disabled.
    #[must_use]
    pub fn is_audio_output_selection_disallowed(&self) -> bool {
        capability::audio_output_selection_disallowed(
            self.browser_name(),
            self.browser_version().as_ref(),
        )
    }
}

impl fmt::Debug for Probe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Probe")
            .field("env", &self.env)
            .field("webgl", &self.webgl)
            .finish_non_exhaustive()
    }
}
