#![doc = include_str!("../README.md")]
//!
//! ## Modules
//!
//! - [`environment`] - Raw signal snapshot and signal accessors
//! - [`detection`] - Browser name and version detection
//! - [`platform`] - Operating system detection
//! - [`capability`] - Compatibility tables and rules
//! - [`canvas`] - Cached WebGL probing
//! - [`compatibility`] - Compatibility reports
//! - [`error`] - Error types
//! - [`types`] - Core type definitions

pub mod canvas;
pub mod capability;
pub mod compatibility;
pub mod detection;
pub mod environment;
pub mod error;
pub mod platform;
pub mod probe;
pub mod types;

pub use canvas::{CanvasProbe, WebGlAvailability};
pub use capability::{VideoProvider, browser_can_unified_plan};
pub use compatibility::{CapabilitySummary, CompatibilityIssue, Severity, check_compatibility};
pub use detection::{
    BROWSER_NAME_RULES, BrowserRule, detect_browser_name, detect_browser_version,
    parse_chrome_version, parse_edge_version, parse_firefox_version, parse_safari_version,
};
pub use environment::{DomFeature, Environment, Global, MediaDevices, NativeUtils, Navigator};
pub use error::{Error, Result};
pub use platform::{OsParser, UserAgentOsParser, detect_os_name};
pub use probe::Probe;
pub use types::{BrowserName, BrowserVersion, ChromeVersion, MajorMinor, OsName, SafariVersion};
