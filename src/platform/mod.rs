//! Operating system detection.
//!
//! Inside a wrapped native app the OS comes from the native bridge.
//! Everywhere else the user agent is handed to an [`OsParser`] and its
//! answer is mapped onto [`OsName`].

use crate::environment::{Environment, Global};
use crate::error::Result;
use crate::types::OsName;

mod user_agent;

pub use user_agent::UserAgentOsParser;

/// Extracts an operating system name from a user agent string.
///
/// Implementations may report any name; well-known names (`macOS`,
/// `Windows`, `Linux`, `iOS`, `Android`) are mapped onto [`OsName`]
/// variants and everything else is passed through.
pub trait OsParser {
    /// Returns the OS name for `user_agent`, or an empty string when the
    /// OS is not recognized.
    ///
    /// # Errors
    ///
    /// Returns an error if the user agent cannot be parsed.
    fn os_name(&self, user_agent: &str) -> Result<String>;
}

/// Detects the operating system.
///
/// Never fails: parser errors are logged and reported as
/// [`OsName::Unknown`]. In React Native the native bridge is consulted
/// instead of the parser, and only when a `window` is present.
///
/// # Examples
///
/// ```
/// use browser_probe::{Environment, NativeUtils, OsName};
/// use browser_probe::platform::{detect_os_name, UserAgentOsParser};
///
/// let env = Environment::react_native(Some(NativeUtils::for_platform("ios")));
/// assert_eq!(detect_os_name(&env, &UserAgentOsParser), OsName::Ios);
///
/// let env = Environment::browser("Mozilla/5.0 (Windows NT 10.0; Win64; x64)");
/// assert_eq!(detect_os_name(&env, &UserAgentOsParser), OsName::Windows);
/// ```
pub fn detect_os_name(env: &Environment, parser: &(impl OsParser + ?Sized)) -> OsName {
    if env.is_react_native() {
        return native_os_name(env);
    }

    let user_agent = env.user_agent();
    if user_agent.is_empty() {
        return OsName::Unknown;
    }
    match parser.os_name(user_agent) {
        Ok(name) => OsName::from_raw(&name),
        Err(err) => {
            tracing::warn!(error = %err, "OS parser failed");
            OsName::Unknown
        }
    }
}

// The bridge is only read with a window present, like the navigator.
fn native_os_name(env: &Environment) -> OsName {
    if !env.has_global(Global::Window) {
        return OsName::Unknown;
    }
    let os = env
        .native_utils
        .as_ref()
        .and_then(|utils| utils.platform.as_ref())
        .and_then(|platform| platform.os.as_deref());
    match os {
        Some("ios") => OsName::Ios,
        Some("android") => OsName::Android,
        Some(other) => OsName::from_raw(other),
        None => OsName::Unknown,
    }
}
