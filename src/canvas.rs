//! WebGL availability probing.
//!
//! Probing creates and discards a rendering surface, so the answer is
//! computed at most once per [`WebGlAvailability`] and cached afterwards.

use std::fmt;
use std::sync::OnceLock;

use crate::environment::{DomFeature, Environment, Global};
use crate::error::{Error, Result};

/// Creates a throwaway canvas and asks it for a WebGL2 context.
pub trait CanvasProbe {
    /// Returns whether a `webgl2` context could be created.
    ///
    /// # Errors
    ///
    /// Returns an error if the probe itself could not run.
    fn probe_webgl2(&self) -> Result<bool>;
}

impl CanvasProbe for Environment {
    fn probe_webgl2(&self) -> Result<bool> {
        if !self.has_global(Global::Document) {
            return Err(Error::MissingGlobal("document"));
        }
        Ok(self.has_feature(DomFeature::Webgl2))
    }
}

/// Lazily probed, then cached, WebGL2 availability.
pub struct WebGlAvailability {
    probe: Box<dyn CanvasProbe + Send + Sync>,
    available: OnceLock<bool>,
}

impl WebGlAvailability {
    /// Wraps a probe. Nothing runs until [`is_available`](Self::is_available).
    #[must_use]
    pub fn new(probe: impl CanvasProbe + Send + Sync + 'static) -> Self {
        Self {
            probe: Box::new(probe),
            available: OnceLock::new(),
        }
    }

    /// Returns whether WebGL2 is available, running the probe on first use.
    ///
    /// A failing probe counts as unavailable.
    pub fn is_available(&self) -> bool {
        *self
            .available
            .get_or_init(|| match self.probe.probe_webgl2() {
                Ok(available) => available,
                Err(err) => {
                    tracing::debug!(error = %err, "WebGL probe failed");
                    false
                }
            })
    }

    /// Returns the cached answer without probing.
    #[must_use]
    pub fn cached(&self) -> Option<bool> {
        self.available.get().copied()
    }
}

impl fmt::Debug for WebGlAvailability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebGlAvailability")
            .field("available", &self.available.get())
            .finish_non_exhaustive()
    }
}
