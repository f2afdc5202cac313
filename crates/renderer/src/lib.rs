//! Turning a selected sample into what the render targets show.
//!
//! [`Content`] owns the wording; a [`Renderer`] decides where it goes:
//! - [`MemoryTargets`]: plain strings, for embedding and tests
//! - [`FileTargets`]: HTML fragments on disk (e.g. included by a static site)
//! - [`TerminalRenderer`]: one text line on stdout
//! - `DomRenderer` (`web` feature, wasm32 only): every element with the configured class

pub mod content;
#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub mod dom;
pub mod targets;

pub use content::{Content, ATTRIBUTION_URL, NO_DATA_MESSAGE, UNIT_LABEL};
#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub use dom::DomRenderer;
pub use targets::{FileTargets, MemoryTargets, TerminalRenderer};

use carbon_config::RenderConfig;
use carbon_core::{ReportError, Result};

/// A set of zero or more render targets.
///
/// `apply` fully overwrites every target with `content` and returns how many
/// targets were written.  Applying the same content twice leaves the same
/// result as applying it once.
pub trait Renderer {
    fn apply(&mut self, content: &Content) -> Result<usize>;
}

impl<R: Renderer + ?Sized> Renderer for &mut R {
    fn apply(&mut self, content: &Content) -> Result<usize> {
        (**self).apply(content)
    }
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn apply(&mut self, content: &Content) -> Result<usize> {
        (**self).apply(content)
    }
}

/// Fans one render out to several renderers.
///
/// Every renderer is attempted even if an earlier one fails.
#[derive(Default)]
pub struct MultiRenderer {
    renderers: Vec<Box<dyn Renderer + Send>>,
}

impl MultiRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the renderers enabled in the `[render]` section.
    pub fn from_config(config: &RenderConfig) -> Self {
        let mut multi = Self::new();
        if config.terminal {
            multi.push(TerminalRenderer::stdout());
        }
        if !config.files.is_empty() {
            multi.push(FileTargets::new(config.files.clone()));
        }
        #[cfg(all(feature = "web", target_arch = "wasm32"))]
        multi.push(DomRenderer::new(config.class_name.clone()));
        multi
    }

    pub fn push(&mut self, renderer: impl Renderer + Send + 'static) {
        self.renderers.push(Box::new(renderer));
    }

    pub fn len(&self) -> usize {
        self.renderers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.renderers.is_empty()
    }
}

impl Renderer for MultiRenderer {
    fn apply(&mut self, content: &Content) -> Result<usize> {
        let mut written = 0;
        let mut failures = Vec::new();
        for renderer in &mut self.renderers {
            match renderer.apply(content) {
                Ok(n) => written += n,
                Err(e) => {
                    tracing::warn!("Render target failed: {e}");
                    failures.push(match e {
                        ReportError::Render(msg) => msg,
                        other => other.to_string(),
                    });
                }
            }
        }
        if failures.is_empty() {
            Ok(written)
        } else {
            Err(ReportError::Render(failures.join("; ")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Failing;

    struct Counting(Arc<AtomicUsize>);

    impl Renderer for Counting {
        fn apply(&mut self, _content: &Content) -> Result<usize> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(1)
        }
    }

    impl Renderer for Failing {
        fn apply(&mut self, _content: &Content) -> Result<usize> {
            Err(ReportError::Render("unavailable".into()))
        }
    }

    // Holds with `--features web` too: the DOM target only exists on wasm32.
    #[test]
    fn from_config_picks_enabled_targets() {
        let config = RenderConfig {
            terminal: false,
            files: vec![PathBuf::from("out.html")],
            ..RenderConfig::default()
        };
        assert_eq!(MultiRenderer::from_config(&config).len(), 1);

        let none = RenderConfig {
            terminal: false,
            ..RenderConfig::default()
        };
        assert!(MultiRenderer::from_config(&none).is_empty());
    }

    #[test]
    fn counts_targets_across_renderers() {
        let mut multi = MultiRenderer::new();
        multi.push(MemoryTargets::new(2));
        multi.push(MemoryTargets::new(3));
        assert_eq!(multi.apply(&Content::NoData).unwrap(), 5);
    }

    #[test]
    fn failure_does_not_stop_other_renderers() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut multi = MultiRenderer::new();
        multi.push(Failing);
        multi.push(Counting(Arc::clone(&calls)));
        let err = multi.apply(&Content::NoData).unwrap_err();
        assert_eq!(err.to_string(), "render error: unavailable");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
