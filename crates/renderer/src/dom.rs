//! Browser render target.

use crate::{content::Content, Renderer};
use carbon_core::{ReportError, Result};

/// Replaces the inner HTML of every element carrying `class_name`.
#[derive(Debug, Clone)]
pub struct DomRenderer {
    class_name: String,
}

impl DomRenderer {
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
        }
    }
}

impl Renderer for DomRenderer {
    fn apply(&mut self, content: &Content) -> Result<usize> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| ReportError::Render("no document available".into()))?;

        let html = content.to_html();
        let targets = document.get_elements_by_class_name(&self.class_name);
        let count = targets.length();
        for i in 0..count {
            if let Some(element) = targets.item(i) {
                element.set_inner_html(&html);
            }
        }
        Ok(count as usize)
    }
}
