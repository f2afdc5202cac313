use crate::{content::Content, Renderer};
use carbon_core::{ReportError, Result};
use std::io::Write;
use std::path::{Path, PathBuf};

/// In-memory render targets.  Handy for embedding and for tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryTargets {
    contents: Vec<String>,
    writes: usize,
}

impl MemoryTargets {
    /// `count` empty targets.
    pub fn new(count: usize) -> Self {
        Self::with_contents(vec![String::new(); count])
    }

    /// Targets pre-filled with `contents`, e.g. a placeholder.
    pub fn with_contents(contents: Vec<String>) -> Self {
        Self {
            contents,
            writes: 0,
        }
    }

    pub fn contents(&self) -> &[String] {
        &self.contents
    }

    /// Number of times `apply` ran.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl Renderer for MemoryTargets {
    fn apply(&mut self, content: &Content) -> Result<usize> {
        let html = content.to_html();
        for target in &mut self.contents {
            target.clone_from(&html);
        }
        self.writes += 1;
        Ok(self.contents.len())
    }
}

/// Overwrites each file with the HTML fragment.
///
/// Files are replaced atomically so a web server never serves half a fragment.
#[derive(Debug, Clone, Default)]
pub struct FileTargets {
    paths: Vec<PathBuf>,
}

impl FileTargets {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }
}

impl Renderer for FileTargets {
    /// Every path is attempted even if an earlier one fails.
    fn apply(&mut self, content: &Content) -> Result<usize> {
        let html = content.to_html();
        let mut failures = Vec::new();
        for path in &self.paths {
            if let Err(e) = write_atomic(path, &html) {
                failures.push(format!("'{}': {e}", path.display()));
            }
        }
        if failures.is_empty() {
            Ok(self.paths.len())
        } else {
            Err(ReportError::Render(failures.join("; ")))
        }
    }
}

fn write_atomic(path: &Path, body: &str) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(body.as_bytes())?;
    tmp.persist(path).map_err(|e| e.error)?;
    tracing::debug!("Wrote {}", path.display());
    Ok(())
}

/// Prints the plain-text summary, one line per render.
#[derive(Debug)]
pub struct TerminalRenderer<W> {
    out: W,
}

impl TerminalRenderer<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn apply(&mut self, content: &Content) -> Result<usize> {
        writeln!(self.out, "{content}")?;
        self.out.flush()?;
        Ok(1)
    }
}
