//! Isolated rendering of unlocked content.
//!
//! Retrieved documents are untrusted. They are displayed through a
//! [`ContentSurface`], which swaps its entire content in one step (no
//! partial writes) and wraps the document in a fully sandboxed envelope:
//! an inline frame granted no script execution and no same-origin
//! privileges unless the policy explicitly says otherwise.

use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for rendering operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors writing to a rendering surface.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The surface's backing store failed.
    #[error("surface I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The surface refused the document.
    #[error("surface rejected the document: {0}")]
    Surface(String),
}

/// Privileges granted to rendered content. The default grants none.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SandboxPolicy {
    /// Allow the rendered document to run script.
    pub allow_scripts: bool,
    /// Allow the rendered document same-origin access to the host.
    pub allow_same_origin: bool,
}

impl SandboxPolicy {
    /// No script execution, no same-origin privileges.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            allow_scripts: false,
            allow_same_origin: false,
        }
    }

    /// The value of the envelope's `sandbox` attribute. Empty means every
    /// restriction applies.
    fn sandbox_attribute(&self) -> String {
        let mut grants = Vec::new();
        if self.allow_scripts {
            grants.push("allow-scripts");
        }
        if self.allow_same_origin {
            grants.push("allow-same-origin");
        }
        grants.join(" ")
    }
}

impl Default for SandboxPolicy {
    fn default() -> Self {
        Self::strict()
    }
}

/// An isolated display context for unlocked content.
///
/// `replace` swaps the whole surface at once, so a failed render leaves the
/// previous state untouched. One surface exists per session and is reused
/// across attempts.
pub trait ContentSurface: Send {
    /// Replaces the surface content with `document`, wrapped per the
    /// surface's sandbox policy.
    fn replace(&mut self, document: &str) -> RenderResult<()>;
}

/// Escapes a document for embedding as an inline-frame `srcdoc` attribute.
fn escape_srcdoc(document: &str) -> String {
    document
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Wraps a fetched document in a host page whose only content is a fully
/// sandboxed inline frame carrying the document.
#[must_use]
pub fn wrap_sandboxed(document: &str, policy: &SandboxPolicy) -> String {
    format!(
        "<!doctype html>\n<html>\n<body>\n\
         <iframe id=\"content-frame\" sandbox=\"{attr}\" srcdoc=\"{doc}\" \
         style=\"width:100%;min-height:400px;border:0\"></iframe>\n\
         </body>\n</html>\n",
        attr = policy.sandbox_attribute(),
        doc = escape_srcdoc(document),
    )
}

/// In-memory surface for embedding hosts and tests.
#[derive(Debug, Default)]
pub struct BufferSurface {
    policy: SandboxPolicy,
    content: Option<String>,
}

impl BufferSurface {
    /// An empty surface with the given policy.
    #[must_use]
    pub fn new(policy: SandboxPolicy) -> Self {
        Self {
            policy,
            content: None,
        }
    }

    /// The current surface content, if anything has been rendered.
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }
}

impl ContentSurface for BufferSurface {
    fn replace(&mut self, document: &str) -> RenderResult<()> {
        self.content = Some(wrap_sandboxed(document, &self.policy));
        Ok(())
    }
}

/// Writes the wrapped document to a file.
///
/// The write is staged in a temporary file in the target directory and
/// moved into place, so a failure mid-write never leaves a truncated page
/// at the destination.
#[derive(Debug)]
pub struct FileSurface {
    policy: SandboxPolicy,
    path: PathBuf,
}

impl FileSurface {
    /// A surface writing to `path` with the given policy.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, policy: SandboxPolicy) -> Self {
        Self {
            policy,
            path: path.into(),
        }
    }

    /// The destination path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ContentSurface for FileSurface {
    fn replace(&mut self, document: &str) -> RenderResult<()> {
        let wrapped = wrap_sandboxed(document, &self.policy);
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let mut staged = tempfile::NamedTempFile::new_in(dir)?;
        staged.write_all(wrapped.as_bytes())?;
        staged.flush()?;
        staged.persist(&self.path).map_err(|e| RenderError::Io(e.error))?;
        Ok(())
    }
}
