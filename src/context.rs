//! Explicit rendering context passed to every markdown call.

use crate::reference::Project;

/// Markdown rendering pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Pipeline {
    /// Block level document rendering.
    #[default]
    Full,
    /// Inline rendering for titles and one-line messages; a lone paragraph
    /// wrapper is dropped.
    SingleLine,
}

/// Context describing where rendered markdown is displayed.
///
/// References and relative links only expand when a project is set.
/// Relative links additionally need a git reference; they resolve against
/// the directory of `requested_path`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderContext {
    pub project: Option<Project>,
    pub current_user: Option<String>,
    pub pipeline: Pipeline,
    pub requested_path: Option<String>,
    pub git_ref: Option<String>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates context for rendering inside `project`.
    pub fn for_project(project: Project) -> Self {
        Self {
            project: Some(project),
            ..Self::default()
        }
    }

    pub fn with_pipeline(mut self, pipeline: Pipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.current_user = Some(user.into());
        self
    }

    /// Sets git reference and file path used for relative link resolution.
    pub fn with_location(mut self, git_ref: impl Into<String>, requested_path: impl Into<String>) -> Self {
        self.git_ref = Some(git_ref.into());
        self.requested_path = Some(requested_path.into());
        self
    }
}
