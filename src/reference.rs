//! Reference tokens for projects and project entities.
//!
//! Entities that can be referenced from markdown expose a stable token
//! (`#123` for issues, `!45` for merge requests). Prefixing the token with a
//! project's own token (`group/project`) produces a cross-project reference
//! that resolves from anywhere.

use std::fmt;

/// Entity with a stable textual reference token.
pub trait Referenceable {
    /// Returns reference token, e.g. `#123` or `group/project`.
    fn to_reference(&self) -> String;
}

/// Project entity that may or may not be referenceable.
///
/// Capability discovery replaces runtime reflection: entities with a token
/// return themselves from [`Entity::as_referenceable`].
pub trait Entity {
    /// Returns reference capability when the entity has a token.
    fn as_referenceable(&self) -> Option<&dyn Referenceable> {
        None
    }
}

/// Formats cross-project reference to `entity` owned by `owner`.
///
/// # Arguments
///
/// * `owner`: Project (or other owner) whose token prefixes the reference
/// * `entity`: Referenced entity
///
/// # Returns
///
/// Owner token followed by entity token, or empty string when the entity
/// has no reference token
pub fn cross_reference<O>(owner: &O, entity: &dyn Entity) -> String
where
    O: Referenceable + ?Sized,
{
    match entity.as_referenceable() {
        Some(referenceable) => format!("{}{}", owner.to_reference(), referenceable.to_reference()),
        None => String::new(),
    }
}

/// Project addressed by namespace and path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Project {
    namespace: String,
    path: String,
}

impl Project {
    /// Creates project from namespace and path.
    ///
    /// # Arguments
    ///
    /// * `namespace`: Group or user namespace (may contain `/` for subgroups)
    /// * `path`: Project path within namespace
    pub fn new(namespace: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            path: path.into(),
        }
    }

    /// Parses `namespace/path`, splitting at the last `/`.
    ///
    /// Returns `None` when either part is empty.
    pub fn parse(full_path: &str) -> Option<Self> {
        let full_path = full_path.trim_matches('/');
        let (namespace, path) = full_path.rsplit_once('/')?;

        if namespace.is_empty() || path.is_empty() {
            return None;
        }

        Some(Self::new(namespace, path))
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns `namespace/path`.
    pub fn full_path(&self) -> String {
        format!("{}/{}", self.namespace, self.path)
    }

    /// Returns site-absolute URL path of the project.
    pub fn url_path(&self) -> String {
        format!("/{}", self.full_path())
    }
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.path)
    }
}

impl Referenceable for Project {
    fn to_reference(&self) -> String {
        self.full_path()
    }
}

impl Entity for Project {
    fn as_referenceable(&self) -> Option<&dyn Referenceable> {
        Some(self)
    }
}

/// Issue identified by its project-scoped id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Issue {
    pub iid: u64,
}

impl Referenceable for Issue {
    fn to_reference(&self) -> String {
        format!("#{}", self.iid)
    }
}

impl Entity for Issue {
    fn as_referenceable(&self) -> Option<&dyn Referenceable> {
        Some(self)
    }
}

/// Merge request identified by its project-scoped id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MergeRequest {
    pub iid: u64,
}

impl Referenceable for MergeRequest {
    fn to_reference(&self) -> String {
        format!("!{}", self.iid)
    }
}

impl Entity for MergeRequest {
    fn as_referenceable(&self) -> Option<&dyn Referenceable> {
        Some(self)
    }
}

/// Comment on an issue or merge request. Notes have no reference token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub id: u64,
    pub body: String,
}

impl Entity for Note {}
