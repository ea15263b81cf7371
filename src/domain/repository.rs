//! Repository descriptors and the catalog they are collected into.

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Version-control suffix stripped from clone URLs
const VCS_SUFFIX: &str = ".git";

/// One discovered source repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryDescriptor {
    /// Catalog key and directory name under the projects root
    pub name: String,
    /// Remote locator, passed verbatim to the clone command
    pub clone_url: String,
    /// `<projects_dir>/<name>`
    pub local_dir: PathBuf,
}

impl RepositoryDescriptor {
    /// Build a descriptor from a clone URL, or `None` if no name can be derived
    pub fn from_clone_url(clone_url: &str, projects_dir: &Path) -> Option<Self> {
        let name = derive_name(clone_url)?;
        Some(Self::with_name(name, clone_url, projects_dir))
    }

    fn with_name(name: String, clone_url: &str, projects_dir: &Path) -> Self {
        let local_dir = projects_dir.join(&name);
        Self {
            name,
            clone_url: clone_url.to_string(),
            local_dir,
        }
    }
}

/// Split a clone URL into its path segments.
///
/// Handles `https://host/owner/repo.git` as well as scp-style
/// `git@host:owner/repo.git`. A `scheme://` URL yields nothing unless it
/// has a host followed by at least one path segment.
fn path_segments(clone_url: &str) -> Vec<&str> {
    let trimmed = clone_url.trim();
    let (path, has_scheme) = match trimmed.split_once("://") {
        Some((_, rest)) => (rest, true),
        None => (trimmed, false),
    };
    let segments: Vec<&str> = path
        .trim_end_matches('/')
        .split(['/', ':'])
        .filter(|s| !s.is_empty())
        .collect();
    if has_scheme && segments.len() < 2 {
        return Vec::new();
    }
    segments
}

/// Final path segment of the URL with the `.git` suffix removed
pub fn derive_name(clone_url: &str) -> Option<String> {
    let last = *path_segments(clone_url).last()?;
    let name = last.strip_suffix(VCS_SUFFIX).unwrap_or(last);
    if name.is_empty() || name == "." || name == ".." {
        return None;
    }
    Some(name.to_string())
}

/// Second-to-last path segment, usually the owning user or organization
pub fn derive_owner(clone_url: &str) -> Option<String> {
    let segments = path_segments(clone_url);
    if segments.len() < 3 {
        return None;
    }
    Some(segments[segments.len() - 2].to_string())
}

/// What happened when a clone URL was added to the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Insertion {
    /// Added under its derived name
    Added(String),
    /// Name collided with a different URL; added under an owner-qualified key
    Renamed { original: String, key: String },
    /// Same clone URL already present
    Duplicate(String),
    /// No name could be derived from the URL
    Unnamed,
}

/// Repositories discovered in one fetch, keyed by name
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    projects_dir: PathBuf,
    entries: BTreeMap<String, RepositoryDescriptor>,
}

impl Catalog {
    /// Create an empty catalog rooted at `projects_dir`
    pub fn new(projects_dir: impl Into<PathBuf>) -> Self {
        Self {
            projects_dir: projects_dir.into(),
            entries: BTreeMap::new(),
        }
    }

    /// Add a clone URL.
    ///
    /// Two different URLs deriving the same name are both kept: the later
    /// one is keyed `<owner>__<name>` so each gets its own directory.
    pub fn insert(&mut self, clone_url: &str) -> Insertion {
        let Some(name) = derive_name(clone_url) else {
            return Insertion::Unnamed;
        };

        match self.entries.get(&name) {
            None => {
                let descriptor =
                    RepositoryDescriptor::with_name(name.clone(), clone_url, &self.projects_dir);
                self.entries.insert(name.clone(), descriptor);
                Insertion::Added(name)
            }
            Some(existing) if existing.clone_url == clone_url => Insertion::Duplicate(name),
            Some(_) => {
                let owner = derive_owner(clone_url).unwrap_or_else(|| "dup".to_string());
                let mut key = format!("{}__{}", owner, name);
                let mut n = 2;
                while let Some(existing) = self.entries.get(&key) {
                    if existing.clone_url == clone_url {
                        return Insertion::Duplicate(key);
                    }
                    key = format!("{}__{}_{}", owner, name, n);
                    n += 1;
                }
                let descriptor =
                    RepositoryDescriptor::with_name(key.clone(), clone_url, &self.projects_dir);
                self.entries.insert(key.clone(), descriptor);
                Insertion::Renamed {
                    original: name,
                    key,
                }
            }
        }
    }

    pub fn projects_dir(&self) -> &Path {
        &self.projects_dir
    }

    pub fn get(&self, name: &str) -> Option<&RepositoryDescriptor> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Descriptors in name order
    pub fn iter(&self) -> impl Iterator<Item = &RepositoryDescriptor> {
        self.entries.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Split into entries that satisfy `keep` and those that don't
    pub fn partition<F>(self, mut keep: F) -> (Catalog, Vec<RepositoryDescriptor>)
    where
        F: FnMut(&RepositoryDescriptor) -> bool,
    {
        let mut kept = Catalog::new(self.projects_dir);
        let mut dropped = Vec::new();
        for (name, descriptor) in self.entries {
            if keep(&descriptor) {
                kept.entries.insert(name, descriptor);
            } else {
                dropped.push(descriptor);
            }
        }
        (kept, dropped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_name_strips_suffix() {
        assert_eq!(
            derive_name("https://github.com/golang/go.git").as_deref(),
            Some("go")
        );
        assert_eq!(
            derive_name("https://github.com/spf13/cobra").as_deref(),
            Some("cobra")
        );
        assert_eq!(
            derive_name("https://github.com/spf13/cobra.git/").as_deref(),
            Some("cobra")
        );
    }

    #[test]
    fn test_derive_name_scp_style() {
        assert_eq!(
            derive_name("git@github.com:hashicorp/terraform.git").as_deref(),
            Some("terraform")
        );
        assert_eq!(
            derive_owner("git@github.com:hashicorp/terraform.git").as_deref(),
            Some("hashicorp")
        );
    }

    #[test]
    fn test_derive_name_rejects_empty() {
        assert_eq!(derive_name(""), None);
        assert_eq!(derive_name("https://github.com/acme/.git"), None);
        assert_eq!(derive_name("https://"), None);
        assert_eq!(derive_name("https:///"), None);
    }

    #[test]
    fn test_derive_name_requires_path_after_host() {
        assert_eq!(derive_name("https://github.com"), None);
        assert_eq!(derive_name("https://github.com/"), None);
        assert_eq!(derive_owner("https://github.com/"), None);
        assert_eq!(
            derive_name("https://github.com/kubernetes").as_deref(),
            Some("kubernetes")
        );

        let mut catalog = Catalog::new("projects");
        assert_eq!(catalog.insert("https://github.com/"), Insertion::Unnamed);
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_local_dir_is_projects_dir_joined_with_name() {
        let mut catalog = Catalog::new("/work/projects");
        for url in [
            "https://github.com/a/alpha.git",
            "https://github.com/b/beta",
            "git@github.com:c/gamma.git",
        ] {
            catalog.insert(url);
        }

        assert_eq!(catalog.len(), 3);
        for descriptor in catalog.iter() {
            assert_eq!(
                descriptor.local_dir,
                Path::new("/work/projects").join(&descriptor.name)
            );
            assert!(!descriptor.name.ends_with(".git"));
        }
    }

    #[test]
    fn test_same_url_is_deduplicated() {
        let mut catalog = Catalog::new("projects");
        catalog.insert("https://github.com/a/tool.git");
        assert_eq!(
            catalog.insert("https://github.com/a/tool.git"),
            Insertion::Duplicate("tool".to_string())
        );
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_name_collision_keeps_both() {
        let mut catalog = Catalog::new("projects");
        catalog.insert("https://github.com/alice/tool.git");
        let insertion = catalog.insert("https://github.com/bob/tool.git");

        assert_eq!(
            insertion,
            Insertion::Renamed {
                original: "tool".to_string(),
                key: "bob__tool".to_string(),
            }
        );
        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog.get("tool").unwrap().clone_url,
            "https://github.com/alice/tool.git"
        );
        let renamed = catalog.get("bob__tool").unwrap();
        assert_eq!(renamed.local_dir, PathBuf::from("projects/bob__tool"));
    }

    #[test]
    fn test_partition() {
        let mut catalog = Catalog::new("projects");
        catalog.insert("https://github.com/a/keep.git");
        catalog.insert("https://github.com/a/drop.git");

        let (kept, dropped) = catalog.partition(|d| d.name != "drop");
        assert_eq!(kept.names().collect::<Vec<_>>(), vec!["keep"]);
        assert_eq!(dropped.len(), 1);
        assert_eq!(dropped[0].name, "drop");
        assert_eq!(kept.projects_dir(), Path::new("projects"));
    }
}
