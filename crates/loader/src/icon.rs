//! Icon reference normalization.

use std::path::{Component, Path, PathBuf};

use nebula_node::{CredentialDescription, Icon, NodeDescription};

/// Rewrites `file:` icon references into registry URLs of the form
/// `icons/<namespace>/<path relative to the loader directory>`.
///
/// Pure: only paths are inspected, the filesystem is never touched.
#[derive(Debug, Clone, Copy)]
pub struct IconPathResolver<'a> {
    directory: &'a Path,
    namespace: &'a str,
}

impl<'a> IconPathResolver<'a> {
    /// Resolver for components found under `directory` in `namespace`.
    pub fn new(directory: &'a Path, namespace: &'a str) -> Self {
        Self {
            directory,
            namespace,
        }
    }

    /// The registry URL for a file reference declared by the component at
    /// `source`. The `file:` prefix is optional.
    pub fn url(&self, reference: &str, source: &Path) -> String {
        let file = reference
            .strip_prefix(Icon::FILE_PREFIX)
            .unwrap_or(reference);
        let parent = source.parent().unwrap_or_else(|| Path::new(""));
        let icon = lexical_normalize(&parent.join(file));
        let relative = relative_to(&icon, &lexical_normalize(self.directory));
        format!("icons/{}/{}", self.namespace, relative)
    }

    /// Normalize a node descriptor in place.
    pub fn normalize_node(&self, description: &mut NodeDescription, source: &Path) {
        self.normalize(&mut description.icon, &mut description.icon_url, source);
    }

    /// Normalize a credential descriptor in place.
    pub fn normalize_credential(&self, description: &mut CredentialDescription, source: &Path) {
        self.normalize(&mut description.icon, &mut description.icon_url, source);
    }

    fn normalize(&self, icon: &mut Option<Icon>, icon_url: &mut Option<Icon>, source: &Path) {
        let rewritten = match icon.as_ref() {
            Some(Icon::Single(reference)) if is_file(reference) => {
                Icon::Single(self.url(reference, source))
            }
            Some(Icon::Themed { light, dark }) if is_file(light) && is_file(dark) => Icon::Themed {
                light: self.url(light, source),
                dark: self.url(dark, source),
            },
            _ => return,
        };
        *icon_url = Some(rewritten);
        *icon = None;
    }
}

fn is_file(reference: &str) -> bool {
    reference.starts_with(Icon::FILE_PREFIX)
}

/// Resolve `.` and `..` components without touching the filesystem.
fn lexical_normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(out.components().next_back(), Some(Component::Normal(_))) {
                    out.pop();
                } else if !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// `path` relative to `base`, joined with `/` on every platform.
fn relative_to(path: &Path, base: &Path) -> String {
    let path: Vec<Component<'_>> = path.components().collect();
    let base: Vec<Component<'_>> = base.components().collect();
    let common = path
        .iter()
        .zip(&base)
        .take_while(|(a, b)| a == b)
        .count();

    let ups = std::iter::repeat_n("..".to_owned(), base.len() - common);
    let rest = path[common..]
        .iter()
        .map(|c| c.as_os_str().to_string_lossy().into_owned());
    ups.chain(rest).collect::<Vec<_>>().join("/")
}
