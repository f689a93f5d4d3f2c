//! Packaging: strip ignored files, then zip the plugin tree.
//!
//! Stripping is destructive and happens in place on the working copy.

use crate::error::{LifecycleError, Result};
use crate::planner::plan;
use bitcart_core::Manifest;
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;
use zip::CompressionMethod;
use zip::write::{SimpleFileOptions, ZipWriter};

/// Extension of packaged plugins.
pub const PACKAGE_EXTENSION: &str = "bitcart";

const IGNORE_FILE: &str = ".gitignore";

/// Ignore rules collected from every `.gitignore` in a tree.
///
/// Each file is rooted at its own directory. For a given path the deepest
/// file with an opinion decides, so nested files override their parents.
#[derive(Debug)]
pub struct IgnoreRules {
    // Deepest directory first.
    matchers: Vec<(PathBuf, Gitignore)>,
}

impl IgnoreRules {
    /// Reads every `.gitignore` under `root`, without following symlinks.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::Ignore`] if a file cannot be read or parsed.
    pub fn discover(root: &Path) -> Result<Self> {
        let mut matchers = Vec::new();
        for entry in WalkDir::new(root) {
            let entry = entry.map_err(io::Error::from)?;
            if !entry.file_type().is_file() || entry.file_name() != IGNORE_FILE {
                continue;
            }

            let file = entry.path();
            let dir = file.parent().unwrap_or(root).to_path_buf();
            let ignore_err = |e: ignore::Error| LifecycleError::Ignore {
                path: file.to_path_buf(),
                reason: e.to_string(),
            };

            let mut builder = GitignoreBuilder::new(&dir);
            if let Some(e) = builder.add(file) {
                return Err(ignore_err(e));
            }
            let matcher = builder.build().map_err(ignore_err)?;
            debug!("Loaded {} rules from {}", matcher.num_ignores(), file.display());
            matchers.push((dir, matcher));
        }

        matchers.sort_by_key(|(dir, _)| std::cmp::Reverse(dir.components().count()));
        Ok(Self { matchers })
    }

    /// Returns true if `path` is ignored.
    #[must_use]
    pub fn is_ignored(&self, path: &Path, is_dir: bool) -> bool {
        self.matchers
            .iter()
            .filter(|(dir, _)| path != dir && path.starts_with(dir))
            .map(|(_, matcher)| matcher.matched(path, is_dir))
            .find(|verdict| !verdict.is_none())
            .is_some_and(|verdict| verdict.is_ignore())
    }
}

/// Deletes every entry under `root` matched by its ignore rules.
///
/// Matched directories are removed whole without being descended into.
/// Returns the removed paths in walk order.
///
/// # Errors
///
/// Returns an error if the rules cannot be read or an entry cannot be removed.
pub fn strip(root: &Path) -> Result<Vec<PathBuf>> {
    let rules = IgnoreRules::discover(root)?;

    let mut matched = Vec::new();
    let mut walker = WalkDir::new(root).min_depth(1).sort_by_file_name().into_iter();
    while let Some(entry) = walker.next() {
        let entry = entry.map_err(io::Error::from)?;
        let is_dir = entry.file_type().is_dir();
        if rules.is_ignored(entry.path(), is_dir) {
            if is_dir {
                walker.skip_current_dir();
            }
            matched.push((entry.into_path(), is_dir));
        }
    }

    for (path, is_dir) in &matched {
        if *is_dir {
            fs::remove_dir_all(path)?;
        } else {
            fs::remove_file(path)?;
        }
        debug!("Stripped {}", path.display());
    }

    Ok(matched.into_iter().map(|(path, _)| path).collect())
}

/// Writes a deflate-compressed zip of `root` to `out`.
///
/// Entry names are relative to `root` with `/` separators. The archive itself
/// and symlinks are left out. Returns the number of files written.
///
/// # Errors
///
/// Returns [`LifecycleError::Archive`] if the archive cannot be written.
pub fn archive(root: &Path, out: &Path) -> Result<usize> {
    let archive_err = |reason: String| LifecycleError::Archive {
        path: out.to_path_buf(),
        reason,
    };

    let file = File::create(out).map_err(|e| archive_err(e.to_string()))?;
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut files = 0;
    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(io::Error::from)?;
        let path = entry.path();
        let file_type = entry.file_type();
        if path == out || file_type.is_symlink() {
            continue;
        }

        let name = entry_name(root, path);
        if file_type.is_dir() {
            writer
                .add_directory(name, options)
                .map_err(|e| archive_err(e.to_string()))?;
        } else {
            writer
                .start_file(name, options.unix_permissions(file_mode(path)?))
                .map_err(|e| archive_err(e.to_string()))?;
            let mut source = File::open(path)?;
            io::copy(&mut source, &mut writer)?;
            files += 1;
        }
    }

    writer.finish().map_err(|e| archive_err(e.to_string()))?;
    Ok(files)
}

fn entry_name(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(unix)]
fn file_mode(path: &Path) -> io::Result<u32> {
    use std::os::unix::fs::PermissionsExt;
    Ok(fs::metadata(path)?.permissions().mode() & 0o777)
}

#[cfg(not(unix))]
#[allow(clippy::unnecessary_wraps)]
const fn file_mode(_path: &Path) -> io::Result<u32> {
    Ok(0o644)
}

/// What packaging produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageReport {
    /// Path of the written archive
    pub archive: PathBuf,
    /// Entries removed by stripping, empty when stripping was skipped
    pub stripped: Vec<PathBuf>,
}

/// Strips (unless `strip` is false) and archives the plugin at `root`.
///
/// The archive is written to `<root>/<name>.bitcart`.
///
/// # Errors
///
/// Returns an error if the manifest cannot be loaded, a component directory
/// is missing, the plugin name is not a valid file name, or stripping or
/// archiving fails.
pub fn package_plugin(root: &Path, strip_ignored: bool) -> Result<PackageReport> {
    let manifest = Manifest::load(root)?;
    for component in plan(root, &manifest)? {
        component.ensure_present()?;
    }

    let stripped = if strip_ignored {
        let stripped = strip(root)?;
        info!("Stripped {} ignored entries", stripped.len());
        stripped
    } else {
        Vec::new()
    };

    let out = root.join(format!("{}.{PACKAGE_EXTENSION}", manifest.name));
    let files = archive(root, &out)?;
    info!("Packaged {} files into {}", files, out.display());

    Ok(PackageReport {
        archive: out,
        stripped,
    })
}
