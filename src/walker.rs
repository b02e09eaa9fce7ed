use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

use crate::converters::ConverterRegistry;
use crate::error::Result;

/// Finds convertible documents on disk.
///
/// Honors `.gitignore` and skips hidden entries, which keeps the shadow
/// copies under `.ipynb_checkpoints/` out of batch runs.
pub struct DocumentWalker {
    registry: ConverterRegistry,
}

impl DocumentWalker {
    pub fn new(registry: ConverterRegistry) -> Self {
        Self { registry }
    }

    /// Collects supported files under `root` in sorted order. A
    /// non-recursive walk stops at the immediate directory level.
    pub fn walk(&self, root: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        let mut builder = WalkBuilder::new(root);
        builder
            .hidden(true)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .ignore(true);
        if !recursive {
            builder.max_depth(Some(1));
        }

        for entry in builder.build().flatten() {
            let path = entry.path();
            if path.is_file() && self.is_supported(path) {
                files.push(path.to_path_buf());
            }
        }
        files.sort();

        Ok(files)
    }

    pub fn is_supported(&self, path: &Path) -> bool {
        self.registry.is_supported(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::TempDir;

    fn create_walker() -> DocumentWalker {
        DocumentWalker::new(ConverterRegistry::default())
    }

    fn create_file(dir: &Path, name: &str, content: &str) {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        let mut file = File::create(path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
    }

    #[test]
    fn test_walk_finds_notebooks() {
        let temp_dir = TempDir::new().unwrap();
        create_file(temp_dir.path(), "analysis.ipynb", "{}");
        create_file(temp_dir.path(), "model.ipynb", "{}");

        let walker = create_walker();
        let files = walker.walk(temp_dir.path(), false).unwrap();

        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|p| p.extension().unwrap() == "ipynb"));
    }

    #[test]
    fn test_walk_finds_rmd_files() {
        let temp_dir = TempDir::new().unwrap();
        create_file(temp_dir.path(), "report.Rmd", "# title");
        create_file(temp_dir.path(), "notes.rmd", "# notes");

        let walker = create_walker();
        let files = walker.walk(temp_dir.path(), false).unwrap();

        assert_eq!(files.len(), 2);
    }

    #[test]
    fn test_walk_ignores_unsupported_files() {
        let temp_dir = TempDir::new().unwrap();
        create_file(temp_dir.path(), "analysis.ipynb", "{}");
        create_file(temp_dir.path(), "README.md", "# Readme");
        create_file(temp_dir.path(), "script.py", "print('hello')");
        create_file(temp_dir.path(), "data.json", "{}");

        let walker = create_walker();
        let files = walker.walk(temp_dir.path(), false).unwrap();

        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("analysis.ipynb"));
    }

    #[test]
    fn test_walk_non_recursive_stays_at_top_level() {
        let temp_dir = TempDir::new().unwrap();
        create_file(temp_dir.path(), "top.ipynb", "{}");
        create_file(temp_dir.path(), "sub/nested.ipynb", "{}");
        create_file(temp_dir.path(), "sub/deep/buried.Rmd", "# x");

        let walker = create_walker();
        let files = walker.walk(temp_dir.path(), false).unwrap();

        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("top.ipynb"));
    }

    #[test]
    fn test_walk_recursive_descends() {
        let temp_dir = TempDir::new().unwrap();
        create_file(temp_dir.path(), "top.ipynb", "{}");
        create_file(temp_dir.path(), "sub/nested.ipynb", "{}");
        create_file(temp_dir.path(), "sub/deep/buried.Rmd", "# x");

        let walker = create_walker();
        let files = walker.walk(temp_dir.path(), true).unwrap();

        assert_eq!(files.len(), 3);
    }

    #[test]
    fn test_walk_sorted_output() {
        let temp_dir = TempDir::new().unwrap();
        create_file(temp_dir.path(), "zebra.ipynb", "{}");
        create_file(temp_dir.path(), "alpha.ipynb", "{}");
        create_file(temp_dir.path(), "middle.Rmd", "# x");

        let walker = create_walker();
        let files = walker.walk(temp_dir.path(), false).unwrap();

        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["alpha.ipynb", "middle.Rmd", "zebra.ipynb"]);
    }

    #[test]
    fn test_walk_skips_checkpoint_copies() {
        let temp_dir = TempDir::new().unwrap();
        create_file(temp_dir.path(), "analysis.ipynb", "{}");
        create_file(
            temp_dir.path(),
            ".ipynb_checkpoints/analysis-checkpoint.ipynb",
            "{}",
        );

        let walker = create_walker();
        let files = walker.walk(temp_dir.path(), true).unwrap();

        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("analysis.ipynb"));
    }

    #[test]
    fn test_walk_respects_gitignore() {
        let temp_dir = TempDir::new().unwrap();

        // Initialize git repo so .gitignore is respected
        std::process::Command::new("git")
            .args(["init"])
            .current_dir(temp_dir.path())
            .output()
            .ok();

        create_file(temp_dir.path(), ".gitignore", "scratch/\n");
        create_file(temp_dir.path(), "keep.ipynb", "{}");
        create_file(temp_dir.path(), "scratch/drop.ipynb", "{}");

        let walker = create_walker();
        let files = walker.walk(temp_dir.path(), true).unwrap();

        let keep_found = files.iter().any(|f| f.ends_with("keep.ipynb"));
        assert!(keep_found, "keep.ipynb should be found");
    }

    #[test]
    fn test_walk_empty_directory() {
        let temp_dir = TempDir::new().unwrap();

        let walker = create_walker();
        let files = walker.walk(temp_dir.path(), true).unwrap();

        assert!(files.is_empty());
    }

    #[test]
    fn test_is_supported() {
        let walker = create_walker();
        assert!(walker.is_supported(Path::new("analysis.ipynb")));
        assert!(walker.is_supported(Path::new("sub/report.Rmd")));
        assert!(walker.is_supported(Path::new("notes.rmd")));
        assert!(!walker.is_supported(Path::new("file.txt")));
        assert!(!walker.is_supported(Path::new("Makefile")));
    }
}
