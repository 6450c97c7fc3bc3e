use anyhow::{bail, Context, Result};
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};

pub const DEFAULT_OUTPUT_FILE: &str = "git-status-report.txt";

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(rest);
        }
    } else if path == "~" {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home);
        }
    }
    PathBuf::from(path)
}

/// Resolve the directory to scan. Defaults to the current directory.
pub fn resolve_scan_root(dir: Option<&str>) -> Result<PathBuf> {
    let path = match dir {
        Some(d) => expand_tilde(d),
        None => std::env::current_dir().context("could not determine current directory")?,
    };

    if !path.is_dir() {
        bail!("not a directory: '{}'", path.display());
    }

    path.canonicalize()
        .with_context(|| format!("failed to resolve '{}'", path.display()))
}

/// Resolve the output file. The parent directory must already exist.
pub fn resolve_output_path(file: Option<&Path>, tag: Option<NaiveDateTime>) -> Result<PathBuf> {
    let path = match file {
        Some(f) => expand_tilde(&f.to_string_lossy()),
        None => PathBuf::from(DEFAULT_OUTPUT_FILE),
    };
    let path = std::path::absolute(&path)
        .with_context(|| format!("failed to resolve '{}'", path.display()))?;

    let parent = path.parent().unwrap_or(Path::new("/"));
    if !parent.is_dir() {
        bail!("cannot find output directory: '{}'", parent.display());
    }

    Ok(match tag {
        Some(at) => with_timestamp_tag(&path, at),
        None => path,
    })
}

/// `report.txt` becomes `report.20221011_093000.txt`.
pub fn with_timestamp_tag(path: &Path, at: NaiveDateTime) -> PathBuf {
    let tag = at.format("%Y%m%d_%H%M%S").to_string();
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{}.{}.{}", stem, tag, ext.to_string_lossy()),
        None => format!("{}.{}", stem, tag),
    };
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::TestEnv;
    use chrono::NaiveDate;

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2022, 10, 11)
            .unwrap()
            .and_hms_opt(9, 30, 5)
            .unwrap()
    }

    #[test]
    fn expand_tilde_replaces_home() {
        let home = std::env::var("HOME").unwrap();
        let result = expand_tilde("~/src/foo");
        assert_eq!(result, PathBuf::from(&home).join("src/foo"));
    }

    #[test]
    fn expand_tilde_bare_tilde() {
        let home = std::env::var("HOME").unwrap();
        assert_eq!(expand_tilde("~"), PathBuf::from(&home));
    }

    #[test]
    fn expand_tilde_leaves_other_paths_unchanged() {
        assert_eq!(expand_tilde("/usr/local/bin"), PathBuf::from("/usr/local/bin"));
        assert_eq!(expand_tilde("foo/bar"), PathBuf::from("foo/bar"));
    }

    #[test]
    fn timestamp_tag_goes_before_extension() {
        assert_eq!(
            with_timestamp_tag(Path::new("/tmp/git-status-report.txt"), at()),
            PathBuf::from("/tmp/git-status-report.20221011_093005.txt")
        );
    }

    #[test]
    fn timestamp_tag_without_extension() {
        assert_eq!(
            with_timestamp_tag(Path::new("/tmp/report"), at()),
            PathBuf::from("/tmp/report.20221011_093005")
        );
    }

    #[test]
    fn timestamp_tag_keeps_inner_dots() {
        assert_eq!(
            with_timestamp_tag(Path::new("/tmp/a.b.txt"), at()),
            PathBuf::from("/tmp/a.b.20221011_093005.txt")
        );
    }

    #[test]
    fn scan_root_must_be_a_directory() {
        let env = TestEnv::new();
        let file = env.write_file("plain.txt", "x");
        let err = resolve_scan_root(Some(&*file.to_string_lossy())).unwrap_err();
        assert!(err.to_string().contains("not a directory"));
    }

    #[test]
    fn scan_root_is_canonical() {
        let env = TestEnv::new();
        std::fs::create_dir_all(env.root().join("sub")).unwrap();
        let dir = env.root().join("sub/../sub");
        let resolved = resolve_scan_root(Some(&*dir.to_string_lossy())).unwrap();
        assert_eq!(resolved, env.root().join("sub"));
    }

    #[test]
    fn output_directory_must_exist() {
        let env = TestEnv::new();
        let file = env.root().join("missing/out.txt");
        let err = resolve_output_path(Some(file.as_path()), None).unwrap_err();
        assert!(err.to_string().contains("cannot find output directory"));
    }

    #[test]
    fn output_path_with_tag() {
        let env = TestEnv::new();
        let file = env.root().join("out.txt");
        let resolved = resolve_output_path(Some(file.as_path()), Some(at())).unwrap();
        assert_eq!(resolved, env.root().join("out.20221011_093005.txt"));
    }
}
