use std::path::{Path, PathBuf};

/// Pick a fresh run directory for `base`.
///
/// Returns `base` when it does not exist yet or `exist_ok` is set. Otherwise
/// returns the first of `base2`, `base3`, ... that does not exist.
pub fn increment_path(base: &Path, exist_ok: bool) -> PathBuf {
    if exist_ok || !base.exists() {
        return base.to_path_buf();
    }

    let name = base
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    (2..)
        .map(|n| base.with_file_name(format!("{name}{n}")))
        .find(|path| !path.exists())
        .unwrap_or_else(|| base.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::increment_path;

    #[test]
    fn increments_run_directory() -> std::io::Result<()> {
        let tmp_dir = tempfile::tempdir()?;
        let base = tmp_dir.path().join("exp");

        assert_eq!(increment_path(&base, false), base);

        std::fs::create_dir(&base)?;
        assert_eq!(increment_path(&base, false), tmp_dir.path().join("exp2"));
        assert_eq!(increment_path(&base, true), base);

        std::fs::create_dir(tmp_dir.path().join("exp2"))?;
        std::fs::create_dir(tmp_dir.path().join("exp4"))?;
        assert_eq!(increment_path(&base, false), tmp_dir.path().join("exp3"));
        Ok(())
    }
}
