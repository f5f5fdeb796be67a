//! Exporting variables to later workflow steps through GITHUB_ENV.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use uuid::Uuid;

use crate::errors::{ExchangeError, Result};

/// Append `name=value` to the file GITHUB_ENV points at, making the
/// variable visible to every later step in the job.
pub fn export_variable(name: &str, value: &str) -> Result<()> {
    let path = std::env::var("GITHUB_ENV")
        .ok()
        .filter(|p| !p.is_empty())
        .ok_or_else(|| {
            ExchangeError::Export(
                "GITHUB_ENV is not set; this binary expects to run inside a GitHub Actions job"
                    .to_string(),
            )
        })?;
    write_env_entry(Path::new(&path), name, value)
}

/// Write one entry in the runner's heredoc form. The random delimiter
/// guards against values that contain a delimiter line themselves.
pub fn write_env_entry(path: &Path, name: &str, value: &str) -> Result<()> {
    let delimiter = format!("ghadelimiter_{}", Uuid::new_v4());
    let entry = compose_entry(name, value, &delimiter)?;

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| ExchangeError::Export(format!("cannot open {}: {e}", path.display())))?;
    file.write_all(entry.as_bytes())
        .map_err(|e| ExchangeError::Export(format!("cannot write {}: {e}", path.display())))?;

    Ok(())
}

fn compose_entry(name: &str, value: &str, delimiter: &str) -> Result<String> {
    if name.is_empty() || name.contains('=') || name.contains("<<") {
        return Err(ExchangeError::Export(format!(
            "invalid variable name {name:?}"
        )));
    }
    if name.contains(delimiter) || value.contains(delimiter) {
        return Err(ExchangeError::Export(
            "value collides with the generated delimiter".to_string(),
        ));
    }
    Ok(format!("{name}<<{delimiter}\n{value}\n{delimiter}\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_heredoc_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("github_env");

        write_env_entry(&path, "INFISICAL_TOKEN", "st.abc.def").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("INFISICAL_TOKEN<<ghadelimiter_"));
        assert_eq!(lines[1], "st.abc.def");
        let delimiter = lines[0].strip_prefix("INFISICAL_TOKEN<<").unwrap();
        assert_eq!(lines[2], delimiter);
        assert!(content.ends_with('\n'));
    }

    #[test]
    fn appends_to_existing_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("github_env");

        write_env_entry(&path, "FIRST", "1").unwrap();
        write_env_entry(&path, "SECOND", "2").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("FIRST<<"));
        assert!(content.contains("SECOND<<"));
        assert_eq!(content.lines().count(), 6);
    }

    #[test]
    fn preserves_multiline_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("github_env");

        write_env_entry(&path, "CERT", "line1\nline2").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[1], "line1");
        assert_eq!(lines[2], "line2");
        assert_eq!(lines[3], lines[0].strip_prefix("CERT<<").unwrap());
    }

    #[test]
    fn rejects_invalid_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("github_env");

        assert!(write_env_entry(&path, "", "x").is_err());
        assert!(write_env_entry(&path, "A=B", "x").is_err());
        assert!(write_env_entry(&path, "A<<B", "x").is_err());
        assert!(!path.exists());
    }

    #[test]
    fn value_containing_the_delimiter_is_rejected() {
        let err = compose_entry("TOKEN", "x\nghadelimiter_fixed\ny", "ghadelimiter_fixed")
            .err()
            .unwrap();
        assert!(err.to_string().contains("delimiter"));
    }

    #[test]
    fn distinct_entries_get_distinct_delimiters() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("github_env");

        write_env_entry(&path, "A", "1").unwrap();
        write_env_entry(&path, "B", "2").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        let first = lines[0].strip_prefix("A<<").unwrap();
        let second = lines[3].strip_prefix("B<<").unwrap();
        assert_ne!(first, second);
    }
}
