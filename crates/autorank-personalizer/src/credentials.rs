//! API key loading.
//!
//! The key lives in a one-line text file of the form `label:secret-key`.

use crate::error::CredentialsError;
use std::fmt;
use std::path::Path;

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    api_key: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }

    /// Reads the first line of `path` and extracts the key from it.
    pub fn from_file(path: &Path) -> Result<Self, CredentialsError> {
        let content = std::fs::read_to_string(path).map_err(|source| CredentialsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let first = content
            .lines()
            .next()
            .ok_or_else(|| CredentialsError::Empty(path.to_path_buf()))?;
        Self::from_line(first)
    }

    /// Takes the second colon-separated token of `line` as the key.
    pub fn from_line(line: &str) -> Result<Self, CredentialsError> {
        let key = line
            .split(':')
            .nth(1)
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(CredentialsError::Malformed)?;
        Ok(Self::new(key))
    }

    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_the_token_after_the_colon() {
        let creds = Credentials::from_line("MyKey:abc123").expect("valid line");
        assert_eq!(creds.api_key(), "abc123");
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        let creds = Credentials::from_line("MyKey: abc123 \r").expect("valid line");
        assert_eq!(creds.api_key(), "abc123");
    }

    #[test]
    fn only_the_second_token_is_used() {
        let creds = Credentials::from_line("MyKey:abc:def").expect("valid line");
        assert_eq!(creds.api_key(), "abc");
    }

    #[test]
    fn lines_without_a_key_are_malformed() {
        assert!(matches!(
            Credentials::from_line("abc123"),
            Err(CredentialsError::Malformed)
        ));
        assert!(matches!(
            Credentials::from_line("MyKey:"),
            Err(CredentialsError::Malformed)
        ));
    }

    #[test]
    fn file_uses_first_line_only() {
        let path = std::env::temp_dir().join(format!(
            "autorank_credentials_test_{}.txt",
            std::process::id()
        ));
        std::fs::write(&path, "MyKey:abc123\nOther:zzz\n").expect("write fixture");
        let creds = Credentials::from_file(&path);
        let _ = std::fs::remove_file(&path);
        assert_eq!(creds.expect("valid file").api_key(), "abc123");
    }

    #[test]
    fn missing_and_empty_files_fail() {
        let dir = std::env::temp_dir().join("autorank_credentials_test_missing");
        let _ = std::fs::remove_dir_all(&dir);
        let _ = std::fs::create_dir_all(&dir);

        let missing = dir.join("nope.txt");
        assert!(matches!(
            Credentials::from_file(&missing),
            Err(CredentialsError::Io { .. })
        ));

        let empty = dir.join("empty.txt");
        std::fs::write(&empty, "").expect("write fixture");
        assert!(matches!(
            Credentials::from_file(&empty),
            Err(CredentialsError::Empty(_))
        ));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn debug_output_hides_the_key() {
        let creds = Credentials::new("abc123");
        assert!(!format!("{creds:?}").contains("abc123"));
    }
}
