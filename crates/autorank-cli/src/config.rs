//! Resolves command-line arguments into the configuration handed to the
//! client and the session.

use crate::session::SessionConfig;
use anyhow::{Context, Result};
use autorank_core::ColumnSpan;
use autorank_personalizer::ClientConfig;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Folder under the user's documents directory holding the demo files.
pub const DOCS_FOLDER: &str = "PersonalizeDocs";
pub const DEFAULT_CATALOG_FILE: &str = "Volkswagen-Models.csv";
pub const DEFAULT_CREDENTIALS_FILE: &str = "Secrets.txt";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub catalog: PathBuf,
    pub credentials: PathBuf,
    pub column_span: ColumnSpan,
    pub show_catalog: bool,
    pub client: ClientConfig,
    pub session: SessionConfig,
}

/// Raw values as they come from the command line.
#[derive(Debug, Clone)]
pub struct RawArgs {
    pub catalog: Option<PathBuf>,
    pub credentials: Option<PathBuf>,
    pub endpoint: String,
    pub exclusions: Vec<String>,
    pub timeout_secs: u64,
    pub include_last_column: bool,
    pub show_catalog: bool,
}

impl AppConfig {
    pub fn resolve(args: RawArgs) -> Result<Self> {
        let catalog = match args.catalog {
            Some(p) => p,
            None => default_doc_path(DEFAULT_CATALOG_FILE)?,
        };
        let credentials = match args.credentials {
            Some(p) => p,
            None => default_doc_path(DEFAULT_CREDENTIALS_FILE)?,
        };
        if args.timeout_secs == 0 {
            anyhow::bail!("--timeout-secs must be at least 1");
        }

        Ok(Self {
            catalog,
            credentials,
            column_span: if args.include_last_column {
                ColumnSpan::All
            } else {
                ColumnSpan::SkipLast
            },
            show_catalog: args.show_catalog,
            client: ClientConfig {
                endpoint: args.endpoint,
                timeout: Duration::from_secs(args.timeout_secs),
            },
            session: SessionConfig {
                exclusions: args
                    .exclusions
                    .into_iter()
                    .filter(|id| !id.trim().is_empty())
                    .collect(),
            },
        })
    }
}

fn default_doc_path(file: &str) -> Result<PathBuf> {
    let docs = dirs::document_dir()
        .or_else(dirs::home_dir)
        .context("Could not determine the documents directory; pass the path explicitly")?;
    Ok(docs_path(&docs, file))
}

fn docs_path(docs: &Path, file: &str) -> PathBuf {
    docs.join(DOCS_FOLDER).join(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> RawArgs {
        RawArgs {
            catalog: Some(PathBuf::from("/data/cars.csv")),
            credentials: Some(PathBuf::from("/data/secrets.txt")),
            endpoint: "https://example.cognitiveservices.azure.com/".into(),
            exclusions: vec!["juice".into()],
            timeout_secs: 10,
            include_last_column: false,
            show_catalog: false,
        }
    }

    #[test]
    fn explicit_paths_are_kept() {
        let config = AppConfig::resolve(args()).expect("resolve");
        assert_eq!(config.catalog, PathBuf::from("/data/cars.csv"));
        assert_eq!(config.credentials, PathBuf::from("/data/secrets.txt"));
        assert_eq!(config.column_span, ColumnSpan::SkipLast);
        assert_eq!(config.client.timeout, Duration::from_secs(10));
        assert_eq!(config.session.exclusions, vec!["juice"]);
    }

    #[test]
    fn include_last_column_switches_span() {
        let mut raw = args();
        raw.include_last_column = true;
        let config = AppConfig::resolve(raw).expect("resolve");
        assert_eq!(config.column_span, ColumnSpan::All);
    }

    #[test]
    fn blank_exclusions_are_dropped() {
        let mut raw = args();
        raw.exclusions = vec![String::new(), "juice".into(), " ".into()];
        let config = AppConfig::resolve(raw).expect("resolve");
        assert_eq!(config.session.exclusions, vec!["juice"]);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let mut raw = args();
        raw.timeout_secs = 0;
        assert!(AppConfig::resolve(raw).is_err());
    }

    #[test]
    fn default_files_live_in_the_docs_folder() {
        let path = docs_path(Path::new("/home/me/Documents"), DEFAULT_CATALOG_FILE);
        assert_eq!(
            path,
            PathBuf::from("/home/me/Documents/PersonalizeDocs/Volkswagen-Models.csv")
        );
    }
}
