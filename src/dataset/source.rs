use std::path::PathBuf;
use std::time::Duration;

use ureq::Agent;

use super::{DataError, Result, TableKind};

/// Upper bound on a fetched table body. The published tables are a few MB.
const MAX_TABLE_BYTES: u64 = 64 * 1024 * 1024;

/// Where the raw CSV text of a table comes from.
///
/// The store only ever asks for whole tables, so any backing (HTTP, disk,
/// an in-memory fixture) just has to hand back the text.
pub trait TableSource {
    fn read_table(&self, table: TableKind) -> Result<String>;

    /// Human-readable origin of a table, for log lines.
    fn describe(&self, table: TableKind) -> String;
}

/// Location of a single table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Remote(String),
    Local(PathBuf),
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Remote(url) => write!(f, "{url}"),
            Self::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Table source that resolves each table independently to a URL or a local file.
pub struct LocationSource {
    agent: Agent,
    track_lengths: Location,
    set_placement: Location,
}

impl LocationSource {
    pub fn new(track_lengths: Location, set_placement: Location, timeout: Duration) -> Self {
        let config = Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();
        Self {
            agent: Agent::new_with_config(config),
            track_lengths,
            set_placement,
        }
    }

    fn location(&self, table: TableKind) -> &Location {
        match table {
            TableKind::TrackLengths => &self.track_lengths,
            TableKind::SetPlacement => &self.set_placement,
        }
    }

    fn fetch(&self, url: &str) -> Result<String> {
        log::debug!("Fetching {url}");
        let http_err = |source| DataError::Http {
            url: url.to_string(),
            source: Box::new(source),
        };
        let mut response = self.agent.get(url).call().map_err(http_err)?;
        response
            .body_mut()
            .with_config()
            .limit(MAX_TABLE_BYTES)
            .read_to_string()
            .map_err(http_err)
    }
}

impl TableSource for LocationSource {
    fn read_table(&self, table: TableKind) -> Result<String> {
        match self.location(table) {
            Location::Remote(url) => self.fetch(url),
            Location::Local(path) => {
                std::fs::read_to_string(path).map_err(|source| DataError::Io {
                    path: path.clone(),
                    source,
                })
            }
        }
    }

    fn describe(&self, table: TableKind) -> String {
        self.location(table).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_local_location_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "order_id,title,percentintoset\n1,Fee,1.1\n").unwrap();

        let source = LocationSource::new(
            Location::Local(PathBuf::from("/nonexistent/tracks.csv")),
            Location::Local(file.path().to_path_buf()),
            Duration::from_secs(1),
        );

        let text = source.read_table(TableKind::SetPlacement).unwrap();
        assert!(text.starts_with("order_id,title"));
    }

    #[test]
    fn test_missing_local_file_is_io_error() {
        let source = LocationSource::new(
            Location::Local(PathBuf::from("/nonexistent/tracks.csv")),
            Location::Local(PathBuf::from("/nonexistent/placement.csv")),
            Duration::from_secs(1),
        );

        let err = source.read_table(TableKind::TrackLengths).unwrap_err();
        assert!(matches!(err, DataError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/tracks.csv"));
    }

    #[test]
    fn test_describe_uses_location() {
        let source = LocationSource::new(
            Location::Remote("https://example.invalid/tracks".to_string()),
            Location::Local(PathBuf::from("placement.csv")),
            Duration::from_secs(1),
        );
        assert_eq!(
            source.describe(TableKind::TrackLengths),
            "https://example.invalid/tracks"
        );
        assert_eq!(source.describe(TableKind::SetPlacement), "placement.csv");
    }
}
