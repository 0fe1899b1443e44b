pub mod models;
pub mod source;

#[cfg(test)]
pub(crate) mod fixtures;

use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use models::{DatasetStats, PlacementRecord, RawTrackRow, SetLabel, TrackRecord};
use source::TableSource;

#[derive(Error, Debug)]
pub enum DataError {
    #[error("HTTP request failed for {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: Box<ureq::Error>,
    },
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed {table} table: {source}")]
    Csv {
        table: TableKind,
        #[source]
        source: csv::Error,
    },
}

pub type Result<T> = std::result::Result<T, DataError>;

/// The two published tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    TrackLengths,
    SetPlacement,
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TrackLengths => write!(f, "track-length"),
            Self::SetPlacement => write!(f, "set-placement"),
        }
    }
}

/// Read-only store of both tables, loaded once per process.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    tracks: Vec<TrackRecord>,
    placements: Vec<PlacementRecord>,
}

impl Dataset {
    /// Load both tables from a source. Any failure is fatal to the caller.
    pub fn load(source: &dyn TableSource) -> Result<Self> {
        log::info!("Track lengths: {}", source.describe(TableKind::TrackLengths));
        let tracks_csv = source.read_table(TableKind::TrackLengths)?;
        log::info!("Set placement: {}", source.describe(TableKind::SetPlacement));
        let placement_csv = source.read_table(TableKind::SetPlacement)?;
        Self::from_csv(&tracks_csv, &placement_csv)
    }

    /// Decode both tables from CSV text.
    pub fn from_csv(tracks_csv: &str, placement_csv: &str) -> Result<Self> {
        let tracks = parse_tracks(tracks_csv)?;
        let placements = parse_placements(placement_csv)?;
        log::info!(
            "Loaded {} track rows and {} placement rows",
            tracks.len(),
            placements.len()
        );
        Ok(Self::from_records(tracks, placements))
    }

    pub fn from_records(tracks: Vec<TrackRecord>, placements: Vec<PlacementRecord>) -> Self {
        Self { tracks, placements }
    }

    pub fn tracks(&self) -> &[TrackRecord] {
        &self.tracks
    }

    pub fn placements(&self) -> &[PlacementRecord] {
        &self.placements
    }

    pub fn stats(&self) -> DatasetStats {
        let shows: HashSet<i64> = self.tracks.iter().map(|t| t.show_id).collect();
        let songs: HashSet<&str> = self.tracks.iter().map(|t| t.title.as_str()).collect();
        DatasetStats {
            track_rows: self.tracks.len(),
            placement_rows: self.placements.len(),
            shows: shows.len(),
            distinct_songs: songs.len(),
            first_show: self.tracks.iter().map(|t| t.date).min(),
            last_show: self.tracks.iter().map(|t| t.date).max(),
        }
    }
}

fn parse_tracks(text: &str) -> Result<Vec<TrackRecord>> {
    let csv_err = |source| DataError::Csv {
        table: TableKind::TrackLengths,
        source,
    };

    let mut reader = csv::Reader::from_reader(text.as_bytes());
    let mut tracks = Vec::new();
    let mut skipped = 0usize;

    for row in reader.deserialize::<RawTrackRow>() {
        let row = row.map_err(csv_err)?;
        match SetLabel::parse(&row.set) {
            Some(set) => tracks.push(row.into_record(set)),
            None => {
                log::debug!(
                    "Skipping {} on {}: unknown set label {:?}",
                    row.title,
                    row.date,
                    row.set
                );
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        log::warn!("Skipped {skipped} track rows with unknown set labels");
    }
    Ok(tracks)
}

fn parse_placements(text: &str) -> Result<Vec<PlacementRecord>> {
    let mut reader = csv::Reader::from_reader(text.as_bytes());
    reader
        .deserialize::<PlacementRecord>()
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|source| DataError::Csv {
            table: TableKind::SetPlacement,
            source,
        })
}
