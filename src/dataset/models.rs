use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Set label as it appears in the track-length table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SetLabel {
    #[serde(rename = "1")]
    One,
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "3")]
    Three,
    #[serde(rename = "E")]
    Encore,
    #[serde(rename = "E2")]
    SecondEncore,
}

impl SetLabel {
    /// Parse a raw table label ("1", "2", "3", "E", "E2").
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "1" => Some(Self::One),
            "2" => Some(Self::Two),
            "3" => Some(Self::Three),
            "E" => Some(Self::Encore),
            "E2" => Some(Self::SecondEncore),
            _ => None,
        }
    }
}

/// One song performance from the track-length table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackRecord {
    pub date: NaiveDate,
    /// Ordinal show id, increasing with date.
    pub show_id: i64,
    pub set: SetLabel,
    pub position: i64,
    pub title: String,
    /// Minutes. Blank cells in the table load as `None`.
    pub duration: Option<f64>,
}

/// One song performance from the set-placement table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementRecord {
    #[serde(rename = "order_id")]
    pub show_id: i64,
    pub title: String,
    #[serde(rename = "percentintoset")]
    pub percent_into_set: Option<f64>,
}

/// Track-length row exactly as decoded from CSV, before the set label is validated.
#[derive(Debug, Deserialize)]
pub(crate) struct RawTrackRow {
    pub date: NaiveDate,
    pub order_id: i64,
    pub set: String,
    pub position: i64,
    pub title: String,
    pub duration: Option<f64>,
}

impl RawTrackRow {
    pub(crate) fn into_record(self, set: SetLabel) -> TrackRecord {
        TrackRecord {
            date: self.date,
            show_id: self.order_id,
            set,
            position: self.position,
            title: self.title,
            duration: self.duration,
        }
    }
}

/// Summary counts for the loaded tables.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetStats {
    pub track_rows: usize,
    pub placement_rows: usize,
    pub shows: usize,
    pub distinct_songs: usize,
    pub first_show: Option<NaiveDate>,
    pub last_show: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_label_parse() {
        assert_eq!(SetLabel::parse("1"), Some(SetLabel::One));
        assert_eq!(SetLabel::parse("3"), Some(SetLabel::Three));
        assert_eq!(SetLabel::parse("E"), Some(SetLabel::Encore));
        assert_eq!(SetLabel::parse(" E2 "), Some(SetLabel::SecondEncore));
        assert_eq!(SetLabel::parse("4"), None);
        assert_eq!(SetLabel::parse("e"), None);
        assert_eq!(SetLabel::parse(""), None);
    }

    #[test]
    fn test_placement_record_deserialize() {
        let text = "order_id,title,percentintoset\n12,Harry Hood,2.75\n";
        let mut reader = csv::Reader::from_reader(text.as_bytes());
        let rows: Vec<PlacementRecord> = reader
            .deserialize::<PlacementRecord>()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].show_id, 12);
        assert_eq!(rows[0].title, "Harry Hood");
        assert_eq!(rows[0].percent_into_set, Some(2.75));
    }

    #[test]
    fn test_blank_placement_is_none() {
        let text = "order_id,title,percentintoset\n12,Harry Hood,\n";
        let mut reader = csv::Reader::from_reader(text.as_bytes());
        let row: PlacementRecord = reader.deserialize().next().unwrap().unwrap();
        assert_eq!(row.title, "Harry Hood");
        assert_eq!(row.percent_into_set, None);
    }
}
