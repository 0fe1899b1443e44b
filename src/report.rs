//! Per-request query results.
//!
//! Each user action produces one immutable report. Failures that the user
//! should see (no show that day, set not played) come back as [`ShowError`]
//! and leave nothing half-computed behind.

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::dataset::Dataset;
use crate::graph::{GraphData, Metric, TimingSelection};
use crate::setlist::{SetChoice, Setlist};
use crate::show::{InvalidDate, ResolvedShow};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShowError {
    #[error("{band} did not play a show on {date}. Or that show is not available in this database.")]
    NotPlayed { band: String, date: NaiveDate },

    /// Reported the same way as a missing show.
    #[error(
        "{band} did not play a show on {year:04}-{month:02}-{day:02}. Or that show is not available in this database."
    )]
    InvalidDate {
        band: String,
        year: i32,
        month: u32,
        day: u32,
    },

    #[error("{band} didn't play {} on {date}.", .set.with_article())]
    SetNotPlayed {
        band: String,
        set: SetChoice,
        date: NaiveDate,
    },

    #[error("No {set} songs from {date} have data for the selected shows.")]
    NoGraphData { set: SetChoice, date: NaiveDate },
}

/// Result of a "check setlist" request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShowReport {
    pub show: ResolvedShow,
    pub setlist: Setlist,
}

/// Parameters of a graph request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphRequest {
    pub metric: Metric,
    pub set: SetChoice,
    pub selection: TimingSelection,
}

/// Result of a graph request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphReport {
    pub show: ResolvedShow,
    pub set: SetChoice,
    pub graph: GraphData,
}

/// Query front end over a loaded dataset.
pub struct Digest<'a> {
    dataset: &'a Dataset,
    band: String,
}

impl<'a> Digest<'a> {
    pub fn new(dataset: &'a Dataset, band: impl Into<String>) -> Self {
        Self {
            dataset,
            band: band.into(),
        }
    }

    /// Resolve a date to a played show, or explain why there is none.
    pub fn find_show(&self, year: i32, month: u32, day: u32) -> Result<ResolvedShow, ShowError> {
        let show = self
            .dataset
            .resolve_show(year, month, day)
            .map_err(|InvalidDate { year, month, day }| ShowError::InvalidDate {
                band: self.band.clone(),
                year,
                month,
                day,
            })?;

        if !show.played {
            return Err(ShowError::NotPlayed {
                band: self.band.clone(),
                date: show.date,
            });
        }
        Ok(show)
    }

    pub fn check_setlist(&self, year: i32, month: u32, day: u32) -> Result<ShowReport, ShowError> {
        let show = self.find_show(year, month, day)?;
        let setlist = self.dataset.get_setlist(show.show_id);
        Ok(ShowReport { show, setlist })
    }

    /// Assemble plot data for one set of a show.
    pub fn graph(
        &self,
        year: i32,
        month: u32,
        day: u32,
        request: &GraphRequest,
    ) -> Result<GraphReport, ShowError> {
        let show = self.find_show(year, month, day)?;
        let setlist = self.dataset.get_setlist(show.show_id);

        let songs = setlist.songs(request.set);
        if songs.is_empty() {
            return Err(ShowError::SetNotPlayed {
                band: self.band.clone(),
                set: request.set,
                date: show.date,
            });
        }

        let graph = self.dataset.classify_for_graph(
            request.metric,
            songs,
            show.date,
            show.show_id,
            &request.selection,
        );
        if graph.is_empty() {
            return Err(ShowError::NoGraphData {
                set: request.set,
                date: show.date,
            });
        }

        Ok(GraphReport {
            show,
            set: request.set,
            graph,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::fixtures;
    use crate::graph::TimingCategory;

    fn request(metric: Metric, set: SetChoice) -> GraphRequest {
        GraphRequest {
            metric,
            set,
            selection: TimingSelection::all(),
        }
    }

    #[test]
    fn test_check_setlist_end_to_end() {
        let ds = fixtures::dataset();
        let digest = Digest::new(&ds, "Phish");
        let report = digest.check_setlist(1999, 12, 31).unwrap();
        assert_eq!(report.show.show_id, 10);
        assert!(report.show.played);
        assert_eq!(report.setlist.set1, vec!["Tweezer", "Bathtub Gin"]);
        assert!(report.setlist.set2.is_empty());
        assert!(report.setlist.set3.is_empty());
        assert!(report.setlist.encore.is_empty());
    }

    #[test]
    fn test_unknown_date_message() {
        let ds = fixtures::dataset();
        let digest = Digest::new(&ds, "Phish");
        let err = digest.check_setlist(2001, 7, 4).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Phish did not play a show on 2001-07-04. Or that show is not available in this database."
        );
    }

    #[test]
    fn test_invalid_date_reported_like_unknown() {
        let ds = fixtures::dataset();
        let digest = Digest::new(&ds, "Phish");
        let err = digest.check_setlist(2020, 2, 30).unwrap_err();
        assert!(matches!(err, ShowError::InvalidDate { .. }));
        assert_eq!(
            err.to_string(),
            "Phish did not play a show on 2020-02-30. Or that show is not available in this database."
        );
    }

    #[test]
    fn test_graph_for_played_set() {
        let ds = fixtures::dataset();
        let digest = Digest::new(&ds, "Phish");
        let report = digest
            .graph(1999, 12, 31, &request(Metric::Duration, SetChoice::One))
            .unwrap();
        assert_eq!(report.set, SetChoice::One);
        assert_eq!(report.graph.song_order, vec!["Tweezer", "Bathtub Gin"]);
        assert!(!report.graph.rows.is_empty());
    }

    #[test]
    fn test_missing_set_checked_directly() {
        let ds = fixtures::dataset();
        let digest = Digest::new(&ds, "Phish");

        // Show 9 has every set, so no error for any of them
        for set in SetChoice::ALL {
            assert!(digest.graph(1999, 12, 30, &request(Metric::Duration, set)).is_ok());
        }

        // Show 8 has sets 1 and 2 only
        assert!(digest.graph(1999, 12, 29, &request(Metric::Duration, SetChoice::Two)).is_ok());
        let err = digest
            .graph(1999, 12, 29, &request(Metric::Duration, SetChoice::Three))
            .unwrap_err();
        assert_eq!(err.to_string(), "Phish didn't play a Set 3 on 1999-12-29.");
    }

    #[test]
    fn test_missing_encore_message() {
        let ds = fixtures::dataset();
        let digest = Digest::new(&ds, "Trey Anastasio Band");
        let err = digest
            .graph(1999, 12, 31, &request(Metric::Placement, SetChoice::Encore))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Trey Anastasio Band didn't play an Encore on 1999-12-31."
        );
    }

    #[test]
    fn test_graph_unknown_show_short_circuits() {
        let ds = fixtures::dataset();
        let digest = Digest::new(&ds, "Phish");
        let err = digest
            .graph(1985, 1, 1, &request(Metric::Duration, SetChoice::One))
            .unwrap_err();
        assert!(matches!(err, ShowError::NotPlayed { .. }));
    }

    #[test]
    fn test_graph_no_rows_after_selection() {
        // Llama has no placement rows at all
        let ds = fixtures::dataset();
        let digest = Digest::new(&ds, "Phish");
        let req = GraphRequest {
            metric: Metric::Placement,
            set: SetChoice::One,
            selection: TimingSelection::new([TimingCategory::Before]),
        };
        let err = digest.graph(1999, 12, 29, &req).unwrap_err();
        assert_eq!(
            err,
            ShowError::NoGraphData {
                set: SetChoice::One,
                date: NaiveDate::from_ymd_opt(1999, 12, 29).unwrap(),
            }
        );
    }
}
