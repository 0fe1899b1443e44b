//! Small tables shared by unit tests.

use chrono::NaiveDate;

use super::Dataset;
use super::models::{SetLabel, TrackRecord};

/// Four shows. 12/31/99 is a single two-song first set; 12/30/99 has three
/// sets and a double encore, listed out of position order.
pub(crate) const TRACKS_CSV: &str = "\
date,order_id,set,position,title,duration
1999-12-29,8,1,1,Llama,5.0
1999-12-29,8,2,2,Tweezer,11.0
1999-12-30,9,2,5,Down with Disease,12.25
1999-12-30,9,1,2,Gumbo,6.5
1999-12-30,9,1,1,Bathtub Gin,9.75
1999-12-30,9,E2,9,Tweezer Reprise,3.5
1999-12-30,9,3,7,Harry Hood,15.0
1999-12-30,9,E,8,Loving Cup,7.0
1999-12-30,9,2,4,Tweezer,18.0
1999-12-30,9,1,3,Stash,10.5
1999-12-30,9,3,6,Slave to the Traffic Light,11.5
1999-12-31,10,1,2,Bathtub Gin,22.0
1999-12-31,10,1,1,Tweezer,14.5
2000-06-14,11,1,1,Tweezer,20.0
";

pub(crate) const PLACEMENT_CSV: &str = "\
order_id,title,percentintoset
8,Tweezer,2.4
9,Tweezer,2.25
9,Bathtub Gin,1.0
10,Tweezer,1.0
10,Bathtub Gin,1.5
11,Tweezer,1.0
";

pub(crate) fn dataset() -> Dataset {
    Dataset::from_csv(TRACKS_CSV, PLACEMENT_CSV).expect("fixture tables parse")
}

/// One row of `title` per show id in `ids`, dated one day apart from 1990-01-01.
pub(crate) fn track_per_show(title: &str, ids: impl IntoIterator<Item = i64>) -> Vec<TrackRecord> {
    let epoch = NaiveDate::from_ymd_opt(1990, 1, 1).expect("valid epoch");
    ids.into_iter()
        .map(|id| TrackRecord {
            date: epoch + chrono::Duration::days(id),
            show_id: id,
            set: SetLabel::One,
            position: 1,
            title: title.to_string(),
            duration: Some(id as f64),
        })
        .collect()
}
