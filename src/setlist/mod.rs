use std::fmt;

use serde::Serialize;

use crate::dataset::Dataset;
use crate::dataset::models::{SetLabel, TrackRecord};

/// The four set groupings a user can pick for a graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SetChoice {
    One,
    Two,
    Three,
    Encore,
}

impl SetChoice {
    pub const ALL: [SetChoice; 4] = [Self::One, Self::Two, Self::Three, Self::Encore];

    pub fn label(&self) -> &'static str {
        match self {
            Self::One => "Set 1",
            Self::Two => "Set 2",
            Self::Three => "Set 3",
            Self::Encore => "Encore",
        }
    }

    /// Label with its indefinite article, for sentences.
    pub fn with_article(&self) -> &'static str {
        match self {
            Self::One => "a Set 1",
            Self::Two => "a Set 2",
            Self::Three => "a Set 3",
            Self::Encore => "an Encore",
        }
    }

    /// Whether a raw set label belongs to this grouping. Encore takes E and E2.
    pub fn contains(&self, label: SetLabel) -> bool {
        matches!(
            (self, label),
            (Self::One, SetLabel::One)
                | (Self::Two, SetLabel::Two)
                | (Self::Three, SetLabel::Three)
                | (Self::Encore, SetLabel::Encore | SetLabel::SecondEncore)
        )
    }
}

impl fmt::Display for SetChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Song titles of one show, grouped by set in position order.
/// An empty set means it wasn't played.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Setlist {
    pub set1: Vec<String>,
    pub set2: Vec<String>,
    pub set3: Vec<String>,
    pub encore: Vec<String>,
}

impl Setlist {
    pub fn songs(&self, set: SetChoice) -> &[String] {
        match set {
            SetChoice::One => &self.set1,
            SetChoice::Two => &self.set2,
            SetChoice::Three => &self.set3,
            SetChoice::Encore => &self.encore,
        }
    }

    fn songs_mut(&mut self, set: SetChoice) -> &mut Vec<String> {
        match set {
            SetChoice::One => &mut self.set1,
            SetChoice::Two => &mut self.set2,
            SetChoice::Three => &mut self.set3,
            SetChoice::Encore => &mut self.encore,
        }
    }

    /// Sets in show order, paired with their songs.
    pub fn sets(&self) -> impl Iterator<Item = (SetChoice, &[String])> {
        SetChoice::ALL.into_iter().map(move |set| (set, self.songs(set)))
    }

    pub fn is_empty(&self) -> bool {
        self.sets().all(|(_, songs)| songs.is_empty())
    }

    pub fn song_count(&self) -> usize {
        self.sets().map(|(_, songs)| songs.len()).sum()
    }
}

impl Dataset {
    /// Group a show's songs by set. Encore merges E and E2 in position order.
    pub fn get_setlist(&self, show_id: i64) -> Setlist {
        let mut rows: Vec<&TrackRecord> = self
            .tracks()
            .iter()
            .filter(|t| t.show_id == show_id)
            .collect();
        // Stable, so duplicate positions keep table order
        rows.sort_by_key(|t| t.position);

        let mut setlist = Setlist::default();
        for row in rows {
            if let Some(set) = SetChoice::ALL.into_iter().find(|s| s.contains(row.set)) {
                setlist.songs_mut(set).push(row.title.clone());
            }
        }
        setlist
    }
}
