//! Timing classification of metric rows and swarm-plot data assembly.
//!
//! Every row of the chosen metric table is labeled by how far its show sits
//! from the reference show:
//!
//! | offset (`id - target`) | category            |
//! |------------------------|---------------------|
//! | `< -50`                | Before              |
//! | `-50..=-1`             | Previous 50 Shows   |
//! | `0`                    | the show's date     |
//! | `1..=50`               | Next 50 Shows       |
//! | `> 50`                 | After               |

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashSet};

use chrono::NaiveDate;
use serde::Serialize;

use crate::dataset::Dataset;

/// Width of the "recent shows" windows on either side of the reference show.
pub const RECENT_WINDOW: i64 = 50;

/// Timing category of a row relative to the reference show.
/// Declaration order is the fixed legend order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimingCategory {
    Before,
    Previous50,
    ShowDate,
    Next50,
    After,
}

impl TimingCategory {
    pub const ALL: [TimingCategory; 5] = [
        Self::Before,
        Self::Previous50,
        Self::ShowDate,
        Self::Next50,
        Self::After,
    ];

    /// Categories a user can toggle; the show date is always on.
    pub const SELECTABLE: [TimingCategory; 4] =
        [Self::Before, Self::Previous50, Self::Next50, Self::After];

    /// Classify a show id against the reference show id.
    pub fn classify(show_id: i64, target: i64) -> Self {
        match show_id.cmp(&target) {
            Ordering::Equal => Self::ShowDate,
            Ordering::Less if show_id < target.saturating_sub(RECENT_WINDOW) => Self::Before,
            Ordering::Less => Self::Previous50,
            Ordering::Greater if show_id <= target.saturating_add(RECENT_WINDOW) => Self::Next50,
            Ordering::Greater => Self::After,
        }
    }

    /// Legend label. The reference show is labeled by its date.
    pub fn label(&self, show_date: NaiveDate) -> String {
        match self {
            Self::Before => "Before".to_string(),
            Self::Previous50 => "Previous 50 Shows".to_string(),
            Self::ShowDate => show_date.to_string(),
            Self::Next50 => "Next 50 Shows".to_string(),
            Self::After => "After".to_string(),
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Self::Before => "#E8E0DE",
            Self::Previous50 => "#2C6E91",
            Self::ShowDate => "#000000",
            Self::Next50 => "#F15A50",
            Self::After => "#DEE8E4",
        }
    }
}

/// User-selected timing categories. Always contains [`TimingCategory::ShowDate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimingSelection(BTreeSet<TimingCategory>);

impl TimingSelection {
    pub fn new(categories: impl IntoIterator<Item = TimingCategory>) -> Self {
        let mut set: BTreeSet<_> = categories.into_iter().collect();
        set.insert(TimingCategory::ShowDate);
        Self(set)
    }

    pub fn all() -> Self {
        Self::new(TimingCategory::SELECTABLE)
    }

    pub fn contains(&self, category: TimingCategory) -> bool {
        self.0.contains(&category)
    }

    /// Selected categories in legend order.
    pub fn ordered(&self) -> impl Iterator<Item = TimingCategory> + '_ {
        self.0.iter().copied()
    }
}

impl Default for TimingSelection {
    fn default() -> Self {
        Self::all()
    }
}

/// Which metric table a graph plots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Duration,
    Placement,
}

impl Metric {
    /// Source table column holding the plotted value.
    pub fn column(&self) -> &'static str {
        match self {
            Self::Duration => "duration",
            Self::Placement => "percentintoset",
        }
    }

    pub fn y_label(&self) -> &'static str {
        match self {
            Self::Duration => "Song Duration in Minutes",
            Self::Placement => "Set Placement",
        }
    }

    /// Named y ticks. Only placement graphs relabel their axis.
    pub fn y_ticks(&self) -> Vec<TickLabel> {
        match self {
            Self::Duration => Vec::new(),
            Self::Placement => PLACEMENT_TICKS
                .iter()
                .map(|&(value, label)| TickLabel { value, label })
                .collect(),
        }
    }
}

/// Placement values are set number plus fraction of the set elapsed.
const PLACEMENT_TICKS: [(f64, &str); 9] = [
    (1.0, "Start Set 1"),
    (1.5, "Middle Set 1"),
    (2.0, "Start Set 2"),
    (2.5, "Middle Set 2"),
    (3.0, "Start Set 3"),
    (3.5, "Middle Set 3"),
    (4.0, "Start Encore"),
    (4.5, "Middle Encore"),
    (5.0, "End of Show"),
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TickLabel {
    pub value: f64,
    pub label: &'static str,
}

/// Legend entry for one selected category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub category: TimingCategory,
    pub label: String,
    pub color: &'static str,
}

/// A metric row labeled with its timing category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedRow {
    pub show_id: i64,
    pub title: String,
    pub value: f64,
    pub category: TimingCategory,
    /// Legend label of `category`.
    pub timing: String,
}

/// Everything a renderer needs for one swarm plot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphData {
    pub metric: Metric,
    pub column: &'static str,
    pub y_label: &'static str,
    pub y_ticks: Vec<TickLabel>,
    pub show_date: NaiveDate,
    pub show_id: i64,
    /// Selected categories in legend order, with their colors.
    pub legend: Vec<LegendEntry>,
    /// X-axis order: requested songs that kept at least one row.
    pub song_order: Vec<String>,
    pub rows: Vec<ClassifiedRow>,
}

/// Per-category spread of one song's values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryStats {
    pub category: TimingCategory,
    pub count: usize,
    pub min: f64,
    pub median: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SongSummary {
    pub title: String,
    /// Only categories with at least one row, in legend order.
    pub categories: Vec<CategoryStats>,
}

impl GraphData {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Text summary per song in x-axis order.
    pub fn summary(&self) -> Vec<SongSummary> {
        self.song_order
            .iter()
            .map(|title| {
                let song_rows: Vec<&ClassifiedRow> =
                    self.rows.iter().filter(|r| &r.title == title).collect();

                let categories = self
                    .legend
                    .iter()
                    .filter_map(|entry| {
                        let values: Vec<f64> = song_rows
                            .iter()
                            .filter(|r| r.category == entry.category)
                            .map(|r| r.value)
                            .collect();
                        category_stats(entry.category, values)
                    })
                    .collect();

                SongSummary {
                    title: title.clone(),
                    categories,
                }
            })
            .collect()
    }
}

fn category_stats(category: TimingCategory, mut values: Vec<f64>) -> Option<CategoryStats> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let n = values.len();
    let median = if n % 2 == 1 {
        values[n / 2]
    } else {
        (values[n / 2 - 1] + values[n / 2]) / 2.0
    };
    Some(CategoryStats {
        category,
        count: n,
        min: values[0],
        median,
        max: values[n - 1],
    })
}

impl Dataset {
    /// Label every row of `metric` for the given songs relative to the
    /// reference show, keeping only the selected categories. Rows with a
    /// blank metric value are not plotted.
    pub fn classify_for_graph(
        &self,
        metric: Metric,
        songs: &[String],
        show_date: NaiveDate,
        show_id: i64,
        selection: &TimingSelection,
    ) -> GraphData {
        let wanted: HashSet<&str> = songs.iter().map(String::as_str).collect();

        let source: Vec<(i64, &str, f64)> = match metric {
            Metric::Duration => self
                .tracks()
                .iter()
                .filter_map(|t| Some((t.show_id, t.title.as_str(), t.duration?)))
                .collect(),
            Metric::Placement => self
                .placements()
                .iter()
                .filter_map(|p| Some((p.show_id, p.title.as_str(), p.percent_into_set?)))
                .collect(),
        };

        let rows: Vec<ClassifiedRow> = source
            .into_iter()
            .filter(|(_, title, _)| wanted.contains(title))
            .filter_map(|(id, title, value)| {
                let category = TimingCategory::classify(id, show_id);
                selection.contains(category).then(|| ClassifiedRow {
                    show_id: id,
                    title: title.to_string(),
                    value,
                    category,
                    timing: category.label(show_date),
                })
            })
            .collect();

        let mut song_order: Vec<String> = Vec::new();
        for song in songs {
            if !song_order.contains(song) && rows.iter().any(|r| &r.title == song) {
                song_order.push(song.clone());
            }
        }

        let legend = selection
            .ordered()
            .map(|category| LegendEntry {
                category,
                label: category.label(show_date),
                color: category.color(),
            })
            .collect();

        log::debug!(
            "{} graph for show {show_id}: {} rows across {} songs",
            metric.column(),
            rows.len(),
            song_order.len()
        );

        GraphData {
            metric,
            column: metric.column(),
            y_label: metric.y_label(),
            y_ticks: metric.y_ticks(),
            show_date,
            show_id,
            legend,
            song_order,
            rows,
        }
    }
}
