use std::cmp::Ordering;
use std::convert::Infallible;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use insight_core::model::{Difficulty, DifficultyError, Response, Test};

//
// ─── ENTRIES ───────────────────────────────────────────────────────────────────
//

/// Direction of the default timeline sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timeline {
    /// Soonest first.
    Ascending,
    /// Newest first.
    Descending,
}

/// Anything listed in a searchable, sortable catalog.
pub trait CatalogEntry {
    const TIMELINE: Timeline;

    fn title(&self) -> &str;
    fn subject(&self) -> &str;
    fn instructor(&self) -> &str;
    fn difficulty(&self) -> Difficulty;
    fn marks(&self) -> f64;
    fn timeline_at(&self) -> DateTime<Utc>;
}

impl CatalogEntry for Test {
    const TIMELINE: Timeline = Timeline::Ascending;

    fn title(&self) -> &str {
        Test::title(self)
    }

    fn subject(&self) -> &str {
        Test::subject(self)
    }

    fn instructor(&self) -> &str {
        self.instructor_email()
    }

    fn difficulty(&self) -> Difficulty {
        Test::difficulty(self)
    }

    fn marks(&self) -> f64 {
        f64::from(self.total_marks())
    }

    fn timeline_at(&self) -> DateTime<Utc> {
        self.scheduled_at()
    }
}

impl CatalogEntry for Response {
    const TIMELINE: Timeline = Timeline::Descending;

    fn title(&self) -> &str {
        Response::title(self)
    }

    fn subject(&self) -> &str {
        Response::subject(self)
    }

    fn instructor(&self) -> &str {
        self.instructor_email()
    }

    fn difficulty(&self) -> Difficulty {
        Response::difficulty(self)
    }

    fn marks(&self) -> f64 {
        self.marks_obtained()
    }

    fn timeline_at(&self) -> DateTime<Utc> {
        self.submitted_at()
    }
}

//
// ─── QUERY ─────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    Title,
    /// Highest marks first.
    Marks,
    /// Easy, then Medium, then Hard.
    Difficulty,
    #[default]
    Timeline,
}

impl FromStr for SortKey {
    type Err = Infallible;

    /// Unknown keys fall back to the timeline order.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "title" => SortKey::Title,
            "marks" | "marks_obtained" | "score" => SortKey::Marks,
            "difficulty" => SortKey::Difficulty,
            _ => SortKey::Timeline,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DifficultyFilter {
    #[default]
    All,
    Only(Difficulty),
}

impl DifficultyFilter {
    #[must_use]
    pub fn matches(self, difficulty: Difficulty) -> bool {
        match self {
            DifficultyFilter::All => true,
            DifficultyFilter::Only(wanted) => wanted == difficulty,
        }
    }
}

impl FromStr for DifficultyFilter {
    type Err = DifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            return Ok(DifficultyFilter::All);
        }
        trimmed.parse().map(DifficultyFilter::Only)
    }
}

/// Search term, sort key and difficulty filter for one catalog view.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CatalogQuery {
    pub search: String,
    pub sort: SortKey,
    pub filter: DifficultyFilter,
}

impl CatalogQuery {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    #[must_use]
    pub fn with_sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }

    #[must_use]
    pub fn with_filter(mut self, filter: DifficultyFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Case-insensitive substring match on title, subject or instructor.
    ///
    /// Only an empty term matches everything; whitespace is matched literally.
    #[must_use]
    pub fn matches_search<T: CatalogEntry>(&self, entry: &T) -> bool {
        let needle = self.search.to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [entry.title(), entry.subject(), entry.instructor()]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

//
// ─── PIPELINE ──────────────────────────────────────────────────────────────────
//

/// Filter then stably sort `items`. The input slice is left untouched.
#[must_use]
pub fn apply<'a, T: CatalogEntry>(items: &'a [T], query: &CatalogQuery) -> Vec<&'a T> {
    let mut selected: Vec<&T> = items
        .iter()
        .filter(|entry| query.filter.matches(entry.difficulty()))
        .filter(|entry| query.matches_search(*entry))
        .collect();
    selected.sort_by(|a, b| compare(*a, *b, query.sort));
    selected
}

/// Owned variant of [`apply`].
#[must_use]
pub fn apply_owned<T: CatalogEntry + Clone>(items: &[T], query: &CatalogQuery) -> Vec<T> {
    apply(items, query).into_iter().cloned().collect()
}

fn compare<T: CatalogEntry>(a: &T, b: &T, sort: SortKey) -> Ordering {
    match sort {
        SortKey::Title => a
            .title()
            .to_lowercase()
            .cmp(&b.title().to_lowercase())
            .then_with(|| a.title().cmp(b.title())),
        SortKey::Marks => b.marks().total_cmp(&a.marks()),
        SortKey::Difficulty => a.difficulty().rank().cmp(&b.difficulty().rank()),
        SortKey::Timeline => match T::TIMELINE {
            Timeline::Ascending => a.timeline_at().cmp(&b.timeline_at()),
            Timeline::Descending => b.timeline_at().cmp(&a.timeline_at()),
        },
    }
}
