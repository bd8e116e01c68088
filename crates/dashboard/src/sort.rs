//! Ordering of the game list.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, Utc};
use savevault_protocol::Game;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    Name,
    /// Creation date.
    Date,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

/// Sorts `games` in place. Names compare case-insensitively; dates that
/// do not parse sort before every valid date.
pub fn sort_games(games: &mut [Game], field: SortField, order: SortOrder) {
    games.sort_by(|a, b| {
        let ordering = match field {
            SortField::Name => compare_names(&a.name, &b.name),
            SortField::Date => parse_date(&a.created_at).cmp(&parse_date(&b.created_at)),
        };
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
