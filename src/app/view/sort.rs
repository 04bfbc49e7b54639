//! Stable sorting by date, sol, camera or id

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::app::models::Photo;
use crate::errors::AppError;

/// Field a photo collection is sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    EarthDate,
    Sol,
    Camera,
    Id,
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn toggle(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortField::EarthDate => "earth_date",
            SortField::Sol => "sol",
            SortField::Camera => "camera",
            SortField::Id => "id",
        };
        f.write_str(name)
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Asc => f.write_str("asc"),
            SortOrder::Desc => f.write_str("desc"),
        }
    }
}

impl FromStr for SortField {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "earth_date" => Ok(SortField::EarthDate),
            "sol" => Ok(SortField::Sol),
            "camera" => Ok(SortField::Camera),
            "id" => Ok(SortField::Id),
            other => Err(AppError::generic(format!("unknown sort field: {}", other))),
        }
    }
}

impl FromStr for SortOrder {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(AppError::generic(format!("unknown sort order: {}", other))),
        }
    }
}

/// A new collection ordered by `field` in `order`
///
/// The sort is stable in both directions: photos with equal keys keep their
/// relative input order.
pub fn sort_photos(photos: &[Photo], field: SortField, order: SortOrder) -> Vec<Photo> {
    let mut sorted = photos.to_vec();
    sorted.sort_by(|a, b| {
        let ordering = compare(a, b, field);
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
    sorted
}

fn compare(a: &Photo, b: &Photo, field: SortField) -> Ordering {
    match field {
        SortField::EarthDate => parse_date(&a.earth_date).cmp(&parse_date(&b.earth_date)),
        SortField::Sol => a.sol.cmp(&b.sol),
        SortField::Camera => compare_names(a.camera_name(), b.camera_name()),
        SortField::Id => a.id.cmp(&b.id),
    }
}

// None orders before every valid date
fn parse_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

/// Dictionary-style comparison: letters first, then case with lowercase first
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| swap_case(a).cmp(&swap_case(b)))
}

fn swap_case(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_ascii_uppercase() {
                c.to_ascii_lowercase()
            } else {
                c.to_ascii_uppercase()
            }
        })
        .collect()
}
