//! Derived-view pipeline properties over decoded photos

mod common;

use common::photo;
use rover_photos::app::view::{
    filter_photos, paginate, sort_photos, unique_cameras, unique_sources, FilterCriteria,
    SortField, SortOrder, ViewQuery,
};
use rover_photos::app::Photo;

fn archive() -> Vec<Photo> {
    vec![
        photo(102693, 1000, "2015-05-30", "FHAZ", "Curiosity"),
        photo(102694, 1000, "2015-05-30", "NAVCAM", "Curiosity"),
        photo(424905, 1, "2004-01-05", "PANCAM", "Spirit"),
        photo(1, 5111, "2018-06-01", "NAVCAM", "Opportunity"),
        photo(2, 4100, "2024-02-19", "MAST", "Curiosity"),
        photo(3, 4100, "2024-02-19", "CHEMCAM", "Curiosity"),
    ]
}

fn ids(photos: &[Photo]) -> Vec<u64> {
    photos.iter().map(|p| p.id).collect()
}

#[test]
fn test_unconstrained_filter_is_identity() {
    let photos = archive();
    assert_eq!(filter_photos(&photos, &FilterCriteria::default()), photos);
}

#[test]
fn test_filter_is_idempotent_for_mixed_criteria() {
    let criteria = FilterCriteria::new()
        .with_source("curiosity")
        .with_camera("NAVCAM")
        .with_camera("MAST");
    let once = filter_photos(&archive(), &criteria);
    assert_eq!(ids(&once), vec![102694, 2]);
    assert_eq!(filter_photos(&once, &criteria), once);
}

#[test]
fn test_id_sort_is_monotonic_both_ways() {
    let asc = sort_photos(&archive(), SortField::Id, SortOrder::Asc);
    assert!(asc.windows(2).all(|w| w[0].id <= w[1].id));

    let desc = sort_photos(&archive(), SortField::Id, SortOrder::Desc);
    assert!(desc.windows(2).all(|w| w[0].id >= w[1].id));
}

#[test]
fn test_date_sort_keeps_tied_photos_in_input_order() {
    let newest_first = sort_photos(&archive(), SortField::EarthDate, SortOrder::Desc);
    assert_eq!(ids(&newest_first), vec![2, 3, 1, 102693, 102694, 424905]);
}

#[test]
fn test_unique_values_feed_filter_choices() {
    let photos = archive();
    assert_eq!(unique_sources(&photos), vec!["Curiosity", "Opportunity", "Spirit"]);
    assert_eq!(
        unique_cameras(&photos),
        vec!["CHEMCAM", "FHAZ", "MAST", "NAVCAM", "PANCAM"]
    );
}

#[test]
fn test_query_then_paginate() {
    let query = ViewQuery::new(FilterCriteria::new().with_source("Curiosity"))
        .sorted_by(SortField::Sol, SortOrder::Asc);
    let shown = query.apply(&archive());
    assert_eq!(ids(&shown), vec![102693, 102694, 2, 3]);

    let second = paginate(&shown, 2, 3);
    assert_eq!(ids(&second.items), vec![3]);
    assert_eq!(second.total_pages, 2);
    assert!(!second.has_next());
}
