//! Aggregation behaviour through the public service API

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{latest_json, photos_json, RecordingObserver, Reply, ScriptedTransport};
use rover_photos::app::{
    CacheConfig, FetchEvent, LatestStrategy, NoopObserver, PhotoService, ServiceConfig,
    SourceConfig,
};
use rover_photos::errors::TransportError;
use serde_json::json;

fn service(transport: ScriptedTransport) -> PhotoService<ScriptedTransport> {
    PhotoService::new(transport).with_observer(Arc::new(NoopObserver))
}

#[tokio::test]
async fn test_one_failing_source_does_not_break_the_others() {
    let transport = ScriptedTransport::new()
        .json("/rovers/curiosity/latest_photos", latest_json(1, 5, "Curiosity"))
        .reply("/rovers/opportunity/latest_photos", Reply::Status(502))
        .json("/rovers/spirit/latest_photos", latest_json(100, 3, "Spirit"));
    let service = service(transport);

    let all = service.get_photos_from_all_sources().await;

    assert_eq!(all.len(), 8);
    assert!(all[..5].iter().all(|p| p.source_name() == "Curiosity"));
    assert!(all[5..].iter().all(|p| p.source_name() == "Spirit"));
}

#[tokio::test]
async fn test_latest_photos_fall_back_to_known_good_date() {
    let mut transport = ScriptedTransport::new()
        .json("/rovers/curiosity/latest_photos", json!({ "latest_photos": [] }))
        .json("/rovers/curiosity", json!({ "rover": { "id": 5, "name": "Curiosity", "max_sol": 4100 } }))
        .json("/rovers/curiosity/photos?earth_date=2024-01-01", photos_json(1, 4, "Curiosity"));
    for sol in 4091..=4100 {
        transport = transport.json(
            &format!("/rovers/curiosity/photos?sol={}", sol),
            json!({ "photos": [] }),
        );
    }
    let service = service(transport);

    let found = service.get_latest_photos("curiosity").await;

    assert_eq!(found.len(), 4);
    let requests = service.transport().requests();
    assert_eq!(requests.iter().filter(|r| r.contains("?sol=")).count(), 10);
    assert_eq!(
        requests.last().map(String::as_str),
        Some("/rovers/curiosity/photos?earth_date=2024-01-01")
    );
}

#[tokio::test]
async fn test_latest_photos_for_a_broken_source_are_empty() {
    let service = service(ScriptedTransport::new());
    assert!(service.get_latest_photos("spirit").await.is_empty());
}

#[tokio::test]
async fn test_metadata_lookups_propagate_errors() {
    let transport = ScriptedTransport::new()
        .reply("/rovers/spirit", Reply::Status(503))
        .reply("/manifests/spirit", Reply::Status(500));
    let service = service(transport);

    assert!(matches!(
        service.get_rover_info("spirit").await,
        Err(TransportError::Status { status: 503, .. })
    ));
    assert!(matches!(
        service.get_rover_manifest("spirit").await,
        Err(TransportError::Status { status: 500, .. })
    ));
}

#[tokio::test]
async fn test_custom_source_table_drives_fan_out_and_fallback() {
    let config = ServiceConfig::default()
        .with_sources(vec![
            SourceConfig::new("spirit", "2009-12-01"),
            SourceConfig::new("curiosity", "2024-01-01"),
        ])
        .with_latest_strategies(vec![LatestStrategy::LatestEndpoint])
        .with_call_timeout(Duration::from_secs(1));
    let transport = ScriptedTransport::new().json(
        "/rovers/spirit/photos?earth_date=2009-12-01&page=1",
        photos_json(7, 2, "Spirit"),
    );
    let observer = Arc::new(RecordingObserver::default());
    let service = PhotoService::with_config(transport, config, CacheConfig::default())
        .with_observer(observer.clone());

    let all = service.get_photos_from_all_sources().await;

    assert_eq!(all.len(), 2);
    assert_eq!(
        service.transport().requests(),
        vec![
            "/rovers/spirit/latest_photos",
            "/rovers/curiosity/latest_photos",
            "/rovers/spirit/photos?earth_date=2009-12-01&page=1",
        ]
    );
    let events = observer.events();
    assert!(events.contains(&FetchEvent::AggregateComplete {
        sources: 2,
        photo_count: 0
    }));
}

#[tokio::test]
async fn test_repeated_queries_are_served_from_cache() {
    let transport = ScriptedTransport::new()
        .json("/rovers/opportunity/photos?sol=5111&page=1", photos_json(1, 3, "Opportunity"))
        .json(
            "/rovers/opportunity/photos?earth_date=2018-06-01&page=1",
            photos_json(4, 2, "Opportunity"),
        );
    let service = service(transport);

    for _ in 0..3 {
        assert_eq!(service.get_photos_by_sol("opportunity", 5111, 1).await.unwrap().len(), 3);
        assert_eq!(
            service
                .get_photos_by_earth_date("opportunity", "2018-06-01", 1)
                .await
                .unwrap()
                .len(),
            2
        );
    }

    assert_eq!(service.transport().requests().len(), 2);
    let stats = service.cache_stats().await;
    assert_eq!(stats.entries, 2);
    assert_eq!(stats.hits, 4);
}

#[tokio::test]
async fn test_short_ttl_expires_entries() {
    let transport = ScriptedTransport::new().json(
        "/rovers/spirit",
        json!({ "rover": { "id": 7, "name": "Spirit", "max_sol": 2208, "status": "complete" } }),
    );
    let service = PhotoService::with_config(
        transport,
        ServiceConfig::default(),
        CacheConfig::with_ttl(Duration::from_millis(20)),
    )
    .with_observer(Arc::new(NoopObserver));

    let rover = service.get_rover_info("spirit").await.unwrap();
    assert_eq!(rover.status.as_deref(), Some("complete"));
    assert_eq!(rover.landing_date, None);

    tokio::time::sleep(Duration::from_millis(40)).await;
    service.get_rover_info("spirit").await.unwrap();
    assert_eq!(service.transport().requests().len(), 2);
}
