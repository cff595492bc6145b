mod support;

use serde_json::json;
use spotex::{
    error::FetchError,
    spotify::{
        playlists,
        tracks::{self, FetchStage, PlaylistOutcome, SkipReason},
    },
};
use support::{API_URL, FakeTransport, script_playlist, script_playlists, track};

#[tokio::test]
async fn test_playlist_ids_keep_response_order() {
    let dir = tempfile::tempdir().unwrap();
    let config = support::config(dir.path());
    let transport = FakeTransport::new();
    script_playlists(&transport, &["p3", "p1", "p2"]);

    let ids = playlists::list_playlist_ids(&transport, &config, "token-1")
        .await
        .unwrap();

    assert_eq!(ids, vec!["p3", "p1", "p2"]);

    let calls = transport.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].url, format!("{API_URL}/me/playlists"));
    assert_eq!(calls[0].bearer.as_deref(), Some("token-1"));
}

#[tokio::test]
async fn test_only_first_page_of_playlists_is_read() {
    let dir = tempfile::tempdir().unwrap();
    let config = support::config(dir.path());
    let transport = FakeTransport::new();
    transport.on_get_json(
        &format!("{API_URL}/me/playlists"),
        &json!({
            "items": [{ "id": "p1" }],
            "next": format!("{API_URL}/me/playlists?offset=1"),
            "total": 2
        }),
    );

    let ids = playlists::list_playlist_ids(&transport, &config, "token-1")
        .await
        .unwrap();

    assert_eq!(ids, vec!["p1"]);
    assert_eq!(transport.call_count(), 1);
}

#[tokio::test]
async fn test_playlist_listing_failure_carries_upstream_status() {
    let dir = tempfile::tempdir().unwrap();
    let config = support::config(dir.path());
    let transport = FakeTransport::new();
    transport.on_get(&format!("{API_URL}/me/playlists"), 401, "unauthorized");

    let err = playlists::list_playlist_ids(&transport, &config, "token-1")
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Status { status: 401, .. }));
    assert_eq!(err.status_code().as_u16(), 401);
    assert_eq!(err.to_string(), "Failed to fetch playlists");
    assert_eq!(transport.call_count(), 1);
}

#[tokio::test]
async fn test_playlist_listing_transport_failure_is_bad_gateway() {
    let dir = tempfile::tempdir().unwrap();
    let config = support::config(dir.path());
    let transport = FakeTransport::new();
    transport.on_get_error(&format!("{API_URL}/me/playlists"), "timed out");

    let err = playlists::list_playlist_ids(&transport, &config, "token-1")
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Transport { .. }));
    assert_eq!(err.status_code().as_u16(), 502);
}

#[tokio::test]
async fn test_failed_metadata_skips_only_that_playlist() {
    let dir = tempfile::tempdir().unwrap();
    let config = support::config(dir.path());
    let transport = FakeTransport::new();
    transport.on_get(&format!("{API_URL}/playlists/p1"), 404, "not found");
    script_playlist(
        &transport,
        "p2",
        "Road Trip",
        vec![
            track("t1", "First", &["A"], "Album A", "2001-01-01"),
            track("t2", "Second", &["B"], "Album B", "2002"),
        ],
    );
    let ids = vec!["p1".to_string(), "p2".to_string()];

    let batch = tracks::fetch_batch(&transport, &config, "token-1", &ids).await;

    assert_eq!(batch.outcomes.len(), 2);
    match &batch.outcomes[0] {
        PlaylistOutcome::Skipped {
            playlist_id,
            reason,
        } => {
            assert_eq!(playlist_id, "p1");
            assert_eq!(reason.stage(), FetchStage::Metadata);
        }
        other => panic!("expected p1 to be skipped, got {other:?}"),
    }

    // the track listing of a playlist without metadata is never requested
    assert!(
        !transport
            .urls()
            .contains(&format!("{API_URL}/playlists/p1/tracks"))
    );

    let (raw, records) = batch.into_export();
    assert_eq!(raw.len(), 1);
    let names: Vec<&str> = records.iter().map(|r| r.track_name.as_str()).collect();
    assert_eq!(names, vec!["First", "Second"]);
    assert!(records.iter().all(|r| r.playlist_id == "p2"));
    assert!(records.iter().all(|r| r.playlist_name == "Road Trip"));
}

#[tokio::test]
async fn test_failed_track_listing_skips_playlist() {
    let dir = tempfile::tempdir().unwrap();
    let config = support::config(dir.path());
    let transport = FakeTransport::new();
    transport.on_get_json(
        &format!("{API_URL}/playlists/p1"),
        &json!({ "id": "p1", "name": "Broken" }),
    );
    transport.on_get(&format!("{API_URL}/playlists/p1/tracks"), 500, "oops");

    let err = tracks::fetch_tracks(&transport, &config, "token-1", "p1")
        .await
        .unwrap_err();

    assert_eq!(
        err,
        SkipReason::Status {
            stage: FetchStage::Tracks,
            status: 500,
            body: "oops".to_string(),
        }
    );
}

#[tokio::test]
async fn test_transport_failure_skips_playlist() {
    let dir = tempfile::tempdir().unwrap();
    let config = support::config(dir.path());
    let transport = FakeTransport::new();
    transport.on_get_error(&format!("{API_URL}/playlists/p1"), "connection refused");

    let err = tracks::fetch_tracks(&transport, &config, "token-1", "p1")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        SkipReason::Transport {
            stage: FetchStage::Metadata,
            ..
        }
    ));
}

#[tokio::test]
async fn test_record_fields_are_read_from_nested_track() {
    let dir = tempfile::tempdir().unwrap();
    let config = support::config(dir.path());
    let transport = FakeTransport::new();
    script_playlist(
        &transport,
        "p1",
        "Duets",
        vec![track(
            "t9",
            "Under Pressure",
            &["Queen", "David Bowie"],
            "Hot Space",
            "1982-05-21",
        )],
    );

    let playlist = tracks::fetch_tracks(&transport, &config, "token-1", "p1")
        .await
        .unwrap();

    assert_eq!(playlist.playlist_name, "Duets");
    assert_eq!(playlist.records.len(), 1);
    let record = &playlist.records[0];
    assert_eq!(record.playlist_id, "p1");
    assert_eq!(record.playlist_name, "Duets");
    assert_eq!(record.artist, "Queen");
    assert_eq!(record.track_name, "Under Pressure");
    assert_eq!(record.track_id, "t9");
    assert_eq!(record.album, "Hot Space");
    assert_eq!(record.release_date, "1982-05-21");
    assert_eq!(record.duration_ms, 200_000);

    // raw payload is kept verbatim, including fields the records drop
    assert_eq!(playlist.raw["items"][0]["added_at"], "2024-01-01T00:00:00Z");

    let calls = transport.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls.iter().all(|c| c.bearer.as_deref() == Some("token-1")));
}

#[tokio::test]
async fn test_batch_keeps_playlist_and_item_order() {
    let dir = tempfile::tempdir().unwrap();
    let config = support::config(dir.path());
    let transport = FakeTransport::new();
    script_playlist(
        &transport,
        "p1",
        "One",
        vec![
            track("a", "A", &["X"], "AA", "2000"),
            track("b", "B", &["X"], "AA", "2000"),
        ],
    );
    script_playlist(&transport, "p2", "Empty", vec![]);
    script_playlist(
        &transport,
        "p3",
        "Three",
        vec![track("c", "C", &["Y"], "CC", "2010")],
    );
    let ids = vec!["p3".to_string(), "p2".to_string(), "p1".to_string()];

    let batch = tracks::fetch_batch(&transport, &config, "token-1", &ids).await;

    assert_eq!(batch.skipped().count(), 0);
    assert_eq!(batch.fetched().count(), 3);

    let (raw, records) = batch.into_export();
    // the empty playlist still contributes its raw payload
    assert_eq!(raw.len(), 3);
    let ids: Vec<&str> = records.iter().map(|r| r.track_id.as_str()).collect();
    assert_eq!(ids, vec!["c", "a", "b"]);
}

#[tokio::test]
async fn test_raw_payload_keeps_upstream_key_order() {
    let dir = tempfile::tempdir().unwrap();
    let config = support::config(dir.path());
    let transport = FakeTransport::new();
    transport.on_get_json(
        &format!("{API_URL}/playlists/p1"),
        &json!({ "id": "p1", "name": "Ordered" }),
    );
    let body = r#"{"items":[],"href":"h","limit":100}"#;
    transport.on_get(&format!("{API_URL}/playlists/p1/tracks"), 200, body);

    let playlist = tracks::fetch_tracks(&transport, &config, "token-1", "p1")
        .await
        .unwrap();

    assert_eq!(serde_json::to_string(&playlist.raw).unwrap(), body);
}

#[tokio::test]
async fn test_only_first_page_of_tracks_is_read() {
    let dir = tempfile::tempdir().unwrap();
    let config = support::config(dir.path());
    let transport = FakeTransport::new();
    transport.on_get_json(
        &format!("{API_URL}/playlists/p1"),
        &json!({ "id": "p1", "name": "Long" }),
    );
    transport.on_get_json(
        &format!("{API_URL}/playlists/p1/tracks"),
        &json!({
            "items": [track("t1", "One", &["A"], "First", "2001")],
            "next": format!("{API_URL}/playlists/p1/tracks?offset=1"),
            "total": 2
        }),
    );

    let playlist = tracks::fetch_tracks(&transport, &config, "token-1", "p1")
        .await
        .unwrap();

    assert_eq!(playlist.records.len(), 1);
    assert_eq!(playlist.records[0].track_id, "t1");
    assert_eq!(transport.call_count(), 2);
}
