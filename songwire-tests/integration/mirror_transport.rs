//! HTTP mirror transport and pool resolution against live HTTP doubles

use std::time::{Duration, Instant};

use songwire_core::{
    CanonicalId, HttpMirrorTransport, MirrorEndpoint, MirrorMiss, MirrorPool, MirrorTransport,
    ResolutionOutcome,
};
use wiremock::{MockServer, ResponseTemplate};

use crate::common::{mirror_config, mount_mirror, streams_body};

fn id() -> CanonicalId {
    CanonicalId::new("X1").unwrap()
}

async fn fetch(server: &MockServer) -> Result<Vec<songwire_core::StreamCandidate>, MirrorMiss> {
    let config = mirror_config(&[server], Duration::from_secs(2));
    let transport = HttpMirrorTransport::new(&config).unwrap();
    let endpoint = MirrorEndpoint::parse(&server.uri()).unwrap();

    transport.fetch_streams(&endpoint, &id()).await
}

#[tokio::test]
async fn test_transport_reads_audio_streams() {
    let server = MockServer::start().await;
    mount_mirror(
        &server,
        "X1",
        ResponseTemplate::new(200).set_body_json(streams_body(&[
            ("WEBMA_OPUS", "https://cdn.example/opus"),
            ("M4A", "https://cdn.example/m4a"),
        ])),
        1,
    )
    .await;

    let candidates = fetch(&server).await.unwrap();

    assert_eq!(candidates.len(), 2);
    assert_eq!(candidates[1].format, "M4A");
    assert_eq!(candidates[1].url, "https://cdn.example/m4a");
}

#[tokio::test]
async fn test_transport_classifies_misses() {
    let server = MockServer::start().await;
    mount_mirror(&server, "X1", ResponseTemplate::new(502), 1).await;
    assert_eq!(fetch(&server).await, Err(MirrorMiss::Status { status: 502 }));

    let server = MockServer::start().await;
    mount_mirror(
        &server,
        "X1",
        ResponseTemplate::new(200).set_body_string("<html>rate limited</html>"),
        1,
    )
    .await;
    assert!(matches!(fetch(&server).await, Err(MirrorMiss::Malformed { .. })));

    let server = MockServer::start().await;
    mount_mirror(
        &server,
        "X1",
        ResponseTemplate::new(200).set_body_json(streams_body(&[])),
        1,
    )
    .await;
    assert_eq!(fetch(&server).await, Err(MirrorMiss::Empty));
}

#[tokio::test]
async fn test_pool_skips_failing_mirror() {
    let broken = MockServer::start().await;
    let healthy = MockServer::start().await;

    // Random order: the broken mirror may or may not be reached first
    mount_mirror(&broken, "X1", ResponseTemplate::new(500), 0..=1).await;
    mount_mirror(
        &healthy,
        "X1",
        ResponseTemplate::new(200).set_body_json(streams_body(&[
            ("webm", "https://cdn.example/w"),
            ("m4a", "https://cdn.example/u"),
        ])),
        1,
    )
    .await;

    let pool = MirrorPool::from_config(&mirror_config(
        &[&broken, &healthy],
        Duration::from_secs(2),
    ))
    .unwrap();

    match pool.resolve(&id()).await {
        ResolutionOutcome::Resolved(stream) => {
            assert_eq!(stream.url, "https://cdn.example/u");
            assert_eq!(stream.format, "m4a");
            assert_eq!(stream.endpoint.base_url(), healthy.uri());
        }
        other => panic!("expected resolution, got {other:?}"),
    }
}

#[tokio::test]
async fn test_pool_skips_mirror_with_unusable_url() {
    let bogus = MockServer::start().await;
    let healthy = MockServer::start().await;

    mount_mirror(
        &bogus,
        "X1",
        ResponseTemplate::new(200).set_body_json(streams_body(&[("m4a", "/videoplayback?id=1")])),
        0..=1,
    )
    .await;
    mount_mirror(
        &healthy,
        "X1",
        ResponseTemplate::new(200).set_body_json(streams_body(&[("m4a", "https://cdn.example/u")])),
        1,
    )
    .await;

    let pool = MirrorPool::from_config(&mirror_config(
        &[&bogus, &healthy],
        Duration::from_secs(2),
    ))
    .unwrap();

    assert_eq!(
        pool.resolve(&id()).await.into_url().as_deref(),
        Some("https://cdn.example/u")
    );
}

#[tokio::test]
async fn test_pool_exhaustion_tries_each_mirror_once() {
    let first = MockServer::start().await;
    let second = MockServer::start().await;
    let third = MockServer::start().await;

    mount_mirror(&first, "X1", ResponseTemplate::new(500), 1).await;
    mount_mirror(
        &second,
        "X1",
        ResponseTemplate::new(200).set_body_string("not json"),
        1,
    )
    .await;
    mount_mirror(
        &third,
        "X1",
        ResponseTemplate::new(200).set_body_json(streams_body(&[])),
        1,
    )
    .await;

    let pool = MirrorPool::from_config(&mirror_config(
        &[&first, &second, &third],
        Duration::from_secs(2),
    ))
    .unwrap();

    assert_eq!(
        pool.resolve(&id()).await,
        ResolutionOutcome::Exhausted { attempts: 3 }
    );
    // Call counts are verified when the servers drop
}

#[tokio::test]
async fn test_pool_bounds_slow_mirror() {
    let slow = MockServer::start().await;
    mount_mirror(
        &slow,
        "X1",
        ResponseTemplate::new(200)
            .set_body_json(streams_body(&[("m4a", "https://cdn.example/late")]))
            .set_delay(Duration::from_secs(10)),
        1,
    )
    .await;

    let pool = MirrorPool::from_config(&mirror_config(&[&slow], Duration::from_millis(300)))
        .unwrap();

    let started = Instant::now();
    let outcome = pool.resolve(&id()).await;

    assert_eq!(outcome, ResolutionOutcome::Exhausted { attempts: 1 });
    assert!(started.elapsed() < Duration::from_secs(5));
}
