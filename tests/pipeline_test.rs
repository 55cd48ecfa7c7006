//! End-to-end: bytes in, spans out, through a flaky collector.

use std::time::Duration;

use edge_trace_shipper::config::ShipperConfig;
use bytes::Bytes;
use edge_trace_shipper::delivery::{Collector, DeliveryError, HttpCollector};
use edge_trace_shipper::ingest::{FrameError, IngestError};
use edge_trace_shipper::{Pipeline, PipelineError};
use serde_json::Value;
use tokio::io::AsyncWriteExt;

mod common;

fn config(collector_url: String) -> ShipperConfig {
    let mut config = ShipperConfig::default();
    config.collector.url = collector_url;
    config.collector.retry_delay_ms = 50;
    config
}

fn trace_id(body: &[u8]) -> String {
    let spans: Value = serde_json::from_slice(body).unwrap();
    assert_eq!(spans.as_array().unwrap().len(), 1);
    spans[0]["traceId"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_records_reach_collector_through_retries() {
    let mock = common::start_programmable_collector(|index| async move {
        if index < 2 {
            (503, "warming up".to_string())
        } else {
            (202, String::new())
        }
    })
    .await;

    let config = config(mock.url());
    let (mut writer, reader) = tokio::io::duplex(64);
    let collector = HttpCollector::new(&config.collector).unwrap();
    let pipeline = tokio::spawn(Pipeline::new(reader, collector, &config).run());

    writer
        .write_all(
            concat!(
                r#"{"trace_id":"first","request_time":"0.125","time":"2024-01-01T00:00:00Z","request":"GET /","status":"200","request_method":"GET","remote_addr":"1.2.3.4"}"#,
                "\n",
                "not json\n",
                r#"{"trace_id":"no-time"}"#,
                "\n",
                r#"{"trace_id":"second","request_time":0.5,"time":"01/Jan/2024:00:00:01 +0000"}"#,
                "\n",
            )
            .as_bytes(),
        )
        .await
        .unwrap();

    assert!(mock.wait_for_accepted(2, Duration::from_secs(10)).await);

    let requests = mock.requests();
    assert_eq!(requests.len(), 4);
    assert!(requests[..3].iter().all(|r| r.body == requests[0].body));
    let ids: Vec<String> = requests.iter().map(|r| trace_id(&r.body)).collect();
    assert_eq!(ids, vec!["first", "first", "first", "second"]);

    let first: Value = serde_json::from_slice(&requests[2].body).unwrap();
    assert_eq!(first[0]["duration"], 125);
    assert_eq!(first[0]["timestamp"], 1_704_067_200_000_000u64);

    let second: Value = serde_json::from_slice(&requests[3].body).unwrap();
    assert_eq!(second[0]["duration"], 500);
    assert_eq!(second[0]["timestamp"], 1_704_067_201_000_000u64);

    // Closing the source ends the pipeline with a channel failure.
    drop(writer);
    let result = tokio::time::timeout(Duration::from_secs(5), pipeline)
        .await
        .unwrap()
        .unwrap();
    assert!(matches!(
        result,
        Err(PipelineError::Ingest(IngestError::Source(FrameError::Closed { pending: 0 })))
    ));
}

#[tokio::test]
async fn test_partial_record_is_not_shipped_on_close() {
    let mock = common::start_mock_collector().await;
    let config = config(mock.url());
    let (mut writer, reader) = tokio::io::duplex(64);
    let collector = HttpCollector::new(&config.collector).unwrap();
    let pipeline = tokio::spawn(Pipeline::new(reader, collector, &config).run());

    writer
        .write_all(br#"{"trace_id":"whole","time":"2024-01-01T00:00:00Z"}"#)
        .await
        .unwrap();
    writer.write_all(b"\n{\"trace_id\":\"cut").await.unwrap();

    assert!(mock.wait_for_accepted(1, Duration::from_secs(5)).await);
    drop(writer);

    let result = tokio::time::timeout(Duration::from_secs(5), pipeline)
        .await
        .unwrap()
        .unwrap();
    assert!(matches!(
        result,
        Err(PipelineError::Ingest(IngestError::Source(FrameError::Closed { pending: 16 })))
    ));
    assert_eq!(mock.requests().len(), 1);
}

/// Collector whose every submit panics.
struct PanickingCollector;

impl Collector for PanickingCollector {
    async fn submit(&self, _payload: Bytes) -> Result<(), DeliveryError> {
        panic!("collector exploded");
    }

    fn endpoint(&self) -> &str {
        "panicking"
    }
}

#[tokio::test]
async fn test_worker_panic_stops_pipeline() {
    let config = config("http://127.0.0.1:9/api/v1/spans".to_string());
    let (mut writer, reader) = tokio::io::duplex(64);
    let pipeline = tokio::spawn(Pipeline::new(reader, PanickingCollector, &config).run());

    writer
        .write_all(b"{\"trace_id\":\"boom\",\"time\":\"2024-01-01T00:00:00Z\"}\n")
        .await
        .unwrap();

    let result = tokio::time::timeout(Duration::from_secs(5), pipeline)
        .await
        .unwrap()
        .unwrap();
    match result {
        Err(PipelineError::WorkerPanicked(message)) => {
            assert!(message.contains("collector exploded"), "{message}");
        }
        other => panic!("expected worker panic, got {other:?}"),
    }
    drop(writer);
}
