use docker_kit::progress::{drive, BuildMessage, MessageAggregator, ProgressRecord, PullPushMessage};
use docker_kit::DockerError;

// 고정 메시지를 돌려주는 테스트용 레코드
struct Line {
    id: &'static str,
    text: &'static str,
}

impl ProgressRecord for Line {
    fn message(&self) -> String {
        self.text.to_string()
    }

    fn id(&self) -> &str {
        self.id
    }
}

fn pull(json: &str) -> PullPushMessage {
    PullPushMessage::from_json(json).unwrap()
}

#[test]
fn test_record_without_id_passes_through() {
    let mut aggregator = MessageAggregator::new();

    let summary = pull(r#"{"status":"Digest: sha256:abc"}"#);
    assert_eq!(aggregator.append(&summary), summary.message());
    assert!(aggregator.is_empty());

    // 이후 id 레코드에 영향이 없어야 한다
    let out = aggregator.append(&Line { id: "a", text: "10%" });
    assert_eq!(out, "10%");
}

#[test]
fn test_first_seen_order_is_kept() {
    let mut aggregator = MessageAggregator::new();
    aggregator.append(&Line { id: "b", text: "b-1" });
    aggregator.append(&Line { id: "a", text: "a-1" });
    let out = aggregator.append(&Line { id: "b", text: "b-2" });

    assert_eq!(out, "b-2\na-1");
    assert_eq!(aggregator.ids(), ["b".to_string(), "a".to_string()]);
}

#[test]
fn test_last_write_wins() {
    let mut aggregator = MessageAggregator::new();
    aggregator.append(&Line { id: "a", text: "10%" });
    let out = aggregator.append(&Line { id: "a", text: "20%" });

    assert_eq!(out, "20%");
    assert_eq!(aggregator.line_count(), 1);
}

#[test]
fn test_same_record_twice_does_not_duplicate() {
    let mut aggregator = MessageAggregator::new();
    let record = Line { id: "a", text: "done" };

    let first = aggregator.append(&record);
    let second = aggregator.append(&record);

    assert_eq!(first, second);
    assert_eq!(aggregator.line_count(), 1);
}

#[test]
fn test_error_detail_wins_over_status() {
    let record = pull(r#"{"id":"a1","status":"Downloading","errorDetail":{"message":"denied"},"error":"flat"}"#);
    assert_eq!(record.message(), "denied");
}

#[test]
fn test_build_stream_wins_over_aux_id() {
    let record = BuildMessage::from_json(r#"{"stream":"Step 1/2 : FROM alpine\n","aux":{"ID":"sha256:123"}}"#).unwrap();
    assert_eq!(record.message(), "Step 1/2 : FROM alpine\n");

    let aux_only = BuildMessage::from_json(r#"{"aux":{"ID":"sha256:123"}}"#).unwrap();
    assert_eq!(aux_only.message(), "sha256:123");
}

#[test]
fn test_layer_progress_scenario() {
    let mut aggregator = MessageAggregator::new();

    let outputs: Vec<String> = [
        r#"{"id":"L1","status":"Downloading","progress":"1/10"}"#,
        r#"{"id":"L2","status":"Downloading","progress":"3/10"}"#,
        r#"{"id":"L1","status":"Downloading","progress":"5/10"}"#,
    ]
    .iter()
    .map(|line| aggregator.append(&pull(line)))
    .collect();

    assert_eq!(
        outputs,
        vec![
            "L1: Downloading 1/10",
            "L1: Downloading 1/10\nL2: Downloading 3/10",
            "L1: Downloading 5/10\nL2: Downloading 3/10",
        ]
    );
}

#[test]
fn test_malformed_json_is_an_error() {
    let result = PullPushMessage::from_json("{not json");
    assert!(matches!(result, Err(DockerError::DecodeError { .. })));
}

#[tokio::test]
async fn test_drive_reports_every_view() {
    let records = vec![
        Ok(pull(r#"{"id":"L1","status":"Waiting"}"#)),
        Ok(pull(r#"{"status":"Pulling from library/alpine"}"#)),
        Ok(pull(r#"{"id":"L1","status":"Pull complete"}"#)),
    ];

    let mut views = Vec::new();
    let last = drive(futures_util::stream::iter(records), |view| views.push(view.to_string()))
        .await
        .unwrap();

    assert_eq!(views.len(), 3);
    assert_eq!(views[1], "Pulling from library/alpine ");
    assert_eq!(last, "L1: Pull complete ");
}

#[tokio::test]
async fn test_drive_stops_at_first_error() {
    let records: Vec<Result<PullPushMessage, DockerError>> = vec![
        Ok(pull(r#"{"id":"L1","status":"Waiting"}"#)),
        Err(DockerError::StreamEnded { context: "test".to_string() }),
        Ok(pull(r#"{"id":"L2","status":"Waiting"}"#)),
    ];

    let mut calls = 0;
    let result = drive(futures_util::stream::iter(records), |_| calls += 1).await;

    assert!(matches!(result, Err(DockerError::StreamEnded { .. })));
    assert_eq!(calls, 1);
}

mod engine_events {
    use super::*;
    use bollard::models::{BuildInfo, CreateImageInfo, ErrorDetail, ImageId, PushImageInfo};

    fn create_info(id: &str, status: &str, progress: &str) -> CreateImageInfo {
        CreateImageInfo {
            id: Some(id.to_string()),
            status: Some(status.to_string()),
            progress: Some(progress.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_pull_events_group_by_layer() {
        let mut aggregator = MessageAggregator::new();
        let events = [
            create_info("L1", "Downloading", "1/10"),
            create_info("L2", "Downloading", "3/10"),
            create_info("L1", "Downloading", "5/10"),
        ];

        let last = events
            .iter()
            .map(|event| aggregator.append(&PullPushMessage::from(event)))
            .last();

        assert_eq!(last.as_deref(), Some("L1: Downloading 5/10\nL2: Downloading 3/10"));
    }

    #[test]
    fn test_pull_event_error_detail() {
        let event = CreateImageInfo {
            id: Some("L1".to_string()),
            status: Some("Downloading".to_string()),
            error: Some("flat".to_string()),
            error_detail: Some(ErrorDetail {
                code: Some(401),
                message: Some("unauthorized".to_string()),
            }),
            ..Default::default()
        };
        assert_eq!(PullPushMessage::from(&event).message(), "unauthorized");

        let flat_only = CreateImageInfo {
            error: Some("manifest unknown".to_string()),
            ..Default::default()
        };
        assert_eq!(PullPushMessage::from(&flat_only).message(), "manifest unknown");
    }

    #[test]
    fn test_push_events_stay_on_one_line() {
        // 엔진 push 이벤트에는 레이어 id 가 없다
        let mut aggregator = MessageAggregator::new();
        let first = PullPushMessage::from(&PushImageInfo {
            status: Some("Pushing".to_string()),
            progress: Some("[=>] 1MB/10MB".to_string()),
            ..Default::default()
        });
        let second = PullPushMessage::from(&PushImageInfo {
            status: Some("Pushing".to_string()),
            progress: Some("[=>] 1MB/5MB".to_string()),
            ..Default::default()
        });

        assert!(!first.has_id());
        assert_eq!(aggregator.append(&first), "Pushing [=>] 1MB/10MB");
        assert_eq!(aggregator.append(&second), "Pushing [=>] 1MB/5MB");
        assert!(aggregator.is_empty());
    }

    #[test]
    fn test_build_event_precedence() {
        let step = BuildInfo {
            stream: Some("Step 1/2 : FROM alpine\n".to_string()),
            aux: Some(ImageId {
                id: Some("sha256:123".to_string()),
            }),
            ..Default::default()
        };
        assert_eq!(BuildMessage::from(&step).message(), "Step 1/2 : FROM alpine\n");

        let aux_only = BuildInfo {
            aux: Some(ImageId {
                id: Some("sha256:123".to_string()),
            }),
            ..Default::default()
        };
        assert_eq!(BuildMessage::from(&aux_only).message(), "sha256:123");

        let failed = BuildInfo {
            stream: Some("Step 2/2 : RUN false\n".to_string()),
            error_detail: Some(ErrorDetail {
                code: Some(1),
                message: Some("returned a non-zero code: 1".to_string()),
            }),
            ..Default::default()
        };
        assert_eq!(BuildMessage::from(&failed).message(), "returned a non-zero code: 1");
    }

    #[test]
    fn test_build_event_layer_status() {
        let event = BuildInfo {
            id: Some("L1".to_string()),
            status: Some("Extracting".to_string()),
            progress: Some("2/4".to_string()),
            ..Default::default()
        };
        let record = BuildMessage::from(&event);

        assert!(record.has_id());
        assert_eq!(record.message(), "L1: Extracting 2/4");
    }
}
