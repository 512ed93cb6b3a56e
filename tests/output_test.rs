use bollard::container::LogOutput;
use bytes::Bytes;
use docker_kit::output::{collect_combined, collect_output, Output};
use docker_kit::DockerError;

fn stdout(text: &'static str) -> Result<LogOutput, DockerError> {
    Ok(LogOutput::StdOut { message: Bytes::from_static(text.as_bytes()) })
}

fn stderr(text: &'static str) -> Result<LogOutput, DockerError> {
    Ok(LogOutput::StdErr { message: Bytes::from_static(text.as_bytes()) })
}

#[tokio::test]
async fn test_collect_output_splits_channels() {
    let items = vec![
        stdout("a"),
        stderr("1"),
        Ok(LogOutput::Console { message: Bytes::from_static(b"b") }),
        stderr("2"),
    ];

    let output = collect_output(futures_util::stream::iter(items)).await.unwrap();
    assert_eq!(
        output,
        Output {
            stdout: "ab".to_string(),
            stderr: "12".to_string(),
        }
    );
}

#[tokio::test]
async fn test_collect_combined_keeps_arrival_order() {
    let items = vec![stdout("a"), stderr("1"), stdout("b")];
    let combined = collect_combined(futures_util::stream::iter(items)).await.unwrap();
    assert_eq!(combined, "a1b");
}

#[tokio::test]
async fn test_collect_stops_at_stream_error() {
    let items = vec![
        stdout("a"),
        Err(DockerError::StreamEnded { context: "exec 출력".to_string() }),
        stdout("b"),
    ];
    let result = collect_combined(futures_util::stream::iter(items)).await;
    assert!(matches!(result, Err(DockerError::StreamEnded { .. })));
}
