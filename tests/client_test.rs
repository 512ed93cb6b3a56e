use docker_kit::settings::DockerSettings;
use docker_kit::{DockerError, DockerKit};

fn settings(host: &str) -> DockerSettings {
    DockerSettings {
        host: Some(host.to_string()),
        timeout: 5,
        // 협상하지 않으면 데몬에 요청을 보내지 않는다
        negotiate_version: false,
    }
}

#[tokio::test]
async fn test_connect_over_tcp_without_daemon() {
    let kit = DockerKit::connect(&settings("tcp://127.0.0.1:2375")).await;
    assert!(kit.is_ok());
}

#[cfg(unix)]
#[tokio::test]
async fn test_connect_over_socket_path_without_daemon() {
    let kit = DockerKit::connect(&settings("unix:///tmp/docker-kit-missing.sock")).await.unwrap();

    // 클라이언트는 만들어지지만 호출은 실패한다
    let result = kit.system().ping().await;
    assert!(matches!(result, Err(DockerError::ConnectionError { .. })));
}

#[test]
fn test_not_found_detection() {
    let err = DockerError::ApiError {
        source: bollard::errors::Error::DockerResponseServerError {
            status_code: 404,
            message: "no such volume".to_string(),
        },
        context: "볼륨 조회".to_string(),
    };
    assert!(err.is_not_found());

    let conflict = DockerError::VolumeConflict { name: "data".to_string() };
    assert!(!conflict.is_not_found());
    assert_eq!(conflict.to_string(), "Conflict: the volume name \"data\" is already exists");

    let missing = DockerError::ImageNotFound { reference: "team/app:v1".to_string() };
    assert!(missing.is_not_found());
    assert_eq!(missing.to_string(), "no such image: team/app:v1");
}
