use docker_kit::logging::init_logging;
use docker_kit::settings::{LogFormat, LogOutput, LogSettings, SettingsError};

// 전역 구독자는 한 번만 설치할 수 있어서 한 테스트에서 모두 확인한다
#[test]
fn test_init_logging_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let settings = LogSettings {
        format: LogFormat::Json,
        level: tracing::Level::DEBUG,
        output: LogOutput::File(dir.path().join("docker-kit.log").to_string_lossy().into_owned()),
    };

    let guard = init_logging(&settings).unwrap();
    tracing::info!(container = "web", "로깅 초기화 확인");

    let again = init_logging(&LogSettings::default());
    assert!(matches!(again, Err(SettingsError::InvalidConfig(_))));

    drop(guard);
    let written = std::fs::read_dir(dir.path()).unwrap().count();
    assert!(written >= 1);
}
