use std::path::Path;

use time::format_description::well_known::Rfc3339;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::EnvFilter;

use crate::settings::{LogFormat, LogOutput, LogSettings, SettingsError};

/// 전역 tracing 구독자를 설정한다.
///
/// 돌려받은 guard 가 살아 있는 동안만 로그가 비동기로 기록된다.
pub fn init_logging(settings: &LogSettings) -> Result<WorkerGuard, SettingsError> {
    let filter = EnvFilter::from_default_env()
        .add_directive(settings.level.into())
        .add_directive(crate_directive(settings.level)?);

    let (writer, guard) = match &settings.output {
        LogOutput::Stdout => tracing_appender::non_blocking(std::io::stdout()),
        LogOutput::File(path) => {
            let path = Path::new(path);
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let file_name = path.file_name().ok_or_else(|| {
                SettingsError::InvalidConfig(format!("로그 파일 경로가 올바르지 않습니다: {}", path.display()))
            })?;
            tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, file_name))
        }
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(UtcTime::new(Rfc3339))
        .with_writer(writer)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    let result = match settings.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.try_init(),
    };
    result.map_err(|e| SettingsError::InvalidConfig(format!("로깅 초기화 실패: {}", e)))?;

    Ok(guard)
}

fn crate_directive(level: Level) -> Result<tracing_subscriber::filter::Directive, SettingsError> {
    format!("docker_kit={}", level.as_str().to_lowercase())
        .parse()
        .map_err(|e| SettingsError::InvalidConfig(format!("로그 필터 오류: {}", e)))
}
