use std::{env, fs, path::Path};
use serde::Deserialize;
use tracing::debug;

pub mod logging;
mod error;
pub mod docker;

pub use logging::{LogFormat, LogOutput, LogSettings};
pub use docker::DockerSettings;
pub use error::SettingsError;

pub type Result<T> = std::result::Result<T, SettingsError>;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    // Docker 연결 설정
    #[serde(default)]
    pub docker: DockerSettings,

    // 로깅 설정
    #[serde(default)]
    pub logging: LogSettings,
}

impl Settings {
    /// `DOCKER_KIT_CONFIG_FILE` 이 있으면 TOML 파일에서, 없으면 환경 변수에서 읽는다
    pub fn load() -> Result<Self> {
        if let Ok(config_path) = env::var("DOCKER_KIT_CONFIG_FILE") {
            Self::from_toml_file(&config_path)
        } else {
            Self::from_env()
        }
    }

    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        debug!("설정 파일 로드: {}", path.as_ref().display());
        let content = fs::read_to_string(&path).map_err(|e| SettingsError::FileError {
            path: path.as_ref().to_string_lossy().to_string(),
            error: e,
        })?;

        let settings = Self::from_toml_str(&content)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| SettingsError::ParseError { source: e })
    }

    pub fn from_env() -> Result<Self> {
        let settings = Self {
            docker: DockerSettings::from_env()?,
            logging: LogSettings::from_env()?,
        };

        settings.validate()?;
        Ok(settings)
    }

    /// 설정 유효성 검증
    pub fn validate(&self) -> Result<()> {
        self.docker.validate()?;

        if let LogOutput::File(path) = &self.logging.output {
            if path.trim().is_empty() {
                return Err(SettingsError::InvalidConfig("로그 파일 경로가 비어 있습니다".to_string()));
            }
        }

        Ok(())
    }
}

pub fn parse_env_var<T: std::str::FromStr, F: FnOnce() -> T>(name: &str, default: F) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(val) => val.parse().map_err(|e: T::Err| SettingsError::EnvVarInvalid {
            var_name: name.to_string(),
            value: val,
            reason: e.to_string(),
        }),
        Err(env::VarError::NotPresent) => Ok(default()),
        Err(e) => Err(SettingsError::EnvVarInvalid {
            var_name: name.to_string(),
            value: "".to_string(),
            reason: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;
    use tracing::Level;

    #[test]
    fn test_settings_from_toml() {
        let toml_content = r#"
            [docker]
            host = "unix:///var/run/docker.sock"
            timeout = 30
            negotiate_version = false

            [logging]
            format = "json"
            level = "debug"
            output = "/tmp/docker-kit.log"
        "#;

        let settings = Settings::from_toml_str(toml_content).unwrap();
        assert_eq!(settings.docker.host.as_deref(), Some("unix:///var/run/docker.sock"));
        assert_eq!(settings.docker.timeout, 30);
        assert!(!settings.docker.negotiate_version);
        assert_eq!(settings.logging.format, LogFormat::Json);
        assert_eq!(settings.logging.level, Level::DEBUG);
        assert_eq!(settings.logging.output, LogOutput::File("/tmp/docker-kit.log".to_string()));
    }

    #[test]
    fn test_settings_defaults_from_empty_toml() {
        let settings = Settings::from_toml_str("").unwrap();
        assert!(settings.docker.host.is_none());
        assert_eq!(settings.docker.timeout, 120);
        assert!(settings.docker.negotiate_version);
        assert_eq!(settings.logging.format, LogFormat::Text);
        assert_eq!(settings.logging.output, LogOutput::Stdout);
    }

    #[test]
    fn test_settings_file_rejects_bad_host() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("docker-kit.toml");
        let mut file = File::create(&file_path).unwrap();
        file.write_all(b"[docker]\nhost = \"ssh://remote\"\n").unwrap();

        let err = Settings::from_toml_file(&file_path).unwrap_err();
        assert!(matches!(err, SettingsError::EnvVarInvalid { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = Settings::from_toml_file("/nonexistent/docker-kit.toml").unwrap_err();
        assert!(matches!(err, SettingsError::FileError { .. }));
    }
}
