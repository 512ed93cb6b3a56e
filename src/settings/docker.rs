use serde::Deserialize;
use std::env;
use tracing::debug;
use super::{parse_env_var, SettingsError};

pub type Result<T> = std::result::Result<T, SettingsError>;

#[derive(Debug, Clone, Deserialize)]
pub struct DockerSettings {
    /// 데몬 주소 (`unix:///var/run/docker.sock`, `tcp://host:2375`, 소켓 경로)
    /// 없으면 로컬 기본값으로 연결
    #[serde(default)]
    pub host: Option<String>,

    /// 요청 타임아웃 (초)
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// 연결 후 API 버전 협상 여부
    #[serde(default = "default_negotiate_version")]
    pub negotiate_version: bool,
}

fn default_timeout() -> u64 {
    120
}

fn default_negotiate_version() -> bool {
    true
}

fn is_supported_host(host: &str) -> bool {
    ["unix://", "tcp://", "http://"]
        .iter()
        .any(|scheme| host.starts_with(scheme))
        || host.starts_with('/')
}

/// `DOCKER_HOST` 는 docker CLI 와 공유하므로 지원하지 않는 주소(ssh:// 등)는 건너뛴다
fn shared_docker_host() -> Option<String> {
    let host = env::var("DOCKER_HOST").ok().filter(|h| !h.is_empty())?;
    if is_supported_host(&host) {
        Some(host)
    } else {
        debug!(host = %host, "지원하지 않는 DOCKER_HOST 주소, 로컬 기본값 사용");
        None
    }
}

impl DockerSettings {
    pub fn from_env() -> Result<Self> {
        let host = env::var("DOCKER_KIT_HOST")
            .ok()
            .filter(|h| !h.is_empty())
            .or_else(shared_docker_host);

        let settings = Self {
            host,
            timeout: parse_env_var("DOCKER_KIT_TIMEOUT", default_timeout)?,
            negotiate_version: parse_env_var("DOCKER_KIT_NEGOTIATE_VERSION", default_negotiate_version)?,
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.timeout == 0 {
            return Err(SettingsError::EnvVarInvalid {
                var_name: "DOCKER_KIT_TIMEOUT".to_string(),
                value: self.timeout.to_string(),
                reason: "타임아웃은 0보다 커야 합니다".to_string(),
            });
        }

        if let Some(host) = &self.host {
            if !is_supported_host(host) {
                return Err(SettingsError::EnvVarInvalid {
                    var_name: "DOCKER_KIT_HOST".to_string(),
                    value: host.clone(),
                    reason: "unix://, tcp://, http:// 또는 절대 경로만 지원합니다".to_string(),
                });
            }
        }

        Ok(())
    }
}

impl Default for DockerSettings {
    fn default() -> Self {
        Self {
            host: None,
            timeout: default_timeout(),
            negotiate_version: default_negotiate_version(),
        }
    }
}
