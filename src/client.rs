use bollard::{Docker, API_DEFAULT_VERSION};
use tracing::{debug, info};

use crate::container::ContainerClient;
use crate::error::DockerError;
use crate::image::ImageClient;
use crate::network::NetworkClient;
use crate::settings::DockerSettings;
use crate::system::SystemClient;
use crate::volume::VolumeClient;

/// 설정에 따라 데몬에 연결한다
pub async fn connect(settings: &DockerSettings) -> Result<Docker, DockerError> {
    let docker = match settings.host.as_deref() {
        None => {
            debug!("로컬 기본 설정으로 Docker 연결");
            Docker::connect_with_local_defaults()?
        }
        Some(host) if host.starts_with("tcp://") || host.starts_with("http://") => {
            let addr = host.replacen("tcp://", "http://", 1);
            debug!(host = %addr, "HTTP 로 Docker 연결");
            Docker::connect_with_http(&addr, settings.timeout, API_DEFAULT_VERSION)?
        }
        Some(host) => connect_socket(host, settings.timeout)?,
    };

    let docker = if settings.negotiate_version {
        docker.negotiate_version().await.map_err(|e| DockerError::ConnectionError {
            source: e,
            context: "API 버전 협상".to_string(),
        })?
    } else {
        docker
    };

    info!(host = ?settings.host, "Docker 데몬 연결 완료");
    Ok(docker)
}

#[cfg(unix)]
fn connect_socket(host: &str, timeout: u64) -> Result<Docker, DockerError> {
    let path = host.strip_prefix("unix://").unwrap_or(host);
    debug!(socket = %path, "유닉스 소켓으로 Docker 연결");
    Ok(Docker::connect_with_unix(path, timeout, API_DEFAULT_VERSION)?)
}

#[cfg(not(unix))]
fn connect_socket(host: &str, _timeout: u64) -> Result<Docker, DockerError> {
    debug!(host = %host, "유닉스 소켓을 지원하지 않는 플랫폼, 로컬 기본값 사용");
    Ok(Docker::connect_with_local_defaults()?)
}

/// 하나의 연결을 공유하는 도메인별 클라이언트 묶음
#[derive(Clone)]
pub struct DockerKit {
    docker: Docker,
}

impl DockerKit {
    pub fn new(docker: Docker) -> Self {
        Self { docker }
    }

    pub async fn connect(settings: &DockerSettings) -> Result<Self, DockerError> {
        Ok(Self::new(connect(settings).await?))
    }

    /// 로컬 기본값으로 연결하고 API 버전을 협상한다
    pub async fn with_defaults() -> Result<Self, DockerError> {
        Self::connect(&DockerSettings::default()).await
    }

    pub fn docker(&self) -> &Docker {
        &self.docker
    }

    pub fn containers(&self) -> ContainerClient {
        ContainerClient::new(self.docker.clone())
    }

    pub fn images(&self) -> ImageClient {
        ImageClient::new(self.docker.clone())
    }

    pub fn networks(&self) -> NetworkClient {
        NetworkClient::new(self.docker.clone())
    }

    pub fn volumes(&self) -> VolumeClient {
        VolumeClient::new(self.docker.clone())
    }

    pub fn system(&self) -> SystemClient {
        SystemClient::new(self.docker.clone())
    }
}
