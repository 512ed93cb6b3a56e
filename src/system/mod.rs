mod usage;

pub use usage::{human_size, ContainerUsage, DiskUsageSummary, ImageUsage, LocalVolumeUsage};

use bollard::models::{SystemDataUsageResponse, SystemInfo};
use bollard::system::Version;
use bollard::Docker;
use tracing::{debug, info};

use crate::error::DockerError;

#[derive(Clone)]
pub struct SystemClient {
    docker: Docker,
}

impl SystemClient {
    pub fn new(docker: Docker) -> Self {
        Self { docker }
    }

    /// 데몬 응답 확인. 정상이면 "OK"
    pub async fn ping(&self) -> Result<String, DockerError> {
        let pong = self.docker.ping().await.map_err(|source| DockerError::ConnectionError {
            source,
            context: "데몬 ping".to_string(),
        })?;
        debug!(response = %pong, "Docker 데몬 ping 성공");
        Ok(pong)
    }

    pub async fn info(&self) -> Result<SystemInfo, DockerError> {
        self.docker.info().await.map_err(DockerError::api("시스템 정보 조회"))
    }

    pub async fn version(&self) -> Result<Version, DockerError> {
        self.docker.version().await.map_err(DockerError::api("버전 조회"))
    }

    /// 원본 응답과 사람이 읽기 쉬운 요약을 함께 돌려준다
    pub async fn disk_usage(&self) -> Result<(SystemDataUsageResponse, DiskUsageSummary), DockerError> {
        let response = self.docker.df().await.map_err(DockerError::api("디스크 사용량 조회"))?;
        let summary = DiskUsageSummary::from_response(&response);
        info!(
            images = summary.images.len(),
            containers = summary.containers.len(),
            volumes = summary.local_volumes.len(),
            "디스크 사용량 조회 완료"
        );
        Ok((response, summary))
    }
}
