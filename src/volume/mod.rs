use std::collections::HashMap;

use bollard::models::{Volume, VolumeListResponse, VolumePruneResponse};
use bollard::volume::{CreateVolumeOptions, ListVolumesOptions, PruneVolumesOptions, RemoveVolumeOptions};
use bollard::Docker;
use tracing::{debug, info};

use crate::error::DockerError;
use crate::filter::Filters;

#[derive(Debug, Clone, Default)]
pub struct CreateVolume {
    /// 비우면 `local`
    pub driver: String,
    pub driver_opts: HashMap<String, String>,
    pub labels: HashMap<String, String>,
}

impl CreateVolume {
    pub fn to_options(&self, name: &str) -> CreateVolumeOptions<String> {
        CreateVolumeOptions {
            name: name.to_string(),
            driver: if self.driver.is_empty() { "local".to_string() } else { self.driver.clone() },
            driver_opts: self.driver_opts.clone(),
            labels: self.labels.clone(),
        }
    }
}

#[derive(Clone)]
pub struct VolumeClient {
    docker: Docker,
}

impl VolumeClient {
    pub fn new(docker: Docker) -> Self {
        Self { docker }
    }

    pub async fn list(&self, filters: &Filters) -> Result<VolumeListResponse, DockerError> {
        let response = self
            .docker
            .list_volumes(Some(ListVolumesOptions { filters: filters.to_args() }))
            .await
            .map_err(DockerError::api("볼륨 목록 조회"))?;
        debug!(count = response.volumes.as_ref().map_or(0, Vec::len), "볼륨 목록 조회 성공");
        Ok(response)
    }

    pub async fn inspect(&self, name: &str) -> Result<Volume, DockerError> {
        self.docker
            .inspect_volume(name)
            .await
            .map_err(DockerError::api(format!("볼륨 {} 조회", name)))
    }

    pub async fn inspect_raw(&self, name: &str) -> Result<String, DockerError> {
        let volume = self.inspect(name).await?;
        serde_json::to_string_pretty(&volume).map_err(|source| DockerError::DecodeError {
            source,
            context: format!("볼륨 {} 조회 결과", name),
        })
    }

    /// 같은 이름의 볼륨이 있으면 `VolumeConflict`
    pub async fn create(&self, name: &str, options: &CreateVolume) -> Result<Volume, DockerError> {
        match self.inspect(name).await {
            Ok(_) => return Err(DockerError::VolumeConflict { name: name.to_string() }),
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e),
        }

        let volume = self
            .docker
            .create_volume(options.to_options(name))
            .await
            .map_err(DockerError::api(format!("볼륨 {} 생성", name)))?;
        info!(volume = %volume.name, driver = %volume.driver, "볼륨 생성");
        Ok(volume)
    }

    pub async fn remove(&self, name: &str, force: bool) -> Result<(), DockerError> {
        self.docker
            .remove_volume(name, Some(RemoveVolumeOptions { force }))
            .await
            .map_err(DockerError::api(format!("볼륨 {} 삭제", name)))?;
        info!(volume = %name, force, "볼륨 삭제");
        Ok(())
    }

    /// 사용하지 않는 볼륨 정리
    pub async fn prune(&self, filters: &Filters) -> Result<VolumePruneResponse, DockerError> {
        let pruned = self
            .docker
            .prune_volumes(Some(PruneVolumesOptions { filters: filters.to_args() }))
            .await
            .map_err(DockerError::api("볼륨 정리"))?;
        info!(
            removed = pruned.volumes_deleted.as_ref().map_or(0, Vec::len),
            reclaimed = pruned.space_reclaimed.unwrap_or(0),
            "볼륨 정리 완료"
        );
        Ok(pruned)
    }
}
