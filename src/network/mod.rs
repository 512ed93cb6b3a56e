mod options;

pub use options::{CreateNetwork, InspectNetwork, IpNet, NetworkDriver, NetworkScope};

use bollard::models::{Network, NetworkCreateResponse, NetworkPruneResponse};
use bollard::network::{ListNetworksOptions, PruneNetworksOptions};
use bollard::Docker;
use tracing::{debug, info, warn};

use crate::error::DockerError;
use crate::filter::Filters;

#[derive(Clone)]
pub struct NetworkClient {
    docker: Docker,
}

impl NetworkClient {
    pub fn new(docker: Docker) -> Self {
        Self { docker }
    }

    pub async fn list(&self, filters: &Filters) -> Result<Vec<Network>, DockerError> {
        let networks = self
            .docker
            .list_networks(Some(ListNetworksOptions { filters: filters.to_args() }))
            .await
            .map_err(DockerError::api("네트워크 목록 조회"))?;
        debug!(count = networks.len(), "네트워크 목록 조회 성공");
        Ok(networks)
    }

    /// 대상은 네트워크 이름 또는 id
    pub async fn inspect(&self, target: &str, options: &InspectNetwork) -> Result<Network, DockerError> {
        self.docker
            .inspect_network(target, options.to_options())
            .await
            .map_err(DockerError::api(format!("네트워크 {} 조회", target)))
    }

    pub async fn inspect_raw(&self, target: &str, options: &InspectNetwork) -> Result<String, DockerError> {
        let network = self.inspect(target, options).await?;
        serde_json::to_string_pretty(&network).map_err(|source| DockerError::DecodeError {
            source,
            context: format!("네트워크 {} 조회 결과", target),
        })
    }

    pub async fn create(&self, name: &str, options: &CreateNetwork) -> Result<NetworkCreateResponse, DockerError> {
        let created = self
            .docker
            .create_network(options.to_options(name))
            .await
            .map_err(DockerError::api(format!("네트워크 {} 생성", name)))?;

        if let Some(warning) = created.warning.as_deref().filter(|w| !w.is_empty()) {
            warn!(network = %name, warning = %warning, "네트워크 생성 경고");
        }
        info!(network = %name, driver = %options.driver, id = ?created.id, "네트워크 생성");
        Ok(created)
    }

    pub async fn remove(&self, target: &str) -> Result<(), DockerError> {
        self.docker
            .remove_network(target)
            .await
            .map_err(DockerError::api(format!("네트워크 {} 삭제", target)))?;
        info!(network = %target, "네트워크 삭제");
        Ok(())
    }

    /// 사용하지 않는 네트워크 정리
    pub async fn prune(&self, filters: &Filters) -> Result<NetworkPruneResponse, DockerError> {
        let pruned = self
            .docker
            .prune_networks(Some(PruneNetworksOptions { filters: filters.to_args() }))
            .await
            .map_err(DockerError::api("네트워크 정리"))?;
        info!(
            removed = pruned.networks_deleted.as_ref().map_or(0, Vec::len),
            "네트워크 정리 완료"
        );
        Ok(pruned)
    }
}
