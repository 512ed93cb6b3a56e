use std::collections::HashMap;

use bollard::auth::DockerCredentials;
use bollard::image::{BuildImageOptions, ListImagesOptions, PruneImagesOptions, RemoveImageOptions};

use crate::filter::Filters;

#[derive(Debug, Clone, Default)]
pub struct ListImages {
    /// 중간 레이어 이미지 포함
    pub all: bool,
    pub digests: bool,
    pub filters: Filters,
}

impl From<&ListImages> for ListImagesOptions<String> {
    fn from(o: &ListImages) -> Self {
        ListImagesOptions {
            all: o.all,
            filters: o.filters.to_args(),
            digests: o.digests,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RemoveImage {
    pub force: bool,
    /// 태그 없는 부모 이미지도 삭제
    pub prune_children: bool,
}

impl From<&RemoveImage> for RemoveImageOptions {
    fn from(o: &RemoveImage) -> Self {
        RemoveImageOptions {
            force: o.force,
            noprune: !o.prune_children,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PruneImages {
    /// 댕글링 이미지뿐 아니라 사용하지 않는 모든 이미지
    pub all_unused: bool,
    pub filters: Filters,
}

impl PruneImages {
    pub fn to_filters(&self) -> Filters {
        let mut filters = self.filters.clone();
        if self.all_unused {
            filters.insert("dangling", "false");
        }
        filters
    }
}

impl From<&PruneImages> for PruneImagesOptions<String> {
    fn from(o: &PruneImages) -> Self {
        PruneImagesOptions {
            filters: o.to_filters().to_args(),
        }
    }
}

/// 이미지 빌드 설정
#[derive(Debug, Clone)]
pub struct BuildImage {
    /// `repo:tag`
    pub tag: String,
    pub no_cache: bool,
    pub network_mode: String,
    pub remove_intermediate: bool,
    pub force_remove: bool,
    pub pull_parent: bool,
    /// 빌드 컨텍스트 안의 상대 경로
    pub dockerfile: String,
    pub build_args: HashMap<String, String>,
    pub labels: HashMap<String, String>,
    pub quiet: bool,
}

impl Default for BuildImage {
    fn default() -> Self {
        Self {
            tag: String::new(),
            no_cache: false,
            network_mode: String::new(),
            remove_intermediate: true,
            force_remove: false,
            pull_parent: false,
            dockerfile: "Dockerfile".to_string(),
            build_args: HashMap::new(),
            labels: HashMap::new(),
            quiet: false,
        }
    }
}

impl BuildImage {
    pub fn tagged(repo: &str, tag: &str) -> Self {
        Self {
            tag: format!("{}:{}", repo, tag),
            ..Default::default()
        }
    }
}

impl From<&BuildImage> for BuildImageOptions<String> {
    fn from(o: &BuildImage) -> Self {
        BuildImageOptions {
            dockerfile: if o.dockerfile.is_empty() { "Dockerfile".to_string() } else { o.dockerfile.clone() },
            t: o.tag.clone(),
            q: o.quiet,
            nocache: o.no_cache,
            pull: o.pull_parent,
            rm: o.remove_intermediate || o.force_remove,
            forcerm: o.force_remove,
            buildargs: o.build_args.clone(),
            labels: o.labels.clone(),
            networkmode: o.network_mode.clone(),
            ..Default::default()
        }
    }
}

/// 레지스트리 인증 정보
#[derive(Debug, Clone, Default)]
pub struct RegistryAuth {
    pub username: String,
    pub password: String,
    pub server_address: String,
}

impl RegistryAuth {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            server_address: String::new(),
        }
    }
}

impl From<&RegistryAuth> for DockerCredentials {
    fn from(auth: &RegistryAuth) -> Self {
        DockerCredentials {
            username: Some(auth.username.clone()),
            password: Some(auth.password.clone()),
            serveraddress: (!auth.server_address.is_empty()).then(|| auth.server_address.clone()),
            ..Default::default()
        }
    }
}
