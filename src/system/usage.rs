use bollard::models::{ContainerSummary, ImageSummary, SystemDataUsageResponse, Volume};
use serde::Serialize;

use crate::error::DockerError;

const DECIMAL_UNITS: [&str; 9] = ["B", "kB", "MB", "GB", "TB", "PB", "EB", "ZB", "YB"];
const UNTAGGED: &str = "<none>:<none>";

/// 10진 단위와 유효숫자 4자리로 크기를 표시한다. 예: 1500 -> `1.5kB`
pub fn human_size(size: i64) -> String {
    let mut value = size as f64;
    let mut unit = 0;
    while value >= 1000.0 && unit < DECIMAL_UNITS.len() - 1 {
        value /= 1000.0;
        unit += 1;
    }
    format!("{}{}", significant(value, 4), DECIMAL_UNITS[unit])
}

fn significant(value: f64, digits: i32) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    let exponent = value.abs().log10().floor() as i32;
    let decimals = (digits - 1 - exponent).max(0) as usize;
    let text = format!("{:.*}", decimals, value);
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageUsage {
    pub image_name: String,
    pub size: String,
    pub shared_size: String,
    pub containers: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerUsage {
    pub container_name: String,
    pub image_name: String,
    pub command: String,
    /// 볼륨 타입 마운트 수
    pub local_volumes: i64,
    pub size: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalVolumeUsage {
    pub volume_name: String,
    pub links: i64,
    pub size: String,
}

/// `docker system df` 와 같은 형태의 사용량 요약
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiskUsageSummary {
    pub images: Vec<ImageUsage>,
    pub containers: Vec<ContainerUsage>,
    pub local_volumes: Vec<LocalVolumeUsage>,
}

fn image_usage(image: &ImageSummary) -> Vec<ImageUsage> {
    let usage = |name: &str| ImageUsage {
        image_name: name.to_string(),
        size: human_size(image.size),
        shared_size: human_size(image.shared_size),
        containers: image.containers,
    };

    if image.repo_tags.is_empty() {
        vec![usage(UNTAGGED)]
    } else {
        image.repo_tags.iter().map(|tag| usage(tag)).collect()
    }
}

fn container_usage(container: &ContainerSummary) -> ContainerUsage {
    let name = container
        .names
        .as_ref()
        .and_then(|names| names.first())
        .map(|name| name.trim_start_matches('/').to_string())
        .unwrap_or_default();

    let local_volumes = container.mounts.as_ref().map_or(0, |mounts| {
        mounts
            .iter()
            .filter(|mount| mount.typ.as_ref().map(ToString::to_string).as_deref() == Some("volume"))
            .count() as i64
    });

    ContainerUsage {
        container_name: name,
        image_name: container.image.clone().unwrap_or_default(),
        command: container.command.clone().unwrap_or_default(),
        local_volumes,
        size: human_size(container.size_rw.unwrap_or(0)),
        status: container.status.clone().unwrap_or_default(),
    }
}

fn volume_usage(volume: &Volume) -> LocalVolumeUsage {
    let (size, links) = volume
        .usage_data
        .as_ref()
        .map_or((0, 0), |usage| (usage.size, usage.ref_count));
    LocalVolumeUsage {
        volume_name: volume.name.clone(),
        links,
        size: human_size(size),
    }
}

impl DiskUsageSummary {
    pub fn from_response(response: &SystemDataUsageResponse) -> Self {
        Self {
            images: response.images.iter().flatten().flat_map(image_usage).collect(),
            containers: response.containers.iter().flatten().map(container_usage).collect(),
            local_volumes: response.volumes.iter().flatten().map(volume_usage).collect(),
        }
    }

    pub fn to_json_string(&self) -> Result<String, DockerError> {
        serde_json::to_string(self).map_err(|source| DockerError::DecodeError {
            source,
            context: "디스크 사용량 요약".to_string(),
        })
    }
}

impl From<&SystemDataUsageResponse> for DiskUsageSummary {
    fn from(response: &SystemDataUsageResponse) -> Self {
        Self::from_response(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn human_size_uses_four_significant_digits() {
        assert_eq!(human_size(0), "0B");
        assert_eq!(human_size(999), "999B");
        assert_eq!(human_size(1500), "1.5kB");
        assert_eq!(human_size(123_456_789), "123.5MB");
        assert_eq!(human_size(1_000_000_000), "1GB");
    }

    #[test]
    fn negative_size_is_kept() {
        assert_eq!(human_size(-1), "-1B");
    }
}
