use bollard::models::{BuildInfo, CreateImageInfo, PushImageInfo};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::DockerError;

/// pull/push/build 진행 이벤트 한 줄을 표현하는 공통 특성
pub trait ProgressRecord {
    /// 사람이 읽을 수 있는 상태 메시지
    fn message(&self) -> String;

    /// 레이어/단계 식별자 (비어 있을 수 있음)
    fn id(&self) -> &str;

    /// 식별자가 있으면 다중 라인 진행 스트림에 속한다
    fn has_id(&self) -> bool {
        !self.id().is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuxId {
    #[serde(rename = "ID", default)]
    pub id: String,
}

fn render_status(id: &str, status: &str, progress: &str) -> String {
    if id.is_empty() {
        format!("{} {}", status, progress)
    } else {
        format!("{}: {} {}", id, status, progress)
    }
}

fn error_text<'a>(detail: &'a ErrorDetail, error: &'a str) -> Option<&'a str> {
    if !detail.message.is_empty() {
        Some(&detail.message)
    } else if !error.is_empty() {
        Some(error)
    } else {
        None
    }
}

fn decode<T: for<'de> Deserialize<'de>>(line: &str, context: &str) -> Result<T, DockerError> {
    serde_json::from_str(line).map_err(|source| DockerError::DecodeError {
        source,
        context: context.to_string(),
    })
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

impl From<&Option<bollard::models::ErrorDetail>> for ErrorDetail {
    fn from(detail: &Option<bollard::models::ErrorDetail>) -> Self {
        ErrorDetail {
            message: detail.as_ref().and_then(|d| d.message.clone()).unwrap_or_default(),
        }
    }
}

/// 이미지 pull/push 진행 메시지
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PullPushMessage {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub progress: String,
    #[serde(default)]
    pub id: String,
    #[serde(rename = "errorDetail", default)]
    pub error_detail: ErrorDetail,
    #[serde(default)]
    pub error: String,
}

impl PullPushMessage {
    pub fn from_json(line: &str) -> Result<Self, DockerError> {
        decode(line, "pull/push 진행 메시지")
    }

    /// 디코딩 실패 시 모든 필드가 빈 메시지를 돌려준다
    pub fn from_json_lossy(line: &str) -> Self {
        Self::from_json(line).unwrap_or_else(|e| {
            debug!(error = %e, "pull/push 메시지 디코딩 실패, 빈 메시지로 대체");
            Self::default()
        })
    }

}

impl From<&CreateImageInfo> for PullPushMessage {
    fn from(info: &CreateImageInfo) -> Self {
        PullPushMessage {
            status: text(&info.status),
            progress: text(&info.progress),
            id: text(&info.id),
            error_detail: ErrorDetail::from(&info.error_detail),
            error: text(&info.error),
        }
    }
}

// push 이벤트에는 레이어 id가 없어서 항상 단일 라인으로 흐른다
impl From<&PushImageInfo> for PullPushMessage {
    fn from(info: &PushImageInfo) -> Self {
        PullPushMessage {
            status: text(&info.status),
            progress: text(&info.progress),
            id: String::new(),
            error_detail: ErrorDetail::default(),
            error: text(&info.error),
        }
    }
}

impl ProgressRecord for PullPushMessage {
    fn message(&self) -> String {
        if let Some(error) = error_text(&self.error_detail, &self.error) {
            return error.to_string();
        }
        render_status(&self.id, &self.status, &self.progress)
    }

    fn id(&self) -> &str {
        &self.id
    }
}

/// 이미지 build/load 진행 메시지
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildMessage {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub progress: String,
    #[serde(default)]
    pub id: String,
    #[serde(rename = "errorDetail", default)]
    pub error_detail: ErrorDetail,
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub stream: String,
    #[serde(default)]
    pub aux: AuxId,
}

impl BuildMessage {
    pub fn from_json(line: &str) -> Result<Self, DockerError> {
        decode(line, "build 진행 메시지")
    }

    pub fn from_json_lossy(line: &str) -> Self {
        Self::from_json(line).unwrap_or_else(|e| {
            debug!(error = %e, "build 메시지 디코딩 실패, 빈 메시지로 대체");
            Self::default()
        })
    }

}

impl From<&BuildInfo> for BuildMessage {
    fn from(info: &BuildInfo) -> Self {
        BuildMessage {
            status: text(&info.status),
            progress: text(&info.progress),
            id: text(&info.id),
            error_detail: ErrorDetail::from(&info.error_detail),
            error: text(&info.error),
            stream: text(&info.stream),
            aux: AuxId {
                id: info.aux.as_ref().and_then(|aux| aux.id.clone()).unwrap_or_default(),
            },
        }
    }
}

impl ProgressRecord for BuildMessage {
    fn message(&self) -> String {
        if let Some(error) = error_text(&self.error_detail, &self.error) {
            return error.to_string();
        }
        if !self.stream.is_empty() {
            return self.stream.clone();
        }
        if !self.aux.id.is_empty() {
            return self.aux.id.clone();
        }
        render_status(&self.id, &self.status, &self.progress)
    }

    fn id(&self) -> &str {
        &self.id
    }
}
