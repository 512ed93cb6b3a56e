use std::fmt;

#[derive(Debug)]
pub enum DockerError {
    /// Docker 데몬 연결 실패
    ConnectionError {
        source: bollard::errors::Error,
        context: String,
    },
    /// Docker API 호출 실패
    ApiError {
        source: bollard::errors::Error,
        context: String,
    },
    /// 이미지를 찾을 수 없음
    ImageNotFound {
        reference: String,
    },
    /// 잘못된 이미지 참조
    InvalidReference {
        reference: String,
        reason: String,
    },
    /// 동일한 이름의 볼륨이 이미 존재함
    VolumeConflict {
        name: String,
    },
    /// 포트 매핑 파싱 오류
    InvalidPortSpec {
        spec: String,
        reason: String,
    },
    /// exec 실행 오류
    ExecError {
        container: String,
        command: String,
        reason: String,
    },
    /// 로컬 파일 입출력 오류
    IoError {
        path: String,
        error: std::io::Error,
    },
    /// 응답 스트림이 값 없이 끝남
    StreamEnded {
        context: String,
    },
    /// 진행 메시지 디코딩 오류
    DecodeError {
        source: serde_json::Error,
        context: String,
    },
}

impl DockerError {
    pub(crate) fn api(context: impl Into<String>) -> impl FnOnce(bollard::errors::Error) -> Self {
        let context = context.into();
        move |source| DockerError::ApiError { source, context }
    }

    pub(crate) fn io(path: impl Into<String>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |error| DockerError::IoError { path, error }
    }

    /// 데몬이 404 로 응답했는지 여부
    pub fn is_not_found(&self) -> bool {
        match self {
            DockerError::ImageNotFound { .. } => true,
            DockerError::ApiError { source, .. } | DockerError::ConnectionError { source, .. } => matches!(
                source,
                bollard::errors::Error::DockerResponseServerError { status_code: 404, .. }
            ),
            _ => false,
        }
    }
}

impl fmt::Display for DockerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DockerError::ConnectionError { source, context } =>
                write!(f, "Docker 데몬 연결 실패 ({}): {}", context, source),
            DockerError::ApiError { source, context } =>
                write!(f, "Docker API 호출 실패 ({}): {}", context, source),
            DockerError::ImageNotFound { reference } =>
                write!(f, "no such image: {}", reference),
            DockerError::InvalidReference { reference, reason } =>
                write!(f, "잘못된 이미지 참조 {}: {}", reference, reason),
            DockerError::VolumeConflict { name } =>
                write!(f, "Conflict: the volume name \"{}\" is already exists", name),
            DockerError::InvalidPortSpec { spec, reason } =>
                write!(f, "잘못된 포트 매핑 {}: {}", spec, reason),
            DockerError::ExecError { container, command, reason } =>
                write!(f, "컨테이너 {}에서 명령 {} 실행 실패: {}", container, command, reason),
            DockerError::IoError { path, error } =>
                write!(f, "파일 {} 입출력 오류: {}", path, error),
            DockerError::StreamEnded { context } =>
                write!(f, "응답 스트림이 비어 있음 ({})", context),
            DockerError::DecodeError { source, context } =>
                write!(f, "메시지 디코딩 실패 ({}): {}", context, source),
        }
    }
}

impl std::error::Error for DockerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DockerError::ConnectionError { source, .. } | DockerError::ApiError { source, .. } => Some(source),
            DockerError::IoError { error, .. } => Some(error),
            DockerError::DecodeError { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<bollard::errors::Error> for DockerError {
    fn from(err: bollard::errors::Error) -> Self {
        DockerError::ConnectionError {
            source: err,
            context: "Docker 데몬 연결 실패".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DockerError>;
