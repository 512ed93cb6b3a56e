use std::fmt;

use crate::error::DockerError;

pub const DEFAULT_TAG: &str = "latest";

/// `[registry[:port]/]repo[:tag|@digest]` 형태의 이미지 참조
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    pub repository: String,
    pub tag: Option<String>,
    pub digest: Option<String>,
}

fn invalid(reference: &str, reason: &str) -> DockerError {
    DockerError::InvalidReference {
        reference: reference.to_string(),
        reason: reason.to_string(),
    }
}

impl ImageReference {
    pub fn parse(reference: &str) -> Result<Self, DockerError> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Err(invalid(reference, "빈 참조"));
        }

        if let Some((repository, digest)) = reference.split_once('@') {
            if repository.is_empty() || digest.is_empty() || !digest.contains(':') {
                return Err(invalid(reference, "다이제스트 형식은 repo@algorithm:hex 입니다"));
            }
            return Ok(Self {
                repository: repository.to_string(),
                tag: None,
                digest: Some(digest.to_string()),
            });
        }

        // 레지스트리 포트의 콜론과 구분하려면 마지막 '/' 뒤에서만 태그를 찾는다
        let name_start = reference.rfind('/').map_or(0, |i| i + 1);
        let (repository, tag) = match reference[name_start..].rfind(':') {
            Some(i) => {
                let split = name_start + i;
                (&reference[..split], Some(&reference[split + 1..]))
            }
            None => (reference, None),
        };

        if repository.is_empty() || repository.ends_with('/') {
            return Err(invalid(reference, "저장소 이름이 비어 있음"));
        }
        if tag == Some("") {
            return Err(invalid(reference, "태그가 비어 있음"));
        }

        Ok(Self {
            repository: repository.to_string(),
            tag: tag.map(str::to_string),
            digest: None,
        })
    }

    /// 태그가 없으면 `latest`
    pub fn tag_or_default(&self) -> &str {
        self.tag.as_deref().unwrap_or(DEFAULT_TAG)
    }

    /// 레지스트리 주소 (첫 구성 요소에 '.' 또는 ':' 이 있거나 localhost 인 경우)
    pub fn registry(&self) -> Option<&str> {
        let (first, _) = self.repository.split_once('/')?;
        (first.contains('.') || first.contains(':') || first == "localhost").then_some(first)
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.digest {
            Some(digest) => write!(f, "{}@{}", self.repository, digest),
            None => write!(f, "{}:{}", self.repository, self.tag_or_default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_port_is_not_a_tag() {
        let r = ImageReference::parse("registry:5000/team/app").unwrap();
        assert_eq!(r.repository, "registry:5000/team/app");
        assert_eq!(r.tag, None);
        assert_eq!(r.tag_or_default(), "latest");
        assert_eq!(r.registry(), Some("registry:5000"));
    }

    #[test]
    fn digest_keeps_full_reference() {
        let r = ImageReference::parse("alpine@sha256:abcd").unwrap();
        assert_eq!(r.to_string(), "alpine@sha256:abcd");
        assert_eq!(r.registry(), None);
    }

    #[test]
    fn empty_tag_is_rejected() {
        assert!(matches!(
            ImageReference::parse("nginx:"),
            Err(DockerError::InvalidReference { .. })
        ));
    }
}
