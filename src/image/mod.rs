mod options;
mod reference;

pub use options::{BuildImage, ListImages, PruneImages, RegistryAuth, RemoveImage};
pub use reference::{ImageReference, DEFAULT_TAG};

use std::path::Path;
use std::pin::Pin;

use bollard::auth::DockerCredentials;
use bollard::image::{
    BuildImageOptions, CreateImageOptions, ImportImageOptions, ListImagesOptions, PruneImagesOptions,
    PushImageOptions, RemoveImageOptions, TagImageOptions,
};
use bollard::models::{
    HistoryResponseItem, ImageDeleteResponseItem, ImageInspect, ImagePruneResponse, ImageSummary,
};
use bollard::Docker;
use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use tracing::{debug, info};

use crate::error::DockerError;
use crate::filter::Filters;
use crate::progress::{self, BuildMessage, PullPushMessage};
use crate::transfer;

pub type PullPushStream = Pin<Box<dyn Stream<Item = Result<PullPushMessage, DockerError>> + Send>>;
/// build 스트림은 클라이언트를 빌려 쓰므로 `&self` 수명에 묶인다
pub type BuildStream<'a> = Pin<Box<dyn Stream<Item = Result<BuildMessage, DockerError>> + Send + 'a>>;

#[derive(Clone)]
pub struct ImageClient {
    docker: Docker,
}

impl ImageClient {
    pub fn new(docker: Docker) -> Self {
        Self { docker }
    }

    pub async fn list(&self, options: &ListImages) -> Result<Vec<ImageSummary>, DockerError> {
        let images = self
            .docker
            .list_images(Some(ListImagesOptions::<String>::from(options)))
            .await
            .map_err(DockerError::api("이미지 목록 조회"))?;
        debug!(count = images.len(), "이미지 목록 조회 성공");
        Ok(images)
    }

    /// `repo:tag` 이름으로 이미지 id 를 찾는다
    async fn find_by_name(&self, name: &str) -> Result<ImageSummary, DockerError> {
        let options = ListImages {
            filters: Filters::new().add("reference", name),
            ..Default::default()
        };
        self.list(&options)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DockerError::ImageNotFound {
                reference: name.to_string(),
            })
    }

    /// 이름에 '/' 가 있으면 목록에서 id 를 찾아 쓰고, 아니면 그대로 쓴다
    async fn resolve(&self, target: &str) -> Result<String, DockerError> {
        if target.contains('/') {
            let image = self.find_by_name(target).await?;
            debug!(target = %target, id = %image.id, "이미지 이름을 id 로 변환");
            Ok(image.id)
        } else {
            Ok(target.to_string())
        }
    }

    /// 대상은 `repo:tag` 이름 또는 이미지 id
    pub async fn inspect(&self, target: &str) -> Result<ImageInspect, DockerError> {
        let id = self.resolve(target).await?;
        self.docker
            .inspect_image(&id)
            .await
            .map_err(|source| match source {
                bollard::errors::Error::DockerResponseServerError { status_code: 404, .. } => {
                    DockerError::ImageNotFound {
                        reference: target.to_string(),
                    }
                }
                source => DockerError::ApiError {
                    source,
                    context: format!("이미지 {} 조회", target),
                },
            })
    }

    pub async fn inspect_raw(&self, target: &str) -> Result<String, DockerError> {
        let inspected = self.inspect(target).await?;
        serde_json::to_string_pretty(&inspected).map_err(|source| DockerError::DecodeError {
            source,
            context: format!("이미지 {} 조회 결과", target),
        })
    }

    pub fn pull(&self, image: &str, auth: Option<&RegistryAuth>) -> Result<PullPushStream, DockerError> {
        let reference = ImageReference::parse(image)?;
        let options = match &reference.digest {
            Some(_) => CreateImageOptions {
                from_image: reference.to_string(),
                ..Default::default()
            },
            None => CreateImageOptions {
                from_image: reference.repository.clone(),
                tag: reference.tag_or_default().to_string(),
                ..Default::default()
            },
        };
        info!(image = %reference, "이미지 pull 시작");

        let context = format!("이미지 {} pull", reference);
        let stream = self
            .docker
            .create_image(Some(options), None, auth.map(DockerCredentials::from))
            .map(move |item| {
                item.map_err(DockerError::api(context.clone()))
                    .map(|info| PullPushMessage::from(&info))
            });
        Ok(Box::pin(stream))
    }

    pub fn push(&self, image: &str, auth: Option<&RegistryAuth>) -> Result<PullPushStream, DockerError> {
        let reference = ImageReference::parse(image)?;
        let options = PushImageOptions {
            tag: reference.tag_or_default().to_string(),
        };
        info!(image = %reference, "이미지 push 시작");

        let context = format!("이미지 {} push", reference);
        let stream = self
            .docker
            .push_image(&reference.repository, Some(options), auth.map(DockerCredentials::from))
            .map(move |item| {
                item.map_err(DockerError::api(context.clone()))
                    .map(|info| PullPushMessage::from(&info))
            });
        Ok(Box::pin(stream))
    }

    /// `context` 는 Dockerfile 을 포함한 빌드 컨텍스트 tar
    pub fn build(&self, options: &BuildImage, context: Bytes) -> BuildStream<'_> {
        info!(tag = %options.tag, dockerfile = %options.dockerfile, bytes = context.len(), "이미지 빌드 시작");
        let error_context = format!("이미지 {} 빌드", options.tag);
        let stream = self
            .docker
            .build_image(BuildImageOptions::<String>::from(options), None, Some(context.into()))
            .map(move |item| {
                item.map_err(DockerError::api(error_context.clone()))
                    .map(|info| BuildMessage::from(&info))
            });
        Box::pin(stream)
    }

    /// pull 진행 상황을 매번 다시 그린 화면으로 `on_update` 에 넘긴다
    pub async fn pull_with_progress<F>(
        &self,
        image: &str,
        auth: Option<&RegistryAuth>,
        on_update: F,
    ) -> Result<String, DockerError>
    where
        F: FnMut(&str),
    {
        let view = progress::drive(self.pull(image, auth)?, on_update).await?;
        info!(image = %image, "이미지 pull 완료");
        Ok(view)
    }

    pub async fn push_with_progress<F>(
        &self,
        image: &str,
        auth: Option<&RegistryAuth>,
        on_update: F,
    ) -> Result<String, DockerError>
    where
        F: FnMut(&str),
    {
        let view = progress::drive(self.push(image, auth)?, on_update).await?;
        info!(image = %image, "이미지 push 완료");
        Ok(view)
    }

    pub async fn build_with_progress<F>(
        &self,
        options: &BuildImage,
        context: Bytes,
        on_update: F,
    ) -> Result<String, DockerError>
    where
        F: FnMut(&str),
    {
        let view = progress::drive(self.build(options, context), on_update).await?;
        info!(tag = %options.tag, "이미지 빌드 완료");
        Ok(view)
    }

    /// `source` 이미지에 `target` (`repo[:tag]`) 이름을 붙인다
    pub async fn tag(&self, source: &str, target: &str) -> Result<(), DockerError> {
        let reference = ImageReference::parse(target)?;
        self.docker
            .tag_image(
                source,
                Some(TagImageOptions {
                    repo: reference.repository.clone(),
                    tag: reference.tag_or_default().to_string(),
                }),
            )
            .await
            .map_err(DockerError::api(format!("이미지 {} 태그", source)))?;
        info!(source = %source, target = %reference, "이미지 태그 추가");
        Ok(())
    }

    pub async fn remove(&self, target: &str, options: &RemoveImage) -> Result<Vec<ImageDeleteResponseItem>, DockerError> {
        let id = self.resolve(target).await?;
        let removed = self
            .docker
            .remove_image(&id, Some(RemoveImageOptions::from(options)), None)
            .await
            .map_err(DockerError::api(format!("이미지 {} 삭제", target)))?;
        info!(image = %target, items = removed.len(), "이미지 삭제");
        Ok(removed)
    }

    pub async fn prune(&self, options: &PruneImages) -> Result<ImagePruneResponse, DockerError> {
        let pruned = self
            .docker
            .prune_images(Some(PruneImagesOptions::<String>::from(options)))
            .await
            .map_err(DockerError::api("사용하지 않는 이미지 정리"))?;
        info!(
            removed = pruned.images_deleted.as_ref().map_or(0, Vec::len),
            reclaimed = pruned.space_reclaimed.unwrap_or(0),
            "이미지 정리 완료"
        );
        Ok(pruned)
    }

    /// 이미지를 tar 파일로 저장한다
    pub async fn save(&self, image: &str, path: &Path) -> Result<u64, DockerError> {
        let stream = self.docker.export_image(image);
        let written = transfer::save_stream(stream, path, &format!("이미지 {} 저장", image)).await?;
        info!(image = %image, path = %path.display(), bytes = written, "이미지 저장");
        Ok(written)
    }

    /// tar 파일에서 이미지를 읽어 들인다
    pub async fn load(&self, path: &Path) -> Result<BuildStream<'_>, DockerError> {
        let archive = transfer::read_file(path).await?;
        info!(path = %path.display(), bytes = archive.len(), "이미지 불러오기 시작");

        let context = format!("이미지 파일 {} 불러오기", path.display());
        let stream = self
            .docker
            .import_image(ImportImageOptions { quiet: false }, archive.into(), None)
            .map(move |item| {
                item.map_err(DockerError::api(context.clone()))
                    .map(|info| BuildMessage::from(&info))
            });
        Ok(Box::pin(stream))
    }

    pub async fn history(&self, image: &str) -> Result<Vec<HistoryResponseItem>, DockerError> {
        self.docker
            .image_history(image)
            .await
            .map_err(DockerError::api(format!("이미지 {} 이력 조회", image)))
    }
}
