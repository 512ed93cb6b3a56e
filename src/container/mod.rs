mod options;
mod ports;
pub mod restart;

pub use options::{
    CommitContainer, ContainerLogs, CopyTo, CreateContainer, ExecConfig, ListContainers, RemoveContainer,
    StopTimeout,
};
pub use ports::{parse_port_spec, parse_port_specs};

use std::path::{Path, PathBuf};
use std::pin::Pin;

use bollard::container::{
    Config, CreateContainerOptions, DownloadFromContainerOptions,
    InspectContainerOptions, KillContainerOptions, ListContainersOptions, LogOutput, LogsOptions,
    PruneContainersOptions, RemoveContainerOptions, RenameContainerOptions, StartContainerOptions,
    Stats, StatsOptions, TopOptions,
};
use bollard::exec::{CreateExecOptions, ResizeExecOptions, StartExecOptions, StartExecResults};
use bollard::image::CommitContainerOptions;
use bollard::models::{
    ContainerCreateResponse, ContainerInspectResponse, ContainerPruneResponse, ContainerSummary,
    ContainerTopResponse,
};
use bollard::Docker;
use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use crate::error::DockerError;
use crate::filter::Filters;
use crate::output::{collect_combined, collect_output, Output};
use crate::transfer;

pub type LogStream = Pin<Box<dyn Stream<Item = Result<LogOutput, DockerError>> + Send>>;
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, DockerError>> + Send>>;

/// 대화형 exec 세션
pub struct ExecSession {
    pub id: String,
    pub output: LogStream,
    pub input: Pin<Box<dyn AsyncWrite + Send>>,
}

#[derive(Clone)]
pub struct ContainerClient {
    docker: Docker,
}

impl ContainerClient {
    pub fn new(docker: Docker) -> Self {
        Self { docker }
    }

    pub async fn list(&self, options: &ListContainers) -> Result<Vec<ContainerSummary>, DockerError> {
        let containers = self
            .docker
            .list_containers(Some(ListContainersOptions::<String>::from(options)))
            .await
            .map_err(DockerError::api("컨테이너 목록 조회"))?;
        debug!(count = containers.len(), "컨테이너 목록 조회 성공");
        Ok(containers)
    }

    pub async fn inspect(&self, container: &str) -> Result<ContainerInspectResponse, DockerError> {
        self.docker
            .inspect_container(container, None::<InspectContainerOptions>)
            .await
            .map_err(DockerError::api(format!("컨테이너 {} 조회", container)))
    }

    /// 조회 결과를 JSON 문자열로 돌려준다
    pub async fn inspect_raw(&self, container: &str) -> Result<String, DockerError> {
        let inspected = self.inspect(container).await?;
        serde_json::to_string_pretty(&inspected).map_err(|source| DockerError::DecodeError {
            source,
            context: format!("컨테이너 {} 조회 결과", container),
        })
    }

    pub async fn start(&self, container: &str) -> Result<(), DockerError> {
        self.docker
            .start_container(container, None::<StartContainerOptions<String>>)
            .await
            .map_err(DockerError::api(format!("컨테이너 {} 시작", container)))?;
        info!(container = %container, "컨테이너 시작");
        Ok(())
    }

    pub async fn stop(&self, container: &str, timeout: StopTimeout) -> Result<(), DockerError> {
        self.docker
            .stop_container(container, timeout.stop_options())
            .await
            .map_err(DockerError::api(format!("컨테이너 {} 중지", container)))?;
        info!(container = %container, timeout = ?timeout, "컨테이너 중지");
        Ok(())
    }

    pub async fn restart(&self, container: &str, timeout: StopTimeout) -> Result<(), DockerError> {
        self.docker
            .restart_container(container, timeout.restart_options())
            .await
            .map_err(DockerError::api(format!("컨테이너 {} 재시작", container)))?;
        info!(container = %container, timeout = ?timeout, "컨테이너 재시작");
        Ok(())
    }

    pub async fn rename(&self, container: &str, new_name: &str) -> Result<(), DockerError> {
        self.docker
            .rename_container(container, RenameContainerOptions { name: new_name })
            .await
            .map_err(DockerError::api(format!("컨테이너 {} 이름 변경", container)))?;
        info!(container = %container, new_name = %new_name, "컨테이너 이름 변경");
        Ok(())
    }

    pub async fn remove(&self, container: &str, options: &RemoveContainer) -> Result<(), DockerError> {
        self.docker
            .remove_container(container, Some(RemoveContainerOptions::from(options)))
            .await
            .map_err(DockerError::api(format!("컨테이너 {} 삭제", container)))?;
        info!(container = %container, force = options.force, "컨테이너 삭제");
        Ok(())
    }

    /// 스트리밍 없이 한 번만 측정한 리소스 사용량
    pub async fn stats(&self, container: &str) -> Result<Stats, DockerError> {
        let context = format!("컨테이너 {} 리소스 조회", container);
        let stream = self.docker.stats(
            container,
            Some(StatsOptions {
                stream: false,
                one_shot: true,
            }),
        );
        futures_util::pin_mut!(stream);
        match stream.next().await {
            Some(stats) => stats.map_err(DockerError::api(context)),
            None => Err(DockerError::StreamEnded { context }),
        }
    }

    /// 컨테이너 안의 `path` 를 tar 로 받아 `<dir>/<basename>.tar` 에 저장한다
    pub async fn copy_from(&self, container: &str, path: &str, dir: &Path) -> Result<PathBuf, DockerError> {
        let base = Path::new(path)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "root".to_string());
        let target = dir.join(format!("{}.tar", base));

        let stream = self
            .docker
            .download_from_container(container, Some(DownloadFromContainerOptions { path }));
        let written =
            transfer::save_stream(stream, &target, &format!("컨테이너 {} 파일 복사", container)).await?;

        info!(container = %container, path = %path, target = %target.display(), bytes = written, "컨테이너에서 파일 복사");
        Ok(target)
    }

    /// 컨테이너 안의 `path` 를 tar 바이트 스트림으로 돌려준다
    pub fn copy_from_raw(&self, container: &str, path: &str) -> ByteStream {
        let context = format!("컨테이너 {} 파일 복사", container);
        let stream = self
            .docker
            .download_from_container(container, Some(DownloadFromContainerOptions { path: path.to_string() }))
            .map(move |chunk| chunk.map_err(DockerError::api(context.clone())));
        Box::pin(stream)
    }

    /// tar 아카이브를 컨테이너의 `path` 디렉토리에 푼다. 디렉토리가 없으면 만든다.
    pub async fn copy_to(&self, container: &str, path: &str, tar: Bytes, options: &CopyTo) -> Result<(), DockerError> {
        let size = tar.len();
        match self.upload(container, path, tar.clone(), options).await {
            Err(e) if missing_target(&e) => {
                debug!(container = %container, path = %path, "대상 디렉토리가 없어 생성 후 다시 업로드");
                self.make_dir(container, path).await?;
                self.upload(container, path, tar, options).await?;
            }
            result => result?,
        }
        info!(container = %container, path = %path, bytes = size, "컨테이너로 파일 복사");
        Ok(())
    }

    async fn upload(&self, container: &str, path: &str, tar: Bytes, options: &CopyTo) -> Result<(), DockerError> {
        self.docker
            .upload_to_container(container, Some(options.upload_options(path)), tar.into())
            .await
            .map_err(DockerError::api(format!("컨테이너 {} 파일 업로드", container)))
    }

    async fn make_dir(&self, container: &str, path: &str) -> Result<(), DockerError> {
        let mkdir = ["mkdir", "-p", path];
        let output = self.exec_command(container, &mkdir).await?;
        if !output.stderr.is_empty() {
            return Err(DockerError::ExecError {
                container: container.to_string(),
                command: mkdir.join(" "),
                reason: output.stderr.trim_end().to_string(),
            });
        }
        Ok(())
    }

    /// 대화형 TTY exec 세션을 연다. 분리 모드로 시작되면 `ExecError`.
    pub async fn exec(&self, container: &str, config: &ExecConfig) -> Result<ExecSession, DockerError> {
        self.attach_exec(container, config, config.interactive_options()).await
    }

    async fn attach_exec(
        &self,
        container: &str,
        config: &ExecConfig,
        create: CreateExecOptions<String>,
    ) -> Result<ExecSession, DockerError> {
        let command = config.cmd.join(" ");
        let tty = create.tty.unwrap_or(false);
        let created = self
            .docker
            .create_exec(container, create)
            .await
            .map_err(DockerError::api(format!("컨테이너 {} exec 생성", container)))?;

        let started = self
            .docker
            .start_exec(
                &created.id,
                Some(StartExecOptions {
                    detach: config.detach,
                    ..Default::default()
                }),
            )
            .await
            .map_err(DockerError::api(format!("exec {} 시작", created.id)))?;

        match started {
            StartExecResults::Attached { output, input } => {
                debug!(container = %container, exec_id = %created.id, command = %command, tty, "exec 세션 시작");
                let context = format!("exec {} 출력", created.id);
                Ok(ExecSession {
                    id: created.id,
                    output: Box::pin(output.map(move |item| item.map_err(DockerError::api(context.clone())))),
                    input,
                })
            }
            StartExecResults::Detached => Err(DockerError::ExecError {
                container: container.to_string(),
                command,
                reason: "분리 모드로 시작되어 입출력을 연결할 수 없음".to_string(),
            }),
        }
    }

    pub async fn resize_exec(&self, exec_id: &str, width: u16, height: u16) -> Result<(), DockerError> {
        self.docker
            .resize_exec(exec_id, ResizeExecOptions { height, width })
            .await
            .map_err(DockerError::api(format!("exec {} 크기 조정", exec_id)))
    }

    /// 명령을 직접 실행하고 끝날 때까지 출력을 모은다
    pub async fn exec_command<S: AsRef<str>>(&self, container: &str, cmd: &[S]) -> Result<Output, DockerError> {
        let config = ExecConfig::default().with_cmd(cmd.iter().map(|s| s.as_ref().to_string()));
        let session = self.attach_exec(container, &config, config.create_options()).await?;
        drop(session.input);
        collect_output(session.output).await
    }

    async fn exec_script(&self, container: &str, config: &ExecConfig, command: &str) -> Result<ExecSession, DockerError> {
        let mut session = self.attach_exec(container, config, config.create_options()).await?;
        let script = format!("{}\nexit\n", command);
        let io_err = |e: std::io::Error| DockerError::ExecError {
            container: container.to_string(),
            command: command.to_string(),
            reason: e.to_string(),
        };
        session.input.write_all(script.as_bytes()).await.map_err(io_err)?;
        session.input.shutdown().await.map_err(io_err)?;
        Ok(session)
    }

    /// 셸에 명령과 `exit` 을 입력하고 stdout/stderr 을 나눠 돌려준다
    pub async fn exec_one_shot(&self, container: &str, config: &ExecConfig, command: &str) -> Result<Output, DockerError> {
        let session = self.exec_script(container, config, command).await?;
        let output = collect_output(session.output).await?;
        debug!(container = %container, command = %command, stderr_len = output.stderr.len(), "일회성 명령 완료");
        Ok(output)
    }

    /// stdout 과 stderr 을 도착 순서대로 합쳐서 돌려준다
    pub async fn exec_one_shot_combined(
        &self,
        container: &str,
        config: &ExecConfig,
        command: &str,
    ) -> Result<String, DockerError> {
        let session = self.exec_script(container, config, command).await?;
        collect_combined(session.output).await
    }

    pub async fn prune(&self, filters: &Filters) -> Result<ContainerPruneResponse, DockerError> {
        let pruned = self
            .docker
            .prune_containers(Some(PruneContainersOptions { filters: filters.to_args() }))
            .await
            .map_err(DockerError::api("중지된 컨테이너 정리"))?;
        info!(
            removed = pruned.containers_deleted.as_ref().map_or(0, Vec::len),
            reclaimed = pruned.space_reclaimed.unwrap_or(0),
            "컨테이너 정리 완료"
        );
        Ok(pruned)
    }

    /// 컨테이너를 `repo:tag` 이미지로 커밋하고 새 이미지 id 를 돌려준다
    pub async fn commit(
        &self,
        container: &str,
        repo: &str,
        tag: &str,
        options: &CommitContainer,
    ) -> Result<Option<String>, DockerError> {
        let commit = self
            .docker
            .commit_container(
                CommitContainerOptions {
                    container: container.to_string(),
                    repo: repo.to_string(),
                    tag: tag.to_string(),
                    comment: options.comment.clone(),
                    author: options.author.clone(),
                    pause: options.pause,
                    changes: (!options.changes.is_empty()).then(|| options.changes.join("\n")),
                },
                Config::<String>::default(),
            )
            .await
            .map_err(DockerError::api(format!("컨테이너 {} 커밋", container)))?;
        info!(container = %container, repo = %repo, tag = %tag, "컨테이너 커밋");
        Ok(commit.id.into())
    }

    /// 컨테이너 파일시스템을 tar 로 `path` 에 저장한다. 루트 디렉토리 아카이브를 받는다.
    pub async fn export(&self, container: &str, path: &Path) -> Result<u64, DockerError> {
        let stream = self
            .docker
            .download_from_container(container, Some(DownloadFromContainerOptions { path: "/" }));
        let written = transfer::save_stream(stream, path, &format!("컨테이너 {} 내보내기", container)).await?;
        info!(container = %container, path = %path.display(), bytes = written, "컨테이너 내보내기");
        Ok(written)
    }

    async fn signal(&self, container: &str, signal: &str) -> Result<(), DockerError> {
        self.docker
            .kill_container(container, Some(KillContainerOptions { signal }))
            .await
            .map_err(DockerError::api(format!("컨테이너 {}에 {} 전송", container, signal)))?;
        info!(container = %container, signal = %signal, "컨테이너에 시그널 전송");
        Ok(())
    }

    pub async fn kill(&self, container: &str) -> Result<(), DockerError> {
        self.signal(container, "SIGKILL").await
    }

    pub async fn terminate(&self, container: &str) -> Result<(), DockerError> {
        self.signal(container, "SIGTERM").await
    }

    pub fn logs(&self, container: &str, options: &ContainerLogs) -> LogStream {
        let context = format!("컨테이너 {} 로그", container);
        let stream = self
            .docker
            .logs(container, Some(LogsOptions::<String>::from(options)))
            .map(move |item| item.map_err(DockerError::api(context.clone())));
        Box::pin(stream)
    }

    /// follow 가 아닌 로그를 모두 읽어 합친 텍스트로 돌려준다
    pub async fn logs_combined(&self, container: &str, options: &ContainerLogs) -> Result<String, DockerError> {
        collect_combined(self.logs(container, options)).await
    }

    pub async fn pause(&self, container: &str) -> Result<(), DockerError> {
        self.docker
            .pause_container(container)
            .await
            .map_err(DockerError::api(format!("컨테이너 {} 일시 정지", container)))?;
        info!(container = %container, "컨테이너 일시 정지");
        Ok(())
    }

    pub async fn unpause(&self, container: &str) -> Result<(), DockerError> {
        self.docker
            .unpause_container(container)
            .await
            .map_err(DockerError::api(format!("컨테이너 {} 재개", container)))?;
        info!(container = %container, "컨테이너 재개");
        Ok(())
    }

    /// 컨테이너 안에서 실행 중인 프로세스 목록
    pub async fn processes(&self, container: &str) -> Result<ContainerTopResponse, DockerError> {
        self.docker
            .top_processes(container, None::<TopOptions<String>>)
            .await
            .map_err(DockerError::api(format!("컨테이너 {} 프로세스 조회", container)))
    }

    /// `replace` 가 켜져 있으면 같은 이름의 컨테이너를 먼저 강제로 지운다
    pub async fn create(
        &self,
        image: &str,
        name: &str,
        replace: bool,
        options: &CreateContainer,
    ) -> Result<ContainerCreateResponse, DockerError> {
        if replace && !name.is_empty() {
            let force = RemoveContainer {
                force: true,
                ..Default::default()
            };
            if let Err(e) = self.remove(name, &force).await {
                debug!(container = %name, error = %e, "교체할 기존 컨테이너 없음");
            }
        }

        let create_options = (!name.is_empty()).then(|| CreateContainerOptions {
            name: name.to_string(),
            platform: None,
        });
        let created = self
            .docker
            .create_container(create_options, options.to_config(image))
            .await
            .map_err(DockerError::api(format!("이미지 {}로 컨테이너 생성", image)))?;

        for warning in &created.warnings {
            warn!(container = %name, warning = %warning, "컨테이너 생성 경고");
        }
        info!(container = %name, id = %created.id, image = %image, "컨테이너 생성");
        Ok(created)
    }

    /// 생성 후 바로 시작하고 컨테이너 id 를 돌려준다
    pub async fn run(
        &self,
        image: &str,
        name: &str,
        replace: bool,
        options: &CreateContainer,
    ) -> Result<String, DockerError> {
        let created = self.create(image, name, replace, options).await?;
        self.start(&created.id).await?;
        Ok(created.id)
    }
}

/// 업로드 대상 경로가 없을 때 데몬은 404 를 돌려준다
fn missing_target(error: &DockerError) -> bool {
    matches!(
        error,
        DockerError::ApiError {
            source: bollard::errors::Error::DockerResponseServerError { status_code: 404, .. },
            ..
        }
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_error(status_code: u16) -> DockerError {
        DockerError::ApiError {
            source: bollard::errors::Error::DockerResponseServerError {
                status_code,
                message: "Could not find the file /srv/app in container web".to_string(),
            },
            context: "컨테이너 web 파일 업로드".to_string(),
        }
    }

    #[test]
    fn test_only_missing_path_triggers_mkdir() {
        assert!(missing_target(&api_error(404)));
        assert!(!missing_target(&api_error(400)));
        assert!(!missing_target(&api_error(500)));
        assert!(!missing_target(&DockerError::VolumeConflict {
            name: "data".to_string()
        }));
    }
}
