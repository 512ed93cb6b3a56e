use std::collections::HashMap;

use bollard::container::{
    Config, ListContainersOptions, LogsOptions, RemoveContainerOptions, RestartContainerOptions,
    StopContainerOptions, UploadToContainerOptions,
};
use bollard::exec::CreateExecOptions;
use bollard::models::{HostConfig, PortMap, RestartPolicy};

use crate::filter::Filters;

fn key_values(map: &HashMap<String, String>, sep: char) -> Vec<String> {
    let mut pairs: Vec<String> = map.iter().map(|(k, v)| format!("{}{}{}", k, sep, v)).collect();
    pairs.sort();
    pairs
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

fn non_empty_vec(v: &[String]) -> Option<Vec<String>> {
    (!v.is_empty()).then(|| v.to_vec())
}

#[derive(Debug, Clone, Default)]
pub struct ListContainers {
    /// 중지된 컨테이너 포함
    pub all: bool,
    pub size: bool,
    /// 가장 최근에 만든 컨테이너 하나만
    pub latest: bool,
    pub limit: Option<isize>,
    pub filters: Filters,
}

impl From<&ListContainers> for ListContainersOptions<String> {
    fn from(o: &ListContainers) -> Self {
        ListContainersOptions {
            all: o.all,
            size: o.size,
            limit: if o.latest { Some(1) } else { o.limit },
            filters: o.filters.to_args(),
        }
    }
}

/// stop/restart 대기 시간
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StopTimeout {
    /// 데몬 또는 컨테이너 설정값 사용
    #[default]
    Default,
    Seconds(i64),
    /// 기다리지 않고 바로 종료
    Immediate,
}

impl StopTimeout {
    fn seconds(self) -> Option<i64> {
        match self {
            StopTimeout::Default => None,
            StopTimeout::Seconds(t) => Some(t),
            StopTimeout::Immediate => Some(0),
        }
    }

    pub fn stop_options(self) -> Option<StopContainerOptions> {
        self.seconds().map(|t| StopContainerOptions { t })
    }

    pub fn restart_options(self) -> Option<RestartContainerOptions> {
        self.seconds().map(|t| RestartContainerOptions { t: t as isize })
    }
}

#[derive(Debug, Clone, Default)]
pub struct RemoveContainer {
    /// 익명 볼륨도 함께 삭제
    pub volumes: bool,
    pub links: bool,
    pub force: bool,
}

impl From<&RemoveContainer> for RemoveContainerOptions {
    fn from(o: &RemoveContainer) -> Self {
        RemoveContainerOptions {
            v: o.volumes,
            force: o.force,
            link: o.links,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CopyTo {
    /// 디렉토리를 파일로 덮어쓰기 허용
    pub overwrite_dir_with_file: bool,
}

impl CopyTo {
    pub fn upload_options(&self, path: &str) -> UploadToContainerOptions<String> {
        UploadToContainerOptions {
            path: path.to_string(),
            no_overwrite_dir_non_dir: (!self.overwrite_dir_with_file).to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExecConfig {
    pub user: String,
    pub privileged: bool,
    pub tty: bool,
    pub detach: bool,
    /// `KEY=VALUE`
    pub env: Vec<String>,
    pub working_dir: String,
    /// 기본값은 `bash`
    pub cmd: Vec<String>,
}

impl Default for ExecConfig {
    fn default() -> Self {
        Self {
            user: String::new(),
            privileged: false,
            tty: false,
            detach: false,
            env: Vec::new(),
            working_dir: String::new(),
            cmd: vec!["bash".to_string()],
        }
    }
}

impl ExecConfig {
    pub fn with_cmd<I, S>(mut self, cmd: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cmd = cmd.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_env_map(mut self, env: &HashMap<String, String>) -> Self {
        self.env.extend(key_values(env, '='));
        self
    }

    /// 일회성 실행용. `tty` 는 설정값을 그대로 따르며 기본값은 꺼져 있다.
    pub fn create_options(&self) -> CreateExecOptions<String> {
        CreateExecOptions {
            attach_stdin: Some(true),
            attach_stdout: Some(true),
            attach_stderr: Some(true),
            tty: Some(self.tty),
            env: non_empty_vec(&self.env),
            cmd: Some(self.cmd.clone()),
            privileged: Some(self.privileged),
            user: non_empty(&self.user),
            working_dir: non_empty(&self.working_dir),
            ..Default::default()
        }
    }

    /// 대화형 세션용. 크기 조정이 가능하도록 TTY 를 항상 켠다.
    pub fn interactive_options(&self) -> CreateExecOptions<String> {
        CreateExecOptions {
            tty: Some(true),
            ..self.create_options()
        }
    }
}

#[derive(Debug, Clone)]
pub struct CommitContainer {
    pub author: String,
    pub comment: String,
    /// Dockerfile 명령, 예: `CMD echo`
    pub changes: Vec<String>,
    /// 커밋하는 동안 컨테이너 일시 정지
    pub pause: bool,
}

impl Default for CommitContainer {
    fn default() -> Self {
        Self {
            author: String::new(),
            comment: String::new(),
            changes: Vec::new(),
            pause: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ContainerLogs {
    /// 끝에서부터 보여줄 줄 수 (기본값 "all")
    pub tail: String,
    pub follow: bool,
    /// 유닉스 타임스탬프
    pub since: i64,
    pub until: i64,
    pub timestamps: bool,
}

impl Default for ContainerLogs {
    fn default() -> Self {
        Self {
            tail: "all".to_string(),
            follow: false,
            since: 0,
            until: 0,
            timestamps: false,
        }
    }
}

impl From<&ContainerLogs> for LogsOptions<String> {
    fn from(o: &ContainerLogs) -> Self {
        LogsOptions {
            follow: o.follow,
            stdout: true,
            stderr: true,
            since: o.since,
            until: o.until,
            timestamps: o.timestamps,
            tail: o.tail.clone(),
            ..Default::default()
        }
    }
}

/// 컨테이너 생성 설정
#[derive(Debug, Clone, Default)]
pub struct CreateContainer {
    pub hostname: String,
    pub attach_stdin: bool,
    pub attach_stdout: bool,
    pub attach_stderr: bool,
    pub tty: bool,
    pub user: String,
    /// `KEY=VALUE`
    pub env: Vec<String>,
    pub cmd: Vec<String>,
    pub working_dir: String,
    pub entrypoint: Vec<String>,
    pub labels: HashMap<String, String>,
    pub stop_timeout: Option<i64>,
    /// `host-src:container-dest[:options]`
    pub binds: Vec<String>,
    pub network_mode: String,
    pub port_bindings: PortMap,
    pub restart_policy: Option<RestartPolicy>,
    /// 종료 시 자동 삭제, 재시작 정책이 있으면 무시된다
    pub auto_remove: bool,
    pub privileged: bool,
    pub publish_all_ports: bool,
    /// CPU 개수 (소수 허용)
    pub cpus: Option<f64>,
    /// 바이트 단위
    pub memory: Option<i64>,
    pub pid_mode: String,
}

impl CreateContainer {
    pub fn with_env_map(mut self, env: &HashMap<String, String>) -> Self {
        self.env.extend(key_values(env, '='));
        self
    }

    /// 키는 호스트 경로 또는 볼륨, 값은 `container-dest[:options]`
    pub fn with_binds_map(mut self, binds: &HashMap<String, String>) -> Self {
        self.binds.extend(key_values(binds, ':'));
        self
    }

    pub fn host_config(&self) -> HostConfig {
        HostConfig {
            binds: non_empty_vec(&self.binds),
            network_mode: non_empty(&self.network_mode),
            port_bindings: (!self.port_bindings.is_empty()).then(|| self.port_bindings.clone()),
            restart_policy: self.restart_policy.clone(),
            auto_remove: Some(self.auto_remove),
            privileged: Some(self.privileged),
            publish_all_ports: Some(self.publish_all_ports),
            nano_cpus: self.cpus.map(|n| (n * 1e9) as i64),
            memory: self.memory,
            pid_mode: non_empty(&self.pid_mode),
            ..Default::default()
        }
    }

    pub fn to_config(&self, image: &str) -> Config<String> {
        let exposed_ports = (!self.port_bindings.is_empty()).then(|| {
            self.port_bindings
                .keys()
                .map(|port| (port.clone(), HashMap::new()))
                .collect::<HashMap<String, HashMap<(), ()>>>()
        });

        Config {
            image: Some(image.to_string()),
            hostname: non_empty(&self.hostname),
            attach_stdin: Some(self.attach_stdin),
            attach_stdout: Some(self.attach_stdout),
            attach_stderr: Some(self.attach_stderr),
            tty: Some(self.tty),
            user: non_empty(&self.user),
            env: non_empty_vec(&self.env),
            cmd: non_empty_vec(&self.cmd),
            working_dir: non_empty(&self.working_dir),
            entrypoint: non_empty_vec(&self.entrypoint),
            labels: (!self.labels.is_empty()).then(|| self.labels.clone()),
            stop_timeout: self.stop_timeout,
            exposed_ports,
            host_config: Some(self.host_config()),
            ..Default::default()
        }
    }
}
