use std::collections::HashMap;

use bollard::container::{ListContainersOptions, LogsOptions, RemoveContainerOptions};
use bollard::models::RestartPolicyNameEnum;
use docker_kit::container::{
    parse_port_spec, parse_port_specs, restart, CommitContainer, ContainerLogs, CopyTo, CreateContainer, ExecConfig,
    ListContainers, RemoveContainer, StopTimeout,
};
use docker_kit::filter::Filters;
use docker_kit::DockerError;

#[test]
fn test_port_spec_forms() {
    let (key, binding) = parse_port_spec("8080:80").unwrap();
    assert_eq!(key, "80/tcp");
    assert_eq!(binding.host_ip.as_deref(), Some(""));
    assert_eq!(binding.host_port.as_deref(), Some("8080"));

    let (key, binding) = parse_port_spec("127.0.0.1:5353:53/udp").unwrap();
    assert_eq!(key, "53/udp");
    assert_eq!(binding.host_ip.as_deref(), Some("127.0.0.1"));
    assert_eq!(binding.host_port.as_deref(), Some("5353"));

    let (key, binding) = parse_port_spec("[::1]:8443:443").unwrap();
    assert_eq!(key, "443/tcp");
    assert_eq!(binding.host_ip.as_deref(), Some("::1"));

    // 호스트 포트 생략 시 데몬이 임의 포트를 고른다
    let (key, binding) = parse_port_spec("127.0.0.1::80").unwrap();
    assert_eq!(key, "80/tcp");
    assert_eq!(binding.host_port.as_deref(), Some(""));
}

#[test]
fn test_invalid_port_specs() {
    for spec in ["", "http:80", "8080:0", "80/icmp", "1:2:3:4", "70000:80"] {
        assert!(
            matches!(parse_port_spec(spec), Err(DockerError::InvalidPortSpec { .. })),
            "{} 는 거부되어야 함",
            spec
        );
    }
}

#[test]
fn test_port_specs_group_by_container_port() {
    let map = parse_port_specs(&["8080:80", "8081:80", "9000:9000/udp"]).unwrap();
    assert_eq!(map.len(), 2);
    assert_eq!(map["80/tcp"].as_ref().map(Vec::len), Some(2));
    assert_eq!(map["9000/udp"].as_ref().map(Vec::len), Some(1));
}

#[test]
fn test_restart_policies() {
    assert_eq!(restart::always().name, Some(RestartPolicyNameEnum::ALWAYS));
    assert_eq!(restart::none().name, Some(RestartPolicyNameEnum::EMPTY));
    assert_eq!(restart::unless_stopped().name, Some(RestartPolicyNameEnum::UNLESS_STOPPED));

    let policy = restart::on_failure(3);
    assert_eq!(policy.name, Some(RestartPolicyNameEnum::ON_FAILURE));
    assert_eq!(policy.maximum_retry_count, Some(3));
}

#[test]
fn test_list_latest_overrides_limit() {
    let options = ListContainers {
        all: true,
        latest: true,
        limit: Some(10),
        filters: Filters::new().add("status", "exited"),
        ..Default::default()
    };

    let converted = ListContainersOptions::<String>::from(&options);
    assert!(converted.all);
    assert_eq!(converted.limit, Some(1));
    assert_eq!(converted.filters["status"], vec!["exited".to_string()]);
}

#[test]
fn test_stop_timeout_variants() {
    assert!(StopTimeout::Default.stop_options().is_none());
    assert_eq!(StopTimeout::Immediate.stop_options().map(|o| o.t), Some(0));
    assert_eq!(StopTimeout::Seconds(30).restart_options().map(|o| o.t), Some(30));
}

#[test]
fn test_remove_and_copy_options() {
    let remove = RemoveContainer {
        volumes: true,
        force: true,
        ..Default::default()
    };
    let converted = RemoveContainerOptions::from(&remove);
    assert!(converted.v);
    assert!(converted.force);
    assert!(!converted.link);

    let upload = CopyTo::default().upload_options("/data");
    assert_eq!(upload.path, "/data");
    assert_eq!(upload.no_overwrite_dir_non_dir, "true");

    let overwrite = CopyTo { overwrite_dir_with_file: true }.upload_options("/data");
    assert_eq!(overwrite.no_overwrite_dir_non_dir, "false");
}

#[test]
fn test_exec_config_defaults_to_bash() {
    let config = ExecConfig::default();
    assert_eq!(config.cmd, vec!["bash".to_string()]);

    let options = config.create_options();
    assert_eq!(options.attach_stdin, Some(true));
    assert_eq!(options.attach_stdout, Some(true));
    assert_eq!(options.attach_stderr, Some(true));
    assert_eq!(options.user, None);

    let env = HashMap::from([("B".to_string(), "2".to_string()), ("A".to_string(), "1".to_string())]);
    let options = ExecConfig::default().with_cmd(["ls", "-al"]).with_env_map(&env).create_options();
    assert_eq!(options.cmd, Some(vec!["ls".to_string(), "-al".to_string()]));
    assert_eq!(options.env, Some(vec!["A=1".to_string(), "B=2".to_string()]));
}

#[test]
fn test_interactive_exec_always_uses_tty() {
    let config = ExecConfig {
        user: "app".to_string(),
        ..Default::default()
    };

    // resize_exec 는 TTY 세션에서만 동작한다
    let interactive = config.interactive_options();
    assert_eq!(interactive.tty, Some(true));
    assert_eq!(interactive.user.as_deref(), Some("app"));
    assert_eq!(interactive.cmd, Some(vec!["bash".to_string()]));

    // 일회성 실행은 stdout/stderr 을 나눠 받도록 TTY 를 끈다
    assert_eq!(config.create_options().tty, Some(false));
}

#[test]
fn test_create_container_stop_timeout() {
    let config = CreateContainer {
        stop_timeout: Some(30),
        ..Default::default()
    }
    .to_config("alpine");
    assert_eq!(config.stop_timeout, Some(30i64));
}

#[test]
fn test_commit_and_logs_defaults() {
    assert!(CommitContainer::default().pause);

    let logs = ContainerLogs::default();
    assert_eq!(logs.tail, "all");

    let converted = LogsOptions::<String>::from(&ContainerLogs {
        follow: true,
        since: 100,
        ..Default::default()
    });
    assert!(converted.follow);
    assert!(converted.stdout);
    assert!(converted.stderr);
    assert_eq!(converted.since, 100);
    assert_eq!(converted.tail, "all");
}

#[test]
fn test_create_container_config() {
    let binds = HashMap::from([("/srv/data".to_string(), "/data:ro".to_string())]);
    let options = CreateContainer {
        hostname: "web".to_string(),
        cmd: vec!["nginx".to_string(), "-g".to_string(), "daemon off;".to_string()],
        port_bindings: parse_port_specs(&["8080:80"]).unwrap(),
        restart_policy: Some(restart::unless_stopped()),
        cpus: Some(1.5),
        memory: Some(256 * 1024 * 1024),
        ..Default::default()
    }
    .with_binds_map(&binds);

    let config = options.to_config("nginx:alpine");
    assert_eq!(config.image.as_deref(), Some("nginx:alpine"));
    assert_eq!(config.hostname.as_deref(), Some("web"));
    assert!(config.exposed_ports.as_ref().is_some_and(|ports| ports.contains_key("80/tcp")));
    assert_eq!(config.working_dir, None);

    let host = config.host_config.unwrap();
    assert_eq!(host.nano_cpus, Some(1_500_000_000));
    assert_eq!(host.memory, Some(268_435_456));
    assert_eq!(host.binds, Some(vec!["/srv/data:/data:ro".to_string()]));
    assert_eq!(
        host.restart_policy.and_then(|p| p.name),
        Some(RestartPolicyNameEnum::UNLESS_STOPPED)
    );
}
