use std::collections::HashMap;

use bollard::models::{PortBinding, PortMap};

use crate::error::DockerError;

const PROTOCOLS: [&str; 3] = ["tcp", "udp", "sctp"];

fn invalid(spec: &str, reason: impl Into<String>) -> DockerError {
    DockerError::InvalidPortSpec {
        spec: spec.to_string(),
        reason: reason.into(),
    }
}

fn parse_port(spec: &str, value: &str, allow_empty: bool) -> Result<(), DockerError> {
    if value.is_empty() {
        return if allow_empty { Ok(()) } else { Err(invalid(spec, "컨테이너 포트가 비어 있음")) };
    }
    match value.parse::<u16>() {
        Ok(0) => Err(invalid(spec, "포트는 0이 될 수 없습니다")),
        Ok(_) => Ok(()),
        Err(_) => Err(invalid(spec, format!("잘못된 포트 번호: {}", value))),
    }
}

/// `[ip:]hostPort:containerPort[/proto]` 를 (컨테이너 포트 키, 바인딩) 으로 파싱
pub fn parse_port_spec(spec: &str) -> Result<(String, PortBinding), DockerError> {
    let (rest, proto) = match spec.rsplit_once('/') {
        Some((rest, proto)) => (rest, proto.to_lowercase()),
        None => (spec, "tcp".to_string()),
    };
    if !PROTOCOLS.contains(&proto.as_str()) {
        return Err(invalid(spec, format!("지원하지 않는 프로토콜: {}", proto)));
    }

    // IPv6 주소는 대괄호로 감싼다: [::1]:8080:80
    let (ip, rest) = if let Some(stripped) = rest.strip_prefix('[') {
        let (ip, after) = stripped
            .split_once("]:")
            .ok_or_else(|| invalid(spec, "IPv6 주소 형식 오류"))?;
        (Some(ip), after)
    } else {
        (None, rest)
    };

    let parts: Vec<&str> = rest.split(':').collect();
    let (ip, host_port, container_port) = match (ip, parts.as_slice()) {
        (None, [container]) => ("", "", *container),
        (None, [host, container]) => ("", *host, *container),
        (None, [ip, host, container]) => (*ip, *host, *container),
        (Some(ip), [host, container]) => (ip, *host, *container),
        _ => return Err(invalid(spec, "형식은 [ip:]hostPort:containerPort[/proto] 입니다")),
    };

    parse_port(spec, container_port, false)?;
    parse_port(spec, host_port, true)?;

    Ok((
        format!("{}/{}", container_port, proto),
        PortBinding {
            host_ip: Some(ip.to_string()),
            host_port: Some(host_port.to_string()),
        },
    ))
}

/// 여러 포트 매핑을 하나의 PortMap 으로 합친다
pub fn parse_port_specs<S: AsRef<str>>(specs: &[S]) -> Result<PortMap, DockerError> {
    let mut map: HashMap<String, Option<Vec<PortBinding>>> = HashMap::new();
    for spec in specs {
        let (port, binding) = parse_port_spec(spec.as_ref())?;
        map.entry(port).or_insert_with(|| Some(Vec::new())).get_or_insert_with(Vec::new).push(binding);
    }
    Ok(map)
}
