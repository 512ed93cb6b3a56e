use std::collections::HashMap;
use std::fmt;

use bollard::models::{Ipam, IpamConfig};
use bollard::network::{CreateNetworkOptions, InspectNetworkOptions};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NetworkDriver {
    #[default]
    Bridge,
    Overlay,
    Ipvlan,
    Macvlan,
}

impl NetworkDriver {
    pub fn as_str(&self) -> &'static str {
        match self {
            NetworkDriver::Bridge => "bridge",
            NetworkDriver::Overlay => "overlay",
            NetworkDriver::Ipvlan => "ipvlan",
            NetworkDriver::Macvlan => "macvlan",
        }
    }
}

impl fmt::Display for NetworkDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkScope {
    Local,
    Swarm,
    Global,
}

impl NetworkScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            NetworkScope::Local => "local",
            NetworkScope::Swarm => "swarm",
            NetworkScope::Global => "global",
        }
    }
}

impl fmt::Display for NetworkScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default)]
pub struct InspectNetwork {
    pub verbose: bool,
    pub scope: Option<NetworkScope>,
}

impl InspectNetwork {
    /// 기본값이면 쿼리 없이 조회한다
    pub fn to_options(&self) -> Option<InspectNetworkOptions<String>> {
        if !self.verbose && self.scope.is_none() {
            return None;
        }
        Some(InspectNetworkOptions {
            verbose: self.verbose,
            scope: self.scope.map(|s| s.as_str().to_string()).unwrap_or_default(),
        })
    }
}

/// 서브넷 하나에 대한 IP 주소 관리 설정
#[derive(Debug, Clone, Default)]
pub struct IpNet {
    /// 예: 172.16.0.1, 비우면 데몬이 정한다
    pub gateway: String,
    /// CIDR, 예: 172.16.0.0/24
    pub subnet: String,
    /// 컨테이너 IP 를 할당할 하위 범위, 예: 172.16.0.0/25
    pub ip_range: String,
}

impl From<&IpNet> for Ipam {
    fn from(net: &IpNet) -> Self {
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());
        Ipam {
            config: Some(vec![IpamConfig {
                subnet: non_empty(&net.subnet),
                ip_range: non_empty(&net.ip_range),
                gateway: non_empty(&net.gateway),
                ..Default::default()
            }]),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CreateNetwork {
    pub driver: NetworkDriver,
    pub ipam: Option<IpNet>,
    pub enable_ipv6: bool,
    pub internal: bool,
    pub attachable: bool,
    pub ingress: bool,
    /// 드라이버 옵션
    pub options: HashMap<String, String>,
    pub labels: HashMap<String, String>,
}

impl CreateNetwork {
    pub fn to_options(&self, name: &str) -> CreateNetworkOptions<String> {
        CreateNetworkOptions {
            name: name.to_string(),
            check_duplicate: false,
            driver: self.driver.as_str().to_string(),
            internal: self.internal,
            attachable: self.attachable,
            ingress: self.ingress,
            ipam: self.ipam.as_ref().map(Ipam::from).unwrap_or_default(),
            enable_ipv6: self.enable_ipv6,
            options: self.options.clone(),
            labels: self.labels.clone(),
        }
    }
}
