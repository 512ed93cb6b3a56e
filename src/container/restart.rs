use bollard::models::{RestartPolicy, RestartPolicyNameEnum};

pub fn always() -> RestartPolicy {
    RestartPolicy {
        name: Some(RestartPolicyNameEnum::ALWAYS),
        maximum_retry_count: None,
    }
}

pub fn none() -> RestartPolicy {
    RestartPolicy {
        name: Some(RestartPolicyNameEnum::EMPTY),
        maximum_retry_count: None,
    }
}

pub fn unless_stopped() -> RestartPolicy {
    RestartPolicy {
        name: Some(RestartPolicyNameEnum::UNLESS_STOPPED),
        maximum_retry_count: None,
    }
}

/// 비정상 종료 시 최대 `retry` 번 재시작
pub fn on_failure(retry: i64) -> RestartPolicy {
    RestartPolicy {
        name: Some(RestartPolicyNameEnum::ON_FAILURE),
        maximum_retry_count: Some(retry),
    }
}
