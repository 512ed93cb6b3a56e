//! bollard 가 이미 분리해 준 `LogOutput` 스트림을 텍스트로 모은다.
//! 스트림 오류는 호출 쪽에서 문맥을 붙여 `DockerError` 로 바꿔 둔다.

use bollard::container::LogOutput;
use futures_util::{Stream, StreamExt};

use crate::error::DockerError;

/// 분리된 출력
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Output {
    pub stdout: String,
    pub stderr: String,
}

fn push(buf: &mut Vec<u8>, chunk: &[u8]) {
    buf.extend_from_slice(chunk);
}

/// stdin/console 은 stdout 으로 모은다
pub async fn collect_output<S>(stream: S) -> Result<Output, DockerError>
where
    S: Stream<Item = Result<LogOutput, DockerError>>,
{
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    futures_util::pin_mut!(stream);

    while let Some(item) = stream.next().await {
        match item? {
            LogOutput::StdErr { message } => push(&mut stderr, &message),
            LogOutput::StdOut { message }
            | LogOutput::StdIn { message }
            | LogOutput::Console { message } => push(&mut stdout, &message),
        }
    }

    Ok(Output {
        stdout: String::from_utf8_lossy(&stdout).into_owned(),
        stderr: String::from_utf8_lossy(&stderr).into_owned(),
    })
}

/// 도착 순서대로 합친 출력
pub async fn collect_combined<S>(stream: S) -> Result<String, DockerError>
where
    S: Stream<Item = Result<LogOutput, DockerError>>,
{
    let mut out = Vec::new();
    futures_util::pin_mut!(stream);

    while let Some(item) = stream.next().await {
        match item? {
            LogOutput::StdErr { message }
            | LogOutput::StdOut { message }
            | LogOutput::StdIn { message }
            | LogOutput::Console { message } => push(&mut out, &message),
        }
    }

    Ok(String::from_utf8_lossy(&out).into_owned())
}
