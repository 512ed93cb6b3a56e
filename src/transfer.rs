use std::path::Path;

use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::error::DockerError;

/// 바이트 스트림을 파일로 저장하고 기록한 바이트 수를 돌려준다
pub(crate) async fn save_stream<S>(stream: S, path: &Path, context: &str) -> Result<u64, DockerError>
where
    S: Stream<Item = Result<Bytes, bollard::errors::Error>>,
{
    let shown = path.display().to_string();
    let mut file = File::create(path).await.map_err(DockerError::io(shown.clone()))?;
    let mut written = 0u64;
    futures_util::pin_mut!(stream);

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(DockerError::api(context))?;
        file.write_all(&chunk).await.map_err(DockerError::io(shown.clone()))?;
        written += chunk.len() as u64;
    }
    file.flush().await.map_err(DockerError::io(shown.clone()))?;

    debug!(path = %shown, bytes = written, "스트림 저장 완료");
    Ok(written)
}

pub(crate) async fn read_file(path: &Path) -> Result<Bytes, DockerError> {
    tokio::fs::read(path)
        .await
        .map(Bytes::from)
        .map_err(DockerError::io(path.display().to_string()))
}
