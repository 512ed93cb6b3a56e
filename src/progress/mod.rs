mod aggregator;
mod message;

pub use aggregator::MessageAggregator;
pub use message::{AuxId, BuildMessage, ErrorDetail, ProgressRecord, PullPushMessage};

use futures_util::{Stream, StreamExt};
use tracing::debug;

use crate::error::DockerError;

/// 진행 메시지 스트림을 끝까지 읽으면서 갱신된 화면을 콜백으로 넘긴다.
///
/// 호출자는 매번 이전 출력을 지우고 새 화면을 다시 그리면 된다.
/// 마지막으로 그린 화면을 돌려준다.
pub async fn drive<S, R, F>(stream: S, mut on_update: F) -> Result<String, DockerError>
where
    S: Stream<Item = Result<R, DockerError>>,
    R: ProgressRecord,
    F: FnMut(&str),
{
    let mut aggregator = MessageAggregator::new();
    let mut last = String::new();
    futures_util::pin_mut!(stream);

    while let Some(record) = stream.next().await {
        let record = record?;
        last = aggregator.append(&record);
        on_update(&last);
    }

    debug!(lines = aggregator.line_count(), "진행 메시지 스트림 종료");
    Ok(last)
}
