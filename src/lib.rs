//! docker-kit 은 bollard 위에 얹은 Docker 엔진 API 편의 계층입니다.
//!
//! # 주요 기능
//!
//! - 컨테이너, 이미지, 네트워크, 볼륨, 시스템 API 를 옵션 구조체로 호출
//! - pull/push/build 진행 메시지를 레이어별 한 줄로 집계
//! - stdout/stderr 다중화 스트림 분리
//!
//! # 진행 메시지 집계
//!
//! ```
//! use docker_kit::progress::{MessageAggregator, PullPushMessage};
//!
//! let mut aggregator = MessageAggregator::new();
//!
//! let first = PullPushMessage::from_json(r#"{"id":"a1","status":"Downloading","progress":"[=>  ]"}"#).unwrap();
//! let second = PullPushMessage::from_json(r#"{"id":"b2","status":"Waiting"}"#).unwrap();
//! let done = PullPushMessage::from_json(r#"{"id":"a1","status":"Pull complete"}"#).unwrap();
//!
//! aggregator.append(&first);
//! aggregator.append(&second);
//!
//! // a1 은 처음 나타난 첫 줄에 머물고 내용만 바뀐다
//! assert_eq!(aggregator.append(&done), "a1: Pull complete \nb2: Waiting ");
//! ```
//!
//! # 다중화 스트림 분리
//!
//! ```
//! use docker_kit::stdcopy::{encode_frame, split_output, StdType};
//!
//! let mut raw = encode_frame(StdType::Stdout, b"hello\n");
//! raw.extend(encode_frame(StdType::Stderr, b"oops\n"));
//!
//! let (stdout, stderr) = split_output(raw.as_slice()).unwrap();
//! assert_eq!(stdout, "hello\n");
//! assert_eq!(stderr, "oops\n");
//! ```
//!
//! # 엔진 호출
//!
//! ```no_run
//! use docker_kit::container::ListContainers;
//! use docker_kit::DockerKit;
//!
//! # async fn run() -> Result<(), docker_kit::DockerError> {
//! let kit = DockerKit::with_defaults().await?;
//! let running = kit.containers().list(&ListContainers::default()).await?;
//! println!("{} 개 실행 중", running.len());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod container;
pub mod error;
pub mod filter;
pub mod image;
pub mod logging;
pub mod network;
pub mod output;
pub mod progress;
pub mod settings;
pub mod stdcopy;
pub mod system;
mod transfer;
pub mod volume;

pub use client::DockerKit;
pub use error::DockerError;
