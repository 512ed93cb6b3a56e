//! stdout/stderr 가 8바이트 헤더로 다중화된 스트림을 분리한다.
//!
//! 프레임 형식: `[stream_type:1][reserved:3][length:4 big-endian]` + `length` 바이트 페이로드.

use std::fmt;
use std::io::{self, Read, Write};

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, warn};

pub const HEADER_LEN: usize = 8;

/// 프레임 헤더의 스트림 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StdType {
    Stdin,
    Stdout,
    Stderr,
    /// 데몬이 보낸 오류, 페이로드가 오류 메시지다
    Systemerr,
}

impl StdType {
    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            0 => Some(StdType::Stdin),
            1 => Some(StdType::Stdout),
            2 => Some(StdType::Stderr),
            3 => Some(StdType::Systemerr),
            _ => None,
        }
    }

    pub fn as_byte(self) -> u8 {
        match self {
            StdType::Stdin => 0,
            StdType::Stdout => 1,
            StdType::Stderr => 2,
            StdType::Systemerr => 3,
        }
    }
}

#[derive(Debug)]
pub enum StdcopyError {
    /// 알 수 없는 스트림 종류
    MalformedHeader {
        stream_type: u8,
    },
    /// 헤더나 페이로드 도중에 입력이 끝남
    ShortRead {
        expected: usize,
        actual: usize,
    },
    /// 데몬이 스트림 안에서 보낸 오류
    Daemon(String),
    Io(io::Error),
}

impl fmt::Display for StdcopyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StdcopyError::MalformedHeader { stream_type } =>
                write!(f, "Unrecognized input header: {}", stream_type),
            StdcopyError::ShortRead { expected, actual } =>
                write!(f, "프레임이 잘림: {} 바이트 필요, {} 바이트 수신", expected, actual),
            StdcopyError::Daemon(msg) =>
                write!(f, "error from daemon in stream: {}", msg),
            StdcopyError::Io(e) =>
                write!(f, "스트림 읽기 오류: {}", e),
        }
    }
}

impl std::error::Error for StdcopyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StdcopyError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for StdcopyError {
    fn from(err: io::Error) -> Self {
        StdcopyError::Io(err)
    }
}

/// 페이로드를 하나 이상의 프레임으로 인코딩한다
pub fn encode_frame(stream: StdType, payload: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(HEADER_LEN + payload.len());
    // Vec 쓰기는 실패하지 않는다
    let _ = write_frame(&mut buf, stream, payload);
    buf
}

pub fn write_frame<W: Write>(w: &mut W, stream: StdType, payload: &[u8]) -> io::Result<()> {
    let max = u32::MAX as usize;
    let mut chunks = payload.chunks(max).peekable();
    if chunks.peek().is_none() {
        return w.write_all(&header(stream, 0));
    }
    for chunk in chunks {
        w.write_all(&header(stream, chunk.len() as u32))?;
        w.write_all(chunk)?;
    }
    Ok(())
}

fn header(stream: StdType, len: u32) -> [u8; HEADER_LEN] {
    let mut h = [0u8; HEADER_LEN];
    h[0] = stream.as_byte();
    h[4..].copy_from_slice(&len.to_be_bytes());
    h
}

fn parse_header(h: &[u8]) -> Result<(StdType, usize), StdcopyError> {
    let stream = StdType::from_byte(h[0]).ok_or(StdcopyError::MalformedHeader { stream_type: h[0] })?;
    let len = u32::from_be_bytes([h[4], h[5], h[6], h[7]]) as usize;
    Ok((stream, len))
}

/// EOF 전까지 최대한 채우고 읽은 바이트 수를 돌려준다
fn read_full<R: Read>(src: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match src.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// 프레임마다 `sink` 를 호출한다. stdin 프레임은 stdout 으로 취급한다.
///
/// 입력이 프레임 경계에서 끝나면 정상 종료, 중간에서 끝나면 `ShortRead`.
pub fn demux_with<R, F>(mut src: R, mut sink: F) -> Result<u64, StdcopyError>
where
    R: Read,
    F: FnMut(StdType, &[u8]) -> io::Result<()>,
{
    let mut written = 0u64;
    let mut head = [0u8; HEADER_LEN];
    let mut payload = Vec::new();

    loop {
        let n = read_full(&mut src, &mut head)?;
        if n == 0 {
            return Ok(written);
        }
        if n < HEADER_LEN {
            return Err(StdcopyError::ShortRead { expected: HEADER_LEN, actual: n });
        }

        let (stream, len) = parse_header(&head)?;
        payload.clear();
        let got = (&mut src).take(len as u64).read_to_end(&mut payload)?;
        if got < len {
            return Err(StdcopyError::ShortRead { expected: len, actual: got });
        }

        match stream {
            StdType::Systemerr => {
                return Err(StdcopyError::Daemon(String::from_utf8_lossy(&payload).into_owned()));
            }
            StdType::Stdin | StdType::Stdout => sink(StdType::Stdout, &payload)?,
            StdType::Stderr => sink(StdType::Stderr, &payload)?,
        }
        written += len as u64;
    }
}

/// stdout/stderr 프레임을 각각의 writer 로 복사한다
pub fn demux<R: Read, O: Write, E: Write>(src: R, stdout: &mut O, stderr: &mut E) -> Result<u64, StdcopyError> {
    demux_with(src, |stream, payload| match stream {
        StdType::Stderr => stderr.write_all(payload),
        _ => stdout.write_all(payload),
    })
}

/// (stdout, stderr) 텍스트로 분리
pub fn split_output<R: Read>(src: R) -> Result<(String, String), StdcopyError> {
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    demux(src, &mut stdout, &mut stderr)?;
    Ok((
        String::from_utf8_lossy(&stdout).into_owned(),
        String::from_utf8_lossy(&stderr).into_owned(),
    ))
}

/// 도착 순서대로 합친 출력
pub fn combined_output<R: Read>(src: R) -> Result<String, StdcopyError> {
    let mut out = Vec::new();
    demux_with(src, |_, payload| {
        out.extend_from_slice(payload);
        Ok(())
    })?;
    Ok(String::from_utf8_lossy(&out).into_owned())
}

/// 조각난 입력에서 완성된 프레임만 꺼내는 점진적 디코더
#[derive(Debug, Default)]
pub struct FrameDecoder {
    pending: Vec<u8>,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, bytes: &[u8]) {
        self.pending.extend_from_slice(bytes);
    }

    /// 아직 완성되지 않은 프레임의 바이트 수
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// 완성된 프레임을 모두 `sink` 로 넘기고 미완성 꼬리는 남겨둔다
    pub fn drain<F: FnMut(StdType, &[u8])>(&mut self, mut sink: F) -> Result<(), StdcopyError> {
        let mut pos = 0;
        while self.pending.len() - pos >= HEADER_LEN {
            let (stream, len) = parse_header(&self.pending[pos..pos + HEADER_LEN])?;
            let end = pos + HEADER_LEN + len;
            if self.pending.len() < end {
                break;
            }
            let payload = &self.pending[pos + HEADER_LEN..end];
            match stream {
                StdType::Systemerr => {
                    return Err(StdcopyError::Daemon(String::from_utf8_lossy(payload).into_owned()));
                }
                StdType::Stderr => sink(StdType::Stderr, payload),
                StdType::Stdin | StdType::Stdout => sink(StdType::Stdout, payload),
            }
            pos = end;
        }
        self.pending.drain(..pos);
        Ok(())
    }

    /// 입력이 끝났을 때 남은 바이트가 있으면 잘린 프레임이다
    pub fn finish(&self) -> Result<(), StdcopyError> {
        if self.pending.is_empty() {
            return Ok(());
        }
        if self.pending.len() < HEADER_LEN {
            return Err(StdcopyError::ShortRead { expected: HEADER_LEN, actual: self.pending.len() });
        }
        let (_, len) = parse_header(&self.pending[..HEADER_LEN])?;
        Err(StdcopyError::ShortRead { expected: len, actual: self.pending.len() - HEADER_LEN })
    }
}

/// 원본 스트림을 줄 단위로 읽으면서, 줄마다 지금까지 합쳐진 전체 출력을 보낸다.
///
/// 채널 용량은 1 이라 소비자가 받아가기 전까지 생산 태스크는 대기한다.
/// 디코딩 오류는 마지막 `Err` 항목으로 전달되고 채널이 닫힌다.
/// 수신자를 버리면 다음 전송에서 태스크가 끝난다.
pub fn combined_stream<R>(reader: R) -> mpsc::Receiver<Result<String, StdcopyError>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::channel(1);

    tokio::spawn(async move {
        let mut reader = BufReader::new(reader);
        let mut decoder = FrameDecoder::new();
        let mut combined = Vec::new();
        let mut line = Vec::new();

        loop {
            line.clear();
            let n = match reader.read_until(b'\n', &mut line).await {
                Ok(n) => n,
                Err(e) => {
                    warn!(error = %e, "다중화 스트림 읽기 실패");
                    let _ = tx.send(Err(StdcopyError::Io(e))).await;
                    return;
                }
            };

            if n == 0 {
                if let Err(e) = decoder.finish() {
                    warn!(error = %e, "다중화 스트림이 프레임 도중에 끝남");
                    let _ = tx.send(Err(e)).await;
                }
                debug!(bytes = combined.len(), "다중화 스트림 종료");
                return;
            }

            decoder.extend(&line);
            if let Err(e) = decoder.drain(|_, payload| combined.extend_from_slice(payload)) {
                warn!(error = %e, "다중화 스트림 디코딩 실패");
                let _ = tx.send(Err(e)).await;
                return;
            }

            let text = String::from_utf8_lossy(&combined).into_owned();
            if tx.send(Ok(text)).await.is_err() {
                debug!("수신자가 닫혀 다중화 스트림 읽기 중단");
                return;
            }
        }
    });

    rx
}
