//! Byte-stream plumbing for response bodies.
//!
//! # Responsibilities
//! - Bounded-buffer copy from a byte source to a byte sink
//! - Normalize peer-disconnect into a successful partial copy
//! - Adapt an owned reader into a streaming HTTP body
//!
//! # Design Decisions
//! - A client dropping the connection mid-stream is normal traffic shape,
//!   not a defect; the copy terminates with the bytes moved so far.
//! - Neither source nor sink is closed here; lifecycle belongs to callers.

use std::io::ErrorKind;
use std::pin::Pin;
use std::task::Poll;

use axum::body::{Body, Bytes};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, ReadBuf};

use crate::error::ServeError;

/// Copy buffer size used when streaming resource bodies.
pub const COPY_BUFFER_SIZE: usize = 0x10000;

/// Reads all remaining bytes from `source` and writes them to `sink`,
/// returning the number of bytes copied. Disconnect-style I/O errors on
/// either side are treated as end-of-stream because the peer closing a TCP
/// stream asynchronously is expected; all other I/O errors propagate.
pub async fn copy<R, W>(source: &mut R, sink: &mut W, buffer_size: usize) -> Result<u64, ServeError>
where
    R: AsyncRead + Unpin + ?Sized,
    W: AsyncWrite + Unpin + ?Sized,
{
    if buffer_size == 0 {
        return Err(ServeError::InvalidArgument(
            "buffer size must be positive".into(),
        ));
    }

    let mut buffer = vec![0u8; buffer_size];
    let mut bytes_copied = 0u64;
    loop {
        let bytes_read = match source.read(&mut buffer).await {
            Ok(0) => break,
            Ok(count) => count,
            Err(error) if is_disconnect(&error) => break,
            Err(error) => return Err(error.into()),
        };
        match sink.write_all(&buffer[..bytes_read]).await {
            Ok(()) => bytes_copied += bytes_read as u64,
            Err(error) if is_disconnect(&error) => break,
            Err(error) => return Err(error.into()),
        }
    }
    Ok(bytes_copied)
}

/// Whether an I/O error represents the other side terminating the stream.
fn is_disconnect(error: &std::io::Error) -> bool {
    matches!(
        error.kind(),
        ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted
            | ErrorKind::BrokenPipe
            | ErrorKind::UnexpectedEof
    )
}

/// Adapts an owned reader into a streaming response body.
///
/// The reader is drained through [`copy`] into an in-memory pipe by a
/// spawned task; the read half feeds the body chunk by chunk. Dropping the
/// body (client disconnect) surfaces to the copy task as a broken pipe,
/// which [`copy`] normalizes into a clean partial transfer.
pub fn streaming_body<R>(source: R) -> Body
where
    R: AsyncRead + Send + Unpin + 'static,
{
    let (mut writer, mut reader) = tokio::io::duplex(COPY_BUFFER_SIZE);

    tokio::spawn(async move {
        let mut source = source;
        match copy(&mut source, &mut writer, COPY_BUFFER_SIZE).await {
            Ok(bytes_copied) => tracing::trace!(bytes_copied, "resource streamed"),
            Err(error) => tracing::debug!(%error, "resource streaming failed"),
        }
        let _ = writer.shutdown().await;
    });

    Body::from_stream(futures_util::stream::poll_fn(move |context| {
        let mut chunk = vec![0u8; 16 * 1024];
        let mut buffer = ReadBuf::new(&mut chunk);
        match Pin::new(&mut reader).poll_read(context, &mut buffer) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Err(error)) => Poll::Ready(Some(Err(error))),
            Poll::Ready(Ok(())) => {
                let filled = buffer.filled().len();
                if filled == 0 {
                    Poll::Ready(None)
                } else {
                    chunk.truncate(filled);
                    Poll::Ready(Some(Ok(Bytes::from(chunk))))
                }
            }
        }
    }))
}
