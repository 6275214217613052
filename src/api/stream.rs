use super::error::{ApiError, ApiResult};
use futures::stream::{self, Stream, StreamExt};
use std::pin::Pin;
use tokio_util::sync::CancellationToken;

type ByteStream = Pin<Box<dyn Stream<Item = ApiResult<Vec<u8>>> + Send>>;

/// Decodes UTF-8 text that may be split at arbitrary byte boundaries
#[derive(Debug, Default)]
pub struct Utf8ChunkDecoder {
    pending: Vec<u8>,
}

impl Utf8ChunkDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed bytes, returning all text that is complete so far.
    /// Invalid sequences become U+FFFD; a truncated trailing character is held back.
    pub fn push(&mut self, bytes: &[u8]) -> String {
        self.pending.extend_from_slice(bytes);
        let mut out = String::new();

        loop {
            match std::str::from_utf8(&self.pending) {
                Ok(text) => {
                    out.push_str(text);
                    self.pending.clear();
                    break;
                }
                Err(e) => {
                    let valid = e.valid_up_to();
                    out.push_str(std::str::from_utf8(&self.pending[..valid]).unwrap_or_default());
                    match e.error_len() {
                        Some(len) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            self.pending.drain(..valid + len);
                        }
                        None => {
                            self.pending.drain(..valid);
                            break;
                        }
                    }
                }
            }
        }

        out
    }

    /// Flush whatever is left at end of stream
    pub fn finish(&mut self) -> String {
        let rest = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();
        rest
    }
}

enum Next {
    Cancelled,
    Item(Option<ApiResult<Vec<u8>>>),
}

/// Cancellable sequence of text chunks from a streaming chat response.
///
/// Cancelling the token ends the sequence and drops the response body, which
/// stops the underlying network read.
pub struct ChatStream {
    inner: ByteStream,
    decoder: Utf8ChunkDecoder,
    cancel: CancellationToken,
    done: bool,
}

impl ChatStream {
    pub(crate) fn from_response(response: reqwest::Response, cancel: CancellationToken) -> Self {
        let bytes = response
            .bytes_stream()
            .map(|chunk| chunk.map(|b| b.to_vec()).map_err(ApiError::from));
        Self::from_byte_stream(bytes, cancel)
    }

    pub fn from_byte_stream<S>(bytes: S, cancel: CancellationToken) -> Self
    where
        S: Stream<Item = ApiResult<Vec<u8>>> + Send + 'static,
    {
        Self {
            inner: Box::pin(bytes),
            decoder: Utf8ChunkDecoder::new(),
            cancel,
            done: false,
        }
    }

    /// Next non-empty text chunk, `None` once the stream has ended.
    /// Yields `Err(ApiError::Cancelled)` once if cancelled mid-stream.
    pub async fn next_chunk(&mut self) -> Option<ApiResult<String>> {
        loop {
            if self.done {
                return None;
            }

            let next = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => Next::Cancelled,
                item = self.inner.next() => Next::Item(item),
            };

            match next {
                Next::Cancelled => {
                    self.close();
                    return Some(Err(ApiError::Cancelled));
                }
                Next::Item(Some(Ok(bytes))) => {
                    let text = self.decoder.push(&bytes);
                    if !text.is_empty() {
                        return Some(Ok(text));
                    }
                }
                Next::Item(Some(Err(e))) => {
                    self.close();
                    return Some(Err(e));
                }
                Next::Item(None) => {
                    self.done = true;
                    let rest = self.decoder.finish();
                    if !rest.is_empty() {
                        return Some(Ok(rest));
                    }
                }
            }
        }
    }

    fn close(&mut self) {
        self.done = true;
        self.inner = Box::pin(stream::empty());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_decoder_reassembles_split_characters() {
        let text = "你好，世界";
        let bytes = text.as_bytes();
        let mut decoder = Utf8ChunkDecoder::new();
        let mut out = String::new();
        // Feed one byte at a time so every multi-byte char is split
        for b in bytes {
            out.push_str(&decoder.push(std::slice::from_ref(b)));
        }
        out.push_str(&decoder.finish());
        assert_eq!(out, text);
    }

    #[test]
    fn test_decoder_holds_back_incomplete_tail() {
        let mut decoder = Utf8ChunkDecoder::new();
        let bytes = "ab写".as_bytes();
        assert_eq!(decoder.push(&bytes[..3]), "ab");
        assert_eq!(decoder.push(&bytes[3..]), "写");
    }

    #[test]
    fn test_decoder_replaces_invalid_bytes() {
        let mut decoder = Utf8ChunkDecoder::new();
        assert_eq!(decoder.push(&[b'a', 0xff, b'b']), "a\u{FFFD}b");
    }

    #[tokio::test]
    async fn test_chat_stream_yields_text_chunks() {
        let bytes = "专注".as_bytes().to_vec();
        let chunks: Vec<ApiResult<Vec<u8>>> = vec![
            Ok(bytes[..2].to_vec()),
            Ok(bytes[2..].to_vec()),
            Ok(b" ok".to_vec()),
        ];
        let mut stream = ChatStream::from_byte_stream(stream::iter(chunks), CancellationToken::new());

        let mut collected = Vec::new();
        while let Some(chunk) = stream.next_chunk().await {
            collected.push(chunk.unwrap());
        }
        assert_eq!(collected, vec!["专注".to_string(), " ok".to_string()]);
    }

    #[tokio::test]
    async fn test_chat_stream_stops_when_cancelled() {
        let cancel = CancellationToken::new();
        let mut stream = ChatStream::from_byte_stream(stream::pending(), cancel.clone());
        cancel.cancel();

        assert!(matches!(stream.next_chunk().await, Some(Err(ApiError::Cancelled))));
        assert!(stream.next_chunk().await.is_none());
    }
}
