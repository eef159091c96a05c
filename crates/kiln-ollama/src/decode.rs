use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::error::{OllamaError, Result};
use crate::types::ChatChunk;

/// Decode a complete non-streaming response body
///
/// Only the first JSON value is read; anything after it is ignored.
pub fn decode_once(body: &[u8]) -> Result<String> {
    let first = serde_json::Deserializer::from_slice(body)
        .into_iter::<ChatChunk>()
        .next()
        .unwrap_or_else(|| Err(<serde_json::Error as serde::de::Error>::custom("empty response body")));

    first.map(|chunk| chunk.message.content).map_err(OllamaError::Decode)
}

/// Decode a line-delimited stream of chat chunks
///
/// Every non-empty fragment is appended to the aggregate before
/// `on_fragment` sees it, in arrival order. Reading stops at the first
/// chunk marked `done`; nothing after that line is read. Blank lines are
/// skipped. End of input without a `done` chunk is a normal completion.
///
/// Invalid UTF-8 within a line is replaced with U+FFFD before decoding.
/// On error the partial aggregate is discarded.
pub async fn decode_stream<R, F>(mut reader: R, mut on_fragment: F) -> Result<String>
where
    R: AsyncBufRead + Unpin,
    F: FnMut(&str),
{
    let mut buf = Vec::new();
    let mut aggregate = String::new();
    let mut line_no = 0;

    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .await
            .map_err(OllamaError::StreamRead)?;
        if read == 0 {
            break;
        }
        line_no += 1;

        let line = String::from_utf8_lossy(trim_newline(&buf));
        if line.trim().is_empty() {
            continue;
        }

        let chunk: ChatChunk = serde_json::from_str(&line).map_err(|source| OllamaError::StreamDecode {
            line: line_no,
            source,
        })?;

        let fragment = &chunk.message.content;
        if !fragment.is_empty() {
            aggregate.push_str(fragment);
            on_fragment(fragment);
        }

        if chunk.done {
            break;
        }
    }

    Ok(aggregate)
}

/// Strip a trailing `\n` or `\r\n`
fn trim_newline(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
