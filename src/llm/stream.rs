//! Newline-delimited JSON decoding for streamed generate responses.
//!
//! A response body arrives as arbitrary byte chunks. [`LineDecoder`] reassembles
//! whole lines, [`fragments`] turns them into a lazy stream of parsed
//! [`Fragment`]s (lines that are not valid JSON are dropped), and
//! [`collect_text`] concatenates the fragments' text in arrival order.

use crate::error::{Result, TripPlannerError};
use futures::stream::{self, Stream, StreamExt};
use serde::Deserialize;
use tracing::{debug, warn};

/// One line of a streamed generate response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Fragment {
    /// Partial text.
    #[serde(default)]
    pub response: Option<String>,
    /// Set on the final fragment.
    #[serde(default)]
    pub done: bool,
    /// Server-side failure reported in-band.
    #[serde(default)]
    pub error: Option<String>,
}

/// Splits a byte stream into lines, buffering partial lines across chunks.
#[derive(Debug, Default)]
pub struct LineDecoder {
    buf: Vec<u8>,
}

impl LineDecoder {
    /// Feed a chunk; returns every line completed by it (without terminators).
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buf.extend_from_slice(chunk);

        let mut lines = Vec::new();
        while let Some(pos) = self.buf.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buf.drain(..=pos).collect();
            lines.push(decode_line(&line[..line.len() - 1]));
        }
        lines
    }

    /// Flush a trailing line that was not newline-terminated.
    pub fn finish(&mut self) -> Option<String> {
        if self.buf.is_empty() {
            return None;
        }
        let line = std::mem::take(&mut self.buf);
        Some(decode_line(&line))
    }
}

fn decode_line(bytes: &[u8]) -> String {
    let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}

/// Parse one line; blank or malformed lines yield `None`.
pub fn parse_fragment(line: &str) -> Option<Fragment> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    match serde_json::from_str(line) {
        Ok(fragment) => Some(fragment),
        Err(e) => {
            debug!(error = %e, line, "skipping malformed stream fragment");
            None
        }
    }
}

/// Lazily decode a chunked body into fragments.
///
/// Transport errors are passed through and end the stream; malformed lines are filtered out.
pub fn fragments<S, B, E>(body: S) -> impl Stream<Item = Result<Fragment>>
where
    S: Stream<Item = std::result::Result<B, E>> + Unpin,
    B: AsRef<[u8]>,
    E: Into<TripPlannerError>,
{
    let lines = stream::unfold(
        (body, LineDecoder::default(), false),
        |(mut body, mut decoder, finished)| async move {
            if finished {
                return None;
            }
            match body.next().await {
                Some(Ok(chunk)) => {
                    let lines: Vec<Result<String>> =
                        decoder.push(chunk.as_ref()).into_iter().map(Ok).collect();
                    Some((lines, (body, decoder, false)))
                }
                Some(Err(e)) => Some((vec![Err(e.into())], (body, decoder, true))),
                None => {
                    let tail: Vec<Result<String>> = decoder.finish().into_iter().map(Ok).collect();
                    Some((tail, (body, decoder, true)))
                }
            }
        },
    );

    lines
        .flat_map(stream::iter)
        .filter_map(|line| async move {
            match line {
                Ok(line) => parse_fragment(&line).map(Ok),
                Err(e) => Some(Err(e)),
            }
        })
}

/// Concatenate the text of every fragment.
///
/// Returns [`TripPlannerError::EmptyResponse`] if the stream carried no text.
pub async fn collect_text<S>(fragments: S) -> Result<String>
where
    S: Stream<Item = Result<Fragment>>,
{
    let mut fragments = std::pin::pin!(fragments);
    let mut text = String::new();
    let mut server_error = None;

    while let Some(fragment) = fragments.next().await {
        let fragment = fragment?;
        if let Some(err) = fragment.error {
            warn!(error = %err, "local model reported an error");
            server_error = Some(err);
        }
        if let Some(part) = fragment.response {
            text.push_str(&part);
        }
    }

    if text.is_empty() {
        return Err(TripPlannerError::EmptyResponse(
            server_error.unwrap_or_else(|| "stream produced no text".to_string()),
        ));
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunks(parts: &[&'static str]) -> impl Stream<Item = Result<&'static [u8]>> + Unpin {
        stream::iter(parts.iter().map(|p| Ok(p.as_bytes())).collect::<Vec<_>>())
    }

    #[test]
    fn test_line_decoder_reassembles_split_lines() {
        let mut decoder = LineDecoder::default();
        assert!(decoder.push(b"{\"resp").is_empty());
        assert_eq!(decoder.push(b"onse\":\"A\"}\r\n{\"x\":1}\n{"), vec![
            "{\"response\":\"A\"}".to_string(),
            "{\"x\":1}".to_string(),
        ]);
        assert_eq!(decoder.finish(), Some("{".to_string()));
        assert_eq!(decoder.finish(), None);
    }

    #[test]
    fn test_line_decoder_keeps_multibyte_chars_across_chunks() {
        let mut decoder = LineDecoder::default();
        let text = "€\n".as_bytes();
        assert!(decoder.push(&text[..1]).is_empty());
        assert_eq!(decoder.push(&text[1..]), vec!["€".to_string()]);
    }

    #[test]
    fn test_parse_fragment() {
        assert_eq!(
            parse_fragment(r#"{"response":"Hi","done":false}"#),
            Some(Fragment {
                response: Some("Hi".to_string()),
                ..Default::default()
            })
        );
        assert!(parse_fragment("malformed").is_none());
        assert!(parse_fragment("   ").is_none());
    }

    #[tokio::test]
    async fn test_collect_skips_malformed_lines() {
        let body = chunks(&[
            "{\"response\":\"A\"}\n{\"response\":\"B\"}\nmalformed\n",
            "{\"response\":\"C\"}",
        ]);
        let text = collect_text(fragments(body)).await.unwrap();
        assert_eq!(text, "ABC");
    }

    #[tokio::test]
    async fn test_collect_empty_stream() {
        let err = collect_text(fragments(chunks(&[]))).await.unwrap_err();
        assert!(matches!(err, TripPlannerError::EmptyResponse(_)));
    }

    #[tokio::test]
    async fn test_collect_surfaces_in_band_error() {
        let body = chunks(&["{\"error\":\"model 'x' not found\"}\n"]);
        let err = collect_text(fragments(body)).await.unwrap_err();
        assert_eq!(err.to_string(), "Empty response: model 'x' not found");
    }

    #[tokio::test]
    async fn test_transport_error_aborts() {
        let body = stream::iter(vec![
            Ok(b"{\"response\":\"A\"}\n".as_slice()),
            Err(TripPlannerError::Http("connection reset".to_string())),
        ]);
        let err = collect_text(fragments(body)).await.unwrap_err();
        assert!(matches!(err, TripPlannerError::Http(_)));
    }
}
