use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::config::ProtocolConfig;
use crate::error::WorkerError;

use super::types::ControlMessage;

/// Line-oriented reader over the control channel. Owns the input stream and
/// the protocol constants; malformed input is logged and skipped, only I/O
/// failures propagate.
pub struct ControlReader<R> {
    input: R,
    cfg: ProtocolConfig,
}

enum Line {
    Ok(String),
    Overlong,
}

impl<R: AsyncBufRead + Unpin> ControlReader<R> {
    pub fn new(input: R, cfg: ProtocolConfig) -> Self {
        Self { input, cfg }
    }

    /// Blocks until the next usable message arrives. `None` means the channel
    /// closed without a sentinel.
    pub async fn next_message(&mut self) -> Result<Option<ControlMessage>, WorkerError> {
        loop {
            match self.read_line().await? {
                None => return Ok(None),
                Some(Line::Overlong) => {
                    tracing::warn!(
                        target: "satgrid.protocol",
                        max_bytes = self.cfg.max_line_bytes,
                        "control line exceeds length limit, skipping"
                    );
                }
                Some(Line::Ok(line)) => {
                    if let Some(msg) = self.decode(&line) {
                        return Ok(Some(msg));
                    }
                }
            }
        }
    }

    /// Sentinel test is full-line equality; "terminate now" is a batch of one
    /// unit, never a stop. Empty tokens are dropped, excess tokens past
    /// `max_batch` are truncated, both logged.
    fn decode(&self, line: &str) -> Option<ControlMessage> {
        if line == self.cfg.terminate {
            return Some(ControlMessage::Terminate);
        }

        let mut units: Vec<String> = Vec::new();
        let mut empties = 0usize;
        let mut dropped = 0usize;
        for token in line.split(self.cfg.delimiter) {
            if token.is_empty() {
                empties += 1;
            } else if units.len() == self.cfg.max_batch {
                dropped += 1;
            } else {
                units.push(token.to_string());
            }
        }

        if empties > 0 {
            tracing::debug!(
                target: "satgrid.protocol",
                empties,
                "dropped empty tokens from batch line"
            );
        }
        if dropped > 0 {
            tracing::warn!(
                target: "satgrid.protocol",
                kept = units.len(),
                dropped,
                "batch exceeds max size, excess units truncated"
            );
        }
        if units.is_empty() {
            tracing::warn!(target: "satgrid.protocol", "batch line carries no unit ids, skipping");
            return None;
        }
        Some(ControlMessage::Batch(units))
    }

    /// Reads one `\n`-terminated line, trimming the terminator and a trailing
    /// `\r`. A line past `max_line_bytes` is drained to its newline and
    /// reported as overlong rather than handed on truncated.
    async fn read_line(&mut self) -> Result<Option<Line>, WorkerError> {
        let mut buf: Vec<u8> = Vec::new();
        let mut overflowed = false;
        loop {
            let chunk = self
                .input
                .fill_buf()
                .await
                .map_err(|source| WorkerError::ChannelRead { source })?;

            if chunk.is_empty() {
                // Stream closed mid-line: the partial line still counts.
                return Ok(if overflowed {
                    Some(Line::Overlong)
                } else if buf.is_empty() {
                    None
                } else {
                    Some(Line::Ok(finish_line(buf)))
                });
            }

            match chunk.iter().position(|&b| b == b'\n') {
                Some(pos) => {
                    if !overflowed {
                        buf.extend_from_slice(&chunk[..pos]);
                    }
                    self.input.consume(pos + 1);
                    return Ok(Some(if overflowed || buf.len() > self.cfg.max_line_bytes {
                        Line::Overlong
                    } else {
                        Line::Ok(finish_line(buf))
                    }));
                }
                None => {
                    let len = chunk.len();
                    if !overflowed {
                        buf.extend_from_slice(chunk);
                        if buf.len() > self.cfg.max_line_bytes {
                            overflowed = true;
                            buf.clear();
                        }
                    }
                    self.input.consume(len);
                }
            }
        }
    }
}

fn finish_line(mut buf: Vec<u8>) -> String {
    if buf.last() == Some(&b'\r') {
        buf.pop();
    }
    String::from_utf8_lossy(&buf).into_owned()
}

#[cfg(test)]
mod tests {
    use tokio::io::BufReader;

    use super::*;

    fn reader(input: &str, cfg: ProtocolConfig) -> ControlReader<BufReader<&[u8]>> {
        ControlReader::new(BufReader::new(input.as_bytes()), cfg)
    }

    #[tokio::test]
    async fn exact_sentinel_terminates() {
        let mut r = reader("terminate\n", ProtocolConfig::default());
        assert_eq!(
            r.next_message().await.unwrap(),
            Some(ControlMessage::Terminate)
        );
    }

    #[tokio::test]
    async fn sentinel_prefix_is_a_batch() {
        let mut r = reader("terminate now\n", ProtocolConfig::default());
        assert_eq!(
            r.next_message().await.unwrap(),
            Some(ControlMessage::Batch(vec!["terminate now".to_string()]))
        );
    }

    #[tokio::test]
    async fn batch_splits_on_delimiter_in_order() {
        let cfg = ProtocolConfig {
            delimiter: '|',
            ..ProtocolConfig::default()
        };
        let mut r = reader("a.cnf|b.cnf|c.cnf\n", cfg);
        assert_eq!(
            r.next_message().await.unwrap(),
            Some(ControlMessage::Batch(vec![
                "a.cnf".to_string(),
                "b.cnf".to_string(),
                "c.cnf".to_string()
            ]))
        );
    }

    #[tokio::test]
    async fn empty_tokens_are_dropped() {
        let mut r = reader(",a.cnf,,b.cnf,\n", ProtocolConfig::default());
        assert_eq!(
            r.next_message().await.unwrap(),
            Some(ControlMessage::Batch(vec![
                "a.cnf".to_string(),
                "b.cnf".to_string()
            ]))
        );
    }

    #[tokio::test]
    async fn excess_units_are_truncated() {
        let cfg = ProtocolConfig {
            max_batch: 2,
            ..ProtocolConfig::default()
        };
        let mut r = reader("a,b,c,d\n", cfg);
        assert_eq!(
            r.next_message().await.unwrap(),
            Some(ControlMessage::Batch(vec![
                "a".to_string(),
                "b".to_string()
            ]))
        );
    }

    #[tokio::test]
    async fn delimiter_only_line_is_skipped() {
        let mut r = reader(",,,\na.cnf\n", ProtocolConfig::default());
        assert_eq!(
            r.next_message().await.unwrap(),
            Some(ControlMessage::Batch(vec!["a.cnf".to_string()]))
        );
    }

    #[tokio::test]
    async fn overlong_line_is_skipped_not_truncated() {
        let cfg = ProtocolConfig {
            max_line_bytes: 8,
            ..ProtocolConfig::default()
        };
        let long = "x".repeat(64);
        let input = format!("{long}\nb.cnf\n");
        let mut r = reader(&input, cfg);
        assert_eq!(
            r.next_message().await.unwrap(),
            Some(ControlMessage::Batch(vec!["b.cnf".to_string()]))
        );
    }

    #[tokio::test]
    async fn crlf_terminator_is_trimmed() {
        let mut r = reader("a.cnf\r\n", ProtocolConfig::default());
        assert_eq!(
            r.next_message().await.unwrap(),
            Some(ControlMessage::Batch(vec!["a.cnf".to_string()]))
        );
    }

    #[tokio::test]
    async fn end_of_stream_yields_none() {
        let mut r = reader("", ProtocolConfig::default());
        assert_eq!(r.next_message().await.unwrap(), None);
    }

    #[tokio::test]
    async fn final_line_without_newline_is_read() {
        let mut r = reader("terminate", ProtocolConfig::default());
        assert_eq!(
            r.next_message().await.unwrap(),
            Some(ControlMessage::Terminate)
        );
    }
}
