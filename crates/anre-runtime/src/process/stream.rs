//! Async stream readers for server output (non-UTF8-safe).
//!
//! The server may write GBK or UTF-8, and its first write decides whether a
//! start attempt succeeded. Readers therefore work on raw chunks: every
//! chunk is reported as-is, then split into lines which are decoded one by
//! one. `BufReader::lines()` would stop on the first invalid UTF-8 byte.

use std::sync::Arc;

use anre_core::ports::OutputStream;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::decode::decode_output;

const CHUNK_SIZE: usize = 4096;

/// Receives what a stream reader sees.
pub trait OutputObserver: Send + Sync {
    /// A raw chunk arrived, decoded as a whole.
    fn on_chunk(&self, stream: OutputStream, text: &str);

    /// A complete line arrived, without its line terminator.
    fn on_line(&self, stream: OutputStream, line: &str);
}

/// Splits a byte stream into lines across chunk boundaries.
#[derive(Debug, Default)]
pub struct LineSplitter {
    pending: Vec<u8>,
}

impl LineSplitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk, returning every line it completes.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<Vec<u8>> {
        let mut lines = Vec::new();
        for &byte in chunk {
            if byte == b'\n' {
                let mut line = std::mem::take(&mut self.pending);
                if line.last() == Some(&b'\r') {
                    line.pop();
                }
                lines.push(line);
            } else {
                self.pending.push(byte);
            }
        }
        lines
    }

    /// Take the unterminated remainder, if any.
    pub fn finish(&mut self) -> Option<Vec<u8>> {
        if self.pending.is_empty() {
            return None;
        }
        let mut line = std::mem::take(&mut self.pending);
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        Some(line)
    }
}

/// Spawn a task that reads `stream` to EOF and reports to `observer`.
pub fn spawn_stream_reader(
    stream: impl AsyncRead + Unpin + Send + 'static,
    kind: OutputStream,
    pid: u32,
    observer: Arc<dyn OutputObserver>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut stream = stream;
        let mut chunk = vec![0_u8; CHUNK_SIZE];
        let mut splitter = LineSplitter::new();

        loop {
            match stream.read(&mut chunk).await {
                Ok(0) => break, // EOF
                Ok(n) => {
                    let bytes = &chunk[..n];
                    observer.on_chunk(kind, &decode_output(bytes));
                    for line in splitter.push(bytes) {
                        observer.on_line(kind, &decode_output(&line));
                    }
                }
                Err(e) => {
                    debug!(pid = %pid, stream = %kind, error = %e, "Output reader exiting due to read error");
                    break;
                }
            }
        }

        if let Some(rest) = splitter.finish() {
            observer.on_line(kind, &decode_output(&rest));
        }

        debug!(pid = %pid, stream = %kind, "Output reader task exiting");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_splitter_joins_lines_across_chunks() {
        let mut splitter = LineSplitter::new();
        assert!(splitter.push(b"Running on ").is_empty());
        let lines = splitter.push(b"port => 9000\r\nnext");
        assert_eq!(lines, vec![b"Running on port => 9000".to_vec()]);
        assert_eq!(splitter.finish(), Some(b"next".to_vec()));
        assert_eq!(splitter.finish(), None);
    }

    #[test]
    fn test_splitter_keeps_empty_lines() {
        let mut splitter = LineSplitter::new();
        let lines = splitter.push(b"a\n\nb\n");
        assert_eq!(lines, vec![b"a".to_vec(), Vec::new(), b"b".to_vec()]);
    }

    #[derive(Default)]
    struct Recorder {
        chunks: Mutex<Vec<String>>,
        lines: Mutex<Vec<String>>,
    }

    impl OutputObserver for Recorder {
        fn on_chunk(&self, _stream: OutputStream, text: &str) {
            self.chunks.lock().unwrap().push(text.to_string());
        }

        fn on_line(&self, _stream: OutputStream, line: &str) {
            self.lines.lock().unwrap().push(line.to_string());
        }
    }

    #[tokio::test]
    async fn test_reader_decodes_gbk_lines() {
        let recorder = Arc::new(Recorder::default());
        // "端口" in GBK followed by an unterminated tail
        let input: &[u8] = &[0xB6, 0xCB, 0xBF, 0xDA, b'\n', b'o', b'k'];

        spawn_stream_reader(input, OutputStream::Stdout, 1, recorder.clone())
            .await
            .unwrap();

        assert_eq!(*recorder.lines.lock().unwrap(), vec!["端口", "ok"]);
        assert!(!recorder.chunks.lock().unwrap().is_empty());
    }
}
