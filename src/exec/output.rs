// src/exec/output.rs

use tokio::io::{AsyncRead, AsyncReadExt};

/// Everything a child wrote to its stdout and stderr pipes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl CapturedOutput {
    pub fn stdout_str(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    pub fn stderr_str(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }

    /// Stdout split into lines without their terminators, for line-oriented
    /// parsers.
    pub fn stdout_lines(&self) -> Vec<String> {
        self.stdout_str().lines().map(str::to_string).collect()
    }
}

/// Drain a pipe to end-of-stream, appending to `buf`. A missing pipe reads as
/// empty.
///
/// Reads in chunks, so when the future is dropped early `buf` still holds
/// everything read up to that point.
pub(crate) async fn drain_into<R>(pipe: Option<&mut R>, buf: &mut Vec<u8>) -> std::io::Result<()>
where
    R: AsyncRead + Unpin,
{
    let Some(pipe) = pipe else {
        return Ok(());
    };
    let mut chunk = [0u8; 8192];
    loop {
        let n = pipe.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }
        buf.extend_from_slice(&chunk[..n]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_strip_terminators() {
        let out = CapturedOutput {
            stdout: b"U src/a.c\r\nM src/b.c\n? notes\n".to_vec(),
            stderr: Vec::new(),
        };
        assert_eq!(out.stdout_lines(), vec!["U src/a.c", "M src/b.c", "? notes"]);
    }

    #[tokio::test]
    async fn drain_handles_missing_pipe() {
        let mut empty = Vec::new();
        drain_into::<&[u8]>(None, &mut empty).await.unwrap();
        assert!(empty.is_empty());

        let mut data = b"pre:".to_vec();
        let mut pipe = &b"hello"[..];
        drain_into(Some(&mut pipe), &mut data).await.unwrap();
        assert_eq!(data, b"pre:hello");
    }

    #[tokio::test]
    async fn cancelled_drain_keeps_what_was_read() {
        let (mut writer, mut reader) = tokio::io::duplex(64);
        tokio::io::AsyncWriteExt::write_all(&mut writer, b"partial").await.unwrap();

        let mut buf = Vec::new();
        let res = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            drain_into(Some(&mut reader), &mut buf),
        )
        .await;

        assert!(res.is_err(), "writer is still open, drain must not finish");
        assert_eq!(buf, b"partial");
    }
}
