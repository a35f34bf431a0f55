use anyhow::Result;
use tokio::{
    io::{AsyncBufReadExt, AsyncRead, BufReader, Lines},
    sync::Mutex,
};

type BoxedReader = Box<dyn AsyncRead + Unpin + Send>;

/// Line based user input. Shared between the command loop and the prompt that waits for a
/// session change to be acknowledged; only one of them reads at a time.
pub struct LineInput {
    lines: Mutex<Lines<BufReader<BoxedReader>>>,
}

impl LineInput {
    pub fn new(reader: impl AsyncRead + Unpin + Send + 'static) -> Self {
        let reader: BoxedReader = Box::new(reader);
        Self {
            lines: Mutex::new(BufReader::new(reader).lines()),
        }
    }

    pub fn stdin() -> Self {
        Self::new(tokio::io::stdin())
    }

    /// Returns `None` once the input is closed. Cancel safe.
    pub async fn next_line(&self) -> Result<Option<String>> {
        Ok(self.lines.lock().await.next_line().await?)
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;

    use super::LineInput;

    #[tokio::test]
    async fn test_reads_lines_until_closed() -> Result<()> {
        let input = LineInput::new(&b"start\nadd Alpha\n"[..]);
        assert_eq!(input.next_line().await?.as_deref(), Some("start"));
        assert_eq!(input.next_line().await?.as_deref(), Some("add Alpha"));
        assert_eq!(input.next_line().await?, None);
        Ok(())
    }
}
