use std::sync::Arc;

use anyhow::{bail, Result};
use async_trait::async_trait;
use tracing::debug;

use super::input::LineInput;

/// The acknowledgment step between two phases. The next phase only starts once `confirm`
/// returns.
#[async_trait]
pub trait Confirmation: Send + Sync {
    async fn confirm(&self, message: &str) -> Result<()>;
}

/// Prints the message and waits for the user to press enter.
pub struct PromptConfirmation {
    input: Arc<LineInput>,
}

impl PromptConfirmation {
    pub fn new(input: Arc<LineInput>) -> Self {
        Self { input }
    }
}

#[async_trait]
impl Confirmation for PromptConfirmation {
    async fn confirm(&self, message: &str) -> Result<()> {
        println!("\n{message}! Press enter to continue.");
        match self.input.next_line().await? {
            Some(line) => {
                debug!("Acknowledged {message:?} with {line:?}");
                Ok(())
            }
            None => bail!("Input closed before {message:?} was acknowledged"),
        }
    }
}

/// Acknowledges immediately. Used when nobody is around to answer, and in tests.
pub struct NoConfirmation;

#[async_trait]
impl Confirmation for NoConfirmation {
    async fn confirm(&self, message: &str) -> Result<()> {
        debug!("Skipping acknowledgment of {message:?}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use anyhow::Result;

    use crate::session::input::LineInput;

    use super::{Confirmation, PromptConfirmation};

    #[tokio::test]
    async fn test_prompt_consumes_one_line() -> Result<()> {
        let input = Arc::new(LineInput::new(&b"\nstart\n"[..]));
        let confirmation = PromptConfirmation::new(input.clone());

        confirmation.confirm("Time for a break").await?;

        assert_eq!(input.next_line().await?.as_deref(), Some("start"));
        Ok(())
    }

    #[tokio::test]
    async fn test_prompt_fails_on_closed_input() {
        let confirmation = PromptConfirmation::new(Arc::new(LineInput::new(&b""[..])));
        assert!(confirmation.confirm("Break is over").await.is_err());
    }
}
