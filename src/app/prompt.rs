use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWriteExt, BufReader};

/// Terminal questions. `assume_yes` answers every confirmation with yes.
pub struct Prompter<R> {
    input: R,
    assume_yes: bool,
}

impl Prompter<BufReader<tokio::io::Stdin>> {
    pub fn stdin(assume_yes: bool) -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), assume_yes)
    }
}

impl<R: AsyncBufRead + Unpin> Prompter<R> {
    pub fn new(input: R, assume_yes: bool) -> Self {
        Self { input, assume_yes }
    }

    pub async fn ask(&mut self, question: &str) -> Result<String> {
        let mut stdout = tokio::io::stdout();
        stdout.write_all(question.as_bytes()).await?;
        stdout.flush().await?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .await
            .context("Failed to read from terminal")?;
        if read == 0 {
            anyhow::bail!("Input closed before an answer was given");
        }

        Ok(line.trim().to_string())
    }

    pub async fn confirm(&mut self, question: &str) -> Result<bool> {
        if self.assume_yes {
            println!("{} (y/n): y", question);
            return Ok(true);
        }

        let answer = self.ask(&format!("{} (y/n): ", question)).await?;
        Ok(is_yes(&answer))
    }
}

pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_yes() {
        assert!(is_yes("y"));
        assert!(is_yes("YES"));
        assert!(is_yes(" Yes \n"));
        assert!(!is_yes("n"));
        assert!(!is_yes(""));
        assert!(!is_yes("yep"));
    }

    #[tokio::test]
    async fn test_confirm_reads_answers() {
        let mut prompter = Prompter::new(&b"yes\nno\n"[..], false);
        assert!(prompter.confirm("Continue?").await.unwrap());
        assert!(!prompter.confirm("Continue?").await.unwrap());
        assert!(prompter.confirm("Continue?").await.is_err());
    }

    #[tokio::test]
    async fn test_assume_yes_skips_input() {
        let mut prompter = Prompter::new(&b""[..], true);
        assert!(prompter.confirm("Download?").await.unwrap());
    }

    #[tokio::test]
    async fn test_ask_trims() {
        let mut prompter = Prompter::new(&b"  alice.bsky.social  \n"[..], false);
        assert_eq!(prompter.ask("Handle: ").await.unwrap(), "alice.bsky.social");
    }
}
