//! Terminal implementations of the UI ports.

use std::io;

use async_trait::async_trait;
use smartlearn_screens::{Confirm, Dialogs, LinkOpener, Notice};
use tokio::io::{AsyncBufReadExt, BufReader};

/// Alerts on stdout/stderr and questions on stdin.
#[derive(Debug, Clone, Copy)]
pub struct TerminalDialogs {
    assume_yes: bool,
}

impl TerminalDialogs {
    /// With `assume_yes`, every question is answered yes without prompting.
    pub const fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

#[async_trait]
impl Dialogs for TerminalDialogs {
    async fn alert(&self, notice: Notice) {
        if notice.title() == "Error" {
            eprintln!("{}: {}", notice.title(), notice.message());
        } else {
            println!("{}: {}", notice.title(), notice.message());
        }
    }

    async fn confirm(&self, confirm: Confirm) -> bool {
        if self.assume_yes {
            return true;
        }

        let action = if confirm.destructive { "yes/NO" } else { "y/N" };
        println!("{}: {} [{action}]", confirm.title, confirm.message);

        let mut line = String::new();
        let mut stdin = BufReader::new(tokio::io::stdin());
        match stdin.read_line(&mut line).await {
            Ok(_) => {
                let answer = line.trim().to_lowercase();
                if confirm.destructive {
                    answer == "yes"
                } else {
                    matches!(answer.as_str(), "y" | "yes")
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read answer; treating as no");
                false
            }
        }
    }
}

/// Prints links instead of launching a browser.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalLinks;

#[async_trait]
impl LinkOpener for TerminalLinks {
    async fn open_url(&self, url: &str) -> io::Result<()> {
        println!("Open: {url}");
        Ok(())
    }
}

/// Waits until the user presses Enter or Ctrl+C.
pub async fn wait_for_enter() {
    let mut line = String::new();
    let mut stdin = BufReader::new(tokio::io::stdin());
    tokio::select! {
        result = stdin.read_line(&mut line) => {
            if let Err(e) = result {
                tracing::warn!(error = %e, "Failed to read from stdin");
            }
        }
        Ok(()) = tokio::signal::ctrl_c() => {
            tracing::info!("Received Ctrl+C");
        }
    }
}
