//! # Commands
//!
//! ```text
//! commands/
//! ├── mod.rs            ◄─── You are here (terminal prompt helper)
//! ├── cart.rs           ◄─── show / add / update / remove / clear
//! ├── checkout.rs       ◄─── place an order, hand off to the gateway
//! ├── orders.rs         ◄─── list / show / cancel / pay
//! ├── wallet.rs         ◄─── reseller balance and withdrawals
//! ├── notifications.rs  ◄─── feed / mark read
//! └── config.rs         ◄─── show / init client.toml
//! ```
//!
//! Every command takes the shared [`AppContext`](crate::context::AppContext),
//! checks its route against the role tree, and calls exactly one store
//! operation per backend action.

pub mod cart;
pub mod checkout;
pub mod config;
pub mod notifications;
pub mod orders;
pub mod wallet;

use std::io::Write;

use crate::error::{CommandError, CommandResult};

/// Asks a question on stderr and reads one trimmed line from stdin.
pub async fn prompt(question: &str) -> CommandResult<String> {
    let question = question.to_string();
    let answer = tokio::task::spawn_blocking(move || -> std::io::Result<String> {
        let mut stderr = std::io::stderr();
        write!(stderr, "{question}")?;
        stderr.flush()?;

        let mut line = String::new();
        std::io::stdin().read_line(&mut line)?;
        Ok(line.trim().to_string())
    })
    .await
    .map_err(|e| CommandError::internal(format!("Prompt task failed: {e}")))??;
    Ok(answer)
}

pub(crate) fn is_yes(answer: &str) -> bool {
    matches!(answer.to_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_yes() {
        assert!(is_yes("Y"));
        assert!(is_yes("yes"));
        assert!(!is_yes(""));
        assert!(!is_yes("no"));
    }
}
