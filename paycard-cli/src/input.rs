//! Line-based keyboard commands read from stdin.

use paycard_core::copy_feedback::CopyField;
use paycard_core::events::{SessionCommand, SessionCommandSender};
use std::io::BufRead;
use std::sync::Arc;
use tokio::sync::watch;

/// One line of user input.
#[derive(Debug)]
pub enum Input {
    Command(SessionCommand),
    Help,
    Quit,
    Unknown(String),
}

pub fn parse_input(line: &str) -> Input {
    match line.trim().to_ascii_lowercase().as_str() {
        "a" | "address" => Input::Command(SessionCommand::Copy(CopyField::Address)),
        "m" | "amount" => Input::Command(SessionCommand::Copy(CopyField::Amount)),
        "b" | "bridge" => Input::Command(SessionCommand::ToggleBridge),
        "w" | "wallet" => Input::Command(SessionCommand::WalletLink),
        "q" | "quit" | "exit" => Input::Quit,
        "h" | "help" | "?" | "" => Input::Help,
        other => Input::Unknown(other.to_string()),
    }
}

/// Spawn a thread forwarding stdin commands to the session.
///
/// `quit` and end of input both request shutdown. Blocking stdin reads cannot
/// be cancelled, so this runs outside the runtime.
pub fn spawn_input_reader(
    command_tx: SessionCommandSender,
    shutdown_tx: Arc<watch::Sender<bool>>,
) -> std::io::Result<std::thread::JoinHandle<()>> {
    std::thread::Builder::new()
        .name("paycard-input".to_string())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to read stdin");
                        break;
                    }
                };

                match parse_input(&line) {
                    Input::Command(command) => {
                        if command_tx.blocking_send(command).is_err() {
                            tracing::debug!("Session is gone, input reader stopping");
                            return;
                        }
                    }
                    Input::Help => println!("{}", crate::render::HELP),
                    Input::Quit => break,
                    Input::Unknown(other) => {
                        println!("unknown command {other:?}\n{}", crate::render::HELP)
                    }
                }
            }
            let _ = shutdown_tx.send(true);
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert!(matches!(
            parse_input("a"),
            Input::Command(SessionCommand::Copy(CopyField::Address))
        ));
        assert!(matches!(
            parse_input(" Amount \n"),
            Input::Command(SessionCommand::Copy(CopyField::Amount))
        ));
        assert!(matches!(
            parse_input("b"),
            Input::Command(SessionCommand::ToggleBridge)
        ));
        assert!(matches!(
            parse_input("wallet"),
            Input::Command(SessionCommand::WalletLink)
        ));
        assert!(matches!(parse_input("q"), Input::Quit));
        assert!(matches!(parse_input("?"), Input::Help));
    }

    #[test]
    fn test_unknown_input_is_reported() {
        assert!(matches!(parse_input("pay"), Input::Unknown(s) if s == "pay"));
    }
}
