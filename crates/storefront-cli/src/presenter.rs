//! Terminal presenter for confirmation dialogs.
//!
//! Drains the [`QueuedDialogHost`](storefront_dialogs::QueuedDialogHost) queue,
//! prints each dialog on stderr and reads the answer from stdin.

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use storefront_types::models::{ConfirmationOptions, Severity};
use storefront_types::traits::DialogRequest;

/// What a typed line means.
#[derive(Debug, PartialEq, Eq)]
enum Answer {
    Confirm,
    Cancel,
}

fn parse_answer(line: &str) -> Answer {
    match line.trim().to_lowercase().as_str() {
        "y" | "yes" | "s" | "si" | "sí" => Answer::Confirm,
        _ => Answer::Cancel,
    }
}

fn render(options: &ConfirmationOptions) -> String {
    let icon = match (options.show_icon, options.severity) {
        (false, _) => "",
        (true, Severity::Info) => "[i] ",
        (true, Severity::Warning) => "[!] ",
        (true, Severity::Danger) => "[x] ",
        (true, Severity::Success) => "[ok] ",
    };
    format!(
        "{icon}{}\n{}\n[y] {}  [N] {} > ",
        options.title, options.description, options.confirm_label, options.cancel_label
    )
}

/// Answer dialogs from the terminal until the queue closes.
///
/// End of input dismisses the current dialog and every later one.
pub fn spawn_terminal_presenter(mut dialogs: mpsc::UnboundedReceiver<DialogRequest>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(request) = dialogs.recv().await {
            if !request.responder.is_awaited() {
                tracing::debug!(dialog_id = %request.id, "dialog abandoned before it was shown");
                continue;
            }
            eprint!("{}", render(&request.options));
            match lines.next_line().await {
                Ok(Some(line)) => match parse_answer(&line) {
                    Answer::Confirm => request.responder.confirm(),
                    Answer::Cancel => request.responder.cancel(),
                },
                Ok(None) => {
                    eprintln!();
                    request.responder.dismiss();
                }
                Err(e) => {
                    tracing::warn!(dialog_id = %request.id, error = %e, "failed to read answer");
                    request.responder.dismiss();
                }
            }
        }
    })
}
