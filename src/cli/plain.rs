//! TUI-less line mode: one turn per input line, one reply line per turn.

use std::error::Error;
use std::io::Write;

use chrono::Local;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::warn;

use crate::core::completion::{CompletionBackend, HttpBackend};
use crate::core::config::Settings;
use crate::core::message::TranscriptRole;
use crate::core::session::ChatSession;
use crate::utils::logging::{log_last_entry, TranscriptLog};

pub async fn run_plain(settings: Settings) -> Result<(), Box<dyn Error>> {
    let log = TranscriptLog::new(settings.log_file.clone())?;
    if let Err(err) = log.start_session(&settings.model, Local::now()) {
        warn!(error = %err, "failed to write transcript log");
    }

    let backend = HttpBackend::from_settings(&settings);
    let mut session = ChatSession::with_context_warn_threshold(settings.context_warn_threshold);
    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();

    converse(stdin, &mut stdout, &mut session, &backend, &log).await
}

/// Feed every non-blank line of `input` through the session until EOF.
pub async fn converse<R, W>(
    mut input: R,
    output: &mut W,
    session: &mut ChatSession,
    backend: &dyn CompletionBackend,
    log: &TranscriptLog,
) -> Result<(), Box<dyn Error>>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut raw = Vec::new();
    loop {
        raw.clear();
        if input.read_until(b'\n', &mut raw).await? == 0 {
            break;
        }

        // Undecodable bytes become U+FFFD instead of ending the session
        let line = String::from_utf8_lossy(&raw);
        let line = line.trim_end_matches('\n').trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }

        let pending = session.begin_turn(line);
        log_last_entry(log, session.transcript());
        let reply = session.complete_pending(pending, backend).await;
        log_last_entry(log, session.transcript());

        writeln!(
            output,
            "{}: {}",
            TranscriptRole::Assistant.display_label(),
            reply.text
        )?;
        output.flush()?;
    }
    Ok(())
}
