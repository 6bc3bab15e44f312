//! Newline-delimited JSON bridge between a frontend and the search service.
//!
//! Each input line is a [`CommandEnvelope`]; each produces exactly one
//! [`ResponseEnvelope`] line. Stdout is reserved for the protocol; all
//! diagnostics go to stderr.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, BufWriter};

use profile_search::{
    DirectoryIdentitySearch, KeyedCache, ProfileEnrichment, TermMap, UserDirectory,
};

use crate::error::{ProfileError, Result};
use crate::host::contract::{CommandEnvelope, CommandName, ResponseEnvelope};
use crate::host::handler::handle_command;
use crate::service::ProfileSearchService;

/// Serve commands from stdin until EOF or `host.stop`.
pub async fn run_stdio_bridge<I, D, P, C>(service: &ProfileSearchService<I, D, P, C>) -> Result<()>
where
    I: DirectoryIdentitySearch,
    D: UserDirectory,
    P: ProfileEnrichment,
    C: KeyedCache<TermMap>,
{
    let reader = BufReader::new(tokio::io::stdin());
    let writer = BufWriter::new(tokio::io::stdout());
    run_bridge(service, reader, writer).await
}

/// Serve commands from `reader`, writing responses to `writer`.
///
/// Lines that are not valid envelopes get a `parse-error` response; the
/// bridge keeps going. Returns when `reader` reaches EOF or after answering
/// `host.stop`.
pub async fn run_bridge<I, D, P, C, R, W>(
    service: &ProfileSearchService<I, D, P, C>,
    mut reader: R,
    mut writer: W,
) -> Result<()>
where
    I: DirectoryIdentitySearch,
    D: UserDirectory,
    P: ProfileEnrichment,
    C: KeyedCache<TermMap>,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut line = String::new();

    loop {
        line.clear();
        let bytes_read = reader
            .read_line(&mut line)
            .await
            .map_err(|e| ProfileError::Protocol(format!("failed to read command: {e}")))?;

        if bytes_read == 0 {
            tracing::info!("input closed (EOF); shutting down bridge");
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let envelope: CommandEnvelope = match serde_json::from_str(trimmed) {
            Ok(env) => env,
            Err(e) => {
                tracing::warn!(error = %e, "failed to parse command envelope");
                let response = ResponseEnvelope::error(
                    "parse-error",
                    format!("failed to parse command envelope: {e}"),
                );
                write_line(&mut writer, &serde_json::to_string(&response)?).await?;
                continue;
            }
        };

        let is_stop = envelope.command == CommandName::HostStop;
        let response = handle_command(service, envelope).await;
        write_line(&mut writer, &serde_json::to_string(&response)?).await?;

        if is_stop {
            tracing::info!("host.stop received; shutting down bridge");
            break;
        }
    }

    Ok(())
}

/// Write a single JSON line and flush.
async fn write_line<W: AsyncWrite + Unpin>(writer: &mut W, json: &str) -> Result<()> {
    writer
        .write_all(json.as_bytes())
        .await
        .map_err(|e| ProfileError::Protocol(format!("failed to write response: {e}")))?;
    writer
        .write_all(b"\n")
        .await
        .map_err(|e| ProfileError::Protocol(format!("failed to write newline: {e}")))?;
    writer
        .flush()
        .await
        .map_err(|e| ProfileError::Protocol(format!("failed to flush output: {e}")))?;
    Ok(())
}
