//! Command dispatch from host envelopes to the search service.

use serde::de::DeserializeOwned;
use serde_json::json;

use profile_search::{
    DirectoryIdentitySearch, KeyedCache, ProfileEnrichment, SearchKind, TermMap, UserDirectory,
};

use crate::error::{ProfileError, Result};
use crate::host::contract::{
    CommandEnvelope, CommandName, ResponseEnvelope, SearchPayload, UserPayload,
};
use crate::service::ProfileSearchService;

/// Execute one command and wrap the outcome in a response envelope.
///
/// Failures never escape: they become `ok: false` responses carrying the
/// error message.
pub async fn handle_command<I, D, P, C>(
    service: &ProfileSearchService<I, D, P, C>,
    envelope: CommandEnvelope,
) -> ResponseEnvelope
where
    I: DirectoryIdentitySearch,
    D: UserDirectory,
    P: ProfileEnrichment,
    C: KeyedCache<TermMap>,
{
    let request_id = envelope.request_id.clone();
    match dispatch(service, envelope).await {
        Ok(payload) => ResponseEnvelope::ok(request_id, payload),
        Err(err) => {
            tracing::warn!(%request_id, error = %err, "host command failed");
            ResponseEnvelope::error(request_id, err.to_string())
        }
    }
}

async fn dispatch<I, D, P, C>(
    service: &ProfileSearchService<I, D, P, C>,
    envelope: CommandEnvelope,
) -> Result<serde_json::Value>
where
    I: DirectoryIdentitySearch,
    D: UserDirectory,
    P: ProfileEnrichment,
    C: KeyedCache<TermMap>,
{
    envelope.validate()?;
    match envelope.command {
        CommandName::HostPing => Ok(json!({ "pong": true })),
        CommandName::HostStop => Ok(json!({ "stopping": true })),
        CommandName::SearchByName => {
            let p: SearchPayload = payload(envelope.payload)?;
            let results = service
                .search(&p.user_id, &p.term, SearchKind::Name, false)
                .await?;
            Ok(serde_json::to_value(results)?)
        }
        CommandName::SearchByInterest => {
            let p: SearchPayload = payload(envelope.payload)?;
            let results = service
                .search(&p.user_id, &p.term, SearchKind::Interest, p.include_extended_bio)
                .await?;
            Ok(serde_json::to_value(results)?)
        }
        CommandName::SearchRerunLast => {
            let p: UserPayload = payload(envelope.payload)?;
            let results = service
                .rerun_last(&p.user_id, p.include_extended_bio)
                .await?;
            Ok(serde_json::to_value(results)?)
        }
        CommandName::HistoryList => {
            let p: UserPayload = payload(envelope.payload)?;
            Ok(serde_json::to_value(service.history(&p.user_id).await)?)
        }
        CommandName::HistoryLast => {
            let p: UserPayload = payload(envelope.payload)?;
            Ok(serde_json::to_value(service.last_term(&p.user_id).await)?)
        }
        CommandName::HistoryClear => {
            let p: UserPayload = payload(envelope.payload)?;
            service.clear_history(&p.user_id).await;
            Ok(json!({ "cleared": true }))
        }
        CommandName::SourcesHealth => {
            let sources: Vec<serde_json::Value> = service
                .source_health()
                .into_iter()
                .map(|(source, state, failures)| {
                    json!({
                        "source": source,
                        "state": state,
                        "consecutive_failures": failures,
                    })
                })
                .collect();
            Ok(json!({ "sources": sources }))
        }
    }
}

fn payload<T: DeserializeOwned>(value: serde_json::Value) -> Result<T> {
    serde_json::from_value(value)
        .map_err(|e| ProfileError::Protocol(format!("invalid payload: {e}")))
}
