//! Runs one reconstruction per session on the blocking pool and stores the results.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub stored: Vec<String>,
    pub failed: Vec<(String, String)>,
}

impl RunSummary {
    /// Fails when any session could not be reconstructed and stored.
    pub fn check(&self) -> Result<(), crate::Error> {
        if self.failed.is_empty() {
            return Ok(());
        }

        Err(crate::Error::SessionsFailed {
            failed: self.failed.len(),
            total: self.failed.len() + self.stored.len(),
        })
    }
}

#[tracing::instrument(skip(config, events), fields(session = %events.session_id))]
pub async fn reconstruct_session(
    config: std::sync::Arc<analysis::Config>,
    events: common::SessionEvents,
) -> Result<common::PointLog, crate::Error> {
    let log = tokio::task::spawn_blocking(move || analysis::reconstruct(&config, &events)).await??;
    Ok(log)
}

/// Sessions are independent: each is reconstructed on its own worker, without shared state. A
/// failing session is reported and does not stop the others.
pub async fn run_all(
    config: analysis::Config,
    sessions: Vec<common::SessionEvents>,
    storage: Box<dyn crate::storage::PointLogStorage>,
) -> RunSummary {
    let config = std::sync::Arc::new(config);

    let (session_ids, handles): (Vec<_>, Vec<_>) = sessions
        .into_iter()
        .map(|events| {
            let session_id = events.session_id.clone();
            let config = config.clone();
            let storage = storage.duplicate();

            let handle = tokio::task::spawn(async move {
                let session_id = events.session_id.clone();
                match reconstruct_session(config, events).await {
                    Ok(log) => storage.store(log).await,
                    Err(e) => {
                        storage.remove(session_id).await?;
                        Err(e)
                    }
                }
            });
            (session_id, handle)
        })
        .unzip();

    let mut summary = RunSummary::default();
    let results = futures::future::join_all(handles).await;
    for (session_id, result) in session_ids.into_iter().zip(results) {
        match result.map_err(crate::Error::from).and_then(|r| r) {
            Ok(()) => {
                tracing::info!(session = %session_id, "Stored point log");
                summary.stored.push(session_id);
            }
            Err(e) => {
                tracing::error!(session = %session_id, "Reconstruction failed: {}", e);
                summary.failed.push((session_id, e.to_string()));
            }
        }
    }

    summary
}
