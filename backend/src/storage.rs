use futures::FutureExt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Json,
    Csv,
    Both,
}

impl OutputFormat {
    fn json(&self) -> bool {
        matches!(self, Self::Json | Self::Both)
    }

    fn csv(&self) -> bool {
        matches!(self, Self::Csv | Self::Both)
    }
}

/// Destination of reconstructed point logs. Storing a session replaces whatever was stored for
/// it before.
pub trait PointLogStorage: Send + Sync {
    fn duplicate(&self) -> Box<dyn PointLogStorage>;

    fn store<'f, 'own>(
        &'own self,
        log: common::PointLog,
    ) -> futures::future::BoxFuture<'f, Result<(), crate::Error>>
    where
        'own: 'f;

    fn load<'f, 'own>(
        &'own self,
        session_id: String,
    ) -> futures::future::BoxFuture<'f, Result<Option<common::PointLog>, crate::Error>>
    where
        'own: 'f;

    /// Drops everything stored for the session, so a failed run leaves no stale log behind.
    fn remove<'f, 'own>(
        &'own self,
        session_id: String,
    ) -> futures::future::BoxFuture<'f, Result<(), crate::Error>>
    where
        'own: 'f;
}

pub struct FileStorage {
    folder: std::sync::Arc<std::path::PathBuf>,
    format: OutputFormat,
}

impl FileStorage {
    pub fn new<P>(folder: P, format: OutputFormat) -> Self
    where
        P: Into<std::path::PathBuf>,
    {
        Self {
            folder: std::sync::Arc::new(folder.into()),
            format,
        }
    }

    pub fn json_path(&self, session_id: &str) -> std::path::PathBuf {
        self.folder.join(format!("{}.json", session_id))
    }

    pub fn csv_path(&self, session_id: &str) -> std::path::PathBuf {
        self.folder.join(format!("{}.csv", session_id))
    }
}

/// Writes next to the target and renames over it, so readers never see a half written log.
async fn replace_file(path: std::path::PathBuf, content: Vec<u8>) -> Result<(), crate::Error> {
    let tmp_path = path.with_extension("tmp");
    tokio::fs::write(&tmp_path, content)
        .await
        .map_err(crate::Error::io(&tmp_path))?;
    tokio::fs::rename(&tmp_path, &path)
        .await
        .map_err(crate::Error::io(&path))?;
    Ok(())
}

async fn remove_file(path: std::path::PathBuf) -> Result<bool, crate::Error> {
    match tokio::fs::remove_file(&path).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(crate::Error::io(&path)(e)),
    }
}

impl PointLogStorage for FileStorage {
    fn duplicate(&self) -> Box<dyn PointLogStorage> {
        Box::new(Self {
            folder: self.folder.clone(),
            format: self.format,
        })
    }

    fn store<'f, 'own>(
        &'own self,
        log: common::PointLog,
    ) -> futures::future::BoxFuture<'f, Result<(), crate::Error>>
    where
        'own: 'f,
    {
        async move {
            if !tokio::fs::try_exists(self.folder.as_path()).await.unwrap_or(false) {
                tokio::fs::create_dir_all(self.folder.as_path())
                    .await
                    .map_err(crate::Error::io(self.folder.as_path()))?;
            }

            let json_path = self.json_path(&log.session_id);
            if self.format.json() {
                let content = serde_json::to_vec_pretty(&log).map_err(crate::Error::Encode)?;
                replace_file(json_path, content).await?;
            } else {
                remove_file(json_path).await?;
            }

            let csv_path = self.csv_path(&log.session_id);
            if self.format.csv() {
                let content = crate::export::rows_to_csv(&log.rows)?;
                replace_file(csv_path, content).await?;
            } else {
                remove_file(csv_path).await?;
            }

            tracing::debug!(session = %log.session_id, rows = log.rows.len(), "Stored point log");

            Ok(())
        }
        .boxed()
    }

    fn load<'f, 'own>(
        &'own self,
        session_id: String,
    ) -> futures::future::BoxFuture<'f, Result<Option<common::PointLog>, crate::Error>>
    where
        'own: 'f,
    {
        async move {
            let path = self.json_path(&session_id);
            if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
                return Ok(None);
            }

            let content = tokio::fs::read(&path).await.map_err(crate::Error::io(&path))?;
            let log = serde_json::from_slice(&content)
                .map_err(|source| crate::Error::Json { path, source })?;

            Ok(Some(log))
        }
        .boxed()
    }

    fn remove<'f, 'own>(
        &'own self,
        session_id: String,
    ) -> futures::future::BoxFuture<'f, Result<(), crate::Error>>
    where
        'own: 'f,
    {
        async move {
            let json = remove_file(self.json_path(&session_id)).await?;
            let csv = remove_file(self.csv_path(&session_id)).await?;

            if json || csv {
                tracing::debug!(session = %session_id, "Removed stale point log");
            }

            Ok(())
        }
        .boxed()
    }
}
