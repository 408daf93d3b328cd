pub mod export;
pub mod storage;
pub mod tasks;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io error on {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid json in {path}: {source}")]
    Json {
        path: std::path::PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("csv export failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("encoding point log failed: {0}")]
    Encode(#[source] serde_json::Error),
    #[error(transparent)]
    Reconstruct(#[from] analysis::ReconstructError),
    #[error("reconstruction task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
    #[error("{failed} of {total} sessions failed")]
    SessionsFailed { failed: usize, total: usize },
}

impl Error {
    pub(crate) fn io(path: impl Into<std::path::PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }
}

/// Session files hold either a single session or a list of sessions.
#[derive(Debug, serde::Deserialize)]
#[serde(untagged)]
enum SessionFile {
    Many(Vec<common::SessionEvents>),
    One(common::SessionEvents),
}

/// Loads every session from `path`, a session file or a folder of `.json` session files.
pub async fn load_sessions(path: &std::path::Path) -> Result<Vec<common::SessionEvents>, Error> {
    let metadata = tokio::fs::metadata(path).await.map_err(Error::io(path))?;

    let files = if metadata.is_dir() {
        let mut entries = tokio::fs::read_dir(path).await.map_err(Error::io(path))?;
        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(Error::io(path))? {
            let file = entry.path();
            if file.extension().map(|e| e == "json").unwrap_or(false) {
                files.push(file);
            }
        }
        files.sort();
        files
    } else {
        vec![path.to_path_buf()]
    };

    let mut sessions = Vec::new();
    for file in files {
        let content = tokio::fs::read(&file).await.map_err(Error::io(&file))?;
        let parsed: SessionFile = serde_json::from_slice(&content).map_err(|source| Error::Json {
            path: file.clone(),
            source,
        })?;

        match parsed {
            SessionFile::Many(many) => sessions.extend(many),
            SessionFile::One(one) => sessions.push(one),
        }
        tracing::debug!(?file, total = sessions.len(), "Loaded session file");
    }

    Ok(sessions)
}

/// Reads a (partial) engine configuration; missing fields keep their defaults.
pub async fn load_config(path: Option<&std::path::Path>) -> Result<analysis::Config, Error> {
    let path = match path {
        Some(p) => p,
        None => return Ok(analysis::Config::default()),
    };

    let content = tokio::fs::read(path).await.map_err(Error::io(path))?;
    serde_json::from_slice(&content).map_err(|source| Error::Json {
        path: path.to_path_buf(),
        source,
    })
}
