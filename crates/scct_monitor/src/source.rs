use std::time::{Duration, Instant};

use async_trait::async_trait;
use prediction_engine::RawFields;

use crate::config::MonitorConfig;
use crate::error::ScctError;
use crate::profile::ProfileLocator;
use crate::reader::CastingDataReader;

/// Raw match fields plus where they came from.
#[derive(Debug, Clone)]
pub struct SourceSnapshot {
    /// Profile id (file source) or url (websocket source)
    pub origin: String,
    pub port: Option<u16>,
    pub elapsed: Duration,
    pub fields: RawFields,
}

/// One way of finding the live SCCT match. Implementations keep no state between calls.
#[async_trait]
pub trait MatchSource: Send + Sync {
    fn name(&self) -> &'static str;

    async fn fetch_raw(&self) -> Result<SourceSnapshot, ScctError>;
}

/// Canonical source: locate the active profile, then read its exported files.
#[derive(Debug, Clone)]
pub struct FileProbeSource {
    locator: ProfileLocator,
    reader: CastingDataReader,
}

impl FileProbeSource {
    pub fn new(locator: ProfileLocator, reader: CastingDataReader) -> Self {
        Self { locator, reader }
    }

    pub fn from_config(cfg: &MonitorConfig) -> Self {
        Self::new(ProfileLocator::from_config(cfg), CastingDataReader::new(&cfg.profiles_dir))
    }

    pub fn locator(&self) -> &ProfileLocator {
        &self.locator
    }
}

#[async_trait]
impl MatchSource for FileProbeSource {
    fn name(&self) -> &'static str {
        "file_probe"
    }

    async fn fetch_raw(&self) -> Result<SourceSnapshot, ScctError> {
        let started = Instant::now();
        let profile = self.locator.locate().await?;
        let fields = self.reader.read_all(&profile).await?;

        Ok(SourceSnapshot {
            origin: profile.id().to_string(),
            port: Some(profile.port()),
            elapsed: started.elapsed(),
            fields,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn reads_fields_of_active_profile() {
        let dir = tempfile::tempdir().unwrap();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let profile_dir = dir.path().join(format!("{port:x}"));
        fs::create_dir(&profile_dir).unwrap();
        for (name, value) in [
            ("team1", "Serral"),
            ("team2", "Clem"),
            ("bestof", "BO3"),
            ("score1", "0"),
            ("score2", "1"),
            ("league", ""),
        ] {
            fs::write(profile_dir.join(format!("{name}.txt")), value).unwrap();
        }

        let cfg = MonitorConfig { profiles_dir: dir.path().to_path_buf(), ..MonitorConfig::default() };
        let snapshot = FileProbeSource::from_config(&cfg).fetch_raw().await.unwrap();

        assert_eq!(snapshot.origin, format!("{port:x}"));
        assert_eq!(snapshot.port, Some(port));
        assert_eq!(snapshot.fields.bestof, "BO3");
        assert_eq!(snapshot.fields.league, "");
    }

    #[tokio::test]
    async fn active_profile_without_files_is_field_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        fs::create_dir(dir.path().join(format!("{port:x}"))).unwrap();

        let cfg = MonitorConfig { profiles_dir: dir.path().to_path_buf(), ..MonitorConfig::default() };
        let err = FileProbeSource::from_config(&cfg).fetch_raw().await.unwrap_err();
        assert_eq!(err.kind(), "FIELD_UNAVAILABLE");
    }
}
