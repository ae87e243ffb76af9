//! SCCT profile discovery
//!
//! Každá běžící instance SCCT má adresář pojmenovaný hex ID, které je zároveň
//! TCP port instance. Aktivní profil = ten, na jehož port se dá připojit.
//!
//!   profiles/
//!     f61a/   → port 0xf61a = 63002
//!     f61b/   → port 63003
use std::net::{Ipv4Addr, SocketAddr};
use std::num::ParseIntError;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::config::MonitorConfig;
use crate::error::ScctError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Profile {
    id: String,
    port: u16,
}

impl Profile {
    /// The port is always derived from the id, never set independently.
    pub fn parse(id: &str) -> Result<Self, ParseIntError> {
        let port = u16::from_str_radix(id, 16)?;
        Ok(Self { id: id.to_string(), port })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::LOCALHOST, self.port))
    }
}

/// One row of a full diagnostic scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeReport {
    pub id: String,
    pub port: Option<u16>,
    pub active: bool,
}

#[derive(Debug, Clone)]
pub struct ProfileLocator {
    profiles_dir: PathBuf,
    probe_timeout: Duration,
    deadline: Duration,
}

impl ProfileLocator {
    pub fn new(profiles_dir: impl Into<PathBuf>, probe_timeout: Duration, deadline: Duration) -> Self {
        Self { profiles_dir: profiles_dir.into(), probe_timeout, deadline }
    }

    pub fn from_config(cfg: &MonitorConfig) -> Self {
        Self::new(&cfg.profiles_dir, cfg.probe_timeout, cfg.discovery_deadline)
    }

    pub fn profiles_dir(&self) -> &Path {
        &self.profiles_dir
    }

    /// First candidate that accepts a TCP connection. With several live
    /// instances the winner depends on directory listing order.
    pub async fn locate(&self) -> Result<Profile, ScctError> {
        let started = Instant::now();
        let result = match timeout(self.deadline, self.first_active()).await {
            Ok(res) => res,
            Err(_) => Err(ScctError::Timeout { target: self.target(), after: self.deadline }),
        };

        if let Ok(profile) = &result {
            info!(
                profile = profile.id(),
                port = profile.port(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Active SCCT profile found"
            );
        }
        result
    }

    /// Probe every candidate, no early exit. For the `probe` command.
    pub async fn scan(&self) -> Result<Vec<ProbeReport>, ScctError> {
        let mut reports = Vec::new();
        for id in self.candidate_ids().await? {
            let report = match Profile::parse(&id) {
                Ok(profile) => ProbeReport {
                    active: probe(profile.addr(), self.probe_timeout).await,
                    port: Some(profile.port()),
                    id,
                },
                Err(_) => ProbeReport { id, port: None, active: false },
            };
            reports.push(report);
        }
        Ok(reports)
    }

    async fn first_active(&self) -> Result<Profile, ScctError> {
        let candidates = self.candidate_ids().await?;
        let scanned = candidates.len();

        for id in candidates {
            let profile = match Profile::parse(&id) {
                Ok(p) => p,
                Err(e) => {
                    warn!("Skipping SCCT profile {:?}: not a hex port ({})", id, e);
                    continue;
                }
            };

            if probe(profile.addr(), self.probe_timeout).await {
                return Ok(profile);
            }
            debug!(profile = profile.id(), port = profile.port(), "SCCT profile inactive");
        }

        Err(ScctError::NotFound { target: self.target(), scanned })
    }

    async fn candidate_ids(&self) -> Result<Vec<String>, ScctError> {
        let discovery_err = |e: std::io::Error| ScctError::Discovery { target: self.target(), source: Box::new(e) };

        let mut entries = tokio::fs::read_dir(&self.profiles_dir).await.map_err(discovery_err)?;
        let mut ids = Vec::new();

        while let Some(entry) = entries.next_entry().await.map_err(discovery_err)? {
            match entry.file_type().await {
                Ok(ft) if ft.is_dir() => {}
                _ => continue,
            }
            match entry.file_name().into_string() {
                Ok(name) => ids.push(name),
                Err(raw) => warn!("Skipping SCCT profile with non UTF-8 name {:?}", raw),
            }
        }
        Ok(ids)
    }

    fn target(&self) -> String {
        self.profiles_dir.display().to_string()
    }
}

/// Plain TCP connect, no payload. Refused or timed out = inactive.
pub async fn probe(addr: SocketAddr, probe_timeout: Duration) -> bool {
    matches!(timeout(probe_timeout, TcpStream::connect(addr)).await, Ok(Ok(_)))
}
