use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use prefix_audit_core::{run_audit, AuditReport, NamingConvention, ScanOptions};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRequest {
    #[serde(default)]
    pub audit_id: Option<String>,
    pub path: PathBuf,
    #[serde(default = "default_recursive")]
    pub recursive: bool,
    #[serde(default)]
    pub convention: Option<NamingConvention>,
    #[serde(default)]
    pub convention_path: Option<PathBuf>,
    #[serde(default)]
    pub output: Option<PathBuf>,
}

fn default_recursive() -> bool {
    true
}

impl Default for AuditRequest {
    fn default() -> Self {
        Self {
            audit_id: None,
            path: PathBuf::from("."),
            recursive: default_recursive(),
            convention: None,
            convention_path: None,
            output: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuditSessionStatus {
    Running,
    Completed,
    Failed,
}

impl AuditSessionStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, AuditSessionStatus::Running)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditSessionSnapshot {
    pub audit_id: String,
    pub status: AuditSessionStatus,
    pub path: PathBuf,
    pub report_path: Option<PathBuf>,
    pub report: Option<AuditReport>,
    pub error: Option<String>,
}

#[derive(Debug, Clone)]
struct AuditSession {
    status: AuditSessionStatus,
    path: PathBuf,
    report_path: Option<PathBuf>,
    report: Option<AuditReport>,
    error: Option<String>,
}

static SESSIONS: Lazy<Mutex<HashMap<String, AuditSession>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Runs the audit on a worker thread and returns its session id immediately.
pub fn start_audit(request: AuditRequest) -> Result<String> {
    let audit_id = request
        .audit_id
        .clone()
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let convention = resolve_convention(&request)?;

    {
        let mut sessions = lock_sessions()?;
        if sessions
            .get(&audit_id)
            .is_some_and(|session| !session.status.is_terminal())
        {
            return Err(anyhow!("audit session already running: {audit_id}"));
        }
        sessions.insert(
            audit_id.clone(),
            AuditSession {
                status: AuditSessionStatus::Running,
                path: request.path.clone(),
                report_path: request.output.clone(),
                report: None,
                error: None,
            },
        );
    }

    let thread_audit_id = audit_id.clone();
    thread::spawn(move || {
        let options = ScanOptions {
            root: request.path.clone(),
            recursive: request.recursive,
            convention,
            ..ScanOptions::default()
        };

        let outcome = run_audit(&options)
            .map_err(anyhow::Error::from)
            .and_then(|report| {
                if let Some(path) = &request.output {
                    write_report(&report, path)?;
                }
                Ok(report)
            });

        let Ok(mut sessions) = lock_sessions() else {
            return;
        };
        let Some(session) = sessions.get_mut(&thread_audit_id) else {
            return;
        };
        match outcome {
            Ok(report) => {
                info!("audit session {} completed", thread_audit_id);
                session.report = Some(report);
                session.status = AuditSessionStatus::Completed;
                session.error = None;
            }
            Err(err) => {
                warn!("audit session {} failed: {:#}", thread_audit_id, err);
                session.status = AuditSessionStatus::Failed;
                session.error = Some(format!("{err:#}"));
            }
        }
    });

    Ok(audit_id)
}

pub fn get_audit_session(audit_id: &str) -> Result<AuditSessionSnapshot> {
    let sessions = lock_sessions()?;
    let session = sessions
        .get(audit_id)
        .ok_or_else(|| anyhow!("audit session not found: {audit_id}"))?;

    Ok(AuditSessionSnapshot {
        audit_id: audit_id.to_string(),
        status: session.status.clone(),
        path: session.path.clone(),
        report_path: session.report_path.clone(),
        report: session.report.clone(),
        error: session.error.clone(),
    })
}

/// Blocks until the session finishes or `timeout` elapses.
pub fn wait_for_audit(audit_id: &str, timeout: Duration) -> Result<AuditSessionSnapshot> {
    let started = Instant::now();
    loop {
        let snapshot = get_audit_session(audit_id)?;
        if snapshot.status.is_terminal() {
            return Ok(snapshot);
        }
        if started.elapsed() >= timeout {
            return Err(anyhow!(
                "audit session {audit_id} still running after {} ms",
                timeout.as_millis()
            ));
        }
        thread::sleep(Duration::from_millis(25));
    }
}

/// Drops a finished session from the registry.
pub fn forget_audit_session(audit_id: &str) -> Result<bool> {
    let mut sessions = lock_sessions()?;
    match sessions.get(audit_id) {
        Some(session) if session.status.is_terminal() => {
            sessions.remove(audit_id);
            Ok(true)
        }
        Some(_) => Err(anyhow!("audit session still running: {audit_id}")),
        None => Ok(false),
    }
}

pub fn load_report(path: impl AsRef<Path>) -> Result<AuditReport> {
    let path = path.as_ref();
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read report {}", path.display()))?;
    let report: AuditReport = serde_json::from_str(&data)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(report)
}

fn write_report(report: &AuditReport, path: &Path) -> Result<()> {
    let payload =
        serde_json::to_string_pretty(report).context("failed to serialize report payload")?;
    fs::write(path, payload)
        .with_context(|| format!("failed to write report to {}", path.display()))
}

fn resolve_convention(request: &AuditRequest) -> Result<NamingConvention> {
    if let Some(convention) = &request.convention {
        convention.validate()?;
        return Ok(convention.clone());
    }
    match &request.convention_path {
        Some(path) => NamingConvention::load(path)
            .with_context(|| format!("failed to load naming convention {}", path.display())),
        None => Ok(NamingConvention::default()),
    }
}

fn lock_sessions() -> Result<std::sync::MutexGuard<'static, HashMap<String, AuditSession>>> {
    SESSIONS
        .lock()
        .map_err(|_| anyhow!("audit session registry lock poisoned"))
}
