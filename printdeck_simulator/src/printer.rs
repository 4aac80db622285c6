// printdeck_simulator/src/printer.rs - In-memory printer agent
use std::time::Duration;

use printdeck_shared::{agent_status, FileEntry, PrinterInfo};
use rand::Rng;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    #[error("unknown session '{0}'")]
    UnknownSession(String),
    #[error("unknown file '{0}'")]
    UnknownFile(String),
    #[error("agent is busy, try again later")]
    Busy,
    #[error("no file loaded")]
    NothingLoaded,
}

#[derive(Debug, Clone)]
pub struct SimConfig {
    pub sessions: Vec<String>,
    pub files: Vec<FileEntry>,
    /// How long prints, homing and level tests keep the printer busy.
    pub job_duration: Duration,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            sessions: vec!["s1".to_string(), "s2".to_string()],
            files: seed_files(5),
            job_duration: Duration::from_secs(30),
        }
    }
}

/// Generate `count` gcode entries with made-up names.
pub fn seed_files(count: usize) -> Vec<FileEntry> {
    const ADJECTIVES: [&str; 6] = ["calibration", "benchy", "bracket", "vase", "gear", "hinge"];
    const SUFFIXES: [&str; 4] = ["draft", "final", "v2", "pla"];
    let mut rng = rand::rng();
    (1..=count)
        .map(|i| {
            let name = format!(
                "{}_{}.gcode",
                ADJECTIVES[rng.random_range(0..ADJECTIVES.len())],
                SUFFIXES[rng.random_range(0..SUFFIXES.len())]
            );
            FileEntry { id: i.to_string(), name }
        })
        .collect()
}

/// A running job. The generation lets a completion timer detect that the job
/// was cancelled or replaced meanwhile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobTicket {
    pub generation: u64,
}

#[derive(Debug)]
pub struct SimulatedPrinter {
    config: SimConfig,
    busy: bool,
    status: &'static str,
    loaded: Option<(String, String)>,
    generation: u64,
    /// Every command request received, rejected ones included, as `(path, session)`.
    journal: Vec<(String, String)>,
}

impl SimulatedPrinter {
    pub fn new(config: SimConfig) -> Self {
        Self {
            config,
            busy: false,
            status: agent_status::IDLE,
            loaded: None,
            generation: 0,
            journal: Vec::new(),
        }
    }

    pub fn info(&self) -> PrinterInfo {
        PrinterInfo {
            busy: self.busy,
            status: self.status.to_string(),
        }
    }

    pub fn sessions(&self) -> &[String] {
        &self.config.sessions
    }

    pub fn files(&self) -> &[FileEntry] {
        &self.config.files
    }

    pub fn job_duration(&self) -> Duration {
        self.config.job_duration
    }

    pub fn journal(&self) -> &[(String, String)] {
        &self.journal
    }

    pub fn record(&mut self, path: &str, session: &str) {
        self.journal.push((path.to_string(), session.to_string()));
    }

    fn check_session(&self, session: &str) -> Result<(), SimError> {
        if self.config.sessions.iter().any(|s| s == session) {
            Ok(())
        } else {
            Err(SimError::UnknownSession(session.to_string()))
        }
    }

    fn begin_job(&mut self, status: &'static str) -> JobTicket {
        self.generation += 1;
        self.busy = true;
        self.status = status;
        JobTicket { generation: self.generation }
    }

    pub fn load(&mut self, session: &str, file_id: &str) -> Result<String, SimError> {
        self.check_session(session)?;
        if self.busy {
            return Err(SimError::Busy);
        }
        let file = self
            .config
            .files
            .iter()
            .find(|f| f.id == file_id)
            .ok_or_else(|| SimError::UnknownFile(file_id.to_string()))?;
        let name = file.name.clone();
        self.loaded = Some((session.to_string(), file.id.clone()));
        self.status = agent_status::READY;
        Ok(format!("loaded {}", name))
    }

    pub fn start(&mut self, session: &str) -> Result<(String, JobTicket), SimError> {
        self.check_session(session)?;
        if self.busy {
            return Err(SimError::Busy);
        }
        if self.loaded.is_none() {
            return Err(SimError::NothingLoaded);
        }
        let ticket = self.begin_job(agent_status::PRINTING);
        Ok(("print started".to_string(), ticket))
    }

    pub fn pause(&mut self, session: &str) -> Result<String, SimError> {
        self.check_session(session)?;
        if self.status == agent_status::PRINTING {
            self.status = agent_status::PAUSED;
            Ok("print paused".to_string())
        } else {
            Ok("nothing to pause".to_string())
        }
    }

    /// Cancelling while idle is a no-op.
    pub fn cancel(&mut self, session: &str) -> Result<String, SimError> {
        self.check_session(session)?;
        if !self.busy {
            return Ok("nothing to cancel".to_string());
        }
        self.generation += 1;
        self.busy = false;
        self.status = agent_status::IDLE;
        Ok("cancelled".to_string())
    }

    pub fn auto_home(&mut self, session: &str) -> Result<(String, JobTicket), SimError> {
        self.check_session(session)?;
        if self.busy {
            return Err(SimError::Busy);
        }
        Ok(("homing".to_string(), self.begin_job(agent_status::AUTO_HOME)))
    }

    pub fn level_bed_test(&mut self, session: &str) -> Result<(String, JobTicket), SimError> {
        self.check_session(session)?;
        if self.busy {
            return Err(SimError::Busy);
        }
        Ok(("printing level test".to_string(), self.begin_job(agent_status::LEVEL_BED)))
    }

    pub fn unlock(&mut self, session: &str) -> Result<String, SimError> {
        self.check_session(session)?;
        self.generation += 1;
        self.busy = false;
        self.status = agent_status::IDLE;
        Ok("unlocked".to_string())
    }

    /// Called by the job timer. Ignored if the job was cancelled or replaced.
    pub fn finish(&mut self, ticket: JobTicket) -> bool {
        if ticket.generation != self.generation || !self.busy {
            return false;
        }
        let was_printing = matches!(self.status, agent_status::PRINTING | agent_status::PAUSED);
        self.busy = false;
        if was_printing {
            // A finished print consumes the loaded file.
            self.loaded = None;
        }
        self.status = if self.loaded.is_some() { agent_status::READY } else { agent_status::IDLE };
        true
    }
}
