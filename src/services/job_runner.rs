//! Background loader
//!
//! Reads the data file on a worker thread so the table can show its loading
//! placeholder meanwhile. The App polls on every tick.

use crate::services::loader::{load_file, LoadedData};
use log::{debug, warn};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Instant;

/// Outcome of a finished load
#[derive(Debug)]
pub enum LoadMessage {
    Loaded(LoadedData),
    Failed(String),
}

struct LoadJob {
    receiver: Receiver<LoadMessage>,
    start_instant: Instant,
}

#[derive(Default)]
pub struct LoadRunner {
    job: Option<LoadJob>,
}

impl LoadRunner {
    pub fn new() -> Self {
        Self { job: None }
    }

    pub fn is_running(&self) -> bool {
        self.job.is_some()
    }

    /// Start loading `path`. A load already in flight is abandoned.
    pub fn spawn(&mut self, path: PathBuf) {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let message = match load_file(&path) {
                Ok(data) => LoadMessage::Loaded(data),
                Err(e) => LoadMessage::Failed(format!("{}: {}", path.display(), e)),
            };
            let _ = tx.send(message);
        });

        self.job = Some(LoadJob {
            receiver: rx,
            start_instant: Instant::now(),
        });
    }

    /// Take the result if the worker has finished
    pub fn poll(&mut self) -> Option<LoadMessage> {
        let job = self.job.as_ref()?;

        let message = match job.receiver.try_recv() {
            Ok(message) => message,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => {
                warn!("Loader thread exited without a result");
                LoadMessage::Failed("Loader stopped unexpectedly".to_string())
            }
        };

        debug!("Load finished in {:?}", job.start_instant.elapsed());
        self.job = None;
        Some(message)
    }
}
