use std::path::PathBuf;
use tokio::sync::mpsc;

// Re-export types from the library crate
pub use photolog::{GenerationReport, PhotoRecord, PhotologRequest};

/// Commands sent from the front end to the worker
#[derive(Debug)]
pub enum PhotologCommand {
    LoadFolder {
        folder: PathBuf,
    },
    Generate {
        photos: Vec<PhotoRecord>,
        request: PhotologRequest,
    },
}

/// Updates sent from the worker to the front end
#[derive(Debug, Clone)]
pub enum PhotologUpdate {
    Progress {
        percent: f32,
    },
    PhotosLoaded {
        photos: Vec<PhotoRecord>,
    },
    Complete {
        report: GenerationReport,
    },
    Error {
        message: String,
    },
}

/// Async worker task that processes photolog commands and sends updates
pub async fn worker_task(
    mut command_rx: mpsc::UnboundedReceiver<PhotologCommand>,
    update_tx: mpsc::UnboundedSender<PhotologUpdate>,
) {
    while let Some(cmd) = command_rx.recv().await {
        process_command(cmd, &update_tx).await;
    }
    log::debug!("Command channel closed, worker exiting");
}

async fn process_command(cmd: PhotologCommand, update_tx: &mpsc::UnboundedSender<PhotologUpdate>) {
    match cmd {
        PhotologCommand::LoadFolder { folder } => {
            handle_load_folder(folder, update_tx).await;
        }
        PhotologCommand::Generate { photos, request } => {
            handle_generate(photos, request, update_tx).await;
        }
    }
}

async fn handle_load_folder(folder: PathBuf, update_tx: &mpsc::UnboundedSender<PhotologUpdate>) {
    match photolog::load_photos(&folder).await {
        Ok(photos) => {
            let _ = update_tx.send(PhotologUpdate::PhotosLoaded { photos });
        }
        Err(e) => {
            let _ = update_tx.send(PhotologUpdate::Error {
                message: format!("Failed to load photos: {e}"),
            });
        }
    }
}

async fn handle_generate(
    photos: Vec<PhotoRecord>,
    request: PhotologRequest,
    update_tx: &mpsc::UnboundedSender<PhotologUpdate>,
) {
    let progress_tx = update_tx.clone();
    let progress = move |percent: f32| {
        let _ = progress_tx.send(PhotologUpdate::Progress { percent });
    };

    match photolog::create_photolog(&photos, &request, progress).await {
        Ok(report) => {
            let _ = update_tx.send(PhotologUpdate::Complete { report });
        }
        Err(e) => {
            let _ = update_tx.send(PhotologUpdate::Error {
                message: format!("Failed to generate photolog: {e}"),
            });
        }
    }
}

/// Both ends of a running worker
pub struct WorkerHandle {
    pub commands: mpsc::UnboundedSender<PhotologCommand>,
    pub updates: mpsc::UnboundedReceiver<PhotologUpdate>,
    pub task: tokio::task::JoinHandle<()>,
}

impl WorkerHandle {
    /// Queue a command. Returns false once the worker has stopped.
    pub fn send(&self, cmd: PhotologCommand) -> bool {
        self.commands.send(cmd).is_ok()
    }

    /// Wait for the next update
    pub async fn next_update(&mut self) -> Option<PhotologUpdate> {
        self.updates.recv().await
    }
}

/// Spawn a worker on the current tokio runtime.
///
/// The worker exits once every command sender has been dropped.
pub fn spawn_worker() -> WorkerHandle {
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (update_tx, update_rx) = mpsc::unbounded_channel();
    let task = tokio::spawn(worker_task(command_rx, update_tx));
    WorkerHandle {
        commands: command_tx,
        updates: update_rx,
        task,
    }
}
