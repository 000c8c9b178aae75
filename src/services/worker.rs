//! Background thread for listings and thumbnail decoding.
//!
//! The worker thread is the only owner of its `ThumbnailCache`; callers talk to
//! it exclusively through channels and receive results in completion order.

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, RecvError, Sender, TryRecvError};
use std::thread::JoinHandle;

use crate::config::Config;
use crate::error::AppError;
use crate::models::file_entry::DirectoryEntry;
use crate::models::thumbnail::Thumbnail;
use crate::services::listing_service::{self, ListOptions};
use crate::services::thumbnail_service::ThumbnailCache;

pub type RequestId = u64;

#[derive(Debug, Clone)]
pub enum Job {
    List(PathBuf),
    Thumbnail { path: PathBuf, size: u32 },
}

#[derive(Debug)]
pub enum JobOutput {
    Listing(Result<Vec<DirectoryEntry>, AppError>),
    Thumbnail(Thumbnail),
}

#[derive(Debug)]
pub struct JobResult {
    pub id: RequestId,
    pub job: Job,
    pub output: JobOutput,
}

pub struct Worker {
    jobs: Option<Sender<(RequestId, Job)>>,
    results: Receiver<JobResult>,
    handle: Option<JoinHandle<()>>,
    next_id: RequestId,
}

impl Worker {
    pub fn spawn(config: &Config) -> Result<Self, AppError> {
        let (job_tx, job_rx) = mpsc::channel::<(RequestId, Job)>();
        let (result_tx, result_rx) = mpsc::channel::<JobResult>();
        let mut cache = ThumbnailCache::from_config(config);
        let options = ListOptions {
            show_hidden: config.show_hidden,
        };

        let handle = std::thread::Builder::new()
            .name("filepane-worker".to_string())
            .spawn(move || {
                for (id, job) in job_rx {
                    let output = match &job {
                        Job::List(path) => {
                            JobOutput::Listing(listing_service::list_directory_with(path, options))
                        }
                        Job::Thumbnail { path, size } => JobOutput::Thumbnail(cache.get(path, *size)),
                    };
                    if result_tx.send(JobResult { id, job, output }).is_err() {
                        break;
                    }
                }
                log::debug!("worker exiting");
            })
            .map_err(|e| AppError::General(format!("failed to spawn worker: {e}")))?;

        Ok(Self {
            jobs: Some(job_tx),
            results: result_rx,
            handle: Some(handle),
            next_id: 0,
        })
    }

    pub fn request(&mut self, job: Job) -> Result<RequestId, AppError> {
        let id = self.next_id;
        self.next_id += 1;
        self.jobs
            .as_ref()
            .ok_or_else(|| AppError::General("worker stopped".to_string()))?
            .send((id, job))
            .map_err(|_| AppError::General("worker stopped".to_string()))?;
        Ok(id)
    }

    /// Blocks until the next result arrives.
    pub fn recv(&self) -> Result<JobResult, RecvError> {
        self.results.recv()
    }

    pub fn try_recv(&self) -> Result<JobResult, TryRecvError> {
        self.results.try_recv()
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        // Closing the job channel ends the worker loop.
        self.jobs.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn results_arrive_in_request_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.txt"), "b").unwrap();
        fs::create_dir(dir.path().join("A")).unwrap();
        let mut worker = Worker::spawn(&Config::default()).unwrap();

        let list_id = worker.request(Job::List(dir.path().to_path_buf())).unwrap();
        let thumb_id = worker
            .request(Job::Thumbnail {
                path: dir.path().join("b.txt"),
                size: 32,
            })
            .unwrap();

        let first = worker.recv().unwrap();
        assert_eq!(first.id, list_id);
        match first.output {
            JobOutput::Listing(Ok(entries)) => {
                let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
                assert_eq!(names, vec!["A", "b.txt"]);
            }
            other => panic!("unexpected output: {other:?}"),
        }

        let second = worker.recv().unwrap();
        assert_eq!(second.id, thumb_id);
        match second.output {
            JobOutput::Thumbnail(t) => assert!(t.is_placeholder()),
            other => panic!("unexpected output: {other:?}"),
        }
    }

    #[test]
    fn listing_errors_are_returned_not_raised() {
        let dir = tempfile::tempdir().unwrap();
        let mut worker = Worker::spawn(&Config::default()).unwrap();
        worker.request(Job::List(dir.path().join("missing"))).unwrap();

        let result = worker.recv().unwrap();
        assert!(matches!(
            result.output,
            JobOutput::Listing(Err(AppError::NotFound(_)))
        ));
    }
}
