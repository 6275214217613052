use crate::api::{ApiClient, ApiError, DiaryContent, DiaryDocument};
use crate::assistant::{diary_encouragement_prompt, HOURLY_ROLE};
use crate::domain::PlanResponse;
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::future::Future;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;
use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;

pub type RequestId = u64;

/// Handle of an in-flight cancellable request
#[derive(Debug, Clone)]
pub struct Request {
    pub id: RequestId,
    pub cancel: CancellationToken,
}

/// Results delivered back to the UI loop
#[derive(Debug)]
pub enum WorkerEvent {
    Encouragement {
        id: RequestId,
        result: Result<String, String>,
    },
    HourlyEncouragement(Result<String, String>),
    ChatChunk {
        id: RequestId,
        text: String,
    },
    ChatFinished {
        id: RequestId,
        error: Option<String>,
    },
    Plan {
        id: RequestId,
        result: Result<PlanResponse, String>,
    },
    DiaryList(Result<Vec<String>, String>),
    DiaryOpened {
        filename: String,
        result: Result<DiaryContent, String>,
    },
    DiarySaved(Result<String, String>),
}

/// Network operations the dashboard can ask for. Results arrive through `poll_events`.
pub trait Backend {
    fn fetch_encouragement(&mut self, role: &str, prompt: String) -> Request;
    fn fetch_hourly_encouragement(&mut self);
    fn start_chat(&mut self, role: &str, message: String) -> Request;
    fn request_plan(&mut self, request: String) -> RequestId;
    fn refresh_diaries(&mut self);
    fn open_diary(&mut self, filename: String);
    fn save_diary(&mut self, document: DiaryDocument);
    fn poll_events(&mut self) -> Vec<WorkerEvent>;
    fn shutdown(&mut self);
}

/// Runs API calls on a tokio runtime so the UI loop never blocks on the network
pub struct Worker {
    runtime: Option<Runtime>,
    client: ApiClient,
    tx: Sender<WorkerEvent>,
    rx: Receiver<WorkerEvent>,
    shutdown: CancellationToken,
    next_id: RequestId,
}

impl Worker {
    pub fn new(client: ApiClient) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("diarymind-worker")
            .enable_all()
            .build()
            .context("Failed to start async runtime")?;
        let (tx, rx) = mpsc::channel();

        Ok(Self {
            runtime: Some(runtime),
            client,
            tx,
            rx,
            shutdown: CancellationToken::new(),
            next_id: 0,
        })
    }

    fn next_request(&mut self) -> Request {
        self.next_id += 1;
        Request {
            id: self.next_id,
            cancel: self.shutdown.child_token(),
        }
    }

    /// Run `task` on the runtime unless the worker is shutting down
    fn spawn<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let Some(runtime) = &self.runtime else {
            return;
        };
        let shutdown = self.shutdown.clone();
        runtime.spawn(async move {
            tokio::select! {
                _ = shutdown.cancelled() => {}
                _ = task => {}
            }
        });
    }
}

fn describe(e: ApiError) -> String {
    e.to_string()
}

impl Backend for Worker {
    fn fetch_encouragement(&mut self, role: &str, prompt: String) -> Request {
        let request = self.next_request();
        let (id, cancel) = (request.id, request.cancel.clone());
        let client = self.client.clone();
        let tx = self.tx.clone();
        let role = role.to_string();

        self.spawn(async move {
            let result = tokio::select! {
                _ = cancel.cancelled() => return,
                result = client.chat(&role, &prompt) => result,
            };
            let _ = tx.send(WorkerEvent::Encouragement {
                id,
                result: result.map_err(describe),
            });
        });
        request
    }

    fn fetch_hourly_encouragement(&mut self) {
        let client = self.client.clone();
        let tx = self.tx.clone();

        self.spawn(async move {
            let latest = match latest_diary(&client).await {
                Ok(content) => content,
                Err(e) => {
                    warn!("failed to fetch diary for context: {}", e);
                    None
                }
            };
            let prompt = diary_encouragement_prompt(latest.as_deref());
            let result = client.chat(HOURLY_ROLE, &prompt).await.map_err(describe);
            let _ = tx.send(WorkerEvent::HourlyEncouragement(result));
        });
    }

    fn start_chat(&mut self, role: &str, message: String) -> Request {
        let request = self.next_request();
        let (id, cancel) = (request.id, request.cancel.clone());
        let client = self.client.clone();
        let tx = self.tx.clone();
        let role = role.to_string();

        self.spawn(async move {
            let mut stream = match client.stream_chat(&role, &message, cancel).await {
                Ok(stream) => stream,
                Err(ApiError::Cancelled) => return,
                Err(e) => {
                    let _ = tx.send(WorkerEvent::ChatFinished {
                        id,
                        error: Some(describe(e)),
                    });
                    return;
                }
            };

            let mut error = None;
            while let Some(chunk) = stream.next_chunk().await {
                match chunk {
                    Ok(text) => {
                        if tx.send(WorkerEvent::ChatChunk { id, text }).is_err() {
                            return;
                        }
                    }
                    Err(ApiError::Cancelled) => {
                        debug!("chat {} cancelled", id);
                        return;
                    }
                    Err(e) => {
                        error = Some(describe(e));
                        break;
                    }
                }
            }
            let _ = tx.send(WorkerEvent::ChatFinished { id, error });
        });
        request
    }

    fn request_plan(&mut self, request: String) -> RequestId {
        let id = self.next_request().id;
        let client = self.client.clone();
        let tx = self.tx.clone();

        self.spawn(async move {
            let result = client.plan_tasks(&request).await.map_err(describe);
            let _ = tx.send(WorkerEvent::Plan { id, result });
        });
        id
    }

    fn refresh_diaries(&mut self) {
        let client = self.client.clone();
        let tx = self.tx.clone();

        self.spawn(async move {
            let result = client.list_diaries().await.map_err(describe);
            let _ = tx.send(WorkerEvent::DiaryList(result));
        });
    }

    fn open_diary(&mut self, filename: String) {
        let client = self.client.clone();
        let tx = self.tx.clone();

        self.spawn(async move {
            let result = client.diary_content(&filename).await.map_err(describe);
            let _ = tx.send(WorkerEvent::DiaryOpened { filename, result });
        });
    }

    fn save_diary(&mut self, document: DiaryDocument) {
        let client = self.client.clone();
        let tx = self.tx.clone();

        self.spawn(async move {
            let result = client.save_diary(&document).await.map_err(describe);
            let _ = tx.send(WorkerEvent::DiarySaved(result));
        });
    }

    fn poll_events(&mut self) -> Vec<WorkerEvent> {
        self.rx.try_iter().collect()
    }

    /// Cancel everything in flight and stop the runtime
    fn shutdown(&mut self) {
        self.shutdown.cancel();
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_timeout(Duration::from_secs(1));
            info!("worker stopped");
        }
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Content of the newest diary (last filename in sorted order), if any
async fn latest_diary(client: &ApiClient) -> Result<Option<String>, ApiError> {
    let files = client.list_diaries().await?;
    match files.last() {
        Some(name) => Ok(Some(client.diary_content(name).await?.content)),
        None => Ok(None),
    }
}
