use std::thread;
use tokio::sync::mpsc;

use crate::core::{TvError, TvResult};
use crate::media::source::{is_remote, normalize_url};
use crate::subtitles::parser::SubtitleFormat;

/// Request to fetch and parse a subtitle document
#[derive(Debug, Clone)]
pub struct SubtitleRequest {
    pub source: String,
    pub format: SubtitleFormat,
    pub request_id: u64,
}

/// Result of a subtitle fetch: the raw document, parsed by the caller
#[derive(Debug)]
pub struct SubtitleLoadResult {
    pub request_id: u64,
    pub source: String,
    pub format: SubtitleFormat,
    pub result: TvResult<String>,
}

/// Fetches subtitle documents (local paths or http URLs) on a background runtime.
/// Parsing is left to [`crate::tv::TvController::load_subtitles`].
///
/// Results are collected without blocking with [`SubtitleLoader::take_latest`];
/// only the most recent request is ever applied, older ones are dropped.
pub struct SubtitleLoader {
    request_sender: mpsc::UnboundedSender<SubtitleRequest>,
    result_receiver: mpsc::UnboundedReceiver<SubtitleLoadResult>,
    next_request_id: u64,
    latest_request_id: Option<u64>,
}

impl SubtitleLoader {
    pub fn new() -> Self {
        let (request_tx, mut request_rx) = mpsc::unbounded_channel::<SubtitleRequest>();
        let (result_tx, result_rx) = mpsc::unbounded_channel::<SubtitleLoadResult>();

        thread::spawn(move || {
            let rt = match tokio::runtime::Runtime::new() {
                Ok(rt) => rt,
                Err(e) => {
                    log::error!("Failed to create subtitle runtime: {}", e);
                    return;
                }
            };

            rt.block_on(async {
                let client = reqwest::Client::new();
                while let Some(request) = request_rx.recv().await {
                    let result_tx = result_tx.clone();
                    let client = client.clone();

                    tokio::spawn(async move {
                        log::debug!("Loading subtitles from: {}", request.source);

                        let result = fetch_document(&client, &request.source).await;

                        if let Err(e) = &result {
                            log::debug!("Failed to load subtitles from {}: {}", request.source, e);
                        }

                        let response = SubtitleLoadResult {
                            request_id: request.request_id,
                            source: request.source,
                            format: request.format,
                            result,
                        };
                        if let Err(e) = result_tx.send(response) {
                            log::error!("Failed to send subtitle result: {}", e);
                        }
                    });
                }
            });
        });

        Self {
            request_sender: request_tx,
            result_receiver: result_rx,
            next_request_id: 0,
            latest_request_id: None,
        }
    }

    /// Queues a fetch (non-blocking). Supersedes any request still in flight.
    pub fn request(&mut self, source: &str, format: SubtitleFormat) -> u64 {
        self.next_request_id += 1;
        let request_id = self.next_request_id;
        self.latest_request_id = Some(request_id);

        let request = SubtitleRequest {
            source: source.trim().to_string(),
            format,
            request_id,
        };
        if let Err(e) = self.request_sender.send(request) {
            log::error!("Failed to send subtitle request: {}", e);
        }
        request_id
    }

    pub fn is_pending(&self) -> bool {
        self.latest_request_id.is_some()
    }

    /// Drains finished fetches and returns the one matching the latest request, if done.
    pub fn take_latest(&mut self) -> Option<SubtitleLoadResult> {
        let mut latest = None;

        while let Ok(result) = self.result_receiver.try_recv() {
            if Some(result.request_id) == self.latest_request_id {
                latest = Some(result);
            } else {
                log::debug!("Dropping stale subtitle result for {}", result.source);
            }
        }

        if latest.is_some() {
            self.latest_request_id = None;
        }
        latest
    }
}

impl Default for SubtitleLoader {
    fn default() -> Self {
        Self::new()
    }
}

async fn fetch_document(client: &reqwest::Client, source: &str) -> TvResult<String> {
    if source.is_empty() {
        return Err(TvError::SubtitleFetch("no subtitle source given".to_string()));
    }

    if is_remote(source) {
        let url = normalize_url(source);
        let response = client.get(&url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    } else {
        let path = source.strip_prefix("file://").unwrap_or(source);
        let bytes = tokio::fs::read(path).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
