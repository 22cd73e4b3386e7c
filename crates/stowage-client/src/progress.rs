//! Transfer progress reporting
//!
//! The file body is handed to the transport as a stream of chunks. Each chunk
//! pulled by the transport advances the tracker and fires the callback, so
//! `loaded` only ever grows and ends at `total`.

use crate::UploadProgress;
use bytes::Bytes;
use futures::stream::{self, Stream, StreamExt};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::warn;

/// Progress callback type
pub type ProgressCallback = Arc<dyn Fn(UploadProgress) + Send + Sync>;

/// Accumulates transferred bytes and notifies the callback
pub struct ProgressTracker {
    loaded: u64,
    total: u64,
    callback: Option<ProgressCallback>,
}

impl ProgressTracker {
    /// Create a tracker for `total` bytes
    pub fn new(total: u64, callback: Option<ProgressCallback>) -> Self {
        Self {
            loaded: 0,
            total,
            callback,
        }
    }

    /// Record `bytes` more bytes and report
    pub fn advance(&mut self, bytes: u64) {
        self.loaded = self.loaded.saturating_add(bytes);
        self.report();
    }

    /// Bytes recorded so far
    pub fn loaded(&self) -> u64 {
        self.loaded
    }

    fn report(&mut self) {
        let Some(callback) = &self.callback else {
            return;
        };

        let progress = UploadProgress::new(self.loaded, self.total);
        if catch_unwind(AssertUnwindSafe(|| callback(progress))).is_err() {
            warn!("Progress callback panicked; suppressing further progress events");
            self.callback = None;
        }
    }
}

/// Split `data` into `chunk_size` pieces, reporting each one as it is consumed
pub fn progress_stream(
    data: Bytes,
    chunk_size: usize,
    callback: Option<ProgressCallback>,
) -> impl Stream<Item = std::io::Result<Bytes>> + Send + Sync + 'static {
    let chunk_size = chunk_size.max(1);
    let total = data.len() as u64;
    let mut tracker = ProgressTracker::new(total, callback);

    let chunks: Vec<Bytes> = (0..data.len())
        .step_by(chunk_size)
        .map(|start| data.slice(start..(start + chunk_size).min(data.len())))
        .collect();

    stream::iter(chunks).map(move |chunk| {
        tracker.advance(chunk.len() as u64);
        Ok::<_, std::io::Error>(chunk)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    fn recorder() -> (ProgressCallback, Arc<Mutex<Vec<UploadProgress>>>) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let callback: ProgressCallback = Arc::new(move |p| sink.lock().unwrap().push(p));
        (callback, events)
    }

    #[tokio::test]
    async fn test_stream_reports_each_chunk() {
        let (callback, events) = recorder();
        let data = Bytes::from(vec![7u8; 10]);

        let chunks: Vec<Bytes> = progress_stream(data.clone(), 4, Some(callback))
            .map(|c| c.unwrap())
            .collect()
            .await;

        assert_eq!(chunks.iter().map(|c| c.len()).collect::<Vec<_>>(), vec![4, 4, 2]);
        assert_eq!(chunks.concat(), data.to_vec());

        let events = events.lock().unwrap();
        let loaded: Vec<u64> = events.iter().map(|p| p.loaded).collect();
        assert_eq!(loaded, vec![4, 8, 10]);
        assert_eq!(events.last().unwrap().percent, 100);
        assert!(events.iter().all(|p| p.total == 10));
    }

    #[tokio::test]
    async fn test_panicking_callback_is_isolated() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);
        let callback: ProgressCallback = Arc::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            panic!("callback failure");
        });

        let chunks: Vec<_> = progress_stream(Bytes::from(vec![0u8; 9]), 3, Some(callback))
            .collect()
            .await;

        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|c| c.is_ok()));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_tracker_without_callback() {
        let mut tracker = ProgressTracker::new(5, None);
        tracker.advance(3);
        tracker.advance(2);
        assert_eq!(tracker.loaded(), 5);
    }
}
