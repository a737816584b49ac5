//! # Scan Session
//!
//! The background worker that drives a QR borrow scan from first frame to
//! confirmed borrow (or cancellation).
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Scan Session Lifecycle                             │
//! │                                                                         │
//! │   spawn()                                                               │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │   IDLE ──► SCANNING ──────────────► DETECTED ──► (confirm ok) ──► CLOSED│
//! │              │  ▲                      │                            ▲   │
//! │              │  └───── reject ─────────┤                            │   │
//! │              │      (resume polling)   │                            │   │
//! │              │                         └── confirm invalid ──┐      │   │
//! │              │                             (stays DETECTED)  │      │   │
//! │              │                                               │      │   │
//! │              └────────────── cancel (from any state) ────────┴──────┘   │
//! │                                                                         │
//! │   SCANNING:  poll a frame every tick, decode, classify                  │
//! │   DETECTED:  polling paused, wait for confirm / reject / cancel         │
//! │   CLOSED:    terminal; frame source released, Closed event emitted once │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency Model
//! One spawned task owns the frame source, the decoder, and the state.
//! Confirm, reject and cancel are messages processed by that task between
//! (never during) frame polls, so there is never more than one poll in
//! flight and a reject storm cannot pile up workers. Cancel always wins:
//! it closes the session even if a confirm is queued behind it.

use std::sync::{Arc, Mutex as StdMutex};

use tokio::sync::{mpsc, oneshot, RwLock};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use shelfmark_core::{classify, BorrowIntent, Classification};

use crate::codec::{DecodeOutcome, QrDecoder};
use crate::config::ScanConfig;
use crate::error::{ScanError, ScanResult};
use crate::frame::FrameSource;

// =============================================================================
// Public Types
// =============================================================================

/// Observable session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Created but the worker has not started polling yet.
    Idle,

    /// Polling frames on the configured interval.
    Scanning,

    /// A QR code was decoded; polling is paused pending a decision.
    Detected,

    /// Terminal. The frame source has been released.
    Closed,
}

/// A decoded QR hit, as delivered to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    /// Raw decoded text, exactly as read from the code.
    pub raw: String,

    /// What the content classified as.
    pub classification: Classification,
}

/// Events emitted by the session worker.
///
/// Delivered in order on the receiver returned by [`ScanSession::spawn`].
/// `Closed` is always the last event and is emitted exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    /// A tick passed with no QR code (no frame, or a frame with no code).
    NoQr,

    /// A frame had a code-like region that failed to decode.
    ScanFailed { reason: String },

    /// A QR code decoded; the session is now in `Detected`.
    QrDetected { detection: Detection },

    /// The session closed. Terminal.
    Closed,
}

// =============================================================================
// Commands (internal)
// =============================================================================

enum Command {
    Confirm {
        borrower: String,
        reply: oneshot::Sender<ScanResult<BorrowIntent>>,
    },
    Reject {
        reply: oneshot::Sender<ScanResult<()>>,
    },
    Cancel,
}

// =============================================================================
// Handle
// =============================================================================

/// Handle for controlling a running scan session.
///
/// Cheap to clone; all clones drive the same worker.
#[derive(Clone)]
pub struct ScanSessionHandle {
    command_tx: mpsc::Sender<Command>,
    state: Arc<RwLock<SessionState>>,
    config: ScanConfig,
    task: Arc<StdMutex<Option<JoinHandle<()>>>>,
}

impl ScanSessionHandle {
    /// Returns the current session state.
    pub async fn state(&self) -> SessionState {
        *self.state.read().await
    }

    /// Confirms the current detection as a borrow by `borrower`.
    ///
    /// ## Returns
    /// * `Ok(BorrowIntent)` - the detection was a valid book reference;
    ///   the session closes
    /// * `Err(NoBookInfo)` - the detection failed classification; the
    ///   session stays in `Detected` so the operator can reject and rescan
    /// * `Err(NotDetected)` - nothing is detected right now
    /// * `Err(SessionClosed)` - the session already closed
    pub async fn confirm(&self, borrower: &str) -> ScanResult<BorrowIntent> {
        let (reply, response) = oneshot::channel();
        self.command_tx
            .send(Command::Confirm {
                borrower: borrower.to_string(),
                reply,
            })
            .await
            .map_err(|_| ScanError::SessionClosed)?;

        response.await.map_err(|_| ScanError::SessionClosed)?
    }

    /// Discards the current detection and resumes polling.
    pub async fn reject(&self) -> ScanResult<()> {
        let (reply, response) = oneshot::channel();
        self.command_tx
            .send(Command::Reject { reply })
            .await
            .map_err(|_| ScanError::SessionClosed)?;

        response.await.map_err(|_| ScanError::SessionClosed)?
    }

    /// Cancels the session from any state. Idempotent.
    pub async fn cancel(&self) {
        // an error here means the worker already stopped, which is fine
        let _ = self.command_tx.send(Command::Cancel).await;
    }

    /// Cancels the session and waits for the worker to finish, bounded
    /// by the configured shutdown grace.
    ///
    /// If the worker does not finish within the grace period it is
    /// aborted; shutdown never blocks indefinitely.
    pub async fn shutdown(&self) {
        self.cancel().await;

        let task = self
            .task
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();

        let Some(mut task) = task else {
            return; // already shut down elsewhere
        };

        match tokio::time::timeout(self.config.shutdown_grace(), &mut task).await {
            Ok(Ok(())) => debug!("Scan worker finished cleanly"),
            Ok(Err(e)) => error!(?e, "Scan worker panicked"),
            Err(_) => {
                warn!(
                    grace_ms = self.config.session.shutdown_grace_ms,
                    "Scan worker did not stop within grace period, aborting"
                );
                task.abort();
            }
        }
    }
}

// =============================================================================
// Session Worker
// =============================================================================

/// The scan session worker. Owns the frame source and decoder.
pub struct ScanSession {
    source: Box<dyn FrameSource>,
    decoder: Box<dyn QrDecoder>,
    config: ScanConfig,
    state: Arc<RwLock<SessionState>>,
    command_rx: mpsc::Receiver<Command>,
    event_tx: mpsc::Sender<ScanEvent>,
    detection: Option<Detection>,
}

impl ScanSession {
    /// Spawns a scan session worker.
    ///
    /// Returns the control handle and the event receiver. Dropping the
    /// receiver cancels the session: the worker treats an undeliverable
    /// event as "nobody is watching" and closes.
    pub fn spawn(
        source: Box<dyn FrameSource>,
        decoder: Box<dyn QrDecoder>,
        config: ScanConfig,
    ) -> (ScanSessionHandle, mpsc::Receiver<ScanEvent>) {
        let (command_tx, command_rx) = mpsc::channel(16);
        let (event_tx, event_rx) = mpsc::channel(config.session.event_buffer);
        let state = Arc::new(RwLock::new(SessionState::Idle));

        let session = ScanSession {
            source,
            decoder,
            config: config.clone(),
            state: state.clone(),
            command_rx,
            event_tx,
            detection: None,
        };

        let task = tokio::spawn(session.run());

        let handle = ScanSessionHandle {
            command_tx,
            state,
            config,
            task: Arc::new(StdMutex::new(Some(task))),
        };

        (handle, event_rx)
    }

    /// Runs the worker loop. Consumes the session.
    async fn run(mut self) {
        info!(
            poll_interval_ms = self.config.session.poll_interval_ms,
            "Scan session starting"
        );

        self.set_state(SessionState::Scanning).await;

        let mut interval = tokio::time::interval(self.config.poll_interval());
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            if self.detection.is_none() {
                // Scanning: poll frames, but let commands preempt the tick
                tokio::select! {
                    biased;

                    cmd = self.command_rx.recv() => {
                        match cmd {
                            Some(cmd) => {
                                if self.handle_command(cmd).await {
                                    break;
                                }
                            }
                            // all handles dropped
                            None => break,
                        }
                    }

                    _ = interval.tick() => {
                        if !self.tick().await {
                            break;
                        }
                    }
                }
            } else {
                // Detected: polling paused, only commands move us forward
                match self.command_rx.recv().await {
                    Some(cmd) => {
                        if self.handle_command(cmd).await {
                            break;
                        }
                        // back to Scanning after a reject: realign ticks
                        if self.detection.is_none() {
                            interval.reset();
                        }
                    }
                    None => break,
                }
            }
        }

        self.close().await;
    }

    /// Polls one frame. Returns false when the event receiver is gone.
    async fn tick(&mut self) -> bool {
        let Some(frame) = self.source.next_frame() else {
            // no frame available; routine, keep polling
            return self.emit(ScanEvent::NoQr).await;
        };

        match self.decoder.decode(&frame) {
            DecodeOutcome::NotFound => self.emit(ScanEvent::NoQr).await,

            DecodeOutcome::DecodeError(reason) => {
                debug!(reason = %reason, "Frame decode failed");
                self.emit(ScanEvent::ScanFailed { reason }).await
            }

            DecodeOutcome::Decoded(raw) => {
                let classification = classify(&raw);
                let detection = Detection {
                    raw,
                    classification,
                };

                info!(raw = %detection.raw, valid = detection.classification.is_valid(),
                    "QR detected");

                self.detection = Some(detection.clone());
                self.set_state(SessionState::Detected).await;
                self.emit(ScanEvent::QrDetected { detection }).await
            }
        }
    }

    /// Handles one command. Returns true when the session should close.
    async fn handle_command(&mut self, cmd: Command) -> bool {
        match cmd {
            Command::Confirm { borrower, reply } => {
                let (result, close) = self.confirm(&borrower);
                let _ = reply.send(result);
                close
            }

            Command::Reject { reply } => {
                if self.detection.take().is_some() {
                    debug!("Detection rejected, resuming scan");
                }
                self.set_state(SessionState::Scanning).await;
                let _ = reply.send(Ok(()));
                false
            }

            Command::Cancel => {
                info!("Scan session cancelled");
                true
            }
        }
    }

    /// Resolves a confirm against the current detection.
    fn confirm(&mut self, borrower: &str) -> (ScanResult<BorrowIntent>, bool) {
        let Some(detection) = &self.detection else {
            return (Err(ScanError::NotDetected), false);
        };

        match detection.classification.as_book() {
            Some(book_ref) => {
                let intent = BorrowIntent {
                    book_id: book_ref.book_id.clone(),
                    book_name: book_ref.book_name.clone(),
                    borrower: borrower.to_string(),
                };
                info!(book_id = %intent.book_id, borrower = %borrower, "Borrow confirmed");
                (Ok(intent), true)
            }
            None => {
                // invalid content cannot be confirmed; stay Detected so
                // the operator sees what was scanned and can reject
                warn!(raw = %detection.raw, "Confirm refused, content is not a book");
                (
                    Err(ScanError::NoBookInfo {
                        raw: detection.raw.clone(),
                    }),
                    false,
                )
            }
        }
    }

    /// Closes the session. Runs exactly once, at the end of `run`.
    async fn close(&mut self) {
        self.set_state(SessionState::Closed).await;
        self.source.release();

        // best effort: the receiver may already be gone
        let _ = self.event_tx.send(ScanEvent::Closed).await;

        info!("Scan session closed");
    }

    async fn set_state(&self, state: SessionState) {
        *self.state.write().await = state;
    }

    /// Emits an event. Returns false when the receiver has been dropped,
    /// which the worker treats as a cancellation.
    async fn emit(&self, event: ScanEvent) -> bool {
        if self.event_tx.send(event).await.is_err() {
            debug!("Event receiver dropped, closing session");
            return false;
        }
        true
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{EmptyFrameSource, Frame};
    use image::GrayImage;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Source that yields scripted slots. `None` entries mean "no frame";
    /// the script repeats its last entry forever once exhausted.
    struct ScriptedSource {
        script: Vec<Option<u8>>,
        pos: usize,
        released: Arc<AtomicUsize>,
    }

    impl ScriptedSource {
        fn new(script: Vec<Option<u8>>, released: Arc<AtomicUsize>) -> Self {
            ScriptedSource {
                script,
                pos: 0,
                released,
            }
        }
    }

    impl FrameSource for ScriptedSource {
        fn next_frame(&mut self) -> Option<Frame> {
            let idx = self.pos.min(self.script.len().saturating_sub(1));
            self.pos += 1;
            // a 1x1 frame whose pixel value selects the decoder outcome
            self.script[idx].map(|v| Frame::new(GrayImage::from_pixel(1, 1, image::Luma([v]))))
        }

        fn release(&mut self) {
            self.released.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// Decoder that maps the frame's single pixel value to an outcome.
    struct ScriptedDecoder {
        outcomes: Vec<DecodeOutcome>,
    }

    impl QrDecoder for ScriptedDecoder {
        fn decode(&self, frame: &Frame) -> DecodeOutcome {
            self.outcomes[frame.luma(0, 0) as usize].clone()
        }
    }

    fn config() -> ScanConfig {
        ScanConfig::default()
    }

    async fn next_event(rx: &mut mpsc::Receiver<ScanEvent>) -> ScanEvent {
        rx.recv().await.expect("event stream ended unexpectedly")
    }

    #[tokio::test(start_paused = true)]
    async fn test_frameless_source_reports_no_qr_indefinitely() {
        let released = Arc::new(AtomicUsize::new(0));
        let source = ScriptedSource::new(vec![None], released.clone());
        let decoder = ScriptedDecoder { outcomes: vec![] };

        let (handle, mut rx) =
            ScanSession::spawn(Box::new(source), Box::new(decoder), config());

        for _ in 0..20 {
            assert_eq!(next_event(&mut rx).await, ScanEvent::NoQr);
        }
        assert_eq!(handle.state().await, SessionState::Scanning);

        handle.cancel().await;
        loop {
            if next_event(&mut rx).await == ScanEvent::Closed {
                break;
            }
        }
        assert_eq!(handle.state().await, SessionState::Closed);
        assert_eq!(released.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_detect_confirm_end_to_end() {
        let released = Arc::new(AtomicUsize::new(0));
        // two empty ticks, then a decodable frame
        let source = ScriptedSource::new(vec![None, None, Some(0)], released.clone());
        let decoder = ScriptedDecoder {
            outcomes: vec![DecodeOutcome::Decoded("12|Atlas|0".to_string())],
        };

        let (handle, mut rx) =
            ScanSession::spawn(Box::new(source), Box::new(decoder), config());

        assert_eq!(next_event(&mut rx).await, ScanEvent::NoQr);
        assert_eq!(next_event(&mut rx).await, ScanEvent::NoQr);

        match next_event(&mut rx).await {
            ScanEvent::QrDetected { detection } => {
                assert_eq!(detection.raw, "12|Atlas|0");
                assert!(detection.classification.is_valid());
            }
            other => panic!("expected detection, got {:?}", other),
        }
        assert_eq!(handle.state().await, SessionState::Detected);

        let intent = handle.confirm("sam").await.unwrap();
        assert_eq!(intent.book_id, "12");
        assert_eq!(intent.book_name, "Atlas");
        assert_eq!(intent.borrower, "sam");

        assert_eq!(next_event(&mut rx).await, ScanEvent::Closed);
        assert_eq!(handle.state().await, SessionState::Closed);
        assert_eq!(released.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_detected_pauses_polling() {
        let released = Arc::new(AtomicUsize::new(0));
        let source = ScriptedSource::new(vec![Some(0)], released.clone());
        let decoder = ScriptedDecoder {
            outcomes: vec![DecodeOutcome::Decoded("42".to_string())],
        };

        let (handle, mut rx) =
            ScanSession::spawn(Box::new(source), Box::new(decoder), config());

        assert!(matches!(
            next_event(&mut rx).await,
            ScanEvent::QrDetected { .. }
        ));

        // many poll intervals pass while Detected; no further events arrive
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(rx.try_recv().is_err());
        assert_eq!(handle.state().await, SessionState::Detected);

        handle.cancel().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_reject_resumes_polling() {
        let released = Arc::new(AtomicUsize::new(0));
        // first frame decodes garbage, after reject the next decodes a book
        let source = ScriptedSource::new(vec![Some(0), Some(1)], released.clone());
        let decoder = ScriptedDecoder {
            outcomes: vec![
                DecodeOutcome::Decoded("just some text".to_string()),
                DecodeOutcome::Decoded("7|Dune".to_string()),
            ],
        };

        let (handle, mut rx) =
            ScanSession::spawn(Box::new(source), Box::new(decoder), config());

        match next_event(&mut rx).await {
            ScanEvent::QrDetected { detection } => {
                assert!(!detection.classification.is_valid());
            }
            other => panic!("expected detection, got {:?}", other),
        }

        // invalid content cannot be confirmed
        let err = handle.confirm("sam").await.unwrap_err();
        assert!(matches!(err, ScanError::NoBookInfo { .. }));
        assert_eq!(handle.state().await, SessionState::Detected);

        handle.reject().await.unwrap();

        match next_event(&mut rx).await {
            ScanEvent::QrDetected { detection } => {
                assert_eq!(detection.raw, "7|Dune");
            }
            other => panic!("expected second detection, got {:?}", other),
        }

        let intent = handle.confirm("sam").await.unwrap();
        assert_eq!(intent.book_id, "7");
        assert_eq!(next_event(&mut rx).await, ScanEvent::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_decode_failures_keep_scanning() {
        let released = Arc::new(AtomicUsize::new(0));
        let source = ScriptedSource::new(vec![Some(0), Some(0), Some(1)], released.clone());
        let decoder = ScriptedDecoder {
            outcomes: vec![
                DecodeOutcome::DecodeError("blur".to_string()),
                DecodeOutcome::Decoded("42".to_string()),
            ],
        };

        let (handle, mut rx) =
            ScanSession::spawn(Box::new(source), Box::new(decoder), config());

        assert_eq!(
            next_event(&mut rx).await,
            ScanEvent::ScanFailed {
                reason: "blur".to_string()
            }
        );
        assert_eq!(
            next_event(&mut rx).await,
            ScanEvent::ScanFailed {
                reason: "blur".to_string()
            }
        );
        assert_eq!(handle.state().await, SessionState::Scanning);

        assert!(matches!(
            next_event(&mut rx).await,
            ScanEvent::QrDetected { .. }
        ));

        handle.cancel().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_confirm_without_detection() {
        let (handle, mut rx) = ScanSession::spawn(
            Box::new(EmptyFrameSource),
            Box::new(ScriptedDecoder { outcomes: vec![] }),
            config(),
        );

        let err = handle.confirm("sam").await.unwrap_err();
        assert!(matches!(err, ScanError::NotDetected));
        assert_ne!(handle.state().await, SessionState::Closed);

        handle.cancel().await;
        loop {
            if next_event(&mut rx).await == ScanEvent::Closed {
                break;
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_is_idempotent_and_closed_emitted_once() {
        let released = Arc::new(AtomicUsize::new(0));
        let source = ScriptedSource::new(vec![None], released.clone());

        let (handle, mut rx) = ScanSession::spawn(
            Box::new(source),
            Box::new(ScriptedDecoder { outcomes: vec![] }),
            config(),
        );

        handle.cancel().await;
        handle.cancel().await;
        handle.cancel().await;

        let mut closed = 0;
        while let Some(event) = rx.recv().await {
            if event == ScanEvent::Closed {
                closed += 1;
            }
        }
        assert_eq!(closed, 1);
        assert_eq!(released.load(Ordering::SeqCst), 1);

        // operations after close fail cleanly
        assert!(matches!(
            handle.confirm("sam").await,
            Err(ScanError::SessionClosed)
        ));
        assert!(matches!(
            handle.reject().await,
            Err(ScanError::SessionClosed)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_receiver_cancels_session() {
        let released = Arc::new(AtomicUsize::new(0));
        let source = ScriptedSource::new(vec![None], released.clone());

        let (handle, rx) = ScanSession::spawn(
            Box::new(source),
            Box::new(ScriptedDecoder { outcomes: vec![] }),
            config(),
        );

        drop(rx);
        handle.shutdown().await;

        assert_eq!(handle.state().await, SessionState::Closed);
        assert_eq!(released.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_is_bounded() {
        let (handle, mut rx) = ScanSession::spawn(
            Box::new(EmptyFrameSource),
            Box::new(ScriptedDecoder { outcomes: vec![] }),
            config(),
        );

        // drain events so the worker never blocks on the channel
        let drain = tokio::spawn(async move { while rx.recv().await.is_some() {} });

        handle.shutdown().await;
        assert_eq!(handle.state().await, SessionState::Closed);

        // second shutdown is a no-op
        handle.shutdown().await;

        drain.await.unwrap();
    }

    /// Source whose polls outlive any reasonable shutdown grace.
    struct StuckSource;

    impl FrameSource for StuckSource {
        fn next_frame(&mut self) -> Option<Frame> {
            std::thread::sleep(Duration::from_secs(1));
            None
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_shutdown_aborts_worker_that_outlives_grace() {
        let mut cfg = ScanConfig::default();
        cfg.session.shutdown_grace_ms = 50;

        let (handle, _rx) = ScanSession::spawn(
            Box::new(StuckSource),
            Box::new(ScriptedDecoder { outcomes: vec![] }),
            cfg,
        );

        // let the worker sink into its blocked poll
        tokio::time::sleep(Duration::from_millis(20)).await;

        let start = std::time::Instant::now();
        handle.shutdown().await;

        // grace is 50ms; well under the 1s the poll itself takes
        assert!(
            start.elapsed() < Duration::from_millis(500),
            "shutdown took {:?}",
            start.elapsed()
        );
    }

    /// Source that records how many polls are in flight at once.
    struct GaugedSource {
        active: Arc<AtomicUsize>,
        max_seen: Arc<AtomicUsize>,
    }

    impl FrameSource for GaugedSource {
        fn next_frame(&mut self) -> Option<Frame> {
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_seen.fetch_max(now, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(2));
            self.active.fetch_sub(1, Ordering::SeqCst);
            Some(Frame::new(GrayImage::from_pixel(1, 1, image::Luma([0]))))
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_single_poll_in_flight_across_reject_storm() {
        let active = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));

        let source = GaugedSource {
            active: active.clone(),
            max_seen: max_seen.clone(),
        };
        let decoder = ScriptedDecoder {
            outcomes: vec![DecodeOutcome::Decoded("just text".to_string())],
        };

        let mut cfg = ScanConfig::default();
        cfg.session.poll_interval_ms = 1;

        let (handle, mut rx) = ScanSession::spawn(Box::new(source), Box::new(decoder), cfg);

        // every detection is invalid; reject it immediately and rescan
        let mut rejections = 0;
        while rejections < 25 {
            if let Some(ScanEvent::QrDetected { .. }) = rx.recv().await {
                handle.reject().await.unwrap();
                rejections += 1;
            }
        }

        handle.cancel().await;
        while rx.recv().await.is_some() {}

        assert_eq!(max_seen.load(Ordering::SeqCst), 1);
    }
}
