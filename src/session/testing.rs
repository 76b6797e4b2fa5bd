//! Mock implementations for testing
//!
//! These mocks enable full-turn testing without sockets or speech engines.

use super::traits::*;
use super::{SessionRuntime, TurnServices};
use crate::dispatch::BlockingDispatcher;
use crate::protocol::{InboundFrame, OutboundFrame};
use crate::reasoning::{Reasoner, Reply};
use crate::speech::{SpeechError, Synthesizer, Transcriber};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Barrier, Mutex};

// ============================================================================
// Mock Connection
// ============================================================================

/// Connection that replays scripted frames and records everything sent
pub struct MockConnection {
    inbound: VecDeque<InboundFrame>,
    sent: Arc<Mutex<Vec<OutboundFrame>>>,
    /// Fail every send after this many frames
    fail_after: Option<usize>,
}

impl MockConnection {
    pub fn new(frames: impl IntoIterator<Item = InboundFrame>) -> Self {
        Self {
            inbound: frames.into_iter().collect(),
            sent: Arc::new(Mutex::new(Vec::new())),
            fail_after: None,
        }
    }

    pub fn failing_after(mut self, frames: usize) -> Self {
        self.fail_after = Some(frames);
        self
    }

    /// Shared handle to the sent frames, readable after the session ends
    pub fn sent(&self) -> Arc<Mutex<Vec<OutboundFrame>>> {
        self.sent.clone()
    }
}

#[async_trait]
impl Connection for MockConnection {
    async fn recv(&mut self) -> Option<InboundFrame> {
        self.inbound.pop_front()
    }

    async fn send(&mut self, frame: &OutboundFrame) -> Result<(), ConnectionError> {
        let mut sent = self.sent.lock().unwrap();
        if self.fail_after.is_some_and(|limit| sent.len() >= limit) {
            return Err(ConnectionError::Send("connection reset".to_string()));
        }
        sent.push(frame.clone());
        Ok(())
    }
}

// ============================================================================
// Mock Transcribers
// ============================================================================

/// Transcriber that returns queued results, then empty text
pub struct ScriptedTranscriber {
    results: Mutex<VecDeque<Result<String, SpeechError>>>,
    pub calls: Mutex<usize>,
}

impl ScriptedTranscriber {
    pub fn new() -> Self {
        Self {
            results: Mutex::new(VecDeque::new()),
            calls: Mutex::new(0),
        }
    }

    pub fn queue_text(&self, text: impl Into<String>) {
        self.results.lock().unwrap().push_back(Ok(text.into()));
    }

    pub fn queue_error(&self, error: SpeechError) {
        self.results.lock().unwrap().push_back(Err(error));
    }

    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

impl Transcriber for ScriptedTranscriber {
    fn transcribe(&self, _audio: &[u8]) -> Result<String, SpeechError> {
        *self.calls.lock().unwrap() += 1;
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(String::new()))
    }
}

/// Transcriber that only returns once `parties` calls are in flight together
pub struct BarrierTranscriber {
    barrier: Barrier,
}

impl BarrierTranscriber {
    pub fn new(parties: usize) -> Self {
        Self {
            barrier: Barrier::new(parties),
        }
    }
}

impl Transcriber for BarrierTranscriber {
    fn transcribe(&self, _audio: &[u8]) -> Result<String, SpeechError> {
        self.barrier.wait();
        Ok("hello".to_string())
    }
}

pub struct PanickingTranscriber;

impl Transcriber for PanickingTranscriber {
    fn transcribe(&self, _audio: &[u8]) -> Result<String, SpeechError> {
        panic!("transcription model crashed");
    }
}

// ============================================================================
// Mock Synthesizer
// ============================================================================

/// Synthesizer that records requested texts and returns a fixed outcome
pub struct RecordingSynthesizer {
    audio: Option<Vec<u8>>,
    pub texts: Mutex<Vec<String>>,
}

impl RecordingSynthesizer {
    pub fn returning(audio: impl Into<Vec<u8>>) -> Self {
        Self {
            audio: Some(audio.into()),
            texts: Mutex::new(Vec::new()),
        }
    }

    /// Every call fails
    pub fn failing() -> Self {
        Self {
            audio: None,
            texts: Mutex::new(Vec::new()),
        }
    }

    pub fn recorded_texts(&self) -> Vec<String> {
        self.texts.lock().unwrap().clone()
    }
}

impl Synthesizer for RecordingSynthesizer {
    fn synthesize(&self, text: &str) -> Result<Vec<u8>, SpeechError> {
        self.texts.lock().unwrap().push(text.to_string());
        self.audio.clone().ok_or_else(|| SpeechError::Http {
            status: 401,
            body: "quota exceeded".to_string(),
        })
    }
}

// ============================================================================
// Mock Reasoner
// ============================================================================

/// Reasoner that echoes its input and records every call
pub struct RecordingReasoner {
    pub inputs: Mutex<Vec<String>>,
    /// Panic when asked about this exact text
    panic_on: Option<String>,
}

impl RecordingReasoner {
    pub fn new() -> Self {
        Self {
            inputs: Mutex::new(Vec::new()),
            panic_on: None,
        }
    }

    pub fn panicking_on(text: impl Into<String>) -> Self {
        Self {
            inputs: Mutex::new(Vec::new()),
            panic_on: Some(text.into()),
        }
    }

    pub fn recorded_inputs(&self) -> Vec<String> {
        self.inputs.lock().unwrap().clone()
    }
}

#[async_trait]
impl Reasoner for RecordingReasoner {
    async fn converse(&self, input_text: &str) -> Reply {
        self.inputs.lock().unwrap().push(input_text.to_string());
        if self.panic_on.as_deref() == Some(input_text) {
            panic!("reasoner blew up on {input_text:?}");
        }
        Reply::new(format!("You said {input_text}."), 0.1, -0.1)
    }
}

/// Reasoner that holds every turn open until the test releases it
pub struct GatedReasoner {
    gate: tokio::sync::Semaphore,
    inner: RecordingReasoner,
}

impl GatedReasoner {
    pub fn new() -> Self {
        Self {
            gate: tokio::sync::Semaphore::new(0),
            inner: RecordingReasoner::new(),
        }
    }

    /// Let the next `turns` calls through
    pub fn release(&self, turns: usize) {
        self.gate.add_permits(turns);
    }

    pub fn recorded_inputs(&self) -> Vec<String> {
        self.inner.recorded_inputs()
    }
}

#[async_trait]
impl Reasoner for GatedReasoner {
    async fn converse(&self, input_text: &str) -> Reply {
        self.gate.acquire().await.unwrap().forget();
        self.inner.converse(input_text).await
    }
}

// ============================================================================
// Helpers
// ============================================================================

pub fn services(
    transcriber: Arc<dyn Transcriber>,
    synthesizer: Arc<dyn Synthesizer>,
    reasoner: Arc<dyn Reasoner>,
) -> TurnServices {
    TurnServices {
        transcriber,
        synthesizer,
        reasoner,
        dispatcher: BlockingDispatcher::new(4),
    }
}

/// Run a session over scripted frames and return the wire JSON it sent
pub async fn run_session(
    frames: Vec<InboundFrame>,
    services: TurnServices,
) -> Vec<serde_json::Value> {
    let connection = MockConnection::new(frames);
    let sent = connection.sent();
    SessionRuntime::new(uuid::Uuid::new_v4().to_string(), connection, services)
        .run()
        .await;

    let frames = sent.lock().unwrap().clone();
    frames
        .iter()
        .map(|f| serde_json::from_str(&f.to_json().unwrap()).unwrap())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AffectBounds, LlmConfig};
    use crate::llm::testing::MockLlmService;
    use crate::llm::LlmError;
    use crate::reasoning::ReasoningAdapter;
    use serde_json::json;
    use std::time::Duration;

    fn text(s: &str) -> InboundFrame {
        InboundFrame::Text(s.to_string())
    }

    fn statuses(frames: &[serde_json::Value]) -> Vec<&str> {
        frames.iter().map(|f| f["status"].as_str().unwrap()).collect()
    }

    #[tokio::test]
    async fn test_silence_returns_to_listening() {
        let transcriber = Arc::new(ScriptedTranscriber::new());
        let reasoner = Arc::new(RecordingReasoner::new());
        let synthesizer = Arc::new(RecordingSynthesizer::returning(b"mp3".to_vec()));

        let frames = run_session(
            vec![InboundFrame::Binary(vec![0; 64]), InboundFrame::Binary(vec![])],
            services(transcriber.clone(), synthesizer.clone(), reasoner.clone()),
        )
        .await;

        let no_speech = json!({"status": "listening", "info": "no_speech_detected"});
        assert_eq!(
            frames,
            vec![json!({"status": "transcribing"}), no_speech.clone(), json!({"status": "transcribing"}), no_speech]
        );
        assert_eq!(transcriber.call_count(), 2);
        assert!(reasoner.recorded_inputs().is_empty());
        assert!(synthesizer.recorded_texts().is_empty());
    }

    #[tokio::test]
    async fn test_audio_turn_full_sequence() {
        let transcriber = Arc::new(ScriptedTranscriber::new());
        transcriber.queue_text(" how are you ");
        let reasoner = Arc::new(RecordingReasoner::new());
        let synthesizer = Arc::new(RecordingSynthesizer::returning(b"mp3".to_vec()));

        let frames = run_session(
            vec![InboundFrame::Binary(vec![1; 64])],
            services(transcriber, synthesizer.clone(), reasoner.clone()),
        )
        .await;

        assert_eq!(
            frames,
            vec![
                json!({"status": "transcribing"}),
                json!({"status": "llm_processing", "user_text": "how are you"}),
                json!({"status": "generating_audio", "response_text": "You said how are you."}),
                json!({
                    "status": "speaking",
                    "response_text": "You said how are you.",
                    "delta_valence": 0.1,
                    "delta_arousal": -0.1,
                    "audio": "bXAz",
                }),
            ]
        );
        assert_eq!(reasoner.recorded_inputs(), vec!["how are you"]);
        assert_eq!(synthesizer.recorded_texts(), vec!["You said how are you."]);
    }

    #[tokio::test]
    async fn test_text_skips_transcription() {
        let transcriber = Arc::new(ScriptedTranscriber::new());
        let frames = run_session(
            vec![text("hello")],
            services(
                transcriber.clone(),
                Arc::new(RecordingSynthesizer::returning(b"x".to_vec())),
                Arc::new(RecordingReasoner::new()),
            ),
        )
        .await;

        assert_eq!(statuses(&frames), vec!["llm_processing", "generating_audio", "speaking"]);
        assert_eq!(frames[0]["user_text"], "hello");
        assert_eq!(transcriber.call_count(), 0);
    }

    #[tokio::test]
    async fn test_failed_synthesis_omits_audio() {
        let frames = run_session(
            vec![text("hello")],
            services(
                Arc::new(ScriptedTranscriber::new()),
                Arc::new(RecordingSynthesizer::failing()),
                Arc::new(RecordingReasoner::new()),
            ),
        )
        .await;

        let result = frames.last().unwrap();
        assert_eq!(result["status"], "speaking");
        assert_eq!(result["response_text"], "You said hello.");
        assert!(result.get("audio").is_none());
    }

    #[tokio::test]
    async fn test_empty_synthesis_omits_audio() {
        let frames = run_session(
            vec![text("hello")],
            services(
                Arc::new(ScriptedTranscriber::new()),
                Arc::new(RecordingSynthesizer::returning(Vec::new())),
                Arc::new(RecordingReasoner::new()),
            ),
        )
        .await;

        let result = frames.last().unwrap();
        assert_eq!(result["status"], "speaking");
        assert!(result.get("audio").is_none());
    }

    #[tokio::test]
    async fn test_repeated_input_runs_full_turn_each_time() {
        let reasoner = Arc::new(RecordingReasoner::new());
        let synthesizer = Arc::new(RecordingSynthesizer::returning(b"a".to_vec()));

        let frames = run_session(
            vec![text("again"), text("again")],
            services(Arc::new(ScriptedTranscriber::new()), synthesizer.clone(), reasoner.clone()),
        )
        .await;

        assert_eq!(
            statuses(&frames),
            vec![
                "llm_processing",
                "generating_audio",
                "speaking",
                "llm_processing",
                "generating_audio",
                "speaking",
            ]
        );
        assert_eq!(frames[0..3], frames[3..6]);
        assert_eq!(reasoner.recorded_inputs().len(), 2);
        assert_eq!(synthesizer.recorded_texts().len(), 2);
    }

    #[tokio::test]
    async fn test_unsupported_frames_are_ignored() {
        let frames = run_session(
            vec![
                InboundFrame::Other {
                    kind: "pong".to_string(),
                },
                text("hi"),
            ],
            services(
                Arc::new(ScriptedTranscriber::new()),
                Arc::new(RecordingSynthesizer::returning(b"a".to_vec())),
                Arc::new(RecordingReasoner::new()),
            ),
        )
        .await;

        assert_eq!(statuses(&frames), vec!["llm_processing", "generating_audio", "speaking"]);
    }

    #[tokio::test]
    async fn test_transcription_failure_returns_to_listening() {
        let transcriber = Arc::new(ScriptedTranscriber::new());
        transcriber.queue_error(SpeechError::Request("connection refused".to_string()));
        let reasoner = Arc::new(RecordingReasoner::new());

        let frames = run_session(
            vec![InboundFrame::Binary(vec![1; 8]), text("still there?")],
            services(
                transcriber,
                Arc::new(RecordingSynthesizer::returning(b"a".to_vec())),
                reasoner.clone(),
            ),
        )
        .await;

        assert_eq!(
            statuses(&frames),
            vec!["transcribing", "listening", "llm_processing", "generating_audio", "speaking"]
        );
        assert_eq!(reasoner.recorded_inputs(), vec!["still there?"]);
    }

    #[tokio::test]
    async fn test_transcriber_panic_keeps_session() {
        let frames = run_session(
            vec![InboundFrame::Binary(vec![1; 8]), text("hello")],
            services(
                Arc::new(PanickingTranscriber),
                Arc::new(RecordingSynthesizer::returning(b"a".to_vec())),
                Arc::new(RecordingReasoner::new()),
            ),
        )
        .await;

        assert_eq!(
            statuses(&frames),
            vec!["transcribing", "listening", "llm_processing", "generating_audio", "speaking"]
        );
    }

    #[tokio::test]
    async fn test_reasoner_panic_aborts_turn_silently() {
        let reasoner = Arc::new(RecordingReasoner::panicking_on("boom"));

        let frames = run_session(
            vec![text("boom"), text("hello")],
            services(
                Arc::new(ScriptedTranscriber::new()),
                Arc::new(RecordingSynthesizer::returning(b"a".to_vec())),
                reasoner.clone(),
            ),
        )
        .await;

        // The aborted turn got as far as llm_processing and then went quiet
        assert_eq!(
            statuses(&frames),
            vec!["llm_processing", "llm_processing", "generating_audio", "speaking"]
        );
        assert_eq!(frames[3]["response_text"], "You said hello.");
        assert_eq!(reasoner.recorded_inputs(), vec!["boom", "hello"]);
    }

    #[tokio::test]
    async fn test_disconnect_ends_session() {
        let reasoner = Arc::new(RecordingReasoner::new());
        let connection = MockConnection::new(vec![text("one"), text("two")]).failing_after(1);
        let sent = connection.sent();

        let session = SessionRuntime::new(
            "disconnecting".to_string(),
            connection,
            services(
                Arc::new(ScriptedTranscriber::new()),
                Arc::new(RecordingSynthesizer::returning(b"a".to_vec())),
                reasoner.clone(),
            ),
        );
        tokio::time::timeout(Duration::from_secs(5), session.run())
            .await
            .expect("session should end when sends fail");

        assert_eq!(sent.lock().unwrap().len(), 1);
        // The first turn's second frame fails to send; "two" is never read
        assert_eq!(reasoner.recorded_inputs(), vec!["one"]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_sessions_transcribe_in_parallel() {
        let transcriber: Arc<dyn Transcriber> = Arc::new(BarrierTranscriber::new(2));
        let make_services = || {
            services(
                transcriber.clone(),
                Arc::new(RecordingSynthesizer::returning(b"a".to_vec())),
                Arc::new(RecordingReasoner::new()),
            )
        };

        let a = tokio::spawn(run_session(vec![InboundFrame::Binary(vec![1; 8])], make_services()));
        let b = tokio::spawn(run_session(vec![InboundFrame::Binary(vec![2; 8])], make_services()));

        // Neither transcription returns until both are running at once
        let (a, b) = tokio::time::timeout(Duration::from_secs(5), async { tokio::join!(a, b) })
            .await
            .expect("transcriptions were serialized across sessions");

        for frames in [a.unwrap(), b.unwrap()] {
            assert_eq!(frames.last().unwrap()["status"], "speaking");
            assert_eq!(frames[1]["user_text"], "hello");
        }
    }

    #[tokio::test]
    async fn test_unreachable_backend_still_speaks() {
        let llm = Arc::new(MockLlmService::new());
        llm.queue_error(LlmError::network("Connection refused"));
        let reasoner = Arc::new(ReasoningAdapter::new(
            llm,
            &LlmConfig::default(),
            AffectBounds::default(),
        ));

        let frames = run_session(
            vec![text("hello")],
            services(
                Arc::new(ScriptedTranscriber::new()),
                Arc::new(RecordingSynthesizer::failing()),
                reasoner,
            ),
        )
        .await;

        let result = frames.last().unwrap();
        assert_eq!(result["status"], "speaking");
        assert_eq!(result["response_text"], "Hello. I am IRIS.");
        assert!(result["delta_valence"].as_f64().unwrap().abs() <= 0.3);
    }
}
