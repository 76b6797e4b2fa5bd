//! Silence detection in front of a transcription engine

use super::{SpeechError, Transcriber};
use std::io::Cursor;

/// Reports silent WAV input as empty text without waking the inner engine
///
/// Payloads that do not decode as WAV are passed through unchanged; the engine
/// may still understand them.
pub struct SilenceGate<T> {
    inner: T,
    threshold: f32,
}

impl<T: Transcriber> SilenceGate<T> {
    pub fn new(inner: T, threshold: f32) -> Self {
        Self { inner, threshold }
    }
}

impl<T: Transcriber> Transcriber for SilenceGate<T> {
    fn transcribe(&self, audio: &[u8]) -> Result<String, SpeechError> {
        if audio.is_empty() {
            return Ok(String::new());
        }

        match wav_rms(audio) {
            Some(rms) if rms < self.threshold => {
                tracing::debug!(rms, threshold = self.threshold, "Audio is silent; skipping transcription");
                Ok(String::new())
            }
            Some(_) => self.inner.transcribe(audio),
            None => {
                tracing::debug!(bytes = audio.len(), "Audio is not WAV; passing to engine as-is");
                self.inner.transcribe(audio)
            }
        }
    }
}

/// RMS level of a WAV payload in `[0, 1]`, or `None` if it is not WAV
///
/// A WAV with no samples has RMS 0.
#[allow(clippy::cast_precision_loss)]
fn wav_rms(audio: &[u8]) -> Option<f32> {
    let mut reader = hound::WavReader::new(Cursor::new(audio)).ok()?;
    let spec = reader.spec();

    let (sum, count) = match spec.sample_format {
        hound::SampleFormat::Int => {
            let bits = u32::from(spec.bits_per_sample.max(2));
            let full_scale = ((1i64 << (bits - 1)) - 1) as f64;
            sum_of_squares(
                reader
                    .samples::<i32>()
                    .filter_map(Result::ok)
                    .map(|s| f64::from(s) / full_scale),
            )
        }
        hound::SampleFormat::Float => {
            sum_of_squares(reader.samples::<f32>().filter_map(Result::ok).map(f64::from))
        }
    };

    if count == 0 {
        return Some(0.0);
    }
    #[allow(clippy::cast_possible_truncation)]
    let rms = (sum / count as f64).sqrt() as f32;
    Some(rms)
}

fn sum_of_squares(samples: impl Iterator<Item = f64>) -> (f64, usize) {
    samples.fold((0.0, 0), |(sum, count), s| (sum + s * s, count + 1))
}
