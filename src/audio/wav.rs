use std::io::Cursor;
use tracing::warn;

use super::backend::AudioFrame;

const DEFAULT_SAMPLE_RATE: u32 = 16000;

/// Encode captured fragments as a single in-memory WAV blob
///
/// The format is taken from the first fragment; later fragments with a
/// different rate or channel count are dropped. An empty recording still
/// produces a valid, empty WAV file.
pub fn encode_wav(frames: &[AudioFrame]) -> Result<Vec<u8>, hound::Error> {
    let (sample_rate, channels) = frames
        .first()
        .map(|f| (f.sample_rate, f.channels))
        .unwrap_or((DEFAULT_SAMPLE_RATE, 1));

    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)?;
        for frame in frames {
            if frame.sample_rate != sample_rate || frame.channels != channels {
                warn!(
                    "Dropping fragment at {}ms: {}Hz/{}ch does not match {}Hz/{}ch",
                    frame.timestamp_ms, frame.sample_rate, frame.channels, sample_rate, channels
                );
                continue;
            }
            for &sample in &frame.samples {
                writer.write_sample(sample)?;
            }
        }
        writer.finalize()?;
    }

    Ok(cursor.into_inner())
}
