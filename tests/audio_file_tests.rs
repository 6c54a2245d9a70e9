// Integration tests for audio file processing
//
// These tests verify that WAV files are read correctly, split into fragments,
// and that captured fragments encode back into a valid WAV upload.

use anyhow::Result;
use eyesfree::audio::{encode_wav, AudioBackendConfig, AudioFile, AudioFrame};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_tone(path: &Path, sample_rate: u32, channels: u16, seconds: f64) -> Result<()> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)?;
    let total = (sample_rate as f64 * seconds) as usize * channels as usize;
    for i in 0..total {
        writer.write_sample(((i % 100) as i16 - 50) * 100)?;
    }
    writer.finalize()?;
    Ok(())
}

fn fixture(dir: &TempDir, name: &str, sample_rate: u32, channels: u16, seconds: f64) -> Result<PathBuf> {
    let path = dir.path().join(name);
    write_tone(&path, sample_rate, channels, seconds)?;
    Ok(path)
}

#[test]
fn test_audio_file_open() -> Result<()> {
    let dir = TempDir::new()?;
    let path = fixture(&dir, "speech.wav", 16000, 1, 1.5)?;

    let audio = AudioFile::open(&path)?;

    assert!((audio.duration_seconds - 1.5).abs() < 0.001);
    assert_eq!(audio.sample_rate, 16000);
    assert_eq!(audio.channels, 1);
    assert_eq!(audio.samples.len(), 24000);
    assert!(audio.path.contains("speech.wav"));

    Ok(())
}

#[test]
fn test_audio_file_nonexistent() {
    let path = PathBuf::from("/nonexistent/path/to/audio.wav");
    let result = AudioFile::open(&path);

    assert!(result.is_err(), "Opening nonexistent file should fail");
}

#[test]
fn test_frames_use_default_fragment_length() -> Result<()> {
    let dir = TempDir::new()?;
    let path = fixture(&dir, "speech.wav", 16000, 1, 1.05)?;
    let audio = AudioFile::open(&path)?;

    let frame_ms = AudioBackendConfig::default().buffer_duration_ms;
    let frames = audio.frames(frame_ms);

    // 1050ms at 100ms per fragment: ten full fragments and a short tail
    assert_eq!(frames.len(), 11);
    assert!(frames[..10].iter().all(|f| f.samples.len() == 1600));
    assert_eq!(frames[10].samples.len(), 800);
    assert_eq!(frames[3].timestamp_ms, 300);
    assert_eq!(frames[0].duration_ms(), 100);

    Ok(())
}

#[test]
fn test_stereo_frames_stay_interleaved() -> Result<()> {
    let dir = TempDir::new()?;
    let path = fixture(&dir, "stereo.wav", 48000, 2, 0.2)?;
    let audio = AudioFile::open(&path)?;

    let frames = audio.frames(100);

    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0].channels, 2);
    assert_eq!(frames[0].samples.len(), 9600, "4800 sample frames x 2 channels");

    Ok(())
}

#[test]
fn test_stereo_downmix_averages_channels() -> Result<()> {
    let dir = TempDir::new()?;
    let path = fixture(&dir, "stereo.wav", 16000, 2, 0.1)?;
    let audio = AudioFile::open(&path)?;

    let mono = audio.to_mono();

    assert_eq!(mono.channels, 1);
    assert_eq!(mono.samples.len(), audio.samples.len() / 2);
    let expected = ((audio.samples[0] as i32 + audio.samples[1] as i32) / 2) as i16;
    assert_eq!(mono.samples[0], expected);
    assert_eq!(mono.frames(100)[0].samples.len(), 1600);

    Ok(())
}

#[test]
fn test_encoded_recording_round_trips_through_reader() -> Result<()> {
    let dir = TempDir::new()?;
    let path = fixture(&dir, "speech.wav", 16000, 1, 0.5)?;
    let audio = AudioFile::open(&path)?;

    let wav = encode_wav(&audio.frames(100))?;

    let reader = hound::WavReader::new(Cursor::new(wav))?;
    assert_eq!(reader.spec().sample_rate, 16000);
    assert_eq!(reader.spec().channels, 1);
    let decoded: Vec<i16> = reader.into_samples::<i16>().collect::<Result<_, _>>()?;
    assert_eq!(decoded, audio.samples);

    Ok(())
}

#[test]
fn test_empty_recording_still_encodes() -> Result<()> {
    let frames: Vec<AudioFrame> = Vec::new();
    let wav = encode_wav(&frames)?;

    let reader = hound::WavReader::new(Cursor::new(wav))?;
    assert_eq!(reader.len(), 0);

    Ok(())
}
