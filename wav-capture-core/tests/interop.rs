use std::io::Cursor;

use wav_capture_core::{CaptureSink, FrameBatch, Sound, WavHeader};

fn record(rate: f64, batches: &[[Vec<f32>; 2]]) -> Sound {
    let mut sink = CaptureSink::new();
    sink.start().unwrap();
    for batch in batches {
        let channels: [&[f32]; 2] = [&batch[0], &batch[1]];
        sink.append_frames(&FrameBatch::new(rate, &channels)).unwrap();
    }
    sink.finalize().unwrap()
}

#[test]
fn finalized_recording_reads_with_hound() {
    let batches: Vec<[Vec<f32>; 2]> = (0..4)
        .map(|b| {
            let left: Vec<f32> = (0..64).map(|i| ((b * 64 + i) as f32 / 256.0) - 0.5).collect();
            let right: Vec<f32> = left.iter().map(|s| -s).collect();
            [left, right]
        })
        .collect();
    let sound = record(48000.0, &batches);

    let mut reader = hound::WavReader::new(Cursor::new(sound.to_bytes().to_vec())).unwrap();
    let spec = reader.spec();
    assert_eq!(spec.channels, 2);
    assert_eq!(spec.sample_rate, 48000);
    assert_eq!(spec.bits_per_sample, 16);
    assert_eq!(spec.sample_format, hound::SampleFormat::Int);
    assert_eq!(reader.duration(), 256);

    let samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
    assert_eq!(samples.len(), 512);
    for (i, pair) in samples.chunks_exact(2).enumerate() {
        assert_eq!(pair[0] as f64 / 32768.0, sound.get_sample(i, 0));
        assert_eq!(pair[1] as f64 / 32768.0, sound.get_sample(i, 1));
    }
}

#[test]
fn empty_recording_reads_with_hound() {
    let sound = record(16000.0, &[]);
    let reader = hound::WavReader::new(Cursor::new(sound.into_bytes())).unwrap();
    assert_eq!(reader.duration(), 0);
}

#[test]
fn hound_output_passes_strict_parse() {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 8000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        for value in [0i16, 16384, -16384, 32767] {
            writer.write_sample(value).unwrap();
        }
        writer.finalize().unwrap();
    }

    let sound = Sound::from_bytes_checked(cursor.into_inner()).unwrap();
    assert_eq!(sound.header(), WavHeader::new(4, 8000, 16, 1));
    assert_eq!(sound.get_sample(1, 0), 0.5);
    assert_eq!(sound.get_sample(2, 0), -0.5);
}

#[test]
fn cropped_slice_reads_with_hound() {
    let left: Vec<f32> = (0..100).map(|i| i as f32 / 200.0).collect();
    let right = vec![0.0f32; 100];
    let sound = record(100.0, &[[left, right]]);

    let slice = sound.crop(0.25, 0.5);
    assert_eq!(slice.sample_count(), 25);

    let mut reader = hound::WavReader::new(Cursor::new(slice.to_bytes().to_vec())).unwrap();
    let first = reader.samples::<i16>().next().unwrap().unwrap();
    assert_eq!(first, (25.0f64 / 200.0 * 32768.0).round() as i16);
}

#[test]
fn portable_text_survives_transport() {
    let left = vec![0.5f32; 10];
    let right = vec![-0.5f32; 10];
    let sound = record(22050.0, &[[left, right]]);

    let text = sound.to_portable_text();
    assert!(text.starts_with("UklGR"));
    let received = Sound::from_portable_text_checked(&text).unwrap();
    assert_eq!(received, sound);
    assert_eq!(received.checksum(), sound.checksum());
}
