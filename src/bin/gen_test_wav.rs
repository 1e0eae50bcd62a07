/// Generate WAV files for trying out the spectrogram viewer
///
/// Run with: cargo run --bin gen_test_wav -- [OUTPUT_DIR]
use std::f32::consts::PI;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use rand::Rng;

use wavescope::data::AudioData;

#[derive(Parser, Debug)]
#[command(name = "gen_test_wav", about = "Write sine, chirp, multitone and noise WAVs")]
struct Cli {
    /// Directory the files are written to
    #[arg(default_value = ".")]
    output_dir: PathBuf,
}

const SAMPLE_RATE: u32 = 44100;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    std::fs::create_dir_all(&cli.output_dir)
        .with_context(|| format!("Failed to create {:?}", cli.output_dir))?;

    println!("Generating test audio files...");

    let files: [(&str, AudioData); 5] = [
        // 1. Pure sine wave at 440 Hz (A4 note), 10 s -> 430 mel frames
        ("test_sine_440hz.wav", mono(sine(440.0, 10.0))),
        // 2. Chirp (sweep from 100 Hz to 8000 Hz)
        ("test_chirp.wav", mono(chirp(100.0, 8000.0, 6.0))),
        // 3. Multi-tone (combination of several frequencies)
        ("test_multitone.wav", mono(multitone(&[220.0, 440.0, 880.0], 4.0))),
        // 4. White noise
        ("test_noise.wav", mono(white_noise(4.0))),
        // 5. Stereo: 330 Hz left, 660 Hz right
        ("test_stereo.wav", stereo(&sine(330.0, 4.0), &sine(660.0, 4.0))),
    ];

    for (name, audio) in &files {
        let path = cli.output_dir.join(name);
        audio.save_wav(&path)?;
        println!(
            "  - {:<22} ({:.1}s, {} ch)",
            name,
            audio.duration_seconds(),
            audio.channels
        );
    }

    println!("Test files generated successfully!");
    Ok(())
}

fn mono(samples: Vec<f32>) -> AudioData {
    AudioData {
        samples,
        sample_rate: SAMPLE_RATE,
        channels: 1,
    }
}

fn stereo(left: &[f32], right: &[f32]) -> AudioData {
    let samples = left
        .iter()
        .zip(right)
        .flat_map(|(&l, &r)| [l, r])
        .collect();
    AudioData {
        samples,
        sample_rate: SAMPLE_RATE,
        channels: 2,
    }
}

fn num_samples(duration: f32) -> usize {
    (SAMPLE_RATE as f32 * duration) as usize
}

fn sine(frequency: f32, duration: f32) -> Vec<f32> {
    (0..num_samples(duration))
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE as f32;
            0.8 * (2.0 * PI * frequency * t).sin()
        })
        .collect()
}

fn chirp(start_freq: f32, end_freq: f32, duration: f32) -> Vec<f32> {
    (0..num_samples(duration))
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE as f32;
            // Integrated linear sweep keeps the phase continuous
            let k = (end_freq - start_freq) / duration;
            let phase = 2.0 * PI * (start_freq * t + 0.5 * k * t * t);
            0.8 * phase.sin()
        })
        .collect()
}

fn multitone(frequencies: &[f32], duration: f32) -> Vec<f32> {
    (0..num_samples(duration))
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE as f32;
            frequencies
                .iter()
                .map(|&freq| (2.0 * PI * freq * t).sin() / frequencies.len() as f32)
                .sum()
        })
        .collect()
}

fn white_noise(duration: f32) -> Vec<f32> {
    let mut rng = rand::rng();
    (0..num_samples(duration))
        .map(|_| rng.random_range(-0.5..0.5))
        .collect()
}
