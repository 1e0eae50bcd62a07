// ============================================================================
// CONTAINER_INFO.RS - RIFF/WAVE Header Reader and Text Export
// ============================================================================
//
// A WAV file is a RIFF container:
// 1. "RIFF" tag, u32 file size, "WAVE" form type (12 bytes)
// 2. Chunks: 4-byte id, u32 little-endian payload size, payload,
//    plus one pad byte when the size is odd
//
// Only two chunks matter here:
// - "fmt " carries format tag, channels, rate, block align, bit depth
// - "data" carries the samples; its size / block align = frame count
//
// Everything else (LIST, fact, cue, ...) is skipped.
// ============================================================================

use indicatif::{ProgressBar, ProgressStyle};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::error::{HeaderError, PipelineError, Result};

/// Placeholder for the codec name; the header carries only a numeric tag.
pub const COMPRESSION_NAME_PLACEHOLDER: &str = "not available";

/// Suffix appended to the input stem for the exported text file.
pub const INFO_FILE_SUFFIX: &str = "_riff_info.txt";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerInfo {
    pub channels: u16,
    /// Bytes per sample, per channel
    pub sample_width: u16,
    pub frame_rate: u32,
    pub frame_count: u64,
    pub block_align: u16,
    /// 1 = PCM, 3 = IEEE float, 0xFFFE = extensible
    pub format_tag: u16,
}

impl ContainerInfo {
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| PipelineError::container(path, e))?;
        Self::from_reader(BufReader::new(file)).map_err(|e| PipelineError::container(path, e))
    }

    /// Walks the chunk list. `read` attaches the path to any error.
    pub fn from_reader<R: Read + Seek>(mut reader: R) -> std::result::Result<Self, HeaderError> {
        let mut header = [0u8; 12];
        reader.read_exact(&mut header).map_err(HeaderError::Truncated)?;
        if &header[0..4] != b"RIFF" {
            return Err(HeaderError::NotRiff);
        }
        if &header[8..12] != b"WAVE" {
            return Err(HeaderError::NotWave);
        }

        let mut fmt: Option<FmtChunk> = None;
        let mut data_size: Option<u64> = None;

        loop {
            let mut chunk_header = [0u8; 8];
            match reader.read_exact(&mut chunk_header) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => break,
                Err(e) => return Err(e.into()),
            }
            let id = [chunk_header[0], chunk_header[1], chunk_header[2], chunk_header[3]];
            let size = u32::from_le_bytes([
                chunk_header[4],
                chunk_header[5],
                chunk_header[6],
                chunk_header[7],
            ]) as u64;
            let padded = size + (size & 1);

            match &id {
                b"fmt " => {
                    if size < 16 {
                        return Err(HeaderError::FmtTooShort(size));
                    }
                    let mut body = [0u8; 16];
                    reader.read_exact(&mut body)?;
                    fmt = Some(FmtChunk::parse(&body));
                    reader.seek(SeekFrom::Current((padded - 16) as i64))?;
                }
                b"data" => {
                    data_size = Some(size);
                    // data is usually last; stop once fmt has been seen
                    if fmt.is_some() {
                        break;
                    }
                    reader.seek(SeekFrom::Current(padded as i64))?;
                }
                _ => {
                    reader.seek(SeekFrom::Current(padded as i64))?;
                }
            }
        }

        let fmt = fmt.ok_or(HeaderError::MissingFmt)?;
        let data_size = data_size.ok_or(HeaderError::MissingData)?;

        if fmt.channels == 0 {
            return Err(HeaderError::ZeroField("channels"));
        }
        if fmt.block_align == 0 {
            return Err(HeaderError::ZeroField("block align"));
        }

        Ok(Self {
            channels: fmt.channels,
            sample_width: fmt.bits_per_sample.div_ceil(8),
            frame_rate: fmt.sample_rate,
            frame_count: data_size / fmt.block_align as u64,
            block_align: fmt.block_align,
            format_tag: fmt.format_tag,
        })
    }

    /// Key/value pairs in export order.
    pub fn fields(&self) -> [(&'static str, String); 6] {
        [
            ("Channels", self.channels.to_string()),
            ("SampleWidth", self.sample_width.to_string()),
            ("FrameRate", self.frame_rate.to_string()),
            ("NumFrames", self.frame_count.to_string()),
            ("CompressionType", self.block_align.to_string()),
            ("CompressionName", COMPRESSION_NAME_PLACEHOLDER.to_string()),
        ]
    }

    pub fn to_text(&self) -> String {
        self.fields()
            .iter()
            .map(|(key, value)| format!("{key}: {value}\n"))
            .collect()
    }
}

struct FmtChunk {
    format_tag: u16,
    channels: u16,
    sample_rate: u32,
    block_align: u16,
    bits_per_sample: u16,
}

impl FmtChunk {
    fn parse(body: &[u8; 16]) -> Self {
        let u16_at = |i: usize| u16::from_le_bytes([body[i], body[i + 1]]);
        let u32_at = |i: usize| u32::from_le_bytes([body[i], body[i + 1], body[i + 2], body[i + 3]]);
        // bytes 8..12 hold the byte rate, which is derivable and ignored
        Self {
            format_tag: u16_at(0),
            channels: u16_at(2),
            sample_rate: u32_at(4),
            block_align: u16_at(12),
            bits_per_sample: u16_at(14),
        }
    }
}

/// `recording.wav` -> `recording_riff_info.txt` in the same directory.
pub fn info_path_for(wav_path: &Path) -> PathBuf {
    let stem = wav_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    wav_path.with_file_name(format!("{stem}{INFO_FILE_SUFFIX}"))
}

/// Read the header of `wav_path` and write it as `key: value` lines next to
/// it. Returns the header and the path of the text file.
pub fn export_riff_info(wav_path: &Path, show_progress: bool) -> Result<(ContainerInfo, PathBuf)> {
    let info = ContainerInfo::read(wav_path)?;
    let text_path = info_path_for(wav_path);

    let file = File::create(&text_path).map_err(|e| PipelineError::container(&text_path, e))?;
    let mut writer = BufWriter::new(file);

    let fields = info.fields();
    let progress = if show_progress {
        ProgressBar::new(fields.len() as u64)
    } else {
        ProgressBar::hidden()
    };
    if let Ok(style) = ProgressStyle::default_bar().template("{msg}: {bar:30} {pos}/{len}") {
        progress.set_style(style);
    }
    progress.set_message("Exporting RIFF Information");

    for (key, value) in fields.iter() {
        writeln!(writer, "{key}: {value}").map_err(|e| PipelineError::container(&text_path, e))?;
        progress.inc(1);
    }
    writer.flush().map_err(|e| PipelineError::container(&text_path, e))?;
    progress.finish();

    tracing::info!("RIFF information exported to: {}", text_path.display());
    Ok((info, text_path))
}

/// Read back an exported info file for display.
pub fn read_riff_info_text(text_path: &Path) -> Result<String> {
    fs::read_to_string(text_path).map_err(|e| PipelineError::container(text_path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn wav_bytes(channels: u16, rate: u32, bits: u16, frames: u32, extra_chunk: bool) -> Vec<u8> {
        let block_align = channels * bits.div_ceil(8);
        let data_size = frames * block_align as u32;
        let mut out = Vec::new();
        out.extend_from_slice(b"RIFF");
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(b"WAVE");
        if extra_chunk {
            out.extend_from_slice(b"LIST");
            out.extend_from_slice(&3u32.to_le_bytes());
            out.extend_from_slice(&[1, 2, 3, 0]); // odd size + pad byte
        }
        out.extend_from_slice(b"fmt ");
        out.extend_from_slice(&16u32.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&channels.to_le_bytes());
        out.extend_from_slice(&rate.to_le_bytes());
        out.extend_from_slice(&(rate * block_align as u32).to_le_bytes());
        out.extend_from_slice(&block_align.to_le_bytes());
        out.extend_from_slice(&bits.to_le_bytes());
        out.extend_from_slice(b"data");
        out.extend_from_slice(&data_size.to_le_bytes());
        out.extend(std::iter::repeat_n(0u8, data_size as usize));
        out
    }

    #[test]
    fn test_parse_stereo_16bit() {
        let info = ContainerInfo::from_reader(Cursor::new(wav_bytes(2, 48000, 16, 100, false))).unwrap();
        assert_eq!(info.channels, 2);
        assert_eq!(info.sample_width, 2);
        assert_eq!(info.frame_rate, 48000);
        assert_eq!(info.frame_count, 100);
        assert_eq!(info.block_align, 4);
        assert_eq!(info.format_tag, 1);
    }

    #[test]
    fn test_skips_unknown_chunks_with_padding() {
        let info = ContainerInfo::from_reader(Cursor::new(wav_bytes(1, 44100, 24, 7, true))).unwrap();
        assert_eq!(info.sample_width, 3);
        assert_eq!(info.block_align, 3);
        assert_eq!(info.frame_count, 7);
    }

    #[test]
    fn test_rejects_non_riff() {
        let err = ContainerInfo::from_reader(Cursor::new(b"OggS0000WAVE".to_vec())).unwrap_err();
        assert!(matches!(err, HeaderError::NotRiff));
    }

    #[test]
    fn test_rejects_missing_data_chunk() {
        let mut bytes = wav_bytes(1, 8000, 16, 0, false);
        bytes.truncate(bytes.len() - 8); // drop the data chunk header
        let err = ContainerInfo::from_reader(Cursor::new(bytes)).unwrap_err();
        assert!(matches!(err, HeaderError::MissingData));
    }

    #[test]
    fn test_truncated_header_keeps_io_source() {
        use std::error::Error;

        let err = ContainerInfo::from_reader(Cursor::new(b"RIFF".to_vec())).unwrap_err();
        assert!(matches!(err, HeaderError::Truncated(_)));
        let source = err.source().and_then(|s| s.downcast_ref::<std::io::Error>());
        assert_eq!(source.map(|e| e.kind()), Some(std::io::ErrorKind::UnexpectedEof));
    }

    #[test]
    fn test_missing_file_error_chains_to_io() {
        use std::error::Error;

        let err = ContainerInfo::read("/definitely/not/here.wav").unwrap_err();
        let PipelineError::ContainerRead { ref source, .. } = err else {
            panic!("expected ContainerRead, got {err:?}");
        };
        assert!(matches!(source, HeaderError::Io(_)));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_text_field_order() {
        let info = ContainerInfo::from_reader(Cursor::new(wav_bytes(1, 44100, 16, 441000, false))).unwrap();
        let text = info.to_text();
        let keys: Vec<&str> = text.lines().map(|l| l.split(':').next().unwrap()).collect();
        assert_eq!(
            keys,
            ["Channels", "SampleWidth", "FrameRate", "NumFrames", "CompressionType", "CompressionName"]
        );
        assert!(text.contains("FrameRate: 44100\n"));
        assert!(text.contains("NumFrames: 441000\n"));
        assert!(text.ends_with("CompressionName: not available\n"));
    }

    #[test]
    fn test_info_path_replaces_extension() {
        let p = info_path_for(Path::new("/tmp/rec/2023-12-16_21h51m41s.wav"));
        assert_eq!(p, PathBuf::from("/tmp/rec/2023-12-16_21h51m41s_riff_info.txt"));
    }
}
