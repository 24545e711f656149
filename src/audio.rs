//! Reads what we can from an uploaded audio file: the decoded duration via
//! symphonia and, as a fallback for missing form fields, the ID3 title and
//! genre.

use std::io::Cursor;

use id3::{Tag, TagLike};
use log::{debug, warn};
use symphonia::core::codecs::CODEC_TYPE_NULL;
use symphonia::core::formats::{FormatOptions, Track};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AudioInfo {
    pub duration_seconds: Option<i32>,
    pub title: Option<String>,
    pub genre: Option<String>,
}

/// Never fails: an unreadable file simply yields an empty `AudioInfo`.
pub fn probe(bytes: &[u8], extension: Option<&str>) -> AudioInfo {
    let tag = match Tag::read_from2(Cursor::new(bytes)) {
        Ok(tag) => Some(tag),
        Err(err) => {
            debug!("No ID3 tag: {}", err);
            None
        }
    };
    let duration_seconds = decoded_duration(bytes, extension).or_else(|| {
        tag.as_ref()
            .and_then(|tag| tag.duration())
            .map(|millis| (millis / 1000) as i32)
    });
    AudioInfo {
        duration_seconds,
        title: tag.as_ref().and_then(|tag| clean(tag.title())),
        genre: tag.as_ref().and_then(|tag| clean(tag.genre())),
    }
}

// Some taggers pad frames with NULs.
fn clean(value: Option<&str>) -> Option<String> {
    let value = value?.replace(char::from(0), "");
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn decoded_duration(bytes: &[u8], extension: Option<&str>) -> Option<i32> {
    let source = MediaSourceStream::new(Box::new(Cursor::new(bytes.to_vec())), Default::default());
    let mut hint = Hint::new();
    if let Some(extension) = extension {
        hint.with_extension(extension);
    }
    let format_opts: FormatOptions = Default::default();
    let metadata_opts: MetadataOptions = Default::default();
    let probed = match symphonia::default::get_probe().format(&hint, source, &format_opts, &metadata_opts) {
        Ok(probed) => probed,
        Err(err) => {
            warn!("Couldn't probe uploaded audio: {}", err);
            return None;
        }
    };
    let track = first_supported_track(probed.format.tracks())?;
    let params = &track.codec_params;
    let time = params.time_base?.calc_time(params.n_frames?);
    Some(time.seconds as i32)
}

fn first_supported_track(tracks: &[Track]) -> Option<&Track> {
    tracks.iter().find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal PCM WAV: 8 kHz mono 8-bit, `seconds` long.
    fn wav(seconds: u32) -> Vec<u8> {
        let rate: u32 = 8000;
        let data_len = rate * seconds;
        let mut out = Vec::new();
        out.extend_from_slice(b"RIFF");
        out.extend_from_slice(&(36 + data_len).to_le_bytes());
        out.extend_from_slice(b"WAVEfmt ");
        out.extend_from_slice(&16u32.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&rate.to_le_bytes());
        out.extend_from_slice(&rate.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&8u16.to_le_bytes());
        out.extend_from_slice(b"data");
        out.extend_from_slice(&data_len.to_le_bytes());
        out.resize(out.len() + data_len as usize, 128);
        out
    }

    #[test]
    fn wav_duration_is_decoded() {
        let info = probe(&wav(3), Some("wav"));
        assert_eq!(info.duration_seconds, Some(3));
        assert_eq!(info.title, None);
    }

    #[test]
    fn garbage_yields_nothing() {
        assert_eq!(probe(b"definitely not audio", Some("mp3")), AudioInfo::default());
    }

    #[test]
    fn nul_padding_is_stripped() {
        assert_eq!(clean(Some("Blue\0\0")), Some("Blue".to_string()));
        assert_eq!(clean(Some("\0")), None);
    }
}
