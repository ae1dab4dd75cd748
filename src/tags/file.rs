use super::{AudioFormat, TagError, TagHandle, check_family};
use lofty::config::{ParseOptions, ParsingMode, WriteOptions};
use lofty::file::AudioFile;
use lofty::flac::FlacFile;
use lofty::mp4::Mp4File;
use lofty::mpeg::MpegFile;
use lofty::ogg::{OpusFile, VorbisFile};
use std::fs::{File, OpenOptions};
use std::io::{Seek, SeekFrom};
use std::path::Path;

fn parse_options() -> ParseOptions {
    ParseOptions::new()
        .parsing_mode(ParsingMode::BestAttempt)
        .read_properties(false)
}

/// Read the native tag of `path`, or an empty one if the file has none.
pub fn open(path: &Path, format: AudioFormat) -> Result<TagHandle, TagError> {
    let mut file = File::open(path)?;
    let handle = match format {
        AudioFormat::Mp3 => {
            let mpeg = <MpegFile as AudioFile>::read_from(&mut file, parse_options())?;
            TagHandle::Id3v2(mpeg.id3v2().cloned().unwrap_or_default())
        }
        AudioFormat::Flac => {
            let flac = <FlacFile as AudioFile>::read_from(&mut file, parse_options())?;
            TagHandle::Vorbis(flac.vorbis_comments().cloned().unwrap_or_default())
        }
        AudioFormat::Mp4 => {
            let mp4 = <Mp4File as AudioFile>::read_from(&mut file, parse_options())?;
            TagHandle::Mp4(mp4.ilst().cloned().unwrap_or_default())
        }
        AudioFormat::Ogg => {
            let ogg = <VorbisFile as AudioFile>::read_from(&mut file, parse_options())?;
            TagHandle::Vorbis(ogg.vorbis_comments().clone())
        }
        AudioFormat::Opus => {
            let opus = <OpusFile as AudioFile>::read_from(&mut file, parse_options())?;
            TagHandle::Vorbis(opus.vorbis_comments().clone())
        }
    };
    Ok(handle)
}

/// Replace the native tag of `path` with `handle`, leaving the audio intact.
pub fn save(path: &Path, format: AudioFormat, handle: &TagHandle) -> Result<(), TagError> {
    check_family(handle, format)?;

    let mut file = OpenOptions::new().read(true).write(true).open(path)?;
    match (format, handle) {
        (AudioFormat::Mp3, TagHandle::Id3v2(tag)) => {
            let mut mpeg = <MpegFile as AudioFile>::read_from(&mut file, parse_options())?;
            mpeg.set_id3v2(tag.clone());
            file.seek(SeekFrom::Start(0))?;
            mpeg.save_to(&mut file, WriteOptions::default())?;
        }
        (AudioFormat::Flac, TagHandle::Vorbis(comments)) => {
            let mut flac = <FlacFile as AudioFile>::read_from(&mut file, parse_options())?;
            flac.set_vorbis_comments(comments.clone());
            file.seek(SeekFrom::Start(0))?;
            flac.save_to(&mut file, WriteOptions::default())?;
        }
        (AudioFormat::Mp4, TagHandle::Mp4(ilst)) => {
            let mut mp4 = <Mp4File as AudioFile>::read_from(&mut file, parse_options())?;
            mp4.set_ilst(ilst.clone());
            file.seek(SeekFrom::Start(0))?;
            mp4.save_to(&mut file, WriteOptions::default())?;
        }
        (AudioFormat::Ogg, TagHandle::Vorbis(comments)) => {
            let mut ogg = <VorbisFile as AudioFile>::read_from(&mut file, parse_options())?;
            *ogg.vorbis_comments_mut() = comments.clone();
            file.seek(SeekFrom::Start(0))?;
            ogg.save_to(&mut file, WriteOptions::default())?;
        }
        (AudioFormat::Opus, TagHandle::Vorbis(comments)) => {
            let mut opus = <OpusFile as AudioFile>::read_from(&mut file, parse_options())?;
            *opus.vorbis_comments_mut() = comments.clone();
            file.seek(SeekFrom::Start(0))?;
            opus.save_to(&mut file, WriteOptions::default())?;
        }
        // check_family rules out every other pairing
        (format, _) => return Err(TagError::UnsupportedFormat(format.to_string())),
    }
    Ok(())
}
