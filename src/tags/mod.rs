//! Format-independent tag writing.
//!
//! Every supported container is described by an [`AudioFormat`]. A format
//! knows which tag family it stores ([`TagFamily`]) and how each canonical
//! [`Field`] maps onto a native key of that family. An opened file is
//! represented by a [`TagHandle`] holding the native tag in memory; [`apply`]
//! writes a [`CanonicalMetadata`] record into it and [`file::save`] persists
//! the result.
//!
//! | canonical | ID3 (MP3) | Vorbis (FLAC/OGG/OPUS) | MP4 atom |
//! |---|---|---|---|
//! | title | TIT2 | TITLE | ©nam |
//! | artists | TPE1 | ARTIST | ©ART |
//! | album | TALB | ALBUM | ©alb |
//! | year | TDRC | DATE | ©day |
//! | composer | TCOM | COMPOSER | ©wrt |
//! | genre | TCON | GENRE | ©gen |
//! | language | COMM (eng, "Language") | LANGUAGE | ©lyr ("Language: …") |

use crate::metadata::{CanonicalMetadata, is_digit_year};
use lofty::id3::v2::Id3v2Tag;
use lofty::mp4::Ilst;
use lofty::ogg::VorbisComments;
use std::fmt;
use std::path::Path;

pub mod file;
mod id3;
mod mp4;
mod vorbis;

pub use file::{open, save};

#[derive(Debug, thiserror::Error)]
pub enum TagError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("unreadable container: {0}")]
    Lofty(#[from] lofty::error::LoftyError),
    #[error("unsupported audio format: {0}")]
    UnsupportedFormat(String),
    #[error("tag handle holds {actual} but {format} expects {expected}")]
    FamilyMismatch {
        format: AudioFormat,
        expected: TagFamily,
        actual: TagFamily,
    },
}

/// Container formats that can be tagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioFormat {
    Mp3,
    Flac,
    Mp4,
    Ogg,
    Opus,
}

impl AudioFormat {
    pub const ALL: [AudioFormat; 5] = [
        AudioFormat::Mp3,
        AudioFormat::Flac,
        AudioFormat::Mp4,
        AudioFormat::Ogg,
        AudioFormat::Opus,
    ];

    /// Look up a format by file extension (without the dot, any case).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "mp3" => Some(AudioFormat::Mp3),
            "flac" => Some(AudioFormat::Flac),
            "m4a" | "mp4" => Some(AudioFormat::Mp4),
            "ogg" => Some(AudioFormat::Ogg),
            "opus" => Some(AudioFormat::Opus),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    pub fn label(self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "MP3",
            AudioFormat::Flac => "FLAC",
            AudioFormat::Mp4 => "MP4",
            AudioFormat::Ogg => "OGG",
            AudioFormat::Opus => "OPUS",
        }
    }

    pub fn family(self) -> TagFamily {
        match self {
            AudioFormat::Mp3 => TagFamily::Id3v2,
            AudioFormat::Flac | AudioFormat::Ogg | AudioFormat::Opus => TagFamily::VorbisComments,
            AudioFormat::Mp4 => TagFamily::Mp4Ilst,
        }
    }

    /// Native key used for `field` in this format, for display and logging.
    pub fn native_key(self, field: Field) -> &'static str {
        match self.family() {
            TagFamily::Id3v2 => id3::frame_id(field),
            TagFamily::VorbisComments => vorbis::comment_key(field),
            TagFamily::Mp4Ilst => mp4::atom_name(field),
        }
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Native tag layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagFamily {
    Id3v2,
    VorbisComments,
    Mp4Ilst,
}

impl fmt::Display for TagFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TagFamily::Id3v2 => "ID3v2",
            TagFamily::VorbisComments => "Vorbis comments",
            TagFamily::Mp4Ilst => "MP4 ilst",
        })
    }
}

/// The canonical fields, in write order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Artists,
    Album,
    Year,
    Composer,
    Genre,
    Language,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::Title,
        Field::Artists,
        Field::Album,
        Field::Year,
        Field::Composer,
        Field::Genre,
        Field::Language,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Artists => "artists",
            Field::Album => "album",
            Field::Year => "year",
            Field::Composer => "composer",
            Field::Genre => "genre",
            Field::Language => "language",
        }
    }

    /// Value of this field in `metadata`, if it is present and writable.
    ///
    /// Blank values are treated as absent and years must be all digits.
    pub fn value_in(self, metadata: &CanonicalMetadata) -> Option<&str> {
        let value = match self {
            Field::Title => metadata.title.as_deref(),
            Field::Artists => metadata.artists.as_deref(),
            Field::Album => metadata.album.as_deref(),
            Field::Year => metadata.year.as_deref(),
            Field::Composer => metadata.composer.as_deref(),
            Field::Genre => metadata.genre.as_deref(),
            Field::Language => metadata.language.as_deref(),
        }?;
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        if self == Field::Year && !is_digit_year(value) {
            log::debug!("Dropping non-numeric year '{value}'");
            return None;
        }
        Some(value)
    }
}

/// In-memory native tag of one opened file.
#[derive(Debug, Clone, PartialEq)]
pub enum TagHandle {
    Id3v2(Id3v2Tag),
    Vorbis(VorbisComments),
    Mp4(Ilst),
}

impl TagHandle {
    /// An empty handle of the family `format` stores.
    pub fn empty(format: AudioFormat) -> Self {
        match format.family() {
            TagFamily::Id3v2 => TagHandle::Id3v2(Id3v2Tag::default()),
            TagFamily::VorbisComments => TagHandle::Vorbis(VorbisComments::default()),
            TagFamily::Mp4Ilst => TagHandle::Mp4(Ilst::default()),
        }
    }

    pub fn family(&self) -> TagFamily {
        match self {
            TagHandle::Id3v2(_) => TagFamily::Id3v2,
            TagHandle::Vorbis(_) => TagFamily::VorbisComments,
            TagHandle::Mp4(_) => TagFamily::Mp4Ilst,
        }
    }

    fn write(&mut self, field: Field, value: &str) {
        match self {
            TagHandle::Id3v2(tag) => id3::write_field(tag, field, value),
            TagHandle::Vorbis(comments) => vorbis::write_field(comments, field, value),
            TagHandle::Mp4(ilst) => mp4::write_field(ilst, field, value),
        }
    }

    fn read(&self, field: Field) -> Option<String> {
        match self {
            TagHandle::Id3v2(tag) => id3::read_field(tag, field),
            TagHandle::Vorbis(comments) => vorbis::read_field(comments, field),
            TagHandle::Mp4(ilst) => mp4::read_field(ilst, field),
        }
    }
}

/// Check that `handle` holds the tag family `format` stores.
fn check_family(handle: &TagHandle, format: AudioFormat) -> Result<(), TagError> {
    if handle.family() == format.family() {
        Ok(())
    } else {
        Err(TagError::FamilyMismatch {
            format,
            expected: format.family(),
            actual: handle.family(),
        })
    }
}

/// Write every present field of `metadata` into `handle`.
///
/// Absent fields leave the existing native keys untouched. Returns `false`
/// without modifying anything if `handle` does not belong to `format`.
pub fn apply(handle: &mut TagHandle, format: AudioFormat, metadata: &CanonicalMetadata) -> bool {
    if let Err(e) = check_family(handle, format) {
        log::error!("Unsupported tag layout: {e}");
        return false;
    }

    for field in Field::ALL {
        if let Some(value) = field.value_in(metadata) {
            log::debug!("{format}: {} = {value}", format.native_key(field));
            handle.write(field, value);
        }
    }
    true
}

/// True if the title or artist key is already populated.
pub fn has_existing_tags(handle: &TagHandle, format: AudioFormat) -> bool {
    check_family(handle, format).is_ok()
        && [Field::Title, Field::Artists]
            .into_iter()
            .any(|field| handle.read(field).is_some_and(|v| !v.trim().is_empty()))
}

/// Read one canonical field back from its native key.
pub fn read_field(handle: &TagHandle, format: AudioFormat, field: Field) -> Option<String> {
    check_family(handle, format).ok()?;
    handle.read(field)
}
