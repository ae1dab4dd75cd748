//! ID3v2 frames for MP3 files.

use super::Field;
use lofty::TextEncoding;
use lofty::id3::v2::{
    CommentFrame, Frame, FrameId, Id3v2Tag, TextInformationFrame, TimestampFrame,
};
use lofty::tag::items::Timestamp;
use std::borrow::Cow;
use std::ops::RangeInclusive;

/// Language of the comment frame that carries the song language.
const LANGUAGE_COMMENT_LANG: [u8; 3] = *b"eng";

/// Description of the comment frame that carries the song language.
const LANGUAGE_COMMENT_DESCRIPTION: &str = "Language";

/// Years a TDRC timestamp can hold; readers reject anything but four digits.
const TIMESTAMP_YEARS: RangeInclusive<u16> = 1000..=9999;

pub(super) fn frame_id(field: Field) -> &'static str {
    match field {
        Field::Title => "TIT2",
        Field::Artists => "TPE1",
        Field::Album => "TALB",
        Field::Year => "TDRC",
        Field::Composer => "TCOM",
        Field::Genre => "TCON",
        Field::Language => "COMM",
    }
}

fn valid_id(field: Field) -> FrameId<'static> {
    FrameId::Valid(Cow::Borrowed(frame_id(field)))
}

pub(super) fn write_field(tag: &mut Id3v2Tag, field: Field, value: &str) {
    let frame = match field {
        Field::Year => {
            let Some(year) = value
                .parse::<u16>()
                .ok()
                .filter(|year| TIMESTAMP_YEARS.contains(year))
            else {
                log::warn!("Skipping year '{value}': not a four digit year");
                return;
            };
            // Drop any text form of TDRC so only the timestamp remains
            let _ = tag.remove(&valid_id(field));
            Frame::Timestamp(TimestampFrame::new(
                valid_id(field),
                TextEncoding::UTF8,
                Timestamp {
                    year,
                    ..Timestamp::default()
                },
            ))
        }
        // A comment is identified by language and description, so inserting
        // replaces an earlier language comment instead of adding a second one.
        Field::Language => Frame::Comment(CommentFrame::new(
            TextEncoding::UTF8,
            LANGUAGE_COMMENT_LANG,
            LANGUAGE_COMMENT_DESCRIPTION.to_string(),
            value.to_string(),
        )),
        _ => Frame::Text(TextInformationFrame::new(
            valid_id(field),
            TextEncoding::UTF8,
            value.to_string(),
        )),
    };
    tag.insert(frame);
}

pub(super) fn read_field(tag: &Id3v2Tag, field: Field) -> Option<String> {
    match field {
        Field::Language => tag.into_iter().find_map(|frame| match frame {
            Frame::Comment(comment)
                if comment.language == LANGUAGE_COMMENT_LANG
                    && comment.description == LANGUAGE_COMMENT_DESCRIPTION =>
            {
                Some(comment.content.clone())
            }
            _ => None,
        }),
        Field::Year => match tag.get(&valid_id(field))? {
            Frame::Timestamp(frame) => Some(frame.timestamp.year.to_string()),
            Frame::Text(frame) => Some(frame.value.clone()),
            _ => None,
        },
        _ => tag.get_text(&valid_id(field)).map(str::to_string),
    }
}
