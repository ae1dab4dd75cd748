//! Vorbis comments, shared by FLAC, Ogg Vorbis and Opus.

use super::Field;
use lofty::ogg::VorbisComments;

pub(super) fn comment_key(field: Field) -> &'static str {
    match field {
        Field::Title => "TITLE",
        Field::Artists => "ARTIST",
        Field::Album => "ALBUM",
        Field::Year => "DATE",
        Field::Composer => "COMPOSER",
        Field::Genre => "GENRE",
        Field::Language => "LANGUAGE",
    }
}

pub(super) fn write_field(comments: &mut VorbisComments, field: Field, value: &str) {
    // `insert` drops every earlier value stored under the key
    comments.insert(comment_key(field).to_string(), value.to_string());
}

pub(super) fn read_field(comments: &VorbisComments, field: Field) -> Option<String> {
    comments.get(comment_key(field)).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiple_artist_values_collapsed() {
        let mut comments = VorbisComments::default();
        comments.push("ARTIST".to_string(), "First".to_string());
        comments.push("ARTIST".to_string(), "Second".to_string());

        write_field(&mut comments, Field::Artists, "First, Second");

        assert_eq!(comments.get_all("ARTIST").count(), 1);
        assert_eq!(
            read_field(&comments, Field::Artists).as_deref(),
            Some("First, Second")
        );
    }

    #[test]
    fn test_unrelated_comments_kept() {
        let mut comments = VorbisComments::default();
        comments.push("TRACKNUMBER".to_string(), "3".to_string());

        write_field(&mut comments, Field::Title, "Tum Hi Ho");

        assert_eq!(comments.get("TRACKNUMBER"), Some("3"));
        assert_eq!(comments.get("TITLE"), Some("Tum Hi Ho"));
    }
}
