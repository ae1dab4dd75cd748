//! iTunes-style `ilst` atoms for MP4/M4A files.

use super::Field;
use lofty::mp4::{Atom, AtomData, AtomIdent, Ilst};

/// Prefix stored in the lyrics atom, which has no dedicated language atom.
const LANGUAGE_PREFIX: &str = "Language: ";

pub(super) fn atom_name(field: Field) -> &'static str {
    match field {
        Field::Title => "©nam",
        Field::Artists => "©ART",
        Field::Album => "©alb",
        Field::Year => "©day",
        Field::Composer => "©wrt",
        Field::Genre => "©gen",
        Field::Language => "©lyr",
    }
}

fn fourcc(field: Field) -> [u8; 4] {
    match field {
        Field::Title => *b"\xa9nam",
        Field::Artists => *b"\xa9ART",
        Field::Album => *b"\xa9alb",
        Field::Year => *b"\xa9day",
        Field::Composer => *b"\xa9wrt",
        Field::Genre => *b"\xa9gen",
        Field::Language => *b"\xa9lyr",
    }
}

pub(super) fn write_field(ilst: &mut Ilst, field: Field, value: &str) {
    let text = match field {
        Field::Language => format!("{LANGUAGE_PREFIX}{value}"),
        _ => value.to_string(),
    };
    ilst.replace_atom(Atom::new(AtomIdent::Fourcc(fourcc(field)), AtomData::UTF8(text)));
}

pub(super) fn read_field(ilst: &Ilst, field: Field) -> Option<String> {
    let text = ilst
        .get(&AtomIdent::Fourcc(fourcc(field)))
        .and_then(|atom| atom.data().next())
        .and_then(|data| match data {
            AtomData::UTF8(text) => Some(text.as_str()),
            _ => None,
        })?;
    match field {
        Field::Language => Some(text.strip_prefix(LANGUAGE_PREFIX).unwrap_or(text).to_string()),
        _ => Some(text.to_string()),
    }
}
