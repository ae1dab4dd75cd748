//! Prompt text shared by every provider.

/// System role for providers that take one separately from the user prompt.
pub const SYSTEM_PROMPT: &str = "You are a music metadata expert. You identify songs from \
their titles and answer only with a single flat JSON object.";

const INSTRUCTIONS: &str = r#"Please provide the following information:
- Title: The full and correct title of the song
- Artists: The performers/singers of the song (as a comma-separated string, not an array)
- Album: The album name or compilation it's from
- Year: The release year (as a number)
- Composer: The composer/producer/music director
- Genre: The primary genre of the song
- Language: The language of the song's lyrics (if applicable)

Return your response ONLY as a JSON object with the keys "title", "artists", "album", "year", "composer", "genre" and "language". If you are uncertain about a field, give your best guess. If you cannot determine a field at all, use null for its value.

Example 1 (English song):
{
  "title": "Yesterday",
  "artists": "The Beatles",
  "album": "Help!",
  "year": 1965,
  "composer": "John Lennon, Paul McCartney",
  "genre": "Rock",
  "language": "English"
}

Example 2 (Hindi song):
{
  "title": "Tum Hi Ho",
  "artists": "Arijit Singh",
  "album": "Aashiqui 2",
  "year": 2013,
  "composer": "Mithoon",
  "genre": "Indian Pop",
  "language": "Hindi"
}"#;

/// Build the user prompt asking for metadata of `song_name`.
pub fn build_prompt(song_name: &str) -> String {
    format!("I need detailed metadata for the song titled \"{song_name}\".\n\n{INSTRUCTIONS}\n")
}
