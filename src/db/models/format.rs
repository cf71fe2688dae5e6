use serde::{Deserialize, Serialize};

/// Media category attached to sources and log entries.
///
/// Serialized names match the persisted record format, so `TvShow` reads and
/// writes as `"TV Show"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Format {
    Book,
    Movie,
    #[serde(rename = "TV Show")]
    TvShow,
    Music,
    #[serde(rename = "Video Game")]
    VideoGame,
    Podcast,
    Article,
    Video,
}

impl Format {
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Book => "Book",
            Format::Movie => "Movie",
            Format::TvShow => "TV Show",
            Format::Music => "Music",
            Format::VideoGame => "Video Game",
            Format::Podcast => "Podcast",
            Format::Article => "Article",
            Format::Video => "Video",
        }
    }
}
