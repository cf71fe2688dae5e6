pub mod format;
pub mod media_entry;
pub mod rating;
pub mod source;

pub use format::Format;
pub use media_entry::{MediaEntry, MediaEntryDraft};
pub use rating::{HappinessRating, WriteOutcome, MAX_HAPPINESS, MIN_HAPPINESS};
pub use source::Source;
