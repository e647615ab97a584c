//! Domain types for the Cadenza listener

mod ids;
mod page;
mod play_mode;
mod track;

pub use ids::TrackId;
pub use page::{Page, PageQuery, PaginationSnapshot, DEFAULT_PAGE, DEFAULT_PAGE_SIZE};
pub use play_mode::{PlayMode, DEFAULT_PLAY_MODE};
pub use track::{MusicStatus, PlayInfo, Track, TrackDetail};

/// Volume used when nothing has been persisted yet
pub const DEFAULT_VOLUME: f32 = 0.7;

/// Deserialize `null` the same as a missing field.
///
/// The catalog serializes absent numbers and flags as `null` rather than
/// omitting them.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + serde::Deserialize<'de>,
{
    use serde::Deserialize;
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
