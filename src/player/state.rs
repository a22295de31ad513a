/// Current track index and playing flag, mutated only on the playback
/// thread.
///
/// `playing` is true only while a session exists and has been started;
/// `current` is a valid catalog index whenever the catalog is non-empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaybackState {
    pub current: Option<usize>,
    pub playing: bool,
}
