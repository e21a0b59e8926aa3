use crate::mpris::MprisHandle;
use crate::session::{PlaybackInfo, PlaybackState};

/// Last snapshot pushed to MPRIS, so unchanged state is not re-sent every frame.
#[derive(Debug, Default)]
pub struct MprisSync {
    last: Option<(PlaybackState, Option<String>, usize, f32)>,
}

impl MprisSync {
    /// Push `info` to MPRIS if anything it reports has changed.
    /// Returns whether an update happened.
    pub fn sync(&mut self, mpris: &MprisHandle, info: &PlaybackInfo) -> bool {
        let track = info.track.as_ref().or(info.loading.as_ref());
        let key = (
            info.state,
            track.map(|t| t.id.clone()),
            info.cursor,
            info.volume,
        );
        if self.last.as_ref() == Some(&key) {
            return false;
        }
        mpris.update(info);
        self.last = Some(key);
        true
    }
}
