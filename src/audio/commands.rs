/// What a bound DOM control asks the controller to do.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerCommand {
    PlayTrack(String),
    TogglePlay,
    SeekPercent(f64),
    SetVolume(f64),
    ToggleMute,
    ToggleRepeat,
    ToggleShuffle,
    ToggleVideo,
    Next,
    Previous,
}
