#[derive(Debug, Clone, PartialEq)]
pub enum AppMessage {
    Quit,
    Help,

    // Navigation
    Navigate(String),
    GoBack,
    GoForward,

    // Playback
    PlayTrack(String),
    TogglePlayPause,
    Pause,
    Resume,
    Stop { reset: bool },
    Seek(f64),
    SetVolume(f64),
    ToggleMute,
    ToggleRepeat,
    ToggleShuffle,
    ToggleVideo,
    NextTrack,
    PreviousTrack,

    // Document
    Click(String),
    ShowState,
    ShowDom,

    // Session
    SignIn(String),
    SignOut,
}
