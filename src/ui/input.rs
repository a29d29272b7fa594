use crate::ui::message::AppMessage;

pub const HELP: &str = "\
go <route> | back | forward
play <id> | toggle | pause | resume | stop [reset] | seek <secs> | vol <0-1>
mute | repeat | shuffle | video | next | prev
click <#id> | state | dom | login <token> | logout | quit";

pub struct InputHandler;

impl InputHandler {
    pub fn handle_line(line: &str) -> Option<AppMessage> {
        let mut words = line.split_whitespace();
        let command = words.next()?;
        let arg = words.next();

        let message = match (command, arg) {
            ("quit" | "exit" | "q", _) => AppMessage::Quit,
            ("help" | "?", _) => AppMessage::Help,
            ("go", Some(route)) => AppMessage::Navigate(route.to_string()),
            ("back", _) => AppMessage::GoBack,
            ("forward", _) => AppMessage::GoForward,
            ("play", Some(id)) => AppMessage::PlayTrack(id.to_string()),
            ("toggle" | "t", _) => AppMessage::TogglePlayPause,
            ("pause", _) => AppMessage::Pause,
            ("resume", _) => AppMessage::Resume,
            ("stop", flag) => AppMessage::Stop {
                reset: flag == Some("reset"),
            },
            ("seek", Some(secs)) => AppMessage::Seek(secs.parse().ok()?),
            ("vol", Some(volume)) => AppMessage::SetVolume(volume.parse().ok()?),
            ("mute", _) => AppMessage::ToggleMute,
            ("repeat", _) => AppMessage::ToggleRepeat,
            ("shuffle", _) => AppMessage::ToggleShuffle,
            ("video", _) => AppMessage::ToggleVideo,
            ("next" | "n", _) => AppMessage::NextTrack,
            ("prev" | "p", _) => AppMessage::PreviousTrack,
            ("click", Some(selector)) => AppMessage::Click(selector.to_string()),
            ("state", _) => AppMessage::ShowState,
            ("dom", _) => AppMessage::ShowDom,
            ("login", Some(token)) => AppMessage::SignIn(token.to_string()),
            ("logout", _) => AppMessage::SignOut,
            _ => return None,
        };
        Some(message)
    }
}
