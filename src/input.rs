use crossterm::event::KeyCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiCommand {
    Quit,
    TogglePause,
    NextTicker,
    PrevTicker,
    ToggleSma,
    ToggleRsi,
    ToggleMacd,
    CycleChartStyle,
    CyclePeriod,
    RefreshNow,
}

pub fn parse_key(key_code: &KeyCode) -> Option<UiCommand> {
    match key_code {
        KeyCode::Esc => Some(UiCommand::Quit),
        KeyCode::Right | KeyCode::Tab => Some(UiCommand::NextTicker),
        KeyCode::Left | KeyCode::BackTab => Some(UiCommand::PrevTicker),
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'q' => Some(UiCommand::Quit),
            'p' => Some(UiCommand::TogglePause),
            'l' => Some(UiCommand::NextTicker),
            'h' => Some(UiCommand::PrevTicker),
            's' => Some(UiCommand::ToggleSma),
            'r' => Some(UiCommand::ToggleRsi),
            'm' => Some(UiCommand::ToggleMacd),
            'c' => Some(UiCommand::CycleChartStyle),
            't' => Some(UiCommand::CyclePeriod),
            'f' => Some(UiCommand::RefreshNow),
            _ => None,
        },
        _ => None,
    }
}
