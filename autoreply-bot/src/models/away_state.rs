use std::fmt;

/// Owner presence as stored in `autoreply_user_away`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AwayState {
    Away,
    /// No stored row means back
    #[default]
    Back,
}

impl From<bool> for AwayState {
    fn from(is_away: bool) -> Self {
        if is_away {
            AwayState::Away
        } else {
            AwayState::Back
        }
    }
}

impl fmt::Display for AwayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AwayState::Away => write!(f, "away"),
            AwayState::Back => write!(f, "back"),
        }
    }
}
