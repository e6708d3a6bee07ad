use std::fmt;

/// Current level score and the best score seen this session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Scoreboard {
    current: u32,
    high: u32,
}

impl Scoreboard {
    /// Score of the level being played.
    #[must_use]
    pub const fn current(&self) -> u32 {
        self.current
    }

    /// Best score seen this session.
    #[must_use]
    pub const fn high(&self) -> u32 {
        self.high
    }

    pub(crate) fn record(&mut self, score: u32) {
        self.current = score;
        self.high = self.high.max(score);
    }

    pub(crate) fn reset_current(&mut self) {
        self.current = 0;
    }
}

impl fmt::Display for Scoreboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Score: {}  Highscore: {}", self.current, self.high)
    }
}

/// Transient message with the serial of its expiry token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    /// Serial matched against `TimerToken::NoticeExpired`.
    pub serial: u64,
    /// Text shown to the user.
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn high_score_survives_a_reset() {
        let mut board = Scoreboard::default();
        board.record(300);
        board.reset_current();
        board.record(100);
        assert_eq!(board.to_string(), "Score: 100  Highscore: 300");
    }
}
