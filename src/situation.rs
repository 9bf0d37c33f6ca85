use itertools::Itertools;

use crate::form::FormError;

/// Placeholder rendered in place of the board before any community cards are dealt.
pub const PREFLOP_SENTINEL: &str = "this is preflop";

pub const MIN_OPPONENTS: usize = 1;
pub const MAX_OPPONENTS: usize = 5;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Opponent {
    pub bet: String,
    pub position: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpponentField {
    Bet,
    Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SituationField {
    PotSize,
    HandCards,
    Position,
    CommunityCards,
}

/// Everything the user has entered about the hand being analysed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandSituation {
    pub pot_size: String,
    pub community_cards: String,
    pub hand_cards: String,
    pub position: String,
    pub is_preflop: bool,
    opponents: Vec<Opponent>,
}

impl Default for HandSituation {
    fn default() -> Self {
        Self {
            pot_size: String::new(),
            community_cards: String::new(),
            hand_cards: String::new(),
            position: String::new(),
            is_preflop: false,
            opponents: vec![Opponent::default()],
        }
    }
}

impl HandSituation {
    pub fn opponents(&self) -> &[Opponent] {
        &self.opponents
    }

    pub fn opponent_count(&self) -> usize {
        self.opponents.len()
    }

    pub fn set_field(&mut self, field: SituationField, value: impl Into<String>) {
        let value = value.into();
        match field {
            SituationField::PotSize => self.pot_size = value,
            SituationField::HandCards => self.hand_cards = value,
            SituationField::Position => self.position = value,
            SituationField::CommunityCards => self.community_cards = value,
        }
    }

    pub fn set_preflop(&mut self, flag: bool) {
        self.is_preflop = flag;
    }

    /// Replaces the opponent list with `count` empty entries. Previously
    /// entered opponent text is discarded even when the count is unchanged.
    pub fn set_opponent_count(&mut self, count: usize) -> Result<(), FormError> {
        if !(MIN_OPPONENTS..=MAX_OPPONENTS).contains(&count) {
            return Err(FormError::OpponentCount(count));
        }
        self.opponents = vec![Opponent::default(); count];
        Ok(())
    }

    pub fn set_opponent_field(
        &mut self,
        index: usize,
        field: OpponentField,
        value: impl Into<String>,
    ) -> Result<(), FormError> {
        let len = self.opponents.len();
        let opponent = self
            .opponents
            .get_mut(index)
            .ok_or(FormError::OpponentIndex { index, len })?;
        match field {
            OpponentField::Bet => opponent.bet = value.into(),
            OpponentField::Position => opponent.position = value.into(),
        }
        Ok(())
    }

    /// Names of required inputs that are still blank. The board is only
    /// required once the hand is past preflop.
    pub fn missing_fields(&self) -> Vec<String> {
        let mut missing = Vec::new();
        let mut require = |label: String, value: &str| {
            if value.trim().is_empty() {
                missing.push(label);
            }
        };

        require("pot size".to_string(), &self.pot_size);
        require("position".to_string(), &self.position);
        if !self.is_preflop {
            require("community cards".to_string(), &self.community_cards);
        }
        require("hand cards".to_string(), &self.hand_cards);
        for (idx, opponent) in self.opponents.iter().enumerate() {
            require(format!("opponent {} bet", idx + 1), &opponent.bet);
            require(format!("opponent {} position", idx + 1), &opponent.position);
        }

        missing
    }

    pub fn board_label(&self) -> &str {
        if self.is_preflop {
            PREFLOP_SENTINEL
        } else {
            &self.community_cards
        }
    }
}

/// Renders the situation as the plain-text block sent to the advice endpoint.
pub fn format_situation(situation: &HandSituation) -> String {
    let opponents = situation
        .opponents
        .iter()
        .enumerate()
        .map(|(idx, opponent)| {
            format!(
                "Opponent {}: Bet - {}, Position - {}",
                idx + 1,
                opponent.bet,
                opponent.position
            )
        })
        .join("\n");

    format!(
        "Total Pot Size: {}\nCommunity Cards: {}\nMy Hand Cards: {}\nMy Position: {}\nIs Preflop: {}\nOpponents: {}",
        situation.pot_size,
        situation.board_label(),
        situation.hand_cards,
        situation.position,
        situation.is_preflop,
        opponents
    )
}
