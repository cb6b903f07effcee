use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::{TrainerError, TrainerResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rank {
    Two = 2,
    Three = 3,
    Four = 4,
    Five = 5,
    Six = 6,
    Seven = 7,
    Eight = 8,
    Nine = 9,
    Ten = 10,
    Jack = 11,
    Queen = 12,
    King = 13,
    Ace = 14,
}

impl Rank {
    pub fn from_char(c: char) -> TrainerResult<Rank> {
        match c {
            '2' => Ok(Rank::Two),
            '3' => Ok(Rank::Three),
            '4' => Ok(Rank::Four),
            '5' => Ok(Rank::Five),
            '6' => Ok(Rank::Six),
            '7' => Ok(Rank::Seven),
            '8' => Ok(Rank::Eight),
            '9' => Ok(Rank::Nine),
            'T' => Ok(Rank::Ten),
            'J' => Ok(Rank::Jack),
            'Q' => Ok(Rank::Queen),
            'K' => Ok(Rank::King),
            'A' => Ok(Rank::Ace),
            _ => Err(TrainerError::InvalidRank(c.to_string())),
        }
    }

    /// Accepts solver characters (`A`, `T`, `9`), `10`, and the table-picker
    /// labels (`As`, `Roi`, `Dame`, `Valet`).
    pub fn from_label(label: &str) -> Option<Rank> {
        let label = label.trim();
        match label {
            "As" => return Some(Rank::Ace),
            "Roi" | "R" => return Some(Rank::King),
            "Dame" | "D" => return Some(Rank::Queen),
            "Valet" | "V" => return Some(Rank::Jack),
            "10" => return Some(Rank::Ten),
            _ => {}
        }
        let mut chars = label.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Rank::from_char(c.to_ascii_uppercase()).ok(),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Rank::Two => '2',
            Rank::Three => '3',
            Rank::Four => '4',
            Rank::Five => '5',
            Rank::Six => '6',
            Rank::Seven => '7',
            Rank::Eight => '8',
            Rank::Nine => '9',
            Rank::Ten => 'T',
            Rank::Jack => 'J',
            Rank::Queen => 'Q',
            Rank::King => 'K',
            Rank::Ace => 'A',
        }
    }

    pub fn value(self) -> u8 {
        self as u8
    }

    /// Position in the descending rank order counted from the bottom:
    /// A=13 ... 2=1.
    pub fn strength(self) -> u32 {
        u32::from(self.value()) - 1
    }
}

/// Ranks from ace down to deuce, the row/column order of a hand grid.
pub const RANKS_DESC: [Rank; 13] = [
    Rank::Ace,
    Rank::King,
    Rank::Queen,
    Rank::Jack,
    Rank::Ten,
    Rank::Nine,
    Rank::Eight,
    Rank::Seven,
    Rank::Six,
    Rank::Five,
    Rank::Four,
    Rank::Three,
    Rank::Two,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Suit {
    Spades,
    Hearts,
    Diamonds,
    Clubs,
}

impl Suit {
    pub fn from_char(c: char) -> TrainerResult<Suit> {
        match c.to_ascii_lowercase() {
            's' => Ok(Suit::Spades),
            'h' => Ok(Suit::Hearts),
            'd' => Ok(Suit::Diamonds),
            'c' => Ok(Suit::Clubs),
            _ => Err(TrainerError::InvalidSuit(c)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Card {
        Card { rank, suit }
    }
}

pub fn parse_card(notation: &str) -> TrainerResult<Card> {
    let notation = notation.trim();
    let chars: Vec<char> = notation.chars().collect();
    if chars.len() != 2 {
        return Err(TrainerError::InvalidCardNotation(notation.to_string()));
    }
    let rank = Rank::from_char(chars[0].to_ascii_uppercase())?;
    let suit = Suit::from_char(chars[1])?;
    Ok(Card::new(rank, suit))
}

/// Collapses two concrete hole cards into their hand code.
pub fn simplify_hand(cards: &[Card]) -> TrainerResult<HandCode> {
    if cards.len() != 2 {
        return Err(TrainerError::InvalidHandNotation(format!(
            "expected 2 cards, got {}",
            cards.len()
        )));
    }
    let (c1, c2) = (cards[0], cards[1]);
    if c1 == c2 {
        return Err(TrainerError::InvalidHandNotation(
            "duplicate card in hand".to_string(),
        ));
    }
    Ok(HandCode::from_ranks(c1.rank, c2.rank, c1.suit == c2.suit))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Shape {
    Pair,
    Suited,
    Offsuit,
}

/// A starting hand reduced to its 169-class form: `AA`, `AKs`, `AKo`.
///
/// The high rank is always stored first. Ordering follows the grid: pairs and
/// suited/offsuit pairs by descending high then low rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HandCode {
    high: Rank,
    low: Rank,
    shape: Shape,
}

impl HandCode {
    /// Builds the canonical code for two ranks. Pairs ignore `suited`.
    pub fn from_ranks(a: Rank, b: Rank, suited: bool) -> HandCode {
        let (high, low) = if a >= b { (a, b) } else { (b, a) };
        let shape = if high == low {
            Shape::Pair
        } else if suited {
            Shape::Suited
        } else {
            Shape::Offsuit
        };
        HandCode { high, low, shape }
    }

    pub fn high(&self) -> Rank {
        self.high
    }

    pub fn low(&self) -> Rank {
        self.low
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn is_pair(&self) -> bool {
        self.shape == Shape::Pair
    }

    pub fn is_suited(&self) -> bool {
        self.shape == Shape::Suited
    }

    /// Number of concrete two-card combos behind this code.
    pub fn combos(&self) -> u32 {
        match self.shape {
            Shape::Pair => 6,
            Shape::Suited => 4,
            Shape::Offsuit => 12,
        }
    }
}

impl Ord for HandCode {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .high
            .cmp(&self.high)
            .then(other.low.cmp(&self.low))
            .then(self.shape.cmp(&other.shape))
    }
}

impl PartialOrd for HandCode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for HandCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suffix = match self.shape {
            Shape::Pair => "",
            Shape::Suited => "s",
            Shape::Offsuit => "o",
        };
        write!(f, "{}{}{}", self.high.to_char(), self.low.to_char(), suffix)
    }
}

impl FromStr for HandCode {
    type Err = TrainerError;

    fn from_str(notation: &str) -> TrainerResult<HandCode> {
        let invalid = || TrainerError::InvalidHandNotation(notation.to_string());
        let chars: Vec<char> = notation.trim().chars().collect();
        match chars.as_slice() {
            [a, b] if a == b => {
                let rank = Rank::from_char(*a).map_err(|_| invalid())?;
                Ok(HandCode::from_ranks(rank, rank, false))
            }
            [a, b, kind] if a != b && (*kind == 's' || *kind == 'o') => {
                let r1 = Rank::from_char(*a).map_err(|_| invalid())?;
                let r2 = Rank::from_char(*b).map_err(|_| invalid())?;
                // Solver codes always list the high rank first.
                if r1 < r2 {
                    return Err(invalid());
                }
                Ok(HandCode::from_ranks(r1, r2, *kind == 's'))
            }
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for HandCode {
    type Error = TrainerError;

    fn try_from(value: String) -> TrainerResult<HandCode> {
        value.parse()
    }
}

impl From<HandCode> for String {
    fn from(code: HandCode) -> String {
        code.to_string()
    }
}

/// Canonicalizes two rank labels and a suited flag into a hand code.
///
/// Returns `None` when either rank label is unrecognised.
pub fn canonicalize(rank_a: &str, rank_b: &str, is_suited: bool) -> Option<HandCode> {
    let a = Rank::from_label(rank_a)?;
    let b = Rank::from_label(rank_b)?;
    Some(HandCode::from_ranks(a, b, is_suited))
}

/// Parses any supported hand input: a hand code (`AKs`, `TT`), or two
/// concrete cards (`AhKh`).
pub fn parse_hand(notation: &str) -> TrainerResult<HandCode> {
    let compact = notation.trim().replace(' ', "");
    if let Ok(code) = compact.parse::<HandCode>() {
        return Ok(code);
    }
    if compact.len() == 4 && compact.is_ascii() {
        let c1 = parse_card(&compact[..2])?;
        let c2 = parse_card(&compact[2..])?;
        return simplify_hand(&[c1, c2]);
    }
    Err(TrainerError::InvalidHandNotation(notation.to_string()))
}

/// All 169 hand codes in grid order (AA, AKs, AKo, AQs, ... 22).
pub static ALL_HANDS: Lazy<Vec<HandCode>> = Lazy::new(|| {
    let mut hands = Vec::with_capacity(169);
    for (i, &high) in RANKS_DESC.iter().enumerate() {
        for &low in &RANKS_DESC[i..] {
            if high == low {
                hands.push(HandCode::from_ranks(high, low, false));
            } else {
                hands.push(HandCode::from_ranks(high, low, true));
                hands.push(HandCode::from_ranks(high, low, false));
            }
        }
    }
    hands
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_hands_is_169_unique_sorted() {
        assert_eq!(ALL_HANDS.len(), 169);
        let mut sorted = ALL_HANDS.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted, *ALL_HANDS);
        assert_eq!(ALL_HANDS[0].to_string(), "AA");
        assert_eq!(ALL_HANDS[1].to_string(), "AKs");
        assert_eq!(ALL_HANDS[168].to_string(), "22");
    }

    #[test]
    fn hand_code_rejects_low_first() {
        assert!("KAs".parse::<HandCode>().is_err());
        assert!("AKx".parse::<HandCode>().is_err());
        assert!("AAs".parse::<HandCode>().is_err());
    }

    #[test]
    fn strength_runs_from_one_to_thirteen() {
        assert_eq!(Rank::Ace.strength(), 13);
        assert_eq!(Rank::Two.strength(), 1);
    }
}
