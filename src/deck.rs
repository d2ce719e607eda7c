//! The photo cards shown on the scratch screen
//!
//! The same three cards double as the game's characters and emoji types.

use serde::Serialize;

/// A single photo card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Card {
    pub id: &'static str,
    /// Photo URL
    pub image: &'static str,
    /// Caption shown once the card is revealed
    pub caption: &'static str,
    /// Emoji appended to the caption
    pub emoji: &'static str,
    /// CSS class for the caption emoji animation
    pub emoji_class: &'static str,
    /// Emoji this card's character collects in the game
    pub lane_emoji: &'static str,
    /// Label for the character selector button
    pub aria_label: &'static str,
}

pub const CARDS: [Card; 3] = [
    Card {
        id: "card1",
        image: "/isliye-manjao/saree.jpeg",
        caption: "Cause she in Saree is all the fireworks I ever need",
        emoji: "🎆",
        emoji_class: "fireworks",
        lane_emoji: "🎆",
        aria_label: "saree",
    },
    Card {
        id: "card2",
        image: "/isliye-manjao/wow.jpeg",
        caption: "Cause she always blows my hosh away",
        emoji: "🤯",
        emoji_class: "wow",
        lane_emoji: "🤯",
        aria_label: "wow",
    },
    Card {
        id: "card3",
        image: "/isliye-manjao/eyes.jpg",
        caption: "Cause she is the most beautiful thing I could watch forever",
        emoji: "👀",
        emoji_class: "eyes",
        lane_emoji: "👀",
        aria_label: "eyes",
    },
];

/// Card at `index`, falling back to the first card for out-of-range indices
pub fn card(index: usize) -> &'static Card {
    CARDS.get(index).unwrap_or(&CARDS[0])
}

/// Position of the card with the given id
pub fn index_of(id: &str) -> Option<usize> {
    CARDS.iter().position(|c| c.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_unique() {
        for (i, a) in CARDS.iter().enumerate() {
            for b in &CARDS[i + 1..] {
                assert_ne!(a.id, b.id);
                assert_ne!(a.lane_emoji, b.lane_emoji);
            }
        }
    }

    #[test]
    fn test_card_fallback() {
        assert_eq!(card(1).id, "card2");
        assert_eq!(card(99).id, "card1");
        assert_eq!(index_of("card3"), Some(2));
        assert_eq!(index_of("nope"), None);
    }
}
