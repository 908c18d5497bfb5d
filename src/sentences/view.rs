use once_cell::unsync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::subtitle_processor::Cue;
use super::normalizer::{normalize_to_sentences, NormalizeOptions, SentenceCard};

// @module: Owned cue list with lazily derived sentence cards

/// A card's text plus its neighbours, as sent to the analysis service
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SentenceContext {
    /// The sentence to analyse
    pub text: String,
    /// Text of the previous card, empty for the first card
    pub prev: String,
    /// Text of the next card, empty for the last card
    pub next: String,
}

impl SentenceContext {
    /// Creates a context from the three texts
    pub fn new(text: impl Into<String>, prev: impl Into<String>, next: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            prev: prev.into(),
            next: next.into(),
        }
    }

    /// Context for `cards[index]`, if the index exists
    pub fn from_cards(cards: &[SentenceCard], index: usize) -> Option<Self> {
        let card = cards.get(index)?;
        let prev = index
            .checked_sub(1)
            .and_then(|i| cards.get(i))
            .map(|c| c.text.clone())
            .unwrap_or_default();
        let next = cards.get(index + 1).map(|c| c.text.clone()).unwrap_or_default();

        Some(Self::new(card.text.clone(), prev, next))
    }
}

// @struct: Cue list plus cached cards; any mutation drops the cache
#[derive(Debug, Default)]
pub struct SentenceView {
    cues: Vec<Cue>,
    options: NormalizeOptions,
    cards: OnceCell<Vec<SentenceCard>>,
}

impl SentenceView {
    /// Creates a view over `cues`
    pub fn new(cues: Vec<Cue>, options: NormalizeOptions) -> Self {
        Self {
            cues,
            options,
            cards: OnceCell::new(),
        }
    }

    pub fn cues(&self) -> &[Cue] {
        &self.cues
    }

    pub fn options(&self) -> &NormalizeOptions {
        &self.options
    }

    /// Replace the cue list (a newly loaded file)
    pub fn set_cues(&mut self, cues: Vec<Cue>) {
        self.cues = cues;
        self.cards = OnceCell::new();
    }

    /// Replace the heuristic options
    pub fn set_options(&mut self, options: NormalizeOptions) {
        self.options = options;
        self.cards = OnceCell::new();
    }

    /// Cards for the current cues, computed on first access
    pub fn cards(&self) -> &[SentenceCard] {
        self.cards
            .get_or_init(|| normalize_to_sentences(&self.cues, &self.options))
    }

    /// Whether cards are currently cached
    pub fn is_computed(&self) -> bool {
        self.cards.get().is_some()
    }

    /// Analysis context for the card at `index`
    pub fn context_for(&self, index: usize) -> Option<SentenceContext> {
        SentenceContext::from_cards(self.cards(), index)
    }

    /// Position of the card with `card_id`
    pub fn index_of(&self, card_id: usize) -> Option<usize> {
        self.cards().iter().position(|card| card.id == card_id)
    }

    /// Latest cue end time in milliseconds
    pub fn total_duration_ms(&self) -> u64 {
        self.cues.iter().map(Cue::end_ms).max().unwrap_or(0)
    }

    /// Cards whose text contains `query`, ignoring case
    pub fn search(&self, query: &str) -> Vec<&SentenceCard> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        self.cards()
            .iter()
            .filter(|card| card.text.to_lowercase().contains(&needle))
            .collect()
    }
}
