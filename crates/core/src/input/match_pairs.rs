use std::collections::BTreeMap;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::model::{AnswerPayload, ChallengeOption, OptionId};

/// Two-column click-to-pair state.
///
/// Left items are options carrying a `match_text`; the right column holds
/// those texts in a shuffled order fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchPairsInput {
    left: Vec<(OptionId, String)>,
    right: Vec<String>,
    active_left: Option<OptionId>,
    pairs: BTreeMap<OptionId, usize>,
}

impl MatchPairsInput {
    /// Returns `None` when no option defines a partner.
    pub fn new<R: Rng + ?Sized>(options: &[ChallengeOption], rng: &mut R) -> Option<Self> {
        let left: Vec<(OptionId, String)> = options
            .iter()
            .filter(|option| option.match_text.is_some())
            .map(|option| (option.id, option.text.clone()))
            .collect();
        if left.is_empty() {
            return None;
        }
        let mut right: Vec<String> = options
            .iter()
            .filter_map(|option| option.match_text.clone())
            .collect();
        right.shuffle(rng);
        Some(Self {
            left,
            right,
            active_left: None,
            pairs: BTreeMap::new(),
        })
    }

    #[must_use]
    pub fn left(&self) -> &[(OptionId, String)] {
        &self.left
    }

    #[must_use]
    pub fn right(&self) -> &[String] {
        &self.right
    }

    #[must_use]
    pub fn active_left(&self) -> Option<OptionId> {
        self.active_left
    }

    /// Right-column index paired with `left`, if any.
    #[must_use]
    pub fn partner_of(&self, left: OptionId) -> Option<usize> {
        self.pairs.get(&left).copied()
    }

    /// Left item currently holding right-column `index`, if any.
    #[must_use]
    pub fn owner_of(&self, index: usize) -> Option<OptionId> {
        self.pairs
            .iter()
            .find_map(|(left, right)| (*right == index).then_some(*left))
    }

    /// Arms a left item; clicking the armed item again disarms it.
    pub fn select_left(&mut self, id: OptionId) {
        if !self.left.iter().any(|(left, _)| *left == id) {
            return;
        }
        self.active_left = if self.active_left == Some(id) {
            None
        } else {
            Some(id)
        };
    }

    /// Pairs the armed left item with right-column `index`.
    ///
    /// A right item already used by another left item moves to the armed one.
    /// Returns whether a pairing was made.
    pub fn select_right(&mut self, index: usize) -> bool {
        let Some(left) = self.active_left else {
            return false;
        };
        if index >= self.right.len() {
            return false;
        }
        self.pairs.retain(|_, right| *right != index);
        self.pairs.insert(left, index);
        self.active_left = None;
        true
    }

    pub fn unpair(&mut self, left: OptionId) {
        self.pairs.remove(&left);
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.left.iter().all(|(id, _)| self.pairs.contains_key(id))
    }

    #[must_use]
    pub fn to_answer_payload(&self) -> Option<AnswerPayload> {
        if !self.is_complete() {
            return None;
        }
        let pairs = self
            .pairs
            .iter()
            .filter_map(|(left, right)| self.right.get(*right).map(|text| (*left, text.clone())))
            .collect();
        Some(AnswerPayload::Pairs(pairs))
    }
}
