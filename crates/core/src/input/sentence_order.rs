use rand::Rng;
use rand::seq::SliceRandom;

use crate::model::{AnswerPayload, ChallengeOption, OptionId};

/// Click-to-append word ordering over a pool shuffled once at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentenceOrderInput {
    words: Vec<(OptionId, String)>,
    placed: Vec<OptionId>,
}

impl SentenceOrderInput {
    pub fn new<R: Rng + ?Sized>(options: &[ChallengeOption], rng: &mut R) -> Self {
        let mut words: Vec<(OptionId, String)> = options
            .iter()
            .map(|option| (option.id, option.text.clone()))
            .collect();
        words.shuffle(rng);
        Self {
            words,
            placed: Vec::new(),
        }
    }

    /// Words still available, in pool order.
    pub fn pool(&self) -> impl Iterator<Item = &(OptionId, String)> {
        self.words.iter().filter(|(id, _)| !self.placed.contains(id))
    }

    /// Every word in pool order, flagged when already placed.
    pub fn pool_with_state(&self) -> impl Iterator<Item = (&(OptionId, String), bool)> {
        self.words
            .iter()
            .map(|word| (word, self.placed.contains(&word.0)))
    }

    /// Placed words in answer order.
    pub fn placed(&self) -> impl Iterator<Item = &(OptionId, String)> {
        self.placed
            .iter()
            .filter_map(|id| self.words.iter().find(|(word, _)| word == id))
    }

    /// Appends a word from the pool. Consumed or unknown ids are rejected.
    pub fn pick(&mut self, id: OptionId) -> bool {
        let known = self.words.iter().any(|(word, _)| *word == id);
        if !known || self.placed.contains(&id) {
            return false;
        }
        self.placed.push(id);
        true
    }

    /// Returns the word at `position` in the answer line to the pool.
    pub fn remove_at(&mut self, position: usize) -> Option<OptionId> {
        (position < self.placed.len()).then(|| self.placed.remove(position))
    }

    pub fn reset(&mut self) {
        self.placed.clear();
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.words.is_empty() && self.placed.len() == self.words.len()
    }

    #[must_use]
    pub fn to_answer_payload(&self) -> Option<AnswerPayload> {
        self.is_complete()
            .then(|| AnswerPayload::Ordered(self.placed.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn options() -> Vec<ChallengeOption> {
        ["El", "gato", "es", "negro"]
            .iter()
            .enumerate()
            .map(|(i, word)| {
                let position = u32::try_from(i).unwrap() + 1;
                ChallengeOption::new(OptionId::new(position.into()), *word, true)
                    .with_position(position)
            })
            .collect()
    }

    #[test]
    fn shuffle_is_stable_for_one_mount() {
        let input = SentenceOrderInput::new(&options(), &mut StdRng::seed_from_u64(3));
        let first: Vec<_> = input.pool().cloned().collect();
        let second: Vec<_> = input.pool().cloned().collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 4);
    }

    #[test]
    fn consumed_words_cannot_be_added_again() {
        let mut input = SentenceOrderInput::new(&options(), &mut StdRng::seed_from_u64(3));
        for id in [1, 2, 3, 4] {
            assert!(input.pick(OptionId::new(id)));
        }
        assert!(input.is_complete());
        assert!(!input.pick(OptionId::new(2)));

        let Some(AnswerPayload::Ordered(ids)) = input.to_answer_payload() else {
            panic!("expected ordered payload");
        };
        assert_eq!(ids.len(), 4);
        let mut deduped = ids.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), 4);
    }

    #[test]
    fn submit_waits_for_an_empty_pool() {
        let mut input = SentenceOrderInput::new(&options(), &mut StdRng::seed_from_u64(3));
        input.pick(OptionId::new(1));
        input.pick(OptionId::new(2));
        assert!(input.to_answer_payload().is_none());
        assert_eq!(input.pool().count(), 2);
    }

    #[test]
    fn removing_returns_word_to_pool() {
        let mut input = SentenceOrderInput::new(&options(), &mut StdRng::seed_from_u64(3));
        input.pick(OptionId::new(3));
        input.pick(OptionId::new(1));
        assert_eq!(input.remove_at(0), Some(OptionId::new(3)));
        assert_eq!(input.remove_at(5), None);
        let placed: Vec<_> = input.placed().map(|(id, _)| *id).collect();
        assert_eq!(placed, vec![OptionId::new(1)]);
        assert!(input.pick(OptionId::new(3)));
    }

    #[test]
    fn unknown_ids_are_rejected() {
        let mut input = SentenceOrderInput::new(&options(), &mut StdRng::seed_from_u64(3));
        assert!(!input.pick(OptionId::new(99)));
    }
}
