use crate::model::{AnswerPayload, ChallengeOption, OptionId};
use crate::text::normalize_answer;

const TRUE_WORDS: &[&str] = &[
    "true", "yes", "correct", "verdadero", "cierto", "sí", "si", "vrai", "oui", "wahr", "richtig",
    "ja", "vero", "verdadeiro", "sim", "правда", "верно", "да", "正确", "对", "是", "doğru",
];

const FALSE_WORDS: &[&str] = &[
    "false", "no", "incorrect", "falso", "faux", "non", "falsch", "nein", "errato", "неправда",
    "неверно", "нет", "错误", "错", "不是", "yanlış",
];

/// Option ids standing for "true" and "false".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrueFalseIds {
    pub true_id: OptionId,
    pub false_id: OptionId,
}

fn matches_any(text: &str, words: &[&str]) -> bool {
    let normalized = normalize_answer(text);
    !normalized.is_empty()
        && (words.contains(&normalized.as_str())
            || normalized
                .split(' ')
                .next()
                .is_some_and(|first| words.contains(&first)))
}

/// Finds the true/false options by keyword, falling back to option order when
/// there are exactly two options and no keyword matched.
#[must_use]
pub fn resolve_true_false(options: &[ChallengeOption]) -> Option<TrueFalseIds> {
    let true_opt = options.iter().find(|option| matches_any(&option.text, TRUE_WORDS));
    let false_opt = options
        .iter()
        .find(|option| matches_any(&option.text, FALSE_WORDS));

    match (true_opt, false_opt) {
        (Some(t), Some(f)) if t.id != f.id => Some(TrueFalseIds {
            true_id: t.id,
            false_id: f.id,
        }),
        _ if options.len() == 2 => {
            // one keyword hit is enough to orient the pair
            let (first, second) = (&options[0], &options[1]);
            let first_is_false = false_opt.is_some_and(|f| f.id == first.id)
                || true_opt.is_some_and(|t| t.id == second.id);
            Some(if first_is_false {
                TrueFalseIds {
                    true_id: second.id,
                    false_id: first.id,
                }
            } else {
                TrueFalseIds {
                    true_id: first.id,
                    false_id: second.id,
                }
            })
        }
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrueFalseInput {
    ids: TrueFalseIds,
    selected: Option<bool>,
}

impl TrueFalseInput {
    #[must_use]
    pub fn new(ids: TrueFalseIds) -> Self {
        Self {
            ids,
            selected: None,
        }
    }

    pub fn choose(&mut self, value: bool) {
        self.selected = Some(value);
    }

    #[must_use]
    pub fn selected(&self) -> Option<bool> {
        self.selected
    }

    #[must_use]
    pub fn ids(&self) -> TrueFalseIds {
        self.ids
    }

    #[must_use]
    pub fn to_answer_payload(&self) -> Option<AnswerPayload> {
        self.selected.map(|value| {
            AnswerPayload::Choice(if value {
                self.ids.true_id
            } else {
                self.ids.false_id
            })
        })
    }
}
