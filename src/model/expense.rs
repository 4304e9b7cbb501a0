use crate::model::{Amount, ExpenseId, PersonId};
use serde::{Deserialize, Serialize};

/// How an expense is divided among its participants.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum SplitMode {
    /// Everyone pays the same share.
    #[default]
    Equal,
    /// Shares are proportional to each participant's weight.
    Weighted,
}

serde_plain::derive_display_from_serialize!(SplitMode);
serde_plain::derive_fromstr_from_deserialize!(SplitMode);

/// Something one person paid for on behalf of some participants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Expense {
    id: ExpenseId,
    name: String,
    payer_id: PersonId,
    /// In major currency units, e.g. dollars.
    amount: Amount,
    #[serde(default)]
    mode: SplitMode,
    participants: Vec<PersonId>,
}

impl Expense {
    pub fn new(
        id: impl Into<ExpenseId>,
        name: impl Into<String>,
        payer_id: impl Into<PersonId>,
        amount: Amount,
        mode: SplitMode,
        participants: impl IntoIterator<Item = impl Into<PersonId>>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            payer_id: payer_id.into(),
            amount,
            mode,
            participants: participants.into_iter().map(Into::into).collect(),
        }
    }

    pub fn id(&self) -> &ExpenseId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn payer_id(&self) -> &PersonId {
        &self.payer_id
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn mode(&self) -> SplitMode {
        self.mode
    }

    pub fn participants(&self) -> &[PersonId] {
        &self.participants
    }

    /// Removes `person` from the participant list.
    pub(crate) fn remove_participant(&mut self, person: &PersonId) {
        self.participants.retain(|id| id != person);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_split_mode_strings() {
        assert_eq!(SplitMode::Equal.to_string(), "equal");
        assert_eq!(SplitMode::Weighted.to_string(), "weighted");
        assert_eq!(SplitMode::from_str("weighted").unwrap(), SplitMode::Weighted);
        assert!(SplitMode::from_str("random").is_err());
    }

    #[test]
    fn test_remove_participant() {
        let mut expense = Expense::new(
            "e1",
            "Dinner",
            "a",
            Amount::from_cents(3000),
            SplitMode::Equal,
            ["a", "b", "c"],
        );
        expense.remove_participant(&PersonId::from("b"));
        assert_eq!(
            expense.participants(),
            &[PersonId::from("a"), PersonId::from("c")]
        );
    }

    #[test]
    fn test_serde_shape() {
        let expense = Expense::new(
            "e1",
            "Fuel",
            "a",
            Amount::from_cents(4550),
            SplitMode::Weighted,
            ["a", "b"],
        );
        let json = serde_json::to_value(&expense).unwrap();
        assert_eq!(json["payer_id"], "a");
        assert_eq!(json["amount"], "$45.50");
        assert_eq!(json["mode"], "weighted");
        let back: Expense = serde_json::from_value(json).unwrap();
        assert_eq!(back.amount().to_cents(), Some(4550));
    }
}
