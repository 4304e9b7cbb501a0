use crate::engine::Balances;
use crate::model::{Amount, Cents, Person};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Balances within this many cents of zero are treated as settled. This absorbs the rounding
/// noise left behind by remainder distribution.
pub const TOLERANCE: Cents = 1;

/// One payment that moves money from a debtor to a creditor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    /// The name of the person paying.
    pub from: String,
    /// The name of the person being paid.
    pub to: String,
    /// Always positive.
    pub amount: Cents,
}

impl Display for Settlement {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} pays {} {}",
            self.from,
            self.to,
            Amount::from_cents(self.amount)
        )
    }
}

struct Party<'a> {
    name: &'a str,
    remaining: Cents,
}

/// Produces transfers that bring every balance back to zero (within `TOLERANCE`).
///
/// This is a greedy match: the largest remaining debtor pays the largest remaining creditor as much
/// as either can absorb, and whoever reaches zero is replaced by the next in line. People with
/// equal balances keep their order from `people`. The result is not guaranteed to be the smallest
/// possible number of transfers.
pub fn settle(people: &[Person], balances: &Balances) -> Vec<Settlement> {
    let mut debtors = Vec::new();
    let mut creditors = Vec::new();
    for person in people {
        let balance = balances.get(person.id()).copied().unwrap_or(0);
        if balance < -TOLERANCE {
            debtors.push(Party {
                name: person.name(),
                remaining: -balance,
            });
        } else if balance > TOLERANCE {
            creditors.push(Party {
                name: person.name(),
                remaining: balance,
            });
        }
    }

    // sort_by is stable, so ties keep their order from `people`
    debtors.sort_by(|a, b| b.remaining.cmp(&a.remaining));
    creditors.sort_by(|a, b| b.remaining.cmp(&a.remaining));

    let mut settlements = Vec::new();
    let (mut d, mut c) = (0, 0);
    while d < debtors.len() && c < creditors.len() {
        let debtor = &mut debtors[d];
        let creditor = &mut creditors[c];
        let payment = debtor.remaining.min(creditor.remaining);
        if payment > 0 {
            settlements.push(Settlement {
                from: debtor.name.to_string(),
                to: creditor.name.to_string(),
                amount: payment,
            });
        }
        debtor.remaining -= payment;
        creditor.remaining -= payment;
        if debtor.remaining <= TOLERANCE {
            d += 1;
        }
        if creditor.remaining <= TOLERANCE {
            c += 1;
        }
    }
    settlements
}
