use crate::domain::money::format_cents;
use crate::domain::summary::LedgerSummary;
use crate::error::Result;
use std::io::Write;

pub const CURRENCY: &str = "$";
pub const HEADER: &str = "Expense summary";
pub const SETTLED_LINE: &str = "All settled! Nobody owes anything.";

/// Renders a summary as shareable plain text.
///
/// One line per participant with their split total (and the serviced total
/// when a service percentage is set), then either one line per transfer or
/// [`SETTLED_LINE`].
pub fn render_summary(summary: &LedgerSummary) -> String {
    let mut text = format!("{HEADER}\n\nTotals per person:\n");

    let serviced = summary.serviced_totals();
    for entry in summary.totals.iter() {
        let name = summary.name_of(&entry.participant_id);
        let total = format_cents(entry.total);
        let line = match (&serviced, summary.service) {
            (Some(serviced), Some(service)) => {
                let with_service = serviced
                    .get(&entry.participant_id)
                    .map(format_cents)
                    .unwrap_or_else(|| total.clone());
                format!(
                    "- {name}: {CURRENCY} {total} ({CURRENCY} {with_service} with {service}% service)\n"
                )
            }
            _ => format!("- {name}: {CURRENCY} {total}\n"),
        };
        text.push_str(&line);
    }

    text.push_str("\nWho owes whom:\n");
    if summary.is_settled() {
        text.push_str(SETTLED_LINE);
        text.push('\n');
    } else {
        for transfer in &summary.transfers {
            text.push_str(&format!(
                "- {} pays {CURRENCY} {} to {}\n",
                summary.name_of(&transfer.from),
                transfer.amount,
                summary.name_of(&transfer.to)
            ));
        }
    }

    text
}

/// Writes rendered summaries to any `Write` sink (stdout, a file, a pipe).
pub struct SummaryWriter<W: Write> {
    writer: W,
}

impl<W: Write> SummaryWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn write_summary(&mut self, summary: &LedgerSummary) -> Result<()> {
        self.writer.write_all(render_summary(summary).as_bytes())?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::expense::{Expense, ExpenseId, NewExpense};
    use crate::domain::participant::Participant;
    use crate::domain::split::ServicePercent;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn ledger(amount: Decimal) -> (Vec<Participant>, Vec<Expense>) {
        let alice = Participant::new("Alice", None).unwrap();
        let bob = Participant::new("Bob", None).unwrap();
        let expense = Expense::from_new(
            ExpenseId::generate(),
            NewExpense {
                amount,
                description: "Dinner".to_string(),
                payer_id: alice.id.clone(),
                participant_ids: vec![alice.id.clone(), bob.id.clone()],
            },
            Utc::now(),
        )
        .unwrap();
        (vec![alice, bob], vec![expense])
    }

    #[test]
    fn test_render_with_transfers() {
        let (participants, expenses) = ledger(dec!(100));
        let summary = LedgerSummary::compute(&participants, &expenses, None).unwrap();

        assert_eq!(
            render_summary(&summary),
            "Expense summary\n\
             \n\
             Totals per person:\n\
             - Alice: $ 50.00\n\
             - Bob: $ 50.00\n\
             \n\
             Who owes whom:\n\
             - Bob pays $ 50.00 to Alice\n"
        );
    }

    #[test]
    fn test_render_settled_ledger() {
        let alice = Participant::new("Alice", None).unwrap();
        let summary = LedgerSummary::compute(&[alice], &[], None).unwrap();
        let text = render_summary(&summary);

        assert!(text.contains("- Alice: $ 0.00\n"));
        assert!(text.ends_with(&format!("Who owes whom:\n{SETTLED_LINE}\n")));
    }

    #[test]
    fn test_render_with_service() {
        let (participants, expenses) = ledger(dec!(100));
        let service = ServicePercent::new(dec!(10)).unwrap();
        let summary = LedgerSummary::compute(&participants, &expenses, Some(service)).unwrap();

        assert!(
            render_summary(&summary).contains("- Bob: $ 50.00 ($ 55.00 with 10% service)\n")
        );
    }

    #[test]
    fn test_writer_emits_rendered_text() {
        let (participants, expenses) = ledger(dec!(30));
        let summary = LedgerSummary::compute(&participants, &expenses, None).unwrap();

        let mut out = Vec::new();
        SummaryWriter::new(&mut out).write_summary(&summary).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), render_summary(&summary));
    }
}
