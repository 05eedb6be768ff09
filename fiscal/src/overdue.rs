//! Dues left unpaid at the end of the period.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uepik_common::{Contractor, CurrencySymbol, Denom, Document, Period};
use uepik_ledger::Provenance;

use crate::error::FiscalResult;
use crate::operations::Operation;

/// Unpaid part of one due.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverdueRecord {
    pub due_date: NaiveDate,
    pub document: Document,
    pub contractor: Contractor,
    pub amount: Denom,
}

/// Match payments against dues of every operation.
///
/// Payments made up to the end of the period settle the dues of the same
/// currency, oldest first. Dues falling after the period are not reported.
pub fn overdues(
    period: &Period,
    operations: &[Box<dyn Operation>],
) -> FiscalResult<Vec<OverdueRecord>> {
    let mut report = Vec::new();
    for operation in operations {
        if operation.dues().is_empty() {
            continue;
        }

        let mut paid: BTreeMap<CurrencySymbol, Denom> = BTreeMap::new();
        for payment in operation.payments() {
            if payment.date > period.end {
                continue;
            }
            let symbol = payment.amount.currency.symbol.clone();
            let sum = match paid.remove(&symbol) {
                Some(sum) => sum.add(&payment.amount)?,
                None => payment.amount.clone(),
            };
            paid.insert(symbol, sum);
        }

        let mut dues = operation.dues().to_vec();
        dues.sort_by_key(|due| due.date);

        for due in dues.into_iter().take_while(|due| due.date <= period.end) {
            let symbol = &due.amount.currency.symbol;
            let unpaid = match paid.remove(symbol) {
                None => due.amount,
                Some(sum) if sum.gt(&due.amount)? => {
                    paid.insert(symbol.clone(), sum.sub(&due.amount)?);
                    continue;
                }
                Some(sum) if sum == due.amount => continue,
                Some(sum) => due.amount.sub(&sum)?,
            };

            report.push(OverdueRecord {
                due_date: due.date,
                document: operation.document().clone(),
                contractor: operation.contractor().clone(),
                amount: unpaid,
            });
        }
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operations::{CostTaxType, Due, PaymentRecord, Purchase, Sell};
    use uepik_common::Currency;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    fn eur(amount: &str) -> Denom {
        Currency::eur().amount(amount).unwrap()
    }

    fn sell(id: &str) -> Sell {
        Sell::new(
            date(1, 2),
            Document::new(id, date(1, 2)),
            Contractor::new("Buyer", "", ""),
            eur("100.00"),
        )
    }

    #[test]
    fn test_payments_settle_oldest_dues_first() {
        let operations: Vec<Box<dyn Operation>> = vec![Box::new(
            sell("FV/1")
                .with_due(Due::new(date(3, 1), eur("60.00")))
                .with_due(Due::new(date(1, 15), eur("40.00")))
                .with_payment(PaymentRecord::new(date(1, 10), 1, eur("50.00"))),
        )];

        let report = overdues(&Period::year(2025).unwrap(), &operations).unwrap();

        assert_eq!(report.len(), 1);
        assert_eq!(report[0].due_date, date(3, 1));
        assert_eq!(report[0].amount, eur("50.00"));
        assert_eq!(report[0].document.id.as_str(), "FV/1");
    }

    #[test]
    fn test_fully_paid_and_future_dues_skipped() {
        let operations: Vec<Box<dyn Operation>> = vec![
            Box::new(
                sell("FV/1")
                    .with_due(Due::new(date(1, 15), eur("40.00")))
                    .with_payment(PaymentRecord::new(date(1, 10), 1, eur("40.00"))),
            ),
            Box::new(
                Purchase::new(
                    date(2, 1),
                    Document::new("FV/2", date(2, 1)),
                    Contractor::default(),
                    eur("30.00"),
                    CostTaxType::Taxable,
                )
                .with_due(Due::new(date(7, 1), eur("30.00"))),
            ),
        ];

        let period = Period::new(date(1, 1), date(6, 30));
        assert!(overdues(&period, &operations).unwrap().is_empty());
    }

    #[test]
    fn test_late_payment_does_not_settle() {
        let operations: Vec<Box<dyn Operation>> = vec![Box::new(
            sell("FV/1")
                .with_due(Due::new(date(2, 1), eur("40.00")))
                .with_payment(PaymentRecord::new(date(7, 5), 1, eur("40.00"))),
        )];

        let period = Period::new(date(1, 1), date(6, 30));
        let report = overdues(&period, &operations).unwrap();

        assert_eq!(report.len(), 1);
        assert_eq!(report[0].amount, eur("40.00"));
    }
}
