//! The organization's chart of accounts.
//!
//! ```text
//! pik (liabilities)
//! ├── przychody (incomes)
//! │   ├── finansowe
//! │   │   └── dodatnie_roznice_kursowe     [currency_diff_settlement]
//! │   └── operacyjne
//! │       ├── z_nieodplatnej_dpp           [donation]
//! │       └── z_odplatnej_dpp              [sell, unrecorded_sell]
//! └── koszty (costs)
//!     ├── podatkowe
//!     │   ├── finansowe
//!     │   │   └── ujemne_roznice_kursowe   [currency_diff_settlement]
//!     │   └── operacyjne                   [purchase]
//!     └── niepodatkowe
//!         └── operacyjne                   [purchase]
//! vat (incomes)                            [vat]
//! niewydatkowany_dochod (liabilities)
//! ├── w_trakcie_roku                       [currency_diff_settlement, donation, purchase,
//! │                                         sell, unrecorded_sell]
//! └── z_lat_ubieglych                      [purchase]
//! roznice_kursowe (liabilities)            [currency_diff]
//! sprzedaz_nieewidencjonowana (incomes)    [sell]
//! ```

use crate::account::{Account, AccountId, AccountIdPart, AccountTree, AccountType, ValidSources};
use crate::error::LedgerResult;
use crate::journal::ProvenanceKind;

pub const PIK: AccountIdPart = AccountIdPart::from_static("pik");
pub const INCOMES: AccountIdPart = AccountIdPart::from_static("przychody");
pub const COSTS: AccountIdPart = AccountIdPart::from_static("koszty");
pub const FINANCIAL: AccountIdPart = AccountIdPart::from_static("finansowe");
pub const OPERATIONAL: AccountIdPart = AccountIdPart::from_static("operacyjne");
pub const POSITIVE_FX_DIFFS: AccountIdPart = AccountIdPart::from_static("dodatnie_roznice_kursowe");
pub const NEGATIVE_FX_DIFFS: AccountIdPart = AccountIdPart::from_static("ujemne_roznice_kursowe");
pub const FREE_OF_CHARGE: AccountIdPart = AccountIdPart::from_static("z_nieodplatnej_dpp");
pub const PAID: AccountIdPart = AccountIdPart::from_static("z_odplatnej_dpp");
pub const TAXABLE: AccountIdPart = AccountIdPart::from_static("podatkowe");
pub const NON_TAXABLE: AccountIdPart = AccountIdPart::from_static("niepodatkowe");
pub const VAT: AccountIdPart = AccountIdPart::from_static("vat");
pub const UNSPENT_PROFIT: AccountIdPart = AccountIdPart::from_static("niewydatkowany_dochod");
pub const CURRENT_YEAR: AccountIdPart = AccountIdPart::from_static("w_trakcie_roku");
pub const PREVIOUS_YEARS: AccountIdPart = AccountIdPart::from_static("z_lat_ubieglych");
pub const FX_DIFFS: AccountIdPart = AccountIdPart::from_static("roznice_kursowe");
pub const UNRECORDED_SALES: AccountIdPart =
    AccountIdPart::from_static("sprzedaz_nieewidencjonowana");

/// Build a fresh copy of the organization's chart.
pub fn organization_chart() -> LedgerResult<AccountTree> {
    use AccountType::*;
    use ProvenanceKind::*;

    let pik = Account::new(
        PIK,
        Liabilities,
        ValidSources::All,
        vec![
            Account::new(
                INCOMES,
                Incomes,
                ValidSources::All,
                vec![
                    Account::new(
                        FINANCIAL,
                        Incomes,
                        ValidSources::All,
                        vec![Account::leaf(
                            POSITIVE_FX_DIFFS,
                            Incomes,
                            ValidSources::only([CurrencyDiffSettlement]),
                        )],
                    )?,
                    Account::new(
                        OPERATIONAL,
                        Incomes,
                        ValidSources::All,
                        vec![
                            Account::leaf(FREE_OF_CHARGE, Incomes, ValidSources::only([Donation])),
                            Account::leaf(
                                PAID,
                                Incomes,
                                ValidSources::only([Sell, UnrecordedSell]),
                            ),
                        ],
                    )?,
                ],
            )?,
            Account::new(
                COSTS,
                Costs,
                ValidSources::All,
                vec![
                    Account::new(
                        TAXABLE,
                        Costs,
                        ValidSources::All,
                        vec![
                            Account::new(
                                FINANCIAL,
                                Costs,
                                ValidSources::All,
                                vec![Account::leaf(
                                    NEGATIVE_FX_DIFFS,
                                    Costs,
                                    ValidSources::only([CurrencyDiffSettlement]),
                                )],
                            )?,
                            Account::leaf(OPERATIONAL, Costs, ValidSources::only([Purchase])),
                        ],
                    )?,
                    Account::new(
                        NON_TAXABLE,
                        Costs,
                        ValidSources::All,
                        vec![Account::leaf(OPERATIONAL, Costs, ValidSources::only([Purchase]))],
                    )?,
                ],
            )?,
        ],
    )?;

    let vat = Account::leaf(VAT, Incomes, ValidSources::only([Vat]));

    let unspent_profit = Account::new(
        UNSPENT_PROFIT,
        Liabilities,
        ValidSources::All,
        vec![
            Account::leaf(
                CURRENT_YEAR,
                Liabilities,
                ValidSources::only([
                    CurrencyDiffSettlement,
                    Donation,
                    Purchase,
                    Sell,
                    UnrecordedSell,
                ]),
            ),
            Account::leaf(PREVIOUS_YEARS, Liabilities, ValidSources::only([Purchase])),
        ],
    )?;

    let fx_diffs = Account::leaf(FX_DIFFS, Liabilities, ValidSources::only([CurrencyDiff]));

    let unrecorded_sales = Account::leaf(UNRECORDED_SALES, Incomes, ValidSources::only([Sell]));

    AccountTree::new(vec![pik, vat, unspent_profit, fx_diffs, unrecorded_sales])
}

pub fn incomes() -> AccountId {
    AccountId::new([PIK, INCOMES])
}

pub fn financial_incomes() -> AccountId {
    AccountId::new([PIK, INCOMES, FINANCIAL])
}

pub fn operational_incomes() -> AccountId {
    AccountId::new([PIK, INCOMES, OPERATIONAL])
}

pub fn positive_fx_diffs() -> AccountId {
    AccountId::new([PIK, INCOMES, FINANCIAL, POSITIVE_FX_DIFFS])
}

/// Donations received.
pub fn free_of_charge_incomes() -> AccountId {
    AccountId::new([PIK, INCOMES, OPERATIONAL, FREE_OF_CHARGE])
}

/// Sales.
pub fn paid_incomes() -> AccountId {
    AccountId::new([PIK, INCOMES, OPERATIONAL, PAID])
}

pub fn taxable_costs() -> AccountId {
    AccountId::new([PIK, COSTS, TAXABLE])
}

pub fn taxable_financial_costs() -> AccountId {
    AccountId::new([PIK, COSTS, TAXABLE, FINANCIAL])
}

pub fn negative_fx_diffs() -> AccountId {
    AccountId::new([PIK, COSTS, TAXABLE, FINANCIAL, NEGATIVE_FX_DIFFS])
}

pub fn taxable_operational_costs() -> AccountId {
    AccountId::new([PIK, COSTS, TAXABLE, OPERATIONAL])
}

pub fn non_taxable_operational_costs() -> AccountId {
    AccountId::new([PIK, COSTS, NON_TAXABLE, OPERATIONAL])
}

pub fn vat() -> AccountId {
    AccountId::new([VAT])
}

pub fn unspent_profit() -> AccountId {
    AccountId::new([UNSPENT_PROFIT])
}

pub fn unspent_profit_current_year() -> AccountId {
    AccountId::new([UNSPENT_PROFIT, CURRENT_YEAR])
}

pub fn unspent_profit_previous_years() -> AccountId {
    AccountId::new([UNSPENT_PROFIT, PREVIOUS_YEARS])
}

/// Memo account collecting FX differences of single settlements.
pub fn fx_diffs() -> AccountId {
    AccountId::new([FX_DIFFS])
}

/// Memo account collecting sales without an invoice until their daily summary.
pub fn unrecorded_sales() -> AccountId {
    AccountId::new([UNRECORDED_SALES])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_is_valid() {
        let tree = organization_chart().unwrap();
        assert_eq!(tree.len(), 20);

        for leaf in [
            positive_fx_diffs(),
            free_of_charge_incomes(),
            paid_incomes(),
            negative_fx_diffs(),
            taxable_operational_costs(),
            non_taxable_operational_costs(),
            vat(),
            unspent_profit_current_year(),
            unspent_profit_previous_years(),
            fx_diffs(),
            unrecorded_sales(),
        ] {
            assert!(tree.get(&leaf).unwrap().is_leaf(), "{} is not a leaf", leaf);
        }
    }

    #[test]
    fn test_leaf_whitelists() {
        let tree = organization_chart().unwrap();
        let sources = |id: AccountId| tree.get(&id).unwrap().valid_sources().clone();

        assert!(sources(paid_incomes()).allows(ProvenanceKind::Sell));
        assert!(!sources(paid_incomes()).allows(ProvenanceKind::Donation));
        assert!(sources(fx_diffs()).allows(ProvenanceKind::CurrencyDiff));
        assert!(!sources(fx_diffs()).allows(ProvenanceKind::CurrencyDiffSettlement));
        assert!(!sources(unspent_profit_previous_years()).allows(ProvenanceKind::Sell));
        assert!(sources(unspent_profit()).allows(ProvenanceKind::Payment));
        assert!(sources(paid_incomes()).allows(ProvenanceKind::UnrecordedSell));
        assert!(sources(unrecorded_sales()).allows(ProvenanceKind::Sell));
        assert!(!sources(unrecorded_sales()).allows(ProvenanceKind::UnrecordedSell));
    }

    #[test]
    fn test_each_call_builds_a_new_tree() {
        let first = organization_chart().unwrap();
        let second = organization_chart().unwrap();
        assert_eq!(first.len(), second.len());
        assert!(!std::ptr::eq(first.get(&vat()).unwrap(), second.get(&vat()).unwrap()));
    }
}
