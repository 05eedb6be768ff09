//! Account definitions and the account tree.

use std::borrow::Cow;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use uepik_common::{CurrencyResult, Denom};

use crate::balance::{AccountBalance, Side};
use crate::error::{LedgerError, LedgerResult};
use crate::journal::ProvenanceKind;

/// Label of one node in the account tree, unique among its siblings.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AccountIdPart(Cow<'static, str>);

impl AccountIdPart {
    /// Label usable in constants.
    pub const fn from_static(label: &'static str) -> Self {
        Self(Cow::Borrowed(label))
    }

    pub fn new(label: impl Into<String>) -> Self {
        Self(Cow::Owned(label.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountIdPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AccountIdPart {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Path of labels from a root account to an account.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct AccountId(Vec<AccountIdPart>);

impl AccountId {
    /// Create an account ID from its parts, root first.
    pub fn new(parts: impl IntoIterator<Item = AccountIdPart>) -> Self {
        Self(parts.into_iter().collect())
    }

    pub fn parts(&self) -> &[AccountIdPart] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// ID of a child account.
    pub fn child(&self, part: AccountIdPart) -> AccountId {
        let mut parts = self.0.clone();
        parts.push(part);
        Self(parts)
    }

    /// ID of the parent account, `None` for roots.
    pub fn parent(&self) -> Option<AccountId> {
        match self.0.split_last() {
            Some((_, parent)) if !parent.is_empty() => Some(Self(parent.to_vec())),
            _ => None,
        }
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "<root>");
        }
        for (i, part) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "/")?;
            }
            write!(f, "{}", part)?;
        }
        Ok(())
    }
}

/// Type of an account, fixing the sides it accepts and the sign of its balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    /// Debit and credit, balance is debit minus credit.
    Assets,
    /// Debit and credit, balance is credit minus debit.
    Liabilities,
    /// Credit only, balance is credit minus debit.
    Incomes,
    /// Debit only, balance is debit minus credit.
    Costs,
}

impl AccountType {
    pub fn allows_debit(&self) -> bool {
        !matches!(self, AccountType::Incomes)
    }

    pub fn allows_credit(&self) -> bool {
        !matches!(self, AccountType::Costs)
    }

    /// Check if the side may be posted to accounts of this type.
    pub fn allows(&self, side: Side) -> bool {
        match side {
            Side::Debit => self.allows_debit(),
            Side::Credit => self.allows_credit(),
        }
    }

    /// Net value of a balance on an account of this type.
    pub fn balance(&self, balance: &AccountBalance) -> CurrencyResult<Denom> {
        match self {
            AccountType::Assets | AccountType::Costs => balance.debit_minus_credit(),
            AccountType::Liabilities | AccountType::Incomes => balance.credit_minus_debit(),
        }
    }
}

/// Provenance kinds an account accepts.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidSources {
    /// Any provenance kind.
    #[default]
    All,
    /// Only the listed kinds; an empty set accepts nothing.
    Only(BTreeSet<ProvenanceKind>),
}

impl ValidSources {
    /// Whitelist of the given kinds.
    pub fn only(kinds: impl IntoIterator<Item = ProvenanceKind>) -> Self {
        ValidSources::Only(kinds.into_iter().collect())
    }

    /// Accept no provenance at all.
    pub fn none() -> Self {
        ValidSources::Only(BTreeSet::new())
    }

    pub fn allows(&self, kind: ProvenanceKind) -> bool {
        match self {
            ValidSources::All => true,
            ValidSources::Only(kinds) => kinds.contains(&kind),
        }
    }
}

/// Static definition of an account and its subtree.
///
/// Construction validates the direct children, so a built tree always
/// satisfies the hierarchy rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    id_part: AccountIdPart,
    account_type: AccountType,
    valid_sources: ValidSources,
    children: Vec<Account>,
}

impl Account {
    /// Create an account with children.
    ///
    /// Fails with [`LedgerError::InvalidHierarchy`] if a child allows a side
    /// this account disallows, and with [`LedgerError::DuplicateChild`] if two
    /// children share an ID part.
    pub fn new(
        id_part: AccountIdPart,
        account_type: AccountType,
        valid_sources: ValidSources,
        children: Vec<Account>,
    ) -> LedgerResult<Self> {
        let mut seen = HashSet::new();
        for child in &children {
            if !seen.insert(&child.id_part) {
                return Err(LedgerError::DuplicateChild {
                    parent: id_part.clone(),
                    child: child.id_part.clone(),
                });
            }
            for side in [Side::Debit, Side::Credit] {
                if child.account_type.allows(side) && !account_type.allows(side) {
                    return Err(LedgerError::InvalidHierarchy {
                        parent: id_part.clone(),
                        child: child.id_part.clone(),
                        side,
                    });
                }
            }
        }

        Ok(Self {
            id_part,
            account_type,
            valid_sources,
            children,
        })
    }

    /// Create an account without children.
    pub fn leaf(id_part: AccountIdPart, account_type: AccountType, valid_sources: ValidSources) -> Self {
        Self {
            id_part,
            account_type,
            valid_sources,
            children: Vec::new(),
        }
    }

    pub fn id_part(&self) -> &AccountIdPart {
        &self.id_part
    }

    pub fn account_type(&self) -> AccountType {
        self.account_type
    }

    pub fn valid_sources(&self) -> &ValidSources {
        &self.valid_sources
    }

    pub fn children(&self) -> &[Account] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Serializable form of an account subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountDefinition {
    pub id: AccountIdPart,
    #[serde(rename = "type")]
    pub account_type: AccountType,
    /// Accepted provenance kinds; absent means all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_sources: Option<BTreeSet<ProvenanceKind>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<AccountDefinition>,
}

impl AccountDefinition {
    /// Build the validated account subtree.
    pub fn build(self) -> LedgerResult<Account> {
        let children = self
            .children
            .into_iter()
            .map(AccountDefinition::build)
            .collect::<LedgerResult<Vec<_>>>()?;
        let valid_sources = match self.valid_sources {
            Some(kinds) => ValidSources::Only(kinds),
            None => ValidSources::All,
        };
        Account::new(self.id, self.account_type, valid_sources, children)
    }
}

/// Node of the flattened account tree.
#[derive(Debug, Clone)]
pub struct AccountNode {
    id: AccountId,
    account_type: AccountType,
    valid_sources: ValidSources,
    parent: Option<usize>,
    children: Vec<usize>,
}

impl AccountNode {
    /// Full path of the account.
    pub fn id(&self) -> &AccountId {
        &self.id
    }

    pub fn account_type(&self) -> AccountType {
        self.account_type
    }

    pub fn valid_sources(&self) -> &ValidSources {
        &self.valid_sources
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Account hierarchy flattened into an arena addressed by path.
///
/// Nodes are stored in depth-first order; the structure never changes after
/// construction.
#[derive(Debug, Clone)]
pub struct AccountTree {
    nodes: Vec<AccountNode>,
    index: HashMap<AccountId, usize>,
    roots: Vec<usize>,
}

impl AccountTree {
    /// Flatten root accounts into a tree.
    pub fn new(roots: Vec<Account>) -> LedgerResult<Self> {
        let mut seen = HashSet::new();
        for root in &roots {
            if !seen.insert(root.id_part.clone()) {
                return Err(LedgerError::DuplicateRoot(root.id_part.clone()));
            }
        }

        let mut tree = Self {
            nodes: Vec::new(),
            index: HashMap::new(),
            roots: Vec::new(),
        };
        for root in roots {
            let index = tree.insert(root, None, &AccountId::default());
            tree.roots.push(index);
        }
        Ok(tree)
    }

    fn insert(&mut self, account: Account, parent: Option<usize>, parent_id: &AccountId) -> usize {
        let id = parent_id.child(account.id_part);
        let index = self.nodes.len();
        self.nodes.push(AccountNode {
            id: id.clone(),
            account_type: account.account_type,
            valid_sources: account.valid_sources,
            parent,
            children: Vec::with_capacity(account.children.len()),
        });
        self.index.insert(id.clone(), index);

        for child in account.children {
            let child_index = self.insert(child, Some(index), &id);
            self.nodes[index].children.push(child_index);
        }
        index
    }

    /// Position of the account in the arena.
    pub(crate) fn resolve(&self, id: &AccountId) -> LedgerResult<usize> {
        if id.is_empty() {
            return Err(LedgerError::EmptyAccountId);
        }
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| LedgerError::UnknownAccount(id.clone()))
    }

    pub(crate) fn node(&self, index: usize) -> &AccountNode {
        &self.nodes[index]
    }

    /// Positions of the account's ancestors and the account itself, root first.
    pub(crate) fn lineage(&self, index: usize) -> Vec<usize> {
        let mut lineage = vec![index];
        let mut current = index;
        while let Some(parent) = self.nodes[current].parent {
            lineage.push(parent);
            current = parent;
        }
        lineage.reverse();
        lineage
    }

    /// Look up an account by path.
    pub fn get(&self, id: &AccountId) -> LedgerResult<&AccountNode> {
        Ok(self.node(self.resolve(id)?))
    }

    /// Direct children of an account.
    pub fn children(&self, id: &AccountId) -> LedgerResult<Vec<&AccountNode>> {
        let node = self.get(id)?;
        Ok(node.children.iter().map(|&i| &self.nodes[i]).collect())
    }

    /// Root accounts in definition order.
    pub fn roots(&self) -> impl Iterator<Item = &AccountNode> {
        self.roots.iter().map(move |&i| &self.nodes[i])
    }

    /// All accounts in depth-first order.
    pub fn iter(&self) -> impl Iterator<Item = &AccountNode> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROOT: AccountIdPart = AccountIdPart::from_static("root");
    const A: AccountIdPart = AccountIdPart::from_static("a");
    const B: AccountIdPart = AccountIdPart::from_static("b");

    #[test]
    fn test_account_type_sides() {
        assert!(AccountType::Assets.allows(Side::Debit));
        assert!(AccountType::Assets.allows(Side::Credit));
        assert!(AccountType::Liabilities.allows(Side::Debit));
        assert!(!AccountType::Incomes.allows(Side::Debit));
        assert!(AccountType::Incomes.allows(Side::Credit));
        assert!(AccountType::Costs.allows(Side::Debit));
        assert!(!AccountType::Costs.allows(Side::Credit));
    }

    #[test]
    fn test_child_side_must_be_subset() {
        let child = Account::leaf(A, AccountType::Assets, ValidSources::All);
        let result = Account::new(ROOT, AccountType::Incomes, ValidSources::All, vec![child]);

        assert_eq!(
            result.unwrap_err(),
            LedgerError::InvalidHierarchy {
                parent: ROOT,
                child: A,
                side: Side::Debit,
            }
        );

        let child = Account::leaf(A, AccountType::Costs, ValidSources::All);
        assert!(Account::new(ROOT, AccountType::Liabilities, ValidSources::All, vec![child]).is_ok());
    }

    #[test]
    fn test_duplicate_child() {
        let children = vec![
            Account::leaf(A, AccountType::Costs, ValidSources::All),
            Account::leaf(A, AccountType::Costs, ValidSources::All),
        ];
        let result = Account::new(ROOT, AccountType::Costs, ValidSources::All, children);
        assert_eq!(
            result.unwrap_err(),
            LedgerError::DuplicateChild {
                parent: ROOT,
                child: A,
            }
        );

        let roots = vec![
            Account::leaf(A, AccountType::Costs, ValidSources::All),
            Account::leaf(A, AccountType::Incomes, ValidSources::All),
        ];
        assert_eq!(AccountTree::new(roots).unwrap_err(), LedgerError::DuplicateRoot(A));
    }

    #[test]
    fn test_nested_duplicate_names_parent() {
        let children = vec![
            Account::leaf(A, AccountType::Costs, ValidSources::All),
            Account::leaf(A, AccountType::Costs, ValidSources::All),
        ];
        let error = Account::new(B, AccountType::Costs, ValidSources::All, children).unwrap_err();
        assert_eq!(error.to_string(), format!("Account {} registered twice under {}", A, B));
        assert_eq!(error.error_code(), "DUPLICATE_CHILD");
    }

    #[test]
    fn test_valid_sources() {
        assert!(ValidSources::All.allows(ProvenanceKind::Sell));
        assert!(!ValidSources::none().allows(ProvenanceKind::Sell));

        let only = ValidSources::only([ProvenanceKind::Sell, ProvenanceKind::Donation]);
        assert!(only.allows(ProvenanceKind::Donation));
        assert!(!only.allows(ProvenanceKind::Purchase));
    }

    #[test]
    fn test_tree_lookup() {
        let root = Account::new(
            ROOT,
            AccountType::Liabilities,
            ValidSources::All,
            vec![
                Account::leaf(A, AccountType::Incomes, ValidSources::All),
                Account::leaf(B, AccountType::Costs, ValidSources::All),
            ],
        )
        .unwrap();
        let tree = AccountTree::new(vec![root]).unwrap();

        assert_eq!(tree.len(), 3);
        let node = tree.get(&AccountId::new([ROOT, B])).unwrap();
        assert!(node.is_leaf());
        assert_eq!(node.account_type(), AccountType::Costs);
        assert_eq!(node.id().to_string(), "root/b");

        let children = tree.children(&AccountId::new([ROOT])).unwrap();
        assert_eq!(children.len(), 2);

        assert_eq!(
            tree.get(&AccountId::new([ROOT, ROOT])).unwrap_err(),
            LedgerError::UnknownAccount(AccountId::new([ROOT, ROOT]))
        );
        assert_eq!(
            tree.get(&AccountId::default()).unwrap_err(),
            LedgerError::EmptyAccountId
        );

        let leaf = tree.resolve(&AccountId::new([ROOT, A])).unwrap();
        let lineage = tree.lineage(leaf);
        assert_eq!(lineage.len(), 2);
        assert_eq!(tree.node(lineage[0]).id(), &AccountId::new([ROOT]));
    }

    #[test]
    fn test_definition_from_json() {
        let json = r#"{
            "id": "root",
            "type": "liabilities",
            "children": [
                {"id": "a", "type": "incomes", "valid_sources": ["sell"]},
                {"id": "b", "type": "costs", "valid_sources": []}
            ]
        }"#;
        let definition: AccountDefinition = serde_json::from_str(json).unwrap();
        let account = definition.build().unwrap();

        assert_eq!(account.children().len(), 2);
        assert!(account.children()[0]
            .valid_sources()
            .allows(ProvenanceKind::Sell));
        assert_eq!(account.children()[1].valid_sources(), &ValidSources::none());
        assert_eq!(account.valid_sources(), &ValidSources::All);

        let invalid = r#"{
            "id": "root",
            "type": "costs",
            "children": [{"id": "a", "type": "incomes"}]
        }"#;
        let definition: AccountDefinition = serde_json::from_str(invalid).unwrap();
        assert!(matches!(
            definition.build(),
            Err(LedgerError::InvalidHierarchy { .. })
        ));
    }
}
