//! Snapshot file loading and the balance queries run against it.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, bail};
use serde::Deserialize;
use serde_json::Value;
use splitledger_core::balance::{UngroupedPolicy, compute_group_ledger, compute_user_balances};
use splitledger_core::expense::{Expense, Settlement};
use splitledger_shared::types::{GroupId, UserId};
use tracing::info;

/// Immutable record snapshot as exported by the record store.
#[derive(Debug, Default, Deserialize)]
pub struct Snapshot {
    /// Group id to member ids.
    #[serde(default)]
    pub groups: BTreeMap<GroupId, Vec<UserId>>,
    /// Every expense record.
    #[serde(default)]
    pub expenses: Vec<Expense>,
    /// Every settlement record.
    #[serde(default)]
    pub settlements: Vec<Settlement>,
}

impl Snapshot {
    /// Reads and parses a snapshot file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
        let snapshot: Self = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse snapshot {}", path.display()))?;

        info!(
            path = %path.display(),
            groups = snapshot.groups.len(),
            expenses = snapshot.expenses.len(),
            settlements = snapshot.settlements.len(),
            "Loaded snapshot"
        );

        Ok(snapshot)
    }

    /// Per-user balances as JSON.
    pub fn user_report(&self, user_id: UserId, policy: UngroupedPolicy) -> anyhow::Result<Value> {
        let balances = compute_user_balances(user_id, &self.expenses, &self.settlements, policy);
        Ok(serde_json::to_value(balances)?)
    }

    /// Group ledger as JSON. The group must be listed in `groups`.
    pub fn group_report(&self, group_id: GroupId) -> anyhow::Result<Value> {
        let Some(members) = self.groups.get(&group_id) else {
            bail!("Group {group_id} is not in the snapshot");
        };

        let ledger = compute_group_ledger(
            group_id,
            members.iter().copied(),
            &self.expenses,
            &self.settlements,
        );
        Ok(serde_json::to_value(ledger)?)
    }
}
