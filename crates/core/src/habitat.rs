//! Membership rules for the zoo ⇄ animal edge.
//!
//! A zoo stores the ordered list of animal ids it houses and every animal
//! stores the id of its zoo. The helpers here keep the zoo side of that edge
//! well-formed (an ordered list without duplicates); the store adapter is
//! responsible for writing both sides in one transaction.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

/// Append `animal_id` to a zoo's collection unless it is already present.
///
/// Returns `true` when the collection changed.
pub fn link_member(members: &mut Vec<DbId>, animal_id: DbId) -> bool {
    if members.contains(&animal_id) {
        return false;
    }
    members.push(animal_id);
    true
}

/// Remove every occurrence of `animal_id` from a zoo's collection.
///
/// Returns `true` when the collection changed.
pub fn unlink_member(members: &mut Vec<DbId>, animal_id: DbId) -> bool {
    let before = members.len();
    members.retain(|id| *id != animal_id);
    members.len() != before
}

/// First id that appears more than once in `ids`, if any.
pub fn find_duplicate(ids: &[DbId]) -> Option<DbId> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter().copied().find(|id| !seen.insert(*id))
}

/// Ids from `requested` that are absent from `resolved`, in request order.
pub fn missing_members(requested: &[DbId], resolved: &[DbId]) -> Vec<DbId> {
    let resolved: HashSet<&DbId> = resolved.iter().collect();
    requested
        .iter()
        .filter(|id| !resolved.contains(id))
        .copied()
        .collect()
}

/// Validate a candidate animal list supplied when creating a zoo.
///
/// The list must be duplicate-free and every id must have resolved to an
/// existing animal. Nothing may be created when this fails.
pub fn check_candidates(requested: &[DbId], resolved: &[DbId]) -> Result<(), CoreError> {
    if let Some(dup) = find_duplicate(requested) {
        return Err(CoreError::Validation(format!(
            "animal {dup} is listed more than once"
        )));
    }
    if !missing_members(requested, resolved).is_empty() {
        return Err(CoreError::Validation(
            "one or more referenced animals do not exist".into(),
        ));
    }
    Ok(())
}

/// What happens to a zoo's animals when the zoo itself is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZooDeletionPolicy {
    /// Clear the zoo reference on every animal that pointed at the zoo.
    #[default]
    Detach,
    /// Delete every animal that pointed at the zoo.
    Cascade,
    /// Refuse to delete a zoo that still houses animals.
    Reject,
}

impl ZooDeletionPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            ZooDeletionPolicy::Detach => "detach",
            ZooDeletionPolicy::Cascade => "cascade",
            ZooDeletionPolicy::Reject => "reject",
        }
    }
}

impl fmt::Display for ZooDeletionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ZooDeletionPolicy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "detach" => Ok(ZooDeletionPolicy::Detach),
            "cascade" => Ok(ZooDeletionPolicy::Cascade),
            "reject" => Ok(ZooDeletionPolicy::Reject),
            other => Err(CoreError::Validation(format!(
                "unknown zoo deletion policy '{other}' (expected detach, cascade or reject)"
            ))),
        }
    }
}
