use soroban_sdk::{contracttype, symbol_short, Env, Symbol, Vec};

use crate::errors::ContractError;

// ── Storage key constants ───────────────────────────────────────────────────

const TIERS: Symbol = symbol_short!("TIERS");

/// Upper bound on the number of tiers a pool may be deployed with.
pub const MAX_TIERS: u32 = 16;

pub const SECONDS_PER_DAY: u64 = 86_400;

// ── Types ───────────────────────────────────────────────────────────────────

/// A lock option a staker picks when opening a position.
///
/// The table is fixed at initialisation and never mutated, so a stake's
/// unlock time and weight can be derived once when it is created.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LockTier {
    pub id: u32,
    /// Seconds the principal stays locked after `start_time`.
    pub duration_seconds: u64,
    /// Reward multiplier in basis points (10_000 = 1.0×).
    pub multiplier_bps: u32,
}

// ── Table helpers ───────────────────────────────────────────────────────────

/// Reference table: longer locks earn proportionally more weight.
pub fn default_tiers(env: &Env) -> Vec<LockTier> {
    let mut tiers = Vec::new(env);
    for (id, days, multiplier_bps) in [
        (0u32, 7u64, 10_000u32),
        (1, 30, 11_000),
        (2, 60, 12_500),
        (3, 180, 15_000),
        (4, 360, 20_000),
        (5, 720, 30_000),
    ] {
        tiers.push_back(LockTier {
            id,
            duration_seconds: days * SECONDS_PER_DAY,
            multiplier_bps,
        });
    }
    tiers
}

/// Reject empty or oversized tables, duplicate ids and zero multipliers.
pub fn validate_table(tiers: &Vec<LockTier>) -> Result<(), ContractError> {
    if tiers.is_empty() || tiers.len() > MAX_TIERS {
        return Err(ContractError::InvalidTierTable);
    }
    for i in 0..tiers.len() {
        let tier = tiers.get(i).ok_or(ContractError::InvalidTierTable)?;
        if tier.multiplier_bps == 0 {
            return Err(ContractError::InvalidTierTable);
        }
        for j in (i + 1)..tiers.len() {
            if tiers.get(j).map(|other| other.id) == Some(tier.id) {
                return Err(ContractError::InvalidTierTable);
            }
        }
    }
    Ok(())
}

pub fn store_table(env: &Env, tiers: &Vec<LockTier>) {
    env.storage().instance().set(&TIERS, tiers);
}

pub fn load_table(env: &Env) -> Result<Vec<LockTier>, ContractError> {
    env.storage()
        .instance()
        .get(&TIERS)
        .ok_or(ContractError::NotInitialized)
}

/// Look up a tier by id, failing with `InvalidTier` if unknown.
pub fn find(env: &Env, id: u32) -> Result<LockTier, ContractError> {
    load_table(env)?
        .iter()
        .find(|tier| tier.id == id)
        .ok_or(ContractError::InvalidTier)
}
