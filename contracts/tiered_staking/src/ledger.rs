use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

use crate::errors::ContractError;
use crate::fixed_point::{self, Wide};
use crate::pool::RewardPool;
use crate::tiers::{self, LockTier};

// ── Storage key constants ───────────────────────────────────────────────────

/// Per-account records use tuple keys: `(STAKE, account, slot)`.
const STAKE: Symbol = symbol_short!("STAKE");
/// Next free slot index per account: `(STK_CNT, account)`.
const STAKE_COUNT: Symbol = symbol_short!("STK_CNT");

const TTL_THRESHOLD: u32 = 5184000;
const TTL_EXTEND_TO: u32 = 10368000;

// ── Types ───────────────────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum StakeStatus {
    Active = 0,
    Withdrawn = 1,
}

/// One independently locked position.
///
/// Slots are append-only per account. A withdrawn record is kept with its
/// status flipped so repeated exits are rejected and the payout stays
/// auditable.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Stake {
    pub owner: Address,
    pub slot: u32,
    pub principal: i128,
    /// `principal × multiplier_bps / 10_000`, fixed for the stake's lifetime.
    pub weight: i128,
    pub tier_id: u32,
    pub start_time: u64,
    /// `start_time + tier.duration_seconds`.
    pub unlock_time: u64,
    /// Accumulator value at this stake's last checkpoint.
    pub reward_per_weight_paid: Wide,
    /// Reward earned up to the last checkpoint and not yet paid.
    pub accrued_unpaid: i128,
    /// Reward paid out on exit; zero while active.
    pub reward_paid: i128,
    /// Ledger timestamp of the exit; zero while active.
    pub withdrawn_at: u64,
    pub status: StakeStatus,
}

impl Stake {
    pub fn is_active(&self) -> bool {
        self.status == StakeStatus::Active
    }

    pub fn is_mature(&self, now: u64) -> bool {
        now >= self.unlock_time
    }

    /// Reward owed to this stake if the accumulator read `reward_per_weight`:
    ///
    /// ```text
    /// earned = accrued_unpaid + weight × (rpw − rpw_paid) / SCALE
    /// ```
    pub fn pending_reward(&self, reward_per_weight: Wide) -> Result<i128, ContractError> {
        if !self.is_active() {
            return Ok(0);
        }
        let delta = fixed_point::wide_sub(reward_per_weight, self.reward_per_weight_paid)?;
        let fresh = fixed_point::mul_scaled_wide(self.weight, delta)?;
        fixed_point::add(self.accrued_unpaid, fresh)
    }

    /// Freeze everything earned so far against the current accumulator.
    pub fn checkpoint(&mut self, reward_per_weight: Wide) -> Result<(), ContractError> {
        self.accrued_unpaid = self.pending_reward(reward_per_weight)?;
        self.reward_per_weight_paid = reward_per_weight;
        Ok(())
    }
}

/// Weight a principal carries under `tier`. A weight that floors to zero
/// could never earn, so it is refused as an invalid amount.
pub fn weight_of(principal: i128, tier: &LockTier) -> Result<i128, ContractError> {
    let weight = fixed_point::apply_bps(principal, tier.multiplier_bps)?;
    if weight == 0 {
        return Err(ContractError::InvalidAmount);
    }
    Ok(weight)
}

// ── Storage helpers ─────────────────────────────────────────────────────────

fn stake_key(owner: &Address, slot: u32) -> (Symbol, Address, u32) {
    (STAKE, owner.clone(), slot)
}

fn count_key(owner: &Address) -> (Symbol, Address) {
    (STAKE_COUNT, owner.clone())
}

/// Number of slots ever opened by `owner`; also the next slot index.
pub fn stake_count(env: &Env, owner: &Address) -> u32 {
    env.storage()
        .persistent()
        .get(&count_key(owner))
        .unwrap_or(0u32)
}

pub fn load(env: &Env, owner: &Address, slot: u32) -> Result<Stake, ContractError> {
    let key = stake_key(owner, slot);
    let stake: Stake = env
        .storage()
        .persistent()
        .get(&key)
        .ok_or(ContractError::StakeNotFound)?;
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
    Ok(stake)
}

pub fn store(env: &Env, stake: &Stake) {
    let key = stake_key(&stake.owner, stake.slot);
    env.storage().persistent().set(&key, stake);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

// ── Ledger operations ───────────────────────────────────────────────────────

/// Open a new stake for `owner` in the next free slot.
///
/// The accumulator is advanced first so the new position starts at the
/// current reward-per-weight and earns nothing retroactively.
#[allow(clippy::too_many_arguments)]
pub fn create_stake(
    env: &Env,
    pool: &mut RewardPool,
    owner: &Address,
    amount: i128,
    tier_id: u32,
    value: i128,
    min_stake: i128,
    now: u64,
) -> Result<Stake, ContractError> {
    if value != amount {
        return Err(ContractError::AmountMismatch);
    }
    if amount <= 0 || amount < min_stake {
        return Err(ContractError::InvalidAmount);
    }
    let tier = tiers::find(env, tier_id)?;
    let weight = weight_of(amount, &tier)?;
    let unlock_time = now
        .checked_add(tier.duration_seconds)
        .ok_or(ContractError::Overflow)?;

    pool.advance(now)?;

    let slot = stake_count(env, owner);
    let next_slot = slot.checked_add(1).ok_or(ContractError::Overflow)?;
    let stake = Stake {
        owner: owner.clone(),
        slot,
        principal: amount,
        weight,
        tier_id,
        start_time: now,
        unlock_time,
        reward_per_weight_paid: pool.reward_per_weight_stored,
        accrued_unpaid: 0,
        reward_paid: 0,
        withdrawn_at: 0,
        status: StakeStatus::Active,
    };

    pool.add_position(amount, weight)?;
    store(env, &stake);

    let key = count_key(owner);
    env.storage().persistent().set(&key, &next_slot);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);

    Ok(stake)
}
