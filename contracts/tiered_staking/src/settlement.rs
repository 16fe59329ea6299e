use soroban_sdk::{Address, Env};

use crate::errors::ContractError;
use crate::fixed_point;
use crate::ledger::{self, StakeStatus};
use crate::pool::RewardPool;

/// Amounts released by a successful exit.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Settlement {
    pub principal: i128,
    pub reward: i128,
    /// `principal + reward`, the value owed to the staker.
    pub payout: i128,
}

/// Close `account`'s stake in `slot` and commit the ledger side of the exit.
///
/// Order: ownership and status checks, accumulator advance and checkpoint,
/// lock maturity, reward backing, then the commit. The caller persists
/// `pool` and only afterwards moves `payout` out of the contract, so a
/// re-entrant exit sees the slot as withdrawn.
pub fn settle_exit(
    env: &Env,
    pool: &mut RewardPool,
    account: &Address,
    slot: u32,
    now: u64,
) -> Result<Settlement, ContractError> {
    let mut stake = ledger::load(env, account, slot)?;
    if !stake.is_active() {
        return Err(ContractError::AlreadyWithdrawn);
    }

    pool.advance(now)?;
    stake.checkpoint(pool.reward_per_weight_stored)?;

    if !stake.is_mature(now) {
        return Err(ContractError::StakeNotFinished);
    }

    let reward = stake.accrued_unpaid;
    let payout = fixed_point::add(stake.principal, reward)?;

    // Principal comes back out of the staked funds; only the reward draws
    // on the fund.
    pool.debit_fund(reward)?;
    pool.remove_position(stake.principal, stake.weight)?;

    stake.status = StakeStatus::Withdrawn;
    stake.accrued_unpaid = 0;
    stake.reward_paid = reward;
    stake.withdrawn_at = now;
    ledger::store(env, &stake);

    Ok(Settlement {
        principal: stake.principal,
        reward,
        payout,
    })
}
