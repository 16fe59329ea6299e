use soroban_sdk::{contracttype, symbol_short, Env, Symbol};

use crate::errors::ContractError;
use crate::fixed_point::{self, Wide};

// ── Storage key constants ───────────────────────────────────────────────────

const POOL: Symbol = symbol_short!("POOL");

// ── Types ───────────────────────────────────────────────────────────────────

/// Global reward state shared by every stake.
///
/// `reward_per_weight_stored` is the running reward earned by one unit of
/// weight since deployment, scaled by [`SCALE`](fixed_point::SCALE). It only
/// moves forward and only through [`RewardPool::advance`].
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RewardPool {
    /// Sum of `weight` over all active stakes.
    pub total_weight: i128,
    /// Sum of `principal` over all active stakes.
    pub total_principal: i128,
    /// Reward emitted per second while the window is open.
    pub reward_rate: i128,
    pub rewards_duration: u64,
    pub period_finish: u64,
    pub last_update_time: u64,
    pub reward_per_weight_stored: Wide,
    /// Currency held to back reward payouts, separate from principal.
    pub reward_fund_balance: i128,
    /// `reward` argument of the most recent notification.
    pub last_notified_amount: i128,
}

/// Lifecycle of the distribution schedule. There is no terminal phase:
/// an expired pool becomes active again on the next notification.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum PoolPhase {
    Uninitialized = 0,
    Configured = 1,
    Active = 2,
    Expired = 3,
}

// ── Accumulator ─────────────────────────────────────────────────────────────

impl RewardPool {
    /// `min(now, period_finish)`: accrual stops when the window closes.
    pub fn last_time_reward_applicable(&self, now: u64) -> u64 {
        now.min(self.period_finish)
    }

    /// The accumulator as it would read after `advance(now)`, without
    /// mutating anything.
    ///
    /// ```text
    /// Δrpw = reward_rate × elapsed × SCALE / total_weight
    /// ```
    pub fn projected_reward_per_weight(&self, now: u64) -> Result<Wide, ContractError> {
        let applicable = self.last_time_reward_applicable(now);
        if self.total_weight == 0 || applicable <= self.last_update_time {
            return Ok(self.reward_per_weight_stored);
        }
        let elapsed = applicable - self.last_update_time;
        let emitted = fixed_point::mul_int(self.reward_rate, elapsed)?;
        let delta = fixed_point::div_scaled_wide(emitted, self.total_weight)?;
        fixed_point::wide_add(self.reward_per_weight_stored, delta)
    }

    /// Bring the accumulator up to `now`. Calling it again with the same or
    /// an earlier `now` changes nothing.
    pub fn advance(&mut self, now: u64) -> Result<(), ContractError> {
        self.reward_per_weight_stored = self.projected_reward_per_weight(now)?;
        let applicable = self.last_time_reward_applicable(now);
        if applicable > self.last_update_time {
            self.last_update_time = applicable;
        }
        Ok(())
    }

    // ── Schedule ────────────────────────────────────────────────────────────

    /// Change the distribution cadence. Only allowed between windows.
    pub fn set_rewards_duration(&mut self, duration: u64, now: u64) -> Result<(), ContractError> {
        if now < self.period_finish {
            return Err(ContractError::RewardPeriodActive);
        }
        if duration == 0 {
            return Err(ContractError::InvalidDuration);
        }
        self.rewards_duration = duration;
        Ok(())
    }

    /// Reward still scheduled for emission after `now` in the current window.
    pub fn undistributed(&self, now: u64) -> Result<i128, ContractError> {
        if now >= self.period_finish {
            return Ok(0);
        }
        fixed_point::mul_int(self.reward_rate, self.period_finish - now)
    }

    /// Open a new window emitting `reward`, rolling any undistributed
    /// remainder of the current window into the new rate.
    pub fn notify_reward(&mut self, reward: i128, now: u64) -> Result<(), ContractError> {
        if self.rewards_duration == 0 {
            return Err(ContractError::RewardsDurationNotSet);
        }
        if reward <= 0 {
            return Err(ContractError::InvalidRewardAmount);
        }
        self.advance(now)?;

        let leftover = self.undistributed(now)?;
        let total = fixed_point::add(reward, leftover)?;
        let rate = fixed_point::mul_div_floor(total, 1, self.rewards_duration as i128)?;
        if rate == 0 {
            return Err(ContractError::InvalidRewardAmount);
        }

        self.reward_rate = rate;
        self.last_notified_amount = reward;
        self.last_update_time = now;
        self.period_finish = now
            .checked_add(self.rewards_duration)
            .ok_or(ContractError::Overflow)?;
        Ok(())
    }

    /// Total emission of a full window at the current rate.
    pub fn reward_for_duration(&self) -> Result<i128, ContractError> {
        fixed_point::mul_int(self.reward_rate, self.rewards_duration)
    }

    pub fn phase(&self, now: u64) -> PoolPhase {
        if self.period_finish == 0 {
            if self.rewards_duration == 0 {
                PoolPhase::Uninitialized
            } else {
                PoolPhase::Configured
            }
        } else if now < self.period_finish {
            PoolPhase::Active
        } else {
            PoolPhase::Expired
        }
    }

    // ── Balances ────────────────────────────────────────────────────────────

    pub fn add_position(&mut self, principal: i128, weight: i128) -> Result<(), ContractError> {
        self.total_principal = fixed_point::add(self.total_principal, principal)?;
        self.total_weight = fixed_point::add(self.total_weight, weight)?;
        Ok(())
    }

    pub fn remove_position(&mut self, principal: i128, weight: i128) -> Result<(), ContractError> {
        self.total_principal = fixed_point::sub(self.total_principal, principal)?;
        self.total_weight = fixed_point::sub(self.total_weight, weight)?;
        Ok(())
    }

    pub fn credit_fund(&mut self, amount: i128) -> Result<(), ContractError> {
        self.reward_fund_balance = fixed_point::add(self.reward_fund_balance, amount)?;
        Ok(())
    }

    /// Take `amount` out of the reward fund, failing with
    /// `InsufficientRewardPool` rather than going negative.
    pub fn debit_fund(&mut self, amount: i128) -> Result<(), ContractError> {
        if amount > self.reward_fund_balance {
            return Err(ContractError::InsufficientRewardPool);
        }
        self.reward_fund_balance = fixed_point::sub(self.reward_fund_balance, amount)?;
        Ok(())
    }
}

// ── Storage helpers ─────────────────────────────────────────────────────────

pub fn load(env: &Env) -> Result<RewardPool, ContractError> {
    env.storage()
        .instance()
        .get(&POOL)
        .ok_or(ContractError::NotInitialized)
}

pub fn store(env: &Env, pool: &RewardPool) {
    env.storage().instance().set(&POOL, pool);
}

// ── Unit tests ──────────────────────────────────────────────────────────────
// Pure accumulator math, no Soroban environment needed.
