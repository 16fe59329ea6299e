#![no_std]

//! Native-currency staking with fixed lock tiers.
//!
//! Accounts open any number of independent stakes, each locked under a tier
//! that sets its lock duration and reward multiplier. A single reward pool
//! streams rewards at a constant rate over a fixed window and splits them
//! pro-rata by weight (`principal × multiplier`). Matured stakes exit with
//! principal plus accrued reward in one payout.

pub mod errors;
pub mod events;
pub mod fixed_point;
pub mod ledger;
pub mod pool;
pub mod settlement;
pub mod tiers;

use soroban_sdk::{contract, contractimpl, contracttype, symbol_short, token, Address, Env, Symbol, Vec};

pub use errors::ContractError;
pub use fixed_point::Wide;
pub use ledger::{Stake, StakeStatus};
pub use pool::{PoolPhase, RewardPool};
pub use tiers::{default_tiers, LockTier};

// ── Storage key constants ────────────────────────────────────────────────────

const CONFIG: Symbol = symbol_short!("CONFIG");
const PENDING_OWNER: Symbol = symbol_short!("PEND_OWN");

const TTL_THRESHOLD: u32 = 5184000;
const TTL_EXTEND_TO: u32 = 10368000;

// ── Public-facing types ──────────────────────────────────────────────────────

/// Who may top up the reward fund.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum DepositPolicy {
    OwnerOnly = 0,
    Open = 1,
}

/// Deployment configuration, written once by `initialize`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    pub owner: Address,
    /// Stellar Asset Contract of the staked (and rewarded) currency.
    pub native_token: Address,
    /// Smallest principal accepted by `stake`.
    pub min_stake: i128,
    pub deposit_policy: DepositPolicy,
}

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct TieredStakingContract;

#[contractimpl]
impl TieredStakingContract {
    // ── Initialisation ──────────────────────────────────────────────────────

    /// Bootstrap the pool.
    ///
    /// * `owner`          – account allowed to configure and fund rewards.
    /// * `native_token`   – SAC address of the staked currency.
    /// * `tiers`          – lock tier table; immutable afterwards.
    /// * `min_stake`      – smallest accepted principal (at least 1).
    /// * `deposit_policy` – whether anyone or only the owner may `deposit`.
    pub fn initialize(
        env: Env,
        owner: Address,
        native_token: Address,
        tiers: Vec<LockTier>,
        min_stake: i128,
        deposit_policy: DepositPolicy,
    ) -> Result<(), ContractError> {
        if env.storage().instance().has(&CONFIG) {
            return Err(ContractError::AlreadyInitialized);
        }
        if min_stake <= 0 {
            return Err(ContractError::InvalidAmount);
        }
        tiers::validate_table(&tiers)?;

        let config = Config {
            owner: owner.clone(),
            native_token: native_token.clone(),
            min_stake,
            deposit_policy,
        };
        env.storage().instance().set(&CONFIG, &config);
        tiers::store_table(&env, &tiers);
        pool::store(&env, &RewardPool::default());
        Self::extend_instance_ttl(&env);

        events::publish_initialized(&env, owner, native_token, tiers.len(), min_stake);

        Ok(())
    }

    // ── Staking ─────────────────────────────────────────────────────────────

    /// Open a new stake of `amount` under `tier_id`, pulling `value` of the
    /// native currency from `staker`. Returns the new slot index.
    pub fn stake(
        env: Env,
        staker: Address,
        amount: i128,
        tier_id: u32,
        value: i128,
    ) -> Result<u32, ContractError> {
        let config = Self::load_config(&env)?;
        staker.require_auth();

        let now = env.ledger().timestamp();
        let mut pool = pool::load(&env)?;
        let stake = ledger::create_stake(
            &env,
            &mut pool,
            &staker,
            amount,
            tier_id,
            value,
            config.min_stake,
            now,
        )?;
        pool::store(&env, &pool);
        Self::extend_instance_ttl(&env);

        token::Client::new(&env, &config.native_token).transfer(
            &staker,
            &env.current_contract_address(),
            &value,
        );

        events::publish_staked(
            &env,
            staker,
            stake.slot,
            stake.tier_id,
            stake.principal,
            stake.weight,
            stake.unlock_time,
            pool.total_weight,
        );

        Ok(stake.slot)
    }

    /// Close a matured stake and pay out principal plus reward.
    ///
    /// Fails with `StakeNotFinished` before the unlock time and with
    /// `AlreadyWithdrawn` on repeated calls. Returns the payout.
    pub fn exit(env: Env, staker: Address, slot: u32) -> Result<i128, ContractError> {
        let config = Self::load_config(&env)?;
        staker.require_auth();

        let now = env.ledger().timestamp();
        let mut pool = pool::load(&env)?;
        let settlement = settlement::settle_exit(&env, &mut pool, &staker, slot, now)?;
        pool::store(&env, &pool);
        Self::extend_instance_ttl(&env);

        // Ledger is committed; only now does value leave the contract.
        token::Client::new(&env, &config.native_token).transfer(
            &env.current_contract_address(),
            &staker,
            &settlement.payout,
        );

        events::publish_exited(
            &env,
            staker,
            slot,
            settlement.principal,
            settlement.reward,
            pool.total_weight,
        );

        Ok(settlement.payout)
    }

    /// Reward accrued by `account`'s stake in `slot` as of now. Read-only.
    pub fn earned(env: Env, account: Address, slot: u32) -> Result<i128, ContractError> {
        let pool = pool::load(&env)?;
        let stake = ledger::load(&env, &account, slot)?;
        let rpw = pool.projected_reward_per_weight(env.ledger().timestamp())?;
        stake.pending_reward(rpw)
    }

    // ── Pool controller ─────────────────────────────────────────────────────

    /// Set the length of the next distribution window. Rejected while a
    /// window is still open.
    pub fn set_rewards_duration(
        env: Env,
        caller: Address,
        duration: u64,
    ) -> Result<(), ContractError> {
        let config = Self::load_config(&env)?;
        caller.require_auth();
        Self::require_owner(&config, &caller)?;

        let mut pool = pool::load(&env)?;
        pool.set_rewards_duration(duration, env.ledger().timestamp())?;
        pool::store(&env, &pool);
        Self::extend_instance_ttl(&env);

        events::publish_rewards_duration_set(&env, duration);

        Ok(())
    }

    /// Start (or extend) a distribution window emitting `reward` over the
    /// configured duration. Any reward still undistributed in the current
    /// window is rolled into the new rate.
    pub fn notify_reward_amount(
        env: Env,
        caller: Address,
        reward: i128,
    ) -> Result<(), ContractError> {
        let config = Self::load_config(&env)?;
        caller.require_auth();
        Self::require_owner(&config, &caller)?;

        let mut pool = pool::load(&env)?;
        pool.notify_reward(reward, env.ledger().timestamp())?;
        pool::store(&env, &pool);
        Self::extend_instance_ttl(&env);

        events::publish_reward_added(&env, reward, pool.reward_rate, pool.period_finish);

        Ok(())
    }

    /// Add `amount` to the reward fund, pulling `value` from `funder`.
    pub fn deposit(
        env: Env,
        funder: Address,
        amount: i128,
        value: i128,
    ) -> Result<(), ContractError> {
        let config = Self::load_config(&env)?;
        funder.require_auth();
        if config.deposit_policy == DepositPolicy::OwnerOnly {
            Self::require_owner(&config, &funder)?;
        }
        if value != amount {
            return Err(ContractError::AmountMismatch);
        }
        if amount <= 0 {
            return Err(ContractError::InvalidAmount);
        }

        let mut pool = pool::load(&env)?;
        pool.credit_fund(amount)?;
        pool::store(&env, &pool);
        Self::extend_instance_ttl(&env);

        token::Client::new(&env, &config.native_token).transfer(
            &funder,
            &env.current_contract_address(),
            &value,
        );

        events::publish_deposited(&env, funder, amount, pool.reward_fund_balance);

        Ok(())
    }

    pub fn set_deposit_policy(
        env: Env,
        caller: Address,
        policy: DepositPolicy,
    ) -> Result<(), ContractError> {
        let mut config = Self::load_config(&env)?;
        caller.require_auth();
        Self::require_owner(&config, &caller)?;

        config.deposit_policy = policy;
        env.storage().instance().set(&CONFIG, &config);
        Self::extend_instance_ttl(&env);

        events::publish_deposit_policy_set(&env, policy);

        Ok(())
    }

    // ── Ownership transfer (two-step) ──────────────────────────────────────

    /// Propose a new owner. Takes effect once the proposed owner calls
    /// `accept_owner`.
    pub fn propose_owner(
        env: Env,
        current_owner: Address,
        new_owner: Address,
    ) -> Result<(), ContractError> {
        let config = Self::load_config(&env)?;
        current_owner.require_auth();
        Self::require_owner(&config, &current_owner)?;

        env.storage().instance().set(&PENDING_OWNER, &new_owner);
        Self::extend_instance_ttl(&env);

        events::publish_owner_transfer_proposed(&env, current_owner, new_owner);

        Ok(())
    }

    pub fn accept_owner(env: Env, new_owner: Address) -> Result<(), ContractError> {
        let mut config = Self::load_config(&env)?;
        new_owner.require_auth();

        let pending: Address = env
            .storage()
            .instance()
            .get(&PENDING_OWNER)
            .ok_or(ContractError::NoPendingOwner)?;
        if new_owner != pending {
            return Err(ContractError::Unauthorized);
        }

        let old_owner = config.owner.clone();
        config.owner = new_owner.clone();
        env.storage().instance().set(&CONFIG, &config);
        env.storage().instance().remove(&PENDING_OWNER);
        Self::extend_instance_ttl(&env);

        events::publish_owner_transfer_accepted(&env, old_owner, new_owner);

        Ok(())
    }

    pub fn cancel_owner_transfer(env: Env, current_owner: Address) -> Result<(), ContractError> {
        let config = Self::load_config(&env)?;
        current_owner.require_auth();
        Self::require_owner(&config, &current_owner)?;

        let pending: Address = env
            .storage()
            .instance()
            .get(&PENDING_OWNER)
            .ok_or(ContractError::NoPendingOwner)?;
        env.storage().instance().remove(&PENDING_OWNER);
        Self::extend_instance_ttl(&env);

        events::publish_owner_transfer_cancelled(&env, current_owner, pending);

        Ok(())
    }

    pub fn get_pending_owner(env: Env) -> Option<Address> {
        env.storage().instance().get(&PENDING_OWNER)
    }

    // ── View functions ───────────────────────────────────────────────────────

    pub fn is_initialized(env: Env) -> bool {
        env.storage().instance().has(&CONFIG)
    }

    pub fn get_owner(env: Env) -> Result<Address, ContractError> {
        Ok(Self::load_config(&env)?.owner)
    }

    pub fn get_config(env: Env) -> Result<Config, ContractError> {
        Self::load_config(&env)
    }

    /// Stored pool state. The accumulator reflects the last mutating call;
    /// use `reward_per_weight` for the value as of now.
    pub fn get_pool(env: Env) -> Result<RewardPool, ContractError> {
        pool::load(&env)
    }

    pub fn pool_phase(env: Env) -> Result<PoolPhase, ContractError> {
        Ok(pool::load(&env)?.phase(env.ledger().timestamp()))
    }

    pub fn get_tier(env: Env, tier_id: u32) -> Result<LockTier, ContractError> {
        tiers::find(&env, tier_id)
    }

    pub fn get_tiers(env: Env) -> Result<Vec<LockTier>, ContractError> {
        tiers::load_table(&env)
    }

    pub fn get_stake(env: Env, account: Address, slot: u32) -> Result<Stake, ContractError> {
        ledger::load(&env, &account, slot)
    }

    /// Number of slots `account` has ever opened, withdrawn ones included.
    pub fn stake_count(env: Env, account: Address) -> u32 {
        ledger::stake_count(&env, &account)
    }

    pub fn unlock_time(env: Env, account: Address, slot: u32) -> Result<u64, ContractError> {
        Ok(ledger::load(&env, &account, slot)?.unlock_time)
    }

    /// Seconds until the stake may exit; zero once matured. Lets a client
    /// decide when to retry after `StakeNotFinished`.
    pub fn time_until_unlock(env: Env, account: Address, slot: u32) -> Result<u64, ContractError> {
        let stake = ledger::load(&env, &account, slot)?;
        Ok(stake.unlock_time.saturating_sub(env.ledger().timestamp()))
    }

    pub fn last_time_reward_applicable(env: Env) -> Result<u64, ContractError> {
        Ok(pool::load(&env)?.last_time_reward_applicable(env.ledger().timestamp()))
    }

    /// Accumulator value projected to the current ledger time.
    pub fn reward_per_weight(env: Env) -> Result<Wide, ContractError> {
        pool::load(&env)?.projected_reward_per_weight(env.ledger().timestamp())
    }

    /// Total reward a full window emits at the current rate.
    pub fn reward_for_duration(env: Env) -> Result<i128, ContractError> {
        pool::load(&env)?.reward_for_duration()
    }

    // ── Internal helpers ─────────────────────────────────────────────────────

    fn load_config(env: &Env) -> Result<Config, ContractError> {
        env.storage()
            .instance()
            .get(&CONFIG)
            .ok_or(ContractError::NotInitialized)
    }

    /// Guard: revert if `caller` is not the configured owner.
    fn require_owner(config: &Config, caller: &Address) -> Result<(), ContractError> {
        if *caller != config.owner {
            return Err(ContractError::Unauthorized);
        }
        Ok(())
    }

    fn extend_instance_ttl(env: &Env) {
        env.storage()
            .instance()
            .extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────


#[cfg(test)]
mod test_owner;
