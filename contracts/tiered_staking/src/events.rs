#![allow(deprecated)] // events().publish migration tracked separately

use soroban_sdk::{symbol_short, Address, Env};

use crate::DepositPolicy;

// ── Event payloads ──────────────────────────────────────────────────────────

/// Fired once when the pool is deployed.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub owner: Address,
    pub native_token: Address,
    pub tier_count: u32,
    pub min_stake: i128,
    pub timestamp: u64,
}

/// Fired when a stake is opened.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakedEvent {
    pub staker: Address,
    pub slot: u32,
    pub tier_id: u32,
    pub amount: i128,
    pub weight: i128,
    pub unlock_time: u64,
    pub new_total_weight: i128,
    pub timestamp: u64,
}

/// Fired when a matured stake is closed and paid out.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExitedEvent {
    pub staker: Address,
    pub slot: u32,
    pub principal: i128,
    pub reward: i128,
    pub new_total_weight: i128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardsDurationSetEvent {
    pub duration: u64,
    pub timestamp: u64,
}

/// Fired when a distribution window is opened or extended.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardAddedEvent {
    pub reward: i128,
    pub reward_rate: i128,
    pub period_finish: u64,
    pub timestamp: u64,
}

/// Fired when the reward fund is topped up.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DepositedEvent {
    pub funder: Address,
    pub amount: i128,
    pub new_fund_balance: i128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DepositPolicySetEvent {
    pub policy: DepositPolicy,
    pub timestamp: u64,
}

/// Fired when an ownership transfer is proposed.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OwnerTransferProposedEvent {
    pub current_owner: Address,
    pub proposed_owner: Address,
    pub timestamp: u64,
}

/// Fired when an ownership transfer is accepted.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OwnerTransferAcceptedEvent {
    pub old_owner: Address,
    pub new_owner: Address,
    pub timestamp: u64,
}

/// Fired when a pending ownership transfer is cancelled.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OwnerTransferCancelledEvent {
    pub owner: Address,
    pub cancelled_proposed: Address,
    pub timestamp: u64,
}

// ── Publishers ──────────────────────────────────────────────────────────────

pub fn publish_initialized(
    env: &Env,
    owner: Address,
    native_token: Address,
    tier_count: u32,
    min_stake: i128,
) {
    env.events().publish(
        (symbol_short!("INIT"),),
        InitializedEvent {
            owner,
            native_token,
            tier_count,
            min_stake,
            timestamp: env.ledger().timestamp(),
        },
    );
}

#[allow(clippy::too_many_arguments)]
pub fn publish_staked(
    env: &Env,
    staker: Address,
    slot: u32,
    tier_id: u32,
    amount: i128,
    weight: i128,
    unlock_time: u64,
    new_total_weight: i128,
) {
    env.events().publish(
        (symbol_short!("STAKED"), staker.clone()),
        StakedEvent {
            staker,
            slot,
            tier_id,
            amount,
            weight,
            unlock_time,
            new_total_weight,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_exited(
    env: &Env,
    staker: Address,
    slot: u32,
    principal: i128,
    reward: i128,
    new_total_weight: i128,
) {
    env.events().publish(
        (symbol_short!("EXITED"), staker.clone()),
        ExitedEvent {
            staker,
            slot,
            principal,
            reward,
            new_total_weight,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_rewards_duration_set(env: &Env, duration: u64) {
    env.events().publish(
        (symbol_short!("RWD_DUR"),),
        RewardsDurationSetEvent {
            duration,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_reward_added(env: &Env, reward: i128, reward_rate: i128, period_finish: u64) {
    env.events().publish(
        (symbol_short!("RWD_ADD"),),
        RewardAddedEvent {
            reward,
            reward_rate,
            period_finish,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_deposited(env: &Env, funder: Address, amount: i128, new_fund_balance: i128) {
    env.events().publish(
        (symbol_short!("DEPOSIT"), funder.clone()),
        DepositedEvent {
            funder,
            amount,
            new_fund_balance,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_deposit_policy_set(env: &Env, policy: DepositPolicy) {
    env.events().publish(
        (symbol_short!("DEP_POL"),),
        DepositPolicySetEvent {
            policy,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_owner_transfer_proposed(env: &Env, current_owner: Address, proposed_owner: Address) {
    env.events().publish(
        (symbol_short!("OWN_PROP"), current_owner.clone()),
        OwnerTransferProposedEvent {
            current_owner,
            proposed_owner,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_owner_transfer_accepted(env: &Env, old_owner: Address, new_owner: Address) {
    env.events().publish(
        (symbol_short!("OWN_ACPT"), new_owner.clone()),
        OwnerTransferAcceptedEvent {
            old_owner,
            new_owner,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_owner_transfer_cancelled(env: &Env, owner: Address, cancelled_proposed: Address) {
    env.events().publish(
        (symbol_short!("OWN_CNCL"), owner.clone()),
        OwnerTransferCancelledEvent {
            owner,
            cancelled_proposed,
            timestamp: env.ledger().timestamp(),
        },
    );
}
