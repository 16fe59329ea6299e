#![allow(clippy::unwrap_used, clippy::expect_used, clippy::arithmetic_side_effects)]
//! Property-based state machine tests for the staking contract.
//!
//! Random sequences of stakes, exits, deposits, notifications and clock
//! moves are replayed against a fresh deployment. After every step:
//! - `total_weight` and `total_principal` equal the sums over active stakes
//! - the contract's token balance equals `reward_fund_balance + total_principal`
//! - the accumulator never decreases
//! - a rejected call leaves the pool untouched
//! - a successful exit pays exactly `principal + earned` as read just before
//! - dust positions of a few base units never wedge the accumulator

use proptest::prelude::*;
use proptest_derive::Arbitrary;
use soroban_sdk::testutils::{Address as _, Ledger as _};
use soroban_sdk::token::{Client as TokenClient, StellarAssetClient};
use soroban_sdk::{Address, Env};
use tiered_staking::fixed_point::SCALE;
use tiered_staking::{
    default_tiers, ContractError, DepositPolicy, StakeStatus, TieredStakingContract,
    TieredStakingContractClient, Wide,
};

const DAY: u64 = 86_400;
const ACCOUNTS: usize = 3;

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Whole-unit stakes most of the time, with a share of dust positions down
/// to a single base unit.
fn stake_amount() -> impl Strategy<Value = i128> {
    prop_oneof![
        3 => (1i128..=5_000i128).prop_map(|units| units * SCALE),
        1 => 1i128..=1_000_000i128,
    ]
}

#[derive(Arbitrary, Clone, Debug)]
enum Op {
    Stake {
        #[proptest(strategy = "0usize..ACCOUNTS")]
        who: usize,
        #[proptest(strategy = "stake_amount()")]
        amount: i128,
        #[proptest(strategy = "0u32..7u32")]
        tier: u32,
    },
    Exit {
        #[proptest(strategy = "0usize..ACCOUNTS")]
        who: usize,
        #[proptest(strategy = "0u32..4u32")]
        slot: u32,
    },
    Deposit {
        #[proptest(strategy = "1i128..=100_000i128")]
        units: i128,
    },
    Notify {
        #[proptest(strategy = "1i128..=100_000i128")]
        units: i128,
    },
    Advance {
        #[proptest(strategy = "0u64..=200u64")]
        days: u64,
    },
}

struct Harness {
    env: Env,
    client: TieredStakingContractClient<'static>,
    owner: Address,
    token: Address,
    accounts: Vec<Address>,
}

impl Harness {
    fn new() -> Self {
        let env = Env::default();
        env.mock_all_auths();

        let token = env
            .register_stellar_asset_contract_v2(Address::generate(&env))
            .address();
        let contract_id = env.register(TieredStakingContract, ());
        let client = TieredStakingContractClient::new(&env, &contract_id);

        let owner = Address::generate(&env);
        client.initialize(
            &owner,
            &token,
            &default_tiers(&env),
            &1,
            &DepositPolicy::OwnerOnly,
        );
        client.set_rewards_duration(&owner, &(90 * DAY));

        let accounts = (0..ACCOUNTS).map(|_| Address::generate(&env)).collect();
        Harness {
            env,
            client,
            owner,
            token,
            accounts,
        }
    }

    fn mint(&self, to: &Address, amount: i128) {
        StellarAssetClient::new(&self.env, &self.token).mint(to, &amount);
    }

    fn contract_balance(&self) -> i128 {
        TokenClient::new(&self.env, &self.token).balance(&self.client.address)
    }

    /// Returns whether the call went through.
    fn apply(&self, op: &Op) -> bool {
        match *op {
            Op::Stake { who, amount, tier } => {
                let staker = &self.accounts[who];
                self.mint(staker, amount);
                self.client
                    .try_stake(staker, &amount, &tier, &amount)
                    .is_ok()
            }
            Op::Exit { who, slot } => {
                let staker = &self.accounts[who];
                let before = self.client.try_earned(staker, &slot);
                match self.client.try_exit(staker, &slot) {
                    Ok(Ok(payout)) => {
                        let stake = self.client.get_stake(staker, &slot);
                        let earned = before.unwrap().unwrap();
                        assert_eq!(payout, stake.principal + earned);
                        assert_eq!(stake.reward_paid, earned);
                        assert_eq!(stake.status, StakeStatus::Withdrawn);
                        true
                    }
                    _ => false,
                }
            }
            Op::Deposit { units } => {
                let amount = units * SCALE;
                self.mint(&self.owner, amount);
                self.client
                    .try_deposit(&self.owner, &amount, &amount)
                    .is_ok()
            }
            Op::Notify { units } => self
                .client
                .try_notify_reward_amount(&self.owner, &(units * SCALE))
                .is_ok(),
            Op::Advance { days } => {
                let now = self.env.ledger().timestamp();
                self.env.ledger().set_timestamp(now + days * DAY);
                true
            }
        }
    }

    /// Sums `(weight, principal)` over every active stake of every account.
    fn active_totals(&self) -> (i128, i128) {
        let mut weight = 0;
        let mut principal = 0;
        for account in &self.accounts {
            for slot in 0..self.client.stake_count(account) {
                let stake = self.client.get_stake(account, &slot);
                if stake.status == StakeStatus::Active {
                    weight += stake.weight;
                    principal += stake.principal;
                }
            }
        }
        (weight, principal)
    }
}

// ── proptest! blocks ──────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Pool aggregates and the token balance stay in lockstep with the
    /// per-stake records through any sequence of operations.
    #[test]
    fn prop_ledger_stays_consistent(ops in prop::collection::vec(any::<Op>(), 1..40)) {
        let h = Harness::new();
        let mut last_rpw = Wide::ZERO;

        for op in &ops {
            let pool_before = h.client.get_pool();
            let applied = h.apply(op);
            let pool = h.client.get_pool();

            if !applied {
                prop_assert_eq!(&pool, &pool_before, "rejected {:?} mutated the pool", op);
            }
            // Valid stakes and notifications always go through, whatever
            // dust is already in the pool.
            match op {
                Op::Stake { tier, .. } if *tier < 6 => {
                    prop_assert!(applied, "{:?} was rejected", op)
                }
                Op::Notify { .. } => prop_assert!(applied, "{:?} was rejected", op),
                _ => {}
            }

            let (weight, principal) = h.active_totals();
            prop_assert_eq!(pool.total_weight, weight);
            prop_assert_eq!(pool.total_principal, principal);
            prop_assert_eq!(h.contract_balance(), pool.reward_fund_balance + pool.total_principal);
            prop_assert!(pool.reward_fund_balance >= 0);

            let rpw = h.client.reward_per_weight();
            prop_assert!(rpw >= last_rpw);
            last_rpw = rpw;
        }
    }

    /// `earned` is a pure read: calling it never changes what it returns or
    /// the stored pool.
    #[test]
    fn prop_earned_is_repeatable(
        ops in prop::collection::vec(any::<Op>(), 1..20),
        later_days in 0u64..=400u64,
    ) {
        let h = Harness::new();
        for op in &ops {
            h.apply(op);
        }
        let now = h.env.ledger().timestamp();
        h.env.ledger().set_timestamp(now + later_days * DAY);

        let pool = h.client.get_pool();
        for account in &h.accounts {
            for slot in 0..h.client.stake_count(account) {
                let first = h.client.earned(account, &slot);
                let second = h.client.earned(account, &slot);
                prop_assert_eq!(first, second);
                prop_assert!(first >= 0);
            }
        }
        prop_assert_eq!(h.client.get_pool(), pool);
    }

    /// An exit before the unlock time always fails and leaves the stake as
    /// it was.
    #[test]
    fn prop_immature_exit_rejected(
        tier in 0u32..6u32,
        units in 1i128..=10_000i128,
        wait_fraction in 0u64..100u64,
    ) {
        let h = Harness::new();
        let staker = &h.accounts[0];
        let amount = units * SCALE;
        h.mint(staker, amount);
        let slot = h.client.stake(staker, &amount, &tier, &amount);

        let stake = h.client.get_stake(staker, &slot);
        let lock = stake.unlock_time - stake.start_time;
        h.env.ledger().set_timestamp(stake.start_time + lock * wait_fraction / 100);

        match h.client.try_exit(staker, &slot) {
            Err(Ok(e)) => prop_assert_eq!(e, ContractError::StakeNotFinished),
            _ => prop_assert!(false, "Expected StakeNotFinished"),
        }
        prop_assert_eq!(h.client.get_stake(staker, &slot), stake);
        prop_assert!(h.client.time_until_unlock(staker, &slot) > 0);
    }
}
