#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use soroban_sdk::testutils::{Address as _, Ledger as _};
use soroban_sdk::token::{Client as TokenClient, StellarAssetClient};
use soroban_sdk::{Address, Env};
use tiered_staking::{
    default_tiers, DepositPolicy, TieredStakingContract, TieredStakingContractClient,
};

#[derive(Arbitrary, Debug)]
pub enum FuzzAction {
    Stake { amount: u64, tier: u8 },
    Exit { slot: u8 },
    Deposit { amount: u64 },
    Notify { amount: u64 },
    SetDuration { seconds: u32 },
    AdvanceTime { seconds: u32 },
}

fuzz_target!(|actions: Vec<FuzzAction>| {
    let env = Env::default();
    env.mock_all_auths();

    let token = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();
    let minter = StellarAssetClient::new(&env, &token);

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

    let mut users = vec![];
    for _ in 0..4 {
        users.push(Address::generate(&env));
    }

    // Arithmetic must surface as contract errors, never as host panics, and
    // the contract must hold exactly the reward fund plus staked principal.
    for (i, action) in actions.into_iter().enumerate() {
        let caller = &users[i % users.len()];
        match action {
            FuzzAction::Stake { amount, tier } => {
                let amt = amount as i128;
                if amt > 0 {
                    minter.mint(caller, &amt);
                }
                let _ = client.try_stake(caller, &amt, &(tier as u32 % 8), &amt);
            }
            FuzzAction::Exit { slot } => {
                let _ = client.try_exit(caller, &(slot as u32 % 8));
            }
            FuzzAction::Deposit { amount } => {
                let amt = amount as i128;
                if amt > 0 {
                    minter.mint(&owner, &amt);
                }
                let _ = client.try_deposit(&owner, &amt, &amt);
            }
            FuzzAction::Notify { amount } => {
                let _ = client.try_notify_reward_amount(&owner, &(amount as i128));
            }
            FuzzAction::SetDuration { seconds } => {
                let _ = client.try_set_rewards_duration(&owner, &(seconds as u64));
            }
            FuzzAction::AdvanceTime { seconds } => {
                let now = env.ledger().timestamp();
                env.ledger().set_timestamp(now.saturating_add(seconds as u64));
            }
        }

        let pool = client.get_pool();
        let held = TokenClient::new(&env, &token).balance(&contract_id);
        assert_eq!(held, pool.reward_fund_balance + pool.total_principal);
    }
});
