extern crate std;

use soroban_sdk::{
    testutils::{storage::Instance as _, Address as _, Ledger as _},
    Address, Env,
};

use crate::{
    default_tiers, ContractError, DepositPolicy, TieredStakingContract,
    TieredStakingContractClient,
};

fn setup() -> (Env, TieredStakingContractClient<'static>, Address) {
    let env = Env::default();
    env.mock_all_auths();

    let native = env.register_stellar_asset_contract_v2(Address::generate(&env));
    let contract_id = env.register(TieredStakingContract, ());
    let client = TieredStakingContractClient::new(&env, &contract_id);

    let owner = Address::generate(&env);
    client.initialize(
        &owner,
        &native.address(),
        &default_tiers(&env),
        &1,
        &DepositPolicy::OwnerOnly,
    );

    (env, client, owner)
}

fn instance_ttl(env: &Env, client: &TieredStakingContractClient) -> u32 {
    env.as_contract(&client.address, || env.storage().instance().get_ttl())
}

/// Move the ledger forward until the instance has `remaining` ledgers left.
fn age_instance(env: &Env, client: &TieredStakingContractClient, remaining: u32) {
    let ttl = instance_ttl(env, client);
    env.ledger()
        .set_sequence_number(env.ledger().sequence() + ttl - remaining);
    assert_eq!(instance_ttl(env, client), remaining);
}

#[test]
fn test_two_step_ownership_transfer() {
    let (env, client, owner) = setup();
    let successor = Address::generate(&env);

    client.propose_owner(&owner, &successor);
    assert_eq!(client.get_pending_owner(), Some(successor.clone()));
    // Nothing changes until the proposal is accepted.
    assert_eq!(client.get_owner(), owner);

    client.accept_owner(&successor);
    assert_eq!(client.get_owner(), successor);
    assert_eq!(client.get_pending_owner(), None);

    // The old owner lost its privileges; the new one holds them.
    let result = client.try_set_rewards_duration(&owner, &100);
    match result {
        Err(Ok(e)) => assert_eq!(e, ContractError::Unauthorized),
        _ => unreachable!("Expected Unauthorized"),
    }
    client.set_rewards_duration(&successor, &100);
}

#[test]
fn test_only_owner_can_propose() {
    let (env, client, _owner) = setup();
    let intruder = Address::generate(&env);

    let result = client.try_propose_owner(&intruder, &intruder);
    match result {
        Err(Ok(e)) => assert_eq!(e, ContractError::Unauthorized),
        _ => unreachable!("Expected Unauthorized"),
    }
    assert_eq!(client.get_pending_owner(), None);
}

#[test]
fn test_accept_by_wrong_address_fails() {
    let (env, client, owner) = setup();
    let successor = Address::generate(&env);
    let intruder = Address::generate(&env);

    client.propose_owner(&owner, &successor);

    let result = client.try_accept_owner(&intruder);
    match result {
        Err(Ok(e)) => assert_eq!(e, ContractError::Unauthorized),
        _ => unreachable!("Expected Unauthorized"),
    }
    assert_eq!(client.get_owner(), owner);
    assert_eq!(client.get_pending_owner(), Some(successor));
}

#[test]
fn test_accept_without_proposal_fails() {
    let (env, client, _owner) = setup();
    let someone = Address::generate(&env);

    let result = client.try_accept_owner(&someone);
    match result {
        Err(Ok(e)) => assert_eq!(e, ContractError::NoPendingOwner),
        _ => unreachable!("Expected NoPendingOwner"),
    }
}

#[test]
fn test_cancel_owner_transfer() {
    let (env, client, owner) = setup();
    let successor = Address::generate(&env);

    client.propose_owner(&owner, &successor);
    client.cancel_owner_transfer(&owner);
    assert_eq!(client.get_pending_owner(), None);

    let result = client.try_accept_owner(&successor);
    match result {
        Err(Ok(e)) => assert_eq!(e, ContractError::NoPendingOwner),
        _ => unreachable!("Expected NoPendingOwner"),
    }

    let result = client.try_cancel_owner_transfer(&owner);
    match result {
        Err(Ok(e)) => assert_eq!(e, ContractError::NoPendingOwner),
        _ => unreachable!("Expected NoPendingOwner"),
    }
}

#[test]
fn test_re_proposal_replaces_pending_owner() {
    let (env, client, owner) = setup();
    let first = Address::generate(&env);
    let second = Address::generate(&env);

    client.propose_owner(&owner, &first);
    client.propose_owner(&owner, &second);
    assert_eq!(client.get_pending_owner(), Some(second.clone()));

    let result = client.try_accept_owner(&first);
    match result {
        Err(Ok(e)) => assert_eq!(e, ContractError::Unauthorized),
        _ => unreachable!("Expected Unauthorized"),
    }
    client.accept_owner(&second);
    assert_eq!(client.get_owner(), second);
}

#[test]
fn test_owner_calls_require_auth() {
    let (env, client, owner) = setup();

    client.set_rewards_duration(&owner, &100);
    let auths = env.auths();
    assert_eq!(auths.len(), 1);
    assert_eq!(auths[0].0, owner);
}

#[test]
fn test_admin_calls_extend_instance_ttl() {
    let (env, client, owner) = setup();
    let successor = Address::generate(&env);

    age_instance(&env, &client, 1_000);
    client.set_rewards_duration(&owner, &100);
    assert!(instance_ttl(&env, &client) > 1_000);

    age_instance(&env, &client, 1_000);
    client.set_deposit_policy(&owner, &DepositPolicy::Open);
    assert!(instance_ttl(&env, &client) > 1_000);

    age_instance(&env, &client, 1_000);
    client.propose_owner(&owner, &successor);
    assert!(instance_ttl(&env, &client) > 1_000);

    age_instance(&env, &client, 1_000);
    client.cancel_owner_transfer(&owner);
    assert!(instance_ttl(&env, &client) > 1_000);

    client.propose_owner(&owner, &successor);
    age_instance(&env, &client, 1_000);
    client.accept_owner(&successor);
    assert!(instance_ttl(&env, &client) > 1_000);
}
