use soroban_sdk::contracterror;

/// Error codes returned by every entry point of the staking contract.
///
/// # Code ranges
/// | Range   | Purpose                        |
/// |---------|--------------------------------|
/// | 1 – 9   | Lifecycle / initialisation     |
/// | 10 – 19 | Authorisation                  |
/// | 20 – 29 | Validation / input             |
/// | 30 – 39 | Stake ledger                   |
/// | 40 – 49 | Reward pool                    |
/// | 50 – 59 | Fixed-point arithmetic         |
/// | 60 – 69 | Ownership hand-over            |
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum ContractError {
    // ── Lifecycle (1–9) ──────────────────────────────────────
    NotInitialized = 1,
    AlreadyInitialized = 2,

    // ── Auth (10–19) ─────────────────────────────────────────
    /// Caller is not the pool owner.
    Unauthorized = 10,

    // ── Validation (20–29) ───────────────────────────────────
    /// Amount is zero, negative, or below the configured minimum stake.
    InvalidAmount = 20,
    /// The transferred value does not equal the declared amount.
    AmountMismatch = 21,
    /// No lock tier with the requested id exists.
    InvalidTier = 22,
    /// The tier table supplied at initialisation is empty, too large,
    /// has duplicate ids or a zero multiplier.
    InvalidTierTable = 23,
    /// A rewards duration of zero seconds.
    InvalidDuration = 24,
    /// Reward amount is not positive, or the resulting rate floors to zero.
    InvalidRewardAmount = 25,

    // ── Stake ledger (30–39) ─────────────────────────────────
    StakeNotFound = 30,
    AlreadyWithdrawn = 31,
    /// The stake's lock has not matured yet.
    StakeNotFinished = 32,

    // ── Reward pool (40–49) ──────────────────────────────────
    /// The cadence cannot change while a distribution window is open.
    RewardPeriodActive = 40,
    /// `notify_reward_amount` called before any rewards duration was set.
    RewardsDurationNotSet = 41,
    /// The reward fund cannot back the reward portion of a payout.
    InsufficientRewardPool = 42,

    // ── Math (50–59) ─────────────────────────────────────────
    Overflow = 50,
    Underflow = 51,
    DivisionByZero = 52,

    // ── Ownership (60–69) ────────────────────────────────────
    NoPendingOwner = 60,
}
