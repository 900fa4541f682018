/// Game list cache configuration.
/// All durations are in seconds.
pub const GAME_LIST_TTL_SECS: u64 = 300;
/// Upper bound on cached owners before eviction kicks in.
pub const GAME_LIST_MAX_OWNERS: u64 = 10_000;
