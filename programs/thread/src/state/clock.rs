use anchor_lang::prelude::*;

/// A snapshot of the cluster clock.
#[derive(AnchorDeserialize, AnchorSerialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClockData {
    pub slot: u64,
    pub epoch: u64,
    pub unix_timestamp: i64,
}

impl ClockData {
    pub const SPACE: usize = 8 + 8 + 8;
}

impl From<Clock> for ClockData {
    fn from(clock: Clock) -> Self {
        ClockData::from(&clock)
    }
}

impl From<&Clock> for ClockData {
    fn from(clock: &Clock) -> Self {
        ClockData {
            slot: clock.slot,
            epoch: clock.epoch,
            unix_timestamp: clock.unix_timestamp,
        }
    }
}
