use anchor_lang::prelude::*;

use crate::{
    constants::*,
    errors::ThreadError,
    state::{ClockData, SerializableInstruction, Trigger, TriggerContext, WatchedAccount},
};

/// Tracks the current state of an automation thread.
#[account]
#[derive(Debug)]
pub struct Thread {
    /// The version of this thread structure, for migration purposes.
    pub version: u8,
    /// The owner of this thread.
    pub authority: Pubkey,
    /// The bump, used for PDA validation.
    pub bump: u8,
    /// The id of the thread, given by the authority.
    pub id: Vec<u8>,
    /// The name of the thread.
    pub name: String,
    /// The cluster clock at the moment the thread was created.
    pub created_at: ClockData,
    /// The instruction invoked on every trigger.
    pub target: SerializableInstruction,
    /// The triggering event to kickoff a thread.
    pub trigger: Trigger,
    /// Whether an execution is in flight.
    pub status: ThreadStatus,
    /// Whether or not the thread is currently paused.
    pub paused: bool,
    /// The number of successful executions.
    pub exec_count: u64,
    /// The context of the thread's last execution.
    pub exec_context: Option<ExecContext>,
}

/// Execution state of a thread.
#[derive(AnchorDeserialize, AnchorSerialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThreadStatus {
    Idle,
    Executing,
}

/// The execution context of a particular thread.
#[derive(AnchorDeserialize, AnchorSerialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExecContext {
    /// Slot of the last exec.
    pub last_exec_at: u64,

    /// Unix timestamp of the last exec.
    pub last_exec_timestamp: i64,

    /// Context for the triggering condition.
    pub trigger_context: TriggerContext,
}

impl ExecContext {
    pub const SPACE: usize = 8 + 8 + TriggerContext::SPACE;
}

impl Thread {
    pub fn new(
        authority: Pubkey,
        bump: u8,
        id: Vec<u8>,
        target: SerializableInstruction,
        trigger: Trigger,
        created_at: ClockData,
    ) -> Self {
        Thread {
            version: CURRENT_THREAD_VERSION,
            authority,
            bump,
            name: String::from_utf8_lossy(&id).to_string(),
            id,
            created_at,
            target,
            trigger,
            status: ThreadStatus::Idle,
            paused: false,
            exec_count: 0,
            exec_context: None,
        }
    }

    /// Derive the address and bump of a thread account.
    pub fn find_address(authority: &Pubkey, id: &[u8]) -> Result<(Pubkey, u8)> {
        require!(!id.is_empty(), ThreadError::InvalidThreadId);
        require!(id.len() <= MAX_THREAD_ID_LEN, ThreadError::ThreadIdTooLong);
        Pubkey::try_find_program_address(&[SEED_THREAD, authority.as_ref(), id], &crate::ID)
            .ok_or_else(|| error!(ThreadError::DerivationFailed))
    }

    /// Derive the pubkey of a thread account.
    pub fn pubkey(authority: &Pubkey, id: &[u8]) -> Result<Pubkey> {
        Self::find_address(authority, id).map(|(address, _)| address)
    }

    /// Account size, with room for the execution context recorded later.
    pub fn space(id: &[u8], target: &SerializableInstruction, trigger: &Trigger) -> usize {
        let id_len = id.len();
        let name_len = String::from_utf8_lossy(id).len();
        8 +                              // discriminator
        1 +                              // version
        32 +                             // authority
        1 +                              // bump
        4 + id_len +                     // id
        4 + name_len +                   // name
        ClockData::SPACE +               // created_at
        target.space() +                 // target
        trigger.space() +                // trigger
        1 +                              // status
        1 +                              // paused
        8 +                              // exec_count
        1 + ExecContext::SPACE // exec_context
    }

    pub fn last_exec_at(&self) -> Option<u64> {
        self.exec_context.map(|ctx| ctx.last_exec_at)
    }

    /// Evaluates the trigger condition without touching the thread.
    pub fn check_trigger(
        &self,
        clock: &ClockData,
        watched: Option<&WatchedAccount>,
    ) -> Result<TriggerContext> {
        self.trigger
            .evaluate(&self.created_at, self.exec_context.as_ref(), clock, watched)
    }

    /// Whether an execution submitted at `clock` would pass every gate.
    pub fn is_eligible(&self, clock: &ClockData, watched: Option<&WatchedAccount>) -> bool {
        self.check_exec_gates(clock, None).is_ok() && self.check_trigger(clock, watched).is_ok()
    }

    fn check_exec_gates(&self, clock: &ClockData, expected_exec_count: Option<u64>) -> Result<()> {
        require!(!self.paused, ThreadError::ThreadPaused);
        require!(
            self.status == ThreadStatus::Idle,
            ThreadError::TriggerConflict
        );
        if let Some(expected) = expected_exec_count {
            require!(expected == self.exec_count, ThreadError::TriggerConflict);
        }
        // One execution per slot keeps `last_exec_at` strictly increasing.
        if let Some(last_exec_at) = self.last_exec_at() {
            require!(clock.slot > last_exec_at, ThreadError::TriggerConflict);
        }
        Ok(())
    }

    /// Moves an idle thread to `Executing` if it may run at `clock`.
    ///
    /// `expected_exec_count` lets a caller assert the state it observed; a stale observation is a
    /// conflict. Returns the trigger context to pass to [`Thread::complete_exec`].
    pub fn begin_exec(
        &mut self,
        clock: &ClockData,
        expected_exec_count: Option<u64>,
        watched: Option<&WatchedAccount>,
    ) -> Result<TriggerContext> {
        self.check_exec_gates(clock, expected_exec_count)?;
        let trigger_context = self.check_trigger(clock, watched)?;
        self.status = ThreadStatus::Executing;
        Ok(trigger_context)
    }

    /// Records a successful execution and returns the thread to `Idle`.
    pub fn complete_exec(
        &mut self,
        clock: &ClockData,
        trigger_context: TriggerContext,
    ) -> Result<()> {
        require!(
            self.status == ThreadStatus::Executing,
            ThreadError::InvalidThreadState
        );
        self.exec_count = self
            .exec_count
            .checked_add(1)
            .ok_or(ThreadError::MathOverflow)?;
        self.exec_context = Some(ExecContext {
            last_exec_at: clock.slot,
            last_exec_timestamp: clock.unix_timestamp,
            trigger_context,
        });
        self.status = ThreadStatus::Idle;
        Ok(())
    }
}

impl PartialEq for Thread {
    fn eq(&self, other: &Self) -> bool {
        self.authority.eq(&other.authority) && self.id.eq(&other.id)
    }
}

impl Eq for Thread {}

impl TryFrom<Vec<u8>> for Thread {
    type Error = Error;

    fn try_from(data: Vec<u8>) -> std::result::Result<Self, Self::Error> {
        Thread::try_deserialize(&mut data.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::SerializableAccount;

    fn clock(slot: u64) -> ClockData {
        ClockData {
            slot,
            epoch: 0,
            unix_timestamp: 1_000 + slot as i64,
        }
    }

    fn target() -> SerializableInstruction {
        SerializableInstruction {
            program_id: Pubkey::new_unique(),
            accounts: vec![SerializableAccount {
                pubkey: PAYER_PUBKEY,
                is_signer: true,
                is_writable: true,
            }],
            data: vec![0; 8],
        }
    }

    fn thread(trigger: Trigger) -> Thread {
        Thread::new(
            Pubkey::new_unique(),
            255,
            b"thread-test".to_vec(),
            target(),
            trigger,
            clock(1),
        )
    }

    fn assert_error(result: Result<TriggerContext>, expected: ThreadError) {
        assert_eq!(
            result.unwrap_err(),
            anchor_lang::error::Error::from(expected)
        );
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let authority = Pubkey::new_unique();
        let first = Thread::find_address(&authority, b"thread-test").unwrap();
        let second = Thread::find_address(&authority, b"thread-test").unwrap();
        assert_eq!(first, second);
        assert_ne!(
            first.0,
            Thread::pubkey(&authority, b"thread-test-2").unwrap()
        );
        assert_ne!(
            first.0,
            Thread::pubkey(&Pubkey::new_unique(), b"thread-test").unwrap()
        );
    }

    #[test]
    fn test_derivation_rejects_bad_ids() {
        let authority = Pubkey::new_unique();
        assert!(Thread::find_address(&authority, b"").is_err());
        assert!(Thread::find_address(&authority, &[7u8; 33]).is_err());
        assert!(Thread::find_address(&authority, &[7u8; 32]).is_ok());
    }

    #[test]
    fn test_new_thread_is_idle_and_unexecuted() {
        let thread = thread(Trigger::Manual);
        assert_eq!(thread.status, ThreadStatus::Idle);
        assert_eq!(thread.exec_context, None);
        assert_eq!(thread.exec_count, 0);
        assert_eq!(thread.name, "thread-test");
    }

    #[test]
    fn test_exec_cycle_records_context() {
        let mut thread = thread(Trigger::Manual);
        let context = thread.begin_exec(&clock(5), Some(0), None).unwrap();
        assert_eq!(thread.status, ThreadStatus::Executing);

        thread.complete_exec(&clock(5), context).unwrap();
        assert_eq!(thread.status, ThreadStatus::Idle);
        assert_eq!(thread.exec_count, 1);
        assert_eq!(
            thread.exec_context,
            Some(ExecContext {
                last_exec_at: 5,
                last_exec_timestamp: 1_005,
                trigger_context: TriggerContext::Manual,
            })
        );
    }

    #[test]
    fn test_last_exec_at_strictly_increases() {
        let mut thread = thread(Trigger::Manual);
        let mut recorded = Vec::new();
        for slot in [2, 3, 7, 8, 20] {
            let context = thread.begin_exec(&clock(slot), None, None).unwrap();
            thread.complete_exec(&clock(slot), context).unwrap();
            recorded.push(thread.last_exec_at().unwrap());
        }
        assert_eq!(recorded.len(), 5);
        assert!(recorded.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_second_exec_in_same_slot_conflicts() {
        let mut thread = thread(Trigger::Manual);
        let context = thread.begin_exec(&clock(5), None, None).unwrap();
        thread.complete_exec(&clock(5), context).unwrap();

        assert_error(
            thread.begin_exec(&clock(5), None, None),
            ThreadError::TriggerConflict,
        );
        assert_eq!(thread.exec_count, 1);
    }

    #[test]
    fn test_exec_while_executing_conflicts() {
        let mut thread = thread(Trigger::Manual);
        thread.begin_exec(&clock(5), None, None).unwrap();
        assert_error(
            thread.begin_exec(&clock(6), None, None),
            ThreadError::TriggerConflict,
        );
    }

    #[test]
    fn test_stale_observation_conflicts() {
        let mut thread = thread(Trigger::Manual);
        let context = thread.begin_exec(&clock(5), Some(0), None).unwrap();
        thread.complete_exec(&clock(5), context).unwrap();
        assert_error(
            thread.begin_exec(&clock(6), Some(0), None),
            ThreadError::TriggerConflict,
        );
        assert!(thread.begin_exec(&clock(6), Some(1), None).is_ok());
    }

    #[test]
    fn test_paused_thread_is_rejected() {
        let mut thread = thread(Trigger::Manual);
        thread.paused = true;
        assert!(!thread.is_eligible(&clock(5), None));
        assert_error(
            thread.begin_exec(&clock(5), None, None),
            ThreadError::ThreadPaused,
        );
        assert_eq!(thread.status, ThreadStatus::Idle);
    }

    #[test]
    fn test_trigger_not_ready_leaves_thread_idle() {
        let mut thread = thread(Trigger::Slot { slot: 50 });
        assert_error(
            thread.begin_exec(&clock(5), None, None),
            ThreadError::TriggerNotReady,
        );
        assert_eq!(thread.status, ThreadStatus::Idle);
        assert!(thread.is_eligible(&clock(50), None));
    }

    #[test]
    fn test_complete_requires_begin() {
        let mut thread = thread(Trigger::Manual);
        assert!(thread
            .complete_exec(&clock(5), TriggerContext::Manual)
            .is_err());
    }

    #[test]
    fn test_space_fits_executed_thread() {
        let mut thread = thread(Trigger::Cron {
            schedule: "*/1 * * * * * *".into(),
            skippable: true,
        });
        let context = thread.begin_exec(&clock(5), None, None).unwrap();
        thread.complete_exec(&clock(5), context).unwrap();

        let mut data = Vec::new();
        thread.try_serialize(&mut data).unwrap();
        assert_eq!(
            data.len(),
            Thread::space(&thread.id, &thread.target, &thread.trigger)
        );

        let decoded = Thread::try_from(data).unwrap();
        assert_eq!(decoded.exec_context, thread.exec_context);
        assert_eq!(decoded.exec_count, 1);
    }
}
