use anchor_lang::{
    prelude::*,
    solana_program::instruction::{AccountMeta, Instruction},
};

use crate::constants::PAYER_PUBKEY;

/// An instruction stored on a thread and invoked on every trigger.
#[derive(AnchorDeserialize, AnchorSerialize, Clone, Debug, Hash, PartialEq, Eq)]
pub struct SerializableInstruction {
    pub program_id: Pubkey,
    pub accounts: Vec<SerializableAccount>,
    pub data: Vec<u8>,
}

/// Account metadata of a [`SerializableInstruction`].
#[derive(AnchorDeserialize, AnchorSerialize, Clone, Debug, Hash, PartialEq, Eq)]
pub struct SerializableAccount {
    pub pubkey: Pubkey,
    pub is_signer: bool,
    pub is_writable: bool,
}

impl SerializableAccount {
    pub const SPACE: usize = 32 + 1 + 1;
}

impl SerializableInstruction {
    pub fn space(&self) -> usize {
        32 + 4 + self.accounts.len() * SerializableAccount::SPACE + 4 + self.data.len()
    }

    /// Builds the instruction to invoke, substituting `PAYER_PUBKEY` with `payer`.
    pub fn resolve(&self, payer: &Pubkey) -> Instruction {
        let mut instruction = Instruction::from(self);
        for meta in instruction.accounts.iter_mut() {
            if meta.pubkey.eq(&PAYER_PUBKEY) {
                meta.pubkey = *payer;
            }
        }
        instruction
    }
}

impl From<Instruction> for SerializableInstruction {
    fn from(instruction: Instruction) -> Self {
        SerializableInstruction {
            program_id: instruction.program_id,
            accounts: instruction
                .accounts
                .iter()
                .map(|meta| SerializableAccount {
                    pubkey: meta.pubkey,
                    is_signer: meta.is_signer,
                    is_writable: meta.is_writable,
                })
                .collect(),
            data: instruction.data,
        }
    }
}

impl From<&SerializableInstruction> for Instruction {
    fn from(instruction: &SerializableInstruction) -> Self {
        Instruction {
            program_id: instruction.program_id,
            accounts: instruction
                .accounts
                .iter()
                .map(|account| AccountMeta {
                    pubkey: account.pubkey,
                    is_signer: account.is_signer,
                    is_writable: account.is_writable,
                })
                .collect(),
            data: instruction.data.clone(),
        }
    }
}
