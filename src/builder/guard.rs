use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

use solana_sdk::pubkey::Pubkey;

type ClaimKey = (Pubkey, Pubkey);

#[derive(Debug, Clone, Copy)]
enum Slot {
    Building,
    Issued(Instant),
}

/// Tracks `(pool, fee claimer)` pairs with a build in progress or a
/// transaction issued less than `window` ago.
#[derive(Clone)]
pub struct InFlightClaims {
    window: Duration,
    slots: Arc<Mutex<HashMap<ClaimKey, Slot>>>,
}

/// Why a pair could not be acquired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimBusy {
    Building,
    IssuedRecently { retry_in: Duration },
}

/// Held while a claim transaction is being built. Dropping it without
/// [`ClaimTicket::issue`] frees the pair right away.
pub struct ClaimTicket {
    key: ClaimKey,
    slots: Arc<Mutex<HashMap<ClaimKey, Slot>>>,
    issued: bool,
}

impl InFlightClaims {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            slots: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn try_acquire(
        &self,
        pool: Pubkey,
        fee_claimer: Pubkey,
    ) -> Result<ClaimTicket, ClaimBusy> {
        let key = (pool, fee_claimer);
        let now = Instant::now();
        let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());

        slots.retain(|_, slot| match slot {
            Slot::Building => true,
            Slot::Issued(at) => now.duration_since(*at) < self.window,
        });

        match slots.get(&key) {
            Some(Slot::Building) => return Err(ClaimBusy::Building),
            Some(Slot::Issued(at)) => {
                return Err(ClaimBusy::IssuedRecently {
                    retry_in: self.window.saturating_sub(now.duration_since(*at)),
                })
            }
            None => {}
        }

        slots.insert(key, Slot::Building);

        Ok(ClaimTicket {
            key,
            slots: self.slots.clone(),
            issued: false,
        })
    }
}

impl ClaimTicket {
    /// Keeps the pair reserved for the rest of the window.
    pub fn issue(mut self) {
        let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        slots.insert(self.key, Slot::Issued(Instant::now()));
        self.issued = true;
    }
}

impl Drop for ClaimTicket {
    fn drop(&mut self) {
        if self.issued {
            return;
        }

        let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        slots.remove(&self.key);
    }
}
