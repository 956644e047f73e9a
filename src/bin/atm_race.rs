//! A deliberately broken bank account, kept as a standalone toy.
//!
//! Sixteen customers each deposit and withdraw the same amount fifty
//! times, so the closing balance should equal the opening balance.  In
//! the default mode every operation reads the balance under one lock
//! acquisition and writes it back under a second, with a millisecond of
//! settlement in between.  Two customers can read the same balance
//! and the later write silently erases the earlier one, so the closing
//! balance drifts.  Run with `--fixed` and each operation holds the
//! lock across the whole read-settle-write, which makes the drift
//! impossible.
//!
//! The broken mode is the point of the program.  Do not fix it.

extern crate crossbeam;

use std::env;
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

const STARTING_BALANCE: i64 = 500;
const CUSTOMERS: usize = 16;
const ROUNDS: usize = 50;
const AMOUNT: i64 = 50;

/// The one shared account.  Nothing here but a balance behind a mutex;
/// every access goes through the lock, so the memory itself is safe no
/// matter what the callers get wrong.
struct Account {
    balance: Mutex<i64>,
}

impl Account {
    fn new(balance: i64) -> Account {
        Account {
            balance: Mutex::new(balance),
        }
    }

    fn balance(&self) -> i64 {
        *self.balance.lock().unwrap()
    }

    // Simulates the slow settlement write of a core-banking system,
    // with the lock released during the delay.  This is the window the
    // race runs through.
    fn settle(&self, balance: i64) -> i64 {
        thread::sleep(Duration::from_millis(1));
        let mut guard = self.balance.lock().unwrap();
        *guard = balance;
        *guard
    }

    /// Credits the account and reports the balance it settled at.
    fn deposit(&self, amount: i64) -> i64 {
        let read = self.balance();
        self.settle(read + amount)
    }

    /// Debits the account if the balance it read covers the amount;
    /// otherwise reports the current balance untouched.
    fn withdraw(&self, amount: i64) -> i64 {
        let read = self.balance();
        if read >= amount {
            self.settle(read - amount)
        } else {
            self.balance()
        }
    }

    /// Like `deposit`, with the lock held across the settlement.
    fn deposit_locked(&self, amount: i64) -> i64 {
        let mut guard = self.balance.lock().unwrap();
        thread::sleep(Duration::from_millis(1));
        *guard += amount;
        *guard
    }

    /// Like `withdraw`, with the lock held across the settlement.
    fn withdraw_locked(&self, amount: i64) -> i64 {
        let mut guard = self.balance.lock().unwrap();
        if *guard >= amount {
            thread::sleep(Duration::from_millis(1));
            *guard -= amount;
        }
        *guard
    }
}

/// Timestamps every line with the elapsed clock, so the interleaving
/// that produced a drift can be read back out of the transcript.
fn log(start: Instant, customer: usize, message: &str) {
    let elapsed = start.elapsed();
    println!(
        "[{}.{:06}s] Customer {}: {}",
        elapsed.as_secs(),
        elapsed.subsec_micros(),
        customer,
        message
    );
}

fn main() {
    let fixed = env::args().any(|arg| arg == "--fixed");

    let account = Account::new(STARTING_BALANCE);
    let start = Instant::now();

    crossbeam::scope(|spawner| {
        for id in 0..CUSTOMERS {
            let account = &account;
            spawner.spawn(move |_| {
                for _ in 0..ROUNDS {
                    log(start, id, &format!("Depositing ${}", AMOUNT));
                    let balance = if fixed {
                        account.deposit_locked(AMOUNT)
                    } else {
                        account.deposit(AMOUNT)
                    };
                    log(start, id, &format!("New balance is ${}", balance));

                    log(start, id, &format!("Withdrawing ${}", AMOUNT));
                    let balance = if fixed {
                        account.withdraw_locked(AMOUNT)
                    } else {
                        account.withdraw(AMOUNT)
                    };
                    log(start, id, &format!("New balance is ${}", balance));
                }
            });
        }
    })
    .unwrap();

    let final_balance = account.balance();
    if final_balance != STARTING_BALANCE {
        println!("WOAH! Balance changed! It is now ${}", final_balance);
    } else {
        println!("Finished. Balance is just fine at ${}", final_balance);
    }
}
