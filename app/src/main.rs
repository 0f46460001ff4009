//! A small service bus: a clock, a bank, and an auditor talking only through a mediator.

use std::{cell::RefCell, rc::Rc};

use log::{LevelFilter, info};
use switchboard::{
    ChannelLogger, Event, HandleEvent, HandleRequest, Mediator, NoSubscriber, Request, Subscriber,
};

#[derive(Event)]
struct DayStarted {
    day: u32,
}

#[derive(Event)]
struct Deposited {
    account: &'static str,
    amount: u64,
}

#[derive(Request)]
#[reply(u64)]
struct Balance {
    account: &'static str,
}

#[derive(Request)]
#[reply(Result<u64, BankError>)]
struct Withdraw {
    account: &'static str,
    amount: u64,
}

#[derive(Request)]
#[reply(Vec<String>)]
struct AuditTrail;

#[derive(NoSubscriber, Debug)]
enum BankError {
    #[allow(dead_code)]
    Insufficient { available: u64 },
    #[no_subscriber]
    Closed,
}

#[derive(Subscriber, Default)]
#[events(DayStarted, Deposited)]
#[requests(Balance, Withdraw)]
struct Bank {
    day: u32,
    accounts: Vec<(&'static str, u64)>,
}

impl Bank {
    fn account(&mut self, name: &'static str) -> &mut u64 {
        let index = match self.accounts.iter().position(|(n, _)| *n == name) {
            Some(index) => index,
            None => {
                self.accounts.push((name, 0));
                self.accounts.len() - 1
            }
        };
        &mut self.accounts[index].1
    }
}

impl HandleEvent<DayStarted> for Bank {
    fn handle_event(&mut self, event: &DayStarted) {
        self.day = event.day;
    }
}

impl HandleEvent<Deposited> for Bank {
    fn handle_event(&mut self, event: &Deposited) {
        *self.account(event.account) += event.amount;
    }
}

impl HandleRequest<Balance> for Bank {
    fn handle_request(&mut self, request: &Balance) -> u64 {
        *self.account(request.account)
    }
}

impl HandleRequest<Withdraw> for Bank {
    fn handle_request(&mut self, request: &Withdraw) -> Result<u64, BankError> {
        let balance = self.account(request.account);
        if *balance < request.amount {
            return Err(BankError::Insufficient {
                available: *balance,
            });
        }
        *balance -= request.amount;
        Ok(*balance)
    }
}

#[derive(Subscriber, Default)]
#[events(DayStarted, Deposited)]
#[requests(AuditTrail)]
struct Auditor {
    day: u32,
    trail: Vec<String>,
}

impl HandleEvent<DayStarted> for Auditor {
    fn handle_event(&mut self, event: &DayStarted) {
        self.day = event.day;
    }
}

impl HandleEvent<Deposited> for Auditor {
    fn handle_event(&mut self, event: &Deposited) {
        self.trail
            .push(format!("day {}: {} +{}", self.day, event.account, event.amount));
    }
}

impl HandleRequest<AuditTrail> for Auditor {
    fn handle_request(&mut self, _request: &AuditTrail) -> Vec<String> {
        self.trail.clone()
    }
}

fn main() {
    let (logger, records) = ChannelLogger::with_receiver();
    if let Err(err) = logger.with_level(LevelFilter::Debug).install() {
        eprintln!("logger not installed: {err}");
    }

    let mut bus = Mediator::new();
    let bank = Rc::new(RefCell::new(Bank::default()));
    let auditor = Rc::new(RefCell::new(Auditor::default()));

    for result in [bus.subscribe(&bank), bus.subscribe(&auditor)] {
        if let Err(err) = result {
            eprintln!("subscribe failed: {err}");
        }
    }

    bus.publish(&DayStarted { day: 1 });
    bus.publish(&Deposited {
        account: "alice",
        amount: 120,
    });
    bus.publish(&Deposited {
        account: "bob",
        amount: 40,
    });

    info!("alice has {:?}", bus.send(&Balance { account: "alice" }));
    info!(
        "bob withdraws 50: {:?}",
        bus.send(&Withdraw {
            account: "bob",
            amount: 50
        })
    );
    info!(
        "alice withdraws 20: {:?}",
        bus.send(&Withdraw {
            account: "alice",
            amount: 20
        })
    );

    bus.publish(&DayStarted { day: 2 });
    bus.unsubscribe(&bank);

    info!(
        "bank closed, withdraw: {:?}",
        bus.send(&Withdraw {
            account: "alice",
            amount: 1
        })
    );
    info!("bank closed, balance: {:?}", bus.send(&Balance { account: "alice" }));
    info!("audit trail: {:?}", bus.send(&AuditTrail));

    for record in records.try_iter() {
        println!("[{:<5}] {}: {}", record.level, record.target, record.message);
    }
}
