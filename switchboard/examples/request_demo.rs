//! Single-owner requests and reply normalization.
//!
//! This example shows:
//! - Declaring requests with their reply types
//! - How each reply shape comes back when a request is handled and when it is not
//! - Claim conflicts and the two claim policies
//! - Forced release of a slot

use std::{cell::RefCell, collections::HashMap, rc::Rc};

use log::LevelFilter;
use switchboard::{
    ChannelLogger, ClaimPolicy, HandleRequest, NoSubscriber, Reply, Request, RequestChannel,
    RequestConfig, Subscriber,
};

// ============================================================================
// Requests
// ============================================================================

#[derive(Request)]
#[reply(u32)]
struct CountItems {
    kind: &'static str,
}

#[derive(Request)]
#[reply(Option<u32>)]
struct FindPrice {
    kind: &'static str,
}

#[derive(Request)]
#[reply(Result<u32, ShopError>)]
struct Buy {
    kind: &'static str,
}

#[derive(Request)]
#[reply(Box<Receipt>)]
struct LastReceipt;

#[derive(Request)]
struct Restock;

#[derive(Reply, Debug, Clone)]
struct Receipt {
    kind: &'static str,
    price: u32,
}

#[derive(NoSubscriber, Debug)]
enum ShopError {
    OutOfStock,
    #[no_subscriber]
    Closed,
}

// ============================================================================
// Subscribers
// ============================================================================

#[derive(Subscriber)]
#[requests(CountItems, FindPrice, Buy, LastReceipt, Restock)]
struct Shop {
    stock: HashMap<&'static str, u32>,
    prices: HashMap<&'static str, u32>,
    last: Option<Receipt>,
}

impl Shop {
    fn new() -> Self {
        Self {
            stock: HashMap::from([("potion", 2), ("sword", 0)]),
            prices: HashMap::from([("potion", 5), ("sword", 40)]),
            last: None,
        }
    }
}

impl HandleRequest<CountItems> for Shop {
    fn handle_request(&mut self, request: &CountItems) -> u32 {
        self.stock.get(request.kind).copied().unwrap_or(0)
    }
}

impl HandleRequest<FindPrice> for Shop {
    fn handle_request(&mut self, request: &FindPrice) -> Option<u32> {
        self.prices.get(request.kind).copied()
    }
}

impl HandleRequest<Buy> for Shop {
    fn handle_request(&mut self, request: &Buy) -> Result<u32, ShopError> {
        let price = self
            .prices
            .get(request.kind)
            .copied()
            .ok_or(ShopError::OutOfStock)?;
        match self.stock.get_mut(request.kind) {
            Some(count) if *count > 0 => {
                *count -= 1;
                self.last = Some(Receipt { kind: request.kind, price });
                Ok(price)
            }
            _ => Err(ShopError::OutOfStock),
        }
    }
}

impl HandleRequest<LastReceipt> for Shop {
    fn handle_request(&mut self, _request: &LastReceipt) -> Box<Receipt> {
        Box::new(self.last.clone().unwrap_or(Receipt {
            kind: "nothing",
            price: 0,
        }))
    }
}

impl HandleRequest<Restock> for Shop {
    fn handle_request(&mut self, _request: &Restock) {
        for count in self.stock.values_mut() {
            *count += 1;
        }
    }
}

#[derive(Subscriber, Default)]
#[requests(CountItems, Restock)]
struct Warehouse;

impl HandleRequest<CountItems> for Warehouse {
    fn handle_request(&mut self, _request: &CountItems) -> u32 {
        1000
    }
}

impl HandleRequest<Restock> for Warehouse {
    fn handle_request(&mut self, _request: &Restock) {}
}

fn ask(requests: &RequestChannel) {
    println!(
        "  count potions: {:?}",
        requests.dispatch(&CountItems { kind: "potion" })
    );
    println!(
        "  price of swords: {:?}",
        requests.dispatch(&FindPrice { kind: "sword" })
    );
    println!("  buy a potion: {:?}", requests.dispatch(&Buy { kind: "potion" }));
    println!("  buy a sword: {:?}", requests.dispatch(&Buy { kind: "sword" }));
    println!("  last receipt: {:?}", requests.dispatch(&LastReceipt));
}

fn main() {
    let (logger, records) = ChannelLogger::with_receiver();
    if let Err(err) = logger.with_level(LevelFilter::Debug).install() {
        eprintln!("logger not installed: {err}");
    }

    let mut requests = RequestChannel::new();

    println!("nobody subscribed:");
    ask(&requests);

    let shop = Rc::new(RefCell::new(Shop::new()));
    if let Err(err) = requests.subscribe(&shop) {
        eprintln!("shop: {err}");
    }

    println!("shop subscribed:");
    ask(&requests);
    requests.dispatch(&Restock);
    println!(
        "  after restock: {:?}",
        requests.dispatch(&CountItems { kind: "potion" })
    );

    let warehouse = Rc::new(RefCell::new(Warehouse));
    match requests.subscribe(&warehouse) {
        Ok(()) => println!("warehouse subscribed"),
        Err(err) => println!("warehouse turned away: {err}"),
    }

    println!("forced release of CountItems: {}", requests.release::<CountItems>());
    if let Err(err) = requests.subscribe_to::<CountItems, _>(&warehouse) {
        eprintln!("warehouse: {err}");
    }
    println!(
        "  count potions: {:?}",
        requests.dispatch(&CountItems { kind: "potion" })
    );

    let config = RequestConfig::default().with_claim_policy(ClaimPolicy::Partial);
    let mut partial = RequestChannel::with_config(config);
    let other_shop = Rc::new(RefCell::new(Shop::new()));
    if let Err(err) = partial.subscribe(&warehouse) {
        eprintln!("warehouse: {err}");
    }
    match partial.subscribe(&other_shop) {
        Ok(()) => println!("partial: shop took everything"),
        Err(err) => println!("partial: {err}, shop claimed {} of 5", partial.claimed_count() - 2),
    }

    println!("log:");
    for record in records.try_iter() {
        println!("  [{}] {}", record.level, record.message);
    }
}
