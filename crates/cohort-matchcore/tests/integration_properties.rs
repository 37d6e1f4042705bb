//! Integration tests: observable properties of the event stream and book.
//!
//! Every test drives an `Exchange` end to end and checks the flushed event
//! stream against the book left behind.

use std::collections::{BTreeMap, HashMap};

use cohort_matchcore::{DigestSink, EventLog, Exchange, VecSink};
use cohort_types::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn exchange() -> (Exchange<VecSink>, EventLog) {
    let sink = VecSink::new();
    let log = sink.handle();
    (Exchange::new(sink), log)
}

fn executions(events: &[BookEvent]) -> Vec<OrderExecuted> {
    events
        .iter()
        .filter_map(|e| match e {
            BookEvent::Executed(x) => Some(*x),
            _ => None,
        })
        .collect()
}

/// Live orders implied by an event stream: Added minus fills, minus cancels.
fn expected_book(events: &[BookEvent]) -> BTreeMap<OrderId, u32> {
    let mut live = BTreeMap::new();
    for event in events {
        match event {
            BookEvent::Added(a) => {
                live.insert(a.order_id, a.quantity);
            }
            BookEvent::Executed(x) => {
                if let Some(residual) = live.get_mut(&x.resting_order_id) {
                    *residual -= x.quantity;
                }
            }
            BookEvent::Cancelled(c) if c.found => {
                live.remove(&c.order_id);
            }
            BookEvent::Cancelled(_) => {}
        }
    }
    live.retain(|_, residual| *residual > 0);
    live
}

fn actual_book<S: cohort_matchcore::OutputSink>(ex: &Exchange<S>) -> BTreeMap<OrderId, u32> {
    ex.with_book(|book| {
        book.iter()
            .inspect(|o| assert!(o.is_live(), "merge left dead order {}", o.id))
            .map(|o| (o.id, o.residual()))
            .collect()
    })
}

#[test]
fn price_time_priority_example() {
    let (ex, log) = exchange();
    ex.process(Command::sell(1, "X", 99, 5));
    ex.process(Command::sell(2, "X", 100, 10));
    ex.process(Command::buy(3, "X", 100, 12));

    let events = log.events();
    let execs = executions(&events);
    assert_eq!(execs.len(), 2);

    assert_eq!(execs[0].resting_order_id, OrderId(1));
    assert_eq!(execs[0].incoming_order_id, OrderId(3));
    assert_eq!(execs[0].quantity, 5);
    assert_eq!(execs[0].price, 99);
    assert_eq!(execs[0].execution_seq, 1);

    assert_eq!(execs[1].resting_order_id, OrderId(2));
    assert_eq!(execs[1].quantity, 7);
    assert_eq!(execs[1].price, 100);

    let added_after_buy = events.iter().skip(2).filter(|e| e.is_added()).count();
    assert_eq!(added_after_buy, 0, "fully filled buy must not rest");
    assert_eq!(actual_book(&ex), BTreeMap::from([(OrderId(2), 3)]));
}

#[test]
fn non_crossing_buy_rests() {
    let (ex, log) = exchange();
    ex.process(Command::sell(1, "X", 60, 5));
    ex.process(Command::buy(2, "X", 50, 10));

    let events = log.events();
    assert_eq!(events.len(), 2);
    let BookEvent::Added(added) = &events[1] else {
        panic!("expected Added, got {:?}", events[1]);
    };
    assert_eq!(added.order_id, OrderId(2));
    assert_eq!((added.price, added.quantity, added.side), (50, 10, Side::Buy));

    ex.with_book(|book| {
        assert_eq!(book.buys().len(), 1);
        assert_eq!(book.buys()[0].price, 50);
        assert_eq!(book.buys()[0].residual(), 10);
    });
}

#[test]
fn cancel_of_unknown_filled_or_cancelled_id() {
    let (ex, log) = exchange();
    ex.process(Command::sell(1, "X", 10, 5));
    ex.process(Command::buy(2, "X", 10, 5)); // fills #1
    ex.process(Command::buy(3, "X", 5, 5));
    ex.process(Command::cancel(3));
    let before = actual_book(&ex);
    assert!(before.is_empty());

    for id in [1, 3, 999] {
        let seen = log.len();
        ex.process(Command::cancel(id));
        let fresh = &log.events()[seen..];
        assert_eq!(
            fresh,
            &[BookEvent::Cancelled(OrderCancelled {
                order_id: OrderId(id),
                found: false,
                timestamp: fresh[0].timestamp(),
            })]
        );
        assert_eq!(actual_book(&ex), before);
    }
}

#[test]
fn cancel_right_after_add_removes_permanently() {
    let (ex, log) = exchange();
    ex.process(Command::sell(7, "X", 100, 4));
    ex.process(Command::cancel(7));

    let events = log.events();
    assert!(matches!(
        events[1],
        BookEvent::Cancelled(OrderCancelled { found: true, .. })
    ));
    assert_eq!(ex.resting_count(Side::Sell), 0);

    // A crossing buy now finds nothing and rests.
    ex.process(Command::buy(8, "X", 200, 4));
    assert!(log.events()[2].is_added());
    assert_eq!(ex.resting_count(Side::Buy), 1);
}

#[test]
fn instruments_do_not_cross() {
    let (ex, log) = exchange();
    ex.process(Command::sell(1, "AAA", 10, 5));
    ex.process(Command::buy(2, "BBB", 10, 5));
    assert!(executions(&log.events()).is_empty());
    assert_eq!(actual_book(&ex).len(), 2);

    ex.process(Command::buy(3, "AAA", 11, 2));
    let execs = executions(&log.events());
    assert_eq!(execs.len(), 1);
    assert_eq!(execs[0].resting_order_id, OrderId(1));
    assert_eq!(execs[0].price, 10);
}

#[test]
fn random_sequential_stream_matches_book() {
    let mut rng = StdRng::seed_from_u64(0xC0FFEE);
    let (ex, log) = exchange();
    let mut quantities = HashMap::new();

    for id in 1..=2_000u32 {
        let command = match rng.gen_range(0..10) {
            0..=3 => Command::buy(id, "X", rng.gen_range(90..=110), rng.gen_range(1..=20)),
            4..=7 => Command::sell(id, "X", rng.gen_range(90..=110), rng.gen_range(1..=20)),
            _ => Command::cancel(rng.gen_range(1..=id)),
        };
        if command.kind != CommandKind::Cancel {
            quantities.insert(command.order_id, command.quantity);
        }
        ex.process(command);
    }

    let events = log.events();
    assert_eq!(expected_book(&events), actual_book(&ex));

    // Every incoming order is accounted for: filled plus rested.
    let mut filled: HashMap<OrderId, u32> = HashMap::new();
    for x in executions(&events) {
        *filled.entry(x.incoming_order_id).or_default() += x.quantity;
    }
    for event in &events {
        if let BookEvent::Added(a) = event {
            *filled.entry(a.order_id).or_default() += a.quantity;
        }
    }
    assert_eq!(filled, quantities);

    // Sequential processing means execution numbers follow stream order.
    let mut last_seq: HashMap<OrderId, u32> = HashMap::new();
    for x in executions(&events) {
        let prev = last_seq.insert(x.resting_order_id, x.execution_seq).unwrap_or(0);
        assert_eq!(x.execution_seq, prev + 1);
    }
}

#[test]
fn identical_runs_share_a_stream_root() {
    let commands: Vec<Command> = {
        let mut rng = StdRng::seed_from_u64(7);
        (1..=500u32)
            .map(|id| match rng.gen_range(0..3) {
                0 => Command::buy(id, "X", rng.gen_range(95..=105), rng.gen_range(1..=9)),
                1 => Command::sell(id, "X", rng.gen_range(95..=105), rng.gen_range(1..=9)),
                _ => Command::cancel(rng.gen_range(1..=id)),
            })
            .collect()
    };

    let run = |commands: &[Command]| {
        let ex = Exchange::new(DigestSink::new(VecSink::new()));
        for c in commands {
            ex.process(c.clone());
        }
        ex.into_sink()
    };

    let a = run(&commands);
    let b = run(&commands);
    assert_eq!(a.events_seen(), b.events_seen());
    assert_eq!(a.root(), b.root());

    let events = a.into_inner().handle().events();
    assert!(verify_root(&events, &b.root()));
}

fn verify_root(events: &[BookEvent], root: &[u8; 32]) -> bool {
    cohort_matchcore::verify_stream_root(events, root)
}
