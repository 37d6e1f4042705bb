//! End-to-end tests: text in, text out, through real worker threads.

use std::io::{Cursor, Write};
use std::net::{Shutdown, TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;

use cohort_ingress::*;
use cohort_matchcore::{Exchange, VecSink};
use cohort_types::{BookEvent, Command, OrderId, Side};
use crossbeam::channel;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Strip the trailing timestamp from an output line.
fn without_ts(line: &str) -> &str {
    line.rsplit_once(' ').map_or(line, |(head, _)| head)
}

#[test]
fn scripted_session_prints_expected_lines() {
    let input = "\
# two sells, then a buy that sweeps one and a half
S 1 ACME 99 5
S 2 ACME 100 10
B 3 ACME 100 12
C 2
C 2
B 4 TOOLONGNAME 1 1
";
    let exchange = Exchange::new(LineSink::new(Vec::new()));
    let mut source = LineSource::new(Cursor::new(input), LineDecoder::default());
    let report = run_worker(&exchange, &mut source);
    assert_eq!(report.exit, WorkerExit::EndOfInput);
    assert_eq!(report.processed, 5);
    assert_eq!(source.rejected(), 1);

    let output = String::from_utf8(exchange.into_sink().into_inner()).unwrap();
    let lines: Vec<&str> = output.lines().map(without_ts).collect();
    assert_eq!(
        lines,
        vec![
            "A 1 ACME 99 5 S",
            "A 2 ACME 100 10 S",
            "E 1 3 1 99 5",
            "E 2 3 1 100 7",
            "X 2 Y",
            "X 2 N",
        ]
    );

    let stamps: Vec<u64> = output
        .lines()
        .map(|l| l.rsplit(' ').next().unwrap().parse().unwrap())
        .collect();
    assert!(stamps.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn tcp_connections_feed_one_book() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let sink = VecSink::new();
    let log = sink.handle();
    let exchange = Arc::new(Exchange::new(sink));

    let server = {
        let exchange = Arc::clone(&exchange);
        thread::spawn(move || {
            serve_connections(&listener, exchange, LineDecoder::default(), Some(2))
        })
    };

    let clients: Vec<_> = [("S", 0u32), ("B", 1000u32)]
        .into_iter()
        .map(|(kind, base)| {
            thread::spawn(move || {
                let mut stream = TcpStream::connect(addr).unwrap();
                for n in 1..=100 {
                    writeln!(stream, "{kind} {} TCP 50 1", base + n).unwrap();
                }
                stream.shutdown(Shutdown::Write).unwrap();
            })
        })
        .collect();
    for client in clients {
        client.join().unwrap();
    }

    let reports = server.join().unwrap().unwrap();
    assert_eq!(reports.len(), 2);
    assert!(reports.iter().all(|r| r.exit == WorkerExit::EndOfInput));
    assert_eq!(reports.iter().map(|r| r.processed).sum::<u64>(), 200);

    // 100 sells and 100 buys of one lot at one price: every lot trades.
    let executed: u32 = log
        .events()
        .iter()
        .filter_map(|e| match e {
            BookEvent::Executed(x) => Some(x.quantity),
            _ => None,
        })
        .sum();
    assert_eq!(executed, 100);
    assert_eq!(exchange.resting_count(Side::Buy), 0);
    assert_eq!(exchange.resting_count(Side::Sell), 0);
}

#[test]
fn channel_sources_in_a_pool() {
    let sink = VecSink::new();
    let log = sink.handle();
    let exchange = Arc::new(Exchange::new(sink));
    let mut pool = WorkerPool::new(Arc::clone(&exchange));

    let mut senders = Vec::new();
    for _ in 0..3 {
        let (tx, rx) = channel::bounded(16);
        pool.spawn(ChannelSource::new(rx)).unwrap();
        senders.push(tx);
    }

    let mut rng = StdRng::seed_from_u64(99);
    let mut next_id = 0u32;
    for _ in 0..300 {
        next_id += 1;
        let command = if rng.gen_bool(0.5) {
            Command::buy(next_id, "CH", rng.gen_range(10..=12), rng.gen_range(1..=4))
        } else {
            Command::sell(next_id, "CH", rng.gen_range(10..=12), rng.gen_range(1..=4))
        };
        senders[rng.gen_range(0..senders.len())].send(command).unwrap();
    }
    drop(senders);

    let reports = pool.join().unwrap();
    assert_eq!(reports.iter().map(|r| r.processed).sum::<u64>(), 300);

    // Each order either rested (in part) or traded away: every id shows up.
    let mut seen = std::collections::BTreeSet::new();
    for event in log.events() {
        match event {
            BookEvent::Added(a) => {
                seen.insert(a.order_id);
            }
            BookEvent::Executed(x) => {
                seen.insert(x.incoming_order_id);
            }
            BookEvent::Cancelled(_) => unreachable!("no cancels submitted"),
        }
    }
    assert_eq!(seen.len(), 300);
    assert!(seen.contains(&OrderId(1)) && seen.contains(&OrderId(300)));

    // The book never holds a crossed market after a merge.
    exchange.with_book(|book| {
        let best_bid = book.buys().first().map(|o| o.price);
        let best_ask = book.sells().first().map(|o| o.price);
        if let (Some(bid), Some(ask)) = (best_bid, best_ask) {
            assert!(bid < ask, "crossed book: bid {bid} ask {ask}");
        }
    });
}
