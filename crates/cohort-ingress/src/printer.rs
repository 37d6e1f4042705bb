//! Text rendering of the event stream.
//!
//! ```text
//! A <id> <instrument> <price> <qty> <B|S> <ts>          order added
//! X <id> <Y|N> <ts>                                     cancel (found or not)
//! E <resting> <incoming> <seq> <price> <qty> <ts>       execution
//! ```

use std::io::Write;

use cohort_matchcore::OutputSink;
use cohort_types::{BookEvent, Side};

/// Render one event as a protocol line, without the trailing newline.
#[must_use]
pub fn format_event(event: &BookEvent) -> String {
    match event {
        BookEvent::Added(a) => format!(
            "A {} {} {} {} {} {}",
            a.order_id,
            a.instrument,
            a.price,
            a.quantity,
            match a.side {
                Side::Buy => 'B',
                Side::Sell => 'S',
            },
            a.timestamp.as_nanos()
        ),
        BookEvent::Cancelled(c) => format!(
            "X {} {} {}",
            c.order_id,
            if c.found { 'Y' } else { 'N' },
            c.timestamp.as_nanos()
        ),
        BookEvent::Executed(x) => format!(
            "E {} {} {} {} {} {}",
            x.resting_order_id,
            x.incoming_order_id,
            x.execution_seq,
            x.price,
            x.quantity,
            x.timestamp.as_nanos()
        ),
    }
}

/// Writes one line per event and flushes at each cohort boundary.
///
/// Write failures are logged once, then ignored.
#[derive(Debug)]
pub struct LineSink<W> {
    out: W,
    failed: bool,
    written: u64,
}

impl<W: Write + Send> LineSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            failed: false,
            written: 0,
        }
    }

    /// Lines written successfully.
    #[must_use]
    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn record(&mut self, result: std::io::Result<()>) {
        match result {
            Ok(()) => {}
            Err(err) if !self.failed => {
                self.failed = true;
                tracing::warn!(error = %err, "Event output failed; later failures are silent");
            }
            Err(_) => {}
        }
    }
}

impl<W: Write + Send> OutputSink for LineSink<W> {
    fn deliver(&mut self, event: &BookEvent) {
        let result = writeln!(self.out, "{}", format_event(event));
        if result.is_ok() {
            self.written += 1;
        }
        self.record(result);
    }

    fn end_cohort(&mut self) {
        let result = self.out.flush();
        self.record(result);
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use cohort_types::{Instrument, OrderAdded, OrderCancelled, OrderExecuted, OrderId, Timestamp};

    use super::*;

    #[test]
    fn formats_every_event_kind() {
        let added = BookEvent::Added(OrderAdded {
            order_id: OrderId(3),
            instrument: Instrument::new("GOOG"),
            price: 120,
            quantity: 40,
            side: Side::Sell,
            timestamp: Timestamp(1_000),
        });
        assert_eq!(format_event(&added), "A 3 GOOG 120 40 S 1000");

        let cancelled = BookEvent::Cancelled(OrderCancelled {
            order_id: OrderId(3),
            found: false,
            timestamp: Timestamp(1_001),
        });
        assert_eq!(format_event(&cancelled), "X 3 N 1001");

        let executed = BookEvent::Executed(OrderExecuted {
            resting_order_id: OrderId(3),
            incoming_order_id: OrderId(9),
            execution_seq: 2,
            price: 120,
            quantity: 5,
            timestamp: Timestamp(1_002),
        });
        assert_eq!(format_event(&executed), "E 3 9 2 120 5 1002");
    }

    #[test]
    fn line_sink_writes_lines() {
        let mut sink = LineSink::new(Vec::new());
        sink.deliver(&BookEvent::Cancelled(OrderCancelled {
            order_id: OrderId(1),
            found: true,
            timestamp: Timestamp(7),
        }));
        sink.end_cohort();
        assert_eq!(sink.written(), 1);
        assert_eq!(String::from_utf8(sink.into_inner()).unwrap(), "X 1 Y 7\n");
    }

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn line_sink_survives_write_errors() {
        let mut sink = LineSink::new(Broken);
        let event = BookEvent::Cancelled(OrderCancelled {
            order_id: OrderId(1),
            found: true,
            timestamp: Timestamp(7),
        });
        sink.deliver(&event);
        sink.deliver(&event);
        sink.end_cohort();
        assert_eq!(sink.written(), 0);
        assert!(sink.failed);
    }
}
