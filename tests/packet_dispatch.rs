//! Packet Dispatch Test
//!
//! Encode beberapa tipe packet ke satu buffer (dan ke capture file),
//! lalu decode lewat `Dispatcher`.
//!
//! Usage:
//!   cargo test --test packet_dispatch

use std::cell::RefCell;
use std::fs;
use std::rc::Rc;

use packbuf::core::mapped;
use packbuf::{Buffer, DispatchError, Dispatcher, Frame, Half, Packable, Packet, Ping};

/// Status report dengan field fixed-size dan Ping nested di body
#[derive(Debug, Default, Clone, PartialEq)]
struct Status {
    node: String,
    load: Half,
    last_ping: Ping,
    processed: bool,
}

impl Packable for Status {
    fn pack(&self, buffer: &mut Buffer) {
        let frame = Frame::begin::<Self>(buffer);
        buffer
            .add_string_fixed(&self.node, 12)
            .add(self.load)
            .add_pack(&self.last_ping);
        frame.end(buffer);
    }

    fn unpack(&mut self, buffer: &mut Buffer) {
        let Some(frame) = Frame::open::<Self>(buffer) else {
            return;
        };
        self.node = buffer.get_string_fixed(12);
        self.load = buffer.get();
        buffer.get_pack(&mut self.last_ping);
        frame.close(buffer);
    }
}

impl Packet for Status {
    const ID: u8 = 0x21;
    // 3 header + 12 node + 2 load + 16 ping + 3 pad
    const LENGTH: u16 = 36;

    fn process(&mut self) {
        self.processed = true;
    }
}

fn status(node: &str, ping: u32) -> Status {
    Status {
        node: node.to_string(),
        load: Half::from_f32(0.75),
        last_ping: Ping::new(ping),
        processed: false,
    }
}

fn dispatcher(log: &Rc<RefCell<Vec<String>>>) -> Dispatcher {
    let mut dispatcher = Dispatcher::new();

    let sink = Rc::clone(log);
    dispatcher.register_with::<Ping, _>(move |ping| {
        sink.borrow_mut().push(format!("ping {}", ping.ping_value()));
    });

    let sink = Rc::clone(log);
    dispatcher.register_with::<Status, _>(move |status| {
        assert!(status.processed);
        sink.borrow_mut().push(format!(
            "status {} {} {}",
            status.node,
            status.load,
            status.last_ping.ping_value()
        ));
    });

    dispatcher
}

#[test]
fn status_frame_has_declared_length() {
    let mut buf = Buffer::new(128);
    buf.add_pack(&status("edge-01", 5));
    assert_eq!(buf.len(), Status::LENGTH as usize);
    assert_eq!(buf.writer_offset(), Status::LENGTH as usize);
}

#[test]
fn dispatches_mixed_stream_in_order() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut dispatcher = dispatcher(&log);

    let mut buf = Buffer::new(256);
    buf.add_pack(&Ping::new(1))
        .add_pack(&status("edge-01", 2))
        .add_pack(&Ping::new(3));

    assert_eq!(dispatcher.dispatch(&mut buf), Ok(Ping::ID));
    assert_eq!(dispatcher.dispatch(&mut buf), Ok(Status::ID));
    assert_eq!(dispatcher.dispatch_all(&mut buf), Ok(1));
    assert_eq!(
        *log.borrow(),
        vec!["ping 1", "status edge-01 0.75 2", "ping 3"]
    );
    assert_eq!(buf.remaining(), 0);
}

#[test]
fn dispatch_all_stops_at_unknown_packet() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut dispatcher = dispatcher(&log);

    let mut buf = Buffer::new(256);
    buf.add_pack(&Ping::new(1));
    let bad_offset = buf.writer_offset();
    buf.add(0x7Fu8).add(16u16).add_bytes(&[0; 13]);
    buf.add_pack(&Ping::new(2));

    assert_eq!(
        dispatcher.dispatch_all(&mut buf),
        Err(DispatchError::UnknownPacket {
            id: 0x7F,
            offset: bad_offset
        })
    );
    assert_eq!(buf.reader_offset(), bad_offset);
    assert_eq!(*log.borrow(), vec!["ping 1"]);

    // Skip frame yang tidak dikenal, lanjut
    buf.set_reader_offset(bad_offset + 16);
    assert_eq!(dispatcher.dispatch_all(&mut buf), Ok(1));
    assert_eq!(dispatcher.dispatched(), 2);
}

#[test]
fn replays_capture_file() {
    let path = "test_dispatch_capture.bin";
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut dispatcher = dispatcher(&log);

    let mut buf = Buffer::new(256);
    for i in 0..3 {
        buf.add_pack(&status(&format!("node-{i}"), i));
    }
    mapped::store(path, &buf).unwrap();

    let mut replay = mapped::load(path).unwrap();
    assert_eq!(replay.capacity(), 3 * Status::LENGTH as usize);
    assert_eq!(dispatcher.dispatch_all(&mut replay), Ok(3));
    assert_eq!(
        *log.borrow(),
        vec![
            "status node-0 0.75 0",
            "status node-1 0.75 1",
            "status node-2 0.75 2"
        ]
    );

    fs::remove_file(path).ok();
}

#[test]
fn truncated_capture_reports_missing_bytes() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut dispatcher = dispatcher(&log);

    let mut full = Buffer::new(64);
    full.add_pack(&status("cut", 9));
    let mut cut = Buffer::from_bytes(&full.as_bytes()[..20]);

    assert_eq!(
        dispatcher.dispatch(&mut cut),
        Err(DispatchError::Truncated {
            id: Status::ID,
            needed: 36,
            available: 20
        })
    );
    assert!(log.borrow().is_empty());
}
