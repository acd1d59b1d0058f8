/// Sending encoded sentences to a consumer.
///
/// The [`Transmitter`] owns a fix stream and a transport. Once per [`TimeDelta`] it samples the
/// clock, asks the stream for a fix, encodes it, and sends it as a single datagram.
use std::{
    fmt::Display,
    io::Write,
    marker::PhantomData,
    net::{SocketAddr, ToSocketAddrs, UdpSocket},
    thread::sleep,
};

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::{
    model::{FixStream, TimeDelta},
    protocol::{rmc::Rmc, FixMsg},
    Error, TGResult,
};

/// Somewhere to send encoded sentences.
pub trait Transport {
    fn send(&mut self, bytes: &[u8]) -> TGResult<()>;
    /// Human readable destination, for logging.
    fn destination(&self) -> String;
}

/// Source of the current UTC time.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// UDP transport sending every sentence to one fixed address.
pub struct UdpTransport {
    socket: UdpSocket,
    dest: SocketAddr,
    label: String,
}

impl UdpTransport {
    /// Resolve `host:port` once and bind an ephemeral local socket of the same address family.
    pub fn connect(host: &str, port: u16) -> TGResult<Self> {
        let dest = (host, port).to_socket_addrs()?.next().ok_or_else(|| {
            Error::TransmissionError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no address found for {host}:{port}"),
            ))
        })?;
        let bind_addr: SocketAddr = if dest.is_ipv4() {
            ([0, 0, 0, 0], 0).into()
        } else {
            ([0u16; 8], 0).into()
        };
        let socket = UdpSocket::bind(bind_addr)?;
        debug!("bound {:?} for destination {}", socket.local_addr(), dest);
        Ok(Self {
            socket,
            dest,
            label: format!("{host}:{port}"),
        })
    }

    pub fn dest_addr(&self) -> SocketAddr {
        self.dest
    }
}

impl Transport for UdpTransport {
    fn send(&mut self, bytes: &[u8]) -> TGResult<()> {
        let sent = self.socket.send_to(bytes, self.dest)?;
        if sent != bytes.len() {
            return Err(Error::TransmissionError(std::io::Error::new(
                std::io::ErrorKind::WriteZero,
                format!("short datagram: {sent} of {} bytes", bytes.len()),
            )));
        }
        Ok(())
    }

    fn destination(&self) -> String {
        self.label.clone()
    }
}

/// Periodic sender. `M` is the sentence type generated from each fix, RMC by default.
pub struct Transmitter<S, T, W, C = SystemClock, M = Rmc> {
    stream: S,
    transport: T,
    console: W,
    clock: C,
    interval: TimeDelta,
    _msg: PhantomData<M>,
}

impl<S, T, W> Transmitter<S, T, W>
where
    S: FixStream,
    T: Transport,
    W: Write,
{
    pub fn new(stream: S, transport: T, console: W, interval: TimeDelta) -> Self {
        Self::with_clock(stream, transport, console, interval, SystemClock)
    }
}

impl<S, T, W, C, M> Transmitter<S, T, W, C, M>
where
    S: FixStream,
    T: Transport,
    W: Write,
    C: Clock,
    M: FixMsg + Display,
{
    pub fn with_clock(stream: S, transport: T, console: W, interval: TimeDelta, clock: C) -> Self {
        Self {
            stream,
            transport,
            console,
            clock,
            interval,
            _msg: PhantomData,
        }
    }

    /// Sleep one interval, then encode and send a single sentence.
    pub fn step(&mut self) -> TGResult<M> {
        sleep(self.interval.as_duration());
        let fix = self.stream.next_fix(self.clock.now())?;
        let msg = M::from_fix(&fix)?;
        self.transport.send(&msg.to_bytes())?;
        let dest = self.transport.destination();
        debug!("sent {} to {}", msg, dest);
        writeln!(self.console, "Sent {} to {}", msg, dest)?;
        Ok(msg)
    }

    /// Send sentences until `count` have gone out, or forever if `count` is `None`. Returns the
    /// number sent. Any error stops the loop.
    pub fn run(&mut self, count: Option<u64>) -> TGResult<u64> {
        info!(
            "sending to {} every {:.3} s",
            self.transport.destination(),
            self.interval.seconds()
        );
        let mut sent: u64 = 0;
        while count.map_or(true, |n| sent < n) {
            self.step()?;
            sent += 1;
        }
        Ok(sent)
    }

    pub fn into_parts(self) -> (S, T, W) {
        (self.stream, self.transport, self.console)
    }
}

#[cfg(test)]
mod test {
    use std::{cell::Cell, time::Duration};

    use chrono::{NaiveTime, TimeZone};

    use super::*;
    use crate::{
        fix::{FixStatus, NavigationFix},
        lazy_init_tracing,
        model::Stationary,
        protocol::nmea,
    };

    #[derive(Default)]
    struct VecTransport {
        sent: Vec<Vec<u8>>,
    }

    impl Transport for VecTransport {
        fn send(&mut self, bytes: &[u8]) -> TGResult<()> {
            self.sent.push(bytes.to_vec());
            Ok(())
        }

        fn destination(&self) -> String {
            "memory:0".to_string()
        }
    }

    struct FailingTransport;

    impl Transport for FailingTransport {
        fn send(&mut self, _bytes: &[u8]) -> TGResult<()> {
            Err(std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused").into())
        }

        fn destination(&self) -> String {
            "nowhere:1".to_string()
        }
    }

    /// Clock that ticks one second per call.
    struct StepClock {
        next: Cell<DateTime<Utc>>,
    }

    impl Clock for StepClock {
        fn now(&self) -> DateTime<Utc> {
            let now = self.next.get();
            self.next.set(now + chrono::Duration::seconds(1));
            now
        }
    }

    fn fix() -> NavigationFix {
        NavigationFix {
            timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            latitude_deg: 51.5,
            longitude_deg: -0.1,
            status: FixStatus::Valid,
            speed_knots: 0.1,
            course_deg: 90.0,
        }
    }

    fn time_field(sentence: &[u8]) -> NaiveTime {
        let text = std::str::from_utf8(sentence).unwrap();
        let field = text.split(',').nth(1).unwrap();
        NaiveTime::parse_from_str(field, "%H%M%S%.f").unwrap()
    }

    #[test]
    fn test_run_counts_and_logs() {
        lazy_init_tracing();
        let clock = StepClock {
            next: Cell::new(Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()),
        };
        let mut tx: Transmitter<_, _, _, _, Rmc> = Transmitter::with_clock(
            Stationary::new(fix()).unwrap(),
            VecTransport::default(),
            Vec::new(),
            TimeDelta::from_millis(0),
            clock,
        );
        assert_eq!(tx.run(Some(3)).unwrap(), 3);
        let (_, transport, console) = tx.into_parts();

        assert_eq!(transport.sent.len(), 3);
        assert!(transport.sent[0].starts_with(b"$GPRMC,120000.000000,A,5130.0000,N,"));
        assert!(transport.sent[2].starts_with(b"$GPRMC,120002.000000,"));

        let console = String::from_utf8(console).unwrap();
        let lines: Vec<&str> = console.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "Sent $GPRMC,120000.000000,A,5130.0000,N,00006.0000,W,0.10,90.00,010124,*31 to memory:0"
        );
    }

    #[test]
    fn test_cadence_with_system_clock() {
        lazy_init_tracing();
        let mut tx = Transmitter::new(
            Stationary::new(fix()).unwrap(),
            VecTransport::default(),
            std::io::sink(),
            Duration::from_millis(20).into(),
        );
        let n = 5;
        assert_eq!(tx.run(Some(n)).unwrap(), n);
        let (_, transport, _) = tx.into_parts();
        assert_eq!(transport.sent.len() as u64, n);
        let times: Vec<NaiveTime> = transport.sent.iter().map(|s| time_field(s)).collect();
        // tolerate a midnight rollover during the run
        let rollovers = times.windows(2).filter(|w| w[1] < w[0]).count();
        assert!(rollovers <= 1, "times not increasing: {:?}", times);
    }

    #[test]
    fn test_run_zero_count_sends_nothing() {
        let mut tx = Transmitter::new(
            Stationary::new(fix()).unwrap(),
            VecTransport::default(),
            std::io::sink(),
            TimeDelta::from_millis(0),
        );
        assert_eq!(tx.run(Some(0)).unwrap(), 0);
        assert!(tx.into_parts().1.sent.is_empty());
    }

    #[test]
    fn test_send_failure_is_fatal() {
        let mut console = Vec::new();
        let mut tx = Transmitter::new(
            Stationary::new(fix()).unwrap(),
            FailingTransport,
            &mut console,
            TimeDelta::from_millis(0),
        );
        assert!(matches!(tx.run(None), Err(Error::TransmissionError(_))));
        drop(tx);
        assert!(console.is_empty());
    }

    #[test]
    fn test_udp_loopback() {
        lazy_init_tracing();
        let receiver = UdpSocket::bind("127.0.0.1:0").unwrap();
        receiver
            .set_read_timeout(Some(Duration::from_secs(5)))
            .unwrap();
        let port = receiver.local_addr().unwrap().port();

        let transport = UdpTransport::connect("127.0.0.1", port).unwrap();
        assert_eq!(transport.destination(), format!("127.0.0.1:{port}"));
        assert_eq!(transport.dest_addr().port(), port);

        let mut tx = Transmitter::new(
            Stationary::new(fix()).unwrap(),
            transport,
            std::io::sink(),
            TimeDelta::from_millis(0),
        );
        assert_eq!(tx.run(Some(2)).unwrap(), 2);

        let mut buf = [0u8; 512];
        for _ in 0..2 {
            let len = receiver.recv(&mut buf).unwrap();
            let datagram = std::str::from_utf8(&buf[..len]).unwrap();
            assert!(datagram.starts_with("$GPRMC,"));
            assert!(datagram.ends_with("\r\n"));
            let (body, checksum) = datagram[1..datagram.len() - 2].split_once('*').unwrap();
            assert_eq!(checksum, nmea::checksum_hex(body));
            assert!(body.contains(",A,5130.0000,N,00006.0000,W,0.10,90.00,"));
        }
    }

    #[test]
    fn test_unresolvable_host() {
        let res = UdpTransport::connect("no such host.invalid", 10110);
        assert!(matches!(res, Err(Error::TransmissionError(_))));
    }
}
