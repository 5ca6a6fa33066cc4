//! Packbuf - Binary Buffer PoC
//!
//! Menjalankan micro-benchmark encode/decode, opsional dengan file
//! konfigurasi dan output capture.
//!
//! Usage:
//!   cargo run --release -- [--config <PATH>] [--capture <PATH>]
//!
//! Config INI (`[bench]`, atau file `.toml` dengan table yang sama):
//!   iterations = 1000000
//!   verbose = yes
//!   payload = de:ad:be:ef

use std::time::{Duration, Instant};

use packbuf::core::mapped;
use packbuf::{Buffer, Config, Dispatcher, Half, Packet, Ping};
use tracing_subscriber::EnvFilter;

const DEFAULT_ITERATIONS: usize = 1_000_000;

/// Benchmark settings
struct Settings {
    iterations: usize,
    verbose: bool,
    payload: Vec<u8>,
    capture: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            verbose: false,
            payload: vec![0u8; 64],
            capture: None,
        }
    }
}

impl Settings {
    fn apply(&mut self, config: &Config) {
        if let Some(n) = config
            .get_string("bench", "iterations")
            .and_then(|v| v.parse().ok())
        {
            self.iterations = n;
        }
        if let Some(verbose) = config.get_bool("bench", "verbose") {
            self.verbose = verbose;
        }
        match config.get_bytes("bench", "payload") {
            Ok(payload) => self.payload = payload,
            Err(e) => tracing::debug!(error = %e, "using default payload"),
        }
    }
}

fn parse_args() -> Settings {
    let args: Vec<String> = std::env::args().collect();
    let mut settings = Settings::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    match Config::load(&args[i + 1]) {
                        Ok(config) => settings.apply(&config),
                        Err(e) => {
                            eprintln!("❌ {}", e);
                            std::process::exit(1);
                        }
                    }
                    i += 1;
                }
            }
            "--capture" => {
                if i + 1 < args.len() {
                    settings.capture = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Packbuf - Binary Buffer PoC\n");
                println!("Usage: packbuf [OPTIONS]\n");
                println!("Options:");
                println!("  -c, --config <PATH>   Config file ([bench] iterations/verbose/payload)");
                println!("      --capture <PATH>  Write encoded ping frames to PATH and replay them");
                println!("  -h, --help            Show this help");
                std::process::exit(0);
            }
            _ => {}
        }
        i += 1;
    }

    settings
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let settings = parse_args();

    println!("🚀 Packbuf - Binary Buffer PoC");
    println!("==============================\n");

    benchmark_scalars(&settings);
    benchmark_strings(&settings);
    benchmark_packets(&settings);

    if let Some(path) = &settings.capture {
        if let Err(e) = replay_capture(path) {
            eprintln!("❌ Capture error: {}", e);
            std::process::exit(1);
        }
    }

    println!("\n✅ All benchmarks complete!");
}

/// `None` jika tidak ada operasi yang diukur
fn ns_per_op(ops: usize, elapsed: Duration) -> Option<f64> {
    (ops > 0).then(|| elapsed.as_nanos() as f64 / ops as f64)
}

fn report(label: &str, ops: usize, started: Instant) {
    match ns_per_op(ops, started.elapsed()) {
        Some(ns) => println!("  {:<14} {:.2} ns/op ({:.2} M ops/sec)", label, ns, 1_000.0 / ns),
        None => println!("  {:<14} skipped (0 ops)", label),
    }
}

fn benchmark_scalars(settings: &Settings) {
    println!("📊 Scalar Benchmark (u32 / f64 / half)");
    println!("--------------------------------------");

    let mut buffer = Buffer::new(4096);
    let per_round = 4096 / 14;

    let start = Instant::now();
    for i in 0..settings.iterations {
        if i % per_round == 0 {
            buffer.reset();
        }
        buffer
            .add(i as u32)
            .add(i as f64)
            .add(Half::from_f32(i as f32));
    }
    report("Add", settings.iterations, start);

    let mut checksum = 0u64;
    let start = Instant::now();
    for i in 0..settings.iterations {
        if i % per_round == 0 {
            buffer.set_reader_offset(0);
        }
        checksum = checksum.wrapping_add(buffer.get::<u32>() as u64);
        checksum = checksum.wrapping_add(buffer.get::<f64>() as u64);
        checksum = checksum.wrapping_add(buffer.get::<Half>().to_bits() as u64);
    }
    report("Get", settings.iterations, start);

    if settings.verbose {
        println!("  Checksum: {}", checksum);
    }
    println!();
}

fn benchmark_strings(settings: &Settings) {
    println!("📊 String & Bytes Benchmark");
    println!("---------------------------");

    let ops = settings.iterations / 10;
    let mut buffer = Buffer::new(1024 * 1024);
    let frame = 32 + settings.payload.len() + 16;

    let start = Instant::now();
    for _ in 0..ops {
        if buffer.writer_offset() + frame > buffer.capacity() {
            buffer.reset();
        }
        buffer
            .add_string("packbuf")
            .add_string_fixed("fixed-field", 16)
            .add_bytes(&settings.payload);
    }
    report("Encode", ops, start);

    buffer.set_reader_offset(0);
    let start = Instant::now();
    for _ in 0..ops {
        if buffer.remaining() < frame {
            buffer.set_reader_offset(0);
        }
        let _ = buffer.get_string();
        let _ = buffer.get_string_fixed(16);
        let _ = buffer.get_bytes(settings.payload.len());
    }
    report("Decode", ops, start);

    if settings.verbose {
        println!("  Payload size: {} bytes", settings.payload.len());
    }
    println!();
}

fn benchmark_packets(settings: &Settings) {
    println!("📊 Packet Benchmark (Ping pack + dispatch)");
    println!("------------------------------------------");

    let ops = settings.iterations / 10;
    let batch = 1024;
    let mut buffer = Buffer::new(batch * Ping::LENGTH as usize);

    let mut dispatcher = Dispatcher::new();
    dispatcher.register::<Ping>();

    let start = Instant::now();
    let mut dispatched = 0usize;
    while dispatched < ops {
        buffer.reset();
        for i in 0..batch {
            buffer.add_pack(&Ping::new(i as u32));
        }
        match dispatcher.dispatch_all(&mut buffer) {
            Ok(n) => dispatched += n,
            Err(e) => {
                eprintln!("⚠️ Dispatch error: {}", e);
                return;
            }
        }
    }
    report("Pack+Dispatch", dispatched, start);
    println!();
}

fn replay_capture(path: &str) -> std::io::Result<()> {
    println!("💾 Capture: {}", path);

    let mut buffer = Buffer::new(16 * Ping::LENGTH as usize);
    for i in 0..16 {
        buffer.add_pack(&Ping::new(i));
    }
    mapped::store(path, &buffer)?;

    let mut replay = mapped::load(path)?;
    let mut dispatcher = Dispatcher::new();
    dispatcher.register_with::<Ping, _>(|ping| {
        tracing::info!(ping_value = ping.ping_value(), "replayed");
    });

    match dispatcher.dispatch_all(&mut replay) {
        Ok(n) => println!("  Replayed {} packets ({} bytes)", n, replay.len()),
        Err(e) => eprintln!("⚠️ Replay stopped: {}", e),
    }
    Ok(())
}
