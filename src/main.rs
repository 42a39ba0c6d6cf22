#[macro_use]
extern crate log;

use std::convert::TryFrom;
use std::fs;

use anyhow::{Context, Result};
use clap::{crate_version, App, Arg};

use lr35902::cpu::reg::parse_assignment;
use lr35902::gameboy::{Config, GameBoy};

/// One frame's worth of cycles.
const FRAME_CYCLES: &str = "70224";

fn parse_number(name: &str, s: &str) -> Result<u64> {
  let parsed = if let Some(hex) = s.strip_prefix("0x") {
    u64::from_str_radix(hex, 16)
  } else {
    s.parse::<u64>()
  };
  parsed.with_context(|| format!("invalid value `{}` for --{}", s, name))
}

fn main() -> Result<()> {
  let matches = App::new("lr35902")
    .version(crate_version!())
    .about("Runs a program on a cycle-stepped LR35902 core")
    .arg(
      Arg::with_name("program")
        .help("Raw program image, loaded at address 0")
        .index(1),
    )
    .arg(
      Arg::with_name("cycles")
        .long("cycles")
        .takes_value(true)
        .default_value(FRAME_CYCLES),
    )
    .arg(
      Arg::with_name("quantum")
        .long("quantum")
        .help("Cycles between interrupt controller events")
        .takes_value(true)
        .default_value("4"),
    )
    .arg(
      Arg::with_name("tac")
        .long("tac")
        .help("Initial timer control register")
        .takes_value(true)
        .default_value("0"),
    )
    .arg(
      Arg::with_name("ie")
        .long("ie")
        .help("Interrupt enable mask")
        .takes_value(true)
        .default_value("0"),
    )
    .arg(
      Arg::with_name("ime")
        .long("ime")
        .help("Start with interrupts enabled"),
    )
    .arg(
      Arg::with_name("reg")
        .long("reg")
        .help("Register preset, e.g. pc=0x100")
        .takes_value(true)
        .multiple(true)
        .number_of_values(1),
    )
    .arg(
      Arg::with_name("verbose")
        .short("v")
        .multiple(true)
        .help("Raise log verbosity"),
    )
    .get_matches();

  let level = match matches.occurrences_of("verbose") {
    0 => "info",
    1 => "debug",
    _ => "trace",
  };
  env_logger::Builder::from_env(
    env_logger::Env::default().default_filter_or(level),
  )
  .init();

  let program = match matches.value_of("program") {
    Some(path) => {
      fs::read(path).with_context(|| format!("reading {}", path))?
    }
    None => Vec::new(),
  };

  let number = |name: &str| -> Result<u64> {
    parse_number(name, matches.value_of(name).unwrap_or("0"))
  };
  macro_rules! arg {
    ($name:expr, $ty:ty) => {
      <$ty>::try_from(number($name)?)
        .with_context(|| format!("--{} out of range", $name))?
    };
  }
  let cycles = arg!("cycles", u32);
  let mut config = Config {
    quantum: arg!("quantum", u32),
    tac: arg!("tac", u8),
    interrupt_enable: arg!("ie", u8),
    ime: matches.is_present("ime"),
    ..Config::default()
  };
  if let Some(values) = matches.values_of("reg") {
    for value in values {
      config.registers.push(parse_assignment(value)?);
    }
  }

  info!("loaded {} bytes", program.len());
  let mut gb = GameBoy::new(&program, config)?;
  let ran = gb.run(cycles);
  info!("ran {} of {} cycles", ran, cycles);
  println!("{}", gb.cpu().core);
  Ok(())
}
