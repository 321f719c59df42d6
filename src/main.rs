use std::ops::Bound;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use log::info;
use z80mem::{Address, Addressable, Init, Memory};

type Rom = Memory<0x0000, 0x3FFF>;
type Ram = Memory<0x4000, 0xFFFF>;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Region {
    Rom,
    Ram,
}

fn parse_number<T: TryFrom<u64>>(value: &str) -> Result<T, String> {
    let parsed = match value.strip_prefix("0x").or_else(|| value.strip_prefix('$')) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => value.parse::<u64>(),
    }
    .map_err(|e| format!("invalid number {:?}: {}", value, e))?;
    T::try_from(parsed).map_err(|_| format!("{:?} is out of range", value))
}

#[derive(Parser, Debug)]
#[command(version, about = "Inspect the ROM and RAM windows of a Z80 memory map", long_about = None)]
struct Args {
    #[arg(long, value_name = "PATH", help = "Load the ROM window from a file", value_hint = clap::ValueHint::FilePath)]
    rom: Option<PathBuf>,
    #[arg(long, value_name = "BYTE", value_parser = parse_number::<u8>, help = "Fill RAM with a byte instead of random values")]
    fill: Option<u8>,
    #[arg(long, help = "Seed for the random initial contents")]
    seed: Option<u64>,
    #[arg(long, value_enum, default_value_t = Region::Rom, help = "Region to dump")]
    region: Region,
    #[arg(long, value_name = "ADDR", value_parser = parse_number::<Address>, help = "First address to dump (inclusive)")]
    begin: Option<Address>,
    #[arg(long, value_name = "ADDR", value_parser = parse_number::<Address>, help = "Last address to dump (exclusive)")]
    end: Option<Address>,
    #[arg(long, value_name = "PATH", help = "Save the dumped span to a new file", value_hint = clap::ValueHint::FilePath)]
    save: Option<PathBuf>,
    #[arg(long, value_name = "ADDR", value_parser = parse_number::<Address>, help = "Print the byte at an address in either region")]
    peek: Option<Address>,
}

impl Args {
    fn span(&self) -> (Bound<Address>, Bound<Address>) {
        (
            self.begin.map_or(Bound::Unbounded, Bound::Included),
            self.end.map_or(Bound::Unbounded, Bound::Excluded),
        )
    }
}

fn report<const BEGIN: Address, const END: Address>(
    name: &str,
    memory: &Memory<BEGIN, END>,
    args: &Args,
) -> anyhow::Result<()> {
    let dump = memory
        .dump_range(args.span())
        .with_context(|| format!("dump {}", name))?;
    print!("{}", dump);

    if let Some(path) = &args.save {
        memory
            .save_range(path, args.span())
            .with_context(|| format!("save {} to {}", name, path.display()))?;
        info!("saved {} span to {}", name, path.display());
    }
    Ok(())
}

fn run(args: Args) -> anyhow::Result<()> {
    let seed = args.seed;
    let rom_init = args.rom.clone().map_or(Init::Random(seed), Init::File);
    let ram_init = args.fill.map_or(Init::Random(seed.map(|s| !s)), Init::Fill);

    let rom = Rom::with_init(rom_init).context("initialise rom")?;
    let ram = Ram::with_init(ram_init).context("initialise ram")?;
    let regions: [(&str, &dyn Addressable); 2] = [("rom", &rom), ("ram", &ram)];
    for (name, region) in regions {
        info!(
            "{} ${:04X}-${:04X}: {} bytes",
            name,
            region.address_begin(),
            region.address_end(),
            region.size()
        );
    }

    if let Some(address) = args.peek {
        let (name, region) = regions
            .iter()
            .find(|(_, r)| r.contains(address))
            .context("no region maps the address")?;
        let value = region
            .read(address)
            .with_context(|| format!("peek {}", name))?;
        println!("${:04X} = {:02X}", address, value);
    }

    match args.region {
        Region::Rom => report("rom", &rom, &args),
        Region::Ram => report("ram", &ram, &args),
    }
}

fn main() -> std::process::ExitCode {
    env_logger::init();

    let args = Args::parse();
    if let Err(e) = run(args) {
        eprintln!("error: {:?}", e);
        return std::process::ExitCode::FAILURE;
    }
    std::process::ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use std::ops::Bound;

    use clap::Parser;

    use super::{parse_number, Args};

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number::<u16>("0x1000"), Ok(0x1000));
        assert_eq!(parse_number::<u16>("$FFFF"), Ok(0xFFFF));
        assert_eq!(parse_number::<u16>("4096"), Ok(4096));
        assert_eq!(parse_number::<u8>("0xFF"), Ok(0xFF));
        assert!(parse_number::<u8>("0x100").is_err());
        assert!(parse_number::<u16>("zz").is_err());
    }

    #[test]
    fn test_args_span() {
        let args = Args::parse_from(["z80-emu", "--region", "ram", "--begin", "0x4000", "--end", "0x4010"]);
        assert_eq!(
            args.span(),
            (Bound::Included(0x4000), Bound::Excluded(0x4010))
        );

        let args = Args::parse_from(["z80-emu"]);
        assert_eq!(args.span(), (Bound::Unbounded, Bound::Unbounded));
    }
}
