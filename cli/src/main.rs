use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use espfat_core::{
    parse_size, parse_u32, ImageFormatter, ImageOptions, ImageReport, SerialSource,
    DEFAULT_IMAGE_NAME,
};
use espfat_formatters::{
    Fat12ImageFormatter, FixedSerial, ImageFileWriter, SeededSerial, UuidSerial,
};
use log::LevelFilter;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "espfat")]
#[command(about = "Generate empty FAT12 filesystem images for ESP flash partitions", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write an empty filesystem image
    Create {
        /// Partition size in bytes, decimal or 0x hex (prompted for when omitted)
        size: Option<String>,
        /// Output image path
        #[arg(short, long, default_value = DEFAULT_IMAGE_NAME)]
        output: PathBuf,
        /// Use this volume serial instead of a random one
        #[arg(long, value_parser = parse_serial)]
        serial: Option<u32>,
        /// Seed for a reproducible volume serial
        #[arg(long, conflicts_with = "serial")]
        seed: Option<u64>,
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Show the layout an image of the given size would get
    Info {
        /// Partition size in bytes, decimal or 0x hex
        size: String,
        #[command(flatten)]
        common: CommonArgs,
    },
}

#[derive(Args)]
struct CommonArgs {
    /// Partition start from the partition table, to print the esptool command
    #[arg(long, value_parser = parse_offset)]
    partition_offset: Option<u64>,
    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

fn parse_serial(s: &str) -> Result<u32, String> {
    parse_u32(s).map_err(|e| e.to_string())
}

fn parse_offset(s: &str) -> Result<u64, String> {
    parse_size(s).map_err(|e| e.to_string())
}

fn prompt_for_size() -> anyhow::Result<String> {
    println!("Enter partition size (in hex or decimal) :");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line)
}

fn print_report(out: &mut impl Write, report: &ImageReport, json: bool) -> anyhow::Result<()> {
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(report)?)?;
        return Ok(());
    }

    writeln!(out, "Size    : {} bytes", report.size_bytes)?;
    writeln!(out, "Sectors : {} ({} data)", report.total_sectors, report.data_sectors)?;
    writeln!(out, "FAT     : {} sector(s), {} reserved", report.sectors_per_fat, report.reserved_sectors)?;
    if let Some(serial) = report.serial {
        writeln!(out, "Serial  : {} ({:#010x})", serial, serial)?;
    }
    if let Some(hint) = report.esptool_hint() {
        writeln!(out, "\nFlash with:\n  {}", hint)?;
    }
    Ok(())
}

fn serial_source(options: &ImageOptions) -> Box<dyn SerialSource> {
    match (options.serial, options.seed) {
        (Some(serial), _) => Box::new(FixedSerial(serial)),
        (None, Some(seed)) => Box::new(SeededSerial::new(seed)),
        (None, None) => Box::new(UuidSerial),
    }
}

/// Validate, then write the whole image. Nothing is created for invalid options.
fn create_image(formatter: &Fat12ImageFormatter, options: &ImageOptions) -> anyhow::Result<ImageReport> {
    formatter.validate_options(options)?;

    let mut serials = serial_source(options);
    let mut writer = ImageFileWriter::create(&options.output)
        .with_context(|| format!("Cannot create {}", options.output.display()))?;
    let report = formatter.format(options, serials.as_mut(), &mut writer)?;
    writer
        .commit()
        .with_context(|| format!("Cannot write {}", options.output.display()))?;
    Ok(report)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let formatter = Fat12ImageFormatter;

    match cli.command {
        Commands::Create { size, output, serial, seed, common } => {
            let size = match size {
                Some(size) => size,
                None => prompt_for_size()?,
            };
            let options = ImageOptions {
                size_bytes: parse_size(&size)?,
                output,
                serial,
                seed,
                partition_offset: common.partition_offset,
            };

            if !common.json {
                println!("Generating {} filesystem", formatter.name());
            }
            let report = create_image(&formatter, &options)?;
            print_report(&mut io::stdout(), &report, common.json)?;
        }
        Commands::Info { size, common } => {
            let options = ImageOptions {
                size_bytes: parse_size(&size)?,
                partition_offset: common.partition_offset,
                ..Default::default()
            };
            let report = formatter.dry_run(&options)?;
            print_report(&mut io::stdout(), &report, common.json)?;
        }
    }

    Ok(())
}
