use std::path::PathBuf;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use log::debug;

use convert::{convert, ConversionReport, ConversionRequest};
use scale::ScaleLimits;

mod convert;
mod header;
mod rgb565;
mod scale;

const USAGE_EXAMPLES: &str = "\
Examples:
  rgb565-header logo.png logo.h company_logo
  rgb565-header photo.jpg photo.h my_photo 100 100
  rgb565-header icon.png icon.h icon_data 48 48

Recommended sizes:
  - Small icons: 32x32 or 48x48
  - Medium images: 64x64 or 100x100
  - Large images: 160x160 or 200x200
  - Full screen: 240x320 (not recommended - 150KB)";

/// Image to RGB565 C array converter for small color displays.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None, after_long_help = USAGE_EXAMPLES)]
struct Args {
    /// Input image file (PNG, JPG, BMP, etc.)
    input: PathBuf,

    /// Output .h header file
    output: PathBuf,

    /// Variable name for the C array
    varname: String,

    /// Maximum width, the image is scaled down if it is wider
    max_width: Option<u64>,

    /// Maximum height, the image is scaled down if it is taller
    max_height: Option<u64>,

    // 多余的参数直接忽略
    #[arg(hide = true)]
    _extra: Vec<String>,
}

fn main() -> ExitCode {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .try_init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => return usage_error(err),
    };
    debug!("{args:?}");

    let req = ConversionRequest {
        input: args.input,
        output: args.output,
        var_name: args.varname,
        limits: ScaleLimits::new(clamp_limit(args.max_width), clamp_limit(args.max_height)),
    };

    match convert(&req) {
        Ok(report) => {
            print_summary(&req, &report);
            ExitCode::SUCCESS
        }
        Err(err) => {
            debug!("{err:?}");
            eprintln!("✗ Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

/// 超出u32的限制不可能被图像尺寸超过, 等同于不缩放
fn clamp_limit(limit: Option<u64>) -> Option<u32> {
    limit.map(|v| u32::try_from(v).unwrap_or(u32::MAX))
}

fn usage_error(err: clap::Error) -> ExitCode {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            let _ = err.print();
            ExitCode::SUCCESS
        }
        // 参数不足时打印完整用法
        ErrorKind::MissingRequiredArgument
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
            let _ = Args::command().print_long_help();
            ExitCode::FAILURE
        }
        _ => {
            let _ = err.print();
            ExitCode::FAILURE
        }
    }
}

fn print_summary(req: &ConversionRequest, report: &ConversionReport) {
    println!("✓ Successfully converted {}", req.input.display());
    println!("  Output: {}", req.output.display());
    println!("  Image size: {}x{}", report.width, report.height);
    println!("  Total pixels: {}", report.pixel_count());
    println!(
        "  Array size: {} bytes ({:.2} KB)",
        report.byte_size(),
        report.byte_size() as f64 / 1024.0
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn huge_limits_are_clamped() {
        assert_eq!(clamp_limit(Some(5_000_000_000)), Some(u32::MAX));
        assert_eq!(clamp_limit(Some(48)), Some(48));
        assert_eq!(clamp_limit(None), None);
    }

    #[test]
    fn trailing_arguments_are_ignored() {
        let args = Args::try_parse_from(["rgb565-header", "a.png", "a.h", "a", "10", "20", "extra", "more"]).unwrap();
        assert_eq!(args.max_width, Some(10));
        assert_eq!(args.max_height, Some(20));
        assert_eq!(args.varname, "a");
    }

    #[test]
    fn size_arguments_must_be_integers() {
        let err = Args::try_parse_from(["rgb565-header", "a.png", "a.h", "a", "abc"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }
}
