use gx_texture_api::reexports::{Color565, Endian, PaletteFormat, TextureFormat};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Installs the log subscriber. `RUST_LOG` wins over `verbose` when set.
pub fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

pub fn parse_format(value: &str) -> Result<TextureFormat, String> {
    value.parse().map_err(|e| format!("{e}"))
}

pub fn parse_palette_format(value: &str) -> Result<PaletteFormat, String> {
    value.parse().map_err(|e| format!("{e}"))
}

/// Parses an RGB565 colour written as hex, with or without a `0x` prefix.
pub fn parse_color565(value: &str) -> Result<Color565, String> {
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);
    u16::from_str_radix(digits, 16)
        .map(Color565::from_raw)
        .map_err(|e| format!("Invalid RGB565 colour {value}: {e}"))
}

pub fn endian(little_endian: bool) -> Endian {
    if little_endian {
        Endian::Little
    } else {
        Endian::Big
    }
}

/// Throughput in MiB/s.
pub fn throughput(bytes: usize, elapsed: Duration) -> f64 {
    let seconds = elapsed.as_secs_f64();
    if seconds == 0.0 {
        return 0.0;
    }
    bytes as f64 / (1024.0 * 1024.0) / seconds
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("cmpr", TextureFormat::CMPR)]
    #[case("RGB5A3", TextureFormat::RGB5A3)]
    #[case("ci8", TextureFormat::C8)]
    fn parses_formats(#[case] value: &str, #[case] expected: TextureFormat) {
        assert_eq!(parse_format(value), Ok(expected));
    }

    #[test]
    fn rejects_unknown_formats() {
        assert!(parse_format("bc7").is_err());
        assert!(parse_palette_format("P-RGBA32").is_err());
    }

    #[rstest]
    #[case("0xF800", 0xF800)]
    #[case("07e0", 0x07E0)]
    fn parses_colors(#[case] value: &str, #[case] expected: u16) {
        assert_eq!(parse_color565(value), Ok(Color565::from_raw(expected)));
    }

    #[test]
    fn zero_time_has_no_throughput() {
        assert_eq!(throughput(1024, Duration::ZERO), 0.0);
    }
}
