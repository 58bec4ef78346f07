use crate::util::parse_format;
use argh::FromArgs;
use bytesize::ByteSize;
use gx_texture_api::reexports::{PaletteFormat, TextureFormat};

#[derive(FromArgs, Debug)]
/// Describe one or all texture formats
#[argh(subcommand, name = "info")]
pub struct InfoCmd {
    /// format to describe [default: all]
    #[argh(positional, from_str_fn(parse_format))]
    pub format: Option<TextureFormat>,

    /// width used to compute the image size
    #[argh(option)]
    pub width: Option<u32>,

    /// height used to compute the image size
    #[argh(option)]
    pub height: Option<u32>,
}

pub fn handle_info_command(cmd: InfoCmd) {
    let formats: Vec<TextureFormat> = match cmd.format {
        Some(format) => vec![format],
        None => TextureFormat::all_values().to_vec(),
    };

    println!(
        "{:<8} {:>5} {:>4} {:>6} {:<11} {:>8} {:>12}",
        "Name", "Code", "Bpp", "Tile", "Alpha", "Palette", "Size"
    );
    for format in formats {
        let desc = format.descriptor();
        let (tile_width, tile_height) = desc.tile_size();
        let size = match (cmd.width, cmd.height) {
            (Some(width), Some(height)) => desc
                .image_size(width, height)
                .map(|bytes| ByteSize(bytes as u64).to_string())
                .unwrap_or_else(|e| e.to_string()),
            _ => "-".to_string(),
        };
        println!(
            "{:<8} {:>#5x} {:>4} {:>6} {:<11} {:>8} {:>12}",
            desc.name,
            format.code(),
            desc.bits_per_pixel,
            format!("{tile_width}x{tile_height}"),
            format!("{:?}", desc.alpha),
            desc.max_palette_entries,
            size
        );
    }

    if cmd.format.is_none_or(TextureFormat::is_palette) {
        println!();
        println!("Palette formats:");
        for format in PaletteFormat::all_values() {
            println!("  P-{:<8} code {}", format.name(), format.code());
        }
    }
}
