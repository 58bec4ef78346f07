use crate::error::CliError;
use crate::util::{endian, parse_color565, parse_format, parse_palette_format, throughput};
use argh::FromArgs;
use bytesize::ByteSize;
use gx_texture_api::reexports::{
    decode_palette, encode_palette, Color565, PaletteFormat, TextureFormat,
};
use gx_texture_api::{
    parse_rule_lists, ConvertRequest, ConvertSettingsBuilder, FileFormat, FormatRequest, Image,
    PaletteRequest, SourceInfo,
};
use std::fs;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info};

#[derive(FromArgs, Debug)]
/// Convert a raw texture buffer to another format (headers are not read or written)
#[argh(subcommand, name = "convert")]
pub struct ConvertCmd {
    /// input file holding the raw pixel data
    #[argh(option)]
    pub input: PathBuf,

    /// output file for the converted pixel data
    #[argh(option)]
    pub output: PathBuf,

    /// image width in pixels
    #[argh(option)]
    pub width: u32,

    /// image height in pixels
    #[argh(option)]
    pub height: u32,

    /// format of the input, e.g. CMPR, RGB5A3, C8
    #[argh(option, from_str_fn(parse_format))]
    pub format: TextureFormat,

    /// target format [default: chosen from the input]
    #[argh(option, from_str_fn(parse_format))]
    pub to: Option<TextureFormat>,

    /// raw palette of an index format input
    #[argh(option)]
    pub palette: Option<PathBuf>,

    /// palette format of the input [default: RGB5A3]
    #[argh(option, default = "PaletteFormat::RGB5A3", from_str_fn(parse_palette_format))]
    pub palette_format: PaletteFormat,

    /// palette format of the output [default: chosen from the input]
    #[argh(option, from_str_fn(parse_palette_format))]
    pub to_palette_format: Option<PaletteFormat>,

    /// output file for the palette of an index format output
    #[argh(option)]
    pub palette_output: Option<PathBuf>,

    /// transform rules such as "CMPR.NOALPHA=RGB565"; take precedence over --to
    #[argh(option)]
    pub transform: Vec<String>,

    /// read and write little-endian 16-bit words
    #[argh(switch)]
    pub little_endian: bool,

    /// upper bound on palette entries when quantizing
    #[argh(option)]
    pub max_colors: Option<usize>,

    /// RGB565 colour (hex) for fully transparent CMPR blocks [default: mean colour]
    #[argh(option, from_str_fn(parse_color565))]
    pub cmpr_default_color: Option<Color565>,
}

pub fn handle_convert_command(cmd: ConvertCmd) -> Result<(), CliError> {
    let endian = endian(cmd.little_endian);
    let data = fs::read(&cmd.input)?;
    let input_size = data.len();
    let mut image = Image::from_buffer(cmd.width, cmd.height, cmd.format, data)?.with_endian(endian);

    if cmd.format.is_palette() {
        let path = cmd.palette.as_ref().ok_or(CliError::MissingPalette(cmd.format))?;
        let bytes = fs::read(path)?;
        let count = bytes.len() / cmd.palette_format.entry_size();
        let palette = decode_palette(&bytes, count, cmd.palette_format, endian)?;
        debug!(entries = palette.len(), "read palette");
        image.set_palette(Some(palette), cmd.palette_format);
    }

    let request = select_request(&cmd, &image)?;
    let mut builder = ConvertSettingsBuilder::new();
    if let Some(colors) = cmd.max_colors {
        builder = builder.max_palette_colors(colors);
    }
    if let Some(color) = cmd.cmpr_default_color {
        builder = builder.default_color(color);
    }
    let settings = builder.build();

    let source_format = image.format();
    let start = Instant::now();
    image.convert_in_place(request, &settings)?;
    let elapsed = start.elapsed();

    fs::write(&cmd.output, image.pixels())?;
    if let (Some(path), Some(palette)) = (&cmd.palette_output, image.palette()) {
        fs::write(path, encode_palette(palette, image.palette_format(), endian))?;
    }

    info!(
        "Converted {source_format} ({}) to {} ({}) in {:.2?} ({:.2} MiB/s)",
        ByteSize(input_size as u64),
        image.format(),
        ByteSize(image.pixels().len() as u64),
        elapsed,
        throughput(input_size, elapsed)
    );
    Ok(())
}

fn select_request(cmd: &ConvertCmd, image: &Image) -> Result<ConvertRequest, CliError> {
    if cmd.transform.is_empty() {
        return Ok(ConvertRequest {
            format: cmd.to.map_or(FormatRequest::Auto, FormatRequest::Exact),
            palette: cmd
                .to_palette_format
                .map_or(PaletteRequest::Auto, PaletteRequest::Exact),
        });
    }

    let rules = parse_rule_lists(cmd.transform.iter().map(String::as_str))?;
    let info = SourceInfo::from_image(image, FileFormat::Raw);
    match rules.select(&info) {
        Some(target) => {
            debug!(format = %target.format, palette_format = %target.palette_format, "rule matched");
            Ok(target.request())
        }
        None => {
            info!("No transform rule matched; copying the input");
            Ok(ConvertRequest::exact(image.format()).with_palette_format(image.palette_format()))
        }
    }
}
