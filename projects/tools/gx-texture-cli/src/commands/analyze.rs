use crate::error::CliError;
use argh::FromArgs;
use bytesize::ByteSize;
use gx_texture_api::reexports::{analyze_image, TextureFormat};
use std::fs;
use std::path::PathBuf;

#[derive(FromArgs, Debug)]
/// Print block statistics of a raw CMPR buffer
#[argh(subcommand, name = "analyze")]
pub struct AnalyzeCmd {
    /// input file holding raw CMPR data
    #[argh(option)]
    pub input: PathBuf,

    /// image width in pixels
    #[argh(option)]
    pub width: u32,

    /// image height in pixels
    #[argh(option)]
    pub height: u32,
}

pub fn handle_analyze_command(cmd: AnalyzeCmd) -> Result<(), CliError> {
    let data = fs::read(&cmd.input)?;
    let desc = TextureFormat::CMPR.descriptor();
    let (xwidth, xheight) = desc.aligned_dimensions(cmd.width, cmd.height)?;
    let stats = analyze_image(&data, xwidth as usize, xheight as usize)?;

    println!("=== CMPR analysis: {} ===", cmd.input.display());
    println!(
        "Image:                  {}x{} (padded {}x{}), {}",
        cmd.width,
        cmd.height,
        xwidth,
        xheight,
        ByteSize(data.len() as u64)
    );
    println!("Sub-blocks:             {}", stats.blocks);
    println!("4-colour blocks:        {}", stats.four_color_blocks);
    println!("3-colour blocks:        {}", stats.three_color_blocks);
    println!("Fully transparent:      {}", stats.fully_transparent_blocks);
    for (index, count) in stats.index_usage.iter().enumerate() {
        println!("Index {index} used:           {count}");
    }
    println!("Total distortion:       {}", stats.total_distortion);
    println!("Mean block distortion:  {:.2}", stats.mean_distortion());
    Ok(())
}
