use gx_texture_api::reexports::{TextureError, TextureFormat};
use gx_texture_api::RuleParseError;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Texture(#[from] TextureError),
    #[error(transparent)]
    Rule(#[from] RuleParseError),
    #[error("{0} is an index format; pass its palette with --palette")]
    MissingPalette(TextureFormat),
}
