//! # Transform Rule Engine
//!
//! An ordered list of `SOURCE=DEST` rules picks the target formats for a texture. The first rule
//! whose source pattern matches wins; destination fields it leaves open keep the source's value.
//! No matching rule means no transform was requested.
//!
//! ## Syntax
//!
//! Rules are separated by `,`. Each side is a `.`-separated list of keywords:
//!
//! | Keyword                          | Side   | Meaning                           |
//! |----------------------------------|--------|-----------------------------------|
//! | `*`                              | both   | matches anything / changes nothing |
//! | `TPL` `BTI` `TEX0` `PNG` `RAW`   | both   | file format                       |
//! | `I4` `CMPR` `C8` ...             | both   | image format                      |
//! | `P-IA8` `P-RGB565` `P-RGB5A3`    | both   | palette format                    |
//! | `PAL` / `NOPAL`                  | source | has / has no palette              |
//! | `GRAY` / `COLOR`                 | source | all pixels gray / some colour     |
//! | `ALPHA` / `NOALPHA`              | source | may have / has no transparency    |
//!
//! Keywords are case-insensitive. For example `TPL.CMPR.ALPHA=RGB5A3,PNG.NOALPHA=TPL.CMPR`.

use crate::convert::ConvertRequest;
use crate::error::RuleParseError;
use crate::image::Image;
use alloc::string::ToString;
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;
use derive_enum_all_values::AllValues;
use gx_texture_common::format::{PaletteFormat, TextureFormat};

/// Container formats a texture can come from or go to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AllValues)]
pub enum FileFormat {
    /// Texture palette archive.
    Tpl,
    /// Single texture with header.
    Bti,
    /// Texture inside a model archive.
    Tex0,
    /// Portable network graphics.
    Png,
    /// Headerless pixel data.
    Raw,
}

impl FileFormat {
    /// Keyword of this file format.
    pub fn name(self) -> &'static str {
        match self {
            FileFormat::Tpl => "TPL",
            FileFormat::Bti => "BTI",
            FileFormat::Tex0 => "TEX0",
            FileFormat::Png => "PNG",
            FileFormat::Raw => "RAW",
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FileFormat {
    type Err = RuleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FileFormat::all_values()
            .iter()
            .copied()
            .find(|format| format.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| RuleParseError::UnknownKeyword(s.to_string()))
    }
}

/// What the rule engine knows about a source texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceInfo {
    /// Container the texture came from.
    pub file: FileFormat,
    /// Image format.
    pub format: TextureFormat,
    /// Palette format; only compared when `has_palette` is set.
    pub palette_format: PaletteFormat,
    /// Whether the texture uses a palette.
    pub has_palette: bool,
    /// Whether every pixel is gray.
    pub gray: bool,
    /// Whether any pixel may be translucent.
    pub alpha: bool,
}

impl SourceInfo {
    /// Describes `image`, read from a `file` container.
    pub fn from_image(image: &Image, file: FileFormat) -> Self {
        Self {
            file,
            format: image.format(),
            palette_format: image.palette_format(),
            has_palette: image.format().is_palette(),
            gray: image.is_gray(),
            alpha: image.has_alpha(),
        }
    }
}

/// Conditions on a source texture. `None` fields match anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SourcePattern {
    /// Required container.
    pub file: Option<FileFormat>,
    /// Required image format.
    pub format: Option<TextureFormat>,
    /// Required palette format. Never matches textures without a palette.
    pub palette_format: Option<PaletteFormat>,
    /// Required palette presence.
    pub has_palette: Option<bool>,
    /// Required gray state.
    pub gray: Option<bool>,
    /// Required alpha state.
    pub alpha: Option<bool>,
}

impl SourcePattern {
    /// Whether `info` satisfies every condition.
    pub fn matches(&self, info: &SourceInfo) -> bool {
        self.file.is_none_or(|file| file == info.file)
            && self.format.is_none_or(|format| format == info.format)
            && self
                .palette_format
                .is_none_or(|format| info.has_palette && format == info.palette_format)
            && self.has_palette.is_none_or(|pal| pal == info.has_palette)
            && self.gray.is_none_or(|gray| gray == info.gray)
            && self.alpha.is_none_or(|alpha| alpha == info.alpha)
    }
}

/// Destination fields of a rule. `None` fields keep the source value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DestPattern {
    /// Target container.
    pub file: Option<FileFormat>,
    /// Target image format.
    pub format: Option<TextureFormat>,
    /// Target palette format.
    pub palette_format: Option<PaletteFormat>,
}

/// The concrete outcome of a matching rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransformTarget {
    /// Target container.
    pub file: FileFormat,
    /// Target image format.
    pub format: TextureFormat,
    /// Target palette format.
    pub palette_format: PaletteFormat,
}

impl TransformTarget {
    /// The conversion request reaching this target.
    pub fn request(&self) -> ConvertRequest {
        ConvertRequest::exact(self.format).with_palette_format(self.palette_format)
    }
}

/// A single `SOURCE=DEST` rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TransformRule {
    /// Conditions on the source.
    pub source: SourcePattern,
    /// Fields to change.
    pub dest: DestPattern,
}

impl TransformRule {
    /// Applies the destination to `info`, keeping the source value of every open field.
    pub fn apply(&self, info: &SourceInfo) -> TransformTarget {
        TransformTarget {
            file: self.dest.file.unwrap_or(info.file),
            format: self.dest.format.unwrap_or(info.format),
            palette_format: self.dest.palette_format.unwrap_or(info.palette_format),
        }
    }
}

/// An ordered list of rules.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TransformRules {
    rules: Vec<TransformRule>,
}

impl TransformRules {
    /// Creates an empty rule list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a rule with the lowest priority so far.
    pub fn push(&mut self, rule: TransformRule) {
        self.rules.push(rule);
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether there are no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The rules in priority order.
    pub fn iter(&self) -> impl Iterator<Item = &TransformRule> {
        self.rules.iter()
    }

    /// Target for `info` from the first matching rule, `None` when no rule matches.
    pub fn select(&self, info: &SourceInfo) -> Option<TransformTarget> {
        self.rules
            .iter()
            .find(|rule| rule.source.matches(info))
            .map(|rule| rule.apply(info))
    }
}

impl FromIterator<TransformRule> for TransformRules {
    fn from_iter<T: IntoIterator<Item = TransformRule>>(iter: T) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}

/// A parsed keyword.
enum Keyword {
    Any,
    File(FileFormat),
    Format(TextureFormat),
    Palette(PaletteFormat),
    HasPalette(bool),
    Gray(bool),
    Alpha(bool),
}

fn parse_keyword(word: &str) -> Result<Keyword, RuleParseError> {
    let upper = word.to_ascii_uppercase();
    let keyword = match upper.as_str() {
        "*" => Keyword::Any,
        "PAL" => Keyword::HasPalette(true),
        "NOPAL" => Keyword::HasPalette(false),
        "GRAY" | "GREY" => Keyword::Gray(true),
        "COLOR" | "COLOUR" => Keyword::Gray(false),
        "ALPHA" => Keyword::Alpha(true),
        "NOALPHA" => Keyword::Alpha(false),
        _ if upper.starts_with("P-") => upper
            .parse()
            .map(Keyword::Palette)
            .map_err(|_| RuleParseError::UnknownKeyword(word.to_string()))?,
        _ => match upper.parse::<FileFormat>() {
            Ok(file) => Keyword::File(file),
            Err(_) => upper
                .parse()
                .map(Keyword::Format)
                .map_err(|_| RuleParseError::UnknownKeyword(word.to_string()))?,
        },
    };
    Ok(keyword)
}

fn set_once<T>(
    slot: &mut Option<T>,
    value: T,
    field: &'static str,
    keyword: &str,
) -> Result<(), RuleParseError> {
    if slot.is_some() {
        return Err(RuleParseError::DuplicateField {
            field,
            keyword: keyword.to_string(),
        });
    }
    *slot = Some(value);
    Ok(())
}

fn keywords(side: &str) -> impl Iterator<Item = Result<(&str, Keyword), RuleParseError>> {
    side.split('.').map(move |word| {
        let word = word.trim();
        if word.is_empty() {
            return Err(RuleParseError::EmptyKeyword(side.to_string()));
        }
        parse_keyword(word).map(|keyword| (word, keyword))
    })
}

impl FromStr for SourcePattern {
    type Err = RuleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut pattern = SourcePattern::default();
        for item in keywords(s) {
            let (word, keyword) = item?;
            match keyword {
                Keyword::Any => {}
                Keyword::File(file) => set_once(&mut pattern.file, file, "file format", word)?,
                Keyword::Format(format) => {
                    set_once(&mut pattern.format, format, "image format", word)?
                }
                Keyword::Palette(format) => {
                    set_once(&mut pattern.palette_format, format, "palette format", word)?
                }
                Keyword::HasPalette(pal) => {
                    set_once(&mut pattern.has_palette, pal, "palette condition", word)?
                }
                Keyword::Gray(gray) => set_once(&mut pattern.gray, gray, "gray condition", word)?,
                Keyword::Alpha(alpha) => {
                    set_once(&mut pattern.alpha, alpha, "alpha condition", word)?
                }
            }
        }
        Ok(pattern)
    }
}

impl FromStr for DestPattern {
    type Err = RuleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut pattern = DestPattern::default();
        for item in keywords(s) {
            let (word, keyword) = item?;
            match keyword {
                Keyword::Any => {}
                Keyword::File(file) => set_once(&mut pattern.file, file, "file format", word)?,
                Keyword::Format(format) => {
                    set_once(&mut pattern.format, format, "image format", word)?
                }
                Keyword::Palette(format) => {
                    set_once(&mut pattern.palette_format, format, "palette format", word)?
                }
                Keyword::HasPalette(_) | Keyword::Gray(_) | Keyword::Alpha(_) => {
                    return Err(RuleParseError::ConditionInDestination(word.to_string()))
                }
            }
        }
        Ok(pattern)
    }
}

impl FromStr for TransformRule {
    type Err = RuleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (source, dest) = s
            .split_once('=')
            .ok_or_else(|| RuleParseError::MissingSeparator(s.to_string()))?;
        Ok(TransformRule {
            source: source.parse()?,
            dest: dest.parse()?,
        })
    }
}

impl FromStr for TransformRules {
    type Err = RuleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Ok(TransformRules::new());
        }
        s.split(',').map(str::parse).collect()
    }
}

/// Parses several rule lists and joins them in order.
///
/// # Errors
///
/// The first [`RuleParseError`] of any list.
pub fn parse_rule_lists<'a>(
    lists: impl IntoIterator<Item = &'a str>,
) -> Result<TransformRules, RuleParseError> {
    let mut rules = TransformRules::new();
    for list in lists {
        let parsed: TransformRules = list.parse()?;
        rules.rules.extend(parsed.rules);
    }
    Ok(rules)
}
