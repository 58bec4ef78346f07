//! End to end tests of the conversion API.

use gx_texture_api::reexports::*;
use gx_texture_api::*;

const RED: Color8888 = Color8888::new(255, 0, 0, 255);
const GREEN: Color8888 = Color8888::new(0, 255, 0, 255);
const BLUE: Color8888 = Color8888::new(0, 0, 255, 255);
const WHITE: Color8888 = Color8888::new(255, 255, 255, 255);

/// An 8x8 RGB image with one solid colour per 4x4 quadrant.
fn quadrants() -> Image {
    let mut canonical = CanonicalImage::new(CanonicalForm::Rgb, 8, 8);
    for y in 0..8 {
        for x in 0..8 {
            let color = match (x / 4, y / 4) {
                (0, 0) => RED,
                (1, 0) => GREEN,
                (0, 1) => BLUE,
                _ => WHITE,
            };
            canonical.set_rgba(x, y, color);
        }
    }
    Image::from_canonical(canonical)
}

/// A 4x4 RGB5A3 image mixing both pixel modes.
fn rgb5a3_bytes() -> Vec<u8> {
    (0u16..16)
        .flat_map(|i| {
            let word = if i % 2 == 0 {
                0x8000 | (i * 0x0421)
            } else {
                0x3000 | (i * 0x0111)
            };
            word.to_be_bytes()
        })
        .collect()
}

fn to(format: TextureFormat) -> ConvertRequest {
    ConvertRequest::exact(format)
}

#[test]
fn solid_blocks_survive_cmpr() {
    let settings = ConvertSettings::default();
    let source = quadrants();
    let cmpr = source
        .converted(to(TextureFormat::CMPR), &settings)
        .expect("CMPR encode should succeed");
    assert_eq!(cmpr.format(), TextureFormat::CMPR);
    assert_eq!(cmpr.pixels().len(), 32);

    let back = cmpr
        .converted(to(TextureFormat::CanonicalRgb), &settings)
        .expect("CMPR decode should succeed");
    assert_eq!(back.pixels(), source.pixels());
}

#[test]
fn native_round_trip_through_canonical_is_exact() {
    let settings = ConvertSettings::default();
    let source = Image::from_buffer(4, 4, TextureFormat::RGB5A3, rgb5a3_bytes())
        .expect("buffer should be large enough");

    let canonical = source
        .converted(to(TextureFormat::CanonicalRgb), &settings)
        .expect("decode should succeed");
    let again = canonical
        .converted(to(TextureFormat::RGB5A3), &settings)
        .expect("encode should succeed");
    assert_eq!(again.pixels(), source.pixels());
}

#[test]
fn converting_to_the_same_format_is_a_copy() {
    let settings = ConvertSettings::default();
    let source = Image::from_buffer(4, 4, TextureFormat::RGB5A3, rgb5a3_bytes())
        .expect("buffer should be large enough");
    let copy = source
        .converted(ConvertRequest::default(), &settings)
        .expect("copy should succeed");
    assert_eq!(copy, source);
}

#[test]
fn rgb565_is_always_opaque() {
    let source = Image::from_buffer(4, 4, TextureFormat::RGB565, vec![0x12; 32])
        .expect("buffer should be large enough");
    assert_eq!(source.alpha_status(), AlphaStatus::Opaque);

    let canonical = source
        .converted(to(TextureFormat::CanonicalRgb), &ConvertSettings::default())
        .expect("decode should succeed");
    assert_eq!(canonical.alpha_status(), AlphaStatus::Opaque);
    assert!(canonical.pixels().chunks_exact(4).all(|p| p[3] == 255));

    let auto = canonical
        .converted(ConvertRequest::default(), &ConvertSettings::default())
        .expect("auto conversion should succeed");
    assert_eq!(auto.format(), TextureFormat::RGB565);
}

#[test]
fn few_colors_convert_to_an_exact_palette() {
    // 132 is exactly representable with 5 bits.
    let colors = [RED, Color8888::new(0, 132, 255, 255), WHITE];
    let mut canonical = CanonicalImage::new(CanonicalForm::Rgb, 8, 8);
    for y in 0..8 {
        for x in 0..8 {
            canonical.set_rgba(x, y, colors[(x + y) % 3]);
        }
    }
    let source = Image::from_canonical(canonical);
    let settings = ConvertSettings::default();

    let indexed = source
        .converted(
            to(TextureFormat::C4).with_palette_format(PaletteFormat::RGB5A3),
            &settings,
        )
        .expect("quantization should succeed");
    assert_eq!(indexed.palette().map(Palette::len), Some(3));
    assert_eq!(indexed.palette_format(), PaletteFormat::RGB5A3);

    let back = indexed
        .converted(to(TextureFormat::CanonicalRgb), &settings)
        .expect("palette decode should succeed");
    assert_eq!(back.pixels(), source.pixels());
}

#[test]
fn palette_size_is_limited_by_settings() {
    let mut canonical = CanonicalImage::new(CanonicalForm::Rgb, 16, 8);
    for y in 0..8 {
        for x in 0..16 {
            canonical.set_rgba(x, y, Color8888::new(x as u8 * 16, y as u8 * 32, 0, 255));
        }
    }
    let settings = ConvertSettingsBuilder::new().max_palette_colors(8).build();
    let indexed = Image::from_canonical(canonical)
        .converted(to(TextureFormat::C8), &settings)
        .expect("quantization should succeed");
    let palette = indexed.palette().expect("index formats carry a palette");
    assert!(palette.len() <= 8);
    assert!(indexed.pixels().iter().all(|&index| (index as usize) < palette.len()));
}

#[test]
fn palette_sources_change_palette_format_without_requantizing() {
    let palette = Palette::from(vec![RED, BLUE, Color8888::new(16, 16, 16, 0)]);
    let indices: Vec<u8> = (0..32).map(|i| (i % 3) as u8).collect();
    let source = Image::from_buffer(8, 4, TextureFormat::C8, indices.clone())
        .expect("buffer should be large enough")
        .with_palette(palette.clone(), PaletteFormat::RGB5A3);

    let converted = source
        .converted(
            to(TextureFormat::C8).with_palette_format(PaletteFormat::IA8),
            &ConvertSettings::default(),
        )
        .expect("palette format change should succeed");
    assert_eq!(converted.pixels(), &indices[..]);
    assert_eq!(
        converted.palette(),
        Some(&palette.quantized_to(PaletteFormat::IA8))
    );
}

#[test]
fn odd_sizes_are_padded_and_cropped() {
    let mut canonical = CanonicalImage::new(CanonicalForm::Rgb, 5, 3);
    for y in 0..3 {
        for x in 0..5 {
            canonical.set_rgba(x, y, GREEN);
        }
    }
    let source = Image::from_canonical(canonical);
    let settings = ConvertSettings::default();

    let cmpr = source
        .converted(to(TextureFormat::CMPR), &settings)
        .expect("CMPR encode should succeed");
    assert_eq!((cmpr.xwidth(), cmpr.xheight()), (8, 8));
    assert_eq!((cmpr.width(), cmpr.height()), (5, 3));
    assert_eq!(cmpr.alpha_status(), AlphaStatus::Opaque);

    let back = cmpr
        .converted(to(TextureFormat::CanonicalRgb), &settings)
        .expect("CMPR decode should succeed");
    assert_eq!((back.width(), back.height()), (5, 3));
    assert_eq!(back.pixels(), source.pixels());
}

#[test]
fn mipmaps_follow_the_head_format() {
    let mut canonical = CanonicalImage::new(CanonicalForm::Rgb, 16, 16);
    for y in 0..16 {
        for x in 0..16 {
            canonical.set_rgba(x, y, Color8888::new(x as u8 * 16, 0, y as u8 * 16, 255));
        }
    }
    let mut image = Image::from_canonical(canonical);
    image
        .set_mipmaps(2, &BoxFilter)
        .expect("mipmap generation should succeed");

    image
        .convert_in_place(to(TextureFormat::CMPR), &ConvertSettings::default())
        .expect("conversion should succeed");
    assert_eq!(image.format(), TextureFormat::CMPR);
    let sizes: Vec<_> = image
        .mipmaps()
        .map(|link| (link.format(), link.width(), link.pixels().len()))
        .collect();
    assert_eq!(
        sizes,
        vec![(TextureFormat::CMPR, 8, 32), (TextureFormat::CMPR, 4, 32)]
    );
}

#[test]
fn mipmap_links_count_towards_depth() {
    let mut image = quadrants();
    image
        .set_mipmaps(1, &BoxFilter)
        .expect("mipmap generation should succeed");
    let settings = ConvertSettingsBuilder::new().max_depth(1).build();

    assert_eq!(
        image.converted(to(TextureFormat::RGB565), &settings),
        Err(TextureError::ConversionDepthExceeded { depth: 2, max: 1 })
    );

    image.clear_mipmaps();
    assert!(image
        .converted(to(TextureFormat::RGB565), &settings)
        .is_ok());
}

#[test]
fn new_buffer_leaves_the_source_alone() {
    let mut image = quadrants();
    let original = image.clone();
    let converted = convert(
        &mut image,
        to(TextureFormat::RGBA32),
        ConversionTarget::NewBuffer,
        &ConvertSettings::default(),
    )
    .expect("conversion should succeed")
    .expect("new buffer conversions return the image");
    assert_eq!(image, original);
    assert_eq!(converted.format(), TextureFormat::RGBA32);

    let result = convert(
        &mut image,
        to(TextureFormat::RGBA32),
        ConversionTarget::InPlace,
        &ConvertSettings::default(),
    )
    .expect("conversion should succeed");
    assert!(result.is_none());
    assert_eq!(image, converted);
}

#[test]
fn failed_conversions_leave_the_source_alone() {
    // Index image without a palette: every lookup fails.
    let mut image = Image::from_buffer(8, 4, TextureFormat::C8, vec![5u8; 32])
        .expect("buffer should be large enough");
    let original = image.clone();
    let result = convert(
        &mut image,
        to(TextureFormat::RGB565),
        ConversionTarget::InPlace,
        &ConvertSettings::default(),
    );
    assert!(matches!(result, Err(TextureError::PaletteOverflow { .. })));
    assert_eq!(image, original);
}

#[test]
fn shared_pixels_are_copied_before_writing() {
    let bytes: Vec<u8> = (0..64).collect();
    let container = SharedContainer::new(bytes.clone());
    let buffer = container.borrow(16..48).expect("range is inside the container");
    let mut image =
        Image::from_buffer(4, 4, TextureFormat::RGB565, buffer).expect("buffer should fit");
    assert!(container.is_borrowed(image.buffer()));

    image.pixels_mut()[0] = 0xFF;
    assert!(!container.is_borrowed(image.buffer()));
    assert_eq!(image.pixels()[0], 0xFF);
    assert_eq!(image.pixels()[1..], bytes[17..48]);
    assert_eq!(container.as_slice(), &bytes[..]);

    let buffer = container.borrow(16..48).expect("range is inside the container");
    let mut image =
        Image::from_buffer(4, 4, TextureFormat::RGB565, buffer).expect("buffer should fit");
    image
        .convert_in_place(to(TextureFormat::I8), &ConvertSettings::default())
        .expect("conversion should succeed");
    assert!(!container.is_borrowed(image.buffer()));
    assert_eq!(container.as_slice(), &bytes[..]);
}

#[test]
fn rules_drive_conversions() {
    let rules: TransformRules = "X-RGB.NOALPHA=RGB565,X-RGB.ALPHA=RGB5A3,*=RAW"
        .parse()
        .expect("rules should parse");

    let opaque = quadrants();
    let target = rules
        .select(&SourceInfo::from_image(&opaque, FileFormat::Png))
        .expect("first rule should match");
    assert_eq!(target.format, TextureFormat::RGB565);
    assert_eq!(target.file, FileFormat::Png);

    let converted = opaque
        .converted(target.request(), &ConvertSettings::default())
        .expect("conversion should succeed");
    assert_eq!(converted.format(), TextureFormat::RGB565);

    let mut canonical = CanonicalImage::new(CanonicalForm::Rgb, 4, 4);
    canonical.set_rgba(0, 0, Color8888::new(1, 2, 3, 4));
    let translucent = Image::from_canonical(canonical);
    let target = rules
        .select(&SourceInfo::from_image(&translucent, FileFormat::Png))
        .expect("second rule should match");
    assert_eq!(target.format, TextureFormat::RGB5A3);

    let target = rules
        .select(&SourceInfo::from_image(&converted, FileFormat::Png))
        .expect("wildcard rule should match");
    assert_eq!(
        (target.file, target.format),
        (FileFormat::Raw, TextureFormat::RGB565)
    );
}

#[test]
fn endianness_is_kept() {
    let little: Vec<u8> = rgb5a3_bytes()
        .chunks_exact(2)
        .flat_map(|pair| [pair[1], pair[0]])
        .collect();
    let big = Image::from_buffer(4, 4, TextureFormat::RGB5A3, rgb5a3_bytes())
        .expect("buffer should fit");
    let little = Image::from_buffer(4, 4, TextureFormat::RGB5A3, little)
        .expect("buffer should fit")
        .with_endian(Endian::Little);

    let settings = ConvertSettings::default();
    let from_big = big
        .converted(to(TextureFormat::CanonicalRgb), &settings)
        .expect("decode should succeed");
    let from_little = little
        .converted(to(TextureFormat::CanonicalRgb), &settings)
        .expect("decode should succeed");
    assert_eq!(from_big.pixels(), from_little.pixels());

    let back = from_little
        .converted(to(TextureFormat::RGB5A3), &settings)
        .expect("encode should succeed");
    assert_eq!(back.endian(), Endian::Little);
    assert_eq!(back.pixels(), little.pixels());
}
