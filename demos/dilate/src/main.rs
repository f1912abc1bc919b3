use argh::FromArgs;
use std::path::PathBuf;
use std::time::Instant;

use ndmorph::image::PixelType;
use ndmorph::io::{self, PixelCodec};
use ndmorph::morphology::{self, DilationConfig, DilationKind, ExecutionStrategy};

#[derive(FromArgs)]
/// Dilate a 2-D or 3-D ndm image with a ball or a parabola
struct Args {
    /// path to the input image
    #[argh(option, short = 'i')]
    input: PathBuf,

    /// path to the output image
    #[argh(option, short = 'o')]
    output: PathBuf,

    /// radius along each axis, outermost first; a single value applies to all axes
    #[argh(option, short = 'r')]
    radius: Vec<i64>,

    /// dilation kind: grayscale, binary or parabolic
    #[argh(option, short = 't', default = "DilationKind::Grayscale")]
    kind: DilationKind,

    /// value of the pixels outside the image (grayscale only)
    #[argh(option)]
    boundary: Option<String>,

    /// foreground then background label (binary only, both or neither)
    #[argh(option)]
    bin: Vec<String>,

    /// measure parabolic distances in physical units
    #[argh(switch)]
    use_image_spacing: bool,

    /// compress the output pixels
    #[argh(switch, short = 'z')]
    compression: bool,

    /// number of worker threads, 0 uses all cores
    #[argh(option, default = "0")]
    threads: usize,
}

fn run<T: PixelCodec, const N: usize>(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let image = io::read_image::<T, N>(&args.input)?;
    log::info!("read {} image {}", T::PIXEL_TYPE, image.geometry());

    let radius = match args.radius.as_slice() {
        [r] => vec![*r; N],
        radius => radius.to_vec(),
    };

    let config = DilationConfig {
        kind: args.kind,
        radius,
        boundary: args.boundary.clone(),
        binary_values: args.bin.clone(),
        strategy: ExecutionStrategy::from_threads(args.threads),
        use_image_spacing: args.use_image_spacing,
    };

    let start = Instant::now();
    let output = morphology::dilate(&image, &config)?;
    log::info!(
        "{} dilation with radius {:?} took {:?}",
        config.kind,
        config.radius,
        start.elapsed()
    );

    io::write_image(&args.output, &output, args.compression)?;
    log::info!(
        "wrote {} ({} bytes)",
        args.output.display(),
        io::ndm::file_size(&args.output)?
    );

    Ok(())
}

macro_rules! run_with_dims {
    ($ty:ty, $args:expr, $ndim:expr) => {
        match $ndim {
            2 => run::<$ty, 2>($args),
            3 => run::<$ty, 3>($args),
            n => Err(format!("only 2-D and 3-D images are supported, got {n}-D").into()),
        }
    };
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    if args.radius.is_empty() {
        return Err("at least one radius value is required".into());
    }

    let header = io::read_header(&args.input)?;
    let ndim = header.ndim();

    match header.pixel_type {
        PixelType::U8 => run_with_dims!(u8, &args, ndim),
        PixelType::I8 => run_with_dims!(i8, &args, ndim),
        PixelType::U16 => run_with_dims!(u16, &args, ndim),
        PixelType::I16 => run_with_dims!(i16, &args, ndim),
        PixelType::U32 => run_with_dims!(u32, &args, ndim),
        PixelType::I32 => run_with_dims!(i32, &args, ndim),
        PixelType::F32 => run_with_dims!(f32, &args, ndim),
        PixelType::F64 => run_with_dims!(f64, &args, ndim),
    }
}
