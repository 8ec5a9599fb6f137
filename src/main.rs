use anyhow::{anyhow, Context, Result};
use photo_collage::export::{save_collage, write_plan_metadata, DEFAULT_JPEG_QUALITY};
use photo_collage::loader::load_images;
use photo_collage::{compute_collage, plan_collage, CollageSettings, Layout};
use std::env;
use std::path::PathBuf;
use std::process;

fn print_usage(program: &str) {
    eprintln!("Photo Collage");
    eprintln!();
    eprintln!("Usage: {} <output> <image>... [OPTIONS]", program);
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --layout <L>         grid | horizontal_strip | vertical_strip (default: grid)");
    eprintln!("  --background <C>     Hex, CSS name or rgb() (default: #FFFFFF)");
    eprintln!("  --gap <PX>           Space between images, 0-40 (default: 8)");
    eprintln!("  --padding <PX>       Outer margin, 0-100 (default: 24)");
    eprintln!("  --no-aspect          Stretch images to fill their cells");
    eprintln!("  --border <PX>        Draw a 1-20 px black border around each image");
    eprintln!("  --columns <N>        Grid columns, 1-10 (default: 3)");
    eprintln!("  --rows <N>           Grid rows, 0-10, 0 = auto (default: 0)");
    eprintln!("  --max-width <PX>     Output width cap, 0 = none");
    eprintln!("  --max-height <PX>    Output height cap, 0 = none");
    eprintln!("  --quality <Q>        JPEG quality 1-100 (default: 95)");
    eprintln!("  --settings <FILE>    Load settings JSON; later flags override it");
    eprintln!("  --metadata           Write the cell layout next to the output as JSON");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  {} collage.jpg a.jpg b.jpg c.jpg d.jpg --columns 2", program);
    eprintln!("  {} strip.png *.png --layout horizontal_strip --max-width 2000", program);
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn value<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a str> {
    args.get(i + 1)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("{} requires a value", flag))
}

fn number(args: &[String], i: usize, flag: &str) -> Result<u32> {
    value(args, i, flag)?
        .parse::<u32>()
        .with_context(|| format!("Invalid value for {}", flag))
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 3 {
        print_usage(&args[0]);
        return Err(anyhow!("Missing required arguments"));
    }

    let output_path = PathBuf::from(&args[1]);
    let mut inputs: Vec<PathBuf> = Vec::new();
    let mut settings = CollageSettings::default();
    let mut quality = DEFAULT_JPEG_QUALITY;
    let mut export_metadata = false;

    let mut i = 2;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "--layout" => {
                settings.layout = value(&args, i, flag)?.parse::<Layout>()?;
                i += 2;
            }
            "--background" => {
                settings.background = value(&args, i, flag)?.to_string();
                i += 2;
            }
            "--gap" => {
                settings.gap = number(&args, i, flag)?;
                i += 2;
            }
            "--padding" => {
                settings.padding = number(&args, i, flag)?;
                i += 2;
            }
            "--no-aspect" => {
                settings.keep_aspect = false;
                i += 1;
            }
            "--border" => {
                settings.add_border = true;
                settings.border_px = number(&args, i, flag)?;
                i += 2;
            }
            "--columns" => {
                settings.grid_columns = number(&args, i, flag)?;
                i += 2;
            }
            "--rows" => {
                settings.grid_rows = number(&args, i, flag)?;
                i += 2;
            }
            "--max-width" => {
                settings.max_width = number(&args, i, flag)?;
                i += 2;
            }
            "--max-height" => {
                settings.max_height = number(&args, i, flag)?;
                i += 2;
            }
            "--quality" => {
                quality = value(&args, i, flag)?
                    .parse::<u8>()
                    .context("Invalid JPEG quality")?;
                i += 2;
            }
            "--settings" => {
                let path = value(&args, i, flag)?;
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read settings file {}", path))?;
                settings = serde_json::from_str(&json)
                    .with_context(|| format!("Failed to parse settings file {}", path))?;
                i += 2;
            }
            "--metadata" => {
                export_metadata = true;
                i += 1;
            }
            "-h" | "--help" => {
                print_usage(&args[0]);
                return Ok(());
            }
            _ if flag.starts_with("--") => {
                return Err(anyhow!("Unknown option: {}", flag));
            }
            _ => {
                inputs.push(PathBuf::from(flag));
                i += 1;
            }
        }
    }

    let (images, failures) = load_images(&inputs);
    for failure in &failures {
        eprintln!("Could not open {}: {}", failure.path.display(), failure.reason);
    }
    if images.is_empty() {
        return Err(anyhow!("No images to arrange; provide at least one readable image"));
    }
    log::info!("Loaded {} images", images.len());

    let config = settings.build();
    let collage = compute_collage(&images, &config).context("Failed to build collage")?;
    save_collage(&collage, &output_path, quality)
        .with_context(|| format!("Failed to write {}", output_path.display()))?;

    if export_metadata {
        let plan = plan_collage(&images, &config)?;
        let metadata_path = write_plan_metadata(&plan, &config, &output_path)?;
        log::info!("Layout written to {}", metadata_path.display());
    }

    Ok(())
}
