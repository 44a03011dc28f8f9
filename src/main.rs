use clap::{Parser, Subcommand};
use mapframe::{config, layout, links, output, render, scan};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mapframe")]
#[command(about = "Printable map posters framed with your photographs")]
#[command(long_about = "\
Printable map posters framed with your photographs

Your filesystem is the data source. A directory of photos becomes the poster
border, and a locations.toml table ties each photo to the place it was taken.
The map in the middle is centered and zoomed to fit those places, and
connector lines run from every photo to its marker.

Photo directory structure:

  photos/
  ├── config.toml              # Poster configuration (optional)
  ├── locations.toml           # Photo→location link table (optional)
  ├── 001-tokyo-tower.jpg      # Numbered = ordered clockwise from top edge
  ├── 001-tokyo-tower.txt      # Sidecar caption (optional)
  ├── 002-shibuya.jpg
  └── harbour.jpg              # Unnumbered = ordered after numbered photos

Link table entries:

  [[link]]
  image = \"001-tokyo-tower\"    # photo id = filename stem
  lat = 35.6586
  lon = 139.7454
  name = \"Tokyo Tower\"         # optional
  label = \"T\"                  # optional, overrides the auto letter

Run 'mapframe gen-config' to print a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Photo directory
    #[arg(long, default_value = "photos", global = true)]
    photos: PathBuf,

    /// Output SVG file
    #[arg(long, default_value = "poster.svg", global = true)]
    output: PathBuf,

    /// Directory for intermediate manifests
    #[arg(long, default_value = ".mapframe-temp", global = true)]
    temp_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan the photo directory into a manifest
    Scan,
    /// Compute poster geometry from the scan manifest
    Layout,
    /// Produce the final SVG from the layout manifest
    Render,
    /// Run the full pipeline: scan → layout → render
    Build,
    /// Report links that don't match any photo, without building
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Scan => {
            let manifest = scan::scan(&cli.photos)?;
            std::fs::create_dir_all(&cli.temp_dir)?;
            let json = serde_json::to_string_pretty(&manifest)?;
            std::fs::write(cli.temp_dir.join("manifest.json"), json)?;
            output::print_scan_output(&manifest, &cli.photos);
        }
        Command::Layout => {
            let manifest_content =
                std::fs::read_to_string(cli.temp_dir.join("manifest.json"))?;
            let manifest: scan::PhotoManifest = serde_json::from_str(&manifest_content)?;
            let poster_config = config::load_or_default(&cli.photos)?;
            let poster = layout::compose(&poster_config, &manifest);
            let json = serde_json::to_string_pretty(&poster)?;
            std::fs::write(cli.temp_dir.join("layout.json"), json)?;
            output::print_layout_output(&poster);
        }
        Command::Render => {
            let layout_content = std::fs::read_to_string(cli.temp_dir.join("layout.json"))?;
            let poster: layout::Poster = serde_json::from_str(&layout_content)?;
            let poster_config = config::load_or_default(&cli.photos)?;
            render::render_to_file(&cli.output, &poster, &poster_config)?;
            println!("Rendered {}", cli.output.display());
        }
        Command::Build => {
            let poster_config = config::load_or_default(&cli.photos)?;
            std::fs::create_dir_all(&cli.temp_dir)?;

            println!("==> Stage 1: Scanning {}", cli.photos.display());
            let manifest = scan::scan(&cli.photos)?;
            let json = serde_json::to_string_pretty(&manifest)?;
            std::fs::write(cli.temp_dir.join("manifest.json"), json)?;
            output::print_scan_output(&manifest, &cli.photos);

            println!("==> Stage 2: Composing poster geometry");
            let poster = layout::compose(&poster_config, &manifest);
            let json = serde_json::to_string_pretty(&poster)?;
            std::fs::write(cli.temp_dir.join("layout.json"), json)?;
            output::print_layout_output(&poster);

            println!("==> Stage 3: Rendering SVG → {}", cli.output.display());
            render::render_to_file(&cli.output, &poster, &poster_config)?;

            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            let poster_config = config::load_or_default(&cli.photos)?;
            let manifest = scan::scan(&cli.photos)?;
            let poster = layout::compose(&poster_config, &manifest);
            let diagnostics = links::validate_links(&manifest.links, &poster.pictures);
            output::print_check_output(&diagnostics);
            if !diagnostics.is_empty() {
                return Err("some links reference unknown photos".into());
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
