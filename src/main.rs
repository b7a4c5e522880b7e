use clap::{Parser, Subcommand};
use quire::{config, output, site};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "quire")]
#[command(about = "Static site generator for a Markdown blog")]
#[command(long_about = "\
Static site generator for a Markdown blog

Posts are named by date, layouts are minijinja templates, styles are Sass.

Build directory:

  build/
  ├── config.toml                      # Site config (optional)
  ├── layouts/
  │   ├── site.html.j2                 # Page shell (required)
  │   ├── post.html.j2                 # Single post (required)
  │   ├── links.html.j2                # Prev/next fragment (optional)
  │   └── list.html.j2                 # Archive page (optional)
  ├── posts/
  │   ├── 2020-01-01-hello-world.md    # → site/posts/hello-world.html
  │   └── 2021-03-03-latest.md         # newest → site/index.html
  └── styles/
      ├── _partial.scss                # @import only, no output
      └── main.scss                    # → site/css/main.css

Posts start with optional metadata lines:

  * title: Hello, World
  * subtitle: A first post
  * summary: Shown in the archive
  * published: false

Run 'quire gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Directory holding config.toml, layouts/, posts/ and styles/
    #[arg(long, default_value = "build", global = true)]
    build_path: PathBuf,

    /// Output directory
    #[arg(long, default_value = "site", global = true)]
    site_path: PathBuf,

    /// Log each build step (otherwise RUST_LOG decides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the whole site
    Build,
    /// Validate layouts, styles and posts without writing anything
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let paths = site::SitePaths::new(&cli.build_path, &cli.site_path);

    match cli.command {
        Command::Build => {
            println!("==> Building {} → {}", paths.build.display(), paths.site.display());
            let report = site::build(&paths)?;
            output::print_build_output(&report, &paths.site, "Built");
        }
        Command::Check => {
            println!("==> Checking {}", paths.build.display());
            let report = site::check(&paths)?;
            output::print_build_output(&report, &paths.site, "Checked");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
