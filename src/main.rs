use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use kerntools::{
    copy_small_figure_kerning, palettize_kerning, round_kerning, DesignspaceFont, Error,
    FigureSet, KerningTable,
};

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Reduce the number of distinct kerning values, like a GIF palette.
    Palettize {
        /// Source Designspace or UFO.
        #[arg(required = true)]
        path: PathBuf,

        /// Largest allowed change to a kerning value, relative to the UPM.
        #[arg(long, default_value_t = kerntools::palette::DEFAULT_MAX_TWEAK_RELATIVE)]
        max_tweak: f64,

        /// Where to write a UFO source (default: overwrite the input). Designspaces
        /// are always updated in place.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Round kerning to multiples of a base value and remove tiny pairs.
    Round {
        /// Source Designspace or UFO.
        #[arg(required = true)]
        path: PathBuf,

        #[arg(long, default_value_t = kerntools::round::DEFAULT_BASE)]
        base: i64,

        /// Pairs with a smaller magnitude are removed.
        #[arg(long, default_value_t = kerntools::round::DEFAULT_MIN_VALUE)]
        min_value: i64,

        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Copy kerning from one set of small figures to the others.
    CopySmallFigures {
        /// Source Designspace or UFO.
        #[arg(required = true)]
        path: PathBuf,

        /// The figure set to copy from: sups, subs, numr or dnom.
        #[arg(long)]
        from: FigureSet,

        /// Only process this master (default: all masters).
        #[arg(long)]
        master: Option<String>,

        #[arg(long)]
        output: Option<PathBuf>,
    },
}

/// A loaded source: every master of a Designspace or a single UFO.
enum Source {
    Designspace(DesignspaceFont),
    Ufo(norad::Font),
}

impl Source {
    fn load(path: &Path, output: Option<&Path>) -> Result<Self, Error> {
        if path.extension().map_or(false, |ext| ext == "designspace") {
            if output.is_some() {
                return Err(Error::InvalidArgument(
                    "--output is only supported for UFO sources".into(),
                ));
            }
            DesignspaceFont::load(path).map(Source::Designspace)
        } else {
            norad::Font::load(path)
                .map(Source::Ufo)
                .map_err(|e| Error::LoadUfo {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })
        }
    }

    fn table(&mut self) -> &mut dyn KerningTable {
        match self {
            Source::Designspace(font) => font,
            Source::Ufo(font) => font,
        }
    }

    fn save(&mut self, input: &Path, output: Option<&Path>) -> Result<(), Error> {
        match self {
            Source::Designspace(font) => font.save(),
            Source::Ufo(font) => {
                let path = output.unwrap_or(input);
                font.save(path).map_err(|e| Error::SaveUfo {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })
            }
        }
    }
}

fn run(command: Commands) -> Result<(), Error> {
    match command {
        Commands::Palettize {
            path,
            max_tweak,
            output,
        } => {
            let mut source = Source::load(&path, output.as_deref())?;
            let outcome = palettize_kerning(source.table(), max_tweak);
            println!("{outcome}");
            if matches!(outcome, kerntools::PaletteOutcome::Applied(_)) {
                source.save(&path, output.as_deref())?;
            }
        }
        Commands::Round {
            path,
            base,
            min_value,
            output,
        } => {
            let mut source = Source::load(&path, output.as_deref())?;
            let report = round_kerning(source.table(), base, min_value)?;
            print!("{report}");
            source.save(&path, output.as_deref())?;
        }
        Commands::CopySmallFigures {
            path,
            from,
            master,
            output,
        } => {
            let mut source = Source::load(&path, output.as_deref())?;
            let report = copy_small_figure_kerning(source.table(), from, master.as_deref())?;
            print!("{report}");
            source.save(&path, output.as_deref())?;
        }
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli.command) {
        log::error!("{e}");
        std::process::exit(1);
    }
}
