use alu_cutlist::constants::{A4_HEIGHT, A4_WIDTH, LETTER_HEIGHT, LETTER_WIDTH};
use alu_cutlist::form::parse_window_count;
use alu_cutlist::report::{self, CutList, Labels, ReportConfig};
use alu_cutlist::{Field, RawWindowSpec, WindowForm};
use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LabelSet {
    English,
    Arabic,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PageSize {
    A4,
    Letter,
}

impl PageSize {
    fn dimensions(self) -> (f32, f32) {
        match self {
            PageSize::A4 => (A4_WIDTH, A4_HEIGHT),
            PageSize::Letter => (LETTER_WIDTH, LETTER_HEIGHT),
        }
    }
}

/// Calculate aluminum frame and sash cut dimensions for windows
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Number of windows (anything below 1 counts as 1)
    #[arg(short = 'n', long, allow_hyphen_values = true)]
    count: Option<String>,

    /// Window opening as LENGTHxWIDTH in cm, repeat for each window
    #[arg(short, long = "window", value_name = "LENGTHxWIDTH")]
    windows: Vec<String>,

    /// JSON file with an array of {"length": .., "width": ..} objects
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Export the results as a PDF report
    #[arg(long)]
    pdf: bool,

    /// Directory the PDF is written to
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Report title (defaults to the label set's title)
    #[arg(long)]
    title: Option<String>,

    /// Display strings for the table and report
    #[arg(long, value_enum, default_value_t = LabelSet::English)]
    labels: LabelSet,

    /// Paper size of the PDF report
    #[arg(long, value_enum, default_value_t = PageSize::A4)]
    page: PageSize,

    /// TrueType font to embed in the PDF, needed for non-Latin labels
    #[arg(long)]
    font: Option<PathBuf>,

    /// Print the results as JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(std::io::stderr)
        .init();
}

/// Split `LENGTHxWIDTH` into its two parts; either side may be blank
fn split_window(text: &str) -> Option<(&str, &str)> {
    text.split_once(['x', 'X', ','])
}

fn build_form(args: &Args) -> Result<WindowForm> {
    let mut form = WindowForm::new();
    let mut specs: Vec<RawWindowSpec> = Vec::new();

    if let Some(ref path) = args.input {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        specs = serde_json::from_str(&data)
            .with_context(|| format!("parsing {}", path.display()))?;
    }

    let count = match args.count {
        Some(ref text) => parse_window_count(text),
        None => (specs.len() + args.windows.len()).max(1),
    };
    form.set_window_count(count as i64);

    for (i, spec) in specs.iter().enumerate() {
        form.set_dimension(i, Field::Length, spec.length);
        form.set_dimension(i, Field::Width, spec.width);
    }

    for (offset, text) in args.windows.iter().enumerate() {
        let index = specs.len() + offset;
        let Some((length, width)) = split_window(text) else {
            bail!("window `{text}` must be written as LENGTHxWIDTH");
        };
        if !form.set_dimension_text(index, Field::Length, length) {
            warn!("Ignoring window {} beyond the window count", index + 1);
            continue;
        }
        form.set_dimension_text(index, Field::Width, width);
    }

    debug!("Form holds {} windows", form.window_count());
    Ok(form)
}

fn report_config(args: &Args) -> Result<ReportConfig> {
    let labels = match args.labels {
        LabelSet::English => Labels::english(),
        LabelSet::Arabic => Labels::arabic(),
    };
    let (width, height) = args.page.dimensions();
    let mut config = ReportConfig::default()
        .with_labels(labels)
        .with_page_size(width, height);
    if let Some(ref title) = args.title {
        config = config.with_title(title.clone());
    }

    if let Some(ref path) = args.font {
        #[cfg(feature = "ttf-parser")]
        {
            let data =
                std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
            let font = alu_cutlist::TtfFontMetrics::new(data)
                .with_context(|| format!("loading font {}", path.display()))?;
            config = config.with_font(font);
        }
        #[cfg(not(feature = "ttf-parser"))]
        bail!(
            "cannot embed {}: built without the ttf-parser feature",
            path.display()
        );
    } else if args.pdf && !config.labels.is_latin1() {
        #[cfg(feature = "ttf-parser")]
        {
            if let Some(data) = alu_cutlist::font::find_system_font() {
                debug!("Embedding system font for non-Latin labels");
                return Ok(config.with_font(alu_cutlist::TtfFontMetrics::new(data)?));
            }
        }
        warn!("Labels contain characters the built-in PDF font cannot show, pass --font");
    }

    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut form = build_form(&args)?;
    let config = report_config(&args)?;
    let results = form.calculate();

    for window in results.iter().filter(|w| w.has_negative_dimension()) {
        warn!(
            "Window {} is too narrow: derived dimensions are negative",
            window.index
        );
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(results)?);
    } else {
        print!("{}", CutList::new(results, &config.labels));
    }

    if args.pdf {
        let path = report::save(results, &config, &args.output_dir)
            .context("exporting PDF report")?;
        eprintln!("Saved {}", path.display());
    }

    Ok(())
}
