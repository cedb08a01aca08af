use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::{info, LevelFilter};

use render_pathway_rs::ehld::{decorate_ehld, EhldAnalysis};
use render_pathway_rs::engine::GraphIndex;
use render_pathway_rs::export::{
    export_animated_gif, export_image, ExportArgs, OutputFormat, Scene, DEFAULT_QUALITY,
};
use render_pathway_rs::model::{
    load_analysis, load_diagram, load_graph, AnalysisResult, Diagram, Graph,
};
use render_pathway_rs::profiles::{Color, ColorProfiles};

#[derive(Parser)]
#[command(author, version, about = "Render Reactome pathway diagrams with analysis overlays", long_about = None)]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    #[command(name = "draw_diagram")]
    DrawDiagram {
        #[command(flatten)]
        request: DiagramRequest,
        /// Output format; taken from the output extension when omitted.
        #[arg(long)]
        format: Option<String>,
        /// Expression column drawn in the image.
        #[arg(long, default_value_t = 0)]
        column: usize,
        #[arg(long, default_value = "diagram.png")]
        output: PathBuf,
    },
    #[command(name = "draw_gif")]
    DrawGif {
        #[command(flatten)]
        request: DiagramRequest,
        #[arg(long, default_value = "diagram.gif")]
        output: PathBuf,
    },
    #[command(name = "decorate_ehld")]
    DecorateEhld {
        #[arg(long)]
        ehld: PathBuf,
        #[arg(long)]
        graph: PathBuf,
        #[arg(long, value_delimiter = ',')]
        select: Vec<String>,
        #[arg(long, value_delimiter = ',')]
        flag: Vec<String>,
        #[arg(long)]
        diagram_profile: Option<PathBuf>,
        /// Analysis result painted onto the pathway regions.
        #[arg(long)]
        analysis: Option<PathBuf>,
        #[arg(long)]
        analysis_profile: Option<PathBuf>,
        /// Expression column painted onto the regions.
        #[arg(long, default_value_t = 0)]
        column: usize,
        #[arg(long, default_value = "ehld.svg")]
        output: PathBuf,
    },
}

#[derive(Args)]
struct DiagramRequest {
    #[arg(long)]
    diagram: PathBuf,
    #[arg(long)]
    graph: PathBuf,
    #[arg(long)]
    analysis: Option<PathBuf>,
    #[arg(long)]
    diagram_profile: Option<PathBuf>,
    #[arg(long)]
    analysis_profile: Option<PathBuf>,
    /// Identifiers to select (db ids, stable ids, identifiers or gene names).
    #[arg(long, value_delimiter = ',')]
    select: Vec<String>,
    /// Identifiers to flag, expanded through set and complex membership.
    #[arg(long, value_delimiter = ',')]
    flag: Vec<String>,
    /// Quality from 1 to 10.
    #[arg(long, default_value_t = DEFAULT_QUALITY)]
    quality: u8,
    /// Background for formats without transparency.
    #[arg(long, default_value = "#FFFFFF")]
    background: String,
    /// Write the diagram name in the top-left corner.
    #[arg(long, default_value_t = false)]
    title: bool,
}

struct LoadedRequest {
    diagram: Diagram,
    graph: Graph,
    analysis: Option<AnalysisResult>,
    profiles: ColorProfiles,
}

impl DiagramRequest {
    fn load(&self) -> Result<LoadedRequest> {
        let diagram = load_diagram(&self.diagram)
            .with_context(|| format!("Failed to load diagram {:?}", self.diagram))?;
        let graph = load_graph(&self.graph)
            .with_context(|| format!("Failed to load graph {:?}", self.graph))?;
        let analysis = self
            .analysis
            .as_deref()
            .map(load_analysis)
            .transpose()
            .context("Failed to load analysis result")?;
        let profiles = ColorProfiles::load(
            self.diagram_profile.as_deref(),
            self.analysis_profile.as_deref(),
        )
        .context("Failed to load color profiles")?;
        Ok(LoadedRequest {
            diagram,
            graph,
            analysis,
            profiles,
        })
    }

    fn export_args(&self, format: OutputFormat, column: usize) -> Result<ExportArgs> {
        let mut args = ExportArgs::new(format)
            .with_quality(self.quality)
            .context("Invalid quality")?;
        args.background = Color::parse(&self.background)
            .with_context(|| format!("Invalid background color '{}'", self.background))?;
        args.column = column;
        args.write_title = self.title;
        Ok(args)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::new()
        .filter_level(match cli.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            _ => LevelFilter::Debug,
        })
        .init();

    match cli.command {
        Command::DrawDiagram {
            request,
            format,
            column,
            output,
        } => {
            let format = match format {
                Some(format) => format.parse::<OutputFormat>(),
                None => OutputFormat::from_path(&output),
            }
            .context("Unknown output format")?;
            draw_diagram(&request, format, column, &output)
        }
        Command::DrawGif { request, output } => draw_gif(&request, &output),
        Command::DecorateEhld {
            ehld,
            graph,
            select,
            flag,
            diagram_profile,
            analysis,
            analysis_profile,
            column,
            output,
        } => {
            let request = EhldRequest {
                ehld,
                graph,
                select,
                flag,
                diagram_profile,
                analysis,
                analysis_profile,
                column,
            };
            decorate(&request, &output)
        }
    }
}

fn draw_diagram(
    request: &DiagramRequest,
    format: OutputFormat,
    column: usize,
    output: &Path,
) -> Result<()> {
    let args = request.export_args(format, column)?;
    let loaded = request.load()?;
    let scene = Scene::new(&loaded.diagram, &loaded.graph, &loaded.profiles)
        .with_selection(&request.select, &request.flag)
        .with_analysis(loaded.analysis.as_ref());
    export_image(&scene, &args, output)
        .with_context(|| format!("Failed to export {:?}", output))
}

fn draw_gif(request: &DiagramRequest, output: &Path) -> Result<()> {
    let args = request.export_args(OutputFormat::Gif, 0)?;
    let loaded = request.load()?;
    let scene = Scene::new(&loaded.diagram, &loaded.graph, &loaded.profiles)
        .with_selection(&request.select, &request.flag)
        .with_analysis(loaded.analysis.as_ref());
    export_animated_gif(&scene, &args, output)
        .with_context(|| format!("Failed to export {:?}", output))
}

struct EhldRequest {
    ehld: PathBuf,
    graph: PathBuf,
    select: Vec<String>,
    flag: Vec<String>,
    diagram_profile: Option<PathBuf>,
    analysis: Option<PathBuf>,
    analysis_profile: Option<PathBuf>,
    column: usize,
}

fn decorate(request: &EhldRequest, output: &Path) -> Result<()> {
    let ehld = &request.ehld;
    let svg = fs::read_to_string(ehld).with_context(|| format!("Failed to read {:?}", ehld))?;
    let graph = load_graph(&request.graph)
        .with_context(|| format!("Failed to load graph {:?}", request.graph))?;
    let result = request
        .analysis
        .as_deref()
        .map(load_analysis)
        .transpose()
        .context("Failed to load analysis result")?;
    let profiles = ColorProfiles::load(
        request.diagram_profile.as_deref(),
        request.analysis_profile.as_deref(),
    )
    .context("Failed to load color profiles")?;
    let analysis = result.as_ref().map(|result| EhldAnalysis {
        result,
        profile: &profiles.analysis,
        column: request.column,
    });

    let diagram = Diagram::default();
    let index = GraphIndex::new(&diagram, &graph);
    let properties = &profiles.diagram.properties;
    let (decorated, marks) = decorate_ehld(
        &svg,
        &index,
        &request.select,
        &request.flag,
        properties,
        analysis.as_ref(),
    )
    .with_context(|| format!("Failed to decorate {:?}", ehld))?;
    fs::write(output, decorated).with_context(|| format!("Failed to write {:?}", output))?;
    info!(
        "decorated {} selected, {} flagged and {} analysed regions into {:?}",
        marks.selected.len(),
        marks.flagged.len(),
        marks.analysed.len(),
        output
    );
    Ok(())
}
