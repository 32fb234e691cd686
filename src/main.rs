use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use pretty_print_nalgebra::*;
use serde::Deserialize;
use tracing::debug;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use blockmix::{plan, PlanRequest, PlanRequestBuilder, PlanResult, Variety};

const DEFAULT_MAX_BLOCKS: usize = 20;

#[derive(Parser, Debug)]
#[command(name = "blockmix")]
#[command(version)]
#[command(about = "Work out how many whole blocks of each ingredient to use, and how to batch them")]
struct Cli {
    /// Variety as NAME:BLOCK_KG:TARGET_G, e.g. "mozzarella:2,5:120" (repeatable)
    #[arg(short = 'v', long = "variety", value_parser = parse_variety)]
    varieties: Vec<Variety>,

    /// JSON plan file; command-line options override its values
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Most blocks of any single variety [default: 20]
    #[arg(short = 'm', long)]
    max_blocks: Option<usize>,

    /// Most blocks per batch before splitting; 0 never splits [default: 0]
    #[arg(short = 't', long, allow_negative_numbers = true)]
    max_total: Option<i64>,

    /// Refuse searches over more candidate allocations than this
    #[arg(long, default_value_t = 50_000_000)]
    search_limit: u64,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Log optimizer progress at debug level
    #[arg(long)]
    verbose: bool,
}

/// On-disk form of a plan request. Every field is optional so a file can
/// hold just the varieties and leave the bounds to the command line.
#[derive(Deserialize, Debug, Default)]
#[serde(default, deny_unknown_fields)]
struct PlanFile {
    varieties: Vec<Variety>,
    max_blocks_per_variety: Option<usize>,
    max_total_per_group: Option<i64>,
}

fn parse_decimal(s: &str) -> Result<f64, String> {
    s.trim().replace(',', ".").parse::<f64>().map_err(|e| format!("`{}` is not a number: {}", s, e))
}

fn parse_variety(s: &str) -> Result<Variety, String> {
    // split from the right so names may contain ':'
    let mut parts = s.rsplitn(3, ':');
    let (Some(target), Some(block), Some(name)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(format!("`{}` is not NAME:BLOCK_KG:TARGET_G", s));
    };
    Ok(Variety::new(name.trim(), parse_decimal(block)?, parse_decimal(target)?))
}

/// Name with the block weight appended, as shown to users.
fn display_label(variety: &Variety) -> String {
    format!("{}({:?}kg)", variety.name, variety.block_weight)
}

fn load_request(cli: &Cli) -> Result<PlanRequest> {
    let file = match &cli.input {
        Some(path) => {
            let text = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str::<PlanFile>(&text).with_context(|| format!("Failed to parse {}", path.display()))?
        }
        None => PlanFile::default(),
    };
    debug!(?file, "loaded plan file");

    let mut builder = PlanRequestBuilder::default();
    builder
        .varieties(file.varieties)
        .max_blocks_per_variety(cli.max_blocks.or(file.max_blocks_per_variety).unwrap_or(DEFAULT_MAX_BLOCKS))
        .max_total_per_group(cli.max_total.or(file.max_total_per_group).unwrap_or(0))
        .search_limit(cli.search_limit);
    for variety in &cli.varieties {
        builder.variety(variety.clone());
    }

    let request = builder.build().context("Failed to build plan request")?;
    if request.varieties.is_empty() {
        bail!("No varieties given; pass --variety or --input");
    }
    Ok(request)
}

fn render_text(request: &PlanRequest, result: &PlanResult) -> String {
    let labels: Vec<String> = request.varieties.iter().map(display_label).collect();
    let width = labels.iter().map(|l| l.len()).max().unwrap_or(0).max("variety".len());

    let mut out = String::new();
    out.push_str(&format!("{:<width$}  {:>6}  {:>8}\n", "variety", "blocks", "units"));
    for (i, label) in labels.iter().enumerate() {
        out.push_str(&format!("{:<width$}  {:>6}  {:>8}\n", label, result.optimal_counts[i], result.yield_per_variety[i]));
    }
    out.push_str(&format!("error score: {:.6e}\n", result.score));

    if let Some(groups) = &result.groups {
        out.push_str(&format!("\nsplit into {} groups:\n", groups.group_allocations.len()));
        out.push_str(&format!("{}\n", pretty_print!(&groups.group_array.group_array)));
        for (g, (counts, units)) in groups.group_allocations.iter().zip(&groups.yield_per_group).enumerate() {
            let parts: Vec<String> = labels
                .iter()
                .zip(counts.iter().zip(units))
                .map(|(label, (c, u))| format!("{} {} blocks -> {} units", label, c, u))
                .collect();
            out.push_str(&format!("group {}: {}\n", g + 1, parts.join(", ")));
        }
    }
    out
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer().without_time().with_writer(std::io::stderr))
        .init();

    let request = load_request(&cli)?;
    let result = plan(&request).context("Failed to plan blocks")?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", render_text(&request, &result));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_variety_with_decimal_comma() {
        let variety = parse_variety("mozzarella:2,5:120").unwrap();
        assert_eq!(variety, Variety::new("mozzarella", 2.5, 120.0));
    }

    #[test]
    fn test_parse_variety_name_with_colon() {
        let variety = parse_variety("blue: aged:1:40.5").unwrap();
        assert_eq!(variety, Variety::new("blue: aged", 1.0, 40.5));
    }

    #[test]
    fn test_parse_variety_rejects_garbage() {
        assert!(parse_variety("mozzarella:2.5").is_err());
        assert!(parse_variety("mozzarella:heavy:120").is_err());
    }

    #[test]
    fn test_display_label() {
        assert_eq!(display_label(&Variety::new("gouda", 2.5, 80.0)), "gouda(2.5kg)");
        assert_eq!(display_label(&Variety::new("gouda", 1.0, 80.0)), "gouda(1.0kg)");
    }

    #[test]
    fn test_command_line_overrides_defaults() {
        let cli = Cli::parse_from(["blockmix", "-v", "a:1:100", "-v", "b:2:100", "-t", "3"]);
        let request = load_request(&cli).unwrap();
        assert_eq!(request.varieties.len(), 2);
        assert_eq!(request.max_blocks_per_variety, DEFAULT_MAX_BLOCKS);
        assert_eq!(request.max_total_per_group, 3);
        assert_eq!(request.search_limit, Some(50_000_000));
    }

    #[test]
    fn test_every_flag_has_help() {
        use clap::CommandFactory;
        let help = Cli::command().render_long_help().to_string();
        assert!(help.contains("Log optimizer progress at debug level"));
        assert!(Cli::command().get_arguments().all(|arg| arg.get_help().is_some()));
    }

    #[test]
    fn test_no_varieties_is_an_error() {
        let cli = Cli::parse_from(["blockmix"]);
        assert!(load_request(&cli).is_err());
    }

    #[test]
    fn test_plan_file_parses() {
        let file: PlanFile = serde_json::from_str(
            r#"{"varieties": [{"name": "a", "block_weight": 1.0, "target_weight": 50}], "max_total_per_group": 6}"#,
        )
        .unwrap();
        assert_eq!(file.varieties.len(), 1);
        assert_eq!(file.max_blocks_per_variety, None);
        assert_eq!(file.max_total_per_group, Some(6));
    }

    #[test]
    fn test_render_text_lists_groups() {
        let cli = Cli::parse_from(["blockmix", "-v", "a:1:100", "-v", "b:1:100", "-m", "3", "-t", "1"]);
        let request = load_request(&cli).unwrap();
        let result = plan(&request).unwrap();
        let text = render_text(&request, &result);
        assert!(text.contains("a(1.0kg)"));
        assert!(text.contains("split into 2 groups"));
        assert!(text.contains("group 2: a(1.0kg) 0 blocks -> 0 units"));
    }
}
