//! growth-planner
//!
//! Growth-rate breakdowns, expected-stat projections and the damage formula,
//! as a terminal UI or as one-shot commands.

use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use crossterm::{
    event, execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use gp_core::damage::{self, AttackInput, DamageKind, DefenseInput, Multipliers};
use gp_core::data::{Dataset, TableKind};
use gp_core::growth::{self, GrowthBreakdown, GrowthQuery, Trait};
use gp_core::inheritance::{ParentStats, Parents};
use gp_core::options::PlannerOptions;
use gp_core::projection::{self, Interval, Projection, ProjectionPlan, StartPoint};
use gp_core::stats::{Stat, StatLine};
use gp_tui::{App, Theme};

/// Fates-style growth planner
#[derive(Parser, Debug)]
#[command(name = "growth-planner")]
#[command(author, version, about = "Growth rates, stat projections and damage", long_about = None)]
struct Cli {
    /// Directory with characters.csv, classes.csv, ... (overrides data_dir)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Config file (default: <config dir>/growth-planner/growthrc)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Write logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive terminal UI
    Tui,
    /// Print a growth-rate breakdown
    Growth(GrowthArgs),
    /// Project expected stats along a route
    Project(ProjectArgs),
    /// Compute battle damage
    Damage(DamageArgs),
    /// List categories, characters and classes
    List(ListArgs),
}

#[derive(Args, Debug)]
struct ListArgs {
    /// Print one bundled sheet as CSV
    /// (characters, classes, class_bases, class_caps, character_bases)
    #[arg(long)]
    sheet: Option<TableKind>,
}

#[derive(Args, Debug)]
struct UnitArgs {
    /// Character name
    character: String,

    /// Parent whose growth is inherited (halved)
    #[arg(long)]
    parent: Option<String>,

    /// Avatar boon stat (e.g. Spd, 速さ)
    #[arg(long, value_parser = parse_stat)]
    boon: Option<Stat>,

    /// Avatar bane stat
    #[arg(long, value_parser = parse_stat)]
    bane: Option<Stat>,
}

impl UnitArgs {
    fn traits(&self) -> Trait {
        if let Some(boon) = self.boon
            && self.bane == Some(boon)
        {
            tracing::warn!(stat = %boon, "boon and bane are the same stat, bane ignored");
        }
        Trait::new(self.boon, self.bane)
    }
}

#[derive(Args, Debug)]
struct GrowthArgs {
    #[command(flatten)]
    unit: UnitArgs,

    /// Class whose growth bonus applies
    #[arg(long)]
    class: Option<String>,

    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct ProjectArgs {
    #[command(flatten)]
    unit: UnitArgs,

    /// Route interval START-END:CLASS, repeatable and applied in order
    #[arg(short, long = "interval")]
    intervals: Vec<Interval>,

    /// Starting class (with --start-level and --stats replaces the sheet row)
    #[arg(long, requires_all = ["start_level", "stats"])]
    start_class: Option<String>,

    #[arg(long, requires = "start_class")]
    start_level: Option<u32>,

    /// Starting stats, eight comma-separated values
    #[arg(long, requires = "start_class", value_parser = parse_stat_line)]
    stats: Option<StatLine>,

    /// Second parent, used for inherited starting stats
    #[arg(long)]
    fixed_parent: Option<String>,

    /// Current stats of --parent (default: its recruitment row)
    #[arg(long, requires = "fixed_parent_stats", value_parser = parse_stat_line)]
    parent_stats: Option<StatLine>,

    /// Current stats of --fixed-parent (default: its recruitment row)
    #[arg(long, requires = "parent_stats", value_parser = parse_stat_line)]
    fixed_parent_stats: Option<StatLine>,

    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct DamageArgs {
    /// 1/physical or 2/magical
    #[arg(long, default_value = "physical")]
    kind: DamageKind,

    #[arg(long, default_value_t = 0.0)]
    strength: f64,
    #[arg(long, default_value_t = 0.0)]
    magic: f64,
    #[arg(long, default_value_t = 0.0)]
    might: f64,
    /// Critical multiplier (1, 2, 3)
    #[arg(long, default_value_t = 1.0)]
    critical: f64,
    /// Weapon adjustment on critical hits (0, -4)
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    crit_adjust: f64,
    /// Level difference bonus (1 to 4)
    #[arg(long, default_value_t = 1.0)]
    level_bonus: f64,
    /// Weapon triangle (-2, 0, 2)
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    triangle: f64,

    #[arg(long, default_value_t = 0.0)]
    defense: f64,
    #[arg(long, default_value_t = 0.0)]
    resistance: f64,
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    terrain: f64,

    /// 0.5 when attacking from off the battle line
    #[arg(long, default_value_t = 1.0)]
    offline: f64,
    /// Special effectiveness (1, 3, 4)
    #[arg(long, default_value_t = 1.0)]
    special: f64,

    /// Accept values outside the game's ranges
    #[arg(long)]
    unchecked: bool,
}

fn parse_stat(s: &str) -> Result<Stat, String> {
    Stat::parse(s).ok_or_else(|| format!("unknown stat '{s}'"))
}

fn parse_stat_line(s: &str) -> Result<StatLine, String> {
    let values = s
        .split(',')
        .map(|v| v.trim().parse::<i32>().map_err(|_| format!("not a number: '{v}'")))
        .collect::<Result<Vec<_>, _>>()?;
    let values: [i32; 8] = values
        .try_into()
        .map_err(|v: Vec<i32>| format!("expected 8 values, got {}", v.len()))?;
    Ok(StatLine::new(values))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Without a subcommand, open the UI on a terminal and list tables otherwise
    let command = match cli.command {
        Some(command) => command,
        None if atty::is(atty::Stream::Stdout) && atty::is(atty::Stream::Stdin) => Command::Tui,
        None => Command::List(ListArgs { sheet: None }),
    };
    let tui = matches!(command, Command::Tui);
    init_logging(cli.verbose, cli.log_file.as_ref(), tui)?;

    let mut options = load_options(cli.config.as_ref())?;
    if let Some(dir) = cli.data {
        options.data_dir = Some(dir);
    }
    let dataset = load_dataset(&options)?;

    match command {
        Command::Tui => run_tui(dataset, options),
        Command::Growth(args) => print_growth(&dataset, &options, &args),
        Command::Project(args) => print_projection(&dataset, &options, args),
        Command::Damage(args) => print_damage(&options, &args),
        Command::List(args) => {
            match args.sheet {
                Some(kind) => print!("{}", gp_data::sheet(kind)),
                None => print_list(&dataset),
            }
            Ok(())
        }
    }
}

/// Install the fmt subscriber.
///
/// CLI commands log to stderr. The TUI owns the terminal, so it only logs
/// when a log file is given.
fn init_logging(verbose: u8, log_file: Option<&PathBuf>, tui: bool) -> Result<()> {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_env("GP_LOG").unwrap_or_else(|_| EnvFilter::new(default_level));

    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("cannot create log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None if tui => {}
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::stderr)
                .init();
        }
    }
    Ok(())
}

fn load_options(path: Option<&PathBuf>) -> Result<PlannerOptions> {
    match path {
        Some(path) => PlannerOptions::load_from_file(path)
            .with_context(|| format!("cannot load config {}", path.display())),
        None => match PlannerOptions::default_path() {
            Some(path) if path.exists() => PlannerOptions::load_from_file(&path)
                .with_context(|| format!("cannot load config {}", path.display())),
            _ => Ok(PlannerOptions::default()),
        },
    }
}

fn load_dataset(options: &PlannerOptions) -> Result<Dataset> {
    match &options.data_dir {
        Some(dir) => Dataset::load_dir(dir)
            .with_context(|| format!("cannot load tables from {}", dir.display())),
        None => gp_data::bundled_dataset().context("bundled tables are invalid"),
    }
}

fn run_tui(dataset: Dataset, options: PlannerOptions) -> Result<()> {
    let theme = Theme::from_preference(options.theme);
    let mut app = App::new(dataset, options, theme);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut app);

    // Restore terminal even if the loop failed
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn event_loop(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|frame| app.render(frame))?;

        if event::poll(Duration::from_millis(100))? {
            app.handle_event(event::read()?);
            if app.should_quit() {
                return Ok(());
            }
        }
    }
}

#[derive(Serialize)]
struct GrowthReport<'a> {
    character: &'a str,
    breakdown: &'a GrowthBreakdown,
    total: StatLine,
    total_sum: i32,
}

fn print_growth(dataset: &Dataset, options: &PlannerOptions, args: &GrowthArgs) -> Result<()> {
    let mut query = GrowthQuery::new(args.unit.character.as_str()).with_traits(args.unit.traits());
    if let Some(class) = &args.class {
        query = query.with_class(class.as_str());
    }
    if let Some(parent) = &args.unit.parent {
        query = query.with_parent(parent.as_str());
    }
    let breakdown = growth::compose(dataset, &query, options)?;

    if args.json {
        let report = GrowthReport {
            character: &args.unit.character,
            breakdown: &breakdown,
            total: breakdown.total(),
            total_sum: breakdown.total_sum(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_header(&args.unit.character);
    for (component, line) in breakdown.components() {
        print_row(&component.to_string(), &line);
    }
    print_row("Total", &breakdown.total());
    println!("Sum {}", breakdown.total_sum());
    Ok(())
}

fn projection_plan(args: ProjectArgs) -> ProjectionPlan {
    let parents = Parents {
        variable: args.unit.parent.clone(),
        fixed: args.fixed_parent,
    };
    let mut plan = ProjectionPlan::new(args.unit.character.as_str())
        .with_parents(parents)
        .with_traits(args.unit.traits());
    if let (Some(class), Some(level), Some(stats)) =
        (args.start_class, args.start_level, args.stats)
    {
        plan = plan.with_start(StartPoint { class, level, stats });
    }
    if let (Some(variable), Some(fixed)) = (args.parent_stats, args.fixed_parent_stats) {
        plan = plan.with_parent_stats(ParentStats { variable, fixed });
    }
    plan.intervals = args.intervals;
    plan
}

fn print_projection(dataset: &Dataset, options: &PlannerOptions, args: ProjectArgs) -> Result<()> {
    let json = args.json;
    let plan = projection_plan(args);
    let result = projection::project(dataset, &plan, options)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_projection_table(&result);
    }
    Ok(())
}

fn print_projection_table(result: &Projection) {
    println!(
        "{}: {} Lv{} -> {} Lv{}",
        result.character,
        result.start.class,
        result.start.level,
        result.final_class,
        result.final_level
    );
    for step in &result.steps {
        let change = if step.class_change.is_some() { " (class change)" } else { "" };
        println!(
            "  Lv{}-{} {}{}",
            step.interval.start_level, step.interval.end_level, step.interval.class, change
        );
    }
    print!("{:<8}", "");
    for stat in Stat::ALL {
        print!("{:>8}", stat.short_name());
    }
    println!();
    if let Some(bonus) = &result.inherited {
        print!("{:<8}", "Inherit");
        for (_, value) in bonus.iter() {
            print!("{value:>8}");
        }
        println!();
    }
    for (label, stats) in [("Raw", result.raw.rounded()), ("Capped", result.capped.rounded())] {
        print!("{label:<8}");
        for (_, value) in stats.iter() {
            print!("{value:>8.2}");
        }
        println!();
    }
}

fn print_damage(options: &PlannerOptions, args: &DamageArgs) -> Result<()> {
    let attack = AttackInput {
        strength: args.strength,
        magic: args.magic,
        weapon_might: args.might,
        critical: args.critical,
        crit_adjust: args.crit_adjust,
        level_bonus: args.level_bonus,
        triangle: args.triangle,
    };
    let defense = DefenseInput {
        defense: args.defense,
        resistance: args.resistance,
        terrain: args.terrain,
    };
    let multipliers = Multipliers {
        offline: args.offline,
        special: args.special,
    };

    if !(args.unchecked || options.unchecked_damage) {
        damage::validate(&attack, &multipliers)?;
    }

    let dealt = damage::damage(args.kind, &attack, &defense, &multipliers);
    println!(
        "{} attack {} - defense {} = {}",
        args.kind,
        damage::attack_power(args.kind, &attack),
        damage::defense_power(args.kind, &defense),
        dealt
    );
    Ok(())
}

fn print_list(dataset: &Dataset) {
    for category in dataset.categories() {
        println!("[{category}]");
        if let Ok(names) = dataset.characters_in(category) {
            println!("  {}", names.join(", "));
        }
    }
    println!("[classes]");
    println!("  {}", dataset.class_names().collect::<Vec<_>>().join(", "));
}

fn print_header(title: &str) {
    print!("{title:<12}");
    for stat in Stat::ALL {
        print!("{:>6}", stat.short_name());
    }
    println!();
}

fn print_row(label: &str, line: &StatLine) {
    print!("{label:<12}");
    for (_, value) in line.iter() {
        print!("{value:>6}");
    }
    println!();
}
