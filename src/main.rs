//! Mouse Skill Tracker CLI
//!
//! Inspect and manage mouse-skill progress, and replay recorded pointer
//! traces as practice sessions.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use mouse_skill_tracker::{
    logging, AgeGroup, Config, ModalChoice, PointerBus, PointerSignal, PositionSample,
    PracticeOptions, PracticeWidget, PracticeWrapper, SkillStore, SystemClock, TaskType, VERSION,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "mouse-skill")]
#[command(version = VERSION)]
#[command(about = "Mouse-skill tracking and progress for practice widgets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show current level, metrics and streak
    Status,

    /// List badges and their unlock state
    Badges,

    /// List recent practice sessions
    Sessions {
        /// Maximum number of sessions to show
        #[arg(long, default_value = "10")]
        limit: usize,
    },

    /// Replay a recorded pointer trace as a practice session
    Replay {
        /// JSON array of pointer signals
        trace: PathBuf,

        /// Task type recorded for the session
        #[arg(long, default_value = "mixed")]
        task: TaskType,

        /// JSON array of click targets to score accuracy against
        #[arg(long)]
        targets: Option<PathBuf>,
    },

    /// Export progress to a dated JSON file
    Export {
        /// Output directory (defaults to the configured export path)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Import progress from an exported JSON file
    Import { file: PathBuf },

    /// Reset skill progress (keeps age group and preferences)
    Reset,

    /// Set the age group (6-8, 9-11, 12-14 or 15+)
    AgeGroup { group: AgeGroup },

    /// Flip a feature toggle
    Toggle {
        #[arg(value_enum)]
        feature: Feature,
    },

    /// Show configuration
    Config,
}

#[derive(Clone, Copy, ValueEnum)]
enum Feature {
    AdaptiveUi,
    Gamification,
    Sound,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load().context("loading configuration")?;
    logging::init_tracing(&config.log_level);

    match cli.command {
        Commands::Status => cmd_status(&config),
        Commands::Badges => cmd_badges(&config),
        Commands::Sessions { limit } => cmd_sessions(&config, limit),
        Commands::Replay {
            trace,
            task,
            targets,
        } => cmd_replay(&config, &trace, task, targets.as_deref()),
        Commands::Export { output } => cmd_export(&config, output),
        Commands::Import { file } => cmd_import(&config, &file),
        Commands::Reset => cmd_reset(&config),
        Commands::AgeGroup { group } => cmd_age_group(&config, group),
        Commands::Toggle { feature } => cmd_toggle(&config, feature),
        Commands::Config => cmd_config(&config),
    }
}

fn open_store(config: &Config) -> Result<SkillStore> {
    let options = config.store_options()?;
    Ok(SkillStore::open_with(
        Box::new(config.storage()),
        Arc::new(SystemClock),
        options,
    ))
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}

fn cmd_status(config: &Config) -> Result<()> {
    let store = open_store(config)?;
    let progress = store.progress();
    let metrics = store.metrics();

    println!("Mouse Skill Tracker v{VERSION}");
    println!("==========================");
    println!();
    println!("User:            {}", store.user_id());
    println!("Skill level:     {}", store.current_level());
    println!("Age group:       {}", store.age_group());
    println!("Sessions:        {}", progress.total_sessions);
    println!("Practice time:   {:.1} min", progress.total_practice_time);
    println!("Daily streak:    {}", progress.daily_streak);
    if let Some(last) = progress.last_practice_date {
        println!("Last practice:   {}", last.format("%Y-%m-%d %H:%M UTC"));
    }
    println!(
        "Badges:          {}/{}",
        store.unlocked_badges().len(),
        store.badges().len()
    );
    println!();
    println!("Metrics:");
    println!("  Accuracy:          {:.0}", metrics.accuracy);
    println!("  Speed:             {:.0} px/s", metrics.speed);
    println!("  Smoothness:        {:.0}", metrics.smoothness);
    println!("  Drag control:      {:.0}", metrics.drag_control);
    println!("  Click timing:      {:.0}", metrics.click_timing);
    println!("  Double-click rate: {:.0}%", metrics.double_click_rate);
    println!();

    let criteria = store.skill_criteria().for_level(store.current_level());
    println!(
        "Criteria for {} at age {}: accuracy {:.0}, speed {:.0}, smoothness {:.0}",
        store.current_level(),
        store.age_group(),
        criteria.accuracy,
        criteria.speed,
        criteria.smoothness
    );

    let ui = store.adaptive_ui_config();
    println!();
    println!("Adaptive UI: {}", on_off(store.adaptive_ui_enabled()));
    println!(
        "  Button size {}px, padding {}px, drag sensitivity {:.2}",
        ui.button_size, ui.click_padding, ui.drag_sensitivity
    );
    println!(
        "  Hints {}, haptics {}, snap to grid {}, trajectory {}",
        on_off(ui.show_visual_hints),
        on_off(ui.enable_haptic_feedback),
        on_off(ui.snap_to_grid),
        on_off(ui.show_trajectory)
    );
    println!(
        "Gamification: {}  Sound: {}",
        on_off(store.gamification_enabled()),
        on_off(store.sound_enabled())
    );
    Ok(())
}

fn cmd_badges(config: &Config) -> Result<()> {
    let store = open_store(config)?;
    for badge in store.badges() {
        let state = match badge.unlocked_at {
            Some(at) => format!("unlocked {}", at.format("%Y-%m-%d")),
            None => "locked".to_string(),
        };
        println!(
            "{} {:<16} {:<10} {:<20} {}",
            badge.icon,
            badge.name,
            format!("{:?}", badge.rarity).to_lowercase(),
            state,
            badge.description
        );
    }
    Ok(())
}

fn cmd_sessions(config: &Config, limit: usize) -> Result<()> {
    let store = open_store(config)?;
    let recent = &store.progress().recent_sessions;
    if recent.is_empty() {
        println!("No practice sessions yet.");
        println!("Run 'mouse-skill replay <trace.json>' to record one.");
        return Ok(());
    }

    for session in recent.iter().take(limit) {
        println!(
            "{}  {:<12} score {:>3.0}  {:.1} min  {}",
            session.start_time.format("%Y-%m-%d %H:%M"),
            session.task_type,
            session.score,
            session.duration_minutes(),
            session.session_id
        );
        for improvement in &session.improvements {
            println!("    - {improvement}");
        }
    }
    Ok(())
}

/// Stand-in widget for sessions replayed from the command line.
struct TraceWidget;

impl PracticeWidget for TraceWidget {
    fn on_close(&mut self) {}
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))
}

fn cmd_replay(config: &Config, trace: &Path, task: TaskType, targets: Option<&Path>) -> Result<()> {
    let signals: Vec<PointerSignal> = read_json(trace)?;
    if signals.is_empty() {
        bail!("trace {} contains no pointer signals", trace.display());
    }
    let targets: Option<Vec<PositionSample>> = targets.map(read_json).transpose()?;

    let mut store = open_store(config)?;
    let bus = PointerBus::new();
    let options = PracticeOptions {
        practice_task_type: Some(task),
        ..PracticeOptions::default()
    };
    let mut wrapper = PracticeWrapper::mount(TraceWidget, options, &store);
    let level_before = store.current_level();

    let modal = wrapper.open_practice(&bus, &mut store);
    modal.tracker_mut().set_targets(targets);

    let poll_ms = config.metrics_poll_interval.as_millis().max(1) as i64;
    let mut next_poll = signals[0].timestamp() + poll_ms;
    for signal in &signals {
        bus.emit(*signal);
        modal.apply_pending();
        if signal.timestamp() >= next_poll {
            let live = modal.pump();
            tracing::debug!(?live, "live metrics");
            next_poll = signal.timestamp() + poll_ms;
        }
    }
    modal.pump();

    let finished = modal
        .complete(&mut store)
        .context("practice session was not recorded")?;
    wrapper.close_practice(ModalChoice::Dismiss);

    println!("Replayed {} signals from {}", signals.len(), trace.display());
    println!("Session {} ({})", finished.session_id, finished.task_type);
    println!("  Score:        {:.0}", finished.score);
    println!("  Accuracy:     {:.0}", finished.metrics.accuracy);
    println!("  Speed:        {:.0} px/s", finished.metrics.speed);
    println!("  Smoothness:   {:.0}", finished.metrics.smoothness);
    println!("  Drag control: {:.0}", finished.metrics.drag_control);
    println!("  Click timing: {:.0}", finished.metrics.click_timing);
    for improvement in &finished.improvements {
        println!("  - {improvement}");
    }
    if store.current_level() != level_before {
        println!("Skill level: {} -> {}", level_before, store.current_level());
    }
    println!("Daily streak: {}", store.progress().daily_streak);
    Ok(())
}

fn cmd_export(config: &Config, output: Option<PathBuf>) -> Result<()> {
    let store = open_store(config)?;
    let dir = output.unwrap_or_else(|| config.export_path.clone());
    let path = store
        .export_to_file(&dir)
        .with_context(|| format!("exporting to {}", dir.display()))?;
    println!("Exported progress to {}", path.display());
    Ok(())
}

fn cmd_import(config: &Config, file: &Path) -> Result<()> {
    let data =
        std::fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?;
    let mut store = open_store(config)?;
    store
        .import_progress(&data)
        .with_context(|| format!("importing {}", file.display()))?;
    println!(
        "Imported progress for {} ({} sessions)",
        store.user_id(),
        store.sessions().len()
    );
    Ok(())
}

fn cmd_reset(config: &Config) -> Result<()> {
    let mut store = open_store(config)?;
    store.reset_progress();
    println!("Progress reset. Age group and preferences were kept.");
    Ok(())
}

fn cmd_age_group(config: &Config, group: AgeGroup) -> Result<()> {
    let mut store = open_store(config)?;
    store.set_age_group(group);
    println!("Age group set to {group}.");
    Ok(())
}

fn cmd_toggle(config: &Config, feature: Feature) -> Result<()> {
    let mut store = open_store(config)?;
    let (name, enabled) = match feature {
        Feature::AdaptiveUi => ("Adaptive UI", store.toggle_adaptive_ui()),
        Feature::Gamification => ("Gamification", store.toggle_gamification()),
        Feature::Sound => ("Sound", store.toggle_sound()),
    };
    println!("{name}: {}", on_off(enabled));
    Ok(())
}

fn cmd_config(config: &Config) -> Result<()> {
    println!("Configuration");
    println!("=============");
    println!();
    println!("Config file: {:?}", Config::config_path());
    println!(
        "Store file:  {:?}",
        config.storage().path_for(&config.storage_key)
    );
    println!();
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}
