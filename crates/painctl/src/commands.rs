//! Command implementations for painctl

use anyhow::{Context as _, Result};
use owo_colors::OwoColorize;
use pain_common::{
    AccountCreationStrategy, AdjustOutcome, BaseClassIndex, DiskProfiles, PainConfig,
    PainTracker, RandomIds, RegisterData, TemplateDatabase,
};
use std::path::{Path, PathBuf};
use tracing::info;

/// Everything a command needs, built once
pub struct Context {
    pub root: PathBuf,
    pub config: PainConfig,
    pub tracker: PainTracker,
}

impl Context {
    pub fn load(root: PathBuf, config_path: Option<&Path>) -> Result<Self> {
        let config = PainConfig::load(&root, config_path).context("Failed to load configuration")?;
        let tracker = PainTracker::from_config(&config, &root);
        Ok(Self {
            root,
            config,
            tracker,
        })
    }

    fn profiles(&self) -> Result<DiskProfiles> {
        let dir = self.config.profiles_dir(&self.root);
        DiskProfiles::open(&dir).with_context(|| format!("Failed to open profiles in {}", dir.display()))
    }
}

pub fn init(ctx: &Context) -> Result<()> {
    let path = ctx.config.pained_profiles_path(&ctx.root);
    if ctx.tracker.initialize()? {
        println!("{} {}", "created".green(), path.display());
    } else {
        println!("{} {}", "exists".dimmed(), path.display());
    }
    Ok(())
}

pub fn catalog(ctx: &Context, dry_run: bool) -> Result<()> {
    let dir = ctx.config.templates_dir(&ctx.root);
    let db = TemplateDatabase::new(&dir);
    let mut tables = db
        .load()
        .with_context(|| format!("Failed to load templates from {}", dir.display()))?;

    let index = BaseClassIndex::from_items(tables.items.values(), &ctx.config.catalog.dogtag_templates);

    ctx.tracker
        .initialize()
        .context("Failed to initialize pained profiles file")?;
    let report = ctx.tracker.adjust_catalog(&mut tables, &index);

    println!("{}", "Catalog".bold());
    println!("  items unexamined   {}", report.items_unexamined.cyan());
    println!("  items excluded     {}", report.items_skipped);
    println!("  templates rebuilt  {}", report.templates_rebuilt.cyan());

    if dry_run {
        println!("{}", "dry run: templates not written".yellow());
        return Ok(());
    }

    db.save(&tables)
        .with_context(|| format!("Failed to write templates to {}", dir.display()))?;
    info!("Templates written to {}", dir.display());
    Ok(())
}

pub fn game_mode(ctx: &Context, session_id: &str) -> Result<()> {
    let mut profiles = ctx.profiles()?;

    match ctx.tracker.adjust_ready_profile(session_id, &mut profiles)? {
        AdjustOutcome::Pained { discovered } => println!(
            "{} {} ({} templates discovered)",
            "pained".green(),
            session_id,
            discovered
        ),
        AdjustOutcome::AlreadyPained => {
            println!("{} {}", "already pained".dimmed(), session_id)
        }
        AdjustOutcome::MissingInventory => {
            println!("{} {}", "no inventory".yellow(), session_id)
        }
    }
    Ok(())
}

pub fn register(ctx: &Context, username: String, password: String, edition: String) -> Result<()> {
    let mut profiles = ctx.profiles()?;
    let info = RegisterData {
        username,
        password,
        edition,
    };

    let profile_id = AccountCreationStrategy::create_account(&ctx.tracker, &info, &mut profiles, &RandomIds)
        .with_context(|| format!("Failed to create account {}", info.username))?;

    println!("{} {} -> {}", "registered".green(), info.username, profile_id);
    Ok(())
}

pub fn status(ctx: &Context, profile_id: Option<&str>) -> Result<()> {
    if let Some(id) = profile_id {
        if ctx.tracker.is_pained(id)? {
            println!("{} {}", id, "pained".green());
        } else {
            println!("{} {}", id, "not pained".yellow());
        }
        return Ok(());
    }

    let ids = ctx.tracker.pained_profiles()?;
    let path = ctx.config.pained_profiles_path(&ctx.root);
    println!("{} ({})", "Pained profiles".bold(), path.display());
    if ids.is_empty() {
        println!("  {}", "none".dimmed());
    }
    for id in &ids {
        println!("  {}", id);
    }
    println!("{} total", ids.len());

    let profiles = ctx.profiles()?;
    let pending = pending_profiles(ctx, &profiles)?;
    println!();
    println!(
        "{} ({} on disk)",
        "Awaiting adjustment".bold(),
        profiles.len()
    );
    if pending.is_empty() {
        println!("  {}", "none".dimmed());
    }
    for id in &pending {
        println!("  {}", id.yellow());
    }
    Ok(())
}

/// Profiles on disk that the next game-mode signal would still adjust
fn pending_profiles(ctx: &Context, profiles: &DiskProfiles) -> Result<Vec<String>> {
    if profiles.is_empty() {
        return Ok(Vec::new());
    }

    let mut pending = Vec::new();
    for id in profiles.ids() {
        if !ctx.tracker.is_pained(id)? {
            pending.push(id.to_string());
        }
    }
    Ok(pending)
}
