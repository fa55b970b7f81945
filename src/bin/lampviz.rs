use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "lampviz", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the on-screen scene as a PNG.
    Render(RenderArgs),
    /// Render at export scale, trim to visible content, and write a PNG.
    Export(RenderArgs),
    /// Print the default lamp settings as JSON.
    SettingsDefault,
    /// Apply actions to settings through the undo/redo history and write the result.
    Edit(EditArgs),
}

#[derive(Args, Debug)]
struct SceneArgs {
    /// Room image.
    #[arg(long)]
    background: Option<PathBuf>,

    /// Lamp sprite image.
    #[arg(long, conflicts_with = "preset")]
    lamp: Option<PathBuf>,

    /// Bundled lamp sprite (1-3), read from `<assets_root>/lamps/<n>.png`.
    #[arg(long)]
    preset: Option<u8>,

    /// Lamp settings JSON (camelCase fields; missing fields take defaults).
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Session config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Use the dark placeholder theme.
    #[arg(long)]
    dark: bool,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct EditArgs {
    /// Starting settings JSON; defaults when omitted.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Action to apply, in order: left|right|up|down|grow|shrink|rotate|toggle-light|undo|redo|reset,
    /// or position=x,y | light-start=v | light-width=v | light-color=#hex.
    #[arg(long = "action", required = true)]
    actions: Vec<String>,

    /// Output JSON path; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Export(args) => cmd_export(args),
        Command::SettingsDefault => cmd_settings_default(),
        Command::Edit(args) => cmd_edit(args),
    }
}

fn read_settings(path: &Path) -> anyhow::Result<lampviz::LampSettings> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read settings '{}'", path.display()))?;
    let settings = lampviz::LampSettings::from_json_str(&text)
        .with_context(|| format!("parse settings '{}'", path.display()))?;
    Ok(settings)
}

fn build_session(args: &SceneArgs) -> anyhow::Result<lampviz::LampSession> {
    let config = match &args.config {
        Some(path) => lampviz::SessionConfig::load(path)?,
        None => lampviz::SessionConfig::default().with_env_overrides(),
    };
    let mut session = lampviz::LampSession::new(config)?;

    if let Some(path) = &args.settings {
        session.load_settings(read_settings(path)?);
    }
    if let Some(path) = &args.background {
        let abs = std::path::absolute(path)
            .with_context(|| format!("resolve background path '{}'", path.display()))?;
        session.set_background(Some(lampviz::ImageSource::File(abs)));
    }
    if let Some(path) = &args.lamp {
        let abs = std::path::absolute(path)
            .with_context(|| format!("resolve lamp path '{}'", path.display()))?;
        session.set_sprite(Some(lampviz::ImageSource::File(abs)));
    }
    if let Some(index) = args.preset {
        session.select_preset(index)?;
    }
    if args.dark != session.is_dark_mode() {
        session.toggle_dark_mode();
    }
    Ok(session)
}

fn write_bytes(out: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(out, bytes).with_context(|| format!("write '{}'", out.display()))?;
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut session = build_session(&args.scene)?;
    let outcome = session.render()?;
    if let Some(e) = &outcome.background_error {
        eprintln!("warning: background not drawn: {e}");
    }
    if let Some(e) = &outcome.sprite_error {
        eprintln!("warning: lamp not drawn: {e}");
    }

    let png = lampviz::encode_png(&outcome.frame)?;
    write_bytes(&args.out, &png)?;
    eprintln!(
        "wrote {} ({}x{})",
        args.out.display(),
        outcome.frame.width,
        outcome.frame.height
    );
    Ok(())
}

fn cmd_export(args: RenderArgs) -> anyhow::Result<()> {
    let mut session = build_session(&args.scene)?;
    let png = match session.export_png() {
        Ok(png) => png,
        Err(e) if e.is_user_facing() => anyhow::bail!("export failed: {e}"),
        Err(e) => return Err(e.into()),
    };
    write_bytes(&args.out, &png)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_settings_default() -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(&lampviz::LampSettings::default())
        .context("serialize default settings")?;
    println!("{json}");
    Ok(())
}

fn cmd_edit(args: EditArgs) -> anyhow::Result<()> {
    let start = match &args.settings {
        Some(path) => read_settings(path)?,
        None => lampviz::LampSettings::default(),
    };
    let mut store = lampviz::SettingsStore::starting_at(start);

    for raw in &args.actions {
        match raw.trim() {
            "undo" => {
                store.undo();
            }
            "redo" => {
                store.redo();
            }
            "reset" => {
                store.reset();
            }
            other => {
                let action: lampviz::LampAction = other
                    .parse()
                    .with_context(|| format!("parse action '{other}'"))?;
                store.apply_action(&action);
            }
        }
    }

    let json =
        serde_json::to_string_pretty(store.current()).context("serialize edited settings")?;
    match &args.out {
        Some(out) => {
            write_bytes(out, format!("{json}\n").as_bytes())?;
            eprintln!(
                "wrote {} (history {} of {})",
                out.display(),
                store.index() + 1,
                store.len()
            );
        }
        None => println!("{json}"),
    }
    Ok(())
}
