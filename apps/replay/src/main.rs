use std::{collections::BTreeMap, fs, path::PathBuf, sync::Arc, time::Duration};

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};
use shared::{
    domain::{SectionDescriptor, SectionId},
    protocol::ContactFields,
};
use site_core::{
    headless::HeadlessHost,
    load_settings,
    mosaic::{brick_count, tile_style},
    FormRelay, FormState, HttpFormRelay, IntersectionEntry, MissingFormRelay, Site, SiteState,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Replays a recorded visitor session against the coordinator and prints the
/// resulting state as JSON lines.
#[derive(Parser, Debug)]
struct Args {
    /// Session script (JSON).
    #[arg(long, required_unless_present = "mosaic")]
    script: Option<PathBuf>,
    /// Settings file; defaults to ./portfolio.toml when present.
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Print state after every step instead of only at the end.
    #[arg(long)]
    verbose: bool,
    /// Print the inline style of every hero mosaic tile and exit.
    #[arg(long)]
    mosaic: bool,
}

fn default_viewport() -> f64 {
    900.0
}

#[derive(Debug, Deserialize)]
struct Script {
    #[serde(default = "default_viewport")]
    viewport_height: f64,
    sections: Vec<SectionDescriptor>,
    #[serde(default)]
    media: BTreeMap<String, String>,
    #[serde(default)]
    nested_host: Option<String>,
    steps: Vec<Step>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
enum Step {
    Scroll { top: f64 },
    Frame,
    Intersect { entries: Vec<IntersectionEntry> },
    AboutScroll { top: f64 },
    Wheel { delta_y: f64 },
    AboutClick,
    Resize,
    ToggleTheme,
    ToggleMenu,
    GoTo { section: String },
    ScrollTop,
    ForceHeader { forced: bool },
    Submit {
        name: String,
        email: String,
        message: String,
    },
    Wait { ms: u64 },
}

#[derive(Serialize)]
struct Report<'a> {
    step: usize,
    site: &'a SiteState,
    form: &'a FormState,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    if args.mosaic {
        for line in mosaic_lines() {
            println!("{line}");
        }
        return Ok(());
    }
    let Some(script_path) = args.script.as_deref() else {
        bail!("--script is required");
    };

    let settings = load_settings(args.settings.as_deref())?;
    let raw = fs::read_to_string(script_path)
        .with_context(|| format!("failed to read script '{}'", script_path.display()))?;
    let script: Script = serde_json::from_str(&raw)
        .with_context(|| format!("invalid script '{}'", script_path.display()))?;

    let relay: Arc<dyn FormRelay> = match &settings.relay_endpoint {
        Some(endpoint) => {
            let relay = HttpFormRelay::new(endpoint.clone());
            info!(endpoint = relay.endpoint(), "using form relay");
            Arc::new(relay)
        }
        None => {
            warn!("no relay endpoint configured; submissions will fail");
            Arc::new(MissingFormRelay)
        }
    };

    let ids: Vec<&str> = script.sections.iter().map(|s| s.id.as_str()).collect();
    let mut host = HeadlessHost::page(script.viewport_height, &ids);
    let mut site = Site::new(&settings, script.sections.clone(), relay);
    for (section, source) in &script.media {
        site = site.with_media(section.clone(), source.clone());
    }
    if let Some(nested_host) = &script.nested_host {
        site = site.with_nested_host(nested_host.clone());
    }

    site.mount(&mut host);
    info!(steps = script.steps.len(), "replaying session");

    for (idx, step) in script.steps.iter().enumerate() {
        run_step(&mut site, &mut host, step).await;
        if args.verbose {
            print_report(idx, &site)?;
        }
    }
    if !args.verbose {
        print_report(script.steps.len(), &site)?;
    }

    site.unmount(&mut host);
    Ok(())
}

async fn run_step(site: &mut Site, host: &mut HeadlessHost, step: &Step) {
    match step {
        Step::Scroll { top } => {
            if let Some(container) = host.container.as_mut() {
                container.set_scroll_top(*top);
            }
            site.on_scroll(host);
        }
        Step::Frame => site.on_frame(host),
        Step::Intersect { entries } => site.on_intersections(host, entries),
        Step::AboutScroll { top } => {
            if let Some(about) = host.about.as_mut() {
                about.set_scroll_top(*top);
            }
            site.on_about_scroll(host);
        }
        Step::Wheel { delta_y } => {
            let outcome = site.on_about_wheel(host, *delta_y);
            info!(?outcome, prevent_default = outcome.prevent_default(), "wheel");
        }
        Step::AboutClick => {
            let action = site.on_about_icon_click(host);
            info!(?action, "about icon");
        }
        Step::Resize => site.on_resize(host),
        Step::ToggleTheme => {
            site.toggle_theme(host);
        }
        Step::ToggleMenu => {
            site.toggle_mobile_menu();
        }
        Step::GoTo { section } => {
            if !site.scroll_to_section(host, &SectionId::new(section.clone())) {
                warn!(section = %section, "go_to target missing");
            }
        }
        Step::ScrollTop => {
            site.scroll_to_top(host);
        }
        Step::ForceHeader { forced } => site.set_header_forced(*forced),
        Step::Submit {
            name,
            email,
            message,
        } => {
            let status = site
                .contact()
                .submit_fields(ContactFields::new(name.clone(), email.clone(), message.clone()))
                .await;
            info!(kind = ?status.kind, message = %status.message, "form submitted");
        }
        Step::Wait { ms } => tokio::time::sleep(Duration::from_millis(*ms)).await,
    }
}

fn mosaic_lines() -> Vec<String> {
    (1..=brick_count())
        .filter_map(|index| tile_style(index).map(|style| format!("{index:02} {}", style.to_css())))
        .collect()
}

fn print_report(step: usize, site: &Site) -> Result<()> {
    let state = site.state();
    let form = site.contact().snapshot();
    let line = serde_json::to_string(&Report {
        step,
        site: &state,
        form: &form,
    })?;
    println!("{line}");
    Ok(())
}
