//! Dashboard display commands

use anyhow::Result;

use super::render;
use crate::analytics::HeatmapOrigin;
use crate::dashboard::Dashboard;

/// Which part of the dashboard to print
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    All,
    Stats,
    Weekly,
    Heatmap,
    Timeline,
}

pub fn run(dashboard: &Dashboard, section: Section, json: bool, excerpt_chars: usize) -> Result<()> {
    if json {
        let value = match section {
            Section::All => serde_json::to_value(dashboard)?,
            Section::Stats => serde_json::to_value(dashboard.stats)?,
            Section::Weekly => serde_json::to_value(&dashboard.weekly)?,
            Section::Heatmap => serde_json::to_value(&dashboard.heatmap)?,
            Section::Timeline => serde_json::to_value(&dashboard.timeline)?,
        };
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    print!("{}", text(dashboard, section, excerpt_chars));
    Ok(())
}

pub fn text(dashboard: &Dashboard, section: Section, excerpt_chars: usize) -> String {
    match section {
        Section::Stats => render::stats(&dashboard.stats),
        Section::Weekly => render::weekly(&dashboard.weekly),
        Section::Heatmap => heatmap_with_origin(dashboard),
        Section::Timeline => render::timeline(dashboard),
        Section::All => {
            let mut out = String::new();
            let heatmap_title = format!("Activity (last {} days)", dashboard.heatmap.len());
            let parts = [
                ("Overview", render::stats(&dashboard.stats)),
                ("Weekly Summary", render::weekly(&dashboard.weekly)),
                (heatmap_title.as_str(), heatmap_with_origin(dashboard)),
                (
                    "Recent Notes",
                    render::recent_notes(&dashboard.recent_notes, dashboard.zone, excerpt_chars),
                ),
                ("Recent Tasks", render::recent_tasks(&dashboard.recent_tasks, dashboard.zone)),
                ("Activity Timeline", render::timeline(dashboard)),
            ];
            out.push_str(&format!("Dashboard for {}\n", dashboard.today));
            for (title, body) in parts {
                out.push_str(&format!("\n{}\n{}\n{}", title, "-".repeat(title.chars().count()), body));
            }
            out
        }
    }
}

fn heatmap_with_origin(dashboard: &Dashboard) -> String {
    let mut out = render::heatmap(&dashboard.heatmap);
    match dashboard.heatmap_origin {
        HeatmapOrigin::External => {}
        HeatmapOrigin::Merged { external_days } => out.push_str(&format!(
            "({} of {} days from server, rest computed locally)\n",
            external_days,
            dashboard.heatmap.len()
        )),
        HeatmapOrigin::LocalFallback => out.push_str("(computed locally from tasks)\n"),
    }
    out
}
