//! Window command - prints the rendered window of a virtualized list

use clap::Args;
use serde::Serialize;
use tracing::info;

use crate::domain::virtual_list::{FollowBottom, VirtualItem, VirtualListLayout, VisibleRange};

/// Arguments for the window command
#[derive(Args, Clone)]
pub struct WindowArgs {
    /// Number of items in the list
    #[arg(long)]
    pub count: usize,

    /// Height of every item in pixels
    #[arg(long, default_value_t = 40.0)]
    pub item_height: f64,

    /// Height of the viewport in pixels
    #[arg(long, default_value_t = 600.0)]
    pub viewport_height: f64,

    /// Scroll offset of the viewport top; defaults to the end of the list
    #[arg(long)]
    pub scroll_top: Option<f64>,

    /// Extra items rendered above and below the viewport
    #[arg(long, default_value_t = 5)]
    pub overscan: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WindowReport {
    total_height: f64,
    scroll_top: f64,
    near_bottom: bool,
    range: VisibleRange,
    items: Vec<VirtualItem>,
}

/// Compute the window and print it as JSON
pub async fn run(args: WindowArgs) -> anyhow::Result<()> {
    super::bootstrap();

    let report = build_report(&args);
    info!(
        "Rendering items {}..{} of {}",
        report.range.start, report.range.end, args.count
    );

    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

fn build_report(args: &WindowArgs) -> WindowReport {
    let layout = VirtualListLayout::fixed(args.count, args.item_height);
    let scroll_top = args
        .scroll_top
        .unwrap_or_else(|| layout.scroll_to_end(args.viewport_height));

    WindowReport {
        total_height: layout.total_height(),
        scroll_top,
        near_bottom: FollowBottom::default().is_near_bottom(
            scroll_top,
            args.viewport_height,
            layout.total_height(),
        ),
        range: layout.visible_range(scroll_top, args.viewport_height, args.overscan),
        items: layout.virtual_items(scroll_top, args.viewport_height, args.overscan),
    }
}
