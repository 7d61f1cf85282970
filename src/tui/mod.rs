//! Terminal front end: cell painting, the interactive preview and plain-text
//! output.

mod activate;
mod app;
mod cells;
mod debug_log;
mod help;
pub mod log_capture;
mod platform;
mod transcript;
mod ui;

pub use app::run;
pub use cells::CellPainter;
pub use platform::{PlatformNotice, TerminalPlatform};
pub use transcript::TranscriptState;

use std::io::{self, Write};

use anyhow::{Context, Result};

use crate::config::RenderContext;
use crate::dispatch::{MessageRenderDispatcher, PlatformServices};
use crate::models::{group_positions, ChatMessage};

/// Paint a transcript to plain text lines, one cell after another.
pub fn render_plain(
    messages: &[ChatMessage],
    ctx: &RenderContext,
    platform: &dyn PlatformServices,
    width: usize,
) -> Vec<String> {
    let dispatcher = MessageRenderDispatcher::new(platform);
    let mut out = Vec::new();

    for (message, position) in messages.iter().zip(group_positions(messages)) {
        let mut painter = CellPainter::new(ctx, width);
        dispatcher.render(&mut painter, message, position, &mut |_, _| {});
        out.extend(painter.into_lines().iter().map(|line| {
            let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
            text.trim_end().to_string()
        }));
        if position.ends_group() {
            out.push(String::new());
        }
    }

    out
}

/// Print a painted transcript to stdout.
pub fn print_transcript(
    messages: &[ChatMessage],
    ctx: &RenderContext,
    platform: &dyn PlatformServices,
    width: usize,
) -> Result<()> {
    let mut stdout = io::stdout().lock();
    for line in render_plain(messages, ctx, platform, width) {
        writeln!(stdout, "{}", line).context("Failed to write to stdout")?;
    }
    Ok(())
}
