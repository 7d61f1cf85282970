//! UI rendering for the preview.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
    Frame,
};

use super::app::App;
use super::debug_log;
use super::help;
use super::transcript;

/// Height of the debug log pane when visible.
const DEBUG_LOG_HEIGHT: u16 = 8;

/// Main render function
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    let log_height = if app.debug_log.visible {
        DEBUG_LOG_HEIGHT
    } else {
        0
    };
    let [header_area, main_area, log_area, status_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(log_height),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(header_area, frame.buffer_mut(), app);

    transcript::render(
        main_area,
        frame.buffer_mut(),
        &mut app.transcript,
        &app.ctx,
        &app.platform,
    );

    if app.debug_log.visible {
        debug_log::render(log_area, frame.buffer_mut(), &app.debug_log);
    }

    render_status(status_area, frame.buffer_mut(), app);

    if let Some(url) = &app.share_url {
        render_share_popup(frame, url.as_str(), &app.ctx.localization.common_share);
    }

    if app.show_help {
        help::render_help_popup(frame);
    }
}

fn render_header(area: Rect, buf: &mut Buffer, app: &App) {
    let title = " Chat Cells";
    let counter = format!(
        " {}/{} ",
        (app.transcript.selected + 1).min(app.transcript.messages().len()),
        app.transcript.messages().len()
    );
    let help = " [?] Help ";

    let used = title.len() + counter.len() + help.len();
    let padding = (area.width as usize).saturating_sub(used);

    let line = Line::from(vec![
        Span::styled(
            title,
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" ".repeat(padding)),
        Span::styled(counter, Style::default().fg(Color::Cyan)),
        Span::styled(help, Style::default().fg(Color::Gray)),
    ]);

    Paragraph::new(line)
        .style(Style::default().bg(Color::DarkGray))
        .render(area, buf);
}

fn render_status(area: Rect, buf: &mut Buffer, app: &App) {
    if let Some(msg) = &app.status {
        let style = if app.status_is_error {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::Green)
        };
        Paragraph::new(Line::from(Span::styled(format!(" {} ", msg), style)))
            .style(Style::default().bg(Color::DarkGray))
            .render(area, buf);
        return;
    }

    let sep_style = Style::default().fg(Color::DarkGray);
    let hint_style = Style::default().fg(Color::Gray);
    let kind = app
        .transcript
        .selected_message()
        .map(|m| {
            if m.is_multi_attachment() {
                "multiAttachment"
            } else {
                m.types.first().map_or("empty", |item| item.tag())
            }
        })
        .unwrap_or("empty");

    let line = Line::from(vec![
        Span::styled(format!(" {} ", kind), Style::default().fg(Color::Yellow)),
        Span::styled("| ", sep_style),
        Span::styled("Enter: activate", hint_style),
        Span::styled(" | ", sep_style),
        Span::styled("Left/Right: option", hint_style),
        Span::styled(" | ", sep_style),
        Span::styled("d: log", hint_style),
    ]);

    Paragraph::new(line)
        .style(Style::default().bg(Color::DarkGray))
        .render(area, buf);
}

/// Shared link shown for the user to pick up; closed with Esc or Enter.
fn render_share_popup(frame: &mut Frame, url: &str, title: &str) {
    let area = frame.area();
    let width = (url.len() as u16 + 4)
        .max(30)
        .min(area.width.saturating_sub(2));
    let popup = help::centered_rect(width, 5, area);

    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            format!(" {} ", title),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ))
        .title_bottom(Line::from(Span::styled(
            " Esc to close ",
            Style::default().fg(Color::Gray),
        )));

    let text = Paragraph::new(Line::from(Span::styled(
        url.to_string(),
        Style::default().fg(Color::White).add_modifier(Modifier::UNDERLINED),
    )))
    .wrap(Wrap { trim: false })
    .block(block);

    frame.render_widget(text, popup);
}
