//! Help popup overlay: preview key bindings by category.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

const POPUP_WIDTH: u16 = 72;
const POPUP_HEIGHT: u16 = 16;

struct Shortcut {
    key: &'static str,
    desc: &'static str,
}

struct Category {
    title: &'static str,
    shortcuts: &'static [Shortcut],
}

const NAVIGATION: Category = Category {
    title: "NAVIGATION",
    shortcuts: &[
        Shortcut {
            key: "Up/k",
            desc: "Previous message",
        },
        Shortcut {
            key: "Down/j",
            desc: "Next message",
        },
        Shortcut {
            key: "Left/h",
            desc: "Previous option",
        },
        Shortcut {
            key: "Right/l",
            desc: "Next option",
        },
    ],
};

const CELLS: Category = Category {
    title: "CELLS",
    shortcuts: &[
        Shortcut {
            key: "Enter",
            desc: "Activate option",
        },
        Shortcut {
            key: "",
            desc: "(no options: toggle date)",
        },
    ],
};

const MISC: Category = Category {
    title: "MISC",
    shortcuts: &[
        Shortcut {
            key: "d",
            desc: "Toggle debug log",
        },
        Shortcut {
            key: "PgUp/PgDn",
            desc: "Scroll debug log",
        },
        Shortcut {
            key: "Esc",
            desc: "Close popup",
        },
        Shortcut {
            key: "?",
            desc: "Toggle this help",
        },
        Shortcut {
            key: "q",
            desc: "Quit",
        },
    ],
};

/// Render the help popup centered on screen.
pub fn render_help_popup(frame: &mut Frame) {
    let area = frame.area();

    let popup_w = POPUP_WIDTH.min(area.width.saturating_sub(2));
    let popup_h = POPUP_HEIGHT.min(area.height.saturating_sub(2));
    let popup_area = centered_rect(popup_w, popup_h, area);

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Line::from(vec![
            Span::styled(
                " HELP ",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::styled("(? to close) ", Style::default().fg(Color::Gray)),
        ]));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let [left_col, right_col] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(inner);

    frame.render_widget(
        Paragraph::new(build_column_lines(&[&NAVIGATION, &CELLS])),
        inset(left_col, 1, 1),
    );
    frame.render_widget(
        Paragraph::new(build_column_lines(&[&MISC])),
        inset(right_col, 1, 1),
    );
}

fn build_column_lines<'a>(categories: &[&Category]) -> Vec<Line<'a>> {
    let mut lines: Vec<Line<'a>> = Vec::new();

    for (cat_idx, cat) in categories.iter().enumerate() {
        if cat_idx > 0 {
            lines.push(Line::from(""));
        }

        lines.push(Line::from(Span::styled(
            cat.title,
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(
            "\u{2500}".repeat(30),
            Style::default().fg(Color::DarkGray),
        )));

        for sc in cat.shortcuts {
            lines.push(Line::from(vec![
                Span::styled(format!("{:<11}", sc.key), Style::default().fg(Color::Yellow)),
                Span::styled(sc.desc, Style::default().fg(Color::Gray)),
            ]));
        }
    }

    lines
}

/// Return a centered sub-rect of the given size within `area`.
pub(super) fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

/// Inset a rect by the given horizontal and vertical margins.
fn inset(area: Rect, h: u16, v: u16) -> Rect {
    Rect::new(
        area.x + h,
        area.y + v,
        area.width.saturating_sub(h * 2),
        area.height.saturating_sub(v * 2),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn test_centered_rect() {
        let area = Rect::new(0, 0, 100, 40);
        assert_eq!(centered_rect(20, 10, area), Rect::new(40, 15, 20, 10));
        // Larger than the area: clamped.
        assert_eq!(centered_rect(200, 80, area), Rect::new(0, 0, 100, 40));
    }

    #[test]
    fn test_popup_lists_bindings() {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(render_help_popup).unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("HELP"));
        assert!(text.contains("Activate option"));
        assert!(text.contains("Toggle debug log"));
    }
}
