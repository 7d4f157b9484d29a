//! Toast rendering for the shared notification center

use meterboard_core::{Notification, NotificationCenter, Severity};
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

/// Severity to border/icon color
pub fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Success => Color::Green,
        Severity::Warning => Color::Yellow,
        Severity::Error => Color::Red,
        Severity::Info => Color::Cyan,
    }
}

/// Severity icon
pub fn severity_icon(severity: Severity) -> &'static str {
    match severity {
        Severity::Success => "✓",
        Severity::Warning => "⚠",
        Severity::Error => "✗",
        Severity::Info => "ℹ",
    }
}

/// Render active notifications stacked from the bottom up (max 5 visible)
pub fn render_toasts(frame: &mut Frame, area: Rect, center: &NotificationCenter) {
    let active = center.active();
    if active.is_empty() {
        return;
    }

    let max_visible = 5;
    let visible: Vec<_> = active.iter().rev().take(max_visible).rev().collect();

    let toast_height: u16 = 3;
    let mut y_offset = area
        .height
        .saturating_sub((visible.len() as u16 * toast_height) + 2);

    for toast in visible {
        let toast_width = (toast.message.len() + 6).min(area.width as usize) as u16;
        let x_offset = (area.width.saturating_sub(toast_width)) / 2;

        let toast_area = Rect {
            x: area.x + x_offset,
            y: area.y + y_offset,
            width: toast_width,
            height: toast_height,
        };

        render_single_toast(frame, toast_area, toast);

        y_offset += toast_height;
    }
}

fn render_single_toast(frame: &mut Frame, area: Rect, toast: &Notification) {
    let color = severity_color(toast.severity);
    let icon = severity_icon(toast.severity);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let content = Line::from(vec![
        Span::styled(
            format!("{} ", icon),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::styled(&toast.message, Style::default().fg(Color::White)),
    ]);

    let paragraph = Paragraph::new(content).alignment(Alignment::Center);
    frame.render_widget(paragraph, inner);
}
