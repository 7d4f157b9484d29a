//! Loading indicator shown over a chart while a period request is in flight

use meterboard_core::Period;
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use std::time::{Duration, Instant};

/// Animated spinner (Braille patterns)
#[derive(Debug)]
pub struct Spinner {
    frames: &'static [&'static str],
    current_frame: usize,
    last_update: Instant,
    frame_duration: Duration,
    color: Color,
}

impl Default for Spinner {
    fn default() -> Self {
        Self::new()
    }
}

impl Spinner {
    pub fn new() -> Self {
        Self {
            frames: &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"],
            current_frame: 0,
            last_update: Instant::now(),
            frame_duration: Duration::from_millis(80),
            color: Color::Cyan,
        }
    }

    /// Update spinner state (call this on each render)
    pub fn tick(&mut self) {
        let now = Instant::now();
        if now.duration_since(self.last_update) >= self.frame_duration {
            self.current_frame = (self.current_frame + 1) % self.frames.len();
            self.last_update = now;
        }
    }

    pub fn current_frame(&self) -> &'static str {
        self.frames[self.current_frame]
    }

    pub fn render(&self) -> Span<'static> {
        Span::styled(
            self.frames[self.current_frame],
            Style::default().fg(self.color),
        )
    }
}

/// Loading overlay rendered on top of a chart area
#[derive(Debug, Default)]
pub struct LoadingOverlay {
    spinner: Spinner,
}

impl LoadingOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render "Loading {period} data..." centered in the area
    pub fn render(&mut self, frame: &mut Frame, area: Rect, period: Period) {
        self.spinner.tick();

        if area.height < 3 {
            return;
        }

        let message_area = Rect {
            x: area.x,
            y: area.y + area.height / 2,
            width: area.width,
            height: 1,
        };

        let content = Line::from(vec![
            self.spinner.render(),
            Span::raw(format!(" Loading {} data...", period)),
        ]);

        let paragraph = Paragraph::new(content)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray));

        frame.render_widget(paragraph, message_area);
    }
}
