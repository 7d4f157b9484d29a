//! TUI application state and key handling

use crate::chart_panel;
use crate::components::{LoadingOverlay, render_toasts};
use crate::engine::TuiRenderEngine;
use meterboard_core::{
    ChartEvent, Notification, NotificationCenter, Period, UsagePeriodController,
};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::warn;

/// TUI application state for one usage chart with period toggles
pub struct App {
    pub controller: Arc<UsagePeriodController>,
    pub engine: Arc<TuiRenderEngine>,
    pub notifications: Arc<NotificationCenter>,
    pub chart_id: String,
    pub meter_id: String,
    pub active_period: Period,
    pub should_quit: bool,
    event_rx: broadcast::Receiver<ChartEvent>,
    loading_period: Option<Period>,
    overlay: LoadingOverlay,
}

impl App {
    pub fn new(
        controller: Arc<UsagePeriodController>,
        engine: Arc<TuiRenderEngine>,
        notifications: Arc<NotificationCenter>,
        chart_id: impl Into<String>,
        meter_id: impl Into<String>,
    ) -> Self {
        let event_rx = controller.event_bus().subscribe();

        Self {
            controller,
            engine,
            notifications,
            chart_id: chart_id.into(),
            meter_id: meter_id.into(),
            active_period: Period::Day,
            should_quit: false,
            event_rx,
            loading_period: None,
            overlay: LoadingOverlay::new(),
        }
    }

    /// Handle keyboard input; returns true if the key was handled
    pub fn handle_key(&mut self, key: crossterm::event::KeyCode) -> bool {
        use crossterm::event::KeyCode;

        match key {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
                true
            }
            KeyCode::Char('d') => {
                self.select_period(Period::Day);
                true
            }
            KeyCode::Char('w') => {
                self.select_period(Period::Week);
                true
            }
            KeyCode::Char('m') => {
                self.select_period(Period::Month);
                true
            }
            _ => false,
        }
    }

    /// Mark the period active and spawn the data request
    fn select_period(&mut self, period: Period) {
        self.active_period = period;

        let controller = self.controller.clone();
        let chart_id = self.chart_id.clone();
        let meter_id = self.meter_id.clone();
        tokio::spawn(async move {
            // Errors surface via the event bus; superseded results are fine
            if let Err(e) = controller.select_period(&chart_id, &meter_id, period).await {
                warn!(chart_id = %chart_id, period = %period, error = %e, "Period switch failed");
            }
        });
    }

    /// Check for chart events (non-blocking)
    pub fn poll_events(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            match event {
                ChartEvent::LoadingStarted { chart_id, period } => {
                    if chart_id == self.chart_id {
                        self.loading_period = Some(period);
                    }
                }
                ChartEvent::ChartUpdated { chart_id, .. }
                | ChartEvent::StaleResultDiscarded { chart_id, .. } => {
                    if chart_id == self.chart_id && !self.controller.is_loading(&self.chart_id) {
                        self.loading_period = None;
                    }
                }
                ChartEvent::LoadFailed { chart_id, message } => {
                    if chart_id == self.chart_id && !self.controller.is_loading(&self.chart_id) {
                        self.loading_period = None;
                    }
                    self.notifications.push(Notification::error(message));
                }
                ChartEvent::SetupCompleted { failed, .. } => {
                    if failed > 0 {
                        self.notifications.push(Notification::warning(format!(
                            "{} chart(s) failed to initialize",
                            failed
                        )));
                    }
                }
            }
        }
    }

    /// Render the full dashboard frame
    pub fn render(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Period selector
                Constraint::Min(10),   // Chart
                Constraint::Length(1), // Status line
            ])
            .split(frame.area());

        self.render_period_bar(frame, chunks[0]);
        self.render_chart_area(frame, chunks[1]);
        self.render_status(frame, chunks[2]);

        render_toasts(frame, frame.area(), &self.notifications);
    }

    fn render_period_bar(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![Span::raw(" ")];
        for period in Period::all() {
            let style = if *period == self.active_period {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            spans.push(Span::styled(
                format!(" [{}] {} ", &period.name()[..1], period.name()),
                style,
            ));
            spans.push(Span::raw(" "));
        }

        let bar = Paragraph::new(Line::from(spans))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!("meterboard - {}", self.meter_id)),
            )
            .alignment(Alignment::Left);
        frame.render_widget(bar, area);
    }

    fn render_chart_area(&mut self, frame: &mut Frame, area: Rect) {
        match self.engine.chart(&self.chart_id) {
            Some(state) => {
                chart_panel::render_chart(
                    frame,
                    area,
                    &state,
                    self.controller.registry().options(),
                );
            }
            None => {
                let empty = Paragraph::new("No chart surface")
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(Color::DarkGray));
                frame.render_widget(empty, area);
            }
        }

        if self.controller.is_loading(&self.chart_id) {
            let period = self.loading_period.unwrap_or(self.active_period);
            self.overlay.render(frame, area, period);
        }
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let status = Paragraph::new(" d/w/m: switch period | q: quit")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(status, area);
    }
}
