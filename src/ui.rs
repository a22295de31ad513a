//! UI rendering for the single screen.
//!
//! Everything here is a pure function of the `App` view-model; no playback
//! state is read from anywhere else.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};

use crate::app::App;
use crate::config::{ControlsSettings, UiSettings};
use crate::player::format_mmss;

/// Render the controls help text, incorporating the configured seek step.
fn controls_text(seek_seconds: u64) -> String {
    format!(
        "[j/k] up/down | [enter] play selected | [space/p] play/pause | [h/l] prev/next | [H/L] seek -/+{}s | [g/G] top/bottom | [q] quit",
        seek_seconds
    )
}

/// Render the entire UI into the provided `frame` using `app` state.
pub fn draw(
    frame: &mut Frame,
    app: &App,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(6),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" vivace ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    // Now playing box: song line, time line, error line, progress gauge.
    {
        let block = Block::bordered()
            .padding(Padding {
                left: 1,
                right: 1,
                top: 0,
                bottom: 0,
            })
            .title(" now playing ");
        let inner = block.inner(chunks[1]);
        frame.render_widget(block, chunks[1]);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Length(1)])
            .split(inner);

        let song_line = match &app.now_title {
            Some(title) => format!("Song: {title}"),
            None => "Nothing playing".to_string(),
        };
        let state_text = if app.playing { "Playing" } else { "Paused" };
        let time_line = match app.total {
            Some(total) => format!(
                "{} / {}  [{}]",
                app.position_text,
                format_mmss(total),
                state_text
            ),
            None => format!("{}  [{}]", app.position_text, state_text),
        };

        let mut lines = vec![Line::raw(song_line), Line::raw(time_line)];
        if let Some((message, _)) = &app.status {
            lines.push(Line::styled(
                message.clone(),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ));
        }
        let info = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(info, rows[0]);

        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(Color::Cyan))
            .ratio(app.progress_ratio());
        frame.render_widget(gauge, rows[1]);
    }

    // Track list with a visible window centered on the cursor.
    // Only build ListItems for the visible window (avoid allocating the
    // entire list).
    {
        let total = app.titles.len();
        let list_height = chunks[2].height.saturating_sub(2) as usize;
        let sel_pos = app.selected.min(total.saturating_sub(1));
        let (start, end, selected_pos_in_visible) = if total <= list_height || list_height == 0 {
            (0, total, sel_pos)
        } else {
            let half = list_height / 2;
            let mut start = if sel_pos > half { sel_pos - half } else { 0 };
            if start + list_height > total {
                start = total - list_height;
            }
            (start, start + list_height, sel_pos - start)
        };

        let visible_items: Vec<ListItem> = app.titles[start..end]
            .iter()
            .enumerate()
            .map(|(offset, title)| {
                let index = start + offset;
                if app.now_playing == Some(index) {
                    let marker = if app.playing { "▶ " } else { "⏸ " };
                    ListItem::new(Line::styled(
                        format!("{marker}{title}"),
                        Style::default().add_modifier(Modifier::BOLD),
                    ))
                } else {
                    ListItem::new(Line::raw(format!("  {title}")))
                }
            })
            .collect();

        let list = List::new(visible_items)
            .block(Block::default().borders(Borders::ALL).title(" tracks "))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ListState::default();
        if total > 0 {
            state.select(Some(selected_pos_in_visible));
        }
        frame.render_stateful_widget(list, chunks[2], &mut state);
    }

    // Footer
    let footer = Paragraph::new(controls_text(controls_settings.seek_seconds))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[3]);
}
