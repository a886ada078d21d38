use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthChar;

use crate::core::constants::INDICATOR_SPACE;
use crate::core::message::{Message, TranscriptRole};

pub const TITLE: &str = "Banking ChatBot";
const SUBTITLE: &str = "Ask me about your banking queries (loans, credit cards, balance, etc.)";
const WAITING_TEXT: &str = "Assistant is typing...";

/// What the renderer needs besides the transcript.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub input: String,
    pub scroll_offset: u16,
    pub auto_scroll: bool,
    pub waiting: bool,
}

fn role_styles(role: TranscriptRole) -> (Style, Style) {
    match role {
        TranscriptRole::User => (
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            Style::default().fg(Color::Cyan),
        ),
        TranscriptRole::Assistant => (
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
            Style::default().fg(Color::White),
        ),
    }
}

/// Lay out the whole transcript, oldest first, one labelled block per entry.
pub fn build_display_lines(transcript: &[Message], waiting: bool) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(
            SUBTITLE,
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
    ];

    for msg in transcript {
        let (label_style, text_style) = role_styles(msg.role);
        let mut content_lines = msg.content.lines();
        let first = content_lines.next().unwrap_or_default();
        lines.push(Line::from(vec![
            Span::styled(format!("{}: ", msg.role.display_label()), label_style),
            Span::styled(first.to_string(), text_style),
        ]));
        for rest in content_lines {
            lines.push(Line::from(Span::styled(rest.to_string(), text_style)));
        }
        lines.push(Line::from(""));
    }

    if waiting {
        lines.push(Line::from(Span::styled(
            WAITING_TEXT,
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )));
    }

    lines
}

/// Rows the lines occupy once wrapped to `width` columns.
pub fn wrapped_height(lines: &[Line], width: u16) -> usize {
    let width = usize::from(width.max(1));
    lines
        .iter()
        .map(|line| line.width().div_ceil(width).max(1))
        .sum()
}

/// Longest suffix of `input` that fits in `max_width` columns.
pub fn visible_input_tail(input: &str, max_width: usize) -> &str {
    let mut used = 0;
    let mut start = input.len();
    for (index, ch) in input.char_indices().rev() {
        let ch_width = ch.width().unwrap_or(0);
        if used + ch_width > max_width {
            break;
        }
        used += ch_width;
        start = index;
    }
    &input[start..]
}

/// Draw one frame. Returns the largest valid scroll offset for the chat area
/// so the caller can clamp keyboard scrolling.
pub fn ui(f: &mut Frame, view: &ViewState, transcript: &[Message]) -> u16 {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(f.area());

    let lines = build_display_lines(transcript, view.waiting);

    // One row goes to the title
    let available_height = chunks[0].height.saturating_sub(1);
    let total_rows = wrapped_height(&lines, chunks[0].width);
    let max_offset =
        u16::try_from(total_rows.saturating_sub(usize::from(available_height))).unwrap_or(u16::MAX);
    let scroll_offset = if view.auto_scroll {
        max_offset
    } else {
        view.scroll_offset.min(max_offset)
    };

    let messages = Paragraph::new(lines)
        .block(Block::default().title(TITLE))
        .wrap(Wrap { trim: false })
        .scroll((scroll_offset, 0));
    f.render_widget(messages, chunks[0]);

    let (input_title, input_style) = if view.waiting {
        ("Waiting for the reply...", Style::default().fg(Color::DarkGray))
    } else {
        (
            "Type your message (Enter to send, Ctrl+C to quit)",
            Style::default().fg(Color::Yellow),
        )
    };

    let inner_width = usize::from(chunks[1].width.saturating_sub(INDICATOR_SPACE));
    let shown = visible_input_tail(&view.input, inner_width);
    let input = Paragraph::new(shown.to_string())
        .style(input_style)
        .block(Block::default().borders(Borders::ALL).title(input_title));
    f.render_widget(input, chunks[1]);

    if !view.waiting {
        let cursor_x = u16::try_from(Line::from(shown).width()).unwrap_or(u16::MAX);
        f.set_cursor_position((
            chunks[1].x.saturating_add(1).saturating_add(cursor_x),
            chunks[1].y + 1,
        ));
    }

    max_offset
}
