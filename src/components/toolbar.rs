//! Chrome around the table: toolbar, footer, status line and help bar

use crate::model::{InputMode, StatusMessage};
use gridline::engine::{FilterFacet, TableViewModel, TableViewState};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Everything the toolbar needs to render
pub struct ToolbarContext<'a> {
    pub title: &'a str,
    pub state: &'a TableViewState,
    pub facets: &'a [FilterFacet],
    pub input_mode: InputMode,
}

fn key_span(key: &str, color: Color) -> Span<'static> {
    Span::styled(
        format!(" {} ", key),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )
}

/// Label of the active option of each facet, in facet order
pub fn active_filter_labels(facets: &[FilterFacet], state: &TableViewState) -> Vec<String> {
    facets
        .iter()
        .filter_map(|facet| {
            let value = state.active_filters.get(&facet.key)?;
            let option_label = facet
                .options
                .iter()
                .find(|o| &o.value == value)
                .map(|o| o.display_label())
                .unwrap_or_else(|| value.to_display_string());
            let facet_label = if facet.label.is_empty() {
                &facet.key
            } else {
                &facet.label
            };
            Some(format!("{}: {}", facet_label, option_label))
        })
        .collect()
}

pub fn draw_toolbar(
    frame: &mut Frame,
    area: Rect,
    ctx: &ToolbarContext<'_>,
    view: &TableViewModel<'_>,
) {
    let mut spans = Vec::new();

    let searching = ctx.input_mode == InputMode::Search;
    let search_style = if searching {
        Style::default().fg(Color::Black).bg(Color::Cyan)
    } else {
        Style::default().fg(Color::Cyan)
    };
    let cursor = if searching { "▏" } else { "" };
    spans.push(Span::styled(" / ", Style::default().fg(Color::DarkGray)));
    spans.push(Span::styled(
        format!("{}{} ", ctx.state.search_query, cursor),
        search_style,
    ));

    for label in active_filter_labels(ctx.facets, ctx.state) {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            format!(" {} ", label),
            Style::default().fg(Color::Black).bg(Color::Magenta),
        ));
    }

    for action in &view.toolbar_actions {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            format!("[ {} ]", action.label),
            Style::default().fg(Color::Yellow),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", ctx.title))
            .title_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(paragraph, area);
}

pub fn draw_footer(frame: &mut Frame, area: Rect, view: &TableViewModel<'_>) {
    let mut spans = vec![
        Span::styled(
            format!(" {} ", view.row_count_label),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" page {}/{} ", view.page + 1, view.page_count),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!(" {} per page ", view.rows_per_page),
            Style::default().fg(Color::DarkGray),
        ),
    ];

    if view.selection.selected_count > 0 {
        spans.push(Span::styled(
            format!(" {} selected ", view.selection.selected_count),
            Style::default().fg(Color::Green),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans)).alignment(Alignment::Right);
    frame.render_widget(paragraph, area);
}

pub fn draw_status(frame: &mut Frame, area: Rect, status: &StatusMessage) {
    let style = if status.is_error() {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::Yellow)
    };
    let paragraph = Paragraph::new(Line::from(Span::styled(
        format!(" {} ", status.text()),
        style,
    )));
    frame.render_widget(paragraph, area);
}

pub fn draw_help_bar(frame: &mut Frame, area: Rect, input_mode: InputMode, selected: usize) {
    let help_spans = if input_mode == InputMode::Search {
        vec![
            key_span("Esc/Enter", Color::Yellow),
            Span::raw("Done  "),
            key_span("Ctrl+u", Color::Cyan),
            Span::raw("Clear query"),
        ]
    } else if selected > 0 {
        vec![
            key_span("Space", Color::Green),
            Span::raw("Toggle  "),
            key_span("a", Color::Green),
            Span::raw("Page  "),
            key_span("Esc", Color::Yellow),
            Span::raw("Clear  "),
            Span::styled(
                format!("{} selected", selected),
                Style::default().fg(Color::Cyan),
            ),
        ]
    } else {
        vec![
            key_span("q", Color::Yellow),
            Span::raw("Quit "),
            key_span("/", Color::Cyan),
            Span::raw("Search "),
            key_span("s", Color::Cyan),
            Span::raw("Sort "),
            key_span("f", Color::Magenta),
            Span::raw("Filter "),
            key_span("c", Color::Magenta),
            Span::raw("Columns "),
            key_span("h/l", Color::Cyan),
            Span::raw("Page "),
            key_span("e/E", Color::Green),
            Span::raw("Export "),
            key_span("?", Color::White),
            Span::raw("Help"),
        ]
    };

    let paragraph = Paragraph::new(Line::from(help_spans)).alignment(Alignment::Left);
    frame.render_widget(paragraph, area);
}
