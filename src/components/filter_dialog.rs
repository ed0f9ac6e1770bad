//! Facet filter dialog component
//!
//! Lists every facet with an "any" entry followed by its options. Choosing
//! an option applies it; choosing the active option or "any" clears the
//! facet.

use crate::action::Action;
use crate::component::Component;
use crate::components::centered_popup;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use gridline::engine::{ActiveFilters, FilterFacet, Value};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

#[derive(Debug, Clone, PartialEq)]
struct FilterEntry {
    key: String,
    /// `None` is the facet's "any" entry
    value: Option<Value>,
    label: String,
    active: bool,
}

pub struct FilterDialog {
    entries: Vec<FilterEntry>,
    pub selected_index: usize,
    list_state: ListState,
    active_count: usize,
}

impl Default for FilterDialog {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterDialog {
    pub fn new() -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self {
            entries: Vec::new(),
            selected_index: 0,
            list_state,
            active_count: 0,
        }
    }

    /// Rebuild entries from the facets and the current selections, keeping
    /// the cursor where it was when possible.
    pub fn set_facets(&mut self, facets: &[FilterFacet], active: &ActiveFilters) {
        self.entries.clear();
        for facet in facets {
            let label = if facet.label.is_empty() {
                facet.key.clone()
            } else {
                facet.label.clone()
            };
            let current = active.get(&facet.key);

            self.entries.push(FilterEntry {
                key: facet.key.clone(),
                value: None,
                label: format!("{}: any", label),
                active: current.is_none(),
            });
            for option in &facet.options {
                self.entries.push(FilterEntry {
                    key: facet.key.clone(),
                    value: Some(option.value.clone()),
                    label: format!("  {}", option.display_label()),
                    active: current == Some(&option.value),
                });
            }
        }
        self.active_count = active.len();

        if self.selected_index >= self.entries.len() {
            self.selected_index = self.entries.len().saturating_sub(1);
        }
        self.list_state.select(Some(self.selected_index));
    }

    fn selected_action(&self) -> Option<Action> {
        let entry = self.entries.get(self.selected_index)?;
        match &entry.value {
            Some(value) if !entry.active => Some(Action::SetFilter(entry.key.clone(), value.clone())),
            _ => Some(Action::ClearFilter(entry.key.clone())),
        }
    }

    fn select_next(&mut self) {
        if self.selected_index + 1 < self.entries.len() {
            self.selected_index += 1;
            self.list_state.select(Some(self.selected_index));
        }
    }

    fn select_prev(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
            self.list_state.select(Some(self.selected_index));
        }
    }
}

impl Component for FilterDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Char('f') | KeyCode::Char('q') => Some(Action::CloseModal),
            KeyCode::Enter | KeyCode::Char(' ') => self.selected_action(),
            KeyCode::Char('F') => Some(Action::ClearAllFilters),
            KeyCode::Up | KeyCode::Char('k') => {
                self.select_prev();
                Some(Action::ModalUp)
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.select_next();
                Some(Action::ModalDown)
            }
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let popup_width = 50u16.min(area.width.saturating_sub(4));
        let content_height = if self.entries.is_empty() {
            4
        } else {
            self.entries.len() as u16 + 2
        };
        let popup_height = (content_height + 6).min(area.height.saturating_sub(4)).max(10);
        let popup_area = centered_popup(area, popup_width, popup_height);

        frame.render_widget(Clear, popup_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(3),
                Constraint::Length(3),
            ])
            .split(popup_area);

        let header_text = match self.active_count {
            0 => "No filter active".to_string(),
            n => format!("{} filter(s) active", n),
        };
        let header = Paragraph::new(Line::from(Span::styled(
            header_text,
            Style::default().fg(Color::Cyan),
        )))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Filters ")
                .title_style(
                    Style::default()
                        .fg(Color::Magenta)
                        .add_modifier(Modifier::BOLD),
                ),
        );
        frame.render_widget(header, chunks[0]);

        if self.entries.is_empty() {
            let empty = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    "This table declares no filters",
                    Style::default().fg(Color::Yellow),
                )),
            ])
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray)),
            );
            frame.render_widget(empty, chunks[1]);
        } else {
            let items: Vec<ListItem> = self
                .entries
                .iter()
                .map(|entry| {
                    let style = if entry.value.is_none() {
                        Style::default().fg(Color::Yellow)
                    } else if entry.active {
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(Color::White)
                    };
                    ListItem::new(Line::from(vec![
                        Span::styled(
                            if entry.active { "● " } else { "  " },
                            Style::default().fg(Color::Green),
                        ),
                        Span::styled(entry.label.clone(), style),
                    ]))
                })
                .collect();

            let list = List::new(items)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Color::DarkGray)),
                )
                .highlight_style(
                    Style::default()
                        .bg(Color::Blue)
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                )
                .highlight_symbol("▶ ");

            frame.render_stateful_widget(list, chunks[1], &mut self.list_state);
        }

        let help = Paragraph::new(Line::from(vec![
            Span::styled(" Enter ", Style::default().fg(Color::Yellow)),
            Span::raw("Apply  "),
            Span::styled(" F ", Style::default().fg(Color::Yellow)),
            Span::raw("Clear all  "),
            Span::styled(" Esc ", Style::default().fg(Color::Yellow)),
            Span::raw("Close"),
        ]))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, chunks[2]);

        Ok(())
    }
}
