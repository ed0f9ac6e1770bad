//! Layout calculations for the UI

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Main screen layout areas
pub struct MainLayout {
    /// Title, toolbar actions, search box and active filters
    pub toolbar: Rect,
    pub table: Rect,
    /// Row count label, page position and rows-per-page
    pub footer: Rect,
    pub status: Option<Rect>,
    pub help: Rect,
}

/// Calculate centered popup area
pub fn centered_popup(area: Rect, width: u16, height: u16) -> Rect {
    let popup_x = area.x + (area.width.saturating_sub(width)) / 2;
    let popup_y = area.y + (area.height.saturating_sub(height)) / 2;

    Rect::new(
        popup_x,
        popup_y,
        width.min(area.width),
        height.min(area.height),
    )
}

pub fn calculate_main_layout(area: Rect, has_status: bool) -> MainLayout {
    let mut constraints = vec![
        Constraint::Length(3),
        Constraint::Min(0),
        Constraint::Length(1),
    ];
    if has_status {
        constraints.push(Constraint::Length(1));
    }
    constraints.push(Constraint::Length(1));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    let (status, help) = if has_status {
        (Some(chunks[3]), chunks[4])
    } else {
        (None, chunks[3])
    };

    MainLayout {
        toolbar: chunks[0],
        table: chunks[1],
        footer: chunks[2],
        status,
        help,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_popup_clamps_to_area() {
        let area = Rect::new(0, 0, 30, 10);
        let popup = centered_popup(area, 50, 6);
        assert_eq!(popup, Rect::new(0, 2, 30, 6));
    }

    #[test]
    fn test_main_layout_with_status() {
        let layout = calculate_main_layout(Rect::new(0, 0, 80, 24), true);
        assert_eq!(layout.toolbar.height, 3);
        assert_eq!(layout.footer.height, 1);
        assert!(layout.status.is_some());
        assert_eq!(layout.help.y, 23);
        assert_eq!(layout.table.height, 24 - 3 - 1 - 1 - 1);
    }
}
