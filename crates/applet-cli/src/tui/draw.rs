use super::*;

const MENU_WIDTH: u16 = 28;

impl TuiApp {
    pub(in crate::tui) fn draw(&mut self, frame: &mut ratatui::Frame) {
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(LOG_PANEL_HEIGHT),
                Constraint::Length(3),
            ])
            .split(frame.size());

        let header = Paragraph::new(self.header_text())
            .block(Block::default().borders(Borders::ALL).title("Sync Applet"));
        frame.render_widget(header, layout[0]);

        match self.view {
            View::Tree => self.draw_tree(frame, layout[1]),
            View::Download => self.draw_download(frame, layout[1]),
            View::CloneTasks => self.draw_clone_tasks(frame, layout[1]),
            View::Details => self.draw_details(frame, layout[1]),
            View::Message => self.draw_message(frame, layout[1]),
        }

        self.draw_log_panel(frame, layout[2]);

        let footer = Paragraph::new(self.footer_text())
            .block(Block::default().borders(Borders::ALL).title("Help"));
        frame.render_widget(footer, layout[3]);
    }

    pub(in crate::tui) fn header_text(&self) -> String {
        let daemon = if self.client.is_connected() {
            "connected"
        } else {
            "offline"
        };
        let auto_sync = if self.client.settings().auto_sync {
            "on"
        } else {
            "off"
        };
        let account = self
            .account
            .as_ref()
            .map(|account| format!("{} @ {}", account.username, account.server_url))
            .unwrap_or_else(|| "no account".to_string());
        let mut text = format!("Daemon: {daemon} | Auto sync: {auto_sync} | {account}");
        if !self.status.is_empty() {
            text.push_str(" | ");
            text.push_str(&self.status);
        }
        text
    }

    pub(in crate::tui) fn footer_text(&self) -> String {
        match self.view {
            View::Tree if self.tree.context_menu().is_some() => {
                "Up/Down: choose | Enter: run | Esc: close".to_string()
            }
            View::Tree => "Up/Down: navigate | Enter: expand | m: menu | t: tip | d/o/w/i: actions | c: downloads | a: auto sync | r: refresh | q: quit"
                .to_string(),
            View::Download => "Tab: next field | Enter: download | Esc: cancel".to_string(),
            View::CloneTasks => {
                "Up/Down: navigate | x: cancel | Del/D: remove | r: refresh | Esc: back".to_string()
            }
            View::Details | View::Message => "Enter/Esc: back".to_string(),
        }
    }

    fn draw_tree(&mut self, frame: &mut ratatui::Frame, area: Rect) {
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        let mut toolbar = Vec::new();
        for kind in self.tree.toolbar_actions() {
            let style = if self.tree.actions().is_enabled(kind) {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            toolbar.push(Span::styled(
                format!("[{}] {}", kind.key_hint(), self.tree.actions().label(kind)),
                style,
            ));
            toolbar.push(Span::raw("  "));
        }
        let toolbar = Paragraph::new(Line::from(toolbar))
            .block(Block::default().borders(Borders::ALL).title("Actions"));
        frame.render_widget(toolbar, layout[0]);

        let tree_area = layout[1];
        let rows = self.tree.model().rows();
        let height = tree_area.height.saturating_sub(2) as usize;
        let selected = self.tree.selected_row();
        self.tree_scroll = adjust_scroll(
            selected.unwrap_or(self.tree_scroll),
            self.tree_scroll,
            height,
            rows.len(),
        );
        self.tree_area = tree_area;

        let width = tree_area.width.saturating_sub(2) as usize;
        let end = (self.tree_scroll + height).min(rows.len());
        let mut items = Vec::new();
        for (offset, index) in rows[self.tree_scroll..end].iter().enumerate() {
            let text = match self.tree.model().item(*index) {
                Some(TreeItem::Category(category)) => format!(
                    "{} {} ({})",
                    if category.expanded { "▾" } else { "▸" },
                    category.name(),
                    category.repos.len()
                ),
                Some(TreeItem::Repo(item)) => format!("    {}", self.tree.delegate().row_text(item)),
                None => continue,
            };
            let mut line = Line::from(Span::raw(truncate_with_ellipsis(&text, width)));
            if selected == Some(self.tree_scroll + offset) {
                line = line.style(Style::default().add_modifier(Modifier::REVERSED));
            }
            items.push(ListItem::new(line));
        }
        if rows.is_empty() {
            let hint = if self.client.is_connected() {
                "No libraries yet."
            } else {
                "Daemon is not running."
            };
            items.push(ListItem::new(Line::from(Span::raw(hint))));
        }
        let list = List::new(items).block(Block::default().borders(Borders::ALL).title("Libraries"));
        frame.render_widget(list, tree_area);

        if let Some(menu) = self.tree.context_menu() {
            let lines: Vec<Line> = menu
                .entries
                .iter()
                .enumerate()
                .map(|(idx, kind)| {
                    let text = format!(" {} ", self.tree.actions().label(*kind));
                    if idx == menu.selected {
                        Line::from(Span::styled(
                            text,
                            Style::default().add_modifier(Modifier::REVERSED),
                        ))
                    } else {
                        Line::from(Span::raw(text))
                    }
                })
                .collect();
            let popup = self.context_menu_rect(frame.size(), menu);
            frame.render_widget(Clear, popup);
            frame.render_widget(
                Paragraph::new(lines).block(Block::default().borders(Borders::ALL)),
                popup,
            );
        } else if let Some(tooltip) = self.tree.tooltip() {
            let longest = tooltip
                .lines
                .iter()
                .map(|line| line.chars().count())
                .max()
                .unwrap_or(0);
            let width = u16::try_from(longest + 2).unwrap_or(u16::MAX);
            let popup = self.popup_rect(frame.size(), tooltip.row + 1, None, width, tooltip.lines.len());
            let lines: Vec<Line> = tooltip
                .lines
                .iter()
                .map(|line| Line::from(Span::raw(line.as_str())))
                .collect();
            frame.render_widget(Clear, popup);
            frame.render_widget(
                Paragraph::new(lines)
                    .style(Style::default().fg(Color::Yellow))
                    .block(Block::default().borders(Borders::ALL)),
                popup,
            );
        }
    }

    /// Where the context menu is drawn: at the clicked cell, or indented
    /// under the row when opened from the keyboard.
    pub(in crate::tui) fn context_menu_rect(&self, bounds: Rect, menu: &ContextMenu) -> Rect {
        self.popup_rect(bounds, menu.row, menu.column, MENU_WIDTH, menu.entries.len())
    }

    /// A bordered box anchored at `row`, kept inside `bounds`.
    fn popup_rect(
        &self,
        bounds: Rect,
        row: usize,
        column: Option<u16>,
        width: u16,
        lines: usize,
    ) -> Rect {
        let height = u16::try_from(lines + 2).unwrap_or(u16::MAX).min(bounds.height);
        let width = width.max(4).min(bounds.width);
        let visible = row.saturating_sub(self.tree_scroll);
        let y = self
            .tree_area
            .y
            .saturating_add(1)
            .saturating_add(u16::try_from(visible).unwrap_or(u16::MAX));
        let x = column.unwrap_or_else(|| self.tree_area.x.saturating_add(4));
        Rect {
            x: x.min(bounds.right().saturating_sub(width)),
            y: y.min(bounds.bottom().saturating_sub(height)),
            width,
            height,
        }
    }

    fn draw_download(&mut self, frame: &mut ratatui::Frame, area: Rect) {
        let Some(dialog) = self.download.as_ref() else {
            return;
        };
        let mut lines = vec![
            Line::from(Span::raw(format!("Library: {}", dialog.repo.name))),
            Line::from(Span::raw(format!(
                "The library is stored in a new folder named \"{}\" under the parent folder.",
                folder_name(&dialog.repo.name)
            ))),
            Line::from(Span::raw("")),
        ];
        for (idx, field) in dialog.fields.iter().enumerate() {
            let marker = if idx == dialog.index { ">" } else { " " };
            let text = format!("{marker} {}: {}", field.label, field.display_value());
            let style = if idx == dialog.index {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            lines.push(Line::from(Span::styled(text, style)));
        }
        if let Some(error) = dialog.error.as_deref() {
            lines.push(Line::from(Span::raw("")));
            lines.push(Line::from(Span::styled(
                error.to_string(),
                Style::default().fg(Color::Red),
            )));
        }
        let widget = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title("Download Library"));
        frame.render_widget(widget, area);
    }

    fn draw_clone_tasks(&mut self, frame: &mut ratatui::Frame, area: Rect) {
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3)])
            .split(area);

        let rows = self.clone_tasks.rows();
        let height = layout[0].height.saturating_sub(2) as usize;
        let selected = self.clone_tasks.selected;
        let scroll = adjust_scroll(selected, 0, height, rows.len());
        let end = (scroll + height).min(rows.len());
        let mut items: Vec<ListItem> = rows[scroll..end]
            .iter()
            .enumerate()
            .map(|(offset, row)| {
                let mut line = Line::from(Span::raw(row.clone()));
                if scroll + offset == selected {
                    line = line.style(Style::default().add_modifier(Modifier::REVERSED));
                }
                ListItem::new(line)
            })
            .collect();
        if rows.is_empty() {
            items.push(ListItem::new(Line::from(Span::raw("No download tasks."))));
        }
        let list = List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Download Tasks ({})", rows.len())),
        );
        frame.render_widget(list, layout[0]);

        let (text, style) = match self.clone_tasks.error.as_deref() {
            Some(error) => (error.to_string(), Style::default().fg(Color::Red)),
            None => (String::new(), Style::default()),
        };
        let status = Paragraph::new(Line::from(Span::styled(text, style)))
            .block(Block::default().borders(Borders::ALL).title("Status"));
        frame.render_widget(status, layout[1]);
    }

    fn draw_details(&mut self, frame: &mut ratatui::Frame, area: Rect) {
        let lines: Vec<Line> = self
            .details
            .iter()
            .map(|line| Line::from(Span::raw(line.as_str())))
            .collect();
        let widget = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title("Library Details"));
        frame.render_widget(widget, area);
    }

    fn draw_message(&mut self, frame: &mut ratatui::Frame, area: Rect) {
        let lines: Vec<Line> = self
            .message
            .lines()
            .map(|line| Line::from(Span::raw(line)))
            .collect();
        let widget = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title("Message"));
        frame.render_widget(widget, area);
    }

    fn draw_log_panel(&self, frame: &mut ratatui::Frame, area: Rect) {
        let max_lines = area.height.saturating_sub(LOG_PANEL_BORDER_HEIGHT) as usize;
        if max_lines == 0 {
            return;
        }
        let entries = self.log_buffer.tail(max_lines);
        let lines: Vec<Line> = if entries.is_empty() {
            vec![Line::from(Span::raw("No log messages yet."))]
        } else {
            entries
                .iter()
                .map(|entry| Line::from(Span::raw(entry.format_compact())))
                .collect()
        };
        let widget = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Logs"));
        frame.render_widget(widget, area);
    }
}
