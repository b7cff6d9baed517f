use super::*;

impl TuiApp {
    /// Returns `true` when the app should exit.
    pub(in crate::tui) fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
        if key.kind != KeyEventKind::Press {
            return Ok(false);
        }
        match self.view {
            View::Tree => return Ok(self.handle_tree(key)),
            View::Download => self.handle_download(key),
            View::CloneTasks => self.handle_clone_tasks(key),
            View::Details | View::Message => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
                    self.view = View::Tree;
                }
            }
        }
        Ok(false)
    }

    fn handle_tree(&mut self, key: KeyEvent) -> bool {
        if self.tree.context_menu().is_some() {
            match key.code {
                KeyCode::Up => self.tree.move_menu_selection(-1),
                KeyCode::Down => self.tree.move_menu_selection(1),
                KeyCode::Enter => {
                    if let Some(request) = self.tree.activate_menu_entry() {
                        self.perform(request);
                    }
                }
                _ => self.tree.close_context_menu(),
            }
            return false;
        }

        match key.code {
            KeyCode::Char('q') => return true,
            KeyCode::Esc => self.tree.hide_tooltip(),
            KeyCode::Up => self.tree.move_selection(-1),
            KeyCode::Down => self.tree.move_selection(1),
            KeyCode::PageUp => self.tree.move_selection(-10),
            KeyCode::PageDown => self.tree.move_selection(10),
            KeyCode::Home => self.tree.select_row(Some(0)),
            KeyCode::End => {
                let last = self.tree.model().row_count().checked_sub(1);
                self.tree.select_row(last);
            }
            KeyCode::Enter => {
                if let Some(row) = self.tree.selected_row() {
                    self.tree.click(row);
                }
            }
            KeyCode::Char('m') => {
                if let Some(row) = self.tree.selected_row() {
                    self.tree.open_context_menu(row, None);
                }
            }
            KeyCode::Char('t') => {
                if self.tree.tooltip().is_some() {
                    self.tree.hide_tooltip();
                } else if let Some(row) = self.tree.selected_row() {
                    self.tree.show_tooltip(row);
                }
            }
            KeyCode::Char('d') => self.trigger(ActionKind::Download),
            KeyCode::Char('o') => self.trigger(ActionKind::OpenLocalFolder),
            KeyCode::Char('w') => self.trigger(ActionKind::ViewOnWeb),
            KeyCode::Char('i') => self.trigger(ActionKind::ShowDetails),
            KeyCode::Char('r') => {
                self.status = "Refreshing...".to_string();
                self.refresh_all();
            }
            KeyCode::Char('a') => self.toggle_auto_sync(),
            KeyCode::Char('c') => {
                self.view = View::CloneTasks;
                self.refresh_local();
            }
            _ => {}
        }
        false
    }

    fn handle_download(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Enter {
            self.accept_download();
            return;
        }
        let Some(dialog) = self.download.as_mut() else {
            self.view = View::Tree;
            return;
        };
        match key.code {
            KeyCode::Esc => {
                self.download = None;
                self.view = View::Tree;
            }
            KeyCode::Tab | KeyCode::Down | KeyCode::Up => dialog.next_field(),
            KeyCode::Backspace => dialog.pop(),
            KeyCode::Char(ch) => dialog.push(ch),
            _ => {}
        }
    }

    fn handle_clone_tasks(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.view = View::Tree,
            KeyCode::Up => self.clone_tasks.move_selection(-1),
            KeyCode::Down => self.clone_tasks.move_selection(1),
            KeyCode::Char('x') => self.cancel_selected_task(),
            KeyCode::Delete | KeyCode::Char('D') => self.remove_selected_task(),
            KeyCode::Char('r') => self.refresh_local(),
            _ => {}
        }
    }

    pub(in crate::tui) fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.view != View::Tree {
            return;
        }
        let row = self.row_at(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.tree.close_context_menu();
                self.tree.select_row(row);
                if let Some(row) = row {
                    self.tree.click(row);
                }
            }
            MouseEventKind::Down(MouseButton::Right) => match row {
                Some(row) => {
                    self.tree.open_context_menu(row, Some(mouse.column));
                }
                None => self.tree.close_context_menu(),
            },
            MouseEventKind::Moved => match row {
                Some(row) if self.tree.tooltip().map(|tip| tip.row) != Some(row) => {
                    self.tree.show_tooltip(row);
                }
                Some(_) => {}
                None => self.tree.hide_tooltip(),
            },
            MouseEventKind::ScrollUp => self.tree.move_selection(-1),
            MouseEventKind::ScrollDown => self.tree.move_selection(1),
            _ => {}
        }
    }

    /// Tree row under a terminal cell, if any.
    pub(in crate::tui) fn row_at(&self, column: u16, y: u16) -> Option<usize> {
        let area = self.tree_area;
        let inside = column > area.x
            && column < area.x + area.width.saturating_sub(1)
            && y > area.y
            && y < area.y + area.height.saturating_sub(1);
        if !inside {
            return None;
        }
        let row = self.tree_scroll + usize::from(y - area.y - 1);
        (row < self.tree.model().row_count()).then_some(row)
    }
}
