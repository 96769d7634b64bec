use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use super::app::{ActiveField, App, Focus};
use crate::domain::api::TodoApi;

const HELP: &str = "Enter/Space: toggle  n: new  e: edit  d: delete  r: reload  q: quit  |  form: Tab switch, Enter save, Esc cancel";

pub fn draw<A: TodoApi>(f: &mut Frame, app: &mut App<A>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(f.size());

    let header = Paragraph::new(HELP).block(Block::default().borders(Borders::ALL).title("Todo App"));
    f.render_widget(header, chunks[0]);

    let form_focused = app.focus == Focus::Form;
    let draft = app.view.draft();
    let field_line = |label: &str, value: &str, field: ActiveField| {
        let active = form_focused && app.field == field;
        let marker = if active { "> " } else { "  " };
        let cursor = if active { "_" } else { "" };
        Line::from(vec![
            Span::raw(marker),
            Span::styled(format!("{label}: "), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(format!("{value}{cursor}")),
        ])
    };
    let form = Paragraph::new(vec![
        field_line("Title", &draft.title, ActiveField::Title),
        field_line("Description", &draft.description, ActiveField::Description),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(if app.view.is_editing() { "Update Todo" } else { "Add Todo" })
            .border_style(if form_focused { Style::default().fg(Color::Yellow) } else { Style::default() }),
    );
    f.render_widget(form, chunks[1]);

    let list_items: Vec<ListItem> = app
        .view
        .items()
        .iter()
        .map(|t| {
            let mark = if t.completed { "[x]" } else { "[ ]" };
            let title_style = if t.completed { Style::default().add_modifier(Modifier::CROSSED_OUT) } else { Style::default() };
            let mut lines = vec![Line::from(vec![Span::raw(format!("{mark} ")), Span::styled(t.title.clone(), title_style)])];
            if !t.description.is_empty() {
                lines.push(Line::from(Span::styled(format!("    {}", t.description), Style::default().fg(Color::DarkGray))));
            }
            ListItem::new(lines)
        })
        .collect();
    let list = List::new(list_items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Todo List ({})", app.view.items().len()))
                .border_style(if form_focused { Style::default() } else { Style::default().fg(Color::Yellow) }),
        )
        .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD | Modifier::REVERSED))
        .highlight_symbol(">> ");
    if app.view.items().is_empty() { app.list_state.select(None); } else { app.list_state.select(Some(app.selected)); }
    f.render_stateful_widget(list, chunks[2], &mut app.list_state);

    let hint = match app.selected_item() {
        Some(t) if t.completed => "Enter: Mark as Incomplete",
        Some(_) => "Enter: Mark as Complete",
        None => "n: add your first todo",
    };
    let syncing = match app.in_flight() {
        0 => String::new(),
        n => format!("  |  syncing ({n})"),
    };
    let footer = Paragraph::new(format!("API: {}  |  {}{}", app.api_url, hint, syncing))
        .block(Block::default().borders(Borders::ALL).title(match app.focus { Focus::List => "list", Focus::Form => "form" }));
    f.render_widget(footer, chunks[3]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::todo_list_view::{Request, TodoListView};
    use crate::domain::todo::TodoItem;
    use crate::test_support::{id, InMemoryApi};
    use ratatui::{backend::TestBackend, Terminal};

    fn screen(app: &mut App<InMemoryApi>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 20)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        let buf = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buf.area.height {
            for x in 0..buf.area.width { out.push_str(buf.get(x, y).symbol()); }
            out.push('\n');
        }
        out
    }

    #[tokio::test]
    async fn shows_items_with_completion_marks() {
        let api = InMemoryApi::with_items(vec![
            TodoItem::new(id(1), "Buy milk", "two litres", false),
            TodoItem::new(id(2), "Walk dog", "", true),
        ]);
        let mut view = TodoListView::new(api);
        view.load().await.unwrap();
        let mut app = App::new(view, "http://127.0.0.1:3000");
        let text = screen(&mut app);
        assert!(text.contains("Todo App"));
        assert!(text.contains("Add Todo"));
        assert!(text.contains("Todo List (2)"));
        assert!(text.contains("[ ] Buy milk"));
        assert!(text.contains("two litres"));
        assert!(text.contains("[x] Walk dog"));
        assert!(text.contains("Enter: Mark as Complete"));
        assert!(text.contains("API: http://127.0.0.1:3000"));
    }

    #[tokio::test]
    async fn edit_mode_changes_form_title_and_shows_drafts() {
        let mut view = TodoListView::new(InMemoryApi::default());
        view.begin_edit(&TodoItem::new(id(7), "Draft me", "", false));
        let mut app = App::new(view, "http://x");
        app.focus = Focus::Form;
        let text = screen(&mut app);
        assert!(text.contains("Update Todo"));
        assert!(text.contains("> Title: Draft me_"));
        assert!(text.contains("Todo List (0)"));
        assert!(!text.contains("syncing"));
    }

    #[tokio::test]
    async fn footer_counts_requests_in_flight() {
        let mut app = App::new(TodoListView::new(InMemoryApi::default()), "http://x");
        app.dispatch(Request::Load);
        app.dispatch(Request::Load);
        assert!(screen(&mut app).contains("syncing (2)"));
        while app.apply_next().await {}
        assert!(!screen(&mut app).contains("syncing"));
    }
}
