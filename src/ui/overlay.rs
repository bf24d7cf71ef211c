use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::detail::RelatedSection;
use crate::logging::LogBuffer;
use crate::ui::app::TuiApp;

/// Render the detail overlay for the currently viewed term.
pub fn render_detail(f: &mut Frame, app: &TuiApp) {
    let Some(state) = app.detail.state() else {
        return;
    };
    let area = centered_rect(84, 80, f.area());
    f.render_widget(Clear, area);

    let title = if app.detail.copy_flash_active() {
        format!(" {} [{}] (Copied!) ", state.display_name(), state.display_id())
    } else {
        format!(" {} [{}] ", state.display_name(), state.display_id())
    };
    let frame_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(title);
    let inner = frame_block.inner(area);
    f.render_widget(frame_block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // definition
            Constraint::Length(4), // synonyms
            Constraint::Min(6),    // related / annotations
            Constraint::Length(1), // key hints
        ])
        .split(inner);

    let definition = Paragraph::new(state.display_definition())
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Definition"));
    f.render_widget(definition, rows[0]);

    let synonyms = Paragraph::new(state.display_synonyms().join("; "))
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Synonyms"));
    f.render_widget(synonyms, rows[1]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[2]);

    render_related_column(f, columns[0], app);

    let annotation_rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(columns[1]);
    render_text_section(
        f,
        annotation_rows[0],
        "Genes (y to copy)",
        state.genes.display_lines("No genes found"),
    );
    render_text_section(
        f,
        annotation_rows[1],
        "Diseases",
        state.diseases.display_lines("No diseases found"),
    );

    let hints = Paragraph::new(Line::from(vec![
        Span::raw("a=Add term  y=Copy genes  \u{2191}\u{2193}=Related  "),
        Span::raw("Enter=Open related  s=Select related  Esc=Close"),
    ]))
    .style(Style::default().fg(Color::DarkGray));
    f.render_widget(hints, rows[3]);
}

/// Parents and children as one navigable list; the highlighted entry is the
/// target of Enter (open) and s (add to selection).
fn render_related_column(f: &mut Frame, area: Rect, app: &TuiApp) {
    let Some(state) = app.detail.state() else {
        return;
    };
    let cursor = app.related_cursor();
    let mut items: Vec<ListItem> = Vec::new();
    let mut index = 0usize;

    let mut push_section = |items: &mut Vec<ListItem>, label: &str, section: &RelatedSection| {
        items.push(ListItem::new(Span::styled(
            label.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        match section {
            RelatedSection::Loading => items.push(ListItem::new("  Loading...")),
            RelatedSection::Placeholder(text) => items.push(ListItem::new(format!("  {text}"))),
            RelatedSection::Items(refs) if refs.is_empty() => {
                items.push(ListItem::new("  None"));
            }
            RelatedSection::Items(refs) => {
                for r in refs {
                    let label = format!("  {} ({})", r.name, r.id);
                    let style = if index == cursor {
                        Style::default().add_modifier(Modifier::REVERSED)
                    } else {
                        Style::default()
                    };
                    items.push(ListItem::new(Span::styled(label, style)));
                    index += 1;
                }
            }
        }
    };

    push_section(&mut items, "Parents", &state.parents);
    push_section(&mut items, "Children", &state.children);

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Related terms"),
    );
    f.render_widget(list, area);
}

fn render_text_section(f: &mut Frame, area: Rect, title: &str, lines: Vec<String>) {
    let items: Vec<ListItem> = lines.into_iter().map(ListItem::new).collect();
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title.to_string()));
    f.render_widget(list, area);
}

pub fn render_help(f: &mut Frame) {
    let area = centered_rect(70, 70, f.area());
    f.render_widget(Clear, area);

    let lines = vec![
        Line::from(Span::styled(
            "hpo-cli Help",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Query mode:"),
        Line::from("  type        - search (fires after the debounce window)"),
        Line::from("  Down/Tab    - move to the results list"),
        Line::from("  Esc         - clear the query, then exit"),
        Line::from(""),
        Line::from("Results / Selection modes:"),
        Line::from("  j/k or arrows - navigate"),
        Line::from("  Enter or a  - add result to selection"),
        Line::from("  i           - open term details"),
        Line::from("  d / Delete  - remove from selection"),
        Line::from("  c           - clear the selection"),
        Line::from("  e           - export selection to a text file"),
        Line::from("  1-9         - add a favorite term"),
        Line::from("  Tab         - switch pane, / back to the query"),
        Line::from(""),
        Line::from("Detail overlay:"),
        Line::from("  a           - add the viewed term and close"),
        Line::from("  y           - copy gene list to the clipboard"),
        Line::from("  Enter / s   - open / select the highlighted related term"),
        Line::from(""),
        Line::from("F1 help, F12 logs, Ctrl+C quit"),
    ];
    let help = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Help"))
        .wrap(Wrap { trim: true });
    f.render_widget(help, area);
}

pub fn render_logs(f: &mut Frame, buffer: &LogBuffer) {
    let area = centered_rect(90, 80, f.area());
    f.render_widget(Clear, area);

    let visible = area.height.saturating_sub(2) as usize;
    let lines: Vec<Line> = buffer
        .recent(visible)
        .into_iter()
        .map(|entry| Line::from(entry.format_for_display()))
        .collect();
    let logs = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("Logs ({} entries)", buffer.len())),
    );
    f.render_widget(logs, area);
}

/// Blocking notice; any key dismisses it.
pub fn render_notice(f: &mut Frame, message: &str) {
    let area = centered_rect(60, 20, f.area());
    f.render_widget(Clear, area);

    let notice = Paragraph::new(message)
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(Color::Red))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Notice (press any key)"),
        );
    f.render_widget(notice, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
