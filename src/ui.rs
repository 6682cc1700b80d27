use crate::catalog::Catalog;
use crate::product::{Product, RiskLevel};
use crate::query::ProductFilter;
use crate::{category_tabs, ALL_CATEGORIES};
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Gauge, Paragraph, Row, Table, TableState, Tabs, Wrap},
    Frame, Terminal,
};
use std::io;

pub struct App {
    pub catalog: Catalog,
    pub tabs: Vec<String>,
    pub active_tab: usize,
    pub visible: Vec<Product>,
    pub state: TableState,
    pub show_detail: bool,
}

impl App {
    pub fn new(catalog: Catalog) -> Self {
        let tabs = category_tabs(&catalog);
        let mut app = Self {
            catalog,
            tabs,
            active_tab: 0,
            visible: Vec::new(),
            state: TableState::default(),
            show_detail: false,
        };
        app.apply_tab();
        app
    }

    pub fn active_category(&self) -> &str {
        &self.tabs[self.active_tab]
    }

    /// Re-run the category query for the active tab
    fn apply_tab(&mut self) {
        let filter = match self.active_category() {
            ALL_CATEGORIES => ProductFilter::default(),
            category => ProductFilter::default().with_category(category),
        };

        self.visible = self.catalog.query(&filter).into_iter().cloned().collect();

        // Reset selection to first item
        if self.visible.is_empty() {
            self.state.select(None);
        } else {
            self.state.select(Some(0));
        }
    }

    pub fn next_tab(&mut self) {
        self.active_tab = (self.active_tab + 1) % self.tabs.len();
        self.apply_tab();
    }

    pub fn previous_tab(&mut self) {
        self.active_tab = if self.active_tab == 0 {
            self.tabs.len() - 1
        } else {
            self.active_tab - 1
        };
        self.apply_tab();
    }

    pub fn toggle_detail(&mut self) {
        self.show_detail = !self.show_detail;
    }

    pub fn selected_product(&self) -> Option<&Product> {
        self.state.selected().and_then(|i| self.visible.get(i))
    }

    pub fn next(&mut self) {
        let len = self.visible.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.visible.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    pub fn first(&mut self) {
        if !self.visible.is_empty() {
            self.state.select(Some(0));
        }
    }

    pub fn last(&mut self) {
        if !self.visible.is_empty() {
            self.state.select(Some(self.visible.len() - 1));
        }
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res?;
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Enter => app.toggle_detail(),
                KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => app.previous_tab(),
                KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => app.previous_tab(),
                KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => app.next_tab(),
                KeyCode::Down | KeyCode::Char('j') => app.next(),
                KeyCode::Up | KeyCode::Char('k') => app.previous(),
                KeyCode::Home => app.first(),
                KeyCode::End => app.last(),
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Category tabs
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_tabs(f, chunks[0], app);

    if app.show_detail {
        let content_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(55), // Product list
                Constraint::Percentage(45), // Detail panel
            ])
            .split(chunks[1]);

        render_table(f, content_chunks[0], app);
        render_detail_panel(f, content_chunks[1], app);
    } else {
        render_table(f, chunks[1], app);
    }

    render_status_bar(f, chunks[2], app);
}

fn risk_color(level: Option<RiskLevel>) -> Color {
    match level {
        Some(RiskLevel::Low) => Color::Green,
        Some(RiskLevel::Medium) => Color::Yellow,
        Some(RiskLevel::High) => Color::Red,
        None => Color::DarkGray,
    }
}

fn render_tabs(f: &mut Frame, area: Rect, app: &App) {
    let titles: Vec<Line> = app.tabs.iter().map(|t| Line::from(t.as_str())).collect();

    let tabs = Tabs::new(titles)
        .select(app.active_tab)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(format!(" Catálogo · {} productos ", app.catalog.len())),
        )
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )
        .divider(" │ ");

    f.render_widget(tabs, area);
}

fn render_table(f: &mut Frame, area: Rect, app: &mut App) {
    let header_cells = ["Producto", "Tipo", "Categoría", "Tasa", "Riesgo"].iter().map(|h| {
        Cell::from(*h).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
    });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = app.visible.iter().map(|p| {
        let cells = vec![
            Cell::from(truncate(&p.name, 34)),
            Cell::from(p.product_type.label()),
            Cell::from(truncate(&p.category, 14)),
            Cell::from(p.display_rate()),
            Cell::from(p.risk_label()).style(Style::default().fg(risk_color(p.risk_level))),
        ];

        Row::new(cells).height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(36),
            Constraint::Length(9),
            Constraint::Length(14),
            Constraint::Length(8),
            Constraint::Length(7),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(format!(" {} ", app.active_category())),
    )
    .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_detail_panel(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Detalle ");

    let Some(product) = app.selected_product() else {
        let empty = Paragraph::new("Sin productos en esta categoría").block(block);
        f.render_widget(empty, area);
        return;
    };

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(area);

    let label = Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD);
    let mut lines = vec![
        Line::from(Span::styled(
            product.name.clone(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![Span::styled("Categoría: ", label), Span::raw(product.category.clone())]),
        Line::from(vec![Span::styled("Tipo: ", label), Span::raw(product.product_type.label())]),
        Line::from(vec![
            Span::styled("Nivel de Riesgo: ", label),
            Span::styled(product.risk_label(), Style::default().fg(risk_color(product.risk_level))),
        ]),
        Line::from(vec![Span::styled("Tasa de Interés: ", label), Span::raw(product.display_rate())]),
        Line::from(""),
        Line::from(Span::styled("Descripción", label)),
        Line::from(product.description.clone()),
    ];

    if !product.benefits.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Beneficios", label)));
        lines.extend(product.benefits.iter().map(|b| Line::from(format!("  • {}", b))));
    }

    let detail = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    f.render_widget(detail, parts[0]);

    // Risk axis of the risk vs. performance view; unknown risk is not plotted
    let risk_block = Block::default().borders(Borders::ALL).title(" Riesgo ");
    match product.risk_level {
        Some(risk) => {
            let gauge = Gauge::default()
                .block(risk_block)
                .gauge_style(Style::default().fg(risk_color(Some(risk))))
                .percent(risk.score())
                .label(format!("{} · rendimiento {}", risk.label(), product.display_rate()));
            f.render_widget(gauge, parts[1]);
        }
        None => {
            let unknown = Paragraph::new(Span::styled(
                "Riesgo no informado",
                Style::default().fg(risk_color(None)),
            ))
            .block(risk_block);
            f.render_widget(unknown, parts[1]);
        }
    }
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let selected = app.state.selected().map(|i| i + 1).unwrap_or(0);
    let total = app.visible.len();

    let key = Style::default().fg(Color::Yellow);
    let status_spans = vec![
        Span::styled(format!(" Fila: {}/{} ", selected, total), Style::default().fg(Color::Cyan)),
        Span::raw(" | "),
        Span::styled("←/→", key),
        Span::raw(" Categoría | "),
        Span::styled("↑/↓", key),
        Span::raw(" Nav | "),
        Span::styled("Enter", key),
        Span::raw(" Detalle | "),
        Span::styled("q", Style::default().fg(Color::Red)),
        Span::raw(" Salir"),
    ];

    let status_bar = Paragraph::new(Line::from(status_spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use ratatui::backend::TestBackend;

    fn visible_ids(app: &App) -> Vec<&str> {
        app.visible.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_starts_on_all_tab() {
        let app = App::new(Catalog::sample());
        assert_eq!(app.active_category(), "Todos");
        assert_eq!(app.visible.len(), 10);
        assert_eq!(app.state.selected(), Some(0));
    }

    #[test]
    fn test_tab_switch_filters_by_category() {
        let mut app = App::new(Catalog::sample());

        app.next_tab();
        assert_eq!(app.active_category(), "Cuentas");
        assert_eq!(visible_ids(&app), vec!["1", "4", "7", "10"]);

        app.next_tab();
        assert_eq!(app.active_category(), "Tarjetas");
        assert_eq!(visible_ids(&app), vec!["2", "5", "8"]);

        app.previous_tab();
        app.previous_tab();
        app.previous_tab();
        assert_eq!(app.active_category(), "Fondos");
        assert_eq!(visible_ids(&app), vec!["3", "6", "9"]);
    }

    #[test]
    fn test_selection_wraps() {
        let mut app = App::new(Catalog::sample());
        app.previous();
        assert_eq!(app.selected_product().map(|p| p.id.as_str()), Some("10"));
        app.next();
        assert_eq!(app.selected_product().map(|p| p.id.as_str()), Some("1"));
        app.last();
        app.next();
        assert_eq!(app.state.selected(), Some(0));
    }

    fn render_screen(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(140, 30)).unwrap();
        terminal.draw(|f| ui(f, app)).unwrap();

        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_unknown_risk_is_not_plotted() {
        let mut products = Catalog::sample().products().to_vec();
        products[0].risk_level = None;
        let mut app = App::new(Catalog::new(products).unwrap());
        app.toggle_detail();

        let screen = render_screen(&mut app);
        assert!(screen.contains("Riesgo no informado"));
        assert!(!screen.contains("Bajo · rendimiento"));

        app.next();
        assert!(render_screen(&mut app).contains("Medio · rendimiento 23.99%"));
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("Depósito a Plazo Flexible", 10), "Depósit...");
        assert_eq!(truncate("Fondo", 10), "Fondo");
    }

    #[test]
    fn test_renders_detail_panel() {
        let mut app = App::new(Catalog::sample());
        app.next_tab();
        app.next_tab();
        app.next();
        app.toggle_detail();

        let screen = render_screen(&mut app);

        assert!(screen.contains("Tarjeta Cashback Oro"));
        assert!(screen.contains("Beneficios"));
        assert!(screen.contains("Tarjetas"));
    }
}
