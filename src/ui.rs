use crate::App;
use painel::api::Task;
use painel::routes::Route;
use painel::views::collaborators::{CollaboratorFocus, ACCESS_DENIED_MSG};
use painel::views::project_details::ProjectDetailsView;
use painel::views::Notice;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Min(5), Constraint::Length(1)])
        .split(f.area());

    match app.route {
        Route::Login => draw_login(f, app, chunks[0]),
        Route::Dashboard => draw_dashboard(f, app, chunks[0]),
        Route::Project(_) => draw_project(f, app, chunks[0]),
        Route::Collaborators(_) => draw_collaborators(f, app, chunks[0]),
    }

    draw_status_line(f, app, chunks[1]);
}

fn draw_status_line(f: &mut Frame, app: &App, area: Rect) {
    let line = if let Some(error) = &app.error {
        Line::from(Span::styled(error.clone(), Style::default().fg(Color::Red)))
    } else {
        Line::from(Span::styled(
            app.key_help(),
            Style::default().fg(Color::DarkGray),
        ))
    };
    f.render_widget(Paragraph::new(line), area);
}

fn notice_line(notice: &Option<Notice>) -> Line<'_> {
    match notice {
        Some(n) => Line::from(Span::styled(n.text(), Style::default().fg(Color::Green))),
        None => Line::from(""),
    }
}

fn draw_login(f: &mut Frame, app: &App, area: Rect) {
    let mut lines = vec![
        Line::from(Span::styled("Login", Style::default().add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from(format!("E-mail: {}", app.login.email)),
        Line::from(format!("Senha:  {}", "*".repeat(app.login.password.len()))),
        Line::from(""),
        Line::from("[Enter] entrar  [q] sair"),
    ];
    if let Some(error) = &app.login.error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(error.clone(), Style::default().fg(Color::Red))));
    }
    let block = Block::default().title("painel").borders(Borders::ALL);
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_dashboard(f: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .dashboard
        .projects
        .iter()
        .enumerate()
        .map(|(i, project)| {
            let style = if i == app.dashboard.selected {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(vec![
                Span::styled(project.name.clone(), style),
                Span::raw(format!(
                    "  {} até {}  {}",
                    project.start_date, project.end_date, project.description
                )),
            ]))
        })
        .collect();

    let list = if items.is_empty() {
        List::new(vec![ListItem::new("Nenhum projeto encontrado")])
    } else {
        List::new(items)
    };
    f.render_widget(
        list.block(Block::default().title("Seus Projetos").borders(Borders::ALL)),
        area,
    );
}

fn task_item<'a>(view: &'a ProjectDetailsView, user_id: u64, task: &'a Task, selected: bool) -> ListItem<'a> {
    let title_style = if selected {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };
    let mut spans = vec![
        Span::styled(task.title.clone(), title_style),
        Span::raw(format!(
            "  [{}]  Vence em: {}  {}",
            task.status.label(),
            task.due_date,
            task.image_url
        )),
    ];
    if view.can_edit_or_delete(task, user_id) {
        spans.push(Span::styled(
            "  [e]ditar [d]excluir",
            Style::default().fg(Color::DarkGray),
        ));
    }
    ListItem::new(Line::from(spans))
}

fn draw_project(f: &mut Frame, app: &App, area: Rect) {
    let Some(view) = &app.details else {
        return;
    };
    let Some(project) = &view.project else {
        f.render_widget(Paragraph::new("Carregando projeto..."), area);
        return;
    };
    let user_id = app.user.as_ref().map(|u| u.id).unwrap_or_default();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

    let mut header = vec![
        Line::from(Span::styled(
            project.name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(project.description.clone()),
        Line::from(format!("{} até {}", project.start_date, project.end_date)),
    ];
    if view.can_manage_collaborators(user_id) {
        header.push(Line::from(Span::styled(
            "[c] Gerenciar Colaboradores",
            Style::default().fg(Color::Cyan),
        )));
    }
    f.render_widget(Paragraph::new(header), chunks[0]);

    let form_title = if view.form.is_editing() {
        "Editar Tarefa"
    } else {
        "Criar Nova Tarefa"
    };
    let filters = Paragraph::new(Line::from(format!(
        "Buscar por título: {:<20} Status: {:<12} ({})",
        view.search,
        view.status_filter.label(),
        form_title
    )))
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(filters, chunks[1]);

    let filtered = view.filtered();
    let items: Vec<ListItem> = filtered
        .into_iter()
        .enumerate()
        .map(|(i, task)| task_item(view, user_id, task, i == view.selected))
        .collect();
    let list = if items.is_empty() {
        List::new(vec![ListItem::new("Nenhuma tarefa encontrada")])
    } else {
        List::new(items)
    };
    f.render_widget(
        list.block(Block::default().title("Tarefas").borders(Borders::ALL)),
        chunks[2],
    );

    f.render_widget(Paragraph::new(notice_line(&view.notice)), chunks[3]);
}

fn draw_collaborators(f: &mut Frame, app: &App, area: Rect) {
    let Some(view) = &app.collaborators else {
        return;
    };
    if view.project.is_none() {
        f.render_widget(Paragraph::new("Carregando..."), area);
        return;
    }
    let user_id = app.user.as_ref().map(|u| u.id).unwrap_or_default();
    if !view.can_manage(user_id) {
        f.render_widget(Paragraph::new(ACCESS_DENIED_MSG), area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Percentage(50),
            Constraint::Percentage(50),
            Constraint::Length(1),
        ])
        .split(area);

    let focused_border = Style::default().fg(Color::Cyan);

    let collaborators: Vec<ListItem> = view
        .collaborator_list()
        .iter()
        .enumerate()
        .map(|(i, user)| {
            let selected =
                view.focus == CollaboratorFocus::Collaborators && i == view.selected;
            let style = if selected {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(Span::styled(
                format!("{} ({})  [r]emover", user.name, user.email),
                style,
            )))
        })
        .collect();
    let list = List::new(collaborators).block(
        Block::default()
            .title("Colaboradores do Projeto")
            .borders(Borders::ALL)
            .border_style(if view.focus == CollaboratorFocus::Collaborators {
                focused_border
            } else {
                Style::default()
            }),
    );
    f.render_widget(list, chunks[0]);

    let suggestions: Vec<ListItem> = view
        .suggestions
        .iter()
        .enumerate()
        .map(|(i, suggestion)| {
            let selected = view.focus == CollaboratorFocus::Suggestions && i == view.selected;
            let style = if selected {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(Span::styled(
                format!("{} ({})  [a]dicionar", suggestion.full_name(), suggestion.email),
                style,
            )))
        })
        .collect();
    let list = List::new(suggestions).block(
        Block::default()
            .title("Sugestões para adicionar")
            .borders(Borders::ALL)
            .border_style(if view.focus == CollaboratorFocus::Suggestions {
                focused_border
            } else {
                Style::default()
            }),
    );
    f.render_widget(list, chunks[1]);

    f.render_widget(Paragraph::new(notice_line(&view.notice)), chunks[2]);
}
