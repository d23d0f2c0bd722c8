use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use painel::api::{Api, TaskStatus, User};
use painel::config::AppConfig;
use painel::routes::{self, Route};
use painel::session::SessionStore;
use painel::views::collaborators::{CollaboratorFocus, CollaboratorsView};
use painel::views::dashboard::DashboardView;
use painel::views::login::LoginView;
use painel::views::project_details::ProjectDetailsView;
use painel::views::{expire_notice, SubmitOutcome};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{io, time::Duration};
use tokio::runtime::Runtime;

mod ui;

pub struct App {
    pub api: Api,
    pub session_store: SessionStore,
    pub user: Option<User>,
    pub route: Route,
    pub login: LoginView,
    pub dashboard: DashboardView,
    pub details: Option<ProjectDetailsView>,
    pub collaborators: Option<CollaboratorsView>,
    pub error: Option<String>,
    pub should_quit: bool,
}

impl App {
    fn new(api: Api, session_store: SessionStore, user: Option<User>) -> Self {
        let route = routes::resolve(Route::Dashboard, user.as_ref());
        Self {
            api,
            session_store,
            user,
            route,
            login: LoginView::default(),
            dashboard: DashboardView::default(),
            details: None,
            collaborators: None,
            error: None,
            should_quit: false,
        }
    }

    fn user_id(&self) -> u64 {
        self.user.as_ref().map(|u| u.id).unwrap_or_default()
    }

    /// Generic localized message for the user; the cause goes to the log only.
    fn fail(&mut self, message: &str, err: impl std::fmt::Display) {
        log::error!("{}: {}", message, err);
        self.error = Some(message.to_string());
    }

    /// Drops expired notices; runs once per event-loop tick.
    fn tick(&mut self) {
        if let Some(details) = &mut self.details {
            expire_notice(&mut details.notice);
        }
        if let Some(collaborators) = &mut self.collaborators {
            expire_notice(&mut collaborators.notice);
        }
    }

    /// The product's "reload": session gone, every view back to scratch.
    fn logout(&mut self) {
        if let Err(e) = self.session_store.clear() {
            log::error!("Failed to clear session: {}", e);
        }
        self.user = None;
        self.login = LoginView::default();
        self.dashboard = DashboardView::default();
        self.details = None;
        self.collaborators = None;
        self.route = routes::resolve(Route::Dashboard, None);
    }

    pub fn key_help(&self) -> &'static str {
        match self.route {
            Route::Login => "[Enter] entrar  [q] fechar",
            Route::Dashboard => {
                "[↑↓] navegar  [Enter] abrir  [n] novo projeto  [r] atualizar  [s] sair  [q] fechar"
            }
            Route::Project(_) => {
                "[↑↓] navegar  [/] buscar  [f] status  [n] nova  [e] editar  [d] excluir  [c] colaboradores  [Esc] voltar  [q] fechar"
            }
            Route::Collaborators(_) => {
                "[Tab] alternar  [↑↓] navegar  [a] adicionar  [r] remover  [Esc] voltar  [q] fechar"
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = AppConfig::from_env()?;
    let api = Api::new(&config);
    let session_store = SessionStore::new(config.session_file.clone());
    // A malformed session blob is a hard failure, by contract.
    let user = session_store.load()?;
    let rt = Runtime::new()?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(api, session_store, user);
    if app.user.is_some() {
        let user_id = app.user_id();
        let api = app.api.clone();
        if let Err(e) = rt.block_on(app.dashboard.refresh(&api, user_id)) {
            app.fail("Erro ao carregar projetos", e);
        }
    }

    let result = run_app(&mut terminal, &mut app, &rt);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("{:?}", err);
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rt: &Runtime,
) -> io::Result<()> {
    loop {
        app.tick();
        terminal.draw(|f| ui::draw(f, app))?;

        if !event::poll(Duration::from_millis(250))? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            // Any keypress dismisses a pending error, like closing an alert.
            app.error = None;
            match app.route {
                Route::Login => handle_login_key(app, rt, key.code),
                Route::Dashboard => handle_dashboard_key(app, rt, key.code),
                Route::Project(_) => handle_project_key(app, rt, key.code),
                Route::Collaborators(_) => handle_collaborators_key(app, rt, key.code),
            }
        }
        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_login_key(app: &mut App, rt: &Runtime, code: KeyCode) {
    match code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Enter => {
            if let Some(email) = prompt("E-mail") {
                app.login.email = email;
            }
            if let Some(password) = prompt("Senha") {
                app.login.password = password;
            }
            let api = app.api.clone();
            match rt.block_on(app.login.submit(&api)) {
                Ok(Some(user)) => {
                    if let Err(e) = app.session_store.save(&user) {
                        log::error!("Failed to persist session: {}", e);
                    }
                    app.user = Some(user);
                    app.route = routes::resolve(Route::Dashboard, app.user.as_ref());
                    let user_id = app.user_id();
                    if let Err(e) = rt.block_on(app.dashboard.refresh(&api, user_id)) {
                        app.fail("Erro ao carregar projetos", e);
                    }
                }
                Ok(None) => {} // message left in app.login.error
                Err(e) => app.fail("Erro ao entrar", e),
            }
        }
        _ => {}
    }
}

fn handle_dashboard_key(app: &mut App, rt: &Runtime, code: KeyCode) {
    match code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('s') => app.logout(),
        KeyCode::Up => app.dashboard.select_prev(),
        KeyCode::Down => app.dashboard.select_next(),
        KeyCode::Char('r') => {
            let api = app.api.clone();
            let user_id = app.user_id();
            if let Err(e) = rt.block_on(app.dashboard.refresh(&api, user_id)) {
                app.fail("Erro ao carregar projetos", e);
            }
        }
        KeyCode::Char('n') => {
            if let Some(name) = prompt("Nome") {
                app.dashboard.form.name = name;
            }
            if let Some(description) = prompt("Descrição") {
                app.dashboard.form.description = description;
            }
            if let Some(start) = prompt("Data de início (AAAA-MM-DD)") {
                app.dashboard.form.start_date = start;
            }
            if let Some(end) = prompt("Data de término (AAAA-MM-DD)") {
                app.dashboard.form.end_date = end;
            }
            let api = app.api.clone();
            let user_id = app.user_id();
            match rt.block_on(app.dashboard.submit(&api, user_id)) {
                Ok(SubmitOutcome::Saved) => {}
                Ok(SubmitOutcome::Rejected(msg)) => app.error = Some(msg.to_string()),
                Err(e) => app.fail("Erro ao criar projeto", e),
            }
        }
        KeyCode::Enter => {
            if let Some(project) = app.dashboard.selected_project() {
                let project_id = project.id;
                let mut view = ProjectDetailsView::new(project_id);
                let api = app.api.clone();
                if let Err(e) = rt.block_on(view.load(&api)) {
                    app.fail("Erro ao carregar projeto", e);
                }
                app.details = Some(view);
                app.route = routes::resolve(Route::Project(project_id), app.user.as_ref());
            }
        }
        _ => {}
    }
}

fn handle_project_key(app: &mut App, rt: &Runtime, code: KeyCode) {
    let api = app.api.clone();
    let user_id = app.user_id();
    if app.details.is_none() {
        return;
    }

    match code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Esc => {
            app.details = None;
            app.route = routes::resolve(Route::Dashboard, app.user.as_ref());
            if let Err(e) = rt.block_on(app.dashboard.refresh(&api, user_id)) {
                app.fail("Erro ao carregar projetos", e);
            }
        }
        KeyCode::Up => {
            if let Some(view) = app.details.as_mut() {
                view.select_prev();
            }
        }
        KeyCode::Down => {
            if let Some(view) = app.details.as_mut() {
                view.select_next();
            }
        }
        KeyCode::Char('/') => {
            if let Some(search) = prompt("Buscar por título") {
                if let Some(view) = app.details.as_mut() {
                    view.search = search;
                    view.selected = 0;
                }
            }
        }
        KeyCode::Char('f') => {
            if let Some(view) = app.details.as_mut() {
                view.status_filter = view.status_filter.cycle();
                view.selected = 0;
            }
        }
        KeyCode::Char('r') => {
            let result = match app.details.as_mut() {
                Some(view) => rt.block_on(view.refresh_tasks(&api)),
                None => return,
            };
            if let Err(e) = result {
                app.fail("Erro ao carregar tarefas", e);
            }
        }
        KeyCode::Char('n') => {
            let outcome = {
                let Some(view) = app.details.as_mut() else {
                    return;
                };
                view.form.reset();
                fill_task_form(view);
                rt.block_on(view.submit(&api, user_id))
            };
            match outcome {
                Ok(SubmitOutcome::Saved) => {}
                Ok(SubmitOutcome::Rejected(msg)) => app.error = Some(msg.to_string()),
                Err(e) => app.fail("Erro ao salvar tarefa", e),
            }
        }
        KeyCode::Char('e') => {
            let outcome = {
                let Some(view) = app.details.as_mut() else {
                    return;
                };
                let Some(task) = view.selected_task().cloned() else {
                    return;
                };
                if !view.can_edit_or_delete(&task, user_id) {
                    return;
                }
                view.form.begin_edit(&task);
                fill_task_form(view);
                rt.block_on(view.submit(&api, user_id))
            };
            match outcome {
                Ok(SubmitOutcome::Saved) => {}
                // Stays in edit mode with the typed values, like the form
                // under a validation alert.
                Ok(SubmitOutcome::Rejected(msg)) => app.error = Some(msg.to_string()),
                Err(e) => app.fail("Erro ao salvar tarefa", e),
            }
        }
        KeyCode::Char('d') => {
            let result = {
                let Some(view) = app.details.as_mut() else {
                    return;
                };
                let Some(task) = view.selected_task().cloned() else {
                    return;
                };
                if !view.can_edit_or_delete(&task, user_id) {
                    return;
                }
                if !confirm("Deseja mesmo excluir?") {
                    return;
                }
                rt.block_on(view.delete_task(&api, task.id))
            };
            if let Err(e) = result {
                app.fail("Erro ao excluir tarefa", e);
            }
        }
        KeyCode::Char('c') => {
            let project_id = {
                let Some(view) = app.details.as_ref() else {
                    return;
                };
                if !view.can_manage_collaborators(user_id) {
                    return;
                }
                view.project_id
            };
            let mut collaborators = CollaboratorsView::new(project_id);
            if let Err(e) = rt.block_on(collaborators.load(&api, user_id)) {
                app.fail("Erro ao carregar colaboradores", e);
            }
            app.collaborators = Some(collaborators);
            app.route = routes::resolve(Route::Collaborators(project_id), app.user.as_ref());
        }
        _ => {}
    }
}

fn handle_collaborators_key(app: &mut App, rt: &Runtime, code: KeyCode) {
    let api = app.api.clone();
    let user_id = app.user_id();
    if app.collaborators.is_none() {
        return;
    }

    match code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Esc => {
            let Some(view) = app.collaborators.take() else {
                return;
            };
            let mut details = ProjectDetailsView::new(view.project_id);
            if let Err(e) = rt.block_on(details.load(&api)) {
                app.fail("Erro ao carregar projeto", e);
            }
            let project_id = view.project_id;
            app.details = Some(details);
            app.route = routes::resolve(Route::Project(project_id), app.user.as_ref());
        }
        KeyCode::Tab => {
            if let Some(view) = app.collaborators.as_mut() {
                view.toggle_focus();
            }
        }
        KeyCode::Up => {
            if let Some(view) = app.collaborators.as_mut() {
                view.select_prev();
            }
        }
        KeyCode::Down => {
            if let Some(view) = app.collaborators.as_mut() {
                view.select_next();
            }
        }
        KeyCode::Char('a') | KeyCode::Enter => {
            let result = {
                let Some(view) = app.collaborators.as_mut() else {
                    return;
                };
                if !view.can_manage(user_id) || view.focus != CollaboratorFocus::Suggestions {
                    return;
                }
                let index = view.selected;
                rt.block_on(view.add_suggestion(&api, index))
            };
            if let Err(e) = result {
                app.fail("Erro ao adicionar colaborador", e);
            }
        }
        KeyCode::Char('r') => {
            let result = {
                let Some(view) = app.collaborators.as_mut() else {
                    return;
                };
                if !view.can_manage(user_id) || view.focus != CollaboratorFocus::Collaborators {
                    return;
                }
                let Some(collaborator) = view.collaborator_list().get(view.selected).copied()
                else {
                    return;
                };
                let collaborator_id = collaborator.id;
                if !confirm("Remover colaborador?") {
                    return;
                }
                rt.block_on(view.remove(&api, collaborator_id))
            };
            if let Err(e) = result {
                app.fail("Erro ao remover colaborador", e);
            }
        }
        _ => {}
    }
}

/// Prompts for every task field; in edit mode a blank answer keeps the
/// pre-filled value.
fn fill_task_form(view: &mut ProjectDetailsView) {
    if let Some(title) = prompt_keeping("Título", &view.form.title) {
        view.form.title = title;
    }
    if let Some(due) = prompt_keeping("Data de vencimento (AAAA-MM-DD)", &view.form.due_date) {
        view.form.due_date = due;
    }
    if let Some(url) = prompt_keeping("URL da imagem", &view.form.image_url) {
        view.form.image_url = url;
    }
    if let Some(answer) = prompt("Status [todo/in_progress/done]") {
        if let Some(status) = parse_status(&answer) {
            view.form.status = status;
        }
    }
}

fn parse_status(input: &str) -> Option<TaskStatus> {
    TaskStatus::ALL.iter().copied().find(|s| s.as_str() == input.trim())
}

/// Cooked-mode line prompt, in the terminal the UI already owns.
fn prompt(message: &str) -> Option<String> {
    disable_raw_mode().ok();
    println!("{}: ", message);
    let mut input = String::new();
    let read = io::stdin().read_line(&mut input);
    enable_raw_mode().ok();
    read.ok().map(|_| input.trim().to_string())
}

fn prompt_keeping(message: &str, current: &str) -> Option<String> {
    let label = if current.is_empty() {
        message.to_string()
    } else {
        format!("{} [{}]", message, current)
    };
    match prompt(&label) {
        Some(answer) if !answer.is_empty() => Some(answer),
        _ => None,
    }
}

/// Interactive confirmation; anything but "s"/"sim" declines.
fn confirm(message: &str) -> bool {
    matches!(
        prompt(&format!("{} (s/n)", message)).as_deref(),
        Some("s") | Some("S") | Some("sim")
    )
}
