use std::time::Duration;

use client_core::{DeployOutcome, DeployStatus};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui::{
    self,
    text::{CCursor, CCursorRange},
};
use shared::domain::Project;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{
    editor::EscapeAction, events::UiEvent, file_browser::FileBrowserLayout,
    orchestration::dispatch_backend_command, session::DemoSession,
};
use crate::ui::line_indent;

const FILE_TREE_WIDTH: f32 = 200.0;
const DEPLOY_BUTTON_HEIGHT: f32 = 32.0;

const CODE_EDITOR_FILTER: egui::EventFilter = egui::EventFilter {
    tab: true,
    horizontal_arrows: true,
    vertical_arrows: true,
    escape: true,
};

#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub endpoint: String,
}

fn endpoint_environment_label(endpoint: &str) -> &'static str {
    let endpoint = endpoint.to_ascii_lowercase();
    if endpoint.contains("127.0.0.1") || endpoint.contains("localhost") {
        "Local"
    } else if endpoint.contains("staging") {
        "Staging"
    } else {
        "Production"
    }
}

pub struct DemoEditorApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    session: DemoSession,
    endpoint: String,
    status: String,
    editor_focused: bool,
}

impl DemoEditorApp {
    pub fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>, startup: StartupConfig) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            session: DemoSession::new(Project::seed()),
            endpoint: startup.endpoint,
            status: "Starting deploy worker...".to_string(),
            editor_focused: false,
        }
    }

    fn process_ui_events(&mut self, ctx: &egui::Context) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => {
                    self.status = message;
                }
                UiEvent::Error(message) => {
                    tracing::error!("{message}");
                    self.status = message;
                }
                UiEvent::DeployStatusChanged(status) => {
                    self.session.apply_deploy_status(status);
                }
                UiEvent::Navigate(url) => {
                    self.status = format!("Opening {url}");
                    ctx.open_url(egui::OpenUrl::same_tab(url));
                }
            }
        }
    }

    fn submit_deploy(&mut self) {
        let Some(project) = self.session.begin_deploy() else {
            return;
        };
        if dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::Deploy { project },
            &mut self.status,
        ) {
            self.status = "Deploying...".to_string();
            // Mirror the worker's first transition so a second click cannot queue another deploy.
            self.session.apply_deploy_status(DeployStatus {
                outcome: DeployOutcome::InFlight,
                busy: true,
            });
        }
    }

    fn show_header(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("editor_header").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new("Editor").strong());
                if self.session.mode().is_power_user() {
                    ui.label(
                        egui::RichText::new("VIM")
                            .monospace()
                            .color(ui.visuals().warn_fg_color),
                    );
                } else {
                    ui.weak("Esc for power-user keys");
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.weak(endpoint_environment_label(&self.endpoint));
                });
            });

            if self.session.browser().viewport().is_narrow() {
                let icon = if self.session.browser().drawer_open() {
                    "✕"
                } else {
                    "☰"
                };
                let title = self.session.browser().drawer_title();
                if ui.button(format!("{icon} {title}")).clicked() {
                    self.session.toggle_drawer();
                }
            }
            ui.add_space(4.0);
        });
    }

    fn show_deploy_bar(&mut self, ctx: &egui::Context) {
        let narrow = self.session.browser().viewport().is_narrow();
        egui::TopBottomPanel::bottom("deploy_bar").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.vertical_centered(|ui| {
                if self.session.is_deploying() {
                    ui.spinner();
                } else {
                    let mut button =
                        egui::Button::new(egui::RichText::new("DEPLOY TO NOW").strong());
                    if narrow {
                        button = button
                            .min_size(egui::vec2(ui.available_width(), DEPLOY_BUTTON_HEIGHT));
                    }
                    if ui.add(button).clicked() {
                        self.submit_deploy();
                    }
                }

                if let Some(message) = self.session.error_banner() {
                    ui.colored_label(egui::Color32::RED, format!("■ {message}."));
                }
                if let Some(url) = self.session.deploy_outcome().redirect_url() {
                    ui.hyperlink_to(format!("Deployed: {url}"), url);
                }
                ui.weak(&self.status);
            });
            ui.add_space(6.0);
        });
    }

    fn show_file_tree(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("file_tree")
            .resizable(false)
            .exact_width(FILE_TREE_WIDTH)
            .show(ctx, |ui| {
                ui.add_space(8.0);
                let clicked = file_list(ui, self.session.project(), self.session.selected_path());
                if let Some(path) = clicked {
                    self.session.select_file(&path);
                }

                ui.separator();
                egui::CollapsingHeader::new("Request body")
                    .default_open(false)
                    .show(ui, |ui| {
                        egui::ScrollArea::vertical()
                            .id_salt("request_body_scroll")
                            .max_height(240.0)
                            .show(ui, |ui| {
                                ui.monospace(self.session.request_body());
                            });
                    });
            });
    }

    fn show_body(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.session.layout() == FileBrowserLayout::DrawerOpen {
                let clicked = file_list(ui, self.session.project(), self.session.selected_path());
                if let Some(path) = clicked {
                    self.session.pick_from_drawer(&path);
                }
            } else {
                self.show_code_editor(ui);
            }
        });
    }

    fn show_code_editor(&mut self, ui: &mut egui::Ui) {
        let editor_id = code_editor_id();
        let had_focus = self.editor_focused || ui.memory(|mem| mem.has_focus(editor_id));
        let escape_pressed = ui.input(|i| i.key_pressed(egui::Key::Escape));

        let font_id = egui::TextStyle::Monospace.resolve(ui.style());
        let text_color = ui.visuals().text_color();
        let char_width = ui
            .painter()
            .layout_no_wrap(" ".to_string(), font_id.clone(), text_color)
            .size()
            .x;

        let mut layouter = |ui: &egui::Ui, buf: &dyn egui::TextBuffer, wrap_width: f32| {
            line_indent::layout_galley(
                ui,
                buf.as_str(),
                font_id.clone(),
                text_color,
                char_width,
                wrap_width,
            )
        };

        let mut buffer = self.session.active_content().to_string();
        let indented = had_focus && indent_at_cursor(ui, editor_id, &mut buffer);

        let output = egui::ScrollArea::vertical()
            .id_salt("code_scroll")
            .show(ui, |ui| {
                egui::TextEdit::multiline(&mut buffer)
                    .id(editor_id)
                    .code_editor()
                    .desired_width(f32::INFINITY)
                    .desired_rows(18)
                    .lock_focus(true)
                    .layouter(&mut layouter)
                    .show(ui)
            })
            .inner;

        if indented || output.response.changed() {
            self.session.edit_active_file(buffer);
        }

        if escape_pressed {
            match self.session.handle_escape(had_focus) {
                EscapeAction::EnteredPowerUserMode => {
                    self.status = "Power-user key bindings enabled".to_string();
                    output.response.request_focus();
                }
                EscapeAction::Remapped => output.response.request_focus(),
                EscapeAction::Ignored => {}
            }
        }

        // Escape and Tab stay with the editor instead of moving focus.
        ui.memory_mut(|mem| mem.set_focus_lock_filter(editor_id, CODE_EDITOR_FILTER));
        self.editor_focused = ui.memory(|mem| mem.has_focus(editor_id));
    }

    /// One frame of the editor UI.
    pub fn ui(&mut self, ctx: &egui::Context) {
        self.process_ui_events(ctx);
        self.session.observe_width(ctx.content_rect().width());

        self.show_header(ctx);
        self.show_deploy_bar(ctx);
        if self.session.layout() == FileBrowserLayout::Persistent {
            self.show_file_tree(ctx);
        }
        self.show_body(ctx);

        if self.session.is_deploying() {
            ctx.request_repaint_after(Duration::from_millis(50));
        } else {
            ctx.request_repaint_after(Duration::from_millis(250));
        }
    }
}

fn code_editor_id() -> egui::Id {
    egui::Id::new("code_editor")
}

/// Consumes a plain Tab press and inserts [`line_indent::INDENT_UNIT`] at the
/// editor's cursor, replacing any selection.
fn indent_at_cursor(ui: &egui::Ui, editor_id: egui::Id, buffer: &mut String) -> bool {
    if !ui.input_mut(|i| i.consume_key(egui::Modifiers::NONE, egui::Key::Tab)) {
        return false;
    }
    let mut state = egui::TextEdit::load_state(ui.ctx(), editor_id).unwrap_or_default();
    let end = buffer.chars().count();
    let [start, finish] = state.cursor.char_range().map_or([end, end], |range| {
        let [a, b] = range.sorted_cursors();
        [a.index, b.index]
    });
    let cursor = line_indent::insert_indent_unit(buffer, start, finish);
    state
        .cursor
        .set_char_range(Some(CCursorRange::one(CCursor::new(cursor))));
    egui::TextEdit::store_state(ui.ctx(), editor_id, state);
    true
}

/// Renders the project's files in insertion order; returns the clicked path.
fn file_list(ui: &mut egui::Ui, project: &Project, selected: &str) -> Option<String> {
    let mut clicked = None;
    for path in project.paths() {
        if ui.selectable_label(path == selected, path).clicked() {
            clicked = Some(path.to_string());
        }
    }
    clicked
}

impl eframe::App for DemoEditorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui(ctx);
    }
}

#[cfg(test)]
mod tests {
    use crossbeam_channel::bounded;
    use shared::domain::EditorMode;

    use super::*;

    fn headless_app() -> (DemoEditorApp, Receiver<BackendCommand>, Sender<UiEvent>) {
        let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(4);
        let (ui_tx, ui_rx) = bounded::<UiEvent>(16);
        let app = DemoEditorApp::new(
            cmd_tx,
            ui_rx,
            StartupConfig {
                endpoint: "http://127.0.0.1:9/v6/now/deployments".to_string(),
            },
        );
        (app, cmd_rx, ui_tx)
    }

    fn frame_input(events: Vec<egui::Event>) -> egui::RawInput {
        egui::RawInput {
            screen_rect: Some(egui::Rect::from_min_size(
                egui::Pos2::ZERO,
                egui::vec2(1024.0, 720.0),
            )),
            events,
            ..Default::default()
        }
    }

    fn key_press(key: egui::Key) -> egui::Event {
        egui::Event::Key {
            key,
            physical_key: None,
            pressed: true,
            repeat: false,
            modifiers: egui::Modifiers::NONE,
        }
    }

    /// Renders until the code editor holds focus with its key filter installed.
    fn focus_editor(ctx: &egui::Context, app: &mut DemoEditorApp) {
        let _ = ctx.run(frame_input(Vec::new()), |ctx| app.ui(ctx));
        ctx.memory_mut(|mem| mem.request_focus(code_editor_id()));
        for _ in 0..2 {
            let _ = ctx.run(frame_input(Vec::new()), |ctx| app.ui(ctx));
        }
        assert!(ctx.memory(|mem| mem.has_focus(code_editor_id())));
    }

    #[test]
    fn labels_endpoint_environment() {
        assert_eq!(
            endpoint_environment_label("http://127.0.0.1:8080/v6/now/deployments"),
            "Local"
        );
        assert_eq!(
            endpoint_environment_label("https://staging.example.com/deploy"),
            "Staging"
        );
        assert_eq!(
            endpoint_environment_label("https://api.zeit.co/v6/now/deployments"),
            "Production"
        );
    }

    #[test]
    fn escape_in_focused_editor_enters_power_user_mode() {
        let ctx = egui::Context::default();
        let (mut app, _cmd_rx, _ui_tx) = headless_app();
        focus_editor(&ctx, &mut app);

        let _ = ctx.run(frame_input(vec![key_press(egui::Key::Escape)]), |ctx| {
            app.ui(ctx)
        });
        assert_eq!(app.session.mode(), EditorMode::PowerUserKeybinding);
        assert!(ctx.memory(|mem| mem.has_focus(code_editor_id())));

        let _ = ctx.run(frame_input(vec![key_press(egui::Key::Escape)]), |ctx| {
            app.ui(ctx)
        });
        assert_eq!(app.session.mode(), EditorMode::PowerUserKeybinding);
        assert!(ctx.memory(|mem| mem.has_focus(code_editor_id())));
    }

    #[test]
    fn escape_without_editor_focus_keeps_standard_mode() {
        let ctx = egui::Context::default();
        let (mut app, _cmd_rx, _ui_tx) = headless_app();
        let _ = ctx.run(frame_input(Vec::new()), |ctx| app.ui(ctx));

        let _ = ctx.run(frame_input(vec![key_press(egui::Key::Escape)]), |ctx| {
            app.ui(ctx)
        });
        assert_eq!(app.session.mode(), EditorMode::Standard);
    }

    #[test]
    fn tab_inserts_two_spaces_instead_of_a_tab() {
        let ctx = egui::Context::default();
        let (mut app, _cmd_rx, _ui_tx) = headless_app();
        let before = app.session.active_content().to_string();
        focus_editor(&ctx, &mut app);

        let _ = ctx.run(frame_input(vec![key_press(egui::Key::Tab)]), |ctx| app.ui(ctx));

        let after = app.session.active_content();
        assert_eq!(after.chars().count(), before.chars().count() + 2);
        assert!(!after.contains('\t'));
        assert!(ctx.memory(|mem| mem.has_focus(code_editor_id())));
    }
}
