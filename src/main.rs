use iced::widget::{button, column, container, row, scrollable, text, Column, Row};
use iced::{event, window, Alignment, Element, Event, Length, Subscription, Task, Theme};
use rfd::FileDialog;
use std::path::PathBuf;
use std::sync::Arc;

use frame_flip::config::DROP_SETTLE_DELAY;
use frame_flip::materialize::{self, BatchOutcome, UploadFile};
use frame_flip::roster::{LocalFetch, RosterResolver, RosterSource};
use frame_flip::{GameConfig, Session, SessionPhase};

mod ui;

use ui::board::{frame_grid, FrameHandle};

type Resolver = RosterResolver<RosterSource>;

/// Main application state
struct FrameFlip {
    config: GameConfig,
    /// Available once the manifest lookup finishes
    resolver: Option<Arc<Resolver>>,
    session: Session,
    /// One handle per board entry, same order
    handles: Vec<FrameHandle>,
    /// Status message to display to the user
    status: String,
    /// A batch is in flight; upload and roster controls are disabled
    loading: bool,
    /// Files are being dragged over the window
    drag_over: bool,
    /// Dropped files waiting for the rest of the same drop
    pending_drops: Vec<PathBuf>,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// Manifest lookup finished
    ResolverReady(Arc<Resolver>),
    /// User clicked the "Choose Images" button
    PickFiles,
    FileHovered,
    HoverLeft,
    FileDropped(PathBuf),
    /// No more drops arrived for a moment; process the batch
    DropsSettled,
    /// User clicked a roster button
    SelectRoster(String),
    /// Background load finished (uploads or roster)
    BatchLoaded(BatchOutcome),
    /// Roster had nothing to load; carries the user-facing notice
    RosterFailed(String),
    StartGame,
    ToggleFrame(usize),
    NewGame,
}

impl FrameFlip {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let config = GameConfig::load();
        let source = match RosterSource::from_config(&config) {
            Ok(source) => source,
            Err(err) => {
                tracing::error!(error = %err, "unusable remote roster url, serving rosters from disk");
                RosterSource::Local(LocalFetch::new(config.asset_root.clone()))
            }
        };
        let source = Arc::new(source);
        let manifest_path = config.manifest_path.clone();
        let presets = config.rosters.clone();

        tracing::info!(
            rosters = presets.len(),
            remote = config.remote_base_url.is_some(),
            "🎨 Frame Flip initialized"
        );

        let app = FrameFlip::with_config(config);

        let load = async move { Arc::new(Resolver::load(source, manifest_path, presets).await) };

        (app, Task::perform(load, Message::ResolverReady))
    }

    fn with_config(config: GameConfig) -> Self {
        FrameFlip {
            config,
            resolver: None,
            session: Session::new(),
            handles: Vec::new(),
            status: "Choose some images or pick a roster.".to_string(),
            loading: false,
            drag_over: false,
            pending_drops: Vec::new(),
        }
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::ResolverReady(resolver) => {
                tracing::info!(manifest = resolver.has_manifest(), "rosters ready");
                self.resolver = Some(resolver);
                Task::none()
            }
            Message::PickFiles => {
                if self.loading {
                    return Task::none();
                }
                self.pending_drops.clear();

                // Show the native file picker dialog
                let picked = FileDialog::new()
                    .set_title("Select Images")
                    .add_filter("Images", &frame_flip::config::IMAGE_EXTENSIONS)
                    .pick_files();

                match picked {
                    Some(paths) => self.start_uploads(materialize::accept(paths)),
                    None => Task::none(),
                }
            }
            Message::FileHovered => {
                self.drag_over = true;
                Task::none()
            }
            Message::HoverLeft => {
                self.drag_over = false;
                Task::none()
            }
            Message::FileDropped(path) => {
                self.drag_over = false;
                if self.loading || self.session.phase() != SessionPhase::Idle {
                    return Task::none();
                }

                // Each dropped file arrives as its own event
                let first = self.pending_drops.is_empty();
                self.pending_drops.push(path);
                if first {
                    let settle = async { tokio::time::sleep(DROP_SETTLE_DELAY).await };
                    Task::perform(settle, |_| Message::DropsSettled)
                } else {
                    Task::none()
                }
            }
            Message::DropsSettled => {
                let dropped = std::mem::take(&mut self.pending_drops);
                // Another load started while the drop was settling
                if self.loading || self.session.phase() != SessionPhase::Idle {
                    return Task::none();
                }

                let files = materialize::accept(dropped);
                if files.is_empty() {
                    return Task::none();
                }
                self.start_uploads(files)
            }
            Message::SelectRoster(roster) => {
                if self.loading {
                    return Task::none();
                }
                self.pending_drops.clear();
                let Some(resolver) = self.resolver.clone() else {
                    self.status = "Rosters are still loading, try again in a moment.".to_string();
                    return Task::none();
                };

                self.clear_board();
                self.loading = true;
                self.status = format!("Loading the {roster} roster...");

                let limit = self.config.max_concurrent_loads;
                Task::perform(load_roster(resolver, roster, limit), |result| match result {
                    Ok(outcome) => Message::BatchLoaded(outcome),
                    Err(notice) => Message::RosterFailed(notice),
                })
            }
            Message::BatchLoaded(outcome) => {
                self.loading = false;
                self.handles = outcome.entries.iter().map(FrameHandle::from_entry).collect();
                self.session.replace_all(outcome.entries);
                self.status = format!("{} images ready.", self.session.board().count());
                Task::none()
            }
            Message::RosterFailed(notice) => {
                self.loading = false;
                self.status = notice;
                Task::none()
            }
            Message::StartGame => {
                match self.session.start() {
                    Ok(()) => tracing::info!(frames = self.session.board().count(), "game started"),
                    Err(err) => self.status = err.to_string(),
                }
                Task::none()
            }
            Message::ToggleFrame(index) => {
                if let Err(err) = self.session.toggle(index) {
                    tracing::warn!(error = %err, "ignoring stale frame click");
                }
                Task::none()
            }
            Message::NewGame => {
                self.session.reset();
                self.handles.clear();
                self.status = "Choose some images or pick a roster.".to_string();
                Task::none()
            }
        }
    }

    /// Replace the board with a batch of uploads
    fn start_uploads(&mut self, files: Vec<UploadFile>) -> Task<Message> {
        self.clear_board();

        if files.is_empty() {
            self.status = "No images in that selection.".to_string();
            return Task::none();
        }

        self.loading = true;
        self.status = format!("Reading {} images...", files.len());

        let limit = self.config.max_concurrent_loads;
        Task::perform(materialize::materialize_uploads(files, limit), Message::BatchLoaded)
    }

    fn clear_board(&mut self) {
        self.session.replace_all(Vec::new());
        self.handles.clear();
    }

    /// Build the user interface
    fn view(&self) -> Element<'_, Message> {
        match self.session.phase() {
            SessionPhase::Idle => self.view_setup(),
            SessionPhase::Active => self.view_board(),
        }
    }

    fn view_setup(&self) -> Element<'_, Message> {
        let hint = if self.drag_over {
            "Release to use these images"
        } else {
            "or drop image files onto this window"
        };

        let upload: Column<Message> = column![
            button("Choose Images")
                .on_press_maybe((!self.loading).then_some(Message::PickFiles))
                .padding(10),
            text(hint).size(14),
        ]
        .spacing(8)
        .align_x(Alignment::Center);

        let rosters_ready = self.resolver.is_some() && !self.loading;
        let rosters = Row::with_children(self.config.rosters.iter().map(|preset| {
            button(text(preset.label.clone()))
                .on_press_maybe(rosters_ready.then(|| Message::SelectRoster(preset.id.clone())))
                .padding(10)
                .into()
        }))
        .spacing(12);

        let content: Column<Message> = column![
            text("Frame Flip").size(48),
            upload,
            text(format!("{} images selected", self.session.board().count())).size(16),
            text("Or play a preset roster:").size(16),
            rosters,
            button("Start Game")
                .on_press_maybe((self.session.can_start() && !self.loading).then_some(Message::StartGame))
                .padding(10),
            text(&self.status).size(16),
        ]
        .spacing(20)
        .padding(40)
        .align_x(Alignment::Center);

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into()
    }

    fn view_board(&self) -> Element<'_, Message> {
        let header = row![
            text("Click a frame to flip it").size(24),
            button("New Game").on_press(Message::NewGame).padding(10),
        ]
        .spacing(20)
        .align_y(Alignment::Center);

        let grid = frame_grid(self.session.board().entries(), &self.handles, self.config.frame_size);

        column![header, scrollable(grid).width(Length::Fill).height(Length::Fill)]
            .spacing(20)
            .padding(30)
            .into()
    }

    /// Window file drag-and-drop
    fn subscription(&self) -> Subscription<Message> {
        event::listen_with(|event, _status, _window| match event {
            Event::Window(window::Event::FileHovered(_)) => Some(Message::FileHovered),
            Event::Window(window::Event::FilesHoveredLeft) => Some(Message::HoverLeft),
            Event::Window(window::Event::FileDropped(path)) => Some(Message::FileDropped(path)),
            _ => None,
        })
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

/// Resolve a roster and materialize its images; `Err` carries the notice
async fn load_roster(resolver: Arc<Resolver>, roster: String, limit: usize) -> Result<BatchOutcome, String> {
    let resolved = resolver.resolve(&roster).await.map_err(|err| err.notice())?;
    Ok(materialize::materialize_roster(Arc::clone(resolver.source()), resolved.images, limit).await)
}

fn main() -> iced::Result {
    frame_flip::logging::init();

    iced::application("Frame Flip", FrameFlip::update, FrameFlip::view)
        .subscription(FrameFlip::subscription)
        .theme(FrameFlip::theme)
        .centered()
        .run_with(FrameFlip::new)
}
